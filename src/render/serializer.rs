//! Row serialization through column descriptors

use serde_json::{Map, Value};

use crate::columns::{ColumnSet, SourcePath};

/// Auxiliary per-row data provider, invoked with the whole row
pub type RowDataFn = Box<dyn Fn(&Value) -> Value>;

/// Reserved output key for auxiliary per-row data
pub const ROW_DATA_KEY: &str = "DT_RowData";

/// Serialize every fetched row into an output record
pub fn render_rows(rows: &[Value], columns: &ColumnSet, row_data: &[(String, RowDataFn)]) -> Vec<Value> {
    rows.iter()
        .map(|row| render_row(row, columns, row_data))
        .collect()
}

/// Serialize one row: each descriptor's extractor wins if present, otherwise
/// the row is navigated along the source path (one relationship hop); absent
/// attributes serialize as null.
pub fn render_row(row: &Value, columns: &ColumnSet, row_data: &[(String, RowDataFn)]) -> Value {
    let mut record = Map::with_capacity(columns.len());

    for descriptor in columns.iter() {
        let value = match descriptor.extractor() {
            Some(extract) => extract(row),
            None => source_value(row, descriptor.source()),
        };
        record.insert(descriptor.name().to_string(), value);
    }

    if !row_data.is_empty() {
        let mut side_channel = Map::with_capacity(row_data.len());
        for (name, provider) in row_data {
            side_channel.insert(name.clone(), provider(row));
        }
        record.insert(ROW_DATA_KEY.to_string(), Value::Object(side_channel));
    }

    Value::Object(record)
}

fn source_value(row: &Value, source: &SourcePath) -> Value {
    let resolved = match source {
        SourcePath::Attribute(attr) => row.get(attr),
        SourcePath::Related {
            relation,
            attribute,
        } => row.get(relation).and_then(|related| related.get(attribute)),
    };
    resolved.cloned().unwrap_or(Value::Null)
}
