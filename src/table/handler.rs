//! Request handler
//!
//! One `DataTable` value processes exactly one request end-to-end. The
//! column set and registered predicates are read-only once construction
//! finishes; `respond` consumes the table.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::columns::{ColumnSet, ColumnSpec};
use crate::errors::{TableError, TableResult};
use crate::model::{EntityModel, ResolvedColumn};
use crate::params::decode;
use crate::query::{transform, QuerySource};
use crate::render::{render_rows, RowDataFn};

use super::response::{TableReply, TableResponse};

/// Global search predicate: narrows the query by the top-level search value
pub type GlobalSearch<Q> = Box<dyn Fn(Q, &str) -> Q>;

/// Per-column search predicate: narrows the query by one column's search
/// value, given the resolved column handle
pub type ColumnSearch<Q> = Box<dyn Fn(&ResolvedColumn, Q, &str) -> Q>;

/// Server-side adapter for one tabular request
pub struct DataTable<Q: QuerySource> {
    params: HashMap<String, String>,
    model: EntityModel,
    columns: ColumnSet,
    query: Q,
    global_search: Option<GlobalSearch<Q>>,
    column_search: Option<ColumnSearch<Q>>,
    row_data: Vec<(String, RowDataFn)>,
}

impl<Q: QuerySource> DataTable<Q> {
    /// Build a table from the raw parameter map, the primary entity model,
    /// the initial query, and the ordered column specifications.
    ///
    /// Configuration problems (duplicate column names) surface here,
    /// synchronously, never from the query phase. Every relationship the
    /// column set traverses is eagerly joined before any filtering or
    /// ordering can run.
    pub fn new(
        params: HashMap<String, String>,
        model: EntityModel,
        query: Q,
        specs: Vec<ColumnSpec>,
    ) -> TableResult<Self> {
        let columns = ColumnSet::new(specs)?;

        let mut query = query;
        for relation in columns.relations() {
            query = query.eager(relation);
        }

        Ok(Self {
            params,
            model,
            columns,
            query,
            global_search: None,
            column_search: None,
            row_data: Vec::new(),
        })
    }

    /// Register the global search predicate
    pub fn on_search(mut self, predicate: impl Fn(Q, &str) -> Q + 'static) -> Self {
        self.global_search = Some(Box::new(predicate));
        self
    }

    /// Register the per-column search predicate
    pub fn on_column_search(
        mut self,
        predicate: impl Fn(&ResolvedColumn, Q, &str) -> Q + 'static,
    ) -> Self {
        self.column_search = Some(Box::new(predicate));
        self
    }

    /// Register a named auxiliary per-row data provider
    pub fn add_row_data(
        mut self,
        name: impl Into<String>,
        provider: impl Fn(&Value) -> Value + 'static,
    ) -> Self {
        self.row_data.push((name.into(), Box::new(provider)));
        self
    }

    /// Answer the request, converting any pipeline failure into the
    /// protocol's error payload
    pub fn respond(self) -> TableReply {
        match self.process() {
            Ok(response) => TableReply::Success(response),
            Err(err) => {
                warn!(error = %err, "table request failed");
                TableReply::from(err)
            }
        }
    }

    /// The fallible pipeline behind [`respond`](Self::respond)
    pub fn process(self) -> TableResult<TableResponse> {
        let draw = integer_param(&self.params, "draw")?;
        let start = integer_param(&self.params, "start")?;
        let length = integer_param(&self.params, "length")?;
        if start < 0 {
            return Err(TableError::invalid("start"));
        }
        if length <= 0 {
            return Err(TableError::invalid("length"));
        }

        let columns_directive = decode(&self.params, "columns");
        let order_directive = decode(&self.params, "order");
        let search_directive = decode(&self.params, "search");

        debug!(
            draw,
            start,
            length,
            columns = columns_directive.len(),
            order = order_directive.len(),
            "processing table request"
        );

        let Self {
            model,
            columns,
            query,
            global_search,
            column_search,
            row_data,
            ..
        } = self;

        let records_total = query.total();

        let query = transform::apply_search(
            query,
            &search_directive,
            &columns_directive,
            &columns,
            &model,
            global_search.as_deref(),
            column_search.as_deref(),
        )?;

        let query = transform::apply_ordering(
            query,
            &order_directive,
            &columns_directive,
            &columns,
            &model,
        )?;

        let records_filtered = query.total();
        let query = query.window(start as u64, length as u64);
        let rows = query.fetch();

        debug!(
            records_total,
            records_filtered,
            fetched = rows.len(),
            "table request complete"
        );

        Ok(TableResponse {
            draw,
            records_total,
            records_filtered,
            data: render_rows(&rows, &columns, &row_data),
        })
    }
}

/// Decode a required integer parameter
fn integer_param(params: &HashMap<String, String>, name: &str) -> TableResult<i64> {
    let raw = params
        .get(name)
        .ok_or_else(|| TableError::missing(name))?;
    raw.parse().map_err(|_| TableError::invalid(name))
}
