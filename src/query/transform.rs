//! Search and ordering transformations
//!
//! Applies decoded directives to the query handle, resolving logical column
//! references through the registry and model. The handle is threaded
//! functionally; the first error aborts the rest of the pipeline.

use tracing::debug;

use crate::columns::ColumnSet;
use crate::errors::{TableError, TableResult};
use crate::model::{EntityModel, ResolvedColumn};
use crate::params::{Directive, DirectiveEntry, ParamValue};

use super::source::{QuerySource, SortDirection};

/// Apply the global and per-column search directives.
///
/// Directives with no registered predicate are accepted and ignored. The
/// global predicate runs first; per-column predicates then thread the query
/// through each searched column in column order, so independent column
/// searches compose as an intersection.
pub(crate) fn apply_search<Q: QuerySource>(
    mut query: Q,
    search: &Directive,
    columns_directive: &Directive,
    columns: &ColumnSet,
    model: &EntityModel,
    global: Option<&dyn Fn(Q, &str) -> Q>,
    per_column: Option<&dyn Fn(&ResolvedColumn, Q, &str) -> Q>,
) -> TableResult<Q> {
    if let Some(predicate) = global {
        let value = search
            .top()
            .get("value")
            .map(ParamValue::render)
            .unwrap_or_default();
        if !value.is_empty() {
            debug!(value = %value, "applying global search");
            query = predicate(query, &value);
        }
    }

    if let Some(predicate) = per_column {
        for (index, entry) in columns_directive.entries() {
            let value = column_search_value(entry);
            if value.is_empty() || !searchable(entry) {
                continue;
            }

            let name = directive_name(entry)
                .ok_or_else(|| TableError::UnknownColumn(format!("index {}", index)))?;
            let descriptor = columns
                .get(&name)
                .ok_or_else(|| TableError::UnknownColumn(name.clone()))?;
            let resolved = model.resolve(descriptor.source())?;

            debug!(column = %name, value = %value, "applying column search");
            query = predicate(&resolved, query, &value);
        }
    }

    Ok(query)
}

/// Apply the order directives in index order; later directives become
/// secondary sort keys.
pub(crate) fn apply_ordering<Q: QuerySource>(
    mut query: Q,
    order: &Directive,
    columns_directive: &Directive,
    columns: &ColumnSet,
    model: &EntityModel,
) -> TableResult<Q> {
    for (index, entry) in order.entries() {
        let target = entry
            .get("column")
            .and_then(ParamValue::as_int)
            .ok_or_else(|| TableError::invalid(format!("order[{}][column]", index)))?;
        let target: usize = target
            .try_into()
            .map_err(|_| TableError::invalid(format!("order[{}][column]", index)))?;

        let column_entry = columns_directive
            .entry(target)
            .ok_or_else(|| TableError::UnknownColumn(format!("index {}", target)))?;

        // A column the client marked non-orderable is skipped, not an error
        if !orderable(column_entry) {
            continue;
        }

        let name = directive_name(column_entry)
            .ok_or_else(|| TableError::UnknownColumn(format!("index {}", target)))?;
        let descriptor = columns
            .get(&name)
            .ok_or_else(|| TableError::UnknownColumn(name.clone()))?;
        let resolved = model.resolve(descriptor.source())?;

        let direction = entry
            .get("dir")
            .map(ParamValue::render)
            .map(|dir| SortDirection::from_param(&dir))
            .unwrap_or(SortDirection::Asc);

        debug!(column = %name, ?direction, "applying order clause");
        query = query.order_by(&resolved, direction);
    }

    Ok(query)
}

/// Logical column name from a columns-directive entry's `data` field
fn directive_name(entry: &DirectiveEntry) -> Option<String> {
    let name = entry.get("data").map(ParamValue::render)?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Per-column search value, one nesting level down
fn column_search_value(entry: &DirectiveEntry) -> String {
    entry
        .get("search")
        .and_then(|search| search.get("value"))
        .map(ParamValue::render)
        .unwrap_or_default()
}

/// Only an explicit `searchable=false` opts a column out of search
fn searchable(entry: &DirectiveEntry) -> bool {
    entry.get("searchable").and_then(ParamValue::as_bool) != Some(false)
}

/// Only an explicit `orderable=false` opts a column out of ordering
fn orderable(entry: &DirectiveEntry) -> bool {
    entry.get("orderable").and_then(ParamValue::as_bool) != Some(false)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use crate::columns::ColumnSpec;
    use crate::params::decode;
    use crate::query::MemorySource;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn model() -> EntityModel {
        EntityModel::new("users")
            .attribute("id")
            .attribute("full_name")
            .computed("age")
    }

    fn columns() -> ColumnSet {
        ColumnSet::new(vec![
            ColumnSpec::named("id"),
            ColumnSpec::sourced("name", "full_name"),
            ColumnSpec::sourced("age", "age"),
        ])
        .unwrap()
    }

    fn rows() -> Vec<serde_json::Value> {
        vec![
            json!({"id": 2, "full_name": "bob"}),
            json!({"id": 1, "full_name": "alice"}),
        ]
    }

    #[test]
    fn test_ordering_applied_in_index_order() {
        let map = params(&[
            ("columns[0][data]", "id"),
            ("columns[1][data]", "name"),
            ("order[0][column]", "1"),
            ("order[0][dir]", "asc"),
        ]);
        let order = decode(&map, "order");
        let cols = decode(&map, "columns");

        let query = apply_ordering(MemorySource::new(rows()), &order, &cols, &columns(), &model())
            .unwrap();
        let fetched = query.fetch();

        assert_eq!(fetched[0]["full_name"], "alice");
        assert_eq!(fetched[1]["full_name"], "bob");
    }

    #[test]
    fn test_non_orderable_flag_skips_clause() {
        let map = params(&[
            ("columns[0][data]", "id"),
            ("columns[0][orderable]", "false"),
            ("order[0][column]", "0"),
            ("order[0][dir]", "desc"),
        ]);
        let order = decode(&map, "order");
        let cols = decode(&map, "columns");

        let query = apply_ordering(MemorySource::new(rows()), &order, &cols, &columns(), &model())
            .unwrap();

        // Untouched: rows come back in insertion order
        assert_eq!(query.fetch()[0]["id"], 2);
    }

    #[test]
    fn test_order_index_outside_columns_directive() {
        let map = params(&[
            ("columns[0][data]", "id"),
            ("order[0][column]", "7"),
        ]);
        let order = decode(&map, "order");
        let cols = decode(&map, "columns");

        let err = apply_ordering(MemorySource::new(rows()), &order, &cols, &columns(), &model())
            .unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("index 7".into()));
    }

    #[test]
    fn test_order_by_unregistered_name() {
        let map = params(&[
            ("columns[0][data]", "nickname"),
            ("order[0][column]", "0"),
        ]);
        let order = decode(&map, "order");
        let cols = decode(&map, "columns");

        let err = apply_ordering(MemorySource::new(rows()), &order, &cols, &columns(), &model())
            .unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("nickname".into()));
    }

    #[test]
    fn test_order_by_computed_attribute() {
        let map = params(&[
            ("columns[0][data]", "age"),
            ("order[0][column]", "0"),
        ]);
        let order = decode(&map, "order");
        let cols = decode(&map, "columns");

        let err = apply_ordering(MemorySource::new(rows()), &order, &cols, &columns(), &model())
            .unwrap_err();
        assert_eq!(err, TableError::NotOrderable("age".into()));
    }

    #[test]
    fn test_search_without_predicates_is_noop() {
        let map = params(&[
            ("columns[0][data]", "name"),
            ("columns[0][search][value]", "alice"),
            ("search[value]", "bob"),
        ]);
        let search = decode(&map, "search");
        let cols = decode(&map, "columns");

        let query = apply_search(
            MemorySource::new(rows()),
            &search,
            &cols,
            &columns(),
            &model(),
            None,
            None,
        )
        .unwrap();

        assert_eq!(query.total(), 2);
    }

    #[test]
    fn test_global_search_predicate() {
        let map = params(&[("search[value]", "ali")]);
        let search = decode(&map, "search");
        let cols = Directive::default();

        let global = |query: MemorySource, term: &str| {
            let term = term.to_string();
            query.retain(move |row| {
                row["full_name"]
                    .as_str()
                    .is_some_and(|name| name.contains(&term))
            })
        };

        let query = apply_search(
            MemorySource::new(rows()),
            &search,
            &cols,
            &columns(),
            &model(),
            Some(&global),
            None,
        )
        .unwrap();

        assert_eq!(query.total(), 1);
        assert_eq!(query.fetch()[0]["full_name"], "alice");
    }

    #[test]
    fn test_column_search_respects_searchable_flag() {
        let map = params(&[
            ("columns[0][data]", "name"),
            ("columns[0][searchable]", "false"),
            ("columns[0][search][value]", "alice"),
        ]);
        let search = Directive::default();
        let cols = decode(&map, "columns");

        let per_column = |_col: &ResolvedColumn, query: MemorySource, _term: &str| {
            query.retain(|_| false)
        };

        let query = apply_search(
            MemorySource::new(rows()),
            &search,
            &cols,
            &columns(),
            &model(),
            None,
            Some(&per_column),
        )
        .unwrap();

        // Opted out, predicate never ran
        assert_eq!(query.total(), 2);
    }

    #[test]
    fn test_column_search_threads_query() {
        let map = params(&[
            ("columns[0][data]", "id"),
            ("columns[0][search][value]", "1"),
            ("columns[1][data]", "name"),
            ("columns[1][search][value]", "ali"),
        ]);
        let search = Directive::default();
        let cols = decode(&map, "columns");

        let per_column = |col: &ResolvedColumn, query: MemorySource, term: &str| {
            let col = col.clone();
            let term = term.to_string();
            query.retain(move |row| {
                col.value_in(row)
                    .map(|v| v.to_string().contains(&term))
                    .unwrap_or(false)
            })
        };

        let query = apply_search(
            MemorySource::new(rows()),
            &search,
            &cols,
            &columns(),
            &model(),
            None,
            Some(&per_column),
        )
        .unwrap();

        assert_eq!(query.total(), 1);
        assert_eq!(query.fetch()[0]["id"], 1);
    }
}
