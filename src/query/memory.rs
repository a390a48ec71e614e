//! In-memory query source
//!
//! Reference implementation over a vector of JSON rows. Order clauses
//! accumulate and are applied at fetch time as one stable lexicographic
//! sort, so earlier clauses stay primary. The count always reflects filters
//! but never the window.

use std::cmp::Ordering;

use serde_json::Value;

use crate::model::ResolvedColumn;

use super::source::{QuerySource, SortDirection};

/// Query source backed by an in-memory row set
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<Value>,
    ordering: Vec<(ResolvedColumn, SortDirection)>,
    window: Option<(u64, u64)>,
}

impl MemorySource {
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows,
            ordering: Vec::new(),
            window: None,
        }
    }

    /// Keep only rows matching the predicate.
    ///
    /// The building block for search predicates over this source.
    pub fn retain<F>(mut self, keep: F) -> Self
    where
        F: Fn(&Value) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }
}

impl QuerySource for MemorySource {
    fn total(&self) -> u64 {
        self.rows.len() as u64
    }

    fn eager(self, _relation: &str) -> Self {
        // Rows carry their related objects inline
        self
    }

    fn order_by(mut self, column: &ResolvedColumn, direction: SortDirection) -> Self {
        self.ordering.push((column.clone(), direction));
        self
    }

    fn window(mut self, start: u64, length: u64) -> Self {
        self.window = Some((start, length));
        self
    }

    fn fetch(&self) -> Vec<Value> {
        let mut rows = self.rows.clone();

        if !self.ordering.is_empty() {
            rows.sort_by(|a, b| {
                for (column, direction) in &self.ordering {
                    let ordering = compare_values(column.value_in(a), column.value_in(b));
                    let ordering = match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        match self.window {
            Some((start, length)) => {
                let start = (start as usize).min(rows.len());
                let end = start.saturating_add(length as usize).min(rows.len());
                rows[start..end].to_vec()
            }
            None => rows,
        }
    }
}

/// Compares two JSON values for sorting.
///
/// Ordering rules:
/// - absent < null < bool < number < string
/// - for same types, natural ordering; arrays and objects are not compared
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}
