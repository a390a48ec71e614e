//! gridsource - server-side adapter for tabular UI request protocols
//!
//! Translates a table component's request parameters (pagination, sorting,
//! global and per-column search) into operations on an abstract data-source
//! query, then serializes the result rows into the protocol's response shape.
//!
//! The caller supplies the raw parameter map, an [`EntityModel`] describing
//! the primary entity, an initial [`QuerySource`] handle, and the ordered
//! column specifications; search semantics are plugged in as predicates over
//! the concrete query type.
//!
//! ```
//! use gridsource::{ColumnSpec, DataTable, EntityModel, MemorySource};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let params: HashMap<String, String> = [
//!     ("draw", "1"),
//!     ("start", "0"),
//!     ("length", "10"),
//!     ("columns[0][data]", "id"),
//!     ("columns[1][data]", "name"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let model = EntityModel::new("users").attribute("id").attribute("full_name");
//! let rows = MemorySource::new(vec![json!({"id": 1, "full_name": "Ada"})]);
//!
//! let table = DataTable::new(params, model, rows, vec![
//!     ColumnSpec::named("id"),
//!     ColumnSpec::sourced("name", "full_name"),
//! ])
//! .unwrap();
//!
//! let reply = table.respond().to_value();
//! assert_eq!(reply["recordsTotal"], 1);
//! ```

pub mod columns;
pub mod errors;
pub mod model;
pub mod params;
pub mod query;
pub mod render;
pub mod table;

pub use columns::{ColumnDescriptor, ColumnSet, ColumnSpec, SourcePath};
pub use errors::{TableError, TableResult};
pub use model::{AttributeKind, EntityModel, ResolvedColumn};
pub use params::{decode, Directive, ParamValue};
pub use query::{MemorySource, QuerySource, SortDirection};
pub use render::{RowDataFn, ROW_DATA_KEY};
pub use table::{ColumnSearch, DataTable, ErrorResponse, GlobalSearch, TableReply, TableResponse};
