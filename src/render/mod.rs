//! # Result Serialization
//!
//! Maps fetched rows through the column descriptors into output records,
//! attaching auxiliary per-row data under the reserved side-channel key.

mod serializer;

pub use serializer::{render_row, render_rows, RowDataFn, ROW_DATA_KEY};
