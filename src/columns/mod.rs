//! # Column Registry
//!
//! Normalizes column specifications into a uniform descriptor set: an ordered
//! descriptor list, a name index for O(1) lookup during ordering and search
//! resolution, and the relationship names that need an eager join before any
//! filtering or ordering runs.

mod registry;
mod spec;

pub use registry::{ColumnDescriptor, ColumnSet};
pub use spec::{ColumnSpec, Extractor, SourcePath};
