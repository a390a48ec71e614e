//! # Parameter Decoding
//!
//! Decodes the flat, bracket-indexed parameter namespace of the tabular
//! request protocol into structured per-index directives.
//!
//! One directive is decoded per concern (`columns`, `order`, `search`); each
//! pass re-scans the full map with a different prefix. Keys that do not match
//! a prefix's grammar are ignored for that pass, so decoding never fails.

mod decoder;
mod value;

pub use decoder::{decode, Directive, DirectiveEntry};
pub use value::ParamValue;
