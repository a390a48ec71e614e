//! # Entity Model
//!
//! Relationship metadata and attribute classification for the primary entity.
//! Source paths resolve against this model into underlying column handles;
//! attributes registered as computed are rejected for ordering rather than
//! silently evaluated client-side.

mod entity;

pub use entity::{AttributeKind, EntityModel, ResolvedColumn};
