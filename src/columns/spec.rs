//! Column specifications
//!
//! A closed set of factory-built variants. Every spec carries an output name
//! and a source path; `derived` and `full` add a value extractor that
//! replaces path navigation entirely at serialization time.

use std::fmt;

use serde_json::Value;

/// Custom value-extraction function, invoked with the whole row
pub type Extractor = Box<dyn Fn(&Value) -> Value>;

/// Where a column's value comes from in the underlying data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePath {
    /// Attribute on the primary entity
    Attribute(String),
    /// One relationship hop, then an attribute on the target entity
    Related { relation: String, attribute: String },
}

impl SourcePath {
    /// Parse a path, splitting on the first dot into `relation.attribute`
    pub fn parse(path: &str) -> Self {
        match path.split_once('.') {
            Some((relation, attribute)) => SourcePath::Related {
                relation: relation.to_string(),
                attribute: attribute.to_string(),
            },
            None => SourcePath::Attribute(path.to_string()),
        }
    }

    /// Relationship segment, if this path traverses one
    pub fn relation(&self) -> Option<&str> {
        match self {
            SourcePath::Related { relation, .. } => Some(relation),
            SourcePath::Attribute(_) => None,
        }
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePath::Attribute(attr) => write!(f, "{}", attr),
            SourcePath::Related {
                relation,
                attribute,
            } => write!(f, "{}.{}", relation, attribute),
        }
    }
}

/// One column specification, accepted by the table at construction
pub struct ColumnSpec {
    pub(crate) name: String,
    pub(crate) source: SourcePath,
    pub(crate) extract: Option<Extractor>,
}

impl ColumnSpec {
    /// Output name and source path are the same attribute
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = SourcePath::parse(&name);
        Self {
            name,
            source,
            extract: None,
        }
    }

    /// Output name with a separate source path (may be `relation.attribute`)
    pub fn sourced(name: impl Into<String>, path: &str) -> Self {
        Self {
            name: name.into(),
            source: SourcePath::parse(path),
            extract: None,
        }
    }

    /// Output name with a custom value extractor; the source path defaults
    /// to the name
    pub fn derived(name: impl Into<String>, extract: impl Fn(&Value) -> Value + 'static) -> Self {
        let name = name.into();
        let source = SourcePath::parse(&name);
        Self {
            name,
            source,
            extract: Some(Box::new(extract)),
        }
    }

    /// Output name, separate source path, and a custom value extractor
    pub fn full(
        name: impl Into<String>,
        path: &str,
        extract: impl Fn(&Value) -> Value + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source: SourcePath::parse(path),
            extract: Some(Box::new(extract)),
        }
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("extract", &self.extract.is_some())
            .finish()
    }
}
