//! Descriptor set construction
//!
//! Duplicate output names are rejected here, synchronously, before any
//! request parameter is handled.

use std::collections::HashMap;
use std::fmt;

use crate::errors::{TableError, TableResult};

use super::spec::{ColumnSpec, Extractor, SourcePath};

/// Normalized representation of one output column
pub struct ColumnDescriptor {
    name: String,
    source: SourcePath,
    extract: Option<Extractor>,
}

impl ColumnDescriptor {
    /// Output key in the serialized record
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying source path
    pub fn source(&self) -> &SourcePath {
        &self.source
    }

    /// Custom value extractor, if registered
    pub fn extractor(&self) -> Option<&Extractor> {
        self.extract.as_ref()
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("extract", &self.extract.is_some())
            .finish()
    }
}

/// Ordered descriptor list with a name index and the relationships that
/// must be eagerly joined
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
    relations: Vec<String>,
}

impl ColumnSet {
    /// Build the descriptor set from an ordered specification list.
    ///
    /// Fails with a configuration error on duplicate output names.
    pub fn new(specs: Vec<ColumnSpec>) -> TableResult<Self> {
        let mut columns = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        let mut relations: Vec<String> = Vec::new();

        for spec in specs {
            if index.contains_key(&spec.name) {
                return Err(TableError::Configuration(format!(
                    "duplicate column name {}",
                    spec.name
                )));
            }

            if let Some(relation) = spec.source.relation() {
                if !relations.iter().any(|r| r == relation) {
                    relations.push(relation.to_string());
                }
            }

            index.insert(spec.name.clone(), columns.len());
            columns.push(ColumnDescriptor {
                name: spec.name,
                source: spec.source,
                extract: spec.extract,
            });
        }

        Ok(Self {
            columns,
            index,
            relations,
        })
    }

    /// Descriptor for the given output name
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.index.get(name).map(|i| &self.columns[*i])
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Relationship names in first-occurrence order, each listed once
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Debug for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.columns)
            .field("relations", &self.relations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let set = ColumnSet::new(vec![
            ColumnSpec::named("id"),
            ColumnSpec::sourced("name", "full_name"),
            ColumnSpec::sourced("address", "address.description"),
        ])
        .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(
            set.get("name").unwrap().source(),
            &SourcePath::Attribute("full_name".into())
        );
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ColumnSet::new(vec![ColumnSpec::named("id"), ColumnSpec::named("id")]);

        match result {
            Err(TableError::Configuration(reason)) => assert!(reason.contains("id")),
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_relations_deduplicated_in_order() {
        let set = ColumnSet::new(vec![
            ColumnSpec::sourced("street", "address.street"),
            ColumnSpec::sourced("city", "address.city"),
            ColumnSpec::sourced("employer", "company.name"),
        ])
        .unwrap();

        assert_eq!(set.relations(), &["address".to_string(), "company".to_string()]);
    }

    #[test]
    fn test_registration_order_preserved() {
        let set = ColumnSet::new(vec![
            ColumnSpec::named("b"),
            ColumnSpec::named("a"),
            ColumnSpec::named("c"),
        ])
        .unwrap();

        let names: Vec<&str> = set.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
