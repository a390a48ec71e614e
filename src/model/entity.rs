//! Entity metadata and source-path resolution

use std::collections::HashMap;

use serde_json::Value;

use crate::columns::SourcePath;
use crate::errors::{TableError, TableResult};

/// Whether an attribute is backed by storage or computed on read.
///
/// Decided at registration time; ordering and filtering address storage
/// columns only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// True queryable column
    Stored,
    /// Derived property with no storage backing
    Computed,
}

/// Attribute and relationship metadata for one entity type
#[derive(Debug, Clone)]
pub struct EntityModel {
    name: String,
    attributes: HashMap<String, AttributeKind>,
    relations: HashMap<String, EntityModel>,
}

impl EntityModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// Declare a stored attribute
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), AttributeKind::Stored);
        self
    }

    /// Declare a computed attribute
    pub fn computed(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), AttributeKind::Computed);
        self
    }

    /// Declare a relationship to another entity
    pub fn relation(mut self, name: impl Into<String>, target: EntityModel) -> Self {
        self.relations.insert(name.into(), target);
        self
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a source path into an underlying column handle.
    ///
    /// Dotted paths consume one relationship hop: the relation's target
    /// entity is looked up first, then the attribute on it. Missing relations
    /// or attributes fail as unknown columns; computed attributes fail as
    /// not orderable.
    pub fn resolve(&self, path: &SourcePath) -> TableResult<ResolvedColumn> {
        match path {
            SourcePath::Attribute(attr) => {
                let kind = self.attribute_kind(attr)?;
                Self::storage_only(attr, kind)?;
                Ok(ResolvedColumn {
                    entity: self.name.clone(),
                    relation: None,
                    attribute: attr.clone(),
                })
            }
            SourcePath::Related {
                relation,
                attribute,
            } => {
                let target = self
                    .relations
                    .get(relation)
                    .ok_or_else(|| TableError::UnknownColumn(format!("{}.{}", relation, attribute)))?;
                let kind = target.attribute_kind(attribute)?;
                Self::storage_only(attribute, kind)?;
                Ok(ResolvedColumn {
                    entity: target.name.clone(),
                    relation: Some(relation.clone()),
                    attribute: attribute.clone(),
                })
            }
        }
    }

    fn attribute_kind(&self, attr: &str) -> TableResult<AttributeKind> {
        self.attributes
            .get(attr)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(attr.to_string()))
    }

    fn storage_only(attr: &str, kind: AttributeKind) -> TableResult<()> {
        match kind {
            AttributeKind::Stored => Ok(()),
            AttributeKind::Computed => Err(TableError::NotOrderable(attr.to_string())),
        }
    }
}

/// Underlying data-source column reference, used for order clauses and
/// handed to column-search predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Entity the attribute lives on (the relation target for dotted paths)
    pub entity: String,
    /// Relationship traversed to reach the attribute, if any
    pub relation: Option<String>,
    /// Attribute name on the resolved entity
    pub attribute: String,
}

impl ResolvedColumn {
    /// Read this column's value out of a row, following the relationship
    /// hop when present
    pub fn value_in<'a>(&self, row: &'a Value) -> Option<&'a Value> {
        match &self.relation {
            Some(relation) => row.get(relation)?.get(&self.attribute),
            None => row.get(&self.attribute),
        }
    }
}
