//! # Error Types
//!
//! One taxonomy for the whole request pipeline. Request-phase errors are
//! caught exactly once at the table boundary and turned into the protocol's
//! single-field error payload; `Configuration` is raised at construction
//! time, before any request parameter is touched.

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while building a table or answering a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Required top-level parameter absent from the inbound map
    #[error("Parameter {0} is missing")]
    MissingParameter(String),

    /// Parameter present but not parseable as the required type
    #[error("Parameter {0} is invalid")]
    InvalidParameter(String),

    /// Directive referenced a column index or name that does not exist
    #[error("Column {0} not found")]
    UnknownColumn(String),

    /// Resolved attribute is computed, not a true storage column
    #[error("Column {0} is not orderable")]
    NotOrderable(String),

    /// Invalid table configuration, raised at construction
    #[error("Invalid table configuration: {0}")]
    Configuration(String),
}

impl TableError {
    /// Missing-parameter error for the given parameter name
    pub fn missing(name: impl Into<String>) -> Self {
        TableError::MissingParameter(name.into())
    }

    /// Invalid-parameter error for the given parameter name
    pub fn invalid(name: impl Into<String>) -> Self {
        TableError::InvalidParameter(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TableError::missing("start").to_string(),
            "Parameter start is missing"
        );
        assert_eq!(
            TableError::invalid("length").to_string(),
            "Parameter length is invalid"
        );
        assert_eq!(
            TableError::UnknownColumn("address".into()).to_string(),
            "Column address not found"
        );
        assert_eq!(
            TableError::NotOrderable("age".into()).to_string(),
            "Column age is not orderable"
        );
    }
}
