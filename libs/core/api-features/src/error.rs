use thiserror::Error;

/// Errors raised while executing a query description.
///
/// Building a query never fails; these only surface when a backend
/// evaluates or runs it.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unsupported query operator: {0}")]
    UnsupportedOperator(String),

    #[error("Malformed query clause: {0}")]
    MalformedClause(String),

    #[error("Invalid regular expression '{pattern}': {details}")]
    InvalidPattern { pattern: String, details: String },

    #[error("Invalid sort direction for field '{0}'")]
    InvalidSort(String),

    #[error("Document conversion error: {0}")]
    Conversion(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;
