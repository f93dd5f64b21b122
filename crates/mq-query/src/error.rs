//! Errors raised while compiling or executing an object query.

/// Failure modes of the object-query layer.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query text could not be tokenized or parsed.
    #[error("Syntax error at {position}: {message}")]
    Syntax {
        /// Byte offset into the query text.
        position: usize,
        message: String,
    },

    /// The FROM clause names an entity that is not registered.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// A path names a field the entity does not declare.
    #[error("Unknown field '{field}' on entity {entity}")]
    UnknownField { entity: String, field: String },

    /// A qualified path uses something other than the declared alias.
    #[error("Unknown identification variable: {0}")]
    UnknownAlias(String),

    /// The query is well-formed but uses a construct this engine does not run.
    #[error("Unsupported query construct: {0}")]
    Unsupported(String),

    /// The requested result type cannot hold the projected columns.
    #[error("Type mismatch: cannot read {projection} as {expected}")]
    TypeMismatch {
        expected: &'static str,
        projection: String,
    },

    /// A parameter referenced by the query was never bound.
    #[error("Parameter not bound: {0}")]
    UnboundParameter(String),

    /// A bound parameter is not referenced by the query.
    #[error("Query has no parameter {0}")]
    UnknownParameter(String),

    /// A single result was requested but the query returned no rows.
    #[error("No result found for query")]
    NoResult,

    /// A single result was requested but the query returned several rows.
    #[error("Query did not return a unique result")]
    NonUniqueResult,

    /// SQLite rejected or failed the generated statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl QueryError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            position,
            message: message.into(),
        }
    }
}

impl From<QueryError> for mq_core::Error {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Sqlite(source) => mq_core::Error::database(source),
            other => mq_core::Error::query(other),
        }
    }
}

/// Result alias for the query layer.
pub type Result<T> = std::result::Result<T, QueryError>;
