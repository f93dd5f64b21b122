//! Unified error type for menuql.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for HTTP handlers to derive a status code via [`Error::http_status`].

/// Unified error type covering all failure modes in menuql.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller passed an argument that does not identify anything usable,
    /// such as a lookup key with no matching row.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Request data or configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An object query failed to compile or execute.
    #[error("Query error: {source}")]
    Query {
        /// The underlying query error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A view template failed to render.
    #[error("Render error [{view}]: {message}")]
    Render {
        /// Name of the view being rendered.
        view: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::IllegalArgument(_) => 400,
            Error::Validation(_) => 400,
            Error::Query { .. } => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Render { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::Query`].
    pub fn query(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Query {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Render`].
    pub fn render(view: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Render {
            view: view.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
