//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`mq_core::Error`] so that route handlers
//! can return `Result<T, AppError>`. The response carries an [`ErrorPage`]
//! extension which [`crate::middleware::error_page`] renders through the
//! `error` view; without that layer the body is the plain error message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: mq_core::Error,
}

/// Context for the `error` view.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPage {
    pub status: u16,
    pub reason: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn new(inner: mq_core::Error) -> Self {
        Self { inner }
    }

    /// Short machine-readable name for the error kind.
    pub fn code(&self) -> &'static str {
        match &self.inner {
            mq_core::Error::IllegalArgument(_) => "illegal_argument",
            mq_core::Error::Validation(_) => "validation_error",
            mq_core::Error::Query { .. } => "query_error",
            mq_core::Error::Database { .. } => "database_error",
            mq_core::Error::Io { .. } => "io_error",
            mq_core::Error::Render { .. } => "render_error",
            mq_core::Error::Internal(_) => "internal_error",
        }
    }
}

impl From<mq_core::Error> for AppError {
    fn from(e: mq_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in handler"
            );
        } else {
            tracing::warn!(status = %status, error = %self.inner, "Request rejected");
        }

        let page = ErrorPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            code: self.code(),
            message: self.inner.to_string(),
        };

        let mut response = (status, page.message.clone()).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_argument_produces_400() {
        let err = AppError::new(mq_core::Error::IllegalArgument("no menu".into()));
        assert_eq!(err.code(), "illegal_argument");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_error_produces_500() {
        let err = AppError::new(mq_core::Error::query("No result found for query"));
        assert_eq!(err.code(), "query_error");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_error_page() {
        let err = AppError::new(mq_core::Error::Validation("<b>bad</b>".into()));
        let response = err.into_response();
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.status, 400);
        assert_eq!(page.reason, "Bad Request");
        assert_eq!(page.code, "validation_error");
        assert_eq!(page.message, "Validation error: <b>bad</b>");
    }
}
