//! Response middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::context::AppContext;
use crate::error::ErrorPage;

/// Render responses carrying an [`ErrorPage`] through the `error` view.
///
/// If the view itself fails, the plain-text response is passed through.
pub async fn error_page(State(ctx): State<AppContext>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    match ctx.views.render("error", &page) {
        Ok(html) => (response.status(), Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            response
        }
    }
}
