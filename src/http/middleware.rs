use crate::http::AppState;
use crate::http::handler::ApiError;
use crate::store::Store;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Rejects requests that do not carry `Authorization: Bearer <admin token>`.
pub async fn require_admin_token<S: Store>(
    State(state): State<AppState<S>>,
    request: Request,
    next: Next,
) -> Response {
    let token = extract_token(request.headers().get(AUTHORIZATION));
    let presented = token.is_some();
    let authorized = token.is_some_and(|token| token == &*state.admin_token);

    if authorized {
        return next.run(request).await;
    }
    if presented {
        tracing::warn!(path = %request.uri().path(), "rejected invalid admin token");
    }
    ApiError::Unauthorized.into_response()
}

fn extract_token(header: Option<&HeaderValue>) -> Option<&str> {
    let raw = header?.to_str().ok()?;
    raw.strip_prefix("Bearer ")
}
