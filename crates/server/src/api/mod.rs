pub mod addons;
pub mod content;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod tmdb;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use streamhub_core::{DataSource, Envelope};

/// Status code plus envelope body, returned by every JSON handler.
pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

/// Envelope without data and with a real failure status.
pub(crate) fn failure<T>(
    status: StatusCode,
    source: DataSource,
    message: impl Into<String>,
) -> ApiResponse<T> {
    (status, Json(Envelope::failure(source, message)))
}
