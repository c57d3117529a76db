use crate::storage::UpstreamError;
use axum::http::StatusCode;
use tracing::error;

/// Shown for every failed data fetch; the client offers a reload.
pub const LOAD_FAILED: &str = "Gagal memuat data. Silakan refresh halaman.";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn upstream() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: LOAD_FAILED.to_string(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        error!("error fetching data: {err}");
        Self::upstream()
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
