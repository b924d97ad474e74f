use crate::domain::model::ErrorBody;
use crate::utils::error::{ErrorCategory, RelayError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.category() {
            ErrorCategory::Input => {
                tracing::debug!(error = %self, "Rejected request");
            }
            category => {
                tracing::error!(
                    "❌ Excuse generation failed: {} (Category: {:?}, Severity: {:?})",
                    self,
                    category,
                    self.severity()
                );
                tracing::debug!("💡 Recovery suggestion: {}", self.recovery_suggestion());
            }
        }

        let body = ErrorBody {
            error: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // 沒有 JSON content type 時當作沒有 problem 欄位
            JsonRejection::MissingJsonContentType(_) => RelayError::MissingProblem,
            other => RelayError::InvalidRequest {
                message: other.body_text(),
            },
        }
    }
}
