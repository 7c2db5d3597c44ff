use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(#[from] ValidationErrors),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Constraint violations are caused by the payload, not by the server.
        if let Some(rusqlite::Error::SqliteFailure(failure, msg)) =
            err.downcast_ref::<rusqlite::Error>()
        {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| "constraint violation".to_string());
                return AppError::BadRequest(detail);
            }
        }
        AppError::Internal(format!("{err:#}"))
    }
}

impl AppError {
    /// A single-field validation error, shaped like the ones the validator crate produces.
    pub fn field(field: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        let mut error = validator::ValidationError::new("invalid");
        error.message = Some(message.into());
        errors.add(field, error);
        AppError::Validation(errors)
    }
}

fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(fields)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            AppError::Validation(errors) => serde_json::json!({
                "error": self.to_string(),
                "fields": validation_details(errors),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
