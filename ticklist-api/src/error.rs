/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every failure becomes a JSON body
/// `{error, message, details?}` with a matching status code. Internal
/// details are logged and never sent to the client.
///
/// # Example
///
/// ```
/// use ticklist_api::error::{ApiError, ApiResult};
///
/// fn find(id: i64) -> ApiResult<i64> {
///     if id == 0 {
///         return Err(ApiError::NotFound("Task not found".to_string()));
///     }
///     Ok(id)
/// }
///
/// assert!(find(0).is_err());
/// ```

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use ticklist_shared::{
    auth::{
        credentials::{SignInError, SignUpError},
        password::PasswordError,
    },
    store::StoreError,
    tasks::TaskError,
    validation::FieldError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - unreadable form body
    BadRequest(String),

    /// Unauthorized (401) - failed sign-in
    Unauthorized(String),

    /// Not found (404) - missing or foreign task
    NotFound(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<FieldError> for ValidationErrorDetail {
    fn from(err: FieldError) -> Self {
        ValidationErrorDetail {
            field: err.field,
            message: err.message,
        }
    }
}

/// Convert form extraction failures to API errors
impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<SignUpError> for ApiError {
    fn from(err: SignUpError) -> Self {
        match err {
            SignUpError::Invalid(errors) => {
                ApiError::ValidationError(errors.into_iter().map(Into::into).collect())
            }
            SignUpError::Password(err) => err.into(),
            SignUpError::Store(err) => err.into(),
        }
    }
}

impl From<SignInError> for ApiError {
    fn from(err: SignInError) -> Self {
        match err {
            SignInError::Invalid(errors) => {
                ApiError::ValidationError(errors.into_iter().map(Into::into).collect())
            }
            SignInError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            SignInError::Password(err) => err.into(),
            SignInError::Store(err) => err.into(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Invalid(errors) => {
                ApiError::ValidationError(errors.into_iter().map(Into::into).collect())
            }
            TaskError::NotFound => ApiError::NotFound(err.to_string()),
            TaskError::Store(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");

        let err = ApiError::ValidationError(vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email address.".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password is required.".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_generic_401() {
        let (status, body) = body_json(SignInError::InvalidCredentials.into()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Invalid email or password.");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_task_errors_map_to_status() {
        let (status, body) = body_json(TaskError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task not found");

        let invalid = TaskError::Invalid(vec![FieldError::new(
            "title",
            "Task title must be 1 to 100 characters long.",
        )]);
        let (status, body) = body_json(invalid.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_bad_request_is_json() {
        let (status, body) =
            body_json(ApiError::BadRequest("Missing form field `title`".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "Missing form field `title`");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let (status, body) =
            body_json(ApiError::InternalError("connection refused".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }
}
