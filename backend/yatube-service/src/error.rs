use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// `allowed` is the resource's `Allow` header value.
    #[error("Method \"{method}\" not allowed.")]
    MethodNotAllowed {
        method: String,
        allowed: &'static str,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn forbidden() -> Self {
        AppError::Forbidden("You do not have permission to perform this action.".to_string())
    }

    pub fn method_not_allowed(method: &str, allowed: &'static str) -> Self {
        AppError::MethodNotAllowed {
            method: method.to_string(),
            allowed,
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found.", what))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        // Store and internal failures are logged, never echoed to clients.
        let message = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database operation failed");
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let field = match self {
            AppError::Validation { field, .. } => field.clone(),
            _ => None,
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::MethodNotAllowed { allowed, .. } = self {
            builder.insert_header((header::ALLOW, *allowed));
        }
        builder.json(ErrorResponse {
            error,
            message,
            field,
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "Invalid value.".to_string());
                (field.to_string(), message)
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => AppError::Validation {
                field: Some(field),
                message,
            },
            None => AppError::validation(errors.to_string()),
        }
    }
}

impl From<actix_web::error::JsonPayloadError> for AppError {
    fn from(err: actix_web::error::JsonPayloadError) -> Self {
        AppError::validation(format!("Invalid request body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "This field may not be blank."))]
        text: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("Post").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::forbidden().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::method_not_allowed("POST", "GET").status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validator_errors_keep_field_and_message() {
        let err: AppError = Signup {
            text: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("text"));
                assert_eq!(message, "This field may not be blank.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_method_not_allowed_message() {
        assert_eq!(
            AppError::method_not_allowed("DELETE", "GET").to_string(),
            "Method \"DELETE\" not allowed."
        );
    }

    #[test]
    fn test_method_not_allowed_advertises_resource_methods() {
        let resp = AppError::method_not_allowed("POST", "GET, PUT, PATCH, DELETE").error_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers().get(header::ALLOW).unwrap().to_str().unwrap(),
            "GET, PUT, PATCH, DELETE"
        );
    }
}
