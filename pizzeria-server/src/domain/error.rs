use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(i64),
    #[error("category not found: {0}")]
    CategoryNotFound(i64),
    #[error("product not found: {0}")]
    ProductNotFound(i64),
    #[error("order not found: {0}")]
    OrderNotFound(i64),
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("category already exists: {0}")]
    CategoryAlreadyExists(String),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("invalid identity token")]
    InvalidIdToken,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::CategoryNotFound(_)
            | DomainError::ProductNotFound(_)
            | DomainError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::EmailAlreadyRegistered | DomainError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthorized | DomainError::InvalidIdToken => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::CategoryAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // internal details stay in the logs
        let message = match self {
            DomainError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            DomainError::UserNotFound(id) => Some(json!({ "resource": "user", "id": id })),
            DomainError::CategoryNotFound(id) => Some(json!({ "resource": "category", "id": id })),
            DomainError::ProductNotFound(id) => Some(json!({ "resource": "product", "id": id })),
            DomainError::OrderNotFound(id) => Some(json!({ "resource": "order", "id": id })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
