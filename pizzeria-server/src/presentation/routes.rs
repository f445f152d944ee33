use actix_web::{Scope, web};

use crate::domain::error::DomainError;
use crate::presentation::handlers;

/// Every REST endpoint, mounted under `/api`.
pub fn api() -> Scope {
    web::scope("/api")
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| DomainError::Validation(err.to_string()).into()),
        )
        .service(handlers::health::health)
        .service(handlers::auth::scope())
        .service(handlers::product::scope())
        .service(handlers::category::scope())
        .service(handlers::order::scope())
}
