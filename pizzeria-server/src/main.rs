mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use application::auth_service::AuthService;
use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use data::category_repository::PostgresCategoryRepository;
use data::order_repository::PostgresOrderRepository;
use data::product_repository::PostgresProductRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::google::GoogleIdTokenVerifier;
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use presentation::routes;
use reqwest::Client;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    if config.google_client_id.is_none() {
        warn!("GOOGLE_CLIENT_ID not set, google sign-in will fail");
    }

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let category_repo = Arc::new(PostgresCategoryRepository::new(pool.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(pool.clone()));
    let order_repo = Arc::new(PostgresOrderRepository::new(pool.clone()));

    let google = Arc::new(GoogleIdTokenVerifier::new(
        Client::new(),
        config.google_client_id.clone(),
    ));
    let auth_service = AuthService::new(
        user_repo,
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
        google,
    );
    let catalog_service = CatalogService::new(category_repo, product_repo);
    let order_service = OrderService::new(order_repo, config.slots.clone());

    let config_data = config.clone();

    info!(host = %config.host, port = config.port, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .service(routes::api())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
