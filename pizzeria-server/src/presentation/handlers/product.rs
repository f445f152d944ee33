use crate::application::catalog_service::CatalogService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{ProductQuery, ProductRequest};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, post, put, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/products")
        .service(list_products)
        .service(create_product)
        .service(update_product)
        .service(toggle_availability)
        .service(delete_product)
}

#[get("")]
async fn list_products(
    catalog: web::Data<CatalogService>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, DomainError> {
    let products = catalog.list_products(query.include_all).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[post("")]
async fn create_product(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    payload: web::Json<ProductRequest>,
) -> Result<HttpResponse, DomainError> {
    let product = catalog.create_product(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        product_id = product.id,
        "product created"
    );

    Ok(HttpResponse::Ok().json(product))
}

#[put("/{id}")]
async fn update_product(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    path: web::Path<i64>,
    payload: web::Json<ProductRequest>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    let product = catalog.update_product(id, payload.into_inner().into()).await?;

    info!(request_id = %request_id(&req), product_id = id, "product updated");

    Ok(HttpResponse::Ok().json(product))
}

#[patch("/{id}/toggle-availability")]
async fn toggle_availability(
    catalog: web::Data<CatalogService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let product = catalog.toggle_availability(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[delete("/{id}")]
async fn delete_product(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    catalog.delete_product(id).await?;

    info!(request_id = %request_id(&req), product_id = id, "product deleted");

    Ok(HttpResponse::NoContent().finish())
}
