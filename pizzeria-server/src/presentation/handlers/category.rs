use crate::application::catalog_service::CatalogService;
use crate::domain::error::DomainError;
use crate::presentation::dto::CategoryRequest;
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/categories")
        .service(list_categories)
        .service(create_category)
        .service(category_products)
        .service(delete_category)
}

#[get("")]
async fn list_categories(catalog: web::Data<CatalogService>) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(catalog.list_categories().await?))
}

#[post("")]
async fn create_category(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    payload: web::Json<CategoryRequest>,
) -> Result<HttpResponse, DomainError> {
    let category = catalog.create_category(&payload.name).await?;

    info!(
        request_id = %request_id(&req),
        category_id = category.id,
        "category created"
    );

    Ok(HttpResponse::Ok().json(category))
}

#[get("/{id}/products")]
async fn category_products(
    catalog: web::Data<CatalogService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let products = catalog.products_in_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[delete("/{id}")]
async fn delete_category(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    catalog.delete_category(id).await?;

    info!(request_id = %request_id(&req), category_id = id, "category deleted");

    Ok(HttpResponse::NoContent().finish())
}
