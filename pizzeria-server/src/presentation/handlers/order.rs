use crate::application::order_service::OrderService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{OrderRequest, StatusPatchRequest};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, ensure_owner, request_id};
use actix_web::{HttpRequest, HttpResponse, Scope, get, patch, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/orders")
        .service(create_order)
        .service(kitchen_orders)
        .service(available_slots)
        .service(update_status)
        .service(
            web::resource("/user/{user_id}")
                .wrap(JwtAuthMiddleware)
                .route(web::get().to(user_orders)),
        )
}

async fn user_orders(
    user: AuthenticatedUser,
    orders: web::Data<OrderService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let user_id = path.into_inner();
    ensure_owner(user_id, &user)?;
    Ok(HttpResponse::Ok().json(orders.user_orders(user_id).await?))
}

#[post("")]
async fn create_order(
    req: HttpRequest,
    orders: web::Data<OrderService>,
    payload: web::Json<OrderRequest>,
) -> Result<HttpResponse, DomainError> {
    let order = orders.create_order(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        order_id = order.id,
        status = %order.status,
        "order placed"
    );

    Ok(HttpResponse::Ok().json(order))
}

#[get("/kitchen")]
async fn kitchen_orders(orders: web::Data<OrderService>) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(orders.kitchen_orders().await?))
}

#[patch("/{id}/status")]
async fn update_status(
    req: HttpRequest,
    orders: web::Data<OrderService>,
    path: web::Path<i64>,
    payload: web::Json<StatusPatchRequest>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    let order = orders.update_status(id, payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        order_id = id,
        status = %order.status,
        "order status changed"
    );

    Ok(HttpResponse::Ok().json(order))
}

#[get("/slots")]
async fn available_slots(orders: web::Data<OrderService>) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(orders.available_slots().await?))
}
