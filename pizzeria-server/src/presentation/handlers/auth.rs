use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::user::{Profile, ProfileScope};
use crate::presentation::dto::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, ensure_owner, request_id};
use actix_web::{HttpRequest, HttpResponse, Responder, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(google)
        .service(
            web::resource("/update-profile/{id}")
                .wrap(JwtAuthMiddleware)
                .route(web::put().to(update_profile)),
        )
        .service(
            web::resource("/{id}")
                .wrap(JwtAuthMiddleware)
                .route(web::put().to(update_user)),
        )
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomainError> {
    let RegisterRequest {
        email,
        password,
        profile,
    } = payload.into_inner();
    let session = service.register(&email, &password, profile).await?;

    info!(
        request_id = %request_id(&req),
        user_id = session.user.id,
        email = %session.user.email,
        "user registered"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let session = service.login(&payload.email, &payload.password).await?;

    info!(
        request_id = %request_id(&req),
        user_id = session.user.id,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

#[post("/google")]
async fn google(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<GoogleLoginRequest>,
) -> Result<impl Responder, DomainError> {
    let session = service.google_sign_in(&payload.token).await?;

    info!(
        request_id = %request_id(&req),
        user_id = session.user.id,
        "user signed in with google"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

async fn update_profile(
    user: AuthenticatedUser,
    service: web::Data<AuthService>,
    path: web::Path<i64>,
    payload: web::Json<Profile>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    ensure_owner(id, &user)?;
    let updated = service
        .update_profile(id, payload.into_inner(), ProfileScope::Contact)
        .await?;
    info!(user_id = id, email = %user.email, "contact details updated");
    Ok(HttpResponse::Ok().json(updated))
}

async fn update_user(
    user: AuthenticatedUser,
    service: web::Data<AuthService>,
    path: web::Path<i64>,
    payload: web::Json<Profile>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    ensure_owner(id, &user)?;
    let updated = service
        .update_profile(id, payload.into_inner(), ProfileScope::Full)
        .await?;
    info!(user_id = id, email = %user.email, "profile updated");
    Ok(HttpResponse::Ok().json(updated))
}
