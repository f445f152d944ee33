use crate::application::auth_service::Session;
use crate::application::order_service::Checkout;
use crate::domain::order::{OrderPatch, OrderStatus};
use crate::domain::product::ProductDraft;
use crate::domain::user::{Profile, User};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(alias = "credential")]
    pub token: String,
}

/// The stored profile plus the session token, flattened so clients can keep
/// treating the body as the user record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub access_token: String,
    pub token_type: String, // "Bearer"
    pub expires_in: i64,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
        }
    }
}

// ======================= CATALOG =======================

#[derive(Debug, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: IdRef,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, rename = "isMonthlySpecial")]
    pub monthly_special: bool,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            image_url: req.image_url,
            category_id: req.category.id,
            available: req.available,
            monthly_special: req.monthly_special,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(default, rename = "includeAll")]
    pub include_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

// ======================= ORDERS =======================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub user: Option<IdRef>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub order_details: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl From<OrderRequest> for Checkout {
    fn from(req: OrderRequest) -> Self {
        Self {
            user_id: req.user.map(|u| u.id),
            order_date: req.order_date,
            delivery_time: req.delivery_time,
            total_amount: req.total_amount,
            order_details: req.order_details,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatchRequest {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub delivery_time: Option<String>,
}

impl From<StatusPatchRequest> for OrderPatch {
    fn from(req: StatusPatchRequest) -> Self {
        Self {
            status: req.status,
            delivery_time: req.delivery_time,
        }
    }
}

// ======================= Utils =======================
fn default_available() -> bool {
    true
}
