use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Inviato,
    InPreparazione,
    InConsegna,
    Completato,
    Consegnato,
    Rifiutato,
}

impl OrderStatus {
    /// Statuses shown in the kitchen view.
    pub const ACTIVE: [OrderStatus; 3] = [
        OrderStatus::Inviato,
        OrderStatus::InPreparazione,
        OrderStatus::InConsegna,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Inviato => "INVIATO",
            OrderStatus::InPreparazione => "IN_PREPARAZIONE",
            OrderStatus::InConsegna => "IN_CONSEGNA",
            OrderStatus::Completato => "COMPLETATO",
            OrderStatus::Consegnato => "CONSEGNATO",
            OrderStatus::Rifiutato => "RIFIUTATO",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INVIATO" => Ok(OrderStatus::Inviato),
            "IN_PREPARAZIONE" => Ok(OrderStatus::InPreparazione),
            "IN_CONSEGNA" => Ok(OrderStatus::InConsegna),
            "COMPLETATO" => Ok(OrderStatus::Completato),
            "CONSEGNATO" => Ok(OrderStatus::Consegnato),
            "RIFIUTATO" => Ok(OrderStatus::Rifiutato),
            other => Err(DomainError::Validation(format!("unknown order status: {other}"))),
        }
    }
}

/// The slice of a user's profile that travels with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
}

impl From<&User> for Customer {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user: Option<Customer>,
    pub order_date: DateTime<Utc>,
    pub delivery_time: Option<String>,
    pub total_amount: Option<Decimal>,
    pub order_details: Option<String>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Option<i64>,
    pub order_date: DateTime<Utc>,
    pub delivery_time: Option<String>,
    pub total_amount: Option<Decimal>,
    pub order_details: Option<String>,
    pub status: OrderStatus,
}

/// Kitchen-side change to an order. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub delivery_time: Option<String>,
}
