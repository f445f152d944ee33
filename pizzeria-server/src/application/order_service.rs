use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::data::order_repository::OrderRepository;
use crate::domain::error::DomainError;
use crate::domain::order::{NewOrder, Order, OrderPatch, OrderStatus};
use crate::domain::slot::{SlotSchedule, day_window, normalize_label};

/// What a customer submits at checkout. Unset status and date get defaults.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    pub user_id: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_time: Option<String>,
    pub total_amount: Option<Decimal>,
    pub order_details: Option<String>,
    pub status: Option<OrderStatus>,
}

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    slots: SlotSchedule,
}

fn normalize_optional_label(label: Option<String>) -> Result<Option<String>, DomainError> {
    label
        .filter(|l| !l.trim().is_empty())
        .map(|l| normalize_label(&l))
        .transpose()
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, slots: SlotSchedule) -> Self {
        Self { repo, slots }
    }

    pub async fn user_orders(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        self.repo.find_by_user(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, checkout: Checkout) -> Result<Order, DomainError> {
        if checkout.total_amount.is_some_and(|t| t < Decimal::ZERO) {
            return Err(DomainError::Validation("total must not be negative".into()));
        }
        let order = NewOrder {
            user_id: checkout.user_id,
            order_date: checkout.order_date.unwrap_or_else(Utc::now),
            delivery_time: normalize_optional_label(checkout.delivery_time)?,
            total_amount: checkout.total_amount,
            order_details: checkout.order_details,
            status: checkout.status.unwrap_or_default(),
        };
        self.repo.create(order).await
    }

    /// Orders the kitchen still has to work on, oldest first.
    pub async fn kitchen_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.repo.find_by_statuses(&OrderStatus::ACTIVE).await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i64, patch: OrderPatch) -> Result<Order, DomainError> {
        let patch = OrderPatch {
            status: patch.status,
            delivery_time: normalize_optional_label(patch.delivery_time)?,
        };
        self.repo
            .update(id, patch)
            .await?
            .ok_or(DomainError::OrderNotFound(id))
    }

    /// Slots of the current local day that still have room.
    pub async fn available_slots(&self) -> Result<Vec<String>, DomainError> {
        self.available_slots_on(&Local, Local::now().date_naive()).await
    }

    pub async fn available_slots_on<Tz: TimeZone + Sync>(
        &self,
        tz: &Tz,
        date: NaiveDate,
    ) -> Result<Vec<String>, DomainError> {
        let (start, end) = day_window(tz, date);
        let booked = self.repo.count_by_delivery_time(start, end).await?;
        let available: Vec<String> = self
            .slots
            .candidates()
            .into_iter()
            .filter(|slot| self.slots.has_room(booked.get(slot).copied().unwrap_or(0)))
            .collect();
        debug!(
            %date,
            capacity = self.slots.capacity(),
            available = available.len(),
            "computed free delivery slots"
        );
        Ok(available)
    }
}
