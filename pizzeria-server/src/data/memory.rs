//! In-memory repositories backing the unit and HTTP tests. One store plays
//! every repository so that joins and the category cascade behave like the
//! PostgreSQL schema.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::category_repository::CategoryRepository;
use crate::data::order_repository::OrderRepository;
use crate::data::product_repository::ProductRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::order::{Customer, NewOrder, Order, OrderPatch, OrderStatus};
use crate::domain::product::{Product, ProductDraft};
use crate::domain::user::{DEFAULT_ROLE, NewUser, User};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, ProductDraft>,
    orders: BTreeMap<i64, NewOrder>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn product(&self, id: i64) -> Option<Product> {
        let draft = self.products.get(&id)?;
        let category = self.categories.get(&draft.category_id)?.clone();
        Some(Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image_url: draft.image_url.clone(),
            category,
            available: draft.available,
            monthly_special: draft.monthly_special,
        })
    }

    fn order(&self, id: i64) -> Option<Order> {
        let order = self.orders.get(&id)?;
        Some(Order {
            id,
            user: order
                .user_id
                .and_then(|uid| self.users.get(&uid))
                .map(Customer::from),
            order_date: order.order_date,
            delivery_time: order.delivery_time.clone(),
            total_amount: order.total_amount,
            order_details: order.order_details.clone(),
            status: order.status,
        })
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Rewrites the placement time of an order, for tests about "today".
    pub fn backdate_order(&self, id: i64, order_date: DateTime<Utc>) {
        if let Some(order) = self.lock().orders.get_mut(&id) {
            order.order_date = order_date;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyRegistered);
        }
        let id = state.next_id();
        let created = User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
            address: user.profile.address,
            city: user.profile.city,
            phone: user.profile.phone,
            role: DEFAULT_ROLE.to_string(),
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn update_profile(&self, user: &User) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        Ok(state.users.get_mut(&user.id).map(|stored| {
            stored.first_name = user.first_name.clone();
            stored.last_name = user.last_name.clone();
            stored.address = user.address.clone();
            stored.city = user.city.clone();
            stored.phone = user.phone.clone();
            stored.clone()
        }))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, name: &str) -> Result<Category, DomainError> {
        let mut state = self.lock();
        if state.categories.values().any(|c| c.name == name) {
            return Err(DomainError::CategoryAlreadyExists(name.to_string()));
        }
        let id = state.next_id();
        let category = Category {
            id,
            name: name.to_string(),
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.lock().categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        state.products.retain(|_, p| p.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self, only_available: bool) -> Result<Vec<Product>, DomainError> {
        let state = self.lock();
        Ok(state
            .products
            .keys()
            .filter_map(|id| state.product(*id))
            .filter(|p| !only_available || p.available)
            .collect())
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, DomainError> {
        let state = self.lock();
        Ok(state
            .products
            .iter()
            .filter(|(_, p)| p.category_id == category_id)
            .filter_map(|(id, _)| state.product(*id))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.lock().product(id))
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let mut state = self.lock();
        if !state.categories.contains_key(&draft.category_id) {
            return Err(DomainError::CategoryNotFound(draft.category_id));
        }
        let id = state.next_id();
        state.products.insert(id, draft);
        state
            .product(id)
            .ok_or_else(|| DomainError::Internal("product vanished".into()))
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Option<Product>, DomainError> {
        let mut state = self.lock();
        if !state.products.contains_key(&id) {
            return Ok(None);
        }
        if !state.categories.contains_key(&draft.category_id) {
            return Err(DomainError::CategoryNotFound(draft.category_id));
        }
        if let Some(stored) = state.products.get_mut(&id) {
            let image_url = draft.image_url.clone().or_else(|| stored.image_url.clone());
            *stored = ProductDraft { image_url, ..draft };
        }
        Ok(state.product(id))
    }

    async fn toggle_availability(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut state = self.lock();
        match state.products.get_mut(&id) {
            Some(stored) => stored.available = !stored.available,
            None => return Ok(None),
        }
        Ok(state.product(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.lock().products.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut state = self.lock();
        if let Some(user_id) = order.user_id {
            if !state.users.contains_key(&user_id) {
                return Err(DomainError::UserNotFound(user_id));
            }
        }
        let id = state.next_id();
        state.orders.insert(id, order);
        state
            .order(id)
            .ok_or_else(|| DomainError::Internal("order vanished".into()))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        let state = self.lock();
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|(_, o)| o.user_id == Some(user_id))
            .filter_map(|(id, _)| state.order(*id))
            .collect();
        orders.sort_by(|a, b| (b.order_date, b.id).cmp(&(a.order_date, a.id)));
        Ok(orders)
    }

    async fn find_by_statuses(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError> {
        let state = self.lock();
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|(_, o)| statuses.contains(&o.status))
            .filter_map(|(id, _)| state.order(*id))
            .collect();
        orders.sort_by_key(|o| (o.order_date, o.id));
        Ok(orders)
    }

    async fn update(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, DomainError> {
        let mut state = self.lock();
        match state.orders.get_mut(&id) {
            Some(order) => {
                if let Some(status) = patch.status {
                    order.status = status;
                }
                if let Some(delivery_time) = patch.delivery_time {
                    order.delivery_time = Some(delivery_time);
                }
            }
            None => return Ok(None),
        }
        Ok(state.order(id))
    }

    async fn count_by_delivery_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, i64>, DomainError> {
        let mut counts = HashMap::new();
        for order in self.lock().orders.values() {
            if order.order_date < start || order.order_date > end {
                continue;
            }
            if let Some(label) = &order.delivery_time {
                *counts.entry(label.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
