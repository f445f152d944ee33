use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::instrument;

use crate::data::category_repository::CategoryRepository;
use crate::data::product_repository::ProductRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::product::{Product, ProductDraft};

#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
}

fn validate(draft: ProductDraft) -> Result<ProductDraft, DomainError> {
    let draft = draft.normalized();
    if draft.name.is_empty() {
        return Err(DomainError::Validation("product name is required".into()));
    }
    if draft.price < Decimal::ZERO {
        return Err(DomainError::Validation("price must not be negative".into()));
    }
    Ok(draft)
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// The public menu, or every product when `include_all` is set.
    pub async fn list_products(&self, include_all: bool) -> Result<Vec<Product>, DomainError> {
        self.products.list(!include_all).await
    }

    pub async fn products_in_category(&self, category_id: i64) -> Result<Vec<Product>, DomainError> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or(DomainError::CategoryNotFound(category_id))?;
        self.products.list_by_category(category_id).await
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        self.products.create(validate(draft)?).await
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: i64, draft: ProductDraft) -> Result<Product, DomainError> {
        self.products
            .update(id, validate(draft)?)
            .await?
            .ok_or(DomainError::ProductNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn toggle_availability(&self, id: i64) -> Result<Product, DomainError> {
        self.products
            .toggle_availability(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), DomainError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::ProductNotFound(id))
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list().await
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("category name is required".into()));
        }
        self.categories.create(name).await
    }

    /// Deletes a category and every product filed under it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<(), DomainError> {
        if self.categories.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::CategoryNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use assert_matches::assert_matches;

    fn service() -> CatalogService {
        let store = Arc::new(InMemoryStore::new());
        CatalogService::new(store.clone(), store)
    }

    fn draft(name: &str, category_id: i64) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            description: Some("Pomodoro, Mozzarella".into()),
            price: Decimal::new(600, 2),
            image_url: Some("https://img/original.jpg".into()),
            category_id,
            available: true,
            monthly_special: false,
        }
    }

    #[tokio::test]
    async fn public_menu_hides_unavailable_products() {
        let catalog = service();
        let rosse = catalog.create_category("Pizze Rosse").await.unwrap();
        let margherita = catalog.create_product(draft("Margherita", rosse.id)).await.unwrap();
        let diavola = catalog.create_product(draft("Diavola", rosse.id)).await.unwrap();
        catalog.toggle_availability(diavola.id).await.unwrap();

        let menu = catalog.list_products(false).await.unwrap();
        assert_eq!(menu.iter().map(|p| p.id).collect::<Vec<_>>(), vec![margherita.id]);
        assert_eq!(catalog.list_products(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn toggling_twice_restores_availability() {
        let catalog = service();
        let cat = catalog.create_category("Bibite").await.unwrap();
        let cola = catalog.create_product(draft("Coca Cola", cat.id)).await.unwrap();

        let once = catalog.toggle_availability(cola.id).await.unwrap();
        assert!(!once.available);
        let twice = catalog.toggle_availability(cola.id).await.unwrap();
        assert_eq!(twice.available, cola.available);
    }

    #[tokio::test]
    async fn toggling_an_unknown_product_is_not_found() {
        assert_matches!(
            service().toggle_availability(404).await,
            Err(DomainError::ProductNotFound(404))
        );
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_image_when_none_given() {
        let catalog = service();
        let rosse = catalog.create_category("Pizze Rosse").await.unwrap();
        let bianche = catalog.create_category("Pizze Bianche").await.unwrap();
        let product = catalog.create_product(draft("Margherita", rosse.id)).await.unwrap();

        let mut change = draft("4 Formaggi", bianche.id);
        change.image_url = Some("  ".into());
        change.monthly_special = true;
        change.price = Decimal::new(800, 2);
        let updated = catalog.update_product(product.id, change).await.unwrap();

        assert_eq!(updated.name, "4 Formaggi");
        assert_eq!(updated.category.name, "Pizze Bianche");
        assert!(updated.monthly_special);
        assert_eq!(updated.price, Decimal::new(800, 2));
        assert_eq!(updated.image_url.as_deref(), Some("https://img/original.jpg"));

        let mut change = draft("4 Formaggi", bianche.id);
        change.image_url = Some("https://img/new.jpg".into());
        let updated = catalog.update_product(product.id, change).await.unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("https://img/new.jpg"));
    }

    #[tokio::test]
    async fn update_of_unknown_product_is_not_found() {
        let catalog = service();
        let cat = catalog.create_category("Bibite").await.unwrap();
        assert_matches!(
            catalog.update_product(77, draft("Acqua", cat.id)).await,
            Err(DomainError::ProductNotFound(77))
        );
    }

    #[tokio::test]
    async fn products_need_an_existing_category_and_sane_fields() {
        let catalog = service();
        assert_matches!(
            catalog.create_product(draft("Margherita", 9)).await,
            Err(DomainError::CategoryNotFound(9))
        );

        let cat = catalog.create_category("Pizze Rosse").await.unwrap();
        assert_matches!(
            catalog.create_product(draft("   ", cat.id)).await,
            Err(DomainError::Validation(_))
        );
        let mut negative = draft("Margherita", cat.id);
        negative.price = Decimal::new(-1, 0);
        assert_matches!(
            catalog.create_product(negative).await,
            Err(DomainError::Validation(_))
        );
    }

    #[tokio::test]
    async fn deleting_a_category_removes_its_products() {
        let catalog = service();
        let rosse = catalog.create_category("Pizze Rosse").await.unwrap();
        let bibite = catalog.create_category("Bibite").await.unwrap();
        catalog.create_product(draft("Margherita", rosse.id)).await.unwrap();
        catalog.create_product(draft("Diavola", rosse.id)).await.unwrap();
        let cola = catalog.create_product(draft("Coca Cola", bibite.id)).await.unwrap();

        catalog.delete_category(rosse.id).await.unwrap();

        let remaining = catalog.list_products(true).await.unwrap();
        assert_eq!(remaining.iter().map(|p| p.id).collect::<Vec<_>>(), vec![cola.id]);
        assert_matches!(
            catalog.products_in_category(rosse.id).await,
            Err(DomainError::CategoryNotFound(_))
        );
        assert_matches!(
            catalog.delete_category(rosse.id).await,
            Err(DomainError::CategoryNotFound(_))
        );
    }

    #[tokio::test]
    async fn category_names_are_unique() {
        let catalog = service();
        catalog.create_category("Bibite").await.unwrap();
        assert_matches!(
            catalog.create_category(" Bibite ").await,
            Err(DomainError::CategoryAlreadyExists(_))
        );
        assert_matches!(
            catalog.create_category("").await,
            Err(DomainError::Validation(_))
        );
    }

    #[tokio::test]
    async fn deleting_a_product_twice_is_not_found_the_second_time() {
        let catalog = service();
        let cat = catalog.create_category("Bibite").await.unwrap();
        let cola = catalog.create_product(draft("Coca Cola", cat.id)).await.unwrap();
        catalog.delete_product(cola.id).await.unwrap();
        assert_matches!(
            catalog.delete_product(cola.id).await,
            Err(DomainError::ProductNotFound(_))
        );
    }
}
