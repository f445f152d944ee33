pub mod category_repository;
#[cfg(test)]
pub mod memory;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

/// Name of the constraint a database error violated, if any.
pub(crate) fn constraint_of(e: &sqlx::Error) -> Option<&str> {
    e.as_database_error().and_then(|db| db.constraint())
}
