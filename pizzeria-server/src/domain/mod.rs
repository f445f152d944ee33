pub mod category;
pub mod error;
pub mod order;
pub mod product;
pub mod slot;
pub mod user;
