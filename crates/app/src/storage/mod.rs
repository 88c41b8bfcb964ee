//! Generic persistence over Postgres tables keyed by UUID.

mod entity;
mod errors;
mod filter;
mod query;
mod repository;

pub use entity::Entity;
pub use errors::StorageError;
pub use filter::{Condition, Direction, FieldValue, Filter, Op};
pub use repository::PgRepository;
