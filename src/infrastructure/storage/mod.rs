//! Storage infrastructure - connection pooling and backend selection

mod factory;
mod postgres;

pub use factory::{Repositories, StorageFactory};
pub use postgres::{connect, ensure_schema, map_write_error, PostgresConfig};
