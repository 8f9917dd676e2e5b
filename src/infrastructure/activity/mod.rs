//! Activity log infrastructure

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryActivityLogRepository;
pub use postgres_repository::PostgresActivityLogRepository;
