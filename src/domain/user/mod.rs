//! User domain
//!
//! This module provides domain types and traits for console accounts,
//! including the user entity, soft-delete rules, and the repository trait.

mod entity;
mod repository;

pub use entity::{deleted_email, NewUser, User, UserId, UserRecord, UserRole};
pub use repository::UserRepository;

#[cfg(test)]
pub use repository::mock::MockUserRepository;
