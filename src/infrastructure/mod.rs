//! Infrastructure layer - External service implementations

pub mod action;
pub mod activity;
pub mod auth;
pub mod logging;
pub mod services;
pub mod storage;
pub mod team;
pub mod user;
