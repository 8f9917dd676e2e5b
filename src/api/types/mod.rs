//! Request and response types shared by the handlers

pub mod error;
pub mod form;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use form::Form;
