//! HTTP request handlers.

mod error;
pub mod health;
pub mod recipes;

pub use error::AppError;
