use thiserror::Error;

/// Validation errors for recipe payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe name must not be empty")]
    EmptyName,
}
