//! Pure functions for serializing/deserializing recipes to/from cache bytes.
//!
//! JSON is used for cache storage, keeping cached values human-readable and
//! easy to inspect. A failed deserialization is surfaced as an error that the
//! read path treats as a cache miss.

use thiserror::Error;

use crate::recipe::Recipe;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a recipe to JSON bytes.
pub fn serialize_recipe(recipe: &Recipe) -> Result<Vec<u8>> {
    serde_json::to_vec(recipe).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a recipe.
pub fn deserialize_recipe(bytes: &[u8]) -> Result<Recipe> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a slice of recipes to JSON bytes (the listing snapshot).
pub fn serialize_recipes(recipes: &[Recipe]) -> Result<Vec<u8>> {
    serde_json::to_vec(recipes).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a vector of recipes.
pub fn deserialize_recipes(bytes: &[u8]) -> Result<Vec<Recipe>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
