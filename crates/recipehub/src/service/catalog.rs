use async_trait::async_trait;
use thiserror::Error;

use recipehub_core::events::ChannelError;
use recipehub_core::recipe::{NewRecipe, Recipe, RecipeError, RecipeId};
use recipehub_core::storage::RepositoryError;

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] RecipeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// A mutation event could not be published; the write was not accepted.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Store,
}

/// A read result annotated with its source, so the audit layer can record
/// cache hits and misses without the service calling into it.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: FetchSource,
}

impl<T> Fetched<T> {
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            source: FetchSource::Cache,
        }
    }

    pub fn from_store(value: T) -> Self {
        Self {
            value,
            source: FetchSource::Store,
        }
    }
}

/// The remote procedure surface of the recipe catalog.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Creates a recipe and returns the store-assigned id.
    async fn create_recipe(&self, new: NewRecipe) -> Result<RecipeId, CatalogError>;

    /// Fetches a recipe, cache first.
    async fn get_recipe(&self, id: RecipeId) -> Result<Fetched<Recipe>, CatalogError>;

    /// Lists all recipes, cache first.
    async fn list_recipes(&self) -> Result<Fetched<Vec<Recipe>>, CatalogError>;

    /// Overwrites every field of an existing recipe.
    async fn update_recipe(&self, recipe: Recipe) -> Result<(), CatalogError>;

    /// Deletes a recipe.
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), CatalogError>;
}
