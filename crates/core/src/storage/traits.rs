use async_trait::async_trait;

use crate::recipe::{NewRecipe, Recipe, RecipeId};

use super::Result;

/// Repository for recipe rows.
///
/// All operations are synchronous round-trips to durable storage. Failures
/// surface as [`super::RepositoryError`]; nothing is swallowed at this layer.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Applies schema migrations. Invoked once at boot (with bounded
    /// exponential-backoff retry by the caller); a no-op for backends
    /// without a schema.
    async fn migrate(&self) -> Result<()>;

    /// Inserts a new recipe and returns the store-assigned id.
    async fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId>;

    /// Gets a recipe by its id.
    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Overwrites every field of an existing recipe. Errors with `NotFound`
    /// when no row matches.
    async fn update(&self, recipe: &Recipe) -> Result<()>;

    /// Deletes a recipe by its id. Errors with `NotFound` when no row
    /// matches; callers check existence first.
    async fn delete(&self, id: RecipeId) -> Result<()>;

    /// Lists every recipe in store order.
    async fn list_all(&self) -> Result<Vec<Recipe>>;
}
