//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use recipehub_core::recipe::{NewRecipe, Recipe, RecipeId};
use recipehub_core::storage::{RecipeRepository, RepositoryError, Result};

/// In-memory storage backend for development and tests.
///
/// A `BTreeMap` keeps listings in id order without sorting on read. Data is
/// not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<RwLock<BTreeMap<RecipeId, Recipe>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(0)),
        }
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRepository {
    async fn migrate(&self) -> Result<()> {
        // No schema to apply.
        Ok(())
    }

    async fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut rows = self.rows.write().await;
        rows.insert(id, recipe.clone().with_id(id));
        Ok(id)
    }

    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn update(&self, recipe: &Recipe) -> Result<()> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&recipe.id) {
            return Err(RepositoryError::NotFound { id: recipe.id });
        }
        rows.insert(recipe.id, recipe.clone());
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.remove(&id).is_none() {
            return Err(RepositoryError::NotFound { id });
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Recipe>> {
        let rows = self.rows.read().await;
        Ok(rows.values().cloned().collect())
    }
}
