//! SQLite repository implementation.
//!
//! Implements the repository trait from `recipehub_core::storage` using
//! SQLite via `tokio_rusqlite`.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use recipehub_core::recipe::{NewRecipe, Recipe, RecipeId};
use recipehub_core::storage::{RecipeRepository, RepositoryError, Result};

use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn row_to_recipe(row: &rusqlite::Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        ingredients: row.get(2)?,
        prep_time: row.get(3)?,
        cook_time: row.get(4)?,
        instructions: row.get(5)?,
    })
}

/// SQLite-based repository implementation.
///
/// The schema is not created on open; call [`RecipeRepository::migrate`]
/// before issuing queries.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens a file-based database, creating the file if it doesn't exist.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Opens an in-memory database. Useful for testing - data is lost when
    /// the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RecipeRepository for SqliteRepository {
    async fn migrate(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId> {
        let recipe = recipe.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_RECIPE,
                    rusqlite::params![
                        recipe.name,
                        recipe.ingredients,
                        recipe.prep_time,
                        recipe.cook_time,
                        recipe.instructions
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RECIPE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_recipe) {
                    Ok(recipe) => Ok(Some(recipe)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }

    async fn update(&self, recipe: &Recipe) -> Result<()> {
        let recipe = recipe.clone();
        let id = recipe.id;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_RECIPE,
                        rusqlite::params![
                            recipe.id,
                            recipe.name,
                            recipe.ingredients,
                            recipe.prep_time,
                            recipe.cook_time,
                            recipe.instructions
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }

    async fn delete(&self, id: RecipeId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_RECIPE, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }

    async fn list_all(&self) -> Result<Vec<Recipe>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_RECIPES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_recipe).map_err(wrap_err)?;

                let mut recipes = Vec::new();
                for row_result in rows {
                    recipes.push(row_result.map_err(wrap_err)?);
                }
                Ok(recipes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}
