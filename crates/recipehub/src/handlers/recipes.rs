//! Recipe CRUD handlers.
//!
//! Thin adapters between the HTTP surface and the catalog: they parse the
//! request, call one catalog operation, and shape the response. Caching and
//! audit publishing happen inside the catalog.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use recipehub_core::recipe::{
    CreateRecipeRequest, CreateRecipeResponse, MutateRecipeResponse, NewRecipe, Recipe, RecipeId,
    UpdateRecipeRequest,
};

use crate::{handlers::AppError, state::AppState};

/// Create a recipe (POST /api/recipes).
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), AppError> {
    let id = state.catalog.create_recipe(NewRecipe::from(request)).await?;
    Ok((StatusCode::CREATED, Json(CreateRecipeResponse { id })))
}

/// Get a recipe by id (GET /api/recipes/{id}).
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<Recipe>, AppError> {
    let fetched = state.catalog.get_recipe(id).await?;
    Ok(Json(fetched.value))
}

/// List all recipes (GET /api/recipes).
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, AppError> {
    let fetched = state.catalog.list_recipes().await?;
    Ok(Json(fetched.value))
}

/// Update a recipe (PUT /api/recipes/{id}).
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<MutateRecipeResponse>, AppError> {
    state.catalog.update_recipe(request.into_recipe(id)).await?;
    Ok(Json(MutateRecipeResponse { success: true }))
}

/// Delete a recipe (DELETE /api/recipes/{id}).
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<MutateRecipeResponse>, AppError> {
    state.catalog.delete_recipe(id).await?;
    Ok(Json(MutateRecipeResponse { success: true }))
}
