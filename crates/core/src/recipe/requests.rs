use serde::{Deserialize, Serialize};

use super::{NewRecipe, Recipe, RecipeId};

/// Request body for creating a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub instructions: String,
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(request: CreateRecipeRequest) -> Self {
        NewRecipe {
            name: request.name,
            ingredients: request.ingredients,
            prep_time: request.prep_time,
            cook_time: request.cook_time,
            instructions: request.instructions,
        }
    }
}

/// Request body for updating a recipe. All fields are overwritten; there is
/// no partial-field patch semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub instructions: String,
}

impl UpdateRecipeRequest {
    /// Combines the path id with the request fields.
    pub fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            name: self.name,
            ingredients: self.ingredients,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            instructions: self.instructions,
        }
    }
}

/// Response body for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeResponse {
    pub id: RecipeId,
}

/// Response body for a successful update or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutateRecipeResponse {
    pub success: bool,
}
