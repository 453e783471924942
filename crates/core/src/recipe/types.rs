use serde::{Deserialize, Serialize};

use super::RecipeError;

/// Store-assigned recipe identifier. Always positive once persisted.
pub type RecipeId = i64;

/// A persisted recipe row.
///
/// A `Recipe` is either fully present (all fields set) or absent; there are
/// no partial rows or tombstones. Updates overwrite every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: String,
    /// Preparation time in minutes.
    pub prep_time: u32,
    /// Cooking time in minutes.
    pub cook_time: u32,
    pub instructions: String,
}

/// A recipe that has not been persisted yet (no id assigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub instructions: String,
}

impl NewRecipe {
    /// Validates invariants that the store cannot express: a recipe must
    /// carry a non-empty display name.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::EmptyName);
        }
        Ok(())
    }

    /// Attaches a store-assigned id, producing a persisted `Recipe`.
    pub fn with_id(self, id: RecipeId) -> Recipe {
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

impl Recipe {
    /// The fields of this recipe without its id.
    pub fn fields(&self) -> NewRecipe {
        NewRecipe {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            instructions: self.instructions.clone(),
        }
    }
}
