mod error;
mod requests;
mod types;

pub use error::RecipeError;
pub use requests::{
    CreateRecipeRequest, CreateRecipeResponse, MutateRecipeResponse, UpdateRecipeRequest,
};
pub use types::{NewRecipe, Recipe, RecipeId};
