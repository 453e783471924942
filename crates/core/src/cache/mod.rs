mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{all_recipes_key, recipe_key};
pub use serialization::{
    deserialize_recipe, deserialize_recipes, serialize_recipe, serialize_recipes,
    SerializationError,
};
pub use traits::Cache;
