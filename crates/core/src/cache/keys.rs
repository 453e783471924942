use crate::recipe::RecipeId;

/// Returns the cache key for a single recipe snapshot.
pub fn recipe_key(id: RecipeId) -> String {
    format!("recipe_{}", id)
}

/// Returns the cache key for the full listing snapshot.
///
/// There is no partial invalidation of the listing: any create, update or
/// delete recomputes the entire entry.
pub fn all_recipes_key() -> &'static str {
    "all_recipes"
}
