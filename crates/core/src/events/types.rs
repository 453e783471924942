use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recipe::{NewRecipe, Recipe, RecipeId};

/// Topic carrying recipe mutation events.
pub const MUTATIONS_TOPIC: &str = "recipes.mutations";

/// Topic carrying fire-and-forget audit/log events.
pub const LOGS_TOPIC: &str = "logs_queue";

/// The asynchronous write envelope.
///
/// Intent is an explicit tagged variant; each variant carries only the
/// fields it needs. An update that legitimately clears a field can never be
/// misread as a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationEvent {
    Create { recipe: NewRecipe },
    Update { recipe: Recipe },
    Delete { id: RecipeId },
}

impl MutationEvent {
    /// The recipe id this event targets, if it targets an existing row.
    pub fn target_id(&self) -> Option<RecipeId> {
        match self {
            MutationEvent::Create { .. } => None,
            MutationEvent::Update { recipe } => Some(recipe.id),
            MutationEvent::Delete { id } => Some(*id),
        }
    }
}

/// Structured audit record published on [`LOGS_TOPIC`].
///
/// Append-only and fire-and-forget; never read back by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub recipe_id: Option<RecipeId>,
    pub message: String,
    pub service: String,
}

impl AuditEvent {
    /// Builds an audit event stamped with the current time.
    pub fn now(
        action: impl Into<String>,
        recipe_id: Option<RecipeId>,
        message: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            recipe_id,
            message: message.into(),
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_recipe() -> Recipe {
        Recipe {
            id: 3,
            name: "Pelmeni".to_string(),
            ingredients: "flour,pork".to_string(),
            prep_time: 45,
            cook_time: 10,
            instructions: "Boil until they float.".to_string(),
        }
    }

    #[test]
    fn test_mutation_event_tagged_encoding() {
        let event = MutationEvent::Delete { id: 3 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["op"], "delete");
        assert_eq!(json["id"], 3);
    }

    #[test]
    fn test_mutation_event_roundtrip() {
        let event = MutationEvent::Update {
            recipe: test_recipe(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: MutationEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_update_with_empty_name_stays_an_update() {
        // The old envelope shape inferred "delete" from an empty name. The
        // tagged variant must not.
        let mut recipe = test_recipe();
        recipe.name = String::new();
        let event = MutationEvent::Update { recipe };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: MutationEvent = serde_json::from_slice(&bytes).unwrap();
        assert!(matches!(decoded, MutationEvent::Update { .. }));
    }

    #[test]
    fn test_target_id() {
        assert_eq!(MutationEvent::Delete { id: 7 }.target_id(), Some(7));
        assert_eq!(
            MutationEvent::Create {
                recipe: test_recipe().fields()
            }
            .target_id(),
            None
        );
    }
}
