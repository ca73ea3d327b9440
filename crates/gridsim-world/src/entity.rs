//! Entity state and management.

use crate::behavior::Behavior;
use gridsim_core::{Category, EntityId, Position};
use serde::{Deserialize, Serialize};

/// An entity placed on the grid
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub category: Category,
    pub behavior: Box<dyn Behavior>,
    /// Number of updates this entity has received
    pub updates: u64,
}

impl Entity {
    pub fn new(
        id: EntityId,
        position: Position,
        category: Category,
        behavior: Box<dyn Behavior>,
    ) -> Self {
        Self {
            id,
            position,
            category,
            behavior,
            updates: 0,
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("category", &self.category)
            .field("behavior", &self.behavior.name())
            .field("updates", &self.updates)
            .finish()
    }
}

/// Serializable entity data (without the behavior object)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub id: EntityId,
    pub position: Position,
    pub category: Category,
    pub behavior: String,
    pub updates: u64,
    pub state: Option<serde_json::Value>,
}

impl From<&Entity> for EntityData {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            position: entity.position,
            category: entity.category.clone(),
            behavior: entity.behavior.name().to_string(),
            updates: entity.updates,
            state: entity.behavior.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Inert, NeighborTally};

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new(
            EntityId(3),
            Position::new(2, 3),
            Category::from("Type A"),
            Box::new(Inert),
        );

        assert_eq!(entity.id, EntityId(3));
        assert_eq!(entity.position, Position::new(2, 3));
        assert_eq!(entity.updates, 0);
        assert!(format!("{:?}", entity).contains("inert"));
    }

    #[test]
    fn test_entity_data() {
        let entity = Entity::new(
            EntityId(0),
            Position::new(1, 1),
            Category::from("Tally"),
            Box::new(NeighborTally::default()),
        );

        let data = EntityData::from(&entity);
        assert_eq!(data.id, entity.id);
        assert_eq!(data.behavior, "neighbor-tally");
        assert_eq!(data.state.unwrap()["ticks_observed"], 0);
    }
}
