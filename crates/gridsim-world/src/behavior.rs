//! Per-entity update behaviors and the neighborhood they observe.

use gridsim_core::{Category, EntityId, Offset, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of an entity seen in a neighboring cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: EntityId,
    pub category: Category,
}

/// One in-bounds neighboring cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub position: Position,
    pub offset: Offset,
    pub occupant: Option<Occupant>,
}

/// The Chebyshev neighbors of a cell as reported to a behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub center: Position,
    /// How many of the 8 offsets landed inside the grid
    pub in_bounds: usize,
    pub neighbors: Vec<Neighbor>,
}

impl Neighborhood {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.neighbors.iter().filter_map(|n| n.occupant.as_ref())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupants().count()
    }
}

/// Read-only view of the entity being updated
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    pub tick: u64,
    pub id: EntityId,
    pub position: Position,
    pub category: &'a Category,
}

/// Category-specific reaction to a neighborhood.
///
/// A behavior may change its own state but never the entity's position.
pub trait Behavior {
    fn update(&mut self, ctx: &UpdateContext<'_>, neighbors: &Neighborhood);

    fn name(&self) -> &'static str;

    /// Serializable view of internal state, if the behavior keeps any
    fn snapshot(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Does nothing on update
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl Behavior for Inert {
    fn update(&mut self, _ctx: &UpdateContext<'_>, _neighbors: &Neighborhood) {}

    fn name(&self) -> &'static str {
        "inert"
    }
}

/// Keeps running counts of what an entity has observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborTally {
    pub ticks_observed: u64,
    pub neighbors_seen: u64,
    /// Ticks on which no neighbor cell was occupied
    pub lonely_ticks: u64,
    pub last_tick: Option<u64>,
}

impl Behavior for NeighborTally {
    fn update(&mut self, ctx: &UpdateContext<'_>, neighbors: &Neighborhood) {
        let occupied = neighbors.occupied_count() as u64;

        self.ticks_observed += 1;
        self.neighbors_seen += occupied;
        if occupied == 0 {
            self.lonely_ticks += 1;
        }
        self.last_tick = Some(ctx.tick);
    }

    fn name(&self) -> &'static str {
        "neighbor-tally"
    }

    fn snapshot(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

pub type BehaviorMaker = fn() -> Box<dyn Behavior>;

fn tally() -> Box<dyn Behavior> {
    Box::new(NeighborTally::default())
}

/// Chooses a behavior for each category. Unregistered categories are `Inert`.
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    makers: HashMap<String, BehaviorMaker>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in "Tally" category
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Tally", tally);
        registry
    }

    pub fn register(&mut self, category: impl Into<String>, maker: BehaviorMaker) {
        self.makers.insert(category.into(), maker);
    }

    pub fn build(&self, category: &Category) -> Box<dyn Behavior> {
        match self.makers.get(category.as_str()) {
            Some(maker) => maker(),
            None => Box::new(Inert),
        }
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("categories", &self.makers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighborhood(occupied: &[(i32, i32)], vacant: &[(i32, i32)]) -> Neighborhood {
        let center = Position::new(5, 5);
        let mut neighbors = Vec::new();
        for (i, &(dx, dy)) in occupied.iter().enumerate() {
            neighbors.push(Neighbor {
                position: center.offset(Offset::new(dx, dy)).unwrap(),
                offset: Offset::new(dx, dy),
                occupant: Some(Occupant {
                    id: EntityId(i as u32 + 1),
                    category: Category::from("Type B"),
                }),
            });
        }
        for &(dx, dy) in vacant {
            neighbors.push(Neighbor {
                position: center.offset(Offset::new(dx, dy)).unwrap(),
                offset: Offset::new(dx, dy),
                occupant: None,
            });
        }
        Neighborhood {
            center,
            in_bounds: 8,
            neighbors,
        }
    }

    #[test]
    fn test_neighborhood_counts() {
        let hood = neighborhood(&[(1, 0), (0, 1)], &[(-1, -1)]);
        assert_eq!(hood.len(), 3);
        assert_eq!(hood.occupied_count(), 2);
    }

    #[test]
    fn test_tally_tracks_observations() {
        let category = Category::from("Tally");
        let mut tally = NeighborTally::default();

        let ctx = UpdateContext {
            tick: 0,
            id: EntityId(0),
            position: Position::new(5, 5),
            category: &category,
        };
        tally.update(&ctx, &neighborhood(&[(1, 1), (-1, 0)], &[]));
        tally.update(&UpdateContext { tick: 1, ..ctx }, &neighborhood(&[], &[(0, 1)]));

        assert_eq!(tally.ticks_observed, 2);
        assert_eq!(tally.neighbors_seen, 2);
        assert_eq!(tally.lonely_ticks, 1);
        assert_eq!(tally.last_tick, Some(1));

        let snapshot = tally.snapshot().unwrap();
        assert_eq!(snapshot["neighbors_seen"], 2);
    }

    #[test]
    fn test_registry_falls_back_to_inert() {
        let registry = BehaviorRegistry::with_builtins();
        assert_eq!(registry.build(&Category::from("Tally")).name(), "neighbor-tally");
        assert_eq!(registry.build(&Category::from("Type A")).name(), "inert");
        assert!(registry.build(&Category::from("Type A")).snapshot().is_none());
    }
}
