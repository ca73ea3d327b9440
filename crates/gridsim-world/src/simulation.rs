//! Simulation engine for running a grid world.

use crate::behavior::{Behavior, BehaviorRegistry, Neighbor, Neighborhood, Occupant, UpdateContext};
use crate::entity::{Entity, EntityData};
use crate::grid::Grid;
use crate::sink::{TracingSink, UpdateRecord, UpdateSink};
use gridsim_core::{
    Category, DuplicatePolicy, EntityId, Error, NeighborPolicy, Position, Result, WorldConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

pub struct GridSimulator<S: UpdateSink = TracingSink> {
    grid: Grid,
    entities: Vec<Entity>,
    config: WorldConfig,
    behaviors: BehaviorRegistry,
    sink: S,
    tick: u64,
    total_updates: u64,
}

impl GridSimulator<TracingSink> {
    /// Simulator that logs each update through `tracing`
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_sink(config, TracingSink)
    }
}

impl<S: UpdateSink> GridSimulator<S> {
    pub fn with_sink(config: WorldConfig, sink: S) -> Result<Self> {
        if config.size <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be positive, got {}",
                config.size
            )));
        }

        Ok(Self {
            grid: Grid::new(config.size),
            entities: Vec::new(),
            config,
            behaviors: BehaviorRegistry::default(),
            sink,
            tick: 0,
            total_updates: 0,
        })
    }

    /// Replace the registry used by `add_entity` to pick behaviors
    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn size(&self) -> i32 {
        self.grid.size()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of ticks completed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// All entities in insertion order, including shadowed duplicates
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    /// Entity visible at a cell
    pub fn occupant_at(&self, pos: Position) -> Option<&Entity> {
        self.grid.occupant(pos).and_then(|id| self.entity(id))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Add an entity whose behavior is chosen from its category
    pub fn add_entity(&mut self, position: Position, category: impl Into<Category>) -> Result<EntityId> {
        let category = category.into();
        let behavior = self.behaviors.build(&category);
        self.add_entity_with(position, category, behavior)
    }

    /// Add an entity with an explicit behavior.
    ///
    /// Fails with `OutOfBounds` outside the grid, and with `CellOccupied` on a
    /// taken cell under `DuplicatePolicy::Reject`. A failed add leaves the
    /// world unchanged.
    pub fn add_entity_with(
        &mut self,
        position: Position,
        category: impl Into<Category>,
        behavior: Box<dyn Behavior>,
    ) -> Result<EntityId> {
        self.grid.check_bounds(position)?;

        let occupied = self.grid.is_occupied(position);
        if occupied && self.config.duplicate_policy == DuplicatePolicy::Reject {
            return Err(Error::CellOccupied {
                x: position.x,
                y: position.y,
            });
        }

        let id = EntityId(u32::try_from(self.entities.len()).map_err(|_| {
            Error::ResourceExhausted("entity id space exhausted".to_string())
        })?);
        let category = category.into();

        if occupied {
            warn!(
                entity = %id,
                x = position.x,
                y = position.y,
                "Cell already occupied, entity will be shadowed"
            );
        } else {
            self.grid.claim(position, id);
        }

        debug!(entity = %id, x = position.x, y = position.y, category = %category, "Entity added");
        self.entities.push(Entity::new(id, position, category, behavior));

        Ok(id)
    }

    /// Chebyshev neighbors of a cell under the configured policy
    pub fn neighbors_of(&self, center: Position) -> Neighborhood {
        let mut in_bounds = 0;
        let mut neighbors = Vec::with_capacity(8);

        for (offset, position) in self.grid.neighbor_cells(center) {
            in_bounds += 1;

            let occupant = self.occupant_at(position).map(|entity| Occupant {
                id: entity.id,
                category: entity.category.clone(),
            });

            if occupant.is_some() || self.config.neighbor_policy == NeighborPolicy::IncludeVacant {
                neighbors.push(Neighbor {
                    position,
                    offset,
                    occupant,
                });
            }
        }

        Neighborhood {
            center,
            in_bounds,
            neighbors,
        }
    }

    /// Update every visible entity once, in row-major order
    pub fn tick(&mut self) -> TickReport {
        let tick = self.tick;
        let visits: Vec<(Position, EntityId)> = self.grid.occupied().collect();
        let mut updates = 0;

        for (position, id) in visits {
            let neighborhood = self.neighbors_of(position);

            let Some(entity) = self.entities.get_mut(id.0 as usize) else {
                continue;
            };

            let ctx = UpdateContext {
                tick,
                id,
                position,
                category: &entity.category,
            };
            entity.behavior.update(&ctx, &neighborhood);
            entity.updates += 1;

            let record = UpdateRecord {
                tick,
                entity: id,
                position,
                category: entity.category.clone(),
                in_bounds: neighborhood.in_bounds,
                neighbor_count: neighborhood.len(),
                occupied_neighbors: neighborhood.occupied_count(),
            };
            self.sink.record(&record);
            updates += 1;
        }

        trace!(tick, updates, "Tick complete");

        self.tick += 1;
        self.total_updates += updates as u64;

        TickReport { tick, updates }
    }

    /// Run the given number of ticks
    #[instrument(skip(self), fields(size = self.grid.size(), entities = self.entities.len()))]
    pub fn run(&mut self, num_ticks: u64) -> SimulationResult {
        info!("Starting simulation for {} ticks", num_ticks);

        for _ in 0..num_ticks {
            self.tick();
        }

        info!(
            event = "simulation_summary",
            total_ticks = self.tick,
            total_updates = self.total_updates,
            visible_entities = self.grid.occupied_count(),
            shadowed_entities = self.entities.len() - self.grid.occupied_count(),
            "Simulation run finished"
        );

        self.collect_results()
    }

    fn collect_results(&self) -> SimulationResult {
        SimulationResult {
            total_ticks: self.tick,
            total_updates: self.total_updates,
            entities: self.entities.iter().map(EntityData::from).collect(),
        }
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub updates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_ticks: u64,
    pub total_updates: u64,
    pub entities: Vec<EntityData>,
}
