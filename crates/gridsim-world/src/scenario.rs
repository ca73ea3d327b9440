//! Scenario setup: builds a seeded world from a `ScenarioConfig`.

use crate::behavior::BehaviorRegistry;
use crate::simulation::{GridSimulator, SimulationResult};
use crate::sink::UpdateSink;
use gridsim_core::{Error, Position, RandomPlacement, Result, ScenarioConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

const PLACEMENT_ATTEMPTS: usize = 100;
const DEFAULT_RANDOM_CATEGORY: &str = "Wanderer";

/// A validated scenario ready to be built into a simulator
#[derive(Debug, Clone)]
pub struct Scenario {
    config: ScenarioConfig,
    behaviors: BehaviorRegistry,
}

impl Scenario {
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            behaviors: BehaviorRegistry::with_builtins(),
        })
    }

    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Create the simulator and place every configured entity.
    ///
    /// Explicit entities are added first, in order; any error they raise is
    /// returned. Random entities then go to vacant cells chosen with the
    /// scenario seed.
    pub fn build<S: UpdateSink>(&self, sink: S) -> Result<GridSimulator<S>> {
        let mut sim = GridSimulator::with_sink(self.config.world.clone(), sink)?
            .with_behaviors(self.behaviors.clone());

        for spec in &self.config.entities {
            sim.add_entity(Position::new(spec.x, spec.y), spec.category.as_str())?;
        }

        if let Some(placement) = &self.config.random_entities {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
            for index in 0..placement.count {
                let category = category_for(placement, index);
                spawn_random(&mut sim, &mut rng, category)?;
            }
        }

        info!(
            entities = sim.entities().len(),
            size = sim.size(),
            seed = self.config.seed,
            "Scenario built"
        );

        Ok(sim)
    }

    /// Build the world and run it for the configured number of ticks
    pub fn execute<S: UpdateSink>(&self, sink: S) -> Result<(SimulationResult, S)> {
        let mut sim = self.build(sink)?;
        let result = sim.run(self.config.num_ticks);
        Ok((result, sim.into_sink()))
    }
}

fn category_for(placement: &RandomPlacement, index: usize) -> &str {
    if placement.categories.is_empty() {
        DEFAULT_RANDOM_CATEGORY
    } else {
        &placement.categories[index % placement.categories.len()]
    }
}

fn spawn_random<S: UpdateSink>(
    sim: &mut GridSimulator<S>,
    rng: &mut ChaCha8Rng,
    category: &str,
) -> Result<()> {
    let size = sim.size();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));

        if sim.occupant_at(pos).is_none() {
            let id = sim.add_entity(pos, category)?;
            debug!(entity = %id, x = pos.x, y = pos.y, "Placed random entity");
            return Ok(());
        }
    }

    Err(Error::ResourceExhausted(format!(
        "no vacant cell found for {} after {} attempts",
        category, PLACEMENT_ATTEMPTS
    )))
}
