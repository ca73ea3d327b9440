//! Grid simulation engine.
//!
//! A square grid of positioned entities. Each tick visits occupied cells in
//! row-major order and hands every entity its Chebyshev neighborhood.

pub mod behavior;
pub mod entity;
pub mod grid;
pub mod scenario;
pub mod simulation;
pub mod sink;

pub use behavior::{Behavior, BehaviorRegistry, Inert, NeighborTally, Neighborhood};
pub use entity::{Entity, EntityData};
pub use grid::Grid;
pub use scenario::Scenario;
pub use simulation::{GridSimulator, SimulationResult, TickReport};
pub use sink::{NullSink, RecordingSink, TracingSink, UpdateRecord, UpdateSink};
