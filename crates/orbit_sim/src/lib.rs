pub mod entity;
pub mod pipeline;
pub mod state;
pub mod swarm;

pub use entity::{OrbitEntity, Variation};
pub use state::{ImportReport, OrbitState};
pub use swarm::Swarm;
