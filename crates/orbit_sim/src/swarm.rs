use orbit_core::{OrbitConfig, Palette};
use rand::seq::SliceRandom;
use rand::Rng;
use std::f64::consts::TAU;

use crate::entity::OrbitEntity;

/// Start angle of entity `index` when `count` share the orbit. A fractional
/// count leaves a gap after the last entity.
pub fn start_angle(index: usize, count: f64) -> f64 {
    index as f64 / count * TAU
}

/// The live entity collection. Entities are only ever replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct Swarm {
    entities: Vec<OrbitEntity>,
    /// Incremented on every rebuild (renderer respawns visuals when it changes)
    generation: u32,
}

impl Swarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every entity and create `config.shape_count()` fresh ones.
    ///
    /// Colors are the palette cycled to the entity count and then shuffled,
    /// so each color appears a balanced number of times in random slots.
    pub fn rebuild(&mut self, config: &OrbitConfig, palette: &Palette, rng: &mut impl Rng) {
        let count = config.shape_count();
        let spacing = config.bounded_shape_count();
        let mut colors = palette.cycled(count);
        colors.shuffle(rng);

        self.entities = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| OrbitEntity::spawn(config, start_angle(i, spacing), color, rng))
            .collect();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn entities(&self) -> &[OrbitEntity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [OrbitEntity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
