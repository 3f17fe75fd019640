use orbit_core::*;
use rand::Rng;
use std::f64::consts::TAU;

/// Per-entity randomness, drawn once at creation and never changed
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    /// Offset added to the shared orbit radius, weighted by `orbit_offset`
    pub orbit_jitter: f64,
    /// Wiggle phase offsets [x, y] in radians
    pub phase_offset: [f64; 2],
    /// Wiggle speed variation [x, y], 0..0.01
    pub speed_variation: [f64; 2],
    /// Wiggle amplitude variation [x, y], 0..2
    pub amplitude_variation: [f64; 2],
}

impl Variation {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            orbit_jitter: (rng.r#gen::<f64>() - 0.5) * ORBIT_JITTER_SPAN,
            phase_offset: [rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)],
            speed_variation: [
                rng.gen_range(0.0..WIGGLE_SPEED_VARIATION_MAX),
                rng.gen_range(0.0..WIGGLE_SPEED_VARIATION_MAX),
            ],
            amplitude_variation: [
                rng.gen_range(0.0..WIGGLE_AMPLITUDE_VARIATION_MAX),
                rng.gen_range(0.0..WIGGLE_AMPLITUDE_VARIATION_MAX),
            ],
        }
    }

    /// No jitter, no phase offset, no variation
    pub fn none() -> Self {
        Self {
            orbit_jitter: 0.0,
            phase_offset: [0.0; 2],
            speed_variation: [0.0; 2],
            amplitude_variation: [0.0; 2],
        }
    }
}

/// One shape orbiting the surface center
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitEntity {
    /// Current orbital phase in radians
    pub angle: f64,
    /// Rotation speed in radians per frame, synced from config in `update`
    pub speed: f64,
    /// Circle radius, synced from config in `update`
    pub radius: f64,
    /// Fixed until the next rebuild
    pub color: HexColor,
    pub variation: Variation,
}

impl OrbitEntity {
    pub fn new(
        config: &OrbitConfig,
        start_angle: f64,
        color: HexColor,
        variation: Variation,
    ) -> Self {
        Self {
            angle: start_angle,
            speed: config.rotation_speed_internal(),
            radius: config.circle_radius,
            color,
            variation,
        }
    }

    pub fn spawn(
        config: &OrbitConfig,
        start_angle: f64,
        color: HexColor,
        rng: &mut impl Rng,
    ) -> Self {
        Self::new(config, start_angle, color, Variation::random(rng))
    }

    /// Advance the phase by the speed cached last frame, then resync the
    /// cached fields so config edits show up without a rebuild
    pub fn update(&mut self, config: &OrbitConfig) {
        self.angle += self.speed;
        self.radius = config.circle_radius;
        self.speed = config.rotation_speed_internal();
    }

    /// Orbit radius including this entity's share of the jitter.
    /// The jitter is fixed; only its weight follows the config.
    pub fn effective_orbit_radius(&self, config: &OrbitConfig) -> f64 {
        let weight = config.orbit_offset / ORBIT_OFFSET_RANGE;
        config.orbit_radius + self.variation.orbit_jitter * weight
    }

    /// Sinusoidal [x, y] perturbation at `time_ms`
    pub fn wiggle(&self, config: &OrbitConfig, time_ms: f64) -> [f64; 2] {
        let base_speed = config.wiggle_speed_internal();
        let v = &self.variation;
        let axis = |i: usize| {
            let speed = base_speed * (1.0 + v.speed_variation[i] / WIGGLE_SPEED_VARIATION_DIVISOR);
            let amplitude = config.wiggle_amplitude
                * (1.0 + v.amplitude_variation[i] / WIGGLE_AMPLITUDE_VARIATION_DIVISOR);
            (time_ms * speed + v.phase_offset[i]).sin() * amplitude
        };
        [axis(0), axis(1)]
    }

    /// Surface position: center + orbital offset + wiggle
    pub fn position(&self, config: &OrbitConfig, time_ms: f64, center: [f64; 2]) -> [f64; 2] {
        let r = self.effective_orbit_radius(config);
        let [wx, wy] = self.wiggle(config, time_ms);
        [
            center[0] + self.angle.cos() * r + wx,
            center[1] + self.angle.sin() * r + wy,
        ]
    }

    pub fn compute_transform(
        &self,
        config: &OrbitConfig,
        time_ms: f64,
        center: [f64; 2],
    ) -> DrawInstruction {
        let shape = match config.shape_kind() {
            ShapeKind::Circle => Shape::Circle { radius: self.radius },
            // Squares turn with their phase so a flat side faces the center
            ShapeKind::Square => Shape::Square {
                width: config.square_width,
                height: config.square_height,
                rotation: self.angle,
            },
        };

        DrawInstruction {
            shape,
            position: self.position(config, time_ms, center),
            color: self.color.clone(),
            blur: (config.blur_amount > 0.0).then_some(config.blur_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::FRAC_PI_2;

    fn red() -> HexColor {
        HexColor::parse("#FF0000").unwrap()
    }

    fn still_config() -> OrbitConfig {
        OrbitConfig {
            wiggle_amplitude: 0.0,
            blur_amount: 0.0,
            ..OrbitConfig::default()
        }
    }

    #[test]
    fn test_variation_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let v = Variation::random(&mut rng);
            assert!((-30.0..30.0).contains(&v.orbit_jitter));
            for i in 0..2 {
                assert!((0.0..TAU).contains(&v.phase_offset[i]));
                assert!((0.0..0.01).contains(&v.speed_variation[i]));
                assert!((0.0..2.0).contains(&v.amplitude_variation[i]));
            }
        }
    }

    #[test]
    fn test_update_uses_previous_speed() {
        let mut config = OrbitConfig::default();
        let mut entity = OrbitEntity::new(&config, 0.0, red(), Variation::none());

        config.rotation_speed = 10.0;
        config.circle_radius = 12.0;
        entity.update(&config);
        assert!((entity.angle - 0.005).abs() < 1e-12);
        assert_eq!(entity.radius, 12.0);

        entity.update(&config);
        assert!((entity.angle - 0.055).abs() < 1e-12);
    }

    #[test]
    fn test_position_on_orbit_without_wiggle() {
        let config = still_config();
        let entity = OrbitEntity::new(&config, FRAC_PI_2, red(), Variation::none());
        let [x, y] = entity.position(&config, 1234.0, [100.0, 100.0]);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 141.0).abs() < 1e-9);
    }

    #[test]
    fn test_jitter_weighted_by_offset() {
        let mut config = still_config();
        let variation = Variation { orbit_jitter: 20.0, ..Variation::none() };
        let entity = OrbitEntity::new(&config, 0.0, red(), variation);

        assert_eq!(entity.effective_orbit_radius(&config), 41.0);
        config.orbit_offset = 5.0;
        assert_eq!(entity.effective_orbit_radius(&config), 51.0);
        config.orbit_offset = 10.0;
        config.orbit_radius = 100.0;
        assert_eq!(entity.effective_orbit_radius(&config), 120.0);
    }

    #[test]
    fn test_wiggle_formula() {
        let config = OrbitConfig {
            wiggle_amplitude: 4.0,
            wiggle_speed: 2.0,
            ..OrbitConfig::default()
        };
        let variation = Variation {
            phase_offset: [0.3, 1.1],
            speed_variation: [0.01, 0.0],
            amplitude_variation: [2.0, 0.0],
            ..Variation::none()
        };
        let entity = OrbitEntity::new(&config, 0.0, red(), variation);
        let t = 500.0;
        let [wx, wy] = entity.wiggle(&config, t);

        let expected_x = (t * 0.002 * 1.5 + 0.3).sin() * 6.0;
        let expected_y = (t * 0.002 + 1.1).sin() * 4.0;
        assert!((wx - expected_x).abs() < 1e-9);
        assert!((wy - expected_y).abs() < 1e-9);
    }

    #[test]
    fn test_wiggle_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = OrbitConfig { wiggle_amplitude: 20.0, ..OrbitConfig::default() };
        for step in 0..200 {
            let entity = OrbitEntity::spawn(&config, 0.0, red(), &mut rng);
            let [wx, wy] = entity.wiggle(&config, step as f64 * 97.0);
            assert!(wx.abs() <= 30.0 && wy.abs() <= 30.0);
        }
    }

    #[test]
    fn test_circle_instruction() {
        let config = OrbitConfig::default();
        let entity = OrbitEntity::new(&config, 0.0, red(), Variation::none());
        let draw = entity.compute_transform(&config, 0.0, [0.0, 0.0]);
        assert_eq!(draw.shape, Shape::Circle { radius: 40.0 });
        assert_eq!(draw.blur, Some(42.0));
        assert_eq!(draw.color, red());
    }

    #[test]
    fn test_square_instruction_rotates_with_phase() {
        let config = OrbitConfig {
            shape_type: 1.0,
            square_width: 30.0,
            square_height: 12.0,
            blur_amount: 0.0,
            ..OrbitConfig::default()
        };
        let entity = OrbitEntity::new(&config, 1.25, red(), Variation::none());
        let draw = entity.compute_transform(&config, 0.0, [0.0, 0.0]);
        assert_eq!(draw.shape, Shape::Square { width: 30.0, height: 12.0, rotation: 1.25 });
        assert_eq!(draw.blur, None);
    }
}
