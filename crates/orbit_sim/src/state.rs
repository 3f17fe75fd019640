use bevy::prelude::*;
use orbit_core::{Frame, HexColor, OrbitConfig, Palette, Param, Surface};
use orbit_storage::{SnapshotResult, export_snapshot, parse_snapshot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::swarm::Swarm;

/// Outcome of a successful snapshot import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Config values overwritten
    pub applied: usize,
    /// Palette size after the import
    pub colors: usize,
    /// Required keys the snapshot did not carry
    pub missing_keys: Vec<&'static str>,
}

/// Everything the animation reads each frame, plus the mutation entry
/// points the controls call. Structural edits rebuild the swarm here so
/// callers can't forget to.
#[derive(Resource)]
pub struct OrbitState {
    config: OrbitConfig,
    palette: Palette,
    swarm: Swarm,
    surface: Surface,
    rng: ChaCha8Rng,
    frame_index: u64,
}

impl OrbitState {
    pub fn new(config: OrbitConfig, palette: Palette, rng: ChaCha8Rng) -> Self {
        let mut state = Self {
            config,
            palette,
            swarm: Swarm::new(),
            surface: Surface::default(),
            rng,
            frame_index: 0,
        };
        state.rebuild();
        state
    }

    /// Default parameters with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(OrbitConfig::default(), Palette::default(), ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn center(&self) -> [f64; 2] {
        self.surface.center()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn set_param(&mut self, param: Param, value: f64) {
        self.config.set(param, value);
        if param.is_structural() {
            self.rebuild();
        }
    }

    pub fn add_color(&mut self, color: HexColor) -> bool {
        let changed = self.palette.add(color);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn remove_color(&mut self, index: usize) -> bool {
        let changed = self.palette.remove(index);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn edit_color(&mut self, index: usize, color: HexColor) -> bool {
        let changed = self.palette.edit(index, color);
        if changed {
            self.rebuild();
        }
        changed
    }

    /// A random color from the state's generator, for pickers without input
    pub fn random_color(&mut self) -> HexColor {
        HexColor::random(&mut self.rng)
    }

    pub fn rebuild(&mut self) {
        self.swarm.rebuild(&self.config, &self.palette, &mut self.rng);
        info!(
            "Rebuilt {} shapes from {} colors (generation {})",
            self.swarm.len(),
            self.palette.len(),
            self.swarm.generation()
        );
    }

    /// Recenter orbits on a resized surface. Entities are kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface = Surface::new(width, height);
    }

    /// Restore default parameters; the palette is kept
    pub fn reset_to_defaults(&mut self) {
        self.config = OrbitConfig::default();
        self.rebuild();
    }

    pub fn export_snapshot(&self) -> SnapshotResult<String> {
        export_snapshot(&self.config, &self.palette)
    }

    /// Validate `text` fully, then apply it and rebuild. On error nothing
    /// has changed.
    pub fn import_snapshot(&mut self, text: &str) -> SnapshotResult<ImportReport> {
        let import = parse_snapshot(text)?;
        let missing_keys = import.missing_keys().to_vec();
        if !missing_keys.is_empty() {
            warn!("Snapshot is missing config keys: {}", missing_keys.join(", "));
        }

        let applied = import.apply_to(&mut self.config, &mut self.palette);
        self.rebuild();
        info!("Snapshot applied: {} values, {} colors", applied, self.palette.len());

        Ok(ImportReport {
            applied,
            colors: self.palette.len(),
            missing_keys,
        })
    }

    /// Run one animation cycle at clock reading `now_ms`.
    /// Every entity updates then emits its draw instruction, in collection order.
    pub fn tick(&mut self, now_ms: f64) -> Frame {
        self.frame_index = self.frame_index.wrapping_add(1);
        let center = self.surface.center();
        let config = &self.config;

        let instructions = self
            .swarm
            .entities_mut()
            .iter_mut()
            .map(|entity| {
                entity.update(config);
                entity.compute_transform(config, now_ms, center)
            })
            .collect();

        Frame {
            index: self.frame_index,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::{Shape, ShapeKind};
    use orbit_storage::SnapshotError;

    fn hex(code: &str) -> HexColor {
        HexColor::parse(code).unwrap()
    }

    /// Config and palette, compared before and after a rejected import
    fn fingerprint(state: &OrbitState) -> (OrbitConfig, Palette) {
        (state.config().clone(), state.palette().clone())
    }

    #[test]
    fn test_new_state_is_built() {
        let state = OrbitState::seeded(1);
        assert_eq!(state.swarm().len(), 6);
        assert_eq!(state.swarm().generation(), 1);
    }

    #[test]
    fn test_shape_count_rebuilds() {
        let mut state = OrbitState::seeded(1);
        state.set_param(Param::ShapeCount, 12.0);
        assert_eq!(state.swarm().len(), 12);
        assert_eq!(state.swarm().generation(), 2);
    }

    #[test]
    fn test_live_params_do_not_rebuild() {
        let mut state = OrbitState::seeded(1);
        let live = [Param::OrbitRadius, Param::BlurAmount, Param::WiggleSpeed, Param::SquareWidth];
        for param in live {
            state.set_param(param, 3.0);
        }
        assert_eq!(state.swarm().generation(), 1);
        assert_eq!(state.config().orbit_radius, 3.0);
    }

    #[test]
    fn test_add_color_rebuilds_with_cycled_palette() {
        let mut state = OrbitState::new(
            OrbitConfig::default(),
            Palette::single(hex("#B300FF")),
            ChaCha8Rng::seed_from_u64(4),
        );
        assert!(state.add_color(hex("#123abc")));
        let codes: Vec<_> = state.palette().colors().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, ["#B300FF", "#123ABC"]);
        assert_eq!(state.swarm().generation(), 2);

        let purple = state.swarm().entities().iter().filter(|e| e.color == hex("#B300FF")).count();
        assert_eq!(purple, 3);
        assert_eq!(state.swarm().len() - purple, 3);
    }

    #[test]
    fn test_palette_noops_do_not_rebuild() {
        let mut state = OrbitState::new(
            OrbitConfig::default(),
            Palette::single(hex("#B300FF")),
            ChaCha8Rng::seed_from_u64(4),
        );
        assert!(!state.add_color(hex("#b300ff")));
        assert!(!state.remove_color(0));
        assert!(!state.edit_color(3, hex("#000000")));
        assert_eq!(state.palette().len(), 1);
        assert_eq!(state.swarm().generation(), 1);

        assert!(state.edit_color(0, hex("#00ff00")));
        assert_eq!(state.swarm().generation(), 2);
        assert!(state.swarm().entities().iter().all(|e| e.color == hex("#00FF00")));
    }

    #[test]
    fn test_resize_recenters_without_rebuild() {
        let mut state = OrbitState::seeded(2);
        state.resize(400.0, 200.0);
        assert_eq!(state.center(), [200.0, 100.0]);
        assert_eq!(state.swarm().generation(), 1);
    }

    #[test]
    fn test_tick_emits_one_instruction_per_entity() {
        let mut state = OrbitState::seeded(3);
        state.set_param(Param::WiggleAmplitude, 0.0);
        state.resize(200.0, 200.0);

        let mut frame = Frame::default();
        for _ in 0..10 {
            frame = state.tick(16.0);
        }
        assert_eq!(frame.index, 10);
        assert_eq!(frame.len(), 6);
        for (draw, entity) in frame.instructions.iter().zip(state.swarm().entities()) {
            assert_eq!(draw.color, entity.color);
            assert_eq!(draw.shape, Shape::Circle { radius: 40.0 });
            let dx = draw.position[0] - 100.0;
            let dy = draw.position[1] - 100.0;
            assert!(((dx * dx + dy * dy).sqrt() - 41.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tick_advances_phase() {
        let mut state = OrbitState::seeded(3);
        let start = state.swarm().entities()[0].angle;
        for _ in 0..100 {
            state.tick(0.0);
        }
        let end = state.swarm().entities()[0].angle;
        assert!((end - start - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shape_type_switch() {
        let mut state = OrbitState::seeded(3);
        state.set_param(Param::ShapeType, 1.0);
        assert_eq!(state.config().shape_kind(), ShapeKind::Square);
        let frame = state.tick(0.0);
        assert!(frame.instructions.iter().all(|d| d.shape.kind() == ShapeKind::Square));
    }

    #[test]
    fn test_reset_keeps_palette() {
        let mut state = OrbitState::seeded(3);
        state.add_color(hex("#010203"));
        state.set_param(Param::OrbitRadius, 250.0);
        state.reset_to_defaults();
        assert_eq!(state.config(), &OrbitConfig::default());
        assert_eq!(state.palette().len(), 6);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut state = OrbitState::seeded(5);
        state.set_param(Param::RotationSpeed, 7.3);
        state.set_param(Param::WiggleSpeed, 0.4);
        let text = state.export_snapshot().unwrap();

        let mut other = OrbitState::seeded(6);
        other.remove_color(0);
        let report = other.import_snapshot(&text).unwrap();

        assert_eq!(report.applied, 11);
        assert_eq!(report.colors, 5);
        assert!(report.missing_keys.is_empty());
        assert_eq!(other.swarm().len(), 6);
        assert_eq!(other.palette(), state.palette());
        assert!((other.config().rotation_speed - 7.3).abs() < 1e-9);
        assert!((other.config().wiggle_speed - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_rejected_imports_leave_state_untouched() {
        let mut state = OrbitState::seeded(8);
        state.set_param(Param::OrbitRadius, 77.0);
        let before = fingerprint(&state);
        let generation = state.swarm().generation();

        let no_object = state.import_snapshot("not a snapshot");
        assert!(matches!(no_object, Err(SnapshotError::Format(_))));

        let named = state.import_snapshot(
            r##"{"config": {"orbitRadius": 5, "shapeCount": 2}, "colors": ["#FFFFFF", "red"]}"##,
        );
        assert!(matches!(named, Err(SnapshotError::Format(_))));

        let empty = state.import_snapshot(r#"{"config": {"orbitRadius": 5}, "colors": []}"#);
        assert!(matches!(empty, Err(SnapshotError::Schema(_))));

        assert_eq!(fingerprint(&state), before);
        assert_eq!(state.swarm().generation(), generation);
    }

    #[test]
    fn test_oversized_shape_count_import_stays_bounded() {
        let mut state = OrbitState::seeded(8);
        let report = state
            .import_snapshot(r##"{"config":{"shapeCount":1e300},"colors":["#000000"]}"##)
            .unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(state.swarm().len(), 32);
        assert_eq!(state.tick(0.0).len(), 32);
    }

    #[test]
    fn test_partial_import_reports_missing_keys() {
        let mut state = OrbitState::seeded(8);
        let report = state
            .import_snapshot(r##"{"config": {"shapeCount": 3, "glow": 1}, "colors": ["#0000ff"]}"##)
            .unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(report.missing_keys.len(), 7);
        assert_eq!(state.swarm().len(), 3);
        assert!(state.swarm().entities().iter().all(|e| e.color == hex("#0000FF")));
        assert_eq!(state.config().orbit_radius, 41.0);
    }
}
