use bevy::prelude::*;
use orbit_core::{OrbitConfig, Palette, Param, ShapeKind};
use orbit_sim::OrbitState;
use std::path::{Path, PathBuf};

/// Marker for the HUD text
#[derive(Component)]
pub struct HudText;

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

/// Which parameter and which palette entry the keyboard edits
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ControlFocus {
    pub param: Param,
    pub color: usize,
}

impl Default for ControlFocus {
    fn default() -> Self {
        Self {
            param: Param::ShapeCount,
            color: 0,
        }
    }
}

impl ControlFocus {
    /// Move the parameter cursor by `delta` rows, wrapping within the rows
    /// shown for `kind`
    pub fn move_param(&mut self, kind: ShapeKind, delta: i32) {
        let params = visible_params(kind);
        let current = params.iter().position(|p| *p == self.param).unwrap_or(0) as i32;
        let next = (current + delta).rem_euclid(params.len() as i32) as usize;
        self.param = params[next];
    }

    /// Move the palette cursor by `delta` entries, wrapping
    pub fn move_color(&mut self, palette_len: usize, delta: i32) {
        let len = palette_len.max(1) as i32;
        let current = self.color.min(palette_len.saturating_sub(1)) as i32;
        self.color = (current + delta).rem_euclid(len) as usize;
    }

    /// Pull both cursors back onto something that exists
    pub fn normalize(&mut self, kind: ShapeKind, palette_len: usize) {
        if !visible_params(kind).contains(&self.param) {
            self.param = Param::ShapeCount;
        }
        self.color = self.color.min(palette_len.saturating_sub(1));
    }
}

/// Directory exports are written to and imports are read from
#[derive(Resource, Debug, Clone)]
pub struct SnapshotDir(pub PathBuf);

impl Default for SnapshotDir {
    fn default() -> Self {
        Self(PathBuf::from("snapshots"))
    }
}

/// Snapshot file to import once at startup, from the command line
#[derive(Resource, Debug, Clone, Default)]
pub struct StartupSnapshot(pub Option<PathBuf>);

/// Parameters with a HUD row for the current shape kind
pub fn visible_params(kind: ShapeKind) -> Vec<Param> {
    Param::ALL
        .into_iter()
        .filter(|p| match p {
            Param::CircleRadius => kind == ShapeKind::Circle,
            Param::SquareWidth | Param::SquareHeight => kind == ShapeKind::Square,
            _ => true,
        })
        .collect()
}

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Orbit"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::srgba(0.9, 0.9, 1.0, 0.85)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

/// Select and step parameters with the arrow keys
pub fn parameter_control_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<OrbitState>,
    mut focus: ResMut<ControlFocus>,
) {
    let kind = state.config().shape_kind();
    // Write only on a real correction so the HUD throttle can skip
    let mut normalized = focus.clone();
    normalized.normalize(kind, state.palette().len());
    focus.set_if_neq(normalized);

    if keyboard.just_pressed(KeyCode::ArrowUp) {
        focus.move_param(kind, -1);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        focus.move_param(kind, 1);
    }

    let mut steps = 0;
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        steps -= 1;
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        steps += 1;
    }
    if steps == 0 {
        return;
    }

    let param = focus.param;
    let current = state.config().get(param);
    let next = param.bounds().step_by(current, steps);
    if next != current {
        state.set_param(param, next);
    }
}

/// Add, remove, select and recolor palette entries
pub fn palette_control_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<OrbitState>,
    mut focus: ResMut<ControlFocus>,
) {
    // [ ] Select color
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        focus.move_color(state.palette().len(), -1);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        focus.move_color(state.palette().len(), 1);
    }

    // [C] Add a random color
    if keyboard.just_pressed(KeyCode::KeyC) {
        let color = state.random_color();
        if state.add_color(color.clone()) {
            focus.color = state.palette().len() - 1;
            info!("Added color {color}");
        }
    }

    // [X] Remove the selected color, never the last one
    if keyboard.just_pressed(KeyCode::KeyX) {
        let index = focus.color;
        if state.remove_color(index) {
            info!("Removed color #{index}");
        } else {
            warn!("Palette keeps at least one color");
        }
    }

    // [V] Recolor the selected entry
    if keyboard.just_pressed(KeyCode::KeyV) {
        let color = state.random_color();
        if state.edit_color(focus.color, color.clone()) {
            info!("Color #{} is now {color}", focus.color);
        }
    }

    let last = state.palette().len().saturating_sub(1);
    if focus.color > last {
        focus.color = last;
    }
}

/// Export, import and reset hotkeys
pub fn snapshot_control_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<OrbitState>,
    dir: Res<SnapshotDir>,
) {
    // [E] Export to a new file
    if keyboard.just_pressed(KeyCode::KeyE) {
        export_to_dir(&state, &dir.0);
    }

    // [I] Import the newest file
    if keyboard.just_pressed(KeyCode::KeyI) {
        match orbit_storage::latest_snapshot(&dir.0) {
            Some(path) => import_from_file(&mut state, &path),
            None => warn!("No snapshots in {}", dir.0.display()),
        }
    }

    // [R] Reset parameters
    if keyboard.just_pressed(KeyCode::KeyR) {
        state.reset_to_defaults();
        info!("Parameters reset to defaults");
    }
}

/// Import the snapshot named on the command line, if any
pub fn import_startup_snapshot(startup: Res<StartupSnapshot>, mut state: ResMut<OrbitState>) {
    if let Some(path) = &startup.0 {
        import_from_file(&mut state, path);
    }
}

fn export_to_dir(state: &OrbitState, dir: &Path) {
    let text = match state.export_snapshot() {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to encode snapshot: {e}");
            return;
        }
    };

    let path = dir.join(orbit_storage::snapshot_file_name());
    match orbit_storage::write_snapshot(&path, &text) {
        Ok(()) => info!("Snapshot exported to {}", path.display()),
        Err(e) => {
            // Keep the text recoverable from the log
            error!("Failed to write snapshot: {e}");
            info!("Snapshot text:\n{text}");
        }
    }
}

fn import_from_file(state: &mut OrbitState, path: &Path) {
    let result = orbit_storage::read_snapshot(path).and_then(|text| state.import_snapshot(&text));
    match result {
        Ok(report) => info!(
            "Imported {}: {} values, {} colors",
            path.display(),
            report.applied,
            report.colors
        ),
        Err(e) => error!("Failed to import {}: {e}", path.display()),
    }
}

/// Update HUD text every 10th frame (string formatting is expensive)
pub fn update_hud(
    state: Res<OrbitState>,
    focus: Res<ControlFocus>,
    mut throttle: ResMut<HudThrottle>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 10 != 0 && !focus.is_changed() {
        return;
    }
    if let Ok(mut text) = hud_query.get_single_mut() {
        text.0 = hud_text(state.config(), state.palette(), &focus);
    }
}

fn format_value(param: Param, value: f64) -> String {
    match param {
        Param::ShapeType => ShapeKind::from_discriminant(value).name().to_string(),
        _ if param.bounds().step >= 1.0 => format!("{value:.0}"),
        _ => format!("{value:.1}"),
    }
}

pub fn hud_text(config: &OrbitConfig, palette: &Palette, focus: &ControlFocus) -> String {
    let mut lines = Vec::new();

    for param in visible_params(config.shape_kind()) {
        let marker = if param == focus.param { ">" } else { " " };
        lines.push(format!(
            "{marker} {:<18}{}",
            param.label(),
            format_value(param, config.get(param))
        ));
    }

    let colors: Vec<String> = palette
        .colors()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == focus.color {
                format!("[{c}]")
            } else {
                c.to_string()
            }
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("Palette: {}", colors.join(" ")));
    lines.push(String::new());
    lines.push("[Up/Down] Select | [Left/Right] Adjust".to_string());
    lines.push("[C] Add | [X] Remove | [V] Recolor | [ ] Pick color".to_string());
    lines.push("[E] Export | [I] Import latest | [R] Reset".to_string());

    lines.join("\n")
}
