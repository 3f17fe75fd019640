use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use orbit_core::Surface;
use orbit_sim::OrbitState;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Size the orbit surface to the window before the first tick
pub fn init_surface(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<OrbitState>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    state.resize(window.width() as f64, window.height() as f64);
}

/// Recenter orbits when the window changes size
pub fn resize_surface(mut events: EventReader<WindowResized>, mut state: ResMut<OrbitState>) {
    // Only the final size of a burst matters
    let Some(last) = events.read().last() else {
        return;
    };
    state.resize(last.width as f64, last.height as f64);
    info!("Surface resized to {}x{}", last.width, last.height);
}

/// Surface coordinates (origin top-left, y down) to 2D world coordinates
/// (origin at the window center, y up)
pub fn surface_to_world(position: [f64; 2], surface: Surface) -> Vec2 {
    let [cx, cy] = surface.center();
    Vec2::new((position[0] - cx) as f32, (cy - position[1]) as f32)
}
