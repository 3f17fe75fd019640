use bevy::prelude::*;
use orbit_core::Frame;

use crate::state::OrbitState;

/// Bevy plugin driving the orbit animation once per rendered frame
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentFrame>()
            .add_systems(Update, animation_tick);
    }
}

/// Draw instructions produced by the latest tick
#[derive(Resource, Default)]
pub struct CurrentFrame(pub Frame);

/// Advance every entity on the wall clock and keep the frame for the renderer
pub fn animation_tick(
    mut state: ResMut<OrbitState>,
    mut frame: ResMut<CurrentFrame>,
    time: Res<Time>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    frame.0 = state.tick(now_ms);
}
