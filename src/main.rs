use bevy::prelude::*;
use orbit_core::{OrbitConfig, Palette};
use orbit_render::plugin::OrbitRenderPlugin;
use orbit_render::ui::StartupSnapshot;
use orbit_sim::OrbitState;
use orbit_sim::pipeline::SimulationPlugin;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

fn main() {
    // Optional snapshot file to import on launch
    let startup = StartupSnapshot(std::env::args().nth(1).map(PathBuf::from));

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbit".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        .insert_resource(OrbitState::new(
            OrbitConfig::default(),
            Palette::default(),
            ChaCha8Rng::from_entropy(),
        ))
        .insert_resource(startup)
        .add_plugins(SimulationPlugin)
        .add_plugins(OrbitRenderPlugin)
        .run();
}
