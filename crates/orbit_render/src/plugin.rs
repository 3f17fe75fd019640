use bevy::prelude::*;
use orbit_sim::pipeline::animation_tick;

use super::camera;
use super::shapes;
use super::ui;

/// Main render plugin: camera, shape meshes, HUD and keyboard controls
pub struct OrbitRenderPlugin;

impl Plugin for OrbitRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::HudThrottle>()
            .init_resource::<ui::ControlFocus>()
            .init_resource::<ui::SnapshotDir>()
            .init_resource::<ui::StartupSnapshot>()
            .init_resource::<shapes::ShapeRenderState>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    camera::init_surface,
                    shapes::init_shape_assets,
                    ui::spawn_hud,
                    ui::import_startup_snapshot,
                ),
            )
            .add_systems(
                Update,
                (
                    camera::resize_surface,
                    ui::parameter_control_system,
                    ui::palette_control_system.after(ui::parameter_control_system),
                    ui::snapshot_control_system.after(ui::palette_control_system),
                )
                    .before(animation_tick),
            )
            .add_systems(
                Update,
                (
                    shapes::respawn_shape_visuals,
                    shapes::update_shape_visuals.after(shapes::respawn_shape_visuals),
                    ui::update_hud,
                )
                    .after(animation_tick),
            );
    }
}
