use bevy::prelude::*;
use orbit_core::{DrawInstruction, HexColor, Palette, Shape, ShapeKind, Surface};
use orbit_sim::OrbitState;
use orbit_sim::pipeline::CurrentFrame;
use std::collections::HashMap;

/// Mesh entity drawing shape `index` of the current frame
#[derive(Component)]
pub struct ShapeVisual {
    pub index: usize,
}

/// Translucent halo behind shape `index`, shown while blur is on
#[derive(Component)]
pub struct BlurHalo {
    pub index: usize,
}

/// Depth between consecutive shapes so later ones paint over earlier ones
const LAYER_STEP: f32 = 0.01;

/// Opacity of the blur halo
const HALO_ALPHA: f32 = 0.3;

/// Unit meshes scaled per shape, and one material pair per palette color
#[derive(Resource)]
pub struct ShapeAssets {
    circle: Handle<Mesh>,
    square: Handle<Mesh>,
    /// (solid, halo) materials per color
    materials: HashMap<HexColor, (Handle<ColorMaterial>, Handle<ColorMaterial>)>,
}

impl ShapeAssets {
    pub fn mesh(&self, kind: ShapeKind) -> &Handle<Mesh> {
        match kind {
            ShapeKind::Circle => &self.circle,
            ShapeKind::Square => &self.square,
        }
    }

    fn materials_for(
        &mut self,
        color: &HexColor,
        materials: &mut Assets<ColorMaterial>,
    ) -> (Handle<ColorMaterial>, Handle<ColorMaterial>) {
        self.materials
            .entry(color.clone())
            .or_insert_with(|| {
                let [r, g, b] = color.srgb();
                (
                    materials.add(Color::srgb(r, g, b)),
                    materials.add(Color::srgba(r, g, b, HALO_ALPHA)),
                )
            })
            .clone()
    }

    /// Drop materials of colors no longer in the palette
    fn retain_colors(&mut self, palette: &Palette) {
        self.materials.retain(|color, _| palette.contains(color));
    }
}

/// Swarm generation the spawned visuals belong to
#[derive(Resource, Default)]
pub struct ShapeRenderState {
    pub generation: u32,
}

pub fn init_shape_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(ShapeAssets {
        circle: meshes.add(Circle::new(1.0)),
        square: meshes.add(Rectangle::new(1.0, 1.0)),
        materials: HashMap::new(),
    });
}

/// Replace all visuals after the swarm was rebuilt
pub fn respawn_shape_visuals(
    mut commands: Commands,
    state: Res<OrbitState>,
    mut render_state: ResMut<ShapeRenderState>,
    mut assets: ResMut<ShapeAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    visuals: Query<Entity, Or<(With<ShapeVisual>, With<BlurHalo>)>>,
) {
    let swarm = state.swarm();
    if swarm.generation() == render_state.generation {
        return;
    }
    render_state.generation = swarm.generation();

    for entity in visuals.iter() {
        commands.entity(entity).despawn();
    }
    assets.retain_colors(state.palette());

    let mesh = assets.mesh(state.config().shape_kind()).clone();
    for (index, orbiter) in swarm.entities().iter().enumerate() {
        let (solid, halo) = assets.materials_for(&orbiter.color, &mut materials);

        commands.spawn((
            Mesh2d(mesh.clone()),
            MeshMaterial2d(halo),
            Transform::default(),
            Visibility::Hidden,
            BlurHalo { index },
        ));
        commands.spawn((
            Mesh2d(mesh.clone()),
            MeshMaterial2d(solid),
            Transform::default(),
            ShapeVisual { index },
        ));
    }

    info!("Spawned {} shape visuals", swarm.len());
}

/// Move every visual to the position its draw instruction asks for
pub fn update_shape_visuals(
    frame: Res<CurrentFrame>,
    state: Res<OrbitState>,
    assets: Res<ShapeAssets>,
    mut shapes: Query<(&ShapeVisual, &mut Transform, &mut Mesh2d), Without<BlurHalo>>,
    mut halos: Query<
        (&BlurHalo, &mut Transform, &mut Mesh2d, &mut Visibility),
        Without<ShapeVisual>,
    >,
) {
    let surface = state.surface();
    let instructions = &frame.0.instructions;

    for (visual, mut transform, mut mesh) in shapes.iter_mut() {
        let Some(draw) = instructions.get(visual.index) else {
            continue;
        };
        *transform = draw_transform(draw, surface, visual.index);
        sync_mesh(&mut mesh, assets.mesh(draw.shape.kind()));
    }

    for (halo, mut transform, mut mesh, mut visibility) in halos.iter_mut() {
        let Some(draw) = instructions.get(halo.index) else {
            continue;
        };
        match halo_transform(draw, surface, halo.index) {
            Some(halo_transform) => {
                *transform = halo_transform;
                *visibility = Visibility::Inherited;
                sync_mesh(&mut mesh, assets.mesh(draw.shape.kind()));
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn sync_mesh(mesh: &mut Mesh2d, wanted: &Handle<Mesh>) {
    if mesh.0 != *wanted {
        mesh.0 = wanted.clone();
    }
}

/// World transform of a unit mesh for one draw instruction
pub fn draw_transform(draw: &DrawInstruction, surface: Surface, layer: usize) -> Transform {
    let position = super::camera::surface_to_world(draw.position, surface);
    let translation = position.extend(layer as f32 * LAYER_STEP);

    match draw.shape {
        Shape::Circle { radius } => Transform::from_translation(translation)
            .with_scale(Vec3::new(radius as f32, radius as f32, 1.0)),
        // Surface y points down, so a clockwise surface angle is negative in world space
        Shape::Square { width, height, rotation } => Transform::from_translation(translation)
            .with_rotation(Quat::from_rotation_z(-rotation as f32))
            .with_scale(Vec3::new(width as f32, height as f32, 1.0)),
    }
}

/// Halo grown by the blur radius and placed just behind its shape
pub fn halo_transform(
    draw: &DrawInstruction,
    surface: Surface,
    layer: usize,
) -> Option<Transform> {
    let blur = draw.blur? as f32;
    let mut transform = draw_transform(draw, surface, layer);
    transform.translation.z -= LAYER_STEP / 2.0;
    match draw.shape {
        Shape::Circle { .. } => {
            transform.scale.x += blur;
            transform.scale.y += blur;
        }
        Shape::Square { .. } => {
            transform.scale.x += blur * 2.0;
            transform.scale.y += blur * 2.0;
        }
    }
    Some(transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(shape: Shape, blur: Option<f64>) -> DrawInstruction {
        DrawInstruction {
            shape,
            position: [500.0, 250.0],
            color: HexColor::parse("#FFFFFF").unwrap(),
            blur,
        }
    }

    #[test]
    fn test_circle_transform() {
        let surface = Surface::new(800.0, 600.0);
        let t = draw_transform(&instruction(Shape::Circle { radius: 40.0 }, None), surface, 3);
        assert_eq!(t.translation.truncate(), Vec2::new(100.0, 50.0));
        assert!((t.translation.z - 0.03).abs() < 1e-6);
        assert_eq!(t.scale, Vec3::new(40.0, 40.0, 1.0));
    }

    #[test]
    fn test_square_rotation_is_mirrored() {
        let surface = Surface::new(800.0, 600.0);
        let shape = Shape::Square { width: 30.0, height: 10.0, rotation: 0.5 };
        let t = draw_transform(&instruction(shape, None), surface, 0);
        assert_eq!(t.scale, Vec3::new(30.0, 10.0, 1.0));
        let (axis, angle) = t.rotation.to_axis_angle();
        assert!((axis.z.abs() - 1.0).abs() < 1e-5);
        assert!((axis.z * angle + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_material_cache_follows_palette() {
        let kept = HexColor::parse("#B300FF").unwrap();
        let dropped = HexColor::parse("#123ABC").unwrap();
        let mut assets = ShapeAssets {
            circle: Handle::default(),
            square: Handle::default(),
            materials: HashMap::new(),
        };
        for color in [&kept, &dropped] {
            assets.materials.insert(color.clone(), (Handle::default(), Handle::default()));
        }

        assets.retain_colors(&Palette::single(kept.clone()));
        assert_eq!(assets.materials.len(), 1);
        assert!(assets.materials.contains_key(&kept));
    }

    #[test]
    fn test_halo_only_with_blur() {
        let surface = Surface::new(800.0, 600.0);
        let sharp = instruction(Shape::Circle { radius: 10.0 }, None);
        assert!(halo_transform(&sharp, surface, 1).is_none());

        let blurred = instruction(Shape::Circle { radius: 10.0 }, Some(6.0));
        let halo = halo_transform(&blurred, surface, 1).unwrap();
        let shape = draw_transform(&blurred, surface, 1);
        assert_eq!(halo.scale.x, 16.0);
        assert!(halo.translation.z < shape.translation.z);
    }
}
