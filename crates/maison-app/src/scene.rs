//! 3D scene management: camera, lights, and the showroom floor

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Vertical field of view of the viewer camera, in radians
pub const CAMERA_FOV: f32 = std::f32::consts::FRAC_PI_4;

/// Extra headroom when framing a model so it never touches the viewport edge
pub const FRAME_MARGIN: f32 = 1.5;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, update_camera);
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for showroom floor grid lines
#[derive(Component)]
pub struct FloorLine;

/// Orbit camera settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32, // For smooth zoom
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3, // For smooth re-centering
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 5.0,
            target_distance: 5.0,
            azimuth: 0.8,   // Start rotated ~45 degrees
            elevation: 0.5, // Slightly elevated view
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
        }
    }
}

/// The four fixed viewing angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Top,
    Side,
    Iso,
}

/// Orbit angles (azimuth, elevation) for a preset view
pub fn preset_angles(preset: ViewPreset) -> (f32, f32) {
    match preset {
        ViewPreset::Front => (-std::f32::consts::FRAC_PI_2, 0.12),
        ViewPreset::Top => (-std::f32::consts::FRAC_PI_2, 1.5),
        ViewPreset::Side => (0.0, 0.12),
        ViewPreset::Iso => (0.8, 0.6),
    }
}

/// Back out the orbit distance that keeps a bounding box in view
///
/// `dist = (max_dim / 2) / tan(fov / 2)`, padded by the frame margin.
pub fn framing_distance(max_dim: f32, fov: f32) -> f32 {
    (max_dim * 0.5) / (fov * 0.5).tan() * FRAME_MARGIN
}

/// Jump the camera to a preset view, keeping the model centered
pub fn apply_preset(settings: &mut CameraSettings, preset: ViewPreset) {
    let (azimuth, elevation) = preset_angles(preset);
    settings.azimuth = azimuth;
    settings.elevation = elevation;
    settings.target_focus = Vec3::ZERO;
    settings.target_distance = framing_distance(crate::viewer::TARGET_SIZE, CAMERA_FOV);
}

/// Reset to the default framing with the whole model in view
pub fn reset_camera(settings: &mut CameraSettings) {
    let defaults = CameraSettings::default();
    settings.azimuth = defaults.azimuth;
    settings.elevation = defaults.elevation;
    settings.target_focus = Vec3::ZERO;
    settings.target_distance = framing_distance(crate::viewer::TARGET_SIZE, CAMERA_FOV);
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<CameraSettings>,
) {
    // Camera - Y-up orbit around the origin
    commands.spawn((
        Camera3d { ..default() },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV,
            near: 0.01,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(orbit_position(&settings)).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    // Soft ambient fill
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.95, 0.93, 0.9),
        brightness: 250.0,
        ..default()
    });

    // Key light from above
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Warm fill light
    commands.spawn((
        PointLight {
            intensity: 120000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.88),
            ..default()
        },
        Transform::from_xyz(-3.0, 3.0, -2.0),
    ));

    // Showroom floor grid on the X-Z plane
    let grid_size = 8;
    let grid_spacing = 0.5;
    let grid_extent = (grid_size as f32) * grid_spacing;
    let thickness = 0.008;

    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.45, 0.43, 0.42, 0.4),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    // Lines along X
    let line_mesh_x = meshes.add(Cuboid::new(grid_extent * 2.0, thickness, thickness));
    // Lines along Z
    let line_mesh_z = meshes.add(Cuboid::new(thickness, thickness, grid_extent * 2.0));

    for i in -grid_size..=grid_size {
        let offset = i as f32 * grid_spacing;
        commands.spawn((
            Mesh3d(line_mesh_x.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_translation(Vec3::new(0.0, -1.0, offset)),
            FloorLine,
        ));
        commands.spawn((
            Mesh3d(line_mesh_z.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_translation(Vec3::new(offset, -1.0, 0.0)),
            FloorLine,
        ));
    }
}

/// Camera position on the orbit sphere (Y-up)
fn orbit_position(settings: &CameraSettings) -> Vec3 {
    let x = settings.distance * settings.azimuth.cos() * settings.elevation.cos();
    let z = settings.distance * settings.azimuth.sin() * settings.elevation.cos();
    let y = settings.distance * settings.elevation.sin();
    settings.target + Vec3::new(x, y, z)
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Check if egui wants the mouse - if so, don't process camera controls
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    // Collect mouse motion delta
    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    // Orbit with left mouse drag (only when UI doesn't want pointer)
    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        settings.azimuth -= total_motion.x * settings.sensitivity;
        settings.elevation =
            (settings.elevation + total_motion.y * settings.sensitivity).clamp(-1.5, 1.5);
    }

    // Zoom with scroll - smooth zoom using target_distance
    if !egui_wants_pointer {
        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed * 0.3;
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.5, 30.0);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Smooth interpolation for zoom and target
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance =
        settings.distance + (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    // Update camera position
    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = orbit_position(&settings);
        transform.look_at(settings.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_distance_trigonometry() {
        // With a 90-degree FOV, tan(fov/2) == 1: distance is half the
        // dimension times the margin
        let dist = framing_distance(2.0, std::f32::consts::FRAC_PI_2);
        assert!((dist - 1.0 * FRAME_MARGIN).abs() < 1e-5);

        // Narrower FOV backs the camera out further
        assert!(framing_distance(2.0, CAMERA_FOV) > dist);
    }

    #[test]
    fn test_presets_are_distinct_and_keep_target() {
        let mut settings = CameraSettings::default();
        settings.target_focus = Vec3::new(3.0, 1.0, -2.0);

        let angles: Vec<(f32, f32)> = [
            ViewPreset::Front,
            ViewPreset::Top,
            ViewPreset::Side,
            ViewPreset::Iso,
        ]
        .into_iter()
        .map(preset_angles)
        .collect();

        for (i, a) in angles.iter().enumerate() {
            for b in angles.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }

        apply_preset(&mut settings, ViewPreset::Front);
        // Presets always re-center on the model
        assert_eq!(settings.target_focus, Vec3::ZERO);
        assert!(
            (settings.target_distance
                - framing_distance(crate::viewer::TARGET_SIZE, CAMERA_FOV))
            .abs()
                < 1e-5
        );
    }
}
