//! Viewer session: glTF model loading and display
//!
//! The session is a state machine over empty/loading/loaded/error. Loads are
//! tagged with a monotonically increasing sequence number; a completion whose
//! sequence is not the latest issued is discarded, so the most recently
//! requested model always wins regardless of completion order.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;
use bevy::camera::primitives::MeshAabb;

use maison_core::ModelDescriptor;

use crate::network::ApiConfig;
use crate::scene::{reset_camera, CameraSettings};

/// Largest bounding-box dimension of a displayed model, in world units
pub const TARGET_SIZE: f32 = 2.0;

/// Turntable speed while auto-rotate is on, in radians per second
pub const AUTO_ROTATE_SPEED: f32 = 0.8;

/// Viewer load state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerPhase {
    #[default]
    Empty,
    Loading {
        seq: u64,
        descriptor: ModelDescriptor,
    },
    Loaded {
        seq: u64,
        descriptor: ModelDescriptor,
    },
    Error {
        message: String,
    },
}

/// The viewer session: current phase plus the control-surface state
///
/// Control state is replaced wholesale on every load; a fresh model always
/// starts from default controls.
#[derive(Debug, Clone, Resource)]
pub struct ViewerSession {
    pub phase: ViewerPhase,
    /// Last issued load sequence number
    next_seq: u64,
    pub auto_rotate: bool,
    pub wireframe: bool,
    pub user_scale: f32,
    /// Tilt, radians
    pub rotation_x: f32,
    /// Turntable, radians
    pub rotation_y: f32,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self {
            phase: ViewerPhase::Empty,
            next_seq: 0,
            auto_rotate: false,
            wireframe: false,
            user_scale: 1.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }
}

impl ViewerSession {
    pub fn has_model(&self) -> bool {
        matches!(self.phase, ViewerPhase::Loaded { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ViewerPhase::Loading { .. })
    }

    /// Name of the model being shown or fetched, for the status line
    pub fn current_name(&self) -> Option<&str> {
        match &self.phase {
            ViewerPhase::Loading { descriptor, .. } | ViewerPhase::Loaded { descriptor, .. } => {
                Some(descriptor.filename.as_str())
            }
            _ => None,
        }
    }

    fn issue_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// The most recently issued sequence number
    pub fn latest_seq(&self) -> u64 {
        self.next_seq
    }

    /// Reset the control-surface state for a fresh model
    fn reset_controls(&mut self) {
        self.auto_rotate = false;
        self.wireframe = false;
        self.user_scale = 1.0;
        self.rotation_x = 0.0;
        self.rotation_y = 0.0;
    }
}

/// An in-flight glTF load
pub struct PendingLoad {
    pub seq: u64,
    pub descriptor: ModelDescriptor,
    /// URL of the first attempt, kept for the failure message
    pub primary_url: String,
    /// URL currently being attempted
    pub url: String,
    pub handle: Handle<Gltf>,
    /// The absolute-URL retry has been used
    pub retried: bool,
    /// Failure reason of the first attempt
    pub first_error: Option<String>,
}

/// In-flight loads; stale entries are dropped as they complete
#[derive(Resource, Default)]
pub struct ModelLoads {
    pub pending: Vec<PendingLoad>,
}

/// Root entity of the displayed model; carries the user transform
#[derive(Component)]
pub struct CurrentModel {
    pub seq: u64,
}

/// Child entity holding the recenter/rescale transform and the scene
#[derive(Component)]
pub struct ModelAnchor;

/// The anchor still needs its bounding-box fit
#[derive(Component)]
pub struct NeedsFraming;

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerSession>()
            .init_resource::<ModelLoads>()
            .add_systems(
                Update,
                (
                    poll_model_loads,
                    fit_loaded_model.after(poll_model_loads),
                    auto_rotate_model,
                    apply_user_transform.after(auto_rotate_model),
                    sync_wireframe,
                ),
            );
    }
}

/// Start loading a model into the viewer
///
/// Re-entrant: a call while loaded (or still loading) issues a new sequence
/// number, and only that newest request will be shown.
pub fn request_load(
    session: &mut ViewerSession,
    loads: &mut ModelLoads,
    asset_server: &AssetServer,
    descriptor: &ModelDescriptor,
) {
    let seq = session.issue_seq();
    let url = asset_path(&descriptor.url);

    tracing::info!(seq, url = %url, "Loading model");
    let handle: Handle<Gltf> = asset_server.load(url.clone());

    loads.pending.push(PendingLoad {
        seq,
        descriptor: descriptor.clone(),
        primary_url: url.clone(),
        url,
        handle,
        retried: false,
        first_error: None,
    });

    session.reset_controls();
    session.phase = ViewerPhase::Loading {
        seq,
        descriptor: descriptor.clone(),
    };
}

/// Normalize a catalog URL into an asset path
///
/// Absolute URLs pass through (Bevy loads http(s) assets directly); relative
/// URLs lose their leading slash so the asset server resolves them against
/// the serving origin.
pub fn asset_path(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    url.trim_start_matches('/').to_string()
}

/// Absolute form of a catalog URL for the single load retry
pub fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

/// Message shown when both load attempts fail
pub fn load_failure_message(primary: &str, retry: &str, reason: &str) -> String {
    format!(
        "Failed to load model from {} (retried {}): {}",
        primary, retry, reason
    )
}

/// Whether a completed load should be applied, under latest-wins arbitration
pub fn is_current(completed_seq: u64, latest_issued: u64) -> bool {
    completed_seq == latest_issued
}

/// Poll in-flight loads, applying the latest and discarding the stale
fn poll_model_loads(
    mut commands: Commands,
    mut session: ResMut<ViewerSession>,
    mut loads: ResMut<ModelLoads>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    api: Res<ApiConfig>,
    current: Query<Entity, With<CurrentModel>>,
) {
    if loads.pending.is_empty() {
        return;
    }

    let latest = session.latest_seq();
    let mut remaining = Vec::new();

    for mut load in loads.pending.drain(..) {
        match asset_server.get_load_state(load.handle.id()) {
            Some(LoadState::Loaded) => {
                if !is_current(load.seq, latest) {
                    tracing::debug!(seq = load.seq, latest, "Discarding stale model load");
                    continue;
                }

                let scene_handle = gltf_assets.get(&load.handle).and_then(|gltf| {
                    gltf.default_scene
                        .clone()
                        .or_else(|| gltf.scenes.first().cloned())
                });

                match scene_handle {
                    Some(scene) => {
                        // Remove the previous model before inserting the new one
                        for entity in current.iter() {
                            commands.entity(entity).despawn();
                        }

                        commands
                            .spawn((
                                Transform::default(),
                                Visibility::default(),
                                CurrentModel { seq: load.seq },
                            ))
                            .with_children(|parent| {
                                parent.spawn((
                                    SceneRoot(scene),
                                    Transform::default(),
                                    Visibility::default(),
                                    ModelAnchor,
                                    NeedsFraming,
                                ));
                            });

                        tracing::info!(seq = load.seq, model = %load.descriptor.filename, "Model ready");
                        session.phase = ViewerPhase::Loaded {
                            seq: load.seq,
                            descriptor: load.descriptor,
                        };
                    }
                    None => {
                        fail_load(&mut commands, &mut session, &current, load, "asset has no scenes");
                    }
                }
            }
            Some(LoadState::Failed(err)) => {
                let reason = err.to_string();
                if !load.retried {
                    let retry_url = absolute_url(&api.base_url, &load.descriptor.url);
                    if retry_url != load.url {
                        tracing::warn!(
                            seq = load.seq,
                            url = %load.url,
                            retry = %retry_url,
                            "Model load failed, retrying absolute URL"
                        );
                        load.handle = asset_server.load(retry_url.clone());
                        load.url = retry_url;
                        load.retried = true;
                        load.first_error = Some(reason);
                        remaining.push(load);
                        continue;
                    }
                }

                // Stale failures disappear silently; only the latest request
                // may drive the session into the error state
                if is_current(load.seq, latest) {
                    fail_load(&mut commands, &mut session, &current, load, &reason);
                } else {
                    tracing::debug!(seq = load.seq, latest, "Discarding stale failed load");
                }
            }
            _ => {
                // Still loading
                remaining.push(load);
            }
        }
    }

    loads.pending = remaining;
}

/// Degrade the viewer into the explicit error display
fn fail_load(
    commands: &mut Commands,
    session: &mut ViewerSession,
    current: &Query<Entity, With<CurrentModel>>,
    load: PendingLoad,
    reason: &str,
) {
    let reason = match &load.first_error {
        Some(first) => format!("{}; then {}", first, reason),
        None => reason.to_string(),
    };
    let message = load_failure_message(&load.primary_url, &load.url, &reason);
    tracing::error!(seq = load.seq, "{}", message);

    for entity in current.iter() {
        commands.entity(entity).despawn();
    }
    session.phase = ViewerPhase::Error { message };
}

/// Fit a freshly spawned model: recenter at the origin and rescale
///
/// Waits until the glTF scene has produced mesh entities, then sets the
/// anchor transform so the bounding-box center lands on the origin and the
/// largest dimension equals `TARGET_SIZE`.
fn fit_loaded_model(
    mut commands: Commands,
    mut anchors: Query<(Entity, &mut Transform), With<NeedsFraming>>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
    mut camera_settings: ResMut<CameraSettings>,
) {
    for (entity, mut transform) in anchors.iter_mut() {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut found = false;

        collect_mesh_bounds(
            entity,
            &children_query,
            &mesh_query,
            meshes.as_ref(),
            &mut min,
            &mut max,
            &mut found,
        );

        // Scene not instantiated yet; try again next frame
        if !found {
            continue;
        }

        let (offset, scale) = fit_offset_scale(min, max);
        *transform = Transform::from_translation(offset).with_scale(Vec3::splat(scale));
        commands.entity(entity).remove::<NeedsFraming>();

        // Frame the camera on the normalized model
        reset_camera(&mut camera_settings);
    }
}

/// Recursively merge world-space bounds of all meshes under an entity
fn collect_mesh_bounds(
    entity: Entity,
    children_query: &Query<&Children>,
    mesh_query: &Query<(&Mesh3d, &GlobalTransform)>,
    mesh_assets: &Assets<Mesh>,
    min: &mut Vec3,
    max: &mut Vec3,
    found: &mut bool,
) {
    if let Ok((mesh_handle, global)) = mesh_query.get(entity) {
        if let Some(mesh) = mesh_assets.get(&mesh_handle.0) {
            if let Some(aabb) = mesh.compute_aabb() {
                let (lo, hi) = transformed_bounds(
                    Vec3::from(aabb.center),
                    Vec3::from(aabb.half_extents),
                    global,
                );
                *min = min.min(lo);
                *max = max.max(hi);
                *found = true;
            }
        }
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            collect_mesh_bounds(child, children_query, mesh_query, mesh_assets, min, max, found);
        }
    }
}

/// World-space bounds of a local AABB under a transform
pub fn transformed_bounds(center: Vec3, half_extents: Vec3, global: &GlobalTransform) -> (Vec3, Vec3) {
    let affine = global.affine();
    let mut lo = Vec3::splat(f32::MAX);
    let mut hi = Vec3::splat(f32::MIN);
    for sx in [-1.0f32, 1.0] {
        for sy in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                let corner = center + half_extents * Vec3::new(sx, sy, sz);
                let world = affine.transform_point3(corner);
                lo = lo.min(world);
                hi = hi.max(world);
            }
        }
    }
    (lo, hi)
}

/// Translation and uniform scale that center a box at the origin with its
/// largest dimension equal to `TARGET_SIZE`
pub fn fit_offset_scale(min: Vec3, max: Vec3) -> (Vec3, f32) {
    let center = (min + max) * 0.5;
    let extents = max - min;
    let max_dim = extents.max_element();
    let scale = if max_dim > f32::EPSILON {
        TARGET_SIZE / max_dim
    } else {
        1.0
    };
    (-center * scale, scale)
}

/// Advance the turntable while auto-rotate is on
fn auto_rotate_model(mut session: ResMut<ViewerSession>, time: Res<Time>) {
    if session.auto_rotate && session.has_model() {
        session.rotation_y =
            (session.rotation_y + AUTO_ROTATE_SPEED * time.delta_secs()).rem_euclid(std::f32::consts::TAU);
    }
}

/// Write the control-surface transform onto the model root
fn apply_user_transform(
    session: Res<ViewerSession>,
    mut roots: Query<&mut Transform, With<CurrentModel>>,
) {
    for mut transform in roots.iter_mut() {
        transform.scale = Vec3::splat(session.user_scale);
        transform.rotation =
            Quat::from_euler(EulerRot::YXZ, session.rotation_y, session.rotation_x, 0.0);
    }
}

/// Keep wireframe components in sync with the toggle
///
/// glTF meshes appear asynchronously after the scene spawns, so this runs
/// every frame rather than only on toggle edges; removing the component
/// restores the original material untouched.
fn sync_wireframe(
    mut commands: Commands,
    session: Res<ViewerSession>,
    roots: Query<Entity, With<CurrentModel>>,
    children_query: Query<&Children>,
    mesh_query: Query<(Entity, Has<Wireframe>), With<Mesh3d>>,
) {
    let desired = session.wireframe && session.has_model();

    for root in roots.iter() {
        sync_wireframe_recursive(root, desired, &mut commands, &children_query, &mesh_query);
    }
}

fn sync_wireframe_recursive(
    entity: Entity,
    desired: bool,
    commands: &mut Commands,
    children_query: &Query<&Children>,
    mesh_query: &Query<(Entity, Has<Wireframe>), With<Mesh3d>>,
) {
    if let Ok((mesh_entity, has_wireframe)) = mesh_query.get(entity) {
        if desired && !has_wireframe {
            commands.entity(mesh_entity).insert(Wireframe);
        } else if !desired && has_wireframe {
            commands.entity(mesh_entity).remove::<Wireframe>();
        }
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            sync_wireframe_recursive(child, desired, commands, children_query, mesh_query);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_centers_and_scales_to_target() {
        // An off-center 1 x 4 x 2 box
        let min = Vec3::new(3.0, -1.0, 5.0);
        let max = Vec3::new(4.0, 3.0, 7.0);
        let (offset, scale) = fit_offset_scale(min, max);

        // Largest dimension (4.0 along Y) maps to TARGET_SIZE
        assert!((scale - TARGET_SIZE / 4.0).abs() < 1e-6);

        // Applying the transform puts the box center at the origin
        let center = (min + max) * 0.5;
        let fitted_center = center * scale + offset;
        assert!(fitted_center.length() < 1e-5);

        // And the fitted extents top out at TARGET_SIZE
        let fitted_extents = (max - min) * scale;
        assert!((fitted_extents.max_element() - TARGET_SIZE).abs() < 1e-5);
    }

    #[test]
    fn test_fit_degenerate_box() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let (offset, scale) = fit_offset_scale(p, p);
        assert_eq!(scale, 1.0);
        assert_eq!(offset, -p);
    }

    #[test]
    fn test_transformed_bounds_rotation() {
        // A unit cube rotated 90 degrees around Y keeps unit bounds
        let global = GlobalTransform::from(
            Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
                .with_translation(Vec3::new(10.0, 0.0, 0.0)),
        );
        let (lo, hi) = transformed_bounds(Vec3::ZERO, Vec3::splat(0.5), &global);
        assert!((lo - Vec3::new(9.5, -0.5, -0.5)).length() < 1e-4);
        assert!((hi - Vec3::new(10.5, 0.5, 0.5)).length() < 1e-4);

        // Scale doubles the extents
        let scaled = GlobalTransform::from(Transform::from_scale(Vec3::splat(2.0)));
        let (lo, hi) = transformed_bounds(Vec3::ZERO, Vec3::splat(0.5), &scaled);
        assert!((hi - lo - Vec3::splat(2.0)).length() < 1e-4);
    }

    #[test]
    fn test_latest_wins_arbitration() {
        let mut session = ViewerSession::default();
        let first = session.issue_seq();
        let second = session.issue_seq();

        // The earlier request loses even if it completes last
        assert!(!is_current(first, session.latest_seq()));
        assert!(is_current(second, session.latest_seq()));
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(asset_path("/models/sofa.glb"), "models/sofa.glb");
        assert_eq!(
            asset_path("https://cdn.example.com/sofa.glb"),
            "https://cdn.example.com/sofa.glb"
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("http://localhost:8080", "/models/sofa.glb"),
            "http://localhost:8080/models/sofa.glb"
        );
        // Already-absolute URLs are left alone
        assert_eq!(
            absolute_url("http://localhost:8080", "https://cdn.example.com/sofa.glb"),
            "https://cdn.example.com/sofa.glb"
        );
    }

    #[test]
    fn test_failure_message_names_both_urls() {
        let message = load_failure_message(
            "models/sofa.glb",
            "http://localhost:8080/models/sofa.glb",
            "404 Not Found",
        );
        assert!(message.contains("models/sofa.glb"));
        assert!(message.contains("http://localhost:8080/models/sofa.glb"));
        assert!(message.contains("404 Not Found"));
    }

    #[test]
    fn test_wireframe_toggle_roundtrip() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        let descriptor = ModelDescriptor {
            filename: "sofa.glb".to_string(),
            category: "seating".to_string(),
            url: "/models/sofa.glb".to_string(),
        };
        world.insert_resource(ViewerSession {
            phase: ViewerPhase::Loaded {
                seq: 1,
                descriptor,
            },
            wireframe: true,
            ..Default::default()
        });

        let root = world
            .spawn((Transform::default(), CurrentModel { seq: 1 }))
            .id();
        let mesh = world
            .spawn((Mesh3d(Handle::default()), Transform::default()))
            .id();
        world.entity_mut(root).add_child(mesh);

        world.run_system_once(sync_wireframe).unwrap();
        assert!(world.entity(mesh).contains::<Wireframe>());

        // Toggling off removes the component, restoring the original look
        world.resource_mut::<ViewerSession>().wireframe = false;
        world.run_system_once(sync_wireframe).unwrap();
        assert!(!world.entity(mesh).contains::<Wireframe>());
    }

    #[test]
    fn test_request_load_resets_controls() {
        let mut session = ViewerSession {
            auto_rotate: true,
            wireframe: true,
            user_scale: 2.5,
            rotation_x: 1.0,
            rotation_y: 2.0,
            ..Default::default()
        };
        session.reset_controls();
        assert!(!session.auto_rotate);
        assert!(!session.wireframe);
        assert_eq!(session.user_scale, 1.0);
        assert_eq!(session.rotation_x, 0.0);
        assert_eq!(session.rotation_y, 0.0);
    }
}
