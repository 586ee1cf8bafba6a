//! Bevy application setup

use bevy::pbr::wireframe::WireframePlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};

use maison_core::ModelDescriptor;

use crate::network::NetworkPlugin;
use crate::scene::ScenePlugin;
use crate::ui::UiPlugin;
use crate::viewer::ViewerPlugin;

/// Furniture catalog fetched from the daemon
#[derive(Debug, Clone, Resource, Default)]
pub struct CatalogState {
    pub models: Vec<ModelDescriptor>,
    /// A fetch is in flight
    pub loading: bool,
    /// Last fetch failed with this reason
    pub error: Option<String>,
}

/// Currently selected catalog entry (index into `CatalogState::models`)
///
/// A single optional index keeps selection exclusive by construction.
#[derive(Debug, Clone, Resource, Default)]
pub struct SelectedModel(pub Option<usize>);

/// Active dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource, Default)]
pub enum DashboardTab {
    #[default]
    Gallery,
    Viewer,
    Projects,
    Budget,
    Wishlist,
    Profile,
    Feedback,
}

impl DashboardTab {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Gallery => "Gallery",
            DashboardTab::Viewer => "AR Viewer",
            DashboardTab::Projects => "Projects",
            DashboardTab::Budget => "Budget",
            DashboardTab::Wishlist => "Wishlist",
            DashboardTab::Profile => "Profile",
            DashboardTab::Feedback => "Feedback",
        }
    }

    pub fn all() -> [DashboardTab; 7] {
        [
            DashboardTab::Gallery,
            DashboardTab::Viewer,
            DashboardTab::Projects,
            DashboardTab::Budget,
            DashboardTab::Wishlist,
            DashboardTab::Profile,
            DashboardTab::Feedback,
        ]
    }
}

/// Theme flag, persisted in local storage
#[derive(Debug, Clone, Resource)]
pub struct UiTheme {
    pub dark: bool,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self { dark: true }
    }
}

/// Run the Bevy application
pub fn run() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.12, 0.11, 0.13))) // Warm charcoal background
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Maison - Interior Design Studio".to_string(),
                    canvas: Some("#maison-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Load assets from root (daemon serves /models directly)
                file_path: "".to_string(),
                // Don't look for .meta files - server doesn't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // DefaultPickingPlugins and MeshPickingPlugin must be added BEFORE
        // EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(WireframePlugin::default())
        .init_resource::<CatalogState>()
        .init_resource::<SelectedModel>()
        .init_resource::<DashboardTab>()
        .init_resource::<UiTheme>()
        .add_plugins(NetworkPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(ViewerPlugin)
        .add_plugins(UiPlugin)
        .run();
}
