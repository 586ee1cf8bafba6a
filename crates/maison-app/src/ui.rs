//! Dashboard shell and UI overlays using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use maison_core::auth::{
    AuthPhase, EmailRequest, LoginRequest, OtpVerifyRequest, PasswordResetVerifyRequest,
    RegisterRequest,
};
use maison_core::profile::{Profile, ProfileUpdate};

use crate::app::{CatalogState, DashboardTab, SelectedModel, UiTheme};
use crate::gallery::{self, gallery_items};
use crate::network::{
    self, ApiConfig, PendingCatalog, PendingLogin, PendingNotices, PendingProfile,
};
use crate::notify::{self, tick_notifications, Notifications};
use crate::scene::{apply_preset, reset_camera, CameraSettings, ViewPreset};
use crate::session;
use crate::viewer::{request_load, ModelLoads, ViewerPhase, ViewerSession};

/// Which auth screen is shown while signed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScreen {
    #[default]
    Login,
    Register,
    Reset,
}

/// Auth flow state plus the form fields feeding it
#[derive(Resource, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub screen: AuthScreen,
    pub username: String,
    pub password: String,
    pub otp: String,
    pub remember: bool,
    pub reg_username: String,
    pub reg_email: String,
    pub reg_password: String,
    pub verify_otp: String,
    pub reset_email: String,
    pub reset_otp: String,
    pub reset_new_password: String,
    pub busy: bool,
    pub error: Option<String>,
}

/// Profile editor state
#[derive(Resource, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    /// A fetch has been issued for the profile tab
    pub requested: bool,
    pub busy: bool,
    /// The in-flight fetch is the silent session probe at startup
    pub bootstrap_probe: bool,
    pub form: ProfileForm,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub company: String,
    pub website: String,
    pub location: String,
    pub email_notifications: bool,
    pub current_password: String,
    pub new_password: String,
}

impl ProfileState {
    /// Copy fetched profile fields into the editable form
    pub fn fill_form(&mut self, profile: &Profile) {
        self.form = ProfileForm {
            username: profile.username.clone(),
            email: profile.email.clone(),
            bio: profile.bio.clone().unwrap_or_default(),
            company: profile.company.clone().unwrap_or_default(),
            website: profile.website.clone().unwrap_or_default(),
            location: profile.location.clone().unwrap_or_default(),
            email_notifications: profile.email_notifications,
            current_password: String::new(),
            new_password: String::new(),
        };
    }

    fn form_to_update(&self) -> ProfileUpdate {
        let form = &self.form;
        let opt = |s: &String| {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        };
        ProfileUpdate {
            username: form.username.clone(),
            email: form.email.clone(),
            bio: opt(&form.bio),
            company: opt(&form.company),
            website: opt(&form.website),
            location: opt(&form.location),
            email_notifications: form.email_notifications,
            current_password: opt(&form.current_password),
            new_password: opt(&form.new_password),
        }
    }
}

/// A tracked design project
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    pub name: String,
    pub client: String,
    pub status: String,
}

/// A budget line item
#[derive(Debug, Clone)]
pub struct BudgetEntry {
    pub label: String,
    pub amount: f64,
}

/// A wishlist item
#[derive(Debug, Clone)]
pub struct WishEntry {
    pub label: String,
    pub done: bool,
}

/// Client-local lists for the projects/budget/wishlist tabs, plus feedback
#[derive(Resource, Default)]
pub struct Boards {
    pub projects: Vec<ProjectEntry>,
    pub project_name: String,
    pub project_client: String,
    pub budget: Vec<BudgetEntry>,
    pub budget_label: String,
    pub budget_amount: String,
    pub wishlist: Vec<WishEntry>,
    pub wish_label: String,
    pub feedback: String,
}

/// Grouped system parameters for the main UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub theme: ResMut<'w, UiTheme>,
    pub tab: ResMut<'w, DashboardTab>,
    pub auth: ResMut<'w, AuthState>,
    pub catalog: ResMut<'w, CatalogState>,
    pub selected: ResMut<'w, SelectedModel>,
    pub session: ResMut<'w, ViewerSession>,
    pub loads: ResMut<'w, ModelLoads>,
    pub camera_settings: ResMut<'w, CameraSettings>,
    pub profile: ResMut<'w, ProfileState>,
    pub boards: ResMut<'w, Boards>,
    pub notifications: ResMut<'w, Notifications>,
    pub api: Res<'w, ApiConfig>,
    pub asset_server: Res<'w, AssetServer>,
    pub pending_catalog: Res<'w, PendingCatalog>,
    pub pending_login: Res<'w, PendingLogin>,
    pub pending_profile: Res<'w, PendingProfile>,
    pub pending_notices: Res<'w, PendingNotices>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AuthState>()
            .init_resource::<ProfileState>()
            .init_resource::<Boards>()
            .init_resource::<Notifications>()
            .add_systems(Startup, session::bootstrap_session)
            .add_systems(Update, tick_notifications)
            // Main UI system runs in EguiPrimaryContextPass for proper input handling
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn ui_system(params: UiParams) {
    let UiParams {
        mut contexts,
        mut theme,
        mut tab,
        mut auth,
        mut catalog,
        mut selected,
        mut session,
        mut loads,
        mut camera_settings,
        mut profile,
        mut boards,
        mut notifications,
        api,
        asset_server,
        pending_catalog,
        pending_login,
        pending_profile,
        pending_notices,
    } = params;

    // Get the egui context - early return if not available
    let Ok(ctx) = contexts.ctx_mut() else { return };

    ctx.set_visuals(if theme.dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    notify::draw(ctx, &notifications);

    // Signed-out users only see the auth screens
    if !auth.phase.is_signed_in() {
        egui::CentralPanel::default().show(ctx, |_ui| {});
        auth_screen(ctx, &mut auth, &api, &pending_login, &pending_notices);
        return;
    }

    // Top bar: brand, tabs, theme toggle, profile menu
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Maison");
            ui.separator();

            for entry in DashboardTab::all() {
                ui.selectable_value(&mut *tab, entry, entry.label());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Profile menu
                let username = auth
                    .phase
                    .identity()
                    .map(|i| i.username.clone())
                    .unwrap_or_default();
                ui.menu_button(format!("👤 {}", username), |ui| {
                    if ui.button("Profile").clicked() {
                        *tab = DashboardTab::Profile;
                        ui.close();
                    }
                    if ui.button("Sign out").clicked() {
                        network::logout(&api.base_url, &pending_notices);
                        session::clear_session();
                        auth.phase = AuthPhase::SignedOut;
                        auth.password.clear();
                        auth.otp.clear();
                        profile.profile = None;
                        profile.requested = false;
                        // The theme flag is invalidated along with the session
                        theme.dark = UiTheme::default().dark;
                        ui.close();
                    }
                });

                // Theme toggle
                let icon = if theme.dark { "☀" } else { "🌙" };
                if ui.button(icon).clicked() {
                    theme.dark = !theme.dark;
                    session::store_theme(theme.dark);
                }
            });
        });
    });

    match *tab {
        DashboardTab::Gallery => gallery_tab(
            ctx,
            &mut catalog,
            &mut selected,
            &mut notifications,
            &api,
            &pending_catalog,
        ),
        DashboardTab::Viewer => viewer_tab(
            ctx,
            &catalog,
            &mut selected,
            &mut session,
            &mut loads,
            &mut camera_settings,
            &asset_server,
        ),
        DashboardTab::Projects => projects_tab(ctx, &mut boards, &mut notifications),
        DashboardTab::Budget => budget_tab(ctx, &mut boards, &mut notifications),
        DashboardTab::Wishlist => wishlist_tab(ctx, &mut boards, &mut notifications),
        DashboardTab::Profile => profile_tab(
            ctx,
            &mut profile,
            &api,
            &pending_profile,
            &pending_notices,
        ),
        DashboardTab::Feedback => feedback_tab(ctx, &mut boards, &mut notifications),
    }
}

/// Login / register / reset screens and the OTP gate
fn auth_screen(
    ctx: &egui::Context,
    auth: &mut AuthState,
    api: &ApiConfig,
    pending_login: &PendingLogin,
    pending_notices: &PendingNotices,
) {
    egui::Window::new("Maison")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_width(300.0);

            if let Some(error) = &auth.error {
                ui.colored_label(egui::Color32::from_rgb(230, 110, 100), error);
                ui.separator();
            }

            // The OTP gate takes over whatever screen was up
            if let AuthPhase::AwaitingOtp { email } = auth.phase.clone() {
                ui.label(format!("A one-time code was sent to {}", email));
                ui.add(egui::TextEdit::singleline(&mut auth.otp).hint_text("One-time code"));
                if ui
                    .add_enabled(!auth.busy, egui::Button::new("Verify and sign in"))
                    .clicked()
                {
                    auth.busy = true;
                    network::login(
                        &api.base_url,
                        LoginRequest {
                            username: auth.username.clone(),
                            password: auth.password.clone(),
                            otp: Some(auth.otp.trim().to_string()),
                            remember: auth.remember,
                        },
                        pending_login,
                    );
                }
                if ui.small_button("Back to sign in").clicked() {
                    auth.phase = AuthPhase::SignedOut;
                    auth.otp.clear();
                }
                return;
            }

            match auth.screen {
                AuthScreen::Login => login_form(ui, auth, api, pending_login),
                AuthScreen::Register => register_form(ui, auth, api, pending_notices),
                AuthScreen::Reset => reset_form(ui, auth, api, pending_notices),
            }
        });
}

fn login_form(
    ui: &mut egui::Ui,
    auth: &mut AuthState,
    api: &ApiConfig,
    pending_login: &PendingLogin,
) {
    ui.heading("Sign in");
    ui.add(egui::TextEdit::singleline(&mut auth.username).hint_text("Username"));
    ui.add(
        egui::TextEdit::singleline(&mut auth.password)
            .hint_text("Password")
            .password(true),
    );
    ui.checkbox(&mut auth.remember, "Remember me");

    if ui
        .add_enabled(!auth.busy, egui::Button::new("Sign in"))
        .clicked()
    {
        if auth.username.trim().is_empty() || auth.password.is_empty() {
            auth.error = Some("Username and password required".to_string());
        } else {
            auth.error = None;
            auth.busy = true;
            network::login(
                &api.base_url,
                LoginRequest {
                    username: auth.username.trim().to_string(),
                    password: auth.password.clone(),
                    otp: None,
                    remember: auth.remember,
                },
                pending_login,
            );
        }
    }

    ui.horizontal(|ui| {
        if ui.small_button("Create account").clicked() {
            auth.screen = AuthScreen::Register;
            auth.error = None;
        }
        if ui.small_button("Forgot password").clicked() {
            auth.screen = AuthScreen::Reset;
            auth.error = None;
        }
    });
}

fn register_form(
    ui: &mut egui::Ui,
    auth: &mut AuthState,
    api: &ApiConfig,
    pending_notices: &PendingNotices,
) {
    ui.heading("Create account");
    ui.add(egui::TextEdit::singleline(&mut auth.reg_username).hint_text("Username"));
    ui.add(egui::TextEdit::singleline(&mut auth.reg_email).hint_text("Email"));
    ui.add(
        egui::TextEdit::singleline(&mut auth.reg_password)
            .hint_text("Password")
            .password(true),
    );

    if ui.button("Register").clicked() {
        if auth.reg_username.trim().is_empty()
            || auth.reg_email.trim().is_empty()
            || auth.reg_password.is_empty()
        {
            auth.error = Some("All fields are required".to_string());
        } else if auth.reg_password.len() < 6 {
            auth.error = Some("Password must be at least 6 characters".to_string());
        } else {
            auth.error = None;
            network::register(
                &api.base_url,
                RegisterRequest {
                    username: auth.reg_username.trim().to_string(),
                    email: auth.reg_email.trim().to_string(),
                    password: auth.reg_password.clone(),
                },
                pending_notices,
            );
        }
    }

    ui.separator();
    ui.label("Already have a code?");
    ui.add(egui::TextEdit::singleline(&mut auth.verify_otp).hint_text("Verification code"));
    ui.horizontal(|ui| {
        if ui.small_button("Verify email").clicked() {
            network::verify_otp(
                &api.base_url,
                OtpVerifyRequest {
                    email: auth.reg_email.trim().to_string(),
                    otp: auth.verify_otp.trim().to_string(),
                },
                pending_notices,
            );
        }
        if ui.small_button("Resend code").clicked() {
            network::resend_verification(
                &api.base_url,
                EmailRequest {
                    email: auth.reg_email.trim().to_string(),
                },
                pending_notices,
            );
        }
    });

    if ui.small_button("Back to sign in").clicked() {
        auth.screen = AuthScreen::Login;
        auth.error = None;
    }
}

fn reset_form(
    ui: &mut egui::Ui,
    auth: &mut AuthState,
    api: &ApiConfig,
    pending_notices: &PendingNotices,
) {
    ui.heading("Reset password");
    ui.add(egui::TextEdit::singleline(&mut auth.reset_email).hint_text("Email"));
    if ui.button("Send reset code").clicked() {
        if auth.reset_email.trim().is_empty() {
            auth.error = Some("Email required".to_string());
        } else {
            auth.error = None;
            network::reset_password(
                &api.base_url,
                EmailRequest {
                    email: auth.reset_email.trim().to_string(),
                },
                pending_notices,
            );
        }
    }

    ui.separator();
    ui.add(egui::TextEdit::singleline(&mut auth.reset_otp).hint_text("Reset code"));
    ui.add(
        egui::TextEdit::singleline(&mut auth.reset_new_password)
            .hint_text("New password")
            .password(true),
    );
    if ui.button("Set new password").clicked() {
        if auth.reset_otp.trim().is_empty() || auth.reset_new_password.is_empty() {
            auth.error = Some("Code and new password required".to_string());
        } else if auth.reset_new_password.len() < 6 {
            auth.error = Some("Password must be at least 6 characters".to_string());
        } else {
            auth.error = None;
            network::reset_password_verify(
                &api.base_url,
                PasswordResetVerifyRequest {
                    email: auth.reset_email.trim().to_string(),
                    otp: auth.reset_otp.trim().to_string(),
                    new_password: auth.reset_new_password.clone(),
                },
                pending_notices,
            );
        }
    }

    if ui.small_button("Back to sign in").clicked() {
        auth.screen = AuthScreen::Login;
        auth.error = None;
    }
}

/// Gallery tab: the catalog as a clickable grid
fn gallery_tab(
    ctx: &egui::Context,
    catalog: &mut CatalogState,
    selected: &mut SelectedModel,
    notifications: &mut Notifications,
    api: &ApiConfig,
    pending_catalog: &PendingCatalog,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Model Gallery");
            if ui.button("⟳ Refresh").clicked() && !catalog.loading {
                catalog.loading = true;
                network::fetch_catalog(&api.base_url, pending_catalog);
            }
            if catalog.loading {
                ui.spinner();
            }
        });
        ui.separator();

        if let Some(error) = &catalog.error {
            ui.colored_label(egui::Color32::from_rgb(230, 110, 100), error);
        }

        if catalog.models.is_empty() && !catalog.loading && catalog.error.is_none() {
            ui.label("No models in the catalog yet.");
            return;
        }

        let items = gallery_items(&catalog.models);
        egui::ScrollArea::vertical().show(ui, |ui| {
            if let Some(clicked) = gallery::gallery_grid(ui, &items, &mut selected.0) {
                // Gallery clicks are a lightweight preview, not a load
                notifications.info(format!("Previewing {}", items[clicked].label));
            }
        });
    });
}

/// Viewer tab: sidebar model list, control surface, and the 3D viewport
fn viewer_tab(
    ctx: &egui::Context,
    catalog: &CatalogState,
    selected: &mut SelectedModel,
    session: &mut ViewerSession,
    loads: &mut ModelLoads,
    camera_settings: &mut CameraSettings,
    asset_server: &AssetServer,
) {
    egui::SidePanel::left("models_panel")
        .default_width(230.0)
        .show(ctx, |ui| {
            ui.heading("Models");
            ui.separator();

            if catalog.models.is_empty() {
                ui.label("Catalog is empty.");
            }

            let items = gallery_items(&catalog.models);
            if let Some(clicked) = gallery::sidebar_list(ui, &items, &mut selected.0) {
                // Sidebar selection loads straight into the viewer
                if let Some(descriptor) = catalog.models.get(clicked) {
                    request_load(session, loads, asset_server, descriptor);
                }
            }
        });

    egui::SidePanel::right("controls_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            controls_panel(ui, session, camera_settings);
        });

    // Transparent center so the 3D viewport shows through
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            match &session.phase {
                ViewerPhase::Empty => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Select a model to begin");
                    });
                }
                ViewerPhase::Loading { descriptor, .. } => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {}...", descriptor.filename));
                    });
                }
                ViewerPhase::Error { message } => {
                    ui.centered_and_justified(|ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.colored_label(
                                egui::Color32::from_rgb(230, 110, 100),
                                format!("⚠ {}", message),
                            );
                        });
                    });
                }
                ViewerPhase::Loaded { .. } => {}
            }
        });
}

/// The control surface: each control binds one input to one session mutation
fn controls_panel(ui: &mut egui::Ui, session: &mut ViewerSession, camera: &mut CameraSettings) {
    ui.heading("Controls");
    if let Some(name) = session.current_name() {
        ui.label(maison_core::catalog::display_name(name));
    }
    ui.separator();

    let has_model = session.has_model();

    // Sliders always echo their value into the paired label; without a
    // current model they mutate nothing else
    ui.label(format!("Scale: {:.1}x", session.user_scale));
    ui.add(egui::Slider::new(&mut session.user_scale, 0.1..=3.0).show_value(false));

    let mut tilt_deg = session.rotation_x.to_degrees();
    ui.label(format!("Tilt: {:.0}°", tilt_deg));
    if ui
        .add(egui::Slider::new(&mut tilt_deg, -90.0..=90.0).show_value(false))
        .changed()
    {
        session.rotation_x = tilt_deg.to_radians();
    }

    let mut turn_deg = session.rotation_y.to_degrees().rem_euclid(360.0);
    ui.label(format!("Rotation: {:.0}°", turn_deg));
    if ui
        .add(egui::Slider::new(&mut turn_deg, 0.0..=360.0).show_value(false))
        .changed()
    {
        session.rotation_y = turn_deg.to_radians();
    }

    ui.separator();
    ui.checkbox(&mut session.auto_rotate, "Auto-rotate");
    ui.checkbox(&mut session.wireframe, "Wireframe");

    ui.separator();
    ui.label("View");
    ui.horizontal(|ui| {
        for (label, preset) in [
            ("Front", ViewPreset::Front),
            ("Top", ViewPreset::Top),
            ("Side", ViewPreset::Side),
            ("Iso", ViewPreset::Iso),
        ] {
            if ui.button(label).clicked() && has_model {
                apply_preset(camera, preset);
            }
        }
    });
    if ui.button("Reset view").clicked() && has_model {
        reset_camera(camera);
    }
}

fn projects_tab(ctx: &egui::Context, boards: &mut Boards, notifications: &mut Notifications) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Projects");
        ui.separator();

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut boards.project_name).hint_text("Project name"));
            ui.add(egui::TextEdit::singleline(&mut boards.project_client).hint_text("Client"));
            if ui.button("Add").clicked() {
                if boards.project_name.trim().is_empty() || boards.project_client.trim().is_empty()
                {
                    notifications.error("Project name and client are required");
                } else {
                    boards.projects.push(ProjectEntry {
                        name: boards.project_name.trim().to_string(),
                        client: boards.project_client.trim().to_string(),
                        status: "In Progress".to_string(),
                    });
                    boards.project_name.clear();
                    boards.project_client.clear();
                }
            }
        });

        ui.separator();
        let mut remove = None;
        for (i, project) in boards.projects.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.label(&project.name);
                ui.weak(&project.client);
                if ui.small_button(&project.status).clicked() {
                    project.status = match project.status.as_str() {
                        "In Progress" => "Completed".to_string(),
                        _ => "In Progress".to_string(),
                    };
                }
                if ui.small_button("✕").clicked() {
                    remove = Some(i);
                }
            });
        }
        if let Some(i) = remove {
            boards.projects.remove(i);
        }
    });
}

fn budget_tab(ctx: &egui::Context, boards: &mut Boards, notifications: &mut Notifications) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Budget");
        ui.separator();

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut boards.budget_label).hint_text("Item"));
            ui.add(egui::TextEdit::singleline(&mut boards.budget_amount).hint_text("Amount"));
            if ui.button("Add").clicked() {
                let amount = boards.budget_amount.trim().parse::<f64>();
                if boards.budget_label.trim().is_empty() {
                    notifications.error("Item label is required");
                } else {
                    match amount {
                        Ok(amount) => {
                            boards.budget.push(BudgetEntry {
                                label: boards.budget_label.trim().to_string(),
                                amount,
                            });
                            boards.budget_label.clear();
                            boards.budget_amount.clear();
                        }
                        Err(_) => notifications.error("Amount must be a number"),
                    }
                }
            }
        });

        ui.separator();
        let mut remove = None;
        for (i, entry) in boards.budget.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(&entry.label);
                ui.weak(format!("${:.2}", entry.amount));
                if ui.small_button("✕").clicked() {
                    remove = Some(i);
                }
            });
        }
        if let Some(i) = remove {
            boards.budget.remove(i);
        }

        ui.separator();
        let total: f64 = boards.budget.iter().map(|e| e.amount).sum();
        ui.strong(format!("Total: ${:.2}", total));
    });
}

fn wishlist_tab(ctx: &egui::Context, boards: &mut Boards, notifications: &mut Notifications) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Wishlist");
        ui.separator();

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut boards.wish_label).hint_text("Wish"));
            if ui.button("Add").clicked() {
                if boards.wish_label.trim().is_empty() {
                    notifications.error("Wishlist entry is required");
                } else {
                    boards.wishlist.push(WishEntry {
                        label: boards.wish_label.trim().to_string(),
                        done: false,
                    });
                    boards.wish_label.clear();
                }
            }
        });

        ui.separator();
        let mut remove = None;
        for (i, wish) in boards.wishlist.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.checkbox(&mut wish.done, &wish.label);
                if ui.small_button("✕").clicked() {
                    remove = Some(i);
                }
            });
        }
        if let Some(i) = remove {
            boards.wishlist.remove(i);
        }
    });
}

fn profile_tab(
    ctx: &egui::Context,
    profile: &mut ProfileState,
    api: &ApiConfig,
    pending_profile: &PendingProfile,
    pending_notices: &PendingNotices,
) {
    // Fetch lazily the first time the tab is opened
    if !profile.requested {
        profile.requested = true;
        profile.busy = true;
        network::fetch_profile(&api.base_url, pending_profile);
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Profile");
            if ui.button("⟳ Reload").clicked() && !profile.busy {
                profile.busy = true;
                network::fetch_profile(&api.base_url, pending_profile);
            }
            if profile.busy {
                ui.spinner();
            }
        });
        ui.separator();

        egui::Grid::new("profile_form").num_columns(2).show(ui, |ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut profile.form.username);
            ui.end_row();
            ui.label("Email");
            ui.text_edit_singleline(&mut profile.form.email);
            ui.end_row();
            ui.label("Bio");
            ui.text_edit_singleline(&mut profile.form.bio);
            ui.end_row();
            ui.label("Company");
            ui.text_edit_singleline(&mut profile.form.company);
            ui.end_row();
            ui.label("Website");
            ui.text_edit_singleline(&mut profile.form.website);
            ui.end_row();
            ui.label("Location");
            ui.text_edit_singleline(&mut profile.form.location);
            ui.end_row();
        });

        ui.checkbox(&mut profile.form.email_notifications, "Email notifications");

        ui.separator();
        ui.label("Change password (optional)");
        ui.add(
            egui::TextEdit::singleline(&mut profile.form.current_password)
                .hint_text("Current password")
                .password(true),
        );
        ui.add(
            egui::TextEdit::singleline(&mut profile.form.new_password)
                .hint_text("New password")
                .password(true),
        );

        ui.separator();
        if ui.button("Save profile").clicked() {
            network::update_profile(&api.base_url, profile.form_to_update(), pending_notices);
            profile.form.current_password.clear();
            profile.form.new_password.clear();
        }
    });
}

fn feedback_tab(ctx: &egui::Context, boards: &mut Boards, notifications: &mut Notifications) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Feedback");
        ui.separator();

        ui.add(
            egui::TextEdit::multiline(&mut boards.feedback)
                .hint_text("Tell us what you think")
                .desired_rows(6),
        );

        if ui.button("Send").clicked() {
            if boards.feedback.trim().is_empty() {
                notifications.error("Feedback text is required");
            } else {
                notifications.success("Thanks for your feedback!");
                boards.feedback.clear();
            }
        }
    });
}
