//! Transient user notifications
//!
//! Network failures and form feedback surface here instead of failing the
//! page. Notices auto-dismiss after a fixed interval.

use bevy::prelude::*;
use bevy_egui::egui;

/// How long a notice stays on screen, in seconds
pub const NOTICE_SECS: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    /// Seconds until dismissal
    pub remaining: f32,
}

#[derive(Debug, Clone, Resource, Default)]
pub struct Notifications {
    pub items: Vec<Notice>,
}

impl Notifications {
    fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.items.push(Notice {
            text: text.into(),
            level,
            remaining: NOTICE_SECS,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text);
    }

    /// Age all notices and drop the expired ones
    pub fn tick(&mut self, dt: f32) {
        for notice in &mut self.items {
            notice.remaining -= dt;
        }
        self.items.retain(|n| n.remaining > 0.0);
    }
}

/// Age notifications every frame
pub fn tick_notifications(time: Res<Time>, mut notifications: ResMut<Notifications>) {
    if !notifications.items.is_empty() {
        notifications.tick(time.delta_secs());
    }
}

/// Draw the notification stack in the top-right corner
pub fn draw(ctx: &egui::Context, notifications: &Notifications) {
    if notifications.items.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            for notice in &notifications.items {
                let color = match notice.level {
                    NoticeLevel::Info => egui::Color32::from_rgb(120, 160, 220),
                    NoticeLevel::Success => egui::Color32::from_rgb(110, 200, 120),
                    NoticeLevel::Error => egui::Color32::from_rgb(230, 110, 100),
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(color, &notice.text);
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire_after_interval() {
        let mut notifications = Notifications::default();
        notifications.error("catalog unavailable");
        notifications.info("previewing sofa");
        assert_eq!(notifications.items.len(), 2);

        // Not yet expired
        notifications.tick(NOTICE_SECS - 0.5);
        assert_eq!(notifications.items.len(), 2);

        // Past the interval
        notifications.tick(1.0);
        assert!(notifications.items.is_empty());
    }
}
