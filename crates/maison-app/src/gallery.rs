//! Gallery rendering: catalog grid and sidebar model list
//!
//! Both presentations are pure functions of the catalog. Selection is a
//! single optional index, so selecting an item deselects everything else by
//! construction.

use bevy_egui::egui;
use maison_core::catalog::{category_icon, display_name, ModelDescriptor};

/// A display row derived from one catalog descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    /// Index into the catalog model list
    pub index: usize,
    /// Normalized display name
    pub label: String,
    /// Category icon
    pub icon: &'static str,
}

/// Build display items: exactly one per catalog descriptor
pub fn gallery_items(models: &[ModelDescriptor]) -> Vec<GalleryItem> {
    models
        .iter()
        .enumerate()
        .map(|(index, model)| GalleryItem {
            index,
            label: display_name(&model.filename),
            icon: category_icon(&model.category),
        })
        .collect()
}

/// Draw the gallery grid; returns the index clicked this frame, if any
pub fn gallery_grid(
    ui: &mut egui::Ui,
    items: &[GalleryItem],
    selected: &mut Option<usize>,
) -> Option<usize> {
    let mut clicked = None;

    ui.horizontal_wrapped(|ui| {
        for item in items {
            let is_selected = *selected == Some(item.index);
            let button = egui::Button::new(format!("{}\n{}", item.icon, item.label))
                .min_size(egui::vec2(110.0, 72.0))
                .selected(is_selected);
            if ui.add(button).clicked() {
                *selected = Some(item.index);
                clicked = Some(item.index);
            }
        }
    });

    clicked
}

/// Draw the sidebar model list; returns the index clicked this frame, if any
pub fn sidebar_list(
    ui: &mut egui::Ui,
    items: &[GalleryItem],
    selected: &mut Option<usize>,
) -> Option<usize> {
    let mut clicked = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in items {
            let is_selected = *selected == Some(item.index);
            if ui
                .selectable_label(is_selected, format!("{} {}", item.icon, item.label))
                .clicked()
            {
                *selected = Some(item.index);
                clicked = Some(item.index);
            }
        }
    });

    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(filename: &str, category: &str) -> ModelDescriptor {
        ModelDescriptor {
            filename: filename.to_string(),
            category: category.to_string(),
            url: format!("/models/{}", filename),
        }
    }

    #[test]
    fn test_one_item_per_model() {
        let models = vec![
            model("lounge_chair.glb", "seating"),
            model("arc_lamp.glb", "lighting"),
            model("mystery.glb", "artifacts"),
        ];
        let items = gallery_items(&models);
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].label, "lounge chair");
        assert_eq!(items[0].icon, "🛋");
        assert_eq!(items[1].icon, "💡");
        // Unknown category falls back to the default icon
        assert_eq!(items[2].icon, "📦");
    }

    #[test]
    fn test_empty_catalog_renders_nothing() {
        assert!(gallery_items(&[]).is_empty());
    }

    #[test]
    fn test_indices_track_catalog_order() {
        let models = vec![model("a.glb", "seating"), model("b.glb", "tables")];
        let items = gallery_items(&models);
        assert_eq!(items[0].index, 0);
        assert_eq!(items[1].index, 1);
    }
}
