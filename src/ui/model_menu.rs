use crate::theme::Theme;
use crate::ui::event::UiEvent;
use crate::workspace::menu::{versions_for, ModelMenu, BRANDS, ENDPOINTS};
use eframe::egui::{self, RichText};

/// Three-column brand / version / endpoint picker. Only the endpoint column
/// commits.
pub fn show(ctx: &egui::Context, theme: &Theme, menu: &ModelMenu, events: &mut Vec<UiEvent>) {
    let Some(draft_brand) = menu.draft_brand() else {
        return;
    };
    let draft_version = menu.draft_version();

    let mut open = true;
    egui::Window::new("Select model")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 64.0))
        .show(ctx, |ui| {
            ui.horizontal_top(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("Brand").color(theme.text_muted).small());
                    for brand in BRANDS {
                        if ui
                            .selectable_label(brand.name == draft_brand, brand.name)
                            .clicked()
                        {
                            events.push(UiEvent::ChooseBrand(brand.name.to_string()));
                        }
                    }
                });
                ui.separator();

                ui.vertical(|ui| {
                    ui.label(RichText::new("Version").color(theme.text_muted).small());
                    for version in versions_for(draft_brand).unwrap_or_default() {
                        if ui
                            .selectable_label(draft_version == Some(*version), *version)
                            .clicked()
                        {
                            events.push(UiEvent::ChooseVersion(version.to_string()));
                        }
                    }
                });
                ui.separator();

                ui.vertical(|ui| {
                    ui.label(RichText::new("Endpoint").color(theme.text_muted).small());
                    for endpoint in ENDPOINTS {
                        let button = ui.add_enabled(
                            draft_version.is_some(),
                            egui::Button::new(*endpoint).min_size(egui::vec2(96.0, 0.0)),
                        );
                        if button.clicked() {
                            events.push(UiEvent::ChooseEndpoint(endpoint.to_string()));
                        }
                    }
                });
            });
        });

    if !open {
        events.push(UiEvent::ToggleModelMenu);
    }
}
