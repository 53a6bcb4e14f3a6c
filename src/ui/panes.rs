use crate::theme::Theme;
use crate::workspace::pane::{Message, PaneState, Role};
use crate::workspace::ports::{RenderFrame, Renderer};
use crate::workspace::visibility::welcome_title;
use crate::workspace::Engine;
use eframe::egui::{self, RichText, ScrollArea};

/// Draws the conversation panes side by side.
pub struct PaneView<'a> {
    ui: &'a mut egui::Ui,
    theme: &'a Theme,
}

impl<'a> PaneView<'a> {
    pub fn new(ui: &'a mut egui::Ui, theme: &'a Theme) -> Self {
        Self { ui, theme }
    }
}

impl Renderer for PaneView<'_> {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let theme = self.theme;
        let engine = frame.engine;
        let model = frame.model_display_name.as_str();

        if frame.panes.len() == 1 {
            show_pane(self.ui, theme, engine, model, &frame.panes[0]);
            return;
        }

        self.ui.columns(frame.panes.len(), |columns| {
            for (column, pane) in columns.iter_mut().zip(frame.panes) {
                show_pane(column, theme, engine, model, pane);
            }
        });
    }
}

fn show_pane(ui: &mut egui::Ui, theme: &Theme, engine: Engine, model: &str, pane: &PaneState) {
    theme.card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.strong(format!("Pane {}", pane.side().as_str()));
            ui.label(RichText::new(model).color(theme.text_muted).small());
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt(("pane_transcript", pane.side().as_str()))
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if pane.welcome_visible() {
                    ui.add_space(theme.spacing_16);
                    ui.vertical_centered(|ui| {
                        ui.heading(welcome_title(engine, pane.side()));
                    });
                    return;
                }

                for message in pane.transcript() {
                    show_message(ui, theme, message);
                    ui.add_space(theme.spacing_8);
                }
            });
    });
}

fn show_message(ui: &mut egui::Ui, theme: &Theme, message: &Message) {
    let layout = match message.role {
        Role::User => egui::Layout::right_to_left(egui::Align::TOP),
        Role::Assistant => egui::Layout::left_to_right(egui::Align::TOP),
    };

    ui.with_layout(layout, |ui| {
        theme.bubble_frame(message.role).show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.8);
            if message.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Generating...").color(theme.text_muted));
                });
                return;
            }

            ui.vertical(|ui| {
                if let Some(bundle) = message.attachments() {
                    ui.horizontal_wrapped(|ui| {
                        for asset in bundle.assets() {
                            ui.label(
                                RichText::new(format!(
                                    "[{}] {}",
                                    asset.source.kind.as_str(),
                                    asset.source.name
                                ))
                                .color(theme.accent_primary)
                                .small(),
                            )
                            .on_hover_text(asset.preview_uri());
                        }
                    });
                }
                if !message.text.is_empty() {
                    ui.label(message.text.as_str());
                }
                if let Some(media) = &message.media {
                    ui.label(RichText::new(media).color(theme.text_muted).small());
                }
            });
        });
    });
}
