use crate::theme::Theme;
use crate::ui::event::UiEvent;
use crate::workspace::controller::WorkspaceController;
use crate::workspace::gate::Highlight;
use crate::workspace::settings::{
    AspectRatio, Resolution, VideoDuration, VisualSetting,
};
use crate::workspace::uploads::MediaKind;
use crate::workspace::visibility::{composer_placeholder, ToolGroup, Visibility};
use eframe::egui::{self, RichText};
use std::time::Instant;

/// Largest count offered in the image count menu.
const IMAGE_COUNT_CHOICES: u32 = 4;

/// Upload zone, prompt box, tool footer and send button.
pub fn show(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &WorkspaceController,
    prompt_buffer: &mut String,
    now: Instant,
    events: &mut Vec<UiEvent>,
) {
    let visibility = controller.derived_visibility();

    theme.composer_frame().show(ui, |ui| {
        if visibility.show_upload_zone {
            theme
                .highlight_frame(controller.highlighted(Highlight::UploadZone, now))
                .show(ui, |ui| upload_zone(ui, theme, controller, &visibility, events));
            ui.add_space(theme.spacing_4);
        }
        if visibility.show_video_frame_zones {
            frame_zones(ui, theme, controller, events);
            ui.add_space(theme.spacing_4);
        }

        let placeholder = composer_placeholder(controller.engine(), controller.visual_tab());
        let response = theme
            .highlight_frame(controller.highlighted(Highlight::Prompt, now))
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(prompt_buffer)
                        .id_salt("composer_prompt")
                        .hint_text(RichText::new(placeholder).color(theme.text_muted))
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                )
            })
            .inner;
        if response.changed() {
            events.push(UiEvent::PromptEdited(prompt_buffer.clone()));
        }
        let submit_shortcut = response.has_focus()
            && ui.input(|input| input.key_pressed(egui::Key::Enter) && input.modifiers.command);

        ui.horizontal(|ui| {
            tool_group(ui, controller, visibility.visible_tool_group, events);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = controller.send_control_enabled();
                let button = egui::Button::new(RichText::new("Send").color(theme.text_on_accent))
                    .fill(theme.accent_primary)
                    .min_size(egui::vec2(72.0, theme.button_height));
                let clicked = ui.add_enabled(enabled, button).clicked();
                if clicked || (submit_shortcut && enabled) {
                    events.push(UiEvent::Send);
                }
                if controller.any_pending() {
                    ui.spinner();
                }
            });
        });
    });
}

fn upload_zone(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &WorkspaceController,
    visibility: &Visibility,
    events: &mut Vec<UiEvent>,
) {
    let uploads = controller.uploads();
    theme.card_frame().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            if visibility.image_gen_upload_style {
                ui.label(RichText::new("Reference images").strong());
            }
            if ui.button("Add image").clicked() {
                events.push(UiEvent::RequestFiles(MediaKind::Image));
            }
            if visibility.show_video_upload_option && ui.button("Add video").clicked() {
                events.push(UiEvent::RequestFiles(MediaKind::Video));
            }
            match uploads.hint() {
                Some(hint) => {
                    ui.label(RichText::new(hint).color(theme.text_muted));
                    if ui.small_button("Clear").clicked() {
                        events.push(UiEvent::ClearUploads);
                    }
                }
                None => {
                    ui.label(RichText::new("Attach up to 9 files").color(theme.text_muted));
                }
            }
        });

        if uploads.is_empty() {
            return;
        }
        ui.horizontal_wrapped(|ui| {
            for (index, asset) in uploads.assets().iter().enumerate() {
                egui::Frame::new()
                    .fill(theme.accent_soft)
                    .corner_radius(egui::CornerRadius::same(theme.radius_8))
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(asset.source.name.as_str())
                                .on_hover_text(asset.preview_uri());
                            if ui.small_button("x").clicked() {
                                events.push(UiEvent::RemoveUpload(index));
                            }
                        });
                    });
            }
        });
    });
}

/// Start and end frame pickers. Each zone holds the upload at its index; an
/// empty zone opens a single-image pick.
fn frame_zones(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &WorkspaceController,
    events: &mut Vec<UiEvent>,
) {
    let assets = controller.uploads().assets();
    ui.horizontal(|ui| {
        for (index, label) in ["First frame", "Last frame"].into_iter().enumerate() {
            egui::Frame::new()
                .fill(theme.surface_0)
                .stroke(egui::Stroke::new(1.0, theme.border_subtle))
                .corner_radius(egui::CornerRadius::same(theme.radius_8))
                .inner_margin(egui::Margin::same(theme.spacing_12 as i8))
                .show(ui, |ui| match assets.get(index) {
                    Some(asset) => {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(label).color(theme.text_muted));
                            ui.label(asset.source.name.as_str())
                                .on_hover_text(asset.preview_uri());
                            if ui.small_button("x").clicked() {
                                events.push(UiEvent::RemoveUpload(index));
                            }
                        });
                    }
                    None => {
                        let button = egui::Button::new(RichText::new(label).color(theme.text_muted))
                            .frame(false);
                        let next_slot = index == assets.len();
                        if ui.add_enabled(next_slot, button).clicked() {
                            events.push(UiEvent::RequestFiles(MediaKind::Image));
                        }
                    }
                });
        }
    });
}

fn tool_group(
    ui: &mut egui::Ui,
    controller: &WorkspaceController,
    group: ToolGroup,
    events: &mut Vec<UiEvent>,
) {
    let settings = controller.visual_settings();
    match group {
        ToolGroup::Text | ToolGroup::Understanding => {
            if ui.button(controller.model().display_name()).clicked() {
                events.push(UiEvent::ToggleModelMenu);
            }
        }
        ToolGroup::ImageGen => {
            let mut ratio = settings.ratio;
            egui::ComboBox::from_id_salt("image_ratio")
                .selected_text(ratio.as_str())
                .show_ui(ui, |ui| {
                    for option in AspectRatio::ALL {
                        ui.selectable_value(&mut ratio, option, option.as_str());
                    }
                });
            if ratio != settings.ratio {
                events.push(UiEvent::UpdateSetting(VisualSetting::Ratio(ratio)));
            }

            let mut count = settings.count;
            egui::ComboBox::from_id_salt("image_count")
                .selected_text(format!("{count} image(s)"))
                .show_ui(ui, |ui| {
                    for option in 1..=IMAGE_COUNT_CHOICES {
                        ui.selectable_value(&mut count, option, option.to_string());
                    }
                });
            if count != settings.count {
                events.push(UiEvent::UpdateSetting(VisualSetting::Count(count)));
            }
        }
        ToolGroup::VideoGen => {
            let mut duration = settings.duration;
            egui::ComboBox::from_id_salt("video_duration")
                .selected_text(duration.as_str())
                .show_ui(ui, |ui| {
                    for option in VideoDuration::ALL {
                        ui.selectable_value(&mut duration, option, option.as_str());
                    }
                });
            if duration != settings.duration {
                events.push(UiEvent::UpdateSetting(VisualSetting::Duration(duration)));
            }

            let mut resolution = settings.resolution;
            egui::ComboBox::from_id_salt("video_resolution")
                .selected_text(resolution.as_str())
                .show_ui(ui, |ui| {
                    for option in Resolution::ALL {
                        ui.selectable_value(&mut resolution, option, option.as_str());
                    }
                });
            if resolution != settings.resolution {
                events.push(UiEvent::UpdateSetting(VisualSetting::Resolution(resolution)));
            }

            let mut smart_rewrite = settings.smart_rewrite;
            if ui.checkbox(&mut smart_rewrite, "Smart rewrite").changed() {
                events.push(UiEvent::UpdateSetting(VisualSetting::SmartRewrite(
                    smart_rewrite,
                )));
            }
        }
    }
}
