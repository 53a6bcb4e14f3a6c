use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

use crate::workspace::pane::Role;

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent_primary: Color32,
    pub accent_soft: Color32,
    pub danger: Color32,
    pub warning: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0xF2, 0xF3, 0xF5),
            surface_1: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            surface_2: Color32::from_rgb(0xF7, 0xF8, 0xFA),
            accent_primary: Color32::from_rgb(0x16, 0x5D, 0xFF),
            accent_soft: Color32::from_rgb(0xE8, 0xF3, 0xFF),
            danger: Color32::from_rgb(0xF5, 0x3F, 0x3F),
            warning: Color32::from_rgb(0xFF, 0x7D, 0x00),
            text_primary: Color32::from_rgb(0x1D, 0x21, 0x29),
            text_muted: Color32::from_rgb(0x86, 0x90, 0x9C),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgb(0xE5, 0xE6, 0xEB),
            user_bubble: Color32::from_rgb(0xE8, 0xF3, 0xFF),
            assistant_bubble: Color32::from_rgb(0xF7, 0xF8, 0xFA),
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            radius_8: 8,
            radius_12: 12,
            button_height: 32.0,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface_1;
        visuals.window_fill = self.surface_1;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.hovered.bg_fill = self.accent_soft;
        visuals.widgets.active.bg_fill = self.accent_primary;
        visuals.widgets.active.fg_stroke.color = self.text_on_accent;
        visuals.selection.bg_fill = self.accent_primary;
        visuals.selection.stroke.color = self.text_on_accent;
        visuals.window_corner_radius = CornerRadius::same(self.radius_12);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(18.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn bubble_frame(&self, role: Role) -> Frame {
        let fill = match role {
            Role::User => self.user_bubble,
            Role::Assistant => self.assistant_bubble,
        };
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_2)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn highlight_frame(&self, active: bool) -> Frame {
        let stroke = if active {
            Stroke::new(1.5, self.danger)
        } else {
            Stroke::NONE
        };
        Frame::new()
            .inner_margin(Margin::same(2))
            .corner_radius(CornerRadius::same(self.radius_8))
            .stroke(stroke)
    }
}
