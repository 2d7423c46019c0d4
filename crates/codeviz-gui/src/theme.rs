//! Visual constants and small styled widgets shared by the components.

use eframe::egui::{self, Color32};
use egui_phosphor::regular as ph;

pub mod spacing {
    pub const PANEL_PADDING_I8: i8 = 12;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
}

pub mod radius {
    use eframe::egui::CornerRadius;

    pub const MEDIUM: CornerRadius = CornerRadius::same(4);
    pub const LARGE: CornerRadius = CornerRadius::same(8);
    pub const PILL: CornerRadius = CornerRadius::same(255);
}

/// Apply the application theme and register the icon font.
pub fn apply(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
    catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA);
}

pub fn to_color32(color: codeviz_view::Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

pub fn primary_button(ui: &egui::Ui, text: &str) -> egui::Button<'static> {
    let color = ui.visuals().selection.bg_fill;
    let text_color = ui.visuals().strong_text_color();
    egui::Button::new(egui::RichText::new(text).color(text_color)).fill(color)
}

/// Badge component for counts or status
pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    let frame = egui::Frame::default()
        .fill(color)
        .corner_radius(radius::PILL)
        .inner_margin(egui::Margin::symmetric(6, 2));

    frame.show(ui, |ui| {
        ui.label(
            egui::RichText::new(text)
                .small()
                .color(ui.visuals().strong_text_color()),
        );
    });
}

/// Card container with elevation effect - theme-aware
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    let frame = egui::Frame::default()
        .fill(ui.visuals().window_fill)
        .corner_radius(radius::LARGE)
        .inner_margin(egui::Margin::same(spacing::PANEL_PADDING_I8))
        .stroke(ui.visuals().window_stroke);

    frame.show(ui, |ui| {
        add_contents(ui);
    });
}

/// Error box with icon
pub fn error_box(ui: &mut egui::Ui, message: &str) {
    let fg = ui.visuals().error_fg_color;
    let bg = fg.gamma_multiply(0.2);

    let frame = egui::Frame::default()
        .fill(bg)
        .corner_radius(radius::MEDIUM)
        .inner_margin(egui::Margin::same(8));

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(ph::X_CIRCLE).color(fg));
            ui.label(message);
        });
    });
}

/// Empty state placeholder
pub fn empty_state(ui: &mut egui::Ui, icon: &str, title: &str, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(spacing::SECTION_SPACING);
        ui.label(
            egui::RichText::new(icon)
                .size(48.0)
                .color(ui.visuals().weak_text_color()),
        );
        ui.add_space(spacing::ITEM_SPACING);
        ui.label(egui::RichText::new(title).strong());
        ui.label(egui::RichText::new(message).color(ui.visuals().text_color()));
        ui.add_space(spacing::SECTION_SPACING);
    });
}
