use crate::theme;
use codeviz_view::CodePreview;
use eframe::egui;
use egui_phosphor::regular as ph;

/// Source preview for the selected symbol: file header, line-numbered code
/// body, and the AI explanation section.
pub struct CodePreviewPanel;

impl CodePreviewPanel {
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` when the close button was clicked.
    pub fn ui(&mut self, ui: &mut egui::Ui, preview: &CodePreview) -> bool {
        let mut close_clicked = false;

        ui.vertical(|ui| {
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&preview.file_name).strong());
                if let (Some(start), Some(end)) = (preview.start_line, preview.end_line) {
                    ui.label(
                        egui::RichText::new(format!("Lines {start}-{end}"))
                            .small()
                            .color(ui.visuals().weak_text_color()),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(ph::X).on_hover_text("Close preview").clicked() {
                        close_clicked = true;
                    }
                });
            });
            ui.separator();

            let explanation_height = 140.0;
            egui::ScrollArea::vertical()
                .id_salt("code_preview_body")
                .auto_shrink([false, false])
                .max_height(ui.available_height() - explanation_height)
                .show(ui, |ui| {
                    let first_line = preview.first_line();
                    for (offset, line) in preview.code.lines().enumerate() {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(format!("{:>4}", first_line + offset as u32))
                                    .monospace()
                                    .color(ui.visuals().weak_text_color()),
                            );
                            ui.label(egui::RichText::new(line).monospace());
                        });
                    }
                });

            ui.separator();
            ui.label(
                egui::RichText::new("AI Explanation")
                    .strong()
                    .color(ui.visuals().selection.bg_fill),
            );
            ui.add_space(4.0);
            if preview.explanation_pending {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Generating explanation...")
                            .small()
                            .color(ui.visuals().weak_text_color()),
                    );
                });
            } else if let Some(explanation) = &preview.explanation {
                egui::ScrollArea::vertical()
                    .id_salt("code_preview_explanation")
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        ui.label(explanation);
                    });
            } else {
                ui.label(
                    egui::RichText::new("No explanation for this selection.")
                        .small()
                        .color(ui.visuals().weak_text_color()),
                );
            }
        });

        close_clicked
    }
}
