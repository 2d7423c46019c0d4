use crate::theme::{self, spacing};
use codeviz_core::validate_repo_url;
use eframe::egui;
use egui_phosphor::regular as ph;

pub enum WelcomeAction {
    /// Submit this URL for analysis. Already validated locally.
    Analyze(String),
}

/// Landing screen: repository URL input with local validation and the
/// recently analyzed list.
pub struct WelcomeScreen {
    url: String,
    error: Option<String>,
}

impl WelcomeScreen {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            error: None,
        }
    }

    /// Surface a backend failure inline (e.g. analysis rejected).
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, recent_repos: &[String]) -> Option<WelcomeAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.heading(
                egui::RichText::new("CodeViz")
                    .size(40.0)
                    .strong()
                    .color(ui.visuals().selection.bg_fill),
            );
            ui.label(
                egui::RichText::new("Understand any codebase, visually")
                    .color(ui.visuals().text_color()),
            );
            ui.add_space(spacing::SECTION_SPACING);

            theme::card(ui, |ui| {
                ui.set_width(420.0);
                ui.label(egui::RichText::new("Analyze a repository").strong());
                ui.add_space(spacing::ITEM_SPACING);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.url)
                        .hint_text("https://github.com/username/repository")
                        .desired_width(f32::INFINITY),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(spacing::ITEM_SPACING);
                let clicked = ui
                    .add(theme::primary_button(ui, "Analyze Repository").min_size(egui::vec2(200.0, 32.0)))
                    .clicked();

                if clicked || submitted {
                    match validate_repo_url(&self.url) {
                        Ok(()) => {
                            self.error = None;
                            action = Some(WelcomeAction::Analyze(self.url.trim().to_string()));
                        }
                        Err(err) => self.error = Some(err.to_string()),
                    }
                }

                if let Some(error) = &self.error {
                    ui.add_space(spacing::ITEM_SPACING);
                    theme::error_box(ui, error);
                }
            });

            ui.add_space(spacing::SECTION_SPACING);

            theme::card(ui, |ui| {
                ui.set_width(420.0);
                ui.label(egui::RichText::new("Recent repositories").strong());
                ui.add_space(spacing::ITEM_SPACING);

                if recent_repos.is_empty() {
                    theme::empty_state(
                        ui,
                        ph::CLOCK_COUNTER_CLOCKWISE,
                        "Nothing analyzed yet",
                        "Analyzed repositories will show up here",
                    );
                } else {
                    for url in recent_repos {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(ph::GIT_BRANCH)
                                    .color(ui.visuals().selection.bg_fill),
                            );
                            if ui.link(url).clicked() {
                                self.url = url.clone();
                                self.error = None;
                                action = Some(WelcomeAction::Analyze(url.clone()));
                            }
                        });
                    }
                }
            });
        });

        action
    }
}
