use codeviz_api::SearchHit;
use codeviz_view::SearchCoordinator;
use eframe::egui;
use egui_phosphor::regular as ph;

/// Actions that can result from search bar interaction
#[derive(Debug, Clone)]
pub enum SearchAction {
    /// No action
    None,
    /// The query text changed; the coordinator restarts its debounce.
    QueryChanged(String),
    /// User selected a result from the dropdown
    SelectHit(SearchHit),
    /// Focus left the search control (outside click or escape).
    Dismiss,
}

/// Search input with a results dropdown. All search state (debounce, the
/// result list, staleness) lives in the [`SearchCoordinator`]; this widget
/// only renders it and reports interactions.
pub struct SearchBar {
    input: String,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            input: String::new(),
        }
    }

    /// Keep the text box in sync when the coordinator resets the query
    /// (e.g. after a hit was selected).
    pub fn sync_query(&mut self, query: &str) {
        if self.input != query {
            self.input = query.to_string();
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, search: &SearchCoordinator) -> SearchAction {
        let mut action = SearchAction::None;

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(ph::MAGNIFYING_GLASS).color(ui.visuals().selection.bg_fill));

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("Search functions, classes...")
                    .desired_width(260.0),
            );

            if response.changed() {
                action = SearchAction::QueryChanged(self.input.clone());
            }
            if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                action = SearchAction::Dismiss;
            }

            if search.is_loading() {
                ui.spinner();
            }

            if search.panel_open() {
                if let Some(selected) = self.render_dropdown(ui.ctx(), response.rect, search) {
                    action = SearchAction::SelectHit(selected);
                } else if clicked_outside(ui.ctx(), response.rect) {
                    action = SearchAction::Dismiss;
                }
            }
        });

        action
    }

    fn render_dropdown(
        &self,
        ctx: &egui::Context,
        input_rect: egui::Rect,
        search: &SearchCoordinator,
    ) -> Option<SearchHit> {
        let mut selected = None;

        egui::Area::new("search_results_area".into())
            .fixed_pos(input_rect.left_bottom() + egui::vec2(0.0, 4.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(input_rect.width().max(320.0));
                    ui.set_max_height(320.0);

                    if search.is_loading() {
                        ui.label(
                            egui::RichText::new("Searching...")
                                .color(ui.visuals().weak_text_color()),
                        );
                        return;
                    }
                    if search.results().is_empty() {
                        ui.label(
                            egui::RichText::new("No results found")
                                .color(ui.visuals().weak_text_color()),
                        );
                        return;
                    }

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for (idx, hit) in search.results().iter().enumerate() {
                            if self.result_row(ui, idx, hit) {
                                selected = Some(hit.clone());
                            }
                        }
                    });
                });
            });

        selected
    }

    fn result_row(&self, ui: &mut egui::Ui, idx: usize, hit: &SearchHit) -> bool {
        let mut clicked = false;
        ui.push_id(idx, |ui| {
            let available_width = ui.available_width();
            let (rect, response) =
                ui.allocate_at_least(egui::vec2(available_width, 28.0), egui::Sense::click());

            let bg_color = if response.hovered() {
                ui.visuals().widgets.hovered.bg_fill
            } else {
                egui::Color32::TRANSPARENT
            };
            ui.painter().rect_filled(rect, 2.0, bg_color);

            let mut content_rect = rect;
            content_rect.min.x += 4.0;
            content_rect.max.x -= 4.0;
            let mut child_ui = ui.new_child(egui::UiBuilder::new().max_rect(content_rect));
            child_ui.horizontal_centered(|ui| {
                let kind_color = match hit.kind.as_str() {
                    "Function" => ui.visuals().warn_fg_color,
                    "Class" => ui.visuals().error_fg_color,
                    _ => egui::Color32::LIGHT_GREEN,
                };
                crate::theme::badge(ui, &hit.kind, kind_color.gamma_multiply(0.3));

                ui.label(egui::RichText::new(truncated(&hit.name, 30)).strong())
                    .on_hover_text(&hit.name);

                if let Some(path) = &hit.file_path {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(truncated_left(path, 42)).small().weak(),
                        )
                        .on_hover_text(path);
                    });
                }
            });

            if response.clicked() {
                clicked = true;
            }
        });
        clicked
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn truncated_left(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count > max {
        let kept: String = text.chars().skip(count - (max - 3)).collect();
        format!("...{kept}")
    } else {
        text.to_string()
    }
}

/// True when the primary button went down outside both the input box and
/// the dropdown area this frame.
fn clicked_outside(ctx: &egui::Context, input_rect: egui::Rect) -> bool {
    ctx.input(|i| {
        if !i.pointer.primary_pressed() {
            return false;
        }
        let Some(pos) = i.pointer.interact_pos() else {
            return false;
        };
        let dropdown_guard = egui::Rect::from_min_size(
            input_rect.left_bottom(),
            egui::vec2(input_rect.width().max(320.0), 340.0),
        );
        !input_rect.contains(pos) && !dropdown_guard.contains(pos)
    })
}
