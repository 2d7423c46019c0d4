use codeviz_events::{Event, EventListener};
use eframe::egui;

/// One-line status strip fed entirely by bus events.
pub struct StatusBar {
    message: String,
    is_error: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            message: "Ready.".to_string(),
            is_error: false,
        }
    }

    pub fn ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let color = if self.is_error {
                ui.visuals().error_fg_color
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(egui::RichText::new(&self.message).small().color(color));
        });
    }

    fn set(&mut self, message: impl Into<String>, is_error: bool) {
        self.message = message.into();
        self.is_error = is_error;
    }
}

impl EventListener for StatusBar {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::StatusUpdate { message } => self.set(message.clone(), false),
            Event::ShowError { message } => self.set(message.clone(), true),
            Event::GraphLoaded {
                node_count,
                edge_count,
            } => self.set(
                format!("Graph loaded: {node_count} nodes, {edge_count} edges."),
                false,
            ),
            Event::GraphLoadFailed { error } => self.set(error.clone(), true),
            Event::SearchCompleted {
                query,
                result_count,
            } => self.set(format!("{result_count} results for \"{query}\"."), false),
            Event::SearchFailed { error } => {
                // Search failures are silent in the results panel; the
                // status strip still records them for the curious.
                self.set(format!("Search failed: {error}"), false)
            }
            Event::ExplanationFailed { error } => self.set(error.clone(), true),
            Event::ChatPanelToggled { visible } => {
                let state = if *visible { "shown" } else { "hidden" };
                self.set(format!("Chat panel {state}."), false)
            }
            Event::ActivateNode { .. } | Event::ActivateReference { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_tracks_graph_and_error_events() {
        let mut bar = StatusBar::new();
        bar.handle_event(&Event::GraphLoaded {
            node_count: 12,
            edge_count: 9,
        });
        assert_eq!(bar.message, "Graph loaded: 12 nodes, 9 edges.");
        assert!(!bar.is_error);

        bar.handle_event(&Event::ShowError {
            message: "backend unreachable".to_string(),
        });
        assert!(bar.is_error);
    }
}
