use crate::theme;
use codeviz_core::Role;
use codeviz_view::ChatSession;
use eframe::egui;

/// Actions that can result from chat panel interaction
#[derive(Debug, Clone)]
pub enum ChatAction {
    None,
    /// Submit the given message.
    Send(String),
    /// A reference chip was clicked; jump to this location.
    OpenReference {
        file: String,
        start_line: u32,
        end_line: u32,
    },
}

/// Conversation panel. History, capacity, and single-flight gating live in
/// [`ChatSession`]; this widget renders the transcript and the composer.
pub struct ChatPanel {
    input: String,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            input: String::new(),
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut ChatSession) -> ChatAction {
        let mut action = ChatAction::None;

        ui.vertical(|ui| {
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.label(egui::RichText::new("Chat with AI").strong());
            ui.label(
                egui::RichText::new("Ask questions about the codebase")
                    .small()
                    .color(ui.visuals().weak_text_color()),
            );
            ui.separator();

            let composer_height = 48.0;
            let transcript_height = ui.available_height() - composer_height;

            // Any append requests a scroll to the latest turn; consuming the
            // flag schedules one more frame so stick-to-bottom can settle.
            if session.take_scroll_request() {
                ui.ctx().request_repaint();
            }

            egui::ScrollArea::vertical()
                .id_salt("chat_transcript")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .max_height(transcript_height)
                .show(ui, |ui| {
                    for message in session.messages() {
                        if let Some(reference) = render_message(ui, message) {
                            action = reference;
                        }
                        ui.add_space(theme::spacing::ITEM_SPACING);
                    }
                    if session.is_loading() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(
                                egui::RichText::new("Thinking...")
                                    .small()
                                    .color(ui.visuals().weak_text_color()),
                            );
                        });
                    }
                });

            ui.separator();
            let loading = session.is_loading();
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    !loading,
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text("Ask about the codebase...")
                        .desired_width(ui.available_width() - 64.0),
                );

                let submitted = response.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_send = !loading && !self.input.trim().is_empty();

                let send_clicked = ui
                    .add_enabled(can_send, theme::primary_button(ui, "Send"))
                    .clicked();

                if can_send && (submitted || send_clicked) {
                    action = ChatAction::Send(self.input.clone());
                    self.input.clear();
                    response.request_focus();
                }
            });
        });

        action
    }
}

/// Render one transcript bubble; returns an action if a reference chip was
/// clicked.
fn render_message(ui: &mut egui::Ui, message: &codeviz_core::ChatMessage) -> Option<ChatAction> {
    let mut action = None;
    let is_user = message.role == Role::User;

    let layout = if is_user {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        let fill = if is_user {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().faint_bg_color
        };
        egui::Frame::default()
            .fill(fill)
            .corner_radius(theme::radius::LARGE)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.85);
                ui.vertical(|ui| {
                    ui.label(&message.content);

                    if !message.references.is_empty() {
                        ui.add_space(4.0);
                        ui.horizontal_wrapped(|ui| {
                            for reference in &message.references {
                                let chip = format!(
                                    "{}:{}-{}",
                                    reference.file, reference.start_line, reference.end_line
                                );
                                if ui.small_button(chip).clicked() {
                                    action = Some(ChatAction::OpenReference {
                                        file: reference.file.clone(),
                                        start_line: reference.start_line,
                                        end_line: reference.end_line,
                                    });
                                }
                            }
                        });
                    }
                });
            });
    });

    action
}
