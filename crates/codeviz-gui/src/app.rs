use crate::components::{
    chat_panel::{ChatAction, ChatPanel},
    code_preview::CodePreviewPanel,
    graph_canvas::GraphCanvas,
    search_bar::{SearchAction, SearchBar},
    status_bar::StatusBar,
    welcome::{WelcomeAction, WelcomeScreen},
};
use crate::settings::AppSettings;
use crate::theme;
use crate::worker::{FetchWorker, WorkRequest, WorkResult};
use codeviz_api::HttpBackend;
use codeviz_core::RepoId;
use codeviz_events::{Event, EventBus, EventListener};
use codeviz_view::{ChatSession, CodePreview, CodePreviewResolver, GraphView, SearchCoordinator};
use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

enum Screen {
    Welcome,
    Analyzing,
    LoadingGraph,
    LoadFailed(String),
    Graph,
}

pub struct CodeVizApp {
    settings: AppSettings,
    event_bus: EventBus,
    worker: Option<FetchWorker>,
    screen: Screen,

    // Per-repository state
    repo_id: Option<RepoId>,
    resolver: Option<CodePreviewResolver>,

    // View-state coordinators
    view: GraphView,
    search: SearchCoordinator,
    chat: ChatSession,

    // Components
    welcome: WelcomeScreen,
    canvas: GraphCanvas,
    search_bar: SearchBar,
    chat_panel: ChatPanel,
    preview_panel: CodePreviewPanel,
    status_bar: StatusBar,
}

impl CodeVizApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();
        theme::apply(&cc.egui_ctx);
        cc.egui_ctx.set_pixels_per_point(settings.ui_scale);

        let event_bus = EventBus::new();
        let worker = match HttpBackend::new(&settings.backend_url) {
            Ok(backend) => Some(FetchWorker::new(Arc::new(backend), cc.egui_ctx.clone())),
            Err(err) => {
                tracing::error!(error = %err, "failed to construct backend client");
                event_bus.publish(Event::ShowError {
                    message: err.message,
                });
                None
            }
        };

        Self {
            settings,
            event_bus,
            worker,
            screen: Screen::Welcome,
            repo_id: None,
            resolver: None,
            view: GraphView::new(),
            search: SearchCoordinator::new(),
            chat: ChatSession::new(),
            welcome: WelcomeScreen::new(),
            canvas: GraphCanvas::new(),
            search_bar: SearchBar::new(),
            chat_panel: ChatPanel::new(),
            preview_panel: CodePreviewPanel::new(),
            status_bar: StatusBar::new(),
        }
    }

    fn submit(&self, request: WorkRequest) {
        if let Some(worker) = &self.worker {
            worker.submit(request);
        }
    }

    /// Route fetch completions into the coordinators. Staleness is decided
    /// by the tags they carry, never by arrival order.
    fn process_results(&mut self, ctx: &egui::Context) {
        let results = match &self.worker {
            Some(worker) => worker.try_results(),
            None => Vec::new(),
        };

        for result in results {
            match result {
                WorkResult::Analyzed(Ok(response)) => {
                    tracing::info!(
                        repo_id = %response.repo_id,
                        nodes = response.node_count,
                        "analysis complete"
                    );
                    let repo_id = RepoId(response.repo_id);
                    self.resolver = Some(CodePreviewResolver::new(repo_id.clone()));
                    self.repo_id = Some(repo_id.clone());
                    self.screen = Screen::LoadingGraph;
                    self.event_bus.publish(Event::StatusUpdate {
                        message: format!("Analysis complete: {} nodes.", response.node_count),
                    });
                    self.submit(WorkRequest::LoadGraph { repo_id });
                }
                WorkResult::Analyzed(Err(err)) => {
                    self.screen = Screen::Welcome;
                    self.welcome.set_error(err.message.clone());
                    self.event_bus.publish(Event::ShowError {
                        message: err.message,
                    });
                }
                WorkResult::Graph(Ok(response)) => {
                    let data = response.into_graph_data();
                    let node_count = data.nodes.len();
                    self.view
                        .on_graph_loaded(data.nodes, data.edges, ctx.screen_rect().width());
                    self.canvas.reset_view();
                    self.screen = Screen::Graph;
                    self.event_bus.publish(Event::GraphLoaded {
                        node_count,
                        edge_count: self.view.edges().len(),
                    });
                }
                WorkResult::Graph(Err(err)) => {
                    self.screen = Screen::LoadFailed(err.message.clone());
                    self.event_bus.publish(Event::GraphLoadFailed {
                        error: err.message,
                    });
                }
                WorkResult::Explained { generation, result } => {
                    if let Err(err) = &result {
                        self.event_bus.publish(Event::ExplanationFailed {
                            error: err.message.clone(),
                        });
                    }
                    self.view.apply_explanation(generation, result);
                }
                WorkResult::SearchDone { seq, query, result } => {
                    match &result {
                        Ok(response) => self.event_bus.publish(Event::SearchCompleted {
                            query: query.clone(),
                            result_count: response.results.len(),
                        }),
                        Err(err) => self.event_bus.publish(Event::SearchFailed {
                            error: err.message.clone(),
                        }),
                    }
                    self.search
                        .apply_results(seq, result.map(|response| response.results));
                }
                WorkResult::ChatDone { seq, result } => {
                    self.chat.apply_response(seq, result);
                }
            }
        }
    }

    /// Drive the search debounce window.
    fn poll_search(&mut self, ctx: &egui::Context) {
        if let Some(ticket) = self.search.poll(Instant::now()) {
            if let Some(repo_id) = &self.repo_id {
                self.submit(WorkRequest::Search {
                    repo_id: repo_id.clone(),
                    ticket,
                });
            }
        }
        if self.search.has_pending_deadline() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    fn process_events(&mut self) {
        let receiver = self.event_bus.receiver();
        while let Ok(event) = receiver.try_recv() {
            self.status_bar.handle_event(&event);
            match event {
                Event::ActivateNode { id } => {
                    if let Some(ticket) = self.view.select_node(&id) {
                        if let Some(resolver) = &self.resolver {
                            self.submit(WorkRequest::Explain(resolver.request_for(&ticket)));
                        }
                    }
                }
                Event::ActivateReference {
                    file,
                    start_line,
                    end_line,
                } => {
                    self.view.select_reference(&file, start_line, end_line);
                }
                _ => {}
            }
        }
    }

    fn show_welcome(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(WelcomeAction::Analyze(url)) =
                self.welcome.ui(ui, &self.settings.recent_repos)
            {
                self.settings.remember_repo(&url);
                if let Err(err) = self.settings.save() {
                    tracing::warn!(error = %err, "could not persist settings");
                }
                self.screen = Screen::Analyzing;
                self.event_bus.publish(Event::StatusUpdate {
                    message: format!("Analyzing {url}..."),
                });
                self.submit(WorkRequest::Analyze { url });
            }
        });
    }

    fn show_load_failed(&mut self, ctx: &egui::Context, message: String) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.35);
                theme::error_box(ui, &message);
                ui.add_space(theme::spacing::ITEM_SPACING);
                ui.horizontal(|ui| {
                    if ui.add(theme::primary_button(ui, "Retry")).clicked() {
                        if let Some(repo_id) = self.repo_id.clone() {
                            self.screen = Screen::LoadingGraph;
                            self.submit(WorkRequest::LoadGraph { repo_id });
                        }
                    }
                    if ui.button("Back").clicked() {
                        self.screen = Screen::Welcome;
                    }
                });
            });
        });
    }

    fn show_graph(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("graph_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Codebase Graph");
                theme::badge(
                    ui,
                    &format!("{} nodes", self.view.node_count()),
                    ui.visuals().faint_bg_color,
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let chat_button = if self.view.show_chat() {
                        theme::primary_button(ui, "Chat")
                    } else {
                        egui::Button::new("Chat")
                    };
                    if ui.add(chat_button).clicked() {
                        let visible = self.view.toggle_chat_panel();
                        self.event_bus.publish(Event::ChatPanelToggled { visible });
                    }

                    self.search_bar.sync_query(self.search.query());
                    match self.search_bar.ui(ui, &self.search) {
                        SearchAction::QueryChanged(query) => {
                            self.search.on_query_changed(&query, Instant::now());
                        }
                        SearchAction::SelectHit(hit) => {
                            self.search.on_hit_selected();
                            self.view.select_search_hit(&hit);
                            self.event_bus.publish(Event::StatusUpdate {
                                message: format!("Jumped to {}.", hit.name),
                            });
                        }
                        SearchAction::Dismiss => self.search.close_panel(),
                        SearchAction::None => {}
                    }
                });
            });
        });

        if self.view.show_chat() {
            egui::SidePanel::right("chat_panel")
                .default_width(320.0)
                .show(ctx, |ui| {
                    match self.chat_panel.ui(ui, &mut self.chat) {
                        ChatAction::Send(message) => {
                            if let Some(repo_id) = self.repo_id.clone() {
                                match self.chat.send(&message) {
                                    Ok(ticket) => {
                                        self.submit(WorkRequest::Chat { repo_id, ticket })
                                    }
                                    Err(err) => {
                                        tracing::debug!(error = %err, "chat send rejected")
                                    }
                                }
                            }
                        }
                        ChatAction::OpenReference {
                            file,
                            start_line,
                            end_line,
                        } => {
                            self.event_bus.publish(Event::ActivateReference {
                                file,
                                start_line,
                                end_line,
                            });
                            ctx.request_repaint();
                        }
                        ChatAction::None => {}
                    }
                });
        }

        let preview = self.view.selection().map(|selection| {
            CodePreview::for_selection(
                selection,
                self.view.explanation(),
                self.view.preview_code(),
            )
        });
        if let Some(preview) = preview {
            let mut close_clicked = false;
            egui::SidePanel::right("code_preview_panel")
                .default_width(380.0)
                .show(ctx, |ui| {
                    close_clicked = self.preview_panel.ui(ui, &preview);
                });
            if close_clicked {
                self.view.clear_selection();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let output = self.canvas.show(
                ui,
                rect,
                self.view.positioned_nodes(),
                self.view.edges(),
                self.view.selection().map(|selection| &selection.id),
            );
            if let Some(id) = output.clicked_node {
                self.event_bus.publish(Event::ActivateNode { id });
                ctx.request_repaint();
            }
        });
    }
}

impl eframe::App for CodeVizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_results(ctx);
        self.poll_search(ctx);
        self.process_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar.ui(ui);
        });

        match &self.screen {
            Screen::Welcome => self.show_welcome(ctx),
            Screen::Analyzing => spinner_screen(ctx, "Analyzing repository..."),
            Screen::LoadingGraph => spinner_screen(ctx, "Loading graph..."),
            Screen::LoadFailed(message) => {
                let message = message.clone();
                self.show_load_failed(ctx, message);
            }
            Screen::Graph => self.show_graph(ctx),
        }
    }
}

fn spinner_screen(ctx: &egui::Context, message: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.4);
            ui.spinner();
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.label(egui::RichText::new(message).color(ui.visuals().weak_text_color()));
        });
    });
}
