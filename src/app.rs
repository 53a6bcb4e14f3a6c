use crate::event::AppEvent;
use crate::theme::Theme;
use crate::ui::event::UiEvent;
use crate::ui::panes::PaneView;
use crate::ui::{composer, model_menu};
use crate::workspace::controller::{CompletionOutcome, Notice, NoticeLevel, WorkspaceController};
use crate::workspace::ports::FilePicker;
use crate::workspace::{Engine, VisualTab};
use eframe::egui::{self, RichText, ScrollArea};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const DIAGNOSTICS_CAPACITY: usize = 200;
const BANNER_DURATION: Duration = Duration::from_secs(4);
const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct StudioApp {
    rx: Receiver<AppEvent>,
    controller: WorkspaceController,
    picker: Box<dyn FilePicker>,
    theme: Theme,
    prompt_buffer: String,
    banner: Option<(Notice, Instant)>,
    diagnostics_log: VecDeque<String>,
}

impl StudioApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        controller: WorkspaceController,
        picker: Box<dyn FilePicker>,
        startup_warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            rx,
            controller,
            picker,
            theme: Theme::default(),
            prompt_buffer: String::new(),
            banner: None,
            diagnostics_log: VecDeque::with_capacity(DIAGNOSTICS_CAPACITY),
        };

        for warning in startup_warnings {
            app.log_diagnostic(format!("config warning: {warning}"));
        }

        app
    }

    pub fn install_theme(&self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        if self.diagnostics_log.len() == DIAGNOSTICS_CAPACITY {
            self.diagnostics_log.pop_front();
        }
        self.diagnostics_log
            .push_back(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::GenerationFinished { ticket, outcome } => {
                let failed = outcome.is_err();
                match self.controller.complete(ticket, outcome) {
                    CompletionOutcome::Applied => self.log_diagnostic(format!(
                        "generation finished pane={} seq={} failed={failed}",
                        ticket.side.as_str(),
                        ticket.seq
                    )),
                    CompletionOutcome::Discarded => self.log_diagnostic(format!(
                        "stale generation discarded pane={} seq={}",
                        ticket.side.as_str(),
                        ticket.seq
                    )),
                }
            }
            AppEvent::FilesPicked {
                kind,
                files,
                skipped,
            } => {
                if skipped > 0 {
                    self.log_diagnostic(format!(
                        "{skipped} picked file(s) skipped: not {}",
                        kind.as_str()
                    ));
                }
                if files.is_empty() {
                    return;
                }
                if !self.controller.accepts_pick(kind) {
                    tracing::debug!(kind = kind.as_str(), count = files.len(), "stale pick dropped");
                    self.log_diagnostic(format!(
                        "{} picked {} file(s) dropped: no longer accepted here",
                        files.len(),
                        kind.as_str()
                    ));
                    return;
                }
                match self.controller.add_uploads(files) {
                    Ok(result) => self.log_diagnostic(format!(
                        "uploads added accepted={} dropped={}",
                        result.accepted_count(),
                        result.dropped_count
                    )),
                    Err(err) => self.log_diagnostic(format!("upload rejected: {err}")),
                }
            }
        }
    }

    fn apply_ui_event(&mut self, event: UiEvent, now: Instant) {
        if event.is_loggable() {
            let line = event.to_log_line();
            tracing::debug!(event = %line, "ui event");
            self.log_diagnostic(line);
        }

        match event {
            UiEvent::SelectEngine(engine) => self.controller.select_engine(engine),
            UiEvent::SelectVisualTab(tab) => {
                self.controller.select_visual_tab(tab);
            }
            UiEvent::ToggleCompare => {
                self.controller.toggle_compare_mode();
            }
            UiEvent::ToggleDrawer => self.controller.toggle_drawer(),
            UiEvent::SelectApiKey(key) => self.controller.set_api_key(key),
            UiEvent::GenerateApiKey => {
                self.controller.generate_api_key();
            }
            UiEvent::NewConversation => self.controller.new_conversation(),
            UiEvent::ToggleModelMenu => self.controller.toggle_model_menu(),
            UiEvent::ChooseBrand(brand) => {
                if let Err(err) = self.controller.choose_brand(&brand) {
                    self.log_diagnostic(format!("model menu: {err}"));
                }
            }
            UiEvent::ChooseVersion(version) => {
                if let Err(err) = self.controller.choose_version(&version) {
                    self.log_diagnostic(format!("model menu: {err}"));
                }
            }
            UiEvent::ChooseEndpoint(endpoint) => {
                if let Err(err) = self.controller.choose_endpoint(&endpoint) {
                    self.log_diagnostic(format!("model menu: {err}"));
                }
            }
            UiEvent::UpdateSetting(setting) => {
                if let Err(err) = self.controller.update_visual_setting(setting) {
                    self.log_diagnostic(format!("setting rejected: {err}"));
                }
            }
            UiEvent::RequestFiles(kind) => {
                if !self.controller.request_files(kind, self.picker.as_ref()) {
                    self.log_diagnostic(format!("{} upload unavailable here", kind.as_str()));
                }
            }
            UiEvent::RemoveUpload(index) => {
                if let Err(err) = self.controller.remove_upload(index) {
                    self.log_diagnostic(format!("remove failed: {err}"));
                }
            }
            UiEvent::ClearUploads => self.controller.clear_uploads(),
            UiEvent::PromptEdited(text) => self.controller.set_prompt(text),
            UiEvent::Send => match self.controller.send(now) {
                Ok(tickets) => self.log_diagnostic(format!("sent to {} pane(s)", tickets.len())),
                Err(rejection) => self.log_diagnostic(format!("send rejected: {rejection}")),
            },
        }
    }

    fn collect_notices(&mut self, now: Instant) {
        for notice in self.controller.take_notices() {
            self.log_diagnostic(format!("notice: {}", notice.message));
            self.banner = Some((notice, now + BANNER_DURATION));
        }
        if self.banner.as_ref().is_some_and(|(_, until)| now >= *until) {
            self.banner = None;
        }

        let released = self.controller.ledger().drain_released();
        if !released.is_empty() {
            self.log_diagnostic(format!("released {} preview(s)", released.len()));
        }
    }

    fn render_top_bar(&self, ctx: &egui::Context, now: Instant, events: &mut Vec<UiEvent>) {
        let controller = &self.controller;
        let theme = &self.theme;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Studio");
                ui.separator();
                ui.label(RichText::new(controller.model().display_name()).color(theme.text_muted));
                ui.separator();

                theme
                    .highlight_frame(controller.api_key_highlighted(now))
                    .show(ui, |ui| {
                        let selected = controller
                            .api_key()
                            .filter(|key| !key.is_empty())
                            .unwrap_or("Select API key");
                        egui::ComboBox::from_id_salt("api_key")
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                for key in controller.known_api_keys() {
                                    let current = controller.api_key() == Some(key.as_str());
                                    if ui.selectable_label(current, key.as_str()).clicked() {
                                        events.push(UiEvent::SelectApiKey(key.clone()));
                                    }
                                }
                            });
                    });
                if ui.button("New key").clicked() {
                    events.push(UiEvent::GenerateApiKey);
                }

                if controller.derived_visibility().show_compare_toggle
                    && ui
                        .selectable_label(controller.compare_mode(), "Compare")
                        .clicked()
                {
                    events.push(UiEvent::ToggleCompare);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(controller.drawer_open(), "Settings")
                        .clicked()
                    {
                        events.push(UiEvent::ToggleDrawer);
                    }
                    if ui.button("New chat").clicked() {
                        events.push(UiEvent::NewConversation);
                    }
                });
            });
        });
    }

    fn render_engine_panel(&self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let current = self.controller.engine();
        egui::SidePanel::left("engine_panel")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                ui.heading("Models");
                ui.separator();
                for engine in [Engine::Text, Engine::Visual] {
                    if ui
                        .selectable_label(current == engine, engine.label())
                        .clicked()
                    {
                        events.push(UiEvent::SelectEngine(engine));
                    }
                }
            });
    }

    fn render_drawer(&self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let controller = &self.controller;
        let theme = &self.theme;
        egui::SidePanel::right("config_drawer")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Configuration");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("x").clicked() {
                            events.push(UiEvent::ToggleDrawer);
                        }
                    });
                });
                ui.separator();

                ui.label(RichText::new("Model").color(theme.text_muted).small());
                if ui.button(controller.model().display_name()).clicked() {
                    events.push(UiEvent::ToggleModelMenu);
                }
                ui.add_space(theme.spacing_8);

                let settings = controller.visual_settings();
                ui.label(RichText::new("Visual settings").color(theme.text_muted).small());
                ui.label(format!("Ratio {} / {} image(s)", settings.ratio.as_str(), settings.count));
                ui.label(format!(
                    "Video {} / {}",
                    settings.duration.as_str(),
                    settings.resolution.as_str()
                ));
                ui.label(format!(
                    "Smart rewrite {}",
                    if settings.smart_rewrite { "on" } else { "off" }
                ));
                ui.add_space(theme.spacing_8);

                ui.label(RichText::new("Attachments").color(theme.text_muted).small());
                ui.label(format!(
                    "{} pending, {} preview(s) live",
                    controller.uploads().len(),
                    controller.ledger().live_count()
                ));
            });
    }

    fn render_bottom_panel(
        &mut self,
        ctx: &egui::Context,
        now: Instant,
        events: &mut Vec<UiEvent>,
    ) {
        let Self {
            controller,
            theme,
            prompt_buffer,
            diagnostics_log,
            ..
        } = self;
        egui::TopBottomPanel::bottom("composer_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(theme.spacing_8);
                composer::show(ui, theme, controller, prompt_buffer, now, events);

                egui::CollapsingHeader::new("Diagnostics")
                    .default_open(false)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("diagnostics_log")
                            .max_height(90.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                for entry in diagnostics_log.iter() {
                                    ui.label(RichText::new(entry).small());
                                }
                            });
                    });
            });
    }

    fn render_center_panel(&self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let controller = &self.controller;
        let theme = &self.theme;
        let banner = self.banner.as_ref().map(|(notice, _)| notice);
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface_0).inner_margin(egui::Margin::same(12)))
            .show(ctx, |ui| {
                if controller.derived_visibility().show_sub_tabs {
                    ui.horizontal(|ui| {
                        for tab in VisualTab::ALL {
                            if ui
                                .selectable_label(controller.visual_tab() == tab, tab.label())
                                .clicked()
                            {
                                events.push(UiEvent::SelectVisualTab(tab));
                            }
                        }
                    });
                    ui.add_space(theme.spacing_4);
                }

                if let Some(notice) = banner {
                    let color = match notice.level {
                        NoticeLevel::Info => theme.accent_primary,
                        NoticeLevel::Warning => theme.warning,
                    };
                    ui.label(RichText::new(&notice.message).color(color).strong());
                    ui.add_space(theme.spacing_4);
                }

                let mut view = PaneView::new(ui, theme);
                controller.render(&mut view);
            });
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drain_events();
        self.controller.tick(now);
        self.collect_notices(now);
        if self.prompt_buffer != self.controller.prompt() {
            self.prompt_buffer = self.controller.prompt().to_string();
        }

        let mut events = Vec::new();
        self.render_top_bar(ctx, now, &mut events);
        self.render_engine_panel(ctx, &mut events);
        if self.controller.drawer_open() {
            self.render_drawer(ctx, &mut events);
        }
        self.render_bottom_panel(ctx, now, &mut events);
        self.render_center_panel(ctx, &mut events);
        model_menu::show(ctx, &self.theme, self.controller.model_menu(), &mut events);

        for event in events {
            self.apply_ui_event(event, now);
        }

        if self.controller.any_pending()
            || self.controller.any_highlight(now)
            || self.banner.is_some()
        {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
