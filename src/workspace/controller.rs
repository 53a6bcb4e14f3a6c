//! The workspace controller: single owner of view state. Every mutation goes
//! through a named method here; the egui shell only reads and forwards
//! intents.

use std::time::{Duration, Instant};

use crate::workspace::gate::{self, GateContext, Highlight, SendRejection};
use crate::workspace::menu::{ModelMenu, ModelMenuError};
use crate::workspace::pane::{GenerationTicket, PaneSide, PaneState, SessionIds};
use crate::workspace::ports::{
    AttachedAsset, FilePicker, GenerationDispatcher, GenerationOutput, GenerationRequest,
    RenderFrame, Renderer,
};
use crate::workspace::settings::{SettingError, VisualSetting, VisualSettings};
use crate::workspace::uploads::{
    AddResult, FileHandle, MediaKind, PreviewLedger, UploadError, UploadSet,
};
use crate::workspace::visibility::Visibility;
use crate::workspace::{Engine, ModelSelection, VisualTab};

pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Discarded,
}

pub struct WorkspaceController {
    engine: Engine,
    visual_tab: VisualTab,
    api_key: Option<String>,
    known_api_keys: Vec<String>,
    compare_mode: bool,
    drawer_open: bool,
    model: ModelSelection,
    model_menu: ModelMenu,
    visual_settings: VisualSettings,
    prompt: String,
    uploads: UploadSet,
    panes: Vec<PaneState>,
    session_ids: SessionIds,
    next_seq: u64,
    notices: Vec<Notice>,
    highlight_duration: Duration,
    highlight: Option<(Highlight, Instant)>,
    dispatcher: Box<dyn GenerationDispatcher>,
}

impl WorkspaceController {
    pub fn new(dispatcher: Box<dyn GenerationDispatcher>) -> Self {
        let session_ids = SessionIds::default();
        let panes = vec![PaneState::new(PaneSide::A, session_ids.clone())];
        Self {
            engine: Engine::Text,
            visual_tab: VisualTab::Understanding,
            api_key: None,
            known_api_keys: Vec::new(),
            compare_mode: false,
            drawer_open: false,
            model: ModelSelection::default(),
            model_menu: ModelMenu::default(),
            visual_settings: VisualSettings::default(),
            prompt: String::new(),
            uploads: UploadSet::new(PreviewLedger::new()),
            panes,
            session_ids,
            next_seq: 0,
            notices: Vec::new(),
            highlight_duration: DEFAULT_HIGHLIGHT,
            highlight: None,
            dispatcher,
        }
    }

    pub fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }

    pub fn with_known_api_keys(mut self, keys: Vec<String>) -> Self {
        self.known_api_keys = keys.into_iter().filter(|key| !key.is_empty()).collect();
        self
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn visual_tab(&self) -> VisualTab {
        self.visual_tab
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn known_api_keys(&self) -> &[String] {
        &self.known_api_keys
    }

    pub fn compare_mode(&self) -> bool {
        self.compare_mode
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn model(&self) -> &ModelSelection {
        &self.model
    }

    pub fn model_menu(&self) -> &ModelMenu {
        &self.model_menu
    }

    pub fn visual_settings(&self) -> &VisualSettings {
        &self.visual_settings
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn uploads(&self) -> &UploadSet {
        &self.uploads
    }

    pub fn ledger(&self) -> &PreviewLedger {
        self.uploads.ledger()
    }

    pub fn panes(&self) -> &[PaneState] {
        &self.panes
    }

    pub fn pane(&self, side: PaneSide) -> Option<&PaneState> {
        self.panes.iter().find(|pane| pane.side() == side)
    }

    pub fn any_pending(&self) -> bool {
        self.panes.iter().any(PaneState::is_pending)
    }

    // --- engine / tab / layout ---

    /// Switching modality drops the conversation and pending uploads.
    pub fn select_engine(&mut self, engine: Engine) {
        if engine == self.engine {
            return;
        }

        for pane in &mut self.panes {
            pane.clear();
        }
        self.uploads.clear();
        if engine != Engine::Text {
            self.leave_compare_mode();
        }
        tracing::info!(from = self.engine.as_str(), to = engine.as_str(), "engine switched");
        self.engine = engine;
    }

    /// Returns false when the visual engine is not active.
    pub fn select_visual_tab(&mut self, visual_tab: VisualTab) -> bool {
        if self.engine != Engine::Visual {
            return false;
        }
        if self.visual_tab != visual_tab {
            tracing::debug!(tab = visual_tab.as_str(), "visual tab selected");
            self.visual_tab = visual_tab;
        }
        true
    }

    /// Returns whether the toggle took effect.
    pub fn toggle_compare_mode(&mut self) -> bool {
        if self.compare_mode {
            self.leave_compare_mode();
            return true;
        }
        if self.engine != Engine::Text {
            tracing::debug!("compare mode unavailable outside the text engine");
            return false;
        }

        self.compare_mode = true;
        self.panes
            .push(PaneState::new(PaneSide::B, self.session_ids.clone()));
        tracing::info!("compare mode entered");
        true
    }

    fn leave_compare_mode(&mut self) {
        if !self.compare_mode {
            return;
        }
        self.compare_mode = false;
        self.panes.retain(|pane| pane.side() == PaneSide::A);
        tracing::info!("compare mode left");
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    pub fn derived_visibility(&self) -> Visibility {
        Visibility::derive(self.engine, self.visual_tab)
    }

    // --- api key ---

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// Mints a key, adds it to the known list, and selects it.
    pub fn generate_api_key(&mut self) -> String {
        let key = format!("sk-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        self.known_api_keys.push(key.clone());
        self.api_key = Some(key.clone());
        self.notices
            .push(Notice::info(format!("New key created and selected: {key}")));
        tracing::info!("api key generated");
        key
    }

    pub fn highlighted(&self, target: Highlight, now: Instant) -> bool {
        self.highlight
            .is_some_and(|(active, until)| active == target && now < until)
    }

    pub fn api_key_highlighted(&self, now: Instant) -> bool {
        self.highlighted(Highlight::ApiKey, now)
    }

    pub fn any_highlight(&self, now: Instant) -> bool {
        self.highlight.is_some_and(|(_, until)| now < until)
    }

    /// Expires the transient rejection highlight.
    pub fn tick(&mut self, now: Instant) {
        if self.highlight.is_some_and(|(_, until)| now >= until) {
            self.highlight = None;
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- model selection ---

    /// Updates only the provided parts. Empty strings count as absent.
    pub fn select_model(
        &mut self,
        brand: Option<&str>,
        version: Option<&str>,
        endpoint: Option<&str>,
    ) {
        fn provided(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }
        if let Some(brand) = provided(brand) {
            self.model.brand = brand.to_string();
        }
        if let Some(version) = provided(version) {
            self.model.version = version.to_string();
        }
        if let Some(endpoint) = provided(endpoint) {
            self.model.endpoint = endpoint.to_string();
        }
    }

    pub fn toggle_model_menu(&mut self) {
        self.model_menu.toggle(&self.model);
    }

    pub fn choose_brand(&mut self, brand: &str) -> Result<(), ModelMenuError> {
        self.model_menu.choose_brand(brand)
    }

    pub fn choose_version(&mut self, version: &str) -> Result<(), ModelMenuError> {
        self.model_menu.choose_version(version)
    }

    pub fn choose_endpoint(&mut self, endpoint: &str) -> Result<(), ModelMenuError> {
        let selection = self.model_menu.choose_endpoint(endpoint)?;
        tracing::info!(model = %selection.display_name(), "model selected");
        self.model = selection;
        Ok(())
    }

    // --- visual settings ---

    pub fn update_visual_setting(&mut self, setting: VisualSetting) -> Result<(), SettingError> {
        self.visual_settings.apply(setting)?;
        tracing::debug!(key = setting.key(), "visual setting updated");
        Ok(())
    }

    /// String-keyed variant. Unknown keys are a caller bug and come back as
    /// [`SettingError::UnknownKey`].
    pub fn update_visual_setting_raw(&mut self, key: &str, value: &str) -> Result<(), SettingError> {
        let setting = VisualSetting::parse(key, value)?;
        self.update_visual_setting(setting)
    }

    // --- uploads ---

    /// Whether files of `kind` have somewhere to land in the current
    /// composer. Video generation takes images only through its frame zones.
    pub fn accepts_pick(&self, kind: MediaKind) -> bool {
        let visibility = self.derived_visibility();
        match kind {
            MediaKind::Image => visibility.show_upload_zone || visibility.show_video_frame_zones,
            MediaKind::Video => visibility.show_video_upload_option,
        }
    }

    pub fn request_files(&self, kind: MediaKind, picker: &dyn FilePicker) -> bool {
        let allowed = self.accepts_pick(kind);
        if allowed {
            let allow_multiple =
                kind == MediaKind::Image && self.derived_visibility().show_upload_zone;
            picker.request_files(kind, allow_multiple);
        }
        allowed
    }

    pub fn add_uploads(&mut self, files: Vec<FileHandle>) -> Result<AddResult, UploadError> {
        match self.uploads.add(files) {
            Ok(result) => {
                tracing::debug!(
                    accepted = result.accepted_count(),
                    dropped = result.dropped_count,
                    total = self.uploads.len(),
                    "uploads added"
                );
                if result.truncated() {
                    self.notices.push(Notice::warning(format!(
                        "At most 9 files can be attached; {} file(s) were not added",
                        result.dropped_count
                    )));
                }
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload rejected");
                self.notices.push(Notice::warning(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn remove_upload(&mut self, index: usize) -> Result<(), UploadError> {
        self.uploads.remove(index)
    }

    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
    }

    // --- composer / send ---

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn gate_context(&self) -> GateContext<'_> {
        GateContext {
            engine: self.engine,
            visual_tab: self.visual_tab,
            api_key: self.api_key.as_deref(),
            prompt: &self.prompt,
            upload_count: self.uploads.len(),
        }
    }

    pub fn can_send(&self) -> bool {
        gate::can_send(&self.gate_context())
    }

    pub fn send_control_enabled(&self) -> bool {
        gate::send_control_enabled(&self.gate_context()) && !self.any_pending()
    }

    fn target_sides(&self) -> Vec<PaneSide> {
        if self.compare_mode && self.engine == Engine::Text {
            vec![PaneSide::A, PaneSide::B]
        } else {
            vec![PaneSide::A]
        }
    }

    /// Runs the gate, then appends the user message and a loading
    /// placeholder to every target pane and dispatches one request per pane.
    pub fn send(&mut self, now: Instant) -> Result<Vec<GenerationTicket>, SendRejection> {
        if let Err(rejection) = gate::evaluate(&self.gate_context()) {
            self.highlight = rejection
                .highlight()
                .map(|target| (target, now + self.highlight_duration));
            self.notices.push(Notice::warning(rejection.to_string()));
            tracing::debug!(reason = %rejection, "send rejected by gate");
            return Err(rejection);
        }

        let sides = self.target_sides();
        if let Some(busy) = self
            .panes
            .iter()
            .find(|pane| sides.contains(&pane.side()) && pane.is_pending())
        {
            let rejection = SendRejection::GenerationPending { side: busy.side() };
            self.notices.push(Notice::warning(rejection.to_string()));
            tracing::debug!(reason = %rejection, "send rejected while pending");
            return Err(rejection);
        }

        let user_text = self.prompt.trim().to_string();
        let bundle = self.uploads.transfer_to_message();
        let attached_assets: Vec<AttachedAsset> = bundle
            .as_ref()
            .map(|bundle| {
                bundle
                    .assets()
                    .iter()
                    .map(|asset| AttachedAsset {
                        name: asset.source.name.clone(),
                        path: asset.source.path.clone(),
                        kind: asset.source.kind,
                        preview_uri: asset.preview_uri().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut tickets = Vec::with_capacity(sides.len());
        for side in sides {
            self.next_seq += 1;
            let seq = self.next_seq;
            let Some(pane) = self.panes.iter_mut().find(|pane| pane.side() == side) else {
                continue;
            };
            pane.append_user_message(user_text.clone(), bundle.clone());
            let ticket = pane.append_loading_placeholder(seq)?;
            tickets.push(ticket);

            self.dispatcher.generate(GenerationRequest {
                ticket,
                engine: self.engine,
                visual_tab: self.visual_tab,
                model: self.model.clone(),
                visual_settings: self.visual_settings.clone(),
                user_text: user_text.clone(),
                attached_assets: attached_assets.clone(),
            });
        }

        tracing::info!(
            panes = tickets.len(),
            attachments = attached_assets.len(),
            model = %self.model.display_name(),
            "generation dispatched"
        );
        self.prompt.clear();
        Ok(tickets)
    }

    /// Applies a finished generation. Completions whose pane is gone, was
    /// cleared since, or is no longer waiting on this ticket are dropped.
    pub fn complete(
        &mut self,
        ticket: GenerationTicket,
        outcome: Result<GenerationOutput, String>,
    ) -> CompletionOutcome {
        let Some(pane) = self.panes.iter_mut().find(|pane| pane.owns(ticket)) else {
            tracing::debug!(
                side = ticket.side.as_str(),
                session = ticket.session,
                seq = ticket.seq,
                "stale completion discarded"
            );
            return CompletionOutcome::Discarded;
        };

        let (text, media) = match outcome {
            Ok(output) => (output.text, output.media),
            Err(message) => {
                tracing::warn!(side = ticket.side.as_str(), error = %message, "generation failed");
                (format!("Generation failed: {message}"), None)
            }
        };
        pane.replace_loading_with_assistant(ticket, text, media);
        CompletionOutcome::Applied
    }

    /// Gives up on a pending generation without a reply.
    pub fn abandon(&mut self, ticket: GenerationTicket) -> CompletionOutcome {
        match self.panes.iter_mut().find(|pane| pane.owns(ticket)) {
            Some(pane) => {
                if pane.abandon_loading(ticket) {
                    CompletionOutcome::Applied
                } else {
                    CompletionOutcome::Discarded
                }
            }
            None => CompletionOutcome::Discarded,
        }
    }

    /// Clears every transcript and the composer. Uploads stay.
    pub fn new_conversation(&mut self) {
        for pane in &mut self.panes {
            pane.clear();
        }
        self.prompt.clear();
        tracing::info!("conversation cleared");
    }

    // --- rendering ---

    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            engine: self.engine,
            visibility: self.derived_visibility(),
            panes: &self.panes,
            uploads: &self.uploads,
            model_display_name: self.model.display_name(),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.render(&self.render_frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::pane::Role;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingDispatcher {
        requests: Rc<RefCell<Vec<GenerationRequest>>>,
    }

    impl GenerationDispatcher for RecordingDispatcher {
        fn generate(&self, request: GenerationRequest) {
            self.requests.borrow_mut().push(request);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPicker {
        calls: Rc<RefCell<Vec<(MediaKind, bool)>>>,
    }

    impl FilePicker for RecordingPicker {
        fn request_files(&self, kind: MediaKind, allow_multiple: bool) {
            self.calls.borrow_mut().push((kind, allow_multiple));
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<(usize, usize, String)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &RenderFrame<'_>) {
            self.frames.push((
                frame.panes.len(),
                frame.uploads.len(),
                frame.model_display_name.clone(),
            ));
        }
    }

    fn controller() -> (WorkspaceController, RecordingDispatcher) {
        let dispatcher = RecordingDispatcher::default();
        let controller = WorkspaceController::new(Box::new(dispatcher.clone()));
        (controller, dispatcher)
    }

    fn image(name: &str) -> FileHandle {
        FileHandle::new(format!("/tmp/{name}"), MediaKind::Image)
    }

    fn images(count: usize) -> Vec<FileHandle> {
        (0..count).map(|i| image(&format!("img-{i}.png"))).collect()
    }

    fn output(text: &str) -> Result<GenerationOutput, String> {
        Ok(GenerationOutput {
            text: text.to_string(),
            media: None,
        })
    }

    #[test]
    fn missing_key_blocks_text_send_until_key_is_set() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("");
        controller.set_prompt("hello");
        assert!(!controller.can_send());
        assert!(controller.send_control_enabled());

        let now = Instant::now();
        assert_eq!(controller.send(now), Err(SendRejection::MissingApiKey));
        assert!(controller.api_key_highlighted(now));
        assert!(dispatcher.requests.borrow().is_empty());
        assert_eq!(controller.panes()[0].transcript().len(), 0);

        controller.set_api_key("sk-1");
        assert!(controller.can_send());
    }

    #[test]
    fn key_highlight_clears_after_interval() {
        let (mut controller, _) = controller();
        controller.set_prompt("hello");
        let start = Instant::now();
        assert!(controller.send(start).is_err());

        let almost = start + Duration::from_millis(1999);
        controller.tick(almost);
        assert!(controller.api_key_highlighted(almost));
        let expired = start + DEFAULT_HIGHLIGHT;
        controller.tick(expired);
        assert!(!controller.api_key_highlighted(expired));

        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn understanding_requires_upload_regardless_of_key() {
        let (mut controller, _) = controller();
        controller.select_engine(Engine::Visual);
        assert!(controller.select_visual_tab(VisualTab::Understanding));
        controller.set_prompt("describe this");
        assert!(!controller.can_send());
        controller.set_api_key("sk-1");
        assert!(!controller.can_send());

        controller
            .add_uploads(vec![image("file1.png")])
            .expect("one image should fit");
        assert!(controller.can_send());
    }

    #[test]
    fn add_to_full_set_reports_capacity_and_keeps_nine() {
        let (mut controller, _) = controller();
        controller.add_uploads(images(9)).expect("nine images should fit");
        controller.take_notices();

        let result = controller.add_uploads(vec![image("fileA.png"), image("fileB.png")]);
        assert_eq!(
            result,
            Err(UploadError::CapacityExceeded {
                capacity: 9,
                dropped_count: 2
            })
        );
        assert_eq!(controller.uploads().len(), 9);
        assert_eq!(controller.take_notices().len(), 1);
    }

    #[test]
    fn entering_compare_creates_empty_pane_b() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        controller.complete(tickets[0], output("hi"));
        assert_eq!(controller.panes()[0].transcript().len(), 2);

        assert!(controller.toggle_compare_mode());
        let pane_b = controller.pane(PaneSide::B).expect("pane B should exist");
        assert!(pane_b.welcome_visible());
        assert!(pane_b.transcript().is_empty());
        assert_eq!(controller.panes()[0].transcript().len(), 2);
    }

    #[test]
    fn leaving_compare_releases_previews_only_pane_b_holds() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        assert!(controller.toggle_compare_mode());

        let shared = controller
            .add_uploads(vec![image("shared.png")])
            .expect("one image should fit");
        controller.set_prompt("both panes");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        assert_eq!(tickets.len(), 2);
        for ticket in tickets {
            controller.complete(ticket, output("ok"));
        }

        let ledger = controller.ledger().clone();
        let shared_id = shared.accepted[0];
        assert!(controller.toggle_compare_mode());
        assert!(controller.pane(PaneSide::B).is_none());
        assert_eq!(ledger.release_count(shared_id), 0);

        controller.new_conversation();
        assert_eq!(ledger.release_count(shared_id), 1);
        assert_eq!(ledger.live_count(), 0);
    }

    #[test]
    fn leaving_compare_releases_pane_b_exclusive_previews() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.toggle_compare_mode();
        let added = controller
            .add_uploads(vec![image("b-only.png")])
            .expect("one image should fit");
        controller.set_prompt("x");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        for ticket in tickets {
            controller.complete(ticket, output("ok"));
        }
        // Pane A forgets its copy first; pane B is now the only holder.
        controller.panes.iter_mut().for_each(|pane| {
            if pane.side() == PaneSide::A {
                pane.clear();
            }
        });
        let ledger = controller.ledger().clone();
        assert_eq!(ledger.release_count(added.accepted[0]), 0);

        controller.toggle_compare_mode();
        assert_eq!(ledger.release_count(added.accepted[0]), 1);
    }

    #[test]
    fn compare_send_shares_text_and_handles_across_panes() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("sk-1");
        controller.toggle_compare_mode();
        controller
            .add_uploads(vec![image("a.png"), image("b.png")])
            .expect("two images should fit");
        controller.set_prompt("  compare these  ");

        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        assert_eq!(tickets.len(), 2);
        assert!(controller.uploads().is_empty());
        assert_eq!(controller.prompt(), "");

        let requests = dispatcher.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].user_text, "compare these");
        assert_eq!(requests[0].user_text, requests[1].user_text);
        assert_eq!(requests[0].attached_assets, requests[1].attached_assets);

        let left = controller.panes()[0].transcript()[0].attached_preview_uris();
        let right = controller.panes()[1].transcript()[0].attached_preview_uris();
        assert_eq!(left.len(), 2);
        assert_eq!(left, right);
        assert_eq!(controller.ledger().live_count(), 2);
    }

    #[test]
    fn send_then_clear_releases_each_handle_once() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        let added = controller
            .add_uploads(images(3))
            .expect("three images should fit");
        let tickets = controller.send(Instant::now()).expect("uploads alone should pass");
        controller.complete(tickets[0], output("done"));

        let ledger = controller.ledger().clone();
        assert_eq!(ledger.live_count(), 3);
        controller.new_conversation();
        controller.new_conversation();
        for id in added.accepted {
            assert_eq!(ledger.release_count(id), 1);
        }
    }

    #[test]
    fn engine_switches_always_reset_conversation_and_uploads() {
        let sequences: [&[Engine]; 4] = [
            &[Engine::Visual],
            &[Engine::Visual, Engine::Text],
            &[Engine::Text, Engine::Visual, Engine::Visual],
            &[Engine::Visual, Engine::Text, Engine::Visual, Engine::Text],
        ];
        for sequence in sequences {
            let (mut controller, _) = controller();
            controller.set_api_key("sk-1");
            controller.toggle_compare_mode();
            controller.set_prompt("hello");
            controller.send(Instant::now()).expect("send should pass the gate");
            controller.add_uploads(images(2)).expect("two images should fit");

            for engine in sequence {
                controller.select_engine(*engine);
            }

            assert!(controller.uploads().is_empty());
            assert!(controller
                .panes()
                .iter()
                .all(|pane| pane.transcript().is_empty()));
            assert_eq!(controller.ledger().live_count(), 0);
        }
    }

    #[test]
    fn leaving_text_engine_exits_compare_mode() {
        let (mut controller, _) = controller();
        controller.toggle_compare_mode();
        controller.select_engine(Engine::Visual);
        assert!(!controller.compare_mode());
        assert_eq!(controller.panes().len(), 1);
        assert!(!controller.toggle_compare_mode());
        assert!(!controller.compare_mode());
    }

    #[test]
    fn selecting_same_engine_is_a_no_op() {
        let (mut controller, _) = controller();
        controller.add_uploads(images(1)).expect("one image should fit");
        controller.select_engine(Engine::Text);
        assert_eq!(controller.uploads().len(), 1);
    }

    #[test]
    fn tab_switch_keeps_uploads_and_needs_visual_engine() {
        let (mut controller, _) = controller();
        assert!(!controller.select_visual_tab(VisualTab::ImageGen));
        assert_eq!(controller.visual_tab(), VisualTab::Understanding);

        controller.select_engine(Engine::Visual);
        controller.add_uploads(images(1)).expect("one image should fit");
        assert!(controller.select_visual_tab(VisualTab::ImageGen));
        assert_eq!(controller.uploads().len(), 1);
        assert_eq!(
            controller.derived_visibility().visible_tool_group,
            crate::workspace::visibility::ToolGroup::ImageGen
        );
    }

    #[test]
    fn drawer_toggle_twice_is_a_no_op() {
        let (mut controller, _) = controller();
        controller.set_prompt("keep");
        let before = (
            controller.drawer_open(),
            controller.engine(),
            controller.compare_mode(),
            controller.model().clone(),
            controller.visual_settings().clone(),
            controller.prompt().to_string(),
            controller.panes().len(),
        );
        controller.toggle_drawer();
        assert!(controller.drawer_open());
        controller.toggle_drawer();
        let after = (
            controller.drawer_open(),
            controller.engine(),
            controller.compare_mode(),
            controller.model().clone(),
            controller.visual_settings().clone(),
            controller.prompt().to_string(),
            controller.panes().len(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn second_send_into_pending_pane_is_rejected() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("first");
        let tickets = controller.send(Instant::now()).expect("first send should pass");
        assert!(!controller.send_control_enabled());

        controller.set_prompt("second");
        assert_eq!(
            controller.send(Instant::now()),
            Err(SendRejection::GenerationPending { side: PaneSide::A })
        );
        assert_eq!(dispatcher.requests.borrow().len(), 1);
        assert_eq!(controller.prompt(), "second");

        controller.complete(tickets[0], output("reply"));
        assert!(controller.send(Instant::now()).is_ok());
    }

    #[test]
    fn completion_replaces_placeholder_with_one_reply() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        let transcript = controller.panes()[0].transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert!(transcript[1].is_loading);

        assert_eq!(
            controller.complete(tickets[0], output("reply")),
            CompletionOutcome::Applied
        );
        assert_eq!(
            controller.complete(tickets[0], output("duplicate")),
            CompletionOutcome::Discarded
        );
        let transcript = controller.panes()[0].transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text, "reply");
        assert!(!transcript[1].is_loading);
    }

    #[test]
    fn failure_still_resolves_placeholder() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        controller.complete(tickets[0], Err("upstream unavailable".to_string()));

        let reply = &controller.panes()[0].transcript()[1];
        assert!(!reply.is_loading);
        assert!(reply.text.contains("upstream unavailable"));
        assert!(!controller.any_pending());
    }

    #[test]
    fn stale_completion_after_engine_switch_is_discarded() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");

        controller.select_engine(Engine::Visual);
        assert_eq!(
            controller.complete(tickets[0], output("late")),
            CompletionOutcome::Discarded
        );
        assert!(controller.panes()[0].transcript().is_empty());
    }

    #[test]
    fn stale_completion_for_destroyed_pane_b_is_discarded() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.toggle_compare_mode();
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");

        controller.toggle_compare_mode();
        controller.toggle_compare_mode();
        let pane_b_ticket = tickets[1];
        assert_eq!(pane_b_ticket.side, PaneSide::B);
        assert_eq!(
            controller.complete(pane_b_ticket, output("late")),
            CompletionOutcome::Discarded
        );
        let pane_b = controller.pane(PaneSide::B).expect("pane B recreated");
        assert!(pane_b.transcript().is_empty());
        assert_eq!(
            controller.complete(tickets[0], output("on time")),
            CompletionOutcome::Applied
        );
    }

    #[test]
    fn abandon_clears_pending_state() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        controller.set_prompt("hello");
        let tickets = controller.send(Instant::now()).expect("send should pass the gate");
        assert_eq!(controller.abandon(tickets[0]), CompletionOutcome::Applied);
        assert!(!controller.any_pending());
        assert_eq!(controller.panes()[0].transcript().len(), 1);
        assert_eq!(controller.abandon(tickets[0]), CompletionOutcome::Discarded);
    }

    #[test]
    fn visual_input_rejection_flashes_upload_zone() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("sk-1");
        controller.select_engine(Engine::Visual);
        assert!(controller.select_visual_tab(VisualTab::Understanding));
        controller.set_prompt("describe this");

        let now = Instant::now();
        assert_eq!(controller.send(now), Err(SendRejection::MissingVisualInput));
        assert!(controller.highlighted(Highlight::UploadZone, now));
        assert!(!controller.api_key_highlighted(now));
        assert!(dispatcher.requests.borrow().is_empty());

        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);

        let expired = now + DEFAULT_HIGHLIGHT;
        controller.tick(expired);
        assert!(!controller.any_highlight(expired));
    }

    #[test]
    fn empty_text_send_is_announced() {
        let (mut controller, _) = controller();
        controller.set_api_key("sk-1");
        let now = Instant::now();
        assert_eq!(controller.send(now), Err(SendRejection::EmptyPrompt));
        assert!(controller.highlighted(Highlight::Prompt, now));
        assert_eq!(controller.take_notices().len(), 1);
    }

    #[test]
    fn picks_follow_the_visible_upload_targets() {
        let (mut controller, _) = controller();
        assert!(controller.accepts_pick(MediaKind::Image));
        assert!(!controller.accepts_pick(MediaKind::Video));

        controller.select_engine(Engine::Visual);
        assert!(controller.accepts_pick(MediaKind::Video));

        assert!(controller.select_visual_tab(VisualTab::VideoGen));
        assert!(controller.accepts_pick(MediaKind::Image));
        assert!(!controller.accepts_pick(MediaKind::Video));
    }

    #[test]
    fn image_count_accepts_values_past_the_menu() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("sk-1");
        controller.select_engine(Engine::Visual);
        assert!(controller.select_visual_tab(VisualTab::ImageGen));
        controller
            .update_visual_setting_raw("count", "5")
            .expect("five images is a valid count");
        assert_eq!(controller.visual_settings().count, 5);

        controller.send(Instant::now()).expect("image gen needs only a key");
        assert_eq!(dispatcher.requests.borrow()[0].visual_settings.count, 5);
    }

    #[test]
    fn visual_send_targets_one_pane_with_settings() {
        let (mut controller, dispatcher) = controller();
        controller.set_api_key("sk-1");
        controller.select_engine(Engine::Visual);
        controller.select_visual_tab(VisualTab::VideoGen);
        controller
            .update_visual_setting_raw("duration", "8s")
            .expect("8s is a known duration");

        let tickets = controller.send(Instant::now()).expect("video gen needs only a key");
        assert_eq!(tickets.len(), 1);
        let requests = dispatcher.requests.borrow();
        assert_eq!(requests[0].visual_tab, VisualTab::VideoGen);
        assert_eq!(requests[0].visual_settings.duration.as_str(), "8s");
    }

    #[test]
    fn unknown_visual_setting_key_is_a_usage_error() {
        let (mut controller, _) = controller();
        let before = controller.visual_settings().clone();
        assert_eq!(
            controller.update_visual_setting_raw("style", "anime"),
            Err(SettingError::UnknownKey("style".to_string()))
        );
        assert_eq!(controller.visual_settings(), &before);
    }

    #[test]
    fn model_menu_commits_only_on_endpoint() {
        let (mut controller, _) = controller();
        controller.toggle_model_menu();
        controller.choose_brand("Aurora").expect("Aurora is in the catalog");
        controller.choose_version("Chat").expect("Chat belongs to Aurora");
        assert_eq!(controller.model().display_name(), "Modelverse-Max-Latest");

        controller.choose_endpoint("Preview").expect("endpoint should commit");
        assert_eq!(controller.model().display_name(), "Aurora-Chat-Preview");
        assert!(!controller.model_menu().is_open());
    }

    #[test]
    fn select_model_updates_only_provided_fields() {
        let (mut controller, _) = controller();
        controller.select_model(None, Some("Pro"), Some(""));
        assert_eq!(controller.model().display_name(), "Modelverse-Pro-Latest");

        controller.select_model(Some("Aurora"), Some("   "), None);
        assert_eq!(controller.model().display_name(), "Aurora-Pro-Latest");
    }

    #[test]
    fn generated_key_is_selected_and_listed() {
        let (mut controller, _) = controller();
        let key = controller.generate_api_key();
        assert!(key.starts_with("sk-"));
        assert_eq!(key.len(), 11);
        assert_eq!(controller.api_key(), Some(key.as_str()));
        assert!(controller.known_api_keys().contains(&key));
        assert_eq!(controller.take_notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn file_requests_follow_upload_zone_mode() {
        let (mut controller, _) = controller();
        let picker = RecordingPicker::default();

        assert!(controller.request_files(MediaKind::Image, &picker));
        assert!(!controller.request_files(MediaKind::Video, &picker));

        controller.select_engine(Engine::Visual);
        assert!(controller.request_files(MediaKind::Video, &picker));
        controller.select_visual_tab(VisualTab::VideoGen);
        assert!(!controller.request_files(MediaKind::Video, &picker));
        assert!(controller.request_files(MediaKind::Image, &picker));

        assert_eq!(
            *picker.calls.borrow(),
            vec![
                (MediaKind::Image, true),
                (MediaKind::Video, false),
                (MediaKind::Image, false),
            ]
        );
    }

    #[test]
    fn render_projects_current_state() {
        let (mut controller, _) = controller();
        let mut renderer = RecordingRenderer::default();
        controller.render(&mut renderer);
        controller.toggle_compare_mode();
        controller.add_uploads(images(2)).expect("two images should fit");
        controller.render(&mut renderer);

        assert_eq!(
            renderer.frames,
            vec![
                (1, 0, "Modelverse-Max-Latest".to_string()),
                (2, 2, "Modelverse-Max-Latest".to_string()),
            ]
        );
    }
}
