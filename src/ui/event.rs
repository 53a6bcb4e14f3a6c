use crate::workspace::settings::VisualSetting;
use crate::workspace::uploads::MediaKind;
use crate::workspace::{Engine, VisualTab};

/// Intents raised by widgets during a frame. The app applies them to the
/// controller once the frame's widgets have been laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SelectEngine(Engine),
    SelectVisualTab(VisualTab),
    ToggleCompare,
    ToggleDrawer,
    SelectApiKey(String),
    GenerateApiKey,
    NewConversation,
    ToggleModelMenu,
    ChooseBrand(String),
    ChooseVersion(String),
    ChooseEndpoint(String),
    UpdateSetting(VisualSetting),
    RequestFiles(MediaKind),
    RemoveUpload(usize),
    ClearUploads,
    PromptEdited(String),
    Send,
}

impl UiEvent {
    pub fn to_log_line(&self) -> String {
        match self {
            Self::SelectEngine(engine) => format!("select_engine engine={}", engine.as_str()),
            Self::SelectVisualTab(tab) => format!("select_visual_tab tab={}", tab.as_str()),
            Self::ToggleCompare => "toggle_compare".to_string(),
            Self::ToggleDrawer => "toggle_drawer".to_string(),
            // Key values stay out of the log.
            Self::SelectApiKey(_) => "select_api_key".to_string(),
            Self::GenerateApiKey => "generate_api_key".to_string(),
            Self::NewConversation => "new_conversation".to_string(),
            Self::ToggleModelMenu => "toggle_model_menu".to_string(),
            Self::ChooseBrand(brand) => format!("choose_brand brand={brand}"),
            Self::ChooseVersion(version) => format!("choose_version version={version}"),
            Self::ChooseEndpoint(endpoint) => format!("choose_endpoint endpoint={endpoint}"),
            Self::UpdateSetting(setting) => format!("update_setting key={}", setting.key()),
            Self::RequestFiles(kind) => format!("request_files kind={}", kind.as_str()),
            Self::RemoveUpload(index) => format!("remove_upload index={index}"),
            Self::ClearUploads => "clear_uploads".to_string(),
            Self::PromptEdited(text) => format!("prompt_edited chars={}", text.chars().count()),
            Self::Send => "send".to_string(),
        }
    }

    /// Keystroke-level events are too chatty for the diagnostics log.
    pub fn is_loggable(&self) -> bool {
        !matches!(self, Self::PromptEdited(_))
    }
}
