//! Boundary traits the controller talks through: the renderer it feeds, the
//! file picker it asks for media, and the dispatcher that produces results.

use std::path::PathBuf;

use crate::workspace::pane::{GenerationTicket, PaneState};
use crate::workspace::settings::VisualSettings;
use crate::workspace::uploads::{MediaKind, UploadSet};
use crate::workspace::visibility::Visibility;
use crate::workspace::{Engine, ModelSelection, VisualTab};

/// Read-only projection handed to a [`Renderer`].
pub struct RenderFrame<'a> {
    pub engine: Engine,
    pub visibility: Visibility,
    pub panes: &'a [PaneState],
    pub uploads: &'a UploadSet,
    pub model_display_name: String,
}

pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

pub trait FilePicker {
    /// Starts a pick. Chosen files come back later as an upload add.
    fn request_files(&self, kind: MediaKind, allow_multiple: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedAsset {
    pub name: String,
    pub path: PathBuf,
    pub kind: MediaKind,
    pub preview_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: GenerationTicket,
    pub engine: Engine,
    pub visual_tab: VisualTab,
    pub model: ModelSelection,
    pub visual_settings: VisualSettings,
    pub user_text: String,
    pub attached_assets: Vec<AttachedAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub text: String,
    pub media: Option<String>,
}

/// Produces exactly one result or one failure per request, delivered later
/// through [`crate::workspace::controller::WorkspaceController::complete`].
pub trait GenerationDispatcher {
    fn generate(&self, request: GenerationRequest);
}
