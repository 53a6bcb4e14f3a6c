//! Send gating. Pure functions of a [`GateContext`] snapshot.
//!
//! Engine rules decide whether the send control looks enabled. The API key
//! rule is separate: an enabled control with no key must still be clicked to
//! surface [`SendRejection::MissingApiKey`], since the visual engine shows no
//! disabled state for it.

use thiserror::Error;

use crate::workspace::pane::PaneSide;
use crate::workspace::{Engine, VisualTab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejection {
    #[error("select or create an API key before sending")]
    MissingApiKey,
    #[error("visual understanding needs an uploaded image or video")]
    MissingVisualInput,
    #[error("type a message or attach a file first")]
    EmptyPrompt,
    #[error("pane {} is still generating", .side.as_str())]
    GenerationPending { side: PaneSide },
}

/// Composer region flashed after a rejected send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    ApiKey,
    UploadZone,
    Prompt,
}

impl SendRejection {
    /// The control the user has to touch to clear this rejection. A pending
    /// pane has none; waiting is enough.
    pub fn highlight(self) -> Option<Highlight> {
        match self {
            Self::MissingApiKey => Some(Highlight::ApiKey),
            Self::MissingVisualInput => Some(Highlight::UploadZone),
            Self::EmptyPrompt => Some(Highlight::Prompt),
            Self::GenerationPending { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub engine: Engine,
    pub visual_tab: VisualTab,
    pub api_key: Option<&'a str>,
    pub prompt: &'a str,
    pub upload_count: usize,
}

pub fn check_engine_rules(ctx: &GateContext<'_>) -> Result<(), SendRejection> {
    match (ctx.engine, ctx.visual_tab) {
        (Engine::Text, _) => {
            if ctx.prompt.trim().is_empty() && ctx.upload_count == 0 {
                Err(SendRejection::EmptyPrompt)
            } else {
                Ok(())
            }
        }
        (Engine::Visual, VisualTab::Understanding) => {
            if ctx.upload_count == 0 {
                Err(SendRejection::MissingVisualInput)
            } else {
                Ok(())
            }
        }
        (Engine::Visual, VisualTab::ImageGen | VisualTab::VideoGen) => Ok(()),
    }
}

pub fn check_api_key(ctx: &GateContext<'_>) -> Result<(), SendRejection> {
    match ctx.api_key {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(SendRejection::MissingApiKey),
    }
}

/// Full gate: engine rules, then the key.
pub fn evaluate(ctx: &GateContext<'_>) -> Result<(), SendRejection> {
    check_engine_rules(ctx)?;
    check_api_key(ctx)
}

pub fn can_send(ctx: &GateContext<'_>) -> bool {
    evaluate(ctx).is_ok()
}

/// Whether the send control is drawn enabled.
pub fn send_control_enabled(ctx: &GateContext<'_>) -> bool {
    check_engine_rules(ctx).is_ok()
}
