use crate::workspace::pane::GenerationTicket;
use crate::workspace::ports::GenerationOutput;
use crate::workspace::uploads::{FileHandle, MediaKind};

/// Events posted from background tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    GenerationFinished {
        ticket: GenerationTicket,
        outcome: Result<GenerationOutput, String>,
    },
    FilesPicked {
        kind: MediaKind,
        files: Vec<FileHandle>,
        skipped: usize,
    },
}
