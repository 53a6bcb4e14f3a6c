//! Pending attachments and the preview handles that back them.
//!
//! A [`PreviewHandle`] is move-only and releases itself through the
//! [`PreviewLedger`] when dropped. While a file sits in the [`UploadSet`] the
//! set owns its handle; on send the handles move into an [`AttachmentBundle`]
//! that panes share by reference count, so the release happens once, when the
//! last message holding the bundle goes away.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

pub const MAX_UPLOADS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload limit of {capacity} reached; {dropped_count} file(s) not added")]
    CapacityExceeded { capacity: usize, dropped_count: usize },
    #[error("no upload at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["png", "jpg", "jpeg", "gif", "webp", "bmp"],
            Self::Video => &["mp4", "mov", "webm", "mkv", "avi"],
        }
    }

    /// Classifies a path by its guessed MIME type.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mime = mime_guess::from_path(path).first()?;
        if mime.type_() == mime_guess::mime::IMAGE {
            Some(Self::Image)
        } else if mime.type_() == mime_guess::mime::VIDEO {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// A file chosen by the user, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub kind: MediaKind,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name, kind }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = MediaKind::from_path(&path)?;
        Some(Self::new(path, kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewId(u64);

impl PreviewId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    next_id: u64,
    live: BTreeSet<PreviewId>,
    releases: BTreeMap<PreviewId, u32>,
    released_since_drain: Vec<PreviewId>,
}

/// Mints preview handles and keeps a per-handle release count.
#[derive(Debug, Clone, Default)]
pub struct PreviewLedger {
    state: Rc<RefCell<LedgerState>>,
}

impl PreviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, file: &FileHandle) -> PreviewHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = PreviewId(state.next_id);
        state.live.insert(id);
        PreviewHandle {
            id,
            uri: format!("preview://{}/{}", id, file.name),
            ledger: self.clone(),
        }
    }

    fn release(&self, id: PreviewId) {
        let mut state = self.state.borrow_mut();
        if !state.live.remove(&id) {
            tracing::warn!(preview_id = id.get(), "preview handle released more than once");
        }
        *state.releases.entry(id).or_default() += 1;
        state.released_since_drain.push(id);
    }

    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn minted_count(&self) -> u64 {
        self.state.borrow().next_id
    }

    pub fn release_count(&self, id: PreviewId) -> u32 {
        self.state.borrow().releases.get(&id).copied().unwrap_or(0)
    }

    pub fn is_live(&self, id: PreviewId) -> bool {
        self.state.borrow().live.contains(&id)
    }

    /// Returns the handles released since the previous call.
    pub fn drain_released(&self) -> Vec<PreviewId> {
        std::mem::take(&mut self.state.borrow_mut().released_since_drain)
    }
}

/// Transient reference to locally held media. Released on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: PreviewId,
    uri: String,
    ledger: PreviewLedger,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.ledger.release(self.id);
    }
}

#[derive(Debug)]
pub struct UploadedAsset {
    pub source: FileHandle,
    preview: PreviewHandle,
}

impl UploadedAsset {
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn preview_uri(&self) -> &str {
        self.preview.uri()
    }
}

/// Attachments that left the upload set with a sent message.
#[derive(Debug)]
pub struct AttachmentBundle {
    assets: Vec<UploadedAsset>,
}

impl AttachmentBundle {
    pub fn assets(&self) -> &[UploadedAsset] {
        &self.assets
    }

    pub fn preview_uris(&self) -> Vec<String> {
        self.assets
            .iter()
            .map(|asset| asset.preview_uri().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    pub accepted: Vec<PreviewId>,
    pub dropped_count: usize,
}

impl AddResult {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn truncated(&self) -> bool {
        self.dropped_count > 0
    }
}

#[derive(Debug)]
pub struct UploadSet {
    assets: Vec<UploadedAsset>,
    ledger: PreviewLedger,
}

impl UploadSet {
    pub fn new(ledger: PreviewLedger) -> Self {
        Self {
            assets: Vec::new(),
            ledger,
        }
    }

    pub fn ledger(&self) -> &PreviewLedger {
        &self.ledger
    }

    pub fn assets(&self) -> &[UploadedAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn has_visual_input(&self) -> bool {
        !self.assets.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_UPLOADS.saturating_sub(self.assets.len())
    }

    pub fn hint(&self) -> Option<String> {
        match self.assets.len() {
            0 => None,
            1 => Some("1 file selected".to_string()),
            count => Some(format!("{count} files selected")),
        }
    }

    /// Accepts files in order up to the cap. A call made while already full
    /// is rejected without touching the set.
    pub fn add(&mut self, files: Vec<FileHandle>) -> Result<AddResult, UploadError> {
        if !files.is_empty() && self.assets.len() >= MAX_UPLOADS {
            return Err(UploadError::CapacityExceeded {
                capacity: MAX_UPLOADS,
                dropped_count: files.len(),
            });
        }

        let remaining = self.remaining_capacity();
        let dropped_count = files.len().saturating_sub(remaining);
        let mut accepted = Vec::with_capacity(files.len().min(remaining));
        for file in files.into_iter().take(remaining) {
            let preview = self.ledger.mint(&file);
            accepted.push(preview.id());
            self.assets.push(UploadedAsset {
                source: file,
                preview,
            });
        }

        Ok(AddResult {
            accepted,
            dropped_count,
        })
    }

    pub fn remove(&mut self, index: usize) -> Result<(), UploadError> {
        if index >= self.assets.len() {
            return Err(UploadError::IndexOutOfRange {
                index,
                len: self.assets.len(),
            });
        }
        self.assets.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.assets.clear();
    }

    /// Moves every pending asset into a bundle without releasing its preview.
    pub fn transfer_to_message(&mut self) -> Option<Rc<AttachmentBundle>> {
        if self.assets.is_empty() {
            return None;
        }
        Some(Rc::new(AttachmentBundle {
            assets: std::mem::take(&mut self.assets),
        }))
    }
}
