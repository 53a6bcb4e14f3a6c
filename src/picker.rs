use crate::event::AppEvent;
use crate::workspace::ports::FilePicker;
use crate::workspace::uploads::{FileHandle, MediaKind};
use std::path::PathBuf;
use std::sync::mpsc;
use tokio::runtime::Handle;

/// Native file dialog. The dialog runs off the UI thread and the chosen
/// files come back as [`AppEvent::FilesPicked`].
pub struct RfdFilePicker {
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl RfdFilePicker {
    pub fn new(tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self { tx, runtime_handle }
    }
}

impl FilePicker for RfdFilePicker {
    fn request_files(&self, kind: MediaKind, allow_multiple: bool) {
        let tx = self.tx.clone();
        tracing::debug!(kind = kind.as_str(), allow_multiple, "file dialog opened");

        self.runtime_handle.spawn(async move {
            let dialog = rfd::AsyncFileDialog::new()
                .set_title(match kind {
                    MediaKind::Image => "Add images",
                    MediaKind::Video => "Add a video",
                })
                .add_filter(kind.as_str(), kind.extensions());

            let paths: Vec<PathBuf> = if allow_multiple {
                dialog
                    .pick_files()
                    .await
                    .unwrap_or_default()
                    .into_iter()
                    .map(|file| file.path().to_path_buf())
                    .collect()
            } else {
                dialog
                    .pick_file()
                    .await
                    .map(|file| vec![file.path().to_path_buf()])
                    .unwrap_or_default()
            };

            if paths.is_empty() {
                tracing::debug!(kind = kind.as_str(), "file dialog cancelled");
                return;
            }

            let (files, skipped) = classify_picked(kind, paths);
            if tx
                .send(AppEvent::FilesPicked {
                    kind,
                    files,
                    skipped,
                })
                .is_err()
            {
                tracing::warn!("ui channel closed before files were delivered");
            }
        });
    }
}

/// Keeps the paths whose guessed MIME type matches `kind`. Returns the kept
/// files and how many were dropped.
pub fn classify_picked(kind: MediaKind, paths: Vec<PathBuf>) -> (Vec<FileHandle>, usize) {
    let total = paths.len();
    let files: Vec<FileHandle> = paths
        .into_iter()
        .filter_map(|path| match FileHandle::from_path(&path) {
            Some(file) if file.kind == kind => Some(file),
            _ => {
                tracing::warn!(
                    path = %path.display(),
                    expected = kind.as_str(),
                    "picked file does not match requested media kind"
                );
                None
            }
        })
        .collect();
    let skipped = total - files.len();
    (files, skipped)
}
