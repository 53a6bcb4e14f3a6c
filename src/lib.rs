//! Studio: a desktop workspace for text and visual model generation.
//!
//! The [`workspace`] core owns all view state and is free of egui; the
//! [`app`] shell renders it and forwards widget intents back as controller
//! calls. Background work (simulated generation, file dialogs) runs on a
//! tokio runtime and reports through [`event::AppEvent`].

pub mod app;
pub mod config;
pub mod event;
pub mod generation;
pub mod picker;
pub mod theme;
pub mod ui;
pub mod workspace;
