//! Workspace core: engine/tab selection, uploads, panes, gating, and the
//! controller that owns them. Nothing in here touches egui.

pub mod controller;
pub mod gate;
pub mod menu;
pub mod pane;
pub mod ports;
pub mod settings;
pub mod uploads;
pub mod visibility;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Text,
    Visual,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Visual => "visual",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text Models",
            Self::Visual => "Visual Models",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualTab {
    Understanding,
    ImageGen,
    VideoGen,
}

impl VisualTab {
    pub const ALL: [VisualTab; 3] = [Self::Understanding, Self::ImageGen, Self::VideoGen];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Understanding => "understanding",
            Self::ImageGen => "image-gen",
            Self::VideoGen => "video-gen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Understanding => "Visual Understanding",
            Self::ImageGen => "Image Generation",
            Self::VideoGen => "Video Generation",
        }
    }
}

/// Committed model choice. All three parts are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub brand: String,
    pub version: String,
    pub endpoint: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            brand: "Modelverse".to_string(),
            version: "Max".to_string(),
            endpoint: "Latest".to_string(),
        }
    }
}

impl ModelSelection {
    pub fn display_name(&self) -> String {
        format!("{}-{}-{}", self.brand, self.version, self.endpoint)
    }
}
