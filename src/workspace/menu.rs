//! Cascading brand → version → endpoint model menu.
//!
//! Brand and version picks only move the draft. Picking an endpoint is the
//! single commit transition: it publishes the whole selection and closes the
//! menu.

use thiserror::Error;

use crate::workspace::ModelSelection;

#[derive(Debug, Clone, Copy)]
pub struct BrandEntry {
    pub name: &'static str,
    pub versions: &'static [&'static str],
}

pub const BRANDS: &[BrandEntry] = &[
    BrandEntry {
        name: "Modelverse",
        versions: &["Max", "Pro", "Lite"],
    },
    BrandEntry {
        name: "Aurora",
        versions: &["Vision", "Chat"],
    },
];

pub const ENDPOINTS: &[&str] = &["Latest", "Stable", "Preview"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelMenuError {
    #[error("model menu is closed")]
    Closed,
    #[error("unknown brand: {0}")]
    UnknownBrand(String),
    #[error("unknown version {version} for brand {brand}")]
    UnknownVersion { brand: String, version: String },
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
    #[error("choose a version before an endpoint")]
    VersionNotChosen,
}

pub fn versions_for(brand: &str) -> Option<&'static [&'static str]> {
    BRANDS
        .iter()
        .find(|entry| entry.name == brand)
        .map(|entry| entry.versions)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelMenu {
    #[default]
    Closed,
    Open {
        brand: String,
        version: Option<String>,
    },
}

impl ModelMenu {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn draft_brand(&self) -> Option<&str> {
        match self {
            Self::Open { brand, .. } => Some(brand.as_str()),
            Self::Closed => None,
        }
    }

    pub fn draft_version(&self) -> Option<&str> {
        match self {
            Self::Open { version, .. } => version.as_deref(),
            Self::Closed => None,
        }
    }

    /// Opens with the draft seeded from `committed`, or closes without
    /// committing.
    pub fn toggle(&mut self, committed: &ModelSelection) {
        *self = match self {
            Self::Closed => Self::Open {
                brand: committed.brand.clone(),
                version: Some(committed.version.clone()),
            },
            Self::Open { .. } => Self::Closed,
        };
    }

    pub fn choose_brand(&mut self, name: &str) -> Result<(), ModelMenuError> {
        let Self::Open { brand, version } = self else {
            return Err(ModelMenuError::Closed);
        };
        if versions_for(name).is_none() {
            return Err(ModelMenuError::UnknownBrand(name.to_string()));
        }
        if brand.as_str() != name {
            *brand = name.to_string();
            *version = None;
        }
        Ok(())
    }

    pub fn choose_version(&mut self, name: &str) -> Result<(), ModelMenuError> {
        let Self::Open { brand, version } = self else {
            return Err(ModelMenuError::Closed);
        };
        let known = versions_for(brand).unwrap_or_default();
        if !known.contains(&name) {
            return Err(ModelMenuError::UnknownVersion {
                brand: brand.clone(),
                version: name.to_string(),
            });
        }
        *version = Some(name.to_string());
        Ok(())
    }

    pub fn choose_endpoint(&mut self, name: &str) -> Result<ModelSelection, ModelMenuError> {
        let Self::Open { brand, version } = self else {
            return Err(ModelMenuError::Closed);
        };
        if !ENDPOINTS.contains(&name) {
            return Err(ModelMenuError::UnknownEndpoint(name.to_string()));
        }
        let Some(version) = version.clone() else {
            return Err(ModelMenuError::VersionNotChosen);
        };
        let selection = ModelSelection {
            brand: brand.clone(),
            version,
            endpoint: name.to_string(),
        };
        *self = Self::Closed;
        Ok(selection)
    }
}
