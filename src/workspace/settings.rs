use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("unknown visual setting key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Landscape,
    Portrait,
    Classic,
    ClassicPortrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Classic,
        Self::ClassicPortrait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Classic => "4:3",
            Self::ClassicPortrait => "3:4",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoDuration {
    Short,
    Medium,
    Long,
}

impl VideoDuration {
    pub const ALL: [VideoDuration; 3] = [Self::Short, Self::Medium, Self::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "4s",
            Self::Medium => "6s",
            Self::Long => "8s",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|duration| duration.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Sd,
    Hd,
    FullHd,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Self::Sd, Self::Hd, Self::FullHd];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sd => "480p",
            Self::Hd => "720p",
            Self::FullHd => "1080p",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|resolution| resolution.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualSettings {
    pub ratio: AspectRatio,
    pub count: u32,
    pub duration: VideoDuration,
    pub resolution: Resolution,
    pub smart_rewrite: bool,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            ratio: AspectRatio::Square,
            count: 1,
            duration: VideoDuration::Short,
            resolution: Resolution::Hd,
            smart_rewrite: false,
        }
    }
}

/// One typed update to [`VisualSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualSetting {
    Ratio(AspectRatio),
    Count(u32),
    Duration(VideoDuration),
    Resolution(Resolution),
    SmartRewrite(bool),
}

impl VisualSetting {
    /// Parses a `(key, value)` pair as the footer selects report them.
    pub fn parse(key: &str, value: &str) -> Result<Self, SettingError> {
        let invalid = |key: &'static str| SettingError::InvalidValue {
            key,
            value: value.to_string(),
        };

        match key {
            "ratio" => AspectRatio::parse(value)
                .map(Self::Ratio)
                .ok_or_else(|| invalid("ratio")),
            "count" => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|count| *count >= 1)
                .map(Self::Count)
                .ok_or_else(|| invalid("count")),
            "duration" => VideoDuration::parse(value)
                .map(Self::Duration)
                .ok_or_else(|| invalid("duration")),
            "resolution" => Resolution::parse(value)
                .map(Self::Resolution)
                .ok_or_else(|| invalid("resolution")),
            "smartRewrite" | "smart_rewrite" => value
                .trim()
                .parse::<bool>()
                .map(Self::SmartRewrite)
                .map_err(|_| invalid("smartRewrite")),
            other => Err(SettingError::UnknownKey(other.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Ratio(_) => "ratio",
            Self::Count(_) => "count",
            Self::Duration(_) => "duration",
            Self::Resolution(_) => "resolution",
            Self::SmartRewrite(_) => "smartRewrite",
        }
    }
}

impl VisualSettings {
    pub fn apply(&mut self, setting: VisualSetting) -> Result<(), SettingError> {
        match setting {
            VisualSetting::Ratio(ratio) => self.ratio = ratio,
            VisualSetting::Count(count) => {
                if count == 0 {
                    return Err(SettingError::InvalidValue {
                        key: "count",
                        value: count.to_string(),
                    });
                }
                self.count = count;
            }
            VisualSetting::Duration(duration) => self.duration = duration,
            VisualSetting::Resolution(resolution) => self.resolution = resolution,
            VisualSetting::SmartRewrite(enabled) => self.smart_rewrite = enabled,
        }
        Ok(())
    }
}
