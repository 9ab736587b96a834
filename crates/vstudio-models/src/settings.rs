//! Generation settings: transition style, pacing and aspect ratio.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingParseError {
    #[error("Unknown transition style: {0}")]
    TransitionStyle(String),

    #[error("Unknown pacing: {0}")]
    Pacing(String),

    #[error("Unsupported aspect ratio: {0}, expected '16:9' or '9:16'")]
    AspectRatio(String),
}

/// How the video moves from one image's content to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    None,
    Fade,
    Dissolve,
    Zoom,
    Pan,
    Cut,
    #[default]
    Morph,
}

impl TransitionStyle {
    pub const ALL: [TransitionStyle; 7] = [
        TransitionStyle::None,
        TransitionStyle::Fade,
        TransitionStyle::Dissolve,
        TransitionStyle::Zoom,
        TransitionStyle::Pan,
        TransitionStyle::Cut,
        TransitionStyle::Morph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::None => "none",
            TransitionStyle::Fade => "fade",
            TransitionStyle::Dissolve => "dissolve",
            TransitionStyle::Zoom => "zoom",
            TransitionStyle::Pan => "pan",
            TransitionStyle::Cut => "cut",
            TransitionStyle::Morph => "morph",
        }
    }

    /// Canonical English phrase used when directing the reasoning model.
    pub fn description(&self) -> &'static str {
        match self {
            TransitionStyle::None => "direct transitions",
            TransitionStyle::Fade => "soft fades to black between key frames",
            TransitionStyle::Dissolve => "smooth cross-dissolve transitions",
            TransitionStyle::Zoom => "dynamic camera zooms transitioning between scenes",
            TransitionStyle::Pan => "seamless cinematic pans connecting the visuals",
            TransitionStyle::Cut => "sharp, rhythmic cuts between images",
            TransitionStyle::Morph => "fluid AI morphing and liquid transitions",
        }
    }

    /// Human-readable label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            TransitionStyle::None => "None (Direct)",
            TransitionStyle::Fade => "Fade to Black",
            TransitionStyle::Dissolve => "Cross Dissolve",
            TransitionStyle::Zoom => "Dynamic Zoom",
            TransitionStyle::Pan => "Cinematic Pan",
            TransitionStyle::Cut => "Rhythmic Cut",
            TransitionStyle::Morph => "AI Morphing",
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransitionStyle {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        TransitionStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == needle)
            .ok_or_else(|| SettingParseError::TransitionStyle(s.to_string()))
    }
}

/// Motion pacing of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    Slow,
    #[default]
    Normal,
    Fast,
    Rhythmic,
}

impl Pacing {
    pub const ALL: [Pacing; 4] = [Pacing::Slow, Pacing::Normal, Pacing::Fast, Pacing::Rhythmic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Slow => "slow",
            Pacing::Normal => "normal",
            Pacing::Fast => "fast",
            Pacing::Rhythmic => "rhythmic",
        }
    }

    /// Canonical English phrase used when directing the reasoning model.
    pub fn description(&self) -> &'static str {
        match self {
            Pacing::Slow => "lingering, meditative pacing",
            Pacing::Normal => "balanced cinematic flow",
            Pacing::Fast => "energetic and rapid movement",
            Pacing::Rhythmic => "timed to a clear beat with consistent intervals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pacing::Slow => "Slow & Meditative",
            Pacing::Normal => "Balanced Flow",
            Pacing::Fast => "Fast & Energetic",
            Pacing::Rhythmic => "Dynamic Rhythm",
        }
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pacing {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Pacing::ALL
            .into_iter()
            .find(|pacing| pacing.as_str() == needle)
            .ok_or_else(|| SettingParseError::Pacing(s.to_string()))
    }
}

/// Output aspect ratio supported by the video engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum AspectRatio {
    /// 16:9 landscape
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            other => Err(SettingParseError::AspectRatio(other.to_string())),
        }
    }
}

/// Snapshot of the user's settings at the moment generation is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct GenerationSettings {
    pub transition_style: TransitionStyle,
    pub pacing: Pacing,
    pub aspect_ratio: AspectRatio,
}
