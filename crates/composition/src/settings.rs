//! Session-wide settings that apply to every item in the video.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shorts_common::config::CompositionDefaults;

use crate::media::MediaBlob;

/// Default title text size in points.
pub const DEFAULT_TITLE_FONT_SIZE: u32 = 200;

/// Default script text size in points.
pub const DEFAULT_SCRIPT_FONT_SIZE: u32 = 100;

/// Fonts the render service knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontChoice {
    #[serde(rename = "NanumBarunpenB")]
    NanumBarunpenBold,
    #[serde(rename = "NanumBrush")]
    NanumBrush,
    #[default]
    #[serde(rename = "NanumGothic")]
    NanumGothic,
    #[serde(rename = "NanumGothicBold")]
    NanumGothicBold,
    #[serde(rename = "잘난체TTF")]
    Jalnan,
}

impl FontChoice {
    pub const ALL: [FontChoice; 5] = [
        FontChoice::NanumBarunpenBold,
        FontChoice::NanumBrush,
        FontChoice::NanumGothic,
        FontChoice::NanumGothicBold,
        FontChoice::Jalnan,
    ];

    /// Identifier sent in the `selectedFont` field.
    pub fn wire_id(&self) -> &'static str {
        match self {
            FontChoice::NanumBarunpenBold => "NanumBarunpenB",
            FontChoice::NanumBrush => "NanumBrush",
            FontChoice::NanumGothic => "NanumGothic",
            FontChoice::NanumGothicBold => "NanumGothicBold",
            FontChoice::Jalnan => "잘난체TTF",
        }
    }

    /// Human-readable name for pickers.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontChoice::NanumBarunpenBold => "Nanum Barunpen Bold",
            FontChoice::NanumBrush => "Nanum Brush",
            FontChoice::NanumGothic => "Nanum Gothic",
            FontChoice::NanumGothicBold => "Nanum Gothic Bold",
            FontChoice::Jalnan => "잘난체",
        }
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for FontChoice {
    type Err = UnknownFont;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FontChoice::ALL
            .into_iter()
            .find(|font| font.wire_id() == s || font.display_name() == s)
            .ok_or_else(|| UnknownFont(s.to_string()))
    }
}

/// A font identifier outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown font {0:?}")]
pub struct UnknownFont(pub String);

/// Settings shared by the whole composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    /// Title drawn over every image; empty means no title.
    pub topic_text: String,

    /// Title text size in points.
    pub title_font_size: u32,

    /// Script text size in points.
    pub script_font_size: u32,

    /// Typeface for title and scripts.
    pub font: FontChoice,

    /// Optional background music track.
    pub background_audio: Option<MediaBlob>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            topic_text: String::new(),
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            script_font_size: DEFAULT_SCRIPT_FONT_SIZE,
            font: FontChoice::default(),
            background_audio: None,
        }
    }
}

impl GlobalSettings {
    /// Fresh settings seeded from configured defaults.
    ///
    /// An unrecognized configured font falls back to the built-in default.
    pub fn from_defaults(defaults: &CompositionDefaults) -> Self {
        let font = defaults.font.parse().unwrap_or_else(|e: UnknownFont| {
            tracing::warn!(error = %e, "Configured font not recognized, using default");
            FontChoice::default()
        });
        Self {
            title_font_size: defaults.title_font_size,
            script_font_size: defaults.script_font_size,
            font,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.title_font_size, 200);
        assert_eq!(settings.script_font_size, 100);
        assert_eq!(settings.font, FontChoice::NanumGothic);
        assert!(settings.topic_text.is_empty());
        assert!(settings.background_audio.is_none());
    }

    #[test]
    fn test_font_parse_accepts_wire_and_display_names() {
        assert_eq!("NanumBarunpenB".parse::<FontChoice>(), Ok(FontChoice::NanumBarunpenBold));
        assert_eq!("잘난체".parse::<FontChoice>(), Ok(FontChoice::Jalnan));
        assert_eq!("잘난체TTF".parse::<FontChoice>(), Ok(FontChoice::Jalnan));
        assert!("Comic Sans".parse::<FontChoice>().is_err());
    }

    #[test]
    fn test_font_serde_uses_wire_id() {
        for font in FontChoice::ALL {
            let json = serde_json::to_string(&font).unwrap();
            assert_eq!(json, format!("\"{}\"", font.wire_id()));
        }
    }

    #[test]
    fn test_from_defaults_falls_back_on_unknown_font() {
        let defaults = CompositionDefaults {
            title_font_size: 120,
            script_font_size: 60,
            font: "Papyrus".to_string(),
        };
        let settings = GlobalSettings::from_defaults(&defaults);
        assert_eq!(settings.title_font_size, 120);
        assert_eq!(settings.script_font_size, 60);
        assert_eq!(settings.font, FontChoice::NanumGothic);
    }
}
