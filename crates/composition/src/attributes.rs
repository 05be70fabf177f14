//! Per-item presentation attributes.
//!
//! The store is sparse: a position that was never edited reads back as
//! [`AttributeRecord::default`]. Reads go through [`AttributeStore::get_or_default`]
//! so the fallback is explicit at every call site.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seconds an image stays on screen unless edited.
pub const DEFAULT_DURATION_SECS: i64 = 5;

/// Motion applied to an image while it is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// Static framing with a slow zoom.
    #[default]
    Stop,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 5] = [
        AnimationKind::Stop,
        AnimationKind::SlideUp,
        AnimationKind::SlideDown,
        AnimationKind::SlideLeft,
        AnimationKind::SlideRight,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Stop => "stop",
            AnimationKind::SlideUp => "slide-up",
            AnimationKind::SlideDown => "slide-down",
            AnimationKind::SlideLeft => "slide-left",
            AnimationKind::SlideRight => "slide-right",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationKind {
    type Err = EditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| EditParseError::UnknownAnimation { raw: s.to_string() })
    }
}

/// Presentation settings for one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Seconds on screen. Not range-checked here.
    pub duration_secs: i64,

    /// Motion effect.
    pub animation: AnimationKind,

    /// Caption text; may be empty.
    pub script: String,

    /// Whether the caption is voiced with text-to-speech.
    pub tts_enabled: bool,
}

static DEFAULT_RECORD: AttributeRecord = AttributeRecord {
    duration_secs: DEFAULT_DURATION_SECS,
    animation: AnimationKind::Stop,
    script: String::new(),
    tts_enabled: false,
};

impl Default for AttributeRecord {
    fn default() -> Self {
        DEFAULT_RECORD.clone()
    }
}

/// Which attribute an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    Duration,
    Animation,
    Script,
    Tts,
}

impl FromStr for AttributeField {
    type Err = EditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duration" => Ok(AttributeField::Duration),
            "animation" => Ok(AttributeField::Animation),
            "script" => Ok(AttributeField::Script),
            "tts" => Ok(AttributeField::Tts),
            _ => Err(EditParseError::UnknownField { raw: s.to_string() }),
        }
    }
}

/// A single-field write to an attribute record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEdit {
    Duration(i64),
    Animation(AnimationKind),
    Script(String),
    Tts(bool),
}

impl AttributeEdit {
    pub fn field(&self) -> AttributeField {
        match self {
            AttributeEdit::Duration(_) => AttributeField::Duration,
            AttributeEdit::Animation(_) => AttributeField::Animation,
            AttributeEdit::Script(_) => AttributeField::Script,
            AttributeEdit::Tts(_) => AttributeField::Tts,
        }
    }

    /// Coerce a raw input string into a typed edit for `field`.
    ///
    /// Durations accept any finite number; fractional values truncate toward
    /// zero. Scripts are taken verbatim.
    pub fn parse(field: AttributeField, raw: &str) -> Result<Self, EditParseError> {
        match field {
            AttributeField::Duration => parse_duration(raw).map(AttributeEdit::Duration),
            AttributeField::Animation => raw.parse().map(AttributeEdit::Animation),
            AttributeField::Script => Ok(AttributeEdit::Script(raw.to_string())),
            AttributeField::Tts => parse_flag(raw).map(AttributeEdit::Tts),
        }
    }

    fn apply(self, record: &mut AttributeRecord) {
        match self {
            AttributeEdit::Duration(secs) => record.duration_secs = secs,
            AttributeEdit::Animation(kind) => record.animation = kind,
            AttributeEdit::Script(text) => record.script = text,
            AttributeEdit::Tts(enabled) => record.tts_enabled = enabled,
        }
    }
}

fn parse_duration(raw: &str) -> Result<i64, EditParseError> {
    let trimmed = raw.trim();
    if let Ok(secs) = trimmed.parse::<i64>() {
        return Ok(secs);
    }
    match trimmed.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        _ => Err(EditParseError::InvalidDuration {
            raw: raw.to_string(),
        }),
    }
}

fn parse_flag(raw: &str) -> Result<bool, EditParseError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EditParseError::InvalidFlag {
            raw: raw.to_string(),
        }),
    }
}

/// Errors from coercing raw input into an [`AttributeEdit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditParseError {
    #[error("Not a number of seconds: {raw:?}")]
    InvalidDuration { raw: String },

    #[error("Unknown animation {raw:?} (expected stop, slide-up, slide-down, slide-left, slide-right)")]
    UnknownAnimation { raw: String },

    #[error("Not a boolean flag: {raw:?}")]
    InvalidFlag { raw: String },

    #[error("Unknown attribute field: {raw:?}")]
    UnknownField { raw: String },
}

/// Sparse attribute records addressed by media position.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    slots: usize,
    records: BTreeMap<usize, AttributeRecord>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of addressable positions.
    pub fn len(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// Open default slots up to `len`. Never shrinks.
    pub(crate) fn grow_to(&mut self, len: usize) {
        self.slots = self.slots.max(len);
    }

    /// Apply `edit` at `position`.
    ///
    /// Writes to positions that do not exist are ignored and return `false`.
    pub fn set(&mut self, position: usize, edit: AttributeEdit) -> bool {
        if position >= self.slots {
            tracing::debug!(
                position,
                slots = self.slots,
                field = ?edit.field(),
                "Ignoring attribute write for missing position"
            );
            return false;
        }
        edit.apply(self.records.entry(position).or_default());
        true
    }

    /// Stored record at `position`, or the default record if never edited.
    pub fn get_or_default(&self, position: usize) -> &AttributeRecord {
        self.records.get(&position).unwrap_or(&DEFAULT_RECORD)
    }

    /// Stored record only if `position` has been edited.
    pub fn explicit(&self, position: usize) -> Option<&AttributeRecord> {
        self.records.get(&position)
    }

    /// Get-or-default for every slot in ordinal order.
    pub fn records(&self) -> impl Iterator<Item = &AttributeRecord> + '_ {
        (0..self.slots).map(move |position| self.get_or_default(position))
    }
}
