//! Request assembly.
//!
//! The render service zips the repeating fields back together by position.
//! Nothing in the payload names the item a value belongs to, so the order in
//! which fields are appended here is part of the wire contract.

use shorts_composition::{Composition, GlobalSettings, MediaBlob};

/// Repeating file field, one part per image.
pub const FIELD_IMAGES: &str = "images";
/// Repeating duration field, aligned with [`FIELD_IMAGES`].
pub const FIELD_DURATIONS: &str = "durations[]";
/// Repeating animation field, aligned with [`FIELD_IMAGES`].
pub const FIELD_ANIMATIONS: &str = "animations[]";
/// Repeating script field, aligned with [`FIELD_IMAGES`].
pub const FIELD_SCRIPTS: &str = "scripts[]";
/// Repeating TTS flag field (`"true"`/`"false"`), aligned with [`FIELD_IMAGES`].
pub const FIELD_TTS_ENABLED: &str = "ttsEnabled[]";
pub const FIELD_TOPIC_TEXT: &str = "topicText";
pub const FIELD_TITLE_FONT_SIZE: &str = "titleFontSize";
pub const FIELD_SCRIPT_FONT_SIZE: &str = "scriptFontSize";
pub const FIELD_SELECTED_FONT: &str = "selectedFont";
/// Optional background music file.
pub const FIELD_BGM: &str = "bgm";

/// Value of one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(MediaBlob),
}

/// One named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Ordered multipart fields ready for transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<FormField>,
}

impl SubmissionPayload {
    fn push_text(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push(FormField {
            name,
            value: FieldValue::Text(value.into()),
        });
    }

    fn push_file(&mut self, name: &'static str, file: MediaBlob) {
        self.fields.push(FormField {
            name,
            value: FieldValue::File(file),
        });
    }

    /// All fields in append order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text values of every field called `name`, in order.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .filter_map(|f| match &f.value {
                FieldValue::Text(text) => Some(text.as_str()),
                FieldValue::File(_) => None,
            })
            .collect()
    }

    /// File parts of every field called `name`, in order.
    pub fn files(&self, name: &str) -> Vec<&MediaBlob> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .filter_map(|f| match &f.value {
                FieldValue::File(file) => Some(file),
                FieldValue::Text(_) => None,
            })
            .collect()
    }

    /// First text value of `name`, for scalar fields.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts(name).into_iter().next()
    }

    /// Total bytes of all file parts.
    pub fn file_bytes(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match &f.value {
                FieldValue::File(file) => file.len(),
                FieldValue::Text(_) => 0,
            })
            .sum()
    }
}

/// Serialize a composition and its global settings into one payload.
///
/// Per item, in ordinal order: the image, then its duration, animation,
/// script and TTS flag. Untouched items contribute default attributes. The
/// global scalars follow, then the background track if one is set. An empty
/// composition is not rejected here.
pub fn build_request(composition: &Composition, settings: &GlobalSettings) -> SubmissionPayload {
    let mut payload = SubmissionPayload::default();

    for (item, record) in composition.entries() {
        payload.push_file(FIELD_IMAGES, item.file().clone());
        payload.push_text(FIELD_DURATIONS, record.duration_secs.to_string());
        payload.push_text(FIELD_ANIMATIONS, record.animation.as_str());
        payload.push_text(FIELD_SCRIPTS, record.script.clone());
        payload.push_text(FIELD_TTS_ENABLED, record.tts_enabled.to_string());
    }

    payload.push_text(FIELD_TOPIC_TEXT, settings.topic_text.clone());
    payload.push_text(FIELD_TITLE_FONT_SIZE, settings.title_font_size.to_string());
    payload.push_text(FIELD_SCRIPT_FONT_SIZE, settings.script_font_size.to_string());
    payload.push_text(FIELD_SELECTED_FONT, settings.font.wire_id());

    if let Some(bgm) = &settings.background_audio {
        payload.push_file(FIELD_BGM, bgm.clone());
    }

    tracing::debug!(
        items = composition.len(),
        fields = payload.len(),
        file_bytes = payload.file_bytes(),
        "Assembled render request"
    );

    payload
}
