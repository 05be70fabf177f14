//! Subcommands and the shared composition inputs they accept.

pub mod fonts;
pub mod generate;
pub mod plan;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Args;
use shorts_common::config::AppConfig;
use shorts_composition::{
    AttributeEdit, AttributeField, Composition, FontChoice, GlobalSettings, MediaBlob,
};

/// Images, per-item edits, and global settings given on the command line.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Image files, in the order they should appear
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Title text drawn over every image
    #[arg(long, default_value = "")]
    pub topic: String,

    /// Title font size (defaults to config)
    #[arg(long)]
    pub title_font_size: Option<u32>,

    /// Script font size (defaults to config)
    #[arg(long)]
    pub script_font_size: Option<u32>,

    /// Font identifier or display name (see `shorts fonts`)
    #[arg(long)]
    pub font: Option<String>,

    /// Background music file
    #[arg(long)]
    pub bgm: Option<PathBuf>,

    /// Seconds on screen for one image, as INDEX=SECONDS (repeatable)
    #[arg(long = "duration", value_name = "INDEX=SECONDS")]
    pub durations: Vec<String>,

    /// Animation for one image, as INDEX=KIND (repeatable)
    #[arg(long = "animation", value_name = "INDEX=KIND")]
    pub animations: Vec<String>,

    /// Caption for one image, as INDEX=TEXT (repeatable)
    #[arg(long = "script", value_name = "INDEX=TEXT")]
    pub scripts: Vec<String>,

    /// Voice the caption of image INDEX with TTS (repeatable)
    #[arg(long = "tts", value_name = "INDEX")]
    pub tts: Vec<usize>,
}

impl InputArgs {
    /// Load files and apply edits, producing the state to submit.
    pub fn load(&self, config: &AppConfig) -> anyhow::Result<(Composition, GlobalSettings)> {
        let mut composition = Composition::new();
        let mut blobs = Vec::with_capacity(self.images.len());
        for path in &self.images {
            let blob = MediaBlob::from_path(path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            if !blob.is_image() {
                bail!("Not an image: {} ({})", path.display(), blob.mime_type());
            }
            blobs.push(blob);
        }
        composition.append(blobs);

        let edits = self
            .durations
            .iter()
            .map(|raw| (AttributeField::Duration, raw))
            .chain(self.animations.iter().map(|raw| (AttributeField::Animation, raw)))
            .chain(self.scripts.iter().map(|raw| (AttributeField::Script, raw)));
        for (field, raw) in edits {
            let (position, edit) = parse_indexed(field, raw)?;
            apply(&mut composition, position, edit)?;
        }
        for &position in &self.tts {
            apply(&mut composition, position, AttributeEdit::Tts(true))?;
        }

        let mut settings = GlobalSettings::from_defaults(&config.defaults);
        settings.topic_text = self.topic.clone();
        if let Some(size) = self.title_font_size {
            settings.title_font_size = size;
        }
        if let Some(size) = self.script_font_size {
            settings.script_font_size = size;
        }
        if let Some(font) = &self.font {
            settings.font = font
                .parse::<FontChoice>()
                .map_err(|e| anyhow!("{e}; run `shorts fonts` for the list"))?;
        }
        if let Some(path) = &self.bgm {
            let blob = MediaBlob::from_path(path)
                .with_context(|| format!("Failed to read background music {}", path.display()))?;
            if !blob.is_audio() {
                bail!("Not an audio file: {} ({})", path.display(), blob.mime_type());
            }
            settings.background_audio = Some(blob);
        }

        Ok((composition, settings))
    }
}

/// Split `INDEX=VALUE` and coerce the value for `field`.
fn parse_indexed(field: AttributeField, raw: &str) -> anyhow::Result<(usize, AttributeEdit)> {
    let (index, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected INDEX=VALUE, got {raw:?}"))?;
    let position = index
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Bad image index in {raw:?}"))?;
    let edit = AttributeEdit::parse(field, value)?;
    Ok((position, edit))
}

/// The CLI can name positions that do not exist; report those instead of
/// silently dropping them like the store does.
fn apply(composition: &mut Composition, position: usize, edit: AttributeEdit) -> anyhow::Result<()> {
    if !composition.set_attribute(position, edit) {
        bail!(
            "Image index {position} is out of range (have {} image(s))",
            composition.len()
        );
    }
    Ok(())
}
