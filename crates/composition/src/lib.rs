//! Shorts Maker Composition Model
//!
//! Defines the in-memory state a user edits before submitting a video:
//! - **Media:** The ordered, append-only list of images with preview handles
//! - **Attributes:** Per-position presentation settings (duration, animation, script, TTS)
//! - **Settings:** Global title/script typography, topic text, and background music
//! - **Composition:** The context object that keeps media and attributes index-aligned
//!
//! Attributes are addressed by ordinal position. This is sound only because
//! the media list never removes or reorders items.

pub mod attributes;
pub mod composition;
pub mod media;
pub mod settings;

pub use attributes::*;
pub use composition::*;
pub use media::*;
pub use settings::*;
