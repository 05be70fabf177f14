//! Media items and the append-only media collection.
//!
//! Every item owns its file blob and a preview handle. Items are identified
//! by the position they were appended at; there is no remove or reorder.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shorts_common::error::{ShortsError, ShortsResult};

/// Position-derived identifier of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaId(pub usize);

impl MediaId {
    /// Ordinal position in the collection.
    pub fn position(self) -> usize {
        self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An opaque binary file supplied by the user.
///
/// The payload is reference-counted so snapshots taken for submission do not
/// copy image data.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    file_name: String,
    mime_type: String,
    data: Arc<[u8]>,
}

impl MediaBlob {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: Arc::from(data),
        }
    }

    /// Read a file from disk, inferring the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> ShortsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShortsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ShortsError::media(format!("No file name in {}", path.display())))?;
        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or(OCTET_STREAM);

        Ok(Self::new(file_name, mime_type, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

const OCTET_STREAM: &str = "application/octet-stream";

/// Best-effort MIME type for a file extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => OCTET_STREAM,
    }
}

static NEXT_PREVIEW_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Ephemeral display handle allocated for a media item.
///
/// The handle is released when dropped, i.e. when its item leaves the
/// collection.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewRef {
    token: u64,
    locator: String,
}

impl PreviewRef {
    fn allocate(blob: &MediaBlob) -> Self {
        let token = NEXT_PREVIEW_TOKEN.fetch_add(1, Ordering::Relaxed);
        Self {
            token,
            locator: format!("preview://{token}/{}", blob.file_name()),
        }
    }

    /// Display locator for this preview.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

impl Drop for PreviewRef {
    fn drop(&mut self) {
        tracing::trace!(token = self.token, locator = %self.locator, "Released preview");
    }
}

/// One ingested image plus its preview handle.
#[derive(Debug)]
pub struct MediaItem {
    id: MediaId,
    file: MediaBlob,
    preview: PreviewRef,
}

impl MediaItem {
    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn file(&self) -> &MediaBlob {
        &self.file
    }

    pub fn preview(&self) -> &PreviewRef {
        &self.preview
    }
}

/// Ordered, append-only sequence of media items.
#[derive(Debug, Default)]
pub struct MediaCollection {
    items: Vec<MediaItem>,
}

impl MediaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append blobs at the next ordinal positions.
    ///
    /// Returns the range of positions that were created.
    pub fn append(&mut self, files: impl IntoIterator<Item = MediaBlob>) -> Range<usize> {
        let start = self.items.len();
        for file in files {
            let id = MediaId(self.items.len());
            let preview = PreviewRef::allocate(&file);
            tracing::debug!(%id, file = %file.file_name(), bytes = file.len(), "Appended media item");
            self.items.push(MediaItem { id, file, preview });
        }
        start..self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&MediaItem> {
        self.items.get(position)
    }

    /// Items in ordinal order.
    pub fn iter(&self) -> std::slice::Iter<'_, MediaItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a MediaCollection {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
