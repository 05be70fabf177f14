//! The editable composition: media and attributes kept index-aligned.

use std::ops::Range;

use crate::attributes::{AttributeEdit, AttributeRecord, AttributeStore};
use crate::media::{MediaBlob, MediaCollection, MediaItem};

/// Owner of the media collection and its attribute store.
///
/// All mutation goes through this type so that attribute slot `i` always
/// describes media item `i`.
#[derive(Debug, Default)]
pub struct Composition {
    media: MediaCollection,
    attributes: AttributeStore,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest files at the end of the collection with default attributes.
    pub fn append(&mut self, files: impl IntoIterator<Item = MediaBlob>) -> Range<usize> {
        let added = self.media.append(files);
        self.attributes.grow_to(self.media.len());
        debug_assert!(self.is_aligned());
        added
    }

    /// Edit one attribute of the item at `position`.
    ///
    /// Returns `false` if no such item exists; the write is dropped.
    pub fn set_attribute(&mut self, position: usize, edit: AttributeEdit) -> bool {
        self.attributes.set(position, edit)
    }

    /// Attribute record for `position`, falling back to defaults.
    pub fn attribute(&self, position: usize) -> &AttributeRecord {
        self.attributes.get_or_default(position)
    }

    pub fn media(&self) -> &MediaCollection {
        &self.media
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    /// Each media item paired with its effective attributes, in order.
    pub fn entries(&self) -> impl Iterator<Item = (&MediaItem, &AttributeRecord)> + '_ {
        self.media
            .iter()
            .map(move |item| (item, self.attributes.get_or_default(item.id().position())))
    }

    /// Whether the attribute store addresses exactly the media positions.
    pub fn is_aligned(&self) -> bool {
        self.media.len() == self.attributes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AnimationKind;

    fn jpeg(name: &str) -> MediaBlob {
        MediaBlob::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    #[test]
    fn test_append_opens_default_slots() {
        let mut composition = Composition::new();
        composition.append([jpeg("a.jpg"), jpeg("b.jpg")]);

        assert_eq!(composition.len(), 2);
        assert!(composition.is_aligned());
        assert_eq!(composition.attributes().records().count(), 2);
        assert_eq!(composition.attribute(1), &AttributeRecord::default());
    }

    #[test]
    fn test_set_attribute_before_append_is_dropped() {
        let mut composition = Composition::new();
        assert!(!composition.set_attribute(0, AttributeEdit::Duration(9)));

        composition.append([jpeg("a.jpg")]);
        assert_eq!(composition.attribute(0).duration_secs, 5);
    }

    #[test]
    fn test_entries_pair_items_with_their_records() {
        let mut composition = Composition::new();
        composition.append([jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")]);
        composition.set_attribute(2, AttributeEdit::Animation(AnimationKind::SlideDown));
        composition.set_attribute(0, AttributeEdit::Tts(true));

        let summary: Vec<_> = composition
            .entries()
            .map(|(item, record)| (item.file().file_name().to_string(), record.animation, record.tts_enabled))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.jpg".to_string(), AnimationKind::Stop, true),
                ("b.jpg".to_string(), AnimationKind::Stop, false),
                ("c.jpg".to_string(), AnimationKind::SlideDown, false),
            ]
        );
    }
}
