use proptest::prelude::*;

use shorts_composition::{AnimationKind, AttributeEdit, AttributeRecord, Composition, MediaBlob};

fn blobs(n: usize, batch: usize) -> Vec<MediaBlob> {
    (0..n)
        .map(|i| MediaBlob::new(format!("b{batch}_{i}.png"), "image/png", vec![i as u8]))
        .collect()
}

fn edit_strategy() -> impl Strategy<Value = AttributeEdit> {
    prop_oneof![
        (-10i64..120).prop_map(AttributeEdit::Duration),
        (0usize..AnimationKind::ALL.len()).prop_map(|i| AttributeEdit::Animation(AnimationKind::ALL[i])),
        "[a-z ]{0,12}".prop_map(AttributeEdit::Script),
        any::<bool>().prop_map(AttributeEdit::Tts),
    ]
}

proptest! {
    #[test]
    fn attribute_slots_track_media_after_every_append(batches in prop::collection::vec(0usize..6, 0..10)) {
        let mut composition = Composition::new();
        prop_assert!(composition.is_aligned());

        for (batch, n) in batches.iter().enumerate() {
            composition.append(blobs(*n, batch));
            prop_assert_eq!(composition.media().len(), composition.attributes().len());
            prop_assert_eq!(composition.attributes().records().count(), composition.len());
        }
    }

    #[test]
    fn untouched_positions_read_exact_default(
        n in 1usize..12,
        edits in prop::collection::vec((0usize..24, edit_strategy()), 0..16),
    ) {
        let mut composition = Composition::new();
        composition.append(blobs(n, 0));

        let mut touched = std::collections::BTreeSet::new();
        for (position, edit) in edits {
            if composition.set_attribute(position, edit) {
                touched.insert(position);
            }
        }

        for position in 0..n {
            if !touched.contains(&position) {
                prop_assert_eq!(composition.attribute(position), &AttributeRecord::default());
            }
        }
        prop_assert!(touched.iter().all(|p| *p < n));
    }
}
