use linemod::store::{feature_set_from_bytes, feature_set_to_bytes, from_bytes, to_bytes};
use linemod::{learn_template, FeatureSet, GrayImage, MultiModalObjectStore, Point, Rect};

fn block_images(code: u8, block: Rect, w: usize, h: usize) -> (GrayImage, GrayImage) {
    let mut feats = GrayImage::new(w, h).unwrap();
    let mut mask = GrayImage::new(w, h).unwrap();
    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            feats.set(x as usize, y as usize, code);
            mask.set(x as usize, y as usize, 255);
        }
    }
    (feats, mask)
}

#[test]
fn feature_set_survives_a_round_trip() {
    let (feats, mask) = block_images(4, Rect::new(3, 2, 6, 8), 16, 16);
    let mut set = FeatureSet::new("lab", "mug");
    learn_template(&feats, &mask, 42, &mut set, false).unwrap();

    let blob = feature_set_to_bytes(&set).unwrap();
    let restored = feature_set_from_bytes(&blob).unwrap();
    assert_eq!(restored, set);
    assert_eq!(restored.session_id, "lab");
    assert_eq!(restored.frame_numbers, vec![42]);
}

#[test]
fn store_round_trip_preserves_templates_and_keeps_matching() {
    let (feats_a, mask_a) = block_images(1, Rect::new(4, 4, 8, 8), 20, 20);
    let (feats_b, mask_b) = block_images(8, Rect::new(5, 3, 6, 10), 20, 20);

    let mut store = MultiModalObjectStore::new();
    store
        .learn(&[feats_a.clone()], &["m0"], &mask_a, "lab", "mug", 0, 0.0)
        .unwrap();
    store
        .learn(&[feats_b], &["m0"], &mask_b, "lab", "bottle", 1, 0.0)
        .unwrap();

    let blob = to_bytes(&store).unwrap();
    let restored = from_bytes(&blob).unwrap();

    assert_eq!(
        restored.modes.keys().collect::<Vec<_>>(),
        store.modes.keys().collect::<Vec<_>>()
    );
    assert_eq!(restored.modes["m0"].objects, store.modes["m0"].objects);

    // The restored store matches like the original; scratch state is
    // rebuilt lazily and is not part of the blob.
    let hits = restored
        .match_at_point(&[feats_a], &["m0"], Point::new(8, 8), 0.9)
        .unwrap();
    assert_eq!(hits.object_ids, vec!["mug"]);
    assert!(hits.scores[0] > 0.99);
}

#[test]
fn corrupted_blob_is_rejected() {
    let err = from_bytes(&[0xFF; 3]);
    assert!(matches!(
        err,
        Err(linemod::LinemodError::Serialization(_))
    ));
}
