use linemod::{
    learn_template, rasterize_view, FeatureSet, GrayImage, LinemodError, PatchMatcher, Point,
    Rect,
};

fn learned_block(code: u8, block: Rect, w: usize, h: usize) -> FeatureSet {
    let mut feats = GrayImage::new(w, h).unwrap();
    let mut mask = GrayImage::new(w, h).unwrap();
    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            feats.set(x as usize, y as usize, code);
            mask.set(x as usize, y as usize, 255);
        }
    }
    let mut set = FeatureSet::new("s1", "obj");
    learn_template(&feats, &mask, 0, &mut set, false).unwrap();
    set
}

#[test]
fn rasterized_view_matches_perfectly_at_center() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let mut canvas = GrayImage::new(40, 40).unwrap();
    rasterize_view(&mut canvas, &set, 0).unwrap();

    let matcher = PatchMatcher::new();
    let (score, view) = matcher.match_patch(&canvas, Point::new(20, 20), &set);
    assert_eq!(view, Some(0));
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn empty_set_scores_zero_with_no_view() {
    let image = GrayImage::new(16, 16).unwrap();
    let matcher = PatchMatcher::new();
    let (score, view) = matcher.match_patch(&image, Point::new(8, 8), &FeatureSet::default());
    assert_eq!(score, 0.0);
    assert_eq!(view, None);
}

#[test]
fn zero_image_never_selects_a_view() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let image = GrayImage::new(40, 40).unwrap();
    let matcher = PatchMatcher::new();
    let (score, view) = matcher.match_patch(&image, Point::new(20, 20), &set);
    assert_eq!(score, 0.0);
    assert_eq!(view, None);
}

#[test]
fn mostly_occluded_window_gets_placeholder_score() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let image = GrayImage::new(40, 40).unwrap();
    let matcher = PatchMatcher::new();
    // Window is 10x10 centered at the corner: 25 of 100 pixels visible.
    let (score, view) = matcher.match_patch(&image, Point::new(0, 0), &set);
    assert!((score - 0.01).abs() < 1e-6);
    assert_eq!(view, Some(0));
}

#[test]
fn partial_window_normalizes_by_visible_samples() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let mut image = GrayImage::new(40, 40).unwrap();
    image.fill(1);
    let matcher = PatchMatcher::new();
    // Window spans x in [-1, 9): 90 of 100 pixels visible, above the 70%
    // floor. Every visible sample matches, so the score is still 1.0.
    let (score, view) = matcher.match_patch(&image, Point::new(4, 20), &set);
    assert_eq!(view, Some(0));
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn best_view_wins_across_multiple_views() {
    let mut set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let other = learned_block(16, Rect::new(5, 5, 10, 10), 24, 24);
    set.insert_from(&other, 0).unwrap();

    let mut image = GrayImage::new(40, 40).unwrap();
    for y in 15..25 {
        for x in 15..25 {
            image.set(x, y, 16);
        }
    }
    let matcher = PatchMatcher::new();
    let (score, view) = matcher.match_patch(&image, Point::new(20, 20), &set);
    assert_eq!(view, Some(1));
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn match_view_scores_one_specific_view() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let mut image = GrayImage::new(40, 40).unwrap();
    for y in 10..20 {
        for x in 10..20 {
            image.set(x, y, 1);
        }
    }
    let matcher = PatchMatcher::new();
    let score = matcher
        .match_view(&image, Rect::new(10, 10, 10, 10), &set, 0)
        .unwrap();
    assert!((score - 1.0).abs() < 1e-6);

    assert_eq!(
        matcher.match_view(&image, Rect::new(10, 10, 10, 10), &set, 3),
        Err(LinemodError::ViewIndexOutOfRange { index: 3, len: 1 })
    );
}

#[test]
fn rasterize_rejects_undersized_canvas() {
    let set = learned_block(1, Rect::new(5, 5, 10, 10), 24, 24);
    let mut canvas = GrayImage::new(8, 8).unwrap();
    assert_eq!(
        rasterize_view(&mut canvas, &set, 0),
        Err(LinemodError::InvalidInput("view does not fit the canvas"))
    );
}

#[test]
fn neighboring_orientation_bits_score_below_exact() {
    let set = learned_block(2, Rect::new(5, 5, 10, 10), 24, 24);
    let mut image = GrayImage::new(40, 40).unwrap();
    image.fill(4);
    let matcher = PatchMatcher::new();
    let (score, _) = matcher.match_patch(&image, Point::new(20, 20), &set);
    // Adjacent buckets score the distance-1 cosine falloff.
    assert!((score - 0.961_939_766).abs() < 1e-5);
}
