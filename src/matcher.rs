//! Brute-force patch matching against learned views.

use crate::features::FeatureSet;
use crate::image::GrayImage;
use crate::table::MatchTable;
use crate::util::{LinemodError, LinemodResult, Point, Rect};

/// Views with less than this fraction visible are not scored.
const MIN_VISIBLE_FRACTION: f32 = 0.7;
/// Placeholder score for views too occluded to evaluate.
const DEGENERATE_SCORE: f32 = 0.01;

/// Scores learned views against a feature image at a query point.
#[derive(Clone, Default)]
pub struct PatchMatcher {
    table: MatchTable,
}

impl PatchMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn score_view(&self, image: &GrayImage, at: Point, set: &FeatureSet, view: usize) -> f32 {
        let bb = set.bbox[view];
        let window = Rect::new(at.x + bb.x, at.y + bb.y, bb.width, bb.height);
        let image_rect = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        let visible = image_rect.intersect(&window);

        let codes = &set.features[view];
        let offsets = &set.offsets[view];

        let mut sum = 0.0f32;
        let mut norm = 0usize;
        if visible.area() == window.area() {
            // Fully inside the image, no per-feature bounds checks needed.
            for (code, off) in codes.iter().zip(offsets) {
                let px = image.at((at.x + off.x) as usize, (at.y + off.y) as usize);
                sum += self.table.similarity(*code, px);
            }
            norm = codes.len();
        } else if visible.area() < (window.area() as f32 * MIN_VISIBLE_FRACTION) as i64 {
            sum = DEGENERATE_SCORE;
            norm = 1;
        } else {
            for (code, off) in codes.iter().zip(offsets) {
                if let Some(px) = image.get(at.x + off.x, at.y + off.y) {
                    sum += self.table.similarity(*code, px);
                    norm += 1;
                }
            }
        }

        if norm == 0 {
            norm = 1;
        }
        sum / norm as f32
    }

    /// Scores every view of `set` centered at `at` and returns the best
    /// score with the winning view index.
    ///
    /// An empty set scores `(0.0, None)`.
    pub fn match_patch(
        &self,
        image: &GrayImage,
        at: Point,
        set: &FeatureSet,
    ) -> (f32, Option<usize>) {
        let mut best_score = 0.0f32;
        let mut best_view = None;
        for view in 0..set.len() {
            let score = self.score_view(image, at, set, view);
            if score > best_score {
                best_score = score;
                best_view = Some(view);
            }
        }
        (best_score, best_view)
    }

    /// Scores one specific view centered on `rect`.
    pub fn match_view(
        &self,
        image: &GrayImage,
        rect: Rect,
        set: &FeatureSet,
        view: usize,
    ) -> LinemodResult<f32> {
        if set.is_empty() {
            return Ok(0.0);
        }
        if view >= set.len() {
            return Err(LinemodError::ViewIndexOutOfRange {
                index: view,
                len: set.len(),
            });
        }
        let at = Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2);
        Ok(self.score_view(image, at, set, view))
    }
}

/// Draws the sparse codes of one view onto `canvas`, centered.
///
/// The view's bounding box must fit inside the canvas.
pub fn rasterize_view(
    canvas: &mut GrayImage,
    set: &FeatureSet,
    view: usize,
) -> LinemodResult<()> {
    if view >= set.len() {
        return Err(LinemodError::ViewIndexOutOfRange {
            index: view,
            len: set.len(),
        });
    }
    let bb = set.bbox[view];
    let cx = canvas.width() as i32 / 2;
    let cy = canvas.height() as i32 / 2;
    if bb.x + cx < 0
        || bb.y + cy < 0
        || bb.x + cx + bb.width > canvas.width() as i32
        || bb.y + cy + bb.height > canvas.height() as i32
    {
        return Err(LinemodError::InvalidInput("view does not fit the canvas"));
    }

    for y in 0..bb.height {
        for x in 0..bb.width {
            canvas.set((bb.x + cx + x) as usize, (bb.y + cy + y) as usize, 0);
        }
    }
    for (code, off) in set.features[view].iter().zip(&set.offsets[view]) {
        canvas.set((cx + off.x) as usize, (cy + off.y) as usize, *code);
    }
    Ok(())
}
