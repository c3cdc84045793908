//! Multi-modal object store and sliding-window search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::image::GrayImage;
use crate::mode::{ModeStore, ViewMatch};
use crate::nms::non_max_rect_suppress;
use crate::trace::{trace_event, trace_span};
use crate::util::{LinemodError, LinemodResult, Point, Rect};

/// Detection results from one matching call.
///
/// The first five vectors are parallel: entry `k` of each describes the same
/// candidate. A fresh value is built per call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detections {
    pub rects: Vec<Rect>,
    pub scores: Vec<f32>,
    pub object_ids: Vec<String>,
    pub frame_numbers: Vec<i32>,
    /// Matched view index per requested modality, aligned with `modes_used`.
    /// `None` marks a modality with no match or absent from the store.
    pub feature_indices: Vec<Vec<Option<usize>>>,
    /// Modalities the search was asked to combine.
    pub modes_used: Vec<String>,
    /// Candidate count before non-maximum suppression.
    pub raw_candidates: usize,
}

impl Detections {
    /// Number of surviving detections.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Removes detection `index` from every parallel array.
    pub fn remove(&mut self, index: usize) {
        self.rects.remove(index);
        self.scores.remove(index);
        self.object_ids.remove(index);
        self.frame_numbers.remove(index);
        self.feature_indices.remove(index);
    }
}

/// Top-level template store: modality name to [`ModeStore`].
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct MultiModalObjectStore {
    pub modes: BTreeMap<String, ModeStore>,
}

impl MultiModalObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns one view per modality with novelty gating.
    ///
    /// `images[k]` is the feature image for `mode_names[k]`. Returns the
    /// object's total view count across all requested modalities.
    #[allow(clippy::too_many_arguments)]
    pub fn learn(
        &mut self,
        images: &[GrayImage],
        mode_names: &[&str],
        mask: &GrayImage,
        session_id: &str,
        object_id: &str,
        frame_number: i32,
        learn_thresh: f32,
    ) -> LinemodResult<usize> {
        let _span = trace_span!("learn", object = object_id, frame = frame_number).entered();
        if images.len() != mode_names.len() {
            return Err(LinemodError::InvalidInput(
                "one feature image is required per modality name",
            ));
        }

        let mut total = 0usize;
        for (image, &mode) in images.iter().zip(mode_names) {
            let store = self
                .modes
                .entry(mode.to_string())
                .or_insert_with(|| ModeStore::new(mode));
            store.learn_gated(image, mask, session_id, object_id, frame_number, learn_thresh)?;
            total += store.objects.get(object_id).map_or(0, |s| s.len());
        }
        trace_event!("views_total", object_views = total as u64);
        Ok(total)
    }

    /// Combined score of one object at a grid point, summed over the
    /// requested modalities present in the store and normalized by the
    /// number of requested modalities.
    fn score_object_at(
        &self,
        object_id: &str,
        images: &[GrayImage],
        mode_names: &[&str],
        at: Point,
    ) -> (f32, Vec<Option<usize>>, Option<ViewMatch>) {
        let mut sum = 0.0f32;
        let mut indices = Vec::new();
        let mut last_hit = None;
        for (image, &mode) in images.iter().zip(mode_names) {
            let Some(store) = self.modes.get(mode) else {
                // Keep the index list aligned with the requested modalities.
                indices.push(None);
                continue;
            };
            let (score, hit) = store.match_object(object_id, image, at);
            sum += score;
            indices.push(hit.map(|h| h.view));
            if hit.is_some() {
                last_hit = hit;
            }
        }
        (sum / images.len() as f32, indices, last_hit)
    }

    fn object_names(&self) -> Vec<String> {
        self.modes
            .values()
            .next()
            .map(|store| store.object_names())
            .unwrap_or_default()
    }

    /// Scores every learned object at one point.
    ///
    /// Reported rectangles keep the original convention: the matched view's
    /// centered box shifted by half its own size, not placed at `at`.
    pub fn match_at_point(
        &self,
        images: &[GrayImage],
        mode_names: &[&str],
        at: Point,
        match_threshold: f32,
    ) -> LinemodResult<Detections> {
        let mut out = Detections::default();
        if images.is_empty() || mode_names.is_empty() {
            return Ok(out);
        }
        if images.len() != mode_names.len() {
            return Err(LinemodError::InvalidInput(
                "one feature image is required per modality name",
            ));
        }
        out.modes_used = mode_names.iter().map(|m| m.to_string()).collect();

        for object_id in self.object_names() {
            let (score, indices, hit) = self.score_object_at(&object_id, images, mode_names, at);
            let Some(hit) = hit else { continue };
            if score > match_threshold {
                let bb = Rect::new(
                    hit.rect.x - at.x,
                    hit.rect.y - at.y,
                    hit.rect.width,
                    hit.rect.height,
                );
                out.rects.push(Rect::new(
                    bb.x + bb.width / 2,
                    bb.y + bb.height / 2,
                    bb.width,
                    bb.height,
                ));
                out.scores.push(score);
                out.object_ids.push(object_id);
                out.frame_numbers.push(hit.frame_number);
                out.feature_indices.push(indices);
            }
        }
        out.raw_candidates = out.len();
        Ok(out)
    }

    /// Sliding-window search over the whole image, followed by non-maximum
    /// suppression.
    ///
    /// When `mask` is given, only grid points with a nonzero mask pixel are
    /// scored. `skip_x` and `skip_y` set the grid stride and must be nonzero.
    #[allow(clippy::too_many_arguments)]
    pub fn match_all(
        &self,
        images: &[GrayImage],
        mode_names: &[&str],
        mask: Option<&GrayImage>,
        match_threshold: f32,
        frac_overlap: f32,
        skip_x: usize,
        skip_y: usize,
    ) -> LinemodResult<Detections> {
        let _span = trace_span!("match_all").entered();
        if skip_x == 0 || skip_y == 0 {
            return Err(LinemodError::InvalidInput("grid stride must be nonzero"));
        }
        let mut out = Detections::default();
        if images.is_empty() || mode_names.is_empty() {
            return Ok(out);
        }
        if images.len() != mode_names.len() {
            return Err(LinemodError::InvalidInput(
                "one feature image is required per modality name",
            ));
        }
        if let Some(mask) = mask {
            if !mask.same_size(&images[0]) {
                return Err(LinemodError::DimensionMismatch {
                    expected_width: images[0].width(),
                    expected_height: images[0].height(),
                    got_width: mask.width(),
                    got_height: mask.height(),
                });
            }
        }
        out.modes_used = mode_names.iter().map(|m| m.to_string()).collect();

        let object_ids = self.object_names();
        let (w, h) = (images[0].width(), images[0].height());
        for y in (0..h).step_by(skip_y) {
            for x in (0..w).step_by(skip_x) {
                if let Some(mask) = mask {
                    if mask.at(x, y) == 0 {
                        continue;
                    }
                }
                let at = Point::new(x as i32, y as i32);
                for object_id in &object_ids {
                    let (score, indices, hit) =
                        self.score_object_at(object_id, images, mode_names, at);
                    let Some(hit) = hit else { continue };
                    if score > match_threshold {
                        out.rects.push(hit.rect);
                        out.scores.push(score);
                        out.object_ids.push(object_id.clone());
                        out.frame_numbers.push(hit.frame_number);
                        out.feature_indices.push(indices);
                    }
                }
            }
        }

        out.raw_candidates = out.len();
        non_max_rect_suppress(
            &mut out.rects,
            &mut out.scores,
            &mut out.object_ids,
            &mut out.frame_numbers,
            &mut out.feature_indices,
            frac_overlap,
        )?;
        trace_event!(
            "detections",
            raw = out.raw_candidates as u64,
            kept = out.len() as u64
        );
        Ok(out)
    }
}
