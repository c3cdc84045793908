//! Per-modality template storage with novelty-gated learning.
//!
//! A `ModeStore` owns every object's `FeatureSet` for one feature modality.
//! New views are only committed when the existing templates fail to explain
//! them: the provisional view is rasterized onto a scratch canvas and matched
//! against the stored set, and a high score means the view adds nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;
use crate::image::GrayImage;
use crate::learn::learn_template;
use crate::matcher::{rasterize_view, PatchMatcher};
use crate::trace::{trace_event, trace_span};
use crate::util::{LinemodResult, Point, Rect};

/// Extra pixels around a rasterized view on the scratch canvas.
const PATCH_MARGIN: i32 = 20;

/// One scored view match at a concrete image location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewMatch {
    pub score: f32,
    pub view: usize,
    pub rect: Rect,
    pub frame_number: i32,
}

/// Object templates for a single feature modality.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModeStore {
    /// Modality name, e.g. `"color_order"`.
    pub mode: String,
    /// Learned templates keyed by object identifier.
    pub objects: BTreeMap<String, FeatureSet>,
    /// Scratch canvas for novelty comparison. Grown on demand, never shrunk.
    #[serde(skip)]
    patch: Option<GrayImage>,
    #[serde(skip)]
    matcher: PatchMatcher,
}

impl ModeStore {
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            objects: BTreeMap::new(),
            patch: None,
            matcher: PatchMatcher::new(),
        }
    }

    /// Identifiers of every object with learned templates.
    pub fn object_names(&self) -> Vec<String> {
        self.objects.values().map(|s| s.object_id.clone()).collect()
    }

    /// Learns a view from `features_img` and `mask`, committing it only when
    /// it is novel.
    ///
    /// Returns the index of the inserted view, or `None` when an existing
    /// view already scores above `learn_thresh` against the candidate.
    pub fn learn_gated(
        &mut self,
        features_img: &GrayImage,
        mask: &GrayImage,
        session_id: &str,
        object_id: &str,
        frame_number: i32,
        learn_thresh: f32,
    ) -> LinemodResult<Option<usize>> {
        let _span = trace_span!("learn_gated", mode = self.mode.as_str()).entered();

        let mut provisional = FeatureSet::new(session_id, object_id);
        let view = learn_template(features_img, mask, frame_number, &mut provisional, false)?;
        let bb = provisional.bbox[view];

        let needs_grow = match &self.patch {
            None => true,
            Some(p) => bb.width >= p.width() as i32 || bb.height >= p.height() as i32,
        };
        if needs_grow {
            self.patch = Some(GrayImage::new(
                (bb.width + PATCH_MARGIN) as usize,
                (bb.height + PATCH_MARGIN) as usize,
            )?);
        }

        let patch = self.patch.as_mut().expect("allocated above");
        patch.fill(0);
        rasterize_view(patch, &provisional, view)?;
        let patch = self.patch.as_ref().expect("allocated above");
        let center = Point::new(patch.width() as i32 / 2, patch.height() as i32 / 2);

        match self.objects.get_mut(object_id) {
            Some(existing) => {
                let (score, _) = self.matcher.match_patch(patch, center, existing);
                if score <= learn_thresh {
                    let idx = existing.insert_from(&provisional, view)?;
                    trace_event!("view_committed", score = score as f64, index = idx as u64);
                    Ok(Some(idx))
                } else {
                    trace_event!("view_rejected", score = score as f64);
                    Ok(None)
                }
            }
            None => {
                self.objects.insert(object_id.to_string(), provisional);
                Ok(Some(0))
            }
        }
    }

    /// Scores `object_id`'s templates at a point in a feature image.
    ///
    /// Unknown objects and empty sets score `(0.0, None)`.
    pub fn match_object(
        &self,
        object_id: &str,
        image: &GrayImage,
        at: Point,
    ) -> (f32, Option<ViewMatch>) {
        let Some(set) = self.objects.get(object_id) else {
            return (0.0, None);
        };
        let (score, view) = self.matcher.match_patch(image, at, set);
        let hit = view.map(|view| {
            let bb = set.bbox[view];
            ViewMatch {
                score,
                view,
                rect: Rect::new(at.x + bb.x, at.y + bb.y, bb.width, bb.height),
                frame_number: set.frame_numbers[view],
            }
        });
        (score, hit)
    }
}
