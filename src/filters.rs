//! Post-detection verification against a separate filter modality.
//!
//! A `ModeFilter` holds ungated templates for one modality that was not part
//! of the sliding-window search. Detections are re-scored against it at their
//! reported location and dropped when the filter modality disagrees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;
use crate::image::GrayImage;
use crate::learn::learn_template;
use crate::matcher::PatchMatcher;
use crate::objects::Detections;
use crate::trace::{trace_event, trace_span};
use crate::util::{LinemodResult, Point};

/// Verification templates for one modality, learned without novelty gating.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModeFilter {
    /// Modality name the filter re-scores with.
    pub mode: String,
    /// Templates keyed by object identifier.
    pub objects: BTreeMap<String, FeatureSet>,
    #[serde(skip)]
    matcher: PatchMatcher,
}

impl ModeFilter {
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            objects: BTreeMap::new(),
            matcher: PatchMatcher::new(),
        }
    }

    /// Learns a view for `object_id` unconditionally and returns the
    /// object's view count.
    pub fn learn(
        &mut self,
        features_img: &GrayImage,
        mask: &GrayImage,
        object_id: &str,
        frame_number: i32,
    ) -> LinemodResult<usize> {
        let set = self
            .objects
            .entry(object_id.to_string())
            .or_insert_with(|| FeatureSet::new(object_id, object_id));
        learn_template(features_img, mask, frame_number, set, false)?;
        Ok(set.len())
    }

    /// Re-scores each detection against this filter's feature image and
    /// removes those below `thresh`. Returns the surviving count.
    ///
    /// A detection whose frame number matches a learned view is scored
    /// against exactly that view at its reported rectangle; otherwise the
    /// best view at the rectangle center is used. Unknown object ids score
    /// zero and are removed.
    pub fn filter_detections(
        &self,
        image: &GrayImage,
        detections: &mut Detections,
        thresh: f32,
    ) -> LinemodResult<usize> {
        let _span = trace_span!("filter_detections", mode = self.mode.as_str()).entered();
        let before = detections.len();

        let mut i = 0usize;
        while i < detections.len() {
            let rect = detections.rects[i];
            let score = match self.objects.get(&detections.object_ids[i]) {
                None => 0.0,
                Some(set) => {
                    let frame = detections.frame_numbers[i];
                    let matched_view = set
                        .frame_numbers
                        .iter()
                        .position(|&f| f == frame);
                    match matched_view {
                        Some(view) => self.matcher.match_view(image, rect, set, view)?,
                        None => {
                            let at = Point::new(
                                rect.x + rect.width / 2,
                                rect.y + rect.height / 2,
                            );
                            self.matcher.match_patch(image, at, set).0
                        }
                    }
                }
            };
            if score < thresh {
                detections.remove(i);
            } else {
                i += 1;
            }
        }

        trace_event!(
            "filtered",
            before = before as u64,
            after = detections.len() as u64
        );
        Ok(detections.len())
    }
}
