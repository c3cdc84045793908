//! Learned template storage.
//!
//! A `FeatureSet` holds every view learned for one object under one modality.
//! Each view is a sparse list of feature codes with their offsets relative to
//! the patch center, split into four quadrant index lists so matching can walk
//! a partially visible template quadrant by quadrant.

use serde::{Deserialize, Serialize};

use crate::util::{LinemodError, LinemodResult, Point, Rect};

/// All learned views of a single object for one feature modality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Capture session the views came from.
    pub session_id: String,
    /// Object these views describe.
    pub object_id: String,
    /// Source frame number per view.
    pub frame_numbers: Vec<i32>,
    /// Sparse feature codes per view, parallel to `offsets`.
    pub features: Vec<Vec<u8>>,
    /// Center-relative feature positions per view.
    pub offsets: Vec<Vec<Point>>,
    /// Center-relative bounding box per view.
    pub bbox: Vec<Rect>,
    /// Indices into `features` falling in the upper-left quadrant, per view.
    pub quad_ul: Vec<Vec<u32>>,
    /// Upper-right quadrant indices per view.
    pub quad_ur: Vec<Vec<u32>>,
    /// Lower-left quadrant indices per view.
    pub quad_ll: Vec<Vec<u32>>,
    /// Lower-right quadrant indices per view.
    pub quad_lr: Vec<Vec<u32>>,
    /// Center-relative rectangle covering the largest view seen so far.
    pub max_bounds: Rect,
}

impl FeatureSet {
    /// Creates an empty set for the given session and object.
    pub fn new(session_id: &str, object_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            object_id: object_id.to_string(),
            frame_numbers: Vec::new(),
            features: Vec::new(),
            offsets: Vec::new(),
            bbox: Vec::new(),
            quad_ul: Vec::new(),
            quad_ur: Vec::new(),
            quad_ll: Vec::new(),
            quad_lr: Vec::new(),
            max_bounds: Rect::new(0, 0, -1, -1),
        }
    }

    /// Number of stored views.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no view has been learned.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Copies view `index` of `other` into this set and returns the new
    /// view's index here.
    ///
    /// `max_bounds` grows to cover the inserted view and stays centered.
    pub fn insert_from(&mut self, other: &FeatureSet, index: usize) -> LinemodResult<usize> {
        if index >= other.len() {
            return Err(LinemodError::ViewIndexOutOfRange {
                index,
                len: other.len(),
            });
        }

        self.frame_numbers.push(other.frame_numbers[index]);
        self.features.push(other.features[index].clone());
        self.offsets.push(other.offsets[index].clone());
        self.bbox.push(other.bbox[index]);
        self.quad_ul.push(other.quad_ul[index].clone());
        self.quad_ur.push(other.quad_ur[index].clone());
        self.quad_ll.push(other.quad_ll[index].clone());
        self.quad_lr.push(other.quad_lr[index].clone());

        let bb = other.bbox[index];
        if bb.width > self.max_bounds.width {
            self.max_bounds.width = bb.width;
        }
        if bb.height > self.max_bounds.height {
            self.max_bounds.height = bb.height;
        }
        self.max_bounds.x = -self.max_bounds.width / 2;
        self.max_bounds.y = -self.max_bounds.height / 2;

        Ok(self.len() - 1)
    }

    /// Recomputes `max_bounds` from every stored view and returns it.
    pub fn find_max_template_size(&mut self) -> Rect {
        for bb in &self.bbox {
            if bb.width > self.max_bounds.width {
                self.max_bounds.width = bb.width;
            }
            if bb.height > self.max_bounds.height {
                self.max_bounds.height = bb.height;
            }
        }
        self.max_bounds.x = -self.max_bounds.width / 2;
        self.max_bounds.y = -self.max_bounds.height / 2;
        self.max_bounds
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new("No_sID", "No_oID")
    }
}
