//! Tunable parameters for learning and detection.
//!
//! Both structs deserialize from JSON with per-field defaults, so a config
//! file only needs to name the values it changes.

use serde::{Deserialize, Serialize};

/// Parameters controlling novelty-gated learning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnParams {
    /// Views scoring above this against existing templates are discarded.
    pub thresh_learn: f32,
}

impl Default for LearnParams {
    fn default() -> Self {
        Self { thresh_learn: 0.0 }
    }
}

/// Parameters controlling sliding-window detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectParams {
    /// Minimum combined score for a candidate to survive.
    pub thresh_match: f32,
    /// Overlap fraction above which two candidates conflict.
    pub frac_overlap: f32,
    /// Horizontal grid stride in pixels.
    pub skip_x: usize,
    /// Vertical grid stride in pixels.
    pub skip_y: usize,
    /// Score floor for the post-detection color filter.
    pub color_filter_thresh: f32,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            thresh_match: 0.95,
            frac_overlap: 0.6,
            skip_x: 8,
            skip_y: 8,
            color_filter_thresh: 0.91,
        }
    }
}
