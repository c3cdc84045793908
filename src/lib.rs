//! Multi-modal template matching for object recognition.
//!
//! Raw color and depth frames are reduced to per-pixel single-bit feature
//! codes by the encoders, learned into sparse per-view templates with
//! novelty gating, and recognized with a sliding-window patch matcher
//! followed by non-maximum suppression. Learned stores serialize to opaque
//! binary blobs.

pub mod config;
pub mod encode;
pub mod features;
pub mod filters;
pub mod image;
pub mod learn;
pub mod matcher;
pub mod mode;
pub mod nms;
pub mod objects;
pub mod store;
pub mod table;
pub(crate) mod trace;
pub mod util;

pub use config::{DetectParams, LearnParams};
pub use encode::{
    ColorOrderEncoder, ColorWtaEncoder, DepthWtaEncoder, GradientOrientationEncoder,
    HueGradientEncoder,
};
pub use features::FeatureSet;
pub use filters::ModeFilter;
pub use image::{Bgr, BgrImage, DepthImage, GrayImage, Image};
pub use learn::{learn_template, sum_around_each_pixel, CleanupMode};
pub use matcher::{rasterize_view, PatchMatcher};
pub use mode::{ModeStore, ViewMatch};
pub use nms::non_max_rect_suppress;
pub use objects::{Detections, MultiModalObjectStore};
pub use table::{MatchTable, COS_DIST, NO_BIT};
pub use util::{LinemodError, LinemodResult, Point, Rect};
