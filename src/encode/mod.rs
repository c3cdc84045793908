//! Per-pixel feature encoders.
//!
//! Every encoder turns a raw frame into a feature image where each nonzero
//! pixel carries exactly one set bit naming one of eight pattern buckets.
//! An optional mask forces pixels outside the object to zero.

pub mod color_order;
pub mod gradient;
pub mod hue_gradient;
pub mod wta;

pub use color_order::ColorOrderEncoder;
pub use gradient::GradientOrientationEncoder;
pub use hue_gradient::HueGradientEncoder;
pub use wta::{ColorWtaEncoder, DepthWtaEncoder};

use crate::image::{GrayImage, Image};
use crate::util::{LinemodError, LinemodResult};

/// Confirms the optional mask matches the source dimensions.
pub(crate) fn check_mask<T>(src: &Image<T>, mask: Option<&GrayImage>) -> LinemodResult<()> {
    if let Some(mask) = mask {
        if mask.width() != src.width() || mask.height() != src.height() {
            return Err(LinemodError::DimensionMismatch {
                expected_width: src.width(),
                expected_height: src.height(),
                got_width: mask.width(),
                got_height: mask.height(),
            });
        }
    }
    Ok(())
}

/// True when the mask permits this pixel.
#[inline]
pub(crate) fn mask_allows(mask: Option<&GrayImage>, x: usize, y: usize) -> bool {
    mask.map_or(true, |m| m.at(x, y) != 0)
}
