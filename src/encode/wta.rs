//! Winner-take-all probe encoders for color and depth.
//!
//! Each pixel is described by which of eight fixed probe samples around it is
//! the largest after smoothing. The probe pattern is part of the template
//! format: changing it invalidates previously learned views.

use crate::encode::{check_mask, mask_allows};
use crate::image::filter::{gaussian_blur_bgr, gaussian_blur_u16};
use crate::image::{BgrImage, DepthImage, GrayImage};
use crate::util::LinemodResult;

/// Probe offsets and the BGR channel each one samples.
const COLOR_PROBES: [(i32, i32, usize); 8] = [
    (3, -2, 2),
    (-3, 0, 0),
    (1, 1, 0),
    (-3, -3, 1),
    (0, -2, 2),
    (1, -1, 0),
    (2, 2, 1),
    (-1, -1, 1),
];

/// Depth probes reuse the color probe geometry.
const DEPTH_PROBES: [(i32, i32); 8] = [
    (3, -2),
    (-3, 0),
    (1, 1),
    (-3, -3),
    (0, -2),
    (1, -1),
    (2, 2),
    (-1, -1),
];

/// Largest probe reach in either axis; pixels closer to the border are
/// left as zero.
const BORDER: usize = 3;

/// Winner-take-all encoder over smoothed color probes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorWtaEncoder;

impl ColorWtaEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(
        &self,
        src: &BgrImage,
        mask: Option<&GrayImage>,
    ) -> LinemodResult<GrayImage> {
        check_mask(src, mask)?;
        let (w, h) = (src.width(), src.height());
        let mut out = GrayImage::new(w, h)?;
        if w < 2 * BORDER + 2 || h < 2 * BORDER + 2 {
            return Ok(out);
        }
        let blurred = gaussian_blur_bgr(src);

        for y in BORDER..h - BORDER - 1 {
            for x in BORDER..w - BORDER - 1 {
                if !mask_allows(mask, x, y) {
                    continue;
                }
                let mut max = 0u8;
                let mut index = 0usize;
                for (k, &(dx, dy, c)) in COLOR_PROBES.iter().enumerate() {
                    let px = blurred.at((x as i32 + dx) as usize, (y as i32 + dy) as usize);
                    if px[c] > max {
                        max = px[c];
                        index = k;
                    }
                }
                out.set(x, y, 1 << index);
            }
        }
        Ok(out)
    }
}

/// Winner-take-all encoder over smoothed depth probes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthWtaEncoder;

impl DepthWtaEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(
        &self,
        src: &DepthImage,
        mask: Option<&GrayImage>,
    ) -> LinemodResult<GrayImage> {
        check_mask(src, mask)?;
        let (w, h) = (src.width(), src.height());
        let mut out = GrayImage::new(w, h)?;
        if w < 2 * BORDER + 2 || h < 2 * BORDER + 2 {
            return Ok(out);
        }
        let blurred = gaussian_blur_u16(src);

        for y in BORDER..h - BORDER - 1 {
            for x in BORDER..w - BORDER - 1 {
                if !mask_allows(mask, x, y) {
                    continue;
                }
                let mut max = 0u16;
                let mut index = 0usize;
                for (k, &(dx, dy)) in DEPTH_PROBES.iter().enumerate() {
                    let v = blurred.at((x as i32 + dx) as usize, (y as i32 + dy) as usize);
                    if v > max {
                        max = v;
                        index = k;
                    }
                }
                out.set(x, y, 1 << index);
            }
        }
        Ok(out)
    }
}
