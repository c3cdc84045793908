//! Maximum-channel gradient orientation encoder.
//!
//! Computes Scharr gradients per color channel, picks the channel with the
//! strongest response at each pixel, and encodes its orientation (folded to
//! 180 degrees) into eight buckets when it clears that channel's adaptive
//! threshold.

use crate::encode::{check_mask, mask_allows};
use crate::image::filter::{mean_std, scharr_x, scharr_y};
use crate::image::{BgrImage, GrayImage, Image};
use crate::util::LinemodResult;

/// Degrees of folded orientation per bucket.
const ANGLE_BUCKET: f32 = 22.5;

/// Encodes gradient orientation of the strongest color channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientOrientationEncoder;

impl GradientOrientationEncoder {
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

        let mut mags = Vec::with_capacity(3);
        let mut angles = Vec::with_capacity(3);
        let mut thresholds = [0.0f32; 3];
        for c in 0..3 {
            let mut plane = Image::<f32>::new(w, h)?;
            for y in 0..h {
                for x in 0..w {
                    plane.set(x, y, src.at(x, y)[c] as f32);
                }
            }
            let dx = scharr_x(&plane);
            let dy = scharr_y(&plane);
            let mut mag = Image::<f32>::new(w, h)?;
            let mut ang = Image::<f32>::new(w, h)?;
            for y in 0..h {
                for x in 0..w {
                    let (gx, gy) = (dx.at(x, y), dy.at(x, y));
                    mag.set(x, y, (gx * gx + gy * gy).sqrt());
                    let mut a = gy.atan2(gx).to_degrees();
                    if a < 0.0 {
                        a += 360.0;
                    }
                    ang.set(x, y, a);
                }
            }
            let (mean, std) = mean_std(&mag);
            thresholds[c] = mean + 0.4 * std;
            mags.push(mag);
            angles.push(ang);
        }

        let mut out = GrayImage::new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                if !mask_allows(mask, x, y) {
                    continue;
                }
                let mut best = 0usize;
                for c in 1..3 {
                    if mags[c].at(x, y) > mags[best].at(x, y) {
                        best = c;
                    }
                }
                if mags[best].at(x, y) > thresholds[best] {
                    let folded = angles[best].at(x, y) % 180.0;
                    let bucket = ((folded / ANGLE_BUCKET) as usize).min(7);
                    out.set(x, y, 1 << bucket);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_no_codes() {
        let src = BgrImage::from_vec(vec![[10, 120, 230]; 64], 8, 8).unwrap();
        let out = GradientOrientationEncoder::new().encode(&src, None).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn one_pixel_tall_image_encodes_to_zero() {
        let src = BgrImage::from_vec(vec![[20, 60, 180]; 5], 5, 1).unwrap();
        let out = GradientOrientationEncoder::new().encode(&src, None).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn vertical_edge_encodes_horizontal_gradient() {
        // Left half dark, right half bright in the blue channel only. A
        // vertical edge gives orientation 0, bucket 0.
        let mut src = BgrImage::new(16, 16).unwrap();
        for y in 0..16 {
            for x in 8..16 {
                src.set(x, y, [200, 0, 0]);
            }
        }
        let out = GradientOrientationEncoder::new().encode(&src, None).unwrap();
        assert_eq!(out.at(8, 5), 1);
        for &v in out.as_slice() {
            assert!(v == 0 || v.count_ones() == 1);
        }
    }
}
