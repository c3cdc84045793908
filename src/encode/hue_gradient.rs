//! Hue-at-lightness-gradient encoder.
//!
//! Finds edges in the lightness plane and, where the edge magnitude clears an
//! adaptive threshold, encodes the local hue into one of eight buckets. Flat
//! areas produce no code, so the features concentrate on object contours.

use crate::encode::{check_mask, mask_allows};
use crate::image::color::bgr_to_hue_lightness;
use crate::image::filter::{mean_std, scharr_x, scharr_y};
use crate::image::{BgrImage, GrayImage, Image};
use crate::util::LinemodResult;

/// Half-degrees of hue per bucket.
const HUE_BUCKET: f32 = 22.5;

/// Encodes hue at lightness edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct HueGradientEncoder;

impl HueGradientEncoder {
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

        let (hue, light) = bgr_to_hue_lightness(src);
        let dx = scharr_x(&light);
        let dy = scharr_y(&light);

        let mut mag = Image::<f32>::new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                mag.set(x, y, 0.5 * dx.at(x, y).abs() + 0.5 * dy.at(x, y).abs());
            }
        }
        let (mean, std) = mean_std(&mag);
        let thresh = mean + std / 1.25;

        let mut out = GrayImage::new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                if !mask_allows(mask, x, y) {
                    continue;
                }
                if mag.at(x, y) > thresh {
                    let bucket = ((hue.at(x, y) / HUE_BUCKET) as usize).min(7);
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
        let src = BgrImage::from_vec(vec![[50, 90, 130]; 100], 10, 10).unwrap();
        let out = HueGradientEncoder::new().encode(&src, None).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn one_pixel_wide_image_encodes_to_zero() {
        let src = BgrImage::from_vec(vec![[10, 40, 250]; 4], 1, 4).unwrap();
        let out = HueGradientEncoder::new().encode(&src, None).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn red_edge_lands_in_first_bucket() {
        // Left half black, right half red. The boundary carries strong
        // lightness gradient and the red side has hue near zero.
        let mut src = BgrImage::new(16, 16).unwrap();
        for y in 0..16 {
            for x in 8..16 {
                src.set(x, y, [0, 0, 200]);
            }
        }
        let out = HueGradientEncoder::new().encode(&src, None).unwrap();
        let boundary: Vec<u8> = (0..16).map(|y| out.at(8, y)).collect();
        assert!(boundary.iter().any(|&v| v == 1));
        for &v in out.as_slice() {
            assert!(v == 0 || v.count_ones() == 1);
        }
    }
}
