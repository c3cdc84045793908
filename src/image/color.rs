//! Color space conversions used by the hue and mask pipelines.

use crate::image::{BgrImage, GrayImage, Image};

/// Converts a BGR image to hue and lightness planes.
///
/// Hue follows the 8-bit OpenHLS convention: half-degrees in `[0, 180)`,
/// zero for achromatic pixels. Lightness is `(max + min) / 2` of the raw
/// channel values.
pub fn bgr_to_hue_lightness(src: &BgrImage) -> (Image<f32>, Image<f32>) {
    let (w, h) = (src.width(), src.height());
    let mut hue = Image::<f32>::new(w, h).expect("source dimensions are non-zero");
    let mut light = Image::<f32>::new(w, h).expect("source dimensions are non-zero");
    for y in 0..h {
        for x in 0..w {
            let [b, g, r] = src.at(x, y);
            let (b, g, r) = (b as f32, g as f32, r as f32);
            let vmax = b.max(g).max(r);
            let vmin = b.min(g).min(r);
            let diff = vmax - vmin;
            let mut hdeg = if diff == 0.0 {
                0.0
            } else if vmax == r {
                60.0 * (g - b) / diff
            } else if vmax == g {
                120.0 + 60.0 * (b - r) / diff
            } else {
                240.0 + 60.0 * (r - g) / diff
            };
            if hdeg < 0.0 {
                hdeg += 360.0;
            }
            hue.set(x, y, hdeg / 2.0);
            light.set(x, y, (vmax + vmin) / 2.0);
        }
    }
    (hue, light)
}

/// Collapses a BGR image to BT.601 luma, one byte per pixel.
pub fn mask_from_bgr(src: &BgrImage) -> GrayImage {
    let (w, h) = (src.width(), src.height());
    let mut out = GrayImage::new(w, h).expect("source dimensions are non-zero");
    for y in 0..h {
        for x in 0..w {
            let [b, g, r] = src.at(x, y);
            let luma = 0.114 * b as f32 + 0.587 * g as f32 + 0.299 * r as f32;
            out.set(x, y, luma.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pixel(bgr: [u8; 3]) -> BgrImage {
        BgrImage::from_vec(vec![bgr], 1, 1).unwrap()
    }

    #[test]
    fn pure_red_has_zero_hue() {
        let (hue, light) = bgr_to_hue_lightness(&one_pixel([0, 0, 255]));
        assert!((hue.at(0, 0) - 0.0).abs() < 1e-4);
        assert!((light.at(0, 0) - 127.5).abs() < 1e-4);
    }

    #[test]
    fn pure_green_and_blue_hues() {
        let (hue, _) = bgr_to_hue_lightness(&one_pixel([0, 255, 0]));
        assert!((hue.at(0, 0) - 60.0).abs() < 1e-4);
        let (hue, _) = bgr_to_hue_lightness(&one_pixel([255, 0, 0]));
        assert!((hue.at(0, 0) - 120.0).abs() < 1e-4);
    }

    #[test]
    fn gray_pixel_is_achromatic() {
        let (hue, light) = bgr_to_hue_lightness(&one_pixel([80, 80, 80]));
        assert_eq!(hue.at(0, 0), 0.0);
        assert_eq!(light.at(0, 0), 80.0);
    }

    #[test]
    fn luma_of_white_is_full_scale() {
        let m = mask_from_bgr(&one_pixel([255, 255, 255]));
        assert_eq!(m.at(0, 0), 255);
        let m = mask_from_bgr(&one_pixel([0, 0, 0]));
        assert_eq!(m.at(0, 0), 0);
    }
}
