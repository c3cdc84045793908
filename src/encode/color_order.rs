//! Channel-order color encoder.
//!
//! Classifies each pixel by the ordering of its B, G and R values into one of
//! six chromatic codes, with dedicated codes for near-black and near-white.
//! Channel differences within `equal_thresh` count as equal, which makes the
//! code stable under mild lighting changes.

use crate::encode::{check_mask, mask_allows};
use crate::image::{BgrImage, GrayImage};
use crate::trace::trace_event;
use crate::util::LinemodResult;

/// Encodes BGR pixels by relative channel order.
#[derive(Clone, Copy, Debug)]
pub struct ColorOrderEncoder {
    /// Channel difference treated as a tie.
    pub equal_thresh: i32,
    /// Distance from 0 or 255 treated as black or white.
    pub black_white_thresh: i32,
}

impl Default for ColorOrderEncoder {
    fn default() -> Self {
        Self {
            equal_thresh: 12,
            black_white_thresh: 25,
        }
    }
}

impl ColorOrderEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn classify(&self, b: i32, g: i32, r: i32) -> Option<u8> {
        let bw = self.black_white_thresh;
        let eq = self.equal_thresh;

        if b < bw && g < bw && r < bw {
            return Some(64);
        }
        if b > 255 - bw && g > 255 - bw && r > 255 - bw {
            return Some(128);
        }

        let bg = b - g;
        let gr = g - r;
        let br = b - r;
        if bg > -eq {
            if gr > -eq {
                return Some(1);
            }
            if r > b {
                return Some(16);
            }
        }
        if br > -eq {
            if gr < eq {
                return Some(2);
            }
            if g > b {
                return Some(4);
            }
        }
        if gr > -eq && r > b {
            return Some(8);
        }
        if r > g && g > b {
            return Some(32);
        }
        None
    }

    /// Encodes every pixel, zeroing those the mask excludes.
    pub fn encode(
        &self,
        src: &BgrImage,
        mask: Option<&GrayImage>,
    ) -> LinemodResult<GrayImage> {
        check_mask(src, mask)?;
        let (w, h) = (src.width(), src.height());
        let mut out = GrayImage::new(w, h)?;
        let mut unclassified = 0u64;
        for y in 0..h {
            for x in 0..w {
                if !mask_allows(mask, x, y) {
                    continue;
                }
                let [b, g, r] = src.at(x, y);
                match self.classify(b as i32, g as i32, r as i32) {
                    Some(code) => out.set(x, y, code),
                    None => unclassified += 1,
                }
            }
        }
        if unclassified > 0 {
            trace_event!("unclassified_pixels", count = unclassified);
        }
        Ok(out)
    }
}
