//! Template learning and feature-image cleanup.
//!
//! Raw encoder output is noisy at object edges. Before a view is learned the
//! feature image can be passed through a box-window vote that either ORs
//! neighboring codes together or keeps only the locally dominant bit.

use crate::features::FeatureSet;
use crate::image::region::largest_region_bbox;
use crate::image::GrayImage;
use crate::trace::{trace_event, trace_span};
use crate::util::{LinemodError, LinemodResult, Point, Rect};

/// How neighborhood bit counts collapse back into a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanupMode {
    /// Set every bit that appears anywhere in the window.
    Or,
    /// Keep only the strictly dominant bit, when it occurs more than once.
    Majority,
}

/// Counts each bit over a `span`-wide square window around every pixel and
/// collapses the counts per [`CleanupMode`].
///
/// The window for pixel `p` spans `[p - (span - 1 - span / 2), p + span / 2]`
/// in both axes, clipped at the image border.
///
/// # Panics
/// Panics when `span` is zero.
pub fn sum_around_each_pixel(src: &GrayImage, span: usize, mode: CleanupMode) -> GrayImage {
    assert!(span > 0, "window span must be nonzero");
    let (w, h) = (src.width(), src.height());
    let mut out = GrayImage::new(w, h).expect("source dimensions are non-zero");

    // One inclusive prefix-sum plane per bit, padded by a leading zero row
    // and column.
    let mut planes = vec![vec![0u32; (w + 1) * (h + 1)]; 8];
    for y in 0..h {
        for x in 0..w {
            let code = src.at(x, y);
            for (bit, plane) in planes.iter_mut().enumerate() {
                let present = ((code >> bit) & 1) as u32;
                plane[(y + 1) * (w + 1) + (x + 1)] = present
                    + plane[y * (w + 1) + (x + 1)]
                    + plane[(y + 1) * (w + 1) + x]
                    - plane[y * (w + 1) + x];
            }
        }
    }

    let back = (span - 1 - span / 2) as i32;
    let fwd = (span / 2) as i32;
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let x0 = (x - back).max(0) as usize;
            let y0 = (y - back).max(0) as usize;
            let x1 = ((x + fwd).min(w as i32 - 1) + 1) as usize;
            let y1 = ((y + fwd).min(h as i32 - 1) + 1) as usize;

            let mut counts = [0u32; 8];
            for (bit, plane) in planes.iter().enumerate() {
                counts[bit] = plane[y1 * (w + 1) + x1] + plane[y0 * (w + 1) + x0]
                    - plane[y0 * (w + 1) + x1]
                    - plane[y1 * (w + 1) + x0];
            }

            let input = src.at(x as usize, y as usize);
            let code = match mode {
                CleanupMode::Or => {
                    let mut acc = 0u8;
                    for (bit, &c) in counts.iter().enumerate() {
                        if c > 0 {
                            acc |= 1 << bit;
                        }
                    }
                    acc
                }
                CleanupMode::Majority => {
                    let mut max = 0u32;
                    let mut pos = 0usize;
                    for (bit, &c) in counts.iter().enumerate() {
                        if c > max {
                            max = c;
                            pos = bit;
                        }
                    }
                    if max > 1 && input != 0 {
                        1 << pos
                    } else {
                        input
                    }
                }
            };
            out.set(x as usize, y as usize, code);
        }
    }
    out
}

/// Learns one view from a feature image and mask into `into`.
///
/// The dominant mask region defines the patch; feature codes inside it are
/// stored with center-relative offsets and quadrant indices. Returns the index
/// of the new view.
pub fn learn_template(
    features_img: &GrayImage,
    mask: &GrayImage,
    frame_number: i32,
    into: &mut FeatureSet,
    clean: bool,
) -> LinemodResult<usize> {
    let _span = trace_span!("learn_template", frame = frame_number).entered();

    if !features_img.same_size(mask) {
        return Err(LinemodError::DimensionMismatch {
            expected_width: features_img.width(),
            expected_height: features_img.height(),
            got_width: mask.width(),
            got_height: mask.height(),
        });
    }

    let cleaned;
    let feats = if clean {
        cleaned = sum_around_each_pixel(features_img, 3, CleanupMode::Majority);
        &cleaned
    } else {
        features_img
    };

    let region = largest_region_bbox(mask).ok_or(LinemodError::NoForegroundRegion)?;
    let xc = region.x + region.width / 2;
    let yc = region.y + region.height / 2;

    into.frame_numbers.push(frame_number);
    let mut codes = Vec::new();
    let mut offsets = Vec::new();
    let mut quad_ul = Vec::new();
    let mut quad_ur = Vec::new();
    let mut quad_ll = Vec::new();
    let mut quad_lr = Vec::new();

    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let code = feats.at(x as usize, y as usize);
            if mask.at(x as usize, y as usize) == 0 || code == 0 {
                continue;
            }
            let off = Point::new(x - xc, y - yc);
            let idx = codes.len() as u32;
            if off.y < 0 {
                if off.x < 0 {
                    quad_ul.push(idx);
                } else {
                    quad_ur.push(idx);
                }
            } else if off.x < 0 {
                quad_ll.push(idx);
            } else {
                quad_lr.push(idx);
            }
            codes.push(code);
            offsets.push(off);
        }
    }

    trace_event!("template_learned", features = codes.len() as u64);

    into.features.push(codes);
    into.offsets.push(offsets);
    into.quad_ul.push(quad_ul);
    into.quad_ur.push(quad_ur);
    into.quad_ll.push(quad_ll);
    into.quad_lr.push(quad_lr);
    into.bbox.push(Rect::new(
        -(region.width / 2),
        -(region.height / 2),
        region.width,
        region.height,
    ));

    if region.width > into.max_bounds.width {
        into.max_bounds.width = region.width;
        into.max_bounds.x = -(region.width / 2);
    }
    if region.height > into.max_bounds.height {
        into.max_bounds.height = region.height;
        into.max_bounds.y = -(region.height / 2);
    }

    Ok(into.len() - 1)
}
