//! Connected-component search for the learning mask.
//!
//! Template learning needs the single dominant foreground blob in the mask.
//! Components are 8-connected over nonzero pixels; the winner is the component
//! with the longest boundary, so a large object beats speckle noise even when
//! the speckle covers more total pixels spread across many blobs.

use std::collections::VecDeque;

use crate::image::GrayImage;
use crate::util::Rect;

const NEIGHBORS8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Bounding box of the nonzero component with the longest boundary.
///
/// Returns `None` when the mask has no nonzero pixel. Ties keep the component
/// found first in scan order.
pub fn largest_region_bbox(mask: &GrayImage) -> Option<Rect> {
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    let mut visited = vec![false; mask.width() * mask.height()];
    let mut best: Option<(usize, Rect)> = None;
    let mut queue = VecDeque::new();

    for sy in 0..h {
        for sx in 0..w {
            let idx = (sy * w + sx) as usize;
            if visited[idx] || mask.at(sx as usize, sy as usize) == 0 {
                continue;
            }

            let (mut min_x, mut min_y, mut max_x, mut max_y) = (sx, sy, sx, sy);
            let mut boundary = 0usize;
            visited[idx] = true;
            queue.push_back((sx, sy));

            while let Some((x, y)) = queue.pop_front() {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                // A pixel is on the boundary when any 4-neighbor is zero or
                // outside the image.
                let on_edge = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .iter()
                    .any(|&(nx, ny)| mask.get(nx, ny).unwrap_or(0) == 0);
                if on_edge {
                    boundary += 1;
                }

                for &(dx, dy) in &NEIGHBORS8 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let nidx = (ny * w + nx) as usize;
                    if !visited[nidx] && mask.at(nx as usize, ny as usize) != 0 {
                        visited[nidx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }

            let rect = Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
            match best {
                Some((best_boundary, _)) if boundary <= best_boundary => {}
                _ => best = Some((boundary, rect)),
            }
        }
    }

    best.map(|(_, rect)| rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(blocks: &[Rect], w: usize, h: usize) -> GrayImage {
        let mut m = GrayImage::new(w, h).unwrap();
        for r in blocks {
            for y in r.y..r.y + r.height {
                for x in r.x..r.x + r.width {
                    m.set(x as usize, y as usize, 255);
                }
            }
        }
        m
    }

    #[test]
    fn empty_mask_has_no_region() {
        let m = GrayImage::new(8, 8).unwrap();
        assert_eq!(largest_region_bbox(&m), None);
    }

    #[test]
    fn single_block_bbox() {
        let m = mask_with(&[Rect::new(2, 3, 4, 2)], 10, 10);
        assert_eq!(largest_region_bbox(&m), Some(Rect::new(2, 3, 4, 2)));
    }

    #[test]
    fn larger_boundary_wins() {
        let m = mask_with(&[Rect::new(0, 0, 2, 2), Rect::new(5, 5, 4, 4)], 12, 12);
        assert_eq!(largest_region_bbox(&m), Some(Rect::new(5, 5, 4, 4)));
    }

    #[test]
    fn diagonal_pixels_are_connected() {
        let mut m = GrayImage::new(6, 6).unwrap();
        m.set(1, 1, 255);
        m.set(2, 2, 255);
        m.set(3, 3, 255);
        assert_eq!(largest_region_bbox(&m), Some(Rect::new(1, 1, 3, 3)));
    }
}
