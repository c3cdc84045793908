//! Non-maximum suppression over parallel detection arrays.

use crate::util::{LinemodError, LinemodResult, Rect};

/// Suppresses overlapping detections in place, keeping the higher score.
///
/// Two rectangles conflict when twice their intersection area exceeds
/// `frac_overlap` times the sum of their areas. All five arrays move in
/// lockstep; the surviving count is returned.
#[allow(clippy::too_many_arguments)]
pub fn non_max_rect_suppress(
    rects: &mut Vec<Rect>,
    scores: &mut Vec<f32>,
    object_ids: &mut Vec<String>,
    frame_numbers: &mut Vec<i32>,
    feature_indices: &mut Vec<Vec<Option<usize>>>,
    frac_overlap: f32,
) -> LinemodResult<usize> {
    for other in [
        scores.len(),
        object_ids.len(),
        frame_numbers.len(),
        feature_indices.len(),
    ] {
        if other != rects.len() {
            return Err(LinemodError::MismatchedLengths {
                left: rects.len(),
                right: other,
            });
        }
    }

    let mut len = rects.len() as i64;
    let mut i: i64 = 0;
    while i < len {
        let mut removed_i = false;
        let mut j = i + 1;
        while j < len {
            let (ri, rj) = (rects[i as usize], rects[j as usize]);
            let inter = ri.intersect(&rj).area();
            let total = (ri.area() + rj.area()) as f32 + 1e-6;
            let frac = 2.0 * inter as f32 / total;
            if frac > frac_overlap {
                if scores[i as usize] >= scores[j as usize] {
                    rects.remove(j as usize);
                    scores.remove(j as usize);
                    object_ids.remove(j as usize);
                    frame_numbers.remove(j as usize);
                    feature_indices.remove(j as usize);
                    len -= 1;
                    if i >= len {
                        break;
                    }
                } else {
                    rects.remove(i as usize);
                    scores.remove(i as usize);
                    object_ids.remove(i as usize);
                    frame_numbers.remove(i as usize);
                    feature_indices.remove(i as usize);
                    len -= 1;
                    // The element now at index i has not been compared yet;
                    // restart its inner scan.
                    removed_i = true;
                    break;
                }
            } else {
                j += 1;
            }
        }
        if !removed_i {
            i += 1;
        }
    }

    Ok(rects.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrays(
        rects: Vec<Rect>,
        scores: Vec<f32>,
    ) -> (
        Vec<Rect>,
        Vec<f32>,
        Vec<String>,
        Vec<i32>,
        Vec<Vec<Option<usize>>>,
    ) {
        let n = rects.len();
        (
            rects,
            scores,
            (0..n).map(|k| format!("obj{k}")).collect(),
            (0..n as i32).collect(),
            vec![vec![Some(0)]; n],
        )
    }

    #[test]
    fn overlapping_keeps_higher_score() {
        let (mut r, mut s, mut o, mut f, mut fi) = arrays(
            vec![Rect::new(0, 0, 10, 10), Rect::new(1, 1, 10, 10)],
            vec![0.8, 0.9],
        );
        let kept = non_max_rect_suppress(&mut r, &mut s, &mut o, &mut f, &mut fi, 0.5).unwrap();
        assert_eq!(kept, 1);
        assert_eq!(s, vec![0.9]);
        assert_eq!(o, vec!["obj1"]);
        assert_eq!(f, vec![1]);
    }

    #[test]
    fn disjoint_rects_both_survive() {
        let (mut r, mut s, mut o, mut f, mut fi) = arrays(
            vec![Rect::new(0, 0, 5, 5), Rect::new(20, 20, 5, 5)],
            vec![0.8, 0.9],
        );
        let kept = non_max_rect_suppress(&mut r, &mut s, &mut o, &mut f, &mut fi, 0.5).unwrap();
        assert_eq!(kept, 2);
    }

    #[test]
    fn equal_scores_keep_the_first() {
        let (mut r, mut s, mut o, mut f, mut fi) = arrays(
            vec![Rect::new(0, 0, 10, 10), Rect::new(0, 0, 10, 10)],
            vec![0.7, 0.7],
        );
        non_max_rect_suppress(&mut r, &mut s, &mut o, &mut f, &mut fi, 0.5).unwrap();
        assert_eq!(o, vec!["obj0"]);
    }

    #[test]
    fn later_higher_score_replaces_earlier_chain() {
        let (mut r, mut s, mut o, mut f, mut fi) = arrays(
            vec![
                Rect::new(0, 0, 10, 10),
                Rect::new(1, 1, 10, 10),
                Rect::new(2, 2, 10, 10),
            ],
            vec![0.5, 0.6, 0.7],
        );
        let kept = non_max_rect_suppress(&mut r, &mut s, &mut o, &mut f, &mut fi, 0.5).unwrap();
        assert_eq!(kept, 1);
        assert_eq!(s, vec![0.7]);
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let mut r = vec![Rect::new(0, 0, 2, 2)];
        let mut s = vec![0.5, 0.6];
        let mut o = vec!["a".to_string()];
        let mut f = vec![0];
        let mut fi = vec![vec![None]];
        assert_eq!(
            non_max_rect_suppress(&mut r, &mut s, &mut o, &mut f, &mut fi, 0.5),
            Err(LinemodError::MismatchedLengths { left: 1, right: 2 })
        );
    }
}
