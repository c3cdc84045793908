//! Separable smoothing and Scharr derivative filters.
//!
//! The probe-based encoders smooth their input with a 5-tap Gaussian before
//! sampling, and the gradient encoders differentiate with 3x3 Scharr kernels.
//! Borders reflect without repeating the edge pixel (the `gfedcb|abcdefgh`
//! scheme), matching the convolution behavior the learned templates assume.

use crate::image::{Bgr, BgrImage, DepthImage, Image};

const GAUSS_TAPS: usize = 5;
const GAUSS_SIGMA: f32 = 2.0;

fn gaussian_kernel() -> [f32; GAUSS_TAPS] {
    let mut k = [0.0f32; GAUSS_TAPS];
    let half = (GAUSS_TAPS / 2) as i32;
    let mut sum = 0.0f32;
    for (i, tap) in k.iter_mut().enumerate() {
        let d = (i as i32 - half) as f32;
        *tap = (-d * d / (2.0 * GAUSS_SIGMA * GAUSS_SIGMA)).exp();
        sum += *tap;
    }
    for tap in &mut k {
        *tap /= sum;
    }
    k
}

/// Reflects a coordinate into `[0, len)` without repeating the border pixel.
fn reflect101(i: i32, len: usize) -> usize {
    // A single row or column has nothing to reflect against.
    if len == 1 {
        return 0;
    }
    let len = len as i32;
    let mut i = i;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }
    i as usize
}

/// 5-tap Gaussian blur of a color image, each channel filtered independently.
pub fn gaussian_blur_bgr(src: &BgrImage) -> BgrImage {
    let (w, h) = (src.width(), src.height());
    let half = (GAUSS_TAPS / 2) as i32;
    let kernel = gaussian_kernel();

    let mut tmp = vec![[0.0f32; 3]; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (t, &k) in kernel.iter().enumerate() {
                let sx = reflect101(x as i32 + t as i32 - half, w);
                let p = src.at(sx, y);
                for c in 0..3 {
                    acc[c] += k * p[c] as f32;
                }
            }
            tmp[y * w + x] = acc;
        }
    }

    let mut out = BgrImage::new(w, h).expect("source dimensions are non-zero");
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (t, &k) in kernel.iter().enumerate() {
                let sy = reflect101(y as i32 + t as i32 - half, h);
                let p = tmp[sy * w + x];
                for c in 0..3 {
                    acc[c] += k * p[c];
                }
            }
            let px: Bgr = [
                acc[0].round().clamp(0.0, 255.0) as u8,
                acc[1].round().clamp(0.0, 255.0) as u8,
                acc[2].round().clamp(0.0, 255.0) as u8,
            ];
            out.set(x, y, px);
        }
    }
    out
}

/// 5-tap Gaussian blur of a depth image.
pub fn gaussian_blur_u16(src: &DepthImage) -> DepthImage {
    let (w, h) = (src.width(), src.height());
    let half = (GAUSS_TAPS / 2) as i32;
    let kernel = gaussian_kernel();

    let mut tmp = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (t, &k) in kernel.iter().enumerate() {
                let sx = reflect101(x as i32 + t as i32 - half, w);
                acc += k * src.at(sx, y) as f32;
            }
            tmp[y * w + x] = acc;
        }
    }

    let mut out = DepthImage::new(w, h).expect("source dimensions are non-zero");
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (t, &k) in kernel.iter().enumerate() {
                let sy = reflect101(y as i32 + t as i32 - half, h);
                acc += k * tmp[sy * w + x];
            }
            out.set(x, y, acc.round().clamp(0.0, 65535.0) as u16);
        }
    }
    out
}

const SCHARR: [[f32; 3]; 3] = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];

fn convolve3x3(src: &Image<f32>, kernel: &[[f32; 3]; 3]) -> Image<f32> {
    let (w, h) = (src.width(), src.height());
    let mut out = Image::<f32>::new(w, h).expect("source dimensions are non-zero");
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (ky, row) in kernel.iter().enumerate() {
                let sy = reflect101(y as i32 + ky as i32 - 1, h);
                for (kx, &k) in row.iter().enumerate() {
                    let sx = reflect101(x as i32 + kx as i32 - 1, w);
                    acc += k * src.at(sx, sy);
                }
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Horizontal Scharr derivative.
pub fn scharr_x(src: &Image<f32>) -> Image<f32> {
    convolve3x3(src, &SCHARR)
}

/// Vertical Scharr derivative.
pub fn scharr_y(src: &Image<f32>) -> Image<f32> {
    let mut k = [[0.0f32; 3]; 3];
    for y in 0..3 {
        for x in 0..3 {
            k[y][x] = SCHARR[x][y];
        }
    }
    convolve3x3(src, &k)
}

/// Mean and population standard deviation of all pixels.
pub fn mean_std(src: &Image<f32>) -> (f32, f32) {
    let n = (src.width() * src.height()) as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &v in src.as_slice() {
        sum += v as f64;
        sum_sq += v as f64 * v as f64;
    }
    let mean = sum / n;
    let var = (sum_sq / n - mean * mean).max(0.0);
    (mean as f32, var.sqrt() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_kernel_is_normalized() {
        let k = gaussian_kernel();
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((k[0] - k[4]).abs() < 1e-7);
        assert!(k[2] > k[1]);
    }

    #[test]
    fn blur_preserves_constant_image() {
        let mut src = DepthImage::new(9, 9).unwrap();
        src.fill(500);
        let out = gaussian_blur_u16(&src);
        assert!(out.as_slice().iter().all(|&v| v == 500));
    }

    #[test]
    fn scharr_x_on_ramp_is_constant() {
        let mut src = Image::<f32>::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                src.set(x, y, x as f32);
            }
        }
        let dx = scharr_x(&src);
        // Scharr weights sum to 32 per unit slope in the interior.
        for y in 1..7 {
            for x in 1..7 {
                assert!((dx.at(x, y) - 32.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn mean_std_of_two_values() {
        let src = Image::<f32>::from_vec(vec![2.0, 4.0, 2.0, 4.0], 2, 2).unwrap();
        let (m, s) = mean_std(&src);
        assert!((m - 3.0).abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reflect101_maps_borders() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 5), 3);
    }

    #[test]
    fn reflect101_degenerate_length_terminates() {
        assert_eq!(reflect101(0, 1), 0);
        assert_eq!(reflect101(-1, 1), 0);
        assert_eq!(reflect101(3, 1), 0);
    }

    #[test]
    fn blur_handles_one_pixel_wide_image() {
        let mut src = DepthImage::new(1, 6).unwrap();
        src.fill(700);
        let out = gaussian_blur_u16(&src);
        assert!(out.as_slice().iter().all(|&v| v == 700));
    }
}
