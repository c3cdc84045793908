//! Owned image buffers and the low-level raster operations the encoders use.
//!
//! `Image<T>` is a dense row-major 2D buffer. Feature images are `GrayImage`
//! (one 8-bit code per pixel), color frames are `BgrImage` and depth frames are
//! `DepthImage` with 16-bit millimeter samples.

use serde::{Deserialize, Serialize};

use crate::util::{LinemodError, LinemodResult};

pub mod color;
pub mod filter;
pub mod region;

/// A blue-green-red pixel, channel order matching the capture pipeline.
pub type Bgr = [u8; 3];

/// Single-channel 8-bit image. Feature codes and masks use this type.
pub type GrayImage = Image<u8>;
/// Three-channel 8-bit color image.
pub type BgrImage = Image<Bgr>;
/// Single-channel 16-bit depth image.
pub type DepthImage = Image<u16>;

/// Dense row-major image with owned storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> Image<T> {
    /// Creates a zero-filled image. Dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> LinemodResult<Self> {
        if width == 0 || height == 0 {
            return Err(LinemodError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data: vec![T::default(); width * height],
            width,
            height,
        })
    }
}

impl<T> Image<T> {
    /// Wraps an existing buffer. The buffer length must match exactly.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> LinemodResult<Self> {
        if width == 0 || height == 0 {
            return Err(LinemodError::InvalidDimensions { width, height });
        }
        let needed = width * height;
        if data.len() != needed {
            return Err(LinemodError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Writes the pixel at in-bounds coordinates.
    ///
    /// # Panics
    /// Panics when `(x, y)` lies outside the image.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y * self.width + x] = value;
    }

    /// Returns row `y` as a contiguous slice.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Returns row `y` as a mutable contiguous slice.
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Returns the full backing buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the full backing buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// True when `other` has the same width and height.
    pub fn same_size<U>(&self, other: &Image<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Copy> Image<T> {
    /// Returns the pixel at signed coordinates, or `None` outside the image.
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    /// Returns the pixel at in-bounds coordinates.
    ///
    /// # Panics
    /// Panics when `(x, y)` lies outside the image.
    pub fn at(&self, x: usize, y: usize) -> T {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y * self.width + x]
    }
}

impl<T: Clone> Image<T> {
    /// Overwrites every pixel with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}
