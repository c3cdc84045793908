//! Shared utility helpers.

pub mod error;
pub mod geometry;

pub use error::{LinemodError, LinemodResult};
pub use geometry::{Point, Rect};
