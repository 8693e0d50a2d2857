//! The painting surface.
//!
//! A [`PaintBuffer`] is a plain CPU-side grid of [`Rgb`] cells. It knows
//! nothing about the plane it is shown on, the sensor, or the window; the
//! projector decides *where* to write and the renderer decides *how* to show
//! it.

mod buffer;

pub use buffer::{BACKGROUND, MARK, PaintBuffer, Rgb};
