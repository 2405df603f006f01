//! Transforms from raw integer sequences to doubles and points.
//!
//! - [`DoubleSequence64`] / [`DoubleSequence32`]: affine maps from integers
//!   into a target [`Interval`]
//! - [`PointsFromDoubles`]: groups consecutive doubles into points

mod double;
mod point;

pub use double::{DoubleSequence32, DoubleSequence64, Interval, Resolution};
pub use point::PointsFromDoubles;
