// #![deny(warnings)]
#![deny(clippy::cast_lossless)]
#![doc(test(no_crate_inject))]
//! Boundary polygons for planar point sets.
//!
//! Two builders share one set of exact predicates:
//!
//! * [`convex_hull`]: the smallest convex polygon containing every point.
//! * [`concave_hull`]: an alpha shape, a tighter boundary that follows the
//!   distribution of the points. The shape parameter is a circumradius bound;
//!   growing it moves the result towards the convex hull.
//!
//! Both return a [`BoundaryPolygon`](data::BoundaryPolygon) in counter-clockwise
//! order, starting at the lowest point.
//!
//! ```rust
//! # use rhull::data::Point;
//! # use rhull::{concave_hull, convex_hull};
//! let pts = vec![
//!   Point::new([0., 0.]),
//!   Point::new([10., 0.]),
//!   Point::new([10., 10.]),
//!   Point::new([0., 10.]),
//!   Point::new([5., 5.]),
//! ];
//! let convex = convex_hull(&pts).unwrap();
//! assert_eq!(convex.len(), 4);
//! assert_eq!(concave_hull(&pts, 100.).unwrap(), convex);
//! ```

pub mod algorithms;
mod cancel;
pub mod config;
pub mod data;
mod orientation;
pub mod service;

#[cfg(test)]
pub mod testing;

pub use cancel::{CancelToken, HullOptions};
pub use orientation::{Orientation, Tolerance};

#[doc(inline)]
pub use algorithms::{concave_hull, convex_hull};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
  /// The point at `index` has a NaN or infinite coordinate.
  #[error("point {index} has a non-finite coordinate")]
  InvalidCoordinate { index: usize },
  #[error("alpha must be a finite, non-negative number (got {alpha})")]
  InvalidAlpha { alpha: f64 },
  #[error("tolerance must be a finite, non-negative number (got {epsilon})")]
  InvalidTolerance { epsilon: f64 },
  /// A triangulation invariant was broken. Retrying with the same input will
  /// fail the same way.
  #[error("internal algorithm failure: {0}")]
  Internal(&'static str),
  #[error("computation cancelled")]
  Cancelled,
  #[error("Insufficient vertices")]
  InsufficientVertices,
  #[error("Duplicate points")]
  DuplicatePoints,
  #[error("Clockwise violation")]
  ClockWiseViolation,
  #[error("Self intersections")]
  SelfIntersections,
}

impl Error {
  /// True for errors caused by the caller's input rather than by the engine.
  pub fn is_input_error(&self) -> bool {
    matches!(
      self,
      Error::InvalidCoordinate { .. } | Error::InvalidAlpha { .. } | Error::InvalidTolerance { .. }
    )
  }
}
