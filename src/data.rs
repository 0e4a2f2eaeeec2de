pub(crate) mod point;
pub(crate) mod polygon;
mod triangle;

pub use point::{centroid, distance, normalize, Point};
pub use polygon::BoundaryPolygon;
pub use triangle::TriangleView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PointLocation {
  Inside,
  OnBoundary,
  Outside,
}
