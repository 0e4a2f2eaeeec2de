use ordered_float::OrderedFloat;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Deref;
use std::ops::Index;

use crate::{Error, Orientation, Tolerance};

/// A point in the plane.
///
/// Points handed to the builders must have finite coordinates; see
/// [`normalize`]. Equality is exact coordinate equality and the total order is
/// lexicographic on `(x, y)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "Coord", into = "Coord")]
#[repr(transparent)]
pub struct Point {
  pub array: [f64; 2],
}

// Wire shape of a point: `{"x": .., "y": ..}`.
#[derive(Serialize, Deserialize)]
struct Coord {
  x: f64,
  y: f64,
}

impl From<Coord> for Point {
  fn from(coord: Coord) -> Point {
    Point::new([coord.x, coord.y])
  }
}

impl From<Point> for Coord {
  fn from(point: Point) -> Coord {
    Coord {
      x: point.array[0],
      y: point.array[1],
    }
  }
}

// Random sampling in the unit square.
impl Distribution<Point> for Standard {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
    Point::new([rng.gen(), rng.gen()])
  }
}

impl Point {
  pub const fn new(array: [f64; 2]) -> Point {
    Point { array }
  }

  pub fn x_coord(&self) -> f64 {
    self.array[0]
  }

  pub fn y_coord(&self) -> f64 {
    self.array[1]
  }

  pub fn is_finite(&self) -> bool {
    self.array.iter().all(|c| c.is_finite())
  }

  pub fn orientation(&self, q: &Point, r: &Point) -> Orientation {
    Orientation::new(&self.array, &q.array, &r.array)
  }

  pub fn orientation_with(&self, q: &Point, r: &Point, tolerance: Tolerance) -> Orientation {
    Orientation::with_tolerance(&self.array, &q.array, &r.array, tolerance)
  }

  pub fn squared_euclidean_distance(&self, rhs: &Point) -> f64 {
    let dx = self.array[0] - rhs.array[0];
    let dy = self.array[1] - rhs.array[1];
    dx * dx + dy * dy
  }

  pub fn distance(&self, rhs: &Point) -> f64 {
    (self.array[0] - rhs.array[0]).hypot(self.array[1] - rhs.array[1])
  }

  pub fn cmp_distance_to(&self, p: &Point, q: &Point) -> Ordering {
    self
      .squared_euclidean_distance(p)
      .total_cmp(&self.squared_euclidean_distance(q))
  }

  /// Compare `p` and `q` by their counter-clockwise angle around `self`,
  /// measured from the positive x-axis.
  ///
  /// Only valid when `self` is the lowest point of the set (smallest y, then
  /// smallest x): every other point then has an angle in `[0, π)` and points
  /// with equal angles lie on the same ray.
  pub fn ccw_cmp_around(&self, p: &Point, q: &Point) -> Ordering {
    match self.orientation(p, q) {
      Orientation::CounterClockWise => Ordering::Less,
      Orientation::ClockWise => Ordering::Greater,
      Orientation::CoLinear => Ordering::Equal,
    }
  }

  /// Order by y, then by x. The minimum is the pivot of the convex hull and
  /// the first vertex of every boundary polygon.
  pub fn cmp_lowest(&self, other: &Point) -> Ordering {
    OrderedFloat(self.array[1])
      .cmp(&OrderedFloat(other.array[1]))
      .then_with(|| OrderedFloat(self.array[0]).cmp(&OrderedFloat(other.array[0])))
  }
}

impl PartialEq for Point {
  fn eq(&self, other: &Point) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Point {}

impl PartialOrd for Point {
  fn partial_cmp(&self, other: &Point) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Point {
  fn cmp(&self, other: &Point) -> Ordering {
    OrderedFloat(self.array[0])
      .cmp(&OrderedFloat(other.array[0]))
      .then_with(|| OrderedFloat(self.array[1]).cmp(&OrderedFloat(other.array[1])))
  }
}

impl Index<usize> for Point {
  type Output = f64;
  fn index(&self, key: usize) -> &f64 {
    self.array.index(key)
  }
}

impl Deref for Point {
  type Target = [f64; 2];
  fn deref(&self) -> &[f64; 2] {
    &self.array
  }
}

impl From<(f64, f64)> for Point {
  fn from(point: (f64, f64)) -> Point {
    Point::new([point.0, point.1])
  }
}

impl From<[f64; 2]> for Point {
  fn from(array: [f64; 2]) -> Point {
    Point::new(array)
  }
}

/// Validate a point set before any algorithm touches it.
///
/// Every coordinate must be finite. Duplicates and colinear inputs are valid
/// and returned unchanged, in input order.
///
/// # Errors
/// [`Error::InvalidCoordinate`] with the index of the first offending point.
pub fn normalize(points: &[Point]) -> Result<Vec<Point>, Error> {
  match points.iter().position(|pt| !pt.is_finite()) {
    Some(index) => Err(Error::InvalidCoordinate { index }),
    None => Ok(points.to_vec()),
  }
}

/// Euclidean distance between two points.
pub fn distance(a: &Point, b: &Point) -> f64 {
  a.distance(b)
}

/// Arithmetic mean of the points, `None` for an empty set.
pub fn centroid(points: &[Point]) -> Option<Point> {
  if points.is_empty() {
    return None;
  }
  let n = points.len() as f64;
  let (sx, sy) = points
    .iter()
    .fold((0.0, 0.0), |(sx, sy), pt| (sx + pt.array[0], sy + pt.array[1]));
  Some(Point::new([sx / n, sy / n]))
}

// O(n)
pub(crate) fn lowest_point(points: &[Point]) -> Option<Point> {
  points.iter().min_by(|a, b| a.cmp_lowest(b)).copied()
}

// True iff `p` lies on the closed segment `a`-`b`.
pub(crate) fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
  a.orientation(b, p).is_colinear()
    && p.array[0] >= a.array[0].min(b.array[0])
    && p.array[0] <= a.array[0].max(b.array[0])
    && p.array[1] >= a.array[1].min(b.array[1])
    && p.array[1] <= a.array[1].max(b.array[1])
}
