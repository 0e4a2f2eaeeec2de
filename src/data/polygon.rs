use claims::debug_assert_ok;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::point::on_segment;
use super::{Point, PointLocation};
use crate::{Error, Orientation};

/// Ordered boundary returned by both hull builders.
///
/// Depending on the input this is empty, a single point, a two point segment,
/// or a simple polygon with at least three vertices in counter-clockwise order.
/// Consecutive vertices are distinct and no vertex repeats. Builders start the
/// polygon at its lowest vertex (smallest y, then smallest x).
///
/// Serializes as a plain list of `{"x": .., "y": ..}` objects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryPolygon {
  points: Vec<Point>,
}

impl BoundaryPolygon {
  pub fn empty() -> BoundaryPolygon {
    BoundaryPolygon::default()
  }

  /// $O(1)$ Assume the points already form a valid boundary.
  ///
  /// Validity is only checked in debug builds.
  pub fn new_unchecked(points: Vec<Point>) -> BoundaryPolygon {
    let polygon = BoundaryPolygon { points };
    if !polygon.is_degenerate() {
      debug_assert_ok!(polygon.validate());
    }
    polygon
  }

  /// $O(n^2)$ Wrap points that are expected to form a valid boundary.
  ///
  /// # Errors
  /// * [`Error::DuplicatePoints`] if a vertex repeats, also for degenerate sizes.
  /// * Any error of [`BoundaryPolygon::validate`] for three or more vertices.
  pub fn new(points: Vec<Point>) -> Result<BoundaryPolygon, Error> {
    let polygon = BoundaryPolygon { points };
    if polygon.is_degenerate() {
      polygon.validate_distinct()?;
    } else {
      polygon.validate()?;
    }
    Ok(polygon)
  }

  pub fn points(&self) -> &[Point] {
    &self.points
  }

  pub fn into_points(self) -> Vec<Point> {
    self.points
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Point> {
    self.points.iter()
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Fewer than three vertices: empty, a point or a segment.
  pub fn is_degenerate(&self) -> bool {
    self.points.len() < 3
  }

  /// Edges `(p[i], p[i+1])`, closing the loop. Yields nothing for fewer than
  /// two vertices and the segment twice for exactly two.
  pub fn iter_edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
    let n = if self.points.len() < 2 {
      0
    } else {
      self.points.len()
    };
    (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
  }

  pub fn signed_area_2x(&self) -> f64 {
    signed_area_2x(&self.points)
  }

  pub fn signed_area(&self) -> f64 {
    self.signed_area_2x() / 2.0
  }

  pub fn area(&self) -> f64 {
    self.signed_area().abs()
  }

  /// $O(n)$ Locate a point relative to the boundary.
  ///
  /// Degenerate boundaries have no interior: points on them are
  /// [`PointLocation::OnBoundary`], everything else is outside.
  pub fn locate(&self, pt: &Point) -> PointLocation {
    match self.points.as_slice() {
      [] => PointLocation::Outside,
      [p] if p == pt => PointLocation::OnBoundary,
      [_] => PointLocation::Outside,
      [a, b] if on_segment(a, b, pt) => PointLocation::OnBoundary,
      [_, _] => PointLocation::Outside,
      _ => {
        // Winding number, counting only upward and downward crossings.
        let mut winding = 0i64;
        for (a, b) in self.iter_edges() {
          if on_segment(a, b, pt) {
            return PointLocation::OnBoundary;
          }
          if a.y_coord() <= pt.y_coord() {
            if b.y_coord() > pt.y_coord() && a.orientation(b, pt).is_ccw() {
              winding += 1;
            }
          } else if b.y_coord() <= pt.y_coord() && a.orientation(b, pt).is_cw() {
            winding -= 1;
          }
        }
        if winding == 0 {
          PointLocation::Outside
        } else {
          PointLocation::Inside
        }
      }
    }
  }

  /// $O(n^2)$ Check that the boundary is a simple, counter-clockwise polygon
  /// without repeated vertices.
  pub fn validate(&self) -> Result<(), Error> {
    // Has at least three points.
    if self.points.len() < 3 {
      return Err(Error::InsufficientVertices);
    }
    self.validate_distinct()?;
    // Is counter-clockwise
    if self.signed_area_2x() <= 0.0 {
      return Err(Error::ClockWiseViolation);
    }
    // Has no self intersections.
    if has_self_intersections(&self.points) {
      return Err(Error::SelfIntersections);
    }
    Ok(())
  }

  fn validate_distinct(&self) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for pt in self.iter() {
      if !seen.insert(pt) {
        return Err(Error::DuplicatePoints);
      }
    }
    Ok(())
  }
}

impl<'a> IntoIterator for &'a BoundaryPolygon {
  type Item = &'a Point;
  type IntoIter = std::slice::Iter<'a, Point>;
  fn into_iter(self) -> Self::IntoIter {
    self.points.iter()
  }
}

impl From<BoundaryPolygon> for Vec<Point> {
  fn from(polygon: BoundaryPolygon) -> Vec<Point> {
    polygon.points
  }
}

// Shoelace formula over a closed ring.
pub(crate) fn signed_area_2x(ring: &[Point]) -> f64 {
  let n = ring.len();
  if n < 3 {
    return 0.0;
  }
  (0..n)
    .map(|i| {
      let p = &ring[i];
      let q = &ring[(i + 1) % n];
      p.array[0] * q.array[1] - q.array[0] * p.array[1]
    })
    .sum()
}

// Closed segments `p1-p2` and `q1-q2` share at least one point.
pub(crate) fn segments_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
  use Orientation::*;
  let o1 = p1.orientation(p2, q1);
  let o2 = p1.orientation(p2, q2);
  let o3 = q1.orientation(q2, p1);
  let o4 = q1.orientation(q2, p2);
  let straddles = |a: Orientation, b: Orientation| {
    matches!((a, b), (ClockWise, CounterClockWise) | (CounterClockWise, ClockWise))
  };
  if straddles(o1, o2) && straddles(o3, o4) {
    return true;
  }
  (o1 == CoLinear && on_segment(p1, p2, q1))
    || (o2 == CoLinear && on_segment(p1, p2, q2))
    || (o3 == CoLinear && on_segment(q1, q2, p1))
    || (o4 == CoLinear && on_segment(q1, q2, p2))
}

// Naive O(n^2) test. Adjacent edges may only share their common vertex.
fn has_self_intersections(ring: &[Point]) -> bool {
  let n = ring.len();
  let edge = |i: usize| (&ring[i], &ring[(i + 1) % n]);
  for i in 0..n {
    let (a, b) = edge(i);
    // Adjacent edge folding back onto this one.
    let c = &ring[(i + 2) % n];
    if a.orientation(b, c).is_colinear() && on_segment(a, b, c) {
      return true;
    }
    for j in i + 2..n {
      if i == 0 && j == n - 1 {
        continue;
      }
      let (q1, q2) = edge(j);
      if segments_intersect(a, b, q1, q2) {
        return true;
      }
    }
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;
  use claims::{assert_err_eq, assert_ok};

  fn poly(pts: &[[f64; 2]]) -> Vec<Point> {
    pts.iter().copied().map(Point::new).collect()
  }

  #[test]
  fn square_is_valid() {
    let square = BoundaryPolygon::new(poly(&[[0., 0.], [1., 0.], [1., 1.], [0., 1.]]));
    let square = assert_ok!(square);
    assert_eq!(square.area(), 1.);
    assert!(!square.is_degenerate());
  }

  #[test]
  fn clockwise_is_rejected() {
    let cw = BoundaryPolygon::new(poly(&[[0., 0.], [0., 1.], [1., 1.], [1., 0.]]));
    assert_err_eq!(cw, Error::ClockWiseViolation);
  }

  #[test]
  fn bow_tie_is_rejected() {
    let bow_tie = BoundaryPolygon::new(poly(&[[0., 0.], [2., 2.], [2., 0.], [0., 2.]]));
    // The bow tie has zero signed area.
    assert!(bow_tie.is_err());
    let bow_tie = BoundaryPolygon::new(poly(&[
      [0., 0.],
      [4., 0.],
      [4., 4.],
      [3., 4.],
      [3., -1.],
      [0., 4.],
    ]));
    assert_err_eq!(bow_tie, Error::SelfIntersections);
  }

  #[test]
  fn duplicates_are_rejected() {
    let dup = BoundaryPolygon::new(poly(&[[0., 0.], [1., 0.], [0., 0.]]));
    assert_err_eq!(dup, Error::DuplicatePoints);
    let dup = BoundaryPolygon::new(poly(&[[1., 1.], [1., 1.]]));
    assert_err_eq!(dup, Error::DuplicatePoints);
  }

  #[test]
  fn spike_is_rejected() {
    let spike = BoundaryPolygon::new(poly(&[[0., 0.], [4., 0.], [2., 0.], [2., 2.]]));
    assert!(spike.is_err());
  }

  #[test]
  fn locate_in_concave_polygon() {
    // An "L" shape.
    let l = assert_ok!(BoundaryPolygon::new(poly(&[
      [0., 0.],
      [4., 0.],
      [4., 1.],
      [1., 1.],
      [1., 4.],
      [0., 4.],
    ])));
    assert_eq!(l.locate(&Point::new([0.5, 3.])), PointLocation::Inside);
    assert_eq!(l.locate(&Point::new([3., 0.5])), PointLocation::Inside);
    assert_eq!(l.locate(&Point::new([3., 3.])), PointLocation::Outside);
    assert_eq!(l.locate(&Point::new([1., 2.])), PointLocation::OnBoundary);
    assert_eq!(l.locate(&Point::new([4., 0.])), PointLocation::OnBoundary);
    assert_eq!(l.locate(&Point::new([-1., 0.])), PointLocation::Outside);
  }

  #[test]
  fn locate_degenerate() {
    let segment = BoundaryPolygon::new_unchecked(poly(&[[0., 0.], [2., 2.]]));
    assert_eq!(segment.locate(&Point::new([1., 1.])), PointLocation::OnBoundary);
    assert_eq!(segment.locate(&Point::new([1., 0.])), PointLocation::Outside);
    let single = BoundaryPolygon::new_unchecked(poly(&[[3., 3.]]));
    assert_eq!(single.locate(&Point::new([3., 3.])), PointLocation::OnBoundary);
    assert_eq!(
      BoundaryPolygon::empty().locate(&Point::new([0., 0.])),
      PointLocation::Outside
    );
  }

  #[test]
  fn serializes_as_point_list() {
    let segment = BoundaryPolygon::new_unchecked(poly(&[[0., 0.], [2., 1.]]));
    let json = serde_json::to_string(&segment).unwrap();
    assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":2.0,"y":1.0}]"#);
  }
}
