// This module contains strategies and fixtures for:
//  * points
//  * point sets
//  * hand-made shapes with a known boundary
// A Strategy is a way to generate a shrinkable value.
use crate::data::{centroid, Point};

use proptest::arbitrary::*;
use proptest::collection::*;
use proptest::prelude::*;
use proptest::strategy::*;

type Mapped<I, O> = Map<StrategyFor<I>, fn(_: I) -> O>;

///////////////////////////////////////////////////////////////////////////////
// Arbitrary point

// Any finite point. Prefer `any_point()` in tests: it produces the colinear
// and duplicate configurations that break hull code much more often.
impl Arbitrary for Point {
  type Strategy = Mapped<(f64, f64), Point>;
  type Parameters = ();
  fn arbitrary_with(_params: Self::Parameters) -> Self::Strategy {
    any::<(f64, f64)>().prop_map(|(x, y)| Point::new([finite(x), finite(y)]))
  }
}

// NaN and infinities are mapped into range. Magnitudes are capped so that
// differences and products of coordinates stay finite.
fn finite(f: f64) -> f64 {
  if f.is_finite() {
    f % 1e100
  } else {
    0.0
  }
}

/// Mix of small integer grid points (many colinear triples and duplicates) and
/// general position floats.
pub fn any_point() -> impl Strategy<Value = Point> {
  prop_oneof![
    (-10i32..10, -10i32..10).prop_map(|(x, y)| Point::new([f64::from(x), f64::from(y)])),
    (-1000.0..1000.0, -1000.0..1000.0).prop_map(|(x, y): (f64, f64)| Point::new([x, y])),
  ]
}

pub fn point_set(max: usize) -> impl Strategy<Value = Vec<Point>> {
  vec(any_point(), 0..max)
}

///////////////////////////////////////////////////////////////////////////////
// Properties

// Every consecutive triple turns counter-clockwise.
pub fn is_strictly_convex(ring: &[Point]) -> bool {
  let n = ring.len();
  (0..n).all(|i| {
    ring[i]
      .orientation(&ring[(i + 1) % n], &ring[(i + 2) % n])
      .is_ccw()
  })
}

///////////////////////////////////////////////////////////////////////////////
// Fixtures

/// Unit grid over `[0, 10]²` with the notch `x >= 3, 3 <= y <= 7` removed.
///
/// The opening of the "C" faces right.
pub fn c_shape() -> Vec<Point> {
  let mut pts = Vec::new();
  for x in 0..=10 {
    for y in 0..=10 {
      if x >= 3 && (3..=7).contains(&y) {
        continue;
      }
      pts.push(Point::new([f64::from(x), f64::from(y)]));
    }
  }
  pts
}

/// Order points by their angle around the centroid. This is how clients draw
/// a boundary when the engine hands back an unordered set.
pub fn centroid_angle_sort(pts: &[Point]) -> Vec<Point> {
  let mut out = pts.to_vec();
  if let Some(c) = centroid(pts) {
    let angle = |p: &Point| (p.y_coord() - c.y_coord()).atan2(p.x_coord() - c.x_coord());
    out.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Orientation;
  use test_strategy::proptest;

  #[proptest]
  fn any_point_is_finite(#[strategy(any_point())] pt: Point) {
    prop_assert!(pt.is_finite());
  }

  #[proptest]
  fn arbitrary_point_is_finite(pt: Point) {
    prop_assert!(pt.is_finite());
  }

  #[test]
  fn square_is_strictly_convex() {
    let square = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]].map(Point::new);
    assert!(is_strictly_convex(&square));
    let flat = [[0., 0.], [1., 0.], [2., 0.], [0., 1.]].map(Point::new);
    assert!(!is_strictly_convex(&flat));
    assert_eq!(
      flat[0].orientation(&flat[1], &flat[2]),
      Orientation::CoLinear
    );
  }

  #[test]
  fn c_shape_has_a_notch() {
    let pts = c_shape();
    assert_eq!(pts.len(), 121 - 8 * 5);
    assert!(!pts.contains(&Point::new([5., 5.])));
    assert!(pts.contains(&Point::new([2., 5.])));
  }
}
