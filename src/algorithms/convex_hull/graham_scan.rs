use tracing::debug;

use crate::cancel::CHECKPOINT_INTERVAL;
use crate::data::point::lowest_point;
use crate::data::{normalize, BoundaryPolygon, Point};
use crate::{Error, HullOptions, Orientation};

// https://en.wikipedia.org/wiki/Graham_scan

// Properties:
//    No panics.
//    Results with three or more vertices are strictly convex and counter-clockwise.
//    No points are outside the resulting polygon.
/// $O(n \log n)$ Convex hull of a set of points.
///
/// [Graham scan][wiki] algorithm for finding the smallest convex polygon which
/// contains all the given points.
///
/// # Errors
/// [`Error::InvalidCoordinate`] if any coordinate is NaN or infinite.
///
/// # Properties
/// * No points from the input set will be outside the returned polygon.
/// * All vertices in the returned polygon are from the input set.
/// * The polygon starts at the lowest point and runs counter-clockwise.
/// * Fewer than three distinct points, or only colinear points, give a
///   degenerate result: empty, a single point, or the two extreme points.
///
/// # Examples
///
/// ```rust
/// # use rhull::algorithms::convex_hull;
/// # use rhull::data::Point;
/// let empty_set: Vec<Point> = vec![];
/// assert!(convex_hull(&empty_set).unwrap().is_empty());
/// ```
///
/// ```rust
/// # use rhull::algorithms::convex_hull;
/// # use rhull::data::Point;
/// let dups = vec![Point::new([0., 0.])].repeat(3);
/// assert_eq!(convex_hull(&dups).unwrap().points(), &[Point::new([0., 0.])]);
/// ```
///
/// [wiki]: https://en.wikipedia.org/wiki/Graham_scan
pub fn convex_hull(pts: &[Point]) -> Result<BoundaryPolygon, Error> {
  convex_hull_with(pts, &HullOptions::default())
}

/// [`convex_hull`] with an explicit colinearity tolerance and cancellation
/// token.
#[tracing::instrument(level = "debug", skip_all, fields(n = pts.len()))]
pub fn convex_hull_with(pts: &[Point], options: &HullOptions) -> Result<BoundaryPolygon, Error> {
  let pts = normalize(pts)?;
  let hull = graham_scan(pts, options)?;
  if hull.len() < 3 {
    debug!(vertices = hull.len(), "degenerate convex hull");
  }
  Ok(BoundaryPolygon::new_unchecked(hull))
}

// Expects validated points. Also used by the alpha shape builder once alpha
// covers the whole triangulation.
pub(crate) fn graham_scan(mut pts: Vec<Point>, options: &HullOptions) -> Result<Vec<Point>, Error> {
  let smallest = match lowest_point(&pts) {
    Some(pt) => pt,
    None => return Ok(pts),
  };
  pts.retain(|pt| *pt != smallest);

  pts.sort_unstable_by(|a, b| {
    smallest
      .ccw_cmp_around(a, b)
      .then_with(|| smallest.cmp_distance_to(a, b))
  });
  pts.dedup();

  // Invariant: `stack` is a convex chain turning counter-clockwise.
  let mut stack: Vec<Point> = Vec::with_capacity(pts.len() + 1);
  stack.push(smallest);
  for (i, pt) in pts.into_iter().enumerate() {
    if i % CHECKPOINT_INTERVAL == 0 {
      options.checkpoint()?;
    }
    while let [.., p1, p2] = stack.as_slice() {
      match p1.orientation_with(p2, &pt, options.tolerance) {
        Orientation::CounterClockWise => break,
        Orientation::ClockWise | Orientation::CoLinear => {
          stack.pop();
        }
      }
    }
    stack.push(pt);
  }
  Ok(stack)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::PointLocation;
  use crate::testing::*;
  use crate::{CancelToken, Tolerance};

  use claims::{assert_err_eq, assert_ok};
  use proptest::prelude::*;
  use test_strategy::proptest;

  fn pts(coords: &[[f64; 2]]) -> Vec<Point> {
    coords.iter().copied().map(Point::new).collect()
  }

  #[test]
  fn convex_hull_colinear() {
    let points = pts(&[
      [0., 0.],
      [1., 0.],
      [2., 0.],
      [3., 0.],
      [4., 0.],
      [1., 1.],
    ]);
    let poly = convex_hull(&points).unwrap();
    assert_ok!(poly.validate());
    assert_eq!(poly.points(), pts(&[[0., 0.], [4., 0.], [1., 1.]]));
  }

  #[test]
  fn convex_hull_colinear_rev() {
    let points = pts(&[
      [0., 0.],
      [1., 0.],
      [0., 9.],
      [0., 8.],
      [0., 7.],
      [0., 6.],
    ]);
    let poly = convex_hull(&points).unwrap();
    assert_ok!(poly.validate());
    assert_eq!(poly.points(), pts(&[[0., 0.], [1., 0.], [0., 9.]]));
  }

  #[test]
  fn convex_hull_invalid() {
    let points = pts(&[
      [0., 0.],
      [100., 0.],
      [50., 1.],
      [40., 1.],
      [0., 100.],
    ]);
    let poly = convex_hull(&points).unwrap();
    assert_ok!(poly.validate());
    assert_eq!(poly.len(), 3);
  }

  #[test]
  fn square_with_center() {
    let points = pts(&[[0., 0.], [10., 0.], [10., 10.], [0., 10.], [5., 5.]]);
    let poly = convex_hull(&points).unwrap();
    assert_eq!(
      poly.points(),
      pts(&[[0., 0.], [10., 0.], [10., 10.], [0., 10.]])
    );
  }

  #[test]
  fn degenerate_inputs() {
    assert!(convex_hull(&[]).unwrap().is_empty());

    let single = pts(&[[3., 4.]]);
    assert_eq!(convex_hull(&single).unwrap().points(), single);

    let two = pts(&[[5., 5.], [1., 2.]]);
    assert_eq!(
      convex_hull(&two).unwrap().points(),
      pts(&[[1., 2.], [5., 5.]])
    );

    let colinear = pts(&[[1., 1.], [0., 0.], [2., 2.]]);
    assert_eq!(
      convex_hull(&colinear).unwrap().points(),
      pts(&[[0., 0.], [2., 2.]])
    );

    let same = pts(&[[1., 1.], [1., 1.], [1., 1.], [1., 1.]]);
    assert_eq!(convex_hull(&same).unwrap().points(), pts(&[[1., 1.]]));
  }

  #[test]
  fn duplicates_appear_once() {
    let points = pts(&[
      [0., 0.],
      [4., 0.],
      [4., 0.],
      [0., 4.],
      [0., 0.],
      [0., 4.],
      [1., 1.],
    ]);
    let poly = convex_hull(&points).unwrap();
    assert_eq!(poly.points(), pts(&[[0., 0.], [4., 0.], [0., 4.]]));
  }

  #[test]
  fn rejects_non_finite() {
    let points = pts(&[[0., 0.], [1., 0.], [f64::NAN, 1.]]);
    assert_err_eq!(convex_hull(&points), Error::InvalidCoordinate { index: 2 });
  }

  #[test]
  fn cancelled_before_start() {
    let token = CancelToken::new();
    token.cancel();
    let options = HullOptions::new().with_cancel(token);
    let points = pts(&[[0., 0.], [1., 0.], [0., 1.]]);
    assert_err_eq!(convex_hull_with(&points, &options), Error::Cancelled);
  }

  #[test]
  fn tolerance_drops_sliver_vertex() {
    let points = pts(&[[0., 0.], [20., 0.], [20., 20.], [10., 20. + 1e-12], [0., 20.]]);
    let exact = convex_hull(&points).unwrap();
    assert_eq!(exact.len(), 5);
    let options = HullOptions::new().with_tolerance(Tolerance::new(1e-9).unwrap());
    let loose = convex_hull_with(&points, &options).unwrap();
    assert_eq!(
      loose.points(),
      pts(&[[0., 0.], [20., 0.], [20., 20.], [0., 20.]])
    );
  }

  #[proptest]
  fn convex_hull_prop(#[strategy(point_set(100))] pts: Vec<Point>) {
    let poly = convex_hull(&pts).unwrap();
    // Prop #1: Results are valid.
    if !poly.is_degenerate() {
      prop_assert!(poly.validate().is_ok());
      prop_assert!(is_strictly_convex(poly.points()));
    }
    // Prop #2: No points from the input set are outside the polygon.
    for pt in pts.iter() {
      prop_assert_ne!(poly.locate(pt), PointLocation::Outside);
    }
    // Prop #3: All vertices are in the input set.
    for pt in poly.iter() {
      prop_assert!(pts.contains(pt));
    }
  }

  #[proptest]
  fn convex_hull_is_idempotent(#[strategy(point_set(100))] pts: Vec<Point>) {
    let once = convex_hull(&pts).unwrap();
    let twice = convex_hull(once.points()).unwrap();
    prop_assert_eq!(once, twice);
  }

  #[proptest]
  fn convex_hull_ignores_input_order(#[strategy(point_set(50))] mut pts: Vec<Point>) {
    let forward = convex_hull(&pts).unwrap();
    pts.reverse();
    prop_assert_eq!(forward, convex_hull(&pts).unwrap());
  }
}
