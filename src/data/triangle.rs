use super::{Point, PointLocation};
use crate::{Error, Orientation};
use claims::debug_assert_ok;
use geometry_predicates::predicates::orient2d;

pub struct TriangleView<'a>([&'a Point; 3]);

impl<'a> TriangleView<'a> {
  // O(1)
  pub fn new(pts: [&'a Point; 3]) -> TriangleView<'a> {
    let triangle = TriangleView(pts);
    debug_assert_ok!(triangle.validate());
    triangle
  }

  pub fn new_unchecked(pts: [&'a Point; 3]) -> TriangleView<'a> {
    TriangleView(pts)
  }

  // O(1)
  pub fn validate(&self) -> Result<(), Error> {
    if self.orientation() != Orientation::CounterClockWise {
      Err(Error::ClockWiseViolation)
    } else {
      Ok(())
    }
  }

  pub fn orientation(&self) -> Orientation {
    let [a, b, c] = self.0;
    a.orientation(b, c)
  }

  // O(1)
  pub fn locate(&self, pt: &Point) -> PointLocation {
    use Orientation::*;
    debug_assert_ok!(self.validate());
    let [a, b, c] = self.0;
    let ab = a.orientation(b, pt);
    let bc = b.orientation(c, pt);
    let ca = c.orientation(a, pt);
    if ab == ClockWise || bc == ClockWise || ca == ClockWise {
      PointLocation::Outside
    } else if ab == CoLinear || bc == CoLinear || ca == CoLinear {
      PointLocation::OnBoundary
    } else {
      PointLocation::Inside
    }
  }

  pub fn signed_area(&self) -> f64 {
    self.signed_area_2x() / 2.0
  }

  pub fn signed_area_2x(&self) -> f64 {
    let [a, b, c] = self.0;
    orient2d(a.array, b.array, c.array)
  }

  /// Radius of the circle through the three corners.
  ///
  /// `|ab|·|bc|·|ca| / 4A`, with the area taken from the exact orientation
  /// determinant. Colinear triangles have an infinite radius.
  pub fn circumradius(&self) -> f64 {
    let [a, b, c] = self.0;
    let area_2x = self.signed_area_2x().abs();
    if area_2x == 0.0 {
      return f64::INFINITY;
    }
    a.distance(b) * b.distance(c) * c.distance(a) / (2.0 * area_2x)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn right_triangle_radius_is_half_hypotenuse() {
    let a = Point::new([0., 0.]);
    let b = Point::new([6., 0.]);
    let c = Point::new([0., 8.]);
    let t = TriangleView::new([&a, &b, &c]);
    assert!((t.circumradius() - 5.).abs() < 1e-12);
    assert_eq!(t.signed_area(), 24.);
  }

  #[test]
  fn colinear_radius_is_infinite() {
    let a = Point::new([0., 0.]);
    let b = Point::new([1., 1.]);
    let c = Point::new([2., 2.]);
    let t = TriangleView::new_unchecked([&a, &b, &c]);
    assert_eq!(t.circumradius(), f64::INFINITY);
    assert!(t.validate().is_err());
  }

  #[test]
  fn locate_in_triangle() {
    let a = Point::new([0., 0.]);
    let b = Point::new([4., 0.]);
    let c = Point::new([0., 4.]);
    let t = TriangleView::new([&a, &b, &c]);
    assert_eq!(t.locate(&Point::new([1., 1.])), PointLocation::Inside);
    assert_eq!(t.locate(&Point::new([2., 2.])), PointLocation::OnBoundary);
    assert_eq!(t.locate(&Point::new([3., 3.])), PointLocation::Outside);
  }
}
