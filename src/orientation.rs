use geometry_predicates::predicates::{incircle, orient2d};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}

impl Orientation {
  /// Determine the direction you have to turn if you walk from `p1`
  /// to `p2` to `p3`.
  ///
  /// The sign is computed with an adaptive exact predicate and is correct for
  /// every finite input, including nearly colinear triples.
  ///
  /// # Examples
  ///
  /// ```rust
  /// # use rhull::Orientation;
  /// let p1 = [0., 0.];
  /// let p2 = [0., 1.]; // One unit above p1.
  /// // (0,0) -> (0,1) -> (0,2) == Orientation::CoLinear
  /// assert!(Orientation::new(&p1, &p2, &[0., 2.]).is_colinear());
  /// // (0,0) -> (0,1) -> (-1,2) == Orientation::CounterClockWise
  /// assert!(Orientation::new(&p1, &p2, &[-1., 2.]).is_ccw());
  /// // (0,0) -> (0,1) -> (1,2) == Orientation::ClockWise
  /// assert!(Orientation::new(&p1, &p2, &[1., 2.]).is_cw());
  /// ```
  pub fn new(p1: &[f64; 2], p2: &[f64; 2], p3: &[f64; 2]) -> Orientation {
    Orientation::from_det(orient2d(*p1, *p2, *p3))
  }

  /// Like [`Orientation::new`] but treats a triple as colinear when the
  /// parallelogram spanned by `p2-p1` and `p3-p1` is thinner than the relative
  /// `tolerance`. With [`Tolerance::EXACT`] this is identical to
  /// [`Orientation::new`].
  pub fn with_tolerance(
    p1: &[f64; 2],
    p2: &[f64; 2],
    p3: &[f64; 2],
    tolerance: Tolerance,
  ) -> Orientation {
    let det = orient2d(*p1, *p2, *p3);
    if tolerance.is_exact() {
      return Orientation::from_det(det);
    }
    let scale = norm(p1, p2) * norm(p1, p3);
    if det.abs() <= tolerance.epsilon() * scale {
      Orientation::CoLinear
    } else {
      Orientation::from_det(det)
    }
  }

  fn from_det(det: f64) -> Orientation {
    if det > 0.0 {
      Orientation::CounterClockWise
    } else if det < 0.0 {
      Orientation::ClockWise
    } else {
      Orientation::CoLinear
    }
  }

  pub fn is_colinear(self) -> bool {
    matches!(self, Orientation::CoLinear)
  }

  pub fn is_ccw(self) -> bool {
    matches!(self, Orientation::CounterClockWise)
  }

  pub fn is_cw(self) -> bool {
    matches!(self, Orientation::ClockWise)
  }

  #[must_use]
  pub fn then(self, other: Orientation) -> Orientation {
    match self {
      Orientation::CoLinear => other,
      _ => self,
    }
  }

  #[must_use]
  pub fn reverse(self) -> Orientation {
    match self {
      Orientation::CounterClockWise => Orientation::ClockWise,
      Orientation::ClockWise => Orientation::CounterClockWise,
      Orientation::CoLinear => Orientation::CoLinear,
    }
  }
}

/// True iff `p4` lies strictly inside the circle through `p1`, `p2` and `p3`.
///
/// The first three points must be in counter-clockwise order.
pub(crate) fn inside_circle(p1: &[f64; 2], p2: &[f64; 2], p3: &[f64; 2], p4: &[f64; 2]) -> bool {
  incircle(*p1, *p2, *p3, *p4) > 0.0
}

fn norm(p: &[f64; 2], q: &[f64; 2]) -> f64 {
  (q[0] - p[0]).hypot(q[1] - p[1])
}

/// Relative epsilon used to classify nearly colinear triples.
///
/// The default is [`Tolerance::EXACT`]: no threshold, the exact sign decides.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tolerance(f64);

impl Tolerance {
  pub const EXACT: Tolerance = Tolerance(0.0);

  pub fn new(epsilon: f64) -> Result<Tolerance, Error> {
    let tolerance = Tolerance(epsilon);
    tolerance.validate()?;
    Ok(tolerance)
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.0.is_finite() && self.0 >= 0.0 {
      Ok(())
    } else {
      Err(Error::InvalidTolerance { epsilon: self.0 })
    }
  }

  pub fn epsilon(self) -> f64 {
    self.0
  }

  pub fn is_exact(self) -> bool {
    self.0 == 0.0
  }
}
