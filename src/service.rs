//! Request level contract for transports (HTTP handlers, flat-buffer
//! bindings, ...).
//!
//! The routes mirror the two builders:
//!
//! * `/convexhull` with `{"points": [{"x": .., "y": ..}, ..]}`
//! * `/concavehull` with `{"points": [..], "alpha": ..}`, `alpha` optional
//!
//! Both answer `{"hull": [..]}`, or `{"error": ".."}` with a non-200 status.
//!
//! ```rust
//! # use rhull::config::Config;
//! # use rhull::service::{HullService, Operation};
//! let service = HullService::new(Config::default());
//! let body = r#"{"points": [{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 0, "y": 4}, {"x": 1, "y": 1}]}"#;
//! let reply = service.handle_json(Operation::ConvexHull, body);
//! assert_eq!(reply.status, 200);
//! assert_eq!(reply.body, r#"{"hull":[{"x":0.0,"y":0.0},{"x":4.0,"y":0.0},{"x":0.0,"y":4.0}]}"#);
//! ```
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::algorithms::{concave_hull_with, convex_hull_with};
use crate::config::Config;
use crate::data::{normalize, BoundaryPolygon, Point};
use crate::{CancelToken, Error, HullOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  ConvexHull,
  ConcaveHull,
}

impl Operation {
  pub fn from_route(route: &str) -> Option<Operation> {
    match route.trim_start_matches('/') {
      "convexhull" => Some(Operation::ConvexHull),
      "concavehull" => Some(Operation::ConcaveHull),
      _ => None,
    }
  }

  pub fn route(self) -> &'static str {
    match self {
      Operation::ConvexHull => "/convexhull",
      Operation::ConcaveHull => "/concavehull",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexHullRequest {
  #[serde(default)]
  pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcaveHullRequest {
  #[serde(default)]
  pub points: Vec<Point>,
  #[serde(default)]
  pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HullResponse {
  pub hull: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
  pub status: u16,
  pub body: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  #[error("malformed request body: {0}")]
  MalformedBody(#[from] serde_json::Error),
  #[error("too many points: {count} (limit {limit})")]
  TooManyPoints { count: usize, limit: usize },
  #[error("flat coordinate buffer has an odd length")]
  OddCoordinateCount,
  #[error(transparent)]
  Engine(#[from] Error),
  #[error("hull computation panicked")]
  Panicked,
}

impl ServiceError {
  /// HTTP status class of the error.
  pub fn status_code(&self) -> u16 {
    match self {
      ServiceError::MalformedBody(_) | ServiceError::OddCoordinateCount => 400,
      ServiceError::TooManyPoints { .. } => 413,
      ServiceError::Engine(err) if err.is_input_error() => 400,
      ServiceError::Engine(Error::Cancelled) => 503,
      ServiceError::Engine(_) | ServiceError::Panicked => 500,
    }
  }
}

/// Stateless front of the hull engine. Cheap to clone and safe to share
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct HullService {
  config: Config,
  cancel: Option<CancelToken>,
}

impl HullService {
  pub fn new(config: Config) -> HullService {
    HullService {
      config,
      cancel: None,
    }
  }

  /// Shutdown switch: once `token` fires, this service and every clone of it
  /// answer all further requests with [`Error::Cancelled`]. Use
  /// [`compute_with_cancel`](Self::compute_with_cancel) to abandon a single
  /// request.
  #[must_use]
  pub fn with_cancel_token(mut self, token: CancelToken) -> HullService {
    self.cancel = Some(token);
    self
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  fn options(&self) -> HullOptions {
    let options = self.config.options();
    match &self.cancel {
      Some(token) => options.with_cancel(token.clone()),
      None => options,
    }
  }

  pub fn convex_hull(&self, request: &ConvexHullRequest) -> Result<HullResponse, ServiceError> {
    self.compute(Operation::ConvexHull, &request.points, None)
  }

  pub fn concave_hull(&self, request: &ConcaveHullRequest) -> Result<HullResponse, ServiceError> {
    self.compute(Operation::ConcaveHull, &request.points, request.alpha)
  }

  /// Run one operation. Invalid coordinates are rejected first; inputs with
  /// fewer than three points and degenerate results both answer with an
  /// empty hull.
  pub fn compute(
    &self,
    op: Operation,
    points: &[Point],
    alpha: Option<f64>,
  ) -> Result<HullResponse, ServiceError> {
    self.run(op, points, alpha, self.options())
  }

  /// [`compute`](Self::compute) that also stops when `token` fires. The token
  /// only affects this call.
  pub fn compute_with_cancel(
    &self,
    op: Operation,
    points: &[Point],
    alpha: Option<f64>,
    token: &CancelToken,
  ) -> Result<HullResponse, ServiceError> {
    if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
      return Err(Error::Cancelled.into());
    }
    let options = self.config.options().with_cancel(token.clone());
    self.run(op, points, alpha, options)
  }

  fn run(
    &self,
    op: Operation,
    points: &[Point],
    alpha: Option<f64>,
    options: HullOptions,
  ) -> Result<HullResponse, ServiceError> {
    if points.len() > self.config.max_points {
      return Err(ServiceError::TooManyPoints {
        count: points.len(),
        limit: self.config.max_points,
      });
    }
    let points = normalize(points)?;
    if points.len() < 3 {
      debug!(route = op.route(), n = points.len(), "short input");
      return Ok(HullResponse::default());
    }
    let alpha = alpha.unwrap_or(self.config.default_alpha);
    let result = catch_unwind(AssertUnwindSafe(|| match op {
      Operation::ConvexHull => convex_hull_with(&points, &options),
      Operation::ConcaveHull => concave_hull_with(&points, alpha, &options),
    }));
    let polygon: BoundaryPolygon = match result {
      Ok(result) => result?,
      Err(_) => return Err(ServiceError::Panicked),
    };
    if polygon.is_degenerate() {
      debug!(route = op.route(), vertices = polygon.len(), "degenerate hull");
      return Ok(HullResponse::default());
    }
    Ok(HullResponse {
      hull: polygon.into_points(),
    })
  }

  fn handle(&self, op: Operation, body: &str) -> Result<HullResponse, ServiceError> {
    match op {
      Operation::ConvexHull => self.convex_hull(&serde_json::from_str(body)?),
      Operation::ConcaveHull => self.concave_hull(&serde_json::from_str(body)?),
    }
  }

  /// Decode a JSON request, run it and encode the reply.
  pub fn handle_json(&self, op: Operation, body: &str) -> Reply {
    debug!(route = op.route(), bytes = body.len(), "request");
    let encoded = self
      .handle(op, body)
      .and_then(|response| Ok(serde_json::to_string(&response)?));
    match encoded {
      Ok(body) => Reply { status: 200, body },
      Err(err) => {
        let status = err.status_code();
        warn!(route = op.route(), status, %err, "request failed");
        let body = serde_json::to_string(&ErrorBody {
          error: err.to_string(),
        })
        .unwrap_or_else(|_| String::from(r#"{"error":"internal error"}"#));
        Reply { status, body }
      }
    }
  }

  /// Flat-buffer entry point: `values` alternates `x, y`, as does the result.
  pub fn handle_flat(
    &self,
    op: Operation,
    values: &[f64],
    alpha: Option<f64>,
  ) -> Result<Vec<f64>, ServiceError> {
    let points = unflatten(values)?;
    let response = self.compute(op, &points, alpha)?;
    Ok(flatten(&response.hull))
  }
}

/// `[x0, y0, x1, y1, ..]`
pub fn flatten(points: &[Point]) -> Vec<f64> {
  points.iter().flat_map(|pt| pt.array).collect()
}

/// Inverse of [`flatten`].
pub fn unflatten(values: &[f64]) -> Result<Vec<Point>, ServiceError> {
  if values.len() % 2 != 0 {
    return Err(ServiceError::OddCoordinateCount);
  }
  Ok(
    values
      .chunks_exact(2)
      .map(|xy| Point::new([xy[0], xy[1]]))
      .collect(),
  )
}
