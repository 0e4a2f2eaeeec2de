use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::algorithms::convex_hull::graham_scan::graham_scan;
use crate::algorithms::triangulation::delaunay::{Edge, SubIdx, TriangularNetwork, VertIdx};
use crate::data::point::lowest_point;
use crate::data::polygon::signed_area_2x;
use crate::data::{centroid, normalize, BoundaryPolygon, Point};
use crate::{Error, HullOptions};

// https://en.wikipedia.org/wiki/Alpha_shape

/// $O(n \log n)$ Concave hull of a set of points.
///
/// Triangles of the Delaunay triangulation whose circumradius is at most
/// `alpha` are kept; the boundary of their union is traced and the largest
/// outer loop is returned. Holes are dropped.
///
/// * `alpha` of zero keeps nothing and gives an empty polygon.
/// * `alpha` at or above [`covering_alpha`] gives exactly the convex hull.
/// * Fewer than three distinct points, or colinear input, give the same
///   degenerate result as the convex hull.
///
/// # Errors
/// * [`Error::InvalidAlpha`] if `alpha` is negative, NaN or infinite.
/// * [`Error::InvalidCoordinate`] if any coordinate is NaN or infinite.
/// * [`Error::Internal`] if the triangulation is inconsistent.
///
/// # Examples
///
/// ```rust
/// # use rhull::algorithms::concave_hull;
/// # use rhull::data::Point;
/// let square = vec![
///   Point::new([0., 0.]),
///   Point::new([2., 0.]),
///   Point::new([2., 2.]),
///   Point::new([0., 2.]),
/// ];
/// assert_eq!(concave_hull(&square, 10.).unwrap().len(), 4);
/// assert!(concave_hull(&square, 0.).unwrap().is_empty());
/// ```
pub fn concave_hull(pts: &[Point], alpha: f64) -> Result<BoundaryPolygon, Error> {
  concave_hull_with(pts, alpha, &HullOptions::default())
}

/// [`concave_hull`] with an explicit colinearity tolerance and cancellation
/// token. The tolerance only affects the final removal of straight vertices
/// and the convex fallback; the triangulation is always exact.
#[tracing::instrument(level = "debug", skip_all, fields(n = pts.len(), alpha))]
pub fn concave_hull_with(
  pts: &[Point],
  alpha: f64,
  options: &HullOptions,
) -> Result<BoundaryPolygon, Error> {
  check_alpha(alpha)?;
  let pts = normalize(pts)?;

  let net = match TriangularNetwork::delaunay(&pts, options)? {
    Some(net) => net,
    None => {
      debug!("no triangulation, using the convex hull");
      return Ok(BoundaryPolygon::new_unchecked(graham_scan(pts, options)?));
    }
  };

  let radii: Vec<f64> = net
    .iter_tri()
    .map(|idx| net.view(idx).circumradius())
    .collect();
  let threshold = radii.iter().copied().fold(0.0, f64::max);
  if alpha >= threshold {
    debug!(threshold, "alpha covers every triangle");
    return Ok(BoundaryPolygon::new_unchecked(graham_scan(pts, options)?));
  }

  let kept: Vec<bool> = radii.iter().map(|r| *r <= alpha).collect();
  let n_kept = kept.iter().filter(|k| **k).count();
  debug!(threshold, kept = n_kept, total = kept.len(), "alpha filter");
  if n_kept == 0 {
    return Ok(BoundaryPolygon::empty());
  }

  let loops = trace_loops(&net, &kept, options)?;
  debug!(loops = loops.len(), "traced boundary");

  let target = centroid(&pts);
  let mut best: Option<(f64, f64, Vec<Point>)> = None;
  for ring in loops {
    let ring: Vec<Point> = ring.into_iter().map(|v| *net.vert(v)).collect();
    let area = signed_area_2x(&ring);
    if area <= 0.0 {
      continue;
    }
    let dist = match (centroid(&ring), target) {
      (Some(c), Some(t)) => c.distance(&t),
      _ => f64::INFINITY,
    };
    let better = match &best {
      None => true,
      Some((best_area, best_dist, _)) => {
        area > *best_area || (area == *best_area && dist < *best_dist)
      }
    };
    if better {
      best = Some((area, dist, ring));
    }
  }

  let mut ring = match best {
    Some((_, _, ring)) => ring,
    None => {
      debug!("no outer loop");
      return Ok(BoundaryPolygon::empty());
    }
  };
  remove_straight_vertices(&mut ring, options);
  if let Some(lowest) = lowest_point(&ring) {
    if let Some(start) = ring.iter().position(|pt| *pt == lowest) {
      ring.rotate_left(start);
    }
  }
  Ok(BoundaryPolygon::new_unchecked(ring))
}

/// Smallest alpha for which [`concave_hull`] returns the convex hull: the
/// largest circumradius in the Delaunay triangulation. Zero when the points
/// have no triangulation.
///
/// # Errors
/// [`Error::InvalidCoordinate`] if any coordinate is NaN or infinite.
pub fn covering_alpha(pts: &[Point]) -> Result<f64, Error> {
  let pts = normalize(pts)?;
  let net = TriangularNetwork::delaunay(&pts, &HullOptions::default())?;
  Ok(match net {
    Some(net) => net
      .iter_tri()
      .map(|idx| net.view(idx).circumradius())
      .fold(0.0, f64::max),
    None => 0.0,
  })
}

pub(crate) fn check_alpha(alpha: f64) -> Result<f64, Error> {
  if alpha.is_finite() && alpha >= 0.0 {
    Ok(alpha)
  } else {
    Err(Error::InvalidAlpha { alpha })
  }
}

// An edge is on the boundary of the kept region when the triangle across it
// is missing or discarded.
fn is_free(net: &TriangularNetwork, kept: &[bool], edge: Edge) -> bool {
  match net.tri(edge.tri).neighbor(edge.sub) {
    None => true,
    Some(n) => !kept[n.0],
  }
}

// The free edge leaving the end vertex of `edge`, found by turning through
// the kept triangles around that vertex.
fn next_free_edge(net: &TriangularNetwork, kept: &[bool], edge: Edge) -> Result<Edge, Error> {
  let mut cur = Edge::new(edge.tri, edge.sub.ccw());
  for _ in 0..net.triangles.len() {
    if is_free(net, kept, cur) {
      return Ok(cur);
    }
    let twin = net
      .twin(&cur)?
      .ok_or(Error::Internal("interior edge without a twin"))?;
    cur = Edge::new(twin.tri, twin.sub.ccw());
  }
  Err(Error::Internal("no free edge around vertex"))
}

// Closed loops of free edges, each split into simple loops.
fn trace_loops(
  net: &TriangularNetwork,
  kept: &[bool],
  options: &HullOptions,
) -> Result<Vec<Vec<VertIdx>>, Error> {
  let mut used: HashSet<Edge> = HashSet::new();
  let mut loops = Vec::new();
  for idx in net.iter_tri().filter(|idx| kept[idx.0]) {
    for sub in 0..3 {
      let start = Edge::new(idx, SubIdx(sub));
      if used.contains(&start) || !is_free(net, kept, start) {
        continue;
      }
      options.checkpoint()?;
      let mut ring = Vec::new();
      let mut cur = start;
      loop {
        used.insert(cur);
        ring.push(net.tri(cur.tri).edge(cur.sub).0);
        cur = next_free_edge(net, kept, cur)?;
        if cur == start {
          break;
        }
        if used.contains(&cur) {
          return Err(Error::Internal("free edges do not close"));
        }
      }
      loops.extend(split_at_repeats(ring));
    }
  }
  Ok(loops)
}

// A loop that passes a vertex twice is cut there. Pieces shorter than a
// triangle cannot enclose anything and are dropped.
fn split_at_repeats(ring: Vec<VertIdx>) -> Vec<Vec<VertIdx>> {
  let mut pieces = Vec::new();
  let mut path: Vec<VertIdx> = Vec::with_capacity(ring.len());
  let mut pos: HashMap<VertIdx, usize> = HashMap::new();
  for v in ring {
    if let Some(&i) = pos.get(&v) {
      let piece: Vec<VertIdx> = path.drain(i..).collect();
      for u in piece.iter() {
        pos.remove(u);
      }
      pieces.push(piece);
    }
    pos.insert(v, path.len());
    path.push(v);
  }
  pieces.push(path);
  pieces.retain(|piece| piece.len() >= 3);
  pieces
}

// Drop vertices where the boundary continues straight on.
fn remove_straight_vertices(ring: &mut Vec<Point>, options: &HullOptions) {
  let mut i = 0;
  let mut unchanged = 0;
  while ring.len() > 3 && unchanged < ring.len() {
    let n = ring.len();
    let prev = ring[(i + n - 1) % n];
    let cur = ring[i % n];
    let next = ring[(i + 1) % n];
    let forward = (cur.x_coord() - prev.x_coord()) * (next.x_coord() - cur.x_coord())
      + (cur.y_coord() - prev.y_coord()) * (next.y_coord() - cur.y_coord());
    if prev
      .orientation_with(&cur, &next, options.tolerance)
      .is_colinear()
      && forward > 0.0
    {
      ring.remove(i % n);
      unchanged = 0;
    } else {
      i += 1;
      unchanged += 1;
    }
    i %= ring.len();
  }
}
