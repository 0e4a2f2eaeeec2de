// https://en.wikipedia.org/wiki/Delaunay_triangulation#Sweep-line
use claims::debug_assert_ok;
use std::collections::HashMap;
use tracing::trace;

use crate::cancel::CHECKPOINT_INTERVAL;
use crate::data::{Point, TriangleView};
use crate::orientation::inside_circle;
use crate::{Error, HullOptions, Orientation};

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TriIdx(pub usize);
impl std::fmt::Debug for TriIdx {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "t{}", self.0)
  }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct VertIdx(pub usize);
impl std::fmt::Debug for VertIdx {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "v{}", self.0)
  }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct SubIdx(pub usize);
impl std::fmt::Debug for SubIdx {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "s{}", self.0)
  }
}

impl SubIdx {
  pub fn ccw(self) -> Self {
    Self((self.0 + 1) % 3)
  }
  pub fn cw(self) -> Self {
    Self((self.0 + 2) % 3)
  }
}

/// Directed edge `sub` of triangle `tri`.
///
/// Edge `i` runs from vertex `i.cw()` to vertex `i`, so the triangle lies on
/// its left. `neighbors[i]` is the triangle on the other side.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Edge {
  pub tri: TriIdx,
  pub sub: SubIdx,
}
impl Edge {
  pub fn new(tri: TriIdx, sub: SubIdx) -> Self {
    Self { tri, sub }
  }
}

/// Triangle representation
#[derive(Clone)]
pub struct Triangle {
  /// list of vertex indices, in counterclockwise order
  pub vertices: [VertIdx; 3],
  /// list of neighbor triangle indices, see [`Edge`]
  pub neighbors: [Option<TriIdx>; 3],
}

impl std::fmt::Debug for Triangle {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "Tri{{v=(")?;
    for (idx, v) in self.vertices.iter().enumerate() {
      let prefix = if idx == 0 { "" } else { ", " };
      write!(fmt, "{}{}", prefix, v.0)?;
    }
    write!(fmt, "), n=(")?;
    for (idx, n) in self.neighbors.iter().enumerate() {
      let prefix = if idx == 0 { "" } else { ", " };
      match n {
        Some(idx) => write!(fmt, "{}{}", prefix, idx.0)?,
        None => write!(fmt, "{}_", prefix)?,
      }
    }
    write!(fmt, ")}}")
  }
}

impl Triangle {
  pub fn vert(&self, idx: SubIdx) -> VertIdx {
    self.vertices[idx.0]
  }

  pub fn neighbor(&self, idx: SubIdx) -> Option<TriIdx> {
    self.neighbors[idx.0]
  }

  /// Endpoints of edge `idx`, in edge direction.
  pub fn edge(&self, idx: SubIdx) -> (VertIdx, VertIdx) {
    (self.vert(idx.cw()), self.vert(idx))
  }

  fn neighbor_mut(&mut self, idx: SubIdx) -> &mut Option<TriIdx> {
    &mut self.neighbors[idx.0]
  }

  fn update_neighbor(&mut self, idx_from: TriIdx, idx_to: TriIdx) -> bool {
    for n in self.neighbors.iter_mut() {
      if *n == Some(idx_from) {
        *n = Some(idx_to);
        return true;
      }
    }
    false
  }

  fn neighbor_idx(&self, idx: TriIdx) -> Option<SubIdx> {
    self
      .neighbors
      .iter()
      .position(|p| *p == Some(idx))
      .map(SubIdx)
  }
}

/// Delaunay triangulation of a point set.
///
/// Vertices are the distinct input points in lexicographic order. Every
/// triangle is strictly counter-clockwise and no vertex lies strictly inside
/// the circumcircle of any triangle. The union of the triangles is the convex
/// hull of the points.
#[derive(Debug, Clone)]
pub struct TriangularNetwork {
  pub vertices: Vec<Point>,
  pub triangles: Vec<Triangle>,
}

// Boundary bookkeeping used while sweeping. Indexed by vertex; only entries of
// vertices currently on the hull are meaningful.
struct Hull {
  next: Vec<VertIdx>,
  prev: Vec<VertIdx>,
  // The hull edge leaving each vertex.
  edge: Vec<Option<Edge>>,
  len: usize,
}

impl Hull {
  fn new(n: usize) -> Hull {
    Hull {
      next: vec![VertIdx(0); n],
      prev: vec![VertIdx(0); n],
      edge: vec![None; n],
      len: 0,
    }
  }

  fn next(&self, v: VertIdx) -> VertIdx {
    self.next[v.0]
  }

  fn prev(&self, v: VertIdx) -> VertIdx {
    self.prev[v.0]
  }

  fn link(&mut self, from: VertIdx, to: VertIdx, edge: Edge) {
    self.next[from.0] = to;
    self.prev[to.0] = from;
    self.edge[from.0] = Some(edge);
  }
}

impl TriangularNetwork {
  /// $O(n \log n)$ expected. Triangulate `points`.
  ///
  /// Duplicates are merged. Returns `Ok(None)` when fewer than three distinct
  /// points remain or all of them are colinear.
  ///
  /// # Errors
  /// * [`Error::Cancelled`] if the token in `options` fires.
  /// * [`Error::Internal`] if a triangulation invariant breaks.
  #[tracing::instrument(level = "debug", skip_all, fields(n = points.len()))]
  pub fn delaunay(points: &[Point], options: &HullOptions) -> Result<Option<Self>, Error> {
    let mut vertices = points.to_vec();
    vertices.sort_unstable();
    vertices.dedup();

    let n = vertices.len();
    let off_line = |k: &usize| !vertices[0].orientation(&vertices[1], &vertices[*k]).is_colinear();
    let seed = match (2..n).find(off_line) {
      Some(k) => k,
      None => return Ok(None),
    };

    let mut net = TriangularNetwork {
      vertices,
      triangles: Vec::with_capacity(2 * n),
    };
    let mut hull = net.seed_fan(seed)?;

    let mut last = VertIdx(seed);
    for v in seed + 1..n {
      if v % CHECKPOINT_INTERVAL == 0 {
        options.checkpoint()?;
      }
      let v = VertIdx(v);
      net.insert_outside(&mut hull, last, v)?;
      last = v;
    }
    options.checkpoint()?;

    debug_assert_ok!(net.validate());
    Ok(Some(net))
  }

  pub fn tri(&self, idx: TriIdx) -> &Triangle {
    &self.triangles[idx.0]
  }

  fn tri_mut(&mut self, idx: TriIdx) -> &mut Triangle {
    &mut self.triangles[idx.0]
  }

  fn add_tri(&mut self, vertices: [VertIdx; 3], neighbors: [Option<TriIdx>; 3]) -> TriIdx {
    let idx = self.triangles.len();
    self.triangles.push(Triangle {
      vertices,
      neighbors,
    });
    TriIdx(idx)
  }

  pub fn vert(&self, idx: VertIdx) -> &Point {
    &self.vertices[idx.0]
  }

  pub fn tri_vert(&self, tri_idx: TriIdx, idx: SubIdx) -> &Point {
    self.vert(self.tri(tri_idx).vert(idx))
  }

  pub fn view(&self, idx: TriIdx) -> TriangleView<'_> {
    let [a, b, c] = self.tri(idx).vertices;
    TriangleView::new_unchecked([self.vert(a), self.vert(b), self.vert(c)])
  }

  pub fn iter_tri(&self) -> impl Iterator<Item = TriIdx> {
    (0..self.triangles.len()).map(TriIdx)
  }

  /// The same edge seen from the neighbouring triangle, `None` on the hull.
  pub fn twin(&self, edge: &Edge) -> Result<Option<Edge>, Error> {
    let t = self.tri(edge.tri);
    let idx_neighbor = match t.neighbor(edge.sub) {
      Some(idx) => idx,
      None => return Ok(None),
    };
    match self.tri(idx_neighbor).neighbor_idx(edge.tri) {
      Some(sub) => Ok(Some(Edge::new(idx_neighbor, sub))),
      None => Err(Error::Internal("neighbour link is not reciprocal")),
    }
  }

  /// $O(n)$ Vertices of the outer boundary in counter-clockwise order, starting
  /// at the lowest one. Colinear boundary vertices are included.
  pub fn hull(&self) -> Vec<VertIdx> {
    let mut next = HashMap::new();
    for t in self.triangles.iter() {
      for sub in 0..3 {
        let sub = SubIdx(sub);
        if t.neighbor(sub).is_none() {
          let (src, dst) = t.edge(sub);
          next.insert(src, dst);
        }
      }
    }
    let start = match next.keys().min_by(|a, b| self.vert(**a).cmp_lowest(self.vert(**b))) {
      Some(v) => *v,
      None => return Vec::new(),
    };
    let mut ring = vec![start];
    let mut cur = start;
    while let Some(&v) = next.get(&cur) {
      if v == start || ring.len() > next.len() {
        break;
      }
      ring.push(v);
      cur = v;
    }
    ring
  }

  /// $O(n)$ Check counter-clockwise triangles and reciprocal neighbour links.
  pub fn validate(&self) -> Result<(), Error> {
    for idx in self.iter_tri() {
      if !self.view(idx).orientation().is_ccw() {
        return Err(Error::ClockWiseViolation);
      }
      let t = self.tri(idx);
      for sub in 0..3 {
        let e = Edge::new(idx, SubIdx(sub));
        if let Some(d) = self.twin(&e)? {
          let (src, dst) = t.edge(e.sub);
          if self.tri(d.tri).edge(d.sub) != (dst, src) {
            return Err(Error::Internal("neighbours do not share an edge"));
          }
        }
      }
    }
    Ok(())
  }

  // Fan from `vertices[k]` over the colinear run `vertices[0..k]`.
  fn seed_fan(&mut self, k: usize) -> Result<Hull, Error> {
    let apex = VertIdx(k);
    let ccw = self.vertices[0].orientation(&self.vertices[1], &self.vertices[k])
      == Orientation::CounterClockWise;
    for i in 0..k - 1 {
      let (a, b) = if ccw { (i, i + 1) } else { (i + 1, i) };
      self.add_tri([VertIdx(a), VertIdx(b), apex], [None; 3]);
    }

    let mut edges = HashMap::new();
    for idx in self.iter_tri() {
      for sub in 0..3 {
        let sub = SubIdx(sub);
        edges.insert(self.tri(idx).edge(sub), Edge::new(idx, sub));
      }
    }
    let mut hull = Hull::new(self.vertices.len());
    for (&(src, dst), &edge) in edges.iter() {
      match edges.get(&(dst, src)) {
        Some(twin) => *self.tri_mut(edge.tri).neighbor_mut(edge.sub) = Some(twin.tri),
        None => {
          hull.link(src, dst, edge);
          hull.len += 1;
        }
      }
    }
    Ok(hull)
  }

  // `v` is lexicographically larger than every vertex in the network, so it
  // lies strictly outside the hull and sees at least one hull edge at `last`.
  fn insert_outside(&mut self, hull: &mut Hull, last: VertIdx, v: VertIdx) -> Result<(), Error> {
    let visible = |net: &Self, a: VertIdx, b: VertIdx| {
      net.vert(a).orientation(net.vert(b), net.vert(v)).is_cw()
    };

    let mut end = last;
    let mut steps = 0;
    while visible(self, end, hull.next(end)) {
      end = hull.next(end);
      steps += 1;
      if steps > hull.len {
        return Err(Error::Internal("every hull edge is visible"));
      }
    }
    let mut start = last;
    while visible(self, hull.prev(start), start) {
      start = hull.prev(start);
      steps += 1;
      if steps > hull.len {
        return Err(Error::Internal("every hull edge is visible"));
      }
    }
    if start == end {
      return Err(Error::Internal("new vertex sees no hull edge"));
    }

    // One triangle [b, a, v] per visible edge a -> b, chained along the fan.
    let mut new_tris = Vec::new();
    let mut prev_tri: Option<TriIdx> = None;
    let mut a = start;
    while a != end {
      let b = hull.next(a);
      let outer = hull.edge[a.0].ok_or(Error::Internal("hull edge missing"))?;
      let idx = self.add_tri([b, a, v], [None, Some(outer.tri), prev_tri]);
      *self.tri_mut(outer.tri).neighbor_mut(outer.sub) = Some(idx);
      if let Some(prev) = prev_tri {
        *self.tri_mut(prev).neighbor_mut(SubIdx(0)) = Some(idx);
      }
      new_tris.push(idx);
      prev_tri = Some(idx);
      a = b;
    }
    let (first, last_tri) = match (new_tris.first(), new_tris.last()) {
      (Some(&first), Some(&last_tri)) => (first, last_tri),
      _ => return Err(Error::Internal("new vertex sees no hull edge")),
    };

    hull.len = hull.len + 2 - new_tris.len();
    hull.link(start, v, Edge::new(first, SubIdx(2)));
    hull.link(v, end, Edge::new(last_tri, SubIdx(0)));

    for idx in new_tris {
      self.legalize(hull, Edge::new(idx, SubIdx(1)))?;
    }
    Ok(())
  }

  // Lawson flips. Every edge on the stack faces the newly inserted vertex.
  fn legalize(&mut self, hull: &mut Hull, edge: Edge) -> Result<(), Error> {
    let mut stack = vec![edge];
    while let Some(edge) = stack.pop() {
      let twin = match self.twin(&edge)? {
        Some(twin) => twin,
        None => continue,
      };
      let (idx0, s) = (edge.tri, edge.sub);
      let (idx1, j) = (twin.tri, twin.sub);
      let t0 = self.tri(idx0).clone();
      let t1 = self.tri(idx1).clone();

      let a = t0.vert(s.cw());
      let b = t0.vert(s);
      let c = t0.vert(s.ccw());
      let d = t1.vert(j.ccw());

      if !inside_circle(self.vert(a), self.vert(b), self.vert(c), self.vert(d)) {
        continue;
      }
      trace!(?idx0, ?idx1, "flip");

      let n_ca = t0.neighbor(s.cw());
      let n_bc = t0.neighbor(s.ccw());
      let n_ad = t1.neighbor(j.ccw());
      let n_db = t1.neighbor(j.cw());

      *self.tri_mut(idx0) = Triangle {
        vertices: [c, a, d],
        neighbors: [Some(idx1), n_ca, n_ad],
      };
      *self.tri_mut(idx1) = Triangle {
        vertices: [c, d, b],
        neighbors: [n_bc, Some(idx0), n_db],
      };

      // n_ca and n_db keep their triangle, n_ad and n_bc swap sides.
      if let Some(n) = n_ad {
        if !self.tri_mut(n).update_neighbor(idx1, idx0) {
          return Err(Error::Internal("flip lost a neighbour link"));
        }
      }
      if let Some(n) = n_bc {
        if !self.tri_mut(n).update_neighbor(idx0, idx1) {
          return Err(Error::Internal("flip lost a neighbour link"));
        }
      }

      for (n, vert, edge) in [
        (n_ca, c, Edge::new(idx0, SubIdx(1))),
        (n_ad, a, Edge::new(idx0, SubIdx(2))),
        (n_bc, b, Edge::new(idx1, SubIdx(0))),
        (n_db, d, Edge::new(idx1, SubIdx(2))),
      ] {
        if n.is_none() {
          hull.edge[vert.0] = Some(edge);
        }
      }

      stack.push(Edge::new(idx0, SubIdx(2)));
      stack.push(Edge::new(idx1, SubIdx(2)));
    }
    Ok(())
  }
}
