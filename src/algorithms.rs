pub mod concave_hull;
pub mod convex_hull;
pub mod triangulation;

#[doc(inline)]
pub use concave_hull::alpha_shape::{concave_hull, concave_hull_with, covering_alpha};

#[doc(inline)]
pub use convex_hull::graham_scan::{convex_hull, convex_hull_with};
