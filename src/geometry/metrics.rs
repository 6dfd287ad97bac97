//! Planar geometry primitives used by the connectivity builder.
//!
//! Points are `[x, y]` arrays. Angles are measured counter-clockwise from
//! the positive x axis ("east") and normalised to `[0, 2π)`; this is the
//! single rotational convention every adjacency table in the crate uses.

use itertools::Itertools;
use std::f64::consts::TAU;

/// Tolerance for orientation and degeneracy tests, relative to the squared
/// extent of the inputs.
pub const REL_EPS: f64 = 1e-12;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// Midpoint of a segment.
#[inline]
pub fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
}

/// Angle of the vector `(dx, dy)` counter-clockwise from east, in `[0, 2π)`.
#[inline]
pub fn angle_from_east(dx: f64, dy: f64) -> f64 {
    let a = dy.atan2(dx);
    if a < 0.0 { a + TAU } else { a }
}

#[inline]
fn coord(p: [f64; 2]) -> robust::Coord<f64> {
    robust::Coord { x: p[0], y: p[1] }
}

/// Twice the signed area of triangle `abc`; positive when counter-clockwise.
///
/// The sign is exact (adaptive-precision arithmetic), so collinear inputs
/// give exactly `0.0`.
#[inline]
pub fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    robust::orient2d(coord(a), coord(b), coord(c))
}

/// Signed shoelace area of a closed polygon; positive for CCW vertex order.
pub fn signed_polygon_area(vertices: &[[f64; 2]]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    0.5 * vertices
        .iter()
        .circular_tuple_windows()
        .map(|(p, q)| p[0] * q[1] - q[0] * p[1])
        .sum::<f64>()
}

/// Unsigned polygon area.
pub fn polygon_area(vertices: &[[f64; 2]]) -> f64 {
    signed_polygon_area(vertices).abs()
}

/// Arithmetic mean of a non-empty point set.
pub fn centroid(points: &[[f64; 2]]) -> [f64; 2] {
    let n = points.len().max(1) as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

/// Circumcentre of triangle `abc`, or `None` when the points are collinear.
pub fn circumcenter(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 2]> {
    let bx = b[0] - a[0];
    let by = b[1] - a[1];
    let cx = c[0] - a[0];
    let cy = c[1] - a[1];
    let d = 2.0 * (bx * cy - by * cx);
    let scale = (bx * bx + by * by).max(cx * cx + cy * cy);
    if d.abs() <= REL_EPS * scale {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    Some([a[0] + ux, a[1] + uy])
}

/// `true` when `p` lies strictly inside the circumcircle of CCW triangle `abc`.
///
/// Exact: a cocircular `p` is never inside.
pub fn in_circumcircle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> bool {
    robust::incircle(coord(a), coord(b), coord(c), coord(p)) > 0.0
}

/// Sort `ids` counter-clockwise from east around `center`.
///
/// `position` maps an id to its coordinate. Equal angles keep input order.
pub fn sort_ccw_from_east<F>(center: [f64; 2], ids: &mut [usize], position: F)
where
    F: Fn(usize) -> [f64; 2],
{
    ids.sort_by(|&i, &j| {
        let pi = position(i);
        let pj = position(j);
        let ai = angle_from_east(pi[0] - center[0], pi[1] - center[1]);
        let aj = angle_from_east(pj[0] - center[0], pj[1] - center[1]);
        ai.total_cmp(&aj)
    });
}

/// Row-major ordering key: ascending `y`, then ascending `x`.
#[inline]
pub fn row_major_cmp(a: [f64; 2], b: [f64; 2]) -> std::cmp::Ordering {
    a[1].total_cmp(&b[1]).then(a[0].total_cmp(&b[0]))
}

/// Lexicographic `(x, y)` comparison used for link direction.
#[inline]
pub fn lexicographic_cmp(a: [f64; 2], b: [f64; 2]) -> std::cmp::Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}
