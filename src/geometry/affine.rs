//! Affine transforms solved from triangle correspondences.

use crate::foundation::core::{Affine, Point};

/// Determinant magnitude below which a source triangle is treated as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Three points, in drawing order.
pub type Triangle = [Point; 3];

/// Twice the signed area of `t` (positive when clockwise in y-down screen space).
#[inline]
pub fn signed_area2(t: &Triangle) -> f64 {
    let [p0, p1, p2] = *t;
    (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x)
}

/// Solve the affine map taking `src[i]` onto `dst[i]` for all three vertices.
///
/// Returns `None` when the source triangle is degenerate (`|det| < 1e-9`).
pub fn try_affine_from_triangles(src: &Triangle, dst: &Triangle) -> Option<Affine> {
    let [p0, p1, p2] = *src;
    let [q0, q1, q2] = *dst;

    let den = p0.x * (p1.y - p2.y) + p1.x * (p2.y - p0.y) + p2.x * (p0.y - p1.y);
    if den.abs() < DEGENERATE_EPSILON || !den.is_finite() {
        return None;
    }

    // Cofactor rows shared by the x and y solves.
    let ky = [p1.y - p2.y, p2.y - p0.y, p0.y - p1.y];
    let kx = [p2.x - p1.x, p0.x - p2.x, p1.x - p0.x];
    let k1 = [
        p1.x * p2.y - p2.x * p1.y,
        p2.x * p0.y - p0.x * p2.y,
        p0.x * p1.y - p1.x * p0.y,
    ];
    let solve = |k: [f64; 3], v0: f64, v1: f64, v2: f64| (v0 * k[0] + v1 * k[1] + v2 * k[2]) / den;

    let a = solve(ky, q0.x, q1.x, q2.x);
    let c = solve(kx, q0.x, q1.x, q2.x);
    let e = solve(k1, q0.x, q1.x, q2.x);
    let b = solve(ky, q0.y, q1.y, q2.y);
    let d = solve(kx, q0.y, q1.y, q2.y);
    let f = solve(k1, q0.y, q1.y, q2.y);

    Some(Affine::new([a, b, c, d, e, f]))
}

/// Like [`try_affine_from_triangles`], falling back to the identity for degenerate input.
pub fn affine_from_triangles(src: &Triangle, dst: &Triangle) -> Affine {
    try_affine_from_triangles(src, dst).unwrap_or(Affine::IDENTITY)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/affine.rs"]
mod tests;
