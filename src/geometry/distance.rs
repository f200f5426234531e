//! Minimum-distance kernels: segment–segment and triangle–triangle.
//!
//! The triangle–triangle routine is a modified Möller test extended to
//! report the separation distance and direction instead of a boolean.
//! It drives both intersection detection and the signed displacement
//! from an element surface to the nearest cutting facet, so the sign
//! conventions here are load-bearing for blanking decisions.

use nalgebra::{Point3, Vector3};

/// Signed-plane distances below this magnitude are snapped to zero.
const PLANE_TOL: f64 = 1e-10;

/// Squared-length threshold for treating a segment as a point.
const DEGEN_TOL: f64 = 1e-30;

/// Result of a minimum-distance query between two triangles.
///
/// `vector` points from the first triangle toward the second; it is
/// meaningful only when `distance > 0`.
#[derive(Debug, Clone, Copy)]
pub struct Separation {
    pub distance: f64,
    pub vector: Vector3<f64>,
}

impl Separation {
    fn touching() -> Self {
        Self { distance: 0.0, vector: Vector3::zeros() }
    }
}

/// Closest points between segments `[p1,q1]` and `[p2,q2]`.
///
/// Returns `(distance, point_on_first, point_on_second)`. Degenerate
/// (zero-length) segments collapse to their endpoints.
pub fn seg_seg_closest(
    p1: &Point3<f64>,
    q1: &Point3<f64>,
    p2: &Point3<f64>,
    q2: &Point3<f64>,
) -> (f64, Point3<f64>, Point3<f64>) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;

    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    let (s, t) = if a <= DEGEN_TOL && e <= DEGEN_TOL {
        (0.0, 0.0)
    } else if a <= DEGEN_TOL {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= DEGEN_TOL {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Closest point on infinite line 1 to line 2, clamped; zero
            // denominator means parallel lines
            let mut s = if denom.abs() > DEGEN_TOL {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    ((c2 - c1).norm(), c1, c2)
}

/// Consistent-sign test for a point lying in a triangle, both assumed to
/// lie in the plane with normal `n`.
fn point_in_tri(p: &Point3<f64>, tri: &[Point3<f64>; 3], n: &Vector3<f64>) -> bool {
    for i in 0..3 {
        let edge = tri[(i + 1) % 3] - tri[i];
        let vp = p - tri[i];
        if n.dot(&edge.cross(&vp)) < -PLANE_TOL {
            return false;
        }
    }
    true
}

/// Points where the edges of `tri` cross the plane on which its vertices
/// have (snapped) signed distances `d`. Vertices lying exactly on the
/// plane count as crossings.
fn plane_crossings(tri: &[Point3<f64>; 3], d: &[f64; 3]) -> Vec<Point3<f64>> {
    let mut pts = Vec::with_capacity(2);

    for i in 0..3 {
        if d[i] == 0.0 {
            pts.push(tri[i]);
        }
        let j = (i + 1) % 3;
        if d[i] * d[j] < 0.0 {
            let frac = d[i] / (d[i] - d[j]);
            pts.push(tri[i] + (tri[j] - tri[i]) * frac);
        }
    }

    pts.truncate(2);
    pts
}

/// Minimum distance between two triangles.
///
/// Distances at or below `tol` collapse to an intersection (`distance`
/// exactly 0). The separation vector points from `t1` toward `t2`; when
/// several candidate pairs tie within the plane tolerance the first one
/// encountered wins.
pub fn tri_tri_distance(
    t1: &[Point3<f64>; 3],
    t2: &[Point3<f64>; 3],
    tol: f64,
) -> Separation {
    // Nine pairwise edge-edge distances; the running best is also the
    // fallback answer for every non-piercing branch below.
    let mut best = f64::INFINITY;
    let mut best_vec = Vector3::zeros();

    for i in 0..3 {
        for j in 0..3 {
            let (d, c1, c2) =
                seg_seg_closest(&t1[i], &t1[(i + 1) % 3], &t2[j], &t2[(j + 1) % 3]);
            if d < best {
                best = d;
                best_vec = c2 - c1;
            }
        }
    }

    if best <= tol {
        return Separation::touching();
    }

    let n1 = (t1[1] - t1[0]).cross(&(t1[2] - t1[0]));
    let n2 = (t2[1] - t2[0]).cross(&(t2[2] - t2[0]));
    let n1_len = n1.norm();
    let n2_len = n2.norm();

    // Degenerate (zero-area) triangle: the edge scan is all there is
    if n1_len < DEGEN_TOL || n2_len < DEGEN_TOL {
        return Separation { distance: best, vector: best_vec };
    }

    let n1h = n1 / n1_len;
    let n2h = n2 / n2_len;

    let snap = |d: f64| if d.abs() < PLANE_TOL { 0.0 } else { d };

    // Signed distances of t1's vertices to t2's plane, and vice versa
    let mut dp = [0.0; 3];
    let mut dq = [0.0; 3];
    for i in 0..3 {
        dp[i] = snap(n2h.dot(&(t1[i] - t2[0])));
        dq[i] = snap(n1h.dot(&(t2[i] - t1[0])));
    }

    // Coplanar: intersection iff a vertex of one lies inside the other
    // (overlapping edges were already caught by the edge scan)
    if dp.iter().all(|d| *d == 0.0) && dq.iter().all(|d| *d == 0.0) {
        if t1.iter().any(|p| point_in_tri(p, t2, &n2h))
            || t2.iter().any(|q| point_in_tri(q, t1, &n1h))
        {
            return Separation::touching();
        }
        return Separation { distance: best, vector: best_vec };
    }

    let mut cand = best;
    let mut cand_vec = best_vec;

    // Vertex-to-face candidates: a vertex of t1 whose projection onto
    // t2's plane falls inside t2, and symmetrically
    for i in 0..3 {
        if dp[i] != 0.0 {
            let proj = t1[i] - n2h * dp[i];
            if point_in_tri(&proj, t2, &n2h) && dp[i].abs() < cand {
                cand = dp[i].abs();
                cand_vec = proj - t1[i];
            }
        }
        if dq[i] != 0.0 {
            let proj = t2[i] - n1h * dq[i];
            if point_in_tri(&proj, t1, &n1h) && dq[i].abs() < cand {
                cand = dq[i].abs();
                cand_vec = t2[i] - proj;
            }
        }
    }

    let straddle1 = dp.iter().any(|d| *d > 0.0) && dp.iter().any(|d| *d < 0.0);
    let straddle2 = dq.iter().any(|d| *d > 0.0) && dq.iter().any(|d| *d < 0.0);

    // Piercing branch: both triangles straddle the other's plane, so
    // compare their intersection intervals along L = N1 × N2
    if straddle1 && straddle2 {
        let l = n1.cross(&n2);
        let l_len = l.norm();
        if l_len >= DEGEN_TOL {
            let lh = l / l_len;
            let s_pts = plane_crossings(t1, &dp);
            let t_pts = plane_crossings(t2, &dq);

            if s_pts.len() == 2 && t_pts.len() == 2 {
                let origin = t1[0];
                let mut s = [lh.dot(&(s_pts[0] - origin)), lh.dot(&(s_pts[1] - origin))];
                let mut t = [lh.dot(&(t_pts[0] - origin)), lh.dot(&(t_pts[1] - origin))];
                if s[0] > s[1] {
                    s.swap(0, 1);
                }
                if t[0] > t[1] {
                    t.swap(0, 1);
                }

                if s[0] <= t[1] && t[0] <= s[1] {
                    // Overlapping intervals: the triangles interpenetrate
                    return Separation::touching();
                }

                // Disjoint intervals: gap along the plane-intersection
                // line (the crossing points lie on both triangles' edges,
                // so the edge scan normally matches this bound)
                let gap = if s[1] < t[0] { t[0] - s[1] } else { t[1] - s[0] };
                if gap.abs() < cand {
                    cand = gap.abs();
                    cand_vec = lh * gap;
                }
            }
        }
    }

    Separation { distance: cand, vector: cand_vec }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [Point3<f64>; 3] {
        [
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ]
    }

    #[test]
    fn test_seg_seg_parallel() {
        let (d, _, _) = seg_seg_closest(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
        );
        assert_relative_eq!(d, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_seg_seg_crossing() {
        let (d, c1, c2) = seg_seg_closest(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, -1.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        );
        assert_relative_eq!(d, 1.0, epsilon = 1e-14);
        assert_relative_eq!(c1.x, 0.0, epsilon = 1e-14);
        assert_relative_eq!(c2.z, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let sep = tri_tri_distance(&t, &t, 1e-12);
        assert_relative_eq!(sep.distance, 0.0);
    }

    #[test]
    fn test_parallel_separated() {
        // Spec scenario: twin triangles two apart in z
        let t1 = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let t2 = tri([0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.0, 1.0, 2.0]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 2.0, epsilon = 1e-12);
        let dir = sep.vector / sep.vector.norm();
        assert_relative_eq!(dir.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_touching_triangles() {
        let t1 = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let t2 = tri([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 0.0);
    }

    #[test]
    fn test_coplanar_nested() {
        let t1 = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let t2 = tri([1.0, 1.0, 0.0], [2.0, 1.0, 0.0], [1.0, 2.0, 0.0]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 0.0);
    }

    #[test]
    fn test_coplanar_disjoint() {
        let t1 = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let t2 = tri([3.0, 0.0, 0.0], [4.0, 0.0, 0.0], [3.0, 1.0, 0.0]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_piercing_returns_zero() {
        // t2 passes through the interior of t1
        let t1 = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let t2 = tri([1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [2.0, 2.0, 1.0]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 0.0);
    }

    #[test]
    fn test_symmetry() {
        let t1 = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let t2 = tri([0.2, 0.1, 1.5], [1.3, 0.0, 1.7], [0.0, 1.1, 1.6]);
        let ab = tri_tri_distance(&t1, &t2, 1e-12);
        let ba = tri_tri_distance(&t2, &t1, 1e-12);
        assert_relative_eq!(ab.distance, ba.distance, epsilon = 1e-10);
        assert_relative_eq!(ab.vector.x, -ba.vector.x, epsilon = 1e-10);
        assert_relative_eq!(ab.vector.y, -ba.vector.y, epsilon = 1e-10);
        assert_relative_eq!(ab.vector.z, -ba.vector.z, epsilon = 1e-10);
    }

    #[test]
    fn test_vertex_face_projection_wins() {
        // A vertex hovering over the interior of a large triangle: the
        // closest pair is vertex-to-face, not edge-to-edge
        let t1 = tri([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0]);
        let t2 = tri([2.0, 2.0, 0.5], [3.0, 2.0, 1.5], [2.0, 3.0, 1.5]);
        let sep = tri_tri_distance(&t1, &t2, 1e-12);
        assert_relative_eq!(sep.distance, 0.5, epsilon = 1e-12);
        let dir = sep.vector / sep.vector.norm();
        assert_relative_eq!(dir.z, 1.0, epsilon = 1e-12);
    }
}
