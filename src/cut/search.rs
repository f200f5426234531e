//! Constrained Nelder–Mead search and the element/face intersection
//! confirmation built on it.
//!
//! The simplex search is the derivative-free fallback used when a face
//! surface may penetrate a curved element in a way the sampled
//! triangle–triangle scan cannot settle: it minimizes how far outside
//! the element the facet's points map, with a barrier keeping the facet
//! parameters themselves inside their reference domain.

use nalgebra::Vector3;

use crate::element::position::{facet_position, physical_position};
use crate::element::refloc::ref_loc_newton;
use crate::error::Result;

/// Objective values above this mark an infeasible (constraint-violating)
/// trial point.
const INFEASIBLE: f64 = 1e15;

/// Convergence threshold on the best objective value.
const F_TOL: f64 = 2e-8;

/// Simplex iteration cap.
const ITER_MAX: usize = 200;

/// Best point found by a simplex search.
#[derive(Debug, Clone)]
pub struct NmResult {
    pub x: Vec<f64>,
    pub f: f64,
}

/// Barrier constraint for reference coordinates: the maximum |coord|
/// when the point leaves the unit box, −1 inside it.
pub fn constraint_box(x: &[f64]) -> f64 {
    let max_val = x.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_val > 1.0 {
        max_val
    } else {
        -1.0
    }
}

/// Vertices of a regular simplex (`ndims + 1` points, unit
/// circumradius) scaled by `l` and centered on `x0`, stored point-major.
pub fn regular_simplex(ndims: usize, x0: &[f64], l: f64) -> Vec<f64> {
    let n_pts = ndims + 1;
    // Pairwise dot product of unit vectors to the vertices
    let target = -1.0 / ndims as f64;

    let mut x = vec![0.0; ndims * n_pts];
    x[0] = 1.0;

    for i in 0..ndims {
        // Fix component i of all later points so x_i · x_j = -1/ndims
        let mut dot = 0.0;
        for k in 0..i {
            dot += x[i * ndims + k] * x[i * ndims + k];
        }
        let scale = (target - dot) / x[i * ndims + i];
        for j in (i + 1)..n_pts {
            x[j * ndims + i] = scale;
        }

        // Restore |x_{i+1}| = 1 through its own new component
        if i + 1 < ndims {
            let mut dot = 0.0;
            for j in 0..=i {
                dot += x[(i + 1) * ndims + j] * x[(i + 1) * ndims + j];
            }
            x[(i + 1) * ndims + (i + 1)] = (1.0 - dot).max(0.0).sqrt();
        }
    }

    for p in 0..n_pts {
        for d in 0..ndims {
            x[p * ndims + d] = x[p * ndims + d] * l + x0[d];
        }
    }

    x
}

/// Nelder–Mead simplex minimization with a composed barrier constraint.
///
/// Trial points where `constraint` is positive are rejected outright.
/// Standard coefficients: reflection 1, expansion 2, contraction 0.5,
/// shrink 0.5. Terminates when the best value drops below `2e-8` or the
/// iteration cap is hit.
pub fn nelder_mead_constrained<F, G>(
    x0: &[f64],
    mut objective: F,
    constraint: G,
    l0: f64,
) -> NmResult
where
    F: FnMut(&[f64]) -> f64,
    G: Fn(&[f64]) -> f64,
{
    let ndims = x0.len();
    let n_pts = ndims + 1;

    let mut eval = |x: &[f64]| -> f64 {
        let g = constraint(x);
        if g > 0.0 {
            INFEASIBLE + g
        } else {
            objective(x)
        }
    };

    let flat = regular_simplex(ndims, x0, l0);
    let mut pts: Vec<Vec<f64>> = flat.chunks_exact(ndims).map(|c| c.to_vec()).collect();
    let mut vals: Vec<f64> = pts.iter().map(|p| eval(p)).collect();

    for _ in 0..ITER_MAX {
        // Order the simplex: best first, worst last
        let mut order: Vec<usize> = (0..n_pts).collect();
        order.sort_by(|&a, &b| vals[a].total_cmp(&vals[b]));
        let best = order[0];
        let second_worst = order[n_pts - 2];
        let worst = order[n_pts - 1];

        if vals[best] < F_TOL {
            break;
        }

        // Centroid of all but the worst point
        let mut centroid = vec![0.0; ndims];
        for &p in order[..n_pts - 1].iter() {
            for d in 0..ndims {
                centroid[d] += pts[p][d];
            }
        }
        for c in centroid.iter_mut() {
            *c /= (n_pts - 1) as f64;
        }

        // Reflection
        let xr: Vec<f64> = (0..ndims)
            .map(|d| centroid[d] + (centroid[d] - pts[worst][d]))
            .collect();
        let fr = eval(&xr);

        if fr < vals[best] {
            // Expansion
            let xe: Vec<f64> = (0..ndims)
                .map(|d| centroid[d] + 2.0 * (centroid[d] - pts[worst][d]))
                .collect();
            let fe = eval(&xe);
            if fe < fr {
                pts[worst] = xe;
                vals[worst] = fe;
            } else {
                pts[worst] = xr;
                vals[worst] = fr;
            }
        } else if fr < vals[second_worst] {
            pts[worst] = xr;
            vals[worst] = fr;
        } else {
            // Contraction midway between centroid and worst
            let xc: Vec<f64> = (0..ndims)
                .map(|d| 0.5 * (centroid[d] + pts[worst][d]))
                .collect();
            let fc = eval(&xc);
            if fc < vals[worst].min(fr) {
                pts[worst] = xc;
                vals[worst] = fc;
            } else {
                // Shrink everything toward the best point
                let best_pt = pts[best].clone();
                for p in 0..n_pts {
                    if p == best {
                        continue;
                    }
                    for d in 0..ndims {
                        pts[p][d] = 0.5 * (pts[p][d] + best_pt[d]);
                    }
                    vals[p] = eval(&pts[p]);
                }
            }
        }
    }

    let mut best = 0;
    for p in 1..n_pts {
        if vals[p] < vals[best] {
            best = p;
        }
    }
    NmResult { x: pts[best].clone(), f: vals[best] }
}

/// Confirm whether a face surface penetrates a curved element.
///
/// Minimizes, over the facet's parametric domain, how far outside the
/// element the facet point maps under the reference-coordinate solve.
/// Returns the zero vector when the surfaces intersect; otherwise the
/// displacement from the facet's nearest approach to the closest point
/// on the element.
pub fn intersection_check(fxv: &[f64], exv: &[f64], ndims: usize) -> Result<Vector3<f64>> {
    let search_dims = ndims - 1;
    let eps = F_TOL;

    // Surface any shape-order problem once, before the search
    let origin = vec![0.0; search_dims];
    facet_position(fxv, ndims, &origin)?;
    physical_position(exv, ndims, [0.0, 0.0, 0.0])?;

    let objective = |uv: &[f64]| -> f64 {
        let pt = match facet_position(fxv, ndims, uv) {
            Ok(p) => p,
            Err(_) => return INFEASIBLE,
        };
        let xyz = [pt.x, pt.y, pt.z];
        let refloc = match ref_loc_newton(exv, &xyz[..ndims], ndims) {
            Ok(r) => r,
            Err(_) => return INFEASIBLE,
        };

        let max_val = refloc.rst[..ndims].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        if max_val > 1.0 + eps {
            max_val - 1.0
        } else {
            0.0
        }
    };

    let l0 = if ndims == 2 { 0.75 } else { 0.3 };
    let mini = nelder_mead_constrained(&origin, objective, constraint_box, l0);

    if mini.f < eps {
        return Ok(Vector3::zeros());
    }

    // No penetration: report the gap at the nearest approach
    let pt = facet_position(fxv, ndims, &mini.x)?;
    let xyz = [pt.x, pt.y, pt.z];
    let refloc = ref_loc_newton(exv, &xyz[..ndims], ndims)?;

    let mut rst = [0.0f64; 3];
    for i in 0..ndims {
        rst[i] = refloc.rst[i].clamp(-1.0, 1.0);
    }
    let ptc = physical_position(exv, ndims, rst)?;

    Ok(ptc - pt)
}
