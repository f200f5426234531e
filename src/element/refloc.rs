//! Newton solve from a physical point to element reference coordinates.

use crate::basis::shape::{dshape, shape};
use crate::config::NewtonConfig;
use crate::error::Result;
use crate::geometry::Aabb;
use crate::linalg::{adjoint_into, determinant};

/// Outcome of a reference-coordinate solve.
///
/// `rst` is always written, even when the iteration did not converge;
/// `inside` is true only when the final iterate lies in the reference
/// cube (to a `1e-10` slack). Callers treat a non-converged solve as
/// "point not inside" and continue.
#[derive(Debug, Clone, Copy)]
pub struct RefLocation {
    pub rst: [f64; 3],
    pub inside: bool,
}

/// Find the reference coordinates of the physical point `target` within
/// the element whose vertices are `xv` (row-major `nNodes × ndims`,
/// gmsh node order).
pub fn ref_loc_newton(xv: &[f64], target: &[f64], ndims: usize) -> Result<RefLocation> {
    ref_loc_newton_cfg(xv, target, ndims, &NewtonConfig::default())
}

/// [`ref_loc_newton`] with explicit iteration controls.
///
/// The Newton step uses the adjoint/determinant micro-kernel for the
/// Jacobian inverse and takes the full step clamped to
/// `[-clamp, clamp]`, which is robust on badly-shaped extruded
/// curvilinear hexes where damped unclamped steps can oscillate. A
/// residual that shrinks by less than the stall factor after the first
/// two iterations aborts the loop early.
pub fn ref_loc_newton_cfg(
    xv: &[f64],
    target: &[f64],
    ndims: usize,
    cfg: &NewtonConfig,
) -> Result<RefLocation> {
    let n_nodes = xv.len() / ndims;

    // Relative tolerance from the smallest box extent handles meshes at
    // extreme scales
    let bbox = Aabb::of_points(xv, ndims);
    let h = bbox.min_extent(ndims);
    let tol = cfg.rel_tol * h;

    let mut shape_v = vec![0.0; n_nodes];
    let mut dshape_v = vec![0.0; n_nodes * ndims];
    let mut grad = vec![0.0; ndims * ndims];
    let mut ginv = vec![0.0; ndims * ndims];

    // Starting location: element center
    let mut loc = [0.0f64; 3];
    let mut norm = 1.0f64;
    let mut norm_prev = 2.0f64;
    let mut iter = 0usize;

    while norm > tol && iter < cfg.iter_max {
        shape(loc, ndims, &mut shape_v)?;
        dshape(loc, ndims, &mut dshape_v)?;

        let mut dx = [0.0f64; 3];
        dx[..ndims].copy_from_slice(&target[..ndims]);
        grad.iter_mut().for_each(|g| *g = 0.0);

        for n in 0..n_nodes {
            for i in 0..ndims {
                for j in 0..ndims {
                    grad[i * ndims + j] += xv[n * ndims + i] * dshape_v[n * ndims + j];
                }
                dx[i] -= shape_v[n] * xv[n * ndims + i];
            }
        }

        let det_j = determinant(&grad, ndims);
        if det_j == 0.0 {
            log::debug!("singular Jacobian in reference-coordinate solve; giving up");
            break;
        }
        adjoint_into(&grad, &mut ginv, ndims);

        let mut delta = [0.0f64; 3];
        for i in 0..ndims {
            for j in 0..ndims {
                delta[i] += ginv[i * ndims + j] * dx[j] / det_j;
            }
        }

        norm = dx[..ndims].iter().map(|v| v * v).sum::<f64>().sqrt();

        for i in 0..ndims {
            loc[i] = (loc[i] + delta[i]).clamp(-cfg.clamp, cfg.clamp);
        }

        if iter > 1 && norm > cfg.stall_factor * norm_prev {
            // Oscillating near a singular Jacobian; the iterate is as
            // good as it will get
            log::trace!("reference-coordinate solve stalled at |dx| = {norm:.3e}");
            break;
        }

        norm_prev = norm;
        iter += 1;
    }

    let max_coord = loc[..ndims].iter().fold(0.0f64, |m, v| m.max(v.abs()));
    Ok(RefLocation { rst: loc, inside: max_coord <= 1.0 + 1e-10 })
}
