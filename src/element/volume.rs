//! Volume (or area) of a curved element by Gauss–Legendre quadrature.

use crate::basis::ordering::{hex_side, quad_side};
use crate::basis::shape::dshape;
use crate::element::quadrature::GaussLegendre;
use crate::error::{Error, Result};
use crate::linalg::{det2, det3};

/// Integrate the Jacobian determinant of the reference→physical map over
/// the reference cube/square.
///
/// A negative determinant at any quadrature point means the element is
/// tangled or inverted and is reported as an error.
pub fn compute_volume(xv: &[f64], ndims: usize) -> Result<f64> {
    let n_nodes = xv.len() / ndims;

    // Points per direction at the element's own order; the serendipity
    // hex integrates on the 2-point rule like its 8-node parent
    let n1d = if ndims == 2 {
        quad_side(n_nodes)?
    } else if n_nodes == 20 {
        2
    } else {
        hex_side(n_nodes)?
    };

    let rule = GaussLegendre::new(n1d)?;
    let mut dshape_v = vec![0.0; n_nodes * ndims];
    let mut jaco = vec![0.0; ndims * ndims];

    let mut vol = 0.0;
    let mut spt = 0;

    let mut qpts: Vec<([f64; 3], f64)> = Vec::with_capacity(rule.num_points().pow(ndims as u32));
    if ndims == 2 {
        for (j, &wj) in rule.weights.iter().enumerate() {
            for (i, &wi) in rule.weights.iter().enumerate() {
                qpts.push(([rule.points[i], rule.points[j], 0.0], wi * wj));
            }
        }
    } else {
        for (k, &wk) in rule.weights.iter().enumerate() {
            for (j, &wj) in rule.weights.iter().enumerate() {
                for (i, &wi) in rule.weights.iter().enumerate() {
                    qpts.push((
                        [rule.points[i], rule.points[j], rule.points[k]],
                        wi * wj * wk,
                    ));
                }
            }
        }
    }

    for (rst, weight) in qpts {
        dshape(rst, ndims, &mut dshape_v)?;

        jaco.iter_mut().for_each(|v| *v = 0.0);
        for n in 0..n_nodes {
            for d1 in 0..ndims {
                for d2 in 0..ndims {
                    jaco[d1 * ndims + d2] += dshape_v[n * ndims + d2] * xv[n * ndims + d1];
                }
            }
        }

        let det_j = if ndims == 2 { det2(&jaco) } else { det3(&jaco) };
        if det_j < 0.0 {
            return Err(Error::NegativeJacobian { det: det_j, point: spt });
        }

        vol += det_j * weight;
        spt += 1;
    }

    Ok(vol)
}
