//! Reference→physical coordinate mapping through the shape basis.

use nalgebra::Point3;

use crate::basis::shape::{shape, shape_line, shape_quad};
use crate::error::Result;

/// Physical position of the reference point `rst` within the element
/// whose vertices are `xv` (row-major `nNodes × ndims`).
pub fn physical_position(xv: &[f64], ndims: usize, rst: [f64; 3]) -> Result<Point3<f64>> {
    let n_nodes = xv.len() / ndims;
    let mut sh = vec![0.0; n_nodes];
    shape(rst, ndims, &mut sh)?;

    let mut p = [0.0f64; 3];
    for (n, &s) in sh.iter().enumerate() {
        for i in 0..ndims {
            p[i] += s * xv[n * ndims + i];
        }
    }
    Ok(Point3::new(p[0], p[1], p[2]))
}

/// Physical position of a parametric point on a cutting facet: a line
/// facet in 2-D (one parameter), a quad facet in 3-D (two parameters).
pub fn facet_position(fxv: &[f64], ndims: usize, uv: &[f64]) -> Result<Point3<f64>> {
    let nfv = fxv.len() / ndims;
    let mut sh = vec![0.0; nfv];

    if ndims == 2 {
        shape_line(uv[0], &mut sh);
    } else {
        shape_quad([uv[0], uv[1]], &mut sh)?;
    }

    let mut p = [0.0f64; 3];
    for (n, &s) in sh.iter().enumerate() {
        for i in 0..ndims {
            p[i] += s * fxv[n * ndims + i];
        }
    }
    Ok(Point3::new(p[0], p[1], p[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_of_unit_cube() {
        let xv = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, //
            1.0, 0.0, 1.0, //
            1.0, 1.0, 1.0, //
            0.0, 1.0, 1.0,
        ];
        let p = physical_position(&xv, 3, [0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-14);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-14);
        assert_relative_eq!(p.z, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_facet_midpoint() {
        // Planar quad facet spanning [0,1]² at z = 2
        let fxv = [
            0.0, 0.0, 2.0, //
            1.0, 0.0, 2.0, //
            1.0, 1.0, 2.0, //
            0.0, 1.0, 2.0,
        ];
        let p = facet_position(&fxv, 3, &[0.0, 0.0]).unwrap();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-14);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-14);
        assert_relative_eq!(p.z, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_line_facet() {
        let fxv = [0.0, 0.0, 2.0, 1.0];
        let p = facet_position(&fxv, 2, &[0.0]).unwrap();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-14);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-14);
    }
}
