//! Shape-function evaluation for line, quad, and hex elements.
//!
//! Values and derivatives are written in gmsh node order. Quads walk the
//! shell recursion directly; hexes scatter tensor products through the
//! cached structured→gmsh map, except the 20-node serendipity hex which
//! uses its closed-form basis (its node ordering is specific to that
//! element and is not derivable from the tensor-product path).

use crate::basis::lagrange::{dlagrange, lagrange, uniform_nodes};
use crate::basis::ordering::{quad_side, structured_to_gmsh_hex};
use crate::error::Result;

/// Reference corner signs of the 20-node serendipity hex.
const SER_XI: [f64; 8] = [-1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0];
const SER_ETA: [f64; 8] = [-1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0];
const SER_MU: [f64; 8] = [-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];

/// Lagrange shape values on the uniform 1-D grid at `xi`.
///
/// The node count is taken from `out.len()`.
pub fn shape_line(xi: f64, out: &mut [f64]) {
    let xs = uniform_nodes(out.len());
    for (i, v) in out.iter_mut().enumerate() {
        *v = lagrange(&xs, xi, i);
    }
}

/// Shape values for a tensor-product Lagrange quad at `(r, s)`, written
/// in gmsh order. `out.len()` must be a perfect square.
pub fn shape_quad(rs: [f64; 2], out: &mut [f64]) -> Result<()> {
    let n_nodes = out.len();
    let n_side = quad_side(n_nodes)?;
    let xs = uniform_nodes(n_side);

    // Pre-compute the 1-D Lagrange rows once
    let lag_i: Vec<f64> = (0..n_side).map(|i| lagrange(&xs, rs[0], i)).collect();
    let lag_j: Vec<f64> = (0..n_side).map(|j| lagrange(&xs, rs[1], j)).collect();

    let n_levels = n_side / 2;

    let mut n_pts = 0;
    for i in 0..n_levels {
        // Corners
        let i2 = (n_side - 1) - i;
        out[n_pts] = lag_i[i] * lag_j[i];
        out[n_pts + 1] = lag_i[i2] * lag_j[i];
        out[n_pts + 2] = lag_i[i2] * lag_j[i2];
        out[n_pts + 3] = lag_i[i] * lag_j[i2];
        n_pts += 4;

        // Edges: bottom, right, top, left
        let n_edge = n_side - 2 * (i + 1);
        for j in 0..n_edge {
            out[n_pts + j] = lag_i[i + 1 + j] * lag_j[i];
            out[n_pts + n_edge + j] = lag_i[i2] * lag_j[i + 1 + j];
            out[n_pts + 2 * n_edge + j] = lag_i[i2 - 1 - j] * lag_j[i2];
            out[n_pts + 3 * n_edge + j] = lag_i[i] * lag_j[i2 - 1 - j];
        }
        n_pts += 4 * n_edge;
    }

    if n_side % 2 != 0 {
        out[n_nodes - 1] = lag_i[n_side / 2] * lag_j[n_side / 2];
    }

    Ok(())
}

/// Shape derivatives for a Lagrange quad at `(r, s)`.
///
/// `out` holds `[∂N_n/∂r, ∂N_n/∂s]` pairs per node in gmsh order, so its
/// length must be `2 · n_nodes`.
pub fn dshape_quad(rs: [f64; 2], out: &mut [f64]) -> Result<()> {
    let n_nodes = out.len() / 2;
    let n_side = quad_side(n_nodes)?;
    let xs = uniform_nodes(n_side);

    let lag_i: Vec<f64> = (0..n_side).map(|i| lagrange(&xs, rs[0], i)).collect();
    let lag_j: Vec<f64> = (0..n_side).map(|j| lagrange(&xs, rs[1], j)).collect();
    let dlag_i: Vec<f64> = (0..n_side).map(|i| dlagrange(&xs, rs[0], i)).collect();
    let dlag_j: Vec<f64> = (0..n_side).map(|j| dlagrange(&xs, rs[1], j)).collect();

    let mut write = |pos: usize, i: usize, j: usize| {
        out[2 * pos] = dlag_i[i] * lag_j[j];
        out[2 * pos + 1] = lag_i[i] * dlag_j[j];
    };

    let n_levels = n_side / 2;

    let mut n_pts = 0;
    for i in 0..n_levels {
        let i2 = (n_side - 1) - i;
        write(n_pts, i, i);
        write(n_pts + 1, i2, i);
        write(n_pts + 2, i2, i2);
        write(n_pts + 3, i, i2);
        n_pts += 4;

        let n_edge = n_side - 2 * (i + 1);
        for j in 0..n_edge {
            write(n_pts + j, i + 1 + j, i);
            write(n_pts + n_edge + j, i2, i + 1 + j);
            write(n_pts + 2 * n_edge + j, i2 - 1 - j, i2);
            write(n_pts + 3 * n_edge + j, i, i2 - 1 - j);
        }
        n_pts += 4 * n_edge;
    }

    if n_side % 2 != 0 {
        write(n_nodes - 1, n_side / 2, n_side / 2);
    }

    Ok(())
}

/// Shape values for a hex at `(r, s, t)`, written in gmsh order.
///
/// `out.len()` of 20 selects the quadratic serendipity basis; any other
/// length must be a perfect cube.
pub fn shape_hex(rst: [f64; 3], out: &mut [f64]) -> Result<()> {
    let n_nodes = out.len();
    let [xi, eta, mu] = rst;

    if n_nodes == 20 {
        // Corner nodes
        for i in 0..8 {
            out[i] = 0.125
                * (1.0 + xi * SER_XI[i])
                * (1.0 + eta * SER_ETA[i])
                * (1.0 + mu * SER_MU[i])
                * (xi * SER_XI[i] + eta * SER_ETA[i] + mu * SER_MU[i] - 2.0);
        }
        // Edge nodes, xi = 0
        out[8] = 0.25 * (1.0 - xi * xi) * (1.0 - eta) * (1.0 - mu);
        out[10] = 0.25 * (1.0 - xi * xi) * (1.0 + eta) * (1.0 - mu);
        out[16] = 0.25 * (1.0 - xi * xi) * (1.0 - eta) * (1.0 + mu);
        out[18] = 0.25 * (1.0 - xi * xi) * (1.0 + eta) * (1.0 + mu);
        // Edge nodes, eta = 0
        out[9] = 0.25 * (1.0 - eta * eta) * (1.0 + xi) * (1.0 - mu);
        out[11] = 0.25 * (1.0 - eta * eta) * (1.0 - xi) * (1.0 - mu);
        out[17] = 0.25 * (1.0 - eta * eta) * (1.0 + xi) * (1.0 + mu);
        out[19] = 0.25 * (1.0 - eta * eta) * (1.0 - xi) * (1.0 + mu);
        // Edge nodes, mu = 0
        out[12] = 0.25 * (1.0 - mu * mu) * (1.0 - xi) * (1.0 - eta);
        out[13] = 0.25 * (1.0 - mu * mu) * (1.0 + xi) * (1.0 - eta);
        out[14] = 0.25 * (1.0 - mu * mu) * (1.0 + xi) * (1.0 + eta);
        out[15] = 0.25 * (1.0 - mu * mu) * (1.0 - xi) * (1.0 + eta);

        return Ok(());
    }

    let ijk_to_gmsh = structured_to_gmsh_hex(n_nodes)?;
    let n_side = (n_nodes as f64).cbrt().round() as usize;
    let xs = uniform_nodes(n_side);

    let lag_i: Vec<f64> = (0..n_side).map(|i| lagrange(&xs, xi, i)).collect();
    let lag_j: Vec<f64> = (0..n_side).map(|j| lagrange(&xs, eta, j)).collect();
    let lag_k: Vec<f64> = (0..n_side).map(|k| lagrange(&xs, mu, k)).collect();

    for k in 0..n_side {
        for j in 0..n_side {
            for i in 0..n_side {
                out[ijk_to_gmsh[i + n_side * (j + n_side * k)]] =
                    lag_i[i] * lag_j[j] * lag_k[k];
            }
        }
    }

    Ok(())
}

/// Shape derivatives for a hex at `(r, s, t)`.
///
/// `out` holds `[∂N_n/∂r, ∂N_n/∂s, ∂N_n/∂t]` triples per node in gmsh
/// order, so its length must be `3 · n_nodes`.
pub fn dshape_hex(rst: [f64; 3], out: &mut [f64]) -> Result<()> {
    let n_nodes = out.len() / 3;
    let [xi, eta, mu] = rst;

    if n_nodes == 20 {
        // Corner nodes
        for i in 0..8 {
            let (sx, se, sm) = (SER_XI[i], SER_ETA[i], SER_MU[i]);
            out[3 * i] = 0.125
                * sx
                * (1.0 + eta * se)
                * (1.0 + mu * sm)
                * (2.0 * xi * sx + eta * se + mu * sm - 1.0);
            out[3 * i + 1] = 0.125
                * se
                * (1.0 + xi * sx)
                * (1.0 + mu * sm)
                * (xi * sx + 2.0 * eta * se + mu * sm - 1.0);
            out[3 * i + 2] = 0.125
                * sm
                * (1.0 + xi * sx)
                * (1.0 + eta * se)
                * (xi * sx + eta * se + 2.0 * mu * sm - 1.0);
        }
        // Edge nodes, xi = 0
        out[3 * 8] = -0.5 * xi * (1.0 - eta) * (1.0 - mu);
        out[3 * 8 + 1] = -0.25 * (1.0 - xi * xi) * (1.0 - mu);
        out[3 * 8 + 2] = -0.25 * (1.0 - xi * xi) * (1.0 - eta);
        out[3 * 10] = -0.5 * xi * (1.0 + eta) * (1.0 - mu);
        out[3 * 10 + 1] = 0.25 * (1.0 - xi * xi) * (1.0 - mu);
        out[3 * 10 + 2] = -0.25 * (1.0 - xi * xi) * (1.0 + eta);
        out[3 * 16] = -0.5 * xi * (1.0 - eta) * (1.0 + mu);
        out[3 * 16 + 1] = -0.25 * (1.0 - xi * xi) * (1.0 + mu);
        out[3 * 16 + 2] = 0.25 * (1.0 - xi * xi) * (1.0 - eta);
        out[3 * 18] = -0.5 * xi * (1.0 + eta) * (1.0 + mu);
        out[3 * 18 + 1] = 0.25 * (1.0 - xi * xi) * (1.0 + mu);
        out[3 * 18 + 2] = 0.25 * (1.0 - xi * xi) * (1.0 + eta);
        // Edge nodes, eta = 0
        out[3 * 9 + 1] = -0.5 * eta * (1.0 + xi) * (1.0 - mu);
        out[3 * 9] = 0.25 * (1.0 - eta * eta) * (1.0 - mu);
        out[3 * 9 + 2] = -0.25 * (1.0 - eta * eta) * (1.0 + xi);
        out[3 * 11 + 1] = -0.5 * eta * (1.0 - xi) * (1.0 - mu);
        out[3 * 11] = -0.25 * (1.0 - eta * eta) * (1.0 - mu);
        out[3 * 11 + 2] = -0.25 * (1.0 - eta * eta) * (1.0 - xi);
        out[3 * 17 + 1] = -0.5 * eta * (1.0 + xi) * (1.0 + mu);
        out[3 * 17] = 0.25 * (1.0 - eta * eta) * (1.0 + mu);
        out[3 * 17 + 2] = 0.25 * (1.0 - eta * eta) * (1.0 + xi);
        out[3 * 19 + 1] = -0.5 * eta * (1.0 - xi) * (1.0 + mu);
        out[3 * 19] = -0.25 * (1.0 - eta * eta) * (1.0 + mu);
        out[3 * 19 + 2] = 0.25 * (1.0 - eta * eta) * (1.0 - xi);
        // Edge nodes, mu = 0
        out[3 * 12 + 2] = -0.5 * mu * (1.0 - xi) * (1.0 - eta);
        out[3 * 12] = -0.25 * (1.0 - mu * mu) * (1.0 - eta);
        out[3 * 12 + 1] = -0.25 * (1.0 - mu * mu) * (1.0 - xi);
        out[3 * 13 + 2] = -0.5 * mu * (1.0 + xi) * (1.0 - eta);
        out[3 * 13] = 0.25 * (1.0 - mu * mu) * (1.0 - eta);
        out[3 * 13 + 1] = -0.25 * (1.0 - mu * mu) * (1.0 + xi);
        out[3 * 14 + 2] = -0.5 * mu * (1.0 + xi) * (1.0 + eta);
        out[3 * 14] = 0.25 * (1.0 - mu * mu) * (1.0 + eta);
        out[3 * 14 + 1] = 0.25 * (1.0 - mu * mu) * (1.0 + xi);
        out[3 * 15 + 2] = -0.5 * mu * (1.0 - xi) * (1.0 + eta);
        out[3 * 15] = -0.25 * (1.0 - mu * mu) * (1.0 + eta);
        out[3 * 15 + 1] = 0.25 * (1.0 - mu * mu) * (1.0 - xi);

        return Ok(());
    }

    let ijk_to_gmsh = structured_to_gmsh_hex(n_nodes)?;
    let n_side = (n_nodes as f64).cbrt().round() as usize;
    let xs = uniform_nodes(n_side);

    let lag_i: Vec<f64> = (0..n_side).map(|i| lagrange(&xs, xi, i)).collect();
    let lag_j: Vec<f64> = (0..n_side).map(|j| lagrange(&xs, eta, j)).collect();
    let lag_k: Vec<f64> = (0..n_side).map(|k| lagrange(&xs, mu, k)).collect();
    let dlag_i: Vec<f64> = (0..n_side).map(|i| dlagrange(&xs, xi, i)).collect();
    let dlag_j: Vec<f64> = (0..n_side).map(|j| dlagrange(&xs, eta, j)).collect();
    let dlag_k: Vec<f64> = (0..n_side).map(|k| dlagrange(&xs, mu, k)).collect();

    for k in 0..n_side {
        for j in 0..n_side {
            for i in 0..n_side {
                let pt = ijk_to_gmsh[i + n_side * (j + n_side * k)];
                out[3 * pt] = dlag_i[i] * lag_j[j] * lag_k[k];
                out[3 * pt + 1] = lag_i[i] * dlag_j[j] * lag_k[k];
                out[3 * pt + 2] = lag_i[i] * lag_j[j] * dlag_k[k];
            }
        }
    }

    Ok(())
}

/// Dispatch shape evaluation by dimensionality (2 → quad, 3 → hex).
pub fn shape(rst: [f64; 3], ndims: usize, out: &mut [f64]) -> Result<()> {
    if ndims == 2 {
        shape_quad([rst[0], rst[1]], out)
    } else {
        shape_hex(rst, out)
    }
}

/// Dispatch derivative evaluation by dimensionality (2 → quad, 3 → hex).
pub fn dshape(rst: [f64; 3], ndims: usize, out: &mut [f64]) -> Result<()> {
    if ndims == 2 {
        dshape_quad([rst[0], rst[1]], out)
    } else {
        dshape_hex(rst, out)
    }
}
