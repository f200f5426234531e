//! Node-ordering maps between the structured (i,j,k) layout and the
//! gmsh recursive layout (corners, then edges, then faces, then interior).
//!
//! The gmsh layout is built shell by shell: at recursion level `i`
//! (counting from the outermost shell inward) the level's corner nodes
//! are emitted first, then its edge nodes, then — for hexes — the six
//! faces each as a quad recursion, and finally a single center node when
//! the side length is odd.
//!
//! Both directions are permutations of `{0, …, n−1}` and pure functions
//! of the node count, so the inverse maps are memoized process-wide.
//! The cache is write-once per node count; a duplicate compute on a
//! concurrent miss is benign because both results are identical.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

static GMSH_MAPS_QUAD: Lazy<RwLock<HashMap<usize, Arc<Vec<usize>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));
static GMSH_MAPS_HEX: Lazy<RwLock<HashMap<usize, Arc<Vec<usize>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Integer side length of a quad with `n_nodes` nodes, or an error if
/// `n_nodes` is not a perfect square.
pub(crate) fn quad_side(n_nodes: usize) -> Result<usize> {
    let n_side = (n_nodes as f64).sqrt().round() as usize;
    if n_side * n_side != n_nodes || n_side < 2 {
        return Err(Error::ShapeOrderMismatch { kind: "quad", n_nodes });
    }
    Ok(n_side)
}

/// Integer side length of a hex with `n_nodes` nodes, or an error if
/// `n_nodes` is not a perfect cube.
pub(crate) fn hex_side(n_nodes: usize) -> Result<usize> {
    let n_side = (n_nodes as f64).cbrt().round() as usize;
    if n_side * n_side * n_side != n_nodes || n_side < 2 {
        return Err(Error::ShapeOrderMismatch { kind: "hex", n_nodes });
    }
    Ok(n_side)
}

/// Map from gmsh node position to structured index `i + n·j` for a quad.
///
/// The 8-node serendipity quad is a fixed permutation; all other node
/// counts must be perfect squares.
pub fn gmsh_to_structured_quad(n_nodes: usize) -> Result<Vec<usize>> {
    // 8-node serendipity quad: fixed permutation
    if n_nodes == 8 {
        return Ok(vec![0, 2, 7, 5, 1, 3, 4, 6]);
    }

    let n_side = quad_side(n_nodes)?;
    let mut gmsh_to_ijk = vec![0usize; n_nodes];

    let n_levels = n_side / 2;

    let mut node = 0;
    for i in 0..n_levels {
        // Corners
        let i2 = (n_side - 1) - i;
        gmsh_to_ijk[node] = i + n_side * i;
        gmsh_to_ijk[node + 1] = i2 + n_side * i;
        gmsh_to_ijk[node + 2] = i2 + n_side * i2;
        gmsh_to_ijk[node + 3] = i + n_side * i2;
        node += 4;

        // Edges: bottom, right, top, left
        let n_edge = n_side - 2 * (i + 1);
        for j in 0..n_edge {
            gmsh_to_ijk[node + j] = i + 1 + j + n_side * i;
            gmsh_to_ijk[node + n_edge + j] = i2 + n_side * (i + 1 + j);
            gmsh_to_ijk[node + 2 * n_edge + j] = i2 - 1 - j + n_side * i2;
            gmsh_to_ijk[node + 3 * n_edge + j] = i + n_side * (i2 - 1 - j);
        }
        node += 4 * n_edge;
    }

    // Center node in the odd case
    if n_side % 2 != 0 {
        gmsh_to_ijk[n_nodes - 1] = n_side / 2 + n_side * (n_side / 2);
    }

    Ok(gmsh_to_ijk)
}

/// Map from gmsh node position to structured index `i + n·(j + n·k)` for
/// a hex of arbitrary order.
///
/// The 20-node serendipity hex is not representable here; the shape
/// engine handles it with closed-form basis functions instead.
pub fn gmsh_to_structured_hex(n_nodes: usize) -> Result<Vec<usize>> {
    let n_side = hex_side(n_nodes)?;
    let mut gmsh_to_ijk = vec![0usize; n_nodes];

    let ns = n_side;
    let n_levels = ns / 2;
    let is_odd = ns % 2 != 0;

    // Recursion for all high-order Lagrange elements:
    // 8 corners, each edge's points, interior face points, volume points
    let mut n_pts = 0;
    for i in 0..n_levels {
        // Corners
        let i2 = (ns - 1) - i;
        gmsh_to_ijk[n_pts] = i + ns * (i + ns * i);
        gmsh_to_ijk[n_pts + 1] = i2 + ns * (i + ns * i);
        gmsh_to_ijk[n_pts + 2] = i2 + ns * (i2 + ns * i);
        gmsh_to_ijk[n_pts + 3] = i + ns * (i2 + ns * i);
        gmsh_to_ijk[n_pts + 4] = i + ns * (i + ns * i2);
        gmsh_to_ijk[n_pts + 5] = i2 + ns * (i + ns * i2);
        gmsh_to_ijk[n_pts + 6] = i2 + ns * (i2 + ns * i2);
        gmsh_to_ijk[n_pts + 7] = i + ns * (i2 + ns * i2);
        n_pts += 8;

        // Edges
        let ns2 = ns - 2 * (i + 1);
        for j in 0..ns2 {
            // Edges around 'bottom'
            gmsh_to_ijk[n_pts + j] = i + 1 + j + ns * (i + ns * i);
            gmsh_to_ijk[n_pts + 3 * ns2 + j] = i2 + ns * (i + 1 + j + ns * i);
            gmsh_to_ijk[n_pts + 5 * ns2 + j] = i2 - 1 - j + ns * (i2 + ns * i);
            gmsh_to_ijk[n_pts + ns2 + j] = i + ns * (i + 1 + j + ns * i);

            // 'Vertical' edges
            gmsh_to_ijk[n_pts + 2 * ns2 + j] = i + ns * (i + ns * (i + 1 + j));
            gmsh_to_ijk[n_pts + 4 * ns2 + j] = i2 + ns * (i + ns * (i + 1 + j));
            gmsh_to_ijk[n_pts + 6 * ns2 + j] = i2 + ns * (i2 + ns * (i + 1 + j));
            gmsh_to_ijk[n_pts + 7 * ns2 + j] = i + ns * (i2 + ns * (i + 1 + j));

            // Edges around 'top'
            gmsh_to_ijk[n_pts + 8 * ns2 + j] = i + 1 + j + ns * (i + ns * i2);
            gmsh_to_ijk[n_pts + 10 * ns2 + j] = i2 + ns * (i + 1 + j + ns * i2);
            gmsh_to_ijk[n_pts + 11 * ns2 + j] = i2 - 1 - j + ns * (i2 + ns * i2);
            gmsh_to_ijk[n_pts + 9 * ns2 + j] = i + ns * (i + 1 + j + ns * i2);
        }
        n_pts += 12 * ns2;

        // --- Faces: reuse the quad recursion on each of the six faces ---

        let n_levels2 = ns2 / 2;
        let is_odd2 = ns2 % 2 != 0;

        // Bottom face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = j + ns * (j + ns * i);
            gmsh_to_ijk[n_pts + 1] = j + ns * (j2 + ns * i);
            gmsh_to_ijk[n_pts + 2] = j2 + ns * (j2 + ns * i);
            gmsh_to_ijk[n_pts + 3] = j2 + ns * (j + ns * i);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = j + ns * (j + 1 + k + ns * i);
                gmsh_to_ijk[n_pts + ns3 + k] = j + 1 + k + ns * (j2 + ns * i);
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = j2 + ns * (j2 - 1 - k + ns * i);
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = j2 - 1 - k + ns * (j + ns * i);
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = ns / 2 + ns * (ns / 2) + ns * ns * i;
            n_pts += 1;
        }

        // Front face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = j + ns * (i + ns * j);
            gmsh_to_ijk[n_pts + 1] = j2 + ns * (i + ns * j);
            gmsh_to_ijk[n_pts + 2] = j2 + ns * (i + ns * j2);
            gmsh_to_ijk[n_pts + 3] = j + ns * (i + ns * j2);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = j + 1 + k + ns * (i + ns * j);
                gmsh_to_ijk[n_pts + ns3 + k] = j2 + ns * (i + ns * (j + 1 + k));
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = j2 - 1 - k + ns * (i + ns * j2);
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = j + ns * (i + ns * (j2 - 1 - k));
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = ns / 2 + ns * (i + ns * (ns / 2));
            n_pts += 1;
        }

        // Left face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = i + ns * (j + ns * j);
            gmsh_to_ijk[n_pts + 1] = i + ns * (j + ns * j2);
            gmsh_to_ijk[n_pts + 2] = i + ns * (j2 + ns * j2);
            gmsh_to_ijk[n_pts + 3] = i + ns * (j2 + ns * j);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = i + ns * (j + ns * (j + 1 + k));
                gmsh_to_ijk[n_pts + ns3 + k] = i + ns * (j + 1 + k + ns * j2);
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = i + ns * (j2 + ns * (j2 - 1 - k));
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = i + ns * (j2 - 1 - k + ns * j);
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = i + ns * (ns / 2 + ns * (ns / 2));
            n_pts += 1;
        }

        // Right face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = i2 + ns * (j + ns * j);
            gmsh_to_ijk[n_pts + 1] = i2 + ns * (j2 + ns * j);
            gmsh_to_ijk[n_pts + 2] = i2 + ns * (j2 + ns * j2);
            gmsh_to_ijk[n_pts + 3] = i2 + ns * (j + ns * j2);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = i2 + ns * (j + 1 + k + ns * j);
                gmsh_to_ijk[n_pts + ns3 + k] = i2 + ns * (j2 + ns * (j + 1 + k));
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = i2 + ns * (j2 - 1 - k + ns * j2);
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = i2 + ns * (j + ns * (j2 - 1 - k));
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = i2 + ns * (ns / 2 + ns * (ns / 2));
            n_pts += 1;
        }

        // Back face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = j2 + ns * (i2 + ns * j);
            gmsh_to_ijk[n_pts + 1] = j + ns * (i2 + ns * j);
            gmsh_to_ijk[n_pts + 2] = j + ns * (i2 + ns * j2);
            gmsh_to_ijk[n_pts + 3] = j2 + ns * (i2 + ns * j2);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = j2 - 1 - k + ns * (i2 + ns * j);
                gmsh_to_ijk[n_pts + ns3 + k] = j + ns * (i2 + ns * (j + 1 + k));
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = j + 1 + k + ns * (i2 + ns * j2);
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = j2 + ns * (i2 + ns * (j2 - 1 - k));
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = ns / 2 + ns * (i2 + ns * (ns / 2));
            n_pts += 1;
        }

        // Top face
        for j0 in 0..n_levels2 {
            let j = j0 + i + 1;
            let j2 = i + 1 + (ns2 - 1) - j0;
            gmsh_to_ijk[n_pts] = j + ns * (j + ns * i2);
            gmsh_to_ijk[n_pts + 1] = j2 + ns * (j + ns * i2);
            gmsh_to_ijk[n_pts + 2] = j2 + ns * (j2 + ns * i2);
            gmsh_to_ijk[n_pts + 3] = j + ns * (j2 + ns * i2);
            n_pts += 4;

            let ns3 = ns2 - 2 * (j0 + 1);
            for k in 0..ns3 {
                gmsh_to_ijk[n_pts + k] = j + 1 + k + ns * (j + ns * i2);
                gmsh_to_ijk[n_pts + ns3 + k] = j2 + ns * (j + 1 + k + ns * i2);
                gmsh_to_ijk[n_pts + 2 * ns3 + k] = j2 - 1 - k + ns * (j2 + ns * i2);
                gmsh_to_ijk[n_pts + 3 * ns3 + k] = j + ns * (j2 - 1 - k + ns * i2);
            }
            n_pts += 4 * ns3;
        }
        if is_odd2 {
            gmsh_to_ijk[n_pts] = ns / 2 + ns * (ns / 2 + ns * i2);
            n_pts += 1;
        }
    }

    // Volume center node for odd side lengths
    if is_odd {
        gmsh_to_ijk[n_nodes - 1] = ns / 2 + ns * (ns / 2 + ns * (ns / 2));
    }

    Ok(gmsh_to_ijk)
}

/// Position-to-position inverse of a permutation.
fn reverse_map(map: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; map.len()];
    for (pos, &idx) in map.iter().enumerate() {
        inv[idx] = pos;
    }
    inv
}

fn cached_inverse<F>(
    cache: &RwLock<HashMap<usize, Arc<Vec<usize>>>>,
    n_nodes: usize,
    forward: F,
) -> Result<Arc<Vec<usize>>>
where
    F: Fn(usize) -> Result<Vec<usize>>,
{
    if let Some(map) = cache.read().expect("ordering cache poisoned").get(&n_nodes) {
        return Ok(Arc::clone(map));
    }

    // Compute outside the lock; a concurrent duplicate compute is benign
    // since the permutation is a pure function of the node count.
    let inv = Arc::new(reverse_map(&forward(n_nodes)?));
    let mut guard = cache.write().expect("ordering cache poisoned");
    Ok(Arc::clone(guard.entry(n_nodes).or_insert(inv)))
}

/// Memoized map from structured index to gmsh node position for a quad.
pub fn structured_to_gmsh_quad(n_nodes: usize) -> Result<Arc<Vec<usize>>> {
    cached_inverse(&GMSH_MAPS_QUAD, n_nodes, gmsh_to_structured_quad)
}

/// Memoized map from structured index to gmsh node position for a hex.
pub fn structured_to_gmsh_hex(n_nodes: usize) -> Result<Arc<Vec<usize>>> {
    cached_inverse(&GMSH_MAPS_HEX, n_nodes, gmsh_to_structured_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_permutation(map: &[usize]) {
        let mut seen = vec![false; map.len()];
        for &idx in map {
            assert!(idx < map.len(), "index {} out of range", idx);
            assert!(!seen[idx], "index {} repeated", idx);
            seen[idx] = true;
        }
    }

    #[test]
    fn test_quad_maps_are_permutations() {
        for n_side in 2..=7usize {
            let map = gmsh_to_structured_quad(n_side * n_side).unwrap();
            assert_permutation(&map);
        }
        assert_permutation(&gmsh_to_structured_quad(8).unwrap());
    }

    #[test]
    fn test_hex_maps_are_permutations() {
        for n_side in 2..=6usize {
            let map = gmsh_to_structured_hex(n_side * n_side * n_side).unwrap();
            assert_permutation(&map);
        }
    }

    #[test]
    fn test_round_trip_is_identity() {
        for &n in &[4usize, 9, 16, 25, 36] {
            let fwd = gmsh_to_structured_quad(n).unwrap();
            let inv = structured_to_gmsh_quad(n).unwrap();
            for g in 0..n {
                assert_eq!(inv[fwd[g]], g);
            }
        }
        for &n in &[8usize, 27, 64, 125] {
            let fwd = gmsh_to_structured_hex(n).unwrap();
            let inv = structured_to_gmsh_hex(n).unwrap();
            for g in 0..n {
                assert_eq!(inv[fwd[g]], g);
            }
        }
    }

    #[test]
    fn test_linear_hex_corners() {
        // 8-node hex: gmsh corner order vs. lexicographic (i,j,k)
        let map = gmsh_to_structured_hex(8).unwrap();
        assert_eq!(map, vec![0, 1, 3, 2, 4, 5, 7, 6]);
    }

    #[test]
    fn test_serendipity_quad_permutation() {
        let map = gmsh_to_structured_quad(8).unwrap();
        assert_eq!(map, vec![0, 2, 7, 5, 1, 3, 4, 6]);
    }

    #[test]
    fn test_cubic_quad_shells() {
        // 4x4 quad: outer shell corners at structured 0, 3, 15, 12
        let map = gmsh_to_structured_quad(16).unwrap();
        assert_eq!(&map[0..4], &[0, 3, 15, 12]);
        // Inner shell (2x2) comes last
        assert_eq!(&map[12..16], &[5, 6, 10, 9]);
    }

    #[test]
    fn test_rejects_bad_counts() {
        assert!(gmsh_to_structured_quad(7).is_err());
        assert!(gmsh_to_structured_hex(20).is_err());
        assert!(gmsh_to_structured_hex(30).is_err());
    }

    #[test]
    fn test_cache_returns_same_map() {
        let a = structured_to_gmsh_hex(27).unwrap();
        let b = structured_to_gmsh_hex(27).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
