//! Per-element direct-cut scan against a set of cutting facets.
//!
//! For each element the classifier walks every candidate facet,
//! rejecting on bounding boxes first, then sampling both surfaces into
//! triangles and querying the triangle–triangle distance kernel. The
//! nearest facet's outward normal decides whether the element sits on
//! the blanked or the active side; facets tying within the distance
//! window merge into a running normal average and re-vote.
//!
//! The element loop is embarrassingly parallel: every element reads the
//! same immutable inputs and writes only its own flag, so the rayon
//! version and the serial walk produce identical results. The averaged
//! normal tie-break is order-dependent in finite precision; feed facets
//! in a canonical order when bitwise reproducibility across runs
//! matters.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::basis::ordering::{hex_side, quad_side};
use crate::config::CutConfig;
use crate::cut::{CutFlag, CutType};
use crate::element::position::{facet_position, physical_position};
use crate::error::Result;
use crate::geometry::{face_normal, tri_tri_distance, Aabb};

/// Outcome of classifying one element.
#[derive(Debug, Clone, Copy)]
pub struct CellCut {
    pub flag: CutFlag,
    /// Distance to the winning facet (0 when cut, ∞ when no facet was
    /// seen at all).
    pub distance: f64,
    /// Averaged outward normal of the winning facet(s).
    pub normal: Vector3<f64>,
}

/// Reference coordinates of a point on face `face` of the hex, with
/// `(u, v)` the face-local parameters.
fn face_rst(face: usize, u: f64, v: f64) -> [f64; 3] {
    match face {
        0 => [u, v, -1.0],
        1 => [u, v, 1.0],
        2 => [u, -1.0, v],
        3 => [u, 1.0, v],
        4 => [-1.0, u, v],
        _ => [1.0, u, v],
    }
}

/// Sample the outer surface of a (possibly curved) hex as triangles:
/// six faces, `sorder²` sub-quads each, two triangles per sub-quad.
fn element_surface_tris(xv: &[f64], sorder: usize) -> Result<Vec<[Point3<f64>; 3]>> {
    let n1 = sorder + 1;
    let mut grid = vec![Point3::origin(); n1 * n1];
    let mut tris = Vec::with_capacity(6 * sorder * sorder * 2);

    for face in 0..6 {
        for j in 0..n1 {
            for i in 0..n1 {
                let u = -1.0 + 2.0 * i as f64 / sorder as f64;
                let v = -1.0 + 2.0 * j as f64 / sorder as f64;
                grid[i + n1 * j] = physical_position(xv, 3, face_rst(face, u, v))?;
            }
        }
        for j in 0..sorder {
            for i in 0..sorder {
                let p00 = grid[i + n1 * j];
                let p10 = grid[i + 1 + n1 * j];
                let p11 = grid[i + 1 + n1 * (j + 1)];
                let p01 = grid[i + n1 * (j + 1)];
                tris.push([p00, p10, p11]);
                tris.push([p00, p11, p01]);
            }
        }
    }

    Ok(tris)
}

/// Sample a (possibly curved) quad facet as `sorder²` sub-quads split
/// into triangles.
fn facet_surface_tris(fxv: &[f64], sorder: usize) -> Result<Vec<[Point3<f64>; 3]>> {
    let n1 = sorder + 1;
    let mut grid = vec![Point3::origin(); n1 * n1];
    let mut tris = Vec::with_capacity(sorder * sorder * 2);

    for j in 0..n1 {
        for i in 0..n1 {
            let u = -1.0 + 2.0 * i as f64 / sorder as f64;
            let v = -1.0 + 2.0 * j as f64 / sorder as f64;
            grid[i + n1 * j] = facet_position(fxv, 3, &[u, v])?;
        }
    }
    for j in 0..sorder {
        for i in 0..sorder {
            let p00 = grid[i + n1 * j];
            let p10 = grid[i + 1 + n1 * j];
            let p11 = grid[i + 1 + n1 * (j + 1)];
            let p01 = grid[i + n1 * (j + 1)];
            tris.push([p00, p10, p11]);
            tris.push([p00, p11, p01]);
        }
    }

    Ok(tris)
}

/// Classify a single element against `facets`, a row-major
/// `nCut × nfv × 3` array of cutting-facet vertices.
pub fn classify_element(
    xv: &[f64],
    facets: &[f64],
    nfv: usize,
    cut_type: CutType,
    cfg: &CutConfig,
) -> Result<CellCut> {
    let n_nodes = xv.len() / 3;
    let n_cut = facets.len() / (nfv * 3);

    let ebox = Aabb::of_points(xv, 3);
    let btol = cfg.box_tol_factor * ebox.extent_sum(3);
    let dtol = cfg.tie_factor * btol;
    let contact = cfg.contact_factor * btol;

    // Surface subdivision at the element's own order unless overridden
    let eorder = if n_nodes == 20 { 2 } else { hex_side(n_nodes)? - 1 };
    let sorder = cfg.sorder.unwrap_or(eorder).max(1);
    let forder = quad_side(nfv)? - 1;
    let sorder_f = cfg.sorder_facet.unwrap_or(forder).max(1);

    let etris = element_surface_tris(xv, sorder)?;

    let mut flag = CutFlag::Unassigned;
    let mut dist = f64::INFINITY;
    let mut normal = Vector3::zeros();
    let mut count = 0usize;

    // Nearest facet by box gap, kept for the last-resort fallback
    let mut nearest_gap = f64::INFINITY;
    let mut nearest_facet = None;

    for f in 0..n_cut {
        let fxv = &facets[f * nfv * 3..(f + 1) * nfv * 3];
        let fbox = Aabb::of_points(fxv, 3);

        let gap = ebox.gap(&fbox, 3);
        if gap < nearest_gap {
            nearest_gap = gap;
            nearest_facet = Some(f);
        }
        if gap > btol {
            continue;
        }

        // A cut element cannot be un-cut within one pass
        if flag == CutFlag::Cut {
            break;
        }

        let ftris = facet_surface_tris(fxv, sorder_f)?;

        let mut fmin = f64::INFINITY;
        let mut fvec = Vector3::zeros();
        for et in &etris {
            for ft in &ftris {
                let sep = tri_tri_distance(et, ft, contact);
                if sep.distance < fmin {
                    fmin = sep.distance;
                    fvec = sep.vector;
                }
            }
        }

        if fmin < contact {
            flag = CutFlag::Cut;
            dist = 0.0;
            continue;
        }

        let mut fnorm = face_normal(&fxv[..12], 3);
        if cut_type.flips_normal() {
            fnorm = -fnorm;
        }

        // Separation direction from the element toward the facet; an
        // outward facet normal opposing it points at the element, which
        // puts the element on the facet's inside
        let dir = fvec / fvec.norm();

        if flag == CutFlag::Unassigned || fmin < dist - dtol {
            // Clearly closer facet: restart the record
            dist = fmin;
            normal = fnorm;
            count = 1;
            flag = if normal.dot(&dir) < 0.0 { CutFlag::Hole } else { CutFlag::Normal };
        } else if (fmin - dist).abs() <= dtol {
            // Tied facet: merge and re-vote with the fresh average
            normal = (normal * count as f64 + fnorm) / (count as f64 + 1.0);
            count += 1;
            flag = if normal.dot(&dir) < 0.0 { CutFlag::Hole } else { CutFlag::Normal };
        }
        // Strictly farther facets are ignored
    }

    // Nothing was within the box tolerance: classify off the nearest
    // facet's centroid direction so every element still gets a side
    if flag == CutFlag::Unassigned && count == 0 {
        if let Some(f) = nearest_facet {
            log::debug!("no facet within box tolerance; using centroid fallback");
            let fxv = &facets[f * nfv * 3..(f + 1) * nfv * 3];
            let fbox = Aabb::of_points(fxv, 3);

            let mut fnorm = face_normal(&fxv[..12], 3);
            if cut_type.flips_normal() {
                fnorm = -fnorm;
            }

            let vec = fbox.center() - ebox.center();
            dist = vec.norm();
            normal = fnorm;
            flag = if normal.dot(&(vec / dist)) < 0.0 { CutFlag::Hole } else { CutFlag::Normal };
        }
    }

    Ok(CellCut { flag, distance: dist, normal })
}

/// Classify every element of `cells` (row-major `nCells × nNodes × 3`)
/// against the cutting facets, serially.
pub fn classify_cells_serial(
    cells: &[f64],
    n_nodes: usize,
    facets: &[f64],
    nfv: usize,
    cut_type: CutType,
    cfg: &CutConfig,
) -> Result<Vec<CutFlag>> {
    cells
        .chunks_exact(n_nodes * 3)
        .map(|xv| classify_element(xv, facets, nfv, cut_type, cfg).map(|c| c.flag))
        .collect()
}

/// Parallel version of [`classify_cells_serial`]; each rayon task owns
/// exactly one element, so the result is identical to the serial walk.
pub fn classify_cells(
    cells: &[f64],
    n_nodes: usize,
    facets: &[f64],
    nfv: usize,
    cut_type: CutType,
    cfg: &CutConfig,
) -> Result<Vec<CutFlag>> {
    cells
        .par_chunks_exact(n_nodes * 3)
        .map(|xv| classify_element(xv, facets, nfv, cut_type, cfg).map(|c| c.flag))
        .collect()
}
