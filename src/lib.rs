//! Geometric kernel for overset-grid assembly on high-order
//! unstructured meshes.
//!
//! Given several independently generated curvilinear meshes that overlap
//! in space, an assembler must decide, for every cell, which mesh is
//! authoritative: cells hidden behind another mesh's cutting surfaces
//! are blanked, cells intersecting a surface are flagged as cut, and the
//! rest stay active. This crate provides the geometric primitives that
//! drive those decisions: tensor-product Lagrange shape bases with gmsh
//! node ordering, a Newton reference-coordinate solver, triangle
//! distance kernels, and the direct-cut classifier itself. Parallel
//! exchange, spatial search trees, and solver callbacks live with the
//! host driver.

pub mod basis;
pub mod config;
pub mod cut;
pub mod element;
pub mod error;
pub mod geometry;
pub mod linalg;

pub use basis::{dshape_hex, dshape_quad, shape_hex, shape_line, shape_quad};
pub use config::{AssemblyConfig, CutConfig, NewtonConfig};
pub use cut::{
    classify_cells, classify_cells_serial, classify_element, intersection_check, CellCut,
    CutFlag, CutType,
};
pub use element::{
    compute_volume, facet_position, physical_position, ref_loc_newton, ref_loc_newton_cfg,
    GaussLegendre, RefLocation,
};
pub use error::{Error, Result};
pub use geometry::{face_normal, tri_tri_distance, Aabb, Separation};
