//! Direct-cut classification of mesh elements against cutting surfaces.

pub mod classifier;
pub mod search;

pub use classifier::{classify_cells, classify_cells_serial, classify_element, CellCut};
pub use search::{
    constraint_box, intersection_check, nelder_mead_constrained, regular_simplex, NmResult,
};

/// Classification of one element against a cutting surface.
///
/// The numeric values are a contract with the host solver and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CutFlag {
    /// Not yet classified.
    Unassigned = 0,
    /// Element lies on the outer side of the cutting surface and stays
    /// active.
    Normal = 1,
    /// Element is hidden by the cutting surface and should be blanked.
    Hole = 2,
    /// Element intersects the cutting surface.
    Cut = 3,
}

/// Orientation convention of a cutting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CutType {
    /// Solid-wall surface: stored facet normals point into the body and
    /// are flipped before use.
    Wall = 0,
    /// Overset outer boundary: facet normals are used as stored.
    Overset = 1,
}

impl CutType {
    pub(crate) fn flips_normal(self) -> bool {
        matches!(self, CutType::Wall)
    }
}
