//! Configuration management for assembly passes.
//!
//! Reads TOML configuration files and provides structured tunables for
//! the reference-coordinate solver and the direct-cut classifier. Every
//! default matches the committed kernel constants, so an empty file (or
//! no file at all) reproduces the stock behavior.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Top-level kernel configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub newton: NewtonConfig,
    pub cut: CutConfig,
}

/// Controls for the Newton reference-coordinate solver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Residual tolerance relative to the smallest element extent
    pub rel_tol: f64,
    /// Hard iteration cap
    pub iter_max: usize,
    /// Residual-reduction factor below which the iteration counts as
    /// stalled and exits early
    pub stall_factor: f64,
    /// Iterates are clamped to `[-clamp, clamp]` between steps
    pub clamp: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1e-10,
            iter_max: 20,
            stall_factor: 0.99,
            clamp: 1.01,
        }
    }
}

/// Controls for the direct-cut classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CutConfig {
    /// Facets whose bounding box is farther than this factor times the
    /// element's summed extents are skipped outright
    pub box_tol_factor: f64,
    /// Distance-tie window, as a fraction of the box tolerance
    pub tie_factor: f64,
    /// Contact threshold below which a facet cuts the element, as a
    /// fraction of the box tolerance
    pub contact_factor: f64,
    /// Element-surface subdivision order (defaults to the element's
    /// polynomial order)
    pub sorder: Option<usize>,
    /// Facet subdivision order (defaults to the facet's polynomial
    /// order)
    pub sorder_facet: Option<usize>,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            box_tol_factor: 1.0,
            tie_factor: 1e-3,
            contact_factor: 1e-8,
            sorder: None,
            sorder_facet: None,
        }
    }
}

impl AssemblyConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse config file: {e}")))
    }
}
