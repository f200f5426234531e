pub mod position;
pub mod quadrature;
pub mod refloc;
pub mod volume;

pub use position::{facet_position, physical_position};
pub use quadrature::GaussLegendre;
pub use refloc::{ref_loc_newton, ref_loc_newton_cfg, RefLocation};
pub use volume::compute_volume;
