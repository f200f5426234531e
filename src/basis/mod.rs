pub mod lagrange;
pub mod ordering;
pub mod shape;

pub use lagrange::{dlagrange, lagrange, uniform_nodes};
pub use ordering::{
    gmsh_to_structured_hex, gmsh_to_structured_quad, structured_to_gmsh_hex,
    structured_to_gmsh_quad,
};
pub use shape::{dshape, dshape_hex, dshape_quad, shape, shape_hex, shape_line, shape_quad};
