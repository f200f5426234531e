pub mod bounds;
pub mod distance;

pub use bounds::{face_normal, Aabb};
pub use distance::{seg_seg_closest, tri_tri_distance, Separation};
