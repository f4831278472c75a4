pub mod primitives;

pub use primitives::{bone_primitive, primitives_for_active, skeleton_primitives, Primitive};
