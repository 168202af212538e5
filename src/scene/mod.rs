//! Static scene content: rect area lights and the procedural meshes for
//! the floor, road, light panels and particle spheres.

mod lights;
pub mod mesh_gen;

pub use lights::{AreaLight, MAX_AREA_LIGHTS};
pub use mesh_gen::MeshData;
