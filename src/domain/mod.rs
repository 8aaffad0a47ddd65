pub mod material;
pub mod mesh;
pub mod presets;
pub mod primitive;
pub mod scene;

pub use material::Material;
pub use mesh::MESH_STRIDE;
pub use primitive::{Sphere, Triangle, SPHERE_STRIDE, TRIANGLE_STRIDE};
pub use scene::{Scene, SceneCounts};
