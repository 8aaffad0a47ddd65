use crate::math::Vec3;

use super::material::Material;

/// Floats per packed sphere: three 16-byte blocks.
pub const SPHERE_STRIDE: usize = 12;
/// Floats per packed triangle: three 16-byte blocks, one pad lane per vertex.
pub const TRIANGLE_STRIDE: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Packed wire form consumed by the compute program. The block layout is
    /// a bit-exact contract with the shader and must not change without
    /// changing the WGSL side:
    /// `[center.xyz, radius | color.rgb, emission | roughness, specular, 0, 0]`.
    pub fn flat(&self) -> [f32; SPHERE_STRIDE] {
        let m = &self.material;
        [
            self.center.x,
            self.center.y,
            self.center.z,
            self.radius,
            m.color.x,
            m.color.y,
            m.color.z,
            m.emission,
            m.roughness,
            m.specular_probability,
            0.0,
            0.0,
        ]
    }

    pub fn from_flat(flat: &[f32; SPHERE_STRIDE]) -> Self {
        Self {
            center: Vec3::new(flat[0], flat[1], flat[2]),
            radius: flat[3],
            material: Material::new(Vec3::new(flat[4], flat[5], flat[6]), flat[7], flat[8], flat[9]),
        }
    }
}

/// Leaf of a mesh. Carries no material of its own: triangles inherit the
/// material of the mesh that owns them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub const fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// `[v0, 0 | v1, 0 | v2, 0]` -- pads satisfy vec4 alignment in the shader.
    pub fn flat(&self) -> [f32; TRIANGLE_STRIDE] {
        [
            self.v0.x, self.v0.y, self.v0.z, 0.0, self.v1.x, self.v1.y, self.v1.z, 0.0, self.v2.x,
            self.v2.y, self.v2.z, 0.0,
        ]
    }

    pub fn from_flat(flat: &[f32; TRIANGLE_STRIDE]) -> Self {
        Self {
            v0: Vec3::new(flat[0], flat[1], flat[2]),
            v1: Vec3::new(flat[4], flat[5], flat[6]),
            v2: Vec3::new(flat[8], flat[9], flat[10]),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_flat_form_matches_wire_contract() {
        let sphere = Sphere {
            center: Vec3::new(1.0, 2.0, 3.0),
            radius: 4.0,
            material: Material::new(Vec3::new(1.0, 0.0, 0.0), 0.0, 0.5, 0.2),
        };
        assert_eq!(
            sphere.flat(),
            [1.0, 2.0, 3.0, 4.0, 1.0, 0.0, 0.0, 0.0, 0.5, 0.2, 0.0, 0.0]
        );
    }

    #[test]
    fn sphere_round_trips_through_flat_form() {
        let sphere = Sphere {
            center: Vec3::new(-2.5, 0.0, 7.25),
            radius: 1.5,
            material: Material::new(Vec3::new(0.1, 0.9, 0.3), 2.0, 0.25, 0.75),
        };
        assert_eq!(Sphere::from_flat(&sphere.flat()), sphere);
    }

    #[test]
    fn triangle_flat_form_pads_each_vertex_block() {
        let triangle = Triangle::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        let flat = triangle.flat();
        assert_eq!(flat[3], 0.0);
        assert_eq!(flat[7], 0.0);
        assert_eq!(flat[11], 0.0);
        assert_eq!(Triangle::from_flat(&flat), triangle);
    }
}
