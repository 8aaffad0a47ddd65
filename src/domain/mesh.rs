use super::material::Material;
use crate::math::Vec3;

/// Floats per packed mesh: five 16-byte blocks.
pub const MESH_STRIDE: usize = 20;

/// Metadata for one contiguous slice of the scene's flattened triangle list.
/// A mesh never stores its own `triangle_start`; the start index is derived
/// from insertion order at pack time so the slices can neither gap nor
/// overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mesh {
    pub triangle_count: u32,
    pub bounding_box: [f32; 6],
    pub material: Material,
}

impl Mesh {
    /// Packed wire form:
    /// `[start, count, 0, 0 | bbox min, 0 | bbox max, 0 | color, emission |
    ///  roughness, specular, 0, 0]`.
    /// `triangle_start` is supplied by the caller from the running sum over
    /// prior meshes.
    pub fn flat(&self, triangle_start: u32) -> [f32; MESH_STRIDE] {
        let b = &self.bounding_box;
        let m = &self.material;
        [
            triangle_start as f32,
            self.triangle_count as f32,
            0.0,
            0.0,
            b[0],
            b[1],
            b[2],
            0.0,
            b[3],
            b[4],
            b[5],
            0.0,
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

    /// Inverse of [`Mesh::flat`]; returns the derived start index alongside
    /// the reconstructed mesh.
    pub fn from_flat(flat: &[f32; MESH_STRIDE]) -> (u32, Self) {
        let mesh = Self {
            triangle_count: flat[1] as u32,
            bounding_box: [flat[4], flat[5], flat[6], flat[8], flat[9], flat[10]],
            material: Material::new(
                Vec3::new(flat[12], flat[13], flat[14]),
                flat[15],
                flat[16],
                flat[17],
            ),
        };
        (flat[0] as u32, mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_round_trips_through_flat_form() {
        let mesh = Mesh {
            triangle_count: 12,
            bounding_box: [-1.0, -2.0, -3.0, 1.0, 2.0, 3.0],
            material: Material::new(Vec3::new(0.2, 0.4, 0.6), 1.5, 0.3, 0.05),
        };
        let flat = mesh.flat(36);
        let (start, unpacked) = Mesh::from_flat(&flat);
        assert_eq!(start, 36);
        assert_eq!(unpacked, mesh);
    }

    #[test]
    fn mesh_flat_form_pads_header_and_bbox_blocks() {
        let mesh = Mesh {
            triangle_count: 2,
            bounding_box: [0.0; 6],
            material: Material::new(Vec3::splat(1.0), 0.0, 0.0, 0.0),
        };
        let flat = mesh.flat(0);
        assert_eq!(flat[2], 0.0);
        assert_eq!(flat[3], 0.0);
        assert_eq!(flat[7], 0.0);
        assert_eq!(flat[11], 0.0);
        assert_eq!(flat[18], 0.0);
        assert_eq!(flat[19], 0.0);
    }
}
