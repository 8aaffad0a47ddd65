use crate::math::{Aabb, Mat4};

use super::material::Material;
use super::mesh::{Mesh, MESH_STRIDE};
use super::primitive::{Sphere, Triangle, SPHERE_STRIDE, TRIANGLE_STRIDE};

/// Counts handed to the compute program. They must exactly match the packed
/// buffer lengths; a mismatch is a programming error, not a runtime
/// condition (see `render::validation`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneCounts {
    pub sphere_count: u32,
    pub mesh_count: u32,
    pub triangle_count: u32,
}

/// Ordered spheres, one flattened ordered triangle list, and ordered meshes
/// referencing contiguous slices of that list, plus one affine transform
/// applied to the whole scene at shading time.
///
/// Meshes can only be added through [`Scene::push_mesh`], which appends the
/// mesh's triangles to the global list in insertion order, so the layout
/// invariant (each mesh's start equals the running sum of prior counts)
/// holds by construction.
#[derive(Clone, Debug)]
pub struct Scene {
    pub id: &'static str,
    pub spheres: Vec<Sphere>,
    pub transform: Mat4,
    triangles: Vec<Triangle>,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            spheres: Vec::new(),
            transform: Mat4::IDENTITY,
            triangles: Vec::new(),
            meshes: Vec::new(),
        }
    }

    pub fn push_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Appends a mesh and its triangles. The bounding box is derived from
    /// the triangle vertices; an empty triangle list is rejected because it
    /// would produce a degenerate bounding volume.
    pub fn push_mesh(&mut self, triangles: Vec<Triangle>, material: Material) -> Result<(), String> {
        if triangles.is_empty() {
            return Err(format!("scene '{}': mesh must contain at least one triangle", self.id));
        }
        let mut aabb = Aabb::empty();
        for triangle in &triangles {
            for vertex in triangle.vertices() {
                aabb.extend(vertex);
            }
        }
        self.meshes.push(Mesh {
            triangle_count: triangles.len() as u32,
            bounding_box: aabb.to_array(),
            material,
        });
        self.triangles.extend(triangles);
        Ok(())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Derived start index per mesh: the running sum of prior meshes'
    /// triangle counts, in insertion order. Read-only view, never settable.
    pub fn triangle_starts(&self) -> Vec<u32> {
        let mut starts = Vec::with_capacity(self.meshes.len());
        let mut running = 0u32;
        for mesh in &self.meshes {
            starts.push(running);
            running += mesh.triangle_count;
        }
        starts
    }

    pub fn counts(&self) -> SceneCounts {
        SceneCounts {
            sphere_count: self.spheres.len() as u32,
            mesh_count: self.meshes.len() as u32,
            triangle_count: self.triangles.len() as u32,
        }
    }

    pub fn flat_spheres(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.spheres.len() * SPHERE_STRIDE);
        for sphere in &self.spheres {
            out.extend_from_slice(&sphere.flat());
        }
        out
    }

    pub fn flat_triangles(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * TRIANGLE_STRIDE);
        for triangle in &self.triangles {
            out.extend_from_slice(&triangle.flat());
        }
        out
    }

    pub fn flat_meshes(&self) -> Vec<f32> {
        let starts = self.triangle_starts();
        let mut out = Vec::with_capacity(self.meshes.len() * MESH_STRIDE);
        for (mesh, start) in self.meshes.iter().zip(starts) {
            out.extend_from_slice(&mesh.flat(start));
        }
        out
    }
}
