/// Static maxima the compute program is written against. The WGSL side
/// sizes its loops from the counts uniform, but driver limits on storage
/// binding sizes make unbounded scenes a fatal setup condition, so scenes
/// are checked against these before packing.
pub const GPU_MAX_SPHERES: usize = 64;
pub const GPU_MAX_MESHES: usize = 32;
pub const GPU_MAX_TRIANGLES: usize = 8192;

#[derive(Clone, Copy, Debug)]
pub struct RendererCapabilities {
    pub max_spheres: usize,
    pub max_meshes: usize,
    pub max_triangles: usize,
}

pub fn gpu_capabilities() -> RendererCapabilities {
    RendererCapabilities {
        max_spheres: GPU_MAX_SPHERES,
        max_meshes: GPU_MAX_MESHES,
        max_triangles: GPU_MAX_TRIANGLES,
    }
}
