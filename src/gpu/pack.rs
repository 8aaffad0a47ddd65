use crate::domain::Scene;
use crate::render::RenderSettings;

/// Position of the time-varying `frame` uniform within
/// [`session_uniform_arrays`]. The frame driver rewrites this buffer every
/// step; every other buffer keeps its creation contents for the session.
pub const FRAME_UNIFORM_INDEX: usize = 1;

/// Ordered named uniform arrays for one session. The order is part of the
/// binding contract: slot `i` of the group layout binds array `i`.
pub fn session_uniform_arrays(
    settings: &RenderSettings,
    scene: &Scene,
) -> Vec<(&'static str, Vec<f32>)> {
    let counts = scene.counts();
    vec![
        (
            "resolution",
            vec![
                settings.width as f32,
                settings.height as f32,
                settings.rays_per_pixel as f32,
                0.0,
            ],
        ),
        ("frame", vec![0.0, settings.target_frames as f32, 0.0, 0.0]),
        (
            "scene_counts",
            vec![
                counts.sphere_count as f32,
                counts.mesh_count as f32,
                counts.triangle_count as f32,
                0.0,
            ],
        ),
        ("scene_transform", scene.transform.to_array().to_vec()),
    ]
}

/// Ordered named storage arrays for one session, same contract as the
/// uniforms: slot order is fixed at session start.
pub fn scene_storage_arrays(scene: &Scene) -> Vec<(&'static str, Vec<f32>)> {
    vec![
        ("spheres", scene.flat_spheres()),
        ("triangles", scene.flat_triangles()),
        ("meshes", scene.flat_meshes()),
    ]
}

/// A bind group cannot reference a zero-sized buffer, so an empty array is
/// uploaded as one zeroed 16-byte block. The counts uniform still says
/// zero, so the shader never reads the placeholder.
fn storage_upload(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        vec![0.0; 4]
    } else {
        values.to_vec()
    }
}

fn create_uploaded_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    values: &[f32],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of_val(values) as u64,
        usage,
        mapped_at_creation: false,
    });
    queue.write_buffer(&buffer, 0, bytemuck::cast_slice(values));
    buffer
}

/// One uniform buffer per named array, sized exactly to its byte length and
/// uploaded at creation. Buffers never share storage and are never resized;
/// only [`update_uniform`] may change their contents afterwards.
pub fn pack_uniforms(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    uniforms: &[(&str, Vec<f32>)],
) -> Vec<wgpu::Buffer> {
    uniforms
        .iter()
        .map(|(name, values)| {
            create_uploaded_buffer(
                device,
                queue,
                &format!("uniform-{name}"),
                values,
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            )
        })
        .collect()
}

/// Same semantics as [`pack_uniforms`] with GPU-side read-only-storage
/// access, for scene geometry too large for uniform-buffer limits.
pub fn pack_storage(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    arrays: &[(&str, Vec<f32>)],
) -> Vec<wgpu::Buffer> {
    arrays
        .iter()
        .map(|(name, values)| {
            create_uploaded_buffer(
                device,
                queue,
                &format!("storage-{name}"),
                &storage_upload(values),
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            )
        })
        .collect()
}

/// Partial overwrite of an existing buffer without reallocation; used once
/// per frame for the time-varying uniform.
pub fn update_uniform(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    byte_offset: u64,
    values: &[f32],
) {
    queue.write_buffer(buffer, byte_offset, bytemuck::cast_slice(values));
}
