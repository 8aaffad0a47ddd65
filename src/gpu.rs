use image::{Rgb, RgbImage};

use crate::domain::Scene;
use crate::render::validation::{
    validate_packed_scene, validate_ray_capacity, validate_scene_against_capabilities,
};
use crate::render::{gpu_capabilities, RenderSettings};

pub mod driver;
pub mod layout;
pub mod pack;
pub mod ray_state;
mod shader_source;

use driver::FrameSink;
use layout::BindingLayoutPlan;
use ray_state::{Pairing, RayStateBuffers, RAY_COMPONENTS};

/// Device and queue acquired once per process. Capability negotiation
/// happens here and nowhere else; if it fails, no session is ever created
/// and the frame driver never leaves `Idle`.
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

/// Limits the device is requested with. A session binds the scene storage
/// arrays plus both ray regions in the compute stage, which exceeds the
/// four-storage-buffer cap of `Limits::downlevel_defaults()`; the standard
/// defaults allow eight per stage.
fn required_limits() -> wgpu::Limits {
    wgpu::Limits::default()
}

impl GpuContext {
    pub async fn new() -> Result<Self, String> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| "no compatible GPU adapter available".to_string())?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("candela-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: required_limits(),
                },
                None,
            )
            .await
            .map_err(|error| format!("request_device failed: {error}"))?;

        Ok(Self { device, queue })
    }
}

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// All GPU-resident state for one render session: packed scene buffers, the
/// two ray regions with their prebuilt binding groups, both pipelines, and
/// the offscreen color target. Buffer sizes and the binding layout are
/// fixed at creation; a canvas or scene change means a new session.
pub struct GpuSession<'a> {
    context: &'a GpuContext,
    settings: RenderSettings,
    uniform_buffers: Vec<wgpu::Buffer>,
    _storage_buffers: Vec<wgpu::Buffer>,
    _ray_state: RayStateBuffers,
    bind_groups: [wgpu::BindGroup; 2],
    compute_pipeline: wgpu::ComputePipeline,
    render_pipeline: wgpu::RenderPipeline,
    target_texture: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback_buffer: wgpu::Buffer,
    padded_bytes_per_row: u32,
    encoder: Option<wgpu::CommandEncoder>,
}

impl<'a> GpuSession<'a> {
    pub fn create(
        context: &'a GpuContext,
        settings: &RenderSettings,
        scene: &Scene,
    ) -> Result<Self, String> {
        validate_scene_against_capabilities(scene, gpu_capabilities())?;

        let counts = scene.counts();
        let uniform_arrays = pack::session_uniform_arrays(settings, scene);
        let storage_arrays = pack::scene_storage_arrays(scene);
        validate_packed_scene(
            counts,
            storage_arrays[0].1.len(),
            storage_arrays[1].1.len(),
            storage_arrays[2].1.len(),
        )?;

        let device = &context.device;
        let queue = &context.queue;
        let uniform_buffers = pack::pack_uniforms(device, queue, &uniform_arrays);
        let storage_buffers = pack::pack_storage(device, queue, &storage_arrays);

        let [grid_x, grid_y] = settings.ray_grid();
        let capacity = grid_x as usize * grid_y as usize * RAY_COMPONENTS;
        let ray_state = RayStateBuffers::create(device, queue, capacity);
        validate_ray_capacity(settings, ray_state.capacity)?;

        let plan = BindingLayoutPlan {
            uniform_count: uniform_buffers.len() as u32,
            storage_count: storage_buffers.len() as u32,
        };
        let bind_group_layout = layout::build_bind_group_layout(device, plan);
        let bind_groups = layout::build_bind_groups(
            device,
            &bind_group_layout,
            plan,
            &uniform_buffers,
            &storage_buffers,
            &ray_state,
        );

        let compute_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trace-shader"),
            source: wgpu::ShaderSource::Wgsl(
                shader_source::build_compute_wgsl(settings.workgroup_size).into(),
            ),
        });
        let render_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source::render_wgsl().into()),
        });
        let (compute_pipeline, render_pipeline) = layout::build_pipelines(
            device,
            &bind_group_layout,
            &compute_module,
            &render_module,
            TARGET_FORMAT,
        );

        let target_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("target-texture"),
            size: wgpu::Extent3d {
                width: settings.width,
                height: settings.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let unpadded_bytes_per_row = settings.width * 4;
        let padded_bytes_per_row = ((unpadded_bytes_per_row + 255) / 256) * 256;
        let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback-buffer"),
            size: (padded_bytes_per_row * settings.height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            context,
            settings: settings.clone(),
            uniform_buffers,
            _storage_buffers: storage_buffers,
            _ray_state: ray_state,
            bind_groups,
            compute_pipeline,
            render_pipeline,
            target_texture,
            target_view,
            readback_buffer,
            padded_bytes_per_row,
            encoder: None,
        })
    }

    fn ensure_encoder(&mut self) {
        if self.encoder.is_none() {
            self.encoder = Some(self.context.device.create_command_encoder(
                &wgpu::CommandEncoderDescriptor {
                    label: Some("frame-encoder"),
                },
            ));
        }
    }

    /// Copies the final frame out of the offscreen target. Only called once
    /// the driver has stopped.
    pub fn read_back_image(&self) -> Result<RgbImage, String> {
        let device = &self.context.device;
        let queue = &self.context.queue;
        let width = self.settings.width;
        let height = self.settings.height;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback-encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.target_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.readback_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let slice = self.readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| "failed to receive GPU readback status".to_string())?
            .map_err(|error| format!("GPU readback map failed: {error}"))?;

        let data = slice.get_mapped_range();
        let mut image = RgbImage::new(width, height);
        for y in 0..height as usize {
            let row_start = y * self.padded_bytes_per_row as usize;
            for x in 0..width as usize {
                let pixel_start = row_start + (x * 4);
                image.put_pixel(
                    x as u32,
                    y as u32,
                    Rgb([
                        data[pixel_start],
                        data[pixel_start + 1],
                        data[pixel_start + 2],
                    ]),
                );
            }
        }
        drop(data);
        self.readback_buffer.unmap();

        Ok(image)
    }
}

impl FrameSink for GpuSession<'_> {
    fn write_step_uniform(&mut self, value: f32) {
        pack::update_uniform(
            &self.context.queue,
            &self.uniform_buffers[pack::FRAME_UNIFORM_INDEX],
            0,
            &[value],
        );
    }

    fn dispatch_compute(&mut self, pairing: Pairing, workgroups: [u32; 2]) {
        self.ensure_encoder();
        if let Some(encoder) = self.encoder.as_mut() {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("trace-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.compute_pipeline);
            pass.set_bind_group(0, &self.bind_groups[pairing.binding_index()], &[]);
            pass.dispatch_workgroups(workgroups[0], workgroups[1], 1);
        }
    }

    fn dispatch_render(&mut self, pairing: Pairing) {
        self.ensure_encoder();
        if let Some(encoder) = self.encoder.as_mut() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.render_pipeline);
            pass.set_bind_group(0, &self.bind_groups[pairing.binding_index()], &[]);
            pass.draw(0..3, 0..1);
        }
    }

    fn submit_frame(&mut self) -> Result<(), String> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| "frame submitted without any recorded work".to_string())?;
        self.context.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}
