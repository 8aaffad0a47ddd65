use super::ray_state::{RayRegion, RayStateBuffers};

/// What occupies one binding slot of the shared group layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Uniform,
    ReadOnlyStorage,
    ReadWriteStorage,
}

/// Immutable description of the one binding-group layout shared by the
/// compute and render pipelines. Cardinalities come from the scene at
/// session start and cannot change afterwards; a buffer-count change after
/// pipelines exist requires a full rebuild.
///
/// Slot order: `0..U` uniforms, `U..U+S` read-only scene storage, then the
/// ray read region (read-only storage) and the ray write region (read-write
/// storage).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingLayoutPlan {
    pub uniform_count: u32,
    pub storage_count: u32,
}

impl BindingLayoutPlan {
    pub fn slot_count(self) -> u32 {
        self.uniform_count + self.storage_count + 2
    }

    pub fn ray_read_slot(self) -> u32 {
        self.uniform_count + self.storage_count
    }

    pub fn ray_write_slot(self) -> u32 {
        self.ray_read_slot() + 1
    }

    pub fn slots(self) -> Vec<SlotKind> {
        let mut slots = Vec::with_capacity(self.slot_count() as usize);
        slots.extend(std::iter::repeat(SlotKind::Uniform).take(self.uniform_count as usize));
        slots.extend(
            std::iter::repeat(SlotKind::ReadOnlyStorage).take(self.storage_count as usize),
        );
        slots.push(SlotKind::ReadOnlyStorage);
        slots.push(SlotKind::ReadWriteStorage);
        slots
    }
}

fn buffer_layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BufferBindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn build_bind_group_layout(
    device: &wgpu::Device,
    plan: BindingLayoutPlan,
) -> wgpu::BindGroupLayout {
    let both = wgpu::ShaderStages::COMPUTE | wgpu::ShaderStages::FRAGMENT;
    let mut entries = Vec::with_capacity(plan.slot_count() as usize);
    for binding in 0..plan.uniform_count {
        entries.push(buffer_layout_entry(
            binding,
            both,
            wgpu::BufferBindingType::Uniform,
        ));
    }
    for offset in 0..plan.storage_count {
        entries.push(buffer_layout_entry(
            plan.uniform_count + offset,
            wgpu::ShaderStages::COMPUTE,
            wgpu::BufferBindingType::Storage { read_only: true },
        ));
    }
    entries.push(buffer_layout_entry(
        plan.ray_read_slot(),
        both,
        wgpu::BufferBindingType::Storage { read_only: true },
    ));
    entries.push(buffer_layout_entry(
        plan.ray_write_slot(),
        wgpu::ShaderStages::COMPUTE,
        wgpu::BufferBindingType::Storage { read_only: false },
    ));

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("session-bind-group-layout"),
        entries: &entries,
    })
}

/// The two binding-group instances, one per ray pairing. Each instance gets
/// its own entry list; sharing one list across both instances risks
/// aliasing the ray slots between them.
pub fn build_bind_groups(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    plan: BindingLayoutPlan,
    uniform_buffers: &[wgpu::Buffer],
    storage_buffers: &[wgpu::Buffer],
    ray_state: &RayStateBuffers,
) -> [wgpu::BindGroup; 2] {
    let build = |read: RayRegion, write: RayRegion, label: &str| {
        let mut entries = Vec::with_capacity(plan.slot_count() as usize);
        for (offset, buffer) in uniform_buffers.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: offset as u32,
                resource: buffer.as_entire_binding(),
            });
        }
        for (offset, buffer) in storage_buffers.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: plan.uniform_count + offset as u32,
                resource: buffer.as_entire_binding(),
            });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: plan.ray_read_slot(),
            resource: ray_state.region(read).as_entire_binding(),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: plan.ray_write_slot(),
            resource: ray_state.region(write).as_entire_binding(),
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &entries,
        })
    };

    [
        build(RayRegion::A, RayRegion::B, "bind-group-read-a"),
        build(RayRegion::B, RayRegion::A, "bind-group-read-b"),
    ]
}

/// Compute and render pipelines built over the one shared layout, so both
/// stages of a frame see an identical binding contract. Layout shape is
/// fixed once the pipelines exist.
pub fn build_pipelines(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    compute_module: &wgpu::ShaderModule,
    render_module: &wgpu::ShaderModule,
    target_format: wgpu::TextureFormat,
) -> (wgpu::ComputePipeline, wgpu::RenderPipeline) {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("session-pipeline-layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let compute = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("trace-pipeline"),
        layout: Some(&pipeline_layout),
        module: compute_module,
        entry_point: "main",
        compilation_options: wgpu::PipelineCompilationOptions::default(),
    });

    let render = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blit-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: render_module,
            entry_point: "vs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: render_module,
            entry_point: "fs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    });

    (compute, render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_exposes_uniforms_then_storage_then_ray_slots() {
        let plan = BindingLayoutPlan {
            uniform_count: 2,
            storage_count: 3,
        };
        assert_eq!(plan.slot_count(), 7);
        let slots = plan.slots();
        assert_eq!(slots.len(), 7);
        assert_eq!(&slots[0..2], &[SlotKind::Uniform, SlotKind::Uniform]);
        assert!(slots[2..5]
            .iter()
            .all(|slot| *slot == SlotKind::ReadOnlyStorage));
        assert_eq!(slots[5], SlotKind::ReadOnlyStorage);
        assert_eq!(slots[6], SlotKind::ReadWriteStorage);
    }

    #[test]
    fn final_two_slots_keep_their_kinds_regardless_of_cardinality() {
        for (u, s) in [(0, 0), (1, 0), (0, 4), (5, 7)] {
            let plan = BindingLayoutPlan {
                uniform_count: u,
                storage_count: s,
            };
            let slots = plan.slots();
            assert_eq!(slots[plan.ray_read_slot() as usize], SlotKind::ReadOnlyStorage);
            assert_eq!(slots[plan.ray_write_slot() as usize], SlotKind::ReadWriteStorage);
            assert_eq!(plan.ray_write_slot() + 1, plan.slot_count());
        }
    }
}
