/// Floats of ray/accumulation state per cell of the ray grid (rgb radiance
/// sum plus a sample counter in the fourth lane).
pub const RAY_COMPONENTS: usize = 4;

/// One of the two GPU-resident ray regions. The regions exist for the whole
/// session and are never resized; only their contents change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayRegion {
    A,
    B,
}

/// The (read, write) region assignment for one step parity. The compute
/// program reads last frame's full ray state from `read` and writes the new
/// state to `write`, so a single dispatch never reads and writes the same
/// region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub read: RayRegion,
    pub write: RayRegion,
}

impl Pairing {
    /// Index of the prebuilt binding-group instance for this pairing:
    /// instance 0 is (A read, B write), instance 1 the flip.
    pub fn binding_index(self) -> usize {
        match self.read {
            RayRegion::A => 0,
            RayRegion::B => 1,
        }
    }
}

/// Pure period-2 pairing function: even steps read region A and write B,
/// odd steps flip.
pub fn pairing_for(step: u32) -> Pairing {
    if step % 2 == 0 {
        Pairing {
            read: RayRegion::A,
            write: RayRegion::B,
        }
    } else {
        Pairing {
            read: RayRegion::B,
            write: RayRegion::A,
        }
    }
}

/// Monotonic step counter for one render session. Passed through the frame
/// step explicitly rather than living in ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCursor {
    pub step: u32,
}

/// Everything one frame step needs to agree on, derived in one place so the
/// increment-before-render-pairing ordering cannot be reassembled wrongly
/// at a call site: the compute pass uses the prior step's pairing, then the
/// step advances, and the render pass consumes the read side of the *new*
/// pairing -- the region the compute pass just wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameAdvance {
    pub compute_pairing: Pairing,
    pub next: FrameCursor,
    pub render_pairing: Pairing,
}

pub fn advance(cursor: FrameCursor) -> FrameAdvance {
    let next = FrameCursor {
        step: cursor.step + 1,
    };
    FrameAdvance {
        compute_pairing: pairing_for(cursor.step),
        next,
        render_pairing: pairing_for(next.step),
    }
}

/// The two equal-size GPU ray regions, zero-initialized at creation.
pub struct RayStateBuffers {
    /// Floats per region.
    pub capacity: usize,
    buffers: [wgpu::Buffer; 2],
}

impl RayStateBuffers {
    pub fn create(device: &wgpu::Device, queue: &wgpu::Queue, capacity: usize) -> Self {
        let zeroes = vec![0.0f32; capacity];
        let make = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (capacity * std::mem::size_of::<f32>()) as u64,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let buffers = [make("ray-region-a"), make("ray-region-b")];
        for buffer in &buffers {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&zeroes));
        }
        Self { capacity, buffers }
    }

    pub fn region(&self, region: RayRegion) -> &wgpu::Buffer {
        match region {
            RayRegion::A => &self.buffers[0],
            RayRegion::B => &self.buffers[1],
        }
    }
}
