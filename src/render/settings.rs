use crate::config::RenderJobConfig;

/// How the time-varying uniform encodes the current step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEncoding {
    /// Raw step count.
    Raw,
    /// `step / target_frames`, usable as an animation phase.
    Normalized,
}

impl StepEncoding {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("normalized") {
            return Self::Normalized;
        }
        Self::Raw
    }

    pub fn encode(self, step: u32, target_frames: u32) -> f32 {
        match self {
            Self::Raw => step as f32,
            Self::Normalized => {
                if target_frames == 0 || target_frames == u32::MAX {
                    step as f32
                } else {
                    step as f32 / target_frames as f32
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub rays_per_pixel: u32,
    pub computes_per_frame: u32,
    pub target_frames: u32,
    pub workgroup_size: u32,
    pub step_encoding: StepEncoding,
    pub output_path: String,
}

pub const DEFAULT_WORKGROUP_SIZE: u32 = 8;

impl RenderSettings {
    pub fn from_job(job: &RenderJobConfig) -> Self {
        // The host surface may be halved for performance before the session
        // starts; after that the dimensions are frozen for the session.
        let divisor = if job.half_resolution { 2 } else { 1 };
        Self {
            width: (job.width / divisor).max(1),
            height: (job.height / divisor).max(1),
            rays_per_pixel: job.rays_per_pixel.max(1),
            computes_per_frame: job.computes_per_frame.max(1),
            target_frames: job.target_frames,
            workgroup_size: DEFAULT_WORKGROUP_SIZE,
            step_encoding: StepEncoding::parse(&job.step_encoding),
            output_path: job.output_path.clone(),
        }
    }

    /// Ray grid dimensions: the canvas supersampled by `rays_per_pixel`
    /// along each axis.
    pub fn ray_grid(&self) -> [u32; 2] {
        [
            self.width * self.rays_per_pixel,
            self.height * self.rays_per_pixel,
        ]
    }

    /// Workgroup counts covering the ray grid, rounded up so no ray is left
    /// uncovered.
    pub fn workgroup_counts(&self) -> [u32; 2] {
        let [gx, gy] = self.ray_grid();
        let wg = self.workgroup_size;
        [(gx + wg - 1) / wg, (gy + wg - 1) / wg]
    }
}
