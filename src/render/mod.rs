pub mod capabilities;
pub mod settings;
pub mod validation;

pub use capabilities::gpu_capabilities;
pub use settings::{RenderSettings, StepEncoding};
