use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJobConfig {
    pub width: u32,
    pub height: u32,
    pub output_path: String,
    pub scene: String,
    /// Supersampling factor per axis.
    #[serde(default = "default_rays_per_pixel")]
    pub rays_per_pixel: u32,
    /// Compute dispatches folded into each submitted frame.
    #[serde(default = "default_computes_per_frame")]
    pub computes_per_frame: u32,
    /// Accumulation steps before the session stops; 0 renders nothing.
    #[serde(default = "default_target_frames")]
    pub target_frames: u32,
    /// "raw" or "normalized"; how the step reaches the time-varying uniform.
    #[serde(default)]
    pub step_encoding: String,
    #[serde(default)]
    pub half_resolution: bool,
    /// Optional OBJ file merged into the scene as one extra mesh.
    #[serde(default)]
    pub import_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatchConfig {
    pub jobs: Vec<RenderJobConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingConfig {
    Single(RenderJobConfig),
    Batch(RenderBatchConfig),
}

const fn default_rays_per_pixel() -> u32 {
    1
}

const fn default_computes_per_frame() -> u32 {
    1
}

const fn default_target_frames() -> u32 {
    64
}

/// Maximum supersampling factor: the ray grid grows quadratically with it
/// and quickly exceeds storage-binding limits.
pub const MAX_RAYS_PER_PIXEL: u32 = 4;

pub fn validate_config(config: &RenderJobConfig) -> Result<(), String> {
    if config.width == 0 || config.height == 0 {
        return Err("width and height must be positive".into());
    }

    let output_parent = Path::new(&config.output_path)
        .parent()
        .ok_or_else(|| "outputPath must include a parent directory".to_string())?;
    if !output_parent.as_os_str().is_empty() && !output_parent.exists() {
        return Err(format!(
            "output directory does not exist: {}",
            output_parent.display()
        ));
    }

    if config.scene.trim().is_empty() {
        return Err("scene must be a non-empty identifier".into());
    }

    if config.rays_per_pixel == 0 || config.rays_per_pixel > MAX_RAYS_PER_PIXEL {
        return Err(format!(
            "raysPerPixel must be in 1..={MAX_RAYS_PER_PIXEL}, got {}",
            config.rays_per_pixel
        ));
    }

    if config.computes_per_frame == 0 {
        return Err("computesPerFrame must be at least 1".into());
    }

    if let Some(path) = &config.import_path {
        if !Path::new(path).exists() {
            return Err(format!("importPath does not exist: {path}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_json(extra: &str) -> String {
        format!(
            r#"{{"width": 64, "height": 48, "outputPath": "frame.png",
                "scene": "sphere_lab"{extra}}}"#
        )
    }

    fn parse(extra: &str) -> RenderJobConfig {
        serde_json::from_str(&job_json(extra)).unwrap()
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = parse("");
        assert_eq!(config.rays_per_pixel, 1);
        assert_eq!(config.computes_per_frame, 1);
        assert_eq!(config.target_frames, 64);
        assert!(!config.half_resolution);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_target_frames_is_a_valid_session() {
        let config = parse(r#", "targetFrames": 0"#);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut config = parse("");
        config.width = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_oversized_supersampling() {
        let config = parse(r#", "raysPerPixel": 9"#);
        let error = validate_config(&config).unwrap_err();
        assert!(error.contains("raysPerPixel"));
    }

    #[test]
    fn rejects_blank_scene_id() {
        let mut config = parse("");
        config.scene = "  ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn batch_and_single_forms_both_deserialize() {
        let single: IncomingConfig = serde_json::from_str(&job_json("")).unwrap();
        assert!(matches!(single, IncomingConfig::Single(_)));

        let batch_json = format!(r#"{{"jobs": [{}, {}]}}"#, job_json(""), job_json(""));
        let batch: IncomingConfig = serde_json::from_str(&batch_json).unwrap();
        match batch {
            IncomingConfig::Batch(batch) => assert_eq!(batch.jobs.len(), 2),
            IncomingConfig::Single(_) => panic!("expected batch"),
        }
    }
}
