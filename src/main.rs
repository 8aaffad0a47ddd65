use std::io::{self, Read};
use std::time::Instant;

mod config;
mod domain;
mod geometry;
mod gpu;
mod loader;
mod math;
mod render;

use config::{validate_config, IncomingConfig};
use domain::presets::build_scene;
use domain::{Material, Scene};
use gpu::driver::{DriverState, FrameDriver};
use gpu::{GpuContext, GpuSession};
use math::Vec3;
use render::RenderSettings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let incoming: IncomingConfig = serde_json::from_str(&raw)?;
    let jobs = match incoming {
        IncomingConfig::Single(job) => vec![job],
        IncomingConfig::Batch(batch) => batch.jobs,
    };
    if jobs.is_empty() {
        return Err("jobs array must not be empty".into());
    }

    for job in &jobs {
        validate_config(job)?;
    }

    // Capability negotiation happens once, before any session; failure here
    // is fatal and rendering never starts.
    let context = pollster::block_on(GpuContext::new())
        .map_err(|error| format!("GPU initialization failed: {error}"))?;

    let total = jobs.len();
    for (index, job) in jobs.iter().enumerate() {
        let settings = RenderSettings::from_job(job);
        let scene = prepare_scene(job)?;

        let started = Instant::now();
        let mut session = GpuSession::create(&context, &settings, &scene)
            .map_err(|error| format!("failed to start session for '{}': {error}", scene.id))?;
        let mut driver = FrameDriver::new(&settings);

        loop {
            match driver.step(&mut session)? {
                DriverState::Stopped => break,
                DriverState::Running { step } if step % 64 == 0 => {
                    println!(
                        "[{}/{}] scene '{}': {step}/{} frames",
                        index + 1,
                        total,
                        scene.id,
                        settings.target_frames
                    );
                }
                _ => {}
            }
        }

        let image = session
            .read_back_image()
            .map_err(|error| format!("GPU readback failed: {error}"))?;
        image.save(&settings.output_path)?;

        println!(
            "[{}/{}] rendered scene '{}' ({} frames) in {} ms: {}",
            index + 1,
            total,
            scene.id,
            settings.target_frames,
            started.elapsed().as_millis(),
            settings.output_path
        );
    }

    // The context lifetime matches the process lifetime. Some GPU/driver
    // stacks can crash while tearing down device objects on drop.
    std::mem::forget(context);

    Ok(())
}

fn prepare_scene(job: &config::RenderJobConfig) -> Result<Scene, String> {
    let mut scene = build_scene(&job.scene)
        .map_err(|error| format!("failed to build scene '{}': {error}", job.scene))?;

    if let Some(path) = &job.import_path {
        let text = std::fs::read_to_string(path)
            .map_err(|error| format!("failed to read '{path}': {error}"))?;
        let triangles =
            loader::parse_obj(&text).map_err(|error| format!("import of '{path}' failed: {error}"))?;
        // Imported models are authored around their own origin; move them
        // into the preset's field of view before they join the scene.
        let placement =
            geometry::object_transform(Vec3::new(0.0, -0.1, -2.6), Vec3::new(0.0, 0.4, 0.0), 1.6);
        let placed = geometry::transform_triangles(&triangles, placement);
        let matte = Material::new(Vec3::new(0.75, 0.73, 0.70), 0.0, 0.8, 0.05);
        scene
            .push_mesh(placed, matte)
            .map_err(|error| format!("import of '{path}' failed: {error}"))?;
    }

    Ok(scene)
}
