use crate::domain::{Scene, SceneCounts, MESH_STRIDE, SPHERE_STRIDE, TRIANGLE_STRIDE};

use super::capabilities::RendererCapabilities;
use super::settings::RenderSettings;
use crate::gpu::ray_state::RAY_COMPONENTS;

pub fn validate_scene_against_capabilities(
    scene: &Scene,
    capabilities: RendererCapabilities,
) -> Result<(), String> {
    let counts = scene.counts();
    if counts.sphere_count as usize > capabilities.max_spheres {
        return Err(format!(
            "scene '{}' has {} spheres but renderer supports at most {}",
            scene.id, counts.sphere_count, capabilities.max_spheres
        ));
    }
    if counts.mesh_count as usize > capabilities.max_meshes {
        return Err(format!(
            "scene '{}' has {} meshes but renderer supports at most {}",
            scene.id, counts.mesh_count, capabilities.max_meshes
        ));
    }
    if counts.triangle_count as usize > capabilities.max_triangles {
        return Err(format!(
            "scene '{}' has {} triangles but renderer supports at most {}",
            scene.id, counts.triangle_count, capabilities.max_triangles
        ));
    }

    for sphere in &scene.spheres {
        sphere
            .material
            .validate()
            .map_err(|error| format!("scene '{}': sphere material invalid: {error}", scene.id))?;
        if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
            return Err(format!(
                "scene '{}': sphere radius must be positive and finite, got {}",
                scene.id, sphere.radius
            ));
        }
    }
    for mesh in scene.meshes() {
        mesh.material
            .validate()
            .map_err(|error| format!("scene '{}': mesh material invalid: {error}", scene.id))?;
    }

    Ok(())
}

/// The counts handed to the compute program must exactly match the packed
/// buffer lengths. A mismatch here is a programming error in the packer,
/// caught before anything reaches the GPU.
pub fn validate_packed_scene(
    counts: SceneCounts,
    sphere_floats: usize,
    triangle_floats: usize,
    mesh_floats: usize,
) -> Result<(), String> {
    let expect = |name: &str, count: u32, stride: usize, actual: usize| -> Result<(), String> {
        let expected = count as usize * stride;
        if expected != actual {
            return Err(format!(
                "packed {name} buffer holds {actual} floats but counts promise {expected} \
                 ({count} x {stride})"
            ));
        }
        Ok(())
    };
    expect("sphere", counts.sphere_count, SPHERE_STRIDE, sphere_floats)?;
    expect("triangle", counts.triangle_count, TRIANGLE_STRIDE, triangle_floats)?;
    expect("mesh", counts.mesh_count, MESH_STRIDE, mesh_floats)?;
    Ok(())
}

/// Detects the resize-after-start contract violation: ray regions are sized
/// once per session, so a canvas change invalidates every binding that
/// references them.
pub fn validate_ray_capacity(settings: &RenderSettings, region_floats: usize) -> Result<(), String> {
    let [gx, gy] = settings.ray_grid();
    let expected = gx as usize * gy as usize * RAY_COMPONENTS;
    if expected != region_floats {
        return Err(format!(
            "ray region holds {region_floats} floats but the {gx}x{gy} ray grid needs {expected}; \
             resizing requires rebuilding both regions and all bindings"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Material, Sphere, Triangle};
    use crate::math::Vec3;
    use crate::render::capabilities::gpu_capabilities;

    fn small_scene() -> Scene {
        let mut scene = Scene::new("test");
        scene.push_sphere(Sphere {
            center: Vec3::splat(0.0),
            radius: 1.0,
            material: Material::new(Vec3::splat(0.5), 0.0, 0.5, 0.0),
        });
        scene
            .push_mesh(
                vec![Triangle::new(
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                )],
                Material::new(Vec3::splat(0.5), 0.0, 0.5, 0.0),
            )
            .unwrap();
        scene
    }

    fn settings_4x4() -> RenderSettings {
        let job = serde_json::from_str(
            r#"{"width": 4, "height": 4, "outputPath": "out/f.png",
                "scene": "sphere_lab", "targetFrames": 1}"#,
        )
        .unwrap();
        RenderSettings::from_job(&job)
    }

    #[test]
    fn accepts_scene_within_capabilities() {
        assert!(validate_scene_against_capabilities(&small_scene(), gpu_capabilities()).is_ok());
    }

    #[test]
    fn rejects_too_many_spheres() {
        let mut scene = small_scene();
        let sphere = scene.spheres[0];
        for _ in 0..gpu_capabilities().max_spheres {
            scene.push_sphere(sphere);
        }
        let error = validate_scene_against_capabilities(&scene, gpu_capabilities()).unwrap_err();
        assert!(error.contains("spheres"));
    }

    #[test]
    fn rejects_non_positive_sphere_radius() {
        let mut scene = small_scene();
        scene.spheres[0].radius = 0.0;
        assert!(validate_scene_against_capabilities(&scene, gpu_capabilities()).is_err());
    }

    #[test]
    fn matching_packed_lengths_pass() {
        let scene = small_scene();
        let counts = scene.counts();
        assert!(validate_packed_scene(
            counts,
            scene.flat_spheres().len(),
            scene.flat_triangles().len(),
            scene.flat_meshes().len(),
        )
        .is_ok());
    }

    #[test]
    fn count_mismatch_is_a_contract_violation() {
        let scene = small_scene();
        let mut counts = scene.counts();
        counts.triangle_count += 1;
        let error = validate_packed_scene(
            counts,
            scene.flat_spheres().len(),
            scene.flat_triangles().len(),
            scene.flat_meshes().len(),
        )
        .unwrap_err();
        assert!(error.contains("triangle"));
    }

    #[test]
    fn ray_capacity_matches_the_session_grid() {
        let settings = settings_4x4();
        assert!(validate_ray_capacity(&settings, 4 * 4 * RAY_COMPONENTS).is_ok());
    }

    #[test]
    fn resized_canvas_is_detected() {
        let mut settings = settings_4x4();
        let capacity = 4 * 4 * RAY_COMPONENTS;
        settings.width = 8;
        let error = validate_ray_capacity(&settings, capacity).unwrap_err();
        assert!(error.contains("rebuilding"));
    }
}
