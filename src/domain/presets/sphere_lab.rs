use crate::domain::{Material, Scene, Sphere};
use crate::math::Vec3;

pub const SCENE_ID: &str = "sphere_lab";

pub fn build() -> Result<Scene, String> {
    let mut scene = Scene::new(SCENE_ID);

    let ground = Material::new(Vec3::new(0.72, 0.72, 0.70), 0.0, 0.95, 0.0);
    let matte_red = Material::new(Vec3::new(0.85, 0.20, 0.18), 0.0, 0.85, 0.05);
    let polished = Material::new(Vec3::new(0.92, 0.93, 0.96), 0.0, 0.04, 0.85);
    let lamp = Material::new(Vec3::new(1.0, 0.93, 0.82), 14.0, 1.0, 0.0);

    for material in [&ground, &matte_red, &polished, &lamp] {
        material.validate()?;
    }

    scene.push_sphere(Sphere {
        center: Vec3::new(0.0, -100.5, -2.0),
        radius: 100.0,
        material: ground,
    });
    scene.push_sphere(Sphere {
        center: Vec3::new(-0.9, 0.0, -2.2),
        radius: 0.5,
        material: matte_red,
    });
    scene.push_sphere(Sphere {
        center: Vec3::new(0.9, 0.0, -2.0),
        radius: 0.5,
        material: polished,
    });
    scene.push_sphere(Sphere {
        center: Vec3::new(0.0, 2.4, -2.0),
        radius: 0.9,
        material: lamp,
    });

    Ok(scene)
}
