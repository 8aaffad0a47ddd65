use crate::domain::{Material, Scene, Sphere};
use crate::geometry;
use crate::math::Vec3;

pub const SCENE_ID: &str = "cube_chamber";

pub fn build() -> Result<Scene, String> {
    let mut scene = Scene::new(SCENE_ID);

    let ground = Material::new(Vec3::new(0.70, 0.71, 0.74), 0.0, 0.9, 0.0);
    let chalk = Material::new(Vec3::new(0.88, 0.84, 0.76), 0.0, 0.75, 0.02);
    let steel = Material::new(Vec3::new(0.78, 0.80, 0.85), 0.0, 0.12, 0.7);
    let lamp = Material::new(Vec3::new(1.0, 0.96, 0.88), 11.0, 1.0, 0.0);

    for material in [&ground, &chalk, &steel, &lamp] {
        material.validate()?;
    }

    scene.push_sphere(Sphere {
        center: Vec3::new(0.0, -100.6, -3.0),
        radius: 100.0,
        material: ground,
    });
    scene.push_sphere(Sphere {
        center: Vec3::new(0.0, 2.8, -3.0),
        radius: 1.0,
        material: lamp,
    });

    scene.push_mesh(
        geometry::cube(Vec3::new(-1.1, -0.1, -3.2), Vec3::new(0.0, 0.5, 0.0), 1.0),
        chalk,
    )?;
    scene.push_mesh(
        geometry::cube(Vec3::new(1.0, -0.25, -2.8), Vec3::new(0.0, -0.3, 0.0), 0.7),
        steel,
    )?;

    Ok(scene)
}
