use crate::domain::Triangle;
use crate::math::{Mat4, Vec3};

/// Triangulated unit cube (half extent 1) with outward winding, built as
/// the original face list: two triangles per face, shared corner vertices.
fn unit_cube() -> Vec<Triangle> {
    let v = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    let faces: [[usize; 3]; 12] = [
        [1, 0, 2],
        [2, 0, 3],
        [5, 1, 6],
        [6, 1, 2],
        [4, 5, 7],
        [7, 5, 6],
        [0, 4, 3],
        [3, 4, 7],
        [2, 3, 6],
        [6, 3, 7],
        [5, 4, 1],
        [1, 4, 0],
    ];
    faces
        .iter()
        .map(|[a, b, c]| Triangle::new(v[*a], v[*b], v[*c]))
        .collect()
}

/// Object-to-world transform for procedural geometry, composed in the fixed
/// order translate . scale . rotX . rotY . rotZ.
pub fn object_transform(center: Vec3, rotation: Vec3, size: f32) -> Mat4 {
    Mat4::from_translation(center)
        * Mat4::from_scale(Vec3::splat(size / 2.0))
        * Mat4::from_rotation_x(rotation.x)
        * Mat4::from_rotation_y(rotation.y)
        * Mat4::from_rotation_z(rotation.z)
}

/// 12-triangle cube with `size` edge length, rotated and placed in world
/// space. The transform is baked into the vertices; the caller derives the
/// bounding box when the triangles join a scene.
pub fn cube(center: Vec3, rotation: Vec3, size: f32) -> Vec<Triangle> {
    let transform = object_transform(center, rotation, size);
    unit_cube()
        .into_iter()
        .map(|t| {
            Triangle::new(
                transform.transform_point(t.v0),
                transform.transform_point(t.v1),
                transform.transform_point(t.v2),
            )
        })
        .collect()
}

/// Applies an arbitrary transform to an imported triangle list.
pub fn transform_triangles(triangles: &[Triangle], transform: Mat4) -> Vec<Triangle> {
    triangles
        .iter()
        .map(|t| {
            Triangle::new(
                transform.transform_point(t.v0),
                transform.transform_point(t.v1),
                transform.transform_point(t.v2),
            )
        })
        .collect()
}
