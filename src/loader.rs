use crate::domain::Triangle;
use crate::math::Vec3;

/// Parses a Wavefront OBJ text payload into an ordered triangle list.
/// Only `v` and `f` records are consumed; face indices are 1-based and
/// faces with more than three vertices are fan-triangulated. A malformed
/// payload fails the whole import -- the caller never receives partial
/// geometry.
pub fn parse_obj(text: &str) -> Result<Vec<Triangle>, String> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (line_number, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first() {
            Some(&"v") => {
                if parts.len() < 4 {
                    return Err(format!(
                        "line {}: vertex record needs three coordinates",
                        line_number + 1
                    ));
                }
                let mut coords = [0.0f32; 3];
                for (slot, raw) in coords.iter_mut().zip(&parts[1..4]) {
                    *slot = raw.parse().map_err(|_| {
                        format!("line {}: invalid vertex coordinate '{raw}'", line_number + 1)
                    })?;
                }
                vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            Some(&"f") => {
                if parts.len() < 4 {
                    return Err(format!(
                        "line {}: face record needs at least three indices",
                        line_number + 1
                    ));
                }
                let mut face = Vec::with_capacity(parts.len() - 1);
                for raw in &parts[1..] {
                    // "f 1/2/3" style records carry texture/normal indices
                    // after the slash; only the vertex index is used.
                    let index_text = raw.split('/').next().unwrap_or("");
                    let index: usize = index_text.parse().map_err(|_| {
                        format!("line {}: invalid face index '{raw}'", line_number + 1)
                    })?;
                    if index == 0 || index > vertices.len() {
                        return Err(format!(
                            "line {}: face index {index} out of range (1..={})",
                            line_number + 1,
                            vertices.len()
                        ));
                    }
                    face.push(vertices[index - 1]);
                }
                for i in 1..face.len() - 1 {
                    triangles.push(Triangle::new(face[0], face[i], face[i + 1]));
                }
            }
            _ => {}
        }
    }

    Ok(triangles)
}
