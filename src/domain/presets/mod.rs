mod cube_chamber;
mod sphere_lab;

use crate::domain::Scene;

pub fn build_scene(scene_id: &str) -> Result<Scene, String> {
    if scene_id.eq_ignore_ascii_case(sphere_lab::SCENE_ID) {
        return sphere_lab::build();
    }
    if scene_id.eq_ignore_ascii_case(cube_chamber::SCENE_ID) {
        return cube_chamber::build();
    }

    Err(format!("unknown scene identifier: {scene_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_known_scenes_case_insensitively() {
        assert!(build_scene("sphere_lab").is_ok());
        assert!(build_scene("Cube_Chamber").is_ok());
    }

    #[test]
    fn rejects_unknown_scene() {
        assert!(build_scene("missing").is_err());
    }

    #[test]
    fn preset_scenes_have_consistent_mesh_layout() {
        let scene = build_scene("cube_chamber").unwrap();
        let starts = scene.triangle_starts();
        let counts = scene.counts();
        let last_start = *starts.last().unwrap();
        let last_count = scene.meshes().last().unwrap().triangle_count;
        assert_eq!(last_start + last_count, counts.triangle_count);
    }
}
