use crate::math::Vec3;

/// Surface description shared by spheres and meshes. Constructed once and
/// copied into every primitive that uses it; never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emission: f32,
    pub roughness: f32,
    pub specular_probability: f32,
}

impl Material {
    pub const fn new(color: Vec3, emission: f32, roughness: f32, specular_probability: f32) -> Self {
        Self {
            color,
            emission,
            roughness,
            specular_probability,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.color.is_finite() || !self.emission.is_finite() {
            return Err("material color and emission must be finite".into());
        }
        if self.emission < 0.0 {
            return Err(format!("material emission must be >= 0, got {}", self.emission));
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Err(format!("material roughness must be in [0, 1], got {}", self.roughness));
        }
        if !(0.0..=1.0).contains(&self.specular_probability) {
            return Err(format!(
                "material specular probability must be in [0, 1], got {}",
                self.specular_probability
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_diffuse_material() {
        let material = Material::new(Vec3::new(0.8, 0.2, 0.2), 0.0, 0.5, 0.1);
        assert!(material.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_roughness() {
        let material = Material::new(Vec3::splat(0.5), 0.0, 1.5, 0.0);
        assert!(material.validate().is_err());
    }

    #[test]
    fn rejects_negative_emission() {
        let material = Material::new(Vec3::splat(0.5), -1.0, 0.5, 0.0);
        assert!(material.validate().is_err());
    }
}
