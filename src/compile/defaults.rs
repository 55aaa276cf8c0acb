use crate::grammar::{channel::Mark, material::Material, texture::Texture};

/// Values used for layer components that were never set.
///
/// This table is the only place defaults come from; it is consulted once per leaf during
/// resolution.
#[derive(Clone, Debug)]
pub struct Defaults {
    /// Mark when none is set.
    pub mark: Mark,
    /// Diffuse reflectance of the default material.
    pub reflectance: f64,
    /// Sphere radius for point marks.
    pub point_size: f64,
    /// Curve radius for curve marks.
    pub curve_size: f64,
    /// Base radius of vector-field curves.
    pub vector_field_size: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mark: Mark::Surface,
            reflectance: 0.5,
            point_size: 0.01,
            curve_size: 0.01,
            vector_field_size: 0.01,
        }
    }
}

impl Defaults {
    /// Material used when the material channel is unset.
    pub fn material(&self) -> Material {
        Material::diffuse(Texture::from(self.reflectance))
    }

    /// Size used when the size channel is unset.
    pub fn size_for(&self, mark: Mark) -> f64 {
        match mark {
            Mark::Point => self.point_size,
            Mark::Curve => self.curve_size,
            Mark::Surface => 0.0,
        }
    }
}
