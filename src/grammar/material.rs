//! Material variants and the data channels each of them exposes.

use std::fmt;

use crate::{
    foundation::error::{Gg3dError, Gg3dResult},
    grammar::texture::Texture,
};

/// How a channel's texture is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// RGB values.
    Color,
    /// One value per element.
    Scalar,
}

/// Microfacet distribution of rough variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Distribution {
    /// Beckmann.
    #[default]
    Beckmann,
    /// GGX.
    Ggx,
}

impl Distribution {
    /// Renderer-facing name.
    pub fn as_str(self) -> &'static str {
        match self {
            Distribution::Beckmann => "beckmann",
            Distribution::Ggx => "ggx",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scattering model; fields of type [`Texture`] are data channels.
#[derive(Clone, Debug)]
pub enum Bsdf {
    /// Lambertian.
    Diffuse {
        /// Color channel.
        reflectance: Texture,
    },
    /// Smooth metal.
    Conductor {
        /// Tabulated metal name, e.g. `"Au"`.
        material: String,
    },
    /// Rough metal.
    RoughConductor {
        /// Tabulated metal name.
        material: String,
        /// Microfacet distribution.
        distribution: Distribution,
        /// Scalar roughness channel.
        alpha: Texture,
    },
    /// Smooth plastic.
    Plastic {
        /// Color channel.
        diffuse_reflectance: Texture,
        /// Scalar channel.
        specular_reflectance: Texture,
    },
    /// Rough plastic.
    RoughPlastic {
        /// Color channel.
        diffuse_reflectance: Texture,
        /// Scalar channel.
        specular_reflectance: Texture,
        /// Microfacet distribution.
        distribution: Distribution,
        /// Roughness.
        alpha: f64,
    },
    /// Disney-style principled BSDF.
    Principled {
        /// Color channel.
        color: Texture,
        /// Scalar channel.
        roughness: Texture,
        /// Scalar channel.
        metallic: Texture,
    },
    /// Principled BSDF for thin sheets.
    ThinPrincipled {
        /// Color channel.
        color: Texture,
        /// Scalar channel.
        roughness: Texture,
        /// Index of refraction.
        eta: f64,
    },
    /// Smooth glass.
    Dielectric {
        /// Interior index of refraction.
        int_ior: f64,
        /// Exterior index of refraction.
        ext_ior: f64,
    },
    /// Glass sheet of negligible thickness.
    ThinDielectric {
        /// Interior index of refraction.
        int_ior: f64,
        /// Exterior index of refraction.
        ext_ior: f64,
    },
    /// Frosted glass.
    RoughDielectric {
        /// Interior index of refraction.
        int_ior: f64,
        /// Exterior index of refraction.
        ext_ior: f64,
        /// Microfacet distribution.
        distribution: Distribution,
        /// Roughness.
        alpha: f64,
    },
    /// Hair fiber.
    Hair {
        /// Eumelanin concentration.
        eumelanin: f64,
        /// Pheomelanin concentration.
        pheomelanin: f64,
    },
}

const DEFAULT_INT_IOR: f64 = 1.49;
const DEFAULT_EXT_IOR: f64 = 1.000277;

impl Bsdf {
    /// Renderer-facing variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            Bsdf::Diffuse { .. } => "diffuse",
            Bsdf::Conductor { .. } => "conductor",
            Bsdf::RoughConductor { .. } => "roughconductor",
            Bsdf::Plastic { .. } => "plastic",
            Bsdf::RoughPlastic { .. } => "roughplastic",
            Bsdf::Principled { .. } => "principled",
            Bsdf::ThinPrincipled { .. } => "principledthin",
            Bsdf::Dielectric { .. } => "dielectric",
            Bsdf::ThinDielectric { .. } => "thindielectric",
            Bsdf::RoughDielectric { .. } => "roughdielectric",
            Bsdf::Hair { .. } => "hair",
        }
    }

    /// Data channels in declaration order.
    pub fn channels(&self) -> Vec<(&'static str, ChannelKind, &Texture)> {
        use ChannelKind::{Color, Scalar};
        match self {
            Bsdf::Diffuse { reflectance } => vec![("reflectance", Color, reflectance)],
            Bsdf::RoughConductor { alpha, .. } => vec![("alpha", Scalar, alpha)],
            Bsdf::Plastic {
                diffuse_reflectance,
                specular_reflectance,
            }
            | Bsdf::RoughPlastic {
                diffuse_reflectance,
                specular_reflectance,
                ..
            } => vec![
                ("diffuse_reflectance", Color, diffuse_reflectance),
                ("specular_reflectance", Scalar, specular_reflectance),
            ],
            Bsdf::Principled {
                color,
                roughness,
                metallic,
            } => vec![
                ("color", Color, color),
                ("roughness", Scalar, roughness),
                ("metallic", Scalar, metallic),
            ],
            Bsdf::ThinPrincipled {
                color, roughness, ..
            } => vec![("color", Color, color), ("roughness", Scalar, roughness)],
            Bsdf::Conductor { .. }
            | Bsdf::Dielectric { .. }
            | Bsdf::ThinDielectric { .. }
            | Bsdf::RoughDielectric { .. }
            | Bsdf::Hair { .. } => Vec::new(),
        }
    }

    fn channel_mut(&mut self, name: &str) -> Option<&mut Texture> {
        match (self, name) {
            (Bsdf::Diffuse { reflectance }, "reflectance") => Some(reflectance),
            (Bsdf::RoughConductor { alpha, .. }, "alpha") => Some(alpha),
            (Bsdf::Plastic { diffuse_reflectance, .. }, "diffuse_reflectance")
            | (Bsdf::RoughPlastic { diffuse_reflectance, .. }, "diffuse_reflectance") => {
                Some(diffuse_reflectance)
            }
            (Bsdf::Plastic { specular_reflectance, .. }, "specular_reflectance")
            | (Bsdf::RoughPlastic { specular_reflectance, .. }, "specular_reflectance") => {
                Some(specular_reflectance)
            }
            (Bsdf::Principled { color, .. }, "color")
            | (Bsdf::ThinPrincipled { color, .. }, "color") => Some(color),
            (Bsdf::Principled { roughness, .. }, "roughness")
            | (Bsdf::ThinPrincipled { roughness, .. }, "roughness") => Some(roughness),
            (Bsdf::Principled { metallic, .. }, "metallic") => Some(metallic),
            _ => None,
        }
    }
}

/// Bump mapping parameters.
#[derive(Clone, Debug)]
pub struct BumpMap {
    /// Height texture, evaluated as a scalar field.
    pub texture: Texture,
    /// Height multiplier.
    pub scale: f64,
}

impl BumpMap {
    /// Unit-scale bump map.
    pub fn new(texture: impl Into<Texture>) -> Self {
        Self {
            texture: texture.into(),
            scale: 1.0,
        }
    }
}

/// A material channel value: a BSDF plus material-level parameters.
#[derive(Clone, Debug)]
pub struct Material {
    /// Scattering model.
    pub bsdf: Bsdf,
    /// Shade back faces like front faces.
    pub two_sided: bool,
    /// Optional bump map, applied regardless of channel bindings.
    pub bump_map: Option<BumpMap>,
}

impl From<Bsdf> for Material {
    fn from(bsdf: Bsdf) -> Self {
        Self {
            bsdf,
            two_sided: false,
            bump_map: None,
        }
    }
}

impl Material {
    /// Diffuse material.
    pub fn diffuse(reflectance: impl Into<Texture>) -> Self {
        Bsdf::Diffuse {
            reflectance: reflectance.into(),
        }
        .into()
    }

    /// Smooth conductor.
    pub fn conductor(material: impl Into<String>) -> Self {
        Bsdf::Conductor {
            material: material.into(),
        }
        .into()
    }

    /// Rough conductor with Beckmann roughness 0.1.
    pub fn rough_conductor(material: impl Into<String>) -> Self {
        Bsdf::RoughConductor {
            material: material.into(),
            distribution: Distribution::default(),
            alpha: Texture::from(0.1),
        }
        .into()
    }

    /// Plastic with specular reflectance 1.
    pub fn plastic(diffuse_reflectance: impl Into<Texture>) -> Self {
        Bsdf::Plastic {
            diffuse_reflectance: diffuse_reflectance.into(),
            specular_reflectance: Texture::from(1.0),
        }
        .into()
    }

    /// Rough plastic with Beckmann roughness 0.1.
    pub fn rough_plastic(diffuse_reflectance: impl Into<Texture>) -> Self {
        Bsdf::RoughPlastic {
            diffuse_reflectance: diffuse_reflectance.into(),
            specular_reflectance: Texture::from(1.0),
            distribution: Distribution::default(),
            alpha: 0.1,
        }
        .into()
    }

    /// Principled with roughness 0.5, metallic 0.
    pub fn principled(color: impl Into<Texture>) -> Self {
        Bsdf::Principled {
            color: color.into(),
            roughness: Texture::from(0.5),
            metallic: Texture::from(0.0),
        }
        .into()
    }

    /// Thin principled with roughness 0.5, eta 1.5.
    pub fn thin_principled(color: impl Into<Texture>) -> Self {
        Bsdf::ThinPrincipled {
            color: color.into(),
            roughness: Texture::from(0.5),
            eta: 1.5,
        }
        .into()
    }

    /// Smooth dielectric with acrylic/air indices.
    pub fn dielectric() -> Self {
        Bsdf::Dielectric {
            int_ior: DEFAULT_INT_IOR,
            ext_ior: DEFAULT_EXT_IOR,
        }
        .into()
    }

    /// Thin dielectric with acrylic/air indices.
    pub fn thin_dielectric() -> Self {
        Bsdf::ThinDielectric {
            int_ior: DEFAULT_INT_IOR,
            ext_ior: DEFAULT_EXT_IOR,
        }
        .into()
    }

    /// Rough dielectric with Beckmann roughness 0.1.
    pub fn rough_dielectric() -> Self {
        Bsdf::RoughDielectric {
            int_ior: DEFAULT_INT_IOR,
            ext_ior: DEFAULT_EXT_IOR,
            distribution: Distribution::default(),
            alpha: 0.1,
        }
        .into()
    }

    /// Hair with brown pigmentation.
    pub fn hair() -> Self {
        Bsdf::Hair {
            eumelanin: 1.3,
            pheomelanin: 0.2,
        }
        .into()
    }

    /// Variant by name (`"RoughPlastic"`, `"rough_plastic"`, ...) with default parameters.
    pub fn from_name(name: &str) -> Gg3dResult<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let gray = || Texture::from(0.5);
        Ok(match key.as_str() {
            "diffuse" => Self::diffuse(gray()),
            "conductor" => Self::conductor("Al"),
            "roughconductor" => Self::rough_conductor("Al"),
            "plastic" => Self::plastic(gray()),
            "roughplastic" => Self::rough_plastic(gray()),
            "principled" => Self::principled(gray()),
            "thinprincipled" | "principledthin" => Self::thin_principled(gray()),
            "dielectric" => Self::dielectric(),
            "thindielectric" => Self::thin_dielectric(),
            "roughdielectric" => Self::rough_dielectric(),
            "hair" => Self::hair(),
            _ => return Err(Gg3dError::validation(format!("unknown material '{name}'"))),
        })
    }

    /// Assign `texture` to the data channel `channel`.
    pub fn with_channel(mut self, channel: &str, texture: impl Into<Texture>) -> Gg3dResult<Self> {
        let kind = self.bsdf.kind();
        match self.bsdf.channel_mut(channel) {
            Some(slot) => *slot = texture.into(),
            None => return Err(Gg3dError::unsupported_channel(kind, channel)),
        }
        Ok(self)
    }

    /// Set two-sided shading.
    pub fn two_sided(mut self, two_sided: bool) -> Self {
        self.two_sided = two_sided;
        self
    }

    /// Attach a bump map.
    pub fn bump_map(mut self, bump_map: BumpMap) -> Self {
        self.bump_map = Some(bump_map);
        self
    }

    /// Data channels exposed by the BSDF.
    pub fn channels(&self) -> Vec<(&'static str, ChannelKind, &Texture)> {
        self.bsdf.channels()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/material.rs"]
mod tests;
