//! Texture descriptions: how attribute values (or constants) become per-element colors/scalars.

use std::{path::PathBuf, sync::Arc};

use crate::{foundation::core::ColorLike, grammar::attribute::AttributeRef};

/// Where image texels come from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Decoded on evaluation.
    Path(PathBuf),
    /// Already decoded pixels.
    Memory(Arc<image::RgbImage>),
}

/// What to do with UV coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UvPolicy {
    /// Clamp into range.
    #[default]
    Clamp,
    /// Fail with [`crate::Gg3dError::UvOutOfRange`].
    Error,
}

/// An image sampled at per-element UV coordinates.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel source.
    pub source: ImageSource,
    /// 2-channel UV attribute; the frame's first UV attribute when `None`.
    pub uv: Option<AttributeRef>,
    /// Out-of-range handling.
    pub uv_policy: UvPolicy,
}

impl Image {
    /// Image loaded from `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ImageSource::Path(path.into()),
            uv: None,
            uv_policy: UvPolicy::default(),
        }
    }

    /// Image from decoded pixels.
    pub fn from_image(img: image::RgbImage) -> Self {
        Self {
            source: ImageSource::Memory(Arc::new(img)),
            uv: None,
            uv_policy: UvPolicy::default(),
        }
    }

    /// Sample with a specific UV attribute.
    pub fn uv(mut self, uv: impl Into<AttributeRef>) -> Self {
        self.uv = Some(uv.into());
        self
    }

    /// Set the out-of-range policy.
    pub fn uv_policy(mut self, policy: UvPolicy) -> Self {
        self.uv_policy = policy;
        self
    }
}

/// Color source for [`ScalarField`].
#[derive(Clone, Debug, PartialEq)]
pub enum Colormap {
    /// Built-in map (`viridis`, `magma`, ...), a qualitative palette, or `identity`.
    Named(String),
    /// Evenly spaced colors.
    Colors(Vec<ColorLike>),
}

impl Default for Colormap {
    fn default() -> Self {
        Colormap::Named("viridis".to_string())
    }
}

/// A scalar attribute mapped through a colormap.
#[derive(Clone, Debug)]
pub struct ScalarField {
    /// Attribute to map.
    pub data: AttributeRef,
    /// Color source.
    pub colormap: Colormap,
    /// Values are clipped to and normalized from this domain; data min/max when `None`.
    pub domain: Option<(f64, f64)>,
    /// Normalized output range; `(0, 1)` when `None`.
    pub range: Option<(f64, f64)>,
    /// Treat values as discrete category indices.
    pub categories: bool,
}

impl ScalarField {
    /// Viridis-mapped field over the data range.
    pub fn new(data: impl Into<AttributeRef>) -> Self {
        Self {
            data: data.into(),
            colormap: Colormap::default(),
            domain: None,
            range: None,
            categories: false,
        }
    }

    /// Use a named colormap.
    pub fn colormap(mut self, name: impl Into<String>) -> Self {
        self.colormap = Colormap::Named(name.into());
        self
    }

    /// Use explicit colors.
    pub fn colors(mut self, colors: Vec<ColorLike>) -> Self {
        self.colormap = Colormap::Colors(colors);
        self
    }

    /// Fix the input domain.
    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = Some((min, max));
        self
    }

    /// Set the output range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Toggle categorical mapping.
    pub fn categories(mut self, categories: bool) -> Self {
        self.categories = categories;
        self
    }
}

/// Two textures alternating on a UV grid.
#[derive(Clone, Debug)]
pub struct CheckerBoard {
    /// UV attribute; the frame's first UV attribute when `None`.
    pub uv: Option<AttributeRef>,
    /// Texture on even cells.
    pub texture1: Box<Texture>,
    /// Texture on odd cells.
    pub texture2: Box<Texture>,
    /// Cells per unit UV length.
    pub size: u32,
}

impl Default for CheckerBoard {
    fn default() -> Self {
        Self {
            uv: None,
            texture1: Box::new(Texture::from(0.8)),
            texture2: Box::new(Texture::from(0.2)),
            size: 8,
        }
    }
}

impl CheckerBoard {
    /// Replace both cell textures.
    pub fn textures(mut self, texture1: impl Into<Texture>, texture2: impl Into<Texture>) -> Self {
        self.texture1 = Box::new(texture1.into());
        self.texture2 = Box::new(texture2.into());
        self
    }

    /// Set the UV attribute.
    pub fn uv(mut self, uv: impl Into<AttributeRef>) -> Self {
        self.uv = Some(uv.into());
        self
    }

    /// Set the grid size.
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// Contour lines of a scalar attribute.
#[derive(Clone, Debug)]
pub struct Isocontour {
    /// Scalar attribute.
    pub data: AttributeRef,
    /// Fraction of each contour period covered by `texture1`.
    pub ratio: f64,
    /// Texture on contour lines.
    pub texture1: Box<Texture>,
    /// Texture between contour lines.
    pub texture2: Box<Texture>,
    /// Contour periods per unit of data.
    pub num_contours: u32,
}

impl Isocontour {
    /// Default contours on `data`.
    pub fn new(data: impl Into<AttributeRef>) -> Self {
        Self {
            data: data.into(),
            ratio: 0.1,
            texture1: Box::new(Texture::from(0.4)),
            texture2: Box::new(Texture::from(0.2)),
            num_contours: 8,
        }
    }

    /// Replace both textures.
    pub fn textures(mut self, texture1: impl Into<Texture>, texture2: impl Into<Texture>) -> Self {
        self.texture1 = Box::new(texture1.into());
        self.texture2 = Box::new(texture2.into());
        self
    }

    /// Set the line ratio.
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Set the number of contours.
    pub fn num_contours(mut self, n: u32) -> Self {
        self.num_contours = n;
        self
    }
}

/// A texture variant.
#[derive(Clone, Debug)]
pub enum Texture {
    /// Constant value.
    Uniform {
        /// Color, or gray level for scalar channels.
        color: ColorLike,
    },
    /// UV-sampled image.
    Image(Image),
    /// Colormapped attribute.
    ScalarField(ScalarField),
    /// UV checkerboard of two child textures.
    CheckerBoard(CheckerBoard),
    /// Iso-lines of a scalar attribute over two child textures.
    Isocontour(Isocontour),
}

impl Texture {
    /// Constant texture.
    pub fn uniform(color: impl Into<ColorLike>) -> Self {
        Self::Uniform {
            color: color.into(),
        }
    }

    /// Constant value if this is a [`Texture::Uniform`].
    pub fn as_uniform(&self) -> Option<&ColorLike> {
        match self {
            Self::Uniform { color } => Some(color),
            _ => None,
        }
    }
}

impl From<ColorLike> for Texture {
    fn from(color: ColorLike) -> Self {
        Self::Uniform { color }
    }
}

impl From<f64> for Texture {
    fn from(v: f64) -> Self {
        Self::uniform(v)
    }
}

impl From<&str> for Texture {
    fn from(v: &str) -> Self {
        Self::uniform(v)
    }
}

impl From<[f64; 3]> for Texture {
    fn from(v: [f64; 3]) -> Self {
        Self::uniform(v)
    }
}

impl From<Image> for Texture {
    fn from(t: Image) -> Self {
        Self::Image(t)
    }
}

impl From<ScalarField> for Texture {
    fn from(t: ScalarField) -> Self {
        Self::ScalarField(t)
    }
}

impl From<CheckerBoard> for Texture {
    fn from(t: CheckerBoard) -> Self {
        Self::CheckerBoard(t)
    }
}

impl From<Isocontour> for Texture {
    fn from(t: Isocontour) -> Self {
        Self::Isocontour(t)
    }
}
