use crate::foundation::error::{Gg3dError, Gg3dResult};

pub use glam::{DMat3, DMat4, DVec3};

/// Linear RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
}

impl Color {
    /// Build a color from its components.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gray color with all components equal to `v`.
    pub const fn gray(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Parse `#rrggbb` (or `#rgb`) hex notation.
    pub fn from_hex(hex: &str) -> Gg3dResult<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| Gg3dError::validation(format!("hex color '{hex}' must start with '#'")))?;
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => {
                return Err(Gg3dError::validation(format!(
                    "hex color '{hex}' must have 3 or 6 digits"
                )));
            }
        };
        let channel = |i: usize| -> Gg3dResult<f64> {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| Gg3dError::validation(format!("invalid hex color '{hex}'")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Look up a CSS color name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        CSS_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .and_then(|(_, hex)| Self::from_hex(hex).ok())
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Rec. 709 luminance.
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

const CSS_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("lightgray", "#d3d3d3"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("ivory", "#fffff0"),
    ("salmon", "#fa8072"),
    ("steelblue", "#4682b4"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("gold", "#ffd700"),
    ("crimson", "#dc143c"),
    ("forestgreen", "#228b22"),
];

/// Anything that can be turned into a constant color or scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorLike {
    /// A gray level; doubles as a plain scalar for scalar channels.
    Gray(f64),
    /// Explicit RGB triple.
    Rgb([f64; 3]),
    /// `#rrggbb` hex string or a CSS color name.
    Named(String),
}

impl ColorLike {
    /// Resolve to a color.
    pub fn to_color(&self) -> Gg3dResult<Color> {
        match self {
            ColorLike::Gray(v) => Ok(Color::gray(*v)),
            ColorLike::Rgb([r, g, b]) => Ok(Color::new(*r, *g, *b)),
            ColorLike::Named(s) if s.starts_with('#') => Color::from_hex(s),
            ColorLike::Named(s) => {
                Color::named(s).ok_or_else(|| Gg3dError::validation(format!("unknown color '{s}'")))
            }
        }
    }

    /// Resolve to a scalar; only gray levels qualify.
    pub fn to_scalar(&self) -> Gg3dResult<f64> {
        match self {
            ColorLike::Gray(v) => Ok(*v),
            other => Err(Gg3dError::validation(format!(
                "expected a scalar value, got color {other:?}"
            ))),
        }
    }
}

impl From<f64> for ColorLike {
    fn from(v: f64) -> Self {
        ColorLike::Gray(v)
    }
}

impl From<[f64; 3]> for ColorLike {
    fn from(v: [f64; 3]) -> Self {
        ColorLike::Rgb(v)
    }
}

impl From<Color> for ColorLike {
    fn from(c: Color) -> Self {
        ColorLike::Rgb(c.to_array())
    }
}

impl From<&str> for ColorLike {
    fn from(s: &str) -> Self {
        ColorLike::Named(s.to_string())
    }
}

impl From<String> for ColorLike {
    fn from(s: String) -> Self {
        ColorLike::Named(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
