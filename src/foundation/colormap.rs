//! Named continuous colormaps and qualitative palettes.

use crate::foundation::core::Color;
use crate::foundation::error::{Gg3dError, Gg3dResult};

/// A colormap linearly interpolating evenly spaced color samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    samples: Vec<Color>,
}

impl ColorRamp {
    /// Build a ramp; at least two samples are required.
    pub fn new(samples: Vec<Color>) -> Gg3dResult<Self> {
        if samples.len() < 2 {
            return Err(Gg3dError::validation(
                "colormap must have at least 2 color samples",
            ));
        }
        Ok(Self { samples })
    }

    /// Look up one of the built-in maps by name.
    pub fn named(name: &str) -> Gg3dResult<Self> {
        let table = match name {
            "viridis" => VIRIDIS,
            "magma" => MAGMA,
            "inferno" => INFERNO,
            "plasma" => PLASMA,
            "turbo" => TURBO,
            "coolwarm" => COOLWARM,
            _ => {
                return Err(Gg3dError::validation(format!("unknown colormap '{name}'")));
            }
        };
        Ok(Self {
            samples: table.iter().map(|&[r, g, b]| Color::new(r, g, b)).collect(),
        })
    }

    /// Sample the map at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = (self.samples.len() - 1) as f64;
        let x = t * n;
        let i0 = x.floor() as usize;
        let i1 = x.ceil() as usize;
        self.samples[i0].lerp(self.samples[i1], x - i0 as f64)
    }
}

/// Names accepted by [`ColorRamp::named`].
pub const NAMED_COLORMAPS: &[&str] = &["viridis", "magma", "inferno", "plasma", "turbo", "coolwarm"];

/// Qualitative palette used for categorical data.
pub fn qualitative_palette(name: &str) -> Option<Vec<Color>> {
    let hex: &[&str] = match name {
        "tab10" => &TAB10,
        "set1" => &SET1,
        _ => return None,
    };
    hex.iter().map(|h| Color::from_hex(h).ok()).collect()
}

/// Palette used when categorical data names a continuous map.
pub const DEFAULT_QUALITATIVE_PALETTE: &str = "tab10";

const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const SET1: [&str; 9] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
];

const VIRIDIS: &[[f64; 3]] = &[
    [0.267004, 0.004874, 0.329415],
    [0.282623, 0.140926, 0.457517],
    [0.253935, 0.265254, 0.529983],
    [0.206756, 0.371758, 0.553117],
    [0.163625, 0.471133, 0.558148],
    [0.127568, 0.566949, 0.550556],
    [0.134692, 0.658636, 0.517649],
    [0.266941, 0.748751, 0.440573],
    [0.477504, 0.821444, 0.318195],
    [0.741388, 0.873449, 0.149561],
    [0.993248, 0.906157, 0.143936],
];

const MAGMA: &[[f64; 3]] = &[
    [0.001462, 0.000466, 0.013866],
    [0.078815, 0.054184, 0.211667],
    [0.232077, 0.059889, 0.437695],
    [0.390384, 0.100379, 0.501864],
    [0.550287, 0.161158, 0.505719],
    [0.716387, 0.214982, 0.475290],
    [0.868793, 0.287728, 0.409303],
    [0.967671, 0.439703, 0.359810],
    [0.994738, 0.624350, 0.427397],
    [0.995131, 0.827052, 0.585701],
    [0.987053, 0.991438, 0.749504],
];

const INFERNO: &[[f64; 3]] = &[
    [0.001462, 0.000466, 0.013866],
    [0.087411, 0.044556, 0.224813],
    [0.258234, 0.038571, 0.406485],
    [0.416331, 0.090203, 0.432943],
    [0.578304, 0.148039, 0.404411],
    [0.735683, 0.215906, 0.330245],
    [0.865006, 0.316822, 0.226055],
    [0.954506, 0.468744, 0.099874],
    [0.987622, 0.645320, 0.039886],
    [0.964394, 0.843848, 0.273391],
    [0.988362, 0.998364, 0.644924],
];

const PLASMA: &[[f64; 3]] = &[
    [0.050383, 0.029803, 0.527975],
    [0.254627, 0.013882, 0.615419],
    [0.417642, 0.000564, 0.658390],
    [0.562738, 0.051545, 0.641509],
    [0.692840, 0.165141, 0.564522],
    [0.798216, 0.280197, 0.469538],
    [0.881443, 0.392529, 0.383229],
    [0.949217, 0.517763, 0.295662],
    [0.988260, 0.652325, 0.211364],
    [0.988648, 0.809579, 0.145357],
    [0.940015, 0.975158, 0.131326],
];

const TURBO: &[[f64; 3]] = &[
    [0.189950, 0.071760, 0.232170],
    [0.275970, 0.387070, 0.852600],
    [0.159950, 0.681780, 0.958560],
    [0.101710, 0.902830, 0.733560],
    [0.393600, 0.990500, 0.365570],
    [0.643620, 0.989990, 0.233560],
    [0.880510, 0.844150, 0.204240],
    [0.992560, 0.622500, 0.162450],
    [0.924840, 0.358200, 0.066640],
    [0.749250, 0.143610, 0.019470],
    [0.479600, 0.015830, 0.010550],
];

const COOLWARM: &[[f64; 3]] = &[
    [0.229806, 0.298718, 0.753683],
    [0.354067, 0.472869, 0.897406],
    [0.554276, 0.690467, 0.995536],
    [0.738099, 0.830409, 0.974030],
    [0.865395, 0.865396, 0.865396],
    [0.956871, 0.779103, 0.688098],
    [0.956871, 0.598033, 0.477323],
    [0.865000, 0.403000, 0.316000],
    [0.705673, 0.015556, 0.150233],
];
