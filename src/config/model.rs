//! Render configuration handed to the scene consumer alongside the compiled shapes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{Gg3dError, Gg3dResult};

fn default_location() -> [f64; 3] {
    [0.0, 0.0, 5.0]
}

fn default_y_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_z_up() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_fov() -> f64 {
    28.8415
}

fn default_one() -> f64 {
    1.0
}

fn default_rotation() -> f64 {
    180.0
}

fn default_max_depth() -> i32 {
    -1
}

fn default_rr_depth() -> u32 {
    5
}

fn default_samples() -> u32 {
    1
}

fn default_sample_count() -> u32 {
    32
}

fn default_true() -> bool {
    true
}

/// Camera placement shared by all sensor kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorFrame {
    /// Eye position.
    pub location: [f64; 3],
    /// Look-at point.
    pub target: [f64; 3],
    /// Up direction.
    pub up: [f64; 3],
    /// Near clip distance.
    pub near_clip: f64,
    /// Far clip distance.
    pub far_clip: f64,
}

impl Default for SensorFrame {
    fn default() -> Self {
        Self {
            location: default_location(),
            target: [0.0; 3],
            up: default_y_up(),
            near_clip: 1e-2,
            far_clip: 1e4,
        }
    }
}

/// Axis along which the field of view is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FovAxis {
    /// Horizontal.
    #[default]
    X,
    /// Vertical.
    Y,
}

/// Camera model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sensor {
    /// Pinhole perspective camera.
    Perspective {
        /// Placement.
        #[serde(flatten)]
        frame: SensorFrame,
        /// Field of view in degrees.
        #[serde(default = "default_fov")]
        fov: f64,
        /// Field-of-view axis.
        #[serde(default)]
        fov_axis: FovAxis,
    },
    /// Orthographic camera.
    Orthographic {
        /// Placement.
        #[serde(flatten)]
        frame: SensorFrame,
    },
    /// Perspective camera with depth of field.
    ThinLens {
        /// Placement.
        #[serde(flatten)]
        frame: SensorFrame,
        /// Field of view in degrees.
        #[serde(default = "default_fov")]
        fov: f64,
        /// Field-of-view axis.
        #[serde(default)]
        fov_axis: FovAxis,
        /// Lens aperture radius.
        #[serde(default)]
        aperture_radius: f64,
        /// Focal plane distance.
        #[serde(default)]
        focus_distance: f64,
    },
}

impl Default for Sensor {
    fn default() -> Self {
        Sensor::Perspective {
            frame: SensorFrame::default(),
            fov: default_fov(),
            fov_axis: FovAxis::X,
        }
    }
}

impl Sensor {
    /// Placement of any sensor kind.
    pub fn frame(&self) -> &SensorFrame {
        match self {
            Sensor::Perspective { frame, .. }
            | Sensor::Orthographic { frame }
            | Sensor::ThinLens { frame, .. } => frame,
        }
    }

    fn fov(&self) -> Option<f64> {
        match self {
            Sensor::Perspective { fov, .. } | Sensor::ThinLens { fov, .. } => Some(*fov),
            Sensor::Orthographic { .. } => None,
        }
    }
}

/// Output image settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Film {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Image file format.
    pub file_format: String,
    /// Pixel channel layout.
    pub pixel_format: String,
    /// Crop window origin in pixels.
    pub crop_offset: Option<[u32; 2]>,
    /// Crop window size in pixels.
    pub crop_size: Option<[u32; 2]>,
}

impl Default for Film {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 800,
            file_format: "openexr".to_string(),
            pixel_format: "rgba".to_string(),
            crop_offset: None,
            crop_size: None,
        }
    }
}

/// Pixel sampler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sampler {
    /// Independent random samples.
    Independent {
        /// Samples per pixel.
        #[serde(default = "default_sample_count")]
        sample_count: u32,
        /// Random seed.
        #[serde(default)]
        seed: u64,
    },
    /// Stratified samples.
    Stratified {
        /// Samples per pixel.
        #[serde(default = "default_sample_count")]
        sample_count: u32,
        /// Random seed.
        #[serde(default)]
        seed: u64,
        /// Jitter within strata.
        #[serde(default = "default_true")]
        jitter: bool,
    },
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::Independent {
            sample_count: default_sample_count(),
            seed: 0,
        }
    }
}

impl Sampler {
    /// Samples per pixel.
    pub fn sample_count(&self) -> u32 {
        match self {
            Sampler::Independent { sample_count, .. } | Sampler::Stratified { sample_count, .. } => {
                *sample_count
            }
        }
    }
}

/// Light source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Emitter {
    /// Isotropic point light.
    Point {
        /// RGB intensity.
        intensity: [f64; 3],
        /// Light position.
        position: [f64; 3],
    },
    /// Environment map.
    Envmap {
        /// HDR image; the consumer's built-in map when `None`.
        #[serde(default)]
        filename: Option<PathBuf>,
        /// Intensity multiplier.
        #[serde(default = "default_one")]
        scale: f64,
        /// Up direction of the map.
        #[serde(default = "default_z_up")]
        up: [f64; 3],
        /// Rotation about `up` in degrees.
        #[serde(default = "default_rotation")]
        rotation: f64,
    },
}

impl Emitter {
    /// Environment map with default settings.
    pub fn envmap() -> Self {
        Emitter::Envmap {
            filename: None,
            scale: 1.0,
            up: default_z_up(),
            rotation: default_rotation(),
        }
    }
}

/// Light transport algorithm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Integrator {
    /// Unidirectional path tracer.
    Path {
        /// Maximum path depth, -1 for unbounded.
        #[serde(default = "default_max_depth")]
        max_depth: i32,
        /// Depth at which Russian roulette starts.
        #[serde(default = "default_rr_depth")]
        rr_depth: u32,
        /// Hide directly visible emitters.
        #[serde(default)]
        hide_emitters: bool,
    },
    /// Direct illumination only.
    Direct {
        /// Emitter samples per hit.
        #[serde(default = "default_samples")]
        emitter_samples: u32,
        /// BSDF samples per hit.
        #[serde(default = "default_samples")]
        bsdf_samples: u32,
        /// Hide directly visible emitters.
        #[serde(default)]
        hide_emitters: bool,
    },
    /// Arbitrary output variables on top of another integrator.
    Aov {
        /// AOV specs, e.g. `"albedo:albedo"`.
        aovs: Vec<String>,
        /// Wrapped integrator.
        integrator: Box<Integrator>,
    },
    /// Volumetric path tracer.
    VolPath {
        /// Maximum path depth, -1 for unbounded.
        #[serde(default = "default_max_depth")]
        max_depth: i32,
        /// Depth at which Russian roulette starts.
        #[serde(default = "default_rr_depth")]
        rr_depth: u32,
        /// Hide directly visible emitters.
        #[serde(default)]
        hide_emitters: bool,
    },
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::Path {
            max_depth: default_max_depth(),
            rr_depth: default_rr_depth(),
            hide_emitters: false,
        }
    }
}

/// Which data axis points up in the rendered image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpAxis {
    /// +Y is up.
    #[default]
    Y,
    /// +Z is up.
    Z,
}

/// Everything besides shapes that the scene consumer needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Camera.
    pub sensor: Sensor,
    /// Output image.
    pub film: Film,
    /// Pixel sampler.
    pub sampler: Sampler,
    /// Lights.
    pub emitters: Vec<Emitter>,
    /// Light transport.
    pub integrator: Integrator,
    /// Data up axis.
    pub up_axis: UpAxis,
    /// Render surface albedo instead of shaded color.
    pub albedo_only: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sensor: Sensor::default(),
            film: Film::default(),
            sampler: Sampler::default(),
            emitters: vec![Emitter::envmap()],
            integrator: Integrator::default(),
            up_axis: UpAxis::default(),
            albedo_only: false,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Gg3dResult<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| Gg3dError::serde(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Gg3dResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| Gg3dError::serde(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Gg3dResult<()> {
        let film = &self.film;
        if film.width == 0 || film.height == 0 {
            return Err(Gg3dError::validation("film width and height must be > 0"));
        }
        match (film.crop_offset, film.crop_size) {
            (None, None) => {}
            (Some([x, y]), Some([w, h])) => {
                if w == 0 || h == 0 {
                    return Err(Gg3dError::validation("crop size must be > 0"));
                }
                if u64::from(x) + u64::from(w) > u64::from(film.width)
                    || u64::from(y) + u64::from(h) > u64::from(film.height)
                {
                    return Err(Gg3dError::validation("crop window exceeds the film"));
                }
            }
            _ => {
                return Err(Gg3dError::validation(
                    "crop_offset and crop_size must be set together",
                ));
            }
        }
        if self.sampler.sample_count() == 0 {
            return Err(Gg3dError::validation("sample_count must be > 0"));
        }
        if let Some(fov) = self.sensor.fov()
            && !(fov > 0.0 && fov < 180.0)
        {
            return Err(Gg3dError::validation(format!(
                "fov must be in (0, 180) degrees, got {fov}"
            )));
        }
        let frame = self.sensor.frame();
        if !(frame.near_clip > 0.0 && frame.near_clip < frame.far_clip) {
            return Err(Gg3dError::validation(
                "clip planes must satisfy 0 < near_clip < far_clip",
            ));
        }
        validate_integrator(&self.integrator)
    }

    /// Integrator actually handed to the consumer, honoring `albedo_only`.
    pub fn effective_integrator(&self) -> Integrator {
        if self.albedo_only {
            Integrator::Aov {
                aovs: vec!["albedo:albedo".to_string()],
                integrator: Box::new(self.integrator.clone()),
            }
        } else {
            self.integrator.clone()
        }
    }
}

fn validate_integrator(integrator: &Integrator) -> Gg3dResult<()> {
    match integrator {
        Integrator::Aov { aovs, integrator } => {
            if aovs.is_empty() {
                return Err(Gg3dError::validation("aov integrator needs at least one aov"));
            }
            validate_integrator(integrator)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
