//! Renderer-agnostic compiled scene.
//!
//! Everything here is plain data produced by the compiler; consumers serialize it or translate it
//! into their own scene format.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    config::model::{Emitter, Film, Integrator, Sampler, Sensor},
    data::frame::Element,
    grammar::channel::Mark,
};

/// Per-element values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDesc {
    /// Element the values live on.
    pub element: Element,
    /// Values per element.
    pub channels: usize,
    /// Row-major values.
    pub values: Vec<f64>,
}

/// An evaluated texture.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureField {
    /// Same value everywhere: 3 components for colors, 1 for scalars.
    Uniform {
        /// Components.
        value: Vec<f64>,
    },
    /// One row per element.
    PerElement(FieldDesc),
}

impl TextureField {
    /// Components per element.
    pub fn channels(&self) -> usize {
        match self {
            TextureField::Uniform { value } => value.len(),
            TextureField::PerElement(f) => f.channels,
        }
    }

    /// Element of a per-element field.
    pub fn element(&self) -> Option<Element> {
        match self {
            TextureField::Uniform { .. } => None,
            TextureField::PerElement(f) => Some(f.element),
        }
    }
}

/// A bound BSDF parameter.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BsdfParam {
    /// Data channel.
    Texture(TextureField),
    /// Numeric parameter.
    Float(f64),
    /// Named parameter (distribution, metal name).
    Text(String),
}

/// Evaluated bump map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BumpMapDesc {
    /// Height field.
    pub texture: TextureField,
    /// Height multiplier.
    pub scale: f64,
}

/// A material with every channel evaluated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BsdfDesc {
    /// Variant name, e.g. `"diffuse"`.
    pub kind: String,
    /// Two-sided shading.
    pub two_sided: bool,
    /// Data channels and non-data parameters by name.
    pub params: BTreeMap<String, BsdfParam>,
    /// Bump map, if any.
    pub bump_map: Option<BumpMapDesc>,
}

impl BsdfDesc {
    /// Parameter by name.
    pub fn param(&self, name: &str) -> Option<&BsdfParam> {
        self.params.get(name)
    }
}

/// One polyline with per-point radius.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveDesc {
    /// Control points.
    pub points: Vec<[f64; 3]>,
    /// Radius at each control point.
    pub radii: Vec<f64>,
}

/// A renderable primitive group.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    /// Polygon mesh.
    Mesh {
        /// Source leaf.
        layer: String,
        /// Vertex positions.
        vertices: Vec<[f64; 3]>,
        /// Facets.
        facets: Vec<Vec<u32>>,
        /// Shading normals from the normal channel.
        normals: Option<FieldDesc>,
        /// Material.
        bsdf: BsdfDesc,
    },
    /// Spheres, one per point.
    Spheres {
        /// Source leaf.
        layer: String,
        /// Sphere centers.
        centers: Vec<[f64; 3]>,
        /// Sphere radii.
        radii: Vec<f64>,
        /// Material.
        bsdf: BsdfDesc,
    },
    /// Curves.
    Curves {
        /// Source leaf.
        layer: String,
        /// Curve list.
        curves: Vec<CurveDesc>,
        /// Material.
        bsdf: BsdfDesc,
    },
}

impl ShapeDesc {
    /// Source leaf path.
    pub fn layer(&self) -> &str {
        match self {
            ShapeDesc::Mesh { layer, .. }
            | ShapeDesc::Spheres { layer, .. }
            | ShapeDesc::Curves { layer, .. } => layer,
        }
    }

    /// Material.
    pub fn bsdf(&self) -> &BsdfDesc {
        match self {
            ShapeDesc::Mesh { bsdf, .. }
            | ShapeDesc::Spheres { bsdf, .. }
            | ShapeDesc::Curves { bsdf, .. } => bsdf,
        }
    }

    /// Mark that produces this shape kind.
    pub fn mark(&self) -> Mark {
        match self {
            ShapeDesc::Mesh { .. } => Mark::Surface,
            ShapeDesc::Spheres { .. } => Mark::Point,
            ShapeDesc::Curves { .. } => Mark::Curve,
        }
    }

    pub(crate) fn points(&self) -> Box<dyn Iterator<Item = &[f64; 3]> + '_> {
        match self {
            ShapeDesc::Mesh { vertices, .. } => Box::new(vertices.iter()),
            ShapeDesc::Spheres { centers, .. } => Box::new(centers.iter()),
            ShapeDesc::Curves { curves, .. } => Box::new(curves.iter().flat_map(|c| c.points.iter())),
        }
    }
}

/// The compiled scene: shapes in data space plus global settings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneDescription {
    /// Camera.
    pub sensor: Sensor,
    /// Output image.
    pub film: Film,
    /// Pixel sampler.
    pub sampler: Sampler,
    /// Lights.
    pub emitters: Vec<Emitter>,
    /// Light transport, with the albedo AOV wrapper applied when requested.
    pub integrator: Integrator,
    /// Column-major 4x4 data-to-world transform applied to every shape.
    pub to_world: [[f64; 4]; 4],
    /// Shapes in tree order.
    pub shapes: Vec<ShapeDesc>,
}
