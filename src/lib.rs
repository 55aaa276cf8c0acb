//! gg3d is a grammar of graphics for 3D data.
//!
//! A [`Layer`] pairs a [`DataFrame`] (geometry plus named per-element attributes) with a
//! [`Mark`], a set of visual channels and a chain of [`Transform`]s. Layers are immutable and
//! compose with `+`. The compiler resolves every leaf of a layer tree against a [`Defaults`]
//! table, runs its transforms, evaluates scales, textures and materials on the final frame, and
//! emits one renderer-agnostic [`SceneDescription`]:
//!
//! - Build layers with [`Layer::from_data`] and the overwrite operations
//! - Compile with [`compile`] (or [`compile_report`] to keep going past failed leaves)
//! - Hand the scene to a [`Renderer`] via [`render`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compile;
mod config;
mod data;
mod foundation;
mod grammar;
mod render;
mod scene;

pub use crate::foundation::core::{Color, ColorLike, DMat3, DMat4, DVec3};
pub use crate::foundation::error::{CompileFailures, Gg3dError, Gg3dResult, LayerFailure};

pub use crate::data::frame::{Attribute, DataFrame, Element, Usage};
pub use crate::data::loader::{JsonMeshLoader, MeshLoader};

pub use crate::grammar::attribute::AttributeRef;
pub use crate::grammar::channel::{Channel, ChannelSet, EndType, Mark, Size, VectorField};
pub use crate::grammar::layer::{Layer, LayerPath, LayerSpec};
pub use crate::grammar::material::{Bsdf, BumpMap, ChannelKind, Distribution, Material};
pub use crate::grammar::scale::{CustomFn, Scale};
pub use crate::grammar::texture::{
    CheckerBoard, Colormap, Image, ImageSource, Isocontour, ScalarField, Texture, UvPolicy,
};
pub use crate::grammar::transform::{Compute, Condition, Transform, TransformChain};

pub use crate::compile::attribute::resolve_attribute;
pub use crate::compile::defaults::Defaults;
pub use crate::compile::fingerprint::{SceneFingerprint, fingerprint_scene};
pub use crate::compile::material::bind_material;
pub use crate::compile::resolve::{ResolvedLayer, resolve};
pub use crate::compile::scene::{
    CompileOptions, CompileReport, compile, compile_report, compile_with,
};
pub use crate::compile::texture::evaluate_texture;

pub use crate::config::model::{
    Emitter, Film, FovAxis, Integrator, RenderConfig, Sampler, Sensor, SensorFrame, UpAxis,
};
pub use crate::scene::model::{
    BsdfDesc, BsdfParam, BumpMapDesc, CurveDesc, FieldDesc, SceneDescription, ShapeDesc,
    TextureField,
};

pub use crate::render::backend::{JsonSceneWriter, Renderer, render, render_with};

pub use crate::foundation::colormap::{ColorRamp, NAMED_COLORMAPS};
