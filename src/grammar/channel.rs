use std::str::FromStr;

use crate::{
    foundation::error::{Gg3dError, Gg3dResult},
    grammar::{attribute::AttributeRef, material::Material},
};

/// Geometric primitive used to draw a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// One sphere per vertex.
    Point,
    /// One curve segment per edge.
    Curve,
    /// Polygonal surface.
    #[default]
    Surface,
}

impl FromStr for Mark {
    type Err = Gg3dError;

    fn from_str(s: &str) -> Gg3dResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(Mark::Point),
            "curve" => Ok(Mark::Curve),
            "surface" => Ok(Mark::Surface),
            _ => Err(Gg3dError::validation(format!("unknown mark '{s}'"))),
        }
    }
}

/// Point radius or curve width.
#[derive(Clone, Debug)]
pub enum Size {
    /// Same size everywhere.
    Constant(f64),
    /// Per-element size from a scalar attribute.
    Attribute(AttributeRef),
}

impl From<f64> for Size {
    fn from(v: f64) -> Self {
        Size::Constant(v)
    }
}

impl From<&str> for Size {
    fn from(name: &str) -> Self {
        Size::Attribute(name.into())
    }
}

impl From<AttributeRef> for Size {
    fn from(attr: AttributeRef) -> Self {
        Size::Attribute(attr)
    }
}

/// How vector-field curves end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndType {
    /// Radius tapers to zero at the tip.
    #[default]
    Point,
    /// Constant radius.
    Flat,
}

/// Arrows drawn from each element along a 3-channel attribute.
#[derive(Clone, Debug)]
pub struct VectorField {
    /// Vector attribute on vertices or facets.
    pub data: AttributeRef,
    /// Extra interior control points per curve.
    pub refinement_level: u32,
    /// Tip style.
    pub end_type: EndType,
    /// Curve base radius; falls back to the layer defaults.
    pub size: Option<f64>,
}

impl VectorField {
    /// Straight arrows with pointed tips.
    pub fn new(data: impl Into<AttributeRef>) -> Self {
        Self {
            data: data.into(),
            refinement_level: 0,
            end_type: EndType::default(),
            size: None,
        }
    }

    /// Set the refinement level.
    pub fn refinement_level(mut self, level: u32) -> Self {
        self.refinement_level = level;
        self
    }

    /// Set the tip style.
    pub fn end_type(mut self, end_type: EndType) -> Self {
        self.end_type = end_type;
        self
    }

    /// Set the base radius.
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }
}

/// One visual channel.
#[derive(Clone, Debug)]
pub enum Channel {
    /// Replacement vertex positions.
    Position(AttributeRef),
    /// Shading normals.
    Normal(AttributeRef),
    /// Point/curve size.
    Size(Size),
    /// Arrow glyphs.
    VectorField(VectorField),
    /// Surface appearance.
    Material(Material),
}

/// At most one channel of each kind.
#[derive(Clone, Debug, Default)]
pub struct ChannelSet {
    /// Position channel.
    pub position: Option<AttributeRef>,
    /// Normal channel.
    pub normal: Option<AttributeRef>,
    /// Size channel.
    pub size: Option<Size>,
    /// Vector-field channel.
    pub vector_field: Option<VectorField>,
    /// Material channel.
    pub material: Option<Material>,
}

impl ChannelSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position channel.
    pub fn position(mut self, attr: impl Into<AttributeRef>) -> Self {
        self.position = Some(attr.into());
        self
    }

    /// Set the normal channel.
    pub fn normal(mut self, attr: impl Into<AttributeRef>) -> Self {
        self.normal = Some(attr.into());
        self
    }

    /// Set the size channel.
    pub fn size(mut self, size: impl Into<Size>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the vector-field channel.
    pub fn vector_field(mut self, field: VectorField) -> Self {
        self.vector_field = Some(field);
        self
    }

    /// Set the material channel.
    pub fn material(mut self, material: impl Into<Material>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set one channel by value.
    pub fn with(self, channel: Channel) -> Self {
        match channel {
            Channel::Position(a) => self.position(a),
            Channel::Normal(a) => self.normal(a),
            Channel::Size(s) => self.size(s),
            Channel::VectorField(v) => self.vector_field(v),
            Channel::Material(m) => self.material(m),
        }
    }

    /// `true` when no channel is set.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.normal.is_none()
            && self.size.is_none()
            && self.vector_field.is_none()
            && self.material.is_none()
    }

    /// Take every channel set in `newer`; channels it leaves unset keep their current value.
    pub(crate) fn overlay(&mut self, newer: &ChannelSet) {
        fn take<T: Clone>(slot: &mut Option<T>, newer: &Option<T>) {
            if newer.is_some() {
                slot.clone_from(newer);
            }
        }
        take(&mut self.position, &newer.position);
        take(&mut self.normal, &newer.normal);
        take(&mut self.size, &newer.size);
        take(&mut self.vector_field, &newer.vector_field);
        take(&mut self.material, &newer.material);
    }
}

impl From<Channel> for ChannelSet {
    fn from(channel: Channel) -> Self {
        ChannelSet::new().with(channel)
    }
}

impl From<Material> for ChannelSet {
    fn from(material: Material) -> Self {
        ChannelSet::new().material(material)
    }
}
