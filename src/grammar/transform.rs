//! Declarative data-frame transforms.
//!
//! Transforms compose with `*` into a [`TransformChain`] that runs left to right. Evaluation lives
//! in the compiler; these types only describe what to do.

use std::{fmt, ops::Mul, sync::Arc};

use crate::{
    foundation::core::{DMat3, DMat4, DVec3},
    grammar::attribute::AttributeRef,
};

/// Opaque per-element predicate used by [`Transform::Filter`].
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&[f64]) -> bool + Send + Sync>);

impl Condition {
    /// Wrap a closure receiving one element's row.
    pub fn new(f: impl Fn(&[f64]) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn test(&self, row: &[f64]) -> bool {
        (self.0)(row)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// Derived attributes requested by [`Transform::Compute`]; each field names the new attribute.
#[derive(Clone, Debug, Default)]
pub struct Compute {
    /// Vertex x coordinate.
    pub x: Option<String>,
    /// Vertex y coordinate.
    pub y: Option<String>,
    /// Vertex z coordinate.
    pub z: Option<String>,
    /// Facet normal stored on corners (flat shading normals).
    pub normal: Option<String>,
    /// Area-weighted vertex normal.
    pub vertex_normal: Option<String>,
    /// Facet normal.
    pub facet_normal: Option<String>,
    /// Connected component id per facet.
    pub component: Option<String>,
}

impl Compute {
    /// Request the connected component id under `name`.
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            component: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One data-frame to data-frame operation.
#[derive(Clone, Debug)]
pub enum Transform {
    /// Keep elements whose attribute row satisfies `condition`.
    Filter {
        /// Tested attribute; vertex positions when `None`.
        data: Option<AttributeRef>,
        /// Predicate.
        condition: Condition,
    },
    /// Replace the geometry by its UV parameterization.
    UvMesh {
        /// Per-corner 2D attribute; the frame's first UV attribute when `None`.
        uv: Option<AttributeRef>,
    },
    /// Homogeneous transform of positions, normals and tangents.
    Affine {
        /// 4x4 matrix.
        matrix: DMat4,
    },
    /// Append derived attributes.
    Compute(Compute),
    /// Move facet groups away from the bounding-box center.
    Explode {
        /// Facet attribute whose value identifies the piece.
        pieces: String,
        /// Displacement factor.
        magnitude: f64,
    },
    /// Append the row-wise p-norm of a vector attribute.
    Norm {
        /// Vector attribute.
        data: String,
        /// Name of the appended scalar attribute.
        norm_attr_name: String,
        /// Norm order, at least 1.
        order: u32,
    },
}

impl Transform {
    /// [`Transform::Filter`] on a named attribute.
    pub fn filter(
        data: impl Into<AttributeRef>,
        condition: impl Fn(&[f64]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Filter {
            data: Some(data.into()),
            condition: Condition::new(condition),
        }
    }

    /// [`Transform::Filter`] on vertex positions.
    pub fn filter_positions(condition: impl Fn(&[f64]) -> bool + Send + Sync + 'static) -> Self {
        Self::Filter {
            data: None,
            condition: Condition::new(condition),
        }
    }

    /// [`Transform::UvMesh`] using the frame's UV attribute.
    pub fn uv_mesh() -> Self {
        Self::UvMesh { uv: None }
    }

    /// [`Transform::Affine`] from a 4x4 matrix.
    pub fn affine(matrix: DMat4) -> Self {
        Self::Affine { matrix }
    }

    /// [`Transform::Affine`] from a 3x3 linear map.
    pub fn linear(matrix: DMat3) -> Self {
        Self::Affine {
            matrix: DMat4::from_mat3(matrix),
        }
    }

    /// Rotation by `angle` radians about `axis`.
    pub fn rotation(axis: DVec3, angle: f64) -> Self {
        Self::affine(DMat4::from_axis_angle(axis.normalize_or_zero(), angle))
    }

    /// Translation by `offset`.
    pub fn translation(offset: DVec3) -> Self {
        Self::affine(DMat4::from_translation(offset))
    }

    /// Uniform scaling by `factor`.
    pub fn scaling(factor: f64) -> Self {
        Self::affine(DMat4::from_scale(DVec3::splat(factor)))
    }

    /// [`Transform::Explode`].
    pub fn explode(pieces: impl Into<String>, magnitude: f64) -> Self {
        Self::Explode {
            pieces: pieces.into(),
            magnitude,
        }
    }

    /// Euclidean [`Transform::Norm`].
    pub fn norm(data: impl Into<String>, norm_attr_name: impl Into<String>) -> Self {
        Self::Norm {
            data: data.into(),
            norm_attr_name: norm_attr_name.into(),
            order: 2,
        }
    }
}

/// Ordered list of transforms, applied left to right.
#[derive(Clone, Debug, Default)]
pub struct TransformChain(pub Vec<Transform>);

impl TransformChain {
    /// Empty (identity) chain.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Number of transforms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the identity chain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Transforms in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.0.iter()
    }

    pub(crate) fn extend_from(&mut self, other: &TransformChain) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl From<Transform> for TransformChain {
    fn from(t: Transform) -> Self {
        Self(vec![t])
    }
}

impl Mul for Transform {
    type Output = TransformChain;

    fn mul(self, rhs: Transform) -> TransformChain {
        TransformChain(vec![self, rhs])
    }
}

impl Mul<Transform> for TransformChain {
    type Output = TransformChain;

    fn mul(mut self, rhs: Transform) -> TransformChain {
        self.0.push(rhs);
        self
    }
}

impl Mul<TransformChain> for Transform {
    type Output = TransformChain;

    fn mul(self, mut rhs: TransformChain) -> TransformChain {
        rhs.0.insert(0, self);
        rhs
    }
}

impl Mul for TransformChain {
    type Output = TransformChain;

    fn mul(mut self, rhs: TransformChain) -> TransformChain {
        self.0.extend(rhs.0);
        self
    }
}
