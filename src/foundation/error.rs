use std::fmt;

use crate::grammar::layer::LayerPath;

/// Convenience result type used across gg3d.
pub type Gg3dResult<T> = Result<T, Gg3dError>;

/// Top-level error taxonomy used by grammar and compiler APIs.
#[derive(thiserror::Error, Debug)]
pub enum Gg3dError {
    /// No data frame was set anywhere along a layer path.
    #[error("missing data: no data frame set for layer")]
    MissingData,

    /// A referenced attribute does not exist on the frame (or not on the required element).
    #[error("attribute not found: '{name}'")]
    AttributeNotFound {
        /// Attribute name as referenced by the layer.
        name: String,
    },

    /// A scale was applied to an attribute of incompatible dimension.
    #[error("scale dimension error: {0}")]
    ScaleDimension(String),

    /// A texture was assigned to a channel the material variant does not expose.
    #[error("unsupported channel: material '{material}' does not expose '{channel}'")]
    UnsupportedChannel {
        /// Material variant name.
        material: String,
        /// Requested channel name.
        channel: String,
    },

    /// A UV coordinate fell outside `[0, 1]` under the error policy.
    #[error("uv out of range: ({u}, {v})")]
    UvOutOfRange {
        /// U coordinate.
        u: f64,
        /// V coordinate.
        v: f64,
    },

    /// A transform could not run on the given frame.
    #[error("transform precondition failed: {0}")]
    TransformPrecondition(String),

    /// Invalid user-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// One or more leaf layers failed to compile.
    #[error("{0}")]
    Compile(CompileFailures),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Gg3dError {
    /// Build a [`Gg3dError::AttributeNotFound`] value.
    pub fn attribute_not_found(name: impl Into<String>) -> Self {
        Self::AttributeNotFound { name: name.into() }
    }

    /// Build a [`Gg3dError::ScaleDimension`] value.
    pub fn scale_dimension(msg: impl Into<String>) -> Self {
        Self::ScaleDimension(msg.into())
    }

    /// Build a [`Gg3dError::UnsupportedChannel`] value.
    pub fn unsupported_channel(material: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::UnsupportedChannel {
            material: material.into(),
            channel: channel.into(),
        }
    }

    /// Build a [`Gg3dError::TransformPrecondition`] value.
    pub fn transform_precondition(msg: impl Into<String>) -> Self {
        Self::TransformPrecondition(msg.into())
    }

    /// Build a [`Gg3dError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`Gg3dError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// A failure attributed to one leaf of the layer tree.
#[derive(Debug)]
pub struct LayerFailure {
    /// Position of the failing leaf in the layer tree.
    pub path: LayerPath,
    /// What went wrong.
    pub error: Gg3dError,
}

impl fmt::Display for LayerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}: {}", self.path, self.error)
    }
}

/// All leaf failures of one compilation, in tree order.
#[derive(Debug, Default)]
pub struct CompileFailures(pub Vec<LayerFailure>);

impl CompileFailures {
    /// Number of failed leaves.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no leaf failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate failures in tree order.
    pub fn iter(&self) -> impl Iterator<Item = &LayerFailure> {
        self.0.iter()
    }
}

impl fmt::Display for CompileFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compile error: {} layer(s) failed", self.0.len())?;
        for failure in &self.0 {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
