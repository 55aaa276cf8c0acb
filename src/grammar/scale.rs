//! Declarative value scales.
//!
//! A [`Scale`] is a pure value-to-value function applied to an attribute before it is bound to a
//! channel. Scales compose with `*`: `(s1 * s2)` applies `s1` first.

use std::{fmt, ops::Mul, sync::Arc};

use crate::grammar::attribute::AttributeRef;

/// Opaque row-wise function used by [`Scale::Custom`].
///
/// The function receives one row (all channels of one element) and returns the scaled row, which
/// must have the same length.
#[derive(Clone)]
pub struct CustomFn(Arc<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>);

impl CustomFn {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, row: &[f64]) -> Vec<f64> {
        (self.0)(row)
    }
}

impl fmt::Debug for CustomFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomFn(..)")
    }
}

/// A value transformation applied to attribute rows.
#[derive(Clone, Debug)]
pub enum Scale {
    /// Multiply every value by `factor`.
    Uniform {
        /// Scale factor.
        factor: f64,
    },
    /// Logarithm in `base`; scalar attributes only, values must be positive.
    Log {
        /// Logarithm base.
        base: f64,
    },
    /// Clamp every value into `[domain.0, domain.1]`.
    Clip {
        /// Inclusive bounds.
        domain: (f64, f64),
    },
    /// Affinely map each channel from its domain onto `[range_min, range_max]`.
    ///
    /// Length-1 bounds broadcast across channels. An unset domain is the per-channel min/max of
    /// the attribute being scaled.
    Normalize {
        /// Lower output bound per channel.
        range_min: Vec<f64>,
        /// Upper output bound per channel.
        range_max: Vec<f64>,
        /// Lower input bound per channel.
        domain_min: Option<Vec<f64>>,
        /// Upper input bound per channel.
        domain_max: Option<Vec<f64>>,
    },
    /// Multiply each row by an `n x n` matrix, or an `(n+1) x (n+1)` homogeneous matrix.
    Affine {
        /// Row-major matrix.
        matrix: Vec<Vec<f64>>,
    },
    /// Add another attribute (itself possibly scaled) row by row.
    Offset {
        /// Offset attribute.
        offset: Box<AttributeRef>,
    },
    /// Arbitrary row function.
    Custom(CustomFn),
    /// Apply each scale in order.
    Chain(Vec<Scale>),
}

impl Scale {
    /// [`Scale::Uniform`].
    pub fn uniform(factor: f64) -> Self {
        Self::Uniform { factor }
    }

    /// [`Scale::Log`].
    pub fn log(base: f64) -> Self {
        Self::Log { base }
    }

    /// [`Scale::Clip`].
    pub fn clip(min: f64, max: f64) -> Self {
        Self::Clip { domain: (min, max) }
    }

    /// [`Scale::Normalize`] onto a scalar range with a data-derived domain.
    pub fn normalize(range_min: f64, range_max: f64) -> Self {
        Self::Normalize {
            range_min: vec![range_min],
            range_max: vec![range_max],
            domain_min: None,
            domain_max: None,
        }
    }

    /// Fix the input domain of a [`Scale::Normalize`]; other scales are returned unchanged.
    pub fn with_domain(self, min: Vec<f64>, max: Vec<f64>) -> Self {
        match self {
            Self::Normalize {
                range_min,
                range_max,
                ..
            } => Self::Normalize {
                range_min,
                range_max,
                domain_min: Some(min),
                domain_max: Some(max),
            },
            other => other,
        }
    }

    /// [`Scale::Affine`].
    pub fn affine(matrix: Vec<Vec<f64>>) -> Self {
        Self::Affine { matrix }
    }

    /// [`Scale::Offset`].
    pub fn offset(offset: impl Into<AttributeRef>) -> Self {
        Self::Offset {
            offset: Box::new(offset.into()),
        }
    }

    /// [`Scale::Custom`].
    pub fn custom(f: impl Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static) -> Self {
        Self::Custom(CustomFn::new(f))
    }

    fn into_steps(self) -> Vec<Scale> {
        match self {
            Self::Chain(steps) => steps,
            other => vec![other],
        }
    }
}

impl Mul for Scale {
    type Output = Scale;

    fn mul(self, rhs: Scale) -> Scale {
        let mut steps = self.into_steps();
        steps.extend(rhs.into_steps());
        Scale::Chain(steps)
    }
}
