//! Attribute resolution and scale evaluation.
//!
//! Scales are always evaluated against the frame handed in here. The compiler only calls into
//! this module after a layer's whole transform chain has run, so data-dependent scales
//! (`Normalize` without a domain, `Offset`) see the final frame.

use crate::{
    data::frame::{Attribute, DataFrame},
    foundation::error::{Gg3dError, Gg3dResult},
    grammar::{attribute::AttributeRef, scale::Scale},
};

/// Look up `attr.name` on `frame` and apply its scale.
pub fn resolve_attribute(attr: &AttributeRef, frame: &DataFrame) -> Gg3dResult<Attribute> {
    let base = frame.attribute(&attr.name)?;
    match &attr.scale {
        Some(scale) => scale.apply(base, frame),
        None => Ok(base.clone()),
    }
}

impl Scale {
    /// Apply the scale to every row of `attr`.
    ///
    /// `frame` is used by scales that read other attributes (`Offset`).
    pub fn apply(&self, attr: &Attribute, frame: &DataFrame) -> Gg3dResult<Attribute> {
        let mut out = attr.clone();
        self.apply_in_place(&mut out, frame)?;
        Ok(out)
    }

    fn apply_in_place(&self, attr: &mut Attribute, frame: &DataFrame) -> Gg3dResult<()> {
        match self {
            Scale::Uniform { factor } => {
                attr.values.iter_mut().for_each(|v| *v *= factor);
            }
            Scale::Log { base } => {
                if attr.channels != 1 {
                    return Err(Gg3dError::scale_dimension(format!(
                        "log scale needs a scalar attribute, got {} channels",
                        attr.channels
                    )));
                }
                if *base <= 0.0 || *base == 1.0 {
                    return Err(Gg3dError::validation(format!("invalid log base {base}")));
                }
                for v in &mut attr.values {
                    if *v <= 0.0 {
                        return Err(Gg3dError::scale_dimension(format!(
                            "log scale needs positive values, got {v}"
                        )));
                    }
                    *v = v.log(*base);
                }
            }
            Scale::Clip { domain: (lo, hi) } => {
                if lo > hi {
                    return Err(Gg3dError::validation(format!(
                        "clip domain ({lo}, {hi}) is inverted"
                    )));
                }
                attr.values.iter_mut().for_each(|v| *v = v.clamp(*lo, *hi));
            }
            Scale::Normalize {
                range_min,
                range_max,
                domain_min,
                domain_max,
            } => normalize(attr, range_min, range_max, domain_min, domain_max)?,
            Scale::Affine { matrix } => affine(attr, matrix)?,
            Scale::Offset { offset } => {
                let off = resolve_attribute(offset, frame)?;
                if off.element != attr.element
                    || off.channels != attr.channels
                    || off.values.len() != attr.values.len()
                {
                    return Err(Gg3dError::scale_dimension(format!(
                        "offset attribute '{}' ({:?}, {} channels) does not match the scaled \
                         attribute ({:?}, {} channels)",
                        offset.name, off.element, off.channels, attr.element, attr.channels
                    )));
                }
                for (v, o) in attr.values.iter_mut().zip(&off.values) {
                    *v += o;
                }
            }
            Scale::Custom(f) => {
                let n = attr.channels;
                let mut values = Vec::with_capacity(attr.values.len());
                for row in attr.rows() {
                    let mapped = f.call(row);
                    if mapped.len() != n {
                        return Err(Gg3dError::scale_dimension(format!(
                            "custom scale returned {} values for a {n}-channel row",
                            mapped.len()
                        )));
                    }
                    values.extend(mapped);
                }
                attr.values = values;
            }
            Scale::Chain(steps) => {
                for step in steps {
                    step.apply_in_place(attr, frame)?;
                }
            }
        }
        Ok(())
    }
}

fn broadcast(values: &[f64], channels: usize, what: &str) -> Gg3dResult<Vec<f64>> {
    match values.len() {
        1 => Ok(vec![values[0]; channels]),
        n if n == channels => Ok(values.to_vec()),
        n => Err(Gg3dError::scale_dimension(format!(
            "normalize {what} has {n} values for a {channels}-channel attribute"
        ))),
    }
}

fn normalize(
    attr: &mut Attribute,
    range_min: &[f64],
    range_max: &[f64],
    domain_min: &Option<Vec<f64>>,
    domain_max: &Option<Vec<f64>>,
) -> Gg3dResult<()> {
    let n = attr.channels;
    let rmin = broadcast(range_min, n, "range_min")?;
    let rmax = broadcast(range_max, n, "range_max")?;

    let mut dmin = vec![f64::INFINITY; n];
    let mut dmax = vec![f64::NEG_INFINITY; n];
    if domain_min.is_none() || domain_max.is_none() {
        for row in attr.rows() {
            for (c, v) in row.iter().enumerate() {
                dmin[c] = dmin[c].min(*v);
                dmax[c] = dmax[c].max(*v);
            }
        }
    }
    if let Some(d) = domain_min {
        dmin = broadcast(d, n, "domain_min")?;
    }
    if let Some(d) = domain_max {
        dmax = broadcast(d, n, "domain_max")?;
    }

    for row in attr.values.chunks_exact_mut(n) {
        for (c, v) in row.iter_mut().enumerate() {
            let span = dmax[c] - dmin[c];
            *v = if span == 0.0 {
                rmin[c]
            } else {
                rmin[c] + (*v - dmin[c]) / span * (rmax[c] - rmin[c])
            };
        }
    }
    Ok(())
}

fn affine(attr: &mut Attribute, matrix: &[Vec<f64>]) -> Gg3dResult<()> {
    let n = attr.channels;
    let m = matrix.len();
    if matrix.iter().any(|row| row.len() != m) {
        return Err(Gg3dError::validation("affine scale matrix must be square"));
    }
    if m != n && m != n + 1 {
        return Err(Gg3dError::scale_dimension(format!(
            "affine scale matrix is {m}x{m} but the attribute has {n} channels"
        )));
    }
    let homogeneous = m == n + 1;
    let mut out = vec![0.0; n];
    for row in attr.values.chunks_exact_mut(n) {
        for (i, o) in out.iter_mut().enumerate() {
            let mut acc: f64 = row.iter().zip(&matrix[i]).map(|(v, a)| v * a).sum();
            if homogeneous {
                acc += matrix[i][n];
            }
            *o = acc;
        }
        row.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compile/attribute.rs"]
mod tests;
