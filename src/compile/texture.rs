//! Texture evaluation: turn a [`Texture`] into a constant or per-element field on a frame.

use std::sync::Arc;

use anyhow::Context;

use crate::{
    compile::attribute::resolve_attribute,
    data::frame::{Attribute, DataFrame, Element, Usage},
    foundation::{
        colormap::{ColorRamp, DEFAULT_QUALITATIVE_PALETTE, NAMED_COLORMAPS, qualitative_palette},
        core::{Color, ColorLike},
        error::{Gg3dError, Gg3dResult},
    },
    grammar::{
        attribute::AttributeRef,
        material::ChannelKind,
        scale::Scale,
        texture::{Colormap, Image, ImageSource, ScalarField, Texture, UvPolicy},
    },
    scene::model::{FieldDesc, TextureField},
};

/// Evaluate `texture` on `frame` for a channel of the given kind.
///
/// Color channels produce 3 components per element, scalar channels 1.
pub fn evaluate_texture(
    texture: &Texture,
    frame: &DataFrame,
    kind: ChannelKind,
) -> Gg3dResult<TextureField> {
    match texture {
        Texture::Uniform { color } => uniform(color, kind),
        Texture::Image(img) => image_field(img, frame, kind),
        Texture::ScalarField(sf) => scalar_field(sf, frame, kind),
        Texture::CheckerBoard(cb) => {
            let uv = uv_attribute(cb.uv.as_ref(), frame)?;
            let size = f64::from(cb.size);
            let mask: Vec<bool> = uv
                .rows()
                .map(|row| {
                    let parity = (row[0] * size).floor() + (row[1] * size).floor();
                    (parity as i64).rem_euclid(2) == 0
                })
                .collect();
            select(uv.element, &mask, &cb.texture1, &cb.texture2, frame, kind)
        }
        Texture::Isocontour(iso) => {
            let data = resolve_attribute(&iso.data, frame)?;
            if data.channels != 1 {
                return Err(Gg3dError::scale_dimension(format!(
                    "isocontour needs a scalar attribute, '{}' has {} channels",
                    iso.data.name, data.channels
                )));
            }
            let n = f64::from(iso.num_contours);
            let mask: Vec<bool> = data
                .values
                .iter()
                .map(|v| {
                    let x = v * n;
                    x - x.floor() < iso.ratio
                })
                .collect();
            select(data.element, &mask, &iso.texture1, &iso.texture2, frame, kind)
        }
    }
}

fn uniform(color: &ColorLike, kind: ChannelKind) -> Gg3dResult<TextureField> {
    let value = match kind {
        ChannelKind::Color => color.to_color()?.to_array().to_vec(),
        ChannelKind::Scalar => vec![color.to_scalar()?],
    };
    Ok(TextureField::Uniform { value })
}

fn per_element(element: Element, kind: ChannelKind, colors: Vec<Color>) -> TextureField {
    let (channels, values) = match kind {
        ChannelKind::Color => (3, colors.iter().flat_map(|c| c.to_array()).collect()),
        ChannelKind::Scalar => (1, colors.iter().map(|c| c.luminance()).collect()),
    };
    TextureField::PerElement(FieldDesc {
        element,
        channels,
        values,
    })
}

fn uv_attribute(uv: Option<&AttributeRef>, frame: &DataFrame) -> Gg3dResult<Attribute> {
    let attr = match uv {
        Some(r) => resolve_attribute(r, frame)?,
        None => frame
            .find_attribute_by_usage(Usage::Uv)
            .map(|(_, a)| a.clone())
            .ok_or_else(|| Gg3dError::attribute_not_found("uv"))?,
    };
    if attr.channels != 2 {
        return Err(Gg3dError::scale_dimension(format!(
            "uv attribute must have 2 channels, got {}",
            attr.channels
        )));
    }
    Ok(attr)
}

fn load_image(source: &ImageSource) -> Gg3dResult<Arc<image::RgbImage>> {
    match source {
        ImageSource::Memory(img) => Ok(Arc::clone(img)),
        ImageSource::Path(path) => {
            let img = image::open(path)
                .with_context(|| format!("open image texture '{}'", path.display()))?;
            Ok(Arc::new(img.to_rgb8()))
        }
    }
}

fn image_field(img: &Image, frame: &DataFrame, kind: ChannelKind) -> Gg3dResult<TextureField> {
    let uv = uv_attribute(img.uv.as_ref(), frame)?;
    let pixels = load_image(&img.source)?;
    let (w, h) = pixels.dimensions();
    if w == 0 || h == 0 {
        return Err(Gg3dError::validation("image texture is empty"));
    }

    let mut colors = Vec::with_capacity(uv.len());
    for row in uv.rows() {
        let (mut u, mut v) = (row[0], row[1]);
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            match img.uv_policy {
                UvPolicy::Error => return Err(Gg3dError::UvOutOfRange { u, v }),
                UvPolicy::Clamp => {
                    u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
                    v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
                }
            }
        }
        // Nearest texel; image rows run top to bottom, v runs bottom to top.
        let x = ((u * f64::from(w)) as u32).min(w - 1);
        let y = (((1.0 - v) * f64::from(h)) as u32).min(h - 1);
        let [r, g, b] = pixels.get_pixel(x, y).0;
        colors.push(Color::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        ));
    }
    Ok(per_element(uv.element, kind, colors))
}

fn scalar_field(sf: &ScalarField, frame: &DataFrame, kind: ChannelKind) -> Gg3dResult<TextureField> {
    let data = resolve_attribute(&sf.data, frame)?;

    if matches!(&sf.colormap, Colormap::Named(name) if name == "identity") {
        if data.channels != 3 || kind != ChannelKind::Color {
            return Err(Gg3dError::scale_dimension(format!(
                "identity colormap needs a 3-channel attribute on a color channel, '{}' has {} \
                 channels",
                sf.data.name, data.channels
            )));
        }
        return Ok(TextureField::PerElement(FieldDesc {
            element: data.element,
            channels: 3,
            values: data.values,
        }));
    }

    if data.channels != 1 {
        return Err(Gg3dError::scale_dimension(format!(
            "scalar field needs a 1-channel attribute, '{}' has {} channels",
            sf.data.name, data.channels
        )));
    }

    if sf.categories {
        let palette = categorical_palette(&sf.colormap)?;
        let colors = data
            .values
            .iter()
            .map(|v| {
                let idx = (v.round() as i64).rem_euclid(palette.len() as i64) as usize;
                palette[idx]
            })
            .collect();
        return Ok(per_element(data.element, kind, colors));
    }

    let mut steps = Vec::new();
    if let Some((lo, hi)) = sf.domain {
        steps.push(Scale::clip(lo, hi));
    }
    let (range_min, range_max) = sf.range.unwrap_or((0.0, 1.0));
    let mut normalize = Scale::normalize(range_min, range_max);
    if let Some((lo, hi)) = sf.domain {
        normalize = normalize.with_domain(vec![lo], vec![hi]);
    }
    steps.push(normalize);
    let normalized = Scale::Chain(steps).apply(&data, frame)?;

    if kind == ChannelKind::Scalar {
        return Ok(TextureField::PerElement(FieldDesc {
            element: normalized.element,
            channels: 1,
            values: normalized.values,
        }));
    }
    let ramp = match &sf.colormap {
        Colormap::Named(name) => ColorRamp::named(name)?,
        Colormap::Colors(colors) => ColorRamp::new(
            colors
                .iter()
                .map(ColorLike::to_color)
                .collect::<Gg3dResult<Vec<_>>>()?,
        )?,
    };
    let colors = normalized.values.iter().map(|t| ramp.sample(*t)).collect();
    Ok(per_element(normalized.element, kind, colors))
}

fn categorical_palette(colormap: &Colormap) -> Gg3dResult<Vec<Color>> {
    let palette = match colormap {
        Colormap::Colors(colors) => colors
            .iter()
            .map(ColorLike::to_color)
            .collect::<Gg3dResult<Vec<_>>>()?,
        Colormap::Named(name) => match qualitative_palette(name) {
            Some(palette) => palette,
            // Continuous maps have no categorical form.
            None if NAMED_COLORMAPS.contains(&name.as_str()) => {
                qualitative_palette(DEFAULT_QUALITATIVE_PALETTE).unwrap_or_default()
            }
            None => {
                return Err(Gg3dError::validation(format!(
                    "unknown categorical colormap '{name}'"
                )));
            }
        },
    };
    if palette.is_empty() {
        return Err(Gg3dError::validation("categorical palette is empty"));
    }
    Ok(palette)
}

/// Pick `texture1` where `mask` is set and `texture2` elsewhere.
fn select(
    element: Element,
    mask: &[bool],
    texture1: &Texture,
    texture2: &Texture,
    frame: &DataFrame,
    kind: ChannelKind,
) -> Gg3dResult<TextureField> {
    let a = evaluate_texture(texture1, frame, kind)?;
    let b = evaluate_texture(texture2, frame, kind)?;

    // Fields living on different elements are combined per corner.
    let same = [a.element(), b.element()]
        .into_iter()
        .flatten()
        .all(|e| e == element);
    let target = if same { element } else { Element::Corner };
    let mask = rows_on(
        &TextureField::PerElement(FieldDesc {
            element,
            channels: 1,
            values: mask.iter().map(|&m| f64::from(u8::from(m))).collect(),
        }),
        target,
        frame,
    )?;
    let a = rows_on(&a, target, frame)?;
    let b = rows_on(&b, target, frame)?;
    let channels = match kind {
        ChannelKind::Color => 3,
        ChannelKind::Scalar => 1,
    };

    let mut values = Vec::with_capacity(mask.len() * channels);
    for (i, m) in mask.iter().enumerate() {
        let src = if *m > 0.5 { &a } else { &b };
        values.extend_from_slice(&src[i * channels..(i + 1) * channels]);
    }
    Ok(TextureField::PerElement(FieldDesc {
        element: target,
        channels,
        values,
    }))
}

/// Expand a field to one row per `target` element.
fn rows_on(field: &TextureField, target: Element, frame: &DataFrame) -> Gg3dResult<Vec<f64>> {
    let count = frame.element_count(target);
    let FieldDesc {
        element,
        channels,
        values,
    } = match field {
        TextureField::Uniform { value } => {
            return Ok(value.iter().copied().cycle().take(value.len() * count).collect());
        }
        TextureField::PerElement(f) => f,
    };
    let row = |i: usize| &values[i * channels..(i + 1) * channels];
    match (*element, target) {
        (e, t) if e == t => Ok(values.clone()),
        (Element::Vertex, Element::Corner) => Ok(frame
            .facets()
            .iter()
            .flatten()
            .flat_map(|&v| row(v as usize).iter().copied())
            .collect()),
        (Element::Facet, Element::Corner) => Ok(frame
            .facets()
            .iter()
            .enumerate()
            .flat_map(|(f, facet)| {
                std::iter::repeat_n(row(f), facet.len()).flat_map(|r| r.iter().copied())
            })
            .collect()),
        (from, to) => Err(Gg3dError::validation(format!(
            "cannot combine a {from:?} texture field with a {to:?} selection"
        ))),
    }
}

/// Express `field` on `target`, averaging corner rows where several corners map to one element.
pub(crate) fn retarget_field(
    field: &TextureField,
    target: Element,
    frame: &DataFrame,
) -> Gg3dResult<TextureField> {
    let (element, channels) = match field {
        TextureField::PerElement(f) if f.element != target => (f.element, f.channels),
        _ => return Ok(field.clone()),
    };
    if target == Element::Corner {
        return Ok(TextureField::PerElement(FieldDesc {
            element: target,
            channels,
            values: rows_on(field, target, frame)?,
        }));
    }
    if target == Element::Edge || element == Element::Edge {
        return Err(Gg3dError::validation(format!(
            "cannot move a {element:?} texture field onto {target:?} elements"
        )));
    }

    let corners = rows_on(field, Element::Corner, frame)?;
    let count = frame.element_count(target);
    let mut sums = vec![0.0; count * channels];
    let mut hits = vec![0usize; count];
    for (c, &(f, v)) in corner_owners(frame).iter().enumerate() {
        let i = if target == Element::Facet { f } else { v };
        hits[i] += 1;
        for k in 0..channels {
            sums[i * channels + k] += corners[c * channels + k];
        }
    }
    if let Some(i) = hits.iter().position(|&h| h == 0) {
        return Err(Gg3dError::validation(format!(
            "{target:?} {i} has no corners to take a {element:?} texture value from"
        )));
    }
    for (i, &h) in hits.iter().enumerate() {
        sums[i * channels..(i + 1) * channels]
            .iter_mut()
            .for_each(|s| *s /= h as f64);
    }
    Ok(TextureField::PerElement(FieldDesc {
        element: target,
        channels,
        values: sums,
    }))
}

/// `(facet, vertex)` of every corner, in corner order.
fn corner_owners(frame: &DataFrame) -> Vec<(usize, usize)> {
    frame
        .facets()
        .iter()
        .enumerate()
        .flat_map(|(f, facet)| facet.iter().map(move |&v| (f, v as usize)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/texture.rs"]
mod tests;
