//! Scene compilation: resolve every leaf, run its transforms, evaluate its channels, and gather
//! the resulting shapes into one [`SceneDescription`].

use std::f64::consts::FRAC_PI_2;

use rayon::prelude::*;

use crate::{
    compile::{
        attribute::resolve_attribute,
        defaults::Defaults,
        material::bind_material,
        resolve::{ResolvedLayer, resolve},
        texture::retarget_field,
    },
    config::model::{RenderConfig, UpAxis},
    data::frame::{DataFrame, Element},
    foundation::{
        core::{DMat4, DVec3},
        error::{CompileFailures, Gg3dError, Gg3dResult, LayerFailure},
        math::{Bbox, row_to_vec3},
    },
    grammar::{
        channel::{EndType, Mark, Size, VectorField},
        layer::Layer,
    },
    scene::model::{
        BsdfDesc, BsdfParam, CurveDesc, FieldDesc, SceneDescription, ShapeDesc, TextureField,
    },
};

/// Compilation controls.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Compile independent leaves on a rayon pool.
    pub parallel: bool,
    /// Worker count when `parallel`; rayon's default when `None`.
    pub threads: Option<usize>,
    /// Values for unset layer components.
    pub defaults: Defaults,
}

/// Result of a compilation that tolerates leaf failures.
#[derive(Debug)]
pub struct CompileReport {
    /// Scene built from the leaves that compiled.
    pub scene: SceneDescription,
    /// Leaves that failed, in tree order.
    pub failures: CompileFailures,
}

/// Compile `root` with default options; fails if any leaf fails.
pub fn compile(root: &Layer, config: &RenderConfig) -> Gg3dResult<SceneDescription> {
    compile_with(root, config, &CompileOptions::default())
}

/// Compile `root`; fails with [`Gg3dError::Compile`] listing every failed leaf.
pub fn compile_with(
    root: &Layer,
    config: &RenderConfig,
    opts: &CompileOptions,
) -> Gg3dResult<SceneDescription> {
    let report = compile_report(root, config, opts)?;
    if !report.failures.is_empty() {
        return Err(Gg3dError::Compile(report.failures));
    }
    Ok(report.scene)
}

/// Compile every leaf of `root`, keeping the shapes of leaves that succeed.
///
/// Only an invalid `config` (or thread pool setup) fails the whole call.
#[tracing::instrument(skip(root, config, opts), fields(leaves = root.leaf_count()))]
pub fn compile_report(
    root: &Layer,
    config: &RenderConfig,
    opts: &CompileOptions,
) -> Gg3dResult<CompileReport> {
    config.validate()?;
    let resolved = resolve(root, &opts.defaults);

    let results: Vec<Result<Vec<ShapeDesc>, LayerFailure>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| resolved.into_par_iter().map(compile_leaf).collect())
    } else {
        resolved.into_iter().map(compile_leaf).collect()
    };

    let mut shapes = Vec::new();
    let mut failures = Vec::new();
    for r in results {
        match r {
            Ok(s) => shapes.extend(s),
            Err(f) => {
                tracing::warn!(layer = %f.path, error = %f.error, "layer failed to compile");
                failures.push(f);
            }
        }
    }

    let to_world = world_transform(&shapes, config.up_axis);
    let scene = SceneDescription {
        sensor: config.sensor.clone(),
        film: config.film.clone(),
        sampler: config.sampler.clone(),
        emitters: config.emitters.clone(),
        integrator: config.effective_integrator(),
        to_world: to_world.to_cols_array_2d(),
        shapes,
    };
    tracing::info!(
        shapes = scene.shapes.len(),
        failures = failures.len(),
        "scene compiled"
    );
    Ok(CompileReport {
        scene,
        failures: CompileFailures(failures),
    })
}

fn build_thread_pool(threads: Option<usize>) -> Gg3dResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(Gg3dError::validation(
            "compile threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::Error::new(e).context("build rayon thread pool").into())
}

fn compile_leaf(
    leaf: Result<ResolvedLayer, LayerFailure>,
) -> Result<Vec<ShapeDesc>, LayerFailure> {
    let layer = leaf?;
    compile_layer(&layer).map_err(|error| LayerFailure {
        path: layer.path.clone(),
        error,
    })
}

/// Shapes emitted by one resolved leaf.
fn compile_layer(layer: &ResolvedLayer) -> Gg3dResult<Vec<ShapeDesc>> {
    let frame = layer.transform.apply(&layer.data)?;
    let name = layer.path.to_string();
    let positions = positions(layer, &frame)?;
    let bsdf = bind_material(&layer.material, &frame)?;

    let mut shapes = Vec::with_capacity(2);
    if let Some(field) = &layer.vector_field {
        shapes.push(vector_field_shape(field, &frame, &positions, &name, &bsdf)?);
    }
    let main = match layer.mark {
        Mark::Surface => {
            if frame.num_facets() == 0 && frame.num_vertices() > 0 {
                return Err(Gg3dError::validation("surface mark needs a frame with facets"));
            }
            require_elements(
                &bsdf,
                &[Element::Vertex, Element::Facet, Element::Corner],
                "surface",
            )?;
            let normals = match &layer.normal {
                Some(r) => {
                    let attr = resolve_attribute(r, &frame)?;
                    if attr.channels != 3 || attr.element == Element::Edge {
                        return Err(Gg3dError::scale_dimension(format!(
                            "normal attribute '{}' must have 3 channels on vertices, facets or \
                             corners",
                            r.name
                        )));
                    }
                    Some(FieldDesc {
                        element: attr.element,
                        channels: 3,
                        values: attr.values,
                    })
                }
                None => None,
            };
            ShapeDesc::Mesh {
                layer: name,
                vertices: positions.iter().map(|p| p.to_array()).collect(),
                facets: frame.facets().to_vec(),
                normals,
                bsdf,
            }
        }
        Mark::Point => {
            require_elements(&bsdf, &[Element::Vertex], "point")?;
            ShapeDesc::Spheres {
                layer: name,
                centers: positions.iter().map(|p| p.to_array()).collect(),
                radii: vertex_sizes(&layer.size, &frame)?,
                bsdf,
            }
        }
        Mark::Curve => {
            require_elements(&bsdf, &[Element::Vertex, Element::Edge], "curve")?;
            let edges = frame.edges();
            let radii = edge_sizes(&layer.size, &frame, &edges)?;
            let curves = edges
                .iter()
                .zip(radii)
                .map(|(&[a, b], r)| CurveDesc {
                    points: vec![
                        positions[a as usize].to_array(),
                        positions[b as usize].to_array(),
                    ],
                    radii: r.to_vec(),
                })
                .collect();
            ShapeDesc::Curves {
                layer: name,
                curves,
                bsdf,
            }
        }
    };
    shapes.insert(0, main);
    Ok(shapes)
}

fn positions(layer: &ResolvedLayer, frame: &DataFrame) -> Gg3dResult<Vec<DVec3>> {
    let Some(r) = &layer.position else {
        return Ok(frame.vertices().to_vec());
    };
    let attr = resolve_attribute(r, frame)?;
    if attr.element != Element::Vertex || attr.channels != 3 {
        return Err(Gg3dError::scale_dimension(format!(
            "position attribute '{}' must be a 3-channel vertex attribute",
            r.name
        )));
    }
    Ok(attr.rows().map(row_to_vec3).collect())
}

fn require_elements(bsdf: &BsdfDesc, allowed: &[Element], mark: &str) -> Gg3dResult<()> {
    let bump = bsdf.bump_map.iter().map(|b| ("bump_map", &b.texture));
    for (name, field) in texture_params(bsdf).chain(bump) {
        if let Some(e) = field.element()
            && !allowed.contains(&e)
        {
            return Err(Gg3dError::validation(format!(
                "{mark} marks cannot use a {e:?} field for material channel '{name}'"
            )));
        }
    }
    Ok(())
}

fn texture_params(bsdf: &BsdfDesc) -> impl Iterator<Item = (&str, &TextureField)> {
    bsdf.params.iter().filter_map(|(name, param)| match param {
        BsdfParam::Texture(field) => Some((name.as_str(), field)),
        _ => None,
    })
}

/// The layer material with every field moved onto the vector field's sample element.
fn curve_material(bsdf: &BsdfDesc, target: Element, frame: &DataFrame) -> Gg3dResult<BsdfDesc> {
    let mut out = bsdf.clone();
    for param in out.params.values_mut() {
        if let BsdfParam::Texture(field) = param {
            *field = retarget_field(field, target, frame)?;
        }
    }
    if let Some(bump) = &mut out.bump_map {
        bump.texture = retarget_field(&bump.texture, target, frame)?;
    }
    Ok(out)
}

fn scalar_sizes(size: &Size, frame: &DataFrame) -> Gg3dResult<(Element, Vec<f64>)> {
    match size {
        Size::Constant(v) => Ok((Element::Vertex, vec![*v; frame.num_vertices()])),
        Size::Attribute(r) => {
            let attr = resolve_attribute(r, frame)?;
            if attr.channels != 1 {
                return Err(Gg3dError::scale_dimension(format!(
                    "size attribute '{}' must be scalar, got {} channels",
                    r.name, attr.channels
                )));
            }
            Ok((attr.element, attr.values))
        }
    }
}

fn vertex_sizes(size: &Size, frame: &DataFrame) -> Gg3dResult<Vec<f64>> {
    match scalar_sizes(size, frame)? {
        (Element::Vertex, values) => Ok(values),
        (e, _) => Err(Gg3dError::validation(format!(
            "point size must be a vertex attribute, got {e:?}"
        ))),
    }
}

fn edge_sizes(size: &Size, frame: &DataFrame, edges: &[[u32; 2]]) -> Gg3dResult<Vec<[f64; 2]>> {
    match scalar_sizes(size, frame)? {
        (Element::Vertex, v) => Ok(edges
            .iter()
            .map(|&[a, b]| [v[a as usize], v[b as usize]])
            .collect()),
        (Element::Edge, v) => Ok(v.iter().map(|&r| [r, r]).collect()),
        (e, _) => Err(Gg3dError::validation(format!(
            "curve size must be a vertex or edge attribute, got {e:?}"
        ))),
    }
}

/// One curve per field sample, from the sample base along its vector.
fn vector_field_shape(
    field: &VectorField,
    frame: &DataFrame,
    positions: &[DVec3],
    layer: &str,
    bsdf: &BsdfDesc,
) -> Gg3dResult<ShapeDesc> {
    let data = resolve_attribute(&field.data, frame)?;
    if data.channels != 3 {
        return Err(Gg3dError::scale_dimension(format!(
            "vector field '{}' must have 3 channels, got {}",
            field.data.name, data.channels
        )));
    }
    let bases: Vec<DVec3> = match data.element {
        Element::Vertex => positions.to_vec(),
        Element::Facet => frame
            .facets()
            .iter()
            .map(|f| f.iter().map(|&v| positions[v as usize]).sum::<DVec3>() / f.len() as f64)
            .collect(),
        other => {
            return Err(Gg3dError::validation(format!(
                "vector field '{}' must live on vertices or facets, got {other:?}",
                field.data.name
            )));
        }
    };
    let bsdf = curve_material(bsdf, data.element, frame)?;

    let radius = field.size.unwrap_or_default();
    let n = field.refinement_level as usize + 2;
    let curves = bases
        .iter()
        .zip(data.rows())
        .map(|(base, row)| {
            let dir = row_to_vec3(row);
            let mut points = Vec::with_capacity(n);
            let mut radii = Vec::with_capacity(n);
            for k in 0..n {
                let t = k as f64 / (n - 1) as f64;
                points.push((*base + dir * t).to_array());
                radii.push(match field.end_type {
                    EndType::Point => radius * (1.0 - t),
                    EndType::Flat => radius,
                });
            }
            CurveDesc { points, radii }
        })
        .collect();
    Ok(ShapeDesc::Curves {
        layer: layer.to_string(),
        curves,
        bsdf,
    })
}

/// Fit the union of all shapes into `[-1, 1]^3` and turn `up_axis` into +Y.
fn world_transform(shapes: &[ShapeDesc], up_axis: UpAxis) -> DMat4 {
    let mut bbox = Bbox::empty();
    for shape in shapes {
        for p in shape.points() {
            bbox.extend(DVec3::from_array(*p));
        }
    }
    let fit = if bbox.is_empty() {
        DMat4::IDENTITY
    } else {
        let extent = bbox.extent().max_element();
        let scale = if extent > 0.0 { 2.0 / extent } else { 1.0 };
        DMat4::from_scale(DVec3::splat(scale)) * DMat4::from_translation(-bbox.center())
    };
    match up_axis {
        UpAxis::Y => fit,
        UpAxis::Z => DMat4::from_rotation_x(-FRAC_PI_2) * fit,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/scene.rs"]
mod tests;
