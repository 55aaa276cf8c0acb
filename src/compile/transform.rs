//! Transform evaluation. Every transform maps a frame to a new frame; the input is never modified.

use std::collections::HashMap;

use crate::{
    compile::attribute::resolve_attribute,
    data::frame::{Attribute, DataFrame, Element, Remap, Usage},
    foundation::{
        core::{DMat3, DMat4, DVec3},
        error::{Gg3dError, Gg3dResult},
        math::p_norm,
    },
    grammar::{
        attribute::AttributeRef,
        transform::{Compute, Condition, Transform, TransformChain},
    },
};

impl TransformChain {
    /// Apply every transform in order, left to right.
    pub fn apply(&self, frame: &DataFrame) -> Gg3dResult<DataFrame> {
        let mut current = frame.clone();
        for t in self.iter() {
            current = t.apply(&current)?;
        }
        Ok(current)
    }
}

impl Transform {
    /// Produce the transformed frame.
    pub fn apply(&self, frame: &DataFrame) -> Gg3dResult<DataFrame> {
        match self {
            Transform::Filter { data, condition } => filter(frame, data.as_ref(), condition),
            Transform::UvMesh { uv } => uv_mesh(frame, uv.as_ref()),
            Transform::Affine { matrix } => affine(frame, matrix),
            Transform::Compute(compute) => compute_attributes(frame, compute),
            Transform::Explode { pieces, magnitude } => explode(frame, pieces, *magnitude),
            Transform::Norm {
                data,
                norm_attr_name,
                order,
            } => norm(frame, data, norm_attr_name, *order),
        }
    }
}

fn filter(
    frame: &DataFrame,
    data: Option<&AttributeRef>,
    condition: &Condition,
) -> Gg3dResult<DataFrame> {
    let Some(data) = data else {
        let keep: Vec<bool> = frame
            .vertices()
            .iter()
            .map(|v| condition.test(&v.to_array()))
            .collect();
        return frame.extract_vertices(&keep);
    };

    if data.scale.is_some() {
        tracing::warn!(attribute = %data.name, "scale is ignored when filtering");
    }
    let attr = frame.attribute(&data.name)?;
    match attr.element {
        Element::Vertex => {
            let keep: Vec<bool> = attr.rows().map(|row| condition.test(row)).collect();
            frame.extract_vertices(&keep)
        }
        Element::Facet => {
            let keep: Vec<usize> = attr
                .rows()
                .enumerate()
                .filter(|(_, row)| condition.test(row))
                .map(|(i, _)| i)
                .collect();
            frame.extract_facets(&keep)
        }
        other => Err(Gg3dError::transform_precondition(format!(
            "filter does not support {other:?} attribute '{}'",
            data.name
        ))),
    }
}

fn uv_mesh(frame: &DataFrame, uv: Option<&AttributeRef>) -> Gg3dResult<DataFrame> {
    let (name, uv_attr) = match uv {
        Some(r) => {
            if !frame.has_attribute(&r.name) {
                return Err(Gg3dError::transform_precondition(format!(
                    "uv attribute '{}' does not exist",
                    r.name
                )));
            }
            (r.name.clone(), resolve_attribute(r, frame)?)
        }
        None => {
            let (name, attr) = frame.find_attribute_by_usage(Usage::Uv).ok_or_else(|| {
                Gg3dError::transform_precondition("frame has no uv attribute")
            })?;
            (name.to_string(), attr.clone())
        }
    };
    if uv_attr.element != Element::Corner || uv_attr.channels != 2 {
        return Err(Gg3dError::transform_precondition(format!(
            "uv attribute '{name}' must be a 2-channel corner attribute, got {} channels on {:?}",
            uv_attr.channels, uv_attr.element
        )));
    }

    // One vertex per distinct uv value, in order of first appearance.
    let mut index = HashMap::<(u64, u64), u32>::new();
    let mut vertices = Vec::new();
    let mut vertex_map = Vec::new();
    let mut facets = Vec::with_capacity(frame.num_facets());
    let mut corner = 0;
    for facet in frame.facets() {
        let mut out = Vec::with_capacity(facet.len());
        for &v in facet {
            let row = uv_attr.row(corner);
            let key = (row[0].to_bits(), row[1].to_bits());
            let id = *index.entry(key).or_insert_with(|| {
                vertices.push(DVec3::new(row[0], row[1], 0.0));
                vertex_map.push(v as usize);
                (vertices.len() - 1) as u32
            });
            out.push(id);
            corner += 1;
        }
        facets.push(out);
    }

    let mut source = frame.clone();
    let edge_attrs: Vec<String> = source
        .attributes()
        .filter(|(_, a)| a.element == Element::Edge)
        .map(|(n, _)| n.to_string())
        .collect();
    for n in edge_attrs {
        source.remove_attribute(&n);
    }
    source.remapped(
        vertices,
        facets,
        &Remap {
            vertex: vertex_map,
            facet: (0..frame.num_facets()).collect(),
        },
    )
}

fn affine(frame: &DataFrame, matrix: &DMat4) -> Gg3dResult<DataFrame> {
    let linear = DMat3::from_mat4(*matrix);
    let normal_matrix = (linear.determinant() != 0.0).then(|| linear.inverse().transpose());

    let mut out = frame.clone();
    out.set_vertices(
        frame
            .vertices()
            .iter()
            .map(|v| matrix.transform_point3(*v))
            .collect(),
    );
    for (name, attr) in out.attributes_mut() {
        let usage = attr.usage;
        if attr.channels != 3 || !matches!(usage, Usage::Position | Usage::Normal | Usage::Tangent)
        {
            continue;
        }
        if usage == Usage::Normal && normal_matrix.is_none() {
            return Err(Gg3dError::transform_precondition(format!(
                "cannot transform normal attribute '{name}' by a singular matrix"
            )));
        }
        for row in attr.values.chunks_exact_mut(3) {
            let v = DVec3::new(row[0], row[1], row[2]);
            let t = match (usage, normal_matrix) {
                (Usage::Position, _) => matrix.transform_point3(v),
                (Usage::Normal, Some(n)) => (n * v).normalize_or_zero(),
                _ => linear * v,
            };
            row.copy_from_slice(&t.to_array());
        }
    }
    Ok(out)
}

fn require_facets(frame: &DataFrame, what: &str) -> Gg3dResult<()> {
    if frame.num_facets() == 0 {
        return Err(Gg3dError::transform_precondition(format!(
            "{what} requires a frame with facets"
        )));
    }
    Ok(())
}

fn compute_attributes(frame: &DataFrame, compute: &Compute) -> Gg3dResult<DataFrame> {
    let mut out = frame.clone();

    let mut add = |name: &Option<String>,
                   make: &dyn Fn(&DataFrame) -> Gg3dResult<Attribute>|
     -> Gg3dResult<()> {
        let Some(name) = name else {
            return Ok(());
        };
        if out.has_attribute(name) {
            return Err(Gg3dError::transform_precondition(format!(
                "attribute '{name}' already exists"
            )));
        }
        let attr = make(&out)?;
        out.add_attribute(name.clone(), attr)
    };

    for (axis, name) in [&compute.x, &compute.y, &compute.z].into_iter().enumerate() {
        add(name, &|f: &DataFrame| -> Gg3dResult<Attribute> {
            Ok(Attribute::scalar(
                Element::Vertex,
                f.vertices().iter().map(|v| v[axis]).collect(),
            ))
        })?;
    }
    add(&compute.facet_normal, &|f: &DataFrame| -> Gg3dResult<Attribute> {
        require_facets(f, "facet normal")?;
        let normals: Vec<DVec3> = (0..f.num_facets()).map(|i| f.facet_normal(i)).collect();
        Ok(Attribute::from_vec3(Element::Facet, Usage::Normal, &normals))
    })?;
    add(&compute.normal, &|f: &DataFrame| -> Gg3dResult<Attribute> {
        require_facets(f, "corner normal")?;
        let normals: Vec<DVec3> = f
            .facets()
            .iter()
            .enumerate()
            .flat_map(|(i, facet)| std::iter::repeat_n(f.facet_normal(i), facet.len()))
            .collect();
        Ok(Attribute::from_vec3(Element::Corner, Usage::Normal, &normals))
    })?;
    add(&compute.vertex_normal, &|f: &DataFrame| -> Gg3dResult<Attribute> {
        require_facets(f, "vertex normal")?;
        Ok(Attribute::from_vec3(
            Element::Vertex,
            Usage::Normal,
            &vertex_normals(f),
        ))
    })?;
    add(&compute.component, &|f: &DataFrame| -> Gg3dResult<Attribute> {
        require_facets(f, "component")?;
        Ok(Attribute::scalar(Element::Facet, facet_components(f)))
    })?;
    Ok(out)
}

/// Area-weighted average of incident facet normals.
pub(crate) fn vertex_normals(frame: &DataFrame) -> Vec<DVec3> {
    let mut acc = vec![DVec3::ZERO; frame.num_vertices()];
    for (i, facet) in frame.facets().iter().enumerate() {
        let n = frame.facet_area_vector(i);
        for &v in facet {
            acc[v as usize] += n;
        }
    }
    acc.into_iter().map(DVec3::normalize_or_zero).collect()
}

/// Vertex-connected component id per facet, numbered in order of first facet.
fn facet_components(frame: &DataFrame) -> Vec<f64> {
    let mut parent: Vec<usize> = (0..frame.num_vertices()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    for facet in frame.facets() {
        let first = find(&mut parent, facet[0] as usize);
        for &v in &facet[1..] {
            let r = find(&mut parent, v as usize);
            parent[r] = first;
        }
    }

    let mut labels = HashMap::new();
    frame
        .facets()
        .iter()
        .map(|facet| {
            let root = find(&mut parent, facet[0] as usize);
            let next = labels.len();
            *labels.entry(root).or_insert(next) as f64
        })
        .collect()
}

fn explode(frame: &DataFrame, pieces: &str, magnitude: f64) -> Gg3dResult<DataFrame> {
    let attr = frame.attribute(pieces)?;
    if attr.element != Element::Facet || attr.channels != 1 {
        return Err(Gg3dError::transform_precondition(format!(
            "explode pieces '{pieces}' must be a scalar facet attribute"
        )));
    }
    if let Some(bad) = attr.values.iter().find(|v| !v.is_finite()) {
        return Err(Gg3dError::transform_precondition(format!(
            "explode pieces '{pieces}' has non-finite piece id {bad}, facets are not partitioned"
        )));
    }

    // Piece index per facet, pieces numbered in order of first facet.
    let mut piece_ids = HashMap::<u64, usize>::new();
    let piece_of: Vec<usize> = attr
        .values
        .iter()
        .map(|v| {
            let key = (v + 0.0).to_bits();
            let next = piece_ids.len();
            *piece_ids.entry(key).or_insert(next)
        })
        .collect();

    let n_pieces = piece_ids.len();
    let mut centroid_sum = vec![DVec3::ZERO; n_pieces];
    let mut facet_count = vec![0usize; n_pieces];
    for (f, &p) in piece_of.iter().enumerate() {
        centroid_sum[p] += frame.facet_centroid(f);
        facet_count[p] += 1;
    }
    let center = frame.bbox().center();
    let offsets: Vec<DVec3> = centroid_sum
        .iter()
        .zip(&facet_count)
        .map(|(sum, &count)| (*sum / count as f64 - center) * magnitude)
        .collect();

    // Vertices shared between pieces are duplicated so each piece moves rigidly.
    let mut index = HashMap::<(usize, u32), u32>::new();
    let mut vertices = Vec::new();
    let mut vertex_map = Vec::new();
    let facets: Vec<Vec<u32>> = frame
        .facets()
        .iter()
        .zip(&piece_of)
        .map(|(facet, &p)| {
            facet
                .iter()
                .map(|&v| {
                    *index.entry((p, v)).or_insert_with(|| {
                        vertices.push(frame.vertices()[v as usize] + offsets[p]);
                        vertex_map.push(v as usize);
                        (vertices.len() - 1) as u32
                    })
                })
                .collect::<Vec<u32>>()
        })
        .collect();

    frame.remapped(
        vertices,
        facets,
        &Remap {
            vertex: vertex_map,
            facet: (0..frame.num_facets()).collect(),
        },
    )
}

fn norm(frame: &DataFrame, data: &str, target: &str, order: u32) -> Gg3dResult<DataFrame> {
    if order == 0 {
        return Err(Gg3dError::validation("norm order must be at least 1"));
    }
    if frame.has_attribute(target) {
        return Err(Gg3dError::transform_precondition(format!(
            "attribute '{target}' already exists"
        )));
    }
    let attr = frame.attribute(data)?;
    let values = attr.rows().map(|row| p_norm(row, order)).collect();
    let mut out = frame.clone();
    out.add_attribute(target, Attribute::scalar(attr.element, values))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/transform.rs"]
mod tests;
