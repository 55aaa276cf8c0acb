use std::collections::{BTreeMap, HashMap};

use crate::{
    foundation::core::DVec3,
    foundation::error::{Gg3dError, Gg3dResult},
    foundation::math::Bbox,
};

/// Mesh element an attribute is defined on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// One value per vertex.
    Vertex,
    /// One value per facet.
    Facet,
    /// One value per undirected edge, in [`DataFrame::edges`] order.
    Edge,
    /// One value per facet corner, facets in order.
    Corner,
}

/// Semantic usage of an attribute; drives how geometric transforms update it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    /// Plain scalar field.
    Scalar,
    /// Generic vector field.
    Vector,
    /// Point-like vector field (transformed like positions).
    Position,
    /// Normal field (transformed by the inverse transpose).
    Normal,
    /// Tangent field (transformed by the linear part).
    Tangent,
    /// RGB color field.
    Color,
    /// Texture coordinates.
    Uv,
}

/// A named per-element value array.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Element this attribute is defined on.
    pub element: Element,
    /// Semantic usage.
    pub usage: Usage,
    /// Values per element (1 for scalars).
    pub channels: usize,
    /// Row-major values, `channels` per element.
    pub values: Vec<f64>,
}

impl Attribute {
    /// Build an attribute, checking that `values` splits into whole rows.
    pub fn new(element: Element, usage: Usage, channels: usize, values: Vec<f64>) -> Gg3dResult<Self> {
        if channels == 0 {
            return Err(Gg3dError::validation("attribute must have at least one channel"));
        }
        if values.len() % channels != 0 {
            return Err(Gg3dError::validation(format!(
                "attribute value count {} is not a multiple of {channels} channels",
                values.len()
            )));
        }
        Ok(Self {
            element,
            usage,
            channels,
            values,
        })
    }

    /// One-channel scalar attribute.
    pub fn scalar(element: Element, values: Vec<f64>) -> Self {
        Self {
            element,
            usage: Usage::Scalar,
            channels: 1,
            values,
        }
    }

    /// Three-channel attribute from vectors.
    pub fn from_vec3(element: Element, usage: Usage, rows: &[DVec3]) -> Self {
        Self {
            element,
            usage,
            channels: 3,
            values: rows.iter().flat_map(|v| v.to_array()).collect(),
        }
    }

    /// Number of rows (elements).
    pub fn len(&self) -> usize {
        self.values.len() / self.channels
    }

    /// `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values of row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.channels..(i + 1) * self.channels]
    }

    /// Iterate rows in element order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.channels)
    }

    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        let mut values = Vec::with_capacity(rows.len() * self.channels);
        for &r in rows {
            values.extend_from_slice(self.row(r));
        }
        Self {
            element: self.element,
            usage: self.usage,
            channels: self.channels,
            values,
        }
    }
}

/// Geometry (vertices + polygonal facets) plus named per-element attributes.
///
/// A frame is treated as an immutable value by the compiler: transforms always produce a new frame.
/// Facets may have any arity >= 3; a frame without facets is a point cloud.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataFrame {
    vertices: Vec<DVec3>,
    #[serde(default)]
    facets: Vec<Vec<u32>>,
    #[serde(default)]
    attributes: BTreeMap<String, Attribute>,
}

/// New-to-old index maps produced by topology-changing operations.
pub(crate) struct Remap {
    pub(crate) vertex: Vec<usize>,
    pub(crate) facet: Vec<usize>,
}

impl DataFrame {
    /// Build a frame from geometry, validating facet indices.
    pub fn new(vertices: Vec<DVec3>, facets: Vec<Vec<u32>>) -> Gg3dResult<Self> {
        let frame = Self {
            vertices,
            facets,
            attributes: BTreeMap::new(),
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Frame with vertices only.
    pub fn point_cloud(vertices: Vec<DVec3>) -> Self {
        Self {
            vertices,
            facets: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Axis-aligned cube spanning `[0, 1]^3` with outward-facing quads.
    ///
    /// Carries a facet attribute `id` numbering the six faces `0..6` in the order
    /// -z, +z, -y, +y, -x, +x.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ];
        let facets = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![3, 7, 6, 2],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "id".to_string(),
            Attribute::scalar(Element::Facet, (0..6).map(f64::from).collect()),
        );
        Self {
            vertices,
            facets,
            attributes,
        }
    }

    /// Check facet indices and attribute lengths.
    pub fn validate(&self) -> Gg3dResult<()> {
        let n = self.vertices.len();
        for (fi, facet) in self.facets.iter().enumerate() {
            if facet.len() < 3 {
                return Err(Gg3dError::validation(format!(
                    "facet {fi} has {} vertices, need at least 3",
                    facet.len()
                )));
            }
            if let Some(&v) = facet.iter().find(|&&v| v as usize >= n) {
                return Err(Gg3dError::validation(format!(
                    "facet {fi} references vertex {v} but frame has {n} vertices"
                )));
            }
        }
        for (name, attr) in &self.attributes {
            self.check_attribute(name, attr)?;
        }
        Ok(())
    }

    fn check_attribute(&self, name: &str, attr: &Attribute) -> Gg3dResult<()> {
        if attr.channels == 0 || attr.values.len() % attr.channels != 0 {
            return Err(Gg3dError::validation(format!(
                "attribute '{name}' has malformed value storage"
            )));
        }
        let expected = self.element_count(attr.element);
        if attr.len() != expected {
            return Err(Gg3dError::validation(format!(
                "attribute '{name}' has {} rows but frame has {expected} {:?} elements",
                attr.len(),
                attr.element
            )));
        }
        Ok(())
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Facets as vertex index lists.
    pub fn facets(&self) -> &[Vec<u32>] {
        &self.facets
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of facets.
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Number of facet corners.
    pub fn num_corners(&self) -> usize {
        self.facets.iter().map(Vec::len).sum()
    }

    /// Number of elements of the given type.
    pub fn element_count(&self, element: Element) -> usize {
        match element {
            Element::Vertex => self.num_vertices(),
            Element::Facet => self.num_facets(),
            Element::Corner => self.num_corners(),
            Element::Edge => self.edges().len(),
        }
    }

    /// `true` if an attribute with this name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Gg3dResult<&Attribute> {
        self.attributes
            .get(name)
            .ok_or_else(|| Gg3dError::attribute_not_found(name))
    }

    /// Look up an attribute that must live on `element`.
    pub fn attribute_on(&self, name: &str, element: Element) -> Gg3dResult<&Attribute> {
        match self.attributes.get(name) {
            Some(attr) if attr.element == element => Ok(attr),
            _ => Err(Gg3dError::attribute_not_found(format!("{name} ({element:?})"))),
        }
    }

    /// All attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First attribute (in name order) with the given usage.
    pub fn find_attribute_by_usage(&self, usage: Usage) -> Option<(&str, &Attribute)> {
        self.attributes().find(|(_, a)| a.usage == usage)
    }

    /// Insert or replace an attribute after checking its length against the geometry.
    pub fn add_attribute(&mut self, name: impl Into<String>, attr: Attribute) -> Gg3dResult<()> {
        let name = name.into();
        self.check_attribute(&name, &attr)?;
        self.attributes.insert(name, attr);
        Ok(())
    }

    /// Builder-style [`DataFrame::add_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Gg3dResult<Self> {
        self.add_attribute(name, attr)?;
        Ok(self)
    }

    /// Remove an attribute, returning it.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    /// `base`, or `base_1`, `base_2`, ... whichever is not taken yet.
    pub fn unique_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut count = 0;
        while self.has_attribute(&name) {
            count += 1;
            name = format!("{base}_{count}");
        }
        name
    }

    pub(crate) fn set_vertices(&mut self, vertices: Vec<DVec3>) {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        self.vertices = vertices;
    }

    pub(crate) fn attributes_mut(&mut self) -> impl Iterator<Item = (&str, &mut Attribute)> {
        self.attributes.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Offset of each facet's first corner, plus a trailing total.
    pub fn corner_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.facets.len() + 1);
        let mut acc = 0;
        offsets.push(0);
        for f in &self.facets {
            acc += f.len();
            offsets.push(acc);
        }
        offsets
    }

    /// Unique undirected edges `[min, max]` in order of first appearance along facet boundaries.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut seen = HashMap::<(u32, u32), usize>::new();
        let mut edges = Vec::new();
        for facet in &self.facets {
            for (i, &a) in facet.iter().enumerate() {
                let b = facet[(i + 1) % facet.len()];
                let key = (a.min(b), a.max(b));
                if !seen.contains_key(&key) {
                    seen.insert(key, edges.len());
                    edges.push([key.0, key.1]);
                }
            }
        }
        edges
    }

    fn edge_index(&self) -> HashMap<(u32, u32), usize> {
        self.edges()
            .into_iter()
            .enumerate()
            .map(|(i, [a, b])| ((a, b), i))
            .collect()
    }

    /// Mean of the facet's vertex positions.
    pub fn facet_centroid(&self, facet: usize) -> DVec3 {
        let f = &self.facets[facet];
        let sum: DVec3 = f.iter().map(|&v| self.vertices[v as usize]).sum();
        sum / f.len() as f64
    }

    /// Newell's method: normal direction scaled by twice the facet area.
    pub(crate) fn facet_area_vector(&self, facet: usize) -> DVec3 {
        let f = &self.facets[facet];
        let mut n = DVec3::ZERO;
        for (i, &a) in f.iter().enumerate() {
            let p = self.vertices[a as usize];
            let q = self.vertices[f[(i + 1) % f.len()] as usize];
            n += p.cross(q);
        }
        n
    }

    /// Unit facet normal (zero for degenerate facets).
    pub fn facet_normal(&self, facet: usize) -> DVec3 {
        self.facet_area_vector(facet).normalize_or_zero()
    }

    pub(crate) fn bbox(&self) -> Bbox {
        Bbox::from_points(&self.vertices)
    }

    /// Keep the listed facets (in the given order) and the vertices they reference.
    pub fn extract_facets(&self, keep: &[usize]) -> Gg3dResult<Self> {
        let mut old_to_new = vec![u32::MAX; self.vertices.len()];
        let mut used = vec![false; self.vertices.len()];
        for &f in keep {
            for &v in &self.facets[f] {
                used[v as usize] = true;
            }
        }
        let mut vertex_map = Vec::new();
        for (old, _) in used.iter().enumerate().filter(|(_, u)| **u) {
            old_to_new[old] = vertex_map.len() as u32;
            vertex_map.push(old);
        }
        let vertices = vertex_map.iter().map(|&v| self.vertices[v]).collect();
        let facets = keep
            .iter()
            .map(|&f| self.facets[f].iter().map(|&v| old_to_new[v as usize]).collect())
            .collect();
        self.remapped(
            vertices,
            facets,
            &Remap {
                vertex: vertex_map,
                facet: keep.to_vec(),
            },
        )
    }

    /// Keep vertices where `keep` is set; facets survive only if all their vertices do.
    pub fn extract_vertices(&self, keep: &[bool]) -> Gg3dResult<Self> {
        if keep.len() != self.vertices.len() {
            return Err(Gg3dError::validation(
                "vertex mask length does not match vertex count",
            ));
        }
        let mut old_to_new = vec![u32::MAX; self.vertices.len()];
        let mut vertex_map = Vec::new();
        for (old, _) in keep.iter().enumerate().filter(|(_, k)| **k) {
            old_to_new[old] = vertex_map.len() as u32;
            vertex_map.push(old);
        }
        let mut facet_map = Vec::new();
        let mut facets = Vec::new();
        for (fi, f) in self.facets.iter().enumerate() {
            if f.iter().all(|&v| keep[v as usize]) {
                facet_map.push(fi);
                facets.push(f.iter().map(|&v| old_to_new[v as usize]).collect());
            }
        }
        let vertices = vertex_map.iter().map(|&v| self.vertices[v]).collect();
        self.remapped(
            vertices,
            facets,
            &Remap {
                vertex: vertex_map,
                facet: facet_map,
            },
        )
    }

    /// Rebuild the frame on new geometry, carrying every attribute through `remap`.
    ///
    /// Corner attributes follow their facet (facet arity must be preserved); edge attributes
    /// follow the old edge between the mapped endpoints.
    pub(crate) fn remapped(
        &self,
        vertices: Vec<DVec3>,
        facets: Vec<Vec<u32>>,
        remap: &Remap,
    ) -> Gg3dResult<Self> {
        let mut out = Self {
            vertices,
            facets,
            attributes: BTreeMap::new(),
        };

        let old_offsets = self.corner_offsets();
        let corner_rows: Vec<usize> = remap
            .facet
            .iter()
            .flat_map(|&f| old_offsets[f]..old_offsets[f + 1])
            .collect();

        let needs_edges = self.attributes.values().any(|a| a.element == Element::Edge);
        let edge_rows = if needs_edges {
            let old_index = self.edge_index();
            let mut rows = Vec::new();
            for [a, b] in out.edges() {
                let oa = remap.vertex[a as usize] as u32;
                let ob = remap.vertex[b as usize] as u32;
                let key = (oa.min(ob), oa.max(ob));
                let row = old_index.get(&key).copied().ok_or_else(|| {
                    Gg3dError::transform_precondition(format!(
                        "edge ({oa}, {ob}) does not exist in the source frame"
                    ))
                })?;
                rows.push(row);
            }
            rows
        } else {
            Vec::new()
        };

        for (name, attr) in &self.attributes {
            let rows: &[usize] = match attr.element {
                Element::Vertex => &remap.vertex,
                Element::Facet => &remap.facet,
                Element::Corner => &corner_rows,
                Element::Edge => &edge_rows,
            };
            out.attributes.insert(name.clone(), attr.select_rows(rows));
        }
        out.validate()?;
        Ok(out)
    }

    /// Parse a frame from its JSON form and validate it.
    pub fn from_json_str(s: &str) -> Gg3dResult<Self> {
        let frame: Self = serde_json::from_str(s).map_err(|e| Gg3dError::serde(e.to_string()))?;
        frame.validate()?;
        Ok(frame)
    }

    /// Serialize to JSON.
    pub fn to_json_string(&self) -> Gg3dResult<String> {
        serde_json::to_string(self).map_err(|e| Gg3dError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/frame.rs"]
mod tests;
