//! Immutable, composable layers.
//!
//! A [`Layer`] is a handle to a shared tree node. Every overwrite operation returns a new node
//! whose only child is the receiver, so the receiver and everything derived from it before keep
//! observing exactly what they observed. `+` creates a node with two children and merges nothing.
//!
//! Leaves are resolved by folding the specs along the path from the leaf up to the root: data and
//! mark set closer to the root win, channels of the same kind set closer to the root win, and
//! transform chains concatenate in derivation order (leaf first).

use std::{fmt, ops::Add, sync::Arc};

use crate::{
    data::frame::DataFrame,
    foundation::core::DVec3,
    grammar::{
        channel::{ChannelSet, Mark},
        material::Material,
        transform::{Transform, TransformChain},
    },
};

/// The four optional components a layer node may set.
#[derive(Clone, Debug, Default)]
pub struct LayerSpec {
    /// Data frame.
    pub data: Option<Arc<DataFrame>>,
    /// Mark.
    pub mark: Option<Mark>,
    /// Channels set by this node.
    pub channels: ChannelSet,
    /// Transforms appended by this node.
    pub transform: TransformChain,
}

#[derive(Debug)]
struct LayerNode {
    spec: LayerSpec,
    children: Vec<Layer>,
}

/// A node in an immutable layer tree.
#[derive(Clone, Debug)]
pub struct Layer(Arc<LayerNode>);

/// Position of a leaf: child indices taken at each composition node from the root down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerPath(pub Vec<usize>);

impl fmt::Display for LayerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for i in &self.0 {
            write!(f, "/{i}")?;
        }
        Ok(())
    }
}

/// A leaf plus the specs on its way to the root, leaf first.
pub(crate) struct LayerLeaf<'a> {
    pub(crate) path: LayerPath,
    pub(crate) specs: Vec<&'a LayerSpec>,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Empty layer; every component falls back to defaults except data, which must be set.
    pub fn new() -> Self {
        Self::from_spec(LayerSpec::default())
    }

    /// Layer with its data set.
    pub fn from_data(data: impl Into<Arc<DataFrame>>) -> Self {
        Self::from_spec(LayerSpec {
            data: Some(data.into()),
            ..LayerSpec::default()
        })
    }

    fn from_spec(spec: LayerSpec) -> Self {
        Self(Arc::new(LayerNode {
            spec,
            children: Vec::new(),
        }))
    }

    fn derive(&self, spec: LayerSpec) -> Self {
        Self(Arc::new(LayerNode {
            spec,
            children: vec![self.clone()],
        }))
    }

    /// New layer with `data` replacing the data of this subtree.
    pub fn data(&self, data: impl Into<Arc<DataFrame>>) -> Self {
        self.derive(LayerSpec {
            data: Some(data.into()),
            ..LayerSpec::default()
        })
    }

    /// New layer with `mark` replacing the mark of this subtree.
    pub fn mark(&self, mark: Mark) -> Self {
        self.derive(LayerSpec {
            mark: Some(mark),
            ..LayerSpec::default()
        })
    }

    /// New layer overriding the channels set in `channels`.
    pub fn channel(&self, channels: impl Into<ChannelSet>) -> Self {
        self.derive(LayerSpec {
            channels: channels.into(),
            ..LayerSpec::default()
        })
    }

    /// New layer with the material channel set.
    pub fn material(&self, material: impl Into<Material>) -> Self {
        self.channel(ChannelSet::new().material(material))
    }

    /// New layer appending `transform` after the transforms already accumulated.
    pub fn transform(&self, transform: impl Into<TransformChain>) -> Self {
        self.derive(LayerSpec {
            transform: transform.into(),
            ..LayerSpec::default()
        })
    }

    /// Append a rotation of `angle` radians about `axis`.
    pub fn rotate(&self, axis: DVec3, angle: f64) -> Self {
        self.transform(Transform::rotation(axis, angle))
    }

    /// Append a translation.
    pub fn translate(&self, offset: DVec3) -> Self {
        self.transform(Transform::translation(offset))
    }

    /// Append a uniform scaling.
    pub fn scale(&self, factor: f64) -> Self {
        self.transform(Transform::scaling(factor))
    }

    /// Components set directly on this node.
    pub fn spec(&self) -> &LayerSpec {
        &self.0.spec
    }

    /// Direct children of this node.
    pub fn children(&self) -> &[Layer] {
        &self.0.children
    }

    /// `true` if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Layer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of leaves, i.e. shapes-producing layers, under this node.
    pub fn leaf_count(&self) -> usize {
        if self.0.children.is_empty() {
            1
        } else {
            self.0.children.iter().map(Layer::leaf_count).sum()
        }
    }

    /// Depth-first leaves, each with its ancestor specs.
    pub(crate) fn leaves(&self) -> Vec<LayerLeaf<'_>> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        self.collect_leaves(&mut stack, &mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(
        &'a self,
        ancestors: &mut Vec<&'a LayerSpec>,
        path: &mut Vec<usize>,
        out: &mut Vec<LayerLeaf<'a>>,
    ) {
        ancestors.push(&self.0.spec);
        match self.0.children.as_slice() {
            [] => out.push(LayerLeaf {
                path: LayerPath(path.clone()),
                specs: ancestors.iter().rev().copied().collect(),
            }),
            [only] => only.collect_leaves(ancestors, path, out),
            children => {
                for (i, child) in children.iter().enumerate() {
                    path.push(i);
                    child.collect_leaves(ancestors, path, out);
                    path.pop();
                }
            }
        }
        ancestors.pop();
    }
}

impl Add for Layer {
    type Output = Layer;

    fn add(self, rhs: Layer) -> Layer {
        &self + &rhs
    }
}

impl Add<&Layer> for &Layer {
    type Output = Layer;

    fn add(self, rhs: &Layer) -> Layer {
        Layer(Arc::new(LayerNode {
            spec: LayerSpec::default(),
            children: vec![self.clone(), rhs.clone()],
        }))
    }
}

impl From<DataFrame> for Layer {
    fn from(data: DataFrame) -> Self {
        Layer::from_data(data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/layer.rs"]
mod tests;
