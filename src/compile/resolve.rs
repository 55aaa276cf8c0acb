use std::sync::Arc;

use crate::{
    compile::defaults::Defaults,
    data::frame::DataFrame,
    foundation::error::{Gg3dError, LayerFailure},
    grammar::{
        attribute::AttributeRef,
        channel::{ChannelSet, Mark, Size, VectorField},
        layer::{Layer, LayerLeaf, LayerPath},
        material::Material,
        transform::TransformChain,
    },
};

/// A leaf layer with every component decided.
#[derive(Clone, Debug)]
pub struct ResolvedLayer {
    /// Position of the leaf in the tree.
    pub path: LayerPath,
    /// Input frame, shared with the layer tree.
    pub data: Arc<DataFrame>,
    /// Mark.
    pub mark: Mark,
    /// Position channel; vertex positions when `None`.
    pub position: Option<AttributeRef>,
    /// Normal channel.
    pub normal: Option<AttributeRef>,
    /// Point radius or curve width.
    pub size: Size,
    /// Vector-field channel, with its size decided.
    pub vector_field: Option<VectorField>,
    /// Material.
    pub material: Material,
    /// Full transform chain, in application order.
    pub transform: TransformChain,
}

/// Resolve every leaf of `root`, depth-first.
///
/// Each leaf is resolved independently; a leaf without data yields a failure for that leaf only.
pub fn resolve(root: &Layer, defaults: &Defaults) -> Vec<Result<ResolvedLayer, LayerFailure>> {
    root.leaves()
        .iter()
        .map(|leaf| resolve_leaf(leaf, defaults))
        .collect()
}

fn resolve_leaf(leaf: &LayerLeaf<'_>, defaults: &Defaults) -> Result<ResolvedLayer, LayerFailure> {
    let mut data = None;
    let mut mark = None;
    let mut channels = ChannelSet::new();
    let mut transform = TransformChain::identity();

    for spec in &leaf.specs {
        if let Some(d) = &spec.data {
            data = Some(Arc::clone(d));
        }
        if spec.mark.is_some() {
            mark = spec.mark;
        }
        channels.overlay(&spec.channels);
        transform.extend_from(&spec.transform);
    }

    let Some(data) = data else {
        return Err(LayerFailure {
            path: leaf.path.clone(),
            error: Gg3dError::MissingData,
        });
    };

    let mark = mark.unwrap_or_else(|| {
        tracing::debug!(path = %leaf.path, mark = ?defaults.mark, "default mark");
        defaults.mark
    });
    let material = channels.material.unwrap_or_else(|| {
        tracing::debug!(path = %leaf.path, "default material");
        defaults.material()
    });
    let size = channels
        .size
        .unwrap_or_else(|| Size::Constant(defaults.size_for(mark)));
    let vector_field = channels.vector_field.map(|mut field| {
        field.size = Some(field.size.unwrap_or(defaults.vector_field_size));
        field
    });

    Ok(ResolvedLayer {
        path: leaf.path.clone(),
        data,
        mark,
        position: channels.position,
        normal: channels.normal,
        size,
        vector_field,
        material,
        transform,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/resolve.rs"]
mod tests;
