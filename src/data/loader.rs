use std::path::Path;

use anyhow::Context;

use crate::{data::frame::DataFrame, foundation::error::Gg3dResult};

/// Source of data frames.
///
/// The compiler only ever sees [`DataFrame`] values; loaders are how callers get them from disk.
pub trait MeshLoader {
    /// Load and validate one frame.
    fn load(&self, path: &Path) -> Gg3dResult<DataFrame>;
}

/// Loads frames stored in the JSON form produced by [`DataFrame::to_json_string`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMeshLoader;

impl MeshLoader for JsonMeshLoader {
    #[tracing::instrument(skip(self))]
    fn load(&self, path: &Path) -> Gg3dResult<DataFrame> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read data frame '{}'", path.display()))?;
        DataFrame::from_json_str(&text)
    }
}
