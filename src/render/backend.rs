use std::path::Path;

use anyhow::Context;

use crate::{
    compile::scene::{CompileOptions, compile_with},
    config::model::RenderConfig,
    foundation::error::{Gg3dError, Gg3dResult},
    grammar::layer::Layer,
    scene::model::SceneDescription,
};

/// Consumer of compiled scenes.
///
/// Implementations turn a [`SceneDescription`] into an output file. The compiler never looks at
/// how; it only guarantees the scene is complete and internally consistent.
pub trait Renderer {
    /// Render `scene` to `output`.
    fn render(&mut self, scene: &SceneDescription, output: &Path) -> Gg3dResult<()>;
}

/// Writes the scene description as JSON instead of rendering pixels.
///
/// Useful for inspecting compiler output and for handing scenes to an out-of-process renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSceneWriter {
    /// Indent the output.
    pub pretty: bool,
}

impl Renderer for JsonSceneWriter {
    fn render(&mut self, scene: &SceneDescription, output: &Path) -> Gg3dResult<()> {
        let json = if self.pretty {
            serde_json::to_vec_pretty(scene)
        } else {
            serde_json::to_vec(scene)
        }
        .map_err(|e| Gg3dError::serde(e.to_string()))?;
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        std::fs::write(output, json)
            .with_context(|| format!("write scene '{}'", output.display()))?;
        Ok(())
    }
}

/// Compile `layer` under `config` and hand the scene to `renderer`.
///
/// Nothing is written if any leaf fails to compile.
#[tracing::instrument(skip(layer, config, renderer))]
pub fn render(
    layer: &Layer,
    config: &RenderConfig,
    renderer: &mut dyn Renderer,
    output: &Path,
) -> Gg3dResult<SceneDescription> {
    render_with(layer, config, &CompileOptions::default(), renderer, output)
}

/// [`render`] with explicit compile options.
pub fn render_with(
    layer: &Layer,
    config: &RenderConfig,
    opts: &CompileOptions,
    renderer: &mut dyn Renderer,
    output: &Path,
) -> Gg3dResult<SceneDescription> {
    let scene = compile_with(layer, config, opts)?;
    renderer.render(&scene, output)?;
    tracing::info!(output = %output.display(), shapes = scene.shapes.len(), "scene rendered");
    Ok(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
