use std::path::PathBuf;

use gg3d::{
    ChannelSet, Compute, DVec3, DataFrame, JsonSceneWriter, Layer, Mark, Material, RenderConfig,
    ScalarField, Transform, VectorField, fingerprint_scene, render,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cube = Layer::from_data(DataFrame::unit_cube());
    let faces = cube
        .transform(Transform::explode("id", 0.3))
        .material(Material::principled(ScalarField::new("id").categories(true)));
    let normals = cube
        .transform(Transform::Compute(Compute {
            facet_normal: Some("n".into()),
            ..Compute::default()
        }))
        .mark(Mark::Point)
        .channel(ChannelSet::new().size(0.02).vector_field(VectorField::new("n").size(0.01)))
        .material(Material::diffuse("crimson"));
    let layer = (faces + normals).rotate(DVec3::Y, 0.4);

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("gg3d_cube_scene.json"));
    let scene = render(
        &layer,
        &RenderConfig::default(),
        &mut JsonSceneWriter { pretty: true },
        &out,
    )?;
    let fp = fingerprint_scene(&scene)?;
    println!(
        "{} shapes -> {} ({:016x}{:016x})",
        scene.shapes.len(),
        out.display(),
        fp.hi,
        fp.lo
    );

    Ok(())
}
