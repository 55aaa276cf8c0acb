use super::*;
use crate::{
    foundation::core::{ColorLike, DVec3},
    grammar::texture::Texture,
};

fn only(root: &Layer) -> ResolvedLayer {
    let mut out = resolve(root, &Defaults::default());
    assert_eq!(out.len(), 1);
    out.remove(0).unwrap()
}

fn reflectance(m: &Material) -> Option<Texture> {
    m.channels()
        .into_iter()
        .find(|(n, _, _)| *n == "reflectance")
        .map(|(_, _, t)| t.clone())
}

#[test]
fn unset_components_come_from_defaults() {
    let r = only(&Layer::from_data(DataFrame::unit_cube()));
    assert_eq!(r.mark, Mark::Surface);
    assert_eq!(r.material.bsdf.kind(), "diffuse");
    assert_eq!(
        reflectance(&r.material).and_then(|t| t.as_uniform().cloned()),
        Some(ColorLike::Gray(0.5))
    );
    assert!(matches!(r.size, Size::Constant(s) if s == 0.0));
    assert!(r.position.is_none());
    assert!(r.transform.is_empty());
    assert_eq!(r.path, LayerPath::default());
}

#[test]
fn default_sizes_depend_on_mark() {
    let defaults = Defaults {
        point_size: 0.25,
        ..Defaults::default()
    };
    let root = Layer::from_data(DataFrame::unit_cube()).mark(Mark::Point);
    let r = resolve(&root, &defaults).remove(0).unwrap();
    assert!(matches!(r.size, Size::Constant(s) if s == 0.25));
}

#[test]
fn missing_data_fails_only_that_leaf() {
    let root = Layer::new().mark(Mark::Point) + Layer::from_data(DataFrame::unit_cube());
    let out = resolve(&root, &Defaults::default());
    assert_eq!(out.len(), 2);
    let failure = out[0].as_ref().unwrap_err();
    assert_eq!(failure.path, LayerPath(vec![0]));
    assert!(matches!(failure.error, Gg3dError::MissingData));
    assert!(out[1].is_ok());
}

#[test]
fn outer_settings_override_inner_ones() {
    let points = DataFrame::point_cloud(vec![DVec3::ZERO]);
    let root = Layer::from_data(DataFrame::unit_cube())
        .material(Material::diffuse(0.1))
        .mark(Mark::Curve)
        .data(points.clone())
        .material(Material::principled(0.9))
        .mark(Mark::Point);
    let r = only(&root);
    assert_eq!(*r.data, points);
    assert_eq!(r.mark, Mark::Point);
    assert_eq!(r.material.bsdf.kind(), "principled");
}

#[test]
fn composition_root_applies_to_every_leaf() {
    let a = Layer::from_data(DataFrame::unit_cube()).mark(Mark::Curve);
    let b = Layer::from_data(DataFrame::unit_cube());
    let out = resolve(&(a + b).mark(Mark::Point), &Defaults::default());
    assert!(out.iter().all(|r| r.as_ref().unwrap().mark == Mark::Point));
}

#[test]
fn channels_merge_per_kind() {
    let root = Layer::from_data(DataFrame::unit_cube())
        .channel(ChannelSet::new().position("p").size(0.3))
        .channel(ChannelSet::new().size(0.7));
    let r = only(&root);
    assert_eq!(r.position.as_ref().map(|p| p.name.as_str()), Some("p"));
    assert!(matches!(r.size, Size::Constant(s) if s == 0.7));
}

#[test]
fn transforms_concatenate_leaf_first() {
    let root = Layer::from_data(DataFrame::unit_cube())
        .scale(2.0)
        .translate(DVec3::X);
    let r = only(&root);
    assert_eq!(r.transform.len(), 2);
    let moved = r.transform.apply(&r.data).unwrap();
    assert_eq!(moved.vertices()[6], DVec3::new(3.0, 2.0, 2.0));
}

#[test]
fn vector_field_size_defaults() {
    let root = Layer::from_data(DataFrame::unit_cube())
        .channel(ChannelSet::new().vector_field(VectorField::new("v")));
    assert_eq!(only(&root).vector_field.unwrap().size, Some(0.01));
}
