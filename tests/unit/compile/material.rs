use super::*;
use crate::{
    data::frame::{Attribute, Element},
    foundation::core::DVec3,
    grammar::{material::BumpMap, texture::ScalarField},
    scene::model::TextureField,
};

fn float(desc: &BsdfDesc, name: &str) -> f64 {
    match desc.param(name) {
        Some(BsdfParam::Float(v)) => *v,
        other => panic!("'{name}' is not a float: {other:?}"),
    }
}

#[test]
fn default_diffuse_binds_a_uniform_reflectance() {
    let desc = bind_material(&Material::diffuse(0.5), &DataFrame::unit_cube()).unwrap();
    assert_eq!(desc.kind, "diffuse");
    assert!(!desc.two_sided);
    assert_eq!(
        desc.param("reflectance"),
        Some(&BsdfParam::Texture(TextureField::Uniform {
            value: vec![0.5, 0.5, 0.5]
        }))
    );
    assert!(desc.bump_map.is_none());
}

#[test]
fn non_data_parameters_are_copied() {
    let cube = DataFrame::unit_cube();
    let glass = bind_material(&Material::rough_dielectric(), &cube).unwrap();
    assert_eq!(float(&glass, "int_ior"), 1.49);
    assert_eq!(float(&glass, "alpha"), 0.1);
    assert_eq!(
        glass.param("distribution"),
        Some(&BsdfParam::Text("beckmann".into()))
    );

    let metal = bind_material(&Material::rough_conductor("Au"), &cube).unwrap();
    assert_eq!(metal.param("material"), Some(&BsdfParam::Text("Au".into())));
    assert!(matches!(metal.param("alpha"), Some(BsdfParam::Texture(_))));

    let hair = bind_material(&Material::hair(), &cube).unwrap();
    assert_eq!(float(&hair, "eumelanin"), 1.3);
    assert_eq!(hair.kind, "hair");
}

#[test]
fn data_channels_become_per_element_fields() {
    let frame = DataFrame::point_cloud(vec![DVec3::ZERO, DVec3::ONE])
        .with_attribute("t", Attribute::scalar(Element::Vertex, vec![0.0, 1.0]))
        .unwrap();
    let m = Material::principled(ScalarField::new("t"))
        .with_channel("roughness", ScalarField::new("t"))
        .unwrap();
    let desc = bind_material(&m, &frame).unwrap();
    match desc.param("color") {
        Some(BsdfParam::Texture(field)) => {
            assert_eq!(field.channels(), 3);
            assert_eq!(field.element(), Some(Element::Vertex));
        }
        other => panic!("unexpected color binding {other:?}"),
    }
    match desc.param("roughness") {
        Some(BsdfParam::Texture(TextureField::PerElement(f))) => {
            assert_eq!(f.values, vec![0.0, 1.0]);
        }
        other => panic!("unexpected roughness binding {other:?}"),
    }
}

#[test]
fn bump_map_is_evaluated_as_scalar() {
    let m = Material::diffuse("ivory")
        .two_sided(true)
        .bump_map(BumpMap::new(0.25));
    let desc = bind_material(&m, &DataFrame::unit_cube()).unwrap();
    assert!(desc.two_sided);
    let bump = desc.bump_map.unwrap();
    assert_eq!(bump.texture, TextureField::Uniform { value: vec![0.25] });
    assert_eq!(bump.scale, 1.0);
}

#[test]
fn missing_channel_attribute_fails() {
    let m = Material::diffuse(ScalarField::new("nope"));
    assert!(matches!(
        bind_material(&m, &DataFrame::unit_cube()),
        Err(crate::Gg3dError::AttributeNotFound { .. })
    ));
}
