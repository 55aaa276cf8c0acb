use super::*;
use crate::foundation::core::ColorLike;

#[test]
fn channels_follow_variant_capabilities() {
    let names = |m: &Material| -> Vec<&'static str> {
        m.channels().into_iter().map(|(n, _, _)| n).collect()
    };
    assert_eq!(names(&Material::diffuse(0.5)), vec!["reflectance"]);
    assert_eq!(
        names(&Material::principled(0.5)),
        vec!["color", "roughness", "metallic"]
    );
    assert_eq!(
        names(&Material::plastic(0.5)),
        vec!["diffuse_reflectance", "specular_reflectance"]
    );
    assert_eq!(names(&Material::rough_conductor("Au")), vec!["alpha"]);
    assert!(names(&Material::dielectric()).is_empty());
    assert!(names(&Material::conductor("Au")).is_empty());
    assert!(names(&Material::hair()).is_empty());
}

#[test]
fn with_channel_rejects_unexposed_channels() {
    let err = Material::dielectric()
        .with_channel("reflectance", 0.3)
        .unwrap_err();
    assert!(matches!(
        err,
        Gg3dError::UnsupportedChannel { ref material, ref channel }
            if material == "dielectric" && channel == "reflectance"
    ));

    let err = Material::diffuse(0.5).with_channel("metallic", 1.0).unwrap_err();
    assert!(matches!(err, Gg3dError::UnsupportedChannel { .. }));
}

#[test]
fn with_channel_replaces_the_texture() {
    let m = Material::principled(0.5)
        .with_channel("metallic", 0.9)
        .unwrap();
    let metallic = m
        .channels()
        .into_iter()
        .find(|(n, _, _)| *n == "metallic")
        .map(|(_, kind, t)| (kind, t.as_uniform().cloned()))
        .unwrap();
    assert_eq!(metallic, (ChannelKind::Scalar, Some(ColorLike::Gray(0.9))));
}

#[test]
fn from_name_accepts_both_spellings() {
    for name in ["RoughPlastic", "rough_plastic", "roughplastic"] {
        assert_eq!(Material::from_name(name).unwrap().bsdf.kind(), "roughplastic");
    }
    assert_eq!(
        Material::from_name("ThinPrincipled").unwrap().bsdf.kind(),
        "principledthin"
    );
    assert!(Material::from_name("velvet").is_err());
}

#[test]
fn material_level_parameters_are_builder_style() {
    let m = Material::diffuse(0.5)
        .two_sided(true)
        .bump_map(BumpMap::new(0.2));
    assert!(m.two_sided);
    assert_eq!(m.bump_map.as_ref().map(|b| b.scale), Some(1.0));
}
