use super::*;
use crate::{
    foundation::core::DVec3,
    grammar::texture::{CheckerBoard, Isocontour},
};

fn cloud_with(name: &str, attr: Attribute) -> DataFrame {
    DataFrame::point_cloud(vec![DVec3::ZERO; attr.len()])
        .with_attribute(name, attr)
        .unwrap()
}

fn uv_cloud(uvs: &[[f64; 2]]) -> DataFrame {
    let values = uvs.iter().flatten().copied().collect();
    cloud_with(
        "uv",
        Attribute::new(Element::Vertex, Usage::Uv, 2, values).unwrap(),
    )
}

fn per_element_values(field: TextureField) -> (Element, usize, Vec<f64>) {
    match field {
        TextureField::PerElement(f) => (f.element, f.channels, f.values),
        other => panic!("expected a per-element field, got {other:?}"),
    }
}

#[test]
fn uniform_textures_stay_constant() {
    let cube = DataFrame::unit_cube();
    let red = evaluate_texture(&Texture::from("red"), &cube, ChannelKind::Color).unwrap();
    assert_eq!(red, TextureField::Uniform { value: vec![1.0, 0.0, 0.0] });
    let gray = evaluate_texture(&Texture::from(0.3), &cube, ChannelKind::Color).unwrap();
    assert_eq!(gray.channels(), 3);
    let scalar = evaluate_texture(&Texture::from(0.3), &cube, ChannelKind::Scalar).unwrap();
    assert_eq!(scalar, TextureField::Uniform { value: vec![0.3] });
    assert!(evaluate_texture(&Texture::from("red"), &cube, ChannelKind::Scalar).is_err());
}

#[test]
fn scalar_field_maps_through_colors() {
    let frame = cloud_with("s", Attribute::scalar(Element::Vertex, vec![0.0, 5.0, 10.0]));
    let bw = ScalarField::new("s").colors(vec!["#000000".into(), "#ffffff".into()]);

    let (element, channels, values) = per_element_values(
        evaluate_texture(&bw.clone().into(), &frame, ChannelKind::Color).unwrap(),
    );
    assert_eq!((element, channels), (Element::Vertex, 3));
    assert_eq!(&values[0..3], &[0.0, 0.0, 0.0]);
    assert_eq!(&values[3..6], &[0.5, 0.5, 0.5]);
    assert_eq!(&values[6..9], &[1.0, 1.0, 1.0]);

    let (_, _, clipped) = per_element_values(
        evaluate_texture(&bw.domain(0.0, 5.0).into(), &frame, ChannelKind::Color).unwrap(),
    );
    assert_eq!(&clipped[3..6], &clipped[6..9]);

    let (_, channels, scalars) = per_element_values(
        evaluate_texture(&ScalarField::new("s").into(), &frame, ChannelKind::Scalar).unwrap(),
    );
    assert_eq!(channels, 1);
    assert_eq!(scalars, vec![0.0, 0.5, 1.0]);
}

#[test]
fn scalar_field_named_map_endpoints() {
    let frame = cloud_with("s", Attribute::scalar(Element::Vertex, vec![-1.0, 3.0]));
    let (_, _, values) = per_element_values(
        evaluate_texture(
            &ScalarField::new("s").colormap("magma").into(),
            &frame,
            ChannelKind::Color,
        )
        .unwrap(),
    );
    let ramp = ColorRamp::named("magma").unwrap();
    assert_eq!(&values[0..3], &ramp.sample(0.0).to_array());
    assert_eq!(&values[3..6], &ramp.sample(1.0).to_array());

    assert!(
        evaluate_texture(
            &ScalarField::new("s").colormap("nope").into(),
            &frame,
            ChannelKind::Color
        )
        .is_err()
    );
}

#[test]
fn categories_index_a_qualitative_palette() {
    let frame = cloud_with("c", Attribute::scalar(Element::Vertex, vec![0.0, 1.0, 11.0]));
    let field = ScalarField::new("c").categories(true);
    let (_, _, values) =
        per_element_values(evaluate_texture(&field.into(), &frame, ChannelKind::Color).unwrap());
    let tab10 = qualitative_palette("tab10").unwrap();
    assert_eq!(&values[0..3], &tab10[0].to_array());
    assert_eq!(&values[3..6], &tab10[1].to_array());
    assert_eq!(&values[6..9], &values[3..6]);

    let custom = ScalarField::new("c")
        .categories(true)
        .colors(vec!["red".into(), "blue".into()]);
    let (_, _, values) =
        per_element_values(evaluate_texture(&custom.into(), &frame, ChannelKind::Color).unwrap());
    assert_eq!(values, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn categorical_colormap_names_are_checked() {
    let frame = cloud_with("c", Attribute::scalar(Element::Vertex, vec![0.0, 1.0, 2.0]));
    let eval = |name: &str| {
        let field = ScalarField::new("c").colormap(name).categories(true);
        evaluate_texture(&field.into(), &frame, ChannelKind::Color)
    };

    let set1 = qualitative_palette("set1").unwrap();
    let (_, _, values) = per_element_values(eval("set1").unwrap());
    assert_eq!(&values[3..6], &set1[1].to_array());

    // A continuous map stands in for the default palette.
    let tab10 = qualitative_palette("tab10").unwrap();
    let (_, _, values) = per_element_values(eval("magma").unwrap());
    assert_eq!(&values[6..9], &tab10[2].to_array());

    let err = eval("no_such_palette").unwrap_err();
    assert!(matches!(err, Gg3dError::Validation(_)));
    assert!(err.to_string().contains("no_such_palette"));
}

#[test]
fn identity_colormap_passes_rgb_through() {
    let rgb = Attribute::new(Element::Vertex, Usage::Color, 3, vec![0.1, 0.2, 0.3]).unwrap();
    let frame = cloud_with("rgb", rgb);
    let field = ScalarField::new("rgb").colormap("identity");
    let (_, channels, values) =
        per_element_values(evaluate_texture(&field.into(), &frame, ChannelKind::Color).unwrap());
    assert_eq!(channels, 3);
    assert_eq!(values, vec![0.1, 0.2, 0.3]);

    let not_scalar = ScalarField::new("rgb");
    assert!(matches!(
        evaluate_texture(&not_scalar.into(), &frame, ChannelKind::Color),
        Err(Gg3dError::ScaleDimension(_))
    ));
}

#[test]
fn checkerboard_alternates_on_uv_cells() {
    let frame = uv_cloud(&[[0.1, 0.1], [0.6, 0.1], [0.6, 0.6]]);
    let checker = CheckerBoard::default().textures(1.0, 0.0).size(2);
    let (element, _, values) = per_element_values(
        evaluate_texture(&checker.into(), &frame, ChannelKind::Scalar).unwrap(),
    );
    assert_eq!(element, Element::Vertex);
    assert_eq!(values, vec![1.0, 0.0, 1.0]);

    let no_uv = evaluate_texture(
        &CheckerBoard::default().into(),
        &DataFrame::unit_cube(),
        ChannelKind::Color,
    );
    assert!(matches!(no_uv, Err(Gg3dError::AttributeNotFound { .. })));
}

#[test]
fn isocontour_marks_bands_near_level_sets() {
    let frame = cloud_with("h", Attribute::scalar(Element::Vertex, vec![0.01, 0.5, 0.98]));
    let iso = Isocontour::new("h")
        .textures(1.0, 0.0)
        .num_contours(2)
        .ratio(0.1);
    let (_, _, values) =
        per_element_values(evaluate_texture(&iso.into(), &frame, ChannelKind::Scalar).unwrap());
    assert_eq!(values, vec![1.0, 1.0, 0.0]);
}

#[test]
fn selections_move_to_corners_when_needed() {
    let frame = DataFrame::new(
        vec![DVec3::ZERO, DVec3::X, DVec3::Y],
        vec![vec![0, 1, 2]],
    )
    .unwrap()
    .with_attribute("f", Attribute::scalar(Element::Facet, vec![0.05]))
    .unwrap()
    .with_attribute("s", Attribute::scalar(Element::Vertex, vec![0.0, 1.0, 2.0]))
    .unwrap();
    let iso = Isocontour::new("f")
        .textures(ScalarField::new("s"), 0.0)
        .num_contours(1);
    let (element, _, values) =
        per_element_values(evaluate_texture(&iso.into(), &frame, ChannelKind::Scalar).unwrap());
    assert_eq!(element, Element::Corner);
    assert_eq!(values, vec![0.0, 0.5, 1.0]);
}

#[test]
fn image_samples_nearest_texel() {
    let mut img = image::RgbImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
    img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
    img.put_pixel(1, 1, image::Rgb([255, 255, 255]));

    let frame = uv_cloud(&[[0.25, 0.75], [0.75, 0.25], [1.0, 1.0], [1.5, -0.2]]);
    let texture = Image::from_image(img.clone());
    let (_, _, values) =
        per_element_values(evaluate_texture(&texture.into(), &frame, ChannelKind::Color).unwrap());
    assert_eq!(&values[0..3], &[1.0, 0.0, 0.0]);
    assert_eq!(&values[3..6], &[1.0, 1.0, 1.0]);
    assert_eq!(&values[6..9], &[0.0, 1.0, 0.0]);
    assert_eq!(&values[9..12], &[1.0, 1.0, 1.0]);

    let strict = Image::from_image(img).uv_policy(UvPolicy::Error);
    let err = evaluate_texture(&strict.into(), &frame, ChannelKind::Color).unwrap_err();
    assert!(matches!(err, Gg3dError::UvOutOfRange { u, v } if u == 1.5 && v == -0.2));
}

#[test]
fn image_from_missing_file_reports_the_path() {
    let frame = uv_cloud(&[[0.5, 0.5]]);
    let texture = Image::from_path("/definitely/not/here.png");
    let err = evaluate_texture(&texture.into(), &frame, ChannelKind::Color).unwrap_err();
    assert!(err.to_string().contains("open image texture"));
}

#[test]
fn retargeting_averages_over_shared_corners() {
    let ids = FieldDesc {
        element: Element::Vertex,
        channels: 1,
        values: (0..8).map(f64::from).collect(),
    };
    let cube = DataFrame::unit_cube();
    let on_facets = TextureField::PerElement(ids.clone());
    let (element, _, values) =
        per_element_values(retarget_field(&on_facets, Element::Facet, &cube).unwrap());
    assert_eq!(element, Element::Facet);
    // Facet 0 is [0, 3, 2, 1], facet 1 is [4, 5, 6, 7].
    assert_eq!(&values[..2], &[1.5, 5.5]);

    let back = retarget_field(
        &TextureField::PerElement(FieldDesc {
            element: Element::Facet,
            channels: 1,
            values,
        }),
        Element::Vertex,
        &cube,
    )
    .unwrap();
    assert_eq!(per_element_values(back).2.len(), 8);

    let uniform = TextureField::Uniform { value: vec![0.3] };
    assert_eq!(retarget_field(&uniform, Element::Edge, &cube).unwrap(), uniform);
    assert!(retarget_field(&TextureField::PerElement(ids), Element::Edge, &cube).is_err());

    let lonely = DataFrame::point_cloud(vec![DVec3::ZERO]);
    let corner_field = TextureField::PerElement(FieldDesc {
        element: Element::Corner,
        channels: 1,
        values: vec![],
    });
    assert!(retarget_field(&corner_field, Element::Vertex, &lonely).is_err());
}
