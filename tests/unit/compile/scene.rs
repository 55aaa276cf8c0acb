use super::*;
use crate::{
    data::frame::{Attribute, Usage},
    foundation::colormap::ColorRamp,
    grammar::{
        attribute::AttributeRef,
        channel::ChannelSet,
        material::Material,
        scale::Scale,
        texture::ScalarField,
        transform::Transform,
    },
    scene::model::TextureField,
};

fn cube() -> Layer {
    Layer::from_data(DataFrame::unit_cube())
}

fn config() -> RenderConfig {
    RenderConfig::default()
}

#[test]
fn filtered_cube_compiles_to_one_face() {
    let layer = cube().transform(Transform::filter("id", |r| r[0] == 0.0));
    let scene = compile(&layer, &config()).unwrap();
    assert_eq!(scene.shapes.len(), 1);
    match &scene.shapes[0] {
        ShapeDesc::Mesh {
            layer,
            vertices,
            facets,
            normals,
            bsdf,
        } => {
            assert_eq!(layer, "root");
            assert_eq!(vertices.len(), 4);
            assert_eq!(facets.len(), 1);
            assert!(normals.is_none());
            assert_eq!(bsdf.kind, "diffuse");
            assert_eq!(
                bsdf.param("reflectance"),
                Some(&BsdfParam::Texture(TextureField::Uniform {
                    value: vec![0.5, 0.5, 0.5]
                }))
            );
        }
        other => panic!("expected a mesh, got {other:?}"),
    }
}

#[test]
fn composition_emits_one_shape_per_leaf_in_order() {
    let a = cube();
    let root = &a + &(a.mark(Mark::Point) + a.mark(Mark::Curve));
    let scene = compile(&root, &config()).unwrap();
    let kinds: Vec<Mark> = scene.shapes.iter().map(ShapeDesc::mark).collect();
    assert_eq!(kinds, vec![Mark::Surface, Mark::Point, Mark::Curve]);
    let names: Vec<&str> = scene.shapes.iter().map(ShapeDesc::layer).collect();
    assert_eq!(names, vec!["root/0", "root/1/0", "root/1/1"]);
}

#[test]
fn point_marks_become_spheres() {
    let frame = DataFrame::unit_cube()
        .with_attribute(
            "r",
            Attribute::scalar(Element::Vertex, (0..8).map(f64::from).collect()),
        )
        .unwrap();
    let plain = Layer::from_data(frame).mark(Mark::Point);
    match &compile(&plain, &config()).unwrap().shapes[0] {
        ShapeDesc::Spheres { centers, radii, .. } => {
            assert_eq!(centers.len(), 8);
            assert!(radii.iter().all(|&r| r == 0.01));
        }
        other => panic!("expected spheres, got {other:?}"),
    }

    let sized = plain.channel(
        ChannelSet::new().size(AttributeRef::new("r").with_scale(Scale::uniform(0.5))),
    );
    match &compile(&sized, &config()).unwrap().shapes[0] {
        ShapeDesc::Spheres { radii, .. } => assert_eq!(radii[2], 1.0),
        other => panic!("expected spheres, got {other:?}"),
    }
}

#[test]
fn curve_marks_draw_every_edge() {
    let scene = compile(&cube().mark(Mark::Curve), &config()).unwrap();
    match &scene.shapes[0] {
        ShapeDesc::Curves { curves, .. } => {
            assert_eq!(curves.len(), 12);
            assert!(curves.iter().all(|c| c.points.len() == 2 && c.radii == [0.01, 0.01]));
        }
        other => panic!("expected curves, got {other:?}"),
    }
}

#[test]
fn vector_field_adds_tapered_curves() {
    let frame = DataFrame::point_cloud(vec![DVec3::ZERO, DVec3::X])
        .with_attribute(
            "v",
            Attribute::from_vec3(
                Element::Vertex,
                Usage::Vector,
                &[DVec3::new(0.0, 0.0, 1.0), DVec3::new(0.0, 0.0, 2.0)],
            ),
        )
        .unwrap();
    let field = VectorField::new("v").refinement_level(1).size(0.2);
    let layer = Layer::from_data(frame)
        .mark(Mark::Point)
        .channel(ChannelSet::new().vector_field(field));
    let scene = compile(&layer, &config()).unwrap();
    assert_eq!(scene.shapes.len(), 2);
    assert_eq!(scene.shapes[0].mark(), Mark::Point);
    match &scene.shapes[1] {
        ShapeDesc::Curves { curves, .. } => {
            assert_eq!(curves.len(), 2);
            assert_eq!(
                curves[1].points,
                vec![[1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 0.0, 2.0]]
            );
            assert_eq!(curves[1].radii, vec![0.2, 0.1, 0.0]);
        }
        other => panic!("expected curves, got {other:?}"),
    }
}

#[test]
fn position_channel_replaces_vertices() {
    let frame = DataFrame::unit_cube()
        .with_attribute(
            "p",
            Attribute::from_vec3(Element::Vertex, Usage::Position, &[DVec3::ONE; 8]),
        )
        .unwrap();
    let layer = Layer::from_data(frame).channel(
        ChannelSet::new().position(AttributeRef::new("p").with_scale(Scale::uniform(3.0))),
    );
    match &compile(&layer, &config()).unwrap().shapes[0] {
        ShapeDesc::Mesh { vertices, .. } => {
            assert!(vertices.iter().all(|v| *v == [3.0, 3.0, 3.0]));
        }
        other => panic!("expected a mesh, got {other:?}"),
    }

    let bad = cube().channel(ChannelSet::new().position("id"));
    assert!(compile(&bad, &config()).is_err());
}

#[test]
fn to_world_fits_the_scene_and_honors_up_axis() {
    let z_up = RenderConfig {
        up_axis: UpAxis::Z,
        ..config()
    };
    let scene = compile(&cube(), &z_up).unwrap();
    let m = DMat4::from_cols_array_2d(&scene.to_world);
    let top = m.transform_point3(DVec3::new(0.5, 0.5, 1.0));
    assert!((top - DVec3::Y).length() < 1e-9, "{top}");

    let scene = compile(&cube().scale(10.0), &config()).unwrap();
    let m = DMat4::from_cols_array_2d(&scene.to_world);
    let corner = m.transform_point3(DVec3::splat(10.0));
    assert!((corner - DVec3::ONE).length() < 1e-9, "{corner}");
}

#[test]
fn failures_are_collected_per_leaf() {
    let broken = cube().material(Material::diffuse(ScalarField::new("nope")));
    let root = Layer::new() + (cube() + broken);
    let report = compile_report(&root, &config(), &CompileOptions::default()).unwrap();
    assert_eq!(report.scene.shapes.len(), 1);
    let paths: Vec<String> = report.failures.iter().map(|f| f.path.to_string()).collect();
    assert_eq!(paths, vec!["root/0", "root/1/1"]);
    assert!(matches!(report.failures.0[0].error, Gg3dError::MissingData));
    assert!(matches!(
        report.failures.0[1].error,
        Gg3dError::AttributeNotFound { .. }
    ));

    match compile(&root, &config()) {
        Err(Gg3dError::Compile(failures)) => assert_eq!(failures.len(), 2),
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn surface_mark_needs_facets() {
    let cloud = Layer::from_data(DataFrame::point_cloud(vec![DVec3::ZERO]));
    let err = compile(&cloud, &config()).unwrap_err();
    assert!(err.to_string().contains("surface mark needs a frame with facets"));
}

#[test]
fn point_marks_reject_facet_fields() {
    let layer = cube()
        .mark(Mark::Point)
        .material(Material::diffuse(ScalarField::new("id")));
    assert!(compile(&layer, &config()).is_err());
    let surface = cube().material(Material::diffuse(ScalarField::new("id")));
    assert!(compile(&surface, &config()).is_ok());
}

#[test]
fn parallel_compile_matches_serial() {
    let a = cube();
    let mut root = a.clone();
    for i in 1..6u32 {
        root = root + a.translate(DVec3::splat(f64::from(i))).mark(Mark::Point);
    }
    let serial = compile(&root, &config()).unwrap();
    let parallel = compile_with(
        &root,
        &config(),
        &CompileOptions {
            parallel: true,
            threads: Some(3),
            ..CompileOptions::default()
        },
    )
    .unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn zero_threads_is_rejected() {
    let opts = CompileOptions {
        parallel: true,
        threads: Some(0),
        ..CompileOptions::default()
    };
    assert!(matches!(
        compile_with(&cube(), &config(), &opts),
        Err(Gg3dError::Validation(_))
    ));
}

#[test]
fn invalid_config_fails_before_compiling() {
    let mut bad = config();
    bad.film.width = 0;
    assert!(matches!(
        compile(&cube(), &bad),
        Err(Gg3dError::Validation(_))
    ));
}

#[test]
fn custom_defaults_apply() {
    let opts = CompileOptions {
        defaults: Defaults {
            mark: Mark::Point,
            reflectance: 0.2,
            ..Defaults::default()
        },
        ..CompileOptions::default()
    };
    let scene = compile_with(&cube(), &config(), &opts).unwrap();
    let shape = &scene.shapes[0];
    assert_eq!(shape.mark(), Mark::Point);
    assert_eq!(
        shape.bsdf().param("reflectance"),
        Some(&BsdfParam::Texture(TextureField::Uniform {
            value: vec![0.2, 0.2, 0.2]
        }))
    );
}

#[test]
fn scalar_field_domain_follows_the_filtered_frame() {
    let layer = cube()
        .transform(Transform::filter("id", |r| r[0] >= 4.0))
        .material(Material::diffuse(ScalarField::new("id")));
    let scene = compile(&layer, &config()).unwrap();
    let viridis = ColorRamp::named("viridis").unwrap();
    let mut expected = viridis.sample(0.0).to_array().to_vec();
    expected.extend(viridis.sample(1.0).to_array());
    match &scene.shapes[0] {
        ShapeDesc::Mesh { facets, bsdf, .. } => {
            assert_eq!(facets.len(), 2);
            match bsdf.param("reflectance") {
                Some(BsdfParam::Texture(TextureField::PerElement(field))) => {
                    assert_eq!(field.element, Element::Facet);
                    assert_eq!(field.values, expected);
                }
                other => panic!("expected a per-facet field, got {other:?}"),
            }
        }
        other => panic!("expected a mesh, got {other:?}"),
    }
}

#[test]
fn offset_reads_attributes_created_by_transforms() {
    let frame = DataFrame::point_cloud(vec![DVec3::ZERO, DVec3::X])
        .with_attribute("r", Attribute::scalar(Element::Vertex, vec![1.0, 1.0]))
        .unwrap()
        .with_attribute(
            "v",
            Attribute::from_vec3(
                Element::Vertex,
                Usage::Vector,
                &[DVec3::new(3.0, 4.0, 0.0), DVec3::new(0.0, 0.0, 2.0)],
            ),
        )
        .unwrap();
    let size = ChannelSet::new().size(AttributeRef::new("r").with_scale(Scale::offset("len")));
    let points = Layer::from_data(frame).mark(Mark::Point).channel(size);

    assert!(matches!(
        compile(&points, &config()),
        Err(Gg3dError::Compile(_))
    ));

    let scene = compile(&points.transform(Transform::norm("v", "len")), &config()).unwrap();
    match &scene.shapes[0] {
        ShapeDesc::Spheres { radii, .. } => assert_eq!(radii, &vec![6.0, 3.0]),
        other => panic!("expected spheres, got {other:?}"),
    }
}

#[test]
fn vector_field_curves_average_corner_materials_onto_vertices() {
    let cube_frame = DataFrame::unit_cube();
    let corner_ids: Vec<f64> = cube_frame
        .facets()
        .iter()
        .flatten()
        .map(|&v| f64::from(v))
        .collect();
    let frame = cube_frame
        .with_attribute("c", Attribute::scalar(Element::Corner, corner_ids))
        .unwrap()
        .with_attribute(
            "v",
            Attribute::from_vec3(Element::Vertex, Usage::Vector, &[DVec3::Z; 8]),
        )
        .unwrap();
    let gray = ScalarField::new("c").colors(vec!["black".into(), "white".into()]);
    let layer = Layer::from_data(frame)
        .material(Material::diffuse(gray))
        .channel(ChannelSet::new().vector_field(VectorField::new("v")));
    let scene = compile(&layer, &config()).unwrap();
    assert_eq!(scene.shapes.len(), 2);

    let field_of = |shape: &ShapeDesc| match shape {
        ShapeDesc::Mesh { bsdf, .. } | ShapeDesc::Curves { bsdf, .. } => {
            match bsdf.param("reflectance") {
                Some(BsdfParam::Texture(TextureField::PerElement(f))) => f.clone(),
                other => panic!("expected a per-element field, got {other:?}"),
            }
        }
        other => panic!("unexpected shape {other:?}"),
    };
    assert_eq!(field_of(&scene.shapes[0]).element, Element::Corner);
    let curves = field_of(&scene.shapes[1]);
    assert_eq!(curves.element, Element::Vertex);
    assert_eq!(curves.values.len(), 24);
    for (i, rgb) in curves.values.chunks(3).enumerate() {
        let t = i as f64 / 7.0;
        assert!(rgb.iter().all(|c| (c - t).abs() < 1e-12), "vertex {i}: {rgb:?}");
    }
}

#[test]
fn surface_marks_reject_edge_fields() {
    let frame = DataFrame::unit_cube()
        .with_attribute("e", Attribute::scalar(Element::Edge, vec![0.0; 12]))
        .unwrap();
    let layer = Layer::from_data(frame).material(Material::diffuse(ScalarField::new("e")));
    let err = compile(&layer, &config()).unwrap_err();
    assert!(err.to_string().contains("surface marks cannot use a Edge field"), "{err}");
}
