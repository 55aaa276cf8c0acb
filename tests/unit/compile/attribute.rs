use super::*;
use crate::{
    data::frame::{Element, Usage},
    foundation::core::DVec3,
};

fn frame_with(name: &str, attr: Attribute) -> DataFrame {
    DataFrame::point_cloud(vec![DVec3::ZERO; attr.len()])
        .with_attribute(name, attr)
        .unwrap()
}

fn scalars(values: &[f64]) -> Attribute {
    Attribute::scalar(Element::Vertex, values.to_vec())
}

fn assert_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
    }
}

#[test]
fn resolve_applies_attached_scale() {
    let frame = frame_with("s", scalars(&[1.0, 2.0]));
    let r = AttributeRef::new("s").with_scale(Scale::uniform(3.0));
    assert_eq!(resolve_attribute(&r, &frame).unwrap().values, vec![3.0, 6.0]);
    assert!(matches!(
        resolve_attribute(&AttributeRef::new("missing"), &frame),
        Err(Gg3dError::AttributeNotFound { .. })
    ));
}

#[test]
fn composition_applies_left_then_right() {
    let x = scalars(&[2.0, 10.0, 100.0, 4.0]);
    let frame = frame_with("s", x.clone());
    let scales = || {
        vec![
            Scale::uniform(2.0),
            Scale::log(10.0),
            Scale::clip(2.0, 50.0),
            Scale::normalize(1.0, 2.0),
            Scale::custom(|row| vec![row[0] + 1.0]),
        ]
    };
    for (i, s1) in scales().into_iter().enumerate() {
        for (j, s2) in scales().into_iter().enumerate() {
            let stepwise = s2
                .apply(&s1.apply(&x, &frame).unwrap(), &frame)
                .unwrap();
            let composed = (scales().remove(i) * scales().remove(j))
                .apply(&x, &frame)
                .unwrap();
            assert_close(&composed.values, &stepwise.values);
        }
    }
}

#[test]
fn log_rejects_vectors_and_non_positive_values() {
    let frame = DataFrame::default();
    let v = Attribute::from_vec3(Element::Vertex, Usage::Vector, &[DVec3::ZERO]);
    assert!(matches!(
        Scale::log(10.0).apply(&v, &frame),
        Err(Gg3dError::ScaleDimension(_))
    ));
    assert!(matches!(
        Scale::log(10.0).apply(&scalars(&[1.0, 0.0]), &frame),
        Err(Gg3dError::ScaleDimension(_))
    ));
    assert!(matches!(
        Scale::log(1.0).apply(&scalars(&[1.0]), &frame),
        Err(Gg3dError::Validation(_))
    ));
    assert_close(
        &Scale::log(2.0).apply(&scalars(&[8.0]), &frame).unwrap().values,
        &[3.0],
    );
}

#[test]
fn clip_rejects_inverted_domain() {
    let frame = DataFrame::default();
    assert!(Scale::clip(1.0, 0.0).apply(&scalars(&[0.5]), &frame).is_err());
    assert_eq!(
        Scale::clip(0.0, 1.0)
            .apply(&scalars(&[-1.0, 0.5, 2.0]), &frame)
            .unwrap()
            .values,
        vec![0.0, 0.5, 1.0]
    );
}

#[test]
fn normalize_uses_data_or_explicit_domain() {
    let frame = DataFrame::default();
    let x = scalars(&[2.0, 4.0, 6.0]);
    assert_close(
        &Scale::normalize(0.0, 1.0).apply(&x, &frame).unwrap().values,
        &[0.0, 0.5, 1.0],
    );
    assert_close(
        &Scale::normalize(0.0, 10.0)
            .with_domain(vec![0.0], vec![8.0])
            .apply(&x, &frame)
            .unwrap()
            .values,
        &[2.5, 5.0, 7.5],
    );
    let flat = Scale::normalize(0.2, 1.0)
        .apply(&scalars(&[3.0, 3.0]), &frame)
        .unwrap();
    assert_eq!(flat.values, vec![0.2, 0.2]);
}

#[test]
fn normalize_is_per_channel() {
    let frame = DataFrame::default();
    let v = Attribute::new(Element::Vertex, Usage::Vector, 2, vec![0.0, 10.0, 1.0, 20.0]).unwrap();
    let out = Scale::normalize(0.0, 1.0).apply(&v, &frame).unwrap();
    assert_eq!(out.values, vec![0.0, 0.0, 1.0, 1.0]);

    let bad = Scale::Normalize {
        range_min: vec![0.0, 0.0, 0.0],
        range_max: vec![1.0],
        domain_min: None,
        domain_max: None,
    };
    assert!(matches!(bad.apply(&v, &frame), Err(Gg3dError::ScaleDimension(_))));
}

#[test]
fn affine_accepts_linear_and_homogeneous_matrices() {
    let frame = DataFrame::default();
    let v = Attribute::new(Element::Vertex, Usage::Vector, 2, vec![1.0, 2.0]).unwrap();
    let swap = Scale::affine(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    assert_eq!(swap.apply(&v, &frame).unwrap().values, vec![2.0, 1.0]);

    let shift = Scale::affine(vec![
        vec![1.0, 0.0, 5.0],
        vec![0.0, 1.0, -1.0],
        vec![0.0, 0.0, 1.0],
    ]);
    assert_eq!(shift.apply(&v, &frame).unwrap().values, vec![6.0, 1.0]);

    let too_big = Scale::affine(vec![vec![1.0; 4]; 4]);
    assert!(matches!(too_big.apply(&v, &frame), Err(Gg3dError::ScaleDimension(_))));
    let ragged = Scale::affine(vec![vec![1.0, 0.0], vec![1.0]]);
    assert!(matches!(ragged.apply(&v, &frame), Err(Gg3dError::Validation(_))));
}

#[test]
fn offset_adds_another_scaled_attribute() {
    let frame = frame_with("a", scalars(&[1.0, 2.0]))
        .with_attribute("b", scalars(&[10.0, 20.0]))
        .unwrap();
    let r = AttributeRef::new("a")
        .with_scale(Scale::offset(AttributeRef::new("b").with_scale(Scale::uniform(0.5))));
    assert_eq!(resolve_attribute(&r, &frame).unwrap().values, vec![6.0, 12.0]);

    let frame = frame
        .with_attribute(
            "v",
            Attribute::from_vec3(Element::Vertex, Usage::Vector, &[DVec3::ZERO; 2]),
        )
        .unwrap();
    let mismatch = AttributeRef::new("a").with_scale(Scale::offset("v"));
    assert!(matches!(
        resolve_attribute(&mismatch, &frame),
        Err(Gg3dError::ScaleDimension(_))
    ));
}

#[test]
fn custom_must_preserve_row_width() {
    let frame = DataFrame::default();
    let widen = Scale::custom(|row| vec![row[0], row[0]]);
    assert!(matches!(
        widen.apply(&scalars(&[1.0]), &frame),
        Err(Gg3dError::ScaleDimension(_))
    ));
}
