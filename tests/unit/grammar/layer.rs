use super::*;

fn paths(layer: &Layer) -> Vec<String> {
    layer.leaves().iter().map(|l| l.path.to_string()).collect()
}

#[test]
fn overwrite_ops_leave_the_receiver_untouched() {
    let base = Layer::from_data(DataFrame::unit_cube());
    let point = base.mark(Mark::Point);
    let surface = base.mark(Mark::Surface);

    assert!(base.children().is_empty());
    assert!(base.spec().mark.is_none());
    assert_eq!(point.spec().mark, Some(Mark::Point));
    assert_eq!(surface.spec().mark, Some(Mark::Surface));
    assert!(point.children()[0].ptr_eq(&base));
    assert!(surface.children()[0].ptr_eq(&base));
}

#[test]
fn composition_keeps_operands_as_children() {
    let a = Layer::from_data(DataFrame::unit_cube());
    let b = a.mark(Mark::Point);
    let both = &a + &b;
    assert_eq!(both.children().len(), 2);
    assert!(both.children()[0].ptr_eq(&a));
    assert!(both.children()[1].ptr_eq(&b));
    assert_eq!(both.leaf_count(), 2);
    assert_eq!(paths(&both), vec!["root/0", "root/1"]);
}

#[test]
fn leaf_specs_run_from_leaf_to_root() {
    let l = Layer::from_data(DataFrame::unit_cube())
        .mark(Mark::Point)
        .mark(Mark::Curve);
    let leaves = l.leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].path, LayerPath::default());
    let marks: Vec<_> = leaves[0].specs.iter().map(|s| s.mark).collect();
    assert_eq!(marks, vec![None, Some(Mark::Point), Some(Mark::Curve)]);
}

#[test]
fn nested_composition_paths() {
    let a = Layer::from_data(DataFrame::unit_cube());
    let tree = (a.clone() + (a.clone() + a.clone()).scale(2.0)).mark(Mark::Point);
    assert_eq!(paths(&tree), vec!["root/0", "root/1/0", "root/1/1"]);
}

#[test]
fn layers_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Layer>();

    let base = Layer::from_data(DataFrame::unit_cube());
    let built: Vec<Layer> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u32)
            .map(|i| {
                let base = &base;
                s.spawn(move || base.scale(f64::from(i + 1)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(base.children().is_empty());
    assert!(built.iter().all(|l| l.children()[0].ptr_eq(&base)));
}
