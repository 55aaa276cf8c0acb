use super::*;

#[test]
fn hex_and_named_colors_parse() {
    assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::new(1.0, 0.0, 0.0));
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::gray(1.0));
    assert!(Color::from_hex("ff0000").is_err());
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#zzzzzz").is_err());
    assert_eq!(Color::named("Blue"), Some(Color::new(0.0, 0.0, 1.0)));
    assert_eq!(Color::named("not-a-color"), None);
}

#[test]
fn color_like_resolves_by_variant() {
    assert_eq!(ColorLike::from(0.5).to_color().unwrap(), Color::gray(0.5));
    assert_eq!(
        ColorLike::from([0.1, 0.2, 0.3]).to_color().unwrap(),
        Color::new(0.1, 0.2, 0.3)
    );
    assert_eq!(
        ColorLike::from("#000000").to_color().unwrap(),
        Color::gray(0.0)
    );
    assert_eq!(ColorLike::from("white").to_color().unwrap(), Color::gray(1.0));
    assert!(ColorLike::from("unknown").to_color().is_err());
}

#[test]
fn only_gray_levels_are_scalars() {
    assert_eq!(ColorLike::from(0.25).to_scalar().unwrap(), 0.25);
    assert!(ColorLike::from("red").to_scalar().is_err());
    assert!(ColorLike::from([1.0, 0.0, 0.0]).to_scalar().is_err());
}

#[test]
fn lerp_and_luminance() {
    let c = Color::gray(0.0).lerp(Color::new(1.0, 0.5, 0.0), 0.5);
    assert_eq!(c, Color::new(0.5, 0.25, 0.0));
    assert!((Color::gray(1.0).luminance() - 1.0).abs() < 1e-12);
}
