use super::*;

#[test]
fn premul_converts_expected() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 64);
    assert_eq!(p.b, 0);
}

#[test]
fn insets_shrink_bounds() {
    let r = Insets {
        top: 10.0,
        left: 20.0,
        bottom: 30.0,
        right: 40.0,
    }
    .inset(Size::new(200.0, 200.0).to_rect())
    .unwrap();
    assert_eq!(r, Rect::new(20.0, 10.0, 160.0, 170.0));
}

#[test]
fn insets_that_consume_bounds_are_rejected() {
    let err = Insets::uniform(60.0)
        .inset(Size::new(100.0, 100.0).to_rect())
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn insets_deserialize_with_missing_edges() {
    let i: Insets = serde_json::from_str(r#"{"top": 4}"#).unwrap();
    assert_eq!(
        i,
        Insets {
            top: 4.0,
            ..Insets::ZERO
        }
    );
}
