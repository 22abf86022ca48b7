use super::*;

#[test]
fn resolves_square_region_with_insets() {
    let config = ChartConfig {
        insets: Insets {
            top: 10.0,
            left: 20.0,
            bottom: 30.0,
            right: 0.0,
        },
        ..ChartConfig::default()
    };
    let layout = ChartLayout::resolve(Size::new(220.0, 240.0), &config).unwrap();
    assert_eq!(layout.region, Rect::new(20.0, 10.0, 220.0, 210.0));
    assert_eq!(layout.center, Point::new(120.0, 110.0));
    assert_eq!(layout.outer_radius, 100.0);
    assert_eq!(layout.pixel_size, 200);
    assert_eq!(layout.drawn_inner_radius, 0.0);
}

#[test]
fn non_square_region_is_rejected() {
    let err = ChartLayout::resolve(Size::new(200.0, 150.0), &ChartConfig::default()).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("width and height don't match"));
}

#[test]
fn border_compensates_radii() {
    let config = ChartConfig {
        inner_radius: 40.0,
        border_width: 4.0,
        border_color: Color::WHITE,
        ..ChartConfig::default()
    };
    let layout = ChartLayout::resolve(Size::new(200.0, 200.0), &config).unwrap();
    assert_eq!(layout.drawn_outer_radius, 98.0);
    assert_eq!(layout.drawn_inner_radius, 42.0);
    assert_eq!(layout.stroke, StrokeStyle::visible(Color::WHITE, 4.0));
}

#[test]
fn inner_radius_must_stay_inside_after_border() {
    let config = ChartConfig {
        inner_radius: 95.0,
        border_width: 10.0,
        ..ChartConfig::default()
    };
    assert!(
        ChartLayout::resolve(Size::new(200.0, 200.0), &config)
            .unwrap_err()
            .is_validation()
    );

    let config = ChartConfig {
        inner_radius: 100.0,
        ..ChartConfig::default()
    };
    assert!(ChartLayout::resolve(Size::new(200.0, 200.0), &config).is_err());
}

#[test]
fn negative_values_are_rejected() {
    for config in [
        ChartConfig {
            inner_radius: -1.0,
            ..ChartConfig::default()
        },
        ChartConfig {
            border_width: -1.0,
            ..ChartConfig::default()
        },
        ChartConfig {
            scale: 0.0,
            ..ChartConfig::default()
        },
    ] {
        assert!(config.validate().is_err(), "{config:?}");
    }
}

#[test]
fn pixel_transform_scales_region_to_origin() {
    let config = ChartConfig {
        insets: Insets::uniform(5.0),
        scale: 2.0,
        ..ChartConfig::default()
    };
    let layout = ChartLayout::resolve(Size::new(110.0, 110.0), &config).unwrap();
    assert_eq!(layout.pixel_size, 200);
    let p = layout.pixel_transform() * Point::new(5.0, 105.0);
    assert!((p.x - 0.0).abs() < 1e-9);
    assert!((p.y - 200.0).abs() < 1e-9);
    assert!(layout.reveal_radius() > layout.outer_radius);
}

#[test]
fn config_defaults_fill_missing_fields() {
    let config: ChartConfig =
        serde_json::from_str(r##"{"inner_radius": 12, "border_color": "#000"}"##).unwrap();
    assert_eq!(config.inner_radius, 12.0);
    assert_eq!(config.border_color, Color::BLACK);
    assert_eq!(config.scale, 1.0);
    assert_eq!(config.insets, Insets::ZERO);
}
