use super::*;

#[test]
fn transparent_frame_is_blank() {
    let f = FrameRGBA::transparent(3, 2);
    assert_eq!(f.data.len(), 3 * 2 * 4);
    assert!(f.is_blank());
    assert_eq!(f.covered_pixels(), 0);
    assert_eq!(f.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(3, 0), None);
}

#[test]
fn straight_alpha_export_undoes_premultiply() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 64, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    let s = f.to_straight_rgba8();
    assert_eq!(&s[0..4], &[255, 128, 0, 128]);
    assert_eq!(&s[4..8], &[10, 20, 30, 255]);
}

#[test]
fn invisible_strokes_are_dropped() {
    assert!(StrokeStyle::visible(Color::TRANSPARENT, 4.0).is_none());
    assert!(StrokeStyle::visible(Color::BLACK, 0.0).is_none());
    assert!(StrokeStyle::visible(Color::BLACK, 1.5).is_some());
}

#[test]
fn size_mismatch_is_a_render_error() {
    let a = FrameRGBA::transparent(2, 2);
    let b = FrameRGBA::transparent(3, 2);
    assert!(matches!(check_same_size(&a, &b), Err(DonutError::Render(_))));
    assert!(check_same_size(&a, &a.clone()).is_ok());
}
