use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
}

#[test]
fn over_transparent_src_keeps_dst() {
    assert_eq!(over([1, 2, 3, 255], [0, 0, 0, 0]), [1, 2, 3, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn flatten_stacks_in_order() {
    let mut red = FrameRGBA::transparent(2, 1);
    red.data[..4].copy_from_slice(&[255, 0, 0, 255]);
    let mut green = FrameRGBA::transparent(2, 1);
    green.data.copy_from_slice(&[0, 255, 0, 255, 0, 255, 0, 255]);

    let out = flatten_layers(2, 1, [&red, &green]).unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 255, 0, 255]));

    let out = flatten_layers(2, 1, [&green, &red]).unwrap();
    assert_eq!(out.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([0, 255, 0, 255]));
}

#[test]
fn flatten_rejects_mismatched_layers() {
    let small = FrameRGBA::transparent(1, 1);
    assert!(flatten_layers(2, 2, [&small]).is_err());
}

#[test]
fn over_in_place_rejects_ragged_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
}
