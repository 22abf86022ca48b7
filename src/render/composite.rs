use crate::foundation::error::{DonutError, DonutResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::backend::{FrameRGBA, check_same_size};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "source over destination" for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Composite `src` over `dst` in place; both are premultiplied RGBA8 buffers of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> DonutResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DonutError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Stack `layers` in order (first at the bottom) onto one transparent canvas.
pub fn flatten_layers<'a>(
    width: u32,
    height: u32,
    layers: impl IntoIterator<Item = &'a FrameRGBA>,
) -> DonutResult<FrameRGBA> {
    let mut out = FrameRGBA::transparent(width, height);
    for layer in layers {
        check_same_size(&out, layer)?;
        over_in_place(&mut out.data, &layer.data)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
