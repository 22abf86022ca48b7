use crate::foundation::error::{DonutError, DonutResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// 0-based index of a frame within a reveal animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Extent of a host view, in points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size from its two extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Rectangle at the origin with this size.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Edge insets subtracted from the host bounds before laying out the ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Insets {
    /// Top inset.
    pub top: f64,
    /// Left inset.
    pub left: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Right inset.
    pub right: f64,
}

impl Insets {
    /// Insets with no effect.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Same inset on every edge.
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            left: v,
            bottom: v,
            right: v,
        }
    }

    /// Shrink `bounds` by these insets.
    ///
    /// Fails when the insets consume the whole bounds or are not finite.
    pub fn inset(self, bounds: Rect) -> DonutResult<Rect> {
        let all = [self.top, self.left, self.bottom, self.right];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(DonutError::validation("insets must be finite"));
        }
        let x0 = bounds.x0 + self.left;
        let y0 = bounds.y0 + self.top;
        let x1 = bounds.x1 - self.right;
        let y1 = bounds.y1 - self.bottom;
        if x1 <= x0 || y1 <= y0 {
            return Err(DonutError::validation(format!(
                "insets {self:?} leave no drawing region inside bounds {bounds:?}"
            )));
        }
        Ok(Rect::new(x0, y0, x1, y1))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: crate::foundation::math::mul_div255_u8(u16::from(r), u16::from(a)),
            g: crate::foundation::math::mul_div255_u8(u16::from(g), u16::from(a)),
            b: crate::foundation::math::mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
