use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Insets, Point, Rect, Size};
use crate::foundation::error::{DonutError, DonutResult};
use crate::render::backend::{RasterTarget, StrokeStyle};

/// Largest difference between the usable width and height still treated as square.
pub const SQUARE_TOLERANCE: f64 = 1e-6;

/// Host-configurable chart appearance.
///
/// The outer radius is not configured; it is derived from the host bounds minus `insets`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Radius of the hole; `0` draws a pie instead of a donut.
    pub inner_radius: f64,
    /// Space between the host bounds and the ring.
    pub insets: Insets,
    /// Color of the outline stroked around every segment.
    pub border_color: Color,
    /// Width of the outline stroked around every segment.
    pub border_width: f64,
    /// Raster pixels per view unit.
    pub scale: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            insets: Insets::ZERO,
            border_color: Color::TRANSPARENT,
            border_width: 0.0,
            scale: 1.0,
        }
    }
}

impl ChartConfig {
    /// Check the values that do not depend on the host bounds.
    pub fn validate(&self) -> DonutResult<()> {
        if !self.inner_radius.is_finite() || self.inner_radius < 0.0 {
            return Err(DonutError::validation(format!(
                "inner_radius must be finite and >= 0, got {}",
                self.inner_radius
            )));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(DonutError::validation(format!(
                "border_width must be finite and >= 0, got {}",
                self.border_width
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(DonutError::validation(format!(
                "scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Border stroke, or `None` when it would not paint anything.
    pub fn stroke(&self) -> Option<StrokeStyle> {
        StrokeStyle::visible(self.border_color, self.border_width)
    }
}

/// Resolved placement of the ring inside the host bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    /// Host bounds the layout was resolved against.
    pub bounds: Rect,
    /// Square drawing region (bounds minus insets).
    pub region: Rect,
    /// Center of the ring in view coordinates.
    pub center: Point,
    /// Half the region side.
    pub outer_radius: f64,
    /// Configured hole radius.
    pub inner_radius: f64,
    /// Outer radius of the drawn outline, pulled in by half the border width.
    pub drawn_outer_radius: f64,
    /// Inner radius of the drawn outline, pushed out by half the border width.
    pub drawn_inner_radius: f64,
    /// Outline stroke shared by all segments.
    pub stroke: Option<StrokeStyle>,
    /// Raster pixels per view unit.
    pub scale: f64,
    /// Side of the square raster images, in pixels.
    pub pixel_size: u32,
}

impl ChartLayout {
    /// Derive the ring placement from host bounds and configuration.
    ///
    /// Fails when the usable region is not square or when the inner radius does not stay
    /// strictly inside the outer radius once the border is accounted for.
    pub fn resolve(bounds: Size, config: &ChartConfig) -> DonutResult<Self> {
        config.validate()?;
        if !bounds.width.is_finite() || !bounds.height.is_finite() {
            return Err(DonutError::validation("host bounds must be finite"));
        }
        let bounds = bounds.to_rect();
        let region = config.insets.inset(bounds)?;

        let (width, height) = (region.width(), region.height());
        if (width - height).abs() > SQUARE_TOLERANCE {
            return Err(DonutError::validation(format!(
                "width and height don't match: usable region is {width}x{height} \
                 (bounds {bounds:?}, insets {:?}); bounds width minus horizontal insets must \
                 equal bounds height minus vertical insets",
                config.insets
            )));
        }

        let outer_radius = width / 2.0;
        let half_border = config.border_width / 2.0;
        let drawn_outer_radius = outer_radius - half_border;
        let inner_edge = config.inner_radius + half_border;
        if drawn_outer_radius <= inner_edge {
            return Err(DonutError::validation(format!(
                "inner radius {} must stay inside outer radius {outer_radius} after a {} border",
                config.inner_radius, config.border_width
            )));
        }
        let drawn_inner_radius = if config.inner_radius > 0.0 {
            inner_edge
        } else {
            0.0
        };

        let pixel_size = (width * config.scale).ceil();
        if pixel_size < 1.0 || pixel_size > f64::from(u32::MAX) {
            return Err(DonutError::validation(format!(
                "drawing region of {width} at scale {} has no usable pixel size",
                config.scale
            )));
        }

        Ok(Self {
            bounds,
            region,
            center: region.center(),
            outer_radius,
            inner_radius: config.inner_radius,
            drawn_outer_radius,
            drawn_inner_radius,
            stroke: config.stroke(),
            scale: config.scale,
            pixel_size: pixel_size as u32,
        })
    }

    /// Maps view coordinates into the pixel space of the region's raster images.
    pub fn pixel_transform(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate(-self.region.origin().to_vec2())
    }

    /// Raster target covering the drawing region.
    pub fn raster_target(&self) -> RasterTarget {
        RasterTarget {
            width: self.pixel_size,
            height: self.pixel_size,
            transform: self.pixel_transform(),
        }
    }

    /// Radius of a circle around `center` that covers the whole square region.
    pub fn reveal_radius(&self) -> f64 {
        self.outer_radius * std::f64::consts::SQRT_2
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/layout.rs"]
mod tests;
