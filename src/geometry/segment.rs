use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Point, Size, Vec2};
use crate::foundation::error::{DonutError, DonutResult};
use crate::foundation::math::{FULL_TURN, TWELVE_OCLOCK, polar, round_to_tenth};
use crate::geometry::batch::{Segment, SegmentBatch};
use crate::geometry::layout::{ChartConfig, ChartLayout};
use crate::render::backend::RasterBackend;

/// Default curve flattening tolerance for arcs, in view units.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Pure geometry of one ring segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    /// Position in insertion order.
    pub index: usize,
    /// Caller-supplied weight.
    pub weight: f64,
    /// Share of the full turn this segment covers (weights normalized by their sum).
    pub fraction: f64,
    /// Fill color.
    pub color: Color,
    /// Start angle in radians (y-down, clockwise).
    pub start_angle: f64,
    /// End angle in radians; equals the next segment's start angle.
    pub end_angle: f64,
    /// Closed annular-sector outline in view coordinates.
    pub path: BezPath,
}

impl SegmentGeometry {
    /// Angular span in radians.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Turns weights and colors into ordered, gap-free annular sectors.
#[derive(Clone, Copy, Debug)]
pub struct SegmentBuilder {
    tolerance: f64,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SegmentBuilder {
    /// Builder with the default arc tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with a custom arc flattening tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: if tolerance.is_finite() && tolerance > 0.0 {
                tolerance
            } else {
                DEFAULT_TOLERANCE
            },
        }
    }

    /// Validate inputs and lay out every segment, without rasterizing.
    ///
    /// Segments start at 12 o'clock and advance clockwise in input order; the last segment
    /// ends exactly one full turn after the first one starts.
    pub fn plan(
        &self,
        weights: &[f64],
        colors: &[Color],
        layout: &ChartLayout,
    ) -> DonutResult<Vec<SegmentGeometry>> {
        let total = validate_weights(weights, colors)?;

        let mut out = Vec::with_capacity(weights.len());
        let mut start_angle = TWELVE_OCLOCK;
        let mut cumulative = 0.0;
        for (index, (&weight, &color)) in weights.iter().zip(colors).enumerate() {
            let fraction = weight / total;
            cumulative += weight;
            let end_angle = if index + 1 == weights.len() {
                TWELVE_OCLOCK + FULL_TURN
            } else {
                TWELVE_OCLOCK + (cumulative / total) * FULL_TURN
            };
            let path = annular_sector(
                layout.center,
                layout.drawn_outer_radius,
                layout.drawn_inner_radius,
                start_angle,
                end_angle,
                self.tolerance,
            );
            out.push(SegmentGeometry {
                index,
                weight,
                fraction,
                color,
                start_angle,
                end_angle,
                path,
            });
            start_angle = end_angle;
        }
        Ok(out)
    }

    /// Rasterize planned segments into region-sized images.
    #[tracing::instrument(skip_all, fields(segments = plan.len(), px = layout.pixel_size))]
    pub fn rasterize(
        &self,
        plan: Vec<SegmentGeometry>,
        layout: ChartLayout,
        backend: &mut dyn RasterBackend,
    ) -> DonutResult<SegmentBatch> {
        let target = layout.raster_target();
        let mut segments = Vec::with_capacity(plan.len());
        for geometry in plan {
            let image = backend.rasterize_path(target, &geometry.path, geometry.color, layout.stroke)?;
            segments.push(Segment::new(geometry, image));
        }
        Ok(SegmentBatch::new(layout, segments))
    }

    /// Validate, lay out and rasterize in one step.
    pub fn build(
        &self,
        weights: &[f64],
        colors: &[Color],
        bounds: Size,
        config: &ChartConfig,
        backend: &mut dyn RasterBackend,
    ) -> DonutResult<SegmentBatch> {
        let layout = ChartLayout::resolve(bounds, config)?;
        let plan = self.plan(weights, colors, &layout)?;
        self.rasterize(plan, layout, backend)
    }
}

/// Check weight/color pairing and that the weights sum to 1.0 to one decimal place.
///
/// Returns the exact sum, which is used to normalize the weights.
pub fn validate_weights(weights: &[f64], colors: &[Color]) -> DonutResult<f64> {
    if weights.len() != colors.len() {
        return Err(DonutError::validation(format!(
            "the number of weights ({}) and colors ({}) must be the same",
            weights.len(),
            colors.len()
        )));
    }
    if weights.is_empty() {
        return Err(DonutError::validation("at least one segment is required"));
    }
    if let Some((i, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w <= 0.0 || **w > 1.0)
    {
        return Err(DonutError::validation(format!(
            "weight {i} must be in (0, 1], got {w}"
        )));
    }
    let total: f64 = weights.iter().sum();
    if round_to_tenth(total) != 1.0 {
        return Err(DonutError::validation(format!(
            "the sum of weights must be 1.0: {total}"
        )));
    }
    Ok(total)
}

/// Closed donut-slice outline between `start` and `end` (clockwise on screen).
///
/// The outer arc runs start -> end, a radial line drops to the inner radius, the inner arc
/// runs back end -> start, and a radial line returns to the outer start point. With
/// `inner_radius == 0` the inner arc collapses to the center and the outline is a pie slice.
pub fn annular_sector(
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    start: f64,
    end: f64,
    tolerance: f64,
) -> BezPath {
    let sweep = end - start;
    let mut path = BezPath::new();
    path.move_to(polar(center, outer_radius, start));
    append_arc(&mut path, center, outer_radius, start, sweep, tolerance);
    path.line_to(polar(center, inner_radius, end));
    if inner_radius > 0.0 {
        append_arc(&mut path, center, inner_radius, end, -sweep, tolerance);
    }
    path.line_to(polar(center, outer_radius, start));
    path.close_path();
    path
}

pub(crate) fn append_arc(
    path: &mut BezPath,
    center: Point,
    radius: f64,
    start: f64,
    sweep: f64,
    tolerance: f64,
) {
    let arc = kurbo::Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    for el in arc.append_iter(tolerance) {
        path.push(el);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/segment.rs"]
mod tests;
