use crate::foundation::error::DonutResult;
use crate::geometry::layout::ChartLayout;
use crate::geometry::segment::SegmentGeometry;
use crate::render::backend::FrameRGBA;
use crate::render::composite::flatten_layers;
use std::sync::Arc;

/// A laid-out segment together with its rasterized image.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Angles, color and vector outline.
    pub geometry: SegmentGeometry,
    /// The outline filled and stroked into a region-sized buffer.
    pub image: Arc<FrameRGBA>,
}

impl Segment {
    pub(crate) fn new(geometry: SegmentGeometry, image: FrameRGBA) -> Self {
        Self {
            geometry,
            image: Arc::new(image),
        }
    }

    /// Start angle in radians.
    pub fn start_angle(&self) -> f64 {
        self.geometry.start_angle
    }

    /// End angle in radians.
    pub fn end_angle(&self) -> f64 {
        self.geometry.end_angle
    }
}

/// One complete, immutable set of segments produced by a single build.
///
/// A chart swaps whole batches; a batch is never edited after construction.
#[derive(Clone, Debug)]
pub struct SegmentBatch {
    layout: ChartLayout,
    segments: Vec<Segment>,
}

impl SegmentBatch {
    pub(crate) fn new(layout: ChartLayout, segments: Vec<Segment>) -> Self {
        Self { layout, segments }
    }

    /// Layout the batch was built against.
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Segments in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` when the batch holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Composite every segment image, in order, into one whole-chart image.
    #[tracing::instrument(skip(self), fields(segments = self.segments.len()))]
    pub fn flatten(&self) -> DonutResult<FrameRGBA> {
        let side = self.layout.pixel_size;
        flatten_layers(side, side, self.segments.iter().map(|s| s.image.as_ref()))
    }
}
