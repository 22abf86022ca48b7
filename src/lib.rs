//! Donutreel renders segmented ring (pie and donut) charts and animates their reveal.
//!
//! - Turn weights and colors into annular-sector paths and rasterize them ([`SegmentBuilder`])
//! - Flatten the chart once and clip it per frame with an eased wedge ([`RevealAnimator`])
//! - Drive both from a [`PieChart`] bound to a host surface, playback primitive and main context
//! - Export reveal frames as PNG sequences or GIFs ([`FrameSink`])
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
/// The chart instance and its host seams.
pub mod chart;
/// JSON chart documents.
pub mod config;
/// Frame export sinks.
pub mod encode;
/// Segment geometry and batches.
pub mod geometry;
/// Raster backend boundary.
pub mod render;
/// Reveal animation.
pub mod reveal;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, FrameIndex, Insets, Point, Rect, Rgba8Premul, Size, Vec2,
};
pub use crate::foundation::error::{DonutError, DonutResult};
pub use crate::foundation::math::{FULL_TURN, TWELVE_OCLOCK, polar};

pub use crate::animation::ease::{Ease, EaseFn, Easing};
pub use crate::chart::host::{
    ChartSurface, InMemorySurface, InlineExecutor, MainExecutor, MainJob, MainQueue, SurfaceOp,
};
pub use crate::chart::pie::{ChartOptions, ChartPhase, PieChart};
pub use crate::config::{AnimationSpec, ChartDocument, SegmentSpec};
pub use crate::encode::gif::GifSink;
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, export_frames};
pub use crate::geometry::batch::{Segment, SegmentBatch};
pub use crate::geometry::layout::{ChartConfig, ChartLayout};
pub use crate::geometry::segment::{SegmentBuilder, SegmentGeometry, annular_sector};
pub use crate::render::backend::{
    BackendFactory, BackendKind, FrameRGBA, RasterBackend, RasterTarget, StrokeStyle,
    backend_factory, create_backend,
};
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts};
pub use crate::reveal::animator::{
    FrameSequence, RevealAnimator, RevealOpts, frame_count, wedge_path,
};
pub use crate::reveal::request::{AnimationRequest, RevealDirection, RevealStyle};
pub use crate::reveal::track::{
    CompletionFn, FillMode, InMemoryPlayback, KeyframeTrack, Playback, REVEAL_ANIMATION_KEY,
};
