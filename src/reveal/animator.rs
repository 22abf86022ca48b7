use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{DonutError, DonutResult};
use crate::foundation::math::{FULL_TURN, TWELVE_OCLOCK, polar};
use crate::geometry::batch::SegmentBatch;
use crate::geometry::layout::ChartLayout;
use crate::geometry::segment::{DEFAULT_TOLERANCE, append_arc};
use crate::reveal::request::{AnimationRequest, RevealDirection};
use crate::render::backend::{FrameRGBA, RasterBackend};
use crate::render::cpu::CpuBackend;
use rayon::prelude::*;
use std::sync::Arc;

/// Frame-rendering knobs for the reveal animator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealOpts {
    /// Keyframes per second of animation.
    pub frames_per_second: u32,
    /// Render frames on a rayon pool when the backend supports worker construction.
    pub parallel: bool,
    /// Worker thread count for parallel rendering; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Arc flattening tolerance for the clip wedge, in view units.
    pub tolerance: f64,
}

impl Default for RevealOpts {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            parallel: false,
            threads: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RevealOpts {
    pub fn validate(&self) -> DonutResult<()> {
        if self.frames_per_second == 0 {
            return Err(DonutError::validation("frames_per_second must be >= 1"));
        }
        if let Some(0) = self.threads {
            return Err(DonutError::validation("reveal 'threads' must be >= 1 when set"));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(DonutError::validation(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Number of frame intervals `F` for an animation; the sequence holds `F + 1` frames.
pub fn frame_count(duration_s: f64, frames_per_second: u32) -> usize {
    let f = (f64::from(frames_per_second) * duration_s).round();
    if f.is_finite() && f >= 1.0 {
        f as usize
    } else {
        1
    }
}

/// Pie-shaped clip wedge anchored at `start`, covering `sweep` radians.
///
/// Positive sweeps run clockwise on screen, negative ones counter-clockwise. A zero sweep
/// yields an empty path and a sweep of a full turn or more yields the whole disc.
pub fn wedge_path(center: Point, radius: f64, start: f64, sweep: f64, tolerance: f64) -> BezPath {
    let mut path = BezPath::new();
    if sweep == 0.0 || !sweep.is_finite() {
        return path;
    }
    let rim = polar(center, radius, start);
    path.move_to(rim);
    if sweep.abs() >= FULL_TURN {
        append_arc(&mut path, center, radius, start, FULL_TURN, tolerance);
        path.close_path();
        return path;
    }
    append_arc(&mut path, center, radius, start, sweep, tolerance);
    path.line_to(center);
    path.line_to(rim);
    path.close_path();
    path
}

/// The frames of one reveal, in playback order.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Arc<[FrameRGBA]>,
    sweeps: Vec<f64>,
    duration_s: f64,
}

impl FrameSequence {
    /// Number of frames (`F + 1`).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for sequences produced by [`RevealAnimator`].
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    /// Shared handle to the frames, for handing to a playback primitive.
    pub fn shared_frames(&self) -> Arc<[FrameRGBA]> {
        Arc::clone(&self.frames)
    }

    /// Signed wedge sweep (radians) used for each frame, before clamping.
    pub fn sweeps(&self) -> &[f64] {
        &self.sweeps
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Time between consecutive keyframes.
    pub fn frame_interval_s(&self) -> f64 {
        self.duration_s / (self.frames.len().saturating_sub(1).max(1) as f64)
    }
}

/// Flattens a segment batch once and clips the raster with an eased wedge per frame.
#[derive(Clone, Debug, Default)]
pub struct RevealAnimator {
    opts: RevealOpts,
}

impl RevealAnimator {
    pub fn new(opts: RevealOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &RevealOpts {
        &self.opts
    }

    /// Signed sweep at normalized progress `p`.
    pub fn sweep_at(&self, request: &AnimationRequest, p: f64) -> f64 {
        let eased = request.easing.ease(p, request.duration_s);
        request.direction.sign() * eased * FULL_TURN
    }

    /// Render every frame of the reveal described by `request`.
    ///
    /// Frame `0` is fully transparent and frame `F` shows the whole chart.
    #[tracing::instrument(
        skip_all,
        fields(duration_s = request.duration_s, direction = ?request.direction)
    )]
    pub fn render(
        &self,
        batch: &SegmentBatch,
        request: &AnimationRequest,
        backend: &mut dyn RasterBackend,
    ) -> DonutResult<FrameSequence> {
        self.opts.validate()?;
        request.validate()?;
        if batch.is_empty() {
            return Err(DonutError::validation("cannot animate an empty chart"));
        }

        let whole = batch.flatten()?;
        let intervals = frame_count(request.duration_s, self.opts.frames_per_second);
        let sweeps: Vec<f64> = (0..=intervals)
            .map(|i| self.sweep_at(request, i as f64 / intervals as f64))
            .collect();
        tracing::debug!(frames = sweeps.len(), "rendering reveal frames");

        let clip = WedgeClip {
            layout: batch.layout(),
            whole: &whole,
            direction: request.direction,
            tolerance: self.opts.tolerance,
        };

        let frames = match backend.worker_opts() {
            Some(opts) if self.opts.parallel && sweeps.len() > 1 => {
                let pool = build_thread_pool(self.opts.threads)?;
                let rendered = pool.install(|| {
                    sweeps
                        .par_iter()
                        .map_init(
                            || CpuBackend::new(opts),
                            |worker_backend, &sweep| clip.frame(worker_backend, sweep),
                        )
                        .collect::<Vec<_>>()
                });
                rendered.into_iter().collect::<DonutResult<Vec<_>>>()?
            }
            _ => sweeps
                .iter()
                .map(|&sweep| clip.frame(backend, sweep))
                .collect::<DonutResult<Vec<_>>>()?,
        };

        Ok(FrameSequence {
            frames: frames.into(),
            sweeps,
            duration_s: request.duration_s,
        })
    }
}

struct WedgeClip<'a> {
    layout: &'a ChartLayout,
    whole: &'a FrameRGBA,
    direction: RevealDirection,
    tolerance: f64,
}

impl WedgeClip<'_> {
    fn frame(&self, backend: &mut dyn RasterBackend, sweep: f64) -> DonutResult<FrameRGBA> {
        // Overshooting curves reveal at most the whole chart and never run backwards.
        let revealed = (sweep * self.direction.sign()).clamp(0.0, FULL_TURN);
        let sweep = self.direction.sign() * revealed;
        if revealed == 0.0 || revealed.is_nan() {
            return Ok(FrameRGBA::transparent(self.whole.width, self.whole.height));
        }
        if sweep.abs() >= FULL_TURN {
            return Ok(self.whole.clone());
        }
        let wedge = wedge_path(
            self.layout.center,
            self.layout.reveal_radius(),
            TWELVE_OCLOCK,
            sweep,
            self.tolerance,
        );
        backend.clip_image(self.whole, &wedge, self.layout.pixel_transform())
    }
}

fn build_thread_pool(threads: Option<usize>) -> DonutResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DonutError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/animator.rs"]
mod tests;
