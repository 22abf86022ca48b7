use crate::chart::host::{ChartSurface, MainExecutor};
use crate::foundation::color::Color;
use crate::foundation::core::{Insets, Size};
use crate::foundation::error::{DonutError, DonutResult};
use crate::geometry::batch::SegmentBatch;
use crate::geometry::layout::{ChartConfig, ChartLayout};
use crate::geometry::segment::{DEFAULT_TOLERANCE, SegmentBuilder, validate_weights};
use crate::render::backend::{BackendFactory, BackendKind, RasterBackend, backend_factory};
use crate::render::cpu::CpuBackendOpts;
use crate::reveal::animator::{RevealAnimator, RevealOpts};
use crate::reveal::request::AnimationRequest;
use crate::reveal::track::{KeyframeTrack, Playback, REVEAL_ANIMATION_KEY};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::JoinHandle;

/// Whether a segment build is queued or running on the chart's worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartPhase {
    Idle,
    Building,
}

/// Worker-side settings fixed when a chart is created.
#[derive(Clone)]
pub struct ChartOptions {
    /// Constructs the raster backend on the worker thread.
    pub backend: BackendFactory,
    /// Frame rendering knobs for reveals.
    pub reveal: RevealOpts,
    /// Arc flattening tolerance for segment outlines.
    pub tolerance: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            backend: backend_factory(BackendKind::Cpu, CpuBackendOpts::default()),
            reveal: RevealOpts::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl std::fmt::Debug for ChartOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartOptions")
            .field("reveal", &self.reveal)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug)]
enum Visibility {
    Display,
    Hide,
    Remove,
}

enum Job {
    Build {
        weights: Vec<f64>,
        colors: Vec<Color>,
        bounds: Size,
        config: ChartConfig,
    },
    Animate(AnimationRequest),
    Visibility(Visibility),
    Barrier(mpsc::SyncSender<()>),
}

struct Shared {
    surface: Arc<dyn ChartSurface>,
    playback: Arc<dyn Playback>,
    main: Arc<dyn MainExecutor>,
    batch: Mutex<Option<Arc<SegmentBatch>>>,
    pending_builds: AtomicUsize,
    /// Builds plus visibility operations still waiting on the worker.
    gated: AtomicUsize,
    /// Bumped on the main context each time a reveal track is handed to playback.
    reveal_generation: AtomicU64,
}

impl Shared {
    fn current(&self) -> Option<Arc<SegmentBatch>> {
        self.batch.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn replace(&self, batch: Arc<SegmentBatch>) {
        *self.batch.lock().unwrap_or_else(|e| e.into_inner()) = Some(batch);
    }

    /// Run a visibility operation on the main context against whatever batch is current then.
    fn dispatch_visibility(self: &Arc<Self>, op: Visibility) {
        let shared = Arc::clone(self);
        self.main.dispatch(Box::new(move || {
            let Some(batch) = shared.current() else {
                tracing::warn!(?op, "no segments built yet; ignoring");
                return;
            };
            match op {
                Visibility::Display => shared.show(batch),
                Visibility::Hide => shared.surface.set_hidden(true),
                Visibility::Remove => {
                    shared.surface.detach();
                    shared.playback.remove(REVEAL_ANIMATION_KEY);
                }
            }
        }));
    }

    fn show(&self, batch: Arc<SegmentBatch>) {
        self.surface.attach(batch);
        self.surface.set_hidden(false);
        self.playback.remove(REVEAL_ANIMATION_KEY);
    }
}

/// A segmented ring chart bound to a host surface.
///
/// Segment building and reveal rendering run on one dedicated worker thread in call order.
/// Everything that touches the surface or the playback primitive runs through the host's
/// [`MainExecutor`].
pub struct PieChart {
    config: ChartConfig,
    shared: Arc<Shared>,
    tx: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl PieChart {
    /// Chart with the CPU backend and default reveal options.
    pub fn new(
        surface: Arc<dyn ChartSurface>,
        playback: Arc<dyn Playback>,
        main: Arc<dyn MainExecutor>,
    ) -> DonutResult<Self> {
        Self::with_options(surface, playback, main, ChartOptions::default())
    }

    pub fn with_options(
        surface: Arc<dyn ChartSurface>,
        playback: Arc<dyn Playback>,
        main: Arc<dyn MainExecutor>,
        opts: ChartOptions,
    ) -> DonutResult<Self> {
        opts.reveal.validate()?;
        let shared = Arc::new(Shared {
            surface,
            playback,
            main,
            batch: Mutex::new(None),
            pending_builds: AtomicUsize::new(0),
            gated: AtomicUsize::new(0),
            reveal_generation: AtomicU64::new(0),
        });
        let (tx, rx) = mpsc::channel::<Job>();
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("donutreel-worker".to_owned())
            .spawn(move || run_worker(&worker_shared, &opts, &rx))
            .map_err(|e| anyhow::anyhow!("failed to spawn chart worker: {e}"))?;
        Ok(Self {
            config: ChartConfig::default(),
            shared,
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Replace every appearance property at once; affects later builds only.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    pub fn inner_radius(&self) -> f64 {
        self.config.inner_radius
    }

    pub fn set_inner_radius(&mut self, inner_radius: f64) {
        self.config.inner_radius = inner_radius;
    }

    pub fn insets(&self) -> Insets {
        self.config.insets
    }

    pub fn set_insets(&mut self, insets: Insets) {
        self.config.insets = insets;
    }

    pub fn segment_border_color(&self) -> Color {
        self.config.border_color
    }

    pub fn set_segment_border_color(&mut self, color: Color) {
        self.config.border_color = color;
    }

    pub fn segment_border_width(&self) -> f64 {
        self.config.border_width
    }

    pub fn set_segment_border_width(&mut self, width: f64) {
        self.config.border_width = width;
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.config.scale = scale;
    }

    pub fn phase(&self) -> ChartPhase {
        if self.shared.pending_builds.load(Ordering::Acquire) > 0 {
            ChartPhase::Building
        } else {
            ChartPhase::Idle
        }
    }

    /// The most recently built batch.
    pub fn segments(&self) -> Option<Arc<SegmentBatch>> {
        self.shared.current()
    }

    /// Validate inputs now and queue a segment build against the current bounds and config.
    ///
    /// Configuration errors are returned immediately; the batch becomes current once the
    /// worker finishes rasterizing it.
    pub fn set_segments(&self, weights: &[f64], colors: &[Color]) -> DonutResult<()> {
        validate_weights(weights, colors)?;
        let bounds = self.shared.surface.bounds();
        ChartLayout::resolve(bounds, &self.config)?;

        self.shared.pending_builds.fetch_add(1, Ordering::AcqRel);
        let job = Job::Build {
            weights: weights.to_vec(),
            colors: colors.to_vec(),
            bounds,
            config: self.config.clone(),
        };
        let submitted = self.submit_gated(job);
        if submitted.is_err() {
            self.shared.pending_builds.fetch_sub(1, Ordering::AcqRel);
        }
        submitted
    }

    /// Attach the current segments, show them and drop any leftover reveal track.
    pub fn display_chart(&self) -> DonutResult<()> {
        self.visibility(Visibility::Display)
    }

    /// Hide the current segments without detaching them.
    pub fn hide_chart(&self) -> DonutResult<()> {
        self.visibility(Visibility::Hide)
    }

    /// Detach the current segments and stop a reveal still playing.
    pub fn remove_chart(&self) -> DonutResult<()> {
        self.visibility(Visibility::Remove)
    }

    /// Queue a reveal of the current segments.
    ///
    /// Once queued and rendered, the request completes exactly once on the main context: after
    /// the track plays out, or as soon as a newer reveal, `display_chart` or `remove_chart`
    /// displaces it. Only a reveal that plays out swaps the vector segments back in, and it
    /// attaches whichever batch is current by then.
    ///
    /// Unsupported styles and bad durations are rejected here and never complete. Rendering
    /// failures on the worker are reported through the request's failure callback.
    pub fn animate(&self, request: AnimationRequest) -> DonutResult<()> {
        request.validate()?;
        self.submit(Job::Animate(request))
    }

    /// Block until every job queued so far has left the worker.
    ///
    /// Jobs the worker dispatched to the main context may still be pending there.
    pub fn wait_idle(&self) -> DonutResult<()> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.submit(Job::Barrier(tx))?;
        rx.recv()
            .map_err(|_| DonutError::from(anyhow::anyhow!("chart worker stopped before barrier")))
    }

    /// Defer through the worker while a build or an earlier deferred operation is pending,
    /// so visibility changes reach the main context in call order.
    fn visibility(&self, op: Visibility) -> DonutResult<()> {
        if self.shared.gated.load(Ordering::Acquire) > 0 {
            self.submit_gated(Job::Visibility(op))
        } else {
            self.shared.dispatch_visibility(op);
            Ok(())
        }
    }

    fn submit_gated(&self, job: Job) -> DonutResult<()> {
        self.shared.gated.fetch_add(1, Ordering::AcqRel);
        let submitted = self.submit(job);
        if submitted.is_err() {
            self.shared.gated.fetch_sub(1, Ordering::AcqRel);
        }
        submitted
    }

    fn submit(&self, job: Job) -> DonutResult<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("chart worker has shut down"))?;
        tx.send(job)
            .map_err(|_| DonutError::from(anyhow::anyhow!("chart worker has shut down")))
    }
}

impl Drop for PieChart {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::error!("chart worker panicked");
        }
    }
}

impl std::fmt::Debug for PieChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieChart")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn run_worker(shared: &Arc<Shared>, opts: &ChartOptions, rx: &mpsc::Receiver<Job>) {
    let mut backend = (opts.backend)();
    let builder = SegmentBuilder::with_tolerance(opts.tolerance);
    let animator = RevealAnimator::new(opts.reveal.clone());

    while let Ok(job) = rx.recv() {
        match job {
            Job::Build {
                weights,
                colors,
                bounds,
                config,
            } => {
                let built = builder.build(&weights, &colors, bounds, &config, backend.as_mut());
                match built {
                    Ok(batch) => {
                        tracing::debug!(segments = batch.len(), "segment batch ready");
                        shared.replace(Arc::new(batch));
                    }
                    Err(e) => tracing::error!(error = %e, "segment build failed"),
                }
                shared.pending_builds.fetch_sub(1, Ordering::AcqRel);
                shared.gated.fetch_sub(1, Ordering::AcqRel);
            }
            Job::Animate(request) => animate(shared, &animator, backend.as_mut(), request),
            Job::Visibility(op) => {
                shared.dispatch_visibility(op);
                shared.gated.fetch_sub(1, Ordering::AcqRel);
            }
            Job::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("chart worker exiting");
}

fn animate(
    shared: &Arc<Shared>,
    animator: &RevealAnimator,
    backend: &mut dyn RasterBackend,
    mut request: AnimationRequest,
) {
    let (on_complete, on_failure) = request.take_callbacks();
    let rendered = shared
        .current()
        .ok_or_else(|| DonutError::validation("no segments to animate"))
        .and_then(|batch| Ok((animator.render(&batch, &request, backend)?, batch)));

    let (sequence, batch) = match rendered {
        Ok(done) => done,
        Err(e) => {
            tracing::error!(error = %e, "reveal animation aborted");
            if let Some(on_failure) = on_failure {
                shared.main.dispatch(Box::new(move || on_failure(e)));
            }
            return;
        }
    };

    let track = KeyframeTrack::from_sequence(REVEAL_ANIMATION_KEY, &sequence);
    let main_shared = Arc::clone(shared);
    shared.main.dispatch(Box::new(move || {
        main_shared.surface.detach();
        let generation = main_shared.reveal_generation.fetch_add(1, Ordering::AcqRel) + 1;
        let done_shared = Arc::clone(&main_shared);
        main_shared.playback.play(
            track,
            Box::new(move |finished| {
                let main = Arc::clone(&done_shared.main);
                main.dispatch(Box::new(move || {
                    // A replaced or removed track leaves the surface to whoever displaced it.
                    let live = done_shared.reveal_generation.load(Ordering::Acquire) == generation;
                    if finished && live {
                        done_shared.show(done_shared.current().unwrap_or(batch));
                    } else {
                        tracing::debug!(finished, live, "reveal interrupted; surface left as is");
                    }
                    if let Some(on_complete) = on_complete {
                        on_complete();
                    }
                }));
            }),
        );
    }));
}

#[cfg(test)]
#[path = "../../tests/unit/chart/pie.rs"]
mod tests;
