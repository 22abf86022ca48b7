use crate::foundation::core::Size;
use crate::geometry::batch::SegmentBatch;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// The host view a chart draws into.
///
/// All methods except `bounds` are only ever called through the chart's [`MainExecutor`].
pub trait ChartSurface: Send + Sync {
    /// Current host bounds in view units.
    fn bounds(&self) -> Size;
    /// Show the vector segments of `batch`, replacing anything attached before.
    fn attach(&self, batch: Arc<SegmentBatch>);
    /// Toggle visibility of the attached segments without detaching them.
    fn set_hidden(&self, hidden: bool);
    /// Remove the attached segments from the view.
    fn detach(&self);
}

/// Operation recorded by [`InMemorySurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    /// `attach` with a batch of this many segments.
    Attach(usize),
    SetHidden(bool),
    Detach,
}

#[derive(Debug)]
struct SurfaceState {
    bounds: Size,
    attached: Option<Arc<SegmentBatch>>,
    hidden: bool,
    ops: Vec<SurfaceOp>,
}

/// Headless surface that keeps the attached batch and an operation log.
#[derive(Debug)]
pub struct InMemorySurface {
    state: Mutex<SurfaceState>,
}

impl InMemorySurface {
    pub fn new(bounds: Size) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                bounds,
                attached: None,
                hidden: false,
                ops: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate a host layout change.
    pub fn set_bounds(&self, bounds: Size) {
        self.state().bounds = bounds;
    }

    pub fn attached(&self) -> Option<Arc<SegmentBatch>> {
        self.state().attached.clone()
    }

    pub fn is_hidden(&self) -> bool {
        self.state().hidden
    }

    /// Attached and not hidden.
    pub fn is_showing(&self) -> bool {
        let state = self.state();
        state.attached.is_some() && !state.hidden
    }

    /// Every operation received so far, in order.
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.state().ops.clone()
    }
}

impl ChartSurface for InMemorySurface {
    fn bounds(&self) -> Size {
        self.state().bounds
    }

    fn attach(&self, batch: Arc<SegmentBatch>) {
        let mut state = self.state();
        state.ops.push(SurfaceOp::Attach(batch.len()));
        state.attached = Some(batch);
    }

    fn set_hidden(&self, hidden: bool) {
        let mut state = self.state();
        state.ops.push(SurfaceOp::SetHidden(hidden));
        state.hidden = hidden;
    }

    fn detach(&self) {
        let mut state = self.state();
        state.ops.push(SurfaceOp::Detach);
        state.attached = None;
    }
}

/// Work marshaled onto the host's main context.
pub type MainJob = Box<dyn FnOnce() + Send + 'static>;

/// The host's main (UI) execution context.
pub trait MainExecutor: Send + Sync {
    /// Run `job` on the main context, now or later, in dispatch order.
    fn dispatch(&self, job: MainJob);
}

/// Runs every job immediately on the dispatching thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl MainExecutor for InlineExecutor {
    fn dispatch(&self, job: MainJob) {
        job();
    }
}

/// Queues jobs until the host drains them with [`MainQueue::run_pending`].
#[derive(Default)]
pub struct MainQueue {
    jobs: Mutex<VecDeque<MainJob>>,
}

impl MainQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> MutexGuard<'_, VecDeque<MainJob>> {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs().len()
    }

    /// Run queued jobs, including ones they dispatch, until the queue is empty.
    ///
    /// Returns how many jobs ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let Some(job) = self.jobs().pop_front() else {
                return ran;
            };
            job();
            ran += 1;
        }
    }
}

impl MainExecutor for MainQueue {
    fn dispatch(&self, job: MainJob) {
        self.jobs().push_back(job);
    }
}

impl std::fmt::Debug for MainQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/host.rs"]
mod tests;
