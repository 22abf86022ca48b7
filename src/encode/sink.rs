use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DonutError, DonutResult};
use crate::render::backend::FrameRGBA;
use crate::reveal::animator::FrameSequence;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
    /// Seconds each frame stays on screen.
    pub frame_interval_s: f64,
}

/// Sink contract for consuming rendered frames in playback order.
///
/// `push_frame` is called with strictly increasing `FrameIndex` values starting at `0`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DonutResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DonutResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> DonutResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DonutResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DonutResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DonutResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Push every frame of `sequence` into `sink`, in order.
#[tracing::instrument(skip_all, fields(frames = sequence.len()))]
pub fn export_frames(sequence: &FrameSequence, sink: &mut dyn FrameSink) -> DonutResult<()> {
    let first = sequence
        .frames()
        .first()
        .ok_or_else(|| DonutError::validation("cannot export an empty frame sequence"))?;
    sink.begin(SinkConfig {
        width: first.width,
        height: first.height,
        frame_count: sequence.len(),
        frame_interval_s: sequence.frame_interval_s(),
    })?;
    for (i, frame) in sequence.frames().iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
