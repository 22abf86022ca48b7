use crate::render::backend::FrameRGBA;
use crate::reveal::animator::FrameSequence;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifier every reveal track is registered under, so a newer reveal replaces an older one.
pub const REVEAL_ANIMATION_KEY: &str = "donutreel.reveal";

/// What a playback primitive shows once a track has finished.
///
/// Reveals always hold their last frame until the chart swaps the vector layers back in.
/// `Clear` is for hosts that play their own tracks through the same primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Keep presenting the last frame.
    #[default]
    HoldLast,
    /// Present nothing.
    Clear,
}

/// Discrete frames played back evenly over a fixed duration.
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    pub key: String,
    pub frames: Arc<[FrameRGBA]>,
    pub duration_s: f64,
    pub fill: FillMode,
    /// Whether the primitive drops the track on its own after it finishes.
    pub remove_on_completion: bool,
}

impl KeyframeTrack {
    /// Hold-last, never auto-removed track for a rendered reveal.
    pub fn from_sequence(key: impl Into<String>, sequence: &FrameSequence) -> Self {
        Self {
            key: key.into(),
            frames: sequence.shared_frames(),
            duration_s: sequence.duration_s(),
            fill: FillMode::HoldLast,
            remove_on_completion: false,
        }
    }

    /// Index of the keyframe on screen `t_s` seconds into playback.
    pub fn frame_index_at(&self, t_s: f64) -> Option<usize> {
        let last = self.frames.len().checked_sub(1)?;
        if last == 0 || self.duration_s.is_nan() || self.duration_s <= 0.0 {
            return Some(last);
        }
        let p = (t_s / self.duration_s).clamp(0.0, 1.0);
        Some(((p * last as f64).floor() as usize).min(last))
    }

    pub fn frame_at(&self, t_s: f64) -> Option<&FrameRGBA> {
        self.frame_index_at(t_s).and_then(|i| self.frames.get(i))
    }
}

/// Callback invoked by a playback primitive once a track stops.
///
/// The flag is `true` when the track played to its end and `false` when it was replaced or
/// removed first.
pub type CompletionFn = Box<dyn FnOnce(bool) + Send + 'static>;

/// The host's keyframe playback primitive.
///
/// Every `on_complete` handed to [`Playback::play`] runs exactly once. Implementations may
/// invoke it from any thread, and callers re-dispatch to their main context themselves.
pub trait Playback: Send + Sync {
    /// Start `track` under `track.key`. A track still playing under that key is stopped and
    /// its completion runs with `false`.
    fn play(&self, track: KeyframeTrack, on_complete: CompletionFn);

    /// Stop and drop the track registered under `key`, if any. An unfinished track's
    /// completion runs with `false`.
    fn remove(&self, key: &str);
}

struct Playing {
    track: KeyframeTrack,
    on_complete: Option<CompletionFn>,
    finished: bool,
}

/// Headless playback that records tracks and finishes them when told to.
#[derive(Default)]
pub struct InMemoryPlayback {
    playing: Mutex<HashMap<String, Playing>>,
    started: Mutex<Vec<String>>,
}

impl InMemoryPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    fn playing(&self) -> MutexGuard<'_, HashMap<String, Playing>> {
        self.playing.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track registered under `key`.
    pub fn track(&self, key: &str) -> Option<KeyframeTrack> {
        self.playing().get(key).map(|p| p.track.clone())
    }

    /// Keys passed to [`Playback::play`], in call order.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Frame presented for `key` right now: the last one after a hold-last finish.
    pub fn presented_frame(&self, key: &str) -> Option<FrameRGBA> {
        let playing = self.playing();
        let p = playing.get(key)?;
        match (p.finished, p.track.fill) {
            (false, _) => p.track.frames.first().cloned(),
            (true, FillMode::HoldLast) => p.track.frames.last().cloned(),
            (true, FillMode::Clear) => None,
        }
    }

    /// Mark the track under `key` finished and run its completion callback.
    ///
    /// Returns `false` when nothing is playing under `key` or it already finished.
    pub fn finish(&self, key: &str) -> bool {
        let on_complete = {
            let mut playing = self.playing();
            let Some(p) = playing.get_mut(key) else {
                return false;
            };
            if p.finished {
                return false;
            }
            p.finished = true;
            let on_complete = p.on_complete.take();
            if p.track.remove_on_completion {
                playing.remove(key);
            }
            on_complete
        };
        // Run outside the lock: completions usually call back into `remove`.
        if let Some(f) = on_complete {
            f(true);
        }
        true
    }
}

/// Run a displaced track's pending completion, if it never finished.
fn interrupt(displaced: Option<Playing>) {
    let Some(Playing {
        track,
        on_complete: Some(on_complete),
        ..
    }) = displaced
    else {
        return;
    };
    tracing::debug!(key = %track.key, "keyframe track interrupted");
    on_complete(false);
}

impl Playback for InMemoryPlayback {
    fn play(&self, track: KeyframeTrack, on_complete: CompletionFn) {
        tracing::debug!(key = %track.key, frames = track.frames.len(), "play keyframe track");
        self.started
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(track.key.clone());
        let key = track.key.clone();
        let replaced = self.playing().insert(
            key,
            Playing {
                track,
                on_complete: Some(on_complete),
                finished: false,
            },
        );
        interrupt(replaced);
    }

    fn remove(&self, key: &str) {
        let removed = self.playing().remove(key);
        interrupt(removed);
    }
}

impl std::fmt::Debug for InMemoryPlayback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.playing().keys().cloned().collect();
        f.debug_struct("InMemoryPlayback")
            .field("playing", &keys)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/track.rs"]
mod tests;
