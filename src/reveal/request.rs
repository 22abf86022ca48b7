use crate::animation::ease::{Ease, Easing};
use crate::foundation::error::{DonutError, DonutResult};
use std::fmt;
use std::sync::Arc;

/// Which way the reveal wedge sweeps around the ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RevealDirection {
    /// Visually clockwise on screen.
    #[default]
    Clockwise,
    /// Visually counter-clockwise on screen.
    CounterClockwise,
}

impl RevealDirection {
    /// `+1.0` for clockwise, `-1.0` for counter-clockwise (y-down angles).
    pub fn sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// How segments are revealed over time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RevealStyle {
    /// One wedge sweeps around the whole chart.
    #[default]
    Sequential,
    /// All segments grow at once. Declared but not implemented; requests are rejected.
    Simultaneous,
}

type CompleteFn = Box<dyn FnOnce() + Send + 'static>;
type FailureFn = Box<dyn FnOnce(DonutError) + Send + 'static>;

/// One reveal animation call: created per call, consumed by the animator.
pub struct AnimationRequest {
    /// Playback length in seconds; must be finite and positive.
    pub duration_s: f64,
    /// Sweep direction.
    pub direction: RevealDirection,
    /// Reveal style.
    pub style: RevealStyle,
    /// Timing curve strategy.
    pub easing: Arc<dyn Easing>,
    on_complete: Option<CompleteFn>,
    on_failure: Option<FailureFn>,
}

impl AnimationRequest {
    /// Sequential, linear reveal with no callbacks.
    pub fn new(duration_s: f64, direction: RevealDirection) -> Self {
        Self {
            duration_s,
            direction,
            style: RevealStyle::Sequential,
            easing: Arc::new(Ease::Linear),
            on_complete: None,
            on_failure: None,
        }
    }

    /// Use a different reveal style.
    pub fn with_style(mut self, style: RevealStyle) -> Self {
        self.style = style;
        self
    }

    /// Use one of the built-in easing curves.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.easing = Arc::new(ease);
        self
    }

    /// Use a custom easing strategy.
    pub fn with_easing(mut self, easing: impl Easing + 'static) -> Self {
        self.easing = Arc::new(easing);
        self
    }

    /// Called once, on the main context, after playback finishes.
    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Called once, on the main context, if frame rendering fails.
    pub fn on_failure(mut self, f: impl FnOnce(DonutError) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    /// Reject unsupported styles and unusable durations.
    pub fn validate(&self) -> DonutResult<()> {
        if self.style != RevealStyle::Sequential {
            return Err(DonutError::unsupported(format!(
                "{:?} reveal style is not implemented",
                self.style
            )));
        }
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return Err(DonutError::validation(format!(
                "animation duration must be finite and > 0, got {}",
                self.duration_s
            )));
        }
        Ok(())
    }

    pub(crate) fn take_callbacks(&mut self) -> (Option<CompleteFn>, Option<FailureFn>) {
        (self.on_complete.take(), self.on_failure.take())
    }
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("duration_s", &self.duration_s)
            .field("direction", &self.direction)
            .field("style", &self.style)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/request.rs"]
mod tests;
