//! Reveal animation: eased wedge clipping over a flattened chart, and keyframe playback.

/// Frame generation.
pub mod animator;
/// Per-call animation requests.
pub mod request;
/// Keyframe tracks and the playback primitive seam.
pub mod track;
