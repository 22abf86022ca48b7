//! The chart instance: a serial build/reveal worker gated against visibility changes.

/// Host seams: surface and main-context executor.
pub mod host;
/// The chart itself.
pub mod pie;
