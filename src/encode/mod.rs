//! Frame export: sink contract, PNG sequences and animated GIFs.

/// Animated GIF sink.
pub mod gif;
/// PNG file and PNG sequence sink.
pub mod png;
/// Sink contract and in-memory sink.
pub mod sink;
