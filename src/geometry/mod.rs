//! Segment geometry: layout resolution, annular sectors and rasterized batches.

/// Built segment batches.
pub mod batch;
/// Chart configuration and resolved layout.
pub mod layout;
/// Segment planning and rasterization.
pub mod segment;
