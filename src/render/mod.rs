//! Raster backend boundary and the built-in CPU backend.

/// Backend trait, frame buffers and raster targets.
pub mod backend;
/// Premultiplied "over" compositing.
pub mod composite;
/// `vello_cpu` backend.
pub mod cpu;
