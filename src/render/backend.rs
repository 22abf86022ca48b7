use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{DonutError, DonutResult};
use crate::render::cpu::CpuBackendOpts;

/// A rendered raster as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Copy of the pixels with straight (un-premultiplied) alpha, for image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = (((u32::from(*c) * 255) + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Where and how large a vector path is rasterized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterTarget {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Maps path (view) coordinates into target pixel coordinates.
    pub transform: Affine,
}

/// Outline applied on top of a filled path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Color,
    /// Line width in view units.
    pub width: f64,
}

impl StrokeStyle {
    /// `None` when the stroke would not paint anything.
    pub fn visible(color: Color, width: f64) -> Option<Self> {
        if width > 0.0 && !color.is_transparent() {
            Some(Self { color, width })
        } else {
            None
        }
    }
}

/// The 2D rasterizing backend used as a black box by segment building and reveal framing.
pub trait RasterBackend {
    /// Fill `path` with `fill`, then stroke it with `stroke`, into a fresh transparent buffer.
    fn rasterize_path(
        &mut self,
        target: RasterTarget,
        path: &BezPath,
        fill: Color,
        stroke: Option<StrokeStyle>,
    ) -> DonutResult<FrameRGBA>;

    /// Draw `image` through `clip` (in view coordinates, mapped by `transform`) into a fresh
    /// transparent buffer of the same size.
    fn clip_image(
        &mut self,
        image: &FrameRGBA,
        clip: &BezPath,
        transform: Affine,
    ) -> DonutResult<FrameRGBA>;

    /// Options needed to construct equivalent backends on worker threads.
    ///
    /// Backends that return `None` are only ever driven from one thread.
    fn worker_opts(&self) -> Option<CpuBackendOpts> {
        None
    }
}

/// Constructs a fresh backend on the thread that will drive it.
pub type BackendFactory = std::sync::Arc<dyn Fn() -> Box<dyn RasterBackend> + Send + Sync>;

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a rasterizing backend implementation.
pub fn create_backend(kind: BackendKind, opts: CpuBackendOpts) -> Box<dyn RasterBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new(opts)),
    }
}

/// Factory producing backends of `kind` with `opts`.
pub fn backend_factory(kind: BackendKind, opts: CpuBackendOpts) -> BackendFactory {
    std::sync::Arc::new(move || create_backend(kind, opts))
}

pub(crate) fn check_same_size(a: &FrameRGBA, b: &FrameRGBA) -> DonutResult<()> {
    if a.width != b.width || a.height != b.height || a.data.len() != b.data.len() {
        return Err(DonutError::render(format!(
            "frame size mismatch: {}x{} vs {}x{}",
            a.width, a.height, b.width, b.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
