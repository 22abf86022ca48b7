use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{DonutError, DonutResult};
use crate::render::backend::{FrameRGBA, RasterBackend, RasterTarget, StrokeStyle};
use std::sync::Arc;

/// Options for the CPU backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuBackendOpts {
    pub(crate) max_pixels: u64,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self {
            max_pixels: 4096 * 4096,
        }
    }
}

impl CpuBackendOpts {
    /// Return options with a different per-buffer pixel budget.
    ///
    /// Requests for larger buffers fail with [`DonutError::Render`] instead of allocating.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }
}

/// CPU raster backend powered by `vello_cpu`.
///
/// The render context is cached between calls and only rebuilt when the target size changes,
/// so a reveal pass pays for one context allocation rather than one per frame.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl CpuBackend {
    /// Create a backend with the given options.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self { opts, ctx: None }
    }

    fn dims(&self, width: u32, height: u32) -> DonutResult<(u16, u16)> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 {
            return Err(DonutError::render("raster target has zero area"));
        }
        if pixels > self.opts.max_pixels {
            return Err(DonutError::render(format!(
                "raster target {width}x{height} exceeds the {} pixel budget",
                self.opts.max_pixels
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| DonutError::render("raster width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| DonutError::render("raster height exceeds u16"))?;
        Ok((w, h))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> DonutResult<R>,
    ) -> DonutResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl RasterBackend for CpuBackend {
    fn rasterize_path(
        &mut self,
        target: RasterTarget,
        path: &BezPath,
        fill: Color,
        stroke: Option<StrokeStyle>,
    ) -> DonutResult<FrameRGBA> {
        let (w, h) = self.dims(target.width, target.height)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let cpu_path = bezpath_to_cpu(path);

        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(target.transform));
            if !fill.is_transparent() {
                ctx.set_paint(fill.to_cpu());
                ctx.fill_path(&cpu_path);
            }
            if let Some(stroke) = stroke {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke.width));
                ctx.set_paint(stroke.color.to_cpu());
                ctx.stroke_path(&cpu_path);
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(frame_from_pixmap(&pixmap))
    }

    fn clip_image(
        &mut self,
        image: &FrameRGBA,
        clip: &BezPath,
        transform: Affine,
    ) -> DonutResult<FrameRGBA> {
        let (w, h) = self.dims(image.width, image.height)?;
        let source = pixmap_from_premul_bytes(&image.data, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(source)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let clip_path = bezpath_to_cpu(clip);
        let mut pixmap = vello_cpu::Pixmap::new(w, h);

        self.with_ctx_mut(w, h, |ctx| {
            // The clip is pushed under the view transform; the image is drawn 1:1 in pixels.
            ctx.set_transform(affine_to_cpu(transform));
            ctx.push_clip_layer(&clip_path);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));
            ctx.pop_layer();
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(frame_from_pixmap(&pixmap))
    }

    fn worker_opts(&self) -> Option<CpuBackendOpts> {
        Some(self.opts)
    }
}

fn frame_from_pixmap(pixmap: &vello_cpu::Pixmap) -> FrameRGBA {
    FrameRGBA {
        width: u32::from(pixmap.width()),
        height: u32::from(pixmap.height()),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> DonutResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| DonutError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DonutError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
        return Err(DonutError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
