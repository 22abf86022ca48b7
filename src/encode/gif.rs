use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DonutError, DonutResult};
use crate::render::backend::FrameRGBA;
use anyhow::Context;
use image::codecs::gif::{GifEncoder, Repeat};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Encodes frames into an animated GIF that plays once and holds its last frame.
pub struct GifSink {
    path: PathBuf,
    frame_interval_s: f64,
    pushed: u64,
    encoder: Option<GifEncoder<BufWriter<File>>>,
}

impl GifSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame_interval_s: 0.0,
            pushed: 0,
            encoder: None,
        }
    }
}

/// Delay of the frame shown `n` intervals in, in the format's 10 ms units.
///
/// Frame boundaries are rounded on the running timeline, so per-frame error never accumulates.
pub(crate) fn gif_delay_cs(frame_interval_s: f64, n: u64) -> u32 {
    let boundary = |k: u64| (k as f64 * frame_interval_s * 100.0).round().max(0.0) as u64;
    boundary(n + 1).saturating_sub(boundary(n)) as u32
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> DonutResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("create gif '{}'", self.path.display()))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Finite(0))
            .context("configure gif repeat")?;
        self.frame_interval_s = cfg.frame_interval_s;
        self.pushed = 0;
        self.encoder = Some(encoder);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DonutResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| DonutError::validation("gif sink used before begin"))?;
        let buffer = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
            .ok_or_else(|| DonutError::render(format!("frame {} has a ragged buffer", idx.0)))?;
        let delay = image::Delay::from_numer_denom_ms(
            gif_delay_cs(self.frame_interval_s, self.pushed) * 10,
            1,
        );
        encoder
            .encode_frame(image::Frame::from_parts(buffer, 0, 0, delay))
            .with_context(|| format!("encode gif frame {}", idx.0))?;
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> DonutResult<()> {
        // The trailer is written when the encoder drops.
        drop(self.encoder.take());
        tracing::debug!(path = %self.path.display(), "gif written");
        Ok(())
    }
}

impl std::fmt::Debug for GifSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("path", &self.path)
            .field("pushed", &self.pushed)
            .field("open", &self.encoder.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
