//! JSON chart documents: bounds, appearance, segments and an optional reveal.

use crate::animation::ease::Ease;
use crate::foundation::color::Color;
use crate::foundation::core::Size;
use crate::foundation::error::{DonutError, DonutResult};
use crate::geometry::batch::SegmentBatch;
use crate::geometry::layout::{ChartConfig, ChartLayout};
use crate::geometry::segment::{SegmentBuilder, validate_weights};
use crate::render::backend::RasterBackend;
use crate::reveal::request::{AnimationRequest, RevealDirection, RevealStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One weighted, colored segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentSpec {
    pub weight: f64,
    pub color: Color,
}

/// Reveal parameters stored alongside a chart.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSpec {
    /// Seconds.
    pub duration: f64,
    pub direction: RevealDirection,
    pub style: RevealStyle,
    pub ease: Ease,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: 1.0,
            direction: RevealDirection::Clockwise,
            style: RevealStyle::Sequential,
            ease: Ease::Linear,
        }
    }
}

impl AnimationSpec {
    /// Request without callbacks for these parameters.
    pub fn to_request(&self) -> AnimationRequest {
        AnimationRequest::new(self.duration, self.direction)
            .with_style(self.style)
            .with_ease(self.ease)
    }
}

/// A self-contained chart description, as read by the command line tool.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartDocument {
    /// Host width in view units.
    pub width: f64,
    /// Host height in view units.
    pub height: f64,
    #[serde(default)]
    pub config: ChartConfig,
    pub segments: Vec<SegmentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpec>,
}

impl ChartDocument {
    /// Parse a chart document from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> DonutResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DonutError::serde(format!("parse chart JSON: {e}")))
    }

    /// Parse a chart document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DonutResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DonutError::validation(format!("open chart JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> DonutResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DonutError::serde(format!("serialize chart JSON: {e}")))
    }

    pub fn bounds(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn weights(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.weight).collect()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.segments.iter().map(|s| s.color).collect()
    }

    /// The document's reveal, or the default one.
    pub fn animation_or_default(&self) -> AnimationSpec {
        self.animation.unwrap_or_default()
    }

    /// Check segments and layout without rasterizing anything.
    pub fn validate(&self) -> DonutResult<ChartLayout> {
        validate_weights(&self.weights(), &self.colors())?;
        let layout = ChartLayout::resolve(self.bounds(), &self.config)?;
        if let Some(animation) = &self.animation {
            animation.to_request().validate()?;
        }
        Ok(layout)
    }

    /// Build and rasterize the segments.
    pub fn build(&self, backend: &mut dyn RasterBackend) -> DonutResult<SegmentBatch> {
        SegmentBuilder::new().build(
            &self.weights(),
            &self.colors(),
            self.bounds(),
            &self.config,
            backend,
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
