/// Crate-wide result alias.
pub type DonutResult<T> = Result<T, DonutError>;

/// Errors reported by chart construction, rasterization and reveal animation.
#[derive(thiserror::Error, Debug)]
pub enum DonutError {
    /// Caller misconfiguration: weights, colors, region or radii are inconsistent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The raster backend could not produce a pixel buffer.
    #[error("render error: {0}")]
    Render(String),

    /// A reveal style that is declared but has no implementation.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Chart document (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure (I/O, image encoding).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DonutError {
    /// Build a [`DonutError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DonutError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DonutError::Unsupported`].
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`DonutError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for caller misconfiguration errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
