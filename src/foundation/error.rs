/// Convenience result alias used across layerforge.
pub type LayerforgeResult<T> = Result<T, LayerforgeError>;

/// Top-level error type for layout loading, asset handling and rendering.
#[derive(thiserror::Error, Debug)]
pub enum LayerforgeError {
    /// Input shape or argument validation failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// Asset lookup, read, fetch or decode failure.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Serialization/deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerforgeError {
    /// Build [`LayerforgeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`LayerforgeError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build [`LayerforgeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`LayerforgeError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
