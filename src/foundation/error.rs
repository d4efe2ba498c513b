/// Convenience result type used across thumbforge.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// Top-level error taxonomy used by engine APIs.
///
/// [`ThumbError::ImageLoad`] and [`ThumbError::Serialization`] abort a composite and are
/// surfaced to the caller. [`ThumbError::RenderElement`] is recovered inside the compositor:
/// the failing text layer is skipped and recorded in the [`crate::RenderReport`].
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// A required input image failed to decode, was empty, or did not arrive in time.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Output encoding failed, typically because the surface is not origin-clean.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A single text element could not be drawn.
    #[error("render element error: {0}")]
    RenderElement(String),

    /// The background-removal collaborator failed.
    #[error("processing error: {0}")]
    Processing(String),

    /// Invalid user-provided data (filters, presets, config, element lists).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`ThumbError::Serialization`] value.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Build a [`ThumbError::RenderElement`] value.
    pub fn render_element(msg: impl Into<String>) -> Self {
        Self::RenderElement(msg.into())
    }

    /// Build a [`ThumbError::Processing`] value.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Build a [`ThumbError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether re-fetching the inputs may fix the failure.
    ///
    /// Only image loads are retryable; a serialization failure points at a
    /// cross-origin or configuration problem that a retry will not cure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ImageLoad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
