/// Convenience result type used across the crate.
pub type SheetResult<T> = Result<T, SheetError>;

/// Top-level error taxonomy used by the export engine.
///
/// Every variant aborts the export; no partially composited sheet is ever handed to a host.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    /// The frame range is inverted or has a zero step.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Every frame in the range was discarded by the selection filters.
    #[error("empty selection: {0}")]
    EmptySelection(String),

    /// Trim mode found no non-empty frame, so no crop rectangle exists.
    #[error("degenerate trim: {0}")]
    DegenerateTrim(String),

    /// The animation source failed to settle a render or to serve a read.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// Invalid user-provided configuration or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when parsing manifests or export configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// Build a [`SheetError::InvalidRange`] value.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build a [`SheetError::EmptySelection`] value.
    pub fn empty_selection(msg: impl Into<String>) -> Self {
        Self::EmptySelection(msg.into())
    }

    /// Build a [`SheetError::DegenerateTrim`] value.
    pub fn degenerate_trim(msg: impl Into<String>) -> Self {
        Self::DegenerateTrim(msg.into())
    }

    /// Build a [`SheetError::SourceUnavailable`] value.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Build a [`SheetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SheetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
