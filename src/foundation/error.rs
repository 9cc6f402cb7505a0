/// Convenience result type used across nin.
pub type NinResult<T> = Result<T, NinError>;

/// Top-level error taxonomy used by build and loader APIs.
#[derive(thiserror::Error, Debug)]
pub enum NinError {
    /// Invalid project layout, settings or user-provided paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// The script compiler reported errors. Carries every diagnostic, newline separated.
    #[error("compile error: {0}")]
    Compile(String),

    /// The image optimizer failed for a single asset.
    #[error("optimize error: {0}")]
    Optimize(String),

    /// The artifact compressor failed.
    #[error("compress error: {0}")]
    Compress(String),

    /// A runtime asset request could not be resolved.
    #[error("load error: {0}")]
    Load(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NinError {
    /// Build a [`NinError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NinError::Compile`] value.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Build a [`NinError::Optimize`] value.
    pub fn optimize(msg: impl Into<String>) -> Self {
        Self::Optimize(msg.into())
    }

    /// Build a [`NinError::Compress`] value.
    pub fn compress(msg: impl Into<String>) -> Self {
        Self::Compress(msg.into())
    }

    /// Build a [`NinError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`NinError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
