/// Result alias that carries the custom [`VisualiserError`] type.
pub type Result<T> = std::result::Result<T, VisualiserError>;

/// Common error type for the core crate.
///
/// Nothing on the per-frame drawing path returns this type. Errors only come
/// from configuration, the sample source and whatever the caller does with a
/// finished frame.
#[derive(Debug, thiserror::Error)]
pub enum VisualiserError {
    /// Free-form message for collaborators that have no richer taxonomy.
    #[error("{0}")]
    Message(String),
    /// Configuration values that parse but cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Wrapper around JSON (de)serialisation failures.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl VisualiserError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VisualiserError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VisualiserError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
