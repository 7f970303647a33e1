/// Result alias that carries the custom [`ShapesError`] type.
pub type Result<T> = std::result::Result<T, ShapesError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ShapesError {
    /// Free-form message, mostly raised by animation modules that want to
    /// surface a readable reason to the scheduler log.
    #[error("{0}")]
    Message(String),
    /// A caller handed in a value the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A shape key that is not part of the descriptor table.
    #[error("unknown shape `{0}`")]
    UnknownShape(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration files that fail to parse.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ShapesError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
