//! Session error types.

/// Errors from persisting session identity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the store file failed
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store could not be serialized
    #[error("session store serialization error: {message}")]
    Serialize { message: String },
}
