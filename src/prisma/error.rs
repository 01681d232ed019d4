use thiserror::Error;

/// Errors raised while talking to the Prisma Cloud Compute console.
///
/// SECURITY: Error messages must NEVER contain credentials or the session token.
#[derive(Debug, Error)]
pub enum PrismaError {
    /// Login rejected or token unusable
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Console returned a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The requested object does not exist on the console
    #[error("object not found: {endpoint}")]
    NotFound { endpoint: String },

    /// Response body did not match the expected shape
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl PrismaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrismaError::NotFound { .. })
    }
}
