use thiserror::Error;

/// Errors raised by digest and metadata providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be decoded as the expected format
    #[error("Decode error: {0}")]
    Decode(String),

    /// An external tool failed or produced unusable output
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },
}

impl ProviderError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
