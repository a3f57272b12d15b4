use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Page index {index} out of range (page_count={page_count})")]
    PageOutOfRange { index: usize, page_count: usize },
    #[error("Failed to embed font '{font}': {message}")]
    FontEmbed { font: String, message: String },
    #[error("Failed to embed image: {0}")]
    ImageEmbed(String),
    #[error("Unknown resource handle: {0}")]
    UnknownHandle(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialize(err.to_string())
    }
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
