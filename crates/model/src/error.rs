use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid annotation JSON: {0}")]
    Json(#[from] serde_json::Error),
}
