use lopdf::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Object {0:?} is not a page dictionary")]
    NotAPage(ObjectId),

    #[error("Expected a dictionary for /{key}, found {found}")]
    UnexpectedType { key: String, found: String },

    #[error("Resource /{category} /{name} already names a different object")]
    NameConflict { category: String, name: String },

    #[error("{0}")]
    Other(String),
}
