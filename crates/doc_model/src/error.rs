//! Error types for the document model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Document has no body")]
    MissingBody,

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
