//! Error types for the render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
