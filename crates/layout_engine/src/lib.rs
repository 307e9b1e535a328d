//! Layout engine - greedy line breaking with tab stops and justification
//!
//! Consumes resolved paragraphs from `doc_model` and produces ordered
//! `LayoutLine`s: absolutely measured line content ready for pagination and
//! drawing. The engine is synchronous and CPU-bound; all glyph-level
//! questions go through the injected `TextMeasurer`.

mod align;
mod engine;
mod error;
mod line;
mod tabs;

pub use align::*;
pub use engine::*;
pub use error::*;
pub use line::*;
pub use tabs::*;
