//! Render model - page writer interface and the conversion driver
//!
//! The converter walks a resolved `Document`, lays every paragraph out
//! through the layout engine, paginates the resulting lines, and emits
//! absolute-coordinate draw calls to a `PageWriter`. The writer sees only
//! positions, typeface handles, sizes, and colors; document-format
//! semantics stop here.

mod converter;
mod error;
mod writer;

pub use converter::*;
pub use error::*;
pub use writer::*;
