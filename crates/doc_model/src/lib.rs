//! Document model - element input, formatting resolution, resolved content
//!
//! This crate turns the element trees produced by a package/XML collaborator
//! into fully resolved, immutable content:
//!
//! - `element`: the parsed-element input model and the `DocumentSource` trait
//! - `units`: dxa / half-point / EMU / hex conversions
//! - `formatting`: resolved value types (alignment, spacing, tabs, colors)
//! - `property_set`: partial, mergeable paragraph/run property overlays
//! - `theme`: theme font scheme, color palette, and color-scheme mapping
//! - `style`: named style definitions and the cascade resolver
//! - `numbering`: multi-level list definitions and the stateful counter engine
//! - `paragraph` / `table` / `section`: resolved value objects
//! - `document`: one open-document session tying it all together

mod document;
mod element;
mod error;
mod formatting;
mod numbering;
mod paragraph;
mod property_set;
mod section;
mod style;
mod table;
mod theme;
pub mod units;

pub use document::*;
pub use element::*;
pub use error::*;
pub use formatting::*;
pub use numbering::*;
pub use paragraph::*;
pub use property_set::*;
pub use section::*;
pub use style::*;
pub use table::*;
pub use theme::*;
