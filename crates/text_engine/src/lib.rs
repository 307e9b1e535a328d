//! Text engine - font discovery, caching, shaping, and measurement
//!
//! This crate owns the two process-wide read caches: the typeface cache
//! (keyed by family, weight, and style) and the per-face metric cache. Both
//! are internally synchronized and safe to share across concurrently running
//! independent conversions.
//!
//! # Modules
//!
//! - `font`: font identity and metric types
//! - `font_manager`: system-font lookup and the typeface cache
//! - `shaper`: the `TextMeasurer` collaborator interface and its
//!   rustybuzz-backed implementation

mod error;
mod font;
mod font_manager;
mod shaper;

pub use error::*;
pub use font::*;
pub use font_manager::*;
pub use shaper::*;
