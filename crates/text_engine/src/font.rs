//! Font identity and metric types

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Font style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Font weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Cache key for one typeface variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontId {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontId {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// Opaque handle identifying one loaded typeface for the lifetime of the
/// process. This is what the layout output and the page writer carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u32);

/// One loaded typeface.
///
/// `data` is the raw font file; it is `None` when no matching system font
/// could be found at all, in which case measurement degrades to estimated
/// character widths and nothing ever fails.
#[derive(Debug, Clone)]
pub struct LoadedFace {
    pub id: FaceId,
    /// Family the caller asked for
    pub requested_family: String,
    /// Family actually loaded (differs under substitution)
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub data: Option<Arc<Vec<u8>>>,
}

impl LoadedFace {
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// Raw face-level metrics in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    /// Positive, in font units
    pub ascender: i16,
    /// Negative, in font units
    pub descender: i16,
    pub line_gap: i16,
}

impl Default for FaceMetrics {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 0,
        }
    }
}

/// Metrics scaled to a font size, in points.
///
/// Ascent is negative (distance above the baseline), descent and leading are
/// positive; a line's natural height is `descent - ascent + leading`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl FontMetrics {
    pub fn line_height(&self) -> f32 {
        self.descent - self.ascent + self.leading
    }
}

impl FaceMetrics {
    /// Scale to a font size in points
    pub fn scaled(&self, font_size_pt: f32) -> FontMetrics {
        let scale = font_size_pt / self.units_per_em as f32;
        FontMetrics {
            ascent: -(self.ascender as f32 * scale),
            descent: -(self.descender as f32) * scale,
            leading: self.line_gap as f32 * scale,
        }
    }
}
