//! Laid-out lines and line segments

use doc_model::{LineSpacing, RunFormatting};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use text_engine::LoadedFace;

/// One measured segment of a laid-out line.
///
/// Drawable runs carry text the writer renders; non-drawable runs are pure
/// horizontal advances (tab spans without leaders).
#[derive(Debug, Clone)]
pub struct LayoutRun {
    pub text: String,
    pub face: Arc<LoadedFace>,
    pub font_size_pt: f32,
    pub formatting: RunFormatting,
    pub drawable: bool,
    /// Measured advance of this segment
    pub width_pt: f32,
    /// Whether the segment is pure whitespace (a justification gap)
    pub is_whitespace: bool,
}

impl LayoutRun {
    /// A non-drawable horizontal advance
    pub fn placeholder(width_pt: f32, face: Arc<LoadedFace>) -> Self {
        Self {
            text: String::new(),
            face,
            font_size_pt: 1.0,
            formatting: RunFormatting::default(),
            drawable: false,
            width_pt,
            is_whitespace: false,
        }
    }
}

/// A vertical rule produced by a bar tab stop, positioned relative to the
/// line's indent; contributes no horizontal advance.
#[derive(Debug, Clone)]
pub struct BarTab {
    pub relative_position_pt: f32,
    pub formatting: RunFormatting,
}

/// One laid-out output line.
///
/// `max_ascent` follows the renderer convention: negative, measuring the
/// rise above the baseline, so the tallest run is the algebraic minimum.
#[derive(Debug, Clone)]
pub struct LayoutLine {
    pub runs: Vec<LayoutRun>,
    /// Total advance of the line content
    pub width_pt: f32,
    pub max_ascent: f32,
    pub max_descent: f32,
    pub max_leading: f32,
    pub is_first_line: bool,
    /// The width budget this line was filled against
    pub available_width_pt: f32,
    pub bar_tabs: Vec<BarTab>,
}

impl LayoutLine {
    /// Natural single-spaced height: `descent - ascent + leading`
    pub fn natural_height(&self) -> f32 {
        self.max_descent - self.max_ascent + self.max_leading
    }

    /// Height after applying the paragraph's line-spacing rule
    pub fn resolved_height(&self, spacing: Option<LineSpacing>) -> f32 {
        match spacing {
            Some(rule) => rule.resolve(self.natural_height()),
            None => self.natural_height(),
        }
    }
}

/// Serializable snapshot of a line used by diagnostics and tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSummary {
    pub text: String,
    pub width_pt: f32,
    pub is_first_line: bool,
}

impl From<&LayoutLine> for LineSummary {
    fn from(line: &LayoutLine) -> Self {
        Self {
            text: line
                .runs
                .iter()
                .filter(|r| r.drawable)
                .map(|r| r.text.as_str())
                .collect(),
            width_pt: line.width_pt,
            is_first_line: line.is_first_line,
        }
    }
}
