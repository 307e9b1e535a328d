//! Section geometry: page size and margins

use crate::{units, Element};
use serde::{Deserialize, Serialize};

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    /// A4 portrait (210mm x 297mm)
    pub const A4: PageSize = PageSize {
        width_pt: 595.3,
        height_pt: 841.9,
    };
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top_pt: f32,
    pub right_pt: f32,
    pub bottom_pt: f32,
    pub left_pt: f32,
}

impl Default for Margins {
    /// One inch on every side
    fn default() -> Self {
        Self {
            top_pt: 72.0,
            right_pt: 72.0,
            bottom_pt: 72.0,
            left_pt: 72.0,
        }
    }
}

/// Section properties: page geometry for the block flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocxSection {
    pub page_size: PageSize,
    pub margins: Margins,
    pub landscape: bool,
}

impl Default for DocxSection {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            landscape: false,
        }
    }
}

impl DocxSection {
    /// Build from a `sectPr` element; missing attributes keep the defaults.
    pub fn from_element(sect_pr: &Element) -> Self {
        let mut section = Self::default();

        if let Some(pg_sz) = sect_pr.find("pgSz") {
            if let Some(w) = pg_sz.int_attr("w") {
                section.page_size.width_pt = units::dxa_to_points(w);
            }
            if let Some(h) = pg_sz.int_attr("h") {
                section.page_size.height_pt = units::dxa_to_points(h);
            }
            section.landscape = pg_sz.attr("orient") == Some("landscape");
        }

        if let Some(pg_mar) = sect_pr.find("pgMar") {
            if let Some(top) = pg_mar.int_attr("top") {
                section.margins.top_pt = units::dxa_to_points(top);
            }
            if let Some(right) = pg_mar.int_attr("right") {
                section.margins.right_pt = units::dxa_to_points(right);
            }
            if let Some(bottom) = pg_mar.int_attr("bottom") {
                section.margins.bottom_pt = units::dxa_to_points(bottom);
            }
            if let Some(left) = pg_mar.int_attr("left") {
                section.margins.left_pt = units::dxa_to_points(left);
            }
        }

        section
    }

    /// Width available to content between the side margins
    pub fn content_width_pt(&self) -> f32 {
        self.page_size.width_pt - self.margins.left_pt - self.margins.right_pt
    }

    /// Height available to content between the vertical margins
    pub fn content_height_pt(&self) -> f32 {
        self.page_size.height_pt - self.margins.top_pt - self.margins.bottom_pt
    }
}
