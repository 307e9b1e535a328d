//! The page/graphics writer interface
//!
//! Writers receive fully resolved absolute coordinates, a typeface handle
//! with a size, and an RGB color per drawable segment. Baselines follow the
//! typographic convention: `baseline_y` is the line's baseline, with text
//! rising above it.

use doc_model::RgbColor;
use serde::{Deserialize, Serialize};
use text_engine::LoadedFace;

/// Sink for paginated output. Implemented by PDF/image/test writers.
pub trait PageWriter {
    fn begin_page(&mut self, width_pt: f32, height_pt: f32);

    fn draw_text(
        &mut self,
        x: f32,
        baseline_y: f32,
        text: &str,
        face: &LoadedFace,
        size_pt: f32,
        color: RgbColor,
    );

    /// Vertical rule (bar tab stops)
    fn draw_rule(&mut self, x: f32, y_top: f32, y_bottom: f32, width_pt: f32, color: RgbColor);

    fn end_page(&mut self);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawItem {
    Text {
        x: f32,
        baseline_y: f32,
        text: String,
        family: String,
        size_pt: f32,
        color: RgbColor,
    },
    Rule {
        x: f32,
        y_top: f32,
        y_bottom: f32,
        width_pt: f32,
        color: RgbColor,
    },
}

/// One recorded page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedPage {
    pub width_pt: f32,
    pub height_pt: f32,
    pub items: Vec<DrawItem>,
}

/// A `PageWriter` that records every call; the converter tests and any
/// golden-output tooling assert against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingWriter {
    pub pages: Vec<RecordedPage>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_page(&mut self) -> &mut RecordedPage {
        if self.pages.is_empty() {
            self.pages.push(RecordedPage::default());
        }
        self.pages.last_mut().unwrap()
    }

    /// All recorded text in reading order, concatenated
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            for item in &page.items {
                if let DrawItem::Text { text, .. } = item {
                    out.push_str(text);
                }
            }
        }
        out
    }
}

impl PageWriter for RecordingWriter {
    fn begin_page(&mut self, width_pt: f32, height_pt: f32) {
        self.pages.push(RecordedPage {
            width_pt,
            height_pt,
            items: Vec::new(),
        });
    }

    fn draw_rule(&mut self, x: f32, y_top: f32, y_bottom: f32, width_pt: f32, color: RgbColor) {
        self.current_page().items.push(DrawItem::Rule {
            x,
            y_top,
            y_bottom,
            width_pt,
            color,
        });
    }

    fn draw_text(
        &mut self,
        x: f32,
        baseline_y: f32,
        text: &str,
        face: &LoadedFace,
        size_pt: f32,
        color: RgbColor,
    ) {
        let family = face.family.clone();
        self.current_page().items.push(DrawItem::Text {
            x,
            baseline_y,
            text: text.to_string(),
            family,
            size_pt,
            color,
        });
    }

    fn end_page(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_engine::{FaceId, FontStyle, FontWeight};

    fn face() -> LoadedFace {
        LoadedFace {
            id: FaceId(1),
            requested_family: "Arial".into(),
            family: "Arial".into(),
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            data: None,
        }
    }

    #[test]
    fn test_recording_collects_text_in_order() {
        let mut writer = RecordingWriter::new();
        writer.begin_page(100.0, 200.0);
        writer.draw_text(10.0, 20.0, "Hello ", &face(), 11.0, RgbColor::BLACK);
        writer.draw_text(40.0, 20.0, "world", &face(), 11.0, RgbColor::BLACK);
        writer.end_page();

        assert_eq!(writer.pages.len(), 1);
        assert_eq!(writer.full_text(), "Hello world");
    }

    #[test]
    fn test_recorded_pages_serialize_for_diff_tooling() {
        let mut writer = RecordingWriter::new();
        writer.begin_page(100.0, 200.0);
        writer.draw_rule(50.0, 10.0, 30.0, 0.75, RgbColor::BLACK);
        writer.end_page();

        let json = serde_json::to_value(&writer.pages).unwrap();
        assert_eq!(json[0]["width_pt"], 100.0);
        assert!(json[0]["items"][0].get("Rule").is_some());
    }
}
