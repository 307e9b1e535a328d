//! One open-document session
//!
//! `Document::load` runs the whole resolution pipeline eagerly, in document
//! order, against a `DocumentSource`: styles and theme first, then every
//! body block through the cascade and the numbering counters. The result is
//! an immutable list of resolved blocks plus the section geometry and
//! settings the converter needs.
//!
//! Per-session state (the numbering counters, the loaded style maps) lives
//! and dies with the load call; nothing here is shared across conversions.

use crate::{
    units, DocModelError, DocxParagraph, DocxSection, DocxTable, Element, DocumentSource,
    NumberingDefinitions, NumberingResolver, Result, RunFormatting, StyleResolver,
};
use serde::{Deserialize, Serialize};

/// Document-wide settings consumed by layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Stride of the repeating default tab, in points
    pub default_tab_stop_pt: f32,
    /// Separator character decimal tab stops align on
    pub decimal_symbol: char,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            default_tab_stop_pt: units::dxa_to_points(720),
            decimal_symbol: '.',
        }
    }
}

impl DocumentSettings {
    pub fn load(settings_part: Option<&Element>) -> Self {
        let mut settings = Self::default();
        let Some(root) = settings_part else {
            return settings;
        };

        if let Some(dxa) = root.find("defaultTabStop").and_then(|el| el.int_attr("val")) {
            if dxa > 0 {
                settings.default_tab_stop_pt = units::dxa_to_points(dxa);
            }
        }
        if let Some(symbol) = root
            .find("decimalSymbol")
            .and_then(|el| el.attr("val"))
            .and_then(|v| v.chars().next())
        {
            settings.decimal_symbol = symbol;
        }

        settings
    }
}

/// One top-level content block in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(DocxParagraph),
    Table(DocxTable),
}

/// A fully resolved document
pub struct Document {
    pub section: DocxSection,
    pub settings: DocumentSettings,
    blocks: Vec<Block>,
    styles: StyleResolver,
}

impl Document {
    /// Resolve everything the source exposes. The only fatal condition is a
    /// missing body; every other absent part degrades to defaults.
    pub fn load(source: &dyn DocumentSource) -> Result<Self> {
        let body = source.body().ok_or(DocModelError::MissingBody)?;

        let styles = StyleResolver::load(source);
        let mut numbering =
            NumberingResolver::new(NumberingDefinitions::load(source.numbering_part()));
        let settings = DocumentSettings::load(source.settings_part());

        let section = body
            .descendants()
            .filter(|el| el.name == "sectPr")
            .last()
            .map(DocxSection::from_element)
            .unwrap_or_default();

        let mut blocks = Vec::new();
        for child in &body.children {
            match child.name.as_str() {
                "p" => blocks.push(Block::Paragraph(DocxParagraph::from_element(
                    child,
                    &styles,
                    &mut numbering,
                    &settings,
                ))),
                "tbl" => blocks.push(Block::Table(DocxTable::from_element(
                    child,
                    &styles,
                    &mut numbering,
                    &settings,
                ))),
                _ => {}
            }
        }

        Ok(Self {
            section,
            settings,
            blocks,
            styles,
        })
    }

    /// Resolved blocks in document order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Top-level paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &DocxParagraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Formatting produced by the document defaults alone, used where no run
    /// supplies its own (empty paragraphs, markers without fragments)
    pub fn default_run_formatting(&self) -> RunFormatting {
        self.styles.default_run_formatting()
    }

    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySource;

    fn text_paragraph(text: &str) -> Element {
        Element::new("p")
            .with_child(Element::new("r").with_child(Element::new("t").with_text(text)))
    }

    #[test]
    fn test_missing_body_is_fatal() {
        let source = InMemorySource::default();
        assert!(matches!(
            Document::load(&source),
            Err(DocModelError::MissingBody)
        ));
    }

    #[test]
    fn test_loads_blocks_in_document_order() {
        let body = Element::new("body")
            .with_child(text_paragraph("one"))
            .with_child(Element::new("tbl").with_child(
                Element::new("tr").with_child(Element::new("tc").with_child(text_paragraph("cell"))),
            ))
            .with_child(text_paragraph("two"));
        let source = InMemorySource {
            body: Some(body),
            ..Default::default()
        };

        let document = Document::load(&source).unwrap();

        assert_eq!(document.blocks().len(), 3);
        let texts: Vec<String> = document.paragraphs().map(|p| p.full_text()).collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn test_section_from_last_sect_pr() {
        let body = Element::new("body")
            .with_child(text_paragraph("content"))
            .with_child(Element::new("sectPr").with_child(
                Element::new("pgMar").with_attr("left", "720").with_attr("right", "720"),
            ));
        let source = InMemorySource {
            body: Some(body),
            ..Default::default()
        };

        let document = Document::load(&source).unwrap();
        assert_eq!(document.section.margins.left_pt, 36.0);
    }

    #[test]
    fn test_settings_loading() {
        let settings = Element::new("settings")
            .with_child(Element::new("defaultTabStop").with_attr("val", "360"))
            .with_child(Element::new("decimalSymbol").with_attr("val", ","));
        let source = InMemorySource {
            body: Some(Element::new("body")),
            settings: Some(settings),
            ..Default::default()
        };

        let document = Document::load(&source).unwrap();
        assert_eq!(document.settings.default_tab_stop_pt, 18.0);
        assert_eq!(document.settings.decimal_symbol, ',');
    }

    #[test]
    fn test_default_settings() {
        let settings = DocumentSettings::default();
        assert_eq!(settings.default_tab_stop_pt, 36.0);
        assert_eq!(settings.decimal_symbol, '.');
    }
}
