//! Resolved paragraphs and runs
//!
//! A `DocxParagraph` is the immutable output of the whole resolution
//! pipeline for one paragraph: cascaded paragraph formatting, resolved runs,
//! the optional list marker, and the inline stream (text, tabs, positional
//! tabs) the layout engine consumes. Created once during assembly, read-only
//! afterwards.

use crate::{
    units, DocumentSettings, Element, ListMarker, NumberingResolver, ParagraphFormatting,
    PositionalTabBase, RunFormatting, StyleResolver, TabAlignment, TabLeader,
};
use serde::{Deserialize, Serialize};

/// One inline layout item inside a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InlineElement {
    Text {
        text: String,
        formatting: RunFormatting,
    },
    /// An ordinary tab character, resolved against the paragraph's tab stops
    Tab { formatting: RunFormatting },
    /// An absolute tab anchored to the margin, the indent boundary, or the
    /// page edge
    PositionalTab {
        formatting: RunFormatting,
        position_pt: f32,
        alignment: TabAlignment,
        leader: TabLeader,
        base: PositionalTabBase,
    },
}

/// A run of text with its resolved formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocxRun {
    pub text: String,
    pub formatting: RunFormatting,
}

/// A paragraph with text and formatting fully resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocxParagraph {
    /// The paragraph style id the cascade started from (may be empty)
    pub style_id: String,
    pub formatting: ParagraphFormatting,
    pub runs: Vec<DocxRun>,
    pub inlines: Vec<InlineElement>,
    pub list_marker: Option<ListMarker>,
    /// Default tab stride for this document, in points
    pub default_tab_stop_pt: f32,
    /// Separator character decimal tab stops align on
    pub decimal_symbol: char,
}

impl DocxParagraph {
    /// Resolve one `p` element into an immutable paragraph.
    ///
    /// Runs the style cascade, advances the numbering counters (which is why
    /// assembly must proceed in document order), and flattens the runs into
    /// the inline stream.
    pub fn from_element(
        paragraph: &Element,
        styles: &StyleResolver,
        numbering: &mut NumberingResolver,
        settings: &DocumentSettings,
    ) -> Self {
        let mut context = styles.create_paragraph_context(paragraph);
        let list_marker =
            numbering.resolve(paragraph, &mut context.paragraph_properties, styles);

        let mut runs = Vec::new();
        let mut inlines = Vec::new();

        for run_el in paragraph.descendants().filter(|el| el.name == "r") {
            let formatting = styles.resolve_run_formatting(&context, run_el);
            let mut run_text = String::new();

            for child in &run_el.children {
                match child.name.as_str() {
                    "t" => {
                        let text = child.inner_text();
                        if !text.is_empty() {
                            run_text.push_str(&text);
                            inlines.push(InlineElement::Text {
                                text,
                                formatting: formatting.clone(),
                            });
                        }
                    }
                    "tab" => {
                        inlines.push(InlineElement::Tab {
                            formatting: formatting.clone(),
                        });
                    }
                    "ptab" => {
                        inlines.push(parse_positional_tab(child, formatting.clone()));
                    }
                    _ => {}
                }
            }

            if !run_text.is_empty() {
                runs.push(DocxRun {
                    text: run_text,
                    formatting,
                });
            }
        }

        Self {
            style_id: context.style_id.clone(),
            formatting: context.paragraph_properties.to_formatting(),
            runs,
            inlines,
            list_marker,
            default_tab_stop_pt: settings.default_tab_stop_pt,
            decimal_symbol: settings.decimal_symbol,
        }
    }

    /// The concatenated text of all runs
    pub fn full_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

fn parse_positional_tab(ptab: &Element, formatting: RunFormatting) -> InlineElement {
    let alignment = match ptab.attr("alignment") {
        Some("center") => TabAlignment::Center,
        Some("right") => TabAlignment::Right,
        _ => TabAlignment::Left,
    };
    let leader = match ptab.attr("leader") {
        Some("dot") | Some("middleDot") => TabLeader::Dots,
        Some("hyphen") => TabLeader::Dashes,
        Some("underscore") => TabLeader::Underscore,
        _ => TabLeader::None,
    };
    let base = match ptab.attr("relativeTo") {
        Some("indent") => PositionalTabBase::Indent,
        Some("page") => PositionalTabBase::Page,
        _ => PositionalTabBase::Margin,
    };
    // positional tabs carry their offset in EMU
    let position_pt = ptab.int_attr("pos").map(units::emu_to_points).unwrap_or(0.0);

    InlineElement::PositionalTab {
        formatting,
        position_pt,
        alignment,
        leader,
        base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemorySource, NumberingDefinitions};

    fn fixtures() -> (StyleResolver, NumberingResolver, DocumentSettings) {
        (
            StyleResolver::load(&InMemorySource::default()),
            NumberingResolver::new(NumberingDefinitions::default()),
            DocumentSettings::default(),
        )
    }

    fn text_run(text: &str) -> Element {
        Element::new("r").with_child(Element::new("t").with_text(text))
    }

    #[test]
    fn test_assembles_runs_and_inlines() {
        let (styles, mut numbering, settings) = fixtures();
        let paragraph = Element::new("p")
            .with_child(text_run("Hello "))
            .with_child(
                Element::new("r")
                    .with_child(Element::new("rPr").with_child(Element::new("b")))
                    .with_child(Element::new("t").with_text("world")),
            );

        let resolved =
            DocxParagraph::from_element(&paragraph, &styles, &mut numbering, &settings);

        assert_eq!(resolved.full_text(), "Hello world");
        assert_eq!(resolved.runs.len(), 2);
        assert!(!resolved.runs[0].formatting.bold);
        assert!(resolved.runs[1].formatting.bold);
        assert_eq!(resolved.inlines.len(), 2);
    }

    #[test]
    fn test_tab_elements_become_tab_inlines() {
        let (styles, mut numbering, settings) = fixtures();
        let paragraph = Element::new("p").with_child(
            Element::new("r")
                .with_child(Element::new("t").with_text("Label"))
                .with_child(Element::new("tab"))
                .with_child(Element::new("t").with_text("Value")),
        );

        let resolved =
            DocxParagraph::from_element(&paragraph, &styles, &mut numbering, &settings);

        assert_eq!(resolved.inlines.len(), 3);
        assert!(matches!(resolved.inlines[1], InlineElement::Tab { .. }));
        // tabs contribute no run text
        assert_eq!(resolved.full_text(), "LabelValue");
    }

    #[test]
    fn test_positional_tab_parsing() {
        let (styles, mut numbering, settings) = fixtures();
        let paragraph = Element::new("p").with_child(
            Element::new("r").with_child(
                Element::new("ptab")
                    .with_attr("alignment", "right")
                    .with_attr("relativeTo", "margin")
                    .with_attr("leader", "dot")
                    .with_attr("pos", "1828800"),
            ),
        );

        let resolved =
            DocxParagraph::from_element(&paragraph, &styles, &mut numbering, &settings);

        match &resolved.inlines[0] {
            InlineElement::PositionalTab {
                position_pt,
                alignment,
                leader,
                base,
                ..
            } => {
                assert_eq!(*position_pt, 144.0);
                assert_eq!(*alignment, TabAlignment::Right);
                assert_eq!(*leader, TabLeader::Dots);
                assert_eq!(*base, PositionalTabBase::Margin);
            }
            other => panic!("expected positional tab, got {other:?}"),
        }
    }

    #[test]
    fn test_runs_inside_hyperlinks_are_collected() {
        let (styles, mut numbering, settings) = fixtures();
        let paragraph = Element::new("p").with_child(
            Element::new("hyperlink").with_child(text_run("linked")),
        );

        let resolved =
            DocxParagraph::from_element(&paragraph, &styles, &mut numbering, &settings);
        assert_eq!(resolved.full_text(), "linked");
    }

    #[test]
    fn test_empty_paragraph_has_no_runs() {
        let (styles, mut numbering, settings) = fixtures();
        let resolved = DocxParagraph::from_element(
            &Element::new("p"),
            &styles,
            &mut numbering,
            &settings,
        );
        assert!(resolved.runs.is_empty());
        assert!(resolved.inlines.is_empty());
        assert!(resolved.list_marker.is_none());
    }
}
