//! Resolved tables
//!
//! Tables are a structural extension of the paragraph pipeline: every cell
//! holds paragraphs resolved by the same cascade and numbering machinery.
//! Border and merge geometry is out of scope; the model keeps only the grid
//! of cells and the declared cell widths.

use crate::{
    units, DocumentSettings, DocxParagraph, Element, NumberingResolver, StyleResolver,
};
use serde::{Deserialize, Serialize};

/// One table cell: resolved paragraphs plus an optional declared width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocxTableCell {
    pub paragraphs: Vec<DocxParagraph>,
    pub width_pt: Option<f32>,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocxTableRow {
    pub cells: Vec<DocxTableCell>,
}

/// A resolved table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocxTable {
    pub rows: Vec<DocxTableRow>,
}

impl DocxTable {
    pub fn from_element(
        table: &Element,
        styles: &StyleResolver,
        numbering: &mut NumberingResolver,
        settings: &DocumentSettings,
    ) -> Self {
        let mut rows = Vec::new();

        for row_el in table.find_all("tr") {
            let mut cells = Vec::new();

            for cell_el in row_el.find_all("tc") {
                let width_pt = cell_el
                    .find("tcPr")
                    .and_then(|pr| pr.find("tcW"))
                    .filter(|w| w.attr("type") != Some("pct"))
                    .and_then(|w| w.int_attr("w"))
                    .map(units::dxa_to_points);

                let paragraphs = cell_el
                    .find_all("p")
                    .map(|p| DocxParagraph::from_element(p, styles, numbering, settings))
                    .collect();

                cells.push(DocxTableCell {
                    paragraphs,
                    width_pt,
                });
            }

            rows.push(DocxTableRow { cells });
        }

        Self { rows }
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemorySource, NumberingDefinitions};

    #[test]
    fn test_table_assembly() {
        let styles = StyleResolver::load(&InMemorySource::default());
        let mut numbering = NumberingResolver::new(NumberingDefinitions::default());
        let settings = DocumentSettings::default();

        let cell = |text: &str, width: &str| {
            Element::new("tc")
                .with_child(
                    Element::new("tcPr").with_child(
                        Element::new("tcW")
                            .with_attr("w", width)
                            .with_attr("type", "dxa"),
                    ),
                )
                .with_child(
                    Element::new("p").with_child(
                        Element::new("r").with_child(Element::new("t").with_text(text)),
                    ),
                )
        };

        let table = Element::new("tbl").with_child(
            Element::new("tr")
                .with_child(cell("A", "2880"))
                .with_child(cell("B", "1440")),
        );

        let resolved = DocxTable::from_element(&table, &styles, &mut numbering, &settings);

        assert_eq!(resolved.rows.len(), 1);
        assert_eq!(resolved.column_count(), 2);
        assert_eq!(resolved.rows[0].cells[0].width_pt, Some(144.0));
        assert_eq!(resolved.rows[0].cells[1].paragraphs[0].full_text(), "B");
    }

    #[test]
    fn test_numbering_continues_through_table_cells() {
        let styles = StyleResolver::load(&InMemorySource::default());
        let numbering_part = Element::new("numbering")
            .with_child(
                Element::new("abstractNum")
                    .with_attr("abstractNumId", "0")
                    .with_child(
                        Element::new("lvl")
                            .with_attr("ilvl", "0")
                            .with_child(Element::new("numFmt").with_attr("val", "decimal"))
                            .with_child(Element::new("lvlText").with_attr("val", "%1.")),
                    ),
            )
            .with_child(
                Element::new("num")
                    .with_attr("numId", "1")
                    .with_child(Element::new("abstractNumId").with_attr("val", "0")),
            );
        let mut numbering =
            NumberingResolver::new(NumberingDefinitions::load(Some(&numbering_part)));
        let settings = DocumentSettings::default();

        let numbered_p = || {
            Element::new("p").with_child(
                Element::new("pPr").with_child(
                    Element::new("numPr")
                        .with_child(Element::new("ilvl").with_attr("val", "0"))
                        .with_child(Element::new("numId").with_attr("val", "1")),
                ),
            )
        };
        let table = Element::new("tbl").with_child(
            Element::new("tr")
                .with_child(Element::new("tc").with_child(numbered_p()))
                .with_child(Element::new("tc").with_child(numbered_p())),
        );

        let resolved = DocxTable::from_element(&table, &styles, &mut numbering, &settings);
        let marker = |r: usize, c: usize| {
            resolved.rows[r].cells[c].paragraphs[0]
                .list_marker
                .as_ref()
                .unwrap()
                .text
                .clone()
        };

        assert_eq!(marker(0, 0), "1.");
        assert_eq!(marker(0, 1), "2.");
    }
}
