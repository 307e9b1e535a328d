//! Document-to-page conversion
//!
//! Drives the full pipeline for one resolved document: lay each block out
//! against the section content width, flow lines down the page with the
//! paragraph's line-spacing rule, break to a new page when a line would
//! cross the bottom margin, and emit draw calls through the `PageWriter`.

use crate::{PageWriter, Result};
use doc_model::{
    Alignment, Block, Document, DocxParagraph, DocxTable, ListMarker, MarkerSuffix,
};
use layout_engine::{place_line, TextLayoutEngine};
use std::sync::Arc;
use text_engine::{FontManager, TextMeasurer};

/// Width of the rule drawn for bar tab stops
const BAR_RULE_WIDTH_PT: f32 = 0.75;

pub struct DocumentConverter<M> {
    layout: TextLayoutEngine<M>,
}

/// Vertical cursor over the page sequence
struct PageFlow<'w> {
    writer: &'w mut dyn PageWriter,
    page_width_pt: f32,
    page_height_pt: f32,
    top_pt: f32,
    bottom_pt: f32,
    y: f32,
}

impl<'w> PageFlow<'w> {
    fn begin(writer: &'w mut dyn PageWriter, document: &Document) -> Self {
        let section = &document.section;
        let mut flow = Self {
            writer,
            page_width_pt: section.page_size.width_pt,
            page_height_pt: section.page_size.height_pt,
            top_pt: section.margins.top_pt,
            bottom_pt: section.margins.bottom_pt,
            y: section.margins.top_pt,
        };
        flow.writer.begin_page(flow.page_width_pt, flow.page_height_pt);
        flow
    }

    /// Break to a new page if `height` does not fit above the bottom margin
    fn ensure_fits(&mut self, height: f32) {
        if self.y + height > self.page_height_pt - self.bottom_pt && self.y > self.top_pt {
            tracing::trace!(y = self.y, height, "page break");
            self.writer.end_page();
            self.writer.begin_page(self.page_width_pt, self.page_height_pt);
            self.y = self.top_pt;
        }
    }

    fn finish(self) {
        self.writer.end_page();
    }
}

impl<M: TextMeasurer> DocumentConverter<M> {
    pub fn new(fonts: Arc<FontManager>, measurer: M) -> Self {
        Self {
            layout: TextLayoutEngine::new(fonts, measurer),
        }
    }

    pub fn layout_engine(&self) -> &TextLayoutEngine<M> {
        &self.layout
    }

    /// Convert a resolved document into pages of draw calls.
    pub fn convert(&self, document: &Document, writer: &mut dyn PageWriter) -> Result<()> {
        let content_width = document.section.content_width_pt();
        let origin_x = document.section.margins.left_pt;
        let blocks = document.blocks();

        let mut flow = PageFlow::begin(writer, document);

        for (index, block) in blocks.iter().enumerate() {
            match block {
                Block::Paragraph(paragraph) => {
                    let previous_style = adjacent_paragraph_style(blocks, index, false);
                    let next_style = adjacent_paragraph_style(blocks, index, true);
                    self.render_paragraph(
                        paragraph,
                        origin_x,
                        content_width,
                        previous_style,
                        next_style,
                        &mut flow,
                    );
                }
                Block::Table(table) => {
                    self.render_table(table, origin_x, content_width, &mut flow);
                }
            }
        }

        flow.finish();
        Ok(())
    }

    fn render_paragraph(
        &self,
        paragraph: &DocxParagraph,
        origin_x: f32,
        content_width: f32,
        previous_style: Option<&str>,
        next_style: Option<&str>,
        flow: &mut PageFlow<'_>,
    ) {
        let formatting = &paragraph.formatting;

        // contextual spacing collapses the gap between same-style neighbors
        let suppress = |neighbor: Option<&str>| {
            formatting.contextual_spacing && neighbor == Some(paragraph.style_id.as_str())
        };
        if !suppress(previous_style) {
            flow.y += formatting.spacing_before_pt;
        }

        let lines = self.layout.layout_paragraph(paragraph, content_width);
        let line_count = lines.len();

        for (line_index, line) in lines.iter().enumerate() {
            let line_height = line.resolved_height(formatting.line_spacing);
            flow.ensure_fits(line_height);

            // max_ascent is negative: the baseline sits |ascent| below the top
            let baseline = flow.y - line.max_ascent;
            let is_last_line = line_index == line_count - 1;
            let placement = place_line(line, formatting.alignment, is_last_line);

            let text_indent = if line.is_first_line && paragraph.list_marker.is_none() {
                formatting.first_line_offset_pt()
            } else {
                formatting.subsequent_line_offset_pt()
            };

            if line.is_first_line {
                if let Some(ref marker) = paragraph.list_marker {
                    self.draw_marker(paragraph, marker, origin_x, baseline, flow.writer);
                }
            }

            let mut x = origin_x + text_indent + placement.start_offset_pt;
            for run in &line.runs {
                if run.drawable && !run.text.is_empty() {
                    flow.writer.draw_text(
                        x,
                        baseline,
                        &run.text,
                        &run.face,
                        run.font_size_pt,
                        run.formatting.color,
                    );
                }
                x += run.width_pt;
                if run.is_whitespace {
                    x += placement.extra_per_gap_pt;
                }
            }

            for bar in &line.bar_tabs {
                flow.writer.draw_rule(
                    origin_x + text_indent + bar.relative_position_pt,
                    flow.y,
                    flow.y + line_height,
                    BAR_RULE_WIDTH_PT,
                    bar.formatting.color,
                );
            }

            flow.y += line_height;
        }

        if !suppress(next_style) {
            flow.y += formatting.spacing_after_pt;
        }
    }

    /// Draw a list marker inside the hanging gap between the first-line
    /// offset and the body offset.
    fn draw_marker(
        &self,
        paragraph: &DocxParagraph,
        marker: &ListMarker,
        origin_x: f32,
        baseline: f32,
        writer: &mut dyn PageWriter,
    ) {
        let formatting = &paragraph.formatting;
        let marker_area_start = origin_x + formatting.first_line_offset_pt();
        let content_start = origin_x + formatting.subsequent_line_offset_pt();
        let area_start = marker_area_start.min(content_start);
        let raw_area_width = content_start - area_start;

        let face = self.layout.fonts().typeface(
            &marker.formatting.font_family,
            marker.formatting.bold,
            marker.formatting.italic,
        );
        let size = marker.formatting.font_size_pt;
        let marker_width = self.layout.measurer().measure(&marker.text, &face, size);

        let suffix_text = match marker.suffix {
            MarkerSuffix::Space => " ",
            _ => "",
        };
        let suffix_width = if suffix_text.is_empty() {
            0.0
        } else {
            self.layout.measurer().measure(suffix_text, &face, size)
        };
        let total_width = marker_width + suffix_width;
        let area_width = raw_area_width.max(total_width);

        let marker_x = match marker.alignment {
            Alignment::Right => area_start,
            Alignment::Center => area_start + (area_width - total_width) / 2.0,
            _ => content_start - total_width,
        };

        writer.draw_text(
            marker_x,
            baseline,
            &marker.text,
            &face,
            size,
            marker.formatting.color,
        );
        if !suffix_text.is_empty() {
            writer.draw_text(
                marker_x + marker_width,
                baseline,
                suffix_text,
                &face,
                size,
                marker.formatting.color,
            );
        }
    }

    /// Flow a table as rows of side-by-side cells. Declared cell widths are
    /// honored; cells without one share the remaining width evenly. A row
    /// breaks to the next page as a unit.
    fn render_table(
        &self,
        table: &DocxTable,
        origin_x: f32,
        content_width: f32,
        flow: &mut PageFlow<'_>,
    ) {
        for row in &table.rows {
            if row.cells.is_empty() {
                continue;
            }

            let widths = cell_widths(row.cells.iter().map(|c| c.width_pt), content_width);

            // lay every cell out first so the row height is known
            let mut cell_lines = Vec::with_capacity(row.cells.len());
            let mut row_height = 0.0f32;
            for (cell, width) in row.cells.iter().zip(&widths) {
                let mut height = 0.0f32;
                let mut paragraphs = Vec::new();
                for paragraph in &cell.paragraphs {
                    let lines = self.layout.layout_paragraph(paragraph, *width);
                    height += paragraph.formatting.spacing_before_pt
                        + lines
                            .iter()
                            .map(|l| l.resolved_height(paragraph.formatting.line_spacing))
                            .sum::<f32>()
                        + paragraph.formatting.spacing_after_pt;
                    paragraphs.push((paragraph, lines));
                }
                row_height = row_height.max(height);
                cell_lines.push(paragraphs);
            }

            flow.ensure_fits(row_height);
            let row_top = flow.y;

            let mut x = origin_x;
            for (paragraphs, width) in cell_lines.into_iter().zip(&widths) {
                let mut y = row_top;
                for (paragraph, lines) in paragraphs {
                    y += paragraph.formatting.spacing_before_pt;
                    let line_count = lines.len();
                    for (line_index, line) in lines.iter().enumerate() {
                        let line_height = line.resolved_height(paragraph.formatting.line_spacing);
                        let baseline = y - line.max_ascent;
                        let placement = place_line(
                            line,
                            paragraph.formatting.alignment,
                            line_index == line_count - 1,
                        );

                        let text_indent =
                            if line.is_first_line && paragraph.list_marker.is_none() {
                                paragraph.formatting.first_line_offset_pt()
                            } else {
                                paragraph.formatting.subsequent_line_offset_pt()
                            };
                        if line.is_first_line {
                            if let Some(ref marker) = paragraph.list_marker {
                                self.draw_marker(paragraph, marker, x, baseline, flow.writer);
                            }
                        }

                        let mut run_x = x + text_indent + placement.start_offset_pt;
                        for run in &line.runs {
                            if run.drawable && !run.text.is_empty() {
                                flow.writer.draw_text(
                                    run_x,
                                    baseline,
                                    &run.text,
                                    &run.face,
                                    run.font_size_pt,
                                    run.formatting.color,
                                );
                            }
                            run_x += run.width_pt;
                            if run.is_whitespace {
                                run_x += placement.extra_per_gap_pt;
                            }
                        }
                        y += line_height;
                    }
                    y += paragraph.formatting.spacing_after_pt;
                }
                x += width;
            }

            flow.y = row_top + row_height;
        }
    }
}

/// Style id of the nearest paragraph neighbor, if the neighbor is a paragraph
fn adjacent_paragraph_style(blocks: &[Block], index: usize, forward: bool) -> Option<&str> {
    let neighbor = if forward {
        blocks.get(index + 1)
    } else {
        index.checked_sub(1).and_then(|i| blocks.get(i))
    };
    match neighbor {
        Some(Block::Paragraph(p)) => Some(p.style_id.as_str()),
        _ => None,
    }
}

/// Resolve per-cell widths: declared widths win, the rest share evenly
fn cell_widths(declared: impl Iterator<Item = Option<f32>>, content_width: f32) -> Vec<f32> {
    let declared: Vec<Option<f32>> = declared.collect();
    let declared_total: f32 = declared.iter().flatten().sum();
    let unsized_count = declared.iter().filter(|w| w.is_none()).count();
    let share = if unsized_count > 0 {
        ((content_width - declared_total) / unsized_count as f32).max(1.0)
    } else {
        0.0
    };
    declared.into_iter().map(|w| w.unwrap_or(share)).collect()
}
