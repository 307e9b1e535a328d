//! Greedy paragraph layout
//!
//! Tokens are the atomic unit of wrapping: every maximal run of
//! non-whitespace characters is one token and every individual whitespace
//! character is its own token, so inter-word spacing survives exactly.
//! Lines fill greedily against their width budget; a single token wider
//! than the whole budget is placed alone on its own line. Tabs advance the
//! caret through the stop machinery in `tabs`, committing the line and
//! retrying when a stop cannot be honored on the current line.

use crate::{
    compute_desired_start, default_tab_target, leader_glyph, needs_look_ahead, next_custom_stop,
    BarTab, LayoutLine, LayoutRun, SegmentMeasurement, TabResolution,
};
use doc_model::{DocxParagraph, InlineElement, RunFormatting, TabAlignment, TabLeader};
use std::sync::Arc;
use text_engine::{FontManager, FontMetrics, TextMeasurer};

/// Lays paragraphs out into lines against an available content width.
pub struct TextLayoutEngine<M> {
    fonts: Arc<FontManager>,
    measurer: M,
}

impl<M: TextMeasurer> TextLayoutEngine<M> {
    pub fn new(fonts: Arc<FontManager>, measurer: M) -> Self {
        Self { fonts, measurer }
    }

    pub fn fonts(&self) -> &Arc<FontManager> {
        &self.fonts
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Lay out one resolved paragraph. Always produces at least one line;
    /// an empty paragraph yields a single empty line with default-font
    /// metrics so it still occupies vertical space.
    pub fn layout_paragraph(&self, paragraph: &DocxParagraph, max_width_pt: f32) -> Vec<LayoutLine> {
        ParagraphLayout::new(self, paragraph, max_width_pt).run()
    }
}

/// Working state for one paragraph's layout pass
struct ParagraphLayout<'a, M> {
    engine: &'a TextLayoutEngine<M>,
    paragraph: &'a DocxParagraph,
    first_line_limit: f32,
    body_line_limit: f32,
    first_line_indent: f32,
    body_indent: f32,
    lines: Vec<LayoutLine>,
    runs: Vec<LayoutRun>,
    bar_tabs: Vec<BarTab>,
    width: f32,
    max_ascent: f32,
    max_descent: f32,
    max_leading: f32,
    is_first_line: bool,
    line_limit: f32,
    line_indent: f32,
}

impl<'a, M: TextMeasurer> ParagraphLayout<'a, M> {
    fn new(engine: &'a TextLayoutEngine<M>, paragraph: &'a DocxParagraph, max_width_pt: f32) -> Self {
        let formatting = &paragraph.formatting;
        let first_offset = formatting.first_line_offset_pt();
        let body_offset = formatting.subsequent_line_offset_pt();
        let right_indent = formatting.right_indent_pt;

        // a list marker occupies the hanging gap, so the first line's text
        // starts at the body offset instead
        let first_text_offset = if paragraph.list_marker.is_some() {
            body_offset
        } else {
            first_offset
        };

        // 1pt floor keeps line breaking terminating on degenerate widths
        let first_line_limit = (max_width_pt - first_text_offset - right_indent).max(1.0);
        let body_line_limit = (max_width_pt - body_offset - right_indent).max(1.0);

        Self {
            engine,
            paragraph,
            first_line_limit,
            body_line_limit,
            first_line_indent: first_text_offset,
            body_indent: body_offset,
            lines: Vec::new(),
            runs: Vec::new(),
            bar_tabs: Vec::new(),
            width: 0.0,
            max_ascent: 0.0,
            max_descent: 0.0,
            max_leading: 0.0,
            is_first_line: true,
            line_limit: first_line_limit,
            line_indent: first_text_offset,
        }
    }

    fn run(mut self) -> Vec<LayoutLine> {
        for index in 0..self.paragraph.inlines.len() {
            match &self.paragraph.inlines[index] {
                InlineElement::Text { text, formatting } => {
                    self.process_text(text, formatting);
                }
                InlineElement::Tab { formatting } => {
                    self.process_tab(formatting.clone(), index, None);
                }
                InlineElement::PositionalTab {
                    formatting,
                    position_pt,
                    alignment,
                    leader,
                    base,
                } => {
                    let target = match base {
                        doc_model::PositionalTabBase::Indent => self.line_indent + position_pt,
                        _ => *position_pt,
                    };
                    let resolution = TabResolution {
                        target_absolute_pt: target,
                        leader: *leader,
                        alignment: *alignment,
                        from_default: false,
                    };
                    self.process_tab(formatting.clone(), index, Some(resolution));
                }
            }
        }

        if !self.runs.is_empty() || self.width > 0.0 || !self.bar_tabs.is_empty() {
            self.commit_line();
        }

        if self.lines.is_empty() {
            self.push_empty_line();
        }

        self.lines
    }

    fn commit_line(&mut self) {
        if self.runs.is_empty() && self.width <= 0.0 && self.bar_tabs.is_empty() {
            return;
        }

        self.lines.push(LayoutLine {
            runs: std::mem::take(&mut self.runs),
            width_pt: self.width,
            max_ascent: self.max_ascent,
            max_descent: self.max_descent,
            max_leading: self.max_leading,
            is_first_line: self.is_first_line,
            available_width_pt: self.line_limit,
            bar_tabs: std::mem::take(&mut self.bar_tabs),
        });

        self.width = 0.0;
        self.max_ascent = 0.0;
        self.max_descent = 0.0;
        self.max_leading = 0.0;
        self.is_first_line = false;
        self.line_limit = self.body_line_limit;
        self.line_indent = self.body_indent;
    }

    fn push_run(&mut self, run: LayoutRun, metrics: FontMetrics) {
        self.width += run.width_pt;
        self.max_ascent = self.max_ascent.min(metrics.ascent);
        self.max_descent = self.max_descent.max(metrics.descent);
        self.max_leading = self.max_leading.max(metrics.leading);
        self.runs.push(run);
    }

    fn process_text(&mut self, text: &str, formatting: &RunFormatting) {
        if text.is_empty() {
            return;
        }

        let face = self
            .engine
            .fonts
            .typeface(&formatting.font_family, formatting.bold, formatting.italic);
        let metrics = self.engine.measurer.metrics(&face, formatting.font_size_pt);

        for token in split_tokens(text) {
            let mut token_width =
                self.engine
                    .measurer
                    .measure(token, &face, formatting.font_size_pt);
            let char_count = token.chars().count();
            if formatting.character_spacing_pt != 0.0 && char_count > 1 {
                token_width += formatting.character_spacing_pt * (char_count - 1) as f32;
            }

            if !self.runs.is_empty() && self.width + token_width > self.line_limit {
                self.commit_line();
            }

            let is_whitespace = token.chars().all(char::is_whitespace);
            self.push_run(
                LayoutRun {
                    text: token.to_string(),
                    face: Arc::clone(&face),
                    font_size_pt: formatting.font_size_pt,
                    formatting: formatting.clone(),
                    drawable: true,
                    width_pt: token_width,
                    is_whitespace,
                },
                metrics,
            );
        }
    }

    fn process_tab(
        &mut self,
        formatting: RunFormatting,
        inline_index: usize,
        forced: Option<TabResolution>,
    ) {
        let mut resolution = match forced {
            Some(resolution) => resolution,
            None => self.resolve_tab_stop(&formatting),
        };

        loop {
            let relative_target = resolution.target_absolute_pt - self.line_indent;

            if resolution.alignment == TabAlignment::Bar {
                self.bar_tabs.push(BarTab {
                    relative_position_pt: relative_target.max(0.0),
                    formatting,
                });
                return;
            }

            // the stop is at or behind the caret
            if relative_target <= self.width + 0.1 {
                if !resolution.from_default {
                    resolution = self.default_tab(self.line_indent + self.width);
                    continue;
                }
                if !self.runs.is_empty() {
                    self.commit_line();
                    continue;
                }
            }

            let measurement = if needs_look_ahead(resolution.alignment) {
                self.measure_segment(inline_index + 1)
            } else {
                SegmentMeasurement::default()
            };

            let desired_start =
                compute_desired_start(relative_target, resolution.alignment, &measurement);
            if desired_start < self.width - 0.1 && !self.runs.is_empty() {
                self.commit_line();
                continue;
            }

            let projected_end = if needs_look_ahead(resolution.alignment) {
                desired_start + measurement.total_width_pt
            } else {
                desired_start
            };
            if projected_end > self.line_limit && !self.runs.is_empty() {
                self.commit_line();
                continue;
            }

            let span = (desired_start - self.width).max(0.0);
            if span > 0.0 || resolution.leader != TabLeader::None {
                self.append_leader_or_placeholder(span, resolution.leader, &formatting);
            }

            tracing::trace!(
                target_pt = resolution.target_absolute_pt,
                span_pt = span,
                alignment = ?resolution.alignment,
                from_default = resolution.from_default,
                "tab resolved"
            );
            return;
        }
    }

    fn resolve_tab_stop(&mut self, formatting: &RunFormatting) -> TabResolution {
        let current_absolute = self.line_indent + self.width;

        let mut passed_bars = Vec::new();
        let stop = next_custom_stop(
            &self.paragraph.formatting.tab_stops,
            current_absolute,
            |bar| passed_bars.push(bar.position_pt),
        )
        .copied();

        for position in passed_bars {
            self.bar_tabs.push(BarTab {
                relative_position_pt: (position - self.line_indent).max(0.0),
                formatting: formatting.clone(),
            });
        }

        match stop {
            Some(stop) => TabResolution {
                target_absolute_pt: stop.position_pt,
                leader: stop.leader,
                alignment: stop.alignment,
                from_default: false,
            },
            None => self.default_tab(current_absolute),
        }
    }

    fn default_tab(&self, current_absolute_pt: f32) -> TabResolution {
        TabResolution {
            target_absolute_pt: default_tab_target(
                current_absolute_pt,
                self.paragraph.default_tab_stop_pt,
            ),
            leader: TabLeader::None,
            alignment: TabAlignment::Left,
            from_default: true,
        }
    }

    /// Measure the content between a tab and the next tab (or the paragraph
    /// end), tracking the width up to the first decimal separator.
    fn measure_segment(&self, start_index: usize) -> SegmentMeasurement {
        let mut total = 0.0f32;
        let mut width_before_decimal = 0.0f32;
        let mut has_decimal = false;

        for inline in &self.paragraph.inlines[start_index..] {
            match inline {
                InlineElement::Text { text, formatting } => {
                    let face = self.engine.fonts.typeface(
                        &formatting.font_family,
                        formatting.bold,
                        formatting.italic,
                    );

                    if !has_decimal {
                        if let Some(byte_index) =
                            find_decimal_index(text, self.paragraph.decimal_symbol)
                        {
                            let prefix_width = self.engine.measurer.measure(
                                &text[..byte_index],
                                &face,
                                formatting.font_size_pt,
                            );
                            width_before_decimal = total + prefix_width;
                            has_decimal = true;
                        }
                    }

                    total += self
                        .engine
                        .measurer
                        .measure(text, &face, formatting.font_size_pt);
                }
                InlineElement::Tab { .. } | InlineElement::PositionalTab { .. } => break,
            }
        }

        SegmentMeasurement {
            total_width_pt: total,
            width_before_decimal_pt: if has_decimal {
                width_before_decimal
            } else {
                total
            },
            has_decimal,
        }
    }

    fn append_leader_or_placeholder(
        &mut self,
        span_pt: f32,
        leader: TabLeader,
        formatting: &RunFormatting,
    ) {
        if span_pt <= 0.0 {
            return;
        }

        let Some(glyph) = leader_glyph(leader) else {
            let face = self.engine.fonts.default_typeface();
            self.runs.push(LayoutRun::placeholder(span_pt, face));
            self.width += span_pt;
            return;
        };

        let face = self
            .engine
            .fonts
            .typeface(&formatting.font_family, formatting.bold, formatting.italic);
        let glyph_width = self
            .engine
            .measurer
            .measure(glyph, &face, formatting.font_size_pt);
        if glyph_width <= 0.0 {
            let face = self.engine.fonts.default_typeface();
            self.runs.push(LayoutRun::placeholder(span_pt, face));
            self.width += span_pt;
            return;
        }

        let repetitions = ((span_pt / glyph_width).ceil() as usize).max(1);
        let leader_text = glyph.repeat(repetitions);
        let leader_width = self
            .engine
            .measurer
            .measure(&leader_text, &face, formatting.font_size_pt);
        let metrics = self.engine.measurer.metrics(&face, formatting.font_size_pt);

        self.push_run(
            LayoutRun {
                text: leader_text,
                face,
                font_size_pt: formatting.font_size_pt,
                formatting: formatting.clone(),
                drawable: true,
                width_pt: leader_width,
                is_whitespace: false,
            },
            metrics,
        );
    }

    fn push_empty_line(&mut self) {
        let face = self.engine.fonts.default_typeface();
        let font_size = self
            .paragraph
            .runs
            .first()
            .map(|r| r.formatting.font_size_pt)
            .unwrap_or(11.0);
        let metrics = self.engine.measurer.metrics(&face, font_size);

        self.lines.push(LayoutLine {
            runs: Vec::new(),
            width_pt: 0.0,
            max_ascent: metrics.ascent,
            max_descent: metrics.descent,
            max_leading: metrics.leading,
            is_first_line: true,
            available_width_pt: self.first_line_limit,
            bar_tabs: Vec::new(),
        });
    }
}

/// Split text into wrap-atomic tokens: maximal non-whitespace runs, and
/// each whitespace character on its own.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for (index, c) in text.char_indices() {
        if c.is_whitespace() {
            if index > start {
                tokens.push(&text[start..index]);
            }
            let end = index + c.len_utf8();
            tokens.push(&text[index..end]);
            start = end;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

fn find_decimal_index(text: &str, decimal_symbol: char) -> Option<usize> {
    text.char_indices()
        .find(|(_, c)| *c == decimal_symbol || *c == ',')
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{
        units, DocxRun, ListMarker, MarkerSuffix, ParagraphFormatting, TabStop,
    };
    use text_engine::FixedMeasurer;

    // FixedMeasurer at 10pt: every character advances 5pt
    const SIZE: f32 = 10.0;
    const CHAR: f32 = 5.0;

    fn engine() -> TextLayoutEngine<FixedMeasurer> {
        TextLayoutEngine::new(Arc::new(FontManager::new()), FixedMeasurer::default())
    }

    fn formatting() -> RunFormatting {
        RunFormatting {
            font_size_pt: SIZE,
            ..Default::default()
        }
    }

    fn text_inline(text: &str) -> InlineElement {
        InlineElement::Text {
            text: text.to_string(),
            formatting: formatting(),
        }
    }

    fn paragraph(inlines: Vec<InlineElement>) -> DocxParagraph {
        paragraph_with(inlines, ParagraphFormatting::default())
    }

    fn paragraph_with(
        inlines: Vec<InlineElement>,
        para_formatting: ParagraphFormatting,
    ) -> DocxParagraph {
        let runs = inlines
            .iter()
            .filter_map(|inline| match inline {
                InlineElement::Text { text, formatting } => Some(DocxRun {
                    text: text.clone(),
                    formatting: formatting.clone(),
                }),
                _ => None,
            })
            .collect();
        DocxParagraph {
            style_id: String::new(),
            formatting: para_formatting,
            runs,
            inlines,
            list_marker: None,
            default_tab_stop_pt: 36.0,
            decimal_symbol: '.',
        }
    }

    fn line_text(line: &LayoutLine) -> String {
        line.runs
            .iter()
            .filter(|r| r.drawable)
            .map(|r| r.text.as_str())
            .collect()
    }

    #[test]
    fn test_single_line_when_it_fits() {
        let lines = engine().layout_paragraph(&paragraph(vec![text_inline("Hello world")]), 400.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "Hello world");
        assert_eq!(lines[0].width_pt, 11.0 * CHAR);
        assert!(lines[0].is_first_line);
    }

    #[test]
    fn test_greedy_wrap_at_budget() {
        // "aaaa bbbb cccc": 4-char words at 20pt, spaces at 5pt
        let lines = engine().layout_paragraph(&paragraph(vec![text_inline("aaaa bbbb cccc")]), 50.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "aaaa bbbb ");
        assert_eq!(line_text(&lines[1]), "cccc");
        assert!(!lines[1].is_first_line);
    }

    #[test]
    fn test_token_never_splits() {
        let lines =
            engine().layout_paragraph(&paragraph(vec![text_inline("aa bbbbbbbb")]), 30.0);
        // "bbbbbbbb" is 40pt wide against a 30pt budget: alone on its line
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[1]), "bbbbbbbb");
        assert!(lines[1].width_pt > lines[1].available_width_pt);
    }

    #[test]
    fn test_oversized_token_on_empty_line_does_not_loop() {
        let lines = engine().layout_paragraph(&paragraph(vec![text_inline("wwwwwwwwww")]), 10.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_empty_paragraph_yields_one_line_with_default_metrics() {
        let lines = engine().layout_paragraph(&paragraph(vec![]), 400.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].runs.is_empty());
        // FixedMeasurer at the 11pt default: ascent -8.8, descent 2.2
        assert!((lines[0].natural_height() - 11.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_tab_advances_by_stride() {
        let para = paragraph(vec![
            InlineElement::Tab {
                formatting: formatting(),
            },
            text_inline("Value"),
        ]);
        let lines = engine().layout_paragraph(&para, 400.0);

        assert_eq!(lines.len(), 1);
        let placeholder = lines[0].runs.iter().find(|r| !r.drawable).unwrap();
        assert!((placeholder.width_pt - units::dxa_to_points(720)).abs() < 0.1);
        assert_eq!(line_text(&lines[0]), "Value");
    }

    #[test]
    fn test_custom_left_stop_overrides_default() {
        let para = paragraph_with(
            vec![
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("Next"),
            ],
            ParagraphFormatting {
                tab_stops: vec![TabStop::new(
                    200.0,
                    TabAlignment::Left,
                    TabLeader::None,
                )],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 400.0);

        let placeholder = lines[0].runs.iter().find(|r| !r.drawable).unwrap();
        assert!((placeholder.width_pt - 200.0).abs() < 0.1);
    }

    #[test]
    fn test_right_aligned_stop_lands_trailing_edge_on_stop() {
        let target = units::dxa_to_points(2880); // 144pt
        let para = paragraph_with(
            vec![
                text_inline("Label"),
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("Value"),
            ],
            ParagraphFormatting {
                tab_stops: vec![TabStop::new(target, TabAlignment::Right, TabLeader::None)],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 600.0);

        assert_eq!(lines.len(), 1);
        assert!((lines[0].width_pt - target).abs() < 0.5);
    }

    #[test]
    fn test_decimal_stop_aligns_separator() {
        let target = 180.0;
        let para = paragraph_with(
            vec![
                text_inline("Cost"),
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("123.45"),
            ],
            ParagraphFormatting {
                tab_stops: vec![TabStop::new(target, TabAlignment::Decimal, TabLeader::None)],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 600.0);

        // walk the line to the decimal point: "Cost" + span + "123"
        let mut x = 0.0;
        for run in &lines[0].runs {
            if run.drawable {
                if let Some(idx) = run.text.find('.') {
                    x += run.text[..idx].chars().count() as f32 * CHAR;
                    break;
                }
            }
            x += run.width_pt;
        }
        assert!((x - target).abs() < 0.5);
    }

    #[test]
    fn test_bar_tab_emits_rule_without_advance() {
        let para = paragraph_with(
            vec![
                text_inline("ab"),
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("cd"),
            ],
            ParagraphFormatting {
                tab_stops: vec![
                    TabStop::new(60.0, TabAlignment::Bar, TabLeader::None),
                    TabStop::new(100.0, TabAlignment::Left, TabLeader::None),
                ],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 400.0);

        assert_eq!(lines[0].bar_tabs.len(), 1);
        assert!((lines[0].bar_tabs[0].relative_position_pt - 60.0).abs() < 0.1);
        // the caret advanced to the left stop, not the bar
        assert!((lines[0].width_pt - (100.0 + 2.0 * CHAR)).abs() < 0.1);
    }

    #[test]
    fn test_leader_fills_span_with_glyphs() {
        let para = paragraph_with(
            vec![
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("99"),
            ],
            ParagraphFormatting {
                tab_stops: vec![TabStop::new(100.0, TabAlignment::Left, TabLeader::Dots)],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 400.0);

        let leader = &lines[0].runs[0];
        assert!(leader.drawable);
        assert!(leader.text.chars().all(|c| c == '.'));
        // 100pt span at 5pt per dot
        assert_eq!(leader.text.len(), 20);
        assert!((leader.width_pt - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_positional_tab_anchored_to_margin() {
        let para = paragraph(vec![
            text_inline("ab"),
            InlineElement::PositionalTab {
                formatting: formatting(),
                position_pt: 144.0,
                alignment: TabAlignment::Right,
                leader: TabLeader::None,
                base: doc_model::PositionalTabBase::Margin,
            },
            text_inline("xy"),
        ]);
        let lines = engine().layout_paragraph(&para, 400.0);

        assert!((lines[0].width_pt - 144.0).abs() < 0.5);
    }

    #[test]
    fn test_first_line_budget_narrower_with_first_line_indent() {
        let para = paragraph_with(
            vec![text_inline("aaaa aaaa aaaa aaaa")],
            ParagraphFormatting {
                first_line_indent_pt: 50.0,
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 100.0);

        assert!(lines.len() >= 2);
        assert_eq!(lines[0].available_width_pt, 50.0);
        assert_eq!(lines[1].available_width_pt, 100.0);
    }

    #[test]
    fn test_marker_forces_first_line_to_body_offset() {
        let mut para = paragraph_with(
            vec![text_inline("item text")],
            ParagraphFormatting {
                left_indent_pt: 54.0,
                hanging_indent_pt: 18.0,
                ..Default::default()
            },
        );
        para.list_marker = Some(ListMarker {
            text: "1.".to_string(),
            formatting: formatting(),
            alignment: doc_model::Alignment::Left,
            suffix: MarkerSuffix::Tab,
        });

        let lines = engine().layout_paragraph(&para, 400.0);
        // the marker occupies the hanging gap: text budget = body budget
        assert_eq!(lines[0].available_width_pt, 400.0 - 54.0);
    }

    #[test]
    fn test_degenerate_width_clamps_and_terminates() {
        let para = paragraph_with(
            vec![text_inline("some words here")],
            ParagraphFormatting {
                left_indent_pt: 500.0,
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 100.0);
        assert!(!lines.is_empty());
        for line in &lines {
            assert_eq!(line.available_width_pt, 1.0);
        }
    }

    #[test]
    fn test_line_summary_reflects_drawable_text() {
        let lines = engine().layout_paragraph(&paragraph(vec![text_inline("Hello world")]), 400.0);
        let summary = crate::LineSummary::from(&lines[0]);
        assert_eq!(summary.text, "Hello world");
        assert!(summary.is_first_line);
    }

    #[test]
    fn test_split_tokens_preserves_individual_spaces() {
        assert_eq!(split_tokens("a  b"), vec!["a", " ", " ", "b"]);
        assert_eq!(split_tokens(" lead"), vec![" ", "lead"]);
        assert_eq!(split_tokens("word"), vec!["word"]);
        assert_eq!(split_tokens(""), Vec::<&str>::new());
    }

    #[test]
    fn test_tab_behind_caret_on_full_line_wraps() {
        // caret already past the only stop; content follows on a fresh line
        let para = paragraph_with(
            vec![
                text_inline("abcdefghij"), // 50pt
                InlineElement::Tab {
                    formatting: formatting(),
                },
                text_inline("zz"),
            ],
            ParagraphFormatting {
                tab_stops: vec![TabStop::new(30.0, TabAlignment::Left, TabLeader::None)],
                ..Default::default()
            },
        );
        let lines = engine().layout_paragraph(&para, 400.0);

        // stop at 30 is behind the 50pt caret: the default stride takes over
        assert_eq!(lines.len(), 1);
        let placeholder = lines[0].runs.iter().find(|r| !r.drawable).unwrap();
        assert!((placeholder.width_pt - 22.0).abs() < 0.1); // 72 - 50
    }
}
