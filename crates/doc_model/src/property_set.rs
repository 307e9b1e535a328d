//! Partial, mergeable property overlays
//!
//! Property sets are the working currency of the cascade: every field is
//! optional, and `apply` folds an overlay onto a base with "set overlay
//! field wins, else keep base" semantics, field by field. A set is built
//! from one source (document defaults, one style in a chain, direct
//! formatting, a numbering level fragment), merged in cascade order, and
//! finally converted into the resolved formatting types.

use crate::{
    units, Alignment, Element, LineSpacing, ParagraphFormatting, TabAlignment, TabLeader, TabStop,
    ThemeColor, ThemeFont,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Run property overlay
// =============================================================================

/// Inheritable run properties before final resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunPropertySet {
    pub ascii_font: Option<String>,
    pub high_ansi_font: Option<String>,
    pub east_asia_font: Option<String>,
    pub complex_script_font: Option<String>,
    pub ascii_theme: Option<ThemeFont>,
    pub high_ansi_theme: Option<ThemeFont>,
    pub east_asia_theme: Option<ThemeFont>,
    pub complex_script_theme: Option<ThemeFont>,
    pub font_size_pt: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub small_caps: Option<bool>,
    pub character_spacing_pt: Option<f32>,
    pub color_hex: Option<String>,
    pub theme_color: Option<ThemeColor>,
    pub tint: Option<u8>,
    pub shade: Option<u8>,
}

impl RunPropertySet {
    /// Fold `overlay` onto `self`: set overlay fields win, unset fields keep
    /// the base value.
    pub fn apply(&mut self, overlay: &RunPropertySet) {
        apply_string(&mut self.ascii_font, &overlay.ascii_font);
        apply_string(&mut self.high_ansi_font, &overlay.high_ansi_font);
        apply_string(&mut self.east_asia_font, &overlay.east_asia_font);
        apply_string(&mut self.complex_script_font, &overlay.complex_script_font);

        apply_copy(&mut self.ascii_theme, overlay.ascii_theme);
        apply_copy(&mut self.high_ansi_theme, overlay.high_ansi_theme);
        apply_copy(&mut self.east_asia_theme, overlay.east_asia_theme);
        apply_copy(&mut self.complex_script_theme, overlay.complex_script_theme);

        apply_copy(&mut self.font_size_pt, overlay.font_size_pt);
        apply_copy(&mut self.bold, overlay.bold);
        apply_copy(&mut self.italic, overlay.italic);
        apply_copy(&mut self.underline, overlay.underline);
        apply_copy(&mut self.strike, overlay.strike);
        apply_copy(&mut self.small_caps, overlay.small_caps);
        apply_copy(&mut self.character_spacing_pt, overlay.character_spacing_pt);

        apply_string(&mut self.color_hex, &overlay.color_hex);
        apply_copy(&mut self.theme_color, overlay.theme_color);
        apply_copy(&mut self.tint, overlay.tint);
        apply_copy(&mut self.shade, overlay.shade);
    }

    /// Extract a run overlay from an `rPr` element. Absent children and
    /// unparseable values read as unset.
    pub fn from_element(run_props: Option<&Element>) -> Self {
        let mut set = Self::default();
        let Some(rpr) = run_props else {
            return set;
        };

        if let Some(fonts) = rpr.find("rFonts") {
            set.ascii_font = non_empty(fonts.attr("ascii"));
            set.high_ansi_font = non_empty(fonts.attr("hAnsi"));
            set.east_asia_font = non_empty(fonts.attr("eastAsia"));
            set.complex_script_font = non_empty(fonts.attr("cs"));
            set.ascii_theme = fonts.attr("asciiTheme").and_then(ThemeFont::parse);
            set.high_ansi_theme = fonts.attr("hAnsiTheme").and_then(ThemeFont::parse);
            set.east_asia_theme = fonts.attr("eastAsiaTheme").and_then(ThemeFont::parse);
            set.complex_script_theme = fonts.attr("cstheme").and_then(ThemeFont::parse);
        }

        // sz carries half-points; szCs is consulted when sz is absent
        set.font_size_pt = parse_half_points(rpr.find("sz"))
            .or_else(|| parse_half_points(rpr.find("szCs")));

        set.bold = parse_on_off(rpr.find("b"));
        set.italic = parse_on_off(rpr.find("i"));
        set.strike = parse_on_off(rpr.find("strike"));
        set.small_caps = parse_on_off(rpr.find("smallCaps"));

        if let Some(u) = rpr.find("u") {
            set.underline = Some(u.attr("val").map_or(true, |v| v != "none"));
        }

        if let Some(spacing) = rpr.find("spacing") {
            set.character_spacing_pt = spacing.int_attr("val").map(units::dxa_to_points);
        }

        if let Some(color) = rpr.find("color") {
            if let Some(val) = color.attr("val") {
                if !val.is_empty() && !val.eq_ignore_ascii_case("auto") {
                    set.color_hex = Some(val.to_string());
                }
            }
            set.theme_color = color.attr("themeColor").and_then(ThemeColor::parse);
            set.tint = parse_hex_byte(color.attr("themeTint"));
            set.shade = parse_hex_byte(color.attr("themeShade"));
        }

        set
    }
}

// =============================================================================
// Paragraph property overlay
// =============================================================================

/// Inheritable paragraph properties (including the shared paragraph-mark
/// run properties) before final resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphPropertySet {
    pub spacing_before_pt: Option<f32>,
    pub spacing_after_pt: Option<f32>,
    pub line_spacing: Option<LineSpacing>,
    pub alignment: Option<Alignment>,
    pub left_indent_pt: Option<f32>,
    pub right_indent_pt: Option<f32>,
    pub first_line_indent_pt: Option<f32>,
    pub hanging_indent_pt: Option<f32>,
    pub run_properties: Option<RunPropertySet>,
    pub tab_stops: Option<Vec<TabStop>>,
    pub contextual_spacing: Option<bool>,
    pub numbering_id: Option<i64>,
    pub numbering_level: Option<i64>,
}

impl ParagraphPropertySet {
    /// Fold `overlay` onto `self`. Run properties merge recursively; a tab
    /// stop list replaces the inherited list wholesale.
    pub fn apply(&mut self, overlay: &ParagraphPropertySet) {
        apply_copy(&mut self.spacing_before_pt, overlay.spacing_before_pt);
        apply_copy(&mut self.spacing_after_pt, overlay.spacing_after_pt);
        apply_copy(&mut self.line_spacing, overlay.line_spacing);
        apply_copy(&mut self.alignment, overlay.alignment);
        apply_copy(&mut self.left_indent_pt, overlay.left_indent_pt);
        apply_copy(&mut self.right_indent_pt, overlay.right_indent_pt);
        apply_copy(&mut self.first_line_indent_pt, overlay.first_line_indent_pt);
        apply_copy(&mut self.hanging_indent_pt, overlay.hanging_indent_pt);

        if let Some(ref overlay_run) = overlay.run_properties {
            self.run_properties
                .get_or_insert_with(RunPropertySet::default)
                .apply(overlay_run);
        }

        if let Some(ref stops) = overlay.tab_stops {
            self.tab_stops = Some(stops.clone());
        }

        apply_copy(&mut self.contextual_spacing, overlay.contextual_spacing);
        apply_copy(&mut self.numbering_id, overlay.numbering_id);
        apply_copy(&mut self.numbering_level, overlay.numbering_level);
    }

    /// Resolve to final paragraph formatting, filling unset fields with
    /// zero-valued defaults.
    pub fn to_formatting(&self) -> ParagraphFormatting {
        ParagraphFormatting {
            spacing_before_pt: self.spacing_before_pt.unwrap_or(0.0),
            spacing_after_pt: self.spacing_after_pt.unwrap_or(0.0),
            line_spacing: self.line_spacing,
            alignment: self.alignment.unwrap_or_default(),
            left_indent_pt: self.left_indent_pt.unwrap_or(0.0),
            right_indent_pt: self.right_indent_pt.unwrap_or(0.0),
            first_line_indent_pt: self.first_line_indent_pt.unwrap_or(0.0),
            hanging_indent_pt: self.hanging_indent_pt.unwrap_or(0.0),
            tab_stops: self.tab_stops.clone().unwrap_or_default(),
            contextual_spacing: self.contextual_spacing.unwrap_or(false),
        }
    }

    /// The hardcoded document defaults used when the document carries none:
    /// no space before, 8 pt after, 1.15x line height.
    pub fn word_defaults() -> Self {
        Self {
            spacing_before_pt: Some(0.0),
            spacing_after_pt: Some(units::dxa_to_points(160)),
            line_spacing: Some(LineSpacing::auto(1.15)),
            ..Default::default()
        }
    }

    /// Extract a paragraph overlay from a `pPr` element.
    pub fn from_element(paragraph_props: Option<&Element>) -> Self {
        let mut set = Self::default();
        let Some(ppr) = paragraph_props else {
            return set;
        };

        if let Some(spacing) = ppr.find("spacing") {
            set.spacing_before_pt = spacing.int_attr("before").map(units::dxa_to_points);
            set.spacing_after_pt = spacing.int_attr("after").map(units::dxa_to_points);
            if let Some(line) = spacing.int_attr("line") {
                set.line_spacing = Some(match spacing.attr("lineRule") {
                    Some("exact") => LineSpacing::exact(units::dxa_to_points(line)),
                    Some("atLeast") => LineSpacing::at_least(units::dxa_to_points(line)),
                    // auto: the value counts 240ths of a single-spaced line
                    _ => LineSpacing::auto((line as f32 / 240.0).max(0.1)),
                });
            }
        }

        if let Some(indent) = ppr.find("ind") {
            set.left_indent_pt = indent
                .int_attr("left")
                .or_else(|| indent.int_attr("start"))
                .map(units::dxa_to_points);
            set.right_indent_pt = indent
                .int_attr("right")
                .or_else(|| indent.int_attr("end"))
                .map(units::dxa_to_points);
            set.first_line_indent_pt = indent.int_attr("firstLine").map(units::dxa_to_points);
            set.hanging_indent_pt = indent.int_attr("hanging").map(units::dxa_to_points);
        }

        if ppr.find("contextualSpacing").is_some() {
            set.contextual_spacing = Some(true);
        }

        if let Some(jc) = ppr.find("jc") {
            set.alignment = Some(match jc.attr("val") {
                Some("center") => Alignment::Center,
                Some("right") | Some("end") => Alignment::Right,
                Some("both") => Alignment::Justified,
                Some("distribute") => Alignment::Distributed,
                _ => Alignment::Left,
            });
        }

        if let Some(num_pr) = ppr.find("numPr") {
            set.numbering_id = num_pr.find("numId").and_then(|el| el.int_attr("val"));
            set.numbering_level = num_pr.find("ilvl").and_then(|el| el.int_attr("val"));
        }

        let mark_props = RunPropertySet::from_element(ppr.find("rPr"));
        if mark_props != RunPropertySet::default() {
            set.run_properties = Some(mark_props);
        }

        if let Some(tabs) = ppr.find("tabs") {
            set.tab_stops = Some(parse_tab_stops(tabs));
        }

        set
    }
}

fn parse_tab_stops(tabs: &Element) -> Vec<TabStop> {
    let mut stops = Vec::new();

    for tab in tabs.find_all("tab") {
        let Some(pos) = tab.int_attr("pos") else {
            continue;
        };

        let alignment = match tab.attr("val") {
            Some("center") => TabAlignment::Center,
            Some("right") => TabAlignment::Right,
            Some("decimal") => TabAlignment::Decimal,
            Some("bar") => TabAlignment::Bar,
            Some("clear") => continue,
            _ => TabAlignment::Left,
        };

        let leader = match tab.attr("leader") {
            Some("dot") | Some("middleDot") => TabLeader::Dots,
            Some("hyphen") => TabLeader::Dashes,
            Some("underscore") => TabLeader::Underscore,
            Some("heavy") => TabLeader::Heavy,
            _ => TabLeader::None,
        };

        stops.push(TabStop::new(units::dxa_to_points(pos), alignment, leader));
    }

    stops.sort_by(|a, b| a.position_pt.total_cmp(&b.position_pt));
    stops
}

// =============================================================================
// Shared parsing helpers
// =============================================================================

fn apply_copy<T: Copy>(base: &mut Option<T>, overlay: Option<T>) {
    if overlay.is_some() {
        *base = overlay;
    }
}

fn apply_string(base: &mut Option<String>, overlay: &Option<String>) {
    if let Some(value) = overlay {
        if !value.is_empty() {
            *base = Some(value.clone());
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Toggle elements: present without `val` means on; `val` of `0`, `false`,
/// `none`, or `off` means off.
fn parse_on_off(el: Option<&Element>) -> Option<bool> {
    let el = el?;
    Some(match el.attr("val") {
        None => true,
        Some("0") | Some("false") | Some("none") | Some("off") => false,
        Some(_) => true,
    })
}

fn parse_half_points(el: Option<&Element>) -> Option<f32> {
    el.and_then(|e| e.attr("val"))
        .and_then(|v| v.trim().parse::<f32>().ok())
        .map(units::half_points_to_points)
}

fn parse_hex_byte(value: Option<&str>) -> Option<u8> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    u8::from_str_radix(value, 16).ok()
}
