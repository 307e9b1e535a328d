//! Named styles and the cascade resolver
//!
//! Style resolution is a fixed-order merge: document-wide defaults, then the
//! `basedOn` chain of the paragraph's style applied base-to-derived, then the
//! paragraph's own direct properties. Run formatting starts from the
//! paragraph's merged run baseline and layers an optional character-style
//! chain (explicit run style, else the paragraph style's linked character
//! style) and the run's direct properties on top.
//!
//! Inheritance is walked iteratively with a stack and a visited set; a style
//! chain that loops back on itself simply stops at the repeated id.

use crate::{
    Element, ParagraphPropertySet, RgbColor, RunFormatting, RunPropertySet, ThemeColor,
    ColorSchemeMapper, DocumentSource, ThemeColorPalette, ThemeFont, ThemeFontScheme,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Family and size used when neither the document nor its theme supplies one
const BUILTIN_DEFAULT_FONT_FAMILY: &str = "Aptos";
const BUILTIN_DEFAULT_FONT_SIZE_PT: f32 = 12.0;

// =============================================================================
// Style definitions
// =============================================================================

/// The type of a named style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("character") => Self::Character,
            Some("table") => Self::Table,
            Some("numbering") => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// One named style as loaded from the styles part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub style_id: String,
    pub style_type: StyleType,
    pub is_default: bool,
    pub based_on: Option<String>,
    pub linked_style: Option<String>,
    pub paragraph_properties: ParagraphPropertySet,
    pub run_properties: RunPropertySet,
}

impl StyleDefinition {
    pub fn from_element(style: &Element) -> Self {
        let style_id = style.attr("styleId").unwrap_or_default().to_string();
        let style_type = StyleType::parse(style.attr("type"));
        let is_default = matches!(style.attr("default"), Some("1") | Some("true"));
        let based_on = style
            .find("basedOn")
            .and_then(|el| el.attr("val"))
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let linked_style = style
            .find("link")
            .and_then(|el| el.attr("val"))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            style_id,
            style_type,
            is_default,
            based_on,
            linked_style,
            paragraph_properties: ParagraphPropertySet::from_element(style.find("pPr")),
            run_properties: RunPropertySet::from_element(style.find("rPr")),
        }
    }
}

// =============================================================================
// Paragraph context
// =============================================================================

/// The output of resolving one paragraph's cascade: final paragraph
/// properties plus the run baseline every run in the paragraph starts from.
#[derive(Debug, Clone)]
pub struct ParagraphContext {
    pub style_id: String,
    pub paragraph_properties: ParagraphPropertySet,
    run_base: RunPropertySet,
}

impl ParagraphContext {
    /// Clone the run baseline to seed one run's resolution
    pub fn run_property_set(&self) -> RunPropertySet {
        self.run_base.clone()
    }
}

// =============================================================================
// Style resolver
// =============================================================================

/// Resolves the style cascade for one loaded document.
///
/// Loaded once per document session; immutable afterwards.
pub struct StyleResolver {
    /// Lowercased style id -> definition (style ids compare case-insensitively)
    styles: HashMap<String, StyleDefinition>,
    paragraph_defaults: ParagraphPropertySet,
    run_defaults: RunPropertySet,
    theme_fonts: ThemeFontScheme,
    theme_colors: ThemeColorPalette,
    color_mapper: ColorSchemeMapper,
    default_paragraph_style_id: Option<String>,
    default_character_style_id: Option<String>,
    default_font_family: String,
    default_font_size_pt: f32,
    default_text_color: RgbColor,
}

impl StyleResolver {
    /// Load styles, document defaults, theme, and the color-scheme mapping
    /// from a document source. Absent parts degrade to built-in defaults.
    pub fn load(source: &dyn DocumentSource) -> Self {
        let mut styles = HashMap::new();
        let mut default_paragraph_style_id = None;
        let mut default_character_style_id = None;

        let styles_part = source.styles_part();

        if let Some(root) = styles_part {
            for style_el in root.find_all("style") {
                let def = StyleDefinition::from_element(style_el);
                if def.style_id.is_empty() {
                    continue;
                }
                if def.is_default {
                    match def.style_type {
                        StyleType::Paragraph if default_paragraph_style_id.is_none() => {
                            default_paragraph_style_id = Some(def.style_id.clone());
                        }
                        StyleType::Character if default_character_style_id.is_none() => {
                            default_character_style_id = Some(def.style_id.clone());
                        }
                        _ => {}
                    }
                }
                styles.insert(def.style_id.to_lowercase(), def);
            }
        }

        let doc_defaults = styles_part.and_then(|root| root.find("docDefaults"));
        let paragraph_defaults = doc_defaults
            .and_then(|d| d.find("pPrDefault"))
            .and_then(|d| d.find("pPr"))
            .map(|ppr| ParagraphPropertySet::from_element(Some(ppr)))
            .unwrap_or_else(ParagraphPropertySet::word_defaults);
        let run_defaults = doc_defaults
            .and_then(|d| d.find("rPrDefault"))
            .and_then(|d| d.find("rPr"))
            .map(|rpr| RunPropertySet::from_element(Some(rpr)))
            .unwrap_or_default();

        let theme_fonts = ThemeFontScheme::load(source.theme_part());
        let theme_colors = ThemeColorPalette::load(source.theme_part());
        let color_mapper = ColorSchemeMapper::load(source.settings_part());

        let mut resolver = Self {
            styles,
            paragraph_defaults,
            run_defaults,
            theme_fonts,
            theme_colors,
            color_mapper,
            default_paragraph_style_id,
            default_character_style_id,
            default_font_family: String::new(),
            default_font_size_pt: BUILTIN_DEFAULT_FONT_SIZE_PT,
            default_text_color: RgbColor::BLACK,
        };

        resolver.default_font_family = resolver.determine_default_font_family();
        resolver.default_font_size_pt = resolver
            .run_defaults
            .font_size_pt
            .unwrap_or(BUILTIN_DEFAULT_FONT_SIZE_PT);
        resolver.default_text_color = resolver.resolve_theme_color(ThemeColor::Text1, None, None);

        resolver
    }

    pub fn default_font_family(&self) -> &str {
        &self.default_font_family
    }

    pub fn default_font_size_pt(&self) -> f32 {
        self.default_font_size_pt
    }

    pub fn default_text_color(&self) -> RgbColor {
        self.default_text_color
    }

    pub fn default_character_style_id(&self) -> Option<&str> {
        self.default_character_style_id.as_deref()
    }

    pub fn style(&self, style_id: &str) -> Option<&StyleDefinition> {
        self.styles.get(&style_id.to_lowercase())
    }

    /// Resolve one paragraph element's cascade: defaults, then its style
    /// chain base-to-derived, then direct formatting, then paragraph-mark
    /// run properties folded into the run baseline.
    pub fn create_paragraph_context(&self, paragraph: &Element) -> ParagraphContext {
        let ppr = paragraph.find("pPr");
        let style_id = ppr
            .and_then(|p| p.find("pStyle"))
            .and_then(|el| el.attr("val"))
            .filter(|v| !v.is_empty())
            .or(self.default_paragraph_style_id.as_deref())
            .unwrap_or_default()
            .to_string();

        let mut paragraph_props = self.paragraph_defaults.clone();
        let mut run_props = self.run_defaults.clone();

        for style in self.style_chain(&style_id) {
            if style.style_type != StyleType::Paragraph {
                continue;
            }
            paragraph_props.apply(&style.paragraph_properties);
            run_props.apply(&style.run_properties);
        }

        if ppr.is_some() {
            let direct = ParagraphPropertySet::from_element(ppr);
            paragraph_props.apply(&direct);
        }

        if let Some(mark_props) = paragraph_props.run_properties.clone() {
            run_props.apply(&mark_props);
        }

        ParagraphContext {
            style_id,
            paragraph_properties: paragraph_props,
            run_base: run_props,
        }
    }

    /// Resolve one run element against its paragraph context.
    pub fn resolve_run_formatting(&self, context: &ParagraphContext, run: &Element) -> RunFormatting {
        let mut run_props = context.run_property_set();
        let rpr = run.find("rPr");
        let run_style_id = rpr
            .and_then(|r| r.find("rStyle"))
            .and_then(|el| el.attr("val"))
            .filter(|v| !v.is_empty());

        if let Some(style_id) = run_style_id {
            self.apply_character_chain(&mut run_props, style_id);
        } else if let Some(linked) = self
            .style(&context.style_id)
            .and_then(|s| s.linked_style.as_deref())
        {
            self.apply_character_chain(&mut run_props, linked);
        }

        if rpr.is_some() {
            let direct = RunPropertySet::from_element(rpr);
            run_props.apply(&direct);
        }

        self.run_formatting(&run_props)
    }

    fn apply_character_chain(&self, run_props: &mut RunPropertySet, style_id: &str) {
        for style in self.style_chain(style_id) {
            if style.style_type != StyleType::Character {
                continue;
            }
            run_props.apply(&style.run_properties);
        }
    }

    /// Convert a merged run property set to final formatting.
    pub fn run_formatting(&self, set: &RunPropertySet) -> RunFormatting {
        RunFormatting {
            font_family: self.resolve_font_family(set),
            font_size_pt: set.font_size_pt.unwrap_or(self.default_font_size_pt),
            bold: set.bold.unwrap_or(false),
            italic: set.italic.unwrap_or(false),
            underline: set.underline.unwrap_or(false),
            strike: set.strike.unwrap_or(false),
            small_caps: set.small_caps.unwrap_or(false),
            character_spacing_pt: set.character_spacing_pt.unwrap_or(0.0),
            color: self.resolve_color(set),
        }
    }

    /// Formatting produced by the document defaults alone.
    pub fn default_run_formatting(&self) -> RunFormatting {
        self.run_formatting(&self.run_defaults)
    }

    /// Font family fallthrough: literal slots, then theme slots, then the
    /// document default family.
    pub fn resolve_font_family(&self, set: &RunPropertySet) -> String {
        set.ascii_font
            .clone()
            .or_else(|| set.high_ansi_font.clone())
            .or_else(|| set.east_asia_font.clone())
            .or_else(|| set.complex_script_font.clone())
            .or_else(|| self.theme_font(set.ascii_theme))
            .or_else(|| self.theme_font(set.high_ansi_theme))
            .or_else(|| self.theme_font(set.east_asia_theme))
            .or_else(|| self.theme_font(set.complex_script_theme))
            .unwrap_or_else(|| self.default_font_family.clone())
    }

    /// Color fallthrough: theme color (through the scheme mapping, palette,
    /// and tint/shade), then literal hex, then the default text color.
    pub fn resolve_color(&self, set: &RunPropertySet) -> RgbColor {
        if let Some(theme_color) = set.theme_color {
            return self.resolve_theme_color(theme_color, set.tint, set.shade);
        }

        if let Some(color) = set.color_hex.as_deref().and_then(RgbColor::from_hex) {
            return color;
        }

        self.default_text_color
    }

    fn resolve_theme_color(
        &self,
        requested: ThemeColor,
        tint: Option<u8>,
        shade: Option<u8>,
    ) -> RgbColor {
        let mapped = self.color_mapper.resolve(requested);
        let mut color = self
            .theme_colors
            .get(mapped)
            .unwrap_or_else(|| fallback_palette_color(mapped));
        if let Some(tint) = tint {
            color = color.tinted(tint);
        }
        if let Some(shade) = shade {
            color = color.shaded(shade);
        }
        color
    }

    fn theme_font(&self, slot: Option<ThemeFont>) -> Option<String> {
        slot.map(|s| self.theme_fonts.resolve(s).to_string())
    }

    fn determine_default_font_family(&self) -> String {
        self.run_defaults
            .ascii_font
            .clone()
            .or_else(|| self.run_defaults.high_ansi_font.clone())
            .or_else(|| self.theme_font(self.run_defaults.ascii_theme))
            .or_else(|| self.theme_font(self.run_defaults.high_ansi_theme))
            .or_else(|| self.theme_font(self.run_defaults.east_asia_theme))
            .or_else(|| self.theme_font(self.run_defaults.complex_script_theme))
            .or_else(|| self.theme_font(Some(ThemeFont::MinorAscii)))
            .unwrap_or_else(|| BUILTIN_DEFAULT_FONT_FAMILY.to_string())
    }

    /// The `basedOn` chain of a style, base first. A repeated id ends the
    /// walk; an unknown id ends it one link earlier.
    fn style_chain(&self, style_id: &str) -> impl Iterator<Item = &StyleDefinition> {
        let mut chain = Vec::new();

        if !style_id.is_empty() {
            let mut visited = HashSet::new();
            let mut current = Some(style_id.to_string());

            while let Some(id) = current {
                let key = id.to_lowercase();
                if !visited.insert(key.clone()) {
                    break;
                }
                let Some(style) = self.styles.get(&key) else {
                    break;
                };
                chain.push(style);
                current = style.based_on.clone();
            }
        }

        chain.into_iter().rev()
    }
}

/// Built-in colors for palette slots a malformed theme failed to provide
fn fallback_palette_color(key: ThemeColor) -> RgbColor {
    match key {
        ThemeColor::Dark1 => RgbColor::BLACK,
        ThemeColor::Light1 => RgbColor::WHITE,
        ThemeColor::Dark2 => RgbColor::from_hex("222222").unwrap(),
        ThemeColor::Light2 => RgbColor::from_hex("DDDDDD").unwrap(),
        ThemeColor::Accent1 => RgbColor::from_hex("4F81BD").unwrap(),
        ThemeColor::Accent2 => RgbColor::from_hex("C0504D").unwrap(),
        ThemeColor::Accent3 => RgbColor::from_hex("9BBB59").unwrap(),
        ThemeColor::Accent4 => RgbColor::from_hex("8064A2").unwrap(),
        ThemeColor::Accent5 => RgbColor::from_hex("4BACC6").unwrap(),
        ThemeColor::Accent6 => RgbColor::from_hex("F79646").unwrap(),
        ThemeColor::Hyperlink => RgbColor::from_hex("0000FF").unwrap(),
        ThemeColor::FollowedHyperlink => RgbColor::from_hex("800080").unwrap(),
        _ => RgbColor::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Alignment, InMemorySource};

    fn style_el(id: &str, style_type: &str) -> Element {
        Element::new("style")
            .with_attr("type", style_type)
            .with_attr("styleId", id)
    }

    fn source_with_styles(styles: Vec<Element>) -> InMemorySource {
        let mut root = Element::new("styles");
        for s in styles {
            root = root.with_child(s);
        }
        InMemorySource {
            styles: Some(root),
            ..Default::default()
        }
    }

    fn paragraph_with_style(style_id: &str) -> Element {
        Element::new("p").with_child(
            Element::new("pPr")
                .with_child(Element::new("pStyle").with_attr("val", style_id)),
        )
    }

    #[test]
    fn test_cascade_order_direct_beats_style_beats_base() {
        let normal = style_el("Normal", "paragraph").with_child(
            Element::new("pPr")
                .with_child(Element::new("jc").with_attr("val", "right"))
                .with_child(Element::new("spacing").with_attr("after", "200")),
        );
        let heading = style_el("Heading1", "paragraph")
            .with_child(Element::new("basedOn").with_attr("val", "Normal"))
            .with_child(
                Element::new("pPr")
                    .with_child(Element::new("jc").with_attr("val", "left"))
                    .with_child(Element::new("spacing").with_attr("before", "240")),
            );
        let resolver = StyleResolver::load(&source_with_styles(vec![normal, heading]));

        let paragraph = Element::new("p").with_child(
            Element::new("pPr")
                .with_child(Element::new("pStyle").with_attr("val", "Heading1"))
                .with_child(Element::new("jc").with_attr("val", "center")),
        );
        let ctx = resolver.create_paragraph_context(&paragraph);

        // direct formatting wins over Heading1's left
        assert_eq!(ctx.paragraph_properties.alignment, Some(Alignment::Center));
        // spacing-before comes from Heading1, spacing-after survives from Normal
        assert_eq!(ctx.paragraph_properties.spacing_before_pt, Some(12.0));
        assert_eq!(ctx.paragraph_properties.spacing_after_pt, Some(10.0));
    }

    #[test]
    fn test_style_ids_compare_case_insensitively() {
        let heading = style_el("Heading1", "paragraph").with_child(
            Element::new("pPr").with_child(Element::new("jc").with_attr("val", "center")),
        );
        let resolver = StyleResolver::load(&source_with_styles(vec![heading]));

        let ctx = resolver.create_paragraph_context(&paragraph_with_style("heading1"));
        assert_eq!(ctx.paragraph_properties.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_unknown_style_id_recovers_to_defaults() {
        let resolver = StyleResolver::load(&source_with_styles(vec![]));
        let ctx = resolver.create_paragraph_context(&paragraph_with_style("Ghost"));

        // document defaults survive untouched
        assert_eq!(ctx.paragraph_properties.spacing_after_pt, Some(8.0));
        assert_eq!(ctx.style_id, "Ghost");
    }

    #[test]
    fn test_cyclic_based_on_chain_terminates() {
        let a = style_el("StyleA", "paragraph")
            .with_child(Element::new("basedOn").with_attr("val", "StyleB"))
            .with_child(
                Element::new("pPr").with_child(Element::new("jc").with_attr("val", "center")),
            );
        let b = style_el("StyleB", "paragraph")
            .with_child(Element::new("basedOn").with_attr("val", "StyleA"))
            .with_child(
                Element::new("pPr")
                    .with_child(Element::new("spacing").with_attr("before", "100")),
            );
        let resolver = StyleResolver::load(&source_with_styles(vec![a, b]));

        let ctx = resolver.create_paragraph_context(&paragraph_with_style("StyleA"));

        // both styles contribute exactly once, derived last
        assert_eq!(ctx.paragraph_properties.alignment, Some(Alignment::Center));
        assert_eq!(ctx.paragraph_properties.spacing_before_pt, Some(5.0));
    }

    #[test]
    fn test_default_paragraph_style_applies_without_explicit_id() {
        let normal = style_el("Normal", "paragraph")
            .with_attr("default", "1")
            .with_child(
                Element::new("pPr").with_child(Element::new("jc").with_attr("val", "both")),
            );
        let resolver = StyleResolver::load(&source_with_styles(vec![normal]));

        let ctx = resolver.create_paragraph_context(&Element::new("p"));
        assert_eq!(ctx.style_id, "Normal");
        assert_eq!(ctx.paragraph_properties.alignment, Some(Alignment::Justified));
    }

    #[test]
    fn test_run_character_style_chain() {
        let emphasis = style_el("Emphasis", "character").with_child(
            Element::new("rPr").with_child(Element::new("i")),
        );
        let resolver = StyleResolver::load(&source_with_styles(vec![emphasis]));

        let ctx = resolver.create_paragraph_context(&Element::new("p"));
        let run = Element::new("r").with_child(
            Element::new("rPr").with_child(Element::new("rStyle").with_attr("val", "Emphasis")),
        );
        let formatting = resolver.resolve_run_formatting(&ctx, &run);
        assert!(formatting.italic);
    }

    #[test]
    fn test_linked_character_style_used_without_run_style() {
        let heading = style_el("Heading1", "paragraph")
            .with_child(Element::new("link").with_attr("val", "Heading1Char"));
        let heading_char = style_el("Heading1Char", "character").with_child(
            Element::new("rPr").with_child(Element::new("b")),
        );
        let resolver = StyleResolver::load(&source_with_styles(vec![heading, heading_char]));

        let ctx = resolver.create_paragraph_context(&paragraph_with_style("Heading1"));
        let formatting = resolver.resolve_run_formatting(&ctx, &Element::new("r"));
        assert!(formatting.bold);
    }

    #[test]
    fn test_direct_run_formatting_wins_over_character_style() {
        let strong = style_el("Strong", "character")
            .with_child(Element::new("rPr").with_child(Element::new("b")));
        let resolver = StyleResolver::load(&source_with_styles(vec![strong]));

        let ctx = resolver.create_paragraph_context(&Element::new("p"));
        let run = Element::new("r").with_child(
            Element::new("rPr")
                .with_child(Element::new("rStyle").with_attr("val", "Strong"))
                .with_child(Element::new("b").with_attr("val", "false")),
        );
        let formatting = resolver.resolve_run_formatting(&ctx, &run);
        assert!(!formatting.bold);
    }

    #[test]
    fn test_paragraph_mark_properties_seed_run_baseline() {
        let resolver = StyleResolver::load(&source_with_styles(vec![]));
        let paragraph = Element::new("p").with_child(
            Element::new("pPr")
                .with_child(Element::new("rPr").with_child(Element::new("sz").with_attr("val", "36"))),
        );
        let ctx = resolver.create_paragraph_context(&paragraph);
        let formatting = resolver.resolve_run_formatting(&ctx, &Element::new("r"));
        assert_eq!(formatting.font_size_pt, 18.0);
    }

    #[test]
    fn test_theme_color_resolution_with_tint() {
        // no theme part: office default palette, accent2 = C0504D
        let resolver = StyleResolver::load(&InMemorySource::default());
        let set = RunPropertySet {
            theme_color: Some(ThemeColor::Accent2),
            tint: Some(0x99),
            ..Default::default()
        };
        let color = resolver.resolve_color(&set);
        let base = RgbColor::from_hex("C0504D").unwrap();
        assert_eq!(color, base.tinted(0x99));
    }

    #[test]
    fn test_literal_color_used_when_no_theme_color() {
        let resolver = StyleResolver::load(&InMemorySource::default());
        let set = RunPropertySet {
            color_hex: Some("FF00FF".into()),
            ..Default::default()
        };
        assert_eq!(resolver.resolve_color(&set), RgbColor::from_hex("FF00FF").unwrap());
    }

    #[test]
    fn test_malformed_literal_color_falls_back_to_default_text_color() {
        let resolver = StyleResolver::load(&InMemorySource::default());
        let set = RunPropertySet {
            color_hex: Some("zzz".into()),
            ..Default::default()
        };
        // default text color is the mapped Text1 slot, black in the office palette
        assert_eq!(resolver.resolve_color(&set), RgbColor::BLACK);
    }

    #[test]
    fn test_font_family_literal_beats_theme() {
        let resolver = StyleResolver::load(&InMemorySource::default());
        let set = RunPropertySet {
            ascii_font: Some("Georgia".into()),
            ascii_theme: Some(ThemeFont::MinorAscii),
            ..Default::default()
        };
        assert_eq!(resolver.resolve_font_family(&set), "Georgia");
    }

    #[test]
    fn test_font_family_theme_slot_resolution() {
        let resolver = StyleResolver::load(&InMemorySource::default());
        let set = RunPropertySet {
            ascii_theme: Some(ThemeFont::MajorBidi),
            ..Default::default()
        };
        assert_eq!(resolver.resolve_font_family(&set), "Times New Roman");
    }

    #[test]
    fn test_doc_defaults_feed_default_formatting() {
        let styles = Element::new("styles").with_child(
            Element::new("docDefaults").with_child(
                Element::new("rPrDefault").with_child(
                    Element::new("rPr")
                        .with_child(
                            Element::new("rFonts").with_attr("ascii", "Book Antiqua"),
                        )
                        .with_child(Element::new("sz").with_attr("val", "20")),
                ),
            ),
        );
        let source = InMemorySource {
            styles: Some(styles),
            ..Default::default()
        };
        let resolver = StyleResolver::load(&source);

        assert_eq!(resolver.default_font_family(), "Book Antiqua");
        assert_eq!(resolver.default_font_size_pt(), 10.0);

        let formatting = resolver.default_run_formatting();
        assert_eq!(formatting.font_family, "Book Antiqua");
        assert_eq!(formatting.font_size_pt, 10.0);
    }
}
