//! Theme fonts, theme colors, and the color-scheme mapping
//!
//! A document theme contributes two things to formatting resolution: a font
//! scheme (major/minor faces for latin, east-asian, and complex scripts) and
//! a twelve-slot color palette. Run properties reference both indirectly;
//! the color-scheme mapping adds one more level of indirection between the
//! logical slot a run names and the palette slot that actually holds the
//! color. Absent parts degrade to the fixed office defaults.

use crate::{Element, RgbColor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Slot identifiers
// =============================================================================

/// A theme font slot reference, as carried by run font properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeFont {
    MajorAscii,
    MajorHighAnsi,
    MajorEastAsia,
    MajorBidi,
    MinorAscii,
    MinorHighAnsi,
    MinorEastAsia,
    MinorBidi,
}

impl ThemeFont {
    /// Parse the document's attribute form (`"majorHAnsi"`, `"minorBidi"`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "majorAscii" => Some(Self::MajorAscii),
            "majorHAnsi" => Some(Self::MajorHighAnsi),
            "majorEastAsia" => Some(Self::MajorEastAsia),
            "majorBidi" => Some(Self::MajorBidi),
            "minorAscii" => Some(Self::MinorAscii),
            "minorHAnsi" => Some(Self::MinorHighAnsi),
            "minorEastAsia" => Some(Self::MinorEastAsia),
            "minorBidi" => Some(Self::MinorBidi),
            _ => None,
        }
    }
}

/// A theme color slot reference.
///
/// The first twelve variants are palette slots; `Background1`/`Text1`/
/// `Background2`/`Text2` are the logical slots that resolve through the
/// color-scheme mapping before reaching the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeColor {
    Dark1,
    Light1,
    Dark2,
    Light2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
    Background1,
    Text1,
    Background2,
    Text2,
}

impl ThemeColor {
    /// Parse the document's attribute form (`"accent1"`, `"text1"`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark1" => Some(Self::Dark1),
            "light1" => Some(Self::Light1),
            "dark2" => Some(Self::Dark2),
            "light2" => Some(Self::Light2),
            "accent1" => Some(Self::Accent1),
            "accent2" => Some(Self::Accent2),
            "accent3" => Some(Self::Accent3),
            "accent4" => Some(Self::Accent4),
            "accent5" => Some(Self::Accent5),
            "accent6" => Some(Self::Accent6),
            "hyperlink" => Some(Self::Hyperlink),
            "followedHyperlink" => Some(Self::FollowedHyperlink),
            "background1" => Some(Self::Background1),
            "text1" => Some(Self::Text1),
            "background2" => Some(Self::Background2),
            "text2" => Some(Self::Text2),
            _ => None,
        }
    }
}

// =============================================================================
// Font scheme
// =============================================================================

/// The six font slots of a theme's font scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeFontScheme {
    pub major_latin: String,
    pub major_east_asia: String,
    pub major_complex: String,
    pub minor_latin: String,
    pub minor_east_asia: String,
    pub minor_complex: String,
}

impl Default for ThemeFontScheme {
    fn default() -> Self {
        Self {
            major_latin: "Aptos".to_string(),
            major_east_asia: "Aptos".to_string(),
            major_complex: "Times New Roman".to_string(),
            minor_latin: "Aptos".to_string(),
            minor_east_asia: "Aptos".to_string(),
            minor_complex: "Times New Roman".to_string(),
        }
    }
}

impl ThemeFontScheme {
    /// Load the scheme from a theme part, falling back to office defaults
    /// for the whole scheme or any missing slot.
    pub fn load(theme_part: Option<&Element>) -> Self {
        let mut scheme = Self::default();

        let Some(theme) = theme_part else {
            return scheme;
        };
        let Some(font_scheme) = find_descendant(theme, "fontScheme") else {
            return scheme;
        };

        if let Some(major) = font_scheme.find("majorFont") {
            read_slot(major, "latin", &mut scheme.major_latin);
            read_slot(major, "ea", &mut scheme.major_east_asia);
            read_slot(major, "cs", &mut scheme.major_complex);
        }
        if let Some(minor) = font_scheme.find("minorFont") {
            read_slot(minor, "latin", &mut scheme.minor_latin);
            read_slot(minor, "ea", &mut scheme.minor_east_asia);
            read_slot(minor, "cs", &mut scheme.minor_complex);
        }

        scheme
    }

    /// Resolve a theme font slot to a concrete family name. East-asian and
    /// complex-script slots fall back to the latin slot of the same class.
    pub fn resolve(&self, slot: ThemeFont) -> &str {
        match slot {
            ThemeFont::MajorAscii | ThemeFont::MajorHighAnsi => &self.major_latin,
            ThemeFont::MajorEastAsia => non_empty_or(&self.major_east_asia, &self.major_latin),
            ThemeFont::MajorBidi => non_empty_or(&self.major_complex, &self.major_latin),
            ThemeFont::MinorAscii | ThemeFont::MinorHighAnsi => &self.minor_latin,
            ThemeFont::MinorEastAsia => non_empty_or(&self.minor_east_asia, &self.minor_latin),
            ThemeFont::MinorBidi => non_empty_or(&self.minor_complex, &self.minor_latin),
        }
    }
}

fn read_slot(parent: &Element, name: &str, target: &mut String) {
    if let Some(typeface) = parent.find(name).and_then(|el| el.attr("typeface")) {
        if !typeface.is_empty() {
            *target = typeface.to_string();
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn find_descendant<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
    el.descendants().find(|d| d.name == name)
}

// =============================================================================
// Color palette
// =============================================================================

/// The twelve color slots of a theme's color scheme
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeColorPalette {
    colors: HashMap<ThemeColor, RgbColor>,
}

impl ThemeColorPalette {
    pub fn set(&mut self, key: ThemeColor, color: RgbColor) {
        self.colors.insert(key, color);
    }

    pub fn get(&self, key: ThemeColor) -> Option<RgbColor> {
        self.colors.get(&key).copied()
    }

    /// The fixed office palette used when the theme part is absent.
    pub fn office_defaults() -> Self {
        let mut palette = Self::default();
        palette.set(ThemeColor::Dark1, RgbColor::BLACK);
        palette.set(ThemeColor::Light1, RgbColor::WHITE);
        palette.set(ThemeColor::Dark2, RgbColor::from_hex("1F497D").unwrap());
        palette.set(ThemeColor::Light2, RgbColor::from_hex("EEECE1").unwrap());
        palette.set(ThemeColor::Accent1, RgbColor::from_hex("4F81BD").unwrap());
        palette.set(ThemeColor::Accent2, RgbColor::from_hex("C0504D").unwrap());
        palette.set(ThemeColor::Accent3, RgbColor::from_hex("9BBB59").unwrap());
        palette.set(ThemeColor::Accent4, RgbColor::from_hex("8064A2").unwrap());
        palette.set(ThemeColor::Accent5, RgbColor::from_hex("4BACC6").unwrap());
        palette.set(ThemeColor::Accent6, RgbColor::from_hex("F79646").unwrap());
        palette.set(ThemeColor::Hyperlink, RgbColor::from_hex("0000FF").unwrap());
        palette.set(
            ThemeColor::FollowedHyperlink,
            RgbColor::from_hex("800080").unwrap(),
        );
        palette
    }

    /// Load the palette from a theme part. An absent part or absent color
    /// scheme yields the office defaults; individual malformed entries are
    /// skipped.
    pub fn load(theme_part: Option<&Element>) -> Self {
        let Some(theme) = theme_part else {
            return Self::office_defaults();
        };
        let Some(clr_scheme) = find_descendant(theme, "clrScheme") else {
            return Self::office_defaults();
        };

        let mut palette = Self::default();
        let slots = [
            ("dk1", ThemeColor::Dark1),
            ("lt1", ThemeColor::Light1),
            ("dk2", ThemeColor::Dark2),
            ("lt2", ThemeColor::Light2),
            ("accent1", ThemeColor::Accent1),
            ("accent2", ThemeColor::Accent2),
            ("accent3", ThemeColor::Accent3),
            ("accent4", ThemeColor::Accent4),
            ("accent5", ThemeColor::Accent5),
            ("accent6", ThemeColor::Accent6),
            ("hlink", ThemeColor::Hyperlink),
            ("folHlink", ThemeColor::FollowedHyperlink),
        ];

        for (name, key) in slots {
            let Some(slot) = clr_scheme.find(name) else {
                continue;
            };
            let hex = slot
                .find("srgbClr")
                .and_then(|el| el.attr("val"))
                .or_else(|| slot.find("sysClr").and_then(|el| el.attr("lastClr")));
            if let Some(color) = hex.and_then(RgbColor::from_hex) {
                palette.set(key, color);
            }
        }

        palette
    }
}

// =============================================================================
// Color scheme mapping
// =============================================================================

/// Indirection from the logical color slots runs reference to the palette
/// slots that hold the actual colors. Defaults to the standard mapping
/// (backgrounds to lights, texts to darks, accents to themselves).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSchemeMapper {
    map: HashMap<ThemeColor, ThemeColor>,
}

impl Default for ColorSchemeMapper {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(ThemeColor::Background1, ThemeColor::Light1);
        map.insert(ThemeColor::Text1, ThemeColor::Dark1);
        map.insert(ThemeColor::Background2, ThemeColor::Light2);
        map.insert(ThemeColor::Text2, ThemeColor::Dark2);
        map.insert(ThemeColor::Accent1, ThemeColor::Accent1);
        map.insert(ThemeColor::Accent2, ThemeColor::Accent2);
        map.insert(ThemeColor::Accent3, ThemeColor::Accent3);
        map.insert(ThemeColor::Accent4, ThemeColor::Accent4);
        map.insert(ThemeColor::Accent5, ThemeColor::Accent5);
        map.insert(ThemeColor::Accent6, ThemeColor::Accent6);
        map.insert(ThemeColor::Hyperlink, ThemeColor::Hyperlink);
        map.insert(ThemeColor::FollowedHyperlink, ThemeColor::FollowedHyperlink);
        Self { map }
    }
}

impl ColorSchemeMapper {
    /// Load overrides from the settings part's `clrSchemeMapping` element.
    pub fn load(settings_part: Option<&Element>) -> Self {
        let mut mapper = Self::default();
        let Some(mapping) = settings_part.and_then(|s| s.find("clrSchemeMapping")) else {
            return mapper;
        };

        let attrs = [
            ("bg1", ThemeColor::Background1),
            ("t1", ThemeColor::Text1),
            ("bg2", ThemeColor::Background2),
            ("t2", ThemeColor::Text2),
            ("accent1", ThemeColor::Accent1),
            ("accent2", ThemeColor::Accent2),
            ("accent3", ThemeColor::Accent3),
            ("accent4", ThemeColor::Accent4),
            ("accent5", ThemeColor::Accent5),
            ("accent6", ThemeColor::Accent6),
            ("hyperlink", ThemeColor::Hyperlink),
            ("followedHyperlink", ThemeColor::FollowedHyperlink),
        ];

        for (attr, key) in attrs {
            if let Some(target) = mapping.attr(attr).and_then(ThemeColor::parse) {
                mapper.map.insert(key, target);
            }
        }

        mapper
    }

    /// Resolve a requested slot to the palette slot holding its color.
    /// Unmapped slots resolve to themselves.
    pub fn resolve(&self, requested: ThemeColor) -> ThemeColor {
        self.map.get(&requested).copied().unwrap_or(requested)
    }
}
