//! Unit conversion for document and layout measurements
//!
//! The base unit everywhere in this workspace is the typographic point
//! (1 pt = 1/72 inch). The document format supplies lengths in dxa
//! (twentieths of a point), font sizes in half-points, and absolute tab
//! positions in EMU (914400 per inch).

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Dxa (twentieths of a point) per point
pub const DXA_PER_POINT: f32 = 20.0;

/// EMU per point (914400 EMU per inch / 72 points per inch)
pub const EMU_PER_POINT: f32 = 12_700.0;

/// Convert dxa to points. A Word margin of 1440 dxa is 72 pt (one inch).
pub fn dxa_to_points(dxa: i64) -> f32 {
    dxa as f32 / DXA_PER_POINT
}

/// Convert points to dxa
pub fn points_to_dxa(points: f32) -> i64 {
    (points * DXA_PER_POINT) as i64
}

/// Convert half-points (the document's font-size unit) to points
pub fn half_points_to_points(half_points: f32) -> f32 {
    half_points / 2.0
}

/// Convert EMU (absolute-tab positions) to points
pub fn emu_to_points(emu: i64) -> f32 {
    emu as f32 / EMU_PER_POINT
}

/// Convert inches to points
pub fn inches_to_points(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dxa_round_trip() {
        for dxa in (0..=14400).step_by(20) {
            assert_eq!(points_to_dxa(dxa_to_points(dxa)), dxa);
        }
    }

    #[test]
    fn test_word_margin_is_one_inch() {
        assert_eq!(dxa_to_points(1440), 72.0);
    }

    #[test]
    fn test_half_points() {
        assert_eq!(half_points_to_points(22.0), 11.0);
        assert_eq!(half_points_to_points(24.0), 12.0);
    }

    #[test]
    fn test_emu() {
        assert_eq!(emu_to_points(914_400), 72.0);
        assert_eq!(emu_to_points(12_700), 1.0);
    }
}
