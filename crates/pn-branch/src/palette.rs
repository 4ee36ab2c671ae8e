//! Deterministic display colours for branch ids.
//!
//! The same id always maps to the same colour, so a branch keeps its colour
//! across recomputes as long as its id is stable.

use serde::Serialize;

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const GOLDEN_RATIO: f64 = 0.618_033_988_75;

/// Background the colours are meant for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Line colour plus a companion fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub stroke: String,
    pub fill: String,
}

/// 32-bit FNV-1a over UTF-16 code units.
fn hash32(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

fn hsl(hue: f64, saturation: f64, lightness: f64) -> String {
    let h = ((hue % 360.0) + 360.0) % 360.0;
    let s = (saturation.clamp(0.0, 1.0) * 100.0).round();
    let l = (lightness.clamp(0.0, 1.0) * 100.0).round();
    format!("hsl({h}deg, {s}%, {l}%)")
}

fn byte_jitter(hash: u32, shift: u32) -> f64 {
    f64::from((hash >> shift) & 0xff) / 255.0 - 0.5
}

fn base_hue(hash: u32) -> f64 {
    let seed = f64::from(hash) / f64::from(u32::MAX);
    (((seed + GOLDEN_RATIO) % 1.0) * 360.0).floor()
}

/// Stroke colour for `branch_id`; `None` for a blank id.
pub fn color_for_branch_id(branch_id: &str, theme: Theme) -> Option<String> {
    let id = branch_id.trim();
    if id.is_empty() {
        return None;
    }
    let hash = hash32(id);
    let (saturation, base_light) = match theme {
        Theme::Light => (0.70, 0.55),
        Theme::Dark => (0.85, 0.50),
    };
    let lightness = (base_light + byte_jitter(hash, 10) * 0.12).clamp(0.28, 0.74);
    Some(hsl(base_hue(hash), saturation, lightness))
}

/// Stroke plus an accent fill rotated by up to +/-45 degrees.
pub fn color_pair_for_branch_id(branch_id: &str, theme: Theme) -> Option<ColorPair> {
    let stroke = color_for_branch_id(branch_id, theme)?;
    let hash = hash32(branch_id.trim());
    let accent_hue = (base_hue(hash) + byte_jitter(hash, 16) * 90.0 + 360.0) % 360.0;
    let (saturation, lightness) = match theme {
        Theme::Light => (0.58, 0.70),
        Theme::Dark => (0.70, 0.42),
    };
    Some(ColorPair {
        stroke,
        fill: hsl(accent_hue, saturation, lightness),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_reference_values() {
        assert_eq!(hash32(""), FNV_OFFSET);
        assert_eq!(hash32("a"), 0xe40c_292c);
    }

    #[test]
    fn stable_and_theme_dependent() {
        let a = color_for_branch_id("GENERAL-G1", Theme::Dark).unwrap();
        assert_eq!(Some(a.clone()), color_for_branch_id(" GENERAL-G1 ", Theme::Dark));
        assert!(a.starts_with("hsl("));
        assert!(a.contains("85%"));
        let light = color_for_branch_id("GENERAL-G1", Theme::Light).unwrap();
        assert!(light.contains("70%"));
        assert_ne!(
            color_for_branch_id("GENERAL-G1", Theme::Dark),
            color_for_branch_id("GENERAL-G1:001", Theme::Dark)
        );
    }

    #[test]
    fn blank_has_no_colour() {
        assert!(color_for_branch_id("  ", Theme::Dark).is_none());
        assert!(color_pair_for_branch_id("", Theme::Light).is_none());
    }

    #[test]
    fn pair_has_fill() {
        let pair = color_pair_for_branch_id("B:002", Theme::Dark).unwrap();
        assert_eq!(Some(pair.stroke.clone()), color_for_branch_id("B:002", Theme::Dark));
        assert!(pair.fill.ends_with("42%)"));
    }
}
