//! Stable repository colours: an explicit table first, then a hash-picked fallback palette.
//!
//! The fallback is a pure function of the key, so an unknown repository keeps its
//! colour across runs and across machines.

use ahash::AHashMap;
use plotters::style::RGBColor;

/// Hand-picked colours for the main repositories.
pub const REPO_COLORS: [(&str, &str); 9] = [
    ("production", "#E63946"),
    ("production-frontend", "#e87233"),
    ("shared", "#A8DADC"),
    ("infrastructure", "#457B9D"),
    ("profile-api", "#1D3557"),
    ("profile-db", "#FFB703"),
    ("python-lib", "#1c9b8c"),
    ("segment-api", "#B56576"),
    ("advertiser-connect", "#264653"),
];

/// Palette for repositories missing from [`REPO_COLORS`].
pub const FALLBACK_COLORS: [&str; 10] = [
    "#6D597A", // deep purple
    "#F4A261", // sandy orange
    "#8AB17D", // sage green
    "#E76F51", // burnt sienna
    "#535154", // charcoal
    "#8172B3", // lavender
    "#948B3D", // olive
    "#B5838D", // old rose
    "#937860", // coffee
    "#C44E52", // muted red
];

/// Used only when the fallback palette is empty.
const NEUTRAL: RGBColor = RGBColor(153, 153, 153);

/// Parse `#rgb` or `#rrggbb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<RGBColor> {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(RGBColor(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
            Some(RGBColor(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Rolling string hash `hash = c + ((hash << 5) - hash)` over UTF-16 code units.
///
/// The shift operates on the low 32 bits of the running value while the
/// add/subtract does not wrap, so the result can leave the `i32` range.
pub fn key_hash(key: &str) -> i64 {
    key.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit) + (shifted - hash)
    })
}

/// Maps entity keys to display colours.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    table: AHashMap<String, RGBColor>,
    fallback: Vec<RGBColor>,
}

impl ColorResolver {
    pub fn new<I>(table: I, fallback: Vec<RGBColor>) -> Self
    where
        I: IntoIterator<Item = (String, RGBColor)>,
    {
        Self {
            table: table.into_iter().collect(),
            fallback,
        }
    }

    /// Build from hex strings; entries that fail to parse are skipped with a warning.
    pub fn from_hex(table: &[(&str, &str)], fallback: &[&str]) -> Self {
        let parse = |hex: &str| {
            let c = parse_hex(hex);
            if c.is_none() {
                log::warn!("ignoring invalid colour '{hex}'");
            }
            c
        };
        let table = table
            .iter()
            .filter_map(|(key, hex)| parse(hex).map(|c| (key.to_string(), c)));
        let fallback = fallback.iter().filter_map(|hex| parse(hex)).collect();
        Self::new(table, fallback)
    }

    /// The explicitly configured colour, if any.
    pub fn explicit(&self, key: &str) -> Option<RGBColor> {
        self.table.get(key).copied()
    }

    /// Palette colour picked by `|key_hash(key)| % palette.len()`.
    pub fn fallback(&self, key: &str) -> RGBColor {
        if self.fallback.is_empty() {
            return NEUTRAL;
        }
        let idx = key_hash(key).unsigned_abs() % self.fallback.len() as u64;
        self.fallback[idx as usize]
    }

    pub fn resolve(&self, key: &str) -> RGBColor {
        self.explicit(key).unwrap_or_else(|| self.fallback(key))
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::from_hex(&REPO_COLORS, &FALLBACK_COLORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex("#E63946"), Some(RGBColor(0xE6, 0x39, 0x46)));
        assert_eq!(parse_hex("fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex("#12"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(key_hash(""), 0);
        assert_eq!(key_hash("a"), 97);
        assert_eq!(key_hash("ab"), 3105);
        assert_eq!(key_hash("utils"), 111_612_081);
        // Exceeds i32: the last step does not wrap.
        assert_eq!(key_hash("aggregation"), 5_136_492_258);
        assert_eq!(key_hash("experience"), -85_567_126);
    }

    #[test]
    fn empty_palette_falls_back_to_neutral() {
        let r = ColorResolver::new(Vec::new(), Vec::new());
        assert_eq!(r.resolve("anything"), NEUTRAL);
    }
}
