//! Utility functions for drawing: pixel rounding, text styles, dashes, locale mapping.

use num_format::Locale;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Canvas coordinate in whole pixels.
#[inline]
pub fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Round a polygon to whole pixels, dropping consecutive duplicates.
pub fn to_pixels(points: &[(f64, f64)]) -> Vec<(i32, i32)> {
    let mut out: Vec<(i32, i32)> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let p = px(x, y);
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// `plotters-svg` writes `font-size` as the style size divided by this factor.
const SVG_FONT_SCALE: f64 = 1.24;

/// Build a text style that comes out at `size_px` in the SVG.
///
/// SVG output writes `<text>` with the family name, so no font is loaded.
pub fn text_style<'a>(
    family: &'a str,
    size_px: f64,
    bold: bool,
    color: &RGBColor,
    anchor: (HPos, VPos),
) -> TextStyle<'a> {
    let weight = if bold { FontStyle::Bold } else { FontStyle::Normal };
    FontDesc::new(FontFamily::Name(family), size_px * SVG_FONT_SCALE, weight)
        .color(color)
        .pos(Pos::new(anchor.0, anchor.1))
}

/// Split a straight line into `dash`-long pieces separated by `gap`.
pub fn dash_segments(from: (f64, f64), to: (f64, f64), dash: f64, gap: f64) -> Vec<[(f64, f64); 2]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len == 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let mut out = Vec::new();
    let mut start = 0.0;
    while start < len {
        let end = (start + dash).min(len);
        out.push([
            (from.0 + ux * start, from.1 + uy * start),
            (from.0 + ux * end, from.1 + uy * end),
        ]);
        start = end + gap.max(0.0);
    }
    out
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en, // default
    }
}
