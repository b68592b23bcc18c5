//! Poster rendering: draw the streamgraph (and the stats sidebar) to an **SVG** string.
//!
//! - Bands follow the stacked layout from [`crate::stack`], smoothed with a B-spline
//! - Repository labels come from [`crate::labels`]; crowded bands simply stay unlabeled
//! - Colours resolve through [`crate::color::ColorResolver`]
//! - Text is emitted as SVG `<text>` with the configured font family, so no font files are needed

pub mod sidebar;
pub mod streamgraph;
pub mod text;
pub mod util;

pub use streamgraph::StreamLayout;

use crate::config::PosterConfig;
use crate::models::Series;
use crate::stats::summarize;
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters_svg::SVGBackend;

/// Render the poster and return the raw SVG (see [`crate::storage::finalize_svg`] before saving).
pub fn render_poster(series: &Series, config: &PosterConfig) -> Result<String> {
    render_with_layout(series, config).map(|(svg, _)| svg)
}

/// Like [`render_poster`], also handing back the computed layout for inspection.
pub fn render_with_layout(series: &Series, config: &PosterConfig) -> Result<(String, StreamLayout)> {
    if series.is_empty() || series.keys().is_empty() {
        return Err(anyhow!("no data to plot"));
    }

    let layout = StreamLayout::compute(series, config);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        root.fill(&config.background)
            .map_err(|e| anyhow!("{:?}", e))?;

        streamgraph::draw(&root, series, &layout, config)?;
        if config.variant.has_sidebar() {
            let summary = summarize(series);
            sidebar::draw(&root, series, &summary, config)?;
        }

        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok((svg, layout))
}
