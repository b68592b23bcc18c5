//! The streamgraph half of the poster: bands, event markers, repository labels, year axis.

use anyhow::{Result, anyhow};
use kurbo::Point;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use serde::Serialize;

use super::util::{dash_segments, px, text_style, to_pixels};
use crate::config::PosterConfig;
use crate::curve::basis_area;
use crate::labels::LabelPlacer;
use crate::models::{Band, PlacedLabel, Series, parse_month};
use crate::scale::{LinearScale, TimeScale};

/// Everything computed before drawing: bands, scales and the labels that fit.
#[derive(Debug, Clone, Serialize)]
pub struct StreamLayout {
    pub bands: Vec<Band>,
    pub labels: Vec<PlacedLabel>,
    /// Stacked value to horizontal pixel.
    pub value_scale: LinearScale,
    /// Month to vertical pixel.
    pub time_scale: TimeScale,
}

impl StreamLayout {
    pub fn compute(series: &Series, config: &PosterConfig) -> Self {
        let bands = config.stack.build(series);
        log::info!("stacked {} bands over {} months", bands.len(), series.len());

        let lowest = bands.iter().flat_map(|b| b.points.iter().map(|p| p.0));
        let highest = bands.iter().flat_map(|b| b.points.iter().map(|p| p.1));
        let (lo, _) = LinearScale::extent(lowest);
        let (_, hi) = LinearScale::extent(highest);
        let value_scale = LinearScale::new((lo, hi), config.stream_x_range());
        let time_scale = TimeScale::from_extent(series.months(), config.stream_y_range());

        let labels = LabelPlacer::new(config.labels).place_bands(
            &bands,
            series.months(),
            &value_scale,
            &time_scale,
        );

        Self {
            bands,
            labels,
            value_scale,
            time_scale,
        }
    }

    /// Band outline as a flattened polygon in canvas pixels.
    pub fn band_polygon(&self, band: &Band, series: &Series) -> Vec<(f64, f64)> {
        let edge = |pick: fn(&(f64, f64)) -> f64| -> Vec<Point> {
            band.points
                .iter()
                .zip(series.months())
                .map(|(p, m)| {
                    Point::new(self.value_scale.apply(pick(p)), self.time_scale.apply(*m))
                })
                .collect()
        };
        basis_area(&edge(|p| p.1), &edge(|p| p.0))
    }
}

/// Right-aligned, with the baseline 1.3 lines below the event line.
fn event_label_style(config: &PosterConfig) -> TextStyle<'_> {
    text_style(
        &config.font_family,
        config.typography.event_label_px,
        true,
        &config.accent,
        (HPos::Right, VPos::Bottom),
    )
}

pub fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &Series,
    layout: &StreamLayout,
    config: &PosterConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let (x0, x1) = config.stream_x_range();
    let family = config.font_family.as_str();
    let sizes = &config.typography;

    let mut event_ys = Vec::with_capacity(config.events.len());
    for event in &config.events {
        let month = parse_month(&event.month)?;
        event_ys.push(layout.time_scale.apply(month));
    }

    // Event lines sit underneath the bands.
    let line_style = config.accent.mix(0.4).stroke_width(2);
    for &y in &event_ys {
        for [a, b] in dash_segments((x0, y), (x1, y), 15.0, 15.0) {
            root.draw(&PathElement::new(
                vec![px(a.0, a.1), px(b.0, b.1)],
                line_style,
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    let border = BLACK.mix(0.2).stroke_width(1);
    for band in &layout.bands {
        let outline = to_pixels(&layout.band_polygon(band, series));
        if outline.len() < 3 {
            continue;
        }
        let fill = config.colors.resolve(&band.key).filled();
        root.draw(&Polygon::new(outline.clone(), fill))
            .map_err(|e| anyhow!("{:?}", e))?;
        let mut ring = outline;
        ring.push(ring[0]);
        root.draw(&PathElement::new(ring, border))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let label_style = text_style(
        family,
        sizes.repo_label_px,
        true,
        &config.text,
        (HPos::Center, VPos::Center),
    );
    for label in &layout.labels {
        root.draw(&Text::new(
            label.key.clone(),
            px(label.x, label.y),
            label_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    // Event labels hang just below their line, right-aligned.
    let event_style = event_label_style(config);
    for (event, y) in config.events.iter().zip(&event_ys) {
        root.draw(&Text::new(
            event.label.clone(),
            px(x1, y + sizes.event_label_px * 1.3),
            event_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let axis_style = text_style(
        family,
        sizes.axis_px,
        true,
        &config.accent,
        (HPos::Right, VPos::Center),
    );
    let axis_x = config.margin.left - 20.0 - 30.0;
    for tick in layout.time_scale.year_ticks() {
        root.draw(&Text::new(
            tick.format("%Y").to_string(),
            px(axis_x, layout.time_scale.apply(tick)),
            axis_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    Ok(())
}
