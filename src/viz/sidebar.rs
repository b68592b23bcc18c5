//! Sidebar of the infographic: stats grid, trivia, key repo trends, team bubbles, yearly bars.
//!
//! Sections are stacked top to bottom from a running `y` cursor, relative to
//! `(config.sidebar_x, config.margin.top)`.

use anyhow::{Result, anyhow};
use kurbo::Point;
use num_format::ToFormattedString;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};

use super::text::{truncate_to_width, wrap_text_to_width};
use super::util::{map_locale, px, text_style, to_pixels};
use crate::config::PosterConfig;
use crate::curve::monotone_area;
use crate::models::Series;
use crate::scale::{LinearScale, TimeScale};
use crate::stats::{SeriesSummary, stat_tiles, team_totals, trivia_items};

const COLUMN_X: f64 = 80.0;
const PLOT_WIDTH: f64 = 800.0;
const MINI_PLOT_HEIGHT: f64 = 220.0;
const BUBBLE_MAX_RADIUS: f64 = 110.0;
const BUBBLE_GAP: f64 = 30.0;
const BAR_AREA_HEIGHT: f64 = 420.0;

/// Sidebar origin plus a vertical cursor.
struct Cursor<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    config: &'a PosterConfig,
    origin: (f64, f64),
}

impl<DB: DrawingBackend> Cursor<'_, DB> {
    fn at(&self, x: f64, y: f64) -> (i32, i32) {
        px(self.origin.0 + x, self.origin.1 + y)
    }

    fn text(&self, s: &str, x: f64, y: f64, size: f64, bold: bool, color: &RGBColor) -> Result<()> {
        self.text_anchored(s, x, y, size, bold, color, (HPos::Left, VPos::Bottom))
    }

    #[allow(clippy::too_many_arguments)]
    fn text_anchored(
        &self,
        s: &str,
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        color: &RGBColor,
        anchor: (HPos, VPos),
    ) -> Result<()> {
        let style = text_style(&self.config.font_family, size, bold, color, anchor);
        self.root
            .draw(&Text::new(s.to_string(), self.at(x, y), style))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn header(&self, title: &str, y: f64) -> Result<()> {
        let c = self.config;
        self.text(title, COLUMN_X, y, c.typography.header_px, true, &c.accent)
    }
}

pub fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &Series,
    summary: &SeriesSummary,
    config: &PosterConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let cur = Cursor {
        root,
        config,
        origin: (config.sidebar_x, config.margin.top),
    };

    let bottom = f64::from(config.height) - config.margin.top - config.margin.bottom;
    root.draw(&PathElement::new(
        vec![cur.at(0.0, 0.0), cur.at(0.0, bottom)],
        RGBColor(0x33, 0x33, 0x33).stroke_width(2),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let mut y = 50.0;
    y = draw_stats(&cur, summary, y)?;
    y = draw_trivia(&cur, summary, y)?;
    y = draw_key_repos(&cur, series, y)?;
    y = draw_teams(&cur, series, y)?;
    draw_yearly_bars(&cur, summary, y)?;
    Ok(())
}

fn draw_stats<DB: DrawingBackend>(cur: &Cursor<DB>, summary: &SeriesSummary, y: f64) -> Result<f64> {
    let c = cur.config;
    cur.header("LIFETIME STATS", y)?;
    let top = y + 100.0;
    let tiles = stat_tiles(summary, map_locale(&c.locale));
    for (i, tile) in tiles.iter().enumerate() {
        let x = COLUMN_X + (i % 2) as f64 * 450.0;
        let ty = top + (i / 2) as f64 * 180.0;
        let value = truncate_to_width(&tile.value, 72.0, 430.0);
        cur.text(&value, x, ty, 72.0, true, &c.text)?;
        cur.text(&tile.label.to_uppercase(), x, ty + 45.0, 24.0, false, &c.sub_text)?;
    }
    Ok(top + 450.0)
}

fn draw_trivia<DB: DrawingBackend>(cur: &Cursor<DB>, summary: &SeriesSummary, y: f64) -> Result<f64> {
    let c = cur.config;
    cur.header("TRIVIA", y)?;
    let top = y + 100.0;
    let mut items = trivia_items(summary, map_locale(&c.locale));
    items.extend(c.trivia.iter().cloned());
    for (i, item) in items.iter().enumerate() {
        let iy = top + i as f64 * 140.0;
        cur.text(&item.question, COLUMN_X, iy, 28.0, false, &c.sub_text)?;
        // at most two answer lines fit before the next question
        for (line_no, line) in wrap_text_to_width(&item.answer, 42.0, PLOT_WIDTH)
            .iter()
            .take(2)
            .enumerate()
        {
            let ly = iy + 40.0 + line_no as f64 * 46.0;
            cur.text(line, COLUMN_X, ly, 42.0, true, &c.text)?;
        }
    }
    Ok(top + items.len() as f64 * 140.0 + 30.0)
}

fn draw_key_repos<DB: DrawingBackend>(cur: &Cursor<DB>, series: &Series, y: f64) -> Result<f64> {
    let c = cur.config;
    cur.header("KEY REPO GROWTH", y)?;
    let top = y + 120.0;
    let stride = MINI_PLOT_HEIGHT + 100.0;

    for (i, key) in c.featured_repos.iter().enumerate() {
        let py = top + i as f64 * stride;
        let color = c.colors.resolve(key);
        cur.text(key, COLUMN_X, py - 20.0, 36.0, true, &color)?;

        cur.root
            .draw(&Rectangle::new(
                [cur.at(COLUMN_X, py), cur.at(COLUMN_X + PLOT_WIDTH, py + MINI_PLOT_HEIGHT)],
                c.panel.filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;

        let values = series.column_by_key(key);
        let (_, max) = LinearScale::extent(values.iter().copied());
        let x_scale = TimeScale::from_extent(
            series.months(),
            (cur.origin.0 + COLUMN_X, cur.origin.0 + COLUMN_X + PLOT_WIDTH),
        );
        let baseline = cur.origin.1 + py + MINI_PLOT_HEIGHT;
        let y_scale = LinearScale::new((0.0, max), (baseline, cur.origin.1 + py + 15.0));
        let pts: Vec<Point> = series
            .months()
            .iter()
            .zip(&values)
            .map(|(m, v)| Point::new(x_scale.apply(*m), y_scale.apply(*v)))
            .collect();
        let area = to_pixels(&monotone_area(&pts, baseline));
        if max > 0.0 && area.len() >= 3 {
            cur.root
                .draw(&Polygon::new(area, color.mix(0.6).filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
            let line: Vec<(f64, f64)> = pts.iter().map(|p| (p.x, p.y)).collect();
            cur.root
                .draw(&PathElement::new(to_pixels(&line), color.stroke_width(3)))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(top + c.featured_repos.len() as f64 * stride + 60.0)
}

/// Radii proportional to `sqrt(value)`, shrunk together if the row would overflow `width`.
pub fn bubble_radii(values: &[f64], max_radius: f64, gap: f64, width: f64) -> Vec<f64> {
    let (_, max) = LinearScale::extent(values.iter().copied());
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    let mut radii: Vec<f64> = values
        .iter()
        .map(|v| (v.max(0.0) / max).sqrt() * max_radius)
        .collect();
    let span: f64 = radii.iter().map(|r| 2.0 * r).sum::<f64>()
        + gap * values.len().saturating_sub(1) as f64;
    if span > width {
        let shrink = (width - gap * values.len().saturating_sub(1) as f64).max(0.0)
            / radii.iter().map(|r| 2.0 * r).sum::<f64>();
        radii.iter_mut().for_each(|r| *r *= shrink);
    }
    radii
}

fn draw_teams<DB: DrawingBackend>(cur: &Cursor<DB>, series: &Series, y: f64) -> Result<f64> {
    let c = cur.config;
    if c.teams.is_empty() {
        return Ok(y);
    }
    cur.header("TEAM DISTRIBUTION", y)?;
    let totals = team_totals(series, &c.teams);
    let values: Vec<f64> = totals.iter().map(|(_, v)| *v).collect();
    let radii = bubble_radii(&values, BUBBLE_MAX_RADIUS, BUBBLE_GAP, PLOT_WIDTH);
    let center_y = y + 60.0 + BUBBLE_MAX_RADIUS;
    let locale = map_locale(&c.locale);

    let mut x = COLUMN_X;
    for ((name, total), r) in totals.iter().zip(&radii) {
        let cx = x + r;
        let color = c.colors.resolve(name);
        if *r > 0.0 {
            cur.root
                .draw(&Circle::new(
                    cur.at(cx, center_y),
                    r.round() as i32,
                    color.mix(0.8).filled(),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        if *r > 30.0 {
            let count = (total.round() as i64).to_formatted_string(locale);
            cur.text_anchored(&count, cx, center_y, 28.0, true, &c.text, (HPos::Center, VPos::Center))?;
        }
        let label = truncate_to_width(name, 24.0, (2.0 * r).max(120.0));
        cur.text_anchored(
            &label,
            cx,
            center_y + BUBBLE_MAX_RADIUS + 40.0,
            24.0,
            false,
            &c.sub_text,
            (HPos::Center, VPos::Center),
        )?;
        x += 2.0 * r + BUBBLE_GAP;
    }
    Ok(center_y + BUBBLE_MAX_RADIUS + 120.0)
}

fn draw_yearly_bars<DB: DrawingBackend>(cur: &Cursor<DB>, summary: &SeriesSummary, y: f64) -> Result<()> {
    let c = cur.config;
    if summary.yearly.is_empty() {
        return Ok(());
    }
    cur.header("COMMITS PER YEAR", y)?;
    let base = y + 60.0 + BAR_AREA_HEIGHT;
    let slot = PLOT_WIDTH / summary.yearly.len() as f64;
    let (_, max) = LinearScale::extent(summary.yearly.iter().map(|(_, v)| *v));
    let height = LinearScale::new((0.0, max), (0.0, BAR_AREA_HEIGHT - 40.0));

    for (i, (year, total)) in summary.yearly.iter().enumerate() {
        let x = COLUMN_X + i as f64 * slot;
        let h = if max > 0.0 { height.apply(*total) } else { 0.0 };
        cur.root
            .draw(&Rectangle::new(
                [cur.at(x + slot * 0.15, base - h), cur.at(x + slot * 0.85, base)],
                c.accent.mix(0.7).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        let label = format!("'{:02}", year.rem_euclid(100));
        cur.text_anchored(
            &label,
            x + slot / 2.0,
            base + 30.0,
            22.0,
            false,
            &c.sub_text,
            (HPos::Center, VPos::Center),
        )?;
    }
    Ok(())
}
