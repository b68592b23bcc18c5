//! Stack builder: turns a [`Series`] into one [`Band`] per entity.
//!
//! At every time point the bands tile one contiguous interval, each band's
//! thickness equals the entity's raw value, and the interval's baseline is
//! chosen by the [`StackOffset`] policy.

use crate::models::{Band, Series};

/// Which entity sits where in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// Stack in entity key order, first key at the bottom.
    Input,
    /// Heaviest entities (by total) at the centre, lighter ones toward the edges.
    #[default]
    InsideOut,
}

/// Where the bottom-most layer starts at each time point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Baseline pinned at zero.
    Zero,
    /// Baseline shifted to minimise the weighted slope of all layers (streamgraph).
    #[default]
    Wiggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackBuilder {
    pub order: StackOrder,
    pub offset: StackOffset,
}

impl StackBuilder {
    pub fn new(order: StackOrder, offset: StackOffset) -> Self {
        Self { order, offset }
    }

    /// Inside-out order with the wiggle offset.
    pub fn streamgraph() -> Self {
        Self::new(StackOrder::InsideOut, StackOffset::Wiggle)
    }

    /// Stack order as entity indices, bottom first.
    pub fn stack_order(&self, series: &Series) -> Vec<usize> {
        let n = series.keys().len();
        match self.order {
            StackOrder::Input => (0..n).collect(),
            StackOrder::InsideOut => {
                let totals: Vec<f64> = (0..n).map(|e| series.entity_total(e)).collect();
                inside_out(&totals)
            }
        }
    }

    /// Build one band per entity, returned in entity key order.
    pub fn build(&self, series: &Series) -> Vec<Band> {
        let keys = series.keys();
        let columns: Vec<Vec<f64>> = (0..keys.len()).map(|e| series.column(e)).collect();
        let order = self.stack_order(series);
        let baseline = match self.offset {
            StackOffset::Zero => vec![0.0; series.len()],
            StackOffset::Wiggle => wiggle_baseline(&columns, &order),
        };

        let mut points: Vec<Vec<(f64, f64)>> = vec![Vec::with_capacity(series.len()); keys.len()];
        for (t, base) in baseline.iter().enumerate() {
            let mut y = *base;
            for &e in &order {
                let upper = y + columns[e][t];
                points[e].push((y, upper));
                y = upper;
            }
        }

        let mut index = vec![0; keys.len()];
        for (pos, &e) in order.iter().enumerate() {
            index[e] = pos;
        }

        let bands: Vec<Band> = keys
            .iter()
            .zip(points)
            .enumerate()
            .map(|(e, (key, points))| Band {
                key: key.clone(),
                index: index[e],
                points,
            })
            .collect();
        log::debug!(
            "stack order: {:?}",
            order.iter().map(|&e| keys[e].as_str()).collect::<Vec<_>>()
        );
        bands
    }
}

/// Rank by total (descending, stable), then grow whichever side is lighter.
/// The first-ranked entity ends up adjacent to the centre line.
fn inside_out(totals: &[f64]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..totals.len()).collect();
    ranked.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

    let (mut top, mut bottom) = (0.0, 0.0);
    let (mut tops, mut bottoms) = (Vec::new(), Vec::new());
    for e in ranked {
        if top < bottom {
            top += totals[e];
            tops.push(e);
        } else {
            bottom += totals[e];
            bottoms.push(e);
        }
    }
    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

/// Baseline of the bottom layer at each time point.
///
/// Starts at 0; each step moves by minus the value-weighted mean slope of the
/// layer midlines, where a layer's slope is half its own change plus the full
/// change of everything beneath it.
fn wiggle_baseline(columns: &[Vec<f64>], order: &[usize]) -> Vec<f64> {
    let m = columns.first().map_or(0, Vec::len);
    let mut baseline = vec![0.0; m];
    if order.is_empty() {
        return baseline;
    }
    let mut y = 0.0;
    for j in 1..m {
        let (mut total, mut weighted, mut below) = (0.0, 0.0, 0.0);
        for &e in order {
            let cur = columns[e][j];
            let delta = cur - columns[e][j - 1];
            total += cur;
            weighted += (delta / 2.0 + below) * cur;
            below += delta;
        }
        if total != 0.0 {
            y -= weighted / total;
        }
        baseline[j] = y;
    }
    baseline
}
