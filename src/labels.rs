//! Label placer: one text label per band, greedy by prominence, no overlaps.
//!
//! 1. Each band's anchor is the centre of its thickest interval (first one on ties).
//! 2. Anchors are ranked by prominence, descending; equal prominence keeps entity order.
//! 3. Anchors thinner than [`LabelConfig::min_prominence`] are dropped.
//! 4. Walking the ranking, an anchor is accepted unless an accepted label sits
//!    inside its exclusion box (`min_dist_x` by `min_dist_y`).
//!
//! Decisions are final: a rejected anchor never blocks anything and is never retried.

use crate::models::{Band, LabelCandidate, PlacedLabel};
use crate::scale::{LinearScale, TimeScale};
use chrono::NaiveDate;
use log::debug;

/// Thresholds for label placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelConfig {
    /// Horizontal half-width of the exclusion box, in pixels.
    pub min_dist_x: f64,
    /// Vertical half-height of the exclusion box, in pixels.
    pub min_dist_y: f64,
    /// Minimum band thickness, in data units.
    pub min_prominence: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            min_dist_x: 100.0,
            min_dist_y: 60.0,
            min_prominence: 0.5,
        }
    }
}

/// True when `a` and `b` are closer than the minimum distance on both axes.
pub fn collides(a: &LabelCandidate, b: &LabelCandidate, config: &LabelConfig) -> bool {
    (a.x - b.x).abs() < config.min_dist_x && (a.y - b.y).abs() < config.min_dist_y
}

/// Index and thickness of the thickest interval; the earliest wins ties.
fn thickest_point(band: &Band) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (t, (lower, upper)) in band.points.iter().enumerate() {
        let thickness = (upper - lower).abs();
        if thickness > best.map_or(0.0, |(_, b)| b) {
            best = Some((t, thickness));
        }
    }
    best
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPlacer {
    config: LabelConfig,
}

impl LabelPlacer {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// One anchor per band with any visible thickness, in band order.
    ///
    /// Stacked values are mapped through `value_scale` (x) and each band's
    /// month through `time_scale` (y).
    pub fn candidates(
        &self,
        bands: &[Band],
        months: &[NaiveDate],
        value_scale: &LinearScale,
        time_scale: &TimeScale,
    ) -> Vec<LabelCandidate> {
        bands
            .iter()
            .enumerate()
            .filter_map(|(order, band)| {
                let Some((t, prominence)) = thickest_point(band) else {
                    debug!("'{}' has no thickness, no label", band.key);
                    return None;
                };
                let month = *months.get(t)?;
                let (lower, upper) = band.points[t];
                Some(LabelCandidate {
                    key: band.key.clone(),
                    x: value_scale.apply((lower + upper) / 2.0),
                    y: time_scale.apply(month),
                    prominence,
                    month,
                    order,
                })
            })
            .collect()
    }

    /// Greedy selection of non-colliding labels, most prominent first.
    pub fn place(&self, candidates: Vec<LabelCandidate>) -> Vec<PlacedLabel> {
        let mut ranked = candidates;
        ranked.sort_by(|a, b| {
            b.prominence
                .total_cmp(&a.prominence)
                .then(a.order.cmp(&b.order))
        });

        let mut placed: Vec<PlacedLabel> = Vec::new();
        for candidate in ranked {
            if candidate.prominence < self.config.min_prominence {
                debug!(
                    "'{}' too thin to label ({:.2})",
                    candidate.key, candidate.prominence
                );
                continue;
            }
            if let Some(blocker) = placed
                .iter()
                .find(|p| collides(p, &candidate, &self.config))
            {
                debug!("'{}' blocked by '{}'", candidate.key, blocker.key);
                continue;
            }
            placed.push(PlacedLabel(candidate));
        }
        placed
    }

    /// [`LabelPlacer::candidates`] followed by [`LabelPlacer::place`].
    pub fn place_bands(
        &self,
        bands: &[Band],
        months: &[NaiveDate],
        value_scale: &LinearScale,
        time_scale: &TimeScale,
    ) -> Vec<PlacedLabel> {
        let candidates = self.candidates(bands, months, value_scale, time_scale);
        let total = candidates.len();
        let placed = self.place(candidates);
        log::info!("placed {} of {} label candidates", placed.len(), total);
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(key: &str, points: &[(f64, f64)]) -> Band {
        Band {
            key: key.into(),
            index: 0,
            points: points.to_vec(),
        }
    }

    #[test]
    fn first_of_equal_maxima_wins() {
        let b = band("a", &[(0.0, 1.0), (0.0, 3.0), (1.0, 4.0), (0.0, 2.0)]);
        assert_eq!(thickest_point(&b), Some((1, 3.0)));
    }

    #[test]
    fn flat_band_has_no_thickest_point() {
        let b = band("z", &[(2.0, 2.0), (-1.0, -1.0)]);
        assert_eq!(thickest_point(&b), None);
    }

    #[test]
    fn collision_needs_both_axes() {
        let cfg = LabelConfig::default();
        let at = |x: f64, y: f64| LabelCandidate {
            key: "k".into(),
            x,
            y,
            prominence: 1.0,
            month: NaiveDate::default(),
            order: 0,
        };
        assert!(collides(&at(0.0, 0.0), &at(99.0, 59.0), &cfg));
        assert!(!collides(&at(0.0, 0.0), &at(100.0, 0.0), &cfg));
        assert!(!collides(&at(0.0, 0.0), &at(0.0, 60.0), &cfg));
        assert!(!collides(&at(0.0, 0.0), &at(150.0, 10.0), &cfg));
    }
}
