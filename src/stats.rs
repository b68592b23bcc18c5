use crate::config::{Team, TriviaItem};
use crate::models::{Series, format_month};
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lifetime statistics derived from the series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesSummary {
    pub total: f64,
    /// Months with at least one commit.
    pub active_months: usize,
    /// Entities with a non-zero total.
    pub active_entities: usize,
    pub busiest_month: Option<(NaiveDate, f64)>,
    pub peak_year: Option<(i32, f64)>,
    /// Longest run of consecutive calendar months with activity.
    pub longest_streak: usize,
    /// Per-year totals, ascending by year.
    pub yearly: Vec<(i32, f64)>,
    /// Per-entity totals in key order.
    pub entity_totals: Vec<(String, f64)>,
}

fn month_number(d: NaiveDate) -> i64 {
    i64::from(d.year()) * 12 + i64::from(d.month0())
}

/// Compute the summary in one pass over rows.
pub fn summarize(series: &Series) -> SeriesSummary {
    let mut yearly: BTreeMap<i32, f64> = BTreeMap::new();
    let mut busiest: Option<(NaiveDate, f64)> = None;
    let mut active_months = 0;
    let (mut streak, mut longest) = (0usize, 0usize);
    let mut prev_active: Option<i64> = None;

    for (row, month) in series.months().iter().enumerate() {
        let total = series.row_total(row);
        *yearly.entry(month.year()).or_default() += total;
        if busiest.is_none_or(|(_, best)| total > best) {
            busiest = Some((*month, total));
        }
        if total > 0.0 {
            active_months += 1;
            let n = month_number(*month);
            streak = if prev_active == Some(n - 1) { streak + 1 } else { 1 };
            longest = longest.max(streak);
            prev_active = Some(n);
        }
    }

    let entity_totals: Vec<(String, f64)> = series
        .keys()
        .iter()
        .enumerate()
        .map(|(e, k)| (k.clone(), series.entity_total(e)))
        .collect();
    let total = entity_totals.iter().map(|(_, v)| v).sum();

    let mut peak_year: Option<(i32, f64)> = None;
    for (&year, &v) in &yearly {
        if peak_year.is_none_or(|(_, best)| v > best) {
            peak_year = Some((year, v));
        }
    }

    SeriesSummary {
        total,
        active_months,
        active_entities: entity_totals.iter().filter(|(_, v)| *v > 0.0).count(),
        busiest_month: busiest.filter(|(_, v)| *v > 0.0),
        peak_year: peak_year.filter(|(_, v)| *v > 0.0),
        longest_streak: longest,
        yearly: yearly.into_iter().collect(),
        entity_totals,
    }
}

/// Summed totals for each team's repositories, in team order.
pub fn team_totals(series: &Series, teams: &[Team]) -> Vec<(String, f64)> {
    teams
        .iter()
        .map(|team| {
            let total = team
                .repos
                .iter()
                .filter_map(|r| series.entity_index(r))
                .map(|e| series.entity_total(e))
                .sum();
            (team.name.clone(), total)
        })
        .collect()
}

/// A value/label pair for the stats grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub label: String,
    pub value: String,
}

/// The four headline tiles of the sidebar.
pub fn stat_tiles(summary: &SeriesSummary, locale: &Locale) -> Vec<StatTile> {
    let count = |v: f64| (v.round() as i64).to_formatted_string(locale);
    let tile = |label: &str, value: String| StatTile {
        label: label.to_string(),
        value,
    };
    vec![
        tile("Total Commits", count(summary.total)),
        tile("Active Months", count(summary.active_months as f64)),
        tile("Repositories", count(summary.active_entities as f64)),
        tile(
            "Busiest Month",
            summary
                .busiest_month
                .map(|(m, _)| format_month(m))
                .unwrap_or_else(|| "-".into()),
        ),
    ]
}

/// Trivia answers that come straight from the data: peak year, longest streak, top repository.
pub fn trivia_items(summary: &SeriesSummary, locale: &Locale) -> Vec<TriviaItem> {
    let item = |question: &str, answer: String| TriviaItem {
        question: question.to_string(),
        answer,
    };
    let count = |v: f64| (v.round() as i64).to_formatted_string(locale);

    let mut items = Vec::new();
    if let Some((year, total)) = summary.peak_year {
        items.push(item(
            "Most Productive Year",
            format!("{year} ({} commits)", count(total)),
        ));
    }
    if summary.longest_streak > 0 {
        let unit = if summary.longest_streak == 1 { "Month" } else { "Months" };
        items.push(item(
            "Longest Streak",
            format!("{} {unit}", count(summary.longest_streak as f64)),
        ));
    }
    let top = summary
        .entity_totals
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .fold(None::<&(String, f64)>, |best, e| match best {
            Some(b) if b.1 >= e.1 => Some(b),
            _ => Some(e),
        });
    if let Some((key, total)) = top {
        items.push(item(
            "Busiest Repository",
            format!("{key} ({} commits)", count(*total)),
        ));
    }
    items
}
