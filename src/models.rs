use crate::error::{PosterError, PosterResult};
use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Parse a `YYYY-MM` month into the first day of that month.
pub fn parse_month(s: &str) -> PosterResult<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").map_err(|_| {
        PosterError::BadMonth {
            value: s.to_string(),
        }
    })
}

/// Format a month back into its `YYYY-MM` form.
pub fn format_month(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}

/// One month of the input: `{"date": "2019-03", "repo-a": 12, "repo-b": 0, ...}`.
///
/// Entity values keep the order in which they appear in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub month: NaiveDate,
    pub values: Vec<(String, f64)>,
}

impl TimeSeriesPoint {
    pub fn new(month: NaiveDate, values: Vec<(String, f64)>) -> Self {
        Self { month, values }
    }
}

impl<'de> Deserialize<'de> for TimeSeriesPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PointVisitor;

        impl<'de> Visitor<'de> for PointVisitor {
            type Value = TimeSeriesPoint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an object with a `date` field and numeric entity counts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut month = None;
                let mut values = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "date" {
                        let raw: String = map.next_value()?;
                        month = Some(parse_month(&raw).map_err(de::Error::custom)?);
                        continue;
                    }
                    // Nulls count as zero; strings, arrays and objects are not entities.
                    match map.next_value::<Option<serde_json::Value>>()? {
                        None => values.push((key, 0.0)),
                        Some(v) => {
                            if let Some(n) = v.as_f64() {
                                values.push((key, n));
                            }
                        }
                    }
                }
                let month = month.ok_or_else(|| de::Error::missing_field("date"))?;
                Ok(TimeSeriesPoint { month, values })
            }
        }

        deserializer.deserialize_map(PointVisitor)
    }
}

impl Serialize for TimeSeriesPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("date", &format_month(self.month))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Chronological table of per-entity monthly values.
///
/// Every row holds one value per entity key; entities missing from a record are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    keys: Vec<String>,
    months: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl Series {
    /// Build the table from parsed records. Keys are collected in first-seen order,
    /// so the first record decides the order of everything it mentions.
    pub fn from_points(points: Vec<TimeSeriesPoint>) -> Self {
        let mut keys: Vec<String> = Vec::new();
        for p in &points {
            for (key, _) in &p.values {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }

        let mut months = Vec::with_capacity(points.len());
        let mut rows = Vec::with_capacity(points.len());
        for p in points {
            let mut row = vec![0.0; keys.len()];
            for (key, value) in p.values {
                if let Some(idx) = keys.iter().position(|k| *k == key) {
                    row[idx] = value;
                }
            }
            months.push(p.month);
            rows.push(row);
        }

        Self { keys, months, rows }
    }

    /// Convenience constructor from `YYYY-MM` labels and named columns.
    pub fn from_columns(months: &[&str], columns: &[(&str, &[f64])]) -> PosterResult<Self> {
        let mut points = Vec::with_capacity(months.len());
        for (row, raw) in months.iter().enumerate() {
            let values = columns
                .iter()
                .map(|(key, col)| (key.to_string(), col.get(row).copied().unwrap_or(0.0)))
                .collect();
            points.push(TimeSeriesPoint::new(parse_month(raw)?, values));
        }
        Ok(Self::from_points(points))
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn entity_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Value of `entity` at time point `row`.
    ///
    /// # Panics
    /// If `row >= self.len()` or `entity >= self.keys().len()`.
    pub fn value(&self, row: usize, entity: usize) -> f64 {
        self.rows[row][entity]
    }

    /// All values of one entity, in chronological order.
    pub fn column(&self, entity: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[entity]).collect()
    }

    /// Same as [`Series::column`], by key. Unknown keys read as all zeros.
    pub fn column_by_key(&self, key: &str) -> Vec<f64> {
        match self.entity_index(key) {
            Some(idx) => self.column(idx),
            None => vec![0.0; self.len()],
        }
    }

    /// Sum of all entities at one time point.
    pub fn row_total(&self, row: usize) -> f64 {
        self.rows[row].iter().sum()
    }

    /// Sum of one entity over the whole series.
    pub fn entity_total(&self, entity: usize) -> f64 {
        self.rows.iter().map(|r| r[entity]).sum()
    }

    /// Boundary check for untrusted input: non-empty, strictly chronological,
    /// finite and non-negative values.
    pub fn validate(&self) -> PosterResult<()> {
        if self.is_empty() {
            return Err(PosterError::EmptySeries);
        }
        for pair in self.months.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PosterError::OutOfOrder {
                    month: format_month(pair[1]),
                });
            }
        }
        for (row, values) in self.rows.iter().enumerate() {
            for (entity, value) in values.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(PosterError::BadValue {
                        entity: self.keys[entity].clone(),
                        month: format_month(self.months[row]),
                        value: *value,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One entity's stacked intervals: `points[t] = (lower, upper)` for every time point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub key: String,
    /// Position in the stack, 0 = bottom-most layer.
    pub index: usize,
    pub points: Vec<(f64, f64)>,
}

impl Band {
    /// `upper - lower` at time point `t`.
    ///
    /// # Panics
    /// If `t` is not below `self.points.len()`.
    pub fn thickness(&self, t: usize) -> f64 {
        let (lower, upper) = self.points[t];
        upper - lower
    }

    pub fn max_thickness(&self) -> f64 {
        (0..self.points.len())
            .map(|t| self.thickness(t))
            .fold(0.0, f64::max)
    }

    /// True when the band has no visible area anywhere.
    pub fn is_degenerate(&self) -> bool {
        self.max_thickness() <= 0.0
    }
}

/// Label anchor computed from a band's thickest point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCandidate {
    pub key: String,
    /// Screen position in pixels.
    pub x: f64,
    pub y: f64,
    /// Maximum band thickness in data units.
    pub prominence: f64,
    pub month: NaiveDate,
    /// Input (entity key) order, used for tie-breaking.
    pub order: usize,
}

/// A candidate that survived collision filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlacedLabel(pub LabelCandidate);

impl Deref for PlacedLabel {
    type Target = LabelCandidate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_records_in_document_order() {
        let json = r#"[
            {"date": "2016-01", "zeta": 3, "alpha": 1},
            {"date": "2016-02", "alpha": 2, "beta": null, "note": "skip me"}
        ]"#;
        let points: Vec<TimeSeriesPoint> = serde_json::from_str(json).unwrap();
        let series = Series::from_points(points);
        assert_eq!(series.keys(), ["zeta", "alpha", "beta"]);
        assert_eq!(series.column_by_key("zeta"), vec![3.0, 0.0]);
        assert_eq!(series.column_by_key("alpha"), vec![1.0, 2.0]);
        assert_eq!(series.column_by_key("beta"), vec![0.0, 0.0]);
        assert_eq!(format_month(series.months()[1]), "2016-02");
    }

    #[test]
    fn bad_month_is_rejected() {
        let json = r#"[{"date": "January", "a": 1}]"#;
        let err = serde_json::from_str::<Vec<TimeSeriesPoint>>(json).unwrap_err();
        assert!(err.to_string().contains("invalid month"));
        assert!(matches!(
            parse_month("2020-13"),
            Err(PosterError::BadMonth { .. })
        ));
    }

    #[test]
    fn missing_date_is_rejected() {
        let json = r#"[{"a": 1}]"#;
        assert!(serde_json::from_str::<Vec<TimeSeriesPoint>>(json).is_err());
    }

    #[test]
    fn point_serializes_back_to_flat_record() {
        let p = TimeSeriesPoint::new(
            parse_month("2020-05").unwrap(),
            vec![("a".into(), 4.0)],
        );
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, r#"{"date":"2020-05","a":4.0}"#);
    }

    #[test]
    fn validate_flags_order_and_values() {
        let ok = Series::from_columns(&["2020-01", "2020-02"], &[("a", &[1.0, 2.0])]).unwrap();
        assert!(ok.validate().is_ok());

        let backwards =
            Series::from_columns(&["2020-02", "2020-01"], &[("a", &[1.0, 2.0])]).unwrap();
        assert!(matches!(
            backwards.validate(),
            Err(PosterError::OutOfOrder { .. })
        ));

        let negative =
            Series::from_columns(&["2020-01", "2020-02"], &[("a", &[1.0, -2.0])]).unwrap();
        assert!(matches!(
            negative.validate(),
            Err(PosterError::BadValue { .. })
        ));

        let empty = Series::from_points(Vec::new());
        assert!(matches!(empty.validate(), Err(PosterError::EmptySeries)));
    }

    #[test]
    fn band_thickness_helpers() {
        let band = Band {
            key: "a".into(),
            index: 0,
            points: vec![(0.0, 1.0), (2.0, 5.0), (1.0, 1.0)],
        };
        assert_eq!(band.thickness(1), 3.0);
        assert_eq!(band.max_thickness(), 3.0);
        assert!(!band.is_degenerate());
    }

    #[test]
    #[should_panic]
    fn value_out_of_range_panics() {
        let s = Series::from_columns(&["2020-01"], &[("a", &[1.0])]).unwrap();
        s.value(1, 0);
    }

    #[test]
    #[should_panic]
    fn thickness_out_of_range_panics() {
        let band = Band {
            key: "a".into(),
            index: 0,
            points: vec![(0.0, 1.0)],
        };
        band.thickness(1);
    }
}
