//! Sales records and the read-only store that holds them for a session.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{FieldProblem, SalesError};
use crate::filter::YearRange;
use crate::numbers::year_from_f64;
use crate::region::SalesMetric;

/// Publisher shown when the source leaves the column blank.
pub const UNKNOWN_PUBLISHER: &str = "N/A";

/// The five sales figures of a record, in millions of units.
///
/// `global` is carried as reported and is never recomputed from the regional
/// columns; source data rounds each column independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesFigures {
    pub na: f64,
    pub eu: f64,
    pub jp: f64,
    pub other: f64,
    pub global: f64,
}

impl SalesFigures {
    #[must_use]
    pub const fn get(&self, metric: SalesMetric) -> f64 {
        match metric {
            SalesMetric::NorthAmerica => self.na,
            SalesMetric::Europe => self.eu,
            SalesMetric::Japan => self.jp,
            SalesMetric::Other => self.other,
            SalesMetric::Global => self.global,
        }
    }

    /// Add every column of `other` into `self`.
    pub fn accumulate(&mut self, other: &Self) {
        self.na += other.na;
        self.eu += other.eu;
        self.jp += other.jp;
        self.other += other.other;
        self.global += other.global;
    }
}

/// One cleaned game-sales observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub platform: String,
    pub year: i32,
    pub genre: String,
    pub publisher: String,
    pub sales: SalesFigures,
}

impl Record {
    #[must_use]
    pub const fn metric(&self, metric: SalesMetric) -> f64 {
        self.sales.get(metric)
    }

    /// `"{Name} ({Platform})"`, distinguishing one title released on several platforms.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.platform)
    }
}

/// A record as handed over by ingestion, before the required-field contract is checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Platform")]
    pub platform: Option<String>,
    #[serde(default, rename = "Year", deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(default, rename = "Genre")]
    pub genre: Option<String>,
    #[serde(default, rename = "Publisher")]
    pub publisher: Option<String>,
    #[serde(default, rename = "NA_Sales")]
    pub na_sales: Option<f64>,
    #[serde(default, rename = "EU_Sales")]
    pub eu_sales: Option<f64>,
    #[serde(default, rename = "JP_Sales")]
    pub jp_sales: Option<f64>,
    #[serde(default, rename = "Other_Sales")]
    pub other_sales: Option<f64>,
    #[serde(default, rename = "Global_Sales")]
    pub global_sales: Option<f64>,
}

/// Accept `2006` and `2006.0` alike; tabular exports store nullable years as floats.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(|value| {
            year_from_f64(value).ok_or_else(|| {
                serde::de::Error::custom(format!("`Year` is not a whole year: {value}"))
            })
        })
        .transpose()
}

impl RawRecord {
    /// Check the required-field contract and build a [`Record`].
    ///
    /// `row` is the 1-based position reported in errors. Missing values are
    /// never coerced to zero.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::MalformedInput`] naming the first offending field.
    pub fn validate(self, row: usize) -> Result<Record, SalesError> {
        let missing = |field: &'static str| SalesError::MalformedInput {
            row,
            field,
            problem: FieldProblem::Missing,
        };
        let figure = |field: &'static str, value: Option<f64>| match value {
            None => Err(missing(field)),
            // `-0` is stored as `+0` so equal totals compare equal under `total_cmp`
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v + 0.0),
            Some(_) => Err(SalesError::MalformedInput {
                row,
                field,
                problem: FieldProblem::NotASalesFigure,
            }),
        };
        let text = |field: &'static str, value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| missing(field))
        };

        let name = text("Name", self.name)?;
        let platform = text("Platform", self.platform)?;
        let year = self.year.ok_or_else(|| missing("Year"))?;
        let genre = text("Genre", self.genre)?;
        let publisher = self
            .publisher
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string());
        let sales = SalesFigures {
            na: figure("NA_Sales", self.na_sales)?,
            eu: figure("EU_Sales", self.eu_sales)?,
            jp: figure("JP_Sales", self.jp_sales)?,
            other: figure("Other_Sales", self.other_sales)?,
            global: figure("Global_Sales", self.global_sales)?,
        };

        Ok(Record {
            name,
            platform,
            year,
            genre,
            publisher,
            sales,
        })
    }
}

/// Drop raw rows without a release year, the one cleaning step applied before validation.
///
/// Returns the kept rows in their original order plus the number dropped.
#[must_use]
pub fn clean_records(raw: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let before = raw.len();
    let kept: Vec<RawRecord> = raw.into_iter().filter(|r| r.year.is_some()).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Immutable, ordered collection of records shared by every query of a session.
///
/// Only [`RecordStore::from_raw`] checks the field contract. [`RecordStore::new`]
/// and `From<Vec<Record>>` trust their input: sales figures must already be
/// finite and non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Validate every raw record, failing on the first contract violation.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::MalformedInput`] with the 1-based row of the bad record.
    pub fn from_raw(raw: Vec<RawRecord>) -> Result<Self, SalesError> {
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(idx, r)| r.validate(idx + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest release year, or `None` for an empty store.
    #[must_use]
    pub fn year_bounds(&self) -> Option<YearRange> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        YearRange::new(min, max).ok()
    }

    /// Distinct genres in first-seen order.
    #[must_use]
    pub fn genres(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.genre.as_str()))
    }

    /// Distinct platforms in first-seen order.
    #[must_use]
    pub fn platforms(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.platform.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, year: Option<i32>, genre: &str) -> RawRecord {
        RawRecord {
            name: Some(name.to_string()),
            platform: Some("Wii".to_string()),
            year,
            genre: Some(genre.to_string()),
            publisher: Some("Nintendo".to_string()),
            na_sales: Some(1.0),
            eu_sales: Some(0.5),
            jp_sales: Some(0.25),
            other_sales: Some(0.1),
            global_sales: Some(1.86),
        }
    }

    #[test]
    fn validate_builds_record() {
        let record = raw("Wii Sports", Some(2006), "Sports").validate(1).unwrap();
        assert_eq!(record.year, 2006);
        assert_eq!(record.display_label(), "Wii Sports (Wii)");
        assert!((record.metric(SalesMetric::Global) - 1.86).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_metric_is_not_coerced_to_zero() {
        let mut bad = raw("Tetris", Some(1989), "Puzzle");
        bad.jp_sales = None;
        let err = bad.validate(7).unwrap_err();
        assert_eq!(
            err,
            SalesError::MalformedInput {
                row: 7,
                field: "JP_Sales",
                problem: FieldProblem::Missing,
            }
        );
    }

    #[test]
    fn negative_metric_is_rejected() {
        let mut bad = raw("Tetris", Some(1989), "Puzzle");
        bad.eu_sales = Some(-0.1);
        assert!(matches!(
            bad.validate(1),
            Err(SalesError::MalformedInput {
                field: "EU_Sales",
                problem: FieldProblem::NotASalesFigure,
                ..
            })
        ));
    }

    #[test]
    fn blank_name_counts_as_missing() {
        let mut bad = raw("  ", Some(2000), "Action");
        bad.name = Some(" ".to_string());
        assert!(matches!(
            bad.validate(3),
            Err(SalesError::MalformedInput { field: "Name", .. })
        ));
    }

    #[test]
    fn negative_zero_is_stored_as_zero() {
        let mut r = raw("Quiet Launch", Some(2001), "Action");
        r.jp_sales = Some(-0.0);
        let record = r.validate(1).unwrap();
        assert!(record.sales.jp.is_sign_positive());
        assert_eq!(record.sales.jp.total_cmp(&0.0), std::cmp::Ordering::Equal);
    }

    #[test]
    fn json_years_may_be_floats() {
        let rows: Vec<RawRecord> = serde_json::from_str(
            r#"[{"Name":"A","Year":2006.0},{"Name":"B","Year":1999},{"Name":"C","Year":null},{"Name":"D"}]"#,
        )
        .unwrap();
        let years: Vec<Option<i32>> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(2006), Some(1999), None, None]);

        let err = serde_json::from_str::<Vec<RawRecord>>(r#"[{"Year":2006.5}]"#).unwrap_err();
        assert!(err.to_string().contains("not a whole year"));
    }

    #[test]
    fn blank_publisher_falls_back() {
        let mut r = raw("Pong", Some(1980), "Sports");
        r.publisher = None;
        assert_eq!(r.validate(1).unwrap().publisher, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn clean_drops_undated_rows_only() {
        let rows = vec![
            raw("A", Some(2001), "Action"),
            raw("B", None, "Action"),
            raw("C", Some(2003), "Puzzle"),
        ];
        let (kept, dropped) = clean_records(rows);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].name.as_deref(), Some("C"));
    }

    #[test]
    fn store_reports_bounds_and_distinct_values() {
        let store = RecordStore::from_raw(vec![
            raw("A", Some(2004), "Action"),
            raw("B", Some(1998), "Puzzle"),
            raw("C", Some(2010), "Action"),
        ])
        .unwrap();
        let bounds = store.year_bounds().unwrap();
        assert_eq!((bounds.min(), bounds.max()), (1998, 2010));
        assert_eq!(store.genres(), vec!["Action", "Puzzle"]);
        assert_eq!(store.platforms(), vec!["Wii"]);
        assert!(RecordStore::default().year_bounds().is_none());
    }

    #[test]
    fn from_raw_reports_one_based_row() {
        let mut bad = raw("B", Some(2000), "Action");
        bad.genre = None;
        let err = RecordStore::from_raw(vec![raw("A", Some(2000), "Action"), bad]).unwrap_err();
        assert!(matches!(err, SalesError::MalformedInput { row: 2, field: "Genre", .. }));
    }
}
