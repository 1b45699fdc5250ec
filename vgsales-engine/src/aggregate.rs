//! Per-platform and per-genre totals, plus the share-of-total transform.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::group::group_by;
use crate::numbers::percent_of;
use crate::record::{Record, SalesFigures};
use crate::region::SalesMetric;

/// Summed sales for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformTotal {
    pub platform: String,
    /// Sum of the selected metric; the ordering key.
    pub total: f64,
    /// All five columns summed, for tabular output.
    pub figures: SalesFigures,
}

/// Summed sales for one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreTotal {
    pub genre: String,
    pub total: f64,
}

/// A genre's percentage of the set it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreShare {
    pub genre: String,
    pub percent: f64,
}

/// Descending by total, then ascending by label.
fn rank_order(a_total: f64, a_key: &str, b_total: f64, b_key: &str) -> Ordering {
    b_total.total_cmp(&a_total).then_with(|| a_key.cmp(b_key))
}

/// Sum `metric` per platform, best seller first.
#[must_use]
pub fn aggregate_by_platform(subset: &[&Record], metric: SalesMetric) -> Vec<PlatformTotal> {
    let mut totals: Vec<PlatformTotal> = group_by(subset, |r| r.platform.as_str())
        .into_iter()
        .map(|group| {
            let mut figures = SalesFigures::default();
            for record in &group.records {
                figures.accumulate(&record.sales);
            }
            PlatformTotal {
                platform: group.key.to_string(),
                total: figures.get(metric),
                figures,
            }
        })
        .collect();
    totals.sort_by(|a, b| rank_order(a.total, &a.platform, b.total, &b.platform));
    totals
}

/// Sum `metric` per genre, best seller first, keeping at most `top_k` entries.
///
/// A `top_k` larger than the number of genres returns every genre.
#[must_use]
pub fn aggregate_by_genre(
    subset: &[&Record],
    metric: SalesMetric,
    top_k: Option<usize>,
) -> Vec<GenreTotal> {
    let mut totals: Vec<GenreTotal> = group_by(subset, |r| r.genre.as_str())
        .into_iter()
        .map(|group| GenreTotal {
            genre: group.key.to_string(),
            total: group.records.iter().map(|r| r.metric(metric)).sum(),
        })
        .collect();
    totals.sort_by(|a, b| rank_order(a.total, &a.genre, b.total, &b.genre));
    if let Some(k) = top_k {
        totals.truncate(k);
    }
    totals
}

/// Express each total as a percentage of the sum over `totals` itself.
///
/// When `totals` is already truncated the shares are relative to that
/// truncated set, not to the whole dataset. A set summing to zero yields
/// zero shares.
#[must_use]
pub fn to_percentages(totals: &[GenreTotal]) -> Vec<GenreShare> {
    let whole: f64 = totals.iter().map(|t| t.total).sum();
    totals
        .iter()
        .map(|t| GenreShare {
            genre: t.genre.clone(),
            percent: percent_of(t.total, whole),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform: &str, genre: &str, global: f64, na: f64) -> Record {
        Record {
            name: format!("{genre} on {platform}"),
            platform: platform.to_string(),
            year: 2005,
            genre: genre.to_string(),
            publisher: "Acme".to_string(),
            sales: SalesFigures {
                na,
                eu: 0.0,
                jp: 0.0,
                other: 0.0,
                global,
            },
        }
    }

    #[test]
    fn platforms_order_by_selected_metric() {
        let records = vec![
            record("PS2", "Action", 5.0, 1.0),
            record("DS", "Puzzle", 3.0, 4.0),
            record("PS2", "Sports", 1.0, 0.5),
        ];
        let subset: Vec<&Record> = records.iter().collect();

        let global = aggregate_by_platform(&subset, SalesMetric::Global);
        assert_eq!(global[0].platform, "PS2");
        assert!((global[0].total - 6.0).abs() < 1e-9);
        assert!((global[0].figures.na - 1.5).abs() < 1e-9);

        let na = aggregate_by_platform(&subset, SalesMetric::NorthAmerica);
        assert_eq!(na[0].platform, "DS");
        assert!((na[0].figures.global - 3.0).abs() < 1e-9);
    }

    #[test]
    fn ties_break_lexicographically() {
        let records = vec![
            record("Wii", "Sports", 2.0, 0.0),
            record("DS", "Action", 2.0, 0.0),
            record("GBA", "Racing", 2.0, 0.0),
        ];
        let subset: Vec<&Record> = records.iter().collect();
        let platforms: Vec<String> = aggregate_by_platform(&subset, SalesMetric::Global)
            .into_iter()
            .map(|t| t.platform)
            .collect();
        assert_eq!(platforms, vec!["DS", "GBA", "Wii"]);
        let genres: Vec<String> = aggregate_by_genre(&subset, SalesMetric::Global, None)
            .into_iter()
            .map(|t| t.genre)
            .collect();
        assert_eq!(genres, vec!["Action", "Racing", "Sports"]);
    }

    fn validated(name: &str, genre: &str, jp: f64) -> Record {
        crate::record::RawRecord {
            name: Some(name.to_string()),
            platform: Some("PS".to_string()),
            year: Some(1998),
            genre: Some(genre.to_string()),
            publisher: Some("Acme".to_string()),
            na_sales: Some(0.0),
            eu_sales: Some(0.0),
            jp_sales: Some(jp),
            other_sales: Some(0.0),
            global_sales: Some(0.0),
        }
        .validate(1)
        .unwrap()
    }

    #[test]
    fn negative_zero_sales_tie_with_zero() {
        let records = vec![
            validated("Zero Sports", "Sports", 0.0),
            validated("Zero Action", "Action", "-0".parse().unwrap()),
        ];
        let subset: Vec<&Record> = records.iter().collect();
        let genres: Vec<String> = aggregate_by_genre(&subset, SalesMetric::Japan, None)
            .into_iter()
            .map(|t| t.genre)
            .collect();
        assert_eq!(genres, vec!["Action", "Sports"]);
    }

    #[test]
    fn top_k_truncates_without_error_on_short_lists() {
        let records = vec![
            record("PS2", "Action", 5.0, 0.0),
            record("PS2", "Puzzle", 3.0, 0.0),
            record("PS2", "Sports", 4.0, 0.0),
        ];
        let subset: Vec<&Record> = records.iter().collect();
        let top2 = aggregate_by_genre(&subset, SalesMetric::Global, Some(2));
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[1].genre, "Sports");
        assert_eq!(aggregate_by_genre(&subset, SalesMetric::Global, Some(5)).len(), 3);
    }

    #[test]
    fn shares_are_relative_to_the_given_set() {
        let totals = vec![
            GenreTotal {
                genre: "Action".to_string(),
                total: 30.0,
            },
            GenreTotal {
                genre: "Sports".to_string(),
                total: 10.0,
            },
        ];
        let shares = to_percentages(&totals);
        assert!((shares[0].percent - 75.0).abs() < 1e-9);
        assert!((shares[1].percent - 25.0).abs() < 1e-9);

        let shares = to_percentages(&totals[..1]);
        assert!((shares[0].percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sum_set_yields_zero_shares() {
        let totals = vec![GenreTotal {
            genre: "Puzzle".to_string(),
            total: 0.0,
        }];
        let shares = to_percentages(&totals);
        assert!(shares[0].percent.abs() < f64::EPSILON);
        assert!(to_percentages(&[]).is_empty());
    }
}
