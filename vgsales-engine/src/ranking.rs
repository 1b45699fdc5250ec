//! Best-selling titles per genre and their chart and table renderings.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::group::group_by;
use crate::numbers::format_millions;
use crate::record::Record;
use crate::region::SalesMetric;

/// One selected title with its synthesized label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTitle {
    /// `"{Name} ({Platform})"`
    pub label: String,
    pub name: String,
    pub platform: String,
    pub genre: String,
    pub year: i32,
    pub publisher: String,
    /// Value of the selected metric.
    pub sales: f64,
    /// 1-based position within its genre.
    pub rank: usize,
}

/// Select the `k` best sellers of every genre in `subset`.
///
/// Genres are emitted in ascending order. Within a genre titles are ordered by
/// descending `metric`; equal values keep their order in `subset`. A genre with
/// fewer than `k` titles contributes all of them.
#[must_use]
pub fn top_k_per_genre(subset: &[&Record], metric: SalesMetric, k: usize) -> Vec<RankedTitle> {
    let mut rows = Vec::new();
    for group in group_by(subset, |r| r.genre.as_str()).into_sorted() {
        let mut members = group.records;
        // stable: equal sales keep source order
        members.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
        members.truncate(k);
        rows.extend(members.into_iter().enumerate().map(|(idx, r)| RankedTitle {
            label: r.display_label(),
            name: r.name.clone(),
            platform: r.platform.clone(),
            genre: r.genre.clone(),
            year: r.year,
            publisher: r.publisher.clone(),
            sales: r.metric(metric),
            rank: idx + 1,
        }));
    }
    rows
}

/// A single bar of the ranking chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    /// Color hint only; bars are not partitioned by genre.
    pub genre: String,
    pub sales: f64,
}

/// Ranking rows prepared for a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingChart {
    /// Every selected title, best seller first across all genres.
    pub bars: Vec<ChartBar>,
    /// Legend order: genres as they appear in the per-genre ranking.
    pub genre_order: Vec<String>,
}

/// Re-sort ranked rows globally by sales for charting.
#[must_use]
pub fn chart_view(rows: &[RankedTitle]) -> RankingChart {
    let mut seen = HashSet::new();
    let genre_order = rows
        .iter()
        .filter(|r| seen.insert(r.genre.as_str()))
        .map(|r| r.genre.clone())
        .collect();

    let mut bars: Vec<ChartBar> = rows
        .iter()
        .map(|r| ChartBar {
            label: r.label.clone(),
            genre: r.genre.clone(),
            sales: r.sales,
        })
        .collect();
    bars.sort_by(|a, b| b.sales.total_cmp(&a.sales));

    RankingChart { bars, genre_order }
}

/// A display-ready table row; every cell is already formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub title: String,
    pub genre: String,
    pub release_year: String,
    pub publisher: String,
    pub sales: String,
}

/// Format ranked rows for tabular display, keeping the per-genre order.
#[must_use]
pub fn table_view(rows: &[RankedTitle]) -> Vec<TableRow> {
    rows.iter()
        .map(|r| TableRow {
            title: r.label.clone(),
            genre: r.genre.clone(),
            release_year: r.year.to_string(),
            publisher: r.publisher.clone(),
            sales: format_millions(r.sales),
        })
        .collect()
}
