//! Queries and the orchestrator that answers them.
//!
//! Each query runs exactly one flow against the store it is handed:
//!
//! - platform: filter → [`aggregate_by_platform`]
//! - genre: filter → [`aggregate_by_genre`] → [`to_percentages`]
//! - ranking: filter (with genres) → [`top_k_per_genre`] → chart or table rows
//!
//! Flows share no state and keep nothing between calls.

use serde::Serialize;

use crate::aggregate::{
    GenreShare, GenreTotal, PlatformTotal, aggregate_by_genre, aggregate_by_platform,
    to_percentages,
};
use crate::error::{QueryError, SalesError};
use crate::filter::{GenreSet, YearRange, filter_records};
use crate::ranking::{RankingChart, TableRow, chart_view, table_view, top_k_per_genre};
use crate::record::RecordStore;
use crate::region::{Region, SalesMetric, resolve};

/// How many genres the genre flow keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreDisplay {
    Top(usize),
    All,
}

impl GenreDisplay {
    #[must_use]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Self::Top(k) => Some(k),
            Self::All => None,
        }
    }

    /// Heading fragment, e.g. `Top 5 Genres`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Top(k) => format!("Top {k} Genres"),
            Self::All => "All Genres".to_string(),
        }
    }
}

/// Presentation the ranking flow prepares rows for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingView {
    #[default]
    Chart,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Platform,
    Genre {
        display: GenreDisplay,
    },
    Ranking {
        genres: GenreSet,
        per_genre: usize,
        view: RankingView,
    },
}

/// One question asked of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub region: Region,
    pub years: YearRange,
    pub mode: QueryMode,
}

impl Query {
    #[must_use]
    pub const fn platform(region: Region, years: YearRange) -> Self {
        Self {
            region,
            years,
            mode: QueryMode::Platform,
        }
    }

    #[must_use]
    pub const fn genre(region: Region, years: YearRange, display: GenreDisplay) -> Self {
        Self {
            region,
            years,
            mode: QueryMode::Genre { display },
        }
    }

    #[must_use]
    pub fn ranking(
        region: Region,
        years: YearRange,
        genres: GenreSet,
        per_genre: usize,
        view: RankingView,
    ) -> Self {
        Self {
            region,
            years,
            mode: QueryMode::Ranking {
                genres,
                per_genre,
                view,
            },
        }
    }

    /// # Errors
    ///
    /// Returns the first [`QueryError`] the query violates.
    pub fn validate(&self) -> Result<(), QueryError> {
        match &self.mode {
            QueryMode::Platform | QueryMode::Genre { display: GenreDisplay::All } => Ok(()),
            QueryMode::Genre {
                display: GenreDisplay::Top(0),
            } => Err(QueryError::ZeroCount {
                field: "top_genres",
            }),
            QueryMode::Genre { .. } => Ok(()),
            QueryMode::Ranking { genres, .. } if genres.is_empty() => {
                Err(QueryError::EmptyGenreSelection)
            }
            QueryMode::Ranking { per_genre: 0, .. } => Err(QueryError::ZeroCount {
                field: "per_genre",
            }),
            QueryMode::Ranking { .. } => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformReport {
    pub region: Region,
    pub metric: SalesMetric,
    pub years: YearRange,
    pub totals: Vec<PlatformTotal>,
}

/// Genre totals and the paired share view over the same set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreReport {
    pub region: Region,
    pub metric: SalesMetric,
    pub years: YearRange,
    pub display: GenreDisplay,
    pub totals: Vec<GenreTotal>,
    pub shares: Vec<GenreShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "rows", rename_all = "snake_case")]
pub enum RankingRows {
    Chart(RankingChart),
    Table(Vec<TableRow>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub region: Region,
    pub metric: SalesMetric,
    pub years: YearRange,
    pub per_genre: usize,
    pub rows: RankingRows,
}

/// Fully materialized answer to a [`Query`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum SalesReport {
    Platform(PlatformReport),
    Genre(GenreReport),
    Ranking(RankingReport),
}

impl SalesReport {
    #[must_use]
    pub const fn region(&self) -> Region {
        match self {
            Self::Platform(r) => r.region,
            Self::Genre(r) => r.region,
            Self::Ranking(r) => r.region,
        }
    }

    #[must_use]
    pub const fn years(&self) -> YearRange {
        match self {
            Self::Platform(r) => r.years,
            Self::Genre(r) => r.years,
            Self::Ranking(r) => r.years,
        }
    }
}

/// Answer `query` from `store`.
///
/// # Errors
///
/// Returns [`SalesError::InvalidQuery`] when the query fails validation. No
/// partial report is produced.
pub fn run_query(store: &RecordStore, query: &Query) -> Result<SalesReport, SalesError> {
    query.validate()?;
    let metric = resolve(query.region);

    let report = match &query.mode {
        QueryMode::Platform => SalesReport::Platform(platform_flow(store, query, metric)),
        QueryMode::Genre { display } => {
            SalesReport::Genre(genre_flow(store, query, metric, *display))
        }
        QueryMode::Ranking {
            genres,
            per_genre,
            view,
        } => SalesReport::Ranking(ranking_flow(
            store, query, metric, genres, *per_genre, *view,
        )),
    };
    Ok(report)
}

fn platform_flow(store: &RecordStore, query: &Query, metric: SalesMetric) -> PlatformReport {
    let subset = filter_records(store.records(), query.years, None);
    let totals = aggregate_by_platform(&subset, metric);
    log::debug!(
        "platform flow: {} records in {}, {} platforms",
        subset.len(),
        query.years,
        totals.len()
    );
    PlatformReport {
        region: query.region,
        metric,
        years: query.years,
        totals,
    }
}

fn genre_flow(
    store: &RecordStore,
    query: &Query,
    metric: SalesMetric,
    display: GenreDisplay,
) -> GenreReport {
    let subset = filter_records(store.records(), query.years, None);
    let totals = aggregate_by_genre(&subset, metric, display.limit());
    let shares = to_percentages(&totals);
    log::debug!(
        "genre flow: {} records in {}, {} genres kept",
        subset.len(),
        query.years,
        totals.len()
    );
    GenreReport {
        region: query.region,
        metric,
        years: query.years,
        display,
        totals,
        shares,
    }
}

fn ranking_flow(
    store: &RecordStore,
    query: &Query,
    metric: SalesMetric,
    genres: &GenreSet,
    per_genre: usize,
    view: RankingView,
) -> RankingReport {
    let subset = filter_records(store.records(), query.years, Some(genres));
    let ranked = top_k_per_genre(&subset, metric, per_genre);
    log::debug!(
        "ranking flow: {} records across {} selected genres, {} titles ranked",
        subset.len(),
        genres.len(),
        ranked.len()
    );
    let rows = match view {
        RankingView::Chart => RankingRows::Chart(chart_view(&ranked)),
        RankingView::Table => RankingRows::Table(table_view(&ranked)),
    };
    RankingReport {
        region: query.region,
        metric,
        years: query.years,
        per_genre,
        rows,
    }
}
