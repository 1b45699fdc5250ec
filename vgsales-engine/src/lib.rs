//! Video-Game Sales Engine
//!
//! Platform-agnostic aggregation and ranking over a fixed set of video-game
//! sales records. This crate holds every transformation (filtering, grouping,
//! summation, top-K selection, share-of-total) without any file, terminal or
//! chart dependencies.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod group;
pub mod numbers;
pub mod query;
pub mod ranking;
pub mod record;
pub mod region;

// Re-export commonly used types
pub use aggregate::{
    GenreShare, GenreTotal, PlatformTotal, aggregate_by_genre, aggregate_by_platform,
    to_percentages,
};
pub use config::{ConfigError, EngineConfig};
pub use error::{FieldProblem, QueryError, SalesError};
pub use filter::{GenreSet, YearRange, filter_records};
pub use group::{Group, Groups, group_by};
pub use query::{
    GenreDisplay, GenreReport, PlatformReport, Query, QueryMode, RankingReport, RankingRows,
    RankingView, SalesReport, run_query,
};
pub use ranking::{
    ChartBar, RankedTitle, RankingChart, TableRow, chart_view, table_view, top_k_per_genre,
};
pub use record::{RawRecord, Record, RecordStore, SalesFigures, clean_records};
pub use region::{Region, SalesMetric, resolve};

use thiserror::Error;

/// Trait for abstracting where raw records come from.
/// Platform-specific implementations should provide this
pub trait RecordSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every raw record, in source order
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read or decoded.
    fn load_records(&self) -> Result<Vec<RawRecord>, Self::Error>;
}

/// Failure while building a [`RecordStore`] from a [`RecordSource`].
#[derive(Debug, Error)]
pub enum LoadStoreError<E> {
    #[error("record source failed: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Invalid(#[from] SalesError),
}

/// Entry point tying a record source to engine defaults.
pub struct SalesEngine<S>
where
    S: RecordSource,
{
    source: S,
    config: EngineConfig,
}

impl<S> SalesEngine<S>
where
    S: RecordSource,
{
    /// Create a new engine with the provided record source and defaults
    pub const fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load, clean and validate the session's record store.
    ///
    /// Rows without a release year are dropped; every other missing field
    /// fails the load.
    ///
    /// # Errors
    ///
    /// Returns [`LoadStoreError::Source`] if the source fails and
    /// [`LoadStoreError::Invalid`] if a kept record breaks the field contract.
    pub fn load_store(&self) -> Result<RecordStore, LoadStoreError<S::Error>> {
        let raw = self.source.load_records().map_err(LoadStoreError::Source)?;
        let (kept, dropped) = clean_records(raw);
        if dropped > 0 {
            log::info!("dropped {dropped} records without a release year");
        }
        let store = RecordStore::from_raw(kept)?;
        log::info!("record store ready with {} records", store.len());
        Ok(store)
    }

    /// Answer a query against `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::InvalidQuery`] when the query fails validation.
    pub fn run(&self, store: &RecordStore, query: &Query) -> Result<SalesReport, SalesError> {
        run_query(store, query)
    }
}
