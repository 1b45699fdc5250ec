//! Year-range and genre-membership predicates.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::QueryError;
use crate::record::Record;

/// Inclusive release-year window. `min <= max` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// # Errors
    ///
    /// Returns [`QueryError::YearRangeInverted`] when `min > max`.
    pub const fn new(min: i32, max: i32) -> Result<Self, QueryError> {
        if min > max {
            return Err(QueryError::YearRangeInverted { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}

/// Set of selected genres. Duplicates collapse; an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSet {
    genres: BTreeSet<String>,
}

impl GenreSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for GenreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            genres: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Select the records released within `years` and, when a genre set is
/// given, belonging to one of its genres.
///
/// Both predicates are applied in a single pass and the input order is kept.
/// `Some(empty set)` yields an empty subset; only `None` skips the genre check.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [Record],
    years: YearRange,
    genres: Option<&GenreSet>,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| years.contains(r.year))
        .filter(|r| genres.is_none_or(|set| set.contains(&r.genre)))
        .collect()
}
