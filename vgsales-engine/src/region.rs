//! Sales regions and the metric column each one reads.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SalesError;

/// Geographic sales bucket selectable by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Worldwide totals
    #[default]
    All,
    NorthAmerica,
    Europe,
    Japan,
    /// Everything outside the three named markets
    Other,
}

/// One of the five sales columns carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesMetric {
    NorthAmerica,
    Europe,
    Japan,
    Other,
    Global,
}

impl SalesMetric {
    /// Column order used by tabular output.
    pub const ALL: [Self; 5] = [
        Self::NorthAmerica,
        Self::Europe,
        Self::Japan,
        Self::Other,
        Self::Global,
    ];

    /// Column name in the source dataset.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA_Sales",
            Self::Europe => "EU_Sales",
            Self::Japan => "JP_Sales",
            Self::Other => "Other_Sales",
            Self::Global => "Global_Sales",
        }
    }
}

impl fmt::Display for SalesMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Region {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::NorthAmerica,
        Self::Europe,
        Self::Japan,
        Self::Other,
    ];

    /// The sales column this region reads. Fixed lookup, never computed.
    #[must_use]
    pub const fn metric(self) -> SalesMetric {
        match self {
            Self::All => SalesMetric::Global,
            Self::NorthAmerica => SalesMetric::NorthAmerica,
            Self::Europe => SalesMetric::Europe,
            Self::Japan => SalesMetric::Japan,
            Self::Other => SalesMetric::Other,
        }
    }

    /// Short label used by platform views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Regions",
            Self::NorthAmerica => "North America",
            Self::Europe => "Europe",
            Self::Japan => "Japan",
            Self::Other => "Other",
        }
    }

    /// Long label used by genre and ranking views.
    #[must_use]
    pub const fn long_label(self) -> &'static str {
        match self {
            Self::All => "All Regions",
            Self::NorthAmerica => "North America Regions",
            Self::Europe => "Europe Regions",
            Self::Japan => "Japan Regions",
            Self::Other => "Other Regions",
        }
    }

    /// Parse a user-facing label.
    ///
    /// Accepts both label families (`North America`, `North America Regions`),
    /// snake/kebab case variants and the short codes `na`, `eu`, `jp`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::InvalidRegion`] for anything outside the enumeration.
    pub fn from_label(label: &str) -> Result<Self, SalesError> {
        let lowered = label.trim().to_ascii_lowercase();
        let stem = lowered
            .strip_suffix("regions")
            .or_else(|| lowered.strip_suffix("region"))
            .unwrap_or(&lowered);
        let compact: String = stem
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match compact.as_str() {
            "all" | "global" => Ok(Self::All),
            "northamerica" | "na" => Ok(Self::NorthAmerica),
            "europe" | "eu" => Ok(Self::Europe),
            "japan" | "jp" => Ok(Self::Japan),
            "other" => Ok(Self::Other),
            _ => Err(SalesError::InvalidRegion(label.to_string())),
        }
    }
}

/// Map a region to its sales metric.
#[must_use]
pub const fn resolve(region: Region) -> SalesMetric {
    region.metric()
}

impl FromStr for Region {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
