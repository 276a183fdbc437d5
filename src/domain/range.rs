//! Date Ranges and Preset Keys

use crate::constants::DEFAULT_RANGE_DAYS;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Preset range keys understood by the data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangeKey {
    #[default]
    #[serde(rename = "last7")]
    Last7,
    #[serde(rename = "last30")]
    Last30,
    #[serde(rename = "ytd")]
    Ytd,
}

impl DateRangeKey {
    pub const ALL: [DateRangeKey; 3] =
        [DateRangeKey::Last7, DateRangeKey::Last30, DateRangeKey::Ytd];

    pub fn label(&self) -> &'static str {
        match self {
            DateRangeKey::Last7 => "Last 7 days",
            DateRangeKey::Last30 => "Last 30 days",
            DateRangeKey::Ytd => "YTD",
        }
    }

    /// Concrete inclusive range ending `today`
    pub fn range(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            DateRangeKey::Last7 => today.checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1)),
            DateRangeKey::Last30 => today.checked_sub_days(Days::new(29)),
            DateRangeKey::Ytd => today.with_ordinal(1),
        };
        DateRange {
            start: Some(start.unwrap_or(today)),
            end: Some(today),
        }
    }
}

/// Inclusive calendar range; either end may be unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The preset this range equals exactly, if any
    pub fn preset(&self, today: NaiveDate) -> Option<DateRangeKey> {
        DateRangeKey::ALL
            .into_iter()
            .find(|key| key.range(today) == *self)
    }

    /// Preset key, falling back to the trailing week for custom ranges
    pub fn key_or_default(&self, today: NaiveDate) -> DateRangeKey {
        self.preset(today).unwrap_or_default()
    }
}
