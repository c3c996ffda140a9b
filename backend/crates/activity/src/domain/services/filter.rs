//! Event Filters
//!
//! Listings accept `filter[]=womenOnly&filter[]=!physical` style boolean
//! filters plus an inclusive availability window and a maximum distance.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::entity::event::Event;
use crate::error::{ActivityError, ActivityResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanFilter {
    WomenOnly,
    Physical,
    PhotoId,
    AddressVisible,
    AddInfo,
}

impl BooleanFilter {
    /// Column in the `event` table
    pub fn column(self) -> &'static str {
        match self {
            BooleanFilter::WomenOnly => "women_only",
            BooleanFilter::Physical => "physical",
            BooleanFilter::PhotoId => "photo_id",
            BooleanFilter::AddressVisible => "address_visible",
            BooleanFilter::AddInfo => "add_info",
        }
    }

    pub fn value_of(self, event: &Event) -> bool {
        match self {
            BooleanFilter::WomenOnly => event.women_only,
            BooleanFilter::Physical => event.physical,
            BooleanFilter::PhotoId => event.photo_id,
            BooleanFilter::AddressVisible => event.address_visible,
            BooleanFilter::AddInfo => event.add_info,
        }
    }
}

impl FromStr for BooleanFilter {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "womenOnly" => Ok(BooleanFilter::WomenOnly),
            "physical" => Ok(BooleanFilter::Physical),
            "photoId" => Ok(BooleanFilter::PhotoId),
            "addressVisible" => Ok(BooleanFilter::AddressVisible),
            "addInfo" => Ok(BooleanFilter::AddInfo),
            other => Err(ActivityError::InvalidFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    /// Each filter with the value it requires
    pub booleans: Vec<(BooleanFilter, bool)>,
    pub availability_start: Option<NaiveDate>,
    pub availability_end: Option<NaiveDate>,
    /// Miles, inclusive
    pub max_distance: Option<f64>,
}

impl EventFilters {
    pub fn parse(
        booleans: &[String],
        availability_start: Option<&str>,
        availability_end: Option<&str>,
        max_distance: Option<f64>,
    ) -> ActivityResult<Self> {
        let booleans = booleans
            .iter()
            .map(|raw| match raw.strip_prefix('!') {
                Some(name) => name.parse().map(|filter| (filter, false)),
                None => raw.parse().map(|filter| (filter, true)),
            })
            .collect::<ActivityResult<Vec<_>>>()?;

        if let Some(miles) = max_distance.filter(|miles| miles.is_nan() || *miles < 0.0) {
            return Err(ActivityError::InvalidFilter(format!("maxDistance={miles}")));
        }

        Ok(Self {
            booleans,
            availability_start: availability_start.map(parse_date).transpose()?,
            availability_end: availability_end.map(parse_date).transpose()?,
            max_distance,
        })
    }

    /// Boolean and date filters. Distance is applied after distances are known.
    pub fn matches(&self, event: &Event) -> bool {
        let day = event.date.date_naive();
        self.booleans
            .iter()
            .all(|(filter, wanted)| filter.value_of(event) == *wanted)
            && self.availability_start.is_none_or(|start| day >= start)
            && self.availability_end.is_none_or(|end| day <= end)
    }
}

fn parse_date(raw: &str) -> ActivityResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ActivityError::InvalidFilter(raw.to_string()))
}
