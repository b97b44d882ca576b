use super::error::{ProfitError, Result};
use super::nav::{NAV_DATE_FORMAT, RawNavRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// NAV values keyed by calendar date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSeries {
    navs: BTreeMap<NaiveDate, f64>,
}

impl NavSeries {
    /// Parses provider records into a series. Fails on the first malformed
    /// date or NAV value.
    pub fn from_records(records: &[RawNavRecord]) -> Result<Self> {
        let navs = records
            .iter()
            .map(|record| -> Result<(NaiveDate, f64)> {
                let date = NaiveDate::parse_from_str(record.date.trim(), NAV_DATE_FORMAT).map_err(
                    |source| ProfitError::InvalidNavDate {
                        value: record.date.clone(),
                        source,
                    },
                )?;
                let nav = record
                    .nav
                    .trim()
                    .parse::<f64>()
                    .map_err(|source| ProfitError::InvalidNavValue {
                        date,
                        value: record.nav.clone(),
                        source,
                    })?;
                Ok((date, nav))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { navs })
    }

    pub fn len(&self) -> usize {
        self.navs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.navs.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.navs.get(date).copied()
    }

    /// Finds the earliest date with a NAV on or after `target`.
    ///
    /// The search ends at the last date in the series.
    pub fn nearest_on_or_after(&self, target: NaiveDate) -> Result<NaiveDate> {
        self.nearest_nav_on_or_after(target).map(|(date, _)| date)
    }

    /// Like [`Self::nearest_on_or_after`], also returning the NAV on that date.
    pub fn nearest_nav_on_or_after(&self, target: NaiveDate) -> Result<(NaiveDate, f64)> {
        self.navs
            .range(target..)
            .next()
            .map(|(date, nav)| (*date, *nav))
            .ok_or(ProfitError::NoNavOnOrAfter { target })
    }
}

impl FromIterator<(NaiveDate, f64)> for NavSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            navs: iter.into_iter().collect(),
        }
    }
}
