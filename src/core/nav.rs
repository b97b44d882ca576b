//! NAV history abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

/// Date format used by the NAV provider and the public API.
pub const NAV_DATE_FORMAT: &str = "%d-%m-%Y";

/// A NAV record as delivered by the provider, before any parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNavRecord {
    pub date: String,
    pub nav: String,
}

impl RawNavRecord {
    pub fn new(date: impl Into<String>, nav: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            nav: nav.into(),
        }
    }
}

/// Source of historical NAV records for a scheme.
///
/// Implementations never fail: any upstream problem is logged and surfaces as
/// an empty history, which callers treat as "no data available".
#[async_trait]
pub trait NavProvider: Send + Sync {
    async fn fetch_nav_history(
        &self,
        scheme_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<RawNavRecord>;
}
