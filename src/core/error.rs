//! Domain errors for profit computation

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfitError {
    #[error("Invalid request date '{value}', expected dd-mm-yyyy")]
    InvalidRequestDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("No NAV data available for scheme {0}")]
    NoNavData(String),

    #[error("Invalid NAV date '{value}'")]
    InvalidNavDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid NAV value '{value}' on {date}")]
    InvalidNavValue {
        date: NaiveDate,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("No NAV found on or after {target}")]
    NoNavOnOrAfter { target: NaiveDate },

    #[error("Cannot buy at NAV {nav} on {date}")]
    InvalidNav { date: NaiveDate, nav: f64 },

    #[error("Profit is not a finite number for capital {capital}")]
    NonFiniteProfit { capital: f64 },
}

pub type Result<T, E = ProfitError> = std::result::Result<T, E>;
