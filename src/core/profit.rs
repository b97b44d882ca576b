//! Profit computation over historical NAV

use super::error::{ProfitError, Result};
use super::nav::{NAV_DATE_FORMAT, NavProvider};
use super::series::NavSeries;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_CAPITAL: f64 = 1_000_000.0;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitRequest {
    pub scheme_code: String,
    /// Purchase date, dd-mm-yyyy
    pub start_date: String,
    /// Redemption date, dd-mm-yyyy
    pub end_date: String,
    pub capital: f64,
}

impl ProfitRequest {
    pub fn new(
        scheme_code: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        capital: f64,
    ) -> Self {
        Self {
            scheme_code: scheme_code.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            capital,
        }
    }
}

/// Intermediate values of a successful profit computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitBreakdown {
    pub scheme_code: String,
    pub capital: f64,
    pub start_date: NaiveDate,
    pub start_nav: f64,
    pub end_date: NaiveDate,
    pub end_nav: f64,
    pub units: f64,
    pub redemption_value: f64,
    pub net_profit: f64,
}

pub struct ProfitCalculator {
    provider: Arc<dyn NavProvider>,
    lookahead_days: u32,
}

impl ProfitCalculator {
    pub fn new(provider: Arc<dyn NavProvider>, lookahead_days: u32) -> Self {
        Self {
            provider,
            lookahead_days,
        }
    }

    /// Computes the profit of buying at the NAV nearest on or after the start
    /// date and redeeming at the NAV nearest on or after the end date.
    pub async fn compute(&self, request: &ProfitRequest) -> Result<ProfitBreakdown> {
        let start = parse_request_date(&request.start_date)?;
        let end = parse_request_date(&request.end_date)?;

        // Extend past the later date so it can still resolve forward over holidays
        let fetch_start = start.min(end);
        let fetch_end = start
            .max(end)
            .checked_add_signed(Duration::days(i64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX);

        let records = self
            .provider
            .fetch_nav_history(&request.scheme_code, fetch_start, fetch_end)
            .await;
        if records.is_empty() {
            return Err(ProfitError::NoNavData(request.scheme_code.clone()));
        }

        let series = NavSeries::from_records(&records)?;
        debug!(
            scheme_code = %request.scheme_code,
            navs = series.len(),
            "Built NAV series"
        );

        let (start_date, start_nav) = series.nearest_nav_on_or_after(start)?;
        let (end_date, end_nav) = series.nearest_nav_on_or_after(end)?;
        if !(start_nav > 0.0 && start_nav.is_finite()) {
            return Err(ProfitError::InvalidNav {
                date: start_date,
                nav: start_nav,
            });
        }

        let units = request.capital / start_nav;
        let redemption_value = units * end_nav;
        let net_profit = redemption_value - request.capital;
        if !net_profit.is_finite() {
            return Err(ProfitError::NonFiniteProfit {
                capital: request.capital,
            });
        }

        Ok(ProfitBreakdown {
            scheme_code: request.scheme_code.clone(),
            capital: request.capital,
            start_date,
            start_nav,
            end_date,
            end_nav,
            units,
            redemption_value,
            net_profit,
        })
    }

    /// Net profit for the request, or `0.0` when it cannot be computed.
    pub async fn calculate_profit(&self, request: &ProfitRequest) -> f64 {
        match self.compute(request).await {
            Ok(breakdown) => {
                info!(
                    scheme_code = %breakdown.scheme_code,
                    start_date = %breakdown.start_date,
                    end_date = %breakdown.end_date,
                    net_profit = breakdown.net_profit,
                    "Calculated profit"
                );
                breakdown.net_profit
            }
            Err(e @ ProfitError::NoNavData(_)) => {
                warn!(error = %e, "No NAV data, reporting zero profit");
                0.0
            }
            Err(e) => {
                error!(
                    scheme_code = %request.scheme_code,
                    error = %e,
                    "Error calculating profit"
                );
                0.0
            }
        }
    }
}

fn parse_request_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), NAV_DATE_FORMAT).map_err(|source| {
        ProfitError::InvalidRequestDate {
            value: value.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::RawNavRecord;
    use async_trait::async_trait;
    use std::io;
    use std::sync::Mutex;

    struct LogWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct StaticNavProvider {
        records: Vec<RawNavRecord>,
        requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    impl StaticNavProvider {
        fn new(records: Vec<RawNavRecord>) -> Arc<Self> {
            Arc::new(Self {
                records,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NavProvider for StaticNavProvider {
        async fn fetch_nav_history(
            &self,
            scheme_code: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Vec<RawNavRecord> {
            self.requests
                .lock()
                .unwrap()
                .push((scheme_code.to_string(), start, end));
            self.records.clone()
        }
    }

    fn april_2006_records() -> Vec<RawNavRecord> {
        vec![
            RawNavRecord::new("08-04-2006", "37.49230"),
            RawNavRecord::new("07-04-2006", "378.57640"),
            RawNavRecord::new("06-04-2006", "300.08770"),
            RawNavRecord::new("05-04-2006", "31.66920"),
            RawNavRecord::new("04-04-2006", "370.42310"),
            RawNavRecord::new("03-04-2006", "35.44000"),
            RawNavRecord::new("02-04-2006", "321.81810"),
            RawNavRecord::new("01-04-2006", "3716.46800"),
        ]
    }

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_profit_with_mock_data() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "08-04-2006", "04-04-2006", 100000.0);

        let profit = calculator.calculate_profit(&request).await;

        assert_eq!(profit, 887997.8022153882);
    }

    #[tokio::test]
    async fn test_compute_breakdown() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "08-04-2006", "04-04-2006", 100000.0);

        let breakdown = calculator.compute(&request).await.unwrap();

        assert_eq!(breakdown.start_date, date(8, 4, 2006));
        assert_eq!(breakdown.end_date, date(4, 4, 2006));
        assert_eq!(breakdown.start_nav, 37.4923);
        assert_eq!(breakdown.end_nav, 370.4231);
        assert_eq!(breakdown.units, 100000.0 / 37.4923);
        assert_eq!(
            breakdown.net_profit,
            breakdown.redemption_value - breakdown.capital
        );
    }

    #[tokio::test]
    async fn test_fetch_window_covers_both_dates_and_lookahead() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider.clone(), 5);
        let request = ProfitRequest::new("123456", "08-04-2006", "04-04-2006", 100000.0);

        calculator.compute(&request).await.unwrap();

        assert_eq!(
            provider.requests(),
            vec![("123456".to_string(), date(4, 4, 2006), date(13, 4, 2006))]
        );
    }

    #[tokio::test]
    async fn test_empty_fetch_returns_zero() {
        let provider = StaticNavProvider::new(Vec::new());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "01-04-2006", "08-04-2006", DEFAULT_CAPITAL);

        assert!(matches!(
            calculator.compute(&request).await,
            Err(ProfitError::NoNavData(_))
        ));
        assert_eq!(calculator.calculate_profit(&request).await, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_request_date_returns_zero() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider.clone(), DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "2006-04-01", "08-04-2006", DEFAULT_CAPITAL);

        assert!(matches!(
            calculator.compute(&request).await,
            Err(ProfitError::InvalidRequestDate { .. })
        ));

        let logs = Arc::new(Mutex::new(Vec::new()));
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || LogWriter(writer.clone()))
            .finish();
        let profit = {
            let _guard = tracing::subscriber::set_default(subscriber);
            calculator.calculate_profit(&request).await
        };

        assert_eq!(profit, 0.0);
        let output = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Error calculating profit"));
        assert!(output.contains("2006-04-01"));
        // Bad dates are rejected before any upstream call
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_zero_start_nav_returns_zero() {
        let provider = StaticNavProvider::new(vec![
            RawNavRecord::new("03-04-2006", "0.00000"),
            RawNavRecord::new("04-04-2006", "20.0"),
        ]);
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "03-04-2006", "04-04-2006", DEFAULT_CAPITAL);

        assert!(matches!(
            calculator.compute(&request).await,
            Err(ProfitError::InvalidNav { date: d, nav }) if d == date(3, 4, 2006) && nav == 0.0
        ));
        assert_eq!(calculator.calculate_profit(&request).await, 0.0);
    }

    #[tokio::test]
    async fn test_non_finite_capital_returns_zero() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "03-04-2006", "04-04-2006", f64::NAN);

        assert!(matches!(
            calculator.compute(&request).await,
            Err(ProfitError::NonFiniteProfit { .. })
        ));
        assert_eq!(calculator.calculate_profit(&request).await, 0.0);
    }

    #[tokio::test]
    async fn test_start_before_first_nav_resolves_to_first_nav() {
        let provider = StaticNavProvider::new(vec![
            RawNavRecord::new("20-04-2006", "10.0"),
            RawNavRecord::new("21-04-2006", "12.0"),
        ]);
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "01-04-2006", "21-04-2006", 1000.0);

        let breakdown = calculator.compute(&request).await.unwrap();

        assert_eq!(breakdown.start_date, date(20, 4, 2006));
        assert_eq!(breakdown.net_profit, 200.0);
    }

    #[tokio::test]
    async fn test_malformed_nav_returns_zero() {
        let provider = StaticNavProvider::new(vec![
            RawNavRecord::new("01-04-2006", "10.0"),
            RawNavRecord::new("02-04-2006", ""),
        ]);
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "01-04-2006", "02-04-2006", DEFAULT_CAPITAL);

        assert_eq!(calculator.calculate_profit(&request).await, 0.0);
    }

    #[tokio::test]
    async fn test_end_date_past_available_data_returns_zero() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "01-04-2006", "01-05-2006", DEFAULT_CAPITAL);

        assert!(matches!(
            calculator.compute(&request).await,
            Err(ProfitError::NoNavOnOrAfter { target }) if target == date(1, 5, 2006)
        ));
        assert_eq!(calculator.calculate_profit(&request).await, 0.0);
    }

    #[tokio::test]
    async fn test_swapped_dates_use_same_nav_points() {
        let provider = StaticNavProvider::new(april_2006_records());
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);

        let forward = calculator
            .compute(&ProfitRequest::new("123456", "03-04-2006", "06-04-2006", 1000.0))
            .await
            .unwrap();
        let backward = calculator
            .compute(&ProfitRequest::new("123456", "06-04-2006", "03-04-2006", 1000.0))
            .await
            .unwrap();

        assert_eq!(forward.start_nav, backward.end_nav);
        assert_eq!(forward.end_nav, backward.start_nav);
        assert!(forward.net_profit > 0.0);
        assert!(backward.net_profit < 0.0);
    }

    #[tokio::test]
    async fn test_non_trading_start_resolves_forward() {
        let provider = StaticNavProvider::new(vec![
            RawNavRecord::new("07-04-2006", "10.0"),
            RawNavRecord::new("10-04-2006", "20.0"),
            RawNavRecord::new("11-04-2006", "25.0"),
        ]);
        let calculator = ProfitCalculator::new(provider, DEFAULT_LOOKAHEAD_DAYS);
        let request = ProfitRequest::new("123456", "08-04-2006", "11-04-2006", 1000.0);

        let breakdown = calculator.compute(&request).await.unwrap();

        assert_eq!(breakdown.start_date, date(10, 4, 2006));
        assert_eq!(breakdown.start_nav, 20.0);
        assert_eq!(breakdown.net_profit, 250.0);
    }
}
