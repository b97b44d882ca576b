use crate::core::config::ProviderConfig;
use crate::core::nav::{NAV_DATE_FORMAT, NavProvider, RawNavRecord};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.mfapi.in";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// NAV history from mfapi.in
pub struct MfApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MfApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn try_fetch(
        &self,
        scheme_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawNavRecord>> {
        let url = format!(
            "{}/mf/{}?start={}&end={}",
            self.base_url,
            scheme_code,
            start.format(NAV_DATE_FORMAT),
            end.format(NAV_DATE_FORMAT)
        );
        debug!("Requesting NAV history from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request for scheme: {scheme_code}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Unexpected status {} for scheme: {}",
                status,
                scheme_code
            ));
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for scheme: {scheme_code}"))?;

        let nav_response: MfApiResponse =
            serde_json::from_str(&response_text).with_context(|| {
                format!(
                    "Failed to parse NAV response for scheme: {scheme_code}. Response: '{response_text}'",
                )
            })?;

        info!(
            status = status.as_u16(),
            records = nav_response.data.len(),
            "Successfully fetched NAV data"
        );
        Ok(nav_response.data)
    }
}

#[derive(Debug, Deserialize)]
struct MfApiResponse {
    data: Vec<RawNavRecord>,
}

#[async_trait]
impl NavProvider for MfApiProvider {
    #[instrument(name = "MfApiNavFetch", skip(self), fields(scheme_code = %scheme_code))]
    async fn fetch_nav_history(
        &self,
        scheme_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<RawNavRecord> {
        match self.try_fetch(scheme_code, start, end).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = ?e, "Failed fetching NAV data");
                Vec::new()
            }
        }
    }
}
