pub mod api;
pub mod cli;
pub mod core;
pub mod providers;

use crate::core::ProfitCalculator;
use crate::core::config::AppConfig;
use crate::providers::mfapi_provider::MfApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
    Profit {
        scheme_codes: Vec<String>,
        start_date: String,
        end_date: String,
        capital: Option<f64>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub fn build_calculator(config: &AppConfig) -> Result<Arc<ProfitCalculator>> {
    let provider = MfApiProvider::new(&config.provider)?;
    Ok(Arc::new(ProfitCalculator::new(
        Arc::new(provider),
        config.lookahead_days,
    )))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;
    let calculator = build_calculator(&config)?;

    match command {
        AppCommand::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Mutual fund profit server starting...");
            let state = api::AppState {
                calculator,
                default_capital: config.default_capital,
            };
            api::serve(&config.server, state).await
        }
        AppCommand::Profit {
            scheme_codes,
            start_date,
            end_date,
            capital,
        } => {
            cli::profit::run(
                &calculator,
                &scheme_codes,
                &start_date,
                &end_date,
                capital.unwrap_or(config.default_capital),
            )
            .await
        }
    }
}
