use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfprofit::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the HTTP server
    Serve {
        /// Address to bind, overrides the configuration
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Calculate profit for one or more schemes
    Profit {
        /// Purchase date (dd-mm-yyyy)
        #[arg(short, long)]
        start: String,
        /// Redemption date (dd-mm-yyyy)
        #[arg(short, long)]
        end: String,
        /// Initial investment amount
        #[arg(long)]
        capital: Option<f64>,
        /// Scheme codes
        #[arg(required = true)]
        scheme_codes: Vec<String>,
    },
}

impl From<Commands> for mfprofit::AppCommand {
    fn from(cmd: Commands) -> mfprofit::AppCommand {
        match cmd {
            Commands::Serve { host, port } => mfprofit::AppCommand::Serve { host, port },
            Commands::Profit {
                start,
                end,
                capital,
                scheme_codes,
            } => mfprofit::AppCommand::Profit {
                scheme_codes,
                start_date: start,
                end_date: end,
                capital,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mfprofit::cli::setup::setup(),
        Some(cmd) => mfprofit::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
