//! Command line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ADVICE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ADVICE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ADVICE_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(
    name = "finance-planner",
    about = "Personal finance planner: budget, emergency fund, SIP goal and corpus projection"
)]
pub struct Cli {
    /// Log level for this crate. RUST_LOG overrides it when set.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,

    #[command(flatten)]
    pub advice: AdviceArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the planning form and JSON API
    Serve(ServeArgs),
    /// Compute a plan and print it
    Plan(PlanArgs),
    /// Compute a plan and write it as an Excel workbook
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FINPLAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(long, env = "FINPLAN_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// JSON form payload; fields left out keep the default form values
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Ask the advice service this question about the computed plan
    #[arg(long)]
    pub ask: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Defaults to personal_finance_plan_<date>.xlsx in the working directory
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AdviceArgs {
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub advice_api_key: Option<String>,
    #[arg(long, global = true, env = "FINPLAN_ADVICE_MODEL", default_value = DEFAULT_ADVICE_MODEL)]
    pub advice_model: String,
    #[arg(long, global = true, env = "FINPLAN_ADVICE_ENDPOINT", default_value = DEFAULT_ADVICE_ENDPOINT)]
    pub advice_endpoint: String,
    #[arg(long, global = true, default_value_t = DEFAULT_ADVICE_TIMEOUT_SECS)]
    pub advice_timeout_secs: u64,
}

/// Resolved settings for the language-model advice client.
#[derive(Debug, Clone)]
pub struct AdviceSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ADVICE_MODEL.to_string(),
            endpoint: DEFAULT_ADVICE_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_ADVICE_TIMEOUT_SECS),
        }
    }
}

impl From<AdviceArgs> for AdviceSettings {
    fn from(args: AdviceArgs) -> Self {
        Self {
            api_key: args.advice_api_key.filter(|key| !key.trim().is_empty()),
            model: args.advice_model,
            endpoint: args.advice_endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(args.advice_timeout_secs.max(1)),
        }
    }
}

/// Installs the stderr tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
