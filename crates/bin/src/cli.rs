//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use stockscope::{InsightGenerator, OpenAiInsights, Stockscope};
use tracing::debug;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Parser)]
#[command(name = "stockscope")]
#[command(about = "Fundamental and technical stock analysis", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub(crate) log_level: String,

    #[command(flatten)]
    pub(crate) insights: InsightArgs,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Analyze one ticker and print the analysis as JSON
    Analyze {
        /// Ticker symbol
        ticker: String,
    },

    /// Analyze several tickers side by side
    Compare {
        /// Ticker symbols (at least two)
        #[arg(required = true)]
        tickers: Vec<String>,
    },

    /// Analyze a ticker and write its PDF report
    Report {
        /// Ticker symbol
        ticker: String,

        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show the day's top gainers and losers
    Movers,

    /// Show a ticker's latest headlines, or the market headlines without one
    News {
        /// Ticker symbol
        ticker: Option<String>,
    },

    /// Run the JSON HTTP server
    Serve {
        /// Listen address
        #[arg(long, env = "STOCKSCOPE_ADDR", default_value = "0.0.0.0:8888")]
        addr: SocketAddr,
    },
}

/// Settings for the OpenAI-compatible insights backend.
#[derive(Debug, Args)]
pub(crate) struct InsightArgs {
    /// API key; insights are disabled without one
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub(crate) openai_api_key: Option<String>,

    /// Base URL of the chat completions API
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub(crate) openai_base_url: Option<String>,

    /// Chat model
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub(crate) openai_model: String,
}

impl InsightArgs {
    /// Builds the generator if an API key is configured.
    pub(crate) fn generator(&self) -> Option<Arc<dyn InsightGenerator>> {
        let key = self.openai_api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let mut generator = OpenAiInsights::new(key).with_model(&self.openai_model);
        if let Some(base_url) = &self.openai_base_url {
            generator = generator.with_base_url(base_url);
        }
        Some(Arc::new(generator))
    }
}

impl Cli {
    /// Builds the service the subcommands run against.
    pub(crate) fn service(&self) -> Stockscope {
        let service = Stockscope::yahoo();
        match self.insights.generator() {
            Some(generator) => service.with_insights(generator),
            None => {
                debug!("OPENAI_API_KEY not set, insights disabled");
                service
            }
        }
    }
}
