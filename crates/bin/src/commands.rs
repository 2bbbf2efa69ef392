//! Subcommand execution.

use anyhow::{anyhow, bail};
use chrono::Local;
use serde::Serialize;
use stockscope::Stockscope;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::server;

/// Runs the parsed command line.
pub(crate) async fn run(cli: Cli) -> anyhow::Result<()> {
    let service = cli.service();
    let pretty = cli.pretty;

    match cli.command {
        Command::Analyze { ticker } => {
            let outcome = service.analyze(&ticker).await.map_err(user_error)?;
            print_json(&outcome, pretty)?;
            if !outcome.is_success() {
                bail!("analysis failed for {}", outcome.ticker());
            }
        }
        Command::Compare { tickers } => {
            let comparison = service.compare(&tickers).await.map_err(user_error)?;
            print_json(&comparison, pretty)?;
        }
        Command::Report { ticker, output_dir } => {
            let path = service
                .analyze_and_save(&ticker, Local::now().naive_local(), &output_dir)
                .await
                .map_err(user_error)?;
            info!(path = %path.display(), "Report written");
            println!("{}", path.display());
        }
        Command::Movers => {
            let movers = movers(&service).await;
            print_json(&movers, pretty)?;
        }
        Command::News { ticker: Some(ticker) } => {
            let news = service.news(&ticker).await.map_err(user_error)?;
            print_json(&server::NewsResponse::new(news), pretty)?;
        }
        Command::News { ticker: None } => {
            let headlines = service.market_news();
            print_json(&server::MarketNewsResponse::new(headlines), pretty)?;
        }
        Command::Serve { addr } => {
            server::serve(service, addr).await?;
        }
    }

    Ok(())
}

async fn movers(service: &Stockscope) -> server::MoversResponse {
    server::MoversResponse::new(service.movers(Local::now().date_naive()).await)
}

fn user_error(err: stockscope::Error) -> anyhow::Error {
    anyhow!(err.user_message())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
