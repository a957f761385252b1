mod data;
mod error;
mod model;
mod tui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use data::{DataClient, RawResponse, DEFAULT_API_ROOT};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root URL every request is issued against
    #[arg(long, env = "NHL_API_ROOT", default_value = DEFAULT_API_ROOT)]
    api_root: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the most recent games
    Schedule,
    /// Print the raw response for all current teams
    Teams,
    /// Print the raw response for a single team
    Team {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Live scoreboard in the terminal
    Watch {
        /// Update interval in seconds
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut client = DataClient::with_api_root(args.api_root);

    match args.command.unwrap_or(Command::Schedule) {
        Command::Schedule => {
            let text = client.fetch_schedule().await.context("fetching schedule")?;
            io::stdout().write_all(text.as_bytes())?;
        }
        Command::Teams => {
            let resp = client.fetch_teams().await.context("fetching teams")?;
            print_raw(&resp)?;
        }
        Command::Team { id } => {
            let resp = client
                .fetch_team(id)
                .await
                .with_context(|| format!("fetching team {}", id))?;
            print_raw(&resp)?;
        }
        Command::Watch { interval } => {
            tui::run(client, Duration::from_secs(interval)).await?;
        }
    }

    Ok(())
}

fn print_raw(resp: &RawResponse) -> io::Result<()> {
    if !resp.status.is_success() {
        warn!(status = %resp.status, "API responded with an error status");
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(&resp.body)?;
    stdout.write_all(b"\n")
}
