use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{fmt, EnvFilter};

use caller_stats::acquisition::AcquisitionController;
use caller_stats::analysis::report::TP_LONG_WINDOW;
use caller_stats::analysis::{CallerReport, TpStudy};
use caller_stats::config::Config;
use caller_stats::models::AcquisitionMode;
use caller_stats::source::{CallSource, RemoteRenderSource, SnapshotSource};

#[derive(Parser, Debug)]
#[command(
    name = "caller-stats",
    about = "Performance statistics for a caller's public call history"
)]
struct Cli {
    /// Caller whose page is loaded.
    caller: String,

    #[command(subcommand)]
    command: Commands,

    /// Replay a saved caller page instead of rendering it live.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Statistics over the most recent calls.
    Calls {
        #[arg(default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Statistics over every call in the last N days.
    Days {
        #[arg(default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
    /// Statistics over the last 24 hours.
    #[command(name = "24h", alias = "recent")]
    Recent,
    /// Take-profit study over the last 25 and 50 calls.
    Tp,
}

impl Commands {
    fn mode(&self) -> AcquisitionMode {
        match self {
            Commands::Calls { count } => AcquisitionMode::ByCallCount(*count as usize),
            Commands::Days { days } => AcquisitionMode::ByDayWindow(*days),
            Commands::Recent => AcquisitionMode::ByRecentWindow24h,
            Commands::Tp => AcquisitionMode::ByCallCount(TP_LONG_WINDOW),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::new(Rfc3339))
        .init();

    let cli = Cli::parse();

    let mut source: Box<dyn CallSource> = match &cli.snapshot {
        Some(path) => Box::new(SnapshotSource::load(path, cfg.snapshot_page_size)?),
        None => Box::new(RemoteRenderSource::new(&cfg)?),
    };

    let mode = cli.command.mode();

    let controller = AcquisitionController::new(&cfg);
    let acquisition = match controller
        .fetch_caller(source.as_mut(), &cli.caller, mode, Utc::now())
        .await
    {
        Ok(a) => a,
        Err(e) if e.is_empty_result() => {
            println!("No trades found for {}.", cli.caller);
            return Ok(());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("Scraping failed for {}", cli.caller)))
        }
    };

    match cli.command {
        Commands::Tp => {
            let study = TpStudy::build(&cli.caller, &acquisition.trades);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&study)?);
            } else {
                study.print();
            }
        }
        _ => {
            let report = CallerReport::build(&cli.caller, mode.label(), &acquisition.trades);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_summary();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("caller-stats").chain(line.split_whitespace()))
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_modes() {
        let cli = parse("alice calls 25").unwrap();
        assert_eq!(cli.caller, "alice");
        assert_eq!(cli.command.mode(), AcquisitionMode::ByCallCount(25));

        let cli = parse("bob days").unwrap();
        assert_eq!(cli.command.mode(), AcquisitionMode::ByDayWindow(4));

        let cli = parse("bob calls").unwrap();
        assert_eq!(cli.command.mode(), AcquisitionMode::ByCallCount(50));

        let cli = parse("bob recent").unwrap();
        assert_eq!(cli.command, Commands::Recent);

        let cli = parse("bob tp --json").unwrap();
        assert_eq!(cli.command, Commands::Tp);
        assert_eq!(cli.command.mode(), AcquisitionMode::ByCallCount(TP_LONG_WINDOW));
        assert!(cli.json);
    }

    #[test]
    fn parses_snapshot_flag() {
        let cli = parse("carol 24h --snapshot page.html").unwrap();
        assert_eq!(cli.snapshot, Some(PathBuf::from("page.html")));
        assert_eq!(cli.command.mode(), AcquisitionMode::ByRecentWindow24h);
        assert!(!cli.json);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("alice").is_err());
        assert!(parse("alice weeks 3").is_err());
        assert!(parse("alice calls 0").is_err());
        assert!(parse("alice days 0").is_err());
        assert!(parse("alice days ten").is_err());
        assert!(parse("alice 24h --snapshot").is_err());
    }
}
