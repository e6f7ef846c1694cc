use almanac_core::{time::parse_date, time::today_in, Period};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod daily;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "almanac",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ALMANAC_BUILD_SHA"), ")"),
    about = "Decide which day a holiday / solar-term notice should go out"
)]
struct Cli {
    /// Config file (default: ~/.almanac/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether a notice fires today and print the handoff
    Check {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Fall back to the nearest upcoming special date when nothing fires
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Rebuild the stored schedule even if it is current
        #[arg(long, default_value_t = false)]
        regenerate: bool,

        /// Compute the schedule in memory; do not touch the store
        #[arg(long, default_value_t = false)]
        on_demand: bool,
    },

    /// Print the schedule for a period
    Schedule {
        /// Period id (YYYY-MM); defaults to the current month
        #[arg(long)]
        period: Option<String>,

        #[arg(long, default_value_t = false)]
        regenerate: bool,
    },

    /// Is the given date a workday?
    Workday {
        /// YYYY-MM-DD
        date: String,
    },

    /// List special dates in the next N days
    Upcoming {
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Write a default config file
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "almanac=debug,almanac_core=debug,almanac_ingest=debug"
    } else {
        "almanac=info,almanac_core=info,almanac_ingest=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Errors skip the day's action; they never take the scheduler down with a panic.
    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::InitConfig = cli.command {
        return config::init_config(cli.config.as_deref());
    }

    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check {
            date,
            force,
            regenerate,
            on_demand,
        } => {
            let today = resolve_today(&cfg, date.as_deref())?;
            daily::run_check(&cfg, today, force, regenerate, on_demand)?;
        }

        Command::Schedule { period, regenerate } => {
            let period = match period {
                Some(id) => Period::parse(&id)?,
                None => Period::containing(resolve_today(&cfg, None)?),
            };
            daily::run_schedule(&cfg, period, regenerate)?;
        }

        Command::Workday { date } => {
            daily::run_workday(&cfg, parse_date(&date)?)?;
        }

        Command::Upcoming { date, days } => {
            let today = resolve_today(&cfg, date.as_deref())?;
            daily::run_upcoming(&cfg, today, days)?;
        }

        Command::InitConfig => {}
    }

    Ok(())
}

fn resolve_today(cfg: &config::Config, date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => today_in(&cfg.calendar.timezone, Utc::now())
            .with_context(|| format!("config calendar.timezone = {}", cfg.calendar.timezone)),
    }
}
