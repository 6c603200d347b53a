//! `wavescan`: live terminal view of nearby wireless networks.
//!
//! A background probe worker refreshes the scan list; every tick the view
//! sorts, aggregates and repaints it, skipping the tick while a scan is
//! being installed. Sorting is switched with single keys (`a`/`d` for
//! direction; `c`, `C`, `e`, `s`, `o`, `O` for the key).
//!
//! Scan data comes from a recorded JSON fixture (`--fixture`, or the
//! bundled demo capture). Logs go to a file (default `/tmp/wavescan.log`)
//! so they never corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod surface;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wavescan_config::Config;
use wavescan_core::{ReplayProbe, SortKey};

use crate::app::{App, AppOptions};

/// Scan capture replayed when no fixture is configured.
const DEMO_SCAN: &str = include_str!("../assets/demo_scan.json");

/// Sort key as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Channel,
    Signal,
    Essid,
    Open,
    ChannelSignal,
    OpenSignal,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Channel => Self::Channel,
            SortArg::Signal => Self::Signal,
            SortArg::Essid => Self::Essid,
            SortArg::Open => Self::Open,
            SortArg::ChannelSignal => Self::ChannelSignal,
            SortArg::OpenSignal => Self::OpenSignal,
        }
    }
}

/// Live view of nearby wireless networks.
#[derive(Parser, Debug)]
#[command(name = "wavescan", version, about)]
struct Cli {
    /// Initial sort key
    #[arg(short = 's', long, value_enum)]
    sort: Option<SortArg>,

    /// Sort descending (default ascending)
    #[arg(short = 'd', long, conflicts_with = "ascending")]
    descending: bool,

    /// Sort ascending
    #[arg(short = 'a', long)]
    ascending: bool,

    /// Channels listed in the summary histogram (1-16)
    #[arg(short = 'k', long)]
    channel_stats: Option<usize>,

    /// Milliseconds between scan cycles
    #[arg(short = 'i', long)]
    scan_interval_ms: Option<u64>,

    /// Recorded scan (JSON) to replay
    #[arg(short = 'f', long)]
    fixture: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Log file path (defaults to /tmp/wavescan.log)
    #[arg(long, default_value = "/tmp/wavescan.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line flags win over the config file and environment.
    fn apply(&self, cfg: &mut Config) {
        if let Some(sort) = self.sort {
            cfg.sort.key = sort.into();
        }
        if self.descending {
            cfg.sort.ascending = false;
        } else if self.ascending {
            cfg.sort.ascending = true;
        }
        if let Some(k) = self.channel_stats {
            cfg.channel_stats = k;
        }
        if let Some(ms) = self.scan_interval_ms {
            cfg.scan_interval_ms = ms;
        }
        if let Some(path) = &self.fixture {
            cfg.fixture = Some(path.clone());
        }
    }
}

/// File-based tracing. Nothing may be logged to stdout/stderr while the
/// terminal is in raw mode. Hold the guard for the program's lifetime.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wavescan={log_level},wavescan_core={log_level},wavescan_config={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wavescan.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .init();

    guard
}

fn load_probe(cfg: &Config) -> Result<ReplayProbe> {
    match &cfg.fixture {
        Some(path) => ReplayProbe::load(path)
            .wrap_err_with(|| format!("cannot replay {}", path.display())),
        None => Ok(ReplayProbe::from_json(DEMO_SCAN, Path::new("demo_scan.json"))?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let mut cfg = wavescan_config::load_config().wrap_err("invalid configuration")?;
    cli.apply(&mut cfg);
    cfg.validate()?;

    if cli.save_config {
        let path = wavescan_config::save_config(&cfg)?;
        println!("saved {}", path.display());
        return Ok(());
    }

    let probe = load_probe(&cfg)?;
    info!(
        sort = %cfg.sort_config().key,
        order = %cfg.sort_config().order,
        snapshots = probe.len(),
        "starting wavescan"
    );

    let options = AppOptions {
        render: cfg.render_config(),
        scan_interval: cfg.scan_interval(),
        tick_rate: cfg.tick_rate(),
    };
    let mut app = App::new(probe, options);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "wavescan",
            "--sort",
            "open-signal",
            "-d",
            "-k",
            "5",
            "--fixture",
            "/tmp/capture.json",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);

        assert_eq!(cfg.sort.key, SortKey::OpenSignal);
        assert!(!cfg.sort.ascending);
        assert_eq!(cfg.channel_stats, 5);
        assert_eq!(cfg.fixture, Some(PathBuf::from("/tmp/capture.json")));
        assert_eq!(cfg.scan_interval_ms, Config::default().scan_interval_ms);
    }

    #[test]
    fn direction_flags_conflict() {
        assert!(Cli::try_parse_from(["wavescan", "-a", "-d"]).is_err());
    }

    #[test]
    fn bundled_demo_scan_parses() {
        let probe = load_probe(&Config::default()).unwrap();
        assert!(probe.len() >= 2);
    }
}
