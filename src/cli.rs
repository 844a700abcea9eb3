//! CLI definition and dispatch.
//!
//! Every command re-reads the statement and rebuilds the grouped result from
//! scratch; nothing is cached between invocations.

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_statement_adapter::HtmlStatementAdapter;
use crate::adapters::pine_script::{IconSize, PineScriptAdapter};
use crate::domain::classify::{GroupedTrades, classify};
use crate::domain::clock::{
    ClockOffsets, DEFAULT_BROKER_UTC_OFFSET_HOURS, DEFAULT_DISPLAY_CORRECTION_HOURS,
    DEFAULT_DISPLAY_UTC_OFFSET_HOURS,
};
use crate::domain::error::TradeplotError;
use crate::domain::summary::InstrumentSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::script_port::ScriptPort;
use crate::ports::statement_port::StatementPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradeplot",
    about = "Annotate chart entries and exits from a broker trade history"
)]
pub struct Cli {
    /// INI file with [classify], [clock] and [script] settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log parsing and classification details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print per-instrument outcome counts and profit
    Summary {
        #[arg(short, long)]
        report: PathBuf,
        /// Breakeven band around zero profit; negative or non-numeric means 0
        #[arg(short, long, allow_hyphen_values = true)]
        tolerance: Option<String>,
    },
    /// List instruments found in the report
    List {
        #[arg(short, long)]
        report: PathBuf,
    },
    /// Generate Pine Script annotations
    Generate {
        #[arg(short, long)]
        report: PathBuf,
        #[arg(short, long, allow_hyphen_values = true)]
        tolerance: Option<String>,
        #[arg(long)]
        icon_size: Option<IconSize>,
        #[arg(short, long, conflicts_with = "all", required_unless_present = "all")]
        instrument: Option<String>,
        /// Write the script here instead of stdout
        #[arg(short, long, conflicts_with = "all")]
        output: Option<PathBuf>,
        /// Generate one script per instrument
        #[arg(long, requires = "output_dir")]
        all: bool,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Resolved run settings: config file values with CLI overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tolerance: f64,
    pub clock: ClockOffsets,
    pub icon_size: IconSize,
    pub template_path: Option<PathBuf>,
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Summary { report, tolerance } => {
            let settings = build_settings(&config, tolerance.as_deref(), None)?;
            run_summary(&report, &settings)
        }
        Command::List { report } => {
            let settings = build_settings(&config, None, None)?;
            run_list(&report, &settings)
        }
        Command::Generate {
            report,
            tolerance,
            icon_size,
            instrument,
            output,
            all: _,
            output_dir,
        } => {
            let settings = build_settings(&config, tolerance.as_deref(), icon_size)?;
            match (instrument, output_dir) {
                (Some(instrument), _) => {
                    run_generate_one(&report, &settings, &instrument, output.as_deref())
                }
                (None, Some(dir)) => run_generate_all(&report, &settings, &dir),
                (None, None) => unreachable!("clap requires --instrument or --all --output-dir"),
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_report_error() {
                eprintln!("hint: export the account history as a detailed HTML statement and retry");
            }
            (&e).into()
        }
    }
}

/// Load the INI file if one was given; otherwise every setting uses its default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TradeplotError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| TradeplotError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::default()),
    }
}

/// Negative, NaN and infinite tolerances become 0.
pub fn clamp_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        0.0
    }
}

/// Parse a user-entered tolerance, treating non-numeric text as 0.
pub fn parse_tolerance(input: &str) -> f64 {
    clamp_tolerance(input.trim().parse::<f64>().unwrap_or(0.0))
}

pub fn build_settings(
    config: &dyn ConfigPort,
    tolerance_override: Option<&str>,
    icon_size_override: Option<IconSize>,
) -> Result<Settings, TradeplotError> {
    let tolerance = match tolerance_override {
        Some(input) => parse_tolerance(input),
        None => clamp_tolerance(config.get_double("classify", "breakeven_tolerance", 0.0)),
    };

    let clock = ClockOffsets {
        broker_utc_offset_hours: offset_hours(
            config,
            "broker_utc_offset_hours",
            DEFAULT_BROKER_UTC_OFFSET_HOURS,
        )?,
        display_utc_offset_hours: offset_hours(
            config,
            "display_utc_offset_hours",
            DEFAULT_DISPLAY_UTC_OFFSET_HOURS,
        )?,
        display_correction_hours: offset_hours(
            config,
            "display_correction_hours",
            DEFAULT_DISPLAY_CORRECTION_HOURS,
        )?,
    };

    let icon_size = match icon_size_override {
        Some(size) => size,
        None => match config.get_string("script", "icon_size") {
            Some(value) => value
                .parse::<IconSize>()
                .map_err(|reason| TradeplotError::ConfigInvalid {
                    section: "script".into(),
                    key: "icon_size".into(),
                    reason,
                })?,
            None => IconSize::default(),
        },
    };

    Ok(Settings {
        tolerance,
        clock,
        icon_size,
        template_path: config.get_string("script", "template_path").map(PathBuf::from),
    })
}

fn offset_hours(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, TradeplotError> {
    if let Some(value) = config.get_string("clock", key) {
        if value.trim().parse::<i64>().is_err() {
            return Err(TradeplotError::ConfigInvalid {
                section: "clock".into(),
                key: key.into(),
                reason: format!("{value:?} is not a whole number of hours"),
            });
        }
    }
    let hours = config.get_int("clock", key, default);
    if (-24..=24).contains(&hours) {
        Ok(hours)
    } else {
        Err(TradeplotError::ConfigInvalid {
            section: "clock".into(),
            key: key.into(),
            reason: format!("{hours} is outside -24..=24 hours"),
        })
    }
}

/// Read, parse and classify a statement file.
pub fn load_grouped(
    statement: &dyn StatementPort,
    report_path: &Path,
    settings: &Settings,
) -> Result<GroupedTrades, TradeplotError> {
    eprintln!("Reading report {}", report_path.display());
    let raw = fs::read(report_path)?;
    let trades = statement.parse_trades(&raw)?;
    tracing::info!(trades = trades.len(), tolerance = settings.tolerance, "parsed report");
    Ok(classify(&trades, settings.tolerance, &settings.clock))
}

pub fn build_script_adapter(settings: &Settings) -> Result<PineScriptAdapter, TradeplotError> {
    let adapter = PineScriptAdapter::new(settings.clock).with_icon_size(settings.icon_size);
    match &settings.template_path {
        Some(path) => {
            let template = fs::read_to_string(path).map_err(|e| TradeplotError::Template {
                reason: format!("failed to read template {}: {}", path.display(), e),
            })?;
            Ok(adapter.with_template(template))
        }
        None => Ok(adapter),
    }
}

/// File name for an instrument's script, with path-unsafe characters replaced.
pub fn script_file_name(instrument: &str) -> String {
    let stem: String = instrument
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.pine")
}

/// [`script_file_name`], suffixed `-2`, `-3`, ... when an earlier instrument
/// already sanitized to the same name.
pub fn unique_script_file_name(instrument: &str, taken: &mut HashSet<String>) -> String {
    let base = script_file_name(instrument);
    let mut name = base.clone();
    let mut n = 1;
    while taken.contains(&name) {
        n += 1;
        name = format!("{}-{n}.pine", base.trim_end_matches(".pine"));
    }
    if n > 1 {
        tracing::warn!(instrument, file = %name, "script file name collision, using suffix");
    }
    taken.insert(name.clone());
    name
}

pub fn format_summary_table(summaries: &[InstrumentSummary]) -> String {
    let mut out = format!(
        "{:<12} {:>6} {:>6} {:>6} {:>12} {:>7}\n",
        "INSTRUMENT", "WIN", "BE", "LOSS", "NET", "WIN%"
    );
    for s in summaries {
        out.push_str(&format!(
            "{:<12} {:>6} {:>6} {:>6} {:>12.2} {:>6.1}%\n",
            s.instrument.to_uppercase(),
            s.winners,
            s.breakeven,
            s.losers,
            s.net_profit,
            s.win_rate * 100.0
        ));
    }
    out
}

fn run_summary(report: &Path, settings: &Settings) -> Result<(), TradeplotError> {
    let grouped = load_grouped(&HtmlStatementAdapter::new(), report, settings)?;
    let summaries = InstrumentSummary::compute_all(&grouped);
    print!("{}", format_summary_table(&summaries));
    eprintln!(
        "{} trades across {} instruments (breakeven tolerance {})",
        grouped.total_trades(),
        grouped.len(),
        settings.tolerance
    );
    Ok(())
}

fn run_list(report: &Path, settings: &Settings) -> Result<(), TradeplotError> {
    let grouped = load_grouped(&HtmlStatementAdapter::new(), report, settings)?;
    for instrument in grouped.instruments() {
        println!("{instrument}");
    }
    Ok(())
}

pub fn run_generate_one(
    report: &Path,
    settings: &Settings,
    instrument: &str,
    output: Option<&Path>,
) -> Result<(), TradeplotError> {
    let grouped = load_grouped(&HtmlStatementAdapter::new(), report, settings)?;
    let buckets = grouped
        .get(instrument)
        .ok_or_else(|| TradeplotError::UnknownInstrument(instrument.to_lowercase()))?;
    let adapter = build_script_adapter(settings)?;

    match output {
        Some(path) => {
            adapter.write(instrument, buckets, path)?;
            eprintln!("Script written to: {}", path.display());
        }
        None => print!("{}", adapter.render(instrument, buckets)?),
    }
    Ok(())
}

pub fn run_generate_all(
    report: &Path,
    settings: &Settings,
    output_dir: &Path,
) -> Result<(), TradeplotError> {
    let grouped = load_grouped(&HtmlStatementAdapter::new(), report, settings)?;
    let adapter = build_script_adapter(settings)?;

    let mut taken = HashSet::new();
    for (instrument, buckets) in grouped.iter() {
        let path = output_dir.join(unique_script_file_name(instrument, &mut taken));
        adapter.write(instrument, buckets, &path)?;
        eprintln!("  {}: {} markers -> {}", instrument, buckets.len(), path.display());
    }
    eprintln!("{} scripts written to {}", grouped.len(), output_dir.display());
    Ok(())
}
