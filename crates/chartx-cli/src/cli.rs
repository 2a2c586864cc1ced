//! CLI argument definitions for chartx.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `entities` | List loaded entities |
//! | `calendar` | Convert between dates and trading-day indices |
//! | `moving-average` | Moving-average overlay for one entity |
//! | `evaluate` | Correlations and window statistics for a selection |
//! | `range` | Visible price range over a date range |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--data-dir` | `$CHARTX_DATA_DIR` or `stockdata` | Directory of price files |
//! | `--origin` | `2010-01-01` | Date assigned trading-day index 0 |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--log-level` | `$RUST_LOG` or `warn` | Tracing filter for stderr logs |
//!
//! # Examples
//!
//! ```bash
//! chartx entities --format table
//! chartx calendar --date 2012-06-15
//! chartx moving-average Acme --width 20 --from 2012-01-02 --to 2012-03-30
//! chartx evaluate Acme Globex --span 3m --pretty
//! chartx range Acme Globex --from 2012-01-02 --to 2012-03-30
//! ```

use std::path::PathBuf;

use chartx_core::{Timespan, TradingDate};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Chart explorer engine for daily OHLC price data.
#[derive(Debug, Parser)]
#[command(
    name = "chartx",
    author,
    version,
    about = "Explore daily OHLC price data across many entities"
)]
pub struct Cli {
    /// Directory holding grouped-column CSV price files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Calendar date assigned trading-day index 0.
    #[arg(long, global = true, value_parser = parse_date)]
    pub origin: Option<TradingDate>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log filter directive, e.g. `debug` or `chartx_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List loaded entities with bar counts and date extents.
    Entities,

    /// Convert a date to its trading-day index or back.
    ///
    ///   chartx calendar --date 2012-06-16
    ///   chartx calendar --index 600
    Calendar(CalendarArgs),

    /// Moving-average overlay aligned with an entity's bars.
    MovingAverage(MovingAverageArgs),

    /// Pairwise correlations and per-entity statistics over a selection.
    ///
    ///   chartx evaluate Acme Globex --from 2012-01-02 --to 2012-03-30
    ///   chartx evaluate Acme Globex --span 1y
    Evaluate(EvaluateArgs),

    /// Lowest low and highest high of the given entities over a date range.
    Range(RangeArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct CalendarArgs {
    #[arg(long, value_parser = parse_date)]
    pub date: Option<TradingDate>,

    #[arg(long, allow_hyphen_values = true)]
    pub index: Option<i64>,
}

#[derive(Debug, Args)]
pub struct MovingAverageArgs {
    pub entity: String,

    /// Window width in trading days. Widths below 2 return the closes.
    #[arg(long)]
    pub width: f64,

    #[arg(long, value_parser = parse_date)]
    pub from: Option<TradingDate>,

    #[arg(long, value_parser = parse_date)]
    pub to: Option<TradingDate>,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[arg(required = true)]
    pub entities: Vec<String>,

    #[arg(long, value_parser = parse_date, requires = "to", conflicts_with = "span")]
    pub from: Option<TradingDate>,

    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<TradingDate>,

    /// Trailing preset: all, 3y, 1y, 3m, 1m, 1w.
    #[arg(long, value_parser = parse_timespan, required_unless_present = "from")]
    pub span: Option<Timespan>,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    #[arg(required = true)]
    pub entities: Vec<String>,

    #[arg(long, value_parser = parse_date)]
    pub from: TradingDate,

    #[arg(long, value_parser = parse_date)]
    pub to: TradingDate,
}

fn parse_date(input: &str) -> Result<TradingDate, String> {
    TradingDate::parse(input).map_err(|error| error.to_string())
}

fn parse_timespan(input: &str) -> Result<Timespan, String> {
    input.parse::<Timespan>().map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evaluate_with_span() {
        let cli = Cli::try_parse_from(["chartx", "evaluate", "Acme", "Globex", "--span", "3m"])
            .expect("valid arguments");
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.entities, vec!["Acme", "Globex"]);
        assert_eq!(args.span, Some(Timespan::ThreeMonths));
    }

    #[test]
    fn evaluate_requires_a_window() {
        let err = Cli::try_parse_from(["chartx", "evaluate", "Acme"]).expect_err("must fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn calendar_accepts_negative_index() {
        let cli = Cli::try_parse_from(["chartx", "calendar", "--index", "-3"]).expect("valid arguments");
        let Command::Calendar(args) = cli.command else {
            panic!("expected calendar");
        };
        assert_eq!(args.index, Some(-3));
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = Cli::try_parse_from(["chartx", "range", "A", "--from", "2012/01/01", "--to", "2012-02-01"])
            .expect_err("must fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["chartx", "entities", "--format", "table", "--strict"])
            .expect("valid arguments");
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.strict);
    }
}
