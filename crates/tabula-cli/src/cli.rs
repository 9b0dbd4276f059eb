//! CLI argument definitions for `tabula`.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use tabula_cli::logging::{LogConfig, LogFormat};
use tabula_cli::query::{ColumnRef, FilterArg, PerPageArg, SortArg, ViewQuery};

#[derive(Parser)]
#[command(
    name = "tabula",
    version,
    about = "Sort, filter, search and page through CSV tables",
    long_about = "Load a CSV file into the tabula table engine and print one page of it.\n\n\
                  Column types are inferred from the data unless a JSON options file\n\
                  configures them. COL arguments accept a 0-based index or a heading title."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging for this run. Without `-v`/`-q` or `--log-level` the
    /// workspace default applies: `RUST_LOG` when set, else warnings.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from).or_else(|| {
            self.verbosity
                .is_present()
                .then(|| self.verbosity.tracing_level_filter())
        });
        let mut config = LogConfig::default()
            .with_format(self.log_format.into())
            .with_log_file(self.log_file.clone())
            .with_ansi(self.ansi_enabled());
        if let Some(level) = explicit {
            config = config.with_level_filter(level);
            config.use_env_filter = false;
        }
        config
    }

    fn ansi_enabled(&self) -> bool {
        match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one page of a CSV table.
    View(ViewArgs),

    /// Print the resolved settings of every column.
    Columns(ColumnsArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// CSV file whose first record holds the headings.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON table options (columns, perPage, labels, ...).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Sort column with an optional direction, e.g. `price:desc`.
    #[arg(long = "sort", value_name = "COL[:asc|desc]")]
    pub sort: Option<SortArg>,

    /// Keep rows matching every word of TERM.
    #[arg(long = "search", value_name = "TERM")]
    pub search: Option<String>,

    /// Restrict the search to this column (repeatable).
    #[arg(long = "search-column", value_name = "COL", requires = "search")]
    pub search_columns: Vec<ColumnRef>,

    /// Keep rows whose column equals VALUE (repeatable, OR-ed per column).
    #[arg(long = "filter", value_name = "COL=VALUE")]
    pub filters: Vec<FilterArg>,

    /// Page to print, starting at 1.
    #[arg(long = "page", value_name = "N")]
    pub page: Option<usize>,

    /// Rows per page, or `all`.
    #[arg(long = "per-page", value_name = "N|all")]
    pub per_page: Option<PerPageArg>,
}

impl ViewArgs {
    pub fn query(&self) -> ViewQuery {
        ViewQuery {
            sort: self.sort.clone(),
            search: self.search.clone(),
            search_columns: self.search_columns.clone(),
            filters: self.filters.clone(),
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Parser)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
