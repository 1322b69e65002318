//! CLI definition and dispatch.

use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mock_adapter::MockAdapter;
use crate::adapters::report::{CsvReport, JsonReport, ReportFormat, TableReport};
use crate::domain::candle::Candle;
use crate::domain::config_validation::validate_config;
use crate::domain::error::{QueryError, StocksimError};
use crate::domain::holding::{Holding, PortfolioSummary};
use crate::domain::leaderboard::{DEFAULT_RANK_CRITERION, LeaderboardEntry, Standing, rank_by};
use crate::domain::order::Order;
use crate::domain::query::{DatePreset, DateRange, Filter, QueryParams, SortDirection, query};
use crate::domain::record::{FieldDef, Record, RecordKind, parse_timestamp};
use crate::domain::settings::{
    DEFAULT_CANDLE_SYMBOL, DataSourceKind, MockSettings, Settings, SourceName,
};
use crate::domain::watchlist::{WatchlistEntry, WatchlistTab};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::RecordSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Search, filter, sort and page simulated trading data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query one collection
    Query(QueryArgs),
    /// Show portfolio totals
    Summary {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t)]
        format: ReportFormat,
    },
    /// List the fields of a collection
    Fields {
        #[arg(short, long, value_enum)]
        kind: Collection,
    },
    /// Write a mock collection as CSV
    Generate {
        #[arg(short, long, value_enum)]
        kind: Collection,
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Orders,
    Holdings,
    Watchlist,
    Leaderboard,
    Candles,
}

impl Collection {
    /// Kind of the records a query over this collection returns.
    pub fn record_kind(self) -> RecordKind {
        match self {
            Collection::Orders => RecordKind::Order,
            Collection::Holdings => RecordKind::Holding,
            Collection::Watchlist => RecordKind::WatchlistEntry,
            Collection::Leaderboard => RecordKind::Standing,
            Collection::Candles => RecordKind::Candle,
        }
    }

    pub fn default_sort(self) -> &'static str {
        match self {
            Collection::Orders | Collection::Candles => "timestamp",
            Collection::Holdings | Collection::Watchlist => "symbol",
            Collection::Leaderboard => "rank",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(short, long, value_enum)]
    pub kind: Collection,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Case-insensitive substring over the collection's text fields
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Exact-match constraint, `field=value` or `field=a,b`; repeatable
    #[arg(long = "filter", value_name = "FIELD=VALUES", value_parser = Filter::parse)]
    pub filters: Vec<Filter>,
    #[arg(long, default_value = "all", value_parser = DatePreset::from_str)]
    pub date: DatePreset,
    /// Inclusive lower bound; overrides --date
    #[arg(long, value_parser = parse_instant)]
    pub from: Option<NaiveDateTime>,
    /// Inclusive upper bound; overrides --date
    #[arg(long, value_parser = parse_instant)]
    pub to: Option<NaiveDateTime>,
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Watchlist tab
    #[arg(long, default_value = "all", value_parser = WatchlistTab::from_str)]
    pub tab: WatchlistTab,
    /// Leaderboard ranking field; the highest value ranks first
    #[arg(long, default_value = DEFAULT_RANK_CRITERION)]
    pub rank_by: String,
    /// Rank the lowest value first
    #[arg(long)]
    pub rank_ascending: bool,
    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw)
        .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"))
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Query(args) => run_query(&args),
        Command::Summary { config, format } => run_summary(config.as_deref(), format),
        Command::Fields { kind } => run_fields(kind),
        Command::Generate {
            kind,
            output,
            config,
        } => run_generate(kind, output.as_deref(), config.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|err| fail(&err))
}

/// Settings from an optional config file; defaults when no file is given.
pub fn resolve_settings(config_path: Option<&Path>) -> Result<Settings, ExitCode> {
    let Some(path) = config_path else {
        return Ok(Settings::default());
    };
    let adapter = load_config(path)?;
    build_settings(&adapter).map_err(|err| fail(&err))
}

/// Validates `config`, then reads every key with its default.
pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, StocksimError> {
    validate_config(config)?;
    let defaults = Settings::default();

    let source = match config.get_nonempty("data", "source").map(|raw| raw.parse()) {
        Some(Ok(SourceName::Csv)) => DataSourceKind::Csv {
            dir: config
                .get_nonempty("data", "dir")
                .map(PathBuf::from)
                .unwrap_or_default(),
        },
        _ => DataSourceKind::Mock,
    };

    Ok(Settings {
        source,
        mock: MockSettings {
            seed: config.get_int("data", "seed", defaults.mock.seed as i64) as u64,
            now: config
                .get_nonempty("data", "now")
                .and_then(|raw| parse_timestamp(&raw)),
            orders: config.get_int("mock", "orders", defaults.mock.orders as i64) as usize,
            candle_days: config.get_int("mock", "candle_days", i64::from(defaults.mock.candle_days))
                as u32,
            symbol: config
                .get_nonempty("mock", "symbol")
                .unwrap_or_else(|| DEFAULT_CANDLE_SYMBOL.to_string()),
        },
        page_size: config.get_int("query", "page_size", defaults.page_size as i64) as usize,
    })
}

/// The instant date presets and mock timestamps are measured from.
pub fn reference_now(settings: &Settings) -> NaiveDateTime {
    settings
        .mock
        .now
        .unwrap_or_else(|| Local::now().naive_local())
}

pub fn open_source(settings: &Settings, now: NaiveDateTime) -> Box<dyn RecordSource> {
    match &settings.source {
        DataSourceKind::Mock => {
            tracing::info!(seed = settings.mock.seed, "using mock data");
            Box::new(MockAdapter::new(settings.mock.clone(), now))
        }
        DataSourceKind::Csv { dir } => {
            tracing::info!(dir = %dir.display(), "using CSV data");
            Box::new(CsvAdapter::new(dir.clone()))
        }
    }
}

/// User-facing text for `err`; unknown sort fields also list the valid ones.
pub fn error_message(err: &StocksimError) -> String {
    let mut message = format!("error: {err}\n");
    if let StocksimError::Query(QueryError::InvalidField { kind, .. }) = err {
        let names: Vec<&str> = schema_for(*kind).iter().map(|def| def.name).collect();
        message.push_str(&format!("valid fields: {}\n", names.join(", ")));
    }
    message
}

/// Prints `err` to stderr and maps it to the process exit code.
fn fail(err: &StocksimError) -> ExitCode {
    eprint!("{}", error_message(err));
    ExitCode::from(err)
}

pub fn schema_for(kind: RecordKind) -> &'static [FieldDef] {
    match kind {
        RecordKind::Order => Order::SCHEMA,
        RecordKind::Holding => Holding::SCHEMA,
        RecordKind::WatchlistEntry => WatchlistEntry::SCHEMA,
        RecordKind::LeaderboardEntry => LeaderboardEntry::SCHEMA,
        RecordKind::Standing => Standing::SCHEMA,
        RecordKind::Candle => Candle::SCHEMA,
    }
}

/// Query parameters for `args` with `page_size` as the fallback page size.
pub fn build_params(args: &QueryArgs, page_size: usize, now: NaiveDateTime) -> QueryParams {
    let mut filters = args.filters.clone();
    if args.kind == Collection::Watchlist {
        filters.extend(args.tab.filters());
    }
    let date_range = if args.from.is_some() || args.to.is_some() {
        Some(DateRange {
            from: args.from,
            to: args.to,
        })
    } else {
        args.date.range(now)
    };
    QueryParams {
        search_text: args.search.clone(),
        filters,
        date_range,
        sort_field: args
            .sort
            .clone()
            .unwrap_or_else(|| args.kind.default_sort().to_string()),
        sort_direction: if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
        page: args.page,
        page_size: args.page_size.unwrap_or(page_size),
    }
}

/// Loads the requested collection from `source`, runs the query and writes
/// the resulting page to `out`.
pub fn execute_query(
    source: &dyn RecordSource,
    args: &QueryArgs,
    settings: &Settings,
    now: NaiveDateTime,
    out: &mut dyn Write,
) -> Result<(), StocksimError> {
    let params = build_params(args, settings.page_size, now);
    match args.kind {
        Collection::Orders => write_page(&source.orders()?, &params, args.format, out),
        Collection::Holdings => write_page(&source.holdings()?, &params, args.format, out),
        Collection::Watchlist => write_page(&source.watchlist()?, &params, args.format, out),
        Collection::Candles => write_page(&source.candles()?, &params, args.format, out),
        Collection::Leaderboard => {
            let direction = if args.rank_ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let standings = rank_by(&source.leaderboard()?, &args.rank_by, direction)?;
            write_page(&standings, &params, args.format, out)
        }
    }
}

fn write_page<R: Record + Serialize>(
    records: &[R],
    params: &QueryParams,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<(), StocksimError> {
    let result = query(records, params)?;
    tracing::info!(
        kind = %R::KIND,
        records = records.len(),
        matched = result.total_matched,
        page = result.page,
        total_pages = result.total_pages,
        "query complete"
    );
    match format {
        ReportFormat::Table => TableReport.write_page(&result, out),
        ReportFormat::Csv => CsvReport.write_page(&result, out),
        ReportFormat::Json => JsonReport.write_page(&result, out),
    }
}

fn run_query(args: &QueryArgs) -> ExitCode {
    let settings = match resolve_settings(args.config.as_deref()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let now = reference_now(&settings);
    let source = open_source(&settings, now);

    let stdout = io::stdout();
    match execute_query(source.as_ref(), args, &settings, now, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

pub fn write_summary(
    source: &dyn RecordSource,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<(), StocksimError> {
    let summary = PortfolioSummary::compute(&source.holdings()?);
    match format {
        ReportFormat::Table => TableReport.write_summary(&summary, out),
        ReportFormat::Csv => CsvReport.write_summary(&summary, out),
        ReportFormat::Json => JsonReport.write_summary(&summary, out),
    }
}

fn run_summary(config_path: Option<&Path>, format: ReportFormat) -> ExitCode {
    let settings = match resolve_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let source = open_source(&settings, reference_now(&settings));

    let stdout = io::stdout();
    match write_summary(source.as_ref(), format, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

pub fn render_fields(kind: Collection) -> String {
    let schema = schema_for(kind.record_kind());
    let width = schema.iter().map(|def| def.name.len()).max().unwrap_or(0);
    schema
        .iter()
        .map(|def| format!("{:<width$}  {}\n", def.name, def.ty.as_str()))
        .collect()
}

fn run_fields(kind: Collection) -> ExitCode {
    print!("{}", render_fields(kind));
    ExitCode::SUCCESS
}

/// Writes the mock `kind` collection in the CSV data directory format.
/// Leaderboards are written as unranked entries.
pub fn generate(kind: Collection, settings: &Settings, out: &mut dyn Write) -> Result<(), StocksimError> {
    let now = reference_now(settings);
    let source = MockAdapter::new(settings.mock.clone(), now);
    match kind {
        Collection::Orders => csv_adapter::write_records(&source.orders()?, out),
        Collection::Holdings => csv_adapter::write_records(&source.holdings()?, out),
        Collection::Watchlist => csv_adapter::write_records(&source.watchlist()?, out),
        Collection::Leaderboard => csv_adapter::write_records(&source.leaderboard()?, out),
        Collection::Candles => csv_adapter::write_records(&source.candles()?, out),
    }
}

fn run_generate(kind: Collection, output: Option<&Path>, config_path: Option<&Path>) -> ExitCode {
    let settings = match resolve_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let result = match output {
        Some(path) => {
            tracing::info!(path = %path.display(), ?kind, "writing mock collection");
            fs::File::create(path)
                .map_err(StocksimError::from)
                .and_then(|mut file| generate(kind, &settings, &mut file))
        }
        None => {
            let stdout = io::stdout();
            generate(kind, &settings, &mut stdout.lock())
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}
