mod analyze;
mod correlation;
mod metrics;

use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;

use folio_analytics::{AnalysisConfig, MetricsEngine, RiskFreeProvider};
use folio_core::{DateRange, Envelope, EnvelopeMeta, Frequency, Notice, Ticker};
use folio_store::{CsvStore, RateFileSource, ReturnStore, TableStore, TableStoreConfig};

use crate::cli::{Cli, Command, DataArgs, StoreSelector};
use crate::error::CliError;

/// Payload plus the notices a command accumulated.
pub struct CommandResult {
    pub data: Value,
    pub notices: Vec<Notice>,
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let data_args = match &cli.command {
        Command::Analyze(args) => &args.data,
        Command::Metrics(args) => &args.data,
        Command::Correlation(args) => &args.data,
    };

    let store = build_store(data_args)?;
    let riskfree = data_args
        .rates
        .as_ref()
        .map(|path| RiskFreeProvider::new(RateFileSource::new(path)));
    let config = build_config(data_args)?;
    let engine = MetricsEngine::new(store.as_ref(), riskfree.as_ref());

    let result = match &cli.command {
        Command::Analyze(args) => analyze::run(args, &engine, &config)?,
        Command::Metrics(args) => metrics::run(args, &engine, &config)?,
        Command::Correlation(args) => correlation::run(args, &engine, &config)?,
    };

    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        store.kind().as_str(),
        started.elapsed().as_millis() as u64,
    );
    for notice in &result.notices {
        meta.push_warning(notice.to_string());
    }

    Ok(Envelope::success(meta, result.data))
}

fn build_store(args: &DataArgs) -> Result<Box<dyn ReturnStore>, CliError> {
    match args.store {
        StoreSelector::Csv => Ok(Box::new(CsvStore::new(&args.data_dir))),
        StoreSelector::Table => Ok(Box::new(TableStore::open(TableStoreConfig::new(
            &args.db_path,
        ))?)),
    }
}

/// Typed validation of the shared date/frequency/market arguments, once,
/// at the entry point.
fn build_config(args: &DataArgs) -> Result<AnalysisConfig, CliError> {
    let range = DateRange::parse(&args.start, &args.end)?;
    let frequency: Frequency = args.frequency.parse()?;
    let market = Ticker::parse(&args.market)?;
    Ok(AnalysisConfig::new(range, frequency, market))
}

pub(crate) fn parse_tickers(raw: &[String]) -> Result<Vec<Ticker>, CliError> {
    raw.iter()
        .map(|value| Ticker::parse(value).map_err(CliError::from))
        .collect()
}
