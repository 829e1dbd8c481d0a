//! Correlation matrix for a set of tickers.

use folio_analytics::{AnalysisConfig, MetricsEngine};

use crate::cli::CorrelationArgs;
use crate::error::CliError;

use super::{parse_tickers, CommandResult};

pub fn run(
    args: &CorrelationArgs,
    engine: &MetricsEngine<'_>,
    config: &AnalysisConfig,
) -> Result<CommandResult, CliError> {
    let tickers = parse_tickers(&args.tickers)?;

    let mut notices = Vec::new();
    let matrix = engine
        .correlation_matrix(&tickers, config)?
        .unwrap_into(&mut notices);

    Ok(CommandResult {
        data: serde_json::to_value(&matrix)?,
        notices,
    })
}
