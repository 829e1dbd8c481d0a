//! Per-ticker metric tables.

use std::collections::BTreeMap;

use serde_json::json;

use folio_analytics::{AnalysisConfig, MetricsEngine};
use folio_core::Ticker;

use crate::cli::MetricsArgs;
use crate::error::CliError;

use super::{parse_tickers, CommandResult};

pub fn run(
    args: &MetricsArgs,
    engine: &MetricsEngine<'_>,
    config: &AnalysisConfig,
) -> Result<CommandResult, CliError> {
    let tickers = parse_tickers(&args.tickers)?;
    let mut notices = Vec::new();

    let returns = engine
        .annualized_returns(&tickers, config)?
        .unwrap_into(&mut notices);
    let volatility = engine
        .annualized_volatilities(&tickers, config)?
        .unwrap_into(&mut notices);
    let sharpe = engine
        .sharpe_ratios(&tickers, config)?
        .unwrap_into(&mut notices);

    let mut beta: BTreeMap<Ticker, f64> = BTreeMap::new();
    let mut alpha: BTreeMap<Ticker, f64> = BTreeMap::new();
    for ticker in &tickers {
        beta.insert(
            ticker.clone(),
            engine.beta(ticker, config)?.unwrap_into(&mut notices),
        );
        alpha.insert(
            ticker.clone(),
            engine.alpha(ticker, config)?.unwrap_into(&mut notices),
        );
    }

    Ok(CommandResult {
        data: json!({
            "annualized_return": returns,
            "annualized_volatility": volatility,
            "sharpe_ratio": sharpe,
            "beta": beta,
            "alpha": alpha,
            "market_ticker": config.market_ticker.as_str(),
        }),
        notices,
    })
}
