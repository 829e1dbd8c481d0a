//! Full portfolio analysis report.

use std::collections::BTreeMap;

use folio_analytics::{AnalysisConfig, Analyzer, MetricsEngine};
use folio_core::{Portfolio, Ticker};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(
    args: &AnalyzeArgs,
    engine: &MetricsEngine<'_>,
    config: &AnalysisConfig,
) -> Result<CommandResult, CliError> {
    let portfolio = load_portfolio(args)?;

    let analyzer = Analyzer::new(*engine);
    let computed = analyzer.run(&portfolio, config)?;

    let mut notices = Vec::new();
    let report = computed.unwrap_into(&mut notices);

    Ok(CommandResult {
        data: serde_json::to_value(&report)?,
        notices,
    })
}

fn load_portfolio(args: &AnalyzeArgs) -> Result<Portfolio, CliError> {
    if let Some(path) = &args.portfolio {
        return Ok(Portfolio::from_json_file(path)?);
    }
    if let Some(spec) = &args.holdings {
        return parse_holdings(spec, &args.name);
    }
    Err(CliError::Command(String::from(
        "provide --portfolio <file> or --holdings \"TICKER=WEIGHT,...\"",
    )))
}

fn parse_holdings(spec: &str, name: &str) -> Result<Portfolio, CliError> {
    let mut holdings = BTreeMap::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (ticker, weight) = part.split_once('=').ok_or_else(|| {
            CliError::Command(format!("invalid holding '{part}', expected TICKER=WEIGHT"))
        })?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| CliError::Command(format!("invalid weight in '{part}'")))?;
        holdings.insert(Ticker::parse(ticker)?, weight);
    }

    if holdings.is_empty() {
        return Err(CliError::Command(String::from("no holdings given")));
    }
    Ok(Portfolio::new(name, holdings)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inline_holdings() {
        let portfolio = parse_holdings("aapl=0.5, msft=0.5", "test").expect("must parse");
        assert_eq!(portfolio.len(), 2);
        assert!(portfolio
            .holdings()
            .contains_key(&Ticker::parse("AAPL").unwrap()));
    }

    #[test]
    fn rejects_malformed_holdings() {
        let err = parse_holdings("AAPL:0.5", "test").expect_err("must fail");
        assert!(matches!(err, CliError::Command(_)));
    }
}
