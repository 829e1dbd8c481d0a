//! Frequency resampler: daily observations into calendar-period buckets.
//!
//! Periods are standard calendar boundaries: ISO weeks, calendar months,
//! calendar quarters. Returns compound within a period; prices take the
//! last observation. Periods with no observations simply never appear in
//! the output, and each output row is labeled with the last observed date
//! inside its period, which keeps dates strictly ascending.

use folio_core::{Frequency, TradeDate};
use folio_store::Observation;

/// Calendar bucket a daily observation falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PeriodKey {
    Day(TradeDate),
    Week(i32, u8),
    Month(i32, u8),
    Quarter(i32, u8),
}

pub(crate) fn period_key(date: TradeDate, frequency: Frequency) -> PeriodKey {
    match frequency {
        Frequency::Daily => PeriodKey::Day(date),
        Frequency::Weekly => {
            let (year, week) = date.iso_year_week();
            PeriodKey::Week(year, week)
        }
        Frequency::Monthly => PeriodKey::Month(date.year(), date.month()),
        Frequency::Quarterly => PeriodKey::Quarter(date.year(), (date.month() - 1) / 3 + 1),
    }
}

/// Resample a daily return series; identity transform for daily.
pub fn resample_returns(observations: &[Observation], frequency: Frequency) -> Vec<Observation> {
    if frequency == Frequency::Daily {
        return observations.to_vec();
    }
    fold_periods(observations, frequency, |bucket| {
        bucket.iter().fold(1.0, |acc, obs| acc * (1.0 + obs.value)) - 1.0
    })
}

/// Resample a daily price series; the period value is the last observed
/// price within the period.
pub fn resample_prices(observations: &[Observation], frequency: Frequency) -> Vec<Observation> {
    if frequency == Frequency::Daily {
        return observations.to_vec();
    }
    fold_periods(observations, frequency, |bucket| {
        bucket.last().map(|obs| obs.value).unwrap_or_default()
    })
}

fn fold_periods(
    observations: &[Observation],
    frequency: Frequency,
    fold: impl Fn(&[Observation]) -> f64,
) -> Vec<Observation> {
    let mut output = Vec::new();
    let mut bucket: Vec<Observation> = Vec::new();
    let mut current: Option<PeriodKey> = None;

    for obs in observations {
        let key = period_key(obs.date, frequency);
        if current.is_some() && current != Some(key) {
            flush(&mut bucket, &fold, &mut output);
        }
        current = Some(key);
        bucket.push(*obs);
    }
    flush(&mut bucket, &fold, &mut output);

    output
}

fn flush(
    bucket: &mut Vec<Observation>,
    fold: &impl Fn(&[Observation]) -> f64,
    output: &mut Vec<Observation>,
) {
    let Some(last) = bucket.last() else {
        return;
    };
    output.push(Observation {
        date: last.date,
        value: fold(bucket),
    });
    bucket.clear();
}
