use serde::{Deserialize, Serialize};

use crate::domain::date::TradeDate;
use crate::ValidationError;

/// Date-indexed periodic returns for one ticker at one frequency.
///
/// Construction enforces the series invariants: strictly ascending dates
/// and finite fractional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeriesPoint>", into = "Vec<SeriesPoint>")]
pub struct ReturnSeries {
    dates: Vec<TradeDate>,
    values: Vec<f64>,
}

/// One (date, value) observation on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: TradeDate,
    pub value: f64,
}

impl ReturnSeries {
    pub fn new(points: Vec<(TradeDate, f64)>) -> Result<Self, ValidationError> {
        let mut dates = Vec::with_capacity(points.len());
        let mut values = Vec::with_capacity(points.len());

        for (index, (date, value)) in points.into_iter().enumerate() {
            if !value.is_finite() {
                return Err(ValidationError::SeriesNotFinite { index });
            }
            if let Some(last) = dates.last() {
                if date <= *last {
                    return Err(ValidationError::SeriesNotAscending { index });
                }
            }
            dates.push(date);
            values.push(value);
        }

        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[TradeDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (TradeDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at a given date, if the date is present.
    pub fn value_at(&self, date: TradeDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|index| self.values[index])
    }

    /// Cumulative compounded return over the whole series: `Π(1+r) − 1`.
    pub fn cumulative_return(&self) -> f64 {
        self.values.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
    }
}

impl TryFrom<Vec<SeriesPoint>> for ReturnSeries {
    type Error = ValidationError;

    fn try_from(points: Vec<SeriesPoint>) -> Result<Self, Self::Error> {
        Self::new(points.into_iter().map(|p| (p.date, p.value)).collect())
    }
}

impl From<ReturnSeries> for Vec<SeriesPoint> {
    fn from(series: ReturnSeries) -> Self {
        series
            .dates
            .into_iter()
            .zip(series.values)
            .map(|(date, value)| SeriesPoint { date, value })
            .collect()
    }
}
