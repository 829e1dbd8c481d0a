use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const ISO_DATE: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Calendar date of an observation, ISO `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    /// ISO week key, suitable for grouping daily observations into weeks.
    pub fn iso_year_week(self) -> (i32, u8) {
        let (year, week, _) = self.0.to_iso_week_date();
        (year, week)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(ISO_DATE)
            .expect("TradeDate must be ISO formattable")
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive analysis window, validated once at the public entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: TradeDate,
    end: TradeDate,
}

impl DateRange {
    pub fn new(start: TradeDate, end: TradeDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.format_iso(),
                end: end.format_iso(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both endpoints and validate ordering in one step.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(TradeDate::parse(start)?, TradeDate::parse(end)?)
    }

    pub fn start(&self) -> TradeDate {
        self.start
    }

    pub fn end(&self) -> TradeDate {
        self.end
    }

    pub fn contains(&self, date: TradeDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let date = TradeDate::parse("2024-03-15").expect("must parse");
        assert_eq!(date.format_iso(), "2024-03-15");
        assert_eq!(date.month(), 3);
    }

    #[test]
    fn rejects_garbage_date() {
        let err = TradeDate::parse("03/15/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::parse("2024-02-01", "2024-01-01").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::parse("2024-01-01", "2024-01-31").expect("must parse");
        assert!(range.contains(TradeDate::parse("2024-01-01").unwrap()));
        assert!(range.contains(TradeDate::parse("2024-01-31").unwrap()));
        assert!(!range.contains(TradeDate::parse("2024-02-01").unwrap()));
    }
}
