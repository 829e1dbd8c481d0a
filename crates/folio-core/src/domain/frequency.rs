use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Observation frequency of a return series.
///
/// Each frequency carries the periods-per-year constant used for
/// annualization and determines the resampling rule for frequencies
/// coarser than daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Quarterly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    /// Number of observation periods per calendar year.
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Quarterly => 4,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    /// Accepts both long and short tokens, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "1d" => Ok(Self::Daily),
            "weekly" | "1w" => Ok(Self::Weekly),
            "monthly" | "1m" => Ok(Self::Monthly),
            "quarterly" | "1q" => Ok(Self::Quarterly),
            other => Err(ValidationError::UnsupportedFrequency {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_tokens() {
        assert_eq!(Frequency::from_str("Monthly").unwrap(), Frequency::Monthly);
        assert_eq!(Frequency::from_str("1m").unwrap(), Frequency::Monthly);
        assert_eq!(Frequency::from_str("1D").unwrap(), Frequency::Daily);
    }

    #[test]
    fn rejects_unknown_token() {
        let err = Frequency::from_str("hourly").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnsupportedFrequency { .. }));
    }

    #[test]
    fn periods_per_year_constants() {
        assert_eq!(Frequency::Daily.periods_per_year(), 252);
        assert_eq!(Frequency::Weekly.periods_per_year(), 52);
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
    }
}
