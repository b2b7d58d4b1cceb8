use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A calendar-month key in "YYYY/MM" form, the granularity at which
/// balances are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    /// Derive the month key for a point in time.
    /// Example: 2024-07-15T10:00:00Z -> "2024/07"
    pub fn from_datetime(date_time: &DateTime<Utc>) -> Self {
        MonthKey(format!("{:04}/{:02}", date_time.year(), date_time.month()))
    }

    /// Month key for the current wall-clock time.
    pub fn current() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Round-trip through a date on the first of the month to reject
        // tokens like "2024/13" or "2024-07".
        let first_of_month = format!("{}/01", s);
        let date = NaiveDate::parse_from_str(&first_of_month, "%Y/%m/%d")
            .map_err(|_| ValidationError::MonthFormat(s.to_string()))?;

        // chrono accepts unpadded and over-long digits ("2024/7",
        // "02024/07"); only the canonical zero-padded form can ever match
        // a key derived from a timestamp, so anything else is malformed.
        let canonical = format!("{:04}/{:02}", date.year(), date.month());
        if s != canonical {
            return Err(ValidationError::MonthFormat(s.to_string()));
        }

        Ok(MonthKey(canonical))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_key_from_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 7, 15, 12, 30, 0).unwrap();
        assert_eq!(MonthKey::from_datetime(&dt).as_str(), "2024/07");
    }

    #[test]
    fn test_month_key_pads_single_digit_months() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(MonthKey::from_datetime(&dt).as_str(), "2024/03");
    }

    #[test]
    fn test_month_key_parse_valid() {
        let month: MonthKey = "2024/12".parse().unwrap();
        assert_eq!(month.as_str(), "2024/12");
    }

    #[test]
    fn test_month_key_parse_requires_canonical_padding() {
        assert!("2024/7".parse::<MonthKey>().is_err());
        assert!("02024/07".parse::<MonthKey>().is_err());
        assert!("2024/007".parse::<MonthKey>().is_err());
        assert!(" 2024/07".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_parse_rejects_garbage() {
        assert!("2024/13".parse::<MonthKey>().is_err());
        assert!("2024-07".parse::<MonthKey>().is_err());
        assert!("july".parse::<MonthKey>().is_err());
        assert!("".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let month = MonthKey::from_datetime(&dt);
        let parsed: MonthKey = month.as_str().parse().unwrap();
        assert_eq!(month, parsed);
    }
}
