//! Target month parsing and the per-row month filter.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Local, Month};
use regex::Regex;

use crate::error::InvalidMonth;
use crate::types::Row;

static MONTH_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[01]?\d$").expect("month shape pattern"));

/// A calendar month (1-12) chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMonth(Month);

impl TargetMonth {
    pub fn new(number: u32) -> Result<Self, InvalidMonth> {
        u8::try_from(number)
            .ok()
            .and_then(|n| Month::try_from(n).ok())
            .map(Self)
            .ok_or_else(|| InvalidMonth(number.to_string()))
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        // month() is always 1..=12
        Self::new(today.month()).unwrap_or(Self(Month::January))
    }

    pub fn number(self) -> u32 {
        self.0.number_from_month()
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Month as it appears at the start of an exported `MM/DD/YYYY` date.
    pub fn zero_padded(self) -> String {
        format!("{:02}", self.number())
    }
}

impl FromStr for TargetMonth {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !MONTH_SHAPE.is_match(s) {
            return Err(InvalidMonth(s.to_string()));
        }
        let n: u32 = s.parse().map_err(|_| InvalidMonth(s.to_string()))?;
        Self::new(n).map_err(|_| InvalidMonth(s.to_string()))
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Accepts rows whose date column falls in the target month.
///
/// Matching is on the zero-padded prefix only, so month 8 accepts `08/15/2021`
/// but rejects `18/...` and unpadded `8/15/2021`.
#[derive(Debug, Clone)]
pub struct MonthFilter {
    column: usize,
    prefix: String,
}

impl MonthFilter {
    pub fn new(month: TargetMonth, column: usize) -> Self {
        Self {
            column,
            prefix: month.zero_padded(),
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn matches(&self, row: &Row) -> bool {
        row.get(self.column)
            .is_some_and(|field| field.starts_with(&self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn august(column: usize) -> MonthFilter {
        MonthFilter::new(TargetMonth::new(8).unwrap(), column)
    }

    #[test]
    fn test_matches_zero_padded_month() {
        assert!(august(0).matches(&row(&["08/15/2021", "COFFEE", "-4.50"])));
    }

    #[test]
    fn test_does_not_match_month_eighteen_prefix() {
        // "18" starts with "8" only after the first digit; a loose prefix test
        // used to accept it.
        assert!(!august(0).matches(&row(&["18/08/2021", "X", "1.00"])));
        assert!(!august(0).matches(&row(&["8/15/2021", "X", "1.00"])));
    }

    #[test]
    fn test_uses_configured_column() {
        let f = august(1);
        assert!(f.matches(&row(&["DEBIT", "08/15/2021"])));
        assert!(!f.matches(&row(&["08/15/2021", "DEBIT"])));
    }

    #[test]
    fn test_short_row_does_not_match() {
        assert!(!august(3).matches(&row(&["08/15/2021"])));
        assert!(!august(0).matches(&row(&[])));
    }

    #[test]
    fn test_two_digit_months() {
        let dec = MonthFilter::new(TargetMonth::new(12).unwrap(), 0);
        assert!(dec.matches(&row(&["12/01/2021"])));
        assert!(!dec.matches(&row(&["01/12/2021"])));
    }

    #[test]
    fn test_parse_month_shape() {
        assert_eq!("8".parse::<TargetMonth>().unwrap().number(), 8);
        assert_eq!("08".parse::<TargetMonth>().unwrap().number(), 8);
        assert_eq!(" 12 ".parse::<TargetMonth>().unwrap().number(), 12);
        assert!("0".parse::<TargetMonth>().is_err());
        assert!("13".parse::<TargetMonth>().is_err());
        assert!("19".parse::<TargetMonth>().is_err());
        assert!("20".parse::<TargetMonth>().is_err());
        assert!("008".parse::<TargetMonth>().is_err());
        assert!("aug".parse::<TargetMonth>().is_err());
        assert!("".parse::<TargetMonth>().is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(TargetMonth::new(0), Err(InvalidMonth("0".into())));
        assert!(TargetMonth::new(13).is_err());
        assert_eq!(TargetMonth::new(2).unwrap().name(), "February");
    }
}
