use chrono::{Datelike, NaiveDate};
use std::fmt::{self, Display, Formatter};

/// The weekly bucket a transaction is aggregated into.
///
/// `week` is the ISO-8601 week of the transaction date. `year` is the calendar
/// year, except that December dates are attributed to the following year.
/// Together with the ISO week this puts e.g. `2014-12-31` (ISO week 1) into
/// the same bucket as `2015-01-01`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PeriodKey {
    pub year: i32,
    pub week: u32,
}

impl PeriodKey {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let year = if date.month() == 12 { date.year() + 1 } else { date.year() };

        Self::new(year, date.iso_week().week())
    }
}

impl Display for PeriodKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}-W{:02}", self.year, self.week)
    }
}
