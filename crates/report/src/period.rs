use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

/// Why a closing date was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosingDateError {
    /// Not shaped DD/MM/YYYY.
    Format(String),
    /// Shaped right but not a real calendar date.
    InvalidDate(String),
    /// Real date that is not the last day of its month.
    NotMonthEnd { given: NaiveDate, expected: NaiveDate },
}

impl fmt::Display for ClosingDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(raw) => write!(f, "closing date '{raw}' is not in DD/MM/YYYY format"),
            Self::InvalidDate(raw) => write!(f, "closing date '{raw}' is not a valid date"),
            Self::NotMonthEnd { given, expected } => write!(
                f,
                "closing date {} is not the last day of the month (expected {})",
                given.format("%d/%m/%Y"),
                expected.format("%d/%m/%Y"),
            ),
        }
    }
}

impl std::error::Error for ClosingDateError {}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Parse and validate a DD/MM/YYYY closing date. A reconciliation period
/// always closes on the last day of its month.
pub fn parse_closing_date(raw: &str) -> Result<NaiveDate, ClosingDateError> {
    let trimmed = raw.trim();
    if !is_dd_mm_yyyy(trimmed) {
        return Err(ClosingDateError::Format(raw.to_string()));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .map_err(|_| ClosingDateError::InvalidDate(raw.to_string()))?;

    let expected = month_end(date);
    if date != expected {
        return Err(ClosingDateError::NotMonthEnd {
            given: date,
            expected,
        });
    }
    Ok(date)
}

/// Wire form of a closing date, DD/MM/YYYY.
pub fn format_closing_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Default when the user gives no date: the end of the current month.
pub fn current_month_end() -> NaiveDate {
    month_end(Local::now().date_naive())
}

fn is_dd_mm_yyyy(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}
