use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::DiffRecord;

/// OK / Divergent classification of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Ok,
    Divergent,
}

impl RecordStatus {
    /// The one classification predicate, shared by filtering, tallying, row
    /// rendering and export. OK requires BOTH fields to be exactly zero:
    /// `absolute_difference` is independent data on unmatched records, so
    /// checking `difference` alone is wrong.
    pub fn classify(record: &DiffRecord) -> Self {
        if record.difference == 0.0 && record.absolute_difference == 0.0 {
            Self::Ok
        } else {
            Self::Divergent
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Divergent => write!(f, "DIVERGENT"),
        }
    }
}

/// Counts of OK and Divergent records over the full, unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub ok: usize,
    pub divergent: usize,
}

impl StatusTally {
    pub fn of(records: &[DiffRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            match RecordStatus::classify(record) {
                RecordStatus::Ok => tally.ok += 1,
                RecordStatus::Divergent => tally.divergent += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.ok + self.divergent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(diff: f64, abs_diff: f64) -> DiffRecord {
        DiffRecord {
            difference: diff,
            absolute_difference: abs_diff,
            ..DiffRecord::default()
        }
    }

    #[test]
    fn zero_both_is_ok() {
        assert_eq!(RecordStatus::classify(&rec(0.0, 0.0)), RecordStatus::Ok);
    }

    #[test]
    fn nonzero_difference_is_divergent() {
        assert_eq!(RecordStatus::classify(&rec(50.0, 50.0)), RecordStatus::Divergent);
        assert_eq!(RecordStatus::classify(&rec(-0.01, 0.01)), RecordStatus::Divergent);
    }

    #[test]
    fn unmatched_record_with_zero_signed_difference_is_divergent() {
        // Backend emits these for rows present in only one base.
        assert_eq!(RecordStatus::classify(&rec(0.0, 75.0)), RecordStatus::Divergent);
    }

    #[test]
    fn negative_zero_is_ok() {
        assert_eq!(RecordStatus::classify(&rec(-0.0, 0.0)), RecordStatus::Ok);
    }

    #[test]
    fn display_matches_export_labels() {
        assert_eq!(RecordStatus::Ok.to_string(), "OK");
        assert_eq!(RecordStatus::Divergent.to_string(), "DIVERGENT");
    }

    #[test]
    fn tally_counts_both_kinds() {
        let records = vec![rec(0.0, 0.0), rec(50.0, 50.0), rec(0.0, 0.0), rec(0.0, 10.0)];
        let tally = StatusTally::of(&records);
        assert_eq!(tally.ok, 2);
        assert_eq!(tally.divergent, 2);
        assert_eq!(tally.total(), records.len());
    }

    #[test]
    fn tally_of_empty_list() {
        let tally = StatusTally::of(&[]);
        assert_eq!(tally.ok, 0);
        assert_eq!(tally.divergent, 0);
    }
}
