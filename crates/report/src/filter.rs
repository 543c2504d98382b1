use serde::{Deserialize, Serialize};

use crate::model::DiffRecord;
use crate::status::RecordStatus;

// ---------------------------------------------------------------------------
// Status facet
// ---------------------------------------------------------------------------

/// Status facet of the table filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Ok,
    Divergent,
}

impl StatusFilter {
    pub fn admits(self, record: &DiffRecord) -> bool {
        match self {
            Self::All => true,
            Self::Ok => RecordStatus::classify(record) == RecordStatus::Ok,
            Self::Divergent => RecordStatus::classify(record) == RecordStatus::Divergent,
        }
    }

    /// All → Ok → Divergent → All, for a single-key toggle.
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Ok,
            Self::Ok => Self::Divergent,
            Self::Divergent => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Ok => "ok",
            Self::Divergent => "divergent",
        }
    }
}

// ---------------------------------------------------------------------------
// Search facet
// ---------------------------------------------------------------------------

/// Free-text search term, held normalized the way matching uses it:
/// trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    normalized: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: raw.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Case-insensitive substring match against code OR client name. A null
    /// field never matches a non-empty term; an empty term matches everything.
    pub fn matches(&self, record: &DiffRecord) -> bool {
        if self.normalized.is_empty() {
            return true;
        }
        field_contains(record.code.as_deref(), &self.normalized)
            || field_contains(record.client_name.as_deref(), &self.normalized)
    }
}

fn field_contains(field: Option<&str>, needle: &str) -> bool {
    match field {
        Some(text) => text.to_lowercase().contains(needle),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Filter stage
// ---------------------------------------------------------------------------

/// Status filter ANDed with the search term; input order preserved.
/// Pure: no state, no side effects.
pub fn filter_records<'a>(
    records: &'a [DiffRecord],
    status: StatusFilter,
    search: &SearchTerm,
) -> Vec<&'a DiffRecord> {
    records
        .iter()
        .filter(|r| status.admits(r) && search.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: Option<&str>, client: Option<&str>, diff: f64, abs_diff: f64) -> DiffRecord {
        DiffRecord {
            code: code.map(String::from),
            client_name: client.map(String::from),
            difference: diff,
            absolute_difference: abs_diff,
            ..DiffRecord::default()
        }
    }

    fn sample() -> Vec<DiffRecord> {
        vec![
            rec(Some("A1"), Some("Acme"), 0.0, 0.0),
            rec(Some("B2"), Some("Beta"), 50.0, 50.0),
        ]
    }

    #[test]
    fn all_passes_everything() {
        let records = sample();
        let out = filter_records(&records, StatusFilter::All, &SearchTerm::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn divergent_keeps_complement_of_ok() {
        let records = sample();
        let out = filter_records(&records, StatusFilter::Divergent, &SearchTerm::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code.as_deref(), Some("B2"));

        let out = filter_records(&records, StatusFilter::Ok, &SearchTerm::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code.as_deref(), Some("A1"));
    }

    #[test]
    fn search_is_case_insensitive_over_both_fields() {
        let records = sample();
        let out = filter_records(&records, StatusFilter::All, &SearchTerm::new("ac"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code.as_deref(), Some("A1"));

        let out = filter_records(&records, StatusFilter::All, &SearchTerm::new("b2"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code.as_deref(), Some("B2"));
    }

    #[test]
    fn search_term_is_trimmed() {
        let records = sample();
        let out = filter_records(&records, StatusFilter::All, &SearchTerm::new("  acme  "));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn null_fields_never_match() {
        let records = vec![rec(None, None, 0.0, 0.0)];
        let out = filter_records(&records, StatusFilter::All, &SearchTerm::new("a"));
        assert!(out.is_empty());
        // ...but an empty term still admits the record.
        let out = filter_records(&records, StatusFilter::All, &SearchTerm::new("  "));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn search_is_anded_with_status() {
        let records = sample();
        // "a" matches Acme (OK) and Beta (no); Divergent + "a" -> nothing.
        let out = filter_records(&records, StatusFilter::Divergent, &SearchTerm::new("acme"));
        assert!(out.is_empty());
    }

    #[test]
    fn filter_preserves_input_order() {
        let records = vec![
            rec(Some("C3"), None, 1.0, 1.0),
            rec(Some("A1"), None, 2.0, 2.0),
            rec(Some("B2"), None, 3.0, 3.0),
        ];
        let out = filter_records(&records, StatusFilter::Divergent, &SearchTerm::default());
        let codes: Vec<_> = out.iter().map(|r| r.code.as_deref().unwrap()).collect();
        assert_eq!(codes, ["C3", "A1", "B2"]);
    }

    #[test]
    fn cycle_covers_all_states() {
        let mut f = StatusFilter::All;
        f = f.cycle();
        assert_eq!(f, StatusFilter::Ok);
        f = f.cycle();
        assert_eq!(f, StatusFilter::Divergent);
        f = f.cycle();
        assert_eq!(f, StatusFilter::All);
    }
}
