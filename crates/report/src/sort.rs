use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::DiffRecord;

/// Sortable columns of the differences table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Code,
    ClientName,
    FinancialValue,
    AccountingValue,
    Difference,
    AbsoluteDifference,
}

impl SortKey {
    /// Column order as rendered, left to right.
    pub const COLUMNS: [SortKey; 6] = [
        SortKey::Code,
        SortKey::ClientName,
        SortKey::FinancialValue,
        SortKey::AccountingValue,
        SortKey::Difference,
        SortKey::AbsoluteDifference,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort: key plus direction. Defaults to the largest absolute
/// differences first, the order an auditor wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::AbsoluteDifference,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Selecting the active key flips direction; a new key starts descending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flip(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Descending,
            }
        }
    }
}

/// Stable sort of a filtered projection; ties keep input order, so no
/// secondary key is applied.
pub fn sort_records(records: &mut [&DiffRecord], spec: SortSpec) {
    records.sort_by(|a, b| {
        let ord = compare(a, b, spec.key);
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare(a: &DiffRecord, b: &DiffRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Code => compare_text(a.code.as_deref(), b.code.as_deref()),
        SortKey::ClientName => compare_text(a.client_name.as_deref(), b.client_name.as_deref()),
        SortKey::FinancialValue => a.financial_value.total_cmp(&b.financial_value),
        SortKey::AccountingValue => a.accounting_value.total_cmp(&b.accounting_value),
        SortKey::Difference => a.difference.total_cmp(&b.difference),
        SortKey::AbsoluteDifference => a.absolute_difference.total_cmp(&b.absolute_difference),
    }
}

/// Case-insensitive; missing values sort as empty. The raw value breaks
/// case-only ties so the order stays total.
fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
