//! `rcv export` — write the differences table to CSV, headless.
//!
//! Runs the same filter → sort pipeline as the interactive viewer and
//! exports the whole projection, never a single page.

use std::path::PathBuf;

use chrono::Local;
use clap::ValueEnum;

use reconview_report::export::{export_filename, write_csv_file};
use reconview_report::filter::StatusFilter;
use reconview_report::sort::{SortDirection, SortKey, SortSpec};
use reconview_report::DiffTable;

use crate::{load_report, CliError};

// ── Flag enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Ok,
    Divergent,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Ok => StatusFilter::Ok,
            StatusArg::Divergent => StatusFilter::Divergent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortByArg {
    Code,
    Client,
    Financial,
    Accounting,
    Difference,
    AbsoluteDifference,
}

impl From<SortByArg> for SortKey {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Code => SortKey::Code,
            SortByArg::Client => SortKey::ClientName,
            SortByArg::Financial => SortKey::FinancialValue,
            SortByArg::Accounting => SortKey::AccountingValue,
            SortByArg::Difference => SortKey::Difference,
            SortByArg::AbsoluteDifference => SortKey::AbsoluteDifference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Ascending,
            DirectionArg::Desc => SortDirection::Descending,
        }
    }
}

// ── Command ─────────────────────────────────────────────────────────

pub fn cmd_export(
    report: &PathBuf,
    status: StatusArg,
    search: Option<String>,
    sort_by: SortByArg,
    direction: DirectionArg,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let parsed = load_report(report)?;

    let mut table = DiffTable::new(parsed.records);
    table.set_status_filter(status.into());
    if let Some(term) = search.as_deref() {
        table.set_search(term);
    }
    table.set_sort(SortSpec {
        key: sort_by.into(),
        direction: direction.into(),
    });

    let path =
        output.unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())));

    let rows = table.sorted();
    write_csv_file(&rows, &path).map_err(|e| CliError::io(e.to_string()))?;

    if !quiet {
        eprintln!("exported {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_value_names() {
        assert_eq!(
            StatusArg::from_str("divergent", false).unwrap(),
            StatusArg::Divergent
        );
        assert_eq!(
            SortByArg::from_str("absolute-difference", false).unwrap(),
            SortByArg::AbsoluteDifference
        );
        assert_eq!(DirectionArg::from_str("asc", false).unwrap(), DirectionArg::Asc);
    }

    #[test]
    fn test_flag_mappings() {
        assert_eq!(StatusFilter::from(StatusArg::Ok), StatusFilter::Ok);
        assert_eq!(SortKey::from(SortByArg::Client), SortKey::ClientName);
        assert_eq!(
            SortDirection::from(DirectionArg::Desc),
            SortDirection::Descending
        );
    }
}
