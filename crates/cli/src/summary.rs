//! `rcv summary` — headline numbers of a report.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use reconview_report::money::format_brl;
use reconview_report::{Report, StatusTally, Summary};

use crate::util::pad_right;
use crate::{load_report, CliError};

/// The `--json` shape: the service's aggregate plus row-status counts
/// computed over the differences table.
#[derive(Serialize)]
struct SummaryJson<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    ok_rows: usize,
    divergent_rows: usize,
}

pub fn cmd_summary(report: &PathBuf, json: bool) -> Result<(), CliError> {
    let parsed = load_report(report)?;

    if json {
        let tally = StatusTally::of(&parsed.records);
        let view = SummaryJson {
            summary: &parsed.summary,
            ok_rows: tally.ok,
            divergent_rows: tally.divergent,
        };
        let out = serde_json::to_string_pretty(&view)
            .map_err(|e| CliError::io(format!("JSON encode error: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_human(&mut lock, &parsed)
        .map_err(|e| CliError::io(format!("cannot write summary: {}", e)))
}

/// Aligned, human-readable recap. Shared by `rcv summary` (stdout) and the
/// post-run output of `rcv submit` (stderr).
pub(crate) fn write_human(out: &mut impl Write, report: &Report) -> io::Result<()> {
    let s = &report.summary;
    let tally = StatusTally::of(&report.records);

    writeln!(out, "{} {}", pad_right("records", 22), s.total_records)?;
    writeln!(out, "{} {}", pad_right("  matched", 22), s.matched_records)?;
    writeln!(
        out,
        "{} {}",
        pad_right("  with difference", 22),
        s.records_with_difference,
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("  financial only", 22),
        s.financial_only_records,
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("  accounting only", 22),
        s.accounting_only_records,
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        pad_right("financial total", 22),
        format_brl(s.financial_total),
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("accounting total", 22),
        format_brl(s.accounting_total),
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("total difference", 22),
        format_brl(s.total_difference),
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("absolute difference", 22),
        format_brl(s.absolute_difference_total),
    )?;
    writeln!(
        out,
        "{} {}",
        pad_right("largest difference", 22),
        format_brl(s.largest_difference),
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {} OK, {} divergent",
        pad_right("table rows", 22),
        tally.ok,
        tally.divergent,
    )?;

    if s.financial_normalized {
        writeln!(out, "note: financial values were normalized by the service")?;
    }
    if s.accounting_normalized {
        writeln!(out, "note: accounting values were normalized by the service")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconview_report::DiffRecord;

    fn sample() -> Report {
        Report {
            summary: Summary {
                total_records: 3,
                matched_records: 2,
                records_with_difference: 1,
                financial_total: 1234.56,
                accounting_total: 1230.0,
                total_difference: 4.56,
                ..Summary::default()
            },
            records: vec![
                DiffRecord {
                    code: Some("A1".into()),
                    ..DiffRecord::default()
                },
                DiffRecord {
                    code: Some("B2".into()),
                    ..DiffRecord::default()
                },
                DiffRecord {
                    code: Some("C3".into()),
                    difference: 4.56,
                    absolute_difference: 4.56,
                    ..DiffRecord::default()
                },
            ],
        }
    }

    #[test]
    fn test_write_human_layout() {
        let mut buf = Vec::new();
        write_human(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("records                3"));
        assert!(text.contains("financial total        R$ 1.234,56"));
        assert!(text.contains("total difference       R$ 4,56"));
        assert!(text.contains("table rows             2 OK, 1 divergent"));
        assert!(!text.contains("note:"));
    }

    #[test]
    fn test_write_human_normalization_notes() {
        let mut report = sample();
        report.summary.financial_normalized = true;
        let mut buf = Vec::new();
        write_human(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("note: financial values were normalized"));
        assert!(!text.contains("note: accounting"));
    }

    #[test]
    fn test_summary_json_shape() {
        let report = sample();
        let tally = StatusTally::of(&report.records);
        let view = SummaryJson {
            summary: &report.summary,
            ok_rows: tally.ok,
            divergent_rows: tally.divergent,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&view).unwrap()).unwrap();

        assert_eq!(value["total_records"], 3);
        assert_eq!(value["ok_rows"], 2);
        assert_eq!(value["divergent_rows"], 1);
    }
}
