use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

use crate::error::ReportError;
use crate::model::DiffRecord;
use crate::status::RecordStatus;

/// Column headers, in export order. These are the legacy system's header
/// strings; downstream spreadsheets key on them.
pub const CSV_HEADERS: [&str; 6] = [
    "Código",
    "Cliente",
    "Valor Financeiro",
    "Valor Contabilidade",
    "Diferença",
    "Status",
];

/// Serialize rows to CSV. Every field is quoted; embedded quotes are doubled
/// per RFC 4180 (the legacy export left them raw, which broke re-import).
/// An empty row set still yields the header line.
pub fn write_csv<W: io::Write>(rows: &[&DiffRecord], out: W) -> Result<(), ReportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ReportError::Csv(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.code.clone().unwrap_or_default(),
                row.client_name.clone().unwrap_or_default(),
                row.financial_value.to_string(),
                row.accounting_value.to_string(),
                row.difference.to_string(),
                RecordStatus::classify(row).to_string(),
            ])
            .map_err(|e| ReportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ReportError::Io(e.to_string()))
}

/// CSV as an in-memory string.
pub fn csv_string(rows: &[&DiffRecord]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReportError::Csv(e.to_string()))
}

pub fn write_csv_file(rows: &[&DiffRecord], path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)
        .map_err(|e| ReportError::Io(format!("{}: {}", path.display(), e)))?;
    write_csv(rows, file)
}

/// Dated download name, `diferencas_YYYY-MM-DD.csv`. The caller supplies the
/// date so the rule stays testable.
pub fn export_filename(date: NaiveDate) -> String {
    format!("diferencas_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, client: &str, fin: f64, acc: f64, diff: f64, abs_diff: f64) -> DiffRecord {
        DiffRecord {
            code: Some(code.to_string()),
            client_name: Some(client.to_string()),
            financial_value: fin,
            accounting_value: acc,
            difference: diff,
            absolute_difference: abs_diff,
        }
    }

    #[test]
    fn header_plus_rows_with_status_labels() {
        let a = rec("A1", "Acme", 100.0, 100.0, 0.0, 0.0);
        let b = rec("B2", "Beta", 200.0, 150.0, 50.0, 50.0);
        let out = csv_string(&[&a, &b]).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "\"Código\",\"Cliente\",\"Valor Financeiro\",\"Valor Contabilidade\",\"Diferença\",\"Status\""
        );
        assert_eq!(lines[1], "\"A1\",\"Acme\",\"100\",\"100\",\"0\",\"OK\"");
        assert_eq!(lines[2], "\"B2\",\"Beta\",\"200\",\"150\",\"50\",\"DIVERGENT\"");
    }

    #[test]
    fn empty_rows_export_header_only() {
        let out = csv_string(&[]).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("\"Código\""));
    }

    #[test]
    fn missing_fields_export_as_empty_strings() {
        let record = DiffRecord {
            difference: 10.0,
            absolute_difference: 10.0,
            ..DiffRecord::default()
        };
        let out = csv_string(&[&record]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "\"\",\"\",\"0\",\"0\",\"10\",\"DIVERGENT\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let record = rec("A1", "Bar \"Zé\" Ltda", 1.5, 1.5, 0.0, 0.0);
        let out = csv_string(&[&record]).unwrap();
        assert!(out.contains("\"Bar \"\"Zé\"\" Ltda\""));
    }

    #[test]
    fn fractional_amounts_keep_their_decimals() {
        let record = rec("C9", "Gama", 10.25, 9.75, 0.5, 0.5);
        let out = csv_string(&[&record]).unwrap();
        assert!(out.contains("\"10.25\",\"9.75\",\"0.5\""));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_filename(
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        ));
        let record = rec("A1", "Acme", 100.0, 100.0, 0.0, 0.0);
        write_csv_file(&[&record], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(path.ends_with("diferencas_2026-08-23.csv"));
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(export_filename(date), "diferencas_2025-01-31.csv");
    }
}
