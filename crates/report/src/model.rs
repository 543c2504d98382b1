use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One comparison row of the differences report.
///
/// The backend emits legacy header-style keys (`Código`, `Valor Financeiro`,
/// ...); they are accepted as aliases next to the snake_case names.
/// `absolute_difference` is independent data, not `abs(difference)`: unmatched
/// records can carry a zero signed difference with a nonzero absolute one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    #[serde(default, alias = "Código")]
    pub code: Option<String>,
    #[serde(default, alias = "Cliente")]
    pub client_name: Option<String>,
    #[serde(default, alias = "Valor Financeiro", deserialize_with = "lenient_amount")]
    pub financial_value: f64,
    #[serde(default, alias = "Valor Contabilidade", deserialize_with = "lenient_amount")]
    pub accounting_value: f64,
    #[serde(default, alias = "Diferença", deserialize_with = "lenient_amount")]
    pub difference: f64,
    #[serde(default, alias = "Diferença Absoluta", deserialize_with = "lenient_amount")]
    pub absolute_difference: f64,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Backend-computed aggregate. Read for display, never validated or
/// recomputed here. Absent fields read as zero, matching how the legacy UI
/// rendered them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, alias = "total_registros")]
    pub total_records: u64,
    #[serde(default, alias = "registros_ambos")]
    pub matched_records: u64,
    #[serde(default, alias = "registros_com_diferenca")]
    pub records_with_difference: u64,
    #[serde(default, alias = "registros_so_financeiro")]
    pub financial_only_records: u64,
    #[serde(default, alias = "registros_so_contabilidade")]
    pub accounting_only_records: u64,
    #[serde(default, alias = "valor_total_financeiro", deserialize_with = "lenient_amount")]
    pub financial_total: f64,
    #[serde(default, alias = "valor_total_contabilidade", deserialize_with = "lenient_amount")]
    pub accounting_total: f64,
    #[serde(default, alias = "diferenca_total", deserialize_with = "lenient_amount")]
    pub total_difference: f64,
    #[serde(default, alias = "diferenca_absoluta_total", deserialize_with = "lenient_amount")]
    pub absolute_difference_total: f64,
    #[serde(default, alias = "maior_diferenca", deserialize_with = "lenient_amount")]
    pub largest_difference: f64,
    #[serde(default, alias = "financeiro_normalizado")]
    pub financial_normalized: bool,
    #[serde(default, alias = "contabilidade_normalizada")]
    pub accounting_normalized: bool,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The backend response: summary plus the flat record list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, alias = "resumo")]
    pub summary: Summary,
    #[serde(default, alias = "todas_diferencas")]
    pub records: Vec<DiffRecord>,
}

impl Report {
    /// Parse a report payload from JSON.
    pub fn from_json(data: &str) -> Result<Self, ReportError> {
        serde_json::from_str(data).map_err(|e| ReportError::Payload(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Lenient amounts
// ---------------------------------------------------------------------------

/// Amounts arrive as numbers, but legacy exports also carried nulls and
/// formatted strings. Anything unreadable is 0 so one bad record cannot
/// break sort or tally for the whole report.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

fn amount_from_value(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_amount_str(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse a money-ish string: optional `R$` prefix, `.` thousands with `,`
/// decimals (pt-BR) or plain decimal point.
fn parse_amount_str(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    let negative = s.starts_with('-');
    s = s.trim_start_matches('-').trim_start();
    s = s.strip_prefix("R$").unwrap_or(s).trim_start();
    if s.is_empty() {
        return None;
    }

    let normalized = if s.contains(',') {
        // pt-BR: dots group thousands, comma separates cents
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .map(|v| if negative { -v } else { v })
}
