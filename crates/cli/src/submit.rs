//! `rcv submit` — upload the three spreadsheets and run a reconciliation.
//!
//! The report JSON goes to `--output` (or stdout with `-o -`) exactly as
//! the service sent it; the human recap goes to stderr so piping the
//! report into `rcv view -` stays clean.

use std::fs;
use std::io;
use std::path::PathBuf;

use reconview_report::period::{format_closing_date, parse_closing_date};

use crate::api::{ApiClient, SubmitRequest};
use crate::summary;
use crate::upload::{check_upload, UploadRole};
use crate::CliError;

#[allow(clippy::too_many_arguments)]
pub fn cmd_submit(
    financial: PathBuf,
    accounting: PathBuf,
    general: PathBuf,
    company: Option<i64>,
    account: Option<String>,
    closing_date: Option<String>,
    output: PathBuf,
    api_url: &str,
    quiet: bool,
) -> Result<(), CliError> {
    for (role, path) in [
        (UploadRole::Financial, &financial),
        (UploadRole::Accounting, &accounting),
        (UploadRole::General, &general),
    ] {
        check_upload(path).map_err(|e| CliError::args(format!("{}: {}", role.flag(), e)))?;
    }

    // Canonicalize before it goes on the wire; the service runs the same
    // check and its message would only arrive after the full upload.
    let closing = match closing_date.as_deref() {
        Some(raw) => Some(
            parse_closing_date(raw)
                .map(format_closing_date)
                .map_err(|e| {
                    CliError::args(format!("--closing-date: {}", e))
                        .with_hint("use DD/MM/YYYY, falling on the last day of the month")
                })?,
        ),
        None => None,
    };

    if !quiet {
        eprintln!("submitting 3 spreadsheets to {} ...", api_url);
    }

    let client = ApiClient::new(api_url);
    let resp = client
        .submit(&SubmitRequest {
            financial: &financial,
            accounting: &accounting,
            general: &general,
            company_id: company,
            account_code: account.as_deref(),
            closing_date: closing.as_deref(),
        })
        .map_err(CliError::api)?;

    if output.as_os_str() == "-" {
        println!("{}", resp.raw);
    } else {
        fs::write(&output, &resp.raw)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;
        if !quiet {
            eprintln!("report written to {}", output.display());
        }
    }

    if !quiet {
        eprintln!();
        summary::write_human(&mut io::stderr(), &resp.report)
            .map_err(|e| CliError::io(format!("cannot write summary: {}", e)))?;
    }

    Ok(())
}
