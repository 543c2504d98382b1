//! HTTP client for the reconciliation service.
//!
//! Every command that talks to the backend goes through [`ApiClient`]:
//! - `companies` — `GET /empresas`
//! - `accounts` — `GET /plano-contas?empresa_id=N`
//! - `submit` — `POST /conciliacao/processar` (multipart upload)
//!
//! GET requests retry transient failures (network errors, 5xx, 429) with
//! exponential backoff. The multipart upload is sent exactly once: a retry
//! would re-run the whole reconciliation server-side.
//!
//! The service reports errors as FastAPI-style bodies, `{"detail": ...}`,
//! where `detail` is a plain string or a list of validation errors.

use std::fmt;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use reconview_report::Report;

use crate::upload::UploadRole;

// ── Constants ───────────────────────────────────────────────────────

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("rcv/", env!("CARGO_PKG_VERSION"));

/// A reconciliation run parses and crosses three full spreadsheets before
/// the server answers, so the upload gets a much longer timeout than the
/// 30s used for plain GETs.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(300);

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    /// The service could not be reached (refused, DNS, timeout).
    Connect(String),
    /// The service answered with a non-success HTTP status.
    Status { status: u16, message: String },
    /// The service answered 2xx but the payload did not decode.
    Decode(String),
    /// A local upload file could not be read while building the request.
    Io(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Connect(msg) => {
                write!(f, "cannot reach reconciliation service: {}", msg)
            }
            ApiError::Status { status, message } => {
                write!(f, "service error (HTTP {}): {}", status, message)
            }
            ApiError::Decode(msg) => write!(f, "unexpected service response: {}", msg),
            ApiError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// ── Reference data ──────────────────────────────────────────────────

/// A company registered in the service, from `GET /empresas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(alias = "nome")]
    pub name: String,
}

/// One entry of a company's chart of accounts, from `GET /plano-contas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    #[serde(alias = "codigo")]
    pub code: String,
    #[serde(default, alias = "descricao")]
    pub description: String,
}

// ── Submit request / response ───────────────────────────────────────

/// Everything one reconciliation run needs. Callers validate the upload
/// files first (see [`crate::upload::check_upload`]); the optional fields
/// are forwarded verbatim as form parts.
#[derive(Debug)]
pub struct SubmitRequest<'a> {
    pub financial: &'a Path,
    pub accounting: &'a Path,
    pub general: &'a Path,
    pub company_id: Option<i64>,
    pub account_code: Option<&'a str>,
    /// Already validated and formatted as `DD/MM/YYYY`.
    pub closing_date: Option<&'a str>,
}

/// A successful reconciliation run. `raw` holds the exact bytes the
/// service sent, so the report can be written to disk unmodified.
#[derive(Debug)]
pub struct SubmitResponse {
    pub report: Report,
    pub raw: String,
}

// ── ApiClient ───────────────────────────────────────────────────────

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build a client against `base_url` (trailing slashes are stripped).
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List companies registered in the service.
    pub fn companies(&self) -> Result<Vec<Company>, ApiError> {
        let body = self.get_json("/empresas", &[])?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Decode(format!("unexpected /empresas payload: {}", e)))
    }

    /// List the chart of accounts for one company.
    pub fn accounts(&self, company_id: i64) -> Result<Vec<LedgerAccount>, ApiError> {
        let body =
            self.get_json("/plano-contas", &[("empresa_id", company_id.to_string())])?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Decode(format!("unexpected /plano-contas payload: {}", e)))
    }

    /// Upload the three spreadsheets and run a reconciliation.
    ///
    /// Sent exactly once, no retry. Returns the parsed report on success.
    pub fn submit(&self, req: &SubmitRequest<'_>) -> Result<SubmitResponse, ApiError> {
        let mut form = reqwest::blocking::multipart::Form::new();
        for (role, path) in [
            (UploadRole::Financial, req.financial),
            (UploadRole::Accounting, req.accounting),
            (UploadRole::General, req.general),
        ] {
            form = form
                .file(role.form_field(), path)
                .map_err(|e| file_error(path, &e))?;
        }

        if let Some(id) = req.company_id {
            form = form.text("empresa_id", id.to_string());
        }
        if let Some(code) = req.account_code {
            form = form.text("conta_contabil", code.to_string());
        }
        if let Some(date) = req.closing_date {
            form = form.text("data_fechamento", date.to_string());
        }

        let resp = self
            .http
            .post(self.url("/conciliacao/processar"))
            .timeout(SUBMIT_TIMEOUT)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Connect(e.to_string()))?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
            return Err(ApiError::Status {
                status,
                message: extract_detail(&body, status),
            });
        }

        let text = resp
            .text()
            .map_err(|e| ApiError::Decode(format!("failed to read response body: {}", e)))?;
        let report = Report::from_json(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(SubmitResponse { report, raw: text })
    }

    /// GET a JSON endpoint with retry + exponential backoff.
    ///
    /// Retries network errors, 5xx and 429 up to `MAX_RETRIES` times,
    /// honouring `Retry-After` on 429. Other 4xx fail immediately with the
    /// service's `detail` message.
    fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path);
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let result = self.http.get(&url).query(query).send();

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    // Non-retryable 4xx: fail with the service's message
                    if status >= 400 && status < 500 && status != 429 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        return Err(ApiError::Status {
                            status,
                            message: extract_detail(&body, status),
                        });
                    }

                    // Retryable: 429, 5xx
                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            return Err(ApiError::Status {
                                status,
                                message: format!("gave up after {} attempts", MAX_RETRIES),
                            });
                        }

                        // Respect Retry-After header for 429
                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };

                        eprintln!(
                            "warning: retry {}/{} in {}s (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            wait,
                            status,
                        );
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    let text = resp.text().map_err(|e| {
                        ApiError::Decode(format!("failed to read response body: {}", e))
                    })?;
                    return serde_json::from_str(&text).map_err(|e| {
                        ApiError::Decode(format!(
                            "invalid JSON: {} (body: {})",
                            e,
                            &text[..text.len().min(200)],
                        ))
                    });
                }
                Err(e) => {
                    // Network/timeout errors: retry
                    if attempt == MAX_RETRIES {
                        return Err(ApiError::Connect(format!(
                            "{} (after {} attempts)",
                            e, MAX_RETRIES,
                        )));
                    }

                    eprintln!(
                        "warning: retry {}/{} in {}s ({})",
                        attempt + 1,
                        MAX_RETRIES,
                        backoff_secs,
                        e,
                    );
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

fn file_error(path: &Path, e: &io::Error) -> ApiError {
    ApiError::Io(format!("cannot read {}: {}", path.display(), e))
}

/// Pull a human-readable message out of a FastAPI error body.
fn extract_detail(body: &serde_json::Value, status: u16) -> String {
    match body.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => format!("HTTP {}", status),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
