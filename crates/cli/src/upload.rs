//! Local validation of reconciliation uploads.
//!
//! The service only accepts `.xlsx` / `.xls` / `.csv` files up to 50 MiB.
//! Mirroring those checks here makes a bad file fail before any bytes go
//! on the wire.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ── Constants ───────────────────────────────────────────────────────

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

// ── Roles ───────────────────────────────────────────────────────────

/// The three spreadsheets a reconciliation run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRole {
    /// Financial movements (bank/cash side).
    Financial,
    /// Accounting report for the reconciled account.
    Accounting,
    /// General ledger covering all accounts.
    General,
}

impl UploadRole {
    /// Multipart form field the service expects for this file.
    pub fn form_field(&self) -> &'static str {
        match self {
            UploadRole::Financial => "arquivo_origem",
            UploadRole::Accounting => "arquivo_contabil",
            UploadRole::General => "arquivo_geral_contabilidade",
        }
    }

    /// Flag that supplies this file on `rcv submit`, for error messages.
    pub fn flag(&self) -> &'static str {
        match self {
            UploadRole::Financial => "--financial",
            UploadRole::Accounting => "--accounting",
            UploadRole::General => "--general",
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum UploadError {
    Unreadable { path: PathBuf, source: io::Error },
    NotAFile { path: PathBuf },
    BadExtension { path: PathBuf },
    TooLarge { path: PathBuf, size: u64 },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Unreadable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            UploadError::NotAFile { path } => {
                write!(f, "{} is not a file", path.display())
            }
            UploadError::BadExtension { path } => {
                write!(
                    f,
                    "{}: unsupported file type (expected .xlsx, .xls or .csv)",
                    path.display(),
                )
            }
            UploadError::TooLarge { path, size } => {
                write!(
                    f,
                    "{}: {:.1} MiB exceeds the {} MiB upload limit",
                    path.display(),
                    *size as f64 / (1024.0 * 1024.0),
                    MAX_UPLOAD_BYTES / (1024 * 1024),
                )
            }
        }
    }
}

impl std::error::Error for UploadError {}

// ── Validation ──────────────────────────────────────────────────────

/// Validate one upload before it goes on the wire.
pub fn check_upload(path: &Path) -> Result<(), UploadError> {
    let meta = fs::metadata(path).map_err(|e| UploadError::Unreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !meta.is_file() {
        return Err(UploadError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if !has_allowed_extension(path) {
        return Err(UploadError::BadExtension {
            path: path.to_path_buf(),
        });
    }
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
        });
    }

    Ok(())
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

// ── Tests ───────────────────────────────────────────────────────────
