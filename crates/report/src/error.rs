use std::fmt;

#[derive(Debug)]
pub enum ReportError {
    /// Report payload did not deserialize.
    Payload(String),
    /// CSV serialization error.
    Csv(String),
    /// IO error (file write, etc.).
    Io(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(msg) => write!(f, "report parse error: {msg}"),
            Self::Csv(msg) => write!(f, "csv error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}
