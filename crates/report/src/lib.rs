//! `reconview-report` — Differences-report view model.
//!
//! Pure view-model crate: consumes a deserialized reconciliation report and
//! derives filtered/sorted/paginated projections, status tallies and CSV
//! exports. No CLI or network dependencies.

pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod money;
pub mod paginate;
pub mod period;
pub mod sort;
pub mod status;
pub mod view;

pub use error::ReportError;
pub use model::{DiffRecord, Report, Summary};
pub use status::{RecordStatus, StatusTally};
pub use view::{DiffTable, ViewState};
