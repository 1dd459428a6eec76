//! Persisted Parameter Documents
//!
//! ## Overview
//!
//! A running pipeline exposes its tunable nodes through a
//! [`ConfigRegistry`](enginebay_core::ConfigRegistry). This crate moves those
//! parameters in and out of a JSON document so calibration survives a
//! restart:
//!
//! ```json
//! {
//!   "/Engine RPM/calibrate": { "multiplier": 0.0909, "offset": 0.0 },
//!   "/Engine Temp/curve": { "samples": [[0.0, 418.9], [5.0, 414.71]] },
//!   "/Bilge/input": { "pin": 17, "period_ms": 5000 }
//! }
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Capture**: [`ConfigDocument::capture`] snapshots every exposed path
//! 2. **Validate**: [`ConfigDocument::validate`] checks a document offline,
//!    before any node sees it
//! 3. **Apply**: [`ConfigDocument::apply`] pushes each value through the
//!    registry. A rejected value is reported and skipped; the rest still
//!    apply, and the rejected parameter keeps its previous value.
//!
//! Values equal to the current ones are skipped, so a captured document
//! can be applied back even though it carries read-only keys such as `pin`.

#![warn(missing_docs)]

pub mod document;
pub mod validation;

pub use document::{ApplyReport, ConfigDocument, Rejection};
pub use validation::{validate_param, ValidationIssue};

use thiserror_no_std::Error;

/// Document load/store errors
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// File could not be read or written
    #[error("config file {path}: {source}")]
    Io {
        /// File path as given
        path: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Document is not valid JSON or has the wrong shape
    #[error("config document parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document parsed but failed offline validation
    #[error("config document has {} invalid parameter(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
}

/// Result type for document operations
pub type Result<T> = core::result::Result<T, ConfigFileError>;
