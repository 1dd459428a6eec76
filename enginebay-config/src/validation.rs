//! Offline Parameter Checks
//!
//! These checks run on a document before it reaches any node. They cover
//! the parameter shapes that are bounded the same way on every node type:
//!
//! - Curves: at least two finite points, ascending inputs, within capacity
//! - Window lengths (`samples` as an integer): `1..=MAX_AVERAGE_WINDOW`
//! - Periods (`period_ms`): strictly positive
//! - Output paths (`sk_path`): non-empty text
//!
//! Node-specific bounds (a positive `r1`, a divider supply voltage) are
//! still enforced by the node itself when the document is applied.

use enginebay_core::constants::MAX_AVERAGE_WINDOW;
use enginebay_core::{CurveError, CurveTable, ParamValue};
use thiserror_no_std::Error;

/// One parameter that failed an offline check
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path} {key}: {reason}")]
pub struct ValidationIssue {
    /// Config path
    pub path: String,
    /// Parameter key
    pub key: String,
    /// What is wrong with the value
    pub reason: String,
}

/// Check a single parameter value
pub fn validate_param(path: &str, key: &str, value: &ParamValue) -> Result<(), ValidationIssue> {
    let issue = |reason: String| ValidationIssue {
        path: path.to_string(),
        key: key.to_string(),
        reason,
    };

    match (key, value) {
        (_, ParamValue::Curve(points)) => {
            let table = CurveTable::from_points(points).map_err(|e| issue(e.to_string()))?;
            if table.len() < 2 {
                return Err(issue(CurveError::TooFewPoints { len: table.len() }.to_string()));
            }
        }
        (_, ParamValue::Float(v)) if !v.is_finite() => {
            return Err(issue("not a finite number".into()));
        }
        ("samples", ParamValue::Int(n)) => {
            if *n < 1 || *n > MAX_AVERAGE_WINDOW as i64 {
                return Err(issue(format!("window must be 1..={MAX_AVERAGE_WINDOW}, got {n}")));
            }
        }
        ("period_ms", value) => match value.as_i64() {
            Some(ms) if ms > 0 => {}
            _ => return Err(issue("period must be a positive number of milliseconds".into())),
        },
        ("sk_path", value) => match value.as_str() {
            Some(path) if !path.trim().is_empty() => {}
            _ => return Err(issue("output path must be non-empty text".into())),
        },
        _ => {}
    }
    Ok(())
}
