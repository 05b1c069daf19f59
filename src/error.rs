use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Failed to write spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

pub type DResult<T> = Result<T, DispatchError>;

/// A problem the pipeline recovered from. Issues are reported next to the
/// output so the operator can correct the input.
#[derive(Clone, Debug, Error, Eq, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    #[error("Line {line_number} skipped ({reason}): {line}")]
    MalformedEntry {
        line_number: usize,
        line: String,
        reason: String,
    },
    #[error("Line {line_number}: unparseable pickup time \"{raw_time}\" for {name}")]
    UnparseableTime {
        line_number: usize,
        name: String,
        raw_time: String,
    },
    #[error("Vehicle for {context} ignored, plate \"{plate}\" / mobile \"{mobile}\" is incomplete")]
    IncompleteVehicleAssignment {
        context: String,
        plate: String,
        mobile: String,
    },
    #[error("Vehicle for {context} ignored: {reason}")]
    InvalidCapacity { context: String, reason: String },
}
