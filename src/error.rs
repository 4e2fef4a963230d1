use std::time::Duration;

use chromiumoxide::error::CdpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DropError>;

/// Failure conditions of a single drop invocation. Every condition is
/// returned to the caller; none are diagnostic-only.
#[derive(Debug, Error)]
pub enum DropError {
    #[error("no element matches target selector `{selector}`")]
    TargetNotFound { selector: String },

    #[error("target element for `{selector}` has no owner document")]
    DetachedTarget { selector: String },

    #[error("file selection resolved with zero files, refusing to dispatch")]
    NoFileSelected,

    #[error("no file selection was reported within {waited:?}")]
    SelectionTimeout { waited: Duration },

    #[error("file selection wait was cancelled")]
    SelectionCancelled,

    #[error("target bounding rect is zero-sized ({width}x{height})")]
    DegenerateGeometry { width: f64, height: f64 },

    #[error("picker control has been disposed")]
    PickerDisposed,

    #[error("transfer payload contains no file items, refusing to dispatch")]
    EmptyPayload,

    #[error("page script reported unexpected status `{0}`")]
    UnexpectedStatus(String),

    #[error("page script returned a malformed probe: {0}")]
    MalformedProbe(#[from] serde_json::Error),

    #[error(transparent)]
    Cdp(#[from] CdpError),
}
