//! Synthetic transfer payload built from the picker's selection.

use log::{info, warn};
use serde::Deserialize;

use crate::error::{DropError, Result};
use crate::picker::PickerHandle;
use crate::script;

/// What went into the transfer payload, as enumerated in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadReport {
    /// Names of the file-kind items carried by the payload.
    pub file_names: Vec<String>,
    /// Kinds of non-file items that were skipped.
    pub skipped_kinds: Vec<String>,
    /// Size of the selection the payload was built from.
    pub selection_count: u32,
}

impl PayloadReport {
    pub fn file_item_count(&self) -> usize {
        self.file_names.len()
    }
}

#[derive(Debug, Deserialize)]
struct PayloadProbe {
    status: String,
    #[serde(default)]
    file_names: Vec<String>,
    #[serde(default)]
    skipped_kinds: Vec<String>,
    #[serde(default)]
    selection_count: u32,
}

/// Wrap the picker's first selected file into a page-side `DataTransfer`.
///
/// The payload is stored with the picker's page state and consumed by
/// [`crate::dispatch_drop`]. An empty selection is an error; the payload is
/// never built empty. Non-file items are skipped with a diagnostic and
/// surfaced in the report.
pub async fn build_payload(picker: &PickerHandle) -> Result<PayloadReport> {
    picker.ensure_live()?;
    let probe: PayloadProbe =
        script::eval_json(picker.page(), &script::build_payload(picker.id())).await?;
    let report = report_from_probe(probe)?;
    for kind in &report.skipped_kinds {
        warn!(
            "picker {}: transfer item of kind `{}` is not a file, skipped",
            picker.id(),
            kind
        );
    }
    info!(
        "picker {}: payload holds {} file item(s) from a {}-file selection",
        picker.id(),
        report.file_item_count(),
        report.selection_count
    );
    Ok(report)
}

fn report_from_probe(probe: PayloadProbe) -> Result<PayloadReport> {
    match probe.status.as_str() {
        "ok" => Ok(PayloadReport {
            file_names: probe.file_names,
            skipped_kinds: probe.skipped_kinds,
            selection_count: probe.selection_count,
        }),
        "empty_selection" => Err(DropError::NoFileSelected),
        "no_file_items" => Err(DropError::EmptyPayload),
        "no_picker" => Err(DropError::PickerDisposed),
        other => Err(DropError::UnexpectedStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_file_selection_yields_one_file_item_and_no_skips() {
        let probe: PayloadProbe = serde_json::from_str(
            r#"{"status":"ok","file_names":["notes.txt"],"skipped_kinds":[],"selection_count":1}"#,
        )
        .unwrap();
        let report = report_from_probe(probe).unwrap();
        assert_eq!(report.file_item_count(), 1);
        assert_eq!(report.file_names, vec!["notes.txt"]);
        assert!(report.skipped_kinds.is_empty());
        assert_eq!(report.selection_count, 1);
    }

    #[test]
    fn empty_selection_is_a_hard_error() {
        let probe: PayloadProbe =
            serde_json::from_str(r#"{"status":"empty_selection"}"#).unwrap();
        assert!(matches!(
            report_from_probe(probe),
            Err(DropError::NoFileSelected)
        ));
    }

    #[test]
    fn payload_without_file_items_is_rejected() {
        let probe: PayloadProbe =
            serde_json::from_str(r#"{"status":"no_file_items","skipped_kinds":["string"]}"#)
                .unwrap();
        assert!(matches!(
            report_from_probe(probe),
            Err(DropError::EmptyPayload)
        ));
    }

    #[test]
    fn missing_page_state_maps_to_disposed() {
        let probe: PayloadProbe = serde_json::from_str(r#"{"status":"no_picker"}"#).unwrap();
        assert!(matches!(
            report_from_probe(probe),
            Err(DropError::PickerDisposed)
        ));
    }

    #[test]
    fn skipped_kinds_are_reported_not_fatal() {
        let probe: PayloadProbe = serde_json::from_str(
            r#"{"status":"ok","file_names":["a.bin"],"skipped_kinds":["string"],"selection_count":2}"#,
        )
        .unwrap();
        let report = report_from_probe(probe).unwrap();
        assert_eq!(report.skipped_kinds, vec!["string"]);
        assert_eq!(report.file_item_count(), 1);
    }
}
