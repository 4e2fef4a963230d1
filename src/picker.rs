//! Ephemeral file-picker control injected into the target's subtree.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::dom::{
    GetDocumentParams, QuerySelectorParams, SetFileInputFilesParams,
};
use chromiumoxide::page::Page;
use log::{debug, info};
use serde::Deserialize;

use crate::cancel::CancelToken;
use crate::error::{DropError, Result};
use crate::script;

static NEXT_PICKER_ID: AtomicU64 = AtomicU64::new(1);

/// How [`PickerHandle::wait_for_selection`] polls the page for the
/// selection-changed flag.
#[derive(Debug, Clone)]
pub struct SelectionWait {
    /// Give up after this long; `None` waits until cancelled.
    pub timeout: Option<Duration>,
    pub poll_interval: Duration,
}

impl Default for SelectionWait {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// A resolved file selection as reported by the picker control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file_count: u32,
    pub file_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StatusProbe {
    status: String,
}

#[derive(Debug, Deserialize)]
struct SelectionProbe {
    status: String,
    #[serde(default)]
    count: u32,
    #[serde(default)]
    names: Vec<String>,
}

/// Handle to a file-input control injected as a child of the drop target.
///
/// The control stays attached to the document until [`dispose`] removes it;
/// nothing is cleaned up implicitly. Each handle owns its own page-side
/// state, so successive invocations against the same target never share
/// anything.
///
/// [`dispose`]: PickerHandle::dispose
pub struct PickerHandle {
    page: Page,
    id: u64,
    target_selector: String,
    disposed: bool,
}

impl fmt::Debug for PickerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerHandle")
            .field("id", &self.id)
            .field("target_selector", &self.target_selector)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl PickerHandle {
    /// Create a file-input control under the element matching
    /// `target_selector` (in that element's own document) and arm its
    /// selection listener.
    pub async fn inject(page: &Page, target_selector: &str) -> Result<Self> {
        let id = NEXT_PICKER_ID.fetch_add(1, Ordering::Relaxed);
        let probe: StatusProbe =
            script::eval_json(page, &script::inject_picker(id, target_selector)).await?;
        match probe.status.as_str() {
            "ok" => {}
            "target_not_found" => {
                return Err(DropError::TargetNotFound {
                    selector: target_selector.to_string(),
                })
            }
            "detached_target" => {
                return Err(DropError::DetachedTarget {
                    selector: target_selector.to_string(),
                })
            }
            other => return Err(DropError::UnexpectedStatus(other.to_string())),
        }
        info!("injected picker control {} under `{}`", id, target_selector);
        Ok(Self {
            page: page.clone(),
            id,
            target_selector: target_selector.to_string(),
            disposed: false,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target_selector(&self) -> &str {
        &self.target_selector
    }

    /// CSS selector matching the injected control inside the page.
    pub fn input_selector(&self) -> String {
        script::input_selector(self.id)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn page(&self) -> &Page {
        &self.page
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(DropError::PickerDisposed)
        } else {
            Ok(())
        }
    }

    /// Single poll of the selection flag. `Ok(None)` means the change
    /// listener has not fired yet.
    pub async fn probe_selection(&self) -> Result<Option<Selection>> {
        self.ensure_live()?;
        let probe: SelectionProbe =
            script::eval_json(&self.page, &script::selection_probe(self.id)).await?;
        selection_from_probe(probe)
    }

    /// Wait until the host reports a selection on the injected control.
    ///
    /// Resolves only once the control's change listener has fired. Fails
    /// with [`DropError::NoFileSelected`] if it fired with zero files, with
    /// [`DropError::SelectionTimeout`] when `wait.timeout` elapses, and with
    /// [`DropError::SelectionCancelled`] when `cancel` fires. The control is
    /// left in place in every case.
    pub async fn wait_for_selection(
        &self,
        wait: &SelectionWait,
        cancel: &CancelToken,
    ) -> Result<Selection> {
        let start = Instant::now();
        loop {
            if cancel.is_cancelled() {
                return Err(DropError::SelectionCancelled);
            }
            if let Some(selection) = self.probe_selection().await? {
                if selection.file_count == 0 {
                    return Err(DropError::NoFileSelected);
                }
                info!(
                    "picker {}: selection resolved with {} file(s)",
                    self.id, selection.file_count
                );
                return Ok(selection);
            }
            if let Some(timeout) = wait.timeout {
                if start.elapsed() >= timeout {
                    return Err(DropError::SelectionTimeout {
                        waited: start.elapsed(),
                    });
                }
            }
            debug!("picker {}: selection pending", self.id);
            tokio::select! {
                _ = cancel.cancelled() => return Err(DropError::SelectionCancelled),
                _ = tokio::time::sleep(wait.poll_interval) => {}
            }
        }
    }

    /// Deliver local files onto the injected control through the devtools
    /// `DOM.setFileInputFiles` command, then fire its change event.
    pub async fn set_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<()> {
        self.ensure_live()?;
        let files: Vec<String> = paths
            .iter()
            .map(|p| p.as_ref().to_string_lossy().into_owned())
            .collect();

        let doc = self
            .page
            .execute(GetDocumentParams::builder().depth(0).build())
            .await?;
        let root = doc.result.root.node_id;
        let query = QuerySelectorParams::new(root, self.input_selector());
        let node = self.page.execute(query).await?.result.node_id;

        let file_count = files.len();
        let mut set_files = SetFileInputFilesParams::new(files);
        set_files.node_id = Some(node);
        self.page.execute(set_files).await?;

        // A devtools file set does not reliably emit change on its own.
        let probe: StatusProbe =
            script::eval_json(&self.page, &script::fire_change(self.id)).await?;
        match probe.status.as_str() {
            "ok" => {
                info!("picker {}: set {} file(s) on control", self.id, file_count);
                Ok(())
            }
            "no_picker" => Err(DropError::PickerDisposed),
            other => Err(DropError::UnexpectedStatus(other.to_string())),
        }
    }

    /// Remove the control from the document and drop the page-side state.
    /// Safe to call twice.
    pub async fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let probe: StatusProbe =
            script::eval_json(&self.page, &script::dispose_picker(self.id)).await?;
        match probe.status.as_str() {
            // no_picker means the page-side state is already gone; the
            // handle is disposed either way.
            "ok" | "no_picker" => {
                self.disposed = true;
                info!("picker {} disposed", self.id);
                Ok(())
            }
            other => Err(DropError::UnexpectedStatus(other.to_string())),
        }
    }
}

fn selection_from_probe(probe: SelectionProbe) -> Result<Option<Selection>> {
    match probe.status.as_str() {
        "pending" => Ok(None),
        "selected" => Ok(Some(Selection {
            file_count: probe.count,
            file_names: probe.names,
        })),
        "no_picker" => Err(DropError::PickerDisposed),
        other => Err(DropError::UnexpectedStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(status: &str, count: u32, names: &[&str]) -> SelectionProbe {
        SelectionProbe {
            status: status.to_string(),
            count,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn pending_probe_is_not_a_selection() {
        assert_eq!(selection_from_probe(probe("pending", 0, &[])).unwrap(), None);
    }

    #[test]
    fn selected_probe_carries_count_and_names() {
        let selection = selection_from_probe(probe("selected", 1, &["notes.txt"]))
            .unwrap()
            .unwrap();
        assert_eq!(selection.file_count, 1);
        assert_eq!(selection.file_names, vec!["notes.txt"]);
    }

    #[test]
    fn missing_page_state_maps_to_disposed() {
        assert!(matches!(
            selection_from_probe(probe("no_picker", 0, &[])),
            Err(DropError::PickerDisposed)
        ));
    }

    #[test]
    fn unknown_status_is_surfaced() {
        match selection_from_probe(probe("weird", 0, &[])) {
            Err(DropError::UnexpectedStatus(status)) => assert_eq!(status, "weird"),
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn default_wait_polls_without_deadline() {
        let wait = SelectionWait::default();
        assert_eq!(wait.timeout, None);
        assert_eq!(wait.poll_interval, Duration::from_millis(200));
    }

    #[test]
    fn selection_probe_tolerates_missing_fields() {
        let probe: SelectionProbe = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(probe.status, "pending");
        assert_eq!(probe.count, 0);
        assert!(probe.names.is_empty());
    }
}
