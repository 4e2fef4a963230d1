//! Single-invocation coordination: picker → payload → event burst.

use std::path::Path;

use chromiumoxide::page::Page;
use log::warn;

use crate::cancel::CancelToken;
use crate::dispatch::{self, DispatchReport};
use crate::error::{DropError, Result};
use crate::payload::{self, PayloadReport};
use crate::picker::{PickerHandle, Selection, SelectionWait};

/// Per-invocation knobs. Defaults: centre drop point, indefinite selection
/// wait, picker disposed once the invocation finishes.
#[derive(Debug, Clone, Default)]
pub struct DropOptions {
    /// Horizontal offset from the target's left edge; `None`/zero means centre.
    pub offset_x: Option<f64>,
    /// Vertical offset from the target's top edge; `None`/zero means centre.
    pub offset_y: Option<f64>,
    pub wait: SelectionWait,
    pub cancel: CancelToken,
    /// Keep the injected control in the document after the invocation; the
    /// caller then owns [`PickerHandle::dispose`].
    pub retain_picker: bool,
}

/// Everything one invocation produced. `picker` is already disposed unless
/// [`DropOptions::retain_picker`] was set.
#[derive(Debug)]
pub struct DropOutcome {
    pub picker: PickerHandle,
    pub selection: Selection,
    pub payload: PayloadReport,
    pub dispatch: DispatchReport,
}

/// Inject a picker under `target_selector`, wait for the host to report a
/// file selection on it, then build the transfer payload and fire the drop
/// burst on the target.
pub async fn simulate_file_drop(
    page: &Page,
    target_selector: &str,
    options: &DropOptions,
) -> Result<DropOutcome> {
    let picker = PickerHandle::inject(page, target_selector).await?;
    drive(picker, None, options).await
}

/// Like [`simulate_file_drop`], but delivers `file` onto the picker control
/// programmatically instead of waiting for an interactive selection.
pub async fn deliver_file_drop(
    page: &Page,
    target_selector: &str,
    file: impl AsRef<Path>,
    options: &DropOptions,
) -> Result<DropOutcome> {
    let picker = PickerHandle::inject(page, target_selector).await?;
    drive(picker, Some(file.as_ref()), options).await
}

async fn drive(
    mut picker: PickerHandle,
    file: Option<&Path>,
    options: &DropOptions,
) -> Result<DropOutcome> {
    let run = async {
        if let Some(path) = file {
            picker.set_files(&[path]).await?;
        }
        let selection = picker
            .wait_for_selection(&options.wait, &options.cancel)
            .await?;
        let payload = payload::build_payload(&picker).await?;
        let dispatch =
            dispatch::dispatch_drop(&picker, options.offset_x, options.offset_y).await?;
        Ok::<_, DropError>((selection, payload, dispatch))
    }
    .await;

    match run {
        Ok((selection, payload, dispatch)) => {
            if !options.retain_picker {
                picker.dispose().await?;
            }
            Ok(DropOutcome {
                picker,
                selection,
                payload,
                dispatch,
            })
        }
        Err(err) => {
            if !options.retain_picker {
                if let Err(dispose_err) = picker.dispose().await {
                    warn!(
                        "picker {}: not disposed after failed invocation: {}",
                        picker.id(),
                        dispose_err
                    );
                }
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_centre_the_drop_and_dispose_the_picker() {
        let options = DropOptions::default();
        assert_eq!(options.offset_x, None);
        assert_eq!(options.offset_y, None);
        assert!(!options.retain_picker);
        assert!(!options.cancel.is_cancelled());
        assert_eq!(options.wait.timeout, None);
        assert_eq!(options.wait.poll_interval, Duration::from_millis(200));
    }
}
