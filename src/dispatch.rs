//! Computes the injection point and fires the synthetic event burst.

use log::info;
use serde::Deserialize;

use crate::error::{DropError, Result};
use crate::geometry::{self, DropPoint, TargetRect};
use crate::picker::PickerHandle;
use crate::script;

/// The fixed synthetic event burst, in dispatch order. The repeated
/// `dragover` a real browser emits between enter and drop is deliberately
/// omitted.
pub const EVENT_SEQUENCE: [&str; 3] = ["dragenter", "drop", "dragleave"];

/// Result of one event burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchReport {
    /// Viewport point shared by all dispatched events.
    pub point: DropPoint,
    /// Number of events dispatched on the target.
    pub dispatched: u32,
}

#[derive(Debug, Deserialize)]
struct RectProbe {
    status: String,
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct DispatchProbe {
    status: String,
    #[serde(default)]
    dispatched: u32,
}

/// Fire `dragenter`, `drop`, `dragleave` on the picker's target, all at the
/// same point, all bubbling and cancelable, all carrying the payload built
/// by [`crate::build_payload`].
///
/// Offsets follow [`crate::drop_point`]: relative to the target's top-left
/// corner, `None`/zero falling back to the centre.
pub async fn dispatch_drop(
    picker: &PickerHandle,
    offset_x: Option<f64>,
    offset_y: Option<f64>,
) -> Result<DispatchReport> {
    picker.ensure_live()?;
    let rect = probe_rect(picker).await?;
    let point = geometry::drop_point(rect, offset_x, offset_y)?;
    let js = script::dispatch_events(picker.id(), &EVENT_SEQUENCE, point);
    let probe: DispatchProbe = script::eval_json(picker.page(), &js).await?;
    let report = report_from_probe(probe, point)?;
    info!(
        "picker {}: dispatched {} drag events at ({}, {})",
        picker.id(),
        report.dispatched,
        point.x,
        point.y
    );
    Ok(report)
}

async fn probe_rect(picker: &PickerHandle) -> Result<TargetRect> {
    let probe: RectProbe =
        script::eval_json(picker.page(), &script::rect_probe(picker.id())).await?;
    match probe.status.as_str() {
        "ok" => Ok(TargetRect {
            left: probe.left,
            top: probe.top,
            width: probe.width,
            height: probe.height,
        }),
        "no_picker" => Err(DropError::PickerDisposed),
        other => Err(DropError::UnexpectedStatus(other.to_string())),
    }
}

fn report_from_probe(probe: DispatchProbe, point: DropPoint) -> Result<DispatchReport> {
    match probe.status.as_str() {
        "ok" => Ok(DispatchReport {
            point,
            dispatched: probe.dispatched,
        }),
        "empty_payload" => Err(DropError::EmptyPayload),
        "no_picker" => Err(DropError::PickerDisposed),
        other => Err(DropError::UnexpectedStatus(other.to_string())),
    }
}
