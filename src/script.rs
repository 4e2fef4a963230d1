//! In-page script assembly. Every script is an IIFE returning a
//! `JSON.stringify`-ed probe with a `status` field; per-invocation state
//! lives under `window.__cdpFiledrop` keyed by picker id.

use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::geometry::DropPoint;

/// Attribute stamped on every injected picker control.
pub(crate) const MARKER_ATTR: &str = "data-cdp-filedrop";

pub(crate) async fn eval_json<T: DeserializeOwned>(page: &Page, js: &str) -> Result<T> {
    let raw: String = page.evaluate(js).await?.into_value()?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn escape_js_single(input: &str) -> String {
    input.replace('\\', "\\\\").replace('\'', "\\'")
}

pub(crate) fn js_array(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!("'{}'", escape_js_single(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// CSS selector matching the control injected for `id`.
pub(crate) fn input_selector(id: u64) -> String {
    format!("input[{}='{}']", MARKER_ATTR, id)
}

const INJECT: &str = r#"
(function () {
    const target = document.querySelector('__SELECTOR__');
    if (!target) return JSON.stringify({ status: 'target_not_found' });
    const doc = target.ownerDocument;
    if (!doc) return JSON.stringify({ status: 'detached_target' });

    const registry = window.__cdpFiledrop = window.__cdpFiledrop || {};
    const input = doc.createElement('input');
    input.type = 'file';
    input.setAttribute('__ATTR__', '__ID__');
    const state = { target: target, input: input, transfer: null, selectedCount: -1 };
    input.onchange = function () {
        state.selectedCount = input.files ? input.files.length : 0;
    };
    target.appendChild(input);
    registry['__ID__'] = state;
    return JSON.stringify({ status: 'ok' });
})()
"#;

pub(crate) fn inject_picker(id: u64, target_selector: &str) -> String {
    INJECT
        .replace("__SELECTOR__", &escape_js_single(target_selector))
        .replace("__ATTR__", MARKER_ATTR)
        .replace("__ID__", &id.to_string())
}

const SELECTION_PROBE: &str = r#"
(function () {
    const state = (window.__cdpFiledrop || {})['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    if (state.selectedCount < 0) return JSON.stringify({ status: 'pending' });
    const files = state.input.files;
    const names = [];
    for (let i = 0; files && i < files.length; i++) names.push(files[i].name);
    return JSON.stringify({ status: 'selected', count: state.selectedCount, names: names });
})()
"#;

pub(crate) fn selection_probe(id: u64) -> String {
    SELECTION_PROBE.replace("__ID__", &id.to_string())
}

const FIRE_CHANGE: &str = r#"
(function () {
    const state = (window.__cdpFiledrop || {})['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    state.input.dispatchEvent(new Event('change', { bubbles: true }));
    return JSON.stringify({ status: 'ok' });
})()
"#;

pub(crate) fn fire_change(id: u64) -> String {
    FIRE_CHANGE.replace("__ID__", &id.to_string())
}

const BUILD_PAYLOAD: &str = r#"
(function () {
    const state = (window.__cdpFiledrop || {})['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    const files = state.input.files;
    if (!files || files.length === 0) return JSON.stringify({ status: 'empty_selection' });

    const transfer = new DataTransfer();
    transfer.items.add(files[0]);

    const fileNames = [];
    const skippedKinds = [];
    for (let i = 0; i < transfer.items.length; i++) {
        const item = transfer.items[i];
        if (item.kind === 'file') {
            const file = item.getAsFile();
            fileNames.push(file ? file.name : '');
        } else {
            skippedKinds.push(item.kind);
        }
    }
    if (fileNames.length === 0) {
        return JSON.stringify({ status: 'no_file_items', skipped_kinds: skippedKinds });
    }

    state.transfer = transfer;
    return JSON.stringify({
        status: 'ok',
        file_names: fileNames,
        skipped_kinds: skippedKinds,
        selection_count: files.length
    });
})()
"#;

pub(crate) fn build_payload(id: u64) -> String {
    BUILD_PAYLOAD.replace("__ID__", &id.to_string())
}

const RECT_PROBE: &str = r#"
(function () {
    const state = (window.__cdpFiledrop || {})['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    const rect = state.target.getBoundingClientRect();
    return JSON.stringify({
        status: 'ok',
        left: rect.left,
        top: rect.top,
        width: rect.width,
        height: rect.height
    });
})()
"#;

pub(crate) fn rect_probe(id: u64) -> String {
    RECT_PROBE.replace("__ID__", &id.to_string())
}

const DISPATCH: &str = r#"
(function () {
    const state = (window.__cdpFiledrop || {})['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    const transfer = state.transfer;
    if (!transfer || transfer.items.length === 0) {
        return JSON.stringify({ status: 'empty_payload' });
    }

    let dispatched = 0;
    for (const name of [__EVENTS__]) {
        const evt = new DragEvent(name, {
            bubbles: true,
            cancelable: true,
            clientX: __X__,
            clientY: __Y__,
            dataTransfer: transfer
        });
        state.target.dispatchEvent(evt);
        dispatched += 1;
    }
    return JSON.stringify({ status: 'ok', dispatched: dispatched });
})()
"#;

pub(crate) fn dispatch_events(id: u64, events: &[&str], point: DropPoint) -> String {
    DISPATCH
        .replace("__EVENTS__", &js_array(events))
        .replace("__X__", &point.x.to_string())
        .replace("__Y__", &point.y.to_string())
        .replace("__ID__", &id.to_string())
}

const DISPOSE: &str = r#"
(function () {
    const registry = window.__cdpFiledrop || {};
    const state = registry['__ID__'];
    if (!state) return JSON.stringify({ status: 'no_picker' });
    if (state.input && state.input.parentNode) {
        state.input.parentNode.removeChild(state.input);
    }
    delete registry['__ID__'];
    return JSON.stringify({ status: 'ok' });
})()
"#;

pub(crate) fn dispose_picker(id: u64) -> String {
    DISPOSE.replace("__ID__", &id.to_string())
}
