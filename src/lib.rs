//! Simulated operating-system drag-and-drop file delivery for Chrome pages
//! driven over the DevTools protocol.
//!
//! Rich web editors and IDEs often accept files only through a native drop
//! gesture and ignore programmatic writes to their file inputs. This crate
//! delivers a local file into such a target anyway: it injects an ephemeral
//! file-picker control under the target element, captures the selection,
//! wraps it into a `DataTransfer`, and fires a `dragenter` → `drop` →
//! `dragleave` burst at the target's centre (or at explicit offsets).
//!
//! The caller owns the CDP session; this crate only needs a
//! [`chromiumoxide::page::Page`] and a CSS selector for the target.
//!
//! ```no_run
//! use cdp_filedrop::{deliver_file_drop, DropOptions};
//! use chromiumoxide::browser::{Browser, BrowserConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (browser, mut handler) = Browser::launch(BrowserConfig::builder().build()?).await?;
//!     tokio::spawn(async move { while handler.next().await.is_some() {} });
//!
//!     let page = browser.new_page("https://example.com/editor").await?;
//!     let outcome =
//!         deliver_file_drop(&page, "#editor-drop-zone", "notes.txt", &DropOptions::default())
//!             .await?;
//!     println!("dispatched {} events", outcome.dispatch.dispatched);
//!     Ok(())
//! }
//! ```

mod cancel;
mod dispatch;
mod error;
mod geometry;
mod payload;
mod picker;
mod script;
mod simulate;

pub use cancel::CancelToken;
pub use dispatch::{dispatch_drop, DispatchReport, EVENT_SEQUENCE};
pub use error::{DropError, Result};
pub use geometry::{drop_point, DropPoint, TargetRect};
pub use payload::{build_payload, PayloadReport};
pub use picker::{PickerHandle, Selection, SelectionWait};
pub use simulate::{deliver_file_drop, simulate_file_drop, DropOptions, DropOutcome};
