//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a browser.
//! Use [`pretty_html`] and [`render_to_string`] to capture document output as
//! indented HTML for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{pretty_html, render_to_string};
