//! Terminal window front-end
//!
//! A small form with a multi-line text field, "Generate QR Code" and
//! "Clear Input" buttons, and a region showing the last saved code.

pub mod app;
pub mod inputs;
mod theme;
mod views;

pub use app::{Dialog, DialogKind, Focus, Preview, TuiApp, run_tui};
