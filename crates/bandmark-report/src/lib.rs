//! bandmark-report — Attempt report rendering.
//!
//! Renders [`bandmark_core::report::AttemptReport`]s as self-contained HTML
//! pages and as CSV for spreadsheet import.

pub mod csv;
pub mod html;

pub use csv::{results_csv, write_csv_report};
pub use html::{generate_html, write_html_report};
