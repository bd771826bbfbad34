//! Output module
//!
//! This module handles:
//! - Writing the dated CSV export of all records from a run
//! - Printing the run summary

mod csv_export;
pub mod stats;

pub use csv_export::{export_file_name, present_columns, write_csv, write_csv_file};
pub use stats::print_run_summary;
