pub mod formats;
pub mod table;

use clap::ValueEnum;

pub use formats::{render_csv, render_json};
pub use table::TableDisplay;

/// Output format for list-style commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Output format for single-record commands, which have no CSV form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}
