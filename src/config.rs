// ⚙️ Command-line configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hospital-payments", version, about = "Record patients and their NHIF-adjusted payments")]
pub struct Cli {
    /// Log filter, e.g. "info" or "hospital_payments=debug"
    #[arg(long, env = "HOSPITAL_PAYMENTS_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Write logs to this file (the interactive UI only logs when this is set)
    #[arg(long, env = "HOSPITAL_PAYMENTS_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive terminal form (default)
    Ui,

    /// Load patients from a CSV file with a name,age,payment header and print the report
    Import {
        /// CSV file; reads stdin when omitted
        path: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl Cli {
    pub fn mode(&self) -> Command {
        self.command.clone().unwrap_or(Command::Ui)
    }
}
