// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use hospital_payments::{
    import_csv, init_logging, Cli, Command, LogOutput, PatientRegistry, ReportFormat, SystemClock,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode() {
        Command::Import { path, format } => {
            let output = match &cli.log_file {
                Some(file) => LogOutput::File(file),
                None => LogOutput::Stderr,
            };
            init_logging(&cli.log_level, output)?;
            run_import(path.as_deref(), format)?;
        }
        Command::Ui => {
            let output = match &cli.log_file {
                Some(file) => LogOutput::File(file),
                None => LogOutput::Off,
            };
            init_logging(&cli.log_level, output)?;
            run_ui_mode()?;
        }
    }

    Ok(())
}

fn run_import(path: Option<&Path>, format: ReportFormat) -> Result<()> {
    let reader: Box<dyn Read> = match path {
        Some(p) => Box::new(
            File::open(p).with_context(|| format!("Failed to open CSV file {}", p.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let mut registry = PatientRegistry::new();
    let summary = import_csv(reader, &mut registry, &SystemClock)?;

    for rejected in &summary.rejected {
        eprintln!("✗ line {}: {}", rejected.line, rejected.error);
    }

    match format {
        ReportFormat::Text => {
            print!("{}", registry.render());
            println!();
            println!("✓ {} patients added, {} rows rejected", summary.added, summary.rejected.len());
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&registry)
                .context("Failed to serialize patient registry")?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let mut app = ui::App::new(PatientRegistry::new(), Box::new(SystemClock));
    ui::run_ui(&mut app)?;

    println!("{}", app.registry.render());

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or load patients from CSV: hospital-payments import <file>");
    std::process::exit(1);
}
