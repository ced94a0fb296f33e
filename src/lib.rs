// Hospital Payments - Core Library
// Patient registry, NHIF deduction and payment records for the TUI and import mode

pub mod batch;
pub mod clock;
pub mod config;
pub mod form;
pub mod logging;
pub mod nhif;
pub mod patient;
pub mod payment;

// Re-export commonly used types
pub use batch::{import_csv, ImportSummary, RejectedRow};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Cli, Command, ReportFormat};
pub use form::{FormField, InputError, PatientForm, Submission};
pub use logging::{init_logging, LogOutput};
pub use nhif::{DeductionCalculator, Nhif, NHIF_RATE};
pub use patient::{format_amount, render_line, Patient, PatientRegistry, RegistryTotals};
pub use payment::Payment;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
