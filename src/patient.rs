// 🧾 Patient Registry - append-only list of patients + text report
//
// Insertion order is display order. Patients are never removed or
// reordered; a patient carries at most one payment.

use crate::payment::Payment;
use serde::{Deserialize, Serialize};

/// First line of every rendered report
pub const REPORT_HEADER: &str = "Patients Details:";

/// Decimal places shown for amounts
const AMOUNT_DECIMALS: i32 = 4;

/// 2^52
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0;

// ============================================================================
// PATIENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    name: String,
    age: i32,
    payment: Option<Payment>,
}

impl Patient {
    /// Create patient without a payment
    pub fn new(name: String, age: i32) -> Self {
        Patient {
            name,
            age,
            payment: None,
        }
    }

    /// Create patient and attach its payment
    pub fn with_payment(name: String, age: i32, payment: Payment) -> Self {
        Patient {
            name,
            age,
            payment: Some(payment),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// All patients recorded during this run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a patient with its payment; returns the stored patient
    pub fn add_patient(&mut self, name: String, age: i32, payment: Payment) -> &Patient {
        self.push(Patient::with_payment(name, age, payment))
    }

    /// Append an already-built patient
    pub fn push(&mut self, patient: Patient) -> &Patient {
        tracing::debug!(
            patient = patient.name(),
            age = patient.age(),
            position = self.patients.len() + 1,
            "patient added"
        );
        self.patients.push(patient);
        &self.patients[self.patients.len() - 1]
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Patient by 0-based position
    pub fn get(&self, index: usize) -> Option<&Patient> {
        self.patients.get(index)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Sum of net and NHIF amounts over all payments
    pub fn totals(&self) -> RegistryTotals {
        self.patients
            .iter()
            .filter_map(Patient::payment)
            .fold(RegistryTotals::default(), |mut totals, payment| {
                totals.payments += 1;
                totals.net_amount += payment.net_amount();
                totals.withheld_amount += payment.withheld_amount();
                totals
            })
    }

    /// Render the full report, one line per patient, 1-indexed
    pub fn render(&self) -> String {
        let mut report = String::from(REPORT_HEADER);
        report.push('\n');

        for (i, patient) in self.patients.iter().enumerate() {
            report.push_str(&render_line(i + 1, patient));
            report.push('\n');
        }

        report
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegistryTotals {
    pub payments: usize,
    pub net_amount: f64,
    pub withheld_amount: f64,
}

// ============================================================================
// RENDERING
// ============================================================================

/// One report line; payment fields are left out when there is no payment
pub fn render_line(position: usize, patient: &Patient) -> String {
    let mut line = format!(
        "Patient {}: Name: {}, Age: {}",
        position, patient.name, patient.age
    );

    if let Some(payment) = &patient.payment {
        line.push_str(&format!(
            ", Net Payment: {}, NHIF Amount: {}, Date: {}",
            format_amount(payment.net_amount()),
            format_amount(payment.withheld_amount()),
            payment.created_date_formatted()
        ));
    }

    line
}

/// Round half away from zero to 4 decimals, printed without trailing zeros
///
/// Example: 900.0 → "900", 12.3456789 → "12.3457"
pub fn format_amount(amount: f64) -> String {
    let rounded = round_amount(amount);
    format!("{}", rounded)
}

/// Round half away from zero to 4 decimals
pub fn round_amount(amount: f64) -> f64 {
    let scale = 10f64.powi(AMOUNT_DECIMALS);
    let scaled = amount * scale;

    // Past 2^52 an f64 has no fractional digits left to round
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return amount;
    }

    let rounded = scaled.round() / scale;

    // -0.0 prints as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

// ============================================================================
// TESTS
// ============================================================================
