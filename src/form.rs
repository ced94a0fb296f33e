// 📝 Patient Form - raw text input → typed submission
//
// The form keeps exactly what the user typed. Parsing happens on
// submission and a bad field comes back as an InputError instead of
// aborting the caller.

use crate::clock::Clock;
use crate::patient::PatientRegistry;
use crate::payment::Payment;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

// ============================================================================
// FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Payment,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Age,
            FormField::Age => FormField::Payment,
            FormField::Payment => FormField::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Name => FormField::Payment,
            FormField::Age => FormField::Name,
            FormField::Payment => FormField::Age,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Age => "Age",
            FormField::Payment => "Payment",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Age or payment text could not be read as a number
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("age must be a whole number, got {input:?}")]
    InvalidAge {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("payment must be a number, got {input:?}")]
    InvalidPayment {
        input: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("payment must be a finite number, got {input:?}")]
    NonFinitePayment { input: String },
}

impl InputError {
    /// Form field the error points at
    pub fn field(&self) -> FormField {
        match self {
            InputError::InvalidAge { .. } => FormField::Age,
            InputError::InvalidPayment { .. } | InputError::NonFinitePayment { .. } => {
                FormField::Payment
            }
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Typed values read from the form
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub age: i32,
    pub gross_amount: f64,
}

pub fn parse_age(raw: &str) -> Result<i32, InputError> {
    let trimmed = raw.trim();
    trimmed.parse::<i32>().map_err(|source| InputError::InvalidAge {
        input: raw.to_string(),
        source,
    })
}

pub fn parse_payment(raw: &str) -> Result<f64, InputError> {
    let amount = raw
        .trim()
        .parse::<f64>()
        .map_err(|source| InputError::InvalidPayment {
            input: raw.to_string(),
            source,
        })?;

    // "inf" and "NaN" parse fine but are not amounts
    if !amount.is_finite() {
        return Err(InputError::NonFinitePayment {
            input: raw.to_string(),
        });
    }

    Ok(amount)
}

// ============================================================================
// FORM
// ============================================================================

/// Raw text of the "Add Patient" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub payment: String,
}

impl PatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Payment => &self.payment,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
            FormField::Payment => &mut self.payment,
        }
    }

    /// Reset all input fields; the registry is not involved
    pub fn clear(&mut self) {
        self.name.clear();
        self.age.clear();
        self.payment.clear();
    }

    /// Parse the raw fields. The name is taken as typed, minus surrounding whitespace.
    pub fn parse(&self) -> Result<Submission, InputError> {
        Ok(Submission {
            name: self.name.trim().to_string(),
            age: parse_age(&self.age)?,
            gross_amount: parse_payment(&self.payment)?,
        })
    }

    /// Parse, build the payment and record the patient
    ///
    /// On error nothing is added to the registry.
    pub fn submit(
        &self,
        registry: &mut PatientRegistry,
        clock: &dyn Clock,
    ) -> Result<Payment, InputError> {
        let submission = self.parse().map_err(|err| {
            tracing::warn!(field = err.field().label(), error = %err, "input rejected");
            err
        })?;

        let payment = Payment::create(submission.gross_amount, clock);
        registry.add_patient(submission.name, submission.age, payment);

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2023, 12, 31)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
        )
    }

    fn form(name: &str, age: &str, payment: &str) -> PatientForm {
        PatientForm {
            name: name.to_string(),
            age: age.to_string(),
            payment: payment.to_string(),
        }
    }

    #[test]
    fn test_submit_valid_form() {
        let mut registry = PatientRegistry::new();
        let payment = form("Alice", "30", "1000")
            .submit(&mut registry, &clock())
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(payment.net_amount(), 900.0);
        assert_eq!(
            registry.render(),
            "Patients Details:\nPatient 1: Name: Alice, Age: 30, Net Payment: 900, NHIF Amount: 100, Date: 2023-12-31\n"
        );
    }

    #[test]
    fn test_submit_trims_whitespace() {
        let mut registry = PatientRegistry::new();
        form("  Bob ", " 42 ", " 10.5\t")
            .submit(&mut registry, &clock())
            .unwrap();

        let bob = registry.get(0).unwrap();
        assert_eq!(bob.name(), "Bob");
        assert_eq!(bob.age(), 42);
        assert!((bob.payment().unwrap().gross_amount() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_age_is_recoverable() {
        let mut registry = PatientRegistry::new();
        let err = form("Carol", "thirty", "100")
            .submit(&mut registry, &clock())
            .unwrap_err();

        assert!(matches!(err, InputError::InvalidAge { ref input, .. } if input == "thirty"));
        assert_eq!(err.field(), FormField::Age);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fractional_age_is_rejected() {
        assert!(matches!(parse_age("30.5"), Err(InputError::InvalidAge { .. })));
        assert!(matches!(parse_age(""), Err(InputError::InvalidAge { .. })));
    }

    #[test]
    fn test_invalid_payment_is_recoverable() {
        let mut registry = PatientRegistry::new();
        let err = form("Dan", "50", "12,00")
            .submit(&mut registry, &clock())
            .unwrap_err();

        assert!(matches!(err, InputError::InvalidPayment { .. }));
        assert_eq!(err.field(), FormField::Payment);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_non_finite_payment_is_rejected() {
        for raw in ["inf", "-infinity", "NaN"] {
            let err = parse_payment(raw).unwrap_err();
            assert_eq!(
                err,
                InputError::NonFinitePayment {
                    input: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn test_negative_values_parse() {
        assert_eq!(parse_age("-3").unwrap(), -3);
        assert_eq!(parse_payment("-20.25").unwrap(), -20.25);
    }

    #[test]
    fn test_error_messages() {
        let err = parse_age("abc").unwrap_err();
        assert_eq!(err.to_string(), "age must be a whole number, got \"abc\"");

        let err = parse_payment("1.2.3").unwrap_err();
        assert_eq!(err.to_string(), "payment must be a number, got \"1.2.3\"");
    }

    #[test]
    fn test_clear_resets_fields_only() {
        let mut registry = PatientRegistry::new();
        let mut f = form("Eve", "22", "300");
        f.submit(&mut registry, &clock()).unwrap();

        f.clear();

        assert_eq!(f, PatientForm::new());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_field_navigation_cycles() {
        let start = FormField::Name;
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.previous(), FormField::Payment);

        let mut f = PatientForm::new();
        f.field_mut(FormField::Age).push_str("7");
        assert_eq!(f.field(FormField::Age), "7");
    }
}
