// 💵 Payment - immutable record of one net payment
//
// Built once at submission time; the NHIF deduction and the timestamp
// are fixed from that moment on.

use crate::clock::Clock;
use crate::nhif::{DeductionCalculator, Nhif};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date format used in reports
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    net_amount: f64,
    withheld_amount: f64,
    created_at: NaiveDateTime,
}

impl Payment {
    /// Create payment from a gross amount using the NHIF rate
    pub fn create(gross_amount: f64, clock: &dyn Clock) -> Self {
        Self::with_calculator(gross_amount, &Nhif, clock)
    }

    /// Create payment with an explicit deduction calculator
    pub fn with_calculator(
        gross_amount: f64,
        calculator: &dyn DeductionCalculator,
        clock: &dyn Clock,
    ) -> Self {
        let withheld_amount = calculator.calculate(gross_amount);

        Payment {
            net_amount: gross_amount - withheld_amount,
            withheld_amount,
            created_at: clock.now(),
        }
    }

    pub fn net_amount(&self) -> f64 {
        self.net_amount
    }

    /// NHIF amount
    pub fn withheld_amount(&self) -> f64 {
        self.withheld_amount
    }

    /// Gross amount the payment was created from
    pub fn gross_amount(&self) -> f64 {
        self.net_amount + self.withheld_amount
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Creation date as `YYYY-MM-DD`
    pub fn created_date_formatted(&self) -> String {
        self.created_at.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    const EPSILON: f64 = 1e-9;

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(23, 59, 58)
                .unwrap(),
        )
    }

    #[test]
    fn test_payment_creation() {
        let payment = Payment::create(1000.0, &clock());

        assert!((payment.net_amount() - 900.0).abs() < EPSILON);
        assert!((payment.withheld_amount() - 100.0).abs() < EPSILON);
        assert!((payment.gross_amount() - 1000.0).abs() < EPSILON);
        assert_eq!(payment.created_at(), clock().now());
    }

    #[test]
    fn test_payment_net_is_ninety_percent() {
        for gross in [0.0, 0.01, 57.3, 123.456789, 250_000.0] {
            let payment = Payment::create(gross, &clock());
            assert!((payment.net_amount() - gross * 0.90).abs() < EPSILON);
            assert!((payment.withheld_amount() - gross * 0.10).abs() < EPSILON);
        }
    }

    #[test]
    fn test_payment_date_formatted() {
        let payment = Payment::create(10.0, &clock());
        assert_eq!(payment.created_date_formatted(), "2024-03-05");
    }

    #[test]
    fn test_payment_custom_calculator() {
        struct Flat;
        impl DeductionCalculator for Flat {
            fn calculate(&self, _gross_amount: f64) -> f64 {
                5.0
            }
        }

        let payment = Payment::with_calculator(20.0, &Flat, &clock());
        assert_eq!(payment.withheld_amount(), 5.0);
        assert_eq!(payment.net_amount(), 15.0);
    }

    #[test]
    fn test_payment_serializes_timestamp() {
        let payment = Payment::create(1000.0, &clock());
        let json = serde_json::to_value(payment).unwrap();

        assert_eq!(json["created_at"], "2024-03-05T23:59:58");
        assert_eq!(json["withheld_amount"], 100.0);
    }
}
