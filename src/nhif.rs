// 🏥 NHIF Deduction - fixed-rate withholding on a gross payment

/// Share of every gross payment withheld for the national insurance fund
pub const NHIF_RATE: f64 = 0.10;

/// Computes the amount withheld from a gross payment
pub trait DeductionCalculator {
    /// Withheld amount for `gross_amount`
    ///
    /// No validation: zero yields zero, negative input yields a
    /// negative deduction.
    fn calculate(&self, gross_amount: f64) -> f64;
}

/// NHIF contribution at the fixed [`NHIF_RATE`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Nhif;

impl DeductionCalculator for Nhif {
    fn calculate(&self, gross_amount: f64) -> f64 {
        gross_amount * NHIF_RATE
    }
}
