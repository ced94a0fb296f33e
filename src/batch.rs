// 📥 Batch Import - CSV rows submitted through the patient form
//
// Each row goes through the same parsing as the interactive form, so a
// malformed row is rejected with its InputError and the rest still load.

use crate::clock::Clock;
use crate::form::{InputError, PatientForm};
use crate::patient::PatientRegistry;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;

/// One CSV row, kept as raw text
#[derive(Debug, Deserialize)]
struct PatientRow {
    name: String,
    age: String,
    payment: String,
}

impl From<PatientRow> for PatientForm {
    fn from(row: PatientRow) -> Self {
        PatientForm {
            name: row.name,
            age: row.age,
            payment: row.payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based line in the input, header included
    pub line: u64,
    pub error: InputError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub added: usize,
    pub rejected: Vec<RejectedRow>,
}

/// Read `name,age,payment` rows (with header) into the registry
///
/// Structural CSV errors (wrong column count, bad UTF-8) abort the import;
/// unparseable age or payment values only reject their row.
pub fn import_csv<R: Read>(
    reader: R,
    registry: &mut PatientRegistry,
    clock: &dyn Clock,
) -> Result<ImportSummary> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let mut summary = ImportSummary::default();

    for result in rdr.records() {
        let record = result.context("Failed to read patient row")?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: PatientRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Failed to deserialize patient row at line {}", line))?;
        let form = PatientForm::from(row);

        match form.submit(registry, clock) {
            Ok(_) => summary.added += 1,
            Err(error) => summary.rejected.push(RejectedRow { line, error }),
        }
    }

    tracing::info!(
        added = summary.added,
        rejected = summary.rejected.len(),
        "csv import finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_import_valid_rows() {
        let data = "name,age,payment\nAlice,30,1000\nBob,45,123.456789\n";
        let mut registry = PatientRegistry::new();

        let summary = import_csv(data.as_bytes(), &mut registry, &clock()).unwrap();

        assert_eq!(summary.added, 2);
        assert!(summary.rejected.is_empty());
        assert_eq!(
            registry.render(),
            "Patients Details:\n\
             Patient 1: Name: Alice, Age: 30, Net Payment: 900, NHIF Amount: 100, Date: 2024-01-02\n\
             Patient 2: Name: Bob, Age: 45, Net Payment: 111.1111, NHIF Amount: 12.3457, Date: 2024-01-02\n"
        );
    }

    #[test]
    fn test_import_rejects_bad_rows_and_continues() {
        let data = "name,age,payment\nAlice,thirty,1000\nBob,45,lots\nCarol,50,20\n";
        let mut registry = PatientRegistry::new();

        let summary = import_csv(data.as_bytes(), &mut registry, &clock()).unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.rejected.len(), 2);
        assert_eq!(summary.rejected[0].line, 2);
        assert!(matches!(summary.rejected[0].error, InputError::InvalidAge { .. }));
        assert_eq!(summary.rejected[1].line, 3);
        assert!(matches!(summary.rejected[1].error, InputError::InvalidPayment { .. }));
        assert_eq!(registry.get(0).unwrap().name(), "Carol");
    }

    #[test]
    fn test_import_missing_column_is_fatal() {
        let data = "name,age,payment\nAlice,30\n";
        let mut registry = PatientRegistry::new();

        assert!(import_csv(data.as_bytes(), &mut registry, &clock()).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_import_empty_input() {
        let mut registry = PatientRegistry::new();
        let summary = import_csv("name,age,payment\n".as_bytes(), &mut registry, &clock()).unwrap();

        assert_eq!(summary, ImportSummary::default());
    }
}
