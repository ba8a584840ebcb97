//! # Error Hierarchy
//!
//! Validation errors for the domain primitive newtypes, built with
//! `thiserror`. Each variant carries the rejected input and the expected
//! format so operators can diagnose bad data without guesswork.
//!
//! Subsystem-specific errors (record encoding, certificate handling,
//! signing, storage, persistence) live in their own crates; this module
//! only covers the types defined here in `ponto-core`.

use thiserror::Error;

/// Validation errors for fiscal identifier newtypes and periods.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// CNPJ does not conform to the Receita Federal format (14 digits).
    #[error("invalid CNPJ: \"{0}\" (expected 14 digits, optionally as XX.XXX.XXX/XXXX-XX)")]
    InvalidCnpj(String),

    /// CPF does not conform to the Receita Federal format (11 digits).
    #[error("invalid CPF: \"{0}\" (expected 11 digits, optionally as XXX.XXX.XXX-XX)")]
    InvalidCpf(String),

    /// PIS/PASEP does not conform to the 11-digit format.
    #[error("invalid PIS: \"{0}\" (expected 11 digits, optionally as XXX.XXXXX.XX-X)")]
    InvalidPis(String),

    /// Employee registration (matrícula) is empty or too long.
    #[error("invalid registration: \"{0}\" (expected 1-30 alphanumeric characters)")]
    InvalidRegistration(String),

    /// Reference period end precedes its start.
    #[error("invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// The period start date.
        start: chrono::NaiveDate,
        /// The period end date.
        end: chrono::NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn invalid_cnpj_display_names_expected_format() {
        let err = ValidationError::InvalidCnpj("123".into());
        assert!(format!("{err}").contains("14 digits"));
    }

    #[test]
    fn invalid_period_display_carries_both_dates() {
        let err = ValidationError::InvalidPeriod {
            start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("2026-02-01"));
        assert!(msg.contains("2026-01-01"));
    }
}
