//! # Output Filename Convention
//!
//! `AFD_{cnpj}_{startYYYYMMDD}_{endYYYYMMDD}.txt` for the tenant-wide raw
//! file, `AEJ_{cnpj}_{registration}_{startYYYYMMDD}_{endYYYYMMDD}.txt` for
//! the per-employee journey file. The detached-signature sibling swaps the
//! `.txt` extension for `.p7s`.

use ponto_core::{Cnpj, EmployeeRegistration, Period};

/// Filename for an AFD payload.
pub fn afd_filename(cnpj: &Cnpj, period: &Period) -> String {
    format!(
        "AFD_{}_{}_{}.txt",
        cnpj.as_digits(),
        period.start_yyyymmdd(),
        period.end_yyyymmdd()
    )
}

/// Filename for an AEJ payload.
pub fn aej_filename(cnpj: &Cnpj, registration: &EmployeeRegistration, period: &Period) -> String {
    format!(
        "AEJ_{}_{}_{}_{}.txt",
        cnpj.as_digits(),
        registration.as_str(),
        period.start_yyyymmdd(),
        period.end_yyyymmdd()
    )
}

/// Filename for the detached-signature sibling of a payload.
pub fn signature_filename(payload_filename: &str) -> String {
    match payload_filename.strip_suffix(".txt") {
        Some(stem) => format!("{stem}.p7s"),
        None => format!("{payload_filename}.p7s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period() -> Period {
        Period::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn afd_filename_shape() {
        let cnpj = Cnpj::parse("12345678000199").unwrap();
        assert_eq!(
            afd_filename(&cnpj, &period()),
            "AFD_12345678000199_20260101_20260131.txt"
        );
    }

    #[test]
    fn aej_filename_includes_registration() {
        let cnpj = Cnpj::parse("12345678000199").unwrap();
        let registration = EmployeeRegistration::parse("0001").unwrap();
        assert_eq!(
            aej_filename(&cnpj, &registration, &period()),
            "AEJ_12345678000199_0001_20260101_20260131.txt"
        );
    }

    #[test]
    fn signature_sibling_swaps_extension() {
        assert_eq!(
            signature_filename("AFD_12345678000199_20260101_20260131.txt"),
            "AFD_12345678000199_20260101_20260131.p7s"
        );
    }
}
