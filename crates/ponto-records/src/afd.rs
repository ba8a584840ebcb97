//! # AFD Record Kinds
//!
//! The raw punch-record file (Arquivo Fonte de Dados) uses six record
//! shapes. Wire type codes: 1 header, 2 employer, 3 registrar identity
//! **and** punch events (dual-use code, discriminated by field shape),
//! 4 employee identity, 5 adjustment, 9 trailer.
//!
//! Each variant carries its own strongly-typed field set; the shared wire
//! code between [`AfdRecord::RegistrarIdentity`] and [`AfdRecord::Punch`]
//! only appears at encode time.
//!
//! ## Layout (fields after NSR + type code)
//!
//! | kind               | fields                                               |
//! |--------------------|------------------------------------------------------|
//! | Header             | cnpj 14, period start 8, period end 8, generated 12  |
//! | Employer           | cnpj 14, cei 12, name 52                             |
//! | RegistrarIdentity  | REP serial 17, software version 8                    |
//! | EmployeeIdentity   | pis 11, name 52                                      |
//! | Punch              | date 8, time 4, pis 11                               |
//! | Adjustment         | date 8, field label 12, time 4, pis 11               |
//! | Trailer            | record count 9                                       |

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ponto_core::{Cnpj, Period, Pis};

use crate::field::{
    self, date8, datetime12, render_line, space_right, time4, zero_left, zero_left_u32,
};
use crate::nsr::Nsr;
use crate::punch::PunchKind;

/// One logical AFD record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfdRecord {
    /// File header: employer CNPJ, reference period, generation timestamp.
    Header {
        /// Employer CNPJ.
        cnpj: Cnpj,
        /// Reference period covered by the file.
        period: Period,
        /// When the file was generated.
        generated_at: NaiveDateTime,
    },
    /// Employer identification.
    Employer {
        /// Employer CNPJ.
        cnpj: Cnpj,
        /// Employer CEI, when one exists (zeros otherwise).
        cei: Option<String>,
        /// Employer legal name (razão social).
        company_name: String,
    },
    /// Identity of the recording REP device/software.
    RegistrarIdentity {
        /// REP serial number.
        rep_serial: String,
        /// Recording-software version.
        software_version: String,
    },
    /// Employee identification.
    EmployeeIdentity {
        /// Employee PIS.
        pis: Pis,
        /// Employee name.
        name: String,
    },
    /// One punch event.
    Punch {
        /// Day of the punch.
        date: NaiveDate,
        /// Clock time of the punch.
        time: NaiveTime,
        /// Employee PIS.
        pis: Pis,
    },
    /// A post-hoc adjustment of one punch field.
    Adjustment {
        /// Day of the adjusted entry.
        date: NaiveDate,
        /// Which punch field was adjusted.
        field: PunchKind,
        /// The adjusted value, when the field still carries one.
        time: Option<NaiveTime>,
        /// Employee PIS.
        pis: Pis,
    },
    /// File trailer embedding the final record count.
    Trailer {
        /// Total number of records in the file, the final NSR value.
        count: u32,
    },
}

impl AfdRecord {
    /// The wire type code. Registrar identity and punch events share
    /// code 3 — consumers discriminate by field shape.
    pub fn type_code(&self) -> u8 {
        match self {
            AfdRecord::Header { .. } => 1,
            AfdRecord::Employer { .. } => 2,
            AfdRecord::RegistrarIdentity { .. } => 3,
            AfdRecord::Punch { .. } => 3,
            AfdRecord::EmployeeIdentity { .. } => 4,
            AfdRecord::Adjustment { .. } => 5,
            AfdRecord::Trailer { .. } => 9,
        }
    }

    /// Encode this record as one wire line, advancing the sequence
    /// counter by exactly one.
    pub fn encode(&self, nsr: &mut Nsr) -> String {
        render_line(nsr, self.type_code(), &self.fields())
    }

    fn fields(&self) -> Vec<String> {
        match self {
            AfdRecord::Header {
                cnpj,
                period,
                generated_at,
            } => vec![
                zero_left(cnpj.as_digits(), field::CNPJ_WIDTH),
                period.start_yyyymmdd(),
                period.end_yyyymmdd(),
                datetime12(*generated_at),
            ],
            AfdRecord::Employer {
                cnpj,
                cei,
                company_name,
            } => vec![
                zero_left(cnpj.as_digits(), field::CNPJ_WIDTH),
                zero_left(cei.as_deref().unwrap_or(""), field::CEI_WIDTH),
                space_right(company_name, field::NAME_WIDTH),
            ],
            AfdRecord::RegistrarIdentity {
                rep_serial,
                software_version,
            } => vec![
                space_right(rep_serial, field::REP_SERIAL_WIDTH),
                space_right(software_version, field::SOFTWARE_VERSION_WIDTH),
            ],
            AfdRecord::EmployeeIdentity { pis, name } => vec![
                zero_left(pis.as_digits(), field::PIS_WIDTH),
                space_right(name, field::NAME_WIDTH),
            ],
            AfdRecord::Punch { date, time, pis } => vec![
                date8(*date),
                time4(*time),
                zero_left(pis.as_digits(), field::PIS_WIDTH),
            ],
            AfdRecord::Adjustment {
                date,
                field: adjusted,
                time,
                pis,
            } => vec![
                date8(*date),
                space_right(adjusted.label(), field::ADJUSTED_FIELD_WIDTH),
                time.map(time4)
                    .unwrap_or_else(|| "0".repeat(field::TIME_WIDTH)),
                zero_left(pis.as_digits(), field::PIS_WIDTH),
            ],
            AfdRecord::Trailer { count } => vec![zero_left_u32(*count, field::NSR_WIDTH)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pis() -> Pis {
        Pis::parse("12012345678").unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn header_line_shape() {
        let mut nsr = Nsr::new();
        let record = AfdRecord::Header {
            cnpj: Cnpj::parse("12345678000199").unwrap(),
            period: Period::new(date(1), date(31)).unwrap(),
            generated_at: date(31).and_hms_opt(10, 30, 0).unwrap(),
        };
        let line = record.encode(&mut nsr);
        assert_eq!(
            line,
            "000000001\t1\t12345678000199\t20260101\t20260131\t202601311030"
        );
    }

    #[test]
    fn short_cnpj_is_zero_padded_to_14() {
        let mut nsr = Nsr::new();
        // A 10-digit tax id must render left-zero-padded to 14 characters.
        let record = AfdRecord::Header {
            cnpj: Cnpj::parse("00001234567800").unwrap(),
            period: Period::new(date(1), date(31)).unwrap(),
            generated_at: date(31).and_hms_opt(0, 0, 0).unwrap(),
        };
        let line = record.encode(&mut nsr);
        assert!(line.contains("\t00001234567800\t"));
    }

    #[test]
    fn punch_and_registrar_share_type_code_3() {
        let punch = AfdRecord::Punch {
            date: date(5),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            pis: pis(),
        };
        let registrar = AfdRecord::RegistrarIdentity {
            rep_serial: "00004012345678901".into(),
            software_version: "3.2.1".into(),
        };
        assert_eq!(punch.type_code(), 3);
        assert_eq!(registrar.type_code(), 3);
        // Same code, different shape: punch has 3 payload fields, registrar 2.
        let mut nsr = Nsr::new();
        assert_eq!(punch.encode(&mut nsr).split('\t').count(), 5);
        assert_eq!(registrar.encode(&mut nsr).split('\t').count(), 4);
    }

    #[test]
    fn punch_line_shape() {
        let mut nsr = Nsr::new();
        let record = AfdRecord::Punch {
            date: date(5),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            pis: pis(),
        };
        assert_eq!(
            record.encode(&mut nsr),
            "000000001\t3\t20260105\t0800\t12012345678"
        );
    }

    #[test]
    fn adjustment_without_time_renders_zeros() {
        let mut nsr = Nsr::new();
        let record = AfdRecord::Adjustment {
            date: date(5),
            field: PunchKind::LunchStart,
            time: None,
            pis: pis(),
        };
        let line = record.encode(&mut nsr);
        assert!(line.contains("\tINICIO_INT  \t0000\t"));
    }

    #[test]
    fn trailer_embeds_count_at_nsr_width() {
        let mut nsr = Nsr::new();
        for _ in 0..10 {
            nsr.next();
        }
        let record = AfdRecord::Trailer {
            count: nsr.current() + 1,
        };
        assert_eq!(record.encode(&mut nsr), "000000011\t9\t000000011");
    }

    #[test]
    fn employee_name_is_space_padded_to_52() {
        let mut nsr = Nsr::new();
        let record = AfdRecord::EmployeeIdentity {
            pis: pis(),
            name: "Maria José".into(),
        };
        let line = record.encode(&mut nsr);
        let name_field = line.split('\t').nth(3).unwrap();
        assert_eq!(name_field.len(), 52);
        assert!(name_field.starts_with("Maria Jose"));
    }
}
