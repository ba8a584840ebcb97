//! # AEJ Record Kinds
//!
//! The processed-journey file (Arquivo Eletrônico de Jornada) covers one
//! employee and totals each day against the assigned work schedule. Wire
//! type codes: 1 header, 2 employer, 3 employee identity, 4 schedule
//! summary, 5 daily journey, 6 punch event, 7 daily totals, 8 period
//! totals, 9 trailer.
//!
//! ## Layout (fields after NSR + type code)
//!
//! | kind             | fields                                                    |
//! |------------------|-----------------------------------------------------------|
//! | Header           | cnpj 14, period start 8, period end 8, generated 12       |
//! | Employer         | cnpj 14, name 52                                          |
//! | EmployeeIdentity | pis 11, cpf 12, registration 30, name 52                  |
//! | ScheduleSummary  | active days 1, weekly minutes 6, break minutes 4          |
//! | DailyJourney     | date 8, expected minutes 6, worked minutes 6              |
//! | Punch            | date 8, time 4                                            |
//! | DailyTotals      | date 8, worked 6, overtime 6, shortfall 6, adjusted 1     |
//! | PeriodTotals     | worked 6, overtime 6, shortfall 6, days 4, adjustments 4  |
//! | Trailer          | record count 9                                            |

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ponto_core::{Cnpj, Cpf, EmployeeRegistration, Period, Pis};

use crate::field::{
    self, date8, datetime12, render_line, space_right, time4, zero_left, zero_left_u32,
};
use crate::nsr::Nsr;

/// One logical AEJ record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AejRecord {
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
        /// Employer legal name (razão social).
        company_name: String,
    },
    /// Identity of the employee the file covers.
    EmployeeIdentity {
        /// Employee PIS.
        pis: Pis,
        /// Employee CPF.
        cpf: Cpf,
        /// Employer-assigned registration (matrícula).
        registration: EmployeeRegistration,
        /// Employee name.
        name: String,
    },
    /// Summary of the assigned work schedule.
    ScheduleSummary {
        /// Number of active days per week (0-7).
        active_days: u8,
        /// Expected minutes across one week of the schedule.
        weekly_minutes: u32,
        /// Configured break length in minutes.
        break_minutes: u32,
    },
    /// Expected versus worked minutes for one day.
    DailyJourney {
        /// The day.
        date: NaiveDate,
        /// Expected minutes per the schedule (zero without a schedule).
        expected_minutes: u32,
        /// Minutes actually worked.
        worked_minutes: u32,
    },
    /// One punch event (the employee is implicit — one file, one employee).
    Punch {
        /// Day of the punch.
        date: NaiveDate,
        /// Clock time of the punch.
        time: NaiveTime,
    },
    /// Totals for one day.
    DailyTotals {
        /// The day.
        date: NaiveDate,
        /// Minutes worked.
        worked_minutes: u32,
        /// Overtime minutes: `max(0, worked - expected)`.
        overtime_minutes: u32,
        /// Shortfall minutes: `max(0, expected - worked)`.
        shortfall_minutes: u32,
        /// Whether any punch of the day was adjusted post-hoc.
        adjusted: bool,
    },
    /// Totals across the whole period.
    PeriodTotals {
        /// Sum of worked minutes.
        worked_minutes: u32,
        /// Sum of overtime minutes.
        overtime_minutes: u32,
        /// Sum of shortfall minutes.
        shortfall_minutes: u32,
        /// Number of days with a time entry.
        day_count: u32,
        /// Number of days carrying an adjustment.
        adjustment_count: u32,
    },
    /// File trailer embedding the final record count.
    Trailer {
        /// Total number of records in the file, the final NSR value.
        count: u32,
    },
}

impl AejRecord {
    /// The wire type code for this record kind.
    pub fn type_code(&self) -> u8 {
        match self {
            AejRecord::Header { .. } => 1,
            AejRecord::Employer { .. } => 2,
            AejRecord::EmployeeIdentity { .. } => 3,
            AejRecord::ScheduleSummary { .. } => 4,
            AejRecord::DailyJourney { .. } => 5,
            AejRecord::Punch { .. } => 6,
            AejRecord::DailyTotals { .. } => 7,
            AejRecord::PeriodTotals { .. } => 8,
            AejRecord::Trailer { .. } => 9,
        }
    }

    /// Encode this record as one wire line, advancing the sequence
    /// counter by exactly one.
    pub fn encode(&self, nsr: &mut Nsr) -> String {
        render_line(nsr, self.type_code(), &self.fields())
    }

    fn fields(&self) -> Vec<String> {
        match self {
            AejRecord::Header {
                cnpj,
                period,
                generated_at,
            } => vec![
                zero_left(cnpj.as_digits(), field::CNPJ_WIDTH),
                period.start_yyyymmdd(),
                period.end_yyyymmdd(),
                datetime12(*generated_at),
            ],
            AejRecord::Employer { cnpj, company_name } => vec![
                zero_left(cnpj.as_digits(), field::CNPJ_WIDTH),
                space_right(company_name, field::NAME_WIDTH),
            ],
            AejRecord::EmployeeIdentity {
                pis,
                cpf,
                registration,
                name,
            } => vec![
                zero_left(pis.as_digits(), field::PIS_WIDTH),
                zero_left(cpf.as_digits(), field::CPF_WIDTH),
                space_right(registration.as_str(), field::REGISTRATION_WIDTH),
                space_right(name, field::NAME_WIDTH),
            ],
            AejRecord::ScheduleSummary {
                active_days,
                weekly_minutes,
                break_minutes,
            } => vec![
                zero_left_u32(u32::from(*active_days), 1),
                zero_left_u32(*weekly_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*break_minutes, field::TIME_WIDTH),
            ],
            AejRecord::DailyJourney {
                date,
                expected_minutes,
                worked_minutes,
            } => vec![
                date8(*date),
                zero_left_u32(*expected_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*worked_minutes, field::MINUTES_WIDTH),
            ],
            AejRecord::Punch { date, time } => vec![date8(*date), time4(*time)],
            AejRecord::DailyTotals {
                date,
                worked_minutes,
                overtime_minutes,
                shortfall_minutes,
                adjusted,
            } => vec![
                date8(*date),
                zero_left_u32(*worked_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*overtime_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*shortfall_minutes, field::MINUTES_WIDTH),
                if *adjusted { "1" } else { "0" }.to_string(),
            ],
            AejRecord::PeriodTotals {
                worked_minutes,
                overtime_minutes,
                shortfall_minutes,
                day_count,
                adjustment_count,
            } => vec![
                zero_left_u32(*worked_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*overtime_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*shortfall_minutes, field::MINUTES_WIDTH),
                zero_left_u32(*day_count, field::COUNT_WIDTH),
                zero_left_u32(*adjustment_count, field::COUNT_WIDTH),
            ],
            AejRecord::Trailer { count } => vec![zero_left_u32(*count, field::NSR_WIDTH)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn employee_identity_line_shape() {
        let mut nsr = Nsr::new();
        let record = AejRecord::EmployeeIdentity {
            pis: Pis::parse("12012345678").unwrap(),
            cpf: Cpf::parse("12345678909").unwrap(),
            registration: EmployeeRegistration::parse("0001").unwrap(),
            name: "João".into(),
        };
        let line = record.encode(&mut nsr);
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "000000001");
        assert_eq!(fields[1], "3");
        assert_eq!(fields[2], "12012345678");
        // CPF is 11 digits zero-padded to 12.
        assert_eq!(fields[3], "012345678909");
        assert_eq!(fields[4].len(), 30);
        assert_eq!(fields[5].len(), 52);
        assert!(fields[5].starts_with("Joao"));
    }

    #[test]
    fn daily_totals_renders_adjustment_flag() {
        let mut nsr = Nsr::new();
        let record = AejRecord::DailyTotals {
            date: date(2),
            worked_minutes: 480,
            overtime_minutes: 0,
            shortfall_minutes: 48,
            adjusted: true,
        };
        assert_eq!(
            record.encode(&mut nsr),
            "000000001\t7\t20260302\t000480\t000000\t000048\t1"
        );
    }

    #[test]
    fn period_totals_line_shape() {
        let mut nsr = Nsr::new();
        let record = AejRecord::PeriodTotals {
            worked_minutes: 10080,
            overtime_minutes: 120,
            shortfall_minutes: 0,
            day_count: 21,
            adjustment_count: 2,
        };
        assert_eq!(
            record.encode(&mut nsr),
            "000000001\t8\t010080\t000120\t000000\t0021\t0002"
        );
    }

    #[test]
    fn punch_carries_only_date_and_time() {
        let mut nsr = Nsr::new();
        let record = AejRecord::Punch {
            date: date(2),
            time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        };
        assert_eq!(record.encode(&mut nsr), "000000001\t6\t20260302\t1230");
    }

    #[test]
    fn numeric_fields_are_digits_only() {
        let mut nsr = Nsr::new();
        let record = AejRecord::ScheduleSummary {
            active_days: 5,
            weekly_minutes: 2640,
            break_minutes: 60,
        };
        let line = record.encode(&mut nsr);
        for value in line.split('\t') {
            assert!(value.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
