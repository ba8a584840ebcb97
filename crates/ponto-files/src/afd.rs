//! # AFD Assembly
//!
//! Builds the raw punch-record file for a whole tenant: header, employer,
//! registrar identity, then per employee the identity record followed by
//! that employee's punch and adjustment records, and finally the trailer.
//!
//! Employees are ordered by registration and entries by date then
//! clock-in, so repeated assembly over unchanged data is byte-identical.

use chrono::{NaiveDateTime, NaiveTime};
use ponto_core::Period;
use ponto_records::{AfdRecord, Nsr};

use crate::facts::{EmployeeView, TenantView, TimeEntryView};
use crate::output::{join_crlf, AssembledFile, FileStatistics};

/// Input facts for one AFD assembly run.
#[derive(Debug, Clone)]
pub struct AfdInput {
    /// Employer facts.
    pub tenant: TenantView,
    /// Reference period.
    pub period: Period,
    /// Generation timestamp (explicit input, for determinism).
    pub generated_at: NaiveDateTime,
    /// Employees with their time entries.
    pub employees: Vec<(EmployeeView, Vec<TimeEntryView>)>,
}

/// Assemble an AFD payload.
///
/// Returns `None` when no employee has a time entry inside the period —
/// the caller treats that as nothing to generate, not an error.
pub fn build_afd(input: &AfdInput) -> Option<AssembledFile> {
    // Keep only entries inside the period, then only employees that still
    // have at least one entry; sort for stable output.
    let mut employees: Vec<(&EmployeeView, Vec<&TimeEntryView>)> = input
        .employees
        .iter()
        .map(|(employee, entries)| {
            let mut in_period: Vec<&TimeEntryView> = entries
                .iter()
                .filter(|e| input.period.contains(e.date))
                .collect();
            in_period.sort_by_key(|e| (e.date, e.clock_in.unwrap_or(NaiveTime::MIN)));
            (employee, in_period)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect();
    employees.sort_by(|(a, _), (b, _)| a.registration.as_str().cmp(b.registration.as_str()));

    if employees.is_empty() {
        return None;
    }

    let mut nsr = Nsr::new();
    let mut lines = Vec::new();
    let mut stats = FileStatistics::default();

    lines.push(
        AfdRecord::Header {
            cnpj: input.tenant.cnpj.clone(),
            period: input.period,
            generated_at: input.generated_at,
        }
        .encode(&mut nsr),
    );
    lines.push(
        AfdRecord::Employer {
            cnpj: input.tenant.cnpj.clone(),
            cei: input.tenant.cei.clone(),
            company_name: input.tenant.company_name.clone(),
        }
        .encode(&mut nsr),
    );
    lines.push(
        AfdRecord::RegistrarIdentity {
            rep_serial: input.tenant.rep_serial.clone(),
            software_version: input.tenant.software_version.clone(),
        }
        .encode(&mut nsr),
    );

    for (employee, entries) in &employees {
        stats.employee_count += 1;
        lines.push(
            AfdRecord::EmployeeIdentity {
                pis: employee.pis.clone(),
                name: employee.name.clone(),
            }
            .encode(&mut nsr),
        );

        for entry in entries {
            stats.entry_count += 1;
            stats.worked_minutes += entry.worked_minutes;
            stats.overtime_minutes += entry.overtime_minutes;

            for (_, time) in entry.punches() {
                stats.punch_count += 1;
                lines.push(
                    AfdRecord::Punch {
                        date: entry.date,
                        time,
                        pis: employee.pis.clone(),
                    }
                    .encode(&mut nsr),
                );
            }

            if entry.adjusted {
                stats.adjustment_count += 1;
                for field in &entry.adjusted_fields {
                    lines.push(
                        AfdRecord::Adjustment {
                            date: entry.date,
                            field: *field,
                            time: entry.punch_time(*field),
                            pis: employee.pis.clone(),
                        }
                        .encode(&mut nsr),
                    );
                }
            }
        }
    }

    lines.push(
        AfdRecord::Trailer {
            count: nsr.current() + 1,
        }
        .encode(&mut nsr),
    );

    Some(AssembledFile {
        bytes: join_crlf(&lines),
        total_records: nsr.current(),
        statistics: stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use ponto_core::{Cnpj, Cpf, EmployeeId, EmployeeRegistration, Pis, TenantId};
    use ponto_records::PunchKind;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn tenant() -> TenantView {
        TenantView {
            tenant_id: TenantId::new(),
            cnpj: Cnpj::parse("12345678000199").unwrap(),
            company_name: "ACME Ltda".into(),
            cei: None,
            rep_serial: "00004012345678901".into(),
            software_version: "3.2.1".into(),
        }
    }

    fn employee(registration: &str) -> EmployeeView {
        EmployeeView {
            employee_id: EmployeeId::new(),
            pis: Pis::parse("12012345678").unwrap(),
            cpf: Cpf::parse("12345678909").unwrap(),
            registration: EmployeeRegistration::parse(registration).unwrap(),
            name: "João da Silva".into(),
        }
    }

    fn entry(
        d: u32,
        clock_in: Option<NaiveTime>,
        lunch_start: Option<NaiveTime>,
        lunch_end: Option<NaiveTime>,
        clock_out: Option<NaiveTime>,
    ) -> TimeEntryView {
        TimeEntryView {
            date: date(d),
            clock_in,
            lunch_start,
            lunch_end,
            clock_out,
            worked_minutes: 480,
            adjusted: false,
            adjusted_fields: Vec::new(),
            overtime_minutes: 0,
            overtime_kind: None,
        }
    }

    fn input(employees: Vec<(EmployeeView, Vec<TimeEntryView>)>) -> AfdInput {
        AfdInput {
            tenant: tenant(),
            period: Period::new(date(1), date(31)).unwrap(),
            generated_at: date(31).and_hms_opt(12, 0, 0).unwrap(),
            employees,
        }
    }

    #[test]
    fn two_entry_scenario_yields_eleven_records() {
        // Day 1: four punches. Day 2: clock-in and clock-out only.
        let entries = vec![
            entry(
                1,
                Some(time(8, 0)),
                Some(time(12, 0)),
                Some(time(13, 0)),
                Some(time(17, 0)),
            ),
            entry(2, Some(time(8, 0)), None, None, Some(time(12, 0))),
        ];
        let built = build_afd(&input(vec![(employee("0001"), entries)])).unwrap();

        // header + employer + registrar + identity + 4 + 2 punches + trailer.
        assert_eq!(built.total_records, 11);
        let text = String::from_utf8(built.bytes.clone()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 11);
        let trailer = lines.last().unwrap();
        assert!(trailer.starts_with("000000011\t9\t000000011"));
        assert_eq!(built.statistics.punch_count, 6);
    }

    #[test]
    fn sequence_numbers_are_contiguous_from_one() {
        let entries = vec![entry(1, Some(time(8, 0)), None, None, Some(time(17, 0)))];
        let built = build_afd(&input(vec![(employee("0001"), entries)])).unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        for (i, line) in text.split("\r\n").filter(|l| !l.is_empty()).enumerate() {
            let seq: u32 = line.split('\t').next().unwrap().parse().unwrap();
            assert_eq!(seq, i as u32 + 1);
        }
    }

    #[test]
    fn repeated_assembly_is_byte_identical() {
        let entries = vec![entry(
            1,
            Some(time(8, 0)),
            Some(time(12, 0)),
            Some(time(13, 0)),
            Some(time(17, 0)),
        )];
        let afd_input = input(vec![(employee("0001"), entries)]);
        let a = build_afd(&afd_input).unwrap();
        let b = build_afd(&afd_input).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn employees_are_ordered_by_registration() {
        let e1 = entry(1, Some(time(8, 0)), None, None, Some(time(17, 0)));
        let built = build_afd(&input(vec![
            (employee("0002"), vec![e1.clone()]),
            (employee("0001"), vec![e1]),
        ]))
        .unwrap();
        // Both employees share a PIS here; ordering is observable through
        // stability: two runs with the inputs swapped must agree.
        let swapped = build_afd(&input(vec![
            (
                employee("0001"),
                vec![entry(1, Some(time(8, 0)), None, None, Some(time(17, 0)))],
            ),
            (
                employee("0002"),
                vec![entry(1, Some(time(8, 0)), None, None, Some(time(17, 0)))],
            ),
        ]))
        .unwrap();
        assert_eq!(built.bytes, swapped.bytes);
    }

    #[test]
    fn no_entries_in_period_yields_none() {
        // Entry outside the period.
        let mut e = entry(1, Some(time(8, 0)), None, None, Some(time(17, 0)));
        e.date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(build_afd(&input(vec![(employee("0001"), vec![e])])).is_none());
        assert!(build_afd(&input(vec![])).is_none());
    }

    #[test]
    fn adjusted_entry_emits_one_record_per_adjusted_field() {
        let mut e = entry(
            1,
            Some(time(8, 0)),
            Some(time(12, 0)),
            Some(time(13, 0)),
            Some(time(17, 0)),
        );
        e.adjusted = true;
        e.adjusted_fields = vec![PunchKind::ClockIn, PunchKind::ClockOut];
        let built = build_afd(&input(vec![(employee("0001"), vec![e])])).unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        let adjustments = text
            .split("\r\n")
            .filter(|l| l.split('\t').nth(1) == Some("5"))
            .count();
        assert_eq!(adjustments, 2);
        // header + employer + registrar + identity + 4 punches + 2 adjustments + trailer.
        assert_eq!(built.total_records, 11);
    }
}
