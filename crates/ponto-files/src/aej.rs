//! # AEJ Assembly
//!
//! Builds the processed-journey file for one employee: header, employer,
//! employee identity, schedule summary (when a schedule is assigned), then
//! per day a journey record, the day's punches, and the daily totals;
//! closed by the period totals and the trailer.
//!
//! The expected-minutes policy ([`expected_minutes_for`]) feeds both the
//! per-day figures and the period totals, so the two can never disagree.

use chrono::NaiveDateTime;
use ponto_core::Period;
use ponto_records::{AejRecord, Nsr};

use crate::facts::{
    expected_minutes_for, EmployeeView, HolidayCalendar, ScheduleView, TenantView, TimeEntryView,
    WorkSchedule,
};
use crate::output::{join_crlf, AssembledFile, FileStatistics};

/// Input facts for one AEJ assembly run.
#[derive(Debug, Clone)]
pub struct AejInput {
    /// Employer facts.
    pub tenant: TenantView,
    /// The employee the file covers.
    pub employee: EmployeeView,
    /// The employee's assigned schedule, when any.
    pub schedule: Option<ScheduleView>,
    /// Reference period.
    pub period: Period,
    /// Generation timestamp (explicit input, for determinism).
    pub generated_at: NaiveDateTime,
    /// The employee's time entries.
    pub entries: Vec<TimeEntryView>,
}

/// Assemble an AEJ payload.
///
/// Returns `None` when the employee has neither an assigned schedule nor
/// any entry inside the period. A schedule with zero entries still
/// generates: the summary and zeroed period totals are meaningful.
pub fn build_aej(input: &AejInput, holidays: &dyn HolidayCalendar) -> Option<AssembledFile> {
    let mut entries: Vec<&TimeEntryView> = input
        .entries
        .iter()
        .filter(|e| input.period.contains(e.date))
        .collect();
    entries.sort_by_key(|e| e.date);

    if input.schedule.is_none() && entries.is_empty() {
        return None;
    }

    let mut nsr = Nsr::new();
    let mut lines = Vec::new();
    let mut stats = FileStatistics {
        employee_count: 1,
        ..FileStatistics::default()
    };

    lines.push(
        AejRecord::Header {
            cnpj: input.tenant.cnpj.clone(),
            period: input.period,
            generated_at: input.generated_at,
        }
        .encode(&mut nsr),
    );
    lines.push(
        AejRecord::Employer {
            cnpj: input.tenant.cnpj.clone(),
            company_name: input.tenant.company_name.clone(),
        }
        .encode(&mut nsr),
    );
    lines.push(
        AejRecord::EmployeeIdentity {
            pis: input.employee.pis.clone(),
            cpf: input.employee.cpf.clone(),
            registration: input.employee.registration.clone(),
            name: input.employee.name.clone(),
        }
        .encode(&mut nsr),
    );

    if let Some(schedule) = &input.schedule {
        lines.push(
            AejRecord::ScheduleSummary {
                active_days: schedule.active_days(),
                weekly_minutes: schedule.weekly_minutes(),
                break_minutes: WorkSchedule::break_minutes(schedule),
            }
            .encode(&mut nsr),
        );
    }

    let mut day_count = 0u32;
    let mut adjustment_count = 0u32;

    for entry in &entries {
        let expected = expected_minutes_for(input.schedule.as_ref(), holidays, entry.date);
        let worked = entry.worked_minutes;
        let overtime = worked.saturating_sub(expected);
        let shortfall = expected.saturating_sub(worked);

        day_count += 1;
        stats.entry_count += 1;
        stats.worked_minutes += worked;
        stats.overtime_minutes += overtime;
        stats.shortfall_minutes += shortfall;
        if entry.adjusted {
            adjustment_count += 1;
            stats.adjustment_count += 1;
        }

        lines.push(
            AejRecord::DailyJourney {
                date: entry.date,
                expected_minutes: expected,
                worked_minutes: worked,
            }
            .encode(&mut nsr),
        );

        for (_, time) in entry.punches() {
            stats.punch_count += 1;
            lines.push(
                AejRecord::Punch {
                    date: entry.date,
                    time,
                }
                .encode(&mut nsr),
            );
        }

        lines.push(
            AejRecord::DailyTotals {
                date: entry.date,
                worked_minutes: worked,
                overtime_minutes: overtime,
                shortfall_minutes: shortfall,
                adjusted: entry.adjusted,
            }
            .encode(&mut nsr),
        );
    }

    lines.push(
        AejRecord::PeriodTotals {
            worked_minutes: stats.worked_minutes,
            overtime_minutes: stats.overtime_minutes,
            shortfall_minutes: stats.shortfall_minutes,
            day_count,
            adjustment_count,
        }
        .encode(&mut nsr),
    );
    lines.push(
        AejRecord::Trailer {
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
    use crate::facts::{DayWindow, NoHolidays};
    use chrono::{NaiveDate, NaiveTime};
    use ponto_core::{Cnpj, Cpf, EmployeeId, EmployeeRegistration, Pis, TenantId};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        // January 2026: the 5th is a Monday.
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

    fn employee() -> EmployeeView {
        EmployeeView {
            employee_id: EmployeeId::new(),
            pis: Pis::parse("12012345678").unwrap(),
            cpf: Cpf::parse("12345678909").unwrap(),
            registration: EmployeeRegistration::parse("0001").unwrap(),
            name: "João da Silva".into(),
        }
    }

    fn weekday_schedule() -> ScheduleView {
        let window = DayWindow {
            start: time(8, 0),
            end: time(17, 0),
        };
        ScheduleView::new(
            [
                Some(window),
                Some(window),
                Some(window),
                Some(window),
                Some(window),
                None,
                None,
            ],
            60,
        )
    }

    fn entry(d: u32, worked: u32) -> TimeEntryView {
        TimeEntryView {
            date: date(d),
            clock_in: Some(time(8, 0)),
            lunch_start: Some(time(12, 0)),
            lunch_end: Some(time(13, 0)),
            clock_out: Some(time(17, 0)),
            worked_minutes: worked,
            adjusted: false,
            adjusted_fields: Vec::new(),
            overtime_minutes: 0,
            overtime_kind: None,
        }
    }

    fn aej_input(
        schedule: Option<ScheduleView>,
        entries: Vec<TimeEntryView>,
    ) -> AejInput {
        AejInput {
            tenant: tenant(),
            employee: employee(),
            schedule,
            period: Period::new(date(1), date(31)).unwrap(),
            generated_at: date(31).and_hms_opt(12, 0, 0).unwrap(),
            entries,
        }
    }

    #[test]
    fn daily_totals_split_overtime_and_shortfall() {
        // Monday the 5th, 30 minutes over the 480 expected; Tuesday the
        // 6th, 100 minutes short.
        let built = build_aej(
            &aej_input(
                Some(weekday_schedule()),
                vec![entry(5, 510), entry(6, 380)],
            ),
            &NoHolidays,
        )
        .unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        let totals: Vec<&str> = text
            .split("\r\n")
            .filter(|l| l.split('\t').nth(1) == Some("7"))
            .collect();
        assert_eq!(totals[0], "000000010\t7\t20260105\t000510\t000030\t000000\t0");
        assert_eq!(totals[1], "000000016\t7\t20260106\t000380\t000000\t000100\t0");
        assert_eq!(built.statistics.overtime_minutes, 30);
        assert_eq!(built.statistics.shortfall_minutes, 100);
    }

    #[test]
    fn period_totals_agree_with_daily_figures() {
        let built = build_aej(
            &aej_input(
                Some(weekday_schedule()),
                vec![entry(5, 510), entry(6, 380)],
            ),
            &NoHolidays,
        )
        .unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        let period_totals = text
            .split("\r\n")
            .find(|l| l.split('\t').nth(1) == Some("8"))
            .unwrap();
        // worked 890, overtime 30, shortfall 100, 2 days, 0 adjustments.
        let seq = period_totals.split('\t').next().unwrap();
        assert_eq!(
            period_totals,
            format!("{seq}\t8\t000890\t000030\t000100\t0002\t0000")
        );
    }

    #[test]
    fn trailer_count_matches_record_count() {
        let built = build_aej(
            &aej_input(Some(weekday_schedule()), vec![entry(5, 480)]),
            &NoHolidays,
        )
        .unwrap();
        // header + employer + identity + schedule + journey + 4 punches
        // + daily totals + period totals + trailer = 12.
        assert_eq!(built.total_records, 12);
        let text = String::from_utf8(built.bytes).unwrap();
        let trailer = text
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .last()
            .unwrap();
        assert_eq!(trailer, "000000012\t9\t000000012");
    }

    #[test]
    fn schedule_without_entries_still_generates() {
        let built = build_aej(&aej_input(Some(weekday_schedule()), vec![]), &NoHolidays).unwrap();
        // header + employer + identity + schedule + period totals + trailer.
        assert_eq!(built.total_records, 6);
        assert_eq!(built.statistics.entry_count, 0);
    }

    #[test]
    fn neither_schedule_nor_entries_yields_none() {
        assert!(build_aej(&aej_input(None, vec![]), &NoHolidays).is_none());
    }

    #[test]
    fn no_schedule_treats_expected_as_zero() {
        let built = build_aej(&aej_input(None, vec![entry(5, 480)]), &NoHolidays).unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        let journey = text
            .split("\r\n")
            .find(|l| l.split('\t').nth(1) == Some("5"))
            .unwrap();
        // Expected zero, so the full worked time counts as overtime.
        assert!(journey.ends_with("\t000000\t000480"));
        assert_eq!(built.statistics.overtime_minutes, 480);
    }

    #[test]
    fn holiday_zeroes_expected_minutes() {
        let holidays: &[NaiveDate] = &[date(5)];
        let built = build_aej(
            &aej_input(Some(weekday_schedule()), vec![entry(5, 480)]),
            &holidays,
        )
        .unwrap();
        let text = String::from_utf8(built.bytes).unwrap();
        let journey = text
            .split("\r\n")
            .find(|l| l.split('\t').nth(1) == Some("5"))
            .unwrap();
        assert!(journey.ends_with("\t000000\t000480"));
    }

    #[test]
    fn repeated_assembly_is_byte_identical() {
        let input = aej_input(Some(weekday_schedule()), vec![entry(5, 480), entry(6, 480)]);
        let a = build_aej(&input, &NoHolidays).unwrap();
        let b = build_aej(&input, &NoHolidays).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }
}
