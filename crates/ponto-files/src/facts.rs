//! # Collaborator Read Models
//!
//! The facts the assemblers consume. Tenant, employee, and time-entry data
//! live outside this subsystem (CRUD and persistence are collaborator
//! concerns); they arrive here as plain view structs. Schedule and holiday
//! lookups are traits so the expected-minutes policy can be exercised with
//! in-memory fixtures.

use chrono::{NaiveDate, NaiveTime, Weekday};
use ponto_core::{Cnpj, Cpf, EmployeeId, EmployeeRegistration, Pis, TenantId};
use ponto_records::PunchKind;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Employer facts needed for file headers and employer records.
#[derive(Debug, Clone)]
pub struct TenantView {
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// Employer CNPJ.
    pub cnpj: Cnpj,
    /// Employer legal name (razão social).
    pub company_name: String,
    /// Employer CEI, when one exists.
    pub cei: Option<String>,
    /// Serial number of the recording REP.
    pub rep_serial: String,
    /// Version of the recording software.
    pub software_version: String,
}

/// Employee facts needed for identity records.
#[derive(Debug, Clone)]
pub struct EmployeeView {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Employee PIS.
    pub pis: Pis,
    /// Employee CPF.
    pub cpf: Cpf,
    /// Employer-assigned registration (matrícula).
    pub registration: EmployeeRegistration,
    /// Employee name.
    pub name: String,
}

/// One day's time entry, pre-annotated by the external overtime engine.
#[derive(Debug, Clone)]
pub struct TimeEntryView {
    /// The day the entry covers.
    pub date: NaiveDate,
    /// Clock-in time, when punched.
    pub clock_in: Option<NaiveTime>,
    /// Lunch-start time, when punched.
    pub lunch_start: Option<NaiveTime>,
    /// Lunch-end time, when punched.
    pub lunch_end: Option<NaiveTime>,
    /// Clock-out time, when punched.
    pub clock_out: Option<NaiveTime>,
    /// Total minutes worked, as computed upstream.
    pub worked_minutes: u32,
    /// Whether any punch was adjusted post-hoc.
    pub adjusted: bool,
    /// Which punch fields were adjusted.
    pub adjusted_fields: Vec<PunchKind>,
    /// Overtime minutes annotated by the external CLT engine.
    pub overtime_minutes: u32,
    /// Overtime classification from the external CLT engine, when any.
    pub overtime_kind: Option<String>,
}

impl TimeEntryView {
    /// The punch time for one field, when present.
    pub fn punch_time(&self, kind: PunchKind) -> Option<NaiveTime> {
        match kind {
            PunchKind::ClockIn => self.clock_in,
            PunchKind::LunchStart => self.lunch_start,
            PunchKind::LunchEnd => self.lunch_end,
            PunchKind::ClockOut => self.clock_out,
        }
    }

    /// The present punches in emission order (in, lunch out, lunch back,
    /// out). Absent punches yield nothing — cardinality is 0 to 4.
    pub fn punches(&self) -> impl Iterator<Item = (PunchKind, NaiveTime)> + '_ {
        PunchKind::ALL
            .into_iter()
            .filter_map(|kind| self.punch_time(kind).map(|t| (kind, t)))
    }
}

// ---------------------------------------------------------------------------
// Work schedules
// ---------------------------------------------------------------------------

/// The working window of one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Scheduled start of work.
    pub start: NaiveTime,
    /// Scheduled end of work.
    pub end: NaiveTime,
}

/// Read-only view of an employee's assigned work schedule.
pub trait WorkSchedule {
    /// The working window for a weekday, or `None` on inactive days.
    fn day_config(&self, weekday: Weekday) -> Option<DayWindow>;

    /// The configured break length in minutes.
    fn break_minutes(&self) -> u32;

    /// Expected minutes for one weekday: window length minus the break,
    /// floored at zero. Inactive days expect zero.
    fn expected_minutes(&self, weekday: Weekday) -> u32 {
        match self.day_config(weekday) {
            Some(window) => {
                let span = (window.end - window.start).num_minutes().max(0) as u32;
                span.saturating_sub(self.break_minutes())
            }
            None => 0,
        }
    }
}

/// A concrete schedule: one optional window per weekday plus a break.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    days: [Option<DayWindow>; 7],
    break_minutes: u32,
}

impl ScheduleView {
    /// Build a schedule from per-weekday windows and a break length.
    pub fn new(days: [Option<DayWindow>; 7], break_minutes: u32) -> Self {
        Self {
            days,
            break_minutes,
        }
    }

    /// Number of active days per week.
    pub fn active_days(&self) -> u8 {
        self.days.iter().filter(|d| d.is_some()).count() as u8
    }

    /// Expected minutes across one week.
    pub fn weekly_minutes(&self) -> u32 {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|wd| self.expected_minutes(wd))
        .sum()
    }
}

impl WorkSchedule for ScheduleView {
    fn day_config(&self, weekday: Weekday) -> Option<DayWindow> {
        self.days[weekday.num_days_from_monday() as usize]
    }

    fn break_minutes(&self) -> u32 {
        self.break_minutes
    }
}

// ---------------------------------------------------------------------------
// Holidays
// ---------------------------------------------------------------------------

/// Read-only holiday lookup. Holidays expect zero worked minutes
/// regardless of the schedule.
pub trait HolidayCalendar {
    /// Whether the date is a holiday for this tenant.
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// A calendar with no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

impl HolidayCalendar for &[NaiveDate] {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

/// Expected minutes for one calendar date under an optional schedule.
///
/// The one policy both the daily-journey records and the period totals
/// apply: holidays and schedule-less employees expect zero.
pub fn expected_minutes_for(
    schedule: Option<&ScheduleView>,
    holidays: &dyn HolidayCalendar,
    date: NaiveDate,
) -> u32 {
    if holidays.is_holiday(date) {
        return 0;
    }
    match schedule {
        Some(s) => s.expected_minutes(chrono::Datelike::weekday(&date)),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
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

    #[test]
    fn expected_minutes_subtracts_break() {
        let schedule = weekday_schedule();
        // 08:00-17:00 is 540 minutes; minus the 60-minute break.
        assert_eq!(schedule.expected_minutes(Weekday::Mon), 480);
        assert_eq!(schedule.expected_minutes(Weekday::Sat), 0);
    }

    #[test]
    fn weekly_minutes_sums_active_days() {
        let schedule = weekday_schedule();
        assert_eq!(schedule.active_days(), 5);
        assert_eq!(schedule.weekly_minutes(), 2400);
    }

    #[test]
    fn holiday_expects_zero_even_with_schedule() {
        let schedule = weekday_schedule();
        // 2026-01-01 is a Thursday.
        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let holidays: &[NaiveDate] = &[new_year];
        assert_eq!(expected_minutes_for(Some(&schedule), &holidays, new_year), 0);
    }

    #[test]
    fn no_schedule_expects_zero() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(expected_minutes_for(None, &NoHolidays, monday), 0);
    }

    #[test]
    fn punches_skip_absent_fields() {
        let entry = TimeEntryView {
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            clock_in: Some(time(8, 0)),
            lunch_start: None,
            lunch_end: None,
            clock_out: Some(time(12, 0)),
            worked_minutes: 240,
            adjusted: false,
            adjusted_fields: Vec::new(),
            overtime_minutes: 0,
            overtime_kind: None,
        };
        let punches: Vec<_> = entry.punches().collect();
        assert_eq!(punches.len(), 2);
        assert_eq!(punches[0].0, PunchKind::ClockIn);
        assert_eq!(punches[1].0, PunchKind::ClockOut);
    }
}
