//! # Postgres Fact Source
//!
//! Read-only implementation of [`FactSource`] over the platform's
//! collaborator tables (`tenants`, `employees`, `time_entries`,
//! `work_schedules`, `work_schedule_days`, `holidays`). Those tables are
//! owned and written by collaborating services — this module only reads
//! them into the view structs the assemblers consume.

use chrono::{NaiveDate, NaiveTime, Weekday};
use ponto_core::{Cnpj, Cpf, EmployeeId, EmployeeRegistration, Period, Pis, TenantId};
use ponto_files::{DayWindow, EmployeeView, ScheduleView, TenantView, TimeEntryView};
use ponto_records::PunchKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::facts::FactSource;

/// Database-backed fact source.
#[derive(Debug, Clone)]
pub struct PgFactSource {
    pool: PgPool,
}

impl PgFactSource {
    /// Create a fact source over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FactSource for PgFactSource {
    async fn tenant_view(&self, tenant: TenantId) -> Result<Option<TenantView>, EngineError> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT id, cnpj, company_name, cei, rep_serial, software_version
             FROM tenants WHERE id = $1",
        )
        .bind(tenant.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TenantRow::into_view).transpose()
    }

    async fn employees_of(&self, tenant: TenantId) -> Result<Vec<EmployeeView>, EngineError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, tenant_id, pis, cpf, registration, name
             FROM employees WHERE tenant_id = $1 ORDER BY registration",
        )
        .bind(tenant.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EmployeeRow::into_view).collect()
    }

    async fn employee_view(
        &self,
        tenant: TenantId,
        employee: EmployeeId,
    ) -> Result<Option<EmployeeView>, EngineError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, tenant_id, pis, cpf, registration, name
             FROM employees WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant.as_uuid())
        .bind(employee.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(EmployeeRow::into_view).transpose()
    }

    async fn employees_with_entries(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Vec<(EmployeeView, Vec<TimeEntryView>)>, EngineError> {
        let employees = self.employees_of(tenant).await?;
        let mut result = Vec::with_capacity(employees.len());
        for employee in employees {
            let entries = self.entries_for(employee.employee_id, period).await?;
            result.push((employee, entries));
        }
        Ok(result)
    }

    async fn entries_for(
        &self,
        employee: EmployeeId,
        period: Period,
    ) -> Result<Vec<TimeEntryView>, EngineError> {
        let rows = sqlx::query_as::<_, TimeEntryRow>(
            "SELECT entry_date, clock_in, lunch_start, lunch_end, clock_out,
             worked_minutes, adjusted, adjusted_fields, overtime_minutes, overtime_kind
             FROM time_entries
             WHERE employee_id = $1 AND entry_date BETWEEN $2 AND $3
             ORDER BY entry_date",
        )
        .bind(employee.as_uuid())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TimeEntryRow::into_view).collect())
    }

    async fn schedule_for(
        &self,
        employee: EmployeeId,
    ) -> Result<Option<ScheduleView>, EngineError> {
        let schedule = sqlx::query_as::<_, ScheduleRow>(
            "SELECT s.id, s.break_minutes
             FROM work_schedules s
             JOIN employees e ON e.schedule_id = s.id
             WHERE e.id = $1",
        )
        .bind(employee.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let schedule = match schedule {
            Some(schedule) => schedule,
            None => return Ok(None),
        };

        let day_rows = sqlx::query_as::<_, ScheduleDayRow>(
            "SELECT weekday, start_time, end_time
             FROM work_schedule_days WHERE schedule_id = $1",
        )
        .bind(schedule.id)
        .fetch_all(&self.pool)
        .await?;

        let mut days: [Option<DayWindow>; 7] = [None; 7];
        for day in day_rows {
            if let Some(weekday) = weekday_from_index(day.weekday) {
                days[weekday.num_days_from_monday() as usize] = Some(DayWindow {
                    start: day.start_time,
                    end: day.end_time,
                });
            }
        }

        Ok(Some(ScheduleView::new(
            days,
            schedule.break_minutes.max(0) as u32,
        )))
    }

    async fn holidays_in(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Vec<NaiveDate>, EngineError> {
        let rows: Vec<(NaiveDate,)> = sqlx::query_as(
            "SELECT holiday_date FROM holidays
             WHERE tenant_id = $1 AND holiday_date BETWEEN $2 AND $3",
        )
        .bind(tenant.as_uuid())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(date,)| date).collect())
    }
}

fn weekday_from_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    cnpj: String,
    company_name: String,
    cei: Option<String>,
    rep_serial: String,
    software_version: String,
}

impl TenantRow {
    fn into_view(self) -> Result<TenantView, EngineError> {
        Ok(TenantView {
            tenant_id: TenantId::from_uuid(self.id),
            cnpj: Cnpj::parse(&self.cnpj)?,
            company_name: self.company_name,
            cei: self.cei,
            rep_serial: self.rep_serial,
            software_version: self.software_version,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    #[allow(dead_code)]
    tenant_id: Uuid,
    pis: String,
    cpf: String,
    registration: String,
    name: String,
}

impl EmployeeRow {
    fn into_view(self) -> Result<EmployeeView, EngineError> {
        Ok(EmployeeView {
            employee_id: EmployeeId::from_uuid(self.id),
            pis: Pis::parse(&self.pis)?,
            cpf: Cpf::parse(&self.cpf)?,
            registration: EmployeeRegistration::parse(&self.registration)?,
            name: self.name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TimeEntryRow {
    entry_date: NaiveDate,
    clock_in: Option<NaiveTime>,
    lunch_start: Option<NaiveTime>,
    lunch_end: Option<NaiveTime>,
    clock_out: Option<NaiveTime>,
    worked_minutes: i32,
    adjusted: bool,
    adjusted_fields: Vec<String>,
    overtime_minutes: i32,
    overtime_kind: Option<String>,
}

impl TimeEntryRow {
    fn into_view(self) -> TimeEntryView {
        TimeEntryView {
            date: self.entry_date,
            clock_in: self.clock_in,
            lunch_start: self.lunch_start,
            lunch_end: self.lunch_end,
            clock_out: self.clock_out,
            worked_minutes: self.worked_minutes.max(0) as u32,
            adjusted: self.adjusted,
            adjusted_fields: self
                .adjusted_fields
                .iter()
                .filter_map(|label| PunchKind::from_label(label))
                .collect(),
            overtime_minutes: self.overtime_minutes.max(0) as u32,
            overtime_kind: self.overtime_kind,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    break_minutes: i32,
}

#[derive(sqlx::FromRow)]
struct ScheduleDayRow {
    weekday: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_covers_the_week() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_from_index(-1), None);
    }
}
