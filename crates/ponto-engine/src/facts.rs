//! # Fact Source
//!
//! Tenant, employee, time-entry, schedule, and holiday data are owned by
//! collaborating services; the engine consumes them through this
//! read-only seam. Production wires a database-backed implementation,
//! tests use in-memory fixtures.

use chrono::NaiveDate;
use ponto_core::{EmployeeId, Period, TenantId};
use ponto_files::{EmployeeView, ScheduleView, TenantView, TimeEntryView};

use crate::error::EngineError;

/// Read-only access to the facts a generation run needs.
#[allow(async_fn_in_trait)]
pub trait FactSource: Send + Sync {
    /// The tenant's employer facts, when the tenant exists.
    async fn tenant_view(&self, tenant: TenantId) -> Result<Option<TenantView>, EngineError>;

    /// All employees of the tenant.
    async fn employees_of(&self, tenant: TenantId) -> Result<Vec<EmployeeView>, EngineError>;

    /// One employee of the tenant, when it exists.
    async fn employee_view(
        &self,
        tenant: TenantId,
        employee: EmployeeId,
    ) -> Result<Option<EmployeeView>, EngineError>;

    /// Each employee of the tenant paired with its entries in the period.
    async fn employees_with_entries(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Vec<(EmployeeView, Vec<TimeEntryView>)>, EngineError>;

    /// One employee's entries in the period.
    async fn entries_for(
        &self,
        employee: EmployeeId,
        period: Period,
    ) -> Result<Vec<TimeEntryView>, EngineError>;

    /// The employee's assigned work schedule, when any.
    async fn schedule_for(&self, employee: EmployeeId)
        -> Result<Option<ScheduleView>, EngineError>;

    /// The tenant's holidays inside the period.
    async fn holidays_in(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Vec<NaiveDate>, EngineError>;
}
