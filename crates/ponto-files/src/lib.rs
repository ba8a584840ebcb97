#![deny(missing_docs)]

//! # ponto-files — AFD and AEJ File Assembly
//!
//! Orchestrates the record encoders in the order each regulator layout
//! mandates and concatenates the lines into the final byte payload
//! (CRLF-joined, trailing CRLF).
//!
//! ## Determinism
//!
//! Assembling twice over unchanged input yields byte-identical output:
//! employees are ordered by registration, entries by date then clock-in,
//! and the generation timestamp is an explicit input rather than a hidden
//! clock read. The persisted content hash relies on this.
//!
//! ## Collaborators
//!
//! Employee, tenant, and time-entry facts arrive as read-model views
//! ([`facts`]); schedule and holiday lookups go through the
//! [`WorkSchedule`](facts::WorkSchedule) and
//! [`HolidayCalendar`](facts::HolidayCalendar) seams so production code
//! and tests plug in different sources.
//!
//! "No qualifying data" is not an error: builders return `None` and the
//! caller treats it as nothing to generate.

pub mod aej;
pub mod afd;
pub mod facts;
pub mod filename;
pub mod output;

pub use aej::{build_aej, AejInput};
pub use afd::{build_afd, AfdInput};
pub use facts::{
    DayWindow, EmployeeView, HolidayCalendar, NoHolidays, ScheduleView, TenantView, TimeEntryView,
    WorkSchedule,
};
pub use filename::{aej_filename, afd_filename, signature_filename};
pub use output::{AssembledFile, FileStatistics};
