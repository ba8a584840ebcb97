#![deny(missing_docs)]

//! # ponto-db — Postgres Persistence
//!
//! Query modules for the two tables this subsystem owns:
//! `generated_files` (artifact metadata for every generated AFD/AEJ) and
//! `certificate_bundles` (one active digital-certificate bundle per
//! tenant).
//!
//! All functions take a `&PgPool` — or a `&mut PgConnection` where the
//! caller scopes them inside a transaction — and map rows through plain
//! `sqlx::FromRow` structs. Employee, tenant, and time-entry persistence
//! belongs to collaborating services, not this crate.

pub mod certificate_bundles;
pub mod generated_files;

pub use certificate_bundles::CertificateBundleRecord;
pub use generated_files::{FileType, GeneratedFileRecord};

/// The migrator for the tables this crate owns.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}
