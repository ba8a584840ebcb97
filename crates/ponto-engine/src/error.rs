//! Engine error type.
//!
//! Persistence and certificate-subsystem failures propagate to the
//! caller; signing failures deliberately do not (they are logged at the
//! signing step and the generated file stays unsigned).

use ponto_core::{EmployeeId, TenantId};
use thiserror::Error;

/// Errors from the generation entry points.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The tenant read model has no such tenant.
    #[error("unknown tenant: {0}")]
    UnknownTenant(TenantId),

    /// The employee read model has no such employee for the tenant.
    #[error("unknown employee: {0}")]
    UnknownEmployee(EmployeeId),

    /// Database failure — the generation transaction was rolled back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Artifact storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] ponto_storage::StorageError),

    /// Certificate subsystem failure.
    #[error("certificate error: {0}")]
    Certificate(#[from] ponto_certs::CertError),

    /// A read-model row carried an invalid fiscal identifier.
    #[error("invalid read-model data: {0}")]
    Validation(#[from] ponto_core::ValidationError),

    /// Statistics serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
