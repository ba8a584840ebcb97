#![deny(missing_docs)]

//! # ponto-core — Foundational Types for the Ponto Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `chrono`, `uuid`, and `sha2` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for fiscal identifiers.** Every identifier is a
//!    distinct type validated at construction. You cannot pass a [`Cpf`]
//!    where a [`Pis`] is expected, and an invalid CNPJ never enters the
//!    system.
//!
//! 2. **One [`Period`] type for reference windows.** Every generated
//!    compliance file covers exactly one `Period`; filename rendering and
//!    range checks live on the type, not scattered through callers.
//!
//! 3. **[`ContentDigest`] for artifact integrity.** The SHA-256 hash of a
//!    generated file's exact bytes, stored alongside the artifact metadata
//!    so later reads can detect corruption.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod text;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::{sha256_bytes, ContentDigest, DigestAlgorithm};
pub use error::ValidationError;
pub use identity::{Cnpj, Cpf, EmployeeId, EmployeeRegistration, GeneratedFileId, Pis, TenantId};
pub use temporal::Period;
pub use text::to_single_byte;
