#![deny(missing_docs)]

//! # ponto-engine — Generation Orchestration
//!
//! Drives one file generation end to end: pull facts from collaborators,
//! assemble the payload, persist bytes and metadata inside one
//! transaction, and — after commit — attempt the detached signature.
//!
//! ## Transaction Boundary
//!
//! "Compute bytes, write bytes, insert metadata row" is one atomic unit;
//! a failure rolls the metadata back (a partially written byte artifact
//! may remain — the metadata row is the source of truth). Signing runs
//! after commit, so a signing failure can never roll back a successfully
//! generated file: the employer keeps a valid unsigned payload with
//! `is_signed = false`.
//!
//! ## Batch Semantics
//!
//! AEJ batch generation is a sequential loop; one employee's failure is
//! logged and skipped, and the result is the list of files that were
//! generated.

pub mod config;
pub mod error;
pub mod facts;
pub mod facts_pg;
pub mod service;

pub use config::AppConfig;
pub use error::EngineError;
pub use facts::FactSource;
pub use facts_pg::PgFactSource;
pub use service::GenerationService;
