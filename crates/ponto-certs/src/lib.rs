#![deny(missing_docs)]

//! # ponto-certs — Certificate Lifecycle
//!
//! Validates, stores, and opens the qualified digital certificate an
//! employer uses to sign compliance files.
//!
//! ## Expected Failures Are Results, Not Errors
//!
//! Wrong password, unrecognized issuer, expired window, corrupt container
//! — these are everyday upload outcomes and surface as a structured
//! [`CertValidation`], never as a propagated error. Propagated
//! [`CertError`]s are reserved for genuinely unexpected conditions:
//! storage failures, database failures, broken master-key configuration.
//!
//! ## Legacy Containers
//!
//! A1 certificates in the wild are still exported with RC2/3DES ciphers
//! modern OpenSSL builds refuse. When the modern open fails for a reason
//! other than a bad password, the [`LegacyConverter`] seam re-exports the
//! container with modern ciphers and the open is retried — callers see
//! only the final outcome (plus the converted bytes, which become the
//! stored container).
//!
//! ## Secret Hygiene
//!
//! The container password exists in plaintext only transiently inside a
//! validate/store/retrieve call, wrapped in [`zeroize::Zeroizing`], and
//! is never logged. At rest it is sealed with AES-256-GCM under the
//! process master key.

pub mod error;
pub mod legacy;
pub mod secrets;
pub mod store;
pub mod validation;

pub use error::{CertError, CertFailure};
pub use legacy::{ConversionError, LegacyConverter, OpensslCliConverter};
pub use secrets::MasterKey;
pub use store::{CertificateStore, OpenedBundle};
pub use validation::{validate, CertValidation, CertificateType, ValidCertificate};
