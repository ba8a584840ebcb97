//! # Certificate Error Types
//!
//! [`CertFailure`] enumerates the expected validation outcomes a caller
//! shows to the user; [`CertError`] covers the unexpected conditions that
//! propagate.

use thiserror::Error;

/// Expected certificate-validation failures.
///
/// These never propagate as errors — they ride inside a
/// [`CertValidation`](crate::CertValidation) so the upload UI can show a
/// specific message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertFailure {
    /// The container MAC did not verify — almost always a wrong password.
    #[error("container password is incorrect")]
    WrongPassword,

    /// The container bytes are not a readable PKCS#12 structure.
    #[error("container is corrupt or not a PKCS#12 file: {0}")]
    CorruptContainer(String),

    /// The container opened but carries no certificate.
    #[error("container holds no certificate")]
    MissingCertificate,

    /// The container opened but carries no private key.
    #[error("container holds no private key")]
    MissingKey,

    /// The certificate issuer is not a recognized ICP-Brasil authority.
    #[error("issuer is not a recognized ICP-Brasil authority: {0}")]
    UntrustedIssuer(String),

    /// The certificate validity window has elapsed.
    #[error("certificate expired at {valid_until}")]
    Expired {
        /// End of the validity window.
        valid_until: chrono::DateTime<chrono::Utc>,
    },

    /// The certificate validity window has not started yet.
    #[error("certificate is not valid before {valid_from}")]
    NotYetValid {
        /// Start of the validity window.
        valid_from: chrono::DateTime<chrono::Utc>,
    },

    /// The legacy-cipher conversion fallback also failed.
    #[error("legacy container conversion failed: {0}")]
    Conversion(String),
}

/// Unexpected certificate-subsystem errors.
#[derive(Error, Debug)]
pub enum CertError {
    /// Artifact storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] ponto_storage::StorageError),

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// OpenSSL failure outside the expected validation outcomes.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The master key is missing or malformed.
    #[error("master key error: {0}")]
    MasterKey(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<openssl::error::ErrorStack> for CertError {
    fn from(stack: openssl::error::ErrorStack) -> Self {
        CertError::Crypto(stack.to_string())
    }
}
