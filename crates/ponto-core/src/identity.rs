//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers used across the ponto
//! stack. Each identifier is a distinct type — you cannot pass a [`Cpf`]
//! where a [`Pis`] is expected.
//!
//! ## Validation
//!
//! Fiscal identifiers ([`Cnpj`], [`Cpf`], [`Pis`]) accept the common
//! punctuated renderings (`12.345.678/0001-99`, `123.456.789-09`) and
//! normalize to digits-only at construction. Length is enforced; anything
//! else is rejected with a [`ValidationError`]. UUID-based identifiers
//! ([`TenantId`], [`EmployeeId`], [`GeneratedFileId`]) are always valid by
//! construction.
//!
//! The regulator layouts consume these identifiers digits-only, so the
//! normalized form is the stored form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// A unique identifier for an employer tenant on the platform.
    TenantId
}

uuid_id! {
    /// A unique identifier for an employee of a tenant.
    EmployeeId
}

uuid_id! {
    /// A unique identifier for a generated compliance file record.
    GeneratedFileId
}

// ---------------------------------------------------------------------------
// Fiscal identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Strip the punctuation accepted in human-entered fiscal identifiers.
fn strip_punctuation(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
        .collect()
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// An employer CNPJ (Cadastro Nacional da Pessoa Jurídica), 14 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cnpj(String);

impl Cnpj {
    /// Parse a CNPJ, accepting the punctuated form `XX.XXX.XXX/XXXX-XX`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let digits = strip_punctuation(s);
        if digits.len() != 14 || !is_all_digits(&digits) {
            return Err(ValidationError::InvalidCnpj(s.to_string()));
        }
        Ok(Self(digits))
    }

    /// Return the digits-only form.
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cnpj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An employee CPF (Cadastro de Pessoas Físicas), 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cpf(String);

impl Cpf {
    /// Parse a CPF, accepting the punctuated form `XXX.XXX.XXX-XX`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let digits = strip_punctuation(s);
        if digits.len() != 11 || !is_all_digits(&digits) {
            return Err(ValidationError::InvalidCpf(s.to_string()));
        }
        Ok(Self(digits))
    }

    /// Return the digits-only form.
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An employee PIS/PASEP number, 11 digits.
///
/// This is the identifier the regulator layouts key punch records on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pis(String);

impl Pis {
    /// Parse a PIS, accepting the punctuated form `XXX.XXXXX.XX-X`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let digits = strip_punctuation(s);
        if digits.len() != 11 || !is_all_digits(&digits) {
            return Err(ValidationError::InvalidPis(s.to_string()));
        }
        Ok(Self(digits))
    }

    /// Return the digits-only form.
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An employee registration number (matrícula) assigned by the employer.
///
/// Free-form alphanumeric, 1 to 30 characters. Unlike the fiscal
/// identifiers this is employer-scoped, not nationally issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeRegistration(String);

impl EmployeeRegistration {
    /// Parse a registration number.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.len() > 30
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ValidationError::InvalidRegistration(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the registration as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
