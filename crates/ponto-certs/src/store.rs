//! # Certificate Store
//!
//! Per-tenant persistence of the validated certificate bundle: container
//! bytes in the artifact store, sealed password and certificate metadata
//! in the `certificate_bundles` table. One active bundle per tenant — a
//! new upload supersedes (and physically deletes) the previous container.

use std::sync::Arc;

use chrono::Utc;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::X509;
use ponto_core::TenantId;
use ponto_db::certificate_bundles;
use ponto_db::CertificateBundleRecord;
use ponto_storage::ByteStore;
use sqlx::PgPool;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::CertError;
use crate::legacy::LegacyConverter;
use crate::secrets::MasterKey;
use crate::validation::{validate, CertValidation, RENEWAL_THRESHOLD_DAYS};

/// A bundle opened for signing: certificate, private key, and chain.
pub struct OpenedBundle {
    /// The signing certificate.
    pub certificate: X509,
    /// The private key.
    pub private_key: PKey<Private>,
    /// Intermediate chain certificates, when the container carries any.
    pub chain: Option<Stack<X509>>,
    /// Serial number from the stored bundle metadata.
    pub serial_number: String,
    /// Issuer DN from the stored bundle metadata.
    pub issuer_dn: String,
}

/// Per-tenant certificate persistence and retrieval.
pub struct CertificateStore {
    pool: PgPool,
    artifacts: Arc<dyn ByteStore>,
    master_key: MasterKey,
    converter: Arc<dyn LegacyConverter>,
}

impl CertificateStore {
    /// Create a store over the given database pool, artifact store,
    /// master key, and legacy converter.
    pub fn new(
        pool: PgPool,
        artifacts: Arc<dyn ByteStore>,
        master_key: MasterKey,
        converter: Arc<dyn LegacyConverter>,
    ) -> Self {
        Self {
            pool,
            artifacts,
            master_key,
            converter,
        }
    }

    /// Validate an uploaded container without touching stored state.
    pub fn validate_upload(
        &self,
        container: &[u8],
        password: &str,
    ) -> Result<CertValidation, CertError> {
        validate(container, password, self.converter.as_ref(), Utc::now())
    }

    /// Validate and persist a new bundle for the tenant, superseding any
    /// previous one. Returns `Ok(false)` — with stored state untouched —
    /// when validation fails.
    pub async fn store(
        &self,
        tenant: TenantId,
        container: &[u8],
        password: &str,
    ) -> Result<bool, CertError> {
        let validated = match self.validate_upload(container, password)? {
            CertValidation::Valid(cert) => cert,
            CertValidation::Invalid(failure) => {
                tracing::warn!(tenant = %tenant, %failure, "certificate upload rejected");
                return Ok(false);
            }
        };

        // The previous container's bytes go first, then the new bundle.
        if let Some(previous) = certificate_bundles::get_active(&self.pool, *tenant.as_uuid()).await?
        {
            if !self.artifacts.delete(&previous.container_path)? {
                tracing::debug!(
                    tenant = %tenant,
                    path = %previous.container_path,
                    "superseded container already absent"
                );
            }
        }

        let container_path = container_path_for(tenant);
        self.artifacts.put(&container_path, &validated.container)?;

        let record = CertificateBundleRecord {
            id: Uuid::new_v4(),
            tenant_id: *tenant.as_uuid(),
            container_path,
            encrypted_password: self.master_key.seal(password.as_bytes())?,
            certificate_type: validated.certificate_type.as_str().to_string(),
            issuer_dn: validated.issuer_dn.clone(),
            subject_dn: validated.subject_dn.clone(),
            serial_number: validated.serial_number.clone(),
            valid_from: validated.valid_from,
            valid_until: validated.valid_until,
            metadata: serde_json::json!({
                "fingerprint_sha256": validated.fingerprint_sha256,
                "cnpj": validated.cnpj.as_ref().map(|c| c.as_digits().to_string()),
                "legacy_converted": validated.converted,
            }),
            active: true,
            uploaded_at: Utc::now(),
        };
        certificate_bundles::replace(&self.pool, &record).await?;

        tracing::info!(
            tenant = %tenant,
            serial = %record.serial_number,
            valid_until = %record.valid_until,
            converted = validated.converted,
            "certificate bundle stored"
        );
        Ok(true)
    }

    /// Open the tenant's bundle for signing.
    ///
    /// `None` when no active bundle exists, the validity window has
    /// elapsed, or the stored container no longer opens with the sealed
    /// password — each an expected condition the caller treats as
    /// "cannot sign", not an error.
    pub async fn retrieve_for_signing(
        &self,
        tenant: TenantId,
    ) -> Result<Option<OpenedBundle>, CertError> {
        let record = match certificate_bundles::get_active(&self.pool, *tenant.as_uuid()).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        let now = Utc::now();
        if now < record.valid_from || now > record.valid_until {
            tracing::warn!(
                tenant = %tenant,
                valid_until = %record.valid_until,
                "certificate outside validity window; signing unavailable"
            );
            return Ok(None);
        }

        let container = match self.artifacts.get(&record.container_path)? {
            Some(bytes) => bytes,
            None => {
                tracing::warn!(
                    tenant = %tenant,
                    path = %record.container_path,
                    "stored container missing from artifact store"
                );
                return Ok(None);
            }
        };

        let password = match self.master_key.open(&record.encrypted_password) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "sealed password failed to open");
                return Ok(None);
            }
        };
        let password = Zeroizing::new(String::from_utf8_lossy(&password).to_string());

        let parsed = match Pkcs12::from_der(&container).and_then(|p| p.parse2(&password)) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "stored container failed to open");
                return Ok(None);
            }
        };

        match (parsed.cert, parsed.pkey) {
            (Some(certificate), Some(private_key)) => Ok(Some(OpenedBundle {
                certificate,
                private_key,
                chain: parsed.ca,
                serial_number: record.serial_number,
                issuer_dn: record.issuer_dn,
            })),
            _ => {
                tracing::warn!(tenant = %tenant, "stored container is missing cert or key");
                Ok(None)
            }
        }
    }

    /// Remove the tenant's bundle, deleting the container artifact
    /// best-effort. Returns whether a bundle existed.
    pub async fn remove(&self, tenant: TenantId) -> Result<bool, CertError> {
        match certificate_bundles::remove(&self.pool, *tenant.as_uuid()).await? {
            Some(record) => {
                if !self.artifacts.delete(&record.container_path)? {
                    tracing::debug!(
                        tenant = %tenant,
                        path = %record.container_path,
                        "container already absent on removal"
                    );
                }
                tracing::info!(tenant = %tenant, "certificate bundle removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Days until the active bundle expires; `None` without a bundle.
    /// Negative once the window has elapsed.
    pub async fn days_until_expiration(
        &self,
        tenant: TenantId,
    ) -> Result<Option<i64>, CertError> {
        let record = certificate_bundles::get_active(&self.pool, *tenant.as_uuid()).await?;
        Ok(record.map(|r| (r.valid_until - Utc::now()).num_days()))
    }

    /// Whether the tenant should renew: no bundle at all, or 30 days or
    /// fewer remaining.
    pub async fn needs_renewal(&self, tenant: TenantId) -> Result<bool, CertError> {
        Ok(match self.days_until_expiration(tenant).await? {
            Some(days) => days <= RENEWAL_THRESHOLD_DAYS,
            None => true,
        })
    }
}

fn container_path_for(tenant: TenantId) -> String {
    format!("certificates/{}/container.p12", tenant.as_uuid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_path_is_tenant_scoped() {
        let tenant = TenantId::new();
        let path = container_path_for(tenant);
        assert!(path.starts_with("certificates/"));
        assert!(path.ends_with("/container.p12"));
        assert!(path.contains(&tenant.as_uuid().to_string()));
    }
}
