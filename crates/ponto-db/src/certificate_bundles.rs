//! Certificate-bundle persistence.
//!
//! One active bundle per tenant: a new upload supersedes the previous
//! row, and the caller deletes the superseded container artifact before
//! inserting. The plaintext certificate password never reaches this
//! table — only its AES-GCM sealed form.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// One `certificate_bundles` row.
#[derive(Debug, Clone)]
pub struct CertificateBundleRecord {
    /// Row id.
    pub id: Uuid,
    /// Owning tenant (unique — one bundle per tenant).
    pub tenant_id: Uuid,
    /// Byte-store path of the PKCS#12 container.
    pub container_path: String,
    /// AES-256-GCM sealed container password.
    pub encrypted_password: Vec<u8>,
    /// Custody class: "A1" (software) or "A3" (hardware).
    pub certificate_type: String,
    /// Issuer distinguished name.
    pub issuer_dn: String,
    /// Subject distinguished name.
    pub subject_dn: String,
    /// Certificate serial number (hex).
    pub serial_number: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Fingerprint and key-usage metadata.
    pub metadata: serde_json::Value,
    /// Whether the bundle is usable for signing.
    pub active: bool,
    /// When the bundle was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, tenant_id, container_path, encrypted_password, certificate_type, \
     issuer_dn, subject_dn, serial_number, valid_from, valid_until, \
     metadata, active, uploaded_at";

/// Replace the tenant's bundle: delete any existing row, insert the new
/// one. Returns the superseded row so the caller can delete its
/// container artifact.
pub async fn replace(
    pool: &PgPool,
    record: &CertificateBundleRecord,
) -> Result<Option<CertificateBundleRecord>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let previous = sqlx::query_as::<_, CertificateBundleRow>(&format!(
        "DELETE FROM certificate_bundles WHERE tenant_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(record.tenant_id)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO certificate_bundles (id, tenant_id, container_path,
         encrypted_password, certificate_type, issuer_dn, subject_dn,
         serial_number, valid_from, valid_until, metadata, active, uploaded_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(record.id)
    .bind(record.tenant_id)
    .bind(&record.container_path)
    .bind(&record.encrypted_password)
    .bind(&record.certificate_type)
    .bind(&record.issuer_dn)
    .bind(&record.subject_dn)
    .bind(&record.serial_number)
    .bind(record.valid_from)
    .bind(record.valid_until)
    .bind(&record.metadata)
    .bind(record.active)
    .bind(record.uploaded_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(previous.map(CertificateBundleRow::into_record))
}

/// Fetch the tenant's active bundle.
pub async fn get_active(
    pool: &PgPool,
    tenant_id: Uuid,
) -> Result<Option<CertificateBundleRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CertificateBundleRow>(&format!(
        "SELECT {COLUMNS} FROM certificate_bundles WHERE tenant_id = $1 AND active"
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(CertificateBundleRow::into_record))
}

/// Remove the tenant's bundle, returning it so the caller can delete the
/// container artifact.
pub async fn remove(
    pool: &PgPool,
    tenant_id: Uuid,
) -> Result<Option<CertificateBundleRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CertificateBundleRow>(&format!(
        "DELETE FROM certificate_bundles WHERE tenant_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(CertificateBundleRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CertificateBundleRow {
    id: Uuid,
    tenant_id: Uuid,
    container_path: String,
    encrypted_password: Vec<u8>,
    certificate_type: String,
    issuer_dn: String,
    subject_dn: String,
    serial_number: String,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    metadata: serde_json::Value,
    active: bool,
    uploaded_at: DateTime<Utc>,
}

impl CertificateBundleRow {
    fn into_record(self) -> CertificateBundleRecord {
        CertificateBundleRecord {
            id: self.id,
            tenant_id: self.tenant_id,
            container_path: self.container_path,
            encrypted_password: self.encrypted_password,
            certificate_type: self.certificate_type,
            issuer_dn: self.issuer_dn,
            subject_dn: self.subject_dn,
            serial_number: self.serial_number,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            metadata: self.metadata,
            active: self.active,
            uploaded_at: self.uploaded_at,
        }
    }
}
