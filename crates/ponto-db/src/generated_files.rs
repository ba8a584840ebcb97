//! Generated-file metadata persistence.
//!
//! The metadata row is the source of truth for a generated artifact: the
//! byte payload and signature live in the byte store at the recorded
//! paths. Inserts run inside the generation transaction; signature
//! updates run after commit.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// The two regulator file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Arquivo Fonte de Dados — raw punch records.
    Afd,
    /// Arquivo Eletrônico de Jornada — processed journey.
    Aej,
}

impl FileType {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Afd => "AFD",
            FileType::Aej => "AEJ",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AFD" => Some(FileType::Afd),
            "AEJ" => Some(FileType::Aej),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `generated_files` row.
#[derive(Debug, Clone)]
pub struct GeneratedFileRecord {
    /// Row id.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Covered employee — AEJ only, `None` for AFD.
    pub employee_id: Option<Uuid>,
    /// AFD or AEJ.
    pub file_type: FileType,
    /// First day of the reference period.
    pub period_start: NaiveDate,
    /// Last day of the reference period.
    pub period_end: NaiveDate,
    /// Byte-store path of the payload.
    pub byte_path: String,
    /// Byte-store path of the detached signature, once signed.
    pub signature_path: Option<String>,
    /// Total record count (equals the trailer's embedded NSR).
    pub total_records: i32,
    /// Payload size in bytes.
    pub byte_size: i64,
    /// Lowercase hex SHA-256 of the payload bytes.
    pub content_hash: String,
    /// Whether a detached signature exists.
    pub is_signed: bool,
    /// When the signature was produced.
    pub signed_at: Option<DateTime<Utc>>,
    /// Serial of the signing certificate.
    pub certificate_serial: Option<String>,
    /// Issuer of the signing certificate.
    pub certificate_issuer: Option<String>,
    /// Aggregate statistics captured at generation time.
    pub statistics: serde_json::Value,
    /// Advisory download counter.
    pub download_count: i32,
    /// When the file was last downloaded.
    pub last_downloaded_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, tenant_id, employee_id, file_type, period_start, period_end, \
     byte_path, signature_path, total_records, byte_size, content_hash, \
     is_signed, signed_at, certificate_serial, certificate_issuer, \
     statistics, download_count, last_downloaded_at, created_at";

/// Insert a new metadata row.
///
/// Takes a `&mut PgConnection` so the caller can scope the insert inside
/// the generation transaction.
pub async fn insert(
    conn: &mut PgConnection,
    record: &GeneratedFileRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO generated_files (id, tenant_id, employee_id, file_type,
         period_start, period_end, byte_path, signature_path, total_records,
         byte_size, content_hash, is_signed, signed_at, certificate_serial,
         certificate_issuer, statistics, download_count, last_downloaded_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
    )
    .bind(record.id)
    .bind(record.tenant_id)
    .bind(record.employee_id)
    .bind(record.file_type.as_str())
    .bind(record.period_start)
    .bind(record.period_end)
    .bind(&record.byte_path)
    .bind(&record.signature_path)
    .bind(record.total_records)
    .bind(record.byte_size)
    .bind(&record.content_hash)
    .bind(record.is_signed)
    .bind(record.signed_at)
    .bind(&record.certificate_serial)
    .bind(&record.certificate_issuer)
    .bind(&record.statistics)
    .bind(record.download_count)
    .bind(record.last_downloaded_at)
    .bind(record.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Fetch one row by id.
pub async fn get_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<GeneratedFileRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, GeneratedFileRow>(&format!(
        "SELECT {COLUMNS} FROM generated_files WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(GeneratedFileRow::into_record))
}

/// List a tenant's generated files, newest first.
pub async fn list_by_tenant(
    pool: &PgPool,
    tenant_id: Uuid,
) -> Result<Vec<GeneratedFileRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GeneratedFileRow>(&format!(
        "SELECT {COLUMNS} FROM generated_files
         WHERE tenant_id = $1 ORDER BY created_at DESC"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(GeneratedFileRow::into_record).collect())
}

/// Record a successful signing: signature path, timestamp, certificate
/// serial and issuer. The payload columns are untouched.
pub async fn mark_signed(
    pool: &PgPool,
    id: Uuid,
    signature_path: &str,
    signed_at: DateTime<Utc>,
    certificate_serial: &str,
    certificate_issuer: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE generated_files
         SET is_signed = TRUE, signature_path = $2, signed_at = $3,
             certificate_serial = $4, certificate_issuer = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(signature_path)
    .bind(signed_at)
    .bind(certificate_serial)
    .bind(certificate_issuer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Atomically bump the advisory download counter and timestamp.
pub async fn increment_download(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE generated_files
         SET download_count = download_count + 1, last_downloaded_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a row, returning it so the caller can delete the physical
/// artifacts at the recorded paths.
pub async fn delete(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<GeneratedFileRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, GeneratedFileRow>(&format!(
        "DELETE FROM generated_files WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(GeneratedFileRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct GeneratedFileRow {
    id: Uuid,
    tenant_id: Uuid,
    employee_id: Option<Uuid>,
    file_type: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    byte_path: String,
    signature_path: Option<String>,
    total_records: i32,
    byte_size: i64,
    content_hash: String,
    is_signed: bool,
    signed_at: Option<DateTime<Utc>>,
    certificate_serial: Option<String>,
    certificate_issuer: Option<String>,
    statistics: serde_json::Value,
    download_count: i32,
    last_downloaded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl GeneratedFileRow {
    fn into_record(self) -> GeneratedFileRecord {
        GeneratedFileRecord {
            id: self.id,
            tenant_id: self.tenant_id,
            employee_id: self.employee_id,
            file_type: FileType::parse(&self.file_type).unwrap_or(FileType::Afd),
            period_start: self.period_start,
            period_end: self.period_end,
            byte_path: self.byte_path,
            signature_path: self.signature_path,
            total_records: self.total_records,
            byte_size: self.byte_size,
            content_hash: self.content_hash,
            is_signed: self.is_signed,
            signed_at: self.signed_at,
            certificate_serial: self.certificate_serial,
            certificate_issuer: self.certificate_issuer,
            statistics: self.statistics,
            download_count: self.download_count,
            last_downloaded_at: self.last_downloaded_at,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_roundtrips_through_storage_form() {
        assert_eq!(FileType::parse(FileType::Afd.as_str()), Some(FileType::Afd));
        assert_eq!(FileType::parse(FileType::Aej.as_str()), Some(FileType::Aej));
        assert_eq!(FileType::parse("PDF"), None);
    }
}
