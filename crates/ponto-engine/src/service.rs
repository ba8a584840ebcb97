//! # Generation Service
//!
//! The entry points callers use: AFD generation for a tenant, AEJ
//! generation for one employee or a whole tenant, re-signing, download
//! accounting, and deletion.

use std::sync::Arc;

use chrono::Utc;
use ponto_certs::CertificateStore;
use ponto_core::{sha256_bytes, EmployeeId, GeneratedFileId, Period, TenantId};
use ponto_db::generated_files;
use ponto_db::{FileType, GeneratedFileRecord};
use ponto_files::{
    aej_filename, afd_filename, build_aej, build_afd, signature_filename, AejInput, AfdInput,
    AssembledFile,
};
use ponto_storage::ByteStore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::facts::FactSource;

/// Orchestrates generation, signing, and artifact lifecycle.
pub struct GenerationService<F> {
    pool: PgPool,
    artifacts: Arc<dyn ByteStore>,
    facts: F,
    certificates: CertificateStore,
}

impl<F: FactSource> GenerationService<F> {
    /// Wire a service over the database pool, artifact store, fact
    /// source, and certificate store.
    pub fn new(
        pool: PgPool,
        artifacts: Arc<dyn ByteStore>,
        facts: F,
        certificates: CertificateStore,
    ) -> Self {
        Self {
            pool,
            artifacts,
            facts,
            certificates,
        }
    }

    /// The certificate store, for upload/status operations.
    pub fn certificates(&self) -> &CertificateStore {
        &self.certificates
    }

    /// Generate the tenant-wide AFD for a period.
    ///
    /// `Ok(None)` when no employee punched inside the period — nothing to
    /// generate, not an error.
    pub async fn generate_afd(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Option<GeneratedFileRecord>, EngineError> {
        let tenant_view = self
            .facts
            .tenant_view(tenant)
            .await?
            .ok_or(EngineError::UnknownTenant(tenant))?;
        let employees = self.facts.employees_with_entries(tenant, period).await?;

        let input = AfdInput {
            tenant: tenant_view.clone(),
            period,
            generated_at: Utc::now().naive_utc(),
            employees,
        };
        let assembled = match build_afd(&input) {
            Some(assembled) => assembled,
            None => {
                tracing::info!(tenant = %tenant, %period, "no punch data in period; AFD skipped");
                return Ok(None);
            }
        };

        let filename = afd_filename(&tenant_view.cnpj, &period);
        let record = self
            .persist(tenant, None, FileType::Afd, period, &filename, &assembled)
            .await?;
        Ok(Some(self.try_sign(record).await))
    }

    /// Generate one employee's AEJ for a period.
    ///
    /// `Ok(None)` when the employee has neither a schedule nor entries in
    /// the period.
    pub async fn generate_aej(
        &self,
        tenant: TenantId,
        employee: EmployeeId,
        period: Period,
    ) -> Result<Option<GeneratedFileRecord>, EngineError> {
        let tenant_view = self
            .facts
            .tenant_view(tenant)
            .await?
            .ok_or(EngineError::UnknownTenant(tenant))?;
        let employee_view = self
            .facts
            .employee_view(tenant, employee)
            .await?
            .ok_or(EngineError::UnknownEmployee(employee))?;
        let schedule = self.facts.schedule_for(employee).await?;
        let entries = self.facts.entries_for(employee, period).await?;
        let holidays = self.facts.holidays_in(tenant, period).await?;

        let input = AejInput {
            tenant: tenant_view.clone(),
            employee: employee_view.clone(),
            schedule,
            period,
            generated_at: Utc::now().naive_utc(),
            entries,
        };
        let assembled = match build_aej(&input, &holidays.as_slice()) {
            Some(assembled) => assembled,
            None => {
                tracing::info!(
                    tenant = %tenant,
                    employee = %employee,
                    %period,
                    "no schedule or entries; AEJ skipped"
                );
                return Ok(None);
            }
        };

        let filename = aej_filename(&tenant_view.cnpj, &employee_view.registration, &period);
        let record = self
            .persist(
                tenant,
                Some(employee),
                FileType::Aej,
                period,
                &filename,
                &assembled,
            )
            .await?;
        Ok(Some(self.try_sign(record).await))
    }

    /// Generate AEJs for every employee of the tenant.
    ///
    /// Sequential by design — each run owns its own sequence counter.
    /// One employee's failure is logged and skipped; the result is the
    /// list of files that were generated.
    pub async fn generate_aej_batch(
        &self,
        tenant: TenantId,
        period: Period,
    ) -> Result<Vec<GeneratedFileRecord>, EngineError> {
        let employees = self.facts.employees_of(tenant).await?;
        let mut generated = Vec::new();

        for employee in employees {
            match self
                .generate_aej(tenant, employee.employee_id, period)
                .await
            {
                Ok(Some(record)) => generated.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        tenant = %tenant,
                        employee = %employee.employee_id,
                        %period,
                        error = %e,
                        "AEJ generation failed; continuing batch"
                    );
                }
            }
        }

        tracing::info!(
            tenant = %tenant,
            %period,
            generated = generated.len(),
            "AEJ batch finished"
        );
        Ok(generated)
    }

    /// Attempt the detached signature for an existing file.
    ///
    /// `Ok(None)` when no such file exists. The payload columns
    /// (`total_records`, `content_hash`) are never altered by signing.
    pub async fn sign_file(
        &self,
        id: GeneratedFileId,
    ) -> Result<Option<GeneratedFileRecord>, EngineError> {
        match generated_files::get_by_id(&self.pool, *id.as_uuid()).await? {
            Some(record) => Ok(Some(self.try_sign(record).await)),
            None => Ok(None),
        }
    }

    /// Fetch a file's payload for download, bumping the advisory counter.
    pub async fn open_download(
        &self,
        id: GeneratedFileId,
    ) -> Result<Option<(GeneratedFileRecord, Vec<u8>)>, EngineError> {
        let record = match generated_files::get_by_id(&self.pool, *id.as_uuid()).await? {
            Some(record) => record,
            None => return Ok(None),
        };
        let bytes = match self.artifacts.get(&record.byte_path)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        generated_files::increment_download(&self.pool, record.id).await?;
        Ok(Some((record, bytes)))
    }

    /// Delete a file's metadata row and its physical artifacts.
    ///
    /// Artifact deletion is best-effort: a missing physical file is not
    /// an error.
    pub async fn delete_file(&self, id: GeneratedFileId) -> Result<bool, EngineError> {
        let record = match generated_files::delete(&self.pool, *id.as_uuid()).await? {
            Some(record) => record,
            None => return Ok(false),
        };
        if !self.artifacts.delete(&record.byte_path)? {
            tracing::debug!(path = %record.byte_path, "payload artifact already absent");
        }
        if let Some(signature_path) = &record.signature_path {
            if !self.artifacts.delete(signature_path)? {
                tracing::debug!(path = %signature_path, "signature artifact already absent");
            }
        }
        Ok(true)
    }

    /// Write bytes and insert the metadata row inside one transaction.
    async fn persist(
        &self,
        tenant: TenantId,
        employee: Option<EmployeeId>,
        file_type: FileType,
        period: Period,
        filename: &str,
        assembled: &AssembledFile,
    ) -> Result<GeneratedFileRecord, EngineError> {
        let digest = sha256_bytes(&assembled.bytes);
        let byte_path = format!("files/{}/{filename}", tenant.as_uuid());

        let record = GeneratedFileRecord {
            id: Uuid::new_v4(),
            tenant_id: *tenant.as_uuid(),
            employee_id: employee.map(|e| *e.as_uuid()),
            file_type,
            period_start: period.start(),
            period_end: period.end(),
            byte_path: byte_path.clone(),
            signature_path: None,
            total_records: assembled.total_records as i32,
            byte_size: assembled.bytes.len() as i64,
            content_hash: digest.to_hex(),
            is_signed: false,
            signed_at: None,
            certificate_serial: None,
            certificate_issuer: None,
            statistics: serde_json::to_value(&assembled.statistics)?,
            download_count: 0,
            last_downloaded_at: None,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        self.artifacts.put(&byte_path, &assembled.bytes)?;
        generated_files::insert(&mut *tx, &record).await?;
        tx.commit().await?;

        tracing::info!(
            tenant = %tenant,
            file = %filename,
            records = record.total_records,
            bytes = record.byte_size,
            hash = %record.content_hash,
            "compliance file generated"
        );
        Ok(record)
    }

    /// Sign after commit. Every failure path logs and returns the record
    /// unchanged — a signing failure never fails generation.
    async fn try_sign(&self, mut record: GeneratedFileRecord) -> GeneratedFileRecord {
        let tenant = TenantId::from_uuid(record.tenant_id);

        let bundle = match self.certificates.retrieve_for_signing(tenant).await {
            Ok(Some(bundle)) => bundle,
            Ok(None) => {
                tracing::info!(
                    tenant = %tenant,
                    file = %record.byte_path,
                    "no usable certificate; file stays unsigned"
                );
                return record;
            }
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "certificate retrieval failed");
                return record;
            }
        };

        let bytes = match self.artifacts.get(&record.byte_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::warn!(path = %record.byte_path, "payload missing; cannot sign");
                return record;
            }
            Err(e) => {
                tracing::warn!(error = %e, "payload read failed; cannot sign");
                return record;
            }
        };

        let signature = match ponto_signing::sign_detached(&bytes, &bundle) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "signature production failed");
                return record;
            }
        };

        let signature_path = signature_filename(&record.byte_path);
        let signed_at = Utc::now();
        let update = async {
            self.artifacts.put(&signature_path, &signature)?;
            generated_files::mark_signed(
                &self.pool,
                record.id,
                &signature_path,
                signed_at,
                &bundle.serial_number,
                &bundle.issuer_dn,
            )
            .await
            .map_err(EngineError::from)?;
            Ok::<(), EngineError>(())
        };
        match update.await {
            Ok(()) => {
                record.is_signed = true;
                record.signed_at = Some(signed_at);
                record.signature_path = Some(signature_path);
                record.certificate_serial = Some(bundle.serial_number.clone());
                record.certificate_issuer = Some(bundle.issuer_dn.clone());
                tracing::info!(
                    tenant = %tenant,
                    file = %record.byte_path,
                    serial = %bundle.serial_number,
                    "detached signature stored"
                );
            }
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "signature persistence failed");
            }
        }
        record
    }
}
