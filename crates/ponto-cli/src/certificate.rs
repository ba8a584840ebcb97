//! `ponto certificate` — certificate lifecycle subcommands.
//!
//! The container password is read from an environment variable, never
//! from argv, so it cannot leak through the process table.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use ponto_certs::CertValidation;
use ponto_core::TenantId;
use uuid::Uuid;

use crate::build_service;

const DEFAULT_PASSWORD_ENV: &str = "PONTO_CERT_PASSWORD";

/// Arguments for the `certificate` subcommand.
#[derive(Args, Debug)]
pub struct CertificateArgs {
    #[command(subcommand)]
    command: CertificateCommand,
}

#[derive(Subcommand, Debug)]
enum CertificateCommand {
    /// Validate a PKCS#12 container without storing it.
    Validate {
        /// Path to the .p12/.pfx container.
        #[arg(long)]
        file: PathBuf,
        /// Environment variable holding the container password.
        #[arg(long, default_value = DEFAULT_PASSWORD_ENV)]
        password_env: String,
    },
    /// Validate and store a container for a tenant.
    Store {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
        /// Path to the .p12/.pfx container.
        #[arg(long)]
        file: PathBuf,
        /// Environment variable holding the container password.
        #[arg(long, default_value = DEFAULT_PASSWORD_ENV)]
        password_env: String,
    },
    /// Show expiration status for a tenant's certificate.
    Status {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
    },
    /// Remove a tenant's certificate bundle.
    Remove {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
    },
}

/// Run a `certificate` subcommand.
pub async fn run_certificate(args: CertificateArgs) -> anyhow::Result<()> {
    let service = build_service().await?;
    let certificates = service.certificates();

    match args.command {
        CertificateCommand::Validate { file, password_env } => {
            let container = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let password = read_password(&password_env)?;
            match certificates.validate_upload(&container, &password)? {
                CertValidation::Valid(cert) => {
                    println!("valid: yes");
                    println!("type: {}", cert.certificate_type.as_str());
                    println!("subject: {}", cert.subject_dn);
                    println!("issuer: {}", cert.issuer_dn);
                    println!("serial: {}", cert.serial_number);
                    println!("valid from: {}", cert.valid_from);
                    println!("valid until: {}", cert.valid_until);
                    println!(
                        "cnpj: {}",
                        cert.cnpj
                            .as_ref()
                            .map(|c| c.as_digits().to_string())
                            .unwrap_or_else(|| "not found".into())
                    );
                    println!("fingerprint: {}", cert.fingerprint_sha256);
                    println!("legacy converted: {}", cert.converted);
                }
                CertValidation::Invalid(failure) => {
                    println!("valid: no");
                    println!("error: {failure}");
                }
            }
        }
        CertificateCommand::Store {
            tenant,
            file,
            password_env,
        } => {
            let container = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let password = read_password(&password_env)?;
            if certificates
                .store(TenantId::from_uuid(tenant), &container, &password)
                .await?
            {
                println!("certificate stored");
            } else {
                println!("certificate rejected; run `certificate validate` for details");
            }
        }
        CertificateCommand::Status { tenant } => {
            let tenant = TenantId::from_uuid(tenant);
            match certificates.days_until_expiration(tenant).await? {
                Some(days) => {
                    println!("days until expiration: {days}");
                    println!(
                        "needs renewal: {}",
                        certificates.needs_renewal(tenant).await?
                    );
                }
                None => println!("no certificate stored"),
            }
        }
        CertificateCommand::Remove { tenant } => {
            if certificates.remove(TenantId::from_uuid(tenant)).await? {
                println!("certificate removed");
            } else {
                println!("no certificate stored");
            }
        }
    }
    Ok(())
}

fn read_password(env_var: &str) -> anyhow::Result<String> {
    std::env::var(env_var)
        .with_context(|| format!("password environment variable {env_var} is not set"))
}
