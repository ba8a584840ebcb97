//! `ponto generate` — AFD/AEJ generation subcommands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use ponto_core::{EmployeeId, Period, TenantId};
use uuid::Uuid;

use crate::build_service;

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand, Debug)]
enum GenerateCommand {
    /// Generate the tenant-wide AFD for a period.
    Afd {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the period (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
    },
    /// Generate one employee's AEJ for a period.
    Aej {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
        /// Employee id.
        #[arg(long)]
        employee: Uuid,
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the period (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
    },
    /// Generate AEJs for every employee of the tenant.
    AejBatch {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the period (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
    },
}

/// Run a `generate` subcommand.
pub async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let service = build_service().await?;

    match args.command {
        GenerateCommand::Afd { tenant, start, end } => {
            let period = Period::new(start, end)?;
            match service
                .generate_afd(TenantId::from_uuid(tenant), period)
                .await?
            {
                Some(record) => print_generated(&record),
                None => println!("no punch data in period; nothing generated"),
            }
        }
        GenerateCommand::Aej {
            tenant,
            employee,
            start,
            end,
        } => {
            let period = Period::new(start, end)?;
            match service
                .generate_aej(
                    TenantId::from_uuid(tenant),
                    EmployeeId::from_uuid(employee),
                    period,
                )
                .await?
            {
                Some(record) => print_generated(&record),
                None => println!("no schedule or entries; nothing generated"),
            }
        }
        GenerateCommand::AejBatch { tenant, start, end } => {
            let period = Period::new(start, end)?;
            let generated = service
                .generate_aej_batch(TenantId::from_uuid(tenant), period)
                .await?;
            println!("generated {} AEJ file(s)", generated.len());
            for record in &generated {
                print_generated(record);
            }
        }
    }
    Ok(())
}

fn print_generated(record: &ponto_db::GeneratedFileRecord) {
    println!(
        "{} {} records={} bytes={} sha256={} signed={}",
        record.id,
        record.byte_path,
        record.total_records,
        record.byte_size,
        record.content_hash,
        record.is_signed
    );
}
