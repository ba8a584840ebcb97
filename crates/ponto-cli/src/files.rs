//! `ponto files` — generated-file management subcommands.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use ponto_core::GeneratedFileId;
use uuid::Uuid;

use crate::{build_service, connect_pool};

/// Arguments for the `files` subcommand.
#[derive(Args, Debug)]
pub struct FilesArgs {
    #[command(subcommand)]
    command: FilesCommand,
}

#[derive(Subcommand, Debug)]
enum FilesCommand {
    /// List a tenant's generated files, newest first.
    List {
        /// Tenant id.
        #[arg(long)]
        tenant: Uuid,
    },
    /// Download a file's payload to a local path.
    Download {
        /// Generated-file id.
        #[arg(long)]
        id: Uuid,
        /// Destination path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Attempt the detached signature for an existing unsigned file.
    Sign {
        /// Generated-file id.
        #[arg(long)]
        id: Uuid,
    },
    /// Delete a file's metadata row and physical artifacts.
    Delete {
        /// Generated-file id.
        #[arg(long)]
        id: Uuid,
    },
}

/// Run a `files` subcommand.
pub async fn run_files(args: FilesArgs) -> anyhow::Result<()> {
    match args.command {
        FilesCommand::List { tenant } => {
            let (_, pool) = connect_pool().await?;
            let files = ponto_db::generated_files::list_by_tenant(&pool, tenant).await?;
            for record in &files {
                println!(
                    "{} {} {} {}..{} records={} signed={} downloads={}",
                    record.id,
                    record.file_type,
                    record.byte_path,
                    record.period_start,
                    record.period_end,
                    record.total_records,
                    record.is_signed,
                    record.download_count
                );
            }
            println!("{} file(s)", files.len());
        }
        FilesCommand::Download { id, out } => {
            let service = build_service().await?;
            match service
                .open_download(GeneratedFileId::from_uuid(id))
                .await?
            {
                Some((record, bytes)) => {
                    std::fs::write(&out, bytes)
                        .with_context(|| format!("writing {}", out.display()))?;
                    println!("wrote {} ({} bytes)", out.display(), record.byte_size);
                }
                None => println!("no such file"),
            }
        }
        FilesCommand::Sign { id } => {
            let service = build_service().await?;
            match service.sign_file(GeneratedFileId::from_uuid(id)).await? {
                Some(record) if record.is_signed => println!(
                    "signed with certificate serial {}",
                    record.certificate_serial.as_deref().unwrap_or("?")
                ),
                Some(_) => println!("file stays unsigned; see logs for the reason"),
                None => println!("no such file"),
            }
        }
        FilesCommand::Delete { id } => {
            let service = build_service().await?;
            if service.delete_file(GeneratedFileId::from_uuid(id)).await? {
                println!("file deleted");
            } else {
                println!("no such file");
            }
        }
    }
    Ok(())
}
