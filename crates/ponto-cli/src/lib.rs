//! # ponto CLI library
//!
//! Subcommand handlers for the `ponto` binary, plus the shared service
//! wiring: configuration from the environment, a Postgres pool, the
//! filesystem artifact store, and the certificate store with the
//! OpenSSL-CLI legacy converter.

use std::sync::Arc;

use anyhow::Context;
use ponto_certs::{CertificateStore, MasterKey, OpensslCliConverter};
use ponto_engine::{AppConfig, GenerationService, PgFactSource};
use ponto_storage::{ByteStore, FsByteStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod certificate;
pub mod files;
pub mod generate;

/// Connect a pool from the environment configuration.
pub async fn connect_pool() -> anyhow::Result<(AppConfig, PgPool)> {
    let config = AppConfig::from_env().context("loading configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("connecting to database")?;
    Ok((config, pool))
}

/// Wire the full generation service.
pub async fn build_service() -> anyhow::Result<GenerationService<PgFactSource>> {
    let (config, pool) = connect_pool().await?;
    let artifacts: Arc<dyn ByteStore> = Arc::new(FsByteStore::new(&config.storage_dir));
    let master_key =
        MasterKey::from_hex(&config.master_key_hex).context("parsing PONTO_MASTER_KEY")?;
    let certificates = CertificateStore::new(
        pool.clone(),
        artifacts.clone(),
        master_key,
        Arc::new(OpensslCliConverter::default()),
    );
    let facts = PgFactSource::new(pool.clone());
    Ok(GenerationService::new(pool, artifacts, facts, certificates))
}

/// Run the migrations for the tables this stack owns.
pub async fn run_migrate() -> anyhow::Result<()> {
    let (_, pool) = connect_pool().await?;
    ponto_db::migrator()
        .run(&pool)
        .await
        .context("running migrations")?;
    println!("migrations applied");
    Ok(())
}
