//! # Legacy Container Conversion
//!
//! Re-exports a PKCS#12 container that was encrypted with ciphers modern
//! OpenSSL builds refuse (RC2, 3DES) into a modern container protected by
//! the same password.
//!
//! The conversion sits behind the [`LegacyConverter`] trait so the
//! implementation can swap between an embedded crypto call and a
//! subprocess invocation without touching callers. The production
//! implementation, [`OpensslCliConverter`], shells out to the `openssl`
//! binary with the `-legacy` provider flag and enforces a hard timeout —
//! a hung external tool becomes a conversion failure, never a stalled
//! request.
//!
//! The password reaches the subprocess through an environment variable
//! (`-passin env:`), never through argv where other processes could read
//! it.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Environment variable used to hand the password to the CLI.
const PASSWORD_ENV: &str = "PONTO_P12_PASSWORD";

/// Poll interval while waiting for the subprocess.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors from a legacy-container conversion attempt.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The external tool did not finish within the configured timeout.
    #[error("conversion timed out after {0:?}")]
    Timeout(Duration),

    /// The external tool exited with a failure status.
    #[error("conversion tool failed (status {status}): {stderr}")]
    ToolFailure {
        /// Exit status of the tool.
        status: i32,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The tool could not be spawned or its files handled.
    #[error("I/O error during conversion: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a legacy-cipher PKCS#12 container into a modern one
/// protected by the same password.
pub trait LegacyConverter: Send + Sync {
    /// Perform the conversion. The returned bytes must open with the
    /// same password as the input.
    fn convert(&self, container: &[u8], password: &str) -> Result<Vec<u8>, ConversionError>;
}

/// Production converter: two `openssl` CLI invocations under a timeout.
///
/// 1. `openssl pkcs12 -in <legacy> -nodes -legacy` extracts key and
///    certificates to PEM using the legacy provider.
/// 2. `openssl pkcs12 -export` re-packs the PEM bundle with modern
///    ciphers and the original password.
#[derive(Debug, Clone)]
pub struct OpensslCliConverter {
    openssl_bin: PathBuf,
    timeout: Duration,
}

impl Default for OpensslCliConverter {
    fn default() -> Self {
        Self {
            openssl_bin: PathBuf::from("openssl"),
            timeout: Duration::from_secs(10),
        }
    }
}

impl OpensslCliConverter {
    /// Create a converter with an explicit binary path and timeout.
    pub fn new(openssl_bin: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            openssl_bin: openssl_bin.into(),
            timeout,
        }
    }

    /// Run one command to completion, killing it at the deadline.
    fn run(&self, mut cmd: Command) -> Result<Output, ConversionError> {
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if child.try_wait()?.is_some() {
                return Ok(child.wait_with_output()?);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ConversionError::Timeout(self.timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn check(output: Output) -> Result<Output, ConversionError> {
        if output.status.success() {
            Ok(output)
        } else {
            Err(ConversionError::ToolFailure {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl LegacyConverter for OpensslCliConverter {
    fn convert(&self, container: &[u8], password: &str) -> Result<Vec<u8>, ConversionError> {
        let workdir = tempfile::tempdir()?;
        let legacy_path = workdir.path().join("legacy.p12");
        let pem_path = workdir.path().join("bundle.pem");
        let modern_path = workdir.path().join("modern.p12");

        let mut legacy_file = std::fs::File::create(&legacy_path)?;
        legacy_file.write_all(container)?;
        drop(legacy_file);

        let mut extract = Command::new(&self.openssl_bin);
        extract
            .arg("pkcs12")
            .arg("-in")
            .arg(&legacy_path)
            .arg("-nodes")
            .arg("-legacy")
            .arg("-passin")
            .arg(format!("env:{PASSWORD_ENV}"))
            .env(PASSWORD_ENV, password);
        let extracted = Self::check(self.run(extract)?)?;
        std::fs::write(&pem_path, &extracted.stdout)?;

        let mut export = Command::new(&self.openssl_bin);
        export
            .arg("pkcs12")
            .arg("-export")
            .arg("-in")
            .arg(&pem_path)
            .arg("-out")
            .arg(&modern_path)
            .arg("-passout")
            .arg(format!("env:{PASSWORD_ENV}"))
            .env(PASSWORD_ENV, password);
        Self::check(self.run(export)?)?;

        Ok(std::fs::read(&modern_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_surfaces_as_io_error() {
        let converter =
            OpensslCliConverter::new("/nonexistent/openssl-bin", Duration::from_secs(1));
        match converter.convert(b"whatever", "pass") {
            Err(ConversionError::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let converter = OpensslCliConverter::default();
        assert_eq!(converter.timeout, Duration::from_secs(10));
    }

    #[test]
    fn timeout_error_display_names_duration() {
        let err = ConversionError::Timeout(Duration::from_secs(10));
        assert!(format!("{err}").contains("10s"));
    }
}
