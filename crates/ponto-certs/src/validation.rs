//! # Certificate Validation
//!
//! Opens an uploaded PKCS#12 container, falls back to legacy-cipher
//! conversion when the modern open refuses the encryption algorithm, and
//! checks the certificate against the recognized ICP-Brasil issuing
//! authorities and its own validity window.
//!
//! Every expected failure mode comes back inside [`CertValidation`];
//! propagated errors are reserved for unexpected OpenSSL conditions.

use chrono::{DateTime, Duration, Utc};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::hash::MessageDigest;
use openssl::pkcs12::{ParsedPkcs12_2, Pkcs12};
use openssl::x509::{X509NameRef, X509};
use ponto_core::Cnpj;
use zeroize::Zeroizing;

use crate::error::{CertError, CertFailure};
use crate::legacy::LegacyConverter;

/// Issuer-DN substrings of the recognized national authorities.
///
/// Matching is case-insensitive on the rendered issuer DN. The list
/// covers the root anchor plus the high-volume intermediates that issue
/// employer e-CNPJ certificates.
const ICP_BRASIL_AUTHORITIES: &[&str] = &[
    "ICP-BRASIL",
    "AUTORIDADE CERTIFICADORA RAIZ BRASILEIRA",
    "AC CERTISIGN",
    "AC SERASA",
    "AC SOLUTI",
    "AC VALID",
    "AC SAFEWEB",
    "AC DIGITALSIGN",
    "AC PRODEMGE",
    "SERPRO",
];

/// Renewal is flagged when this few days remain.
pub const RENEWAL_THRESHOLD_DAYS: i64 = 30;

/// Custody class of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateType {
    /// Software certificate held as a file.
    A1,
    /// Hardware certificate held on a token or smartcard.
    A3,
}

impl CertificateType {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::A1 => "A1",
            CertificateType::A3 => "A3",
        }
    }
}

/// A successfully validated certificate bundle.
#[derive(Debug, Clone)]
pub struct ValidCertificate {
    /// Custody class. Every file-based upload is classified A1; true
    /// hardware-token detection is out of scope.
    pub certificate_type: CertificateType,
    /// Issuer distinguished name.
    pub issuer_dn: String,
    /// Subject distinguished name.
    pub subject_dn: String,
    /// Serial number, lowercase hex.
    pub serial_number: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Employer CNPJ extracted from the subject, when found.
    pub cnpj: Option<Cnpj>,
    /// SHA-256 fingerprint of the certificate, lowercase hex.
    pub fingerprint_sha256: String,
    /// The container bytes to persist — the legacy-converted re-export
    /// when conversion ran, otherwise the original upload.
    pub container: Vec<u8>,
    /// Whether legacy-cipher conversion was applied.
    pub converted: bool,
}

/// Outcome of validating an uploaded container.
#[derive(Debug)]
pub enum CertValidation {
    /// The container opened and the certificate passed every check.
    Valid(Box<ValidCertificate>),
    /// An expected failure the caller shows to the user.
    Invalid(CertFailure),
}

impl CertValidation {
    /// Whether the outcome is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, CertValidation::Valid(_))
    }
}

/// Validate an uploaded PKCS#12 container against the given password.
///
/// `now` is explicit so the validity-window check is testable; callers
/// pass `Utc::now()`.
pub fn validate(
    container: &[u8],
    password: &str,
    converter: &dyn LegacyConverter,
    now: DateTime<Utc>,
) -> Result<CertValidation, CertError> {
    let (parsed, stored_container, converted) =
        match open_container(container, password, converter) {
            Ok(opened) => opened,
            Err(failure) => return Ok(CertValidation::Invalid(failure)),
        };

    let cert = match &parsed.cert {
        Some(cert) => cert,
        None => return Ok(CertValidation::Invalid(CertFailure::MissingCertificate)),
    };
    if parsed.pkey.is_none() {
        return Ok(CertValidation::Invalid(CertFailure::MissingKey));
    }

    let issuer_dn = render_name(cert.issuer_name());
    if !is_recognized_issuer(&issuer_dn) {
        return Ok(CertValidation::Invalid(CertFailure::UntrustedIssuer(
            issuer_dn,
        )));
    }

    let valid_from = asn1_to_utc(cert.not_before(), now)?;
    let valid_until = asn1_to_utc(cert.not_after(), now)?;
    if now < valid_from {
        return Ok(CertValidation::Invalid(CertFailure::NotYetValid {
            valid_from,
        }));
    }
    if now > valid_until {
        return Ok(CertValidation::Invalid(CertFailure::Expired { valid_until }));
    }

    let subject_dn = render_name(cert.subject_name());
    let serial_number = cert
        .serial_number()
        .to_bn()?
        .to_hex_str()?
        .to_string()
        .to_lowercase();
    let fingerprint_sha256 = hex::encode(cert.digest(MessageDigest::sha256())?.to_vec());
    let cnpj = extract_cnpj(cert, &subject_dn);

    Ok(CertValidation::Valid(Box::new(ValidCertificate {
        certificate_type: CertificateType::A1,
        issuer_dn,
        subject_dn,
        serial_number,
        valid_from,
        valid_until,
        cnpj,
        fingerprint_sha256,
        container: stored_container,
        converted,
    })))
}

/// Open the container, applying the legacy-conversion fallback when the
/// modern open fails for any reason other than a bad password.
fn open_container(
    container: &[u8],
    password: &str,
    converter: &dyn LegacyConverter,
) -> Result<(ParsedPkcs12_2, Vec<u8>, bool), CertFailure> {
    let first_error = match try_open(container, password) {
        Ok(parsed) => return Ok((parsed, container.to_vec(), false)),
        Err(failure @ CertFailure::WrongPassword) => return Err(failure),
        Err(failure) => failure,
    };

    let converted = converter
        .convert(container, password)
        .map_err(|e| CertFailure::Conversion(e.to_string()))?;

    match try_open(&converted, password) {
        Ok(parsed) => Ok((parsed, converted, true)),
        // The conversion produced bytes the modern path still refuses;
        // report the original open failure, which names the real cause.
        Err(CertFailure::WrongPassword) => Err(CertFailure::WrongPassword),
        Err(_) => Err(first_error),
    }
}

fn try_open(container: &[u8], password: &str) -> Result<ParsedPkcs12_2, CertFailure> {
    let pkcs12 = Pkcs12::from_der(container)
        .map_err(|e| CertFailure::CorruptContainer(first_reason(&e)))?;
    // Keep the transient plaintext wrapped so it is wiped on drop.
    let password = Zeroizing::new(password.to_string());
    pkcs12.parse2(&password).map_err(|e| {
        let reason = first_reason(&e);
        if reason.to_lowercase().contains("mac") {
            CertFailure::WrongPassword
        } else {
            CertFailure::CorruptContainer(reason)
        }
    })
}

fn first_reason(stack: &openssl::error::ErrorStack) -> String {
    stack
        .errors()
        .first()
        .and_then(|e| e.reason().map(str::to_string))
        .unwrap_or_else(|| stack.to_string())
}

/// Render a DN as `KEY=value, KEY=value` in entry order.
fn render_name(name: &X509NameRef) -> String {
    name.entries()
        .map(|entry| {
            let key = entry
                .object()
                .nid()
                .short_name()
                .unwrap_or("UNKNOWN")
                .to_string();
            let value = entry
                .data()
                .as_utf8()
                .map(|s| s.to_string())
                .unwrap_or_else(|_| String::from_utf8_lossy(entry.data().as_slice()).to_string());
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_recognized_issuer(issuer_dn: &str) -> bool {
    let upper = issuer_dn.to_uppercase();
    ICP_BRASIL_AUTHORITIES
        .iter()
        .any(|authority| upper.contains(authority))
}

/// Convert an ASN.1 time to UTC by offsetting from a known instant.
fn asn1_to_utc(time: &Asn1TimeRef, now: DateTime<Utc>) -> Result<DateTime<Utc>, CertError> {
    let reference = Asn1Time::from_unix(now.timestamp())?;
    let diff = reference.diff(time)?;
    Ok(now + Duration::days(i64::from(diff.days)) + Duration::seconds(i64::from(diff.secs)))
}

/// Extract the employer CNPJ: the first run of 14 or more consecutive
/// digits in the subject DN, then in the subject-alternative-name
/// entries, taking the first 14 digits of the run.
///
/// This mirrors the e-CNPJ convention of embedding the tax id in the CN
/// (`RAZAO SOCIAL:12345678000199`). It is a known heuristic: an
/// unrelated long numeric RDN would false-positive.
fn extract_cnpj(cert: &X509, subject_dn: &str) -> Option<Cnpj> {
    if let Some(cnpj) = find_digit_run(subject_dn) {
        return Some(cnpj);
    }
    if let Some(names) = cert.subject_alt_names() {
        for name in names.iter() {
            let text = name
                .dnsname()
                .or_else(|| name.email())
                .or_else(|| name.uri());
            if let Some(cnpj) = text.and_then(find_digit_run) {
                return Some(cnpj);
            }
        }
    }
    None
}

fn find_digit_run(text: &str) -> Option<Cnpj> {
    let mut run = String::new();
    let mut chars = text.chars().chain(std::iter::once(' '));
    loop {
        let c = chars.next()?;
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            if run.len() >= 14 {
                return Cnpj::parse(&run[..14]).ok();
            }
            run.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::ConversionError;
    use openssl::asn1::Asn1Time;
    use openssl::bn::{BigNum, MsbOption};
    use openssl::hash::MessageDigest;
    use openssl::nid::Nid;
    use openssl::pkey::{PKey, Private};
    use openssl::rsa::Rsa;
    use openssl::x509::{X509Builder, X509NameBuilder};

    /// A converter that always fails — for paths where conversion must
    /// not be reached or must fail.
    struct FailingConverter;

    impl LegacyConverter for FailingConverter {
        fn convert(&self, _: &[u8], _: &str) -> Result<Vec<u8>, ConversionError> {
            Err(ConversionError::ToolFailure {
                status: 1,
                stderr: "unsupported".into(),
            })
        }
    }

    /// A converter that returns a fixed known-good container, standing in
    /// for the legacy re-export path.
    struct StubConverter(Vec<u8>);

    impl LegacyConverter for StubConverter {
        fn convert(&self, _: &[u8], _: &str) -> Result<Vec<u8>, ConversionError> {
            Ok(self.0.clone())
        }
    }

    fn build_cert(issuer_o: &str, subject_cn: &str, days: i64) -> (X509, PKey<Private>) {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_nid(Nid::ORGANIZATIONNAME, issuer_o).unwrap();
        name.append_entry_by_nid(Nid::COMMONNAME, subject_cn).unwrap();
        let name = name.build();

        let mut builder = X509Builder::new().unwrap();
        builder.set_version(2).unwrap();
        let mut serial = BigNum::new().unwrap();
        serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
        builder
            .set_serial_number(&serial.to_asn1_integer().unwrap())
            .unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        if days >= 0 {
            builder
                .set_not_before(&Asn1Time::days_from_now(0).unwrap())
                .unwrap();
            builder
                .set_not_after(&Asn1Time::days_from_now(days as u32).unwrap())
                .unwrap();
        } else {
            // Already-elapsed window for expiry tests.
            let start = Utc::now().timestamp() - 400 * 86_400;
            let end = Utc::now().timestamp() - 10 * 86_400;
            builder
                .set_not_before(&Asn1Time::from_unix(start).unwrap())
                .unwrap();
            builder
                .set_not_after(&Asn1Time::from_unix(end).unwrap())
                .unwrap();
        }
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        (builder.build(), pkey)
    }

    fn build_p12(issuer_o: &str, subject_cn: &str, days: i64, password: &str) -> Vec<u8> {
        let (cert, pkey) = build_cert(issuer_o, subject_cn, days);
        Pkcs12::builder()
            .name("upload")
            .pkey(&pkey)
            .cert(&cert)
            .build2(password)
            .unwrap()
            .to_der()
            .unwrap()
    }

    #[test]
    fn valid_icp_brasil_container_passes() {
        let p12 = build_p12("ICP-Brasil", "ACME LTDA:12345678000199", 365, "senha");
        let result = validate(&p12, "senha", &FailingConverter, Utc::now()).unwrap();
        match result {
            CertValidation::Valid(cert) => {
                assert_eq!(cert.certificate_type, CertificateType::A1);
                assert!(cert.issuer_dn.contains("ICP-Brasil"));
                assert_eq!(
                    cert.cnpj.as_ref().map(|c| c.as_digits().to_string()),
                    Some("12345678000199".to_string())
                );
                assert_eq!(cert.fingerprint_sha256.len(), 64);
                assert!(!cert.serial_number.is_empty());
                assert!(!cert.converted);
                assert!(cert.valid_from <= Utc::now());
                assert!(cert.valid_until > Utc::now());
            }
            CertValidation::Invalid(failure) => panic!("expected valid, got {failure}"),
        }
    }

    #[test]
    fn wrong_password_is_reported_without_conversion() {
        let p12 = build_p12("ICP-Brasil", "ACME:12345678000199", 365, "senha");
        let result = validate(&p12, "errada", &FailingConverter, Utc::now()).unwrap();
        match result {
            CertValidation::Invalid(CertFailure::WrongPassword) => {}
            other => panic!("expected WrongPassword, got {other:?}"),
        }
    }

    #[test]
    fn untrusted_issuer_is_rejected() {
        let p12 = build_p12("Totally Unrelated CA", "ACME:12345678000199", 365, "senha");
        let result = validate(&p12, "senha", &FailingConverter, Utc::now()).unwrap();
        match result {
            CertValidation::Invalid(CertFailure::UntrustedIssuer(issuer)) => {
                assert!(issuer.contains("Totally Unrelated CA"));
            }
            other => panic!("expected UntrustedIssuer, got {other:?}"),
        }
    }

    #[test]
    fn expired_certificate_is_rejected() {
        let p12 = build_p12("ICP-Brasil", "ACME:12345678000199", -1, "senha");
        let result = validate(&p12, "senha", &FailingConverter, Utc::now()).unwrap();
        match result {
            CertValidation::Invalid(CertFailure::Expired { valid_until }) => {
                assert!(valid_until < Utc::now());
            }
            other => panic!("expected Expired, got {other:?}"),
        }
    }

    #[test]
    fn legacy_fallback_agrees_with_direct_parse_of_modern_export() {
        // A container the modern path cannot read at all, standing in for
        // a legacy-cipher export; the stub converter hands back the
        // modern re-export of the same logical certificate.
        let modern = build_p12("ICP-Brasil", "ACME LTDA:12345678000199", 365, "senha");
        let unreadable = b"not-a-pkcs12-container".to_vec();

        let converted = validate(
            &unreadable,
            "senha",
            &StubConverter(modern.clone()),
            Utc::now(),
        )
        .unwrap();
        let direct = validate(&modern, "senha", &FailingConverter, Utc::now()).unwrap();

        match (converted, direct) {
            (CertValidation::Valid(a), CertValidation::Valid(b)) => {
                assert!(a.converted);
                assert!(!b.converted);
                assert_eq!(a.subject_dn, b.subject_dn);
                assert_eq!(a.issuer_dn, b.issuer_dn);
                assert_eq!(a.serial_number, b.serial_number);
                assert_eq!(a.fingerprint_sha256, b.fingerprint_sha256);
                // The stored container is the converted modern export.
                assert_eq!(a.container, modern);
            }
            other => panic!("expected both valid, got {other:?}"),
        }
    }

    #[test]
    fn failed_conversion_reports_conversion_failure() {
        let result = validate(b"garbage", "senha", &FailingConverter, Utc::now()).unwrap();
        match result {
            CertValidation::Invalid(CertFailure::Conversion(_)) => {}
            other => panic!("expected Conversion failure, got {other:?}"),
        }
    }

    #[test]
    fn digit_run_extraction_takes_first_fourteen() {
        assert_eq!(
            find_digit_run("ACME LTDA:12345678000199").map(|c| c.as_digits().to_string()),
            Some("12345678000199".to_string())
        );
        assert!(find_digit_run("no digits here").is_none());
        assert!(find_digit_run("short 123456").is_none());
        // A 16-digit run still yields its first 14 digits — the known
        // heuristic limitation.
        assert_eq!(
            find_digit_run("id 1234567800019912").map(|c| c.as_digits().to_string()),
            Some("12345678000199".to_string())
        );
    }

    #[test]
    fn recognized_issuer_matching_is_case_insensitive() {
        assert!(is_recognized_issuer("O=Icp-Brasil, CN=AC Something"));
        assert!(is_recognized_issuer("O=AC SOLUTI Multipla v5"));
        assert!(!is_recognized_issuer("O=Self Signed Co"));
    }
}
