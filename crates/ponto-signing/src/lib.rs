#![deny(missing_docs)]

//! # ponto-signing — Detached Signature Production
//!
//! Produces a CMS/PKCS#7 detached signature over the exact bytes of a
//! generated compliance file: the signature structure carries no copy of
//! the signed content, and verification requires the original payload.
//!
//! The persisted `.p7s` artifact is the minimal binary (DER) structure.
//! [`raw_signature`] normalizes whatever a signing backend hands back —
//! DER already, or a PEM/base64 envelope — by stripping the armor and
//! decoding the inner payload.
//!
//! Signing failures never fail file generation: the engine logs them and
//! the employer keeps a valid unsigned file.

use openssl::base64;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::stack::Stack;
use openssl::x509::X509;
use ponto_certs::OpenedBundle;
use thiserror::Error;

/// Errors from signature production.
#[derive(Error, Debug)]
pub enum SigningError {
    /// OpenSSL failed to build the signature structure.
    #[error("signature production failed: {0}")]
    Backend(String),

    /// The signature output was neither DER nor a PEM envelope.
    #[error("signature output is neither DER nor PEM: {0}")]
    MalformedOutput(String),
}

impl From<openssl::error::ErrorStack> for SigningError {
    fn from(stack: openssl::error::ErrorStack) -> Self {
        SigningError::Backend(stack.to_string())
    }
}

/// Produce a detached binary PKCS#7 signature over `content`.
///
/// `DETACHED` keeps the content out of the structure; `BINARY` disables
/// the SMIME canonicalization that would rewrite the CRLF payload.
pub fn sign_detached(content: &[u8], bundle: &OpenedBundle) -> Result<Vec<u8>, SigningError> {
    let chain = match &bundle.chain {
        Some(chain) => clone_stack(chain)?,
        None => Stack::new()?,
    };
    let pkcs7 = Pkcs7::sign(
        &bundle.certificate,
        &bundle.private_key,
        &chain,
        content,
        Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY,
    )?;
    raw_signature(&pkcs7.to_der()?)
}

/// Normalize a signature blob to its raw DER form.
///
/// Accepts DER (returned as-is) or a PEM envelope (`-----BEGIN PKCS7-----`
/// armor is stripped and the base64 body decoded), so the stored artifact
/// is always the minimal binary structure regardless of which backend
/// produced it.
pub fn raw_signature(blob: &[u8]) -> Result<Vec<u8>, SigningError> {
    // DER SEQUENCE tag: already raw.
    if blob.first() == Some(&0x30) {
        return Ok(blob.to_vec());
    }

    let text = std::str::from_utf8(blob)
        .map_err(|_| SigningError::MalformedOutput("binary but not DER".into()))?;
    let body: String = text
        .lines()
        .filter(|line| !line.starts_with("-----") && !line.trim().is_empty())
        .collect();
    let der = base64::decode_block(&body)
        .map_err(|_| SigningError::MalformedOutput("base64 body did not decode".into()))?;
    if der.first() != Some(&0x30) {
        return Err(SigningError::MalformedOutput(
            "decoded payload is not a DER structure".into(),
        ));
    }
    Ok(der)
}

fn clone_stack(chain: &Stack<X509>) -> Result<Stack<X509>, SigningError> {
    let mut cloned = Stack::new()?;
    for cert in chain.iter() {
        cloned.push(cert.to_owned())?;
    }
    Ok(cloned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::asn1::Asn1Time;
    use openssl::bn::{BigNum, MsbOption};
    use openssl::hash::MessageDigest;
    use openssl::nid::Nid;
    use openssl::pkey::PKey;
    use openssl::rsa::Rsa;
    use openssl::x509::store::X509StoreBuilder;
    use openssl::x509::{X509Builder, X509NameBuilder};

    fn bundle() -> OpenedBundle {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_nid(Nid::ORGANIZATIONNAME, "ICP-Brasil")
            .unwrap();
        name.append_entry_by_nid(Nid::COMMONNAME, "ACME:12345678000199")
            .unwrap();
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
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(365).unwrap())
            .unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        let certificate = builder.build();

        OpenedBundle {
            serial_number: "01".into(),
            issuer_dn: "O=ICP-Brasil".into(),
            certificate,
            private_key: pkey,
            chain: None,
        }
    }

    #[test]
    fn detached_signature_is_der_and_verifies_against_content() {
        let bundle = bundle();
        let content: &[u8] = b"000000001\t1\tpayload\r\n";
        let signature = sign_detached(content, &bundle).unwrap();

        // Raw DER, no PEM armor.
        assert_eq!(signature[0], 0x30);

        let pkcs7 = Pkcs7::from_der(&signature).unwrap();
        let mut signers = Stack::new().unwrap();
        signers.push(bundle.certificate.clone()).unwrap();
        let store = X509StoreBuilder::new().unwrap().build();
        pkcs7
            .verify(
                &signers,
                &store,
                Some(content),
                None,
                Pkcs7Flags::NOVERIFY | Pkcs7Flags::BINARY,
            )
            .unwrap();
    }

    #[test]
    fn detached_signature_rejects_altered_content() {
        let bundle = bundle();
        let signature = sign_detached(b"original content", &bundle).unwrap();
        let pkcs7 = Pkcs7::from_der(&signature).unwrap();
        let mut signers = Stack::new().unwrap();
        signers.push(bundle.certificate.clone()).unwrap();
        let store = X509StoreBuilder::new().unwrap().build();
        let tampered: &[u8] = b"tampered content";
        assert!(pkcs7
            .verify(
                &signers,
                &store,
                Some(tampered),
                None,
                Pkcs7Flags::NOVERIFY | Pkcs7Flags::BINARY,
            )
            .is_err());
    }

    #[test]
    fn raw_signature_strips_pem_envelope() {
        let bundle = bundle();
        let content = b"payload";
        let pkcs7 = Pkcs7::sign(
            &bundle.certificate,
            &bundle.private_key,
            &Stack::new().unwrap(),
            content,
            Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY,
        )
        .unwrap();

        let der = pkcs7.to_der().unwrap();
        let pem = pkcs7.to_pem().unwrap();
        assert_eq!(raw_signature(&pem).unwrap(), der);
        assert_eq!(raw_signature(&der).unwrap(), der);
    }

    #[test]
    fn raw_signature_rejects_garbage() {
        assert!(raw_signature(b"not a signature at all").is_err());
        assert!(raw_signature(&[0xff, 0x00, 0x12]).is_err());
    }
}
