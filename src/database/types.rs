//! Well-known signature type identifiers from the UEFI specification.
//!
//! Every signature list carries a 128-bit GUID that classifies its entries -
//! raw digests, certificate digests, or full X.509 certificates. This module
//! defines the GUID constants (UEFI 2.10, section 32.4.1) and the
//! [`SignatureKind`] enum for ergonomic classification.
//!
//! Only [`EFI_CERT_X509`] influences decoding behavior (it enables the
//! advisory DER length cross-check); the remaining constants exist for
//! consumers that want to dispatch on list type without carrying their own
//! GUID tables.

use uguid::{guid, Guid};

/// SHA-1 digest entries (`EFI_CERT_SHA1_GUID`).
pub const EFI_CERT_SHA1: Guid = guid!("826ca512-cf10-4ac9-b187-be01496631bd");

/// SHA-224 digest entries (`EFI_CERT_SHA224_GUID`).
pub const EFI_CERT_SHA224: Guid = guid!("0b6e5233-a65c-44c9-9407-d9ab83bfc8bd");

/// SHA-256 digest entries (`EFI_CERT_SHA256_GUID`).
pub const EFI_CERT_SHA256: Guid = guid!("c1c41626-504c-4092-aca9-41f936934328");

/// SHA-384 digest entries (`EFI_CERT_SHA384_GUID`).
pub const EFI_CERT_SHA384: Guid = guid!("ff3e5307-9fd0-48c9-85f1-8ad56c701e01");

/// SHA-512 digest entries (`EFI_CERT_SHA512_GUID`).
pub const EFI_CERT_SHA512: Guid = guid!("093e0fae-a6c4-4f50-9f1b-d41e2b89c19a");

/// Raw RSA-2048 modulus entries (`EFI_CERT_RSA2048_GUID`).
pub const EFI_CERT_RSA2048: Guid = guid!("3c5766e8-269c-4e34-aa14-ed776e85b3b6");

/// RSA-2048 signatures of SHA-256 digests (`EFI_CERT_RSA2048_SHA256_GUID`).
pub const EFI_CERT_RSA2048_SHA256: Guid = guid!("e2b36190-879b-4a3d-ad8d-f2e7bba32784");

/// DER-encoded X.509 certificate entries (`EFI_CERT_X509_GUID`).
///
/// Lists of this type get their payloads cross-checked against the DER
/// SEQUENCE length during entry iteration.
pub const EFI_CERT_X509: Guid = guid!("a5c059a1-94e4-4aa7-87b5-ab155c2bf072");

/// SHA-256 digests of X.509 certificates with revocation time
/// (`EFI_CERT_X509_SHA256_GUID`).
pub const EFI_CERT_X509_SHA256: Guid = guid!("3bd2a492-96c0-4079-b420-fcf98ef103ed");

/// SHA-384 digests of X.509 certificates with revocation time
/// (`EFI_CERT_X509_SHA384_GUID`).
pub const EFI_CERT_X509_SHA384: Guid = guid!("7076876e-80c2-4ee6-aad2-28b349a6865b");

/// SHA-512 digests of X.509 certificates with revocation time
/// (`EFI_CERT_X509_SHA512_GUID`).
pub const EFI_CERT_X509_SHA512: Guid = guid!("446dbf63-2502-4cda-bcfa-2465d2b0fe9d");

/// Classification of a signature list's entry payloads.
///
/// Covers the signature types the UEFI specification defines for the Secure
/// Boot databases. Unknown GUIDs are legal in the container format; they
/// simply classify as `None` in [`SignatureKind::from_guid`] and iterate
/// like any other list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SignatureKind {
    /// SHA-1 digest
    Sha1,
    /// SHA-224 digest
    Sha224,
    /// SHA-256 digest
    Sha256,
    /// SHA-384 digest
    Sha384,
    /// SHA-512 digest
    Sha512,
    /// Raw RSA-2048 modulus
    Rsa2048,
    /// RSA-2048 signature of a SHA-256 digest
    Rsa2048Sha256,
    /// DER-encoded X.509 certificate
    X509,
    /// SHA-256 certificate digest with revocation time
    X509Sha256,
    /// SHA-384 certificate digest with revocation time
    X509Sha384,
    /// SHA-512 certificate digest with revocation time
    X509Sha512,
}

impl SignatureKind {
    /// Classify a signature type GUID.
    ///
    /// Returns `None` for GUIDs the UEFI specification does not define;
    /// such lists are still structurally valid and iterable.
    #[must_use]
    pub fn from_guid(guid: &Guid) -> Option<SignatureKind> {
        match *guid {
            g if g == EFI_CERT_SHA1 => Some(SignatureKind::Sha1),
            g if g == EFI_CERT_SHA224 => Some(SignatureKind::Sha224),
            g if g == EFI_CERT_SHA256 => Some(SignatureKind::Sha256),
            g if g == EFI_CERT_SHA384 => Some(SignatureKind::Sha384),
            g if g == EFI_CERT_SHA512 => Some(SignatureKind::Sha512),
            g if g == EFI_CERT_RSA2048 => Some(SignatureKind::Rsa2048),
            g if g == EFI_CERT_RSA2048_SHA256 => Some(SignatureKind::Rsa2048Sha256),
            g if g == EFI_CERT_X509 => Some(SignatureKind::X509),
            g if g == EFI_CERT_X509_SHA256 => Some(SignatureKind::X509Sha256),
            g if g == EFI_CERT_X509_SHA384 => Some(SignatureKind::X509Sha384),
            g if g == EFI_CERT_X509_SHA512 => Some(SignatureKind::X509Sha512),
            _ => None,
        }
    }

    /// The GUID that tags lists of this kind.
    #[must_use]
    pub fn guid(&self) -> Guid {
        match self {
            SignatureKind::Sha1 => EFI_CERT_SHA1,
            SignatureKind::Sha224 => EFI_CERT_SHA224,
            SignatureKind::Sha256 => EFI_CERT_SHA256,
            SignatureKind::Sha384 => EFI_CERT_SHA384,
            SignatureKind::Sha512 => EFI_CERT_SHA512,
            SignatureKind::Rsa2048 => EFI_CERT_RSA2048,
            SignatureKind::Rsa2048Sha256 => EFI_CERT_RSA2048_SHA256,
            SignatureKind::X509 => EFI_CERT_X509,
            SignatureKind::X509Sha256 => EFI_CERT_X509_SHA256,
            SignatureKind::X509Sha384 => EFI_CERT_X509_SHA384,
            SignatureKind::X509Sha512 => EFI_CERT_X509_SHA512,
        }
    }

    /// Payload size the UEFI specification fixes for this kind, if any.
    ///
    /// X.509 certificate payloads are variable-sized and return `None`.
    /// The certificate digest kinds include a 16-byte revocation timestamp.
    #[must_use]
    pub fn payload_size(&self) -> Option<usize> {
        match self {
            SignatureKind::Sha1 => Some(20),
            SignatureKind::Sha224 => Some(28),
            SignatureKind::Sha256 => Some(32),
            SignatureKind::Sha384 => Some(48),
            SignatureKind::Sha512 => Some(64),
            SignatureKind::Rsa2048 | SignatureKind::Rsa2048Sha256 => Some(256),
            SignatureKind::X509 => None,
            SignatureKind::X509Sha256 => Some(32 + 16),
            SignatureKind::X509Sha384 => Some(48 + 16),
            SignatureKind::X509Sha512 => Some(64 + 16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_roundtrip() {
        for kind in [
            SignatureKind::Sha1,
            SignatureKind::Sha256,
            SignatureKind::Rsa2048,
            SignatureKind::X509,
            SignatureKind::X509Sha512,
        ] {
            assert_eq!(SignatureKind::from_guid(&kind.guid()), Some(kind));
        }
    }

    #[test]
    fn unknown_guid_is_unclassified() {
        let unknown = uguid::guid!("00112233-4455-6677-8899-aabbccddeeff");
        assert_eq!(SignatureKind::from_guid(&unknown), None);
    }

    #[test]
    fn digest_payload_sizes() {
        assert_eq!(SignatureKind::Sha256.payload_size(), Some(32));
        assert_eq!(SignatureKind::X509Sha256.payload_size(), Some(48));
        assert_eq!(SignatureKind::X509.payload_size(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(SignatureKind::Sha256.to_string(), "Sha256");
        assert_eq!(SignatureKind::X509.to_string(), "X509");
    }
}
