//! RSA private keys and the PKCS#1 to PKCS#8 normalizer.

use std::fmt;

use log::trace;
use rsa::RsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;

use crate::error::{PemBundleError, Result};

/// Fixed PKCS#8 envelope for an RSA key:
///
/// ```text
/// 30 82 LL LL          SEQUENCE, two-byte length        (patched at offset 2)
///    02 01 00          INTEGER 0 (version)
///    30 0d             SEQUENCE (AlgorithmIdentifier)
///       06 09 2a 86 48 86 f7 0d 01 01 01   OID rsaEncryption
///       05 00          NULL
///    04 82 LL LL       OCTET STRING, two-byte length    (patched at offset 24)
/// ```
const PKCS8_RSA_PREFIX: [u8; 26] = [
    0x30, 0x82, 0x00, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
    0x0d, 0x01, 0x01, 0x01, 0x05, 0x00, 0x04, 0x82, 0x00, 0x00,
];

/// Length of the PKCS#8 envelope prepended to a PKCS#1 key.
pub const PKCS8_PREFIX_LEN: usize = PKCS8_RSA_PREFIX.len();

const OUTER_LENGTH_OFFSET: usize = 2;
const INNER_LENGTH_OFFSET: usize = 24;

/// Bytes of the outer SEQUENCE not counted by its own length field (tag, 0x82, two length bytes).
const OUTER_HEADER_LEN: usize = 4;

/// Smallest PKCS#1 key the envelope can describe. The `0x82` long form is only canonical
/// DER for lengths of 256 and above.
pub const MIN_PKCS1_LEN: usize = 0x100;

/// Largest PKCS#1 key the envelope can describe without overflowing the outer length field.
pub const MAX_PKCS1_LEN: usize = 0xffff - (PKCS8_PREFIX_LEN - OUTER_HEADER_LEN);

/// Re-wraps a DER-encoded PKCS#1 `RSAPrivateKey` as a PKCS#8 `PrivateKeyInfo`.
///
/// The key material is copied unchanged after a 26-byte envelope whose two length fields are
/// patched for `pkcs1`. Keys outside [`MIN_PKCS1_LEN`]`..=`[`MAX_PKCS1_LEN`] are rejected with
/// [`PemBundleError::UnsupportedKeyLength`].
///
/// ```
/// use pembundle::key::{pkcs1_to_pkcs8, PKCS8_PREFIX_LEN};
///
/// let pkcs1 = vec![0u8; 1190];
/// let pkcs8 = pkcs1_to_pkcs8(&pkcs1).unwrap();
/// assert_eq!(pkcs8.len(), 1190 + PKCS8_PREFIX_LEN);
/// assert_eq!(&pkcs8[2..4], &[0x04, 0xbc]);
/// assert_eq!(&pkcs8[24..26], &[0x04, 0xa6]);
/// ```
pub fn pkcs1_to_pkcs8(pkcs1: &[u8]) -> Result<Vec<u8>> {
    let inner_len = pkcs1.len();
    if !(MIN_PKCS1_LEN..=MAX_PKCS1_LEN).contains(&inner_len) {
        return Err(PemBundleError::UnsupportedKeyLength(inner_len));
    }
    let total_len = inner_len + PKCS8_PREFIX_LEN;
    let outer = u16::try_from(total_len - OUTER_HEADER_LEN)
        .map_err(|_| PemBundleError::UnsupportedKeyLength(inner_len))?;
    let inner =
        u16::try_from(inner_len).map_err(|_| PemBundleError::UnsupportedKeyLength(inner_len))?;

    let mut prefix = PKCS8_RSA_PREFIX;
    prefix[OUTER_LENGTH_OFFSET..OUTER_LENGTH_OFFSET + 2].copy_from_slice(&outer.to_be_bytes());
    prefix[INNER_LENGTH_OFFSET..INNER_LENGTH_OFFSET + 2].copy_from_slice(&inner.to_be_bytes());

    let mut pkcs8 = Vec::with_capacity(total_len);
    pkcs8.extend_from_slice(&prefix);
    pkcs8.extend_from_slice(pkcs1);
    Ok(pkcs8)
}

/// An RSA private key held as PKCS#8 DER.
///
/// Construction parses the bytes, so every `PrivateKey` is a loadable RSA key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    der: Vec<u8>,
}

impl PrivateKey {
    /// Accepts PKCS#8 DER as-is after checking it holds an RSA key.
    pub fn from_pkcs8_der(der: Vec<u8>) -> Result<Self> {
        RsaPrivateKey::from_pkcs8_der(&der)?;
        Ok(Self { der })
    }

    /// Normalizes PKCS#1 DER to PKCS#8 and validates the result.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        trace!("normalizing {} byte PKCS#1 key", der.len());
        Self::from_pkcs8_der(pkcs1_to_pkcs8(der)?)
    }

    /// The PKCS#8 DER encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.der
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.der
    }

    /// Parses the key into an [`RsaPrivateKey`].
    pub fn to_rsa(&self) -> Result<RsaPrivateKey> {
        Ok(RsaPrivateKey::from_pkcs8_der(&self.der)?)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("len", &self.der.len())
            .finish_non_exhaustive()
    }
}

/// Holds at most one private key.
#[derive(Debug, Clone, Default)]
pub enum KeySlot {
    #[default]
    Empty,
    Filled(PrivateKey),
}

impl KeySlot {
    /// Stores `key`, failing with [`PemBundleError::DuplicatePrivateKey`] if a key is already held.
    pub fn fill(&mut self, key: PrivateKey) -> Result<()> {
        match self {
            KeySlot::Empty => {
                *self = KeySlot::Filled(key);
                Ok(())
            }
            KeySlot::Filled(_) => Err(PemBundleError::DuplicatePrivateKey),
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, KeySlot::Filled(_))
    }

    pub fn as_key(&self) -> Option<&PrivateKey> {
        match self {
            KeySlot::Empty => None,
            KeySlot::Filled(key) => Some(key),
        }
    }

    pub fn into_key(self) -> Option<PrivateKey> {
        match self {
            KeySlot::Empty => None,
            KeySlot::Filled(key) => Some(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pem::read_all;
    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::pkcs8::EncodePrivateKey;

    fn pem_der(pem: &str) -> Vec<u8> {
        read_all(pem.as_bytes()).unwrap()[0].decode().unwrap()
    }

    #[test]
    fn test_prefix_matches_reference_header() {
        // MIIEvAIBADANBgkqhkiG9w0BAQEFAASCBKY= is the usual envelope for a 2048-bit key
        let pkcs8 = pkcs1_to_pkcs8(&[0u8; 0x4a6]).unwrap();
        assert_eq!(
            &pkcs8[..PKCS8_PREFIX_LEN],
            &[
                0x30, 0x82, 0x04, 0xbc, 0x02, 0x01, 0x00, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48,
                0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00, 0x04, 0x82, 0x04, 0xa6
            ]
        );
    }

    #[test]
    fn test_length_fields() {
        for len in [MIN_PKCS1_LEN, 608, 1190, 1191, 2349, MAX_PKCS1_LEN] {
            let pkcs1: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let pkcs8 = pkcs1_to_pkcs8(&pkcs1).unwrap();
            assert_eq!(pkcs8.len(), len + 26);
            assert_eq!(&pkcs8[2..4], &((len + 26 - 4) as u16).to_be_bytes());
            assert_eq!(&pkcs8[24..26], &(len as u16).to_be_bytes());
            assert_eq!(&pkcs8[26..], &pkcs1[..]);
        }
    }

    #[test]
    fn test_unsupported_lengths() {
        for len in [0, 1, MIN_PKCS1_LEN - 1, MAX_PKCS1_LEN + 1, 0x10000] {
            let err = pkcs1_to_pkcs8(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, PemBundleError::UnsupportedKeyLength(l) if l == len));
        }
    }

    #[test]
    fn test_normalized_fixture_matches_pkcs8_fixture() {
        let pkcs1 = pem_der(include_str!("../tests/data/leaf_key_pkcs1.pem"));
        let pkcs8 = pem_der(include_str!("../tests/data/leaf_key_pkcs8.pem"));
        assert_eq!(pkcs1_to_pkcs8(&pkcs1).unwrap(), pkcs8);
    }

    #[test]
    fn test_normalized_generated_key_matches_rsa_encoding() {
        let key = RsaPrivateKey::new(&mut rand_core::OsRng, 1024).unwrap();
        let pkcs1 = key.to_pkcs1_der().unwrap();
        let pkcs8 = key.to_pkcs8_der().unwrap();
        assert_eq!(
            pkcs1_to_pkcs8(pkcs1.as_bytes()).unwrap(),
            pkcs8.as_bytes().to_vec()
        );

        let normalized = PrivateKey::from_pkcs1_der(pkcs1.as_bytes()).unwrap();
        assert_eq!(normalized.to_rsa().unwrap(), key);
    }

    #[test]
    fn test_private_key_rejects_garbage() {
        let err = PrivateKey::from_pkcs8_der(vec![0x30, 0x03, 0x02, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, PemBundleError::MalformedKey(_)));

        let err = PrivateKey::from_pkcs1_der(&[0u8; 300]).unwrap_err();
        assert!(matches!(err, PemBundleError::MalformedKey(_)));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let pkcs8 = pem_der(include_str!("../tests/data/leaf_key_pkcs8.pem"));
        let key = PrivateKey::from_pkcs8_der(pkcs8).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.starts_with("PrivateKey { len: "));
    }

    #[test]
    fn test_key_slot_fills_once() {
        let pkcs8 = pem_der(include_str!("../tests/data/leaf_key_pkcs8.pem"));
        let key = PrivateKey::from_pkcs8_der(pkcs8).unwrap();

        let mut slot = KeySlot::default();
        assert!(!slot.is_filled());
        slot.fill(key.clone()).unwrap();
        assert!(slot.is_filled());
        assert!(matches!(
            slot.fill(key.clone()),
            Err(PemBundleError::DuplicatePrivateKey)
        ));
        assert_eq!(slot.into_key(), Some(key));
    }
}
