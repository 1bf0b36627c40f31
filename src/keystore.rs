//! Hand-off point to keystore serializers.

use time::OffsetDateTime;

use crate::cert::Certificate;
use crate::error::Result;
use crate::key::PrivateKey;

/// Everything a serializer needs to produce one keystore.
#[derive(Debug, Clone, Copy)]
pub struct KeystoreEntry<'a> {
    pub alias: &'a str,
    pub password: &'a str,
    /// Leaf first.
    pub chain: &'a [Certificate],
    pub private_key: &'a PrivateKey,
    pub creation_time: OffsetDateTime,
}

/// Serializes a chain and key into a keystore container.
pub trait KeystoreWriter {
    /// Store type written into the domain map, e.g. `"JKS"` or `"PKCS12"`.
    fn store_type(&self) -> &str;

    /// Extension of the written keystore files, without the dot.
    fn file_extension(&self) -> &str;

    /// Produces the keystore bytes for one entry.
    fn write(&self, entry: &KeystoreEntry<'_>) -> Result<Vec<u8>>;
}

/// Writes the chain followed by the PKCS#8 `PRIVATE KEY` block as plain PEM.
///
/// PEM has no alias or password; both are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PemKeystoreWriter;

impl KeystoreWriter for PemKeystoreWriter {
    fn store_type(&self) -> &str {
        "PEM"
    }

    fn file_extension(&self) -> &str {
        "pem"
    }

    fn write(&self, entry: &KeystoreEntry<'_>) -> Result<Vec<u8>> {
        let mut blocks = entry
            .chain
            .iter()
            .map(|cert| -> Result<pem::Pem> { Ok(pem::Pem::new("CERTIFICATE", cert.to_der()?)) })
            .collect::<Result<Vec<_>>>()?;
        blocks.push(pem::Pem::new(
            "PRIVATE KEY",
            entry.private_key.as_bytes().to_vec(),
        ));

        let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
        Ok(pem::encode_many_config(&blocks, config).into_bytes())
    }
}
