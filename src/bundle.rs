//! Aggregation of PEM chunks into one certificate chain + private key.

use std::io::BufRead;

use log::debug;
use time::OffsetDateTime;

use crate::cert::Certificate;
use crate::domains::DomainSet;
use crate::error::{PemBundleError, Result};
use crate::key::{KeySlot, PrivateKey};
use crate::pem::{Chunk, ChunkKind, Tokenizer};

/// A certificate chain and private key read from one PEM stream.
///
/// The chain keeps encounter order, so the first certificate in the stream is the leaf.
/// Whether a key or a certificate is required is up to the caller; see
/// [`IdentityBundle::require_complete`].
#[derive(Debug, Clone)]
pub struct IdentityBundle {
    creation_time: OffsetDateTime,
    private_key: KeySlot,
    certificate_chain: Vec<Certificate>,
}

impl IdentityBundle {
    /// Tokenizes and aggregates `reader`, stamping the bundle with the current time.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        Self::from_reader_at(reader, OffsetDateTime::now_utc())
    }

    /// Tokenizes and aggregates `reader` with an explicit creation time, e.g. a file's mtime.
    pub fn from_reader_at(reader: impl BufRead, creation_time: OffsetDateTime) -> Result<Self> {
        Self::from_chunks(Tokenizer::new(reader), creation_time)
    }

    /// Builds a bundle from a chunk sequence, stopping at the first error.
    ///
    /// # Errors
    /// Tokenizer errors are passed through. Undecodable certificates give
    /// [`PemBundleError::MalformedCertificate`], undecodable keys
    /// [`PemBundleError::MalformedKey`], and a second key [`PemBundleError::DuplicatePrivateKey`].
    /// A stream with neither a certificate nor a key gives [`PemBundleError::EmptyInput`].
    pub fn from_chunks<I>(chunks: I, creation_time: OffsetDateTime) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Chunk>>,
    {
        let mut bundle = Self {
            creation_time,
            private_key: KeySlot::Empty,
            certificate_chain: Vec::new(),
        };
        for chunk in chunks {
            bundle.add_chunk(&chunk?)?;
        }
        if !bundle.has_key() && !bundle.has_certificate() {
            return Err(PemBundleError::EmptyInput);
        }
        debug!(
            "aggregated {} certificate(s), key present: {}",
            bundle.certificate_chain.len(),
            bundle.has_key()
        );
        Ok(bundle)
    }

    fn add_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        match chunk.kind() {
            ChunkKind::Certificate => {
                self.certificate_chain.push(Certificate::from_chunk(chunk)?);
            }
            kind @ (ChunkKind::Pkcs8Key | ChunkKind::Pkcs1Key) => {
                if self.private_key.is_filled() {
                    return Err(PemBundleError::DuplicatePrivateKey);
                }
                let der = chunk
                    .decode()
                    .map_err(|e| PemBundleError::MalformedKey(e.to_string()))?;
                let key = if kind == ChunkKind::Pkcs1Key {
                    PrivateKey::from_pkcs1_der(&der)?
                } else {
                    PrivateKey::from_pkcs8_der(der)?
                };
                self.private_key.fill(key)?;
            }
        }
        Ok(())
    }

    /// Creation date is unknown in PEM input, so this is the time the bundle was read.
    pub fn creation_time(&self) -> OffsetDateTime {
        self.creation_time
    }

    /// The PKCS#8 private key, if the input had one.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_key()
    }

    /// The certificate chain, leaf first.
    pub fn certificate_chain(&self) -> &[Certificate] {
        &self.certificate_chain
    }

    /// The leaf certificate, if the input had any certificate.
    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate_chain.first()
    }

    pub fn has_key(&self) -> bool {
        self.private_key.is_filled()
    }

    pub fn has_certificate(&self) -> bool {
        !self.certificate_chain.is_empty()
    }

    /// Whether `other` is this bundle's leaf certificate.
    pub fn matches_certificate(&self, other: &Certificate) -> bool {
        self.certificate() == Some(other)
    }

    /// Checks the bundle has both a private key and at least one certificate.
    pub fn require_complete(&self) -> Result<()> {
        if !self.has_key() {
            return Err(PemBundleError::MissingPrivateKey);
        }
        if !self.has_certificate() {
            return Err(PemBundleError::MissingCertificate);
        }
        Ok(())
    }

    /// The DNS names of the leaf certificate.
    pub fn domains(&self) -> Result<DomainSet> {
        DomainSet::from_bundle(self)
    }
}
