pub mod extensions;

use der::{Decode, Encode, EncodePem};
use extensions::{SubjectAltName, FromX509Extension};
use x509_cert::certificate::CertificateInner;

use crate::error::{PemBundleError, Result};
use crate::pem::{Chunk, ChunkKind};

/// Represents a decoded X.509 certificate.
///
/// This struct provides methods to decode the certificate from PEM chunks or DER,
/// and to encode it back into DER or PEM formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Decodes a DER-encoded certificate.
    ///
    /// # Errors
    /// [`PemBundleError::MalformedCertificate`] if the bytes are not a single X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| PemBundleError::MalformedCertificate(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Decodes the base64 payload of a `CERTIFICATE` chunk.
    pub fn from_chunk(chunk: &Chunk) -> Result<Self> {
        if chunk.kind() != ChunkKind::Certificate {
            return Err(PemBundleError::MalformedCertificate(format!(
                "expected a CERTIFICATE chunk, found {}",
                chunk.kind()
            )));
        }
        let der = chunk
            .decode()
            .map_err(|e| PemBundleError::MalformedCertificate(e.to_string()))?;
        Self::from_der(&der)
    }

    /// Encodes the certificate into DER format.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded certificate.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| PemBundleError::Encoding(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    ///
    /// # Returns
    /// A string containing the PEM-encoded certificate.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| PemBundleError::Encoding(e.to_string()))
    }

    /// The subject distinguished name in RFC 4514 string form.
    pub fn subject(&self) -> String {
        self.inner.tbs_certificate.subject.to_string()
    }

    /// Decodes the Subject Alternative Name extension, if the certificate has one.
    pub fn subject_alt_name(&self) -> Result<Option<SubjectAltName>> {
        self.extension::<SubjectAltName>()
    }

    /// Finds and decodes the first extension with `T`'s OID.
    pub fn extension<T: FromX509Extension>(&self) -> Result<Option<T>> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == T::OID)
            .map(|ext| T::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }
}
