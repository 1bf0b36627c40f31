//! use pembundle::error::PemBundleError;

use thiserror::Error;

use crate::pem::ChunkKind;

/// Represents errors that can occur while reading PEM input into identity bundles.
///
/// Every variant except [`PemBundleError::NoDomainNames`] means the input stream
/// could not be turned into a bundle at all and nothing derived from it should be written.
#[derive(Debug, Error)]
pub enum PemBundleError {
    /// A non-blank line outside of any chunk was not a recognized begin marker.
    #[error("Invalid chunk header in input: {line:?}")]
    InvalidChunkHeader { line: String },

    /// The stream ended before the end marker of the open chunk.
    #[error("Final {kind} chunk not closed")]
    UnterminatedChunk { kind: ChunkKind },

    /// Base64 or DER decoding of a certificate failed.
    #[error("Malformed certificate: {0}")]
    MalformedCertificate(String),

    /// Base64 or DER decoding of a private key failed, or the key is not RSA.
    #[error("Malformed private key: {0}")]
    MalformedKey(String),

    /// More than one private key in a single PEM stream.
    #[error("More than one private key in PEM input")]
    DuplicatePrivateKey,

    /// The PKCS#1 key cannot be described by the fixed two-byte PKCS#8 length fields.
    ///
    /// Raised for keys too long for the fields, and also for keys shorter than 256 bytes,
    /// for which the fixed `0x82` long-form length would not be canonical DER.
    #[error("Unsupported PKCS#1 key length: {0} bytes")]
    UnsupportedKeyLength(usize),

    /// The stream held neither a certificate nor a private key.
    #[error("No certificate or private key found in input")]
    EmptyInput,

    /// The leaf certificate carries no DNSName subject alternative names.
    #[error("No DNSName subject alternative names found")]
    NoDomainNames,

    /// The bundle has no certificate where one is required.
    #[error("No certificate found in input")]
    MissingCertificate,

    /// The bundle has no private key where one is required.
    #[error("No private key found in input")]
    MissingPrivateKey,

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    Encoding(String),

    /// Failure attributed to one certificate directory.
    #[error("Error in {id}: {source}")]
    Directory {
        id: String,
        #[source]
        source: Box<PemBundleError>,
    },

    /// Error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PemBundleError {
    /// Attaches the identity (directory name) the error occurred in.
    pub fn in_directory(self, id: impl Into<String>) -> Self {
        PemBundleError::Directory {
            id: id.into(),
            source: Box::new(self),
        }
    }
}

impl From<rsa::pkcs8::Error> for PemBundleError {
    fn from(err: rsa::pkcs8::Error) -> Self {
        PemBundleError::MalformedKey(err.to_string())
    }
}

impl From<serde_json::Error> for PemBundleError {
    fn from(err: serde_json::Error) -> Self {
        PemBundleError::Encoding(err.to_string())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PemBundleError>;
