//! # pembundle - PEM certificate chains and RSA keys as identity bundles
//!
//! pembundle reads concatenated PEM input (typically a `fullchain.pem` followed by a
//! `privkey.pem`) and builds one validated [`IdentityBundle`](bundle::IdentityBundle) per
//! stream: the certificate chain in encounter order, a single RSA private key normalized to
//! PKCS#8 DER, and the DNS names the leaf certificate is valid for. Bundles are handed to a
//! [`KeystoreWriter`](keystore::KeystoreWriter) for serialization into a keystore container.
//!
//! ## Supported PEM Blocks
//!
//! - **`CERTIFICATE`**: X.509 certificates, decoded with `x509-cert`
//! - **`PRIVATE KEY`**: PKCS#8 RSA private keys, used as-is
//! - **`RSA PRIVATE KEY`**: PKCS#1 RSA private keys, re-wrapped as PKCS#8
//!
//! Trust chains and validity periods are not checked.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pembundle::{bundle::IdentityBundle, source::ConcatSource};
//!
//! # fn main() -> Result<(), pembundle::error::PemBundleError> {
//! let source = ConcatSource::from_files([
//!     "/etc/letsencrypt/live/example.com/fullchain.pem",
//!     "/etc/letsencrypt/live/example.com/privkey.pem",
//! ])?;
//! let bundle = IdentityBundle::from_reader(source.into_reader())?;
//! bundle.require_complete()?;
//!
//! for domain in bundle.domains()?.iter() {
//!     println!("{domain}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Converting a Directory of Certificates
//!
//! ```rust,no_run
//! use pembundle::{config::ConverterConfig, convert::Converter, keystore::PemKeystoreWriter};
//!
//! # fn main() -> Result<(), pembundle::error::PemBundleError> {
//! let config = ConverterConfig::builder()
//!     .input_path("/etc/letsencrypt/live")
//!     .output_path("/var/lib/stores")
//!     .build();
//!
//! let mut converter = Converter::new(config);
//! converter.read_certificates()?;
//! converter.write_keystores(&PemKeystoreWriter)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use pembundle::{bundle::IdentityBundle, error::PemBundleError};
//!
//! match IdentityBundle::from_reader(&b"not pem\n"[..]) {
//!     Ok(_) => println!("parsed"),
//!     Err(PemBundleError::InvalidChunkHeader { line }) => println!("bad line: {line}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`pem`]: Line-oriented PEM tokenizer
//! - [`key`]: PKCS#1 to PKCS#8 normalization and the private key type
//! - [`cert`]: Certificate decoding and extensions
//! - [`bundle`]: Aggregation of chunks into an identity bundle
//! - [`domains`]: DNS name extraction from the leaf certificate
//! - [`source`]: Concatenation of several input files
//! - [`keystore`]: Keystore serializer interface
//! - [`convert`]: Directory conversion and the domain map
//! - [`config`]: Converter settings
//! - [`error`]: Error types

pub mod bundle;
pub mod cert;
pub mod config;
pub mod convert;
pub mod domains;
pub mod error;
pub mod key;
pub mod keystore;
pub mod pem;
pub mod source;
