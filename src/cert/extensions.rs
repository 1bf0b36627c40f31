use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{Decode, oid::ObjectIdentifier};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::{PemBundleError, Result};

/// Trait for decoding X.509 extension values.
///
/// # Example
/// ```
/// use der::{Encode, asn1::Ia5String};
/// use x509_cert::ext::pkix::name::GeneralName;
/// use pembundle::cert::extensions::{AltName, FromX509Extension, SubjectAltName};
///
/// let encoded = x509_cert::ext::pkix::SubjectAltName(vec![GeneralName::DnsName(
///     Ia5String::new("example.com").unwrap(),
/// )])
/// .to_der()
/// .unwrap();
/// let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(decoded.names, vec![AltName::Dns("example.com".to_string())]);
/// ```
pub trait FromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// One entry of a Subject Alternative Name extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltName {
    /// `dNSName`
    Dns(String),
    /// `rfc822Name`
    Email(String),
    /// `uniformResourceIdentifier`
    Uri(String),
    /// `iPAddress`
    Ip(IpAddr),
    /// Any other form, kept undecoded.
    Other(GeneralName),
}

impl AltName {
    /// The DNS name, if this entry is a `dNSName`.
    pub fn as_dns(&self) -> Option<&str> {
        match self {
            AltName::Dns(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&GeneralName> for AltName {
    fn from(name: &GeneralName) -> Self {
        match name {
            GeneralName::DnsName(dns) => AltName::Dns(dns.to_string()),
            GeneralName::Rfc822Name(email) => AltName::Email(email.to_string()),
            GeneralName::UniformResourceIdentifier(uri) => AltName::Uri(uri.to_string()),
            GeneralName::IpAddress(octets) => match ip_from_octets(octets.as_bytes()) {
                Some(ip) => AltName::Ip(ip),
                None => AltName::Other(name.clone()),
            },
            other => AltName::Other(other.clone()),
        }
    }
}

fn ip_from_octets(octets: &[u8]) -> Option<IpAddr> {
    match octets.len() {
        4 => <[u8; 4]>::try_from(octets).ok().map(IpAddr::from),
        16 => <[u8; 16]>::try_from(octets).ok().map(IpAddr::from),
        _ => None,
    }
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// This extension specifies additional identities for the subject of the certificate.
///
/// # Fields
/// * `names` - The entries in encounter order.
#[derive(Debug, Clone, Default)]
pub struct SubjectAltName {
    pub names: Vec<AltName>,
}

impl SubjectAltName {
    /// The `dNSName` entries, in encounter order.
    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(AltName::as_dns)
    }
}

impl FromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)
            .map_err(|e| PemBundleError::MalformedCertificate(e.to_string()))?;
        Ok(Self {
            names: san.0.iter().map(AltName::from).collect(),
        })
    }
}
