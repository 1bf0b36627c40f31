//! DNS names a bundle's leaf certificate is valid for.

use indexmap::IndexSet;

use crate::bundle::IdentityBundle;
use crate::cert::Certificate;
use crate::error::{PemBundleError, Result};

/// Ordered, duplicate-free set of DNS names taken from a certificate's `dNSName` SAN entries.
///
/// Equality compares names in order.
#[derive(Debug, Clone, Default)]
pub struct DomainSet {
    names: IndexSet<String>,
}

impl DomainSet {
    /// Extracts the `dNSName` entries of `cert`'s Subject Alternative Name extension.
    ///
    /// Other SAN entry types are skipped. Returns [`PemBundleError::NoDomainNames`] when
    /// the extension is absent or has no `dNSName` entry.
    pub fn from_certificate(cert: &Certificate) -> Result<Self> {
        let mut set = DomainSet::default();
        if let Some(san) = cert.subject_alt_name()? {
            san.dns_names().for_each(|name| set.insert(name));
        }
        if set.is_empty() {
            return Err(PemBundleError::NoDomainNames);
        }
        Ok(set)
    }

    /// Extracts the domains of the bundle's leaf certificate.
    ///
    /// Fails with [`PemBundleError::MissingCertificate`] if the chain is empty.
    pub fn from_bundle(bundle: &IdentityBundle) -> Result<Self> {
        let leaf = bundle
            .certificate()
            .ok_or(PemBundleError::MissingCertificate)?;
        Self::from_certificate(leaf)
    }

    fn insert(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl PartialEq for DomainSet {
    fn eq(&self, other: &Self) -> bool {
        self.names.iter().eq(other.names.iter())
    }
}

impl Eq for DomainSet {}

impl IntoIterator for DomainSet {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a DomainSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
