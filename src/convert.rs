//! Directory-level conversion: one identity per certificate directory, one keystore per
//! identity, and a domain map pointing every DNS name at its keystore.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use time::OffsetDateTime;

use crate::bundle::IdentityBundle;
use crate::config::ConverterConfig;
use crate::domains::DomainSet;
use crate::error::{PemBundleError, Result};
use crate::keystore::{KeystoreEntry, KeystoreWriter};
use crate::source::ConcatSource;

/// Reads every certificate directory under the input path and writes keystores plus a domain map.
#[derive(Debug)]
pub struct Converter {
    config: ConverterConfig,
    /// Identity id (directory name) -> bundle.
    identities: BTreeMap<String, IdentityBundle>,
    /// Domain -> identity id, in discovery order.
    domains: IndexMap<String, String>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            identities: BTreeMap::new(),
            domains: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn identities(&self) -> &BTreeMap<String, IdentityBundle> {
        &self.identities
    }

    pub fn domains(&self) -> &IndexMap<String, String> {
        &self.domains
    }

    /// Reads all certificate directories in name order.
    ///
    /// Every directory must yield a key, a certificate and at least one DNS name. The first
    /// failure aborts the whole read, wrapped in [`PemBundleError::Directory`], and leaves the
    /// converter unchanged.
    pub fn read_certificates(&mut self) -> Result<()> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.config.input_path)? {
            // follows symlinks, so linked certificate directories are read too
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut identities = BTreeMap::new();
        let mut domains = IndexMap::new();
        for dir in dirs {
            let id = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Reading {id}");

            let (bundle, names) = self
                .read_identity(&dir)
                .map_err(|e| e.in_directory(&id))?;
            for name in names {
                debug!("-> {name}");
                domains.insert(name, id.clone());
            }
            identities.insert(id, bundle);
        }

        self.identities = identities;
        self.domains = domains;
        Ok(())
    }

    /// Reads one certificate directory: the chain file followed by the key file.
    pub fn read_identity(&self, dir: &Path) -> Result<(IdentityBundle, DomainSet)> {
        let chain_path = dir.join(&self.config.chain_file_name);
        let source = ConcatSource::from_files([&chain_path, &dir.join(&self.config.key_file_name)])?;
        let creation_time = fs::metadata(&chain_path)
            .and_then(|meta| meta.modified())
            .map(OffsetDateTime::from)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());

        let bundle = IdentityBundle::from_reader_at(source.into_reader(), creation_time)?;
        bundle.require_complete()?;
        let domains = bundle.domains()?;
        Ok((bundle, domains))
    }

    /// Path of the keystore written for identity `id`.
    pub fn keystore_path(&self, id: &str, writer: &dyn KeystoreWriter) -> PathBuf {
        self.config
            .output_path
            .join(format!("{id}.{}", writer.file_extension()))
    }

    /// Writes one keystore per identity, then replaces the domain map file.
    ///
    /// The map is written to `<map>.tmp` and renamed into place, so readers never see a
    /// partial map. Keystores written before a failure are left behind.
    pub fn write_keystores(&self, writer: &dyn KeystoreWriter) -> Result<()> {
        let output = &self.config.output_path;
        fs::create_dir_all(output)?;

        for (id, bundle) in &self.identities {
            let path = self.keystore_path(id, writer);
            info!("Writing {}", path.display());

            let private_key = bundle
                .private_key()
                .ok_or(PemBundleError::MissingPrivateKey)
                .map_err(|e| e.in_directory(id))?;
            let entry = KeystoreEntry {
                alias: &self.config.alias,
                password: &self.config.password,
                chain: bundle.certificate_chain(),
                private_key,
                creation_time: bundle.creation_time(),
            };
            let bytes = writer.write(&entry).map_err(|e| e.in_directory(id))?;
            fs::write(&path, bytes)?;
        }

        let map_path = output.join(&self.config.map_file_name);
        let tmp_path = output.join(format!("{}.tmp", self.config.map_file_name));
        info!("Writing {}", map_path.display());

        let mut file = fs::File::create(&tmp_path)?;
        for (domain, id) in &self.domains {
            let store_path = std::path::absolute(self.keystore_path(id, writer))?;
            writeln!(
                file,
                "{}",
                map_line(domain, &store_path, &self.config.password, writer.store_type())?
            )?;
        }
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &map_path)?;
        Ok(())
    }
}

/// One domain map line: `<domain>={"keyStorePath":..., "keyStorePassword":..., "keyStoreType":...}`.
pub fn map_line(domain: &str, store_path: &Path, password: &str, store_type: &str) -> Result<String> {
    Ok(format!(
        "{}={{\"keyStorePath\":\"{}\", \"keyStorePassword\":\"{}\", \"keyStoreType\":\"{}\"}}",
        json_escape(domain)?,
        json_escape(&store_path.to_string_lossy())?,
        json_escape(password)?,
        json_escape(store_type)?,
    ))
}

/// Escapes `s` for use inside a JSON string literal.
fn json_escape(s: &str) -> Result<String> {
    let quoted = serde_json::to_string(s)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}
