#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    fs::read_to_string(data_path(name)).unwrap()
}

/// Creates `<root>/<id>/{fullchain.pem,privkey.pem}` from fixture contents.
pub fn write_identity(root: &Path, id: &str, chain: &[&str], key: &[&str]) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("fullchain.pem"), chain.concat()).unwrap();
    fs::write(dir.join("privkey.pem"), key.concat()).unwrap();
}

/// An input tree with two complete identities and a stray file.
pub fn live_tree() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    write_identity(
        root.path(),
        "site-a",
        &[&fixture("leaf.pem"), &fixture("ca.pem")],
        &[&fixture("leaf_key_pkcs8.pem")],
    );
    write_identity(
        root.path(),
        "site-b",
        &[&fixture("live/site-b/fullchain.pem")],
        &[&fixture("live/site-b/privkey.pem")],
    );
    fs::write(root.path().join("README"), "not a certificate directory\n").unwrap();
    root
}
