use std::path::PathBuf;

use bon::Builder;

/// Default directory holding one certificate directory per identity.
pub const DEFAULT_INPUT_PATH: &str = "/etc/letsencrypt/live";

/// Settings for a [`Converter`](crate::convert::Converter) run.
///
/// # Fields
/// * `input_path` - Directory scanned for certificate directories.
/// * `output_path` - Directory receiving keystores and the domain map.
/// * `password` - Keystore password, passed through opaquely.
/// * `alias` - Entry alias inside each keystore.
/// * `map_file_name` - Name of the domain map file in `output_path`.
/// * `chain_file_name` / `key_file_name` - Files read, in that order, from each certificate directory.
///
/// ```
/// use pembundle::config::ConverterConfig;
///
/// let config = ConverterConfig::builder().output_path("/tmp/stores").build();
/// assert_eq!(config.alias, "server");
/// assert_eq!(config.input_path.to_str(), Some("/etc/letsencrypt/live"));
/// ```
#[derive(Clone, Debug, Builder)]
pub struct ConverterConfig {
    #[builder(default = PathBuf::from(DEFAULT_INPUT_PATH), into)]
    pub input_path: PathBuf,
    #[builder(into)]
    pub output_path: PathBuf,
    #[builder(default = "secret".to_string(), into)]
    pub password: String,
    #[builder(default = "server".to_string(), into)]
    pub alias: String,
    #[builder(default = "jksmap.txt".to_string(), into)]
    pub map_file_name: String,
    #[builder(default = "fullchain.pem".to_string(), into)]
    pub chain_file_name: String,
    #[builder(default = "privkey.pem".to_string(), into)]
    pub key_file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::builder().output_path("out").build();
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.output_path, PathBuf::from("out"));
        assert_eq!(config.password, "secret");
        assert_eq!(config.alias, "server");
        assert_eq!(config.map_file_name, "jksmap.txt");
        assert_eq!(config.chain_file_name, "fullchain.pem");
        assert_eq!(config.key_file_name, "privkey.pem");
    }

    #[test]
    fn test_overrides() {
        let config = ConverterConfig::builder()
            .input_path("in")
            .output_path("out")
            .password("hunter2")
            .map_file_name("map.txt")
            .build();
        assert_eq!(config.input_path, PathBuf::from("in"));
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.map_file_name, "map.txt");
    }
}
