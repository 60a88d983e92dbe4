use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError, ENV_PREFIX};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from defaults with environment variable overrides
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagnosticTarget;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.engine.path, PathBuf::from("/opt/bin/ffmpeg"));
        assert_eq!(config.workspace.prefix, "lambda-");
    }

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[engine]
path = "/usr/bin/ffmpeg"
timeout_secs = 120
stdout = "discard"

[workspace]
root = "/var/tmp"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.engine.path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(config.engine.timeout_secs, Some(120));
        assert_eq!(config.engine.stdout, DiagnosticTarget::Discard);
        assert_eq!(config.engine.stderr, DiagnosticTarget::Stderr);
        assert_eq!(config.workspace.root, PathBuf::from("/var/tmp"));
    }

    #[test]
    fn test_load_config_from_str_bad_target() {
        let toml = r#"
[engine]
stdout = "syslog"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/transcodegate.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[engine]
path = "/usr/local/bin/ffmpeg"

[fetch]
connect_timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.engine.path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.fetch.connect_timeout_secs, Some(5));
        assert_eq!(config.fetch.timeout_secs, None);
    }
}
