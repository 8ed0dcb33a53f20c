//! Configuration loading from pavefleet.toml.

use access::PermissionTable;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Access-control settings.
    #[serde(default)]
    pub access: AccessConfig,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Custom permission table. The builtin table is used when unset.
    pub permissions: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Record access decisions.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Audit database path. Defaults to the platform data directory.
    pub database: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when neither a flag nor RUST_LOG is set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The permission table to enforce.
    pub fn permission_table(&self) -> Result<PermissionTable, ConfigError> {
        match &self.access.permissions {
            Some(path) => PermissionTable::load(path).map_err(|source| ConfigError::Permissions {
                path: path.clone(),
                source,
            }),
            None => Ok(PermissionTable::builtin()),
        }
    }

    /// Where the audit database lives.
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit
            .database
            .clone()
            .or_else(|| dirs_data_dir().map(|dir| dir.join("audit.db")))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to load permission table {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        source: access::Error,
    },
}

fn dirs_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share/pavefleet"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
            .map(|p| p.join("pavefleet"))
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|h| PathBuf::from(h).join("pavefleet"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access::{Capability, Role};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.access.permissions.is_none());
        assert!(config.audit.enabled);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.permission_table().unwrap(), PermissionTable::builtin());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
[access]
permissions = "perms.toml"

[audit]
enabled = false
database = "/tmp/audit.db"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.access.permissions, Some(PathBuf::from("perms.toml")));
        assert!(!config.audit.enabled);
        assert_eq!(config.audit_path(), Some(PathBuf::from("/tmp/audit.db")));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[audit]\nenabled = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let err = Config::parse("[access]\npermisions = \"locked-down.toml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ref msg) if msg.contains("permisions")));

        let err = Config::parse("[acces]\npermissions = \"locked-down.toml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ref msg) if msg.contains("acces")));

        assert!(Config::parse("[audit]\nenable = false\n").is_err());
        assert!(Config::parse("[logging]\nlevl = \"debug\"\n").is_err());
    }

    #[test]
    fn test_custom_permission_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perms.toml");
        let mut table = PermissionTable::builtin();
        table.hr.can_manage_settings = true;
        std::fs::write(&path, table.to_toml().unwrap()).unwrap();

        let config = Config {
            access: AccessConfig {
                permissions: Some(path),
            },
            ..Default::default()
        };
        let loaded = config.permission_table().unwrap();
        assert!(loaded.get(Role::Hr).allows(Capability::CanManageSettings));
    }

    #[test]
    fn test_invalid_permission_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perms.toml");
        std::fs::write(&path, "[admin]\ncan_view_jobs = true\n").unwrap();

        let config = Config {
            access: AccessConfig {
                permissions: Some(path),
            },
            ..Default::default()
        };
        let err = config.permission_table().unwrap_err();
        assert!(matches!(err, ConfigError::Permissions { .. }));
    }
}
