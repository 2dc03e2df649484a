//! TOML configuration for the installed access control plugin.

use std::collections::HashMap;

use serde::Deserialize;
use sqlguard_engine::config::{HADOOP_CONFIG, KERBEROS_LOGIN, KEYTAB, PRINCIPAL, USE_GROUP_LOOKUP};

use crate::error::ConfigError;
use crate::registry::DEFAULT_IMPLEMENTATION;

/// Plugin configuration as written by operators.
///
/// ```toml
/// implementation = "sqlguard-mediator"
/// keytab = "/etc/security/keytabs/presto.keytab"
/// principal = "presto/coordinator@EXAMPLE.COM"
/// hadoop-config = "/etc/sqlguard/sqlguard-site.xml"
/// use-group-lookup = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AccessControlConfig {
    /// Registry name of the implementation to run behind the boundary.
    #[serde(default = "default_implementation")]
    pub implementation: String,

    #[serde(default)]
    pub keytab: Option<String>,

    #[serde(default)]
    pub principal: Option<String>,

    /// Perform the keytab login when both keytab and principal are set.
    #[serde(default = "default_true")]
    pub kerberos_login: bool,

    /// Site configuration resource. The default resource is tried when unset.
    #[serde(default)]
    pub hadoop_config: Option<String>,

    #[serde(default)]
    pub use_group_lookup: bool,
}

fn default_implementation() -> String {
    DEFAULT_IMPLEMENTATION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            implementation: default_implementation(),
            keytab: None,
            principal: None,
            kerberos_login: true,
            hadoop_config: None,
            use_group_lookup: false,
        }
    }
}

impl AccessControlConfig {
    /// Load configuration from a TOML file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AccessControlConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Flatten into the string map handed to the implementation factory.
    ///
    /// The keytab and principal only travel as a pair.
    pub fn to_flat_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let (Some(keytab), Some(principal)) = (&self.keytab, &self.principal) {
            map.insert(KEYTAB.to_string(), keytab.clone());
            map.insert(PRINCIPAL.to_string(), principal.clone());
        }
        map.insert(KERBEROS_LOGIN.to_string(), self.kerberos_login.to_string());
        if let Some(path) = &self.hadoop_config {
            map.insert(HADOOP_CONFIG.to_string(), path.clone());
        }
        map.insert(
            USE_GROUP_LOOKUP.to_string(),
            self.use_group_lookup.to_string(),
        );
        map
    }
}
