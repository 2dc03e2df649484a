//! Flat configuration consumed by the mediator at construction time.
//!
//! The isolation boundary hands the implementation a plain string map; this
//! module reads the keys it knows and ignores everything else.

use std::collections::HashMap;

use crate::error::BootstrapError;

pub const KEYTAB: &str = "sqlguard.keytab";
pub const PRINCIPAL: &str = "sqlguard.principal";
pub const KERBEROS_LOGIN: &str = "sqlguard.kerberos_login";
pub const HADOOP_CONFIG: &str = "sqlguard.hadoop_config";
pub const USE_GROUP_LOOKUP: &str = "sqlguard.use_group_lookup";

/// Site configuration tried when no explicit path is configured.
pub const DEFAULT_SITE_CONFIG: &str = "sqlguard-site.xml";

/// Service type and application id passed to `PolicyEvaluator::init`.
pub const SERVICE_TYPE: &str = "presto";
pub const APP_ID: &str = "presto";

/// Parsed view of the flat configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub keytab: Option<String>,
    pub principal: Option<String>,
    pub kerberos_login: bool,
    pub site_config: Option<String>,
    pub use_group_lookup: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            keytab: None,
            principal: None,
            kerberos_login: true,
            site_config: None,
            use_group_lookup: false,
        }
    }
}

impl PluginConfig {
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            keytab: get(KEYTAB),
            principal: get(PRINCIPAL),
            kerberos_login: map.get(KERBEROS_LOGIN).map_or(true, |v| parse_flag(v)),
            site_config: get(HADOOP_CONFIG),
            use_group_lookup: map.get(USE_GROUP_LOOKUP).is_some_and(|v| parse_flag(v)),
        }
    }

    /// Principal and keytab to log in with, when login applies.
    pub fn keytab_login(&self) -> Option<(&str, &str)> {
        if !self.kerberos_login {
            return None;
        }
        match (&self.principal, &self.keytab) {
            (Some(principal), Some(keytab)) => Some((principal, keytab)),
            _ => None,
        }
    }

    /// Site configuration to load and whether it was explicitly configured.
    pub fn site_config_path(&self) -> (&str, bool) {
        match &self.site_config {
            Some(path) => (path, true),
            None => (DEFAULT_SITE_CONFIG, false),
        }
    }
}

/// Only a case-insensitive `true` enables a flag.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Host-side security setup performed once before the evaluator starts.
///
/// Covers the site configuration loader and the keytab login, both of which
/// belong to the host environment rather than to this crate.
pub trait SecurityBootstrap: Send + Sync {
    /// Load an external configuration resource. Returns `Ok(false)` when the
    /// resource does not exist.
    fn load_site_config(&self, path: &str) -> Result<bool, BootstrapError>;

    fn login_from_keytab(&self, principal: &str, keytab: &str) -> Result<(), BootstrapError>;
}

/// Bootstrap for hosts with no site configuration and no Kerberos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBootstrap;

impl SecurityBootstrap for NoopBootstrap {
    fn load_site_config(&self, _path: &str) -> Result<bool, BootstrapError> {
        Ok(false)
    }

    fn login_from_keytab(&self, _principal: &str, _keytab: &str) -> Result<(), BootstrapError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = PluginConfig::from_map(&HashMap::new());
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.site_config_path(), (DEFAULT_SITE_CONFIG, false));
        assert!(config.keytab_login().is_none());
    }

    #[test]
    fn test_flags_are_case_insensitive() {
        let config = PluginConfig::from_map(&map(&[(USE_GROUP_LOOKUP, "TRUE")]));
        assert!(config.use_group_lookup);

        let config = PluginConfig::from_map(&map(&[(USE_GROUP_LOOKUP, "yes")]));
        assert!(!config.use_group_lookup);
    }

    #[test]
    fn test_keytab_login_requires_both_values() {
        let config = PluginConfig::from_map(&map(&[(KEYTAB, "/etc/sqlguard.keytab")]));
        assert!(config.keytab_login().is_none());

        let config = PluginConfig::from_map(&map(&[
            (KEYTAB, "/etc/sqlguard.keytab"),
            (PRINCIPAL, "sqlguard/host@REALM"),
        ]));
        assert_eq!(
            config.keytab_login(),
            Some(("sqlguard/host@REALM", "/etc/sqlguard.keytab"))
        );
    }

    #[test]
    fn test_kerberos_login_can_be_disabled() {
        let config = PluginConfig::from_map(&map(&[
            (KEYTAB, "/etc/sqlguard.keytab"),
            (PRINCIPAL, "sqlguard/host@REALM"),
            (KERBEROS_LOGIN, "false"),
        ]));
        assert!(config.keytab_login().is_none());
    }

    #[test]
    fn test_explicit_site_config() {
        let config = PluginConfig::from_map(&map(&[(HADOOP_CONFIG, "/etc/site.xml")]));
        assert_eq!(config.site_config_path(), ("/etc/site.xml", true));
    }
}
