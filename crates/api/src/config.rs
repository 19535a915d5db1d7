use cmdgate_core::runner::RunLimits;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 80;

/// Server configuration loaded from environment variables.
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (always `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `80`).
    pub port: u16,
    /// Shared secret required in `x-api-key` for `/cmd`. `None` leaves
    /// `/cmd` open.
    pub admin_api_key: Option<String>,
    /// Timeout and output cap applied to every command run.
    pub run_limits: RunLimits,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            admin_api_key: None,
            run_limits: RunLimits::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var         | Default              |
    /// |-----------------|----------------------|
    /// | `PORT`          | `80`                 |
    /// | `ADMIN_API_KEY` | unset (open `/cmd`)  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let admin_api_key = lookup("ADMIN_API_KEY").filter(|v| !v.is_empty());

        Ok(Self {
            port,
            admin_api_key,
            ..Self::default()
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.admin_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 80);
        assert!(cfg.admin_api_key.is_none());
        assert!(!cfg.auth_enabled());
        assert_eq!(cfg.run_limits, RunLimits::default());
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[("PORT", "")])).unwrap();
        assert_eq!(cfg.port, 80);
    }

    #[test]
    fn port_is_parsed() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap();
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert_matches!(err, ConfigError::InvalidPort(ref raw) if raw == "eighty");
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "70000")]));
        assert_matches!(result, Err(ConfigError::InvalidPort(_)));
    }

    #[test]
    fn admin_key_enables_auth() {
        let cfg =
            ServerConfig::from_lookup(lookup_from(&[("ADMIN_API_KEY", "secret")])).unwrap();
        assert_eq!(cfg.admin_api_key.as_deref(), Some("secret"));
        assert!(cfg.auth_enabled());
    }

    #[test]
    fn empty_admin_key_leaves_auth_disabled() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[("ADMIN_API_KEY", "")])).unwrap();
        assert!(cfg.admin_api_key.is_none());
        assert!(!cfg.auth_enabled());
    }
}
