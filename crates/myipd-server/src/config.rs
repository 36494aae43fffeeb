// ABOUTME: Server configuration for myipd: listen address, config file paths, and lookup settings.
// ABOUTME: Built once at startup by the binary and validated before the listener is bound.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use myipd_core::AddressFamily;
use thiserror::Error;

pub const DEFAULT_LISTEN_PORT: u16 = 2170;
pub const DEFAULT_TOKENS_FILE: &str = "tokens.conf";
pub const DEFAULT_IPV4_SOURCE: &str = "https://ipv4.icanhazip.com";
pub const DEFAULT_IPV6_SOURCE: &str = "https://ipv6.icanhazip.com";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lookup timeout must be greater than zero")]
    ZeroTimeout,

    #[error("{0} lookups are enabled but no lookup source URL is set")]
    MissingSource(AddressFamily),
}

/// Settings read by the dispatcher and resolver. Fixed for the life of the
/// process; only the contents of the tokens and extras files are reloadable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub tokens_file: PathBuf,
    /// Extras are optional; None turns the feature off.
    pub extras_file: Option<PathBuf>,
    pub enable_ipv4: bool,
    pub enable_ipv6: bool,
    /// Suppress tags in every listing regardless of the `tags` parameter.
    pub no_tags: bool,
    pub ipv4_source: String,
    pub ipv6_source: String,
    pub lookup_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_LISTEN_PORT)),
            tokens_file: PathBuf::from(DEFAULT_TOKENS_FILE),
            extras_file: None,
            enable_ipv4: true,
            enable_ipv6: false,
            no_tags: false,
            ipv4_source: DEFAULT_IPV4_SOURCE.to_string(),
            ipv6_source: DEFAULT_IPV6_SOURCE.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Check the settings that would otherwise only fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        for family in AddressFamily::ALL {
            if self.is_enabled(family) && self.source_for(family).trim().is_empty() {
                return Err(ConfigError::MissingSource(family));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, family: AddressFamily) -> bool {
        match family {
            AddressFamily::V4 => self.enable_ipv4,
            AddressFamily::V6 => self.enable_ipv6,
        }
    }

    /// The "what is my IP" endpoint for a family.
    pub fn source_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4_source,
            AddressFamily::V6 => &self.ipv6_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();

        assert_eq!(config.listen, "0.0.0.0:2170".parse::<SocketAddr>().unwrap());
        assert_eq!(config.tokens_file, PathBuf::from("tokens.conf"));
        assert!(config.extras_file.is_none());
        assert!(config.enable_ipv4);
        assert!(!config.enable_ipv6);
        assert!(!config.no_tags);
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = ServerConfig {
            lookup_timeout: Duration::ZERO,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn validate_rejects_missing_source_for_enabled_family() {
        let config = ServerConfig {
            enable_ipv6: true,
            ipv6_source: "  ".to_string(),
            ..ServerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains("ipv6"),
            "error should name the family: {}",
            err
        );
    }

    #[test]
    fn validate_ignores_source_of_disabled_family() {
        let config = ServerConfig {
            enable_ipv4: false,
            ipv4_source: String::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn source_and_enable_follow_family() {
        let config = ServerConfig {
            enable_ipv6: true,
            ..ServerConfig::default()
        };
        assert!(config.is_enabled(AddressFamily::V4));
        assert!(config.is_enabled(AddressFamily::V6));
        assert_eq!(config.source_for(AddressFamily::V4), DEFAULT_IPV4_SOURCE);
        assert_eq!(config.source_for(AddressFamily::V6), DEFAULT_IPV6_SOURCE);
    }
}
