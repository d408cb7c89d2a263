//! # Configuration
//!
//! Process-wide configuration for the remote generation service, resolved
//! once at startup. Missing values are fatal: the server refuses to start
//! rather than registering tools that cannot work.

/// Env var naming the generation service base address.
pub const SERVICE_URL_VAR: &str = "PAGEFORGE_SERVICE_URL";
/// Env var naming the authorization secret sent with every stage call.
pub const SERVICE_SECRET_VAR: &str = "PAGEFORGE_SERVICE_SECRET";

/// Fatal startup configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Static configuration for the generation pipeline.
///
/// Constructed once at startup and treated as read-only for the process
/// lifetime. The secret is excluded from `Debug` output.
#[derive(Clone)]
pub struct ForgeConfig {
    /// Base address of the remote generation service
    pub service_url: String,
    /// Authorization secret injected into every stage request body
    pub service_secret: String,
}

impl ForgeConfig {
    pub fn new(service_url: impl Into<String>, service_secret: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            service_secret: service_secret.into(),
        }
    }

    /// Resolve configuration from the environment.
    ///
    /// Absence of either value is a `ConfigError`, which callers must
    /// treat as fatal before any tool is registered.
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_url = std::env::var(SERVICE_URL_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar(SERVICE_URL_VAR))?;
        let service_secret = std::env::var(SERVICE_SECRET_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar(SERVICE_SECRET_VAR))?;
        Ok(Self {
            service_url,
            service_secret,
        })
    }
}

impl std::fmt::Debug for ForgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgeConfig")
            .field("service_url", &self.service_url)
            .field("service_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = ForgeConfig::new("http://localhost:9000", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("localhost"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_missing_var_is_named() {
        let err = ConfigError::MissingVar(SERVICE_URL_VAR);
        assert!(err.to_string().contains("PAGEFORGE_SERVICE_URL"));
    }

    // Single test for both env states: other tests never touch these
    // vars, so there is no parallel-test interference to worry about.
    #[test]
    fn test_from_env_resolution() {
        std::env::remove_var(SERVICE_URL_VAR);
        std::env::remove_var(SERVICE_SECRET_VAR);
        assert!(ForgeConfig::from_env().is_err());

        std::env::set_var(SERVICE_URL_VAR, "http://localhost:9000");
        assert!(ForgeConfig::from_env().is_err());

        std::env::set_var(SERVICE_SECRET_VAR, "s3cret");
        let config = ForgeConfig::from_env().unwrap();
        assert_eq!(config.service_url, "http://localhost:9000");
        assert_eq!(config.service_secret, "s3cret");

        std::env::remove_var(SERVICE_URL_VAR);
        std::env::remove_var(SERVICE_SECRET_VAR);
    }
}
