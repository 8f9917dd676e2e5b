use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which repository implementations back the console
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret; generated at start-up when absent
    pub secret: Option<String>,
    pub session_ttl_hours: u64,
    pub cookie_name: String,
    pub secure_cookie: bool,
    /// Email of the administrator created when the user table is empty
    pub bootstrap_admin_email: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            session_ttl_hours: 24,
            cookie_name: "session".to_string(),
            secure_cookie: true,
            bootstrap_admin_email: Some("admin@admin.com".to_string()),
        }
    }
}

impl AuthSettings {
    /// Bootstrap administrator email, ignoring blank values
    pub fn bootstrap_admin_email(&self) -> Option<&str> {
        self.bootstrap_admin_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config.with_env_fallbacks(|key| std::env::var(key).ok()))
    }

    /// Fill unset secrets from the conventional `AUTH_SECRET` and `DATABASE_URL`
    pub fn with_env_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        if self.auth.secret.as_deref().is_none_or(str::is_empty) {
            self.auth.secret = present(lookup("AUTH_SECRET"));
        }

        if self.storage.database_url.as_deref().is_none_or(str::is_empty) {
            self.storage.database_url = present(lookup("DATABASE_URL"));
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert_eq!(config.auth.cookie_name, "session");
        assert!(config.auth.secure_cookie);
        assert!(config.auth.secret.is_none());
    }

    #[test]
    fn test_env_fallbacks_fill_missing_values() {
        let config = AppConfig::default().with_env_fallbacks(|key| match key {
            "AUTH_SECRET" => Some("from-env".to_string()),
            "DATABASE_URL" => Some("postgres://db/console".to_string()),
            _ => None,
        });

        assert_eq!(config.auth.secret.as_deref(), Some("from-env"));
        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://db/console")
        );
    }

    #[test]
    fn test_env_fallbacks_do_not_override_config() {
        let mut config = AppConfig::default();
        config.auth.secret = Some("configured".to_string());

        let config = config.with_env_fallbacks(|_| Some("from-env".to_string()));
        assert_eq!(config.auth.secret.as_deref(), Some("configured"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = AppConfig::default().with_env_fallbacks(|_| Some(String::new()));
        assert!(config.auth.secret.is_none());
        assert!(config.storage.database_url.is_none());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_str(
            r#"{"storage": {"backend": "postgres"}, "logging": {"format": "json"}}"#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blank_bootstrap_email_is_ignored() {
        let mut auth = AuthSettings::default();
        assert_eq!(auth.bootstrap_admin_email(), Some("admin@admin.com"));

        auth.bootstrap_admin_email = Some(String::new());
        assert!(auth.bootstrap_admin_email().is_none());

        auth.bootstrap_admin_email = None;
        assert!(auth.bootstrap_admin_email().is_none());
    }
}
