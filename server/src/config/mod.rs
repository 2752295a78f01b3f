use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{Authenticator, StaticPrincipal, TokenSigner, MIN_SECRET_LEN};
use crate::error::{ApiError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "server/config/server.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub auth: AuthConfig,
    pub login_throttle: ThrottleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_secs: u64,
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_secs: 3600,
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }
}

// Keeps the secret and password out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub max_attempts: usize,
    pub window_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            window_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Reads the file when it exists, otherwise starts from defaults, then
    /// applies environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            log::warn!(
                "Config file '{}' not found, using defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(host) = env_string("SERVER_HOST") {
            self.http.host = host;
        }
        if let Some(port) = env_parsed("SERVER_PORT")? {
            self.http.port = port;
        }
        if let Some(secret) = env_string("AUTH_SECRET") {
            self.auth.secret = secret;
        }
        if let Some(ttl) = env_parsed("TOKEN_TTL_SECS")? {
            self.auth.token_ttl_secs = ttl;
        }
        if let Some(username) = env_string("AUTH_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = env_string("AUTH_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(max_attempts) = env_parsed("LOGIN_MAX_ATTEMPTS")? {
            self.login_throttle.max_attempts = max_attempts;
        }
        if let Some(window) = env_parsed("LOGIN_WINDOW_SECS")? {
            self.login_throttle.window_secs = window;
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.login_throttle.window_secs)
    }

    pub fn build_authenticator(&self) -> Result<Authenticator> {
        if self.auth.token_ttl_secs == 0 {
            return Err(ApiError::Config(
                "token_ttl_secs must be greater than zero".to_string(),
            ));
        }

        let signer = TokenSigner::new(self.auth.secret.as_bytes().to_vec(), self.token_ttl())
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let principal = StaticPrincipal::new(&self.auth.username, &self.auth.password);

        Ok(Authenticator::new(signer, Arc::new(principal)))
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>> {
    env_string(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::Config(format!("{key} has an invalid value: {raw}")))
        })
        .transpose()
}
