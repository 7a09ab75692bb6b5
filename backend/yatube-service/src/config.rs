/// Configuration management for yatube-service
///
/// Values come from environment variables (after `.env` is loaded by the
/// binary). Pool settings are read separately by `db_pool::DbConfig`.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Token validation settings
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// PEM encoded RS256 public key of the identity provider
    pub jwt_public_key_pem: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_public_key_pem", &self.jwt_public_key_pem.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("YATUBE_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("YATUBE_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            auth: {
                let jwt_public_key_pem = std::env::var("JWT_PUBLIC_KEY_PEM")
                    .ok()
                    .map(|pem| pem.replace("\\n", "\n"))
                    .filter(|pem| !pem.trim().is_empty());

                if production && jwt_public_key_pem.is_none() {
                    return Err("JWT_PUBLIC_KEY_PEM must be set in production".to_string());
                }

                AuthConfig { jwt_public_key_pem }
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    /// Allowed CORS origins, trimmed, empty entries dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "APP_ENV",
        "YATUBE_SERVICE_HOST",
        "YATUBE_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "JWT_PUBLIC_KEY_PEM",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.cors_origins(), vec!["http://localhost:3000"]);
        assert!(config.auth.jwt_public_key_pem.is_none());
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_production_rejects_wildcard_cors() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        std::env::set_var("JWT_PUBLIC_KEY_PEM", "pem");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_jwt_key() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://yatube.dev");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("JWT_PUBLIC_KEY_PEM"));

        std::env::set_var("JWT_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc");
        let config = Config::from_env().unwrap();
        assert!(config.is_production());
        assert!(config
            .auth
            .jwt_public_key_pem
            .as_deref()
            .unwrap()
            .contains('\n'));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_origins_are_split_and_trimmed() {
        clear_env();
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://a.dev, https://b.dev ,");
        let config = Config::from_env().unwrap();
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
        clear_env();
    }
}
