//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    /// SES sender address; empty means emails are only logged
    pub ses_from_email: String,
    pub ses_region: Option<String>,
    /// Allowed CORS origin
    pub frontend_url: String,
    /// Whether auth cookies carry the `Secure` attribute
    pub cookie_secure: bool,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_dev = environment == "development";

        let non_empty = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());
        let parse_or = |name: &str, default: i64| -> Result<i64, BoxError> {
            match non_empty(name) {
                Some(v) => v
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("{name} must be a positive integer, got {v:?}").into()),
                None => Ok(default),
            }
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: require_secret(lookup("JWT_SECRET"), "JWT_SECRET", &environment)?,
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 60)?,
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_TTL_DAYS", 7)?,
            ses_from_email: lookup("SES_FROM_EMAIL").unwrap_or_default(),
            ses_region: non_empty("SES_REGION"),
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".into()),
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| parse_bool(&v))
                .unwrap_or(!is_dev),
            bootstrap_admin_email: non_empty("BOOTSTRAP_ADMIN_EMAIL")
                .map(|e| e.trim().to_lowercase()),
            bootstrap_admin_password: non_empty("BOOTSTRAP_ADMIN_PASSWORD"),
            environment,
        })
    }
}

/// Require a secret: must be set and non-empty outside development.
fn require_secret(
    value: Option<String>,
    name: &str,
    environment: &str,
) -> Result<String, BoxError> {
    let val = match value {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(format!("{name} must be set in {environment} environment").into());
            }
            format!("dev-{name}-not-for-production")
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(format!("{name} must not be empty in {environment} environment").into());
    }
    Ok(val)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/brew")]).unwrap();
        assert!(cfg.is_development());
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.access_token_ttl_minutes, 60);
        assert_eq!(cfg.refresh_token_ttl_days, 7);
        assert_eq!(cfg.frontend_url, "http://localhost:5173");
        assert!(!cfg.cookie_secure);
        assert!(cfg.ses_from_email.is_empty());
        assert_eq!(cfg.jwt_secret, "dev-JWT_SECRET-not-for-production");
    }

    #[test]
    fn test_database_url_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn test_production_requires_secret() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://db/brew"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://db/brew"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert!(cfg.cookie_secure);
        assert_eq!(cfg.jwt_secret, "s3cret");
    }

    #[test]
    fn test_invalid_ttl_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://db/brew"),
            ("ACCESS_TOKEN_TTL_MINUTES", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("ACCESS_TOKEN_TTL_MINUTES"));
        assert!(
            config_from(&[
                ("DATABASE_URL", "postgres://db/brew"),
                ("REFRESH_TOKEN_TTL_DAYS", "0"),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_reads_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DATABASE_URL=postgres://env-file/brew").unwrap();
        writeln!(file, "HTTP_PORT=9090").unwrap();
        writeln!(file, "COOKIE_SECURE=yes").unwrap();
        writeln!(file, "BOOTSTRAP_ADMIN_EMAIL= Admin@Brew.Test ").unwrap();

        let map: HashMap<String, String> = dotenvy::from_path_iter(file.path())
            .unwrap()
            .map(|item| item.unwrap())
            .collect();
        let cfg = Config::from_lookup(|k| map.get(k).cloned()).unwrap();

        assert_eq!(cfg.database_url, "postgres://env-file/brew");
        assert_eq!(cfg.http_port, 9090);
        assert!(cfg.cookie_secure);
        assert_eq!(cfg.bootstrap_admin_email.as_deref(), Some("admin@brew.test"));
    }
}
