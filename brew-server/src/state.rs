//! Application state for brew-server

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::email::{EmailSender, LogEmailSender, SesEmailSender};
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Outbound email (SES, or log-only when unconfigured)
    pub email: Arc<dyn EmailSender>,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    /// `Secure` attribute on auth cookies
    pub cookie_secure: bool,
    /// Frontend base URL, used in email links
    pub frontend_url: String,
}

impl AppState {
    /// Connect, migrate, and wire collaborators
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let email: Arc<dyn EmailSender> = if config.ses_from_email.trim().is_empty() {
            tracing::warn!("SES_FROM_EMAIL not set, emails will only be logged");
            Arc::new(LogEmailSender)
        } else {
            let aws_config =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let ses = if let Some(region) = &config.ses_region {
                let ses_config = aws_config
                    .to_builder()
                    .region(aws_config::Region::new(region.clone()))
                    .build();
                SesClient::new(&ses_config)
            } else {
                SesClient::new(&aws_config)
            };
            Arc::new(SesEmailSender::new(ses, config.ses_from_email.clone()))
        };

        Ok(Self {
            pool,
            email,
            jwt_secret: config.jwt_secret.clone(),
            access_token_ttl: chrono::Duration::minutes(config.access_token_ttl_minutes),
            refresh_token_ttl: chrono::Duration::days(config.refresh_token_ttl_days),
            cookie_secure: config.cookie_secure,
            frontend_url: config.frontend_url.clone(),
        })
    }
}
