use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
}

impl StripeConfig {
    pub fn init() -> Self {
        StripeConfig {
            secret_key: std::env::var("STRIPE_SECRET_KEY").ok(),
            webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub media_root: PathBuf,
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
}

impl StorageConfig {
    pub fn init() -> Self {
        let media_root = std::env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));

        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);

        StorageConfig {
            media_root,
            max_upload_bytes,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub currency: String,
    pub max_concurrent_requests: usize,
    pub rate_limit_per_minute: u32,
    pub storage: StorageConfig,
    pub stripe: StripeConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let currency = std::env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string());

        let max_concurrent_requests = std::env::var("MAX_CONCURRENT_REQUESTS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(100);

        let rate_limit_per_minute = std::env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(120);

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            currency,
            max_concurrent_requests,
            rate_limit_per_minute,
            storage: StorageConfig::init(),
            stripe: StripeConfig::init(),
        })
    }
}
