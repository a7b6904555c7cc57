use fittrack_media::MediaConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5050`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_max_connections: u32,
    /// Currency recorded on new payments (default: `usd`).
    pub payments_currency: String,
    /// Whether a Stripe key is present. Only surfaced by the health check.
    pub stripe_configured: bool,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                                             |
    /// |------------------------|---------------------------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                                           |
    /// | `PORT`                 | `5050`                                                              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173,http://localhost:5174,http://localhost:5175` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                                                |
    /// | `DB_MAX_CONNECTIONS`   | `10`                                                                |
    /// | `PAYMENTS_CURRENCY`    | `usd`                                                               |
    /// | `STRIPE_SECRET_KEY`    | unset                                                               |
    ///
    /// Token and media settings come from [`JwtConfig::from_env`] and
    /// [`MediaConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5050".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:5173,http://localhost:5174,http://localhost:5175".into()
            }),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let payments_currency = std::env::var("PAYMENTS_CURRENCY")
            .unwrap_or_else(|_| "usd".into())
            .to_lowercase();

        let stripe_configured = std::env::var("STRIPE_SECRET_KEY")
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_max_connections,
            payments_currency,
            stripe_configured,
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}

/// `DATABASE_URL`, falling back to `DATABASE_URI`.
///
/// # Panics
///
/// Panics when neither is set.
pub fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URI"))
        .expect("DATABASE_URL (or DATABASE_URI) must be set")
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://localhost:5173/ ,, https://fittrack.app");
        assert_eq!(origins, vec!["http://localhost:5173", "https://fittrack.app"]);
    }
}
