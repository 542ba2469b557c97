use crate::db::DatabaseConfig;
use crate::middleware::rate_limit::LoginLimit;
use crate::utils::jwt::{JwtConfig, MIN_SECRET_LEN};
use anyhow::{Context, Result, bail};
use std::str::FromStr;

/// Credentials for the admin account created on first start.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

/// Process configuration, read once at start-up and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub port: u16,
    pub seed_admin: Option<SeedAdmin>,
    pub login_limit: LoginLimit,
    pub sentry_dsn: Option<String>,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if you want `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get("SURREAL_URL").context("SURREAL_URL must be set")?;
        let credentials = match (get("SURREAL_USER"), get("SURREAL_PASS")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (None, None) => None,
            _ => bail!("SURREAL_USER and SURREAL_PASS must be set together"),
        };
        let database = DatabaseConfig {
            url,
            credentials,
            namespace: get("SURREAL_NS").unwrap_or_else(|| "staffdesk".to_string()),
            database: get("SURREAL_DB").unwrap_or_else(|| "hr".to_string()),
        };

        let secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.len() < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long");
        }
        let ttl_minutes: i64 = parse_or(&get, "JWT_TTL_MINUTES", 30)?;
        if ttl_minutes <= 0 {
            bail!("JWT_TTL_MINUTES must be positive");
        }
        let jwt = JwtConfig {
            secret,
            ttl: chrono::Duration::minutes(ttl_minutes),
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "staffdesk".to_string()),
        };

        let seed_admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(SeedAdmin { username, password }),
            (None, None) => None,
            _ => bail!("ADMIN_USERNAME and ADMIN_PASSWORD must be set together"),
        };

        let defaults = LoginLimit::default();
        let login_limit = LoginLimit {
            burst: parse_or(&get, "LOGIN_BURST", defaults.burst)?,
            period_secs: parse_or(&get, "LOGIN_PERIOD_SECS", defaults.period_secs)?,
            trust_proxy_headers: parse_or(&get, "TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
        };
        if login_limit.burst == 0 || login_limit.period_secs == 0 {
            bail!("LOGIN_BURST and LOGIN_PERIOD_SECS must be positive");
        }

        Ok(Self {
            database,
            jwt,
            port: parse_or(&get, "PORT", 3000)?,
            seed_admin,
            login_limit,
            sentry_dsn: get("SENTRY_DSN"),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
