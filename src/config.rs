/*
 * Responsibility
 * - Load settings from the environment (.env is honoured in development)
 * - Validate them up front; a bad value fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity-provider settings for token verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub issuer: String,
    pub jwks_url: Url,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
    pub jwks_cache_ttl: Duration,
    pub jwks_min_refresh_interval: Duration,
    pub jwks_fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&get, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(&get("APP_ENV").unwrap_or_default());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?);
        let request_body_limit_bytes = parse_or(&get, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        let auth = AuthConfig::from_lookup(&get)?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            request_timeout,
            request_body_limit_bytes,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_lookup<F>(get: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = get("AUTH_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::Missing("AUTH_DOMAIN"))?;

        let audience = get("AUTH_AUDIENCE")
            .filter(|a| !a.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        // The provider publishes its issuer with a trailing slash.
        let issuer = get("AUTH_ISSUER").unwrap_or_else(|| format!("https://{}/", domain));

        let jwks_url = match get("AUTH_JWKS_URL") {
            Some(url) => Url::parse(&url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
            None => Url::parse(&format!("https://{}/.well-known/jwks.json", domain))
                .map_err(|_| ConfigError::Invalid("AUTH_DOMAIN"))?,
        };

        let algorithms = match get("AUTH_ALGORITHMS") {
            Some(raw) => parse_algorithms(&raw)?,
            None => vec![Algorithm::RS256],
        };

        Ok(Self {
            domain,
            audience,
            issuer,
            jwks_url,
            algorithms,
            leeway_seconds: parse_or(get, "AUTH_LEEWAY_SECONDS", 0)?,
            jwks_cache_ttl: Duration::from_secs(parse_or(get, "JWKS_CACHE_TTL_SECONDS", 300)?),
            jwks_min_refresh_interval: Duration::from_secs(parse_or(
                get,
                "JWKS_MIN_REFRESH_SECONDS",
                30,
            )?),
            jwks_fetch_timeout: Duration::from_secs(parse_or(get, "JWKS_FETCH_TIMEOUT_SECONDS", 5)?),
        })
    }
}

/// Comma-separated list of asymmetric JWS algorithms. HMAC is refused: keys
/// come from a public JWKS, so a shared secret has no place here.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHMS")))
        .collect::<Result<Vec<_>, _>>()?;

    let symmetric = algorithms
        .iter()
        .any(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512));

    if algorithms.is_empty() || symmetric {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }

    Ok(algorithms)
}

fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
