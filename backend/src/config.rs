use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TTS_URL: &str = "https://www.geostat.ge/personalinflation/request.php";
pub const DEFAULT_ORIGINS: [&str; 3] = [
    "https://personalinflation.geostat.ge",
    "http://localhost:3000",
    "http://localhost:5173",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub tts_url: String,
    pub max_connections: u32,
    // when false, 500 bodies carry a generic message instead of the error text
    pub expose_errors: bool,
}

#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
        encrypt: bool,
        trust_certificate: bool,
    },
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid postgres url"),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                database,
                encrypt,
                trust_certificate,
            } => {
                let ssl_mode = match (encrypt, trust_certificate) {
                    (true, true) => PgSslMode::Require,
                    (true, false) => PgSslMode::VerifyFull,
                    (false, _) => PgSslMode::Prefer,
                };
                Ok(PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(database)
                    .ssl_mode(ssl_mode))
            }
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: lookup("DB_SERVER").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(&lookup, "DB_PORT", 5432)?,
                user: lookup("DB_USER").context("DB_USER must be set when DATABASE_URL is not")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: lookup("DB_NAME").context("DB_NAME must be set when DATABASE_URL is not")?,
                encrypt: flag(&lookup, "DB_ENCRYPT"),
                trust_certificate: flag(&lookup, "DB_TRUST_CERTIFICATE"),
            },
        };

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            database,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            allowed_origins,
            tts_url: lookup("TTS_URL").unwrap_or_else(|| DEFAULT_TTS_URL.to_string()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            expose_errors: lookup("ENV").as_deref() != Some("prod"),
        })
    }
}

fn flag<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> bool {
    lookup(key).as_deref() == Some("true")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
