//! Typed settings resolved from file, environment and CLI, in that order.

use std::{
    collections::{BTreeMap, HashMap},
    net::SocketAddr,
    num::NonZeroU32,
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::jobs::{DEFAULT_SEED_COUNTRIES_CRON, parse_schedule};
use crate::application::pagination::DEFAULT_MAX_PAGE_SIZE;
use crate::cache::CacheRegion;

mod cli;

pub use cli::{
    CliArgs, Command, DatabaseOverride, PopulateArgs, PopulateTarget, ServeArgs, ServeOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "travelpro";
const ENV_PREFIX: &str = "TRAVELPRO";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CACHE_CAPACITY: u32 = 1000;
const DEFAULT_CACHE_TTL_SECS: u32 = 600;
const DEFAULT_JWT_EXPIRATION_MINUTES: u64 = 24 * 60;
const DEFAULT_JWT_ISSUER: &str = "travelpro";
const MIN_JWT_SECRET_BYTES: usize = 32;
const DEFAULT_COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1";
const DEFAULT_SEEDING_TIMEOUT_SECS: u64 = 30;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub pagination: PaginationSettings,
    pub auth: AuthSettings,
    pub seeding: SeedingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub capacity: NonZeroU32,
    pub default_ttl_seconds: NonZeroU32,
    /// Per-region TTLs from `cache.ttl`; `None` keeps the built-in table.
    pub region_ttls: Option<HashMap<CacheRegion, Duration>>,
}

#[derive(Debug, Clone)]
pub struct PaginationSettings {
    pub max_page_size: u32,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiration: Duration,
    pub issuer: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration", &self.jwt_expiration)
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SeedingSettings {
    pub enabled: bool,
    pub countries_api_url: Url,
    pub countries_schedule: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings for the command carried by `cli`.
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Populate(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Parse the process arguments and resolve settings for them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    cache: RawCacheSettings,
    pagination: RawPaginationSettings,
    auth: RawAuthSettings,
    seeding: RawSeedingSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.cache.enabled = Some(enabled);
        }
        if let Some(capacity) = overrides.cache_capacity {
            self.cache.capacity = Some(capacity);
        }
        if let Some(ttl) = overrides.cache_default_ttl_seconds {
            self.cache.default_ttl_seconds = Some(ttl);
        }
        if let Some(size) = overrides.pagination_max_page_size {
            self.pagination.max_page_size = Some(size);
        }
        if let Some(secret) = overrides.auth_jwt_secret.as_ref() {
            self.auth.jwt_secret = Some(secret.clone());
        }
        if let Some(minutes) = overrides.auth_jwt_expiration_minutes {
            self.auth.jwt_expiration_minutes = Some(minutes);
        }
        if let Some(enabled) = overrides.seeding_enabled {
            self.seeding.enabled = Some(enabled);
        }
        if let Some(url) = overrides.seeding_countries_api_url.as_ref() {
            self.seeding.countries_api_url = Some(url.clone());
        }
        if let Some(schedule) = overrides.seeding_countries_schedule.as_ref() {
            self.seeding.countries_schedule = Some(schedule.clone());
        }
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            server: build_server_settings(raw.server)?,
            logging: build_logging_settings(raw.logging)?,
            database: build_database_settings(raw.database)?,
            cache: build_cache_settings(raw.cache)?,
            pagination: build_pagination_settings(raw.pagination)?,
            auth: build_auth_settings(raw.auth)?,
            seeding: build_seeding_settings(raw.seeding)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    let addr =
        parse_socket_addr(&host, port).map_err(|reason| LoadError::invalid("server.host", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    let max_connections = non_zero_u32(
        database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .into(),
        "database.max_connections",
    )?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let capacity = non_zero_u32(
        cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY).into(),
        "cache.capacity",
    )?;
    let default_ttl_seconds = non_zero_u32(
        cache
            .default_ttl_seconds
            .unwrap_or(DEFAULT_CACHE_TTL_SECS)
            .into(),
        "cache.default_ttl_seconds",
    )?;

    let region_ttls = cache.ttl.map(build_region_ttls).transpose()?;

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        capacity,
        default_ttl_seconds,
        region_ttls,
    })
}

fn build_region_ttls(
    table: BTreeMap<String, u64>,
) -> Result<HashMap<CacheRegion, Duration>, LoadError> {
    table
        .into_iter()
        .map(|(name, seconds)| -> Result<(CacheRegion, Duration), LoadError> {
            let region = CacheRegion::from_name(&name).ok_or_else(|| {
                LoadError::invalid("cache.ttl", format!("unknown cache region `{name}`"))
            })?;
            if seconds == 0 {
                return Err(LoadError::invalid(
                    "cache.ttl",
                    format!("`{name}` must be greater than zero"),
                ));
            }
            Ok((region, Duration::from_secs(seconds)))
        })
        .collect()
}

fn build_pagination_settings(
    pagination: RawPaginationSettings,
) -> Result<PaginationSettings, LoadError> {
    let max_page_size = pagination.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE);
    if max_page_size == 0 {
        return Err(LoadError::invalid(
            "pagination.max_page_size",
            "must be greater than zero",
        ));
    }
    Ok(PaginationSettings { max_page_size })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let jwt_secret = auth
        .jwt_secret
        .filter(|secret| !secret.trim().is_empty())
        .ok_or_else(|| LoadError::invalid("auth.jwt_secret", "is required"))?;
    if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
        return Err(LoadError::invalid(
            "auth.jwt_secret",
            format!("must be at least {MIN_JWT_SECRET_BYTES} bytes"),
        ));
    }

    let minutes = auth
        .jwt_expiration_minutes
        .unwrap_or(DEFAULT_JWT_EXPIRATION_MINUTES);
    if minutes == 0 {
        return Err(LoadError::invalid(
            "auth.jwt_expiration_minutes",
            "must be greater than zero",
        ));
    }

    let issuer = auth
        .issuer
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string());

    Ok(AuthSettings {
        jwt_secret,
        jwt_expiration: Duration::from_secs(minutes * 60),
        issuer,
    })
}

fn build_seeding_settings(seeding: RawSeedingSettings) -> Result<SeedingSettings, LoadError> {
    let raw_url = seeding
        .countries_api_url
        .unwrap_or_else(|| DEFAULT_COUNTRIES_API_URL.to_string());
    let countries_api_url = Url::parse(raw_url.trim()).map_err(|err| {
        LoadError::invalid("seeding.countries_api_url", format!("invalid url: {err}"))
    })?;
    if !matches!(countries_api_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "seeding.countries_api_url",
            "must use http or https",
        ));
    }

    let countries_schedule = seeding
        .countries_schedule
        .unwrap_or_else(|| DEFAULT_SEED_COUNTRIES_CRON.to_string());
    parse_schedule(&countries_schedule)
        .map_err(|reason| LoadError::invalid("seeding.countries_schedule", reason))?;

    let timeout_secs = seeding
        .request_timeout_seconds
        .unwrap_or(DEFAULT_SEEDING_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "seeding.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(SeedingSettings {
        enabled: seeding.enabled.unwrap_or(true),
        countries_api_url,
        countries_schedule,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    capacity: Option<u32>,
    default_ttl_seconds: Option<u32>,
    ttl: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPaginationSettings {
    max_page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    jwt_secret: Option<String>,
    jwt_expiration_minutes: Option<u64>,
    issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSeedingSettings {
    enabled: Option<bool>,
    countries_api_url: Option<String>,
    countries_schedule: Option<String>,
    request_timeout_seconds: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    let value: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests;
