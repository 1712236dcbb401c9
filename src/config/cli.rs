use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};

/// Command-line arguments for the travelpro binary.
#[derive(Debug, Parser)]
#[command(name = "travelpro", version, about = "Travel content API server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "TRAVELPRO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP API and the scheduled jobs.
    Serve(Box<ServeArgs>),
    /// Load reference data into the database and exit.
    Populate(PopulateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PopulateTarget {
    /// Countries from the upstream catalogue.
    Countries,
    /// The built-in sample destinations.
    Destinations,
    /// Countries, then destinations.
    All,
}

#[derive(Debug, Args, Clone)]
pub struct PopulateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// What to load.
    #[arg(value_enum, value_name = "TARGET")]
    pub target: PopulateTarget,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Enable or disable the read cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,

    /// Override the per-region cache capacity.
    #[arg(long = "cache-capacity", value_name = "COUNT")]
    pub cache_capacity: Option<u32>,

    /// Override the TTL used by regions without a dedicated one.
    #[arg(long = "cache-default-ttl-seconds", value_name = "SECONDS")]
    pub cache_default_ttl_seconds: Option<u32>,

    /// Override the largest accepted page size.
    #[arg(long = "pagination-max-page-size", value_name = "COUNT")]
    pub pagination_max_page_size: Option<u32>,

    /// Override the JWT signing secret.
    #[arg(long = "auth-jwt-secret", env = "TRAVELPRO_JWT_SECRET", value_name = "SECRET")]
    pub auth_jwt_secret: Option<String>,

    /// Override the token lifetime.
    #[arg(long = "auth-jwt-expiration-minutes", value_name = "MINUTES")]
    pub auth_jwt_expiration_minutes: Option<u64>,

    /// Enable or disable the weekly countries seeding job.
    #[arg(
        long = "seeding-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub seeding_enabled: Option<bool>,

    /// Override the countries API base URL.
    #[arg(long = "seeding-countries-api-url", value_name = "URL")]
    pub seeding_countries_api_url: Option<String>,

    /// Override the countries seeding cron expression.
    #[arg(long = "seeding-countries-schedule", value_name = "CRON")]
    pub seeding_countries_schedule: Option<String>,
}
