use std::{process, sync::Arc};

use apalis::prelude::{Monitor, WorkerBuilder, WorkerFactoryFn};
use apalis_cron::CronStream;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;
use travelpro::{
    application::{
        admin::AdminDestinationService,
        auth::{AuthService, JwtCodec},
        blog::BlogService,
        destinations::DestinationService,
        error::AppError,
        jobs::{SeedCountriesContext, parse_schedule, process_seed_countries_job},
        repos::{
            BlogRepo, DestinationsRepo, DestinationsWriteRepo, GeographyRepo, UsersRepo,
        },
        seeding::{CountrySeedingService, CountrySource, PopulationService},
    },
    cache::{CacheAside, CacheConfig, CacheStore, InMemoryCacheStore},
    config,
    infra::{
        countries::RestCountriesClient,
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HealthProbe, HttpState},
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Populate(args) => run_populate(settings, args.target).await,
    }
}

struct ApplicationContext {
    http_state: HttpState,
    seeding: Arc<CountrySeedingService>,
    population: Arc<PopulationService>,
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::Migration(err.to_string()))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<ApplicationContext, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let store: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new(&cache_config));
    let cache = CacheAside::new(store, cache_config);

    let destinations_repo: Arc<dyn DestinationsRepo> = repositories.clone();
    let writer: Arc<dyn DestinationsWriteRepo> = repositories.clone();
    let geography: Arc<dyn GeographyRepo> = repositories.clone();
    let blog_repo: Arc<dyn BlogRepo> = repositories.clone();
    let users: Arc<dyn UsersRepo> = repositories.clone();
    let health: Arc<dyn HealthProbe> = repositories.clone();

    let max_page_size = settings.pagination.max_page_size;
    let destinations = Arc::new(DestinationService::new(
        destinations_repo,
        cache.clone(),
        max_page_size,
    ));
    let blog = Arc::new(BlogService::new(blog_repo, cache.clone(), max_page_size));
    let admin = Arc::new(AdminDestinationService::new(
        writer.clone(),
        geography.clone(),
        cache.clone(),
    ));

    let lifetime = time::Duration::try_from(settings.auth.jwt_expiration)
        .map_err(|err| AppError::unexpected(format!("invalid token lifetime: {err}")))?;
    let jwt = JwtCodec::new(&settings.auth.jwt_secret, settings.auth.issuer.clone(), lifetime);
    let auth = Arc::new(AuthService::new(users, jwt));

    let source: Arc<dyn CountrySource> = Arc::new(RestCountriesClient::new(
        settings.seeding.countries_api_url.clone(),
        settings.seeding.request_timeout,
    )?);
    let seeding = CountrySeedingService::new(source, geography.clone());
    let population = Arc::new(PopulationService::new(
        geography,
        writer,
        cache,
        seeding.clone(),
    ));

    let http_state = HttpState {
        destinations,
        blog,
        admin,
        auth,
        population: population.clone(),
        health,
    };

    Ok(ApplicationContext {
        http_state,
        seeding: Arc::new(seeding),
        population,
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings)?;

    let monitor_handle = if settings.seeding.enabled {
        Some(spawn_job_monitor(app.seeding.clone(), &settings.seeding)?)
    } else {
        info!(target = "travelpro::jobs", "countries seeding job disabled");
        None
    };

    let result = serve_http(&settings, app.http_state).await;

    if let Some(handle) = monitor_handle {
        handle.abort();
        if tokio::time::timeout(settings.server.graceful_shutdown, handle)
            .await
            .is_err()
        {
            warn!(target = "travelpro::jobs", "job monitor did not stop in time");
        }
    }

    result
}

async fn run_populate(
    settings: config::Settings,
    target: config::PopulateTarget,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings)?;
    let population = app.population;

    let outcome = match target {
        config::PopulateTarget::Countries => population
            .populate_countries()
            .await
            .map(|report| format!("countries: fetched {}, inserted {}", report.fetched, report.inserted)),
        config::PopulateTarget::Destinations => population
            .populate_destinations()
            .await
            .map(|report| format!("destinations: created {}, skipped {}", report.created, report.skipped)),
        config::PopulateTarget::All => population.populate_all().await.map(|(countries, destinations)| {
            format!(
                "countries: fetched {}, inserted {}; destinations: created {}, skipped {}",
                countries.fetched, countries.inserted, destinations.created, destinations.skipped
            )
        }),
    };

    let summary = outcome.map_err(|err| AppError::unexpected(format!("population failed: {err}")))?;
    info!(target = "travelpro::populate", summary = %summary, "population finished");
    Ok(())
}

fn spawn_job_monitor(
    seeding: Arc<CountrySeedingService>,
    settings: &config::SeedingSettings,
) -> Result<tokio::task::JoinHandle<()>, AppError> {
    let schedule = parse_schedule(&settings.countries_schedule)
        .map_err(|err| AppError::unexpected(format!("invalid seeding schedule: {err}")))?;

    let seed_countries_worker = WorkerBuilder::new("seed-countries-worker")
        .data(SeedCountriesContext { seeding })
        .backend(CronStream::new(schedule))
        .build_fn(process_seed_countries_job);

    let monitor = Monitor::new().register(seed_countries_worker);
    info!(
        target = "travelpro::jobs",
        schedule = %settings.countries_schedule,
        "countries seeding job scheduled"
    );

    Ok(tokio::spawn(async move {
        if let Err(err) = monitor.run().await {
            error!(error = %err, "job monitor stopped");
        }
    }))
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;

    info!(
        target = "travelpro::http",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!(target = "travelpro::http", "shutdown signal received");
}
