use super::*;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn raw_with_secret() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some(SECRET.to_string());
    raw
}

#[test]
fn defaults_resolve_when_only_the_secret_is_set() {
    let settings = Settings::from_raw(raw_with_secret()).expect("valid settings");

    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:8080");
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 10);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.capacity.get(), 1000);
    assert_eq!(settings.cache.default_ttl_seconds.get(), 600);
    assert!(settings.cache.region_ttls.is_none());
    assert_eq!(settings.pagination.max_page_size, 100);
    assert_eq!(settings.auth.jwt_expiration, Duration::from_secs(1440 * 60));
    assert_eq!(settings.auth.issuer, "travelpro");
    assert_eq!(
        settings.seeding.countries_api_url.as_str(),
        "https://restcountries.com/v3.1"
    );
    assert_eq!(settings.seeding.countries_schedule, "0 0 2 * * Sun");
    assert_eq!(settings.seeding.request_timeout, Duration::from_secs(30));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_secret();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.capacity = Some(10);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_capacity: Some(25),
        pagination_max_page_size: Some(50),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.capacity.get(), 25);
    assert_eq!(settings.pagination.max_page_size, 50);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_secret();
    raw.apply_serve_overrides(&ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn missing_or_short_secret_is_rejected() {
    let err = Settings::from_raw(RawSettings::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.jwt_secret",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("too-short".to_string());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(err.to_string().contains("at least 32 bytes"));
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = raw_with_secret();
    raw.cache.capacity = Some(0);
    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "cache.capacity",
            ..
        }
    ));

    let mut raw = raw_with_secret();
    raw.pagination.max_page_size = Some(0);
    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "pagination.max_page_size",
            ..
        }
    ));
}

#[test]
fn malformed_schedule_and_url_are_rejected() {
    let mut raw = raw_with_secret();
    raw.seeding.countries_schedule = Some("weekly".to_string());
    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "seeding.countries_schedule",
            ..
        }
    ));

    let mut raw = raw_with_secret();
    raw.seeding.countries_api_url = Some("ftp://example.com".to_string());
    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "seeding.countries_api_url",
            ..
        }
    ));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = raw_with_secret();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn auth_settings_debug_hides_the_secret() {
    let settings = Settings::from_raw(raw_with_secret()).expect("valid settings");
    let rendered = format!("{:?}", settings.auth);
    assert!(!rendered.contains(SECRET));
    assert!(rendered.contains("redacted"));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::try_parse_from(["travelpro"]).expect("parse");
    assert!(args.command.is_none());
}

#[test]
fn parse_populate_arguments() {
    let args = CliArgs::try_parse_from([
        "travelpro",
        "populate",
        "--database-url",
        "postgres://localhost/travel",
        "destinations",
    ])
    .expect("parse");

    match args.command {
        Some(Command::Populate(populate)) => {
            assert_eq!(populate.target, PopulateTarget::Destinations);
            assert_eq!(
                populate.database.database_url.as_deref(),
                Some("postgres://localhost/travel")
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn populate_override_only_touches_the_database() {
    let mut raw = raw_with_secret();
    raw.server.port = Some(9000);
    raw.apply_database_override(&DatabaseOverride {
        database_url: Some("postgres://db/travel".to_string()),
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 9000);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://db/travel")
    );
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::try_parse_from([
        "travelpro",
        "serve",
        "--server-port",
        "9090",
        "--cache-enabled",
        "false",
        "--seeding-enabled",
        "no",
        "--auth-jwt-secret",
        SECRET,
    ])
    .expect("parse");

    let Some(Command::Serve(serve)) = args.command else {
        panic!("expected serve command");
    };
    assert_eq!(serve.overrides.server_port, Some(9090));
    assert_eq!(serve.overrides.cache_enabled, Some(false));
    assert_eq!(serve.overrides.seeding_enabled, Some(false));
    assert_eq!(serve.overrides.auth_jwt_secret.as_deref(), Some(SECRET));
}

#[test]
fn cache_ttl_table_overrides_listed_regions() {
    let mut raw = raw_with_secret();
    raw.cache.default_ttl_seconds = Some(42);
    raw.cache.ttl = Some(BTreeMap::from([
        ("blogposts".to_string(), 120),
        ("topDestinations".to_string(), 60),
    ]));
    let settings = Settings::from_raw(raw).expect("valid settings");

    let cache = crate::cache::CacheConfig::from(&settings.cache);
    assert_eq!(
        cache.ttl_for(CacheRegion::BlogPosts),
        Duration::from_secs(120)
    );
    assert_eq!(
        cache.ttl_for(CacheRegion::TopDestinations),
        Duration::from_secs(60)
    );
    assert_eq!(
        cache.ttl_for(CacheRegion::Destination),
        Duration::from_secs(42)
    );
}

#[test]
fn cache_ttl_table_rejects_unknown_regions_and_zero() {
    let mut raw = raw_with_secret();
    raw.cache.ttl = Some(BTreeMap::from([("comments".to_string(), 60)]));
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { key: "cache.ttl", .. }));
    assert!(err.to_string().contains("comments"));

    let mut raw = raw_with_secret();
    raw.cache.ttl = Some(BTreeMap::from([("blogPost".to_string(), 0)]));
    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "cache.ttl",
            ..
        }
    ));
}

#[test]
fn shipped_defaults_file_lists_every_region() {
    let raw: RawSettings = Config::builder()
        .add_source(File::from_str(
            include_str!("../../config/default.toml"),
            config::FileFormat::Toml,
        ))
        .build()
        .expect("defaults build")
        .try_deserialize()
        .expect("defaults deserialize");
    let ttls = build_region_ttls(raw.cache.ttl.expect("ttl table")).expect("valid table");
    for region in CacheRegion::ALL {
        assert!(ttls.contains_key(&region), "missing {region}");
    }
    assert_eq!(ttls[&CacheRegion::FeaturedDestinations], Duration::from_secs(21600));
}
