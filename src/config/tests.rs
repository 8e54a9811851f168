use super::*;
use crate::domain::types::{Category, Platform};

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 8);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.backend, CacheBackend::Memory);
    assert_eq!(settings.cache.namespace, "creatorhub");
    assert_eq!(settings.cache.list_ttl, Duration::from_secs(300));
    assert_eq!(settings.cache.recommendation_ttl, Duration::from_secs(3600));
    assert_eq!(settings.cache.recommendation_limit.get(), 10);
    assert_eq!(settings.cache.memory_capacity.get(), 10_000);
    assert_eq!(settings.cache.operation_timeout, Duration::from_millis(250));
    assert_eq!(settings.timeouts.store, Duration::from_millis(2_000));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());
    raw.database.url = Some("postgres://from-file".to_string());

    let overrides = RuntimeOverrides {
        log_level: Some("debug".to_string()),
        database_url: Some("postgres://from-cli".to_string()),
        no_cache: true,
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://from-cli")
    );
    assert!(!settings.cache.enabled);
}

#[test]
fn environment_overrides_file_values() {
    let file = r#"
        [cache]
        list_ttl_seconds = 60
        namespace = "from_file"
    "#;

    let raw: RawSettings = Config::builder()
        .add_source(File::from_str(file, config::FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(Some(
                    [("CREATORHUB__CACHE__NAMESPACE".to_string(), "from_env".to_string())]
                        .into_iter()
                        .collect(),
                )),
        )
        .build()
        .expect("config builds")
        .try_deserialize()
        .expect("raw settings deserialize");

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.cache.namespace, "from_env");
    assert_eq!(settings.cache.list_ttl, Duration::from_secs(60));
}

#[test]
fn redis_backend_requires_url() {
    let mut raw = RawSettings::default();
    raw.cache.backend = Some("redis".to_string());

    let err = Settings::from_raw(raw).expect_err("missing redis url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.redis_url",
            ..
        }
    ));
}

#[test]
fn unknown_backend_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.backend = Some("memcached".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cache.backend",
            ..
        })
    ));
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.list_ttl_seconds = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cache.list_ttl_seconds",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.timeouts.store_ms = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "timeouts.store_ms",
            ..
        })
    ));
}

#[test]
fn namespace_must_be_a_single_segment() {
    let mut raw = RawSettings::default();
    raw.cache.namespace = Some("a:b".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn parse_list_arguments() {
    let args = CliArgs::parse_from([
        "creatorhub",
        "list",
        "--category",
        "Fashion",
        "--platform",
        "instagram",
        "--platform",
        "tiktok",
        "--limit",
        "5",
    ]);

    match args.command.expect("list command") {
        Command::List(list) => {
            assert_eq!(list.category, Some(Category::Fashion));
            assert_eq!(list.platforms, vec![Platform::Instagram, Platform::TikTok]);
            assert_eq!(list.limit, Some(5));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_recommend_with_global_overrides() {
    let args = CliArgs::parse_from([
        "creatorhub",
        "recommend",
        "--actor",
        "00000000-0000-0000-0000-000000000001",
        "--database-url",
        "postgres://example",
    ]);

    assert_eq!(
        args.overrides.database_url.as_deref(),
        Some("postgres://example")
    );
    match args.command.expect("recommend command") {
        Command::Recommend(recommend) => {
            assert_eq!(
                recommend.actor.to_string(),
                "00000000-0000-0000-0000-000000000001"
            );
        }
        _ => panic!("wrong command parsed"),
    }
}
