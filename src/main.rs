use std::{process, sync::Arc};

use creatorhub::{
    application::{
        campaigns::{CampaignService, ServiceTimeouts},
        error::AppError,
        repos::{BrandsRepo, CampaignFilter, CampaignsRepo, CampaignsWriteRepo, ProfilesRepo},
    },
    cache::{CacheConfig, CacheStore, MemoryCacheStore, QueryCache, RedisCacheStore},
    config::{self, CacheBackend},
    domain::lifecycle::verify_transition_table,
    infra::{db::PostgresRepositories, error::InfraError, memory::MemoryRepositories, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.summary(), source = report.source, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.summary(), source = report.source, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    match cli_args.command.unwrap_or(config::Command::Check) {
        config::Command::Migrate => run_migrate(&settings).await,
        config::Command::Check => run_check(&settings).await,
        config::Command::List(args) => run_list(&settings, args).await,
        config::Command::Recommend(args) => run_recommend(&settings, args).await,
    }
}

struct Stores {
    reader: Arc<dyn CampaignsRepo>,
    writer: Arc<dyn CampaignsWriteRepo>,
    brands: Arc<dyn BrandsRepo>,
    profiles: Arc<dyn ProfilesRepo>,
    postgres: Option<PostgresRepositories>,
}

async fn init_stores(settings: &config::Settings) -> Result<Stores, AppError> {
    match settings.database.url.as_deref() {
        Some(url) => {
            let pool = PostgresRepositories::connect(
                url,
                settings.database.max_connections.get(),
                settings.database.acquire_timeout,
            )
            .await
            .map_err(InfraError::from)?;
            let repositories = PostgresRepositories::new(pool);
            let shared = Arc::new(repositories.clone());
            Ok(Stores {
                reader: shared.clone(),
                writer: shared.clone(),
                brands: shared.clone(),
                profiles: shared,
                postgres: Some(repositories),
            })
        }
        None => {
            warn!("No database configured; using the in-memory store");
            let shared = Arc::new(MemoryRepositories::new());
            Ok(Stores {
                reader: shared.clone(),
                writer: shared.clone(),
                brands: shared.clone(),
                profiles: shared,
                postgres: None,
            })
        }
    }
}

async fn init_cache(settings: &config::Settings) -> Result<QueryCache, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let store: Arc<dyn CacheStore> = match settings.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(&cache_config)),
        CacheBackend::Redis => {
            let url = settings.cache.redis_url.as_deref().ok_or_else(|| {
                InfraError::configuration("cache.redis_url is required for the redis backend")
            })?;
            Arc::new(RedisCacheStore::connect(url).await.map_err(InfraError::from)?)
        }
    };
    Ok(QueryCache::new(store, cache_config))
}

async fn build_service(settings: &config::Settings) -> Result<(CampaignService, Stores), AppError> {
    let stores = init_stores(settings).await?;
    let cache = init_cache(settings).await?;
    let service = CampaignService::new(
        stores.reader.clone(),
        stores.writer.clone(),
        stores.brands.clone(),
        stores.profiles.clone(),
        cache,
        ServiceTimeouts {
            store: settings.timeouts.store,
        },
    )?;
    Ok((service, stores))
}

async fn run_migrate(settings: &config::Settings) -> Result<(), AppError> {
    let stores = init_stores(settings).await?;
    let repositories = stores.postgres.ok_or_else(|| {
        InfraError::configuration("database.url is required to run migrations")
    })?;

    PostgresRepositories::run_migrations(repositories.pool())
        .await
        .map_err(InfraError::from)?;
    info!("Database migrations applied");
    Ok(())
}

#[derive(Serialize)]
struct CheckReport {
    lifecycle: &'static str,
    database: &'static str,
    cache_backend: &'static str,
    cache_enabled: bool,
}

async fn run_check(settings: &config::Settings) -> Result<(), AppError> {
    verify_transition_table().map_err(|err| AppError::unexpected(err.to_string()))?;

    let (_service, stores) = build_service(settings).await?;
    let database = match stores.postgres.as_ref() {
        Some(repositories) => {
            repositories
                .health_check()
                .await
                .map_err(InfraError::from)?;
            "postgres"
        }
        None => "memory",
    };

    print_json(&CheckReport {
        lifecycle: "ok",
        database,
        cache_backend: match settings.cache.backend {
            CacheBackend::Memory => "memory",
            CacheBackend::Redis => "redis",
        },
        cache_enabled: settings.cache.enabled,
    })
}

async fn run_list(settings: &config::Settings, args: config::ListArgs) -> Result<(), AppError> {
    let (service, _stores) = build_service(settings).await?;
    let filter = CampaignFilter {
        status: args.status,
        category: args.category,
        platforms: args.platforms,
        budget_min: args.budget_min,
        budget_max: args.budget_max,
        interests: args.interests,
        regions: args.regions,
        search: args.search,
        sort: None,
        page: args.page,
        limit: args.limit,
    };

    let envelope = service.list_campaigns(filter).await?;
    print_json(&envelope)
}

async fn run_recommend(
    settings: &config::Settings,
    args: config::RecommendArgs,
) -> Result<(), AppError> {
    let (service, _stores) = build_service(settings).await?;
    let campaigns = service.recommend_campaigns(args.actor).await?;
    print_json(&campaigns)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
