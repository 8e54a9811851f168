use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use uuid::Uuid;

use crate::domain::types::{CampaignStatus, Category, Platform};

/// Command-line arguments for the creatorhub operator binary.
#[derive(Debug, Parser)]
#[command(
    name = "creatorhub",
    version,
    about = "Campaign lifecycle and query cache operator tool"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CREATORHUB_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: RuntimeOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Verify the lifecycle table and ping the configured stores.
    Check,
    /// Print one page of campaigns as JSON.
    List(ListArgs),
    /// Print recommended campaigns for a creator as JSON.
    Recommend(RecommendArgs),
}

/// Overrides applied on top of file and environment configuration.
#[derive(Debug, Args, Default, Clone)]
pub struct RuntimeOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL", global = true)]
    pub database_url: Option<String>,

    /// Override the cache backend (memory|redis).
    #[arg(long = "cache-backend", value_name = "BACKEND", global = true)]
    pub cache_backend: Option<String>,

    /// Override the Redis connection URL.
    #[arg(long = "redis-url", value_name = "URL", global = true)]
    pub redis_url: Option<String>,

    /// Bypass the query cache entirely.
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ListArgs {
    #[arg(long, value_name = "STATUS")]
    pub status: Option<CampaignStatus>,

    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Required platform; repeat for several.
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<Platform>,

    /// Interest tag; campaigns sharing any of them match.
    #[arg(long = "interest", value_name = "TAG")]
    pub interests: Vec<String>,

    /// Region tag; campaigns sharing any of them match.
    #[arg(long = "region", value_name = "TAG")]
    pub regions: Vec<String>,

    #[arg(long = "budget-min", value_name = "AMOUNT")]
    pub budget_min: Option<f64>,

    #[arg(long = "budget-max", value_name = "AMOUNT")]
    pub budget_max: Option<f64>,

    /// Case-insensitive text matched against title and description.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    #[arg(long, value_name = "N")]
    pub page: Option<u32>,

    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct RecommendArgs {
    /// Creator to recommend campaigns for.
    #[arg(long = "actor", value_name = "UUID")]
    pub actor: Uuid,
}
