//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroUsize, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::listing::ListingVariant;

mod cli;

pub use cli::{BrowseArgs, CategoriesArgs, CliArgs, Command, GlobalOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "bonchan";
const ENV_PREFIX: &str = "BONCHAN";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/";
const DEFAULT_POSTS_PATH: &str = "adoption-posts";
const DEFAULT_CATEGORIES_PATH: &str = "categories";
const DEFAULT_PETS_PATH: &str = "Pets";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub listing: ListingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub posts_path: String,
    pub categories_path: String,
    /// Bare pet collection read by staff tables.
    pub pets_path: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub carousel_page_size: NonZeroUsize,
    pub gallery_page_size: NonZeroUsize,
    pub staff_page_size: NonZeroUsize,
}

impl ListingSettings {
    pub fn page_size(&self, variant: ListingVariant) -> NonZeroUsize {
        match variant {
            ListingVariant::HomeCarousel => self.carousel_page_size,
            ListingVariant::Gallery => self.gallery_page_size,
            ListingVariant::StaffTable => self.staff_page_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
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

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_global_overrides(&cli.overrides);
    if let Some(Command::Browse(args)) = cli.command.as_ref() {
        raw.apply_browse_overrides(args);
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    listing: RawListingSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_global_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(seconds) = overrides.api_timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_browse_overrides(&mut self, args: &BrowseArgs) {
        let Some(size) = args.page_size else {
            return;
        };
        let slot = match args.view {
            ListingVariant::HomeCarousel => &mut self.listing.carousel_page_size,
            ListingVariant::Gallery => &mut self.listing.gallery_page_size,
            ListingVariant::StaffTable => &mut self.listing.staff_page_size,
        };
        *slot = Some(size);
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            listing,
            logging,
        } = raw;

        let api = build_api_settings(api)?;
        let listing = build_listing_settings(listing)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            api,
            listing,
            logging,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let base_url = Url::parse(raw_url.trim())
        .map_err(|err| LoadError::invalid("api.base_url", format!("`{raw_url}`: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            format!("unsupported scheme `{}`", base_url.scheme()),
        ));
    }

    let posts_path = endpoint_path(api.posts_path, DEFAULT_POSTS_PATH, "api.posts_path")?;
    let categories_path = endpoint_path(
        api.categories_path,
        DEFAULT_CATEGORIES_PATH,
        "api.categories_path",
    )?;
    let pets_path = endpoint_path(api.pets_path, DEFAULT_PETS_PATH, "api.pets_path")?;

    let timeout_seconds = api.timeout_seconds.unwrap_or(DEFAULT_API_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        posts_path,
        categories_path,
        pets_path,
        timeout: Duration::from_secs(timeout_seconds),
    })
}

fn endpoint_path(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    let path = value.unwrap_or_else(|| default.to_string());
    let trimmed = path.trim();
    if trimmed.trim_matches('/').is_empty() {
        return Err(LoadError::invalid(key, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn build_listing_settings(listing: RawListingSettings) -> Result<ListingSettings, LoadError> {
    Ok(ListingSettings {
        carousel_page_size: page_size(
            listing.carousel_page_size,
            ListingVariant::HomeCarousel,
            "listing.carousel_page_size",
        )?,
        gallery_page_size: page_size(
            listing.gallery_page_size,
            ListingVariant::Gallery,
            "listing.gallery_page_size",
        )?,
        staff_page_size: page_size(
            listing.staff_page_size,
            ListingVariant::StaffTable,
            "listing.staff_page_size",
        )?,
    })
}

fn page_size(
    value: Option<usize>,
    variant: ListingVariant,
    key: &'static str,
) -> Result<NonZeroUsize, LoadError> {
    match value {
        None => Ok(variant.default_page_size()),
        Some(value) => NonZeroUsize::new(value)
            .ok_or_else(|| LoadError::invalid(key, "must be greater than zero")),
    }
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

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    posts_path: Option<String>,
    categories_path: Option<String>,
    pets_path: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawListingSettings {
    carousel_page_size: Option<usize>,
    gallery_page_size: Option<usize>,
    staff_page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
