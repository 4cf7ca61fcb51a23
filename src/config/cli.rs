use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::application::listing::ListingVariant;

/// Command-line arguments for the bonchan binary.
#[derive(Debug, Parser)]
#[command(
    name = "bonchan",
    version,
    about = "Preview adoption listings from the Tìm Bạn Bốn Chân backend"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "BONCHAN_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch, filter and page through adoption posts.
    Browse(Box<BrowseArgs>),
    /// List the category selector options.
    Categories(CategoriesArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the backend base URL.
    #[arg(long = "api-base-url", value_name = "URL", value_hint = ValueHint::Url, global = true)]
    pub api_base_url: Option<String>,

    /// Override the backend request timeout.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

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
}

#[derive(Debug, Args, Clone)]
pub struct BrowseArgs {
    /// Listing surface to emulate (carousel|gallery|staff).
    #[arg(long, value_name = "VIEW", default_value = "gallery")]
    pub view: ListingVariant,

    /// Select a category by id.
    #[arg(long = "category-id", value_name = "ID", conflicts_with = "category")]
    pub category_id: Option<i64>,

    /// Select a category by name.
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Age bracket label, or "all".
    #[arg(long, value_name = "LABEL")]
    pub age: Option<String>,

    /// Gender (male|female|đực|cái), or "all".
    #[arg(long, value_name = "GENDER")]
    pub gender: Option<String>,

    /// Adoption status, or "all".
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Substring of district, city or location.
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Substring of the pet's name.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Page to show after filtering.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Override the page size of the selected view.
    #[arg(long = "page-size", value_name = "COUNT")]
    pub page_size: Option<usize>,

    /// Ask the backend for one server-side page instead of the full listing.
    #[arg(long = "server-page", value_name = "N")]
    pub server_page: Option<u32>,

    /// Server-side page size sent along with --server-page.
    #[arg(long = "server-page-size", value_name = "COUNT", requires = "server_page")]
    pub server_page_size: Option<u32>,

    /// Print the page as JSON instead of text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

impl Default for BrowseArgs {
    fn default() -> Self {
        Self {
            view: ListingVariant::Gallery,
            category_id: None,
            category: None,
            age: None,
            gender: None,
            status: None,
            location: None,
            search: None,
            page: 1,
            page_size: None,
            server_page: None,
            server_page_size: None,
            json: false,
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct CategoriesArgs {
    /// Print the options as JSON instead of text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}
