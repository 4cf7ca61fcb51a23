use std::process;

use bonchan::{
    application::{
        categories::{CategoryOptionValue, CategoryResolver},
        error::AppError,
        filter::{ALL, CategorySelection, FilterState, Selection},
        listing::{ListingStatus, ListingView},
        repos::{ListingQuery, ListingSource},
        session::ListingSession,
    },
    config::{self, BrowseArgs, CategoriesArgs, Command},
    domain::types::{AdoptionStatus, Gender},
    infra::{http::HttpListingSource, telemetry},
    presentation::views::{CategoryListView, ListingPageView},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let chain = error.chain();
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?chain, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?chain, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(Command::Browse(Box::<BrowseArgs>::default()));

    telemetry::init(&settings.logging)?;
    let source = HttpListingSource::new(&settings.api)?;
    info!(
        base_url = %settings.api.base_url,
        user_agent = HttpListingSource::user_agent(),
        "listing source ready"
    );

    match command {
        Command::Browse(args) => run_browse(&settings, source, *args).await,
        Command::Categories(args) => run_categories(source, args).await,
    }
}

async fn run_browse(
    settings: &config::Settings,
    source: HttpListingSource,
    args: BrowseArgs,
) -> Result<(), AppError> {
    let view = ListingView::with_page_size(args.view, settings.listing.page_size(args.view));
    let query = ListingQuery::feed(args.view.feed());
    let query = match args.server_page {
        Some(page_number) => query.with_page(page_number, args.server_page_size),
        None => query,
    };
    let session = ListingSession::new(source, view).with_query(query);

    session.refresh().await;
    session
        .update(|view| {
            let filters = filter_state(view, &args);
            view.set_filter(filters);
            view.go_to(args.page);
        })
        .await;

    let snapshot = session.snapshot().await;
    let page = ListingPageView::from_snapshot(&snapshot);
    emit(&page, args.json)?;

    match snapshot.status {
        ListingStatus::Failed(kind) => Err(AppError::ListingUnavailable(kind)),
        _ => Ok(()),
    }
}

async fn run_categories(source: HttpListingSource, args: CategoriesArgs) -> Result<(), AppError> {
    let categories = source.fetch_categories().await?;
    let resolver = CategoryResolver::new(categories);
    let view = CategoryListView::new(&resolver.selector_options());
    emit(&view, args.json)
}

fn filter_state(view: &ListingView, args: &BrowseArgs) -> FilterState {
    let optional = |value: &Option<String>| value.as_deref().unwrap_or(ALL).to_string();

    let category = match (args.category_id, args.category.as_deref()) {
        (Some(id), _) => view.category_selection(CategoryOptionValue::Id(id)),
        (None, Some(name)) => match Selection::text(name) {
            Selection::All => CategorySelection::All,
            Selection::Only(name) => CategorySelection::Name(name),
        },
        (None, None) => CategorySelection::All,
    };

    FilterState {
        category,
        age: Selection::text(&optional(&args.age)),
        gender: Selection::from_input(&optional(&args.gender), Gender::parse),
        status: Selection::from_input(&optional(&args.status), AdoptionStatus::parse),
        location: Selection::text(&optional(&args.location)),
        search: args.search.clone().unwrap_or_default(),
    }
}

fn emit<T>(value: &T, json: bool) -> Result<(), AppError>
where
    T: Serialize + std::fmt::Display,
{
    if json {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
        println!("{rendered}");
    } else {
        println!("{value}");
    }
    Ok(())
}
