//! reqwest-backed listing source.

use async_trait::async_trait;
use bonchan_api_types::CategoryListDto;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::application::repos::{ListingFeed, ListingQuery, ListingSource, SourceError};
use crate::config::ApiSettings;
use crate::domain::entities::Category;

use super::error::InfraError;

pub const PAGE_NUMBER_PARAM: &str = "PageNumber";
pub const PAGE_SIZE_PARAM: &str = "PageSize";

#[derive(Clone, Debug)]
pub struct HttpListingSource {
    client: Client,
    posts_url: Url,
    pets_url: Url,
    categories_url: Url,
}

impl HttpListingSource {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()?;

        let mut base = settings.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = |path: &str| {
            base.join(path.trim_start_matches('/')).map_err(|err| {
                InfraError::configuration(format!("invalid endpoint path `{path}`: {err}"))
            })
        };

        Ok(Self {
            client,
            posts_url: endpoint(&settings.posts_path)?,
            pets_url: endpoint(&settings.pets_path)?,
            categories_url: endpoint(&settings.categories_path)?,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("bonchan/", env!("CARGO_PKG_VERSION"))
    }

    pub fn listing_url(&self, query: &ListingQuery) -> Url {
        let mut url = match query.feed {
            ListingFeed::Posts => self.posts_url.clone(),
            ListingFeed::Pets => self.pets_url.clone(),
        };
        if !query.is_unpaged() {
            let mut pairs = url.query_pairs_mut();
            if let Some(page_number) = query.page_number {
                pairs.append_pair(PAGE_NUMBER_PARAM, &page_number.to_string());
            }
            if let Some(page_size) = query.page_size {
                pairs.append_pair(PAGE_SIZE_PARAM, &page_size.to_string());
            }
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value, SourceError> {
        debug!(%url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SourceError::unreachable)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(SourceError::unreachable)?;
        if !status.is_success() {
            return Err(SourceError::Server {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(SourceError::decode)
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self, query: &ListingQuery) -> Result<Value, SourceError> {
        self.get_json(self.listing_url(query)).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        let body = self.get_json(self.categories_url.clone()).await?;
        let categories: CategoryListDto =
            serde_json::from_value(body).map_err(SourceError::decode)?;
        Ok(categories
            .into_vec()
            .into_iter()
            .map(|dto| Category::new(dto.category_id, dto.category_name.trim()))
            .collect())
    }
}
