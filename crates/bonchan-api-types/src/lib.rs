//! Wire types for the adoption backend.
//!
//! These mirror the JSON the backend actually sends, including its looser corners: ages
//! arrive as numbers or free-text labels, pet images as a list or a single URL string, and
//! most fields may be `null`. Interpretation of these values lives in the `bonchan` crate.

use serde::{Deserialize, Serialize};

/// One public adoption post with its (optional) attached pet.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionPostDto {
    pub post_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub adoption_fee: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub post_status: Option<String>,
    #[serde(default)]
    pub is_urgent: Option<bool>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub pet: Option<PetDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDto {
    pub pet_id: i64,
    #[serde(default, alias = "name")]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub age: Option<AgeDto>,
    #[serde(default)]
    pub age_unit: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub adoption_status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, alias = "breed")]
    pub breed_name: Option<String>,
    #[serde(default, alias = "petImageUrls")]
    pub image_urls: Option<ImageUrlsDto>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// Pet age as sent by the backend: the public API uses strings, older endpoints numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AgeDto {
    Number(f64),
    Text(String),
}

/// Pet image field, which is a list on post payloads and a single URL on the staff pet
/// endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ImageUrlsDto {
    Many(Vec<String>),
    One(String),
}

impl ImageUrlsDto {
    /// Flatten into an ordered list, dropping blank entries.
    pub fn into_urls(self) -> Vec<String> {
        let urls = match self {
            ImageUrlsDto::Many(urls) => urls,
            ImageUrlsDto::One(url) => vec![url],
        };
        urls.into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_id: i64,
    pub category_name: String,
}

/// Category listing envelope; the endpoint answers either with a bare array or `{data: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryListDto {
    Bare(Vec<CategoryDto>),
    Wrapped { data: Vec<CategoryDto> },
}

impl CategoryListDto {
    pub fn into_vec(self) -> Vec<CategoryDto> {
        match self {
            CategoryListDto::Bare(items) => items,
            CategoryListDto::Wrapped { data } => data,
        }
    }
}
