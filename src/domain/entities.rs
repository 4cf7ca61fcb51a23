//! Domain entities built from backend payloads.

use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::{AdoptionStatus, Age, AgeUnit, Gender, PostStatus};

/// Identity a record is navigated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RecordKey {
    /// A public adoption post.
    Post(i64),
    /// A pet row from the staff pet endpoint, which carries no post.
    Pet(i64),
}

impl RecordKey {
    pub fn id(self) -> i64 {
        match self {
            RecordKey::Post(id) | RecordKey::Pet(id) => id,
        }
    }

    pub fn detail_path(self) -> String {
        match self {
            RecordKey::Post(id) => format!("/pets/{id}"),
            RecordKey::Pet(id) => format!("/staff/manage-pets/{id}"),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Post(id) => write!(f, "post:{id}"),
            RecordKey::Pet(id) => write!(f, "pet:{id}"),
        }
    }
}

/// One adoptable animal, either attached to a public adoption post or listed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AdoptionRecord {
    pub key: RecordKey,
    pub pet_id: i64,
    pub name: String,
    pub title: Option<String>,
    pub category_name: String,
    pub breed_name: Option<String>,
    pub gender: Gender,
    pub age: Age,
    pub age_unit: Option<AgeUnit>,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub adoption_status: AdoptionStatus,
    /// `None` for pet rows, which have no post.
    pub post_status: Option<PostStatus>,
    pub is_urgent: bool,
    pub adoption_fee: Option<f64>,
    pub slug: Option<String>,
    pub created_date: Option<OffsetDateTime>,
}

impl AdoptionRecord {
    pub fn post_id(&self) -> Option<i64> {
        match self.key {
            RecordKey::Post(id) => Some(id),
            RecordKey::Pet(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.post_status
            .as_ref()
            .is_some_and(PostStatus::is_rejected)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// The textual places this record is associated with, most specific first.
    pub fn places(&self) -> impl Iterator<Item = &str> {
        [&self.district, &self.city, &self.location]
            .into_iter()
            .filter_map(|place| place.as_deref())
            .map(str::trim)
            .filter(|place| !place.is_empty())
    }
}

/// A category as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
