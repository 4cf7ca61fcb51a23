//! View models handed to the render surface.

use serde::Serialize;

use crate::application::{
    categories::{CategoryOption, CategoryOptionValue},
    listing::{ListingSnapshot, ListingStatus},
    pagination::PageLink,
};
use crate::domain::{
    entities::{AdoptionRecord, RecordKey},
    types::{Age, AgeUnit},
};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
pub const FALLBACK_BADGE: &str = "Khác";
pub const UNKNOWN_AGE: &str = "Chưa rõ tuổi";
pub const UNKNOWN_AREA: &str = "Chưa rõ khu vực";
pub const UNNAMED_PET: &str = "Chưa đặt tên";
pub const URGENT_PREFIX: &str = "Khẩn cấp · ";

/// One pet card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub image: String,
    pub title: String,
    pub badge_text: String,
    pub gender_text: String,
    pub age_location_text: String,
    pub area_text: String,
    pub status_text: String,
    /// Post id for public cards, pet id for staff pet rows.
    pub navigation_key: RecordKey,
}

impl CardView {
    pub fn from_record(record: &AdoptionRecord) -> Self {
        Self {
            image: record
                .primary_image()
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
            title: card_title(record),
            badge_text: non_empty_or(&record.category_name, FALLBACK_BADGE),
            gender_text: record.gender.display_label().to_string(),
            age_location_text: age_text(&record.age, record.age_unit),
            area_text: area_text(record),
            status_text: status_text(record),
            navigation_key: record.key,
        }
    }

    pub fn detail_path(&self) -> String {
        self.navigation_key.detail_path()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn card_title(record: &AdoptionRecord) -> String {
    let fallback = record.title.as_deref().unwrap_or(UNNAMED_PET);
    non_empty_or(&record.name, fallback)
}

fn age_text(age: &Age, unit: Option<AgeUnit>) -> String {
    match age {
        Age::Numeric(value) => {
            let unit = unit.unwrap_or(AgeUnit::Years).display_label();
            if value.fract() == 0.0 {
                format!("{value:.0} {unit}")
            } else {
                format!("{value} {unit}")
            }
        }
        Age::Bracket(label) => label.clone(),
        Age::Unknown => UNKNOWN_AGE.to_string(),
    }
}

fn area_text(record: &AdoptionRecord) -> String {
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let district = present(&record.district);
    let city = present(&record.city);

    match (district, city) {
        (Some(district), Some(city)) => format!("{district} {city}").trim().to_string(),
        (district, city) => present(&record.location)
            .or(city)
            .or(district)
            .unwrap_or_else(|| UNKNOWN_AREA.to_string()),
    }
}

fn status_text(record: &AdoptionRecord) -> String {
    let label = record.adoption_status.display_label();
    if record.is_urgent {
        format!("{URGENT_PREFIX}{label}")
    } else {
        label.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOptionView {
    pub id: Option<i64>,
    pub label: String,
}

impl From<&CategoryOption> for CategoryOptionView {
    fn from(option: &CategoryOption) -> Self {
        let id = match option.value {
            CategoryOptionValue::All => None,
            CategoryOptionValue::Id(id) => Some(id),
        };
        Self {
            id,
            label: option.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListView {
    pub options: Vec<CategoryOptionView>,
}

impl CategoryListView {
    pub fn new(options: &[CategoryOption]) -> Self {
        Self {
            options: options.iter().map(CategoryOptionView::from).collect(),
        }
    }
}

/// One rendered frame of a listing surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPageView {
    pub view: &'static str,
    pub status: &'static str,
    pub failure: Option<&'static str>,
    pub retryable: bool,
    pub message: Option<&'static str>,
    pub cards: Vec<CardView>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub window: Vec<PageLink>,
}

impl ListingPageView {
    pub fn from_snapshot(snapshot: &ListingSnapshot) -> Self {
        let (failure, retryable) = match snapshot.status {
            ListingStatus::Failed(kind) => (Some(kind.as_str()), kind.retryable()),
            _ => (None, false),
        };
        let message = match snapshot.status {
            ListingStatus::Loading => Some("Đang tải danh sách thú cưng..."),
            ListingStatus::Failed(_) => Some("Không thể tải danh sách. Vui lòng thử lại."),
            ListingStatus::NoMatches => {
                Some("Không tìm thấy thú cưng phù hợp. Hãy xóa bộ lọc để xem tất cả.")
            }
            ListingStatus::Ready => None,
        };
        let page = snapshot.page;

        Self {
            view: snapshot.variant.as_str(),
            status: snapshot.status.as_str(),
            failure,
            retryable,
            message,
            cards: snapshot
                .records
                .iter()
                .map(|record| CardView::from_record(record))
                .collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_matches: snapshot.total_matches,
            has_previous: page.current_page > 1,
            has_next: page.current_page < page.total_pages,
            window: snapshot.window.clone(),
        }
    }
}
