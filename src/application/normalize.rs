//! Normalization of raw listing payloads into adoption records.
//!
//! The backend wraps post listings in one of three envelopes. [`ResponseShape`] resolves
//! them in a fixed order; an unrecognised envelope is an error, never an empty listing.

use std::sync::Arc;

use bonchan_api_types::{AdoptionPostDto, AgeDto, ImageUrlsDto, PetDto};
use metrics::counter;
use serde_json::Value;
use thiserror::Error;
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};
use tracing::{debug, trace};

use crate::domain::entities::{AdoptionRecord, RecordKey};
use crate::domain::types::{AdoptionStatus, Age, AgeUnit, Gender, PostStatus};

pub(crate) const METRIC_DROPPED_RECORDS: &str = "bonchan_listing_dropped_record_total";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error(
        "invalid response shape: expected an array, a `data` array or a `data.items` array, found {found}"
    )]
    InvalidShape { found: &'static str },
}

/// Envelopes a post listing may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `[...]`
    BareArray,
    /// `{"data": [...]}`
    DataArray,
    /// `{"data": {"items": [...]}}`
    DataItems,
}

impl ResponseShape {
    pub const RESOLUTION_ORDER: [ResponseShape; 3] = [
        ResponseShape::BareArray,
        ResponseShape::DataArray,
        ResponseShape::DataItems,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseShape::BareArray => "bare_array",
            ResponseShape::DataArray => "data_array",
            ResponseShape::DataItems => "data_items",
        }
    }

    fn extract(self, body: &Value) -> Option<&[Value]> {
        let array = match self {
            ResponseShape::BareArray => body.as_array(),
            ResponseShape::DataArray => body.get("data")?.as_array(),
            ResponseShape::DataItems => body.get("data")?.get("items")?.as_array(),
        };
        array.map(Vec::as_slice)
    }

    /// Resolve the first envelope that matches `body`.
    pub fn resolve(body: &Value) -> Result<(ResponseShape, &[Value]), NormalizeError> {
        Self::RESOLUTION_ORDER
            .into_iter()
            .find_map(|shape| shape.extract(body).map(|items| (shape, items)))
            .ok_or(NormalizeError::InvalidShape {
                found: json_kind(body),
            })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(map) => match map.get("data") {
            None => "an object without `data`",
            Some(Value::Object(_)) => "a `data` object without an `items` array",
            Some(_) => "a `data` field that is not a list",
        },
    }
}

/// Entry kinds a listing array may hold, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// An adoption post with its pet nested under `pet`.
    Post,
    /// A bare pet, as the staff pet endpoint serves them.
    Pet,
}

impl ElementShape {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementShape::Post => "post",
            ElementShape::Pet => "pet",
        }
    }

    /// `None` when `item` is not this kind of entry at all.
    fn decode(self, item: &Value) -> Option<Result<AdoptionRecord, DropReason>> {
        match self {
            ElementShape::Post => serde_json::from_value::<AdoptionPostDto>(item.clone())
                .ok()
                .map(|post| record_from_post(post).ok_or(DropReason::MissingPet)),
            ElementShape::Pet => serde_json::from_value::<PetDto>(item.clone())
                .ok()
                .map(|pet| Ok(record_from_pet(pet))),
        }
    }
}

/// Who the listing is for, which decides the accepted entries and the listability rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Audience {
    /// Public pages: approved-or-pending posts whose pet is available.
    #[default]
    Public,
    /// Staff tables: every non-rejected post or bare pet, whatever its adoption state.
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    Malformed,
    MissingPet,
    Rejected,
    Unavailable,
}

impl DropReason {
    fn as_str(self) -> &'static str {
        match self {
            DropReason::Malformed => "malformed",
            DropReason::MissingPet => "missing_pet",
            DropReason::Rejected => "rejected",
            DropReason::Unavailable => "unavailable",
        }
    }
}

impl Audience {
    pub fn element_shapes(self) -> &'static [ElementShape] {
        match self {
            Audience::Public => &[ElementShape::Post],
            Audience::Staff => &[ElementShape::Post, ElementShape::Pet],
        }
    }

    fn admits(self, record: &AdoptionRecord) -> Result<(), DropReason> {
        if record.is_rejected() {
            return Err(DropReason::Rejected);
        }
        match self {
            Audience::Public if !record.adoption_status.is_available() => {
                Err(DropReason::Unavailable)
            }
            _ => Ok(()),
        }
    }
}

/// Turns raw listing bodies into the ordered sequence of listable records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordNormalizer {
    audience: Audience,
}

impl RecordNormalizer {
    pub fn new(audience: Audience) -> Self {
        Self { audience }
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    /// A non-empty array in which no entry decodes as an accepted kind is rejected as
    /// [`NormalizeError::InvalidShape`], like an unknown envelope.
    pub fn normalize(&self, body: &Value) -> Result<Vec<Arc<AdoptionRecord>>, NormalizeError> {
        let (shape, items) = ResponseShape::resolve(body)?;

        let mut records = Vec::with_capacity(items.len());
        let mut dropped = 0_u64;
        let mut malformed = 0_usize;
        for (index, item) in items.iter().enumerate() {
            match self.admit(item) {
                Ok(record) => records.push(Arc::new(record)),
                Err(reason) => {
                    dropped += 1;
                    if reason == DropReason::Malformed {
                        malformed += 1;
                    }
                    trace!(index, reason = reason.as_str(), "dropping listing entry");
                }
            }
        }

        if !items.is_empty() && malformed == items.len() {
            debug!(
                shape = shape.as_str(),
                received = items.len(),
                audience = ?self.audience,
                "no listing entry decoded"
            );
            return Err(NormalizeError::InvalidShape {
                found: "an array whose entries are not listing entries",
            });
        }

        if dropped > 0 {
            counter!(METRIC_DROPPED_RECORDS).increment(dropped);
        }
        debug!(
            shape = shape.as_str(),
            received = items.len(),
            kept = records.len(),
            dropped,
            "normalized listing payload"
        );

        Ok(records)
    }

    fn admit(&self, item: &Value) -> Result<AdoptionRecord, DropReason> {
        let record = self
            .audience
            .element_shapes()
            .iter()
            .find_map(|shape| shape.decode(item))
            .unwrap_or(Err(DropReason::Malformed))?;
        self.audience.admits(&record)?;
        Ok(record)
    }
}

fn record_from_post(post: AdoptionPostDto) -> Option<AdoptionRecord> {
    let AdoptionPostDto {
        post_id,
        title,
        adoption_fee,
        location,
        city,
        district,
        post_status,
        is_urgent,
        created_date,
        pet,
        ..
    } = post;
    let pet = record_from_pet(pet?);

    Some(AdoptionRecord {
        key: RecordKey::Post(post_id),
        title: non_blank(title),
        location: non_blank(location).or(pet.location),
        city: non_blank(city),
        district: non_blank(district),
        post_status: Some(PostStatus::parse(
            post_status.as_deref().unwrap_or_default(),
        )),
        is_urgent: is_urgent.unwrap_or(false),
        adoption_fee,
        created_date: created_date
            .as_deref()
            .and_then(parse_created_date)
            .or(pet.created_date),
        ..pet
    })
}

fn record_from_pet(pet: PetDto) -> AdoptionRecord {
    let PetDto {
        pet_id,
        pet_name,
        age,
        age_unit,
        gender,
        adoption_status,
        location,
        category_name,
        breed_name,
        image_urls,
        slug,
        created_date,
        ..
    } = pet;

    let age = match age {
        Some(AgeDto::Number(value)) => Age::from_number(value),
        Some(AgeDto::Text(text)) => Age::from_text(&text),
        None => Age::Unknown,
    };

    AdoptionRecord {
        key: RecordKey::Pet(pet_id),
        pet_id,
        name: non_blank(pet_name).unwrap_or_default(),
        title: None,
        category_name: non_blank(category_name).unwrap_or_default(),
        breed_name: non_blank(breed_name),
        gender: gender.as_deref().map_or(Gender::Unspecified, Gender::parse),
        age,
        age_unit: non_blank(age_unit).map(|unit| AgeUnit::parse(&unit)),
        images: image_urls.map(ImageUrlsDto::into_urls).unwrap_or_default(),
        location: non_blank(location),
        city: None,
        district: None,
        adoption_status: AdoptionStatus::parse(adoption_status.as_deref().unwrap_or_default()),
        post_status: None,
        is_urgent: false,
        adoption_fee: None,
        slug: non_blank(slug),
        created_date: created_date.as_deref().and_then(parse_created_date),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Parse RFC 3339, or the offset-less timestamps the backend emits, read as UTC.
pub(crate) fn parse_created_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    let with_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let without_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw, with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(raw, without_fraction))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(post_id: i64, adoption_status: &str, post_status: &str) -> Value {
        json!({
            "postId": post_id,
            "postStatus": post_status,
            "pet": {
                "petId": post_id * 10,
                "petName": format!("pet-{post_id}"),
                "adoptionStatus": adoption_status,
                "categoryName": "Chó"
            }
        })
    }

    fn ids(records: &[Arc<AdoptionRecord>]) -> Vec<i64> {
        records.iter().map(|record| record.key.id()).collect()
    }

    #[test]
    fn all_envelopes_yield_identical_records() {
        let items = json!([
            post(1, "Available", "Approved"),
            post(2, "Available", "Pending"),
        ]);
        let normalizer = RecordNormalizer::default();

        let bare = normalizer.normalize(&items).expect("bare array");
        let data = normalizer
            .normalize(&json!({ "data": items.clone() }))
            .expect("data array");
        let nested = normalizer
            .normalize(&json!({ "data": { "items": items.clone(), "totalCount": 2 } }))
            .expect("data.items array");

        assert_eq!(ids(&bare), vec![1, 2]);
        assert_eq!(bare, data);
        assert_eq!(bare, nested);
    }

    #[test]
    fn unknown_envelope_is_an_error_not_an_empty_listing() {
        let normalizer = RecordNormalizer::default();

        for body in [
            json!({ "items": [] }),
            json!({ "data": { "rows": [] } }),
            json!({ "data": "oops" }),
            json!(null),
        ] {
            let err = normalizer.normalize(&body).expect_err("shape rejected");
            assert!(matches!(err, NormalizeError::InvalidShape { .. }));
        }
    }

    #[test]
    fn empty_array_is_a_valid_empty_listing() {
        let records = RecordNormalizer::default()
            .normalize(&json!({ "data": [] }))
            .expect("empty listing");
        assert!(records.is_empty());
    }

    #[test]
    fn public_audience_drops_unlistable_entries() {
        let body = json!([
            post(1, "Available", "Approved"),
            post(2, "Adopted", "Approved"),
            post(3, "Available", "Rejected"),
            { "postId": 4, "pet": null },
            { "postId": 5 },
            "not an object",
            { "pet": { "petId": 6 } },
            post(7, "có thể nhận nuôi", "approved"),
        ]);

        let records = RecordNormalizer::default()
            .normalize(&body)
            .expect("normalized");

        assert_eq!(ids(&records), vec![1, 7]);
    }

    #[test]
    fn staff_audience_keeps_unavailable_but_not_rejected() {
        let body = json!([
            post(1, "Available", "Approved"),
            post(2, "Adopted", "Approved"),
            post(3, "Pending", "Rejected"),
        ]);

        let records = RecordNormalizer::new(Audience::Staff)
            .normalize(&body)
            .expect("normalized");

        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn staff_audience_reads_bare_pets_from_the_pet_endpoint() {
        let body = json!({ "data": [
            {
                "petId": 11,
                "petName": "Mun",
                "age": 2,
                "breed": "Mèo ta",
                "adoptionStatus": "Available",
                "categoryName": "Mèo",
                "location": "Thủ Đức",
                "petImageUrls": "https://cdn.example/mun.png",
                "createdDate": "2025-03-01T10:00:00"
            },
            {
                "petId": 12,
                "petName": "Bông",
                "adoptionStatus": "Đã nhận nuôi",
                "categoryName": "Chó",
                "petImageUrls": null
            }
        ]});

        let records = RecordNormalizer::new(Audience::Staff)
            .normalize(&body)
            .expect("normalized");

        assert_eq!(
            records.iter().map(|record| record.key).collect::<Vec<_>>(),
            vec![RecordKey::Pet(11), RecordKey::Pet(12)]
        );
        let mun = &records[0];
        assert_eq!(mun.post_id(), None);
        assert_eq!(mun.post_status, None);
        assert_eq!(mun.breed_name.as_deref(), Some("Mèo ta"));
        assert_eq!(mun.age, Age::Numeric(2.0));
        assert_eq!(mun.location.as_deref(), Some("Thủ Đức"));
        assert_eq!(mun.primary_image(), Some("https://cdn.example/mun.png"));
        assert!(mun.created_date.is_some());
        assert_eq!(records[1].adoption_status, AdoptionStatus::Adopted);
        assert!(records[1].images.is_empty());
    }

    #[test]
    fn staff_audience_accepts_posts_and_pets_in_one_listing() {
        let body = json!([
            post(1, "Adopted", "Approved"),
            { "petId": 20, "petName": "Mun", "adoptionStatus": "Pending" },
            post(3, "Available", "Rejected"),
        ]);

        let records = RecordNormalizer::new(Audience::Staff)
            .normalize(&body)
            .expect("normalized");

        assert_eq!(
            records.iter().map(|record| record.key).collect::<Vec<_>>(),
            vec![RecordKey::Post(1), RecordKey::Pet(20)]
        );
    }

    #[test]
    fn bare_pets_are_not_public_listing_entries() {
        let body = json!({ "data": [
            { "petId": 11, "petName": "Mun", "adoptionStatus": "Available" }
        ]});

        let err = RecordNormalizer::default()
            .normalize(&body)
            .expect_err("pets are not posts");
        assert!(matches!(err, NormalizeError::InvalidShape { .. }));
    }

    #[test]
    fn array_of_unrecognised_entries_is_an_invalid_shape() {
        for audience in [Audience::Public, Audience::Staff] {
            let err = RecordNormalizer::new(audience)
                .normalize(&json!({ "data": [{ "id": 1 }, "text", 3] }))
                .expect_err("nothing decodes");
            assert!(matches!(err, NormalizeError::InvalidShape { .. }));
        }
    }

    #[test]
    fn filtered_out_entries_still_make_a_valid_empty_listing() {
        let records = RecordNormalizer::default()
            .normalize(&json!([post(1, "Adopted", "Approved"), { "postId": 2 }]))
            .expect("decoded entries");
        assert!(records.is_empty());
    }

    #[test]
    fn record_fields_are_mapped_from_post_and_pet() {
        let body = json!([{
            "postId": 42,
            "title": " Tìm nhà cho Mực ",
            "location": "",
            "city": "Hà Nội",
            "district": "Cầu Giấy",
            "postStatus": "Approved",
            "isUrgent": true,
            "adoptionFee": 150000.0,
            "createdDate": "2025-04-10T08:30:00.123",
            "pet": {
                "petId": 9,
                "petName": "Mực",
                "age": "6",
                "ageUnit": "tháng",
                "gender": "Cái",
                "adoptionStatus": "Available",
                "location": "Hà Nội",
                "categoryName": "Mèo",
                "breedName": "Mèo ta",
                "imageUrls": ["https://cdn.example/muc.png"]
            }
        }]);

        let records = RecordNormalizer::default()
            .normalize(&body)
            .expect("normalized");
        let record = records.first().expect("one record");

        assert_eq!(record.key, RecordKey::Post(42));
        assert_eq!(record.pet_id, 9);
        assert_eq!(record.post_status, Some(PostStatus::Approved));
        assert_eq!(record.title.as_deref(), Some("Tìm nhà cho Mực"));
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.age, Age::Numeric(6.0));
        assert_eq!(record.age_unit, Some(AgeUnit::Months));
        assert_eq!(record.location.as_deref(), Some("Hà Nội"));
        assert_eq!(record.primary_image(), Some("https://cdn.example/muc.png"));
        assert!(record.is_urgent);
        assert!(record.created_date.is_some());
    }

    #[test]
    fn created_date_accepts_rfc3339_and_naive_timestamps() {
        assert!(parse_created_date("2025-04-10T08:30:00Z").is_some());
        assert!(parse_created_date("2025-04-10T08:30:00+07:00").is_some());
        assert!(parse_created_date("2025-04-10T08:30:00").is_some());
        assert!(parse_created_date("2025-04-10T08:30:00.1234567").is_some());
        assert!(parse_created_date("10/04/2025").is_none());
    }
}
