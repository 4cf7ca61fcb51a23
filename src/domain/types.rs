//! Domain enumerations parsed from the backend's free-text labels.
//!
//! The backend mixes English codes ("Available") with Vietnamese display labels
//! ("Có thể nhận nuôi"), so every parser here is case-insensitive and accepts both.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Moderation state of an adoption post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl PostStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "pending" | "chờ duyệt" => PostStatus::Pending,
            "approved" | "đã duyệt" => PostStatus::Approved,
            "rejected" | "từ chối" => PostStatus::Rejected,
            _ => PostStatus::Other(trimmed.to_string()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, PostStatus::Rejected)
    }
}

/// Adoption state of the animal itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    Available,
    Pending,
    Adopted,
    Other(String),
}

impl AdoptionStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "available" | "có thể nhận nuôi" | "có sẵn" => AdoptionStatus::Available,
            "pending" | "đang xử lý" => AdoptionStatus::Pending,
            "adopted" | "đã nhận nuôi" => AdoptionStatus::Adopted,
            _ => AdoptionStatus::Other(trimmed.to_string()),
        }
    }

    /// Whether the animal may be shown on public listings.
    pub fn is_available(&self) -> bool {
        matches!(self, AdoptionStatus::Available)
    }

    pub fn display_label(&self) -> &str {
        match self {
            AdoptionStatus::Available => "Có sẵn",
            AdoptionStatus::Pending => "Đang xử lý",
            AdoptionStatus::Adopted => "Đã nhận nuôi",
            AdoptionStatus::Other(label) => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "đực" | "male" | "m" => Gender::Male,
            "cái" | "female" | "f" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            Gender::Male => "Đực",
            Gender::Female => "Cái",
            Gender::Unspecified => "Không rõ",
        }
    }
}

/// Pet age, which the backend sends either as a number or as a bracket label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Age {
    Numeric(f64),
    Bracket(String),
    Unknown,
}

impl Age {
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Age::Unknown;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Age::Numeric(value),
            _ => Age::Bracket(trimmed.to_string()),
        }
    }

    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            Age::Numeric(value)
        } else {
            Age::Unknown
        }
    }

    /// Free-text bracket label, if the age was sent as one.
    pub fn bracket(&self) -> Option<&str> {
        match self {
            Age::Bracket(label) => Some(label.as_str()),
            _ => None,
        }
    }
}

/// Unit attached to a numeric age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    Months,
    Years,
}

impl AgeUnit {
    /// Parse a unit label; anything unrecognised is read as years.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "month" | "months" | "tháng" => AgeUnit::Months,
            _ => AgeUnit::Years,
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            AgeUnit::Months => "tháng",
            AgeUnit::Years => "tuổi",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}
