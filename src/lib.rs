//! Adoption listing pipeline: normalize backend payloads, resolve categories, filter,
//! paginate and project records into pet cards.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
