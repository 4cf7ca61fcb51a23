//! Listing pipeline: normalize, resolve categories, filter, paginate.

pub mod categories;
pub mod error;
pub mod filter;
pub mod listing;
pub mod normalize;
pub mod pagination;
pub mod repos;
pub mod sequence;
pub mod session;
