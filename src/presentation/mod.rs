//! Card view models and their text rendering.

pub mod render;
pub mod views;
