//! Predicate filtering over normalized adoption records.

use std::sync::Arc;

use tracing::debug;

use crate::application::categories::CategoryResolver;
use crate::domain::entities::AdoptionRecord;
use crate::domain::types::{AdoptionStatus, Gender};

/// Sentinel filter value meaning "do not constrain".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }

    /// Read a filter-control value, mapping the sentinel and blank input to `All`.
    pub fn from_input(raw: &str, parse: impl FnOnce(&str) -> T) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Selection::All
        } else {
            Selection::Only(parse(trimmed))
        }
    }
}

impl Selection<String> {
    pub fn text(raw: &str) -> Self {
        Self::from_input(raw, str::to_string)
    }
}

/// Category constraint. The home carousel selects by id and needs the resolver; the
/// gallery selects by name and compares labels directly. Call sites pick one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Id(i64),
    Name(String),
    /// An id picked on a name-based surface whose label is not known yet. Matches nothing
    /// until the listing view swaps in the label.
    PendingName(i64),
}

/// Snapshot of the user's filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub category: CategorySelection,
    pub age: Selection<String>,
    pub gender: Selection<Gender>,
    pub status: Selection<AdoptionStatus>,
    pub location: Selection<String>,
    pub search: String,
}

impl FilterState {
    /// Reset every control to "all" and clear the search box.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = Vec::new();
        match &self.category {
            CategorySelection::All => {}
            CategorySelection::Id(id) => predicates.push(Predicate::CategoryId(*id)),
            CategorySelection::Name(name) => {
                predicates.push(Predicate::CategoryName(name.as_str()));
            }
            CategorySelection::PendingName(_) => predicates.push(Predicate::Unresolved),
        }
        if let Some(age) = self.age.only() {
            predicates.push(Predicate::AgeBracket(age.as_str()));
        }
        if let Some(gender) = self.gender.only() {
            predicates.push(Predicate::Gender(*gender));
        }
        if let Some(status) = self.status.only() {
            predicates.push(Predicate::Status(status));
        }
        if let Some(location) = self.location.only() {
            predicates.push(Predicate::Location(location.trim().to_lowercase()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            predicates.push(Predicate::Search(search.to_lowercase()));
        }
        predicates
    }
}

#[derive(Debug)]
enum Predicate<'a> {
    CategoryId(i64),
    CategoryName(&'a str),
    Unresolved,
    AgeBracket(&'a str),
    Gender(Gender),
    Status(&'a AdoptionStatus),
    Location(String),
    Search(String),
}

impl Predicate<'_> {
    fn matches(&self, record: &AdoptionRecord, categories: &CategoryResolver) -> bool {
        match self {
            Predicate::CategoryId(id) => match categories.id_for_name(&record.category_name) {
                Some(resolved) => resolved == *id,
                None => {
                    if !categories.is_empty() {
                        debug!(
                            key = %record.key,
                            category = %record.category_name,
                            "category lookup miss"
                        );
                    }
                    false
                }
            },
            Predicate::CategoryName(name) => record.category_name == *name,
            Predicate::Unresolved => false,
            Predicate::AgeBracket(label) => record.age.bracket() == Some(*label),
            Predicate::Gender(gender) => record.gender == *gender,
            Predicate::Status(status) => record.adoption_status == **status,
            Predicate::Location(needle) => record
                .places()
                .any(|place| place.to_lowercase().contains(needle.as_str())),
            Predicate::Search(needle) => record.name.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Applies a [`FilterState`] to a normalized sequence.
pub struct FilterEngine;

impl FilterEngine {
    /// Keep the records matching every active predicate, in their original order.
    pub fn apply(
        records: &[Arc<AdoptionRecord>],
        state: &FilterState,
        categories: &CategoryResolver,
    ) -> Vec<Arc<AdoptionRecord>> {
        let predicates = state.predicates();
        if predicates.is_empty() {
            return records.to_vec();
        }
        if categories.is_empty() && matches!(state.category, CategorySelection::Id(_)) {
            debug!("categories not loaded; id category filter matches nothing yet");
        }

        records
            .iter()
            .filter(|record| {
                predicates
                    .iter()
                    .all(|predicate| predicate.matches(record, categories))
            })
            .cloned()
            .collect()
    }
}
