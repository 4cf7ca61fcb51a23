//! Category name → id resolution.

use std::collections::HashMap;

use bonchan_api_types::CategoryDto;
use tracing::debug;

use crate::domain::entities::Category;

/// Label of the synthetic selector option that matches every category.
pub const ALL_CATEGORIES_LABEL: &str = "Tất cả";

/// Value carried by a category selector option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOptionValue {
    All,
    Id(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: CategoryOptionValue,
    pub label: String,
}

/// Lookup built once per fetched category set.
///
/// An empty resolver is valid: it represents "categories not loaded yet" and resolves
/// nothing, so id-based filters simply match no record until categories arrive.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    categories: Vec<Category>,
    by_name: HashMap<String, i64>,
}

impl CategoryResolver {
    pub fn new(categories: Vec<Category>) -> Self {
        let mut by_name = HashMap::with_capacity(categories.len());
        for category in &categories {
            if let Some(existing) = by_name.get(&category.name) {
                debug!(
                    name = %category.name,
                    kept = existing,
                    ignored = category.id,
                    "duplicate category name in fetched set"
                );
                continue;
            }
            by_name.insert(category.name.clone(), category.id);
        }
        Self {
            categories,
            by_name,
        }
    }

    pub fn from_dtos(dtos: Vec<CategoryDto>) -> Self {
        Self::new(
            dtos.into_iter()
                .map(|dto| Category::new(dto.category_id, dto.category_name.trim()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn id_for_name(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn name_for_id(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    /// Categories prefixed with the "all" pseudo-category, for selector rendering.
    pub fn selector_options(&self) -> Vec<CategoryOption> {
        std::iter::once(CategoryOption {
            value: CategoryOptionValue::All,
            label: ALL_CATEGORIES_LABEL.to_string(),
        })
        .chain(self.categories.iter().map(|category| CategoryOption {
            value: CategoryOptionValue::Id(category.id),
            label: category.name.clone(),
        }))
        .collect()
    }
}
