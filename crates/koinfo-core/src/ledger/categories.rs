//! Category registry

use tracing::info;

use super::fold_name;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryPatch, CategoryRemoval, Dataset, NewCategory};

impl Dataset {
    /// Look up a category by id, active or soft-deleted
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub(crate) fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// Categories that can still be picked for new transactions
    pub fn active_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.is_active())
    }

    /// Whether `name` clashes with an active category other than `exclude_id`
    pub(crate) fn active_name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        let folded = fold_name(name);
        self.active_categories()
            .filter(|c| Some(c.id.as_str()) != exclude_id)
            .any(|c| fold_name(&c.name) == folded)
    }

    /// Whether a debt or goal owns this category
    pub fn is_category_linked(&self, id: &str) -> bool {
        self.debts
            .iter()
            .any(|d| d.linked_category_id.as_deref() == Some(id))
            || self
                .goals
                .iter()
                .any(|g| g.linked_category_id.as_deref() == Some(id))
    }

    /// Number of transactions pointing at this category
    pub fn category_reference_count(&self, id: &str) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.category_id == id)
            .count()
    }

    /// Create a category; the type defaults to expense
    pub fn create_category(&mut self, req: NewCategory) -> Result<Category> {
        let name = req.name.as_deref().unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation("Category name required".to_string()));
        }
        // Soft-deleted categories are never revived, so a matching deleted
        // name gets a brand new id.
        if self.active_name_taken(&name, None) {
            return Err(Error::duplicate("Category", name));
        }

        let category = Category::new(name, req.category_type.unwrap_or_default());
        info!(id = %category.id, name = %category.name, kind = %category.category_type, "Created category");
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Rename and/or retype a category
    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Category> {
        let current = self
            .category(id)
            .ok_or_else(|| Error::NotFound(format!("category {}", id)))?;

        let new_name = match patch.name.as_deref() {
            Some(raw) => {
                let name = raw.trim().to_string();
                if name.is_empty() {
                    return Err(Error::Validation("Category name required".to_string()));
                }
                let renamed = fold_name(&name) != fold_name(&current.name);
                if renamed && self.active_name_taken(&name, Some(id)) {
                    return Err(Error::duplicate("Category", name));
                }
                Some(name)
            }
            None => None,
        };

        let category = self
            .category_mut(id)
            .ok_or_else(|| Error::NotFound(format!("category {}", id)))?;
        if let Some(name) = new_name {
            category.name = name;
        }
        if let Some(category_type) = patch.category_type {
            category.category_type = category_type;
        }

        info!(id = %category.id, name = %category.name, kind = %category.category_type, "Updated category");
        Ok(category.clone())
    }

    /// Delete a category
    ///
    /// Linked categories are refused. Otherwise the category is removed if no
    /// transaction references it right now, and soft-deleted if any does.
    pub fn delete_category(&mut self, id: &str) -> Result<CategoryRemoval> {
        if self.is_category_linked(id) {
            return Err(Error::LinkedEntity(id.to_string()));
        }
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("category {}", id)))?;

        let references = self.category_reference_count(id);
        if references == 0 {
            let removed = self.categories.remove(index);
            info!(id = %removed.id, name = %removed.name, "Removed category");
            Ok(CategoryRemoval::Removed)
        } else {
            let category = &mut self.categories[index];
            category.deleted = true;
            info!(id = %category.id, name = %category.name, references, "Soft-deleted category");
            Ok(CategoryRemoval::SoftDeleted)
        }
    }
}
