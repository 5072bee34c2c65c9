//! Categories owned by debts and goals
//!
//! Every debt and goal owns exactly one category, named after the owner with a
//! `- Debt` / `- Goal` suffix. The name and type follow the owner on every
//! create and update. When the owner goes away its category is soft-deleted
//! so transactions recorded against it keep resolving.

use tracing::info;

use super::fold_name;
use crate::models::{Category, CategoryType, Dataset, Debt, Goal};

/// A record that owns a linked category
pub trait LinkOwner {
    /// Suffix appended to the owner's name, also used when the name is blank
    const SUFFIX: &'static str;

    fn owner_name(&self) -> &str;
    fn linked_category_type(&self) -> CategoryType;
    fn linked_category_id(&self) -> Option<&str>;
    fn set_linked_category_id(&mut self, id: String);

    /// `"<name> - <Suffix>"` before deduplication
    fn linked_base_name(&self) -> String {
        let name = self.owner_name().trim();
        let name = if name.is_empty() { Self::SUFFIX } else { name };
        format!("{} - {}", name, Self::SUFFIX)
    }
}

impl LinkOwner for Debt {
    const SUFFIX: &'static str = "Debt";

    fn owner_name(&self) -> &str {
        &self.name
    }

    fn linked_category_type(&self) -> CategoryType {
        self.kind.category_type()
    }

    fn linked_category_id(&self) -> Option<&str> {
        self.linked_category_id.as_deref()
    }

    fn set_linked_category_id(&mut self, id: String) {
        self.linked_category_id = Some(id);
    }
}

impl LinkOwner for Goal {
    const SUFFIX: &'static str = "Goal";

    fn owner_name(&self) -> &str {
        &self.name
    }

    fn linked_category_type(&self) -> CategoryType {
        CategoryType::Saving
    }

    fn linked_category_id(&self) -> Option<&str> {
        self.linked_category_id.as_deref()
    }

    fn set_linked_category_id(&mut self, id: String) {
        self.linked_category_id = Some(id);
    }
}

impl Dataset {
    /// `desired` if free among active categories (ignoring `exclude_id`),
    /// otherwise the first free `"<desired> N"` for N = 2, 3, ...
    pub fn unique_category_name(&self, desired: &str, exclude_id: Option<&str>) -> String {
        let base = desired.trim();
        let taken: std::collections::HashSet<String> = self
            .active_categories()
            .filter(|c| Some(c.id.as_str()) != exclude_id)
            .map(|c| fold_name(&c.name))
            .collect();

        if !taken.contains(&fold_name(base)) {
            return base.to_string();
        }
        (2u32..)
            .map(|i| format!("{} {}", base, i))
            .find(|candidate| !taken.contains(&fold_name(candidate)))
            .unwrap_or_else(|| base.to_string())
    }

    /// Make sure `owner` has an up-to-date linked category and return its id
    ///
    /// An existing active link is renamed/retyped in place. A missing link, or
    /// one pointing at a soft-deleted category, gets a freshly minted category:
    /// soft-deleted categories are never brought back.
    pub fn ensure_linked_category<O: LinkOwner>(&mut self, owner: &mut O) -> String {
        let base = owner.linked_base_name();
        let category_type = owner.linked_category_type();

        if let Some(id) = owner.linked_category_id().map(str::to_string) {
            let is_active = self.category(&id).map(|c| c.is_active()).unwrap_or(false);
            if is_active {
                let name = self.unique_category_name(&base, Some(&id));
                if let Some(category) = self.category_mut(&id) {
                    category.category_type = category_type;
                    category.name = name;
                }
                return id;
            }
        }

        let name = self.unique_category_name(&base, None);
        let category = Category::new(name, category_type);
        let id = category.id.clone();
        info!(id = %id, name = %category.name, kind = %category.category_type, "Created linked category");
        self.categories.push(category);
        owner.set_linked_category_id(id.clone());
        id
    }

    /// Soft-delete a linked category once its owner is gone
    pub fn retire_linked_category(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        if let Some(category) = self.category_mut(id) {
            category.deleted = true;
            info!(id = %category.id, name = %category.name, "Retired linked category");
        }
    }
}
