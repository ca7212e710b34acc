//! Recipe filtering and selection state.

use std::collections::HashSet;

use crate::catalog::{Catalog, Recipe};

/// Narrows the recipe list; empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Substring of the recipe name or display name.
    pub search: String,
    pub category: String,
    pub group: String,
    pub subgroup: String,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        (self.search.is_empty()
            || recipe.name.contains(&self.search)
            || recipe.display_name.contains(&self.search))
            && (self.category.is_empty() || recipe.category == self.category)
            && (self.group.is_empty() || recipe.group_name == self.group)
            && (self.subgroup.is_empty() || recipe.subgroup_name == self.subgroup)
    }

    /// Matching recipes in catalog order.
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Recipe> {
        catalog
            .recipes
            .iter()
            .filter(|recipe| self.matches(recipe))
            .collect()
    }
}

/// How much of a recipe list is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSelection {
    selected: HashSet<String>,
}

impl RecipeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn set(&mut self, name: &str, selected: bool) {
        if selected {
            self.selected.insert(name.to_string());
        } else {
            self.selected.remove(name);
        }
    }

    pub fn toggle(&mut self, name: &str) {
        let selected = self.is_selected(name);
        self.set(name, !selected);
    }

    /// Select every recipe in `recipes`, or deselect them all if they
    /// already are.
    pub fn toggle_all(&mut self, recipes: &[&Recipe]) {
        let select = self.state(recipes) != SelectionState::All;
        for recipe in recipes {
            self.set(&recipe.name, select);
        }
    }

    pub fn state(&self, recipes: &[&Recipe]) -> SelectionState {
        let selected = recipes
            .iter()
            .filter(|recipe| self.is_selected(&recipe.name))
            .count();
        if selected == 0 {
            SelectionState::None
        } else if selected == recipes.len() {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected recipes in catalog order; names the catalog lacks are skipped.
    pub fn ordered<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Recipe> {
        catalog
            .recipes
            .iter()
            .filter(|recipe| self.is_selected(&recipe.name))
            .collect()
    }
}
