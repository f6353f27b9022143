use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::model::Entry;
use super::{StoreError, read_optional, remove_file, write_json};

pub(crate) const PRIMARY_CATEGORY: &str = "bookmark";
pub(crate) const COMPLETED_CATEGORY: &str = "completed";
pub(crate) const REQUIRED_CATEGORIES: [&str; 2] = [PRIMARY_CATEGORY, COMPLETED_CATEGORY];

/// title -> url, ordered by title on disk.
pub(crate) type Category = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Toggled {
    Added,
    Removed,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum CategoryError {
    #[error("category '{0}' does not exist (append ':new' to create it)")]
    Missing(String),
    #[error("bookmarks are not available here")]
    Disabled,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub(crate) struct BookmarkStore {
    path: PathBuf,
    categories: BTreeMap<String, Category>,
}

impl BookmarkStore {
    pub(crate) fn open(path: &Path) -> Result<Self, StoreError> {
        let categories = match read_optional(path)? {
            Some(raw) => parse_categories(path, &raw)?,
            None => REQUIRED_CATEGORIES
                .iter()
                .map(|name| (name.to_string(), Category::new()))
                .collect(),
        };
        debug!(path = %path.display(), categories = categories.len(), "bookmarks loaded");
        Ok(Self {
            path: path.to_path_buf(),
            categories,
        })
    }

    pub(crate) fn is_member(&self, url: &str, category: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|items| items.values().any(|stored| stored == url))
    }

    /// Removes `entry` from `category` if its URL is already there, otherwise
    /// inserts it under its title. A title already present is overwritten.
    pub(crate) fn toggle(
        &mut self,
        entry: &Entry,
        category: &str,
        create: bool,
    ) -> Result<Toggled, CategoryError> {
        if !self.categories.contains_key(category) {
            if !create {
                return Err(CategoryError::Missing(category.to_string()));
            }
            info!(category, "bookmark category created");
            self.categories
                .insert(category.to_string(), Category::new());
        }
        let Some(items) = self.categories.get_mut(category) else {
            return Err(CategoryError::Missing(category.to_string()));
        };

        let existing = items
            .iter()
            .find(|(_, url)| **url == entry.url)
            .map(|(title, _)| title.clone());
        let toggled = match existing {
            Some(title) => {
                items.remove(&title);
                Toggled::Removed
            }
            None => {
                items.insert(entry.title.clone(), entry.url.clone());
                Toggled::Added
            }
        };
        debug!(category, url = %entry.url, ?toggled, "bookmark toggled");
        self.save()?;
        Ok(toggled)
    }

    pub(crate) fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    pub(crate) fn save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.categories)
    }

    pub(crate) fn delete(path: &Path) -> Result<bool, StoreError> {
        remove_file(path)
    }
}

fn parse_categories(path: &Path, raw: &str) -> Result<BTreeMap<String, Category>, StoreError> {
    let invalid = |reason: String| StoreError::InvalidBookmarks {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|err| invalid(err.to_string()))?;
    let Value::Object(map) = value else {
        return Err(invalid("top level is not an object".to_string()));
    };
    for required in REQUIRED_CATEGORIES {
        match map.get(required) {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(invalid(format!("category '{required}' is not an object"))),
            None => return Err(invalid(format!("missing required category '{required}'"))),
        }
    }

    serde_json::from_value(Value::Object(map)).map_err(|err| invalid(err.to_string()))
}
