use anyhow::Result;

use crate::store::{BookmarkStore, CategoryError, Entry, HistoryStore, StoreError, Toggled};

use super::view::PageView;

/// Watch-status lookups and toggles the browser needs from history.
pub(crate) trait HistoryCapability {
    fn is_viewed(&self, url: &str) -> bool;

    /// Flips the viewed status of a tracked video. `None` when the URL is not in history.
    fn toggle_viewed(&mut self, entry: &Entry) -> Result<Option<bool>, StoreError>;
}

pub(crate) trait BookmarkCapability {
    fn is_member(&self, url: &str, category: &str) -> bool;

    fn toggle(
        &mut self,
        entry: &Entry,
        category: &str,
        create: bool,
    ) -> Result<Toggled, CategoryError>;
}

pub(crate) trait PreviewCapability {
    fn show_thumbnail(&mut self, url: &str) -> Result<()>;
}

/// One line of input from the user, or an immediate navigation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UserInput {
    Line(String),
    NextPage,
    PreviousPage,
    CursorUp,
    CursorDown,
    Interrupt,
}

/// Draws a page and blocks for the next input.
pub(crate) trait Frontend {
    fn interact(&mut self, view: &PageView<'_>) -> Result<UserInput>;

    /// Hands the terminal to a child process.
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }
}

impl HistoryCapability for HistoryStore {
    fn is_viewed(&self, url: &str) -> bool {
        self.status_of(url).is_viewed()
    }

    fn toggle_viewed(&mut self, entry: &Entry) -> Result<Option<bool>, StoreError> {
        if self.search(&entry.url).is_none() {
            return Ok(None);
        }
        if self.is_viewed(&entry.url) {
            self.clear_viewed(&entry.url)?;
            Ok(Some(false))
        } else {
            self.mark_viewed(&entry.url)?;
            Ok(Some(true))
        }
    }
}

impl BookmarkCapability for BookmarkStore {
    fn is_member(&self, url: &str, category: &str) -> bool {
        BookmarkStore::is_member(self, url, category)
    }

    fn toggle(
        &mut self,
        entry: &Entry,
        category: &str,
        create: bool,
    ) -> Result<Toggled, CategoryError> {
        BookmarkStore::toggle(self, entry, category, create)
    }
}

/// Stand-in for flows that browse without history: nothing is viewed.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NullHistoryStore;

impl HistoryCapability for NullHistoryStore {
    fn is_viewed(&self, _url: &str) -> bool {
        false
    }

    fn toggle_viewed(&mut self, _entry: &Entry) -> Result<Option<bool>, StoreError> {
        Ok(None)
    }
}

/// Stand-in for flows that browse without bookmarks.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NullBookmarkStore;

impl BookmarkCapability for NullBookmarkStore {
    fn is_member(&self, _url: &str, _category: &str) -> bool {
        false
    }

    fn toggle(
        &mut self,
        _entry: &Entry,
        _category: &str,
        _create: bool,
    ) -> Result<Toggled, CategoryError> {
        Err(CategoryError::Disabled)
    }
}
