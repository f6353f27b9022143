use super::command::InputError;
use super::page::PageModel;

pub(crate) const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// Display toggles that outlive a single page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DisplayOptions {
    pub(crate) items_per_page: usize,
    pub(crate) show_options: bool,
    pub(crate) show_links: bool,
    pub(crate) show_bookmarks: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            show_options: false,
            show_links: false,
            show_bookmarks: true,
        }
    }
}

/// First index whose item is not viewed; 0 if everything is viewed or the list is empty.
pub(crate) fn first_unviewed_index(viewed: &[bool]) -> usize {
    viewed.iter().position(|seen| !seen).unwrap_or(0)
}

/// First unviewed index at or after `start`, wrapping to the front; 0 if none.
pub(crate) fn next_unviewed_index(viewed: &[bool], start: usize) -> usize {
    let start = start.min(viewed.len());
    (start..viewed.len())
        .chain(0..start)
        .find(|&idx| !viewed[idx])
        .unwrap_or(0)
}

/// Page, cursor and auto-resume pointer of one browse flow.
///
/// `chosen` is the auto-resume pointer. While `cursor_moved` is false it is
/// what Enter plays; once the user moves the cursor, Enter plays the item
/// under the cursor instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectionState {
    page: usize,
    cursor: usize,
    chosen: Option<usize>,
    cursor_moved: bool,
    last_played: Option<usize>,
}

impl SelectionState {
    pub(crate) fn page(&self) -> usize {
        self.page
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn chosen(&self) -> Option<usize> {
        self.chosen
    }

    pub(crate) fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    #[cfg(test)]
    pub(crate) fn last_played(&self) -> Option<usize> {
        self.last_played
    }

    /// Prepares the state for a new list. The pointer survives unless it is
    /// unset, out of range, or `reset_pointer` asks for a fresh one.
    pub(crate) fn load(&mut self, model: &PageModel, viewed: &[bool], reset_pointer: bool) {
        let stale = self.chosen.is_none_or(|chosen| chosen >= viewed.len());
        if reset_pointer || stale {
            self.chosen = Some(first_unviewed_index(viewed));
        }
        self.cursor_moved = false;
        self.page = self.chosen.unwrap_or(0) / model.page_size();
        self.sync_cursor(model);
    }

    /// Pulls page and cursor back into range after the list or page size changed.
    pub(crate) fn sync_cursor(&mut self, model: &PageModel) {
        self.page = model.wrap_page(self.page as isize);
        let range = model.page_range(self.page);
        if self.cursor_moved {
            self.cursor = model.clamp_offset(self.page, self.cursor);
            return;
        }
        self.cursor = match self.chosen {
            Some(chosen) if range.contains(&chosen) => chosen - range.start,
            Some(chosen) if chosen >= range.end => range.len().saturating_sub(1),
            _ => 0,
        };
    }

    pub(crate) fn next_page(&mut self, model: &PageModel, viewed: &[bool]) {
        self.turn_page(model, viewed, 1);
    }

    pub(crate) fn previous_page(&mut self, model: &PageModel, viewed: &[bool]) {
        self.turn_page(model, viewed, -1);
    }

    fn turn_page(&mut self, model: &PageModel, viewed: &[bool], step: isize) {
        self.page = model.wrap_page(self.page as isize + step);
        self.chosen = Some(next_unviewed_index(viewed, model.page_start(self.page)));
        self.cursor_moved = false;
        self.sync_cursor(model);
    }

    pub(crate) fn jump_to_next_unviewed(&mut self, model: &PageModel, viewed: &[bool]) {
        let chosen = next_unviewed_index(viewed, self.chosen.unwrap_or(0));
        self.chosen = Some(chosen);
        self.page = model.locate(chosen).0;
        self.cursor_moved = false;
        self.sync_cursor(model);
    }

    /// Moves the cursor by `delta` rows, wrapping within the page. The pointer
    /// follows the cursor.
    pub(crate) fn move_cursor(&mut self, model: &PageModel, delta: isize) {
        let len = model.page_len(self.page);
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
        self.cursor_moved = true;
        self.chosen = Some(model.index_of(self.page, self.cursor));
    }

    /// 1-based page jump. The pointer stays where it is.
    pub(crate) fn jump_to_page(&mut self, model: &PageModel, page: usize) {
        self.page = model.wrap_page(page as isize - 1);
        self.cursor_moved = false;
        self.sync_cursor(model);
    }

    /// Applies a new page size, clamped to `[1, total_items]`, keeping the item
    /// under the cursor visible. Returns the model for the new size.
    pub(crate) fn set_items_per_page(
        &mut self,
        model: &PageModel,
        requested: i64,
    ) -> PageModel {
        let upper = model.total_items().max(1) as i64;
        let size = requested.clamp(1, upper) as usize;
        let anchor = model.index_of(self.page, self.cursor);
        let resized = PageModel::new(model.total_items(), size);
        let (page, offset) = resized.locate(anchor);
        self.page = page;
        if self.cursor_moved {
            self.cursor = offset;
            self.chosen = Some(anchor);
        }
        self.sync_cursor(&resized);
        resized
    }

    /// Global index parameterized commands act on when no number is given.
    pub(crate) fn highlighted_index(&self, model: &PageModel) -> Option<usize> {
        if self.cursor_moved {
            Some(model.index_of(self.page, self.cursor))
        } else {
            self.chosen
        }
    }

    /// Resolves Enter (`number = None`) or a typed 1-based number into the
    /// confirmed index, then advances the pointer past it.
    pub(crate) fn confirm(
        &mut self,
        model: &PageModel,
        viewed: &[bool],
        number: Option<usize>,
    ) -> Result<usize, InputError> {
        let len = viewed.len();
        let index = match number {
            Some(number) if number == 0 || number > len => {
                return Err(InputError::OutOfRange { number, len });
            }
            Some(number) => number - 1,
            None => self.default_target(model, viewed),
        };
        if index >= len {
            return Err(InputError::OutOfRange {
                number: index + 1,
                len,
            });
        }

        self.last_played = Some(index);
        let next = next_unviewed_index(viewed, index + 1);
        self.chosen = Some(next);
        let (page, offset) = model.locate(next);
        self.page = page;
        self.cursor = offset;
        self.cursor_moved = false;
        Ok(index)
    }

    fn default_target(&self, model: &PageModel, viewed: &[bool]) -> usize {
        if self.cursor_moved {
            return model.index_of(self.page, self.cursor);
        }
        match self.chosen {
            None => 0,
            Some(chosen) => {
                // Replaying the pointer that was just played means the user wants the next one.
                let replay = self.last_played == Some(chosen)
                    && chosen != 0
                    && viewed.iter().any(|seen| *seen);
                if replay && !viewed.is_empty() {
                    (chosen + 1) % viewed.len()
                } else {
                    chosen
                }
            }
        }
    }
}
