mod capability;
mod command;
mod page;
mod state;
mod view;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::store::{CategoryError, Entry, PRIMARY_CATEGORY, StoreError, Toggled};

pub(crate) use capability::*;
pub(crate) use command::{Command, InputError, Target, parse};
pub(crate) use page::PageModel;
pub(crate) use state::*;
pub(crate) use view::*;

/// Result of one browser iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Tick {
    Continue,
    Selected(Entry),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseOutcome {
    Selected(Entry),
    Quit,
}

pub(crate) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(crate) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

enum Failure {
    Input(InputError),
    Fatal(anyhow::Error),
}

impl From<InputError> for Failure {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Self::Fatal(err.into())
    }
}

/// The paged selection engine. One browser serves one browse flow, so the
/// auto-resume pointer carries over between `choose` calls.
pub(crate) struct Browser<H, B, P> {
    history: H,
    bookmarks: B,
    preview: P,
    options: DisplayOptions,
    state: SelectionState,
    model: PageModel,
    status: String,
    notice: Option<String>,
}

impl<H, B, P> Browser<H, B, P>
where
    H: HistoryCapability,
    B: BookmarkCapability,
    P: PreviewCapability,
{
    pub(crate) fn new(history: H, bookmarks: B, preview: P, options: DisplayOptions) -> Self {
        let model = PageModel::new(0, options.items_per_page);
        Self {
            history,
            bookmarks,
            preview,
            options,
            state: SelectionState::default(),
            model,
            status: status_info("Ready."),
            notice: None,
        }
    }

    pub(crate) fn history(&self) -> &H {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub(crate) fn preview(&self) -> &P {
        &self.preview
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SelectionState {
        &self.state
    }

    pub(crate) fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Hands the bookmark store to the next browser of the same flow.
    pub(crate) fn into_bookmarks(self) -> B {
        self.bookmarks
    }

    pub(crate) fn set_status(&mut self, status: String) {
        self.status = status;
    }

    /// Queues a message the user has to acknowledge before the next page.
    pub(crate) fn post_notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = status_error(message.lines().next().unwrap_or_default());
        self.notice = Some(message);
    }

    /// Prepares the engine for `items`. `reset_pointer` recomputes the
    /// auto-resume pointer from the first unviewed item.
    pub(crate) fn load(&mut self, items: &[Entry], reset_pointer: bool) {
        let viewed = self.viewed_flags(items);
        self.model = PageModel::new(items.len(), self.options.items_per_page);
        self.state.load(&self.model, &viewed, reset_pointer);
        debug!(
            items = items.len(),
            pages = self.model.page_count(),
            chosen = ?self.state.chosen(),
            "browser loaded"
        );
    }

    pub(crate) fn view<'a>(&'a self, items: &'a [Entry]) -> PageView<'a> {
        build_view(
            items,
            &self.model,
            &self.state,
            &self.options,
            &self.history,
            &self.bookmarks,
            &self.status,
            self.notice.as_deref(),
        )
    }

    /// Runs the input loop until the user selects an item or quits.
    pub(crate) fn choose(
        &mut self,
        frontend: &mut impl Frontend,
        items: &[Entry],
        reset_pointer: bool,
    ) -> Result<BrowseOutcome> {
        self.load(items, reset_pointer);
        loop {
            let input = frontend.interact(&self.view(items))?;
            match self.tick(items, input)? {
                Tick::Continue => {}
                Tick::Selected(entry) => {
                    info!(title = %entry.title, url = %entry.url, "item selected");
                    return Ok(BrowseOutcome::Selected(entry));
                }
                Tick::Quit => return Ok(BrowseOutcome::Quit),
            }
        }
    }

    /// Applies one input. Recoverable input errors become a notice; store
    /// failures are returned.
    pub(crate) fn tick(&mut self, items: &[Entry], input: UserInput) -> Result<Tick> {
        if matches!(input, UserInput::Interrupt) {
            return Ok(Tick::Quit);
        }
        if self.notice.take().is_some() {
            return Ok(Tick::Continue);
        }

        let command = match input {
            UserInput::NextPage => Command::NextPage,
            UserInput::PreviousPage => Command::PreviousPage,
            UserInput::CursorUp => Command::CursorUp,
            UserInput::CursorDown => Command::CursorDown,
            UserInput::Interrupt => return Ok(Tick::Quit),
            UserInput::Line(line) => match parse(&line) {
                Ok(command) => command,
                Err(err) => {
                    self.reject(err);
                    return Ok(Tick::Continue);
                }
            },
        };

        match self.execute(items, command) {
            Ok(tick) => Ok(tick),
            Err(Failure::Input(err)) => {
                self.reject(err);
                Ok(Tick::Continue)
            }
            Err(Failure::Fatal(err)) => Err(err),
        }
    }

    fn reject(&mut self, err: InputError) {
        warn!(%err, "input rejected");
        self.post_notice(format!("{err}\n\nPress any key to continue."));
    }

    fn execute(&mut self, items: &[Entry], command: Command) -> Result<Tick, Failure> {
        let viewed = self.viewed_flags(items);
        match command {
            Command::ToggleOptions => self.options.show_options = !self.options.show_options,
            Command::ToggleLinks => self.options.show_links = !self.options.show_links,
            Command::ToggleBookmarkColors => {
                self.options.show_bookmarks = !self.options.show_bookmarks;
            }
            Command::Redraw => self.status = status_info("Ready."),
            Command::Quit => return Ok(Tick::Quit),
            Command::NextPage => self.state.next_page(&self.model, &viewed),
            Command::PreviousPage => self.state.previous_page(&self.model, &viewed),
            Command::JumpToUnviewed => self.state.jump_to_next_unviewed(&self.model, &viewed),
            Command::CursorUp => self.state.move_cursor(&self.model, -1),
            Command::CursorDown => self.state.move_cursor(&self.model, 1),
            Command::JumpToPage(page) => self.state.jump_to_page(&self.model, page),
            Command::ItemsPerPage(requested) => {
                self.model = self.state.set_items_per_page(&self.model, requested);
                self.options.items_per_page = self.model.page_size();
                self.status = status_info(&format!(
                    "Showing {} items per page.",
                    self.model.page_size()
                ));
            }
            Command::Bookmark {
                target,
                category,
                create,
            } => {
                let entry = &items[self.resolve(target, items.len())?];
                let category = category.as_deref().unwrap_or(PRIMARY_CATEGORY);
                let toggled = match self.bookmarks.toggle(entry, category, create) {
                    Ok(toggled) => toggled,
                    Err(CategoryError::Missing(name)) => {
                        return Err(InputError::MissingCategory(name).into());
                    }
                    Err(CategoryError::Disabled) => {
                        self.post_notice("Bookmarks are not available here.");
                        return Ok(Tick::Continue);
                    }
                    Err(CategoryError::Store(err)) => return Err(err.into()),
                };
                let verb = match toggled {
                    Toggled::Added => "Added to",
                    Toggled::Removed => "Removed from",
                };
                self.status = status_info(&format!("{verb} {category}: {}", entry.title));
            }
            Command::Thumbnail(target) => {
                let entry = &items[self.resolve(target, items.len())?];
                match self.preview.show_thumbnail(&entry.url) {
                    Ok(()) => {
                        self.status = status_info(&format!("Opened thumbnail: {}", entry.title));
                    }
                    Err(err) => {
                        warn!(url = %entry.url, error = %err, "thumbnail preview failed");
                        self.post_notice(format!(
                            "Thumbnail preview failed: {err:#}\n\nPress any key to continue."
                        ));
                    }
                }
            }
            Command::ToggleViewed(target) => {
                let entry = &items[self.resolve(target, items.len())?];
                self.status = match self.history.toggle_viewed(entry)? {
                    Some(true) => status_info(&format!("Marked viewed: {}", entry.title)),
                    Some(false) => status_info(&format!("Marked unwatched: {}", entry.title)),
                    None => status_error(&format!("Not tracked in history: {}", entry.title)),
                };
            }
            Command::Confirm => return self.confirm(items, &viewed, None),
            Command::Choose(number) => return self.confirm(items, &viewed, Some(number)),
        }
        self.state.sync_cursor(&self.model);
        Ok(Tick::Continue)
    }

    fn confirm(
        &mut self,
        items: &[Entry],
        viewed: &[bool],
        number: Option<usize>,
    ) -> Result<Tick, Failure> {
        let index = self.state.confirm(&self.model, viewed, number)?;
        Ok(Tick::Selected(items[index].clone()))
    }

    /// Converts a command target into a global index inside `len` items.
    fn resolve(&self, target: Target, len: usize) -> Result<usize, InputError> {
        let index = match target {
            Target::Number(number) if number == 0 || number > len => {
                return Err(InputError::OutOfRange { number, len });
            }
            Target::Number(number) => number - 1,
            Target::Highlighted => self.state.highlighted_index(&self.model).unwrap_or(0),
        };
        if index >= len {
            return Err(InputError::OutOfRange {
                number: index + 1,
                len,
            });
        }
        Ok(index)
    }

    fn viewed_flags(&self, items: &[Entry]) -> Vec<bool> {
        items
            .iter()
            .map(|entry| self.history.is_viewed(&entry.url))
            .collect()
    }
}
