use crate::store::{COMPLETED_CATEGORY, Entry, PRIMARY_CATEGORY};

use super::capability::{BookmarkCapability, HistoryCapability};
use super::page::PageModel;
use super::state::{DisplayOptions, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pointer {
    None,
    /// The auto-resume pointer.
    Auto,
    /// The manually moved cursor.
    Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    Bookmark,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowView<'a> {
    pub(crate) number: usize,
    pub(crate) title: &'a str,
    pub(crate) url: &'a str,
    pub(crate) viewed: bool,
    pub(crate) marker: Option<Marker>,
    pub(crate) pointer: Pointer,
}

/// Everything a frontend needs to draw one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageView<'a> {
    /// 1-based page number.
    pub(crate) page: usize,
    pub(crate) page_count: usize,
    /// Items up to and including this page.
    pub(crate) shown: usize,
    pub(crate) total: usize,
    pub(crate) number_width: usize,
    pub(crate) rows: Vec<RowView<'a>>,
    pub(crate) options: &'a DisplayOptions,
    /// 1-based number Enter would act on.
    pub(crate) highlighted: Option<usize>,
    pub(crate) status: &'a str,
    pub(crate) notice: Option<&'a str>,
}

#[allow(clippy::too_many_arguments)]
pub(super) fn build_view<'a>(
    items: &'a [Entry],
    model: &PageModel,
    state: &SelectionState,
    options: &'a DisplayOptions,
    history: &impl HistoryCapability,
    bookmarks: &impl BookmarkCapability,
    status: &'a str,
    notice: Option<&'a str>,
) -> PageView<'a> {
    let range = model.page_range(state.page());
    let rows = items[range.clone()]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let index = range.start + offset;
            let pointer = if state.cursor_moved() && offset == state.cursor() {
                Pointer::Cursor
            } else if !state.cursor_moved() && state.chosen() == Some(index) {
                Pointer::Auto
            } else {
                Pointer::None
            };
            RowView {
                number: index + 1,
                title: &entry.title,
                url: &entry.url,
                viewed: history.is_viewed(&entry.url),
                marker: options
                    .show_bookmarks
                    .then(|| marker_for(bookmarks, &entry.url))
                    .flatten(),
                pointer,
            }
        })
        .collect();

    PageView {
        page: state.page() + 1,
        page_count: model.page_count(),
        shown: range.end,
        total: model.total_items(),
        number_width: model.total_items().to_string().len(),
        rows,
        options,
        highlighted: state.highlighted_index(model).map(|idx| idx + 1),
        status,
        notice,
    }
}

fn marker_for(bookmarks: &impl BookmarkCapability, url: &str) -> Option<Marker> {
    if bookmarks.is_member(url, PRIMARY_CATEGORY) {
        Some(Marker::Bookmark)
    } else if bookmarks.is_member(url, COMPLETED_CATEGORY) {
        Some(Marker::Completed)
    } else {
        None
    }
}
