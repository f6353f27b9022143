/// Which item a parameterized command acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// The cursor row if the cursor moved, otherwise the auto-resume pointer.
    Highlighted,
    /// A 1-based item number as typed.
    Number(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    ToggleOptions,
    NextPage,
    PreviousPage,
    JumpToUnviewed,
    CursorUp,
    CursorDown,
    ToggleLinks,
    ToggleBookmarkColors,
    Redraw,
    Quit,
    Bookmark {
        target: Target,
        category: Option<String>,
        create: bool,
    },
    Thumbnail(Target),
    ToggleViewed(Target),
    JumpToPage(usize),
    ItemsPerPage(i64),
    /// Enter on an empty line.
    Confirm,
    /// A bare 1-based item number.
    Choose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("'{input}' is not an option or a non-negative item number")]
    Malformed { input: String },
    #[error("item {number} is not listed ({len} items)")]
    OutOfRange { number: usize, len: usize },
    #[error("category '{0}' does not exist; use B:<n>:{0}:new to create it")]
    MissingCategory(String),
}

/// Parses one line of browser input.
///
/// `K:` commands are tried first, then single keys, then a plain selection.
/// An unknown `K:` prefix falls through to the later stages.
pub(crate) fn parse(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    if let Some(command) = parse_parameterized(line)? {
        return Ok(command);
    }
    if let Some(command) = parse_single_key(line) {
        return Ok(command);
    }
    parse_selection(line)
}

fn parse_parameterized(line: &str) -> Result<Option<Command>, InputError> {
    let Some((key, rest)) = line.split_once(':') else {
        return Ok(None);
    };
    if key.chars().count() != 1 {
        return Ok(None);
    }
    let malformed = || InputError::Malformed {
        input: line.to_string(),
    };
    let mut parts = rest.split(':');
    let number = parts.next().unwrap_or_default();

    let key = key.to_ascii_uppercase();
    let command = match key.as_str() {
        "B" => {
            let target = parse_target(number).ok_or_else(malformed)?;
            let category = parts
                .next()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .map(str::to_string);
            let create = match parts.next() {
                None => false,
                Some(action) if action.trim().eq_ignore_ascii_case("new") => true,
                Some(_) => return Err(malformed()),
            };
            Command::Bookmark {
                target,
                category,
                create,
            }
        }
        "T" => Command::Thumbnail(parse_target(number).ok_or_else(malformed)?),
        "V" => Command::ToggleViewed(parse_target(number).ok_or_else(malformed)?),
        // Page jumps and page sizes need an explicit number.
        "P" if !number.is_empty() => {
            Command::JumpToPage(number.trim().parse().map_err(|_| malformed())?)
        }
        "I" if !number.is_empty() => {
            Command::ItemsPerPage(parse_page_size(number).ok_or_else(malformed)?)
        }
        _ => return Ok(None),
    };
    if key != "B" && parts.next().is_some() {
        return Err(malformed());
    }
    Ok(Some(command))
}

fn parse_target(raw: &str) -> Option<Target> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Target::Highlighted);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().map(Target::Number)
}

/// Signed decimal; values past the `i64` range clamp to its ends.
fn parse_page_size(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(raw.parse().unwrap_or(saturated))
}

fn parse_single_key(line: &str) -> Option<Command> {
    let mut chars = line.chars();
    let key = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let command = match key.to_ascii_uppercase() {
        'O' => Command::ToggleOptions,
        'N' => Command::NextPage,
        'P' => Command::PreviousPage,
        'J' => Command::JumpToUnviewed,
        'U' => Command::CursorUp,
        'D' => Command::CursorDown,
        'L' => Command::ToggleLinks,
        'B' => Command::ToggleBookmarkColors,
        'R' => Command::Redraw,
        'Q' => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn parse_selection(line: &str) -> Result<Command, InputError> {
    if line.is_empty() {
        return Ok(Command::Confirm);
    }
    if line.bytes().all(|b| b.is_ascii_digit())
        && let Ok(number) = line.parse()
    {
        return Ok(Command::Choose(number));
    }
    Err(InputError::Malformed {
        input: line.to_string(),
    })
}
