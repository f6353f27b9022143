use chrono::{DateTime, Local};

use crate::store::Entry;

/// Query words shorter than this never count towards a match.
const MIN_WORD_LEN: usize = 3;

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn format_last_viewed_display(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M %:z")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Number of distinct query words (at least three characters) contained in `title`.
pub(crate) fn match_score(title: &str, words: &[String]) -> usize {
    words
        .iter()
        .filter(|word| word.chars().count() >= MIN_WORD_LEN && title.contains(word.as_str()))
        .count()
}

/// Word-match search over catalog titles, best matches first. Ties keep
/// catalog order.
pub(crate) fn search_entries(entries: &[Entry], query: &str, case_sensitive: bool) -> Vec<Entry> {
    let query = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };
    let mut words: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        if !words.iter().any(|seen| seen == word) {
            words.push(word.to_string());
        }
    }

    let mut scored: Vec<(usize, &Entry)> = entries
        .iter()
        .filter_map(|entry| {
            let score = if case_sensitive {
                match_score(&entry.title, &words)
            } else {
                match_score(&entry.title.to_lowercase(), &words)
            };
            (score > 0).then_some((score, entry))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, entry)| entry.clone()).collect()
}
