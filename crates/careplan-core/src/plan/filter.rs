//! Banned-section removal.
//!
//! A banned section runs from its marker up to the nearest following marker
//! of a *different* banned section, or to the end of the text. Markers are
//! handled one at a time in [`BANNED_MARKERS`] order against a single
//! shrinking buffer, so a section swallowed by an earlier removal is simply
//! gone by the time its own turn comes.

use crate::markers::BANNED_MARKERS;

/// Remove every banned section from `text`.
///
/// The result never contains any of the [`BANNED_MARKERS`] substrings.
pub fn remove_banned_sections(text: String) -> String {
    let mut buf = text;
    let mut removed = 0usize;

    loop {
        let mut changed = false;
        for marker in BANNED_MARKERS {
            while let Some(start) = buf.find(marker) {
                let end = section_end(&buf, marker, start);
                tracing::debug!(marker, start, end, "removing banned section");
                buf.replace_range(start..end, "");
                removed += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    if removed > 0 {
        tracing::info!(sections = removed, "banned sections removed");
    }

    buf.trim().to_string()
}

/// End (exclusive) of the section opened by `marker` at `start`.
fn section_end(buf: &str, marker: &str, start: usize) -> usize {
    let search_from = start + marker.len();
    BANNED_MARKERS
        .iter()
        .filter(|other| **other != marker)
        .filter_map(|other| buf[search_from..].find(other).map(|i| search_from + i))
        .min()
        .unwrap_or(buf.len())
}
