//! Line consolidation
//!
//! Page text wraps long descriptions over several lines. Consolidation folds
//! every line that does not start a new code into the record opened before it,
//! so that each output entry holds exactly one code and its full description.
//!
//! Consolidation state is scoped to one page: callers feed the lines of a single
//! page per call and concatenate the results across pages.

use crate::grammar::CodeGrammar;

/// Page separator emitted by common PDF-to-text converters
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// Fold continuation lines into the code record that owns them
///
/// A line starting a code closes the open entry (if it is non-empty) and opens a
/// new one. Any other line is appended to the open entry after a single space,
/// with its own surrounding whitespace removed.
///
/// The open entry is always emitted after the last line, even when empty. If the
/// first lines do not start a code they accumulate into a leading entry that
/// carries no code; the record extractor discards such entries.
pub fn consolidate_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = line.as_ref();
        if CodeGrammar::starts_record(line) {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
            current.push_str(line);
        } else {
            current.push(' ');
            current.push_str(line.trim());
        }
    }

    entries.push(current);
    entries
}

/// Consolidate the newline separated text of one page
///
/// A trailing carriage return on each line is dropped so CRLF text consolidates
/// the same way as LF text.
#[must_use]
pub fn consolidate_page(text: &str) -> Vec<String> {
    consolidate_lines(text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)))
}

/// Split a whole extracted document into pages on form feed
#[must_use]
pub fn split_pages(document: &str) -> Vec<&str> {
    document.split(PAGE_SEPARATOR).collect()
}
