//! ICD-10-CM code grammar
//!
//! A code is one uppercase letter, two digits, a literal `.` and at least one
//! alphanumeric character (`A01.1`, `S72.001A`). The grammar answers two
//! separate questions over the same lexical shape:
//!
//! - does a line *start* a new code record ([`CodeGrammar::starts_record`]),
//! - and if so, where does the code end and the description begin
//!   ([`CodeGrammar::split_record`]).
//!
//! Both are anchored at the start of the input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shared prefix of every code: chapter letter, two category digits, separator
const CODE_PREFIX: &str = r"[A-Z][0-9]{2}\.";

static RECORD_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{CODE_PREFIX}[0-9A-Za-z]")).expect("record start pattern is valid")
});

static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({CODE_PREFIX}[0-9A-Za-z]+)([^\n\r]*)"))
        .expect("record pattern is valid")
});

static CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{CODE_PREFIX}[0-9A-Za-z]+$")).expect("code pattern is valid")
});

/// Pattern grammar for dotted ICD-10-CM codes and their description tail
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGrammar;

impl CodeGrammar {
    /// Check whether `line` begins a new code record
    ///
    /// Only the boundary is tested: the code need not be followed by a
    /// description, and nothing after the first character past the dot is
    /// inspected.
    #[must_use]
    pub fn starts_record(line: &str) -> bool {
        RECORD_START.is_match(line)
    }

    /// Split `line` into its code and trimmed description
    ///
    /// The code extends over every contiguous alphanumeric character after the
    /// dot. Returns `None` when the line does not start with a code.
    #[must_use]
    pub fn split_record(line: &str) -> Option<(&str, &str)> {
        let caps = RECORD.captures(line)?;
        let code = caps.get(1)?.as_str();
        let description = caps.get(2).map_or("", |m| m.as_str().trim());
        Some((code, description))
    }

    /// Check whether `code` is exactly one dotted code with nothing around it
    #[must_use]
    pub fn is_code(code: &str) -> bool {
        CODE.is_match(code)
    }
}
