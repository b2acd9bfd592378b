//! Code record model
//!
//! A [`CodeRecord`] is one code with its description, as extracted from page
//! text or read from a fixed-width file.

use serde::{Deserialize, Serialize};

use crate::grammar::CodeGrammar;

/// A single ICD-10-CM code and its description
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeRecord {
    /// Dotted code, e.g. `A01.1`
    pub code: String,
    /// Description text with surrounding whitespace removed
    pub description: String,
}

impl CodeRecord {
    /// Create a new record, trimming the description
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl AsRef<str>) -> Self {
        Self {
            code: code.into(),
            description: description.as_ref().trim().to_string(),
        }
    }

    /// Parse a consolidated entry into a record
    ///
    /// Returns `None` if the entry does not start with a code.
    #[must_use]
    pub fn from_entry(entry: &str) -> Option<Self> {
        CodeGrammar::split_record(entry).map(|(code, description)| Self::new(code, description))
    }

    /// The code without its `.` separator
    #[must_use]
    pub fn raw_code(&self) -> String {
        self.code.replace('.', "")
    }
}
