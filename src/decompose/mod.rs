//! Hierarchical code decomposition
//!
//! An undotted ICD-10-CM code such as `S72001A` splits by position into:
//!
//! | part | meaning | example |
//! |------|---------|---------|
//! | 1 | chapter letter | `S` |
//! | 2 | category digits | `72` |
//! | 3 | body after the first three characters | `001` |
//! | 4 | trailing extension letter, if any | `A` |
//!
//! The split is positional and never consults a code registry. The dotted
//! display form is derived separately and plays no part in the split.

pub mod chapter;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

pub use chapter::IcdChapter;
pub use summary::HierarchySummary;

/// Separator between category and body in the display form
pub const SEPARATOR: char = '.';

/// Number of characters before the separator
const PREFIX_LEN: usize = 3;

/// A code split into its hierarchical parts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecomposedCode {
    /// Display form with the separator inserted after the category
    pub code_with_separator: String,
    /// Chapter letter
    pub part1: char,
    /// Category digits (fewer than two characters only for truncated codes)
    pub part2: String,
    /// Body between the category and the extension letter; absent for codes of three characters or fewer
    pub part3: Option<String>,
    /// Trailing alphabetic extension
    pub part4: Option<char>,
}

impl DecomposedCode {
    /// Concatenate the parts back into the undotted code
    #[must_use]
    pub fn reconstruct(&self) -> String {
        let mut code = String::with_capacity(self.code_with_separator.len());
        code.push(self.part1);
        code.push_str(&self.part2);
        if let Some(body) = &self.part3 {
            code.push_str(body);
        }
        if let Some(extension) = self.part4 {
            code.push(extension);
        }
        code
    }

    /// Chapter letter followed by the category digits, e.g. `A00`
    #[must_use]
    pub fn category(&self) -> String {
        format!("{}{}", self.part1, self.part2)
    }

    /// Chapter the code belongs to
    #[must_use]
    pub fn chapter(&self) -> Option<IcdChapter> {
        IcdChapter::from_parts(self.part1, &self.part2)
    }
}

/// Remove the separator following the category, if present
///
/// `A00.0` becomes `A000`; codes without a separator at that position are
/// returned unchanged.
#[must_use]
pub fn strip_separator(code: &str) -> String {
    let mut chars: Vec<char> = code.chars().collect();
    if chars.get(PREFIX_LEN) == Some(&SEPARATOR) {
        chars.remove(PREFIX_LEN);
    }
    chars.into_iter().collect()
}

/// Insert the separator after the first three characters of a raw code
///
/// Codes of three characters or fewer have nothing to separate and are
/// returned unchanged.
#[must_use]
pub fn display_form(raw: &str) -> String {
    match raw.char_indices().nth(PREFIX_LEN) {
        Some((offset, _)) => format!("{}{SEPARATOR}{}", &raw[..offset], &raw[offset..]),
        None => raw.to_string(),
    }
}

/// Split a code into its hierarchical parts
///
/// Accepts the undotted form (`A001B`) or the dotted display form (`A00.1B`).
///
/// # Errors
/// Returns [`ExtractError::InvalidCode`] for an empty (or all-whitespace) code.
pub fn decompose(code: &str) -> Result<DecomposedCode> {
    let raw = strip_separator(code.trim());
    let chars: Vec<char> = raw.chars().collect();

    let Some(&part1) = chars.first() else {
        return Err(ExtractError::InvalidCode(format!(
            "cannot decompose empty code {code:?}"
        )));
    };
    let part2: String = chars.iter().skip(1).take(PREFIX_LEN - 1).collect();

    let (part3, part4) = if chars.len() <= PREFIX_LEN {
        (None, None)
    } else {
        let last = chars[chars.len() - 1];
        if last.is_alphabetic() {
            let body: String = chars[PREFIX_LEN..chars.len() - 1].iter().collect();
            (Some(body), Some(last))
        } else {
            let body: String = chars[PREFIX_LEN..].iter().collect();
            (Some(body), None)
        }
    };

    Ok(DecomposedCode {
        code_with_separator: display_form(&raw),
        part1,
        part2,
        part3,
        part4,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_numeric_body() {
        let parts = decompose("A000").unwrap();
        assert_eq!(parts.part1, 'A');
        assert_eq!(parts.part2, "00");
        assert_eq!(parts.part3.as_deref(), Some("0"));
        assert_eq!(parts.part4, None);
        assert_eq!(parts.code_with_separator, "A00.0");
    }

    #[test]
    fn test_decompose_extension_letter() {
        let parts = decompose("A001B").unwrap();
        assert_eq!(parts.part1, 'A');
        assert_eq!(parts.part2, "00");
        assert_eq!(parts.part3.as_deref(), Some("1"));
        assert_eq!(parts.part4, Some('B'));
        assert_eq!(parts.code_with_separator, "A00.1B");
    }

    #[test]
    fn test_decompose_category_only() {
        let parts = decompose("Z00").unwrap();
        assert_eq!(parts.part2, "00");
        assert_eq!(parts.part3, None);
        assert_eq!(parts.part4, None);
        assert_eq!(parts.code_with_separator, "Z00");
    }

    #[test]
    fn test_decompose_letter_directly_after_category() {
        let parts = decompose("S72A").unwrap();
        assert_eq!(parts.part3.as_deref(), Some(""));
        assert_eq!(parts.part4, Some('A'));
        assert_eq!(parts.reconstruct(), "S72A");
    }

    #[test]
    fn test_decompose_accepts_dotted_code() {
        let dotted = decompose("T36.0X1A").unwrap();
        let raw = decompose("T360X1A").unwrap();
        assert_eq!(dotted, raw);
        assert_eq!(raw.part3.as_deref(), Some("0X1"));
        assert_eq!(raw.part4, Some('A'));
    }

    #[test]
    fn test_decompose_short_codes() {
        let one = decompose("A").unwrap();
        assert_eq!(one.part2, "");
        assert_eq!(one.reconstruct(), "A");

        let two = decompose("A0").unwrap();
        assert_eq!(two.part2, "0");
        assert_eq!(two.part3, None);
    }

    #[test]
    fn test_decompose_empty_code_fails() {
        assert!(matches!(decompose(""), Err(ExtractError::InvalidCode(_))));
        assert!(matches!(decompose("   "), Err(ExtractError::InvalidCode(_))));
    }

    #[test]
    fn test_display_form_round_trip() {
        for raw in ["A000", "A001B", "S72001A", "Z00", "B2"] {
            let shown = display_form(raw);
            assert_eq!(strip_separator(&shown), raw);
        }
    }

    #[test]
    fn test_category_and_chapter() {
        let parts = decompose("J45909").unwrap();
        assert_eq!(parts.category(), "J45");
        assert_eq!(parts.chapter(), Some(IcdChapter::Respiratory));
    }
}
