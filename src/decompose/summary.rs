//! Unique-value summary over decomposed codes

use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::DecomposedCode;

/// Number of distinct values seen for each decomposition part
///
/// Absent parts count as one distinct value of their own, so a set of codes
/// where some lack an extension letter reports that absence as a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchySummary {
    pub codes: usize,
    pub part1: usize,
    pub part2: usize,
    pub part3: usize,
    pub part4: usize,
}

impl HierarchySummary {
    /// Summarise a set of decomposed codes
    pub fn from_codes<'a, I>(codes: I) -> Self
    where
        I: IntoIterator<Item = &'a DecomposedCode>,
    {
        let mut part1 = FxHashSet::default();
        let mut part2 = FxHashSet::default();
        let mut part3 = FxHashSet::default();
        let mut part4 = FxHashSet::default();
        let mut count = 0;

        for code in codes {
            count += 1;
            part1.insert(code.part1);
            part2.insert(code.part2.as_str());
            part3.insert(code.part3.as_deref());
            part4.insert(code.part4);
        }

        Self {
            codes: count,
            part1: part1.len(),
            part2: part2.len(),
            part3: part3.len(),
            part4: part4.len(),
        }
    }

    /// Sum of distinct values over all parts
    #[must_use]
    pub fn total(&self) -> usize {
        self.part1 + self.part2 + self.part3 + self.part4
    }
}

impl fmt::Display for HierarchySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unique values summary ({} codes):", self.codes)?;
        writeln!(f, "- first character: {} unique values", self.part1)?;
        writeln!(f, "- next two characters: {} unique values", self.part2)?;
        writeln!(f, "- middle component: {} unique values", self.part3)?;
        writeln!(f, "- last characters: {} unique values", self.part4)?;
        write!(f, "- total unique values: {}", self.total())
    }
}
