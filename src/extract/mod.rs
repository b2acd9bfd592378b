//! Record extraction from consolidated page text
//!
//! Each consolidated entry either starts with a code, in which case it becomes a
//! [`CodeRecord`], or it is noise (page headers, footers, chapter titles) and is
//! dropped. Dropping is how non-code text is filtered out, so it is counted but
//! never treated as an error.

use indicatif::ProgressBar;
use log::debug;
use rayon::prelude::*;

use crate::config::TextConfig;
use crate::consolidate::consolidate_page;
use crate::models::CodeRecord;
use crate::utils::logging::log_dropped_entries;

/// Records extracted from one or more pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Records in document order
    pub records: Vec<CodeRecord>,
    /// Non-empty entries that did not start with a code
    pub dropped: usize,
    /// Entries that were empty or whitespace only
    pub empty: usize,
}

impl Extraction {
    /// Append another extraction, keeping document order
    pub fn merge(&mut self, other: Self) {
        self.records.extend(other.records);
        self.dropped += other.dropped;
        self.empty += other.empty;
    }

    /// Number of non-empty entries seen
    #[must_use]
    pub fn entries(&self) -> usize {
        self.records.len() + self.dropped
    }

    /// Whether the dropped entries are numerous enough to suggest lost records
    #[must_use]
    pub fn exceeds_drop_threshold(&self, config: &TextConfig) -> bool {
        if self.dropped <= config.drop_warning_min {
            return false;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.dropped as f64 / self.entries() as f64;
        ratio > config.drop_warning_ratio
    }
}

/// Turn consolidated entries into code records, dropping entries without a code
pub fn extract_records<I, S>(entries: I) -> Extraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extraction = Extraction::default();
    for entry in entries {
        let entry = entry.as_ref();
        match CodeRecord::from_entry(entry) {
            Some(record) => extraction.records.push(record),
            None if entry.trim().is_empty() => extraction.empty += 1,
            None => {
                debug!("Dropping entry without code: {entry:?}");
                extraction.dropped += 1;
            }
        }
    }
    extraction
}

/// Consolidate and extract a single page
#[must_use]
pub fn extract_page(text: &str) -> Extraction {
    extract_records(consolidate_page(text))
}

/// Extract records from every page, in page order
///
/// Pages are independent, so with `config.parallel` they are processed on a
/// rayon pool; results are still concatenated in page order.
pub fn extract_pages<S>(pages: &[S], config: &TextConfig) -> Extraction
where
    S: AsRef<str> + Sync,
{
    run_pages(pages, config, None)
}

/// Like [`extract_pages`], advancing `progress` once per page
pub fn extract_pages_with_progress<S>(
    pages: &[S],
    config: &TextConfig,
    progress: &ProgressBar,
) -> Extraction
where
    S: AsRef<str> + Sync,
{
    run_pages(pages, config, Some(progress))
}

fn run_pages<S>(pages: &[S], config: &TextConfig, progress: Option<&ProgressBar>) -> Extraction
where
    S: AsRef<str> + Sync,
{
    let per_page = |page: &S| {
        let extraction = extract_page(page.as_ref());
        if let Some(pb) = progress {
            pb.inc(1);
        }
        extraction
    };

    let page_results: Vec<Extraction> = if config.parallel && pages.len() > 1 {
        let collect = || -> Vec<Extraction> { pages.par_iter().map(per_page).collect() };
        match config.thread_pool() {
            Some(pool) => pool.install(collect),
            None => collect(),
        }
    } else {
        pages.iter().map(per_page).collect()
    };

    let mut extraction = Extraction::default();
    for page in page_results {
        extraction.merge(page);
    }

    debug!(
        "Extracted {} records from {} pages ({} dropped, {} empty)",
        extraction.records.len(),
        pages.len(),
        extraction.dropped,
        extraction.empty
    );

    if extraction.exceeds_drop_threshold(config) {
        log_dropped_entries(extraction.dropped, extraction.entries());
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_entry_is_dropped() {
        let extraction = extract_records(["A01.1 Foo bar", "random header text"]);
        assert_eq!(extraction.records, vec![CodeRecord::new("A01.1", "Foo bar")]);
        assert_eq!(extraction.dropped, 1);
    }

    #[test]
    fn test_empty_entries_are_counted_separately() {
        let extraction = extract_records(["", "   ", "B20.0 HIV"]);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.dropped, 0);
        assert_eq!(extraction.empty, 2);
    }

    #[test]
    fn test_extract_page_drops_leading_header() {
        let page = "ICD-10-CM Tabular List\nA00.0 Cholera due to Vibrio cholerae 01,\nbiovar cholerae\nA00.1 Cholera due to Vibrio cholerae 01, biovar eltor";
        let extraction = extract_page(page);
        assert_eq!(extraction.dropped, 1);
        assert_eq!(
            extraction.records,
            vec![
                CodeRecord::new("A00.0", "Cholera due to Vibrio cholerae 01, biovar cholerae"),
                CodeRecord::new("A00.1", "Cholera due to Vibrio cholerae 01, biovar eltor"),
            ]
        );
    }

    #[test]
    fn test_pages_keep_order_in_parallel() {
        let pages: Vec<String> = (0..50)
            .map(|i| format!("A{:02}.0 First {i}\nwrapped\nA{:02}.1 Second {i}", i % 100, i % 100))
            .collect();
        let sequential = extract_pages(&pages, &TextConfig::default());
        let parallel = extract_pages(
            &pages,
            &TextConfig {
                parallel: true,
                threads: Some(4),
                ..TextConfig::default()
            },
        );
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.records.len(), 100);
        assert_eq!(sequential.records[0].description, "First 0 wrapped");
    }

    #[test]
    fn test_no_pages_no_records() {
        let extraction = extract_pages::<&str>(&[], &TextConfig::default());
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.entries(), 0);
    }

    #[test]
    fn test_drop_threshold() {
        let config = TextConfig {
            drop_warning_min: 2,
            drop_warning_ratio: 0.5,
            ..TextConfig::default()
        };
        let mostly_noise = Extraction {
            records: vec![CodeRecord::new("A00.0", "x")],
            dropped: 3,
            empty: 0,
        };
        assert!(mostly_noise.exceeds_drop_threshold(&config));

        let few_drops = Extraction {
            records: vec![CodeRecord::new("A00.0", "x")],
            dropped: 2,
            empty: 10,
        };
        assert!(!few_drops.exceeds_drop_threshold(&config));
    }

    #[test]
    fn test_progress_advances_once_per_page() {
        let pages = [
            "A00.0 Cholera due to Vibrio cholerae",
            "Page 2 header\nA01.1 Paratyphoid fever A",
            "A02.0 Salmonella enteritis",
        ];
        let sequential = TextConfig::default();
        let parallel = TextConfig {
            parallel: true,
            threads: Some(2),
            ..TextConfig::default()
        };

        for config in [sequential, parallel] {
            let pb = ProgressBar::hidden();
            pb.set_length(pages.len() as u64);
            let extraction = extract_pages_with_progress(&pages, &config, &pb);
            assert_eq!(pb.position(), pages.len() as u64);
            assert_eq!(extraction.records.len(), 3);
        }
    }
}
