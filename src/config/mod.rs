//! Configuration for the extraction pipelines.
//!
//! Defaults reproduce the CMS ICD-10-CM layout; a JSON file can override any
//! part of it.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{ExtractError, Result};
use crate::fixed_width::FixedWidthLayout;
use crate::fixed_width::layout::ICD10CM_CODE_COLUMN;

/// Configuration for the page text path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Process pages on a rayon pool
    pub parallel: bool,
    /// Worker threads when parallel; `None` uses one per CPU
    pub threads: Option<usize>,
    /// Share of non-empty entries that may be dropped before warning
    pub drop_warning_ratio: f64,
    /// Dropped entries tolerated regardless of ratio
    pub drop_warning_min: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            drop_warning_ratio: 0.5,
            drop_warning_min: 25,
        }
    }
}

impl TextConfig {
    /// Build the rayon pool for parallel page processing
    ///
    /// Returns `None` (use the global pool) if the pool cannot be built.
    #[must_use]
    pub fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.threads.unwrap_or_else(num_cpus::get);
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("Falling back to the global thread pool: {e}");
                None
            }
        }
    }
}

/// Configuration for the fixed-width path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedWidthConfig {
    /// Column layout of the input file
    pub layout: FixedWidthLayout,
    /// Column holding the undotted code
    pub code_column: String,
    /// Append the decomposition columns to the output
    pub decompose: bool,
    /// Slice lines on a rayon pool
    pub parallel: bool,
}

impl Default for FixedWidthConfig {
    fn default() -> Self {
        Self {
            layout: FixedWidthLayout::icd10cm_order(),
            code_column: ICD10CM_CODE_COLUMN.to_string(),
            decompose: true,
            parallel: false,
        }
    }
}

/// Configuration for both extraction paths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub text: TextConfig,
    pub fixed_width: FixedWidthConfig,
}

impl ExtractionConfig {
    /// Load configuration from a JSON file, filling gaps with defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "configuration")?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.text.drop_warning_ratio) {
            return Err(ExtractError::Config(format!(
                "drop_warning_ratio must be between 0 and 1, got {}",
                self.text.drop_warning_ratio
            )));
        }
        if self.text.threads == Some(0) {
            return Err(ExtractError::Config("threads must be at least 1".to_string()));
        }
        if self.fixed_width.layout.position(&self.fixed_width.code_column).is_none() {
            return Err(ExtractError::Config(format!(
                "code column '{}' is not in the layout",
                self.fixed_width.code_column
            )));
        }
        Ok(())
    }
}
