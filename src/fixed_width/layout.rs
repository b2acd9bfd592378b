//! Column layouts for fixed-width files

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ExtractError, Result};

/// Name of the index column in the CMS ICD-10-CM order file
pub const ICD10CM_INDEX_COLUMN: &str = "Index";

/// Name of the code column in the CMS ICD-10-CM order file
pub const ICD10CM_CODE_COLUMN: &str = "Code";

/// Columns of the CMS ICD-10-CM order file, in order
pub const ICD10CM_ORDER_COLUMNS: [(&str, usize); 5] = [
    (ICD10CM_INDEX_COLUMN, 6),
    (ICD10CM_CODE_COLUMN, 8),
    ("Unused", 2),
    ("Description_short", 61),
    ("Description_full", 1000),
];

/// A named column and its width in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub width: usize,
}

/// Ordered column layout of a fixed-width format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout", into = "RawLayout")]
pub struct FixedWidthLayout {
    columns: SmallVec<[ColumnSpec; 8]>,
    index_column: Option<String>,
}

/// Unvalidated layout as it appears in configuration files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLayout {
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    index_column: Option<String>,
}

impl TryFrom<RawLayout> for FixedWidthLayout {
    type Error = ExtractError;

    fn try_from(raw: RawLayout) -> Result<Self> {
        let layout = Self::new(raw.columns.into_iter().map(|c| (c.name, c.width)))?;
        match raw.index_column {
            Some(name) => layout.with_index_column(&name),
            None => Ok(layout),
        }
    }
}

impl From<FixedWidthLayout> for RawLayout {
    fn from(layout: FixedWidthLayout) -> Self {
        Self {
            columns: layout.columns.into_vec(),
            index_column: layout.index_column,
        }
    }
}

impl FixedWidthLayout {
    /// Create a layout from ordered `(name, width)` pairs
    ///
    /// # Errors
    /// Fails when the layout is empty, a width is zero, or a name repeats.
    pub fn new<I, N>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        let columns: SmallVec<[ColumnSpec; 8]> = columns
            .into_iter()
            .map(|(name, width)| ColumnSpec {
                name: name.into(),
                width,
            })
            .collect();

        if columns.is_empty() {
            return Err(ExtractError::Layout("layout has no columns".to_string()));
        }

        let mut seen = FxHashSet::default();
        for column in &columns {
            if column.width == 0 {
                return Err(ExtractError::Layout(format!(
                    "column '{}' has zero width",
                    column.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ExtractError::Layout(format!(
                    "column '{}' appears more than once",
                    column.name
                )));
            }
        }

        Ok(Self {
            columns,
            index_column: None,
        })
    }

    /// Use the named column as the integer record key
    ///
    /// # Errors
    /// The index column must exist and be the first column.
    pub fn with_index_column(mut self, name: &str) -> Result<Self> {
        match self.position(name) {
            Some(0) => {
                self.index_column = Some(name.to_string());
                Ok(self)
            }
            Some(_) => Err(ExtractError::Layout(format!(
                "index column '{name}' must be the first column"
            ))),
            None => Err(ExtractError::Layout(format!(
                "index column '{name}' is not in the layout"
            ))),
        }
    }

    /// Layout of the CMS ICD-10-CM order file
    #[must_use]
    pub fn icd10cm_order() -> Self {
        Self {
            columns: ICD10CM_ORDER_COLUMNS
                .iter()
                .map(|&(name, width)| ColumnSpec {
                    name: name.to_string(),
                    width,
                })
                .collect(),
            index_column: Some(ICD10CM_INDEX_COLUMN.to_string()),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the named column
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Sum of all column widths
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl Default for FixedWidthLayout {
    fn default() -> Self {
        Self::icd10cm_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icd10cm_order_layout() {
        let layout = FixedWidthLayout::icd10cm_order();
        assert_eq!(layout.len(), 5);
        assert_eq!(layout.total_width(), 1077);
        assert_eq!(layout.index_column(), Some("Index"));
        assert_eq!(layout.position("Code"), Some(1));
        assert_eq!(
            layout.names().collect::<Vec<_>>(),
            vec!["Index", "Code", "Unused", "Description_short", "Description_full"]
        );
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(FixedWidthLayout::new(Vec::<(String, usize)>::new()).is_err());
        assert!(FixedWidthLayout::new([("a", 0)]).is_err());
        assert!(FixedWidthLayout::new([("a", 1), ("a", 2)]).is_err());
    }

    #[test]
    fn test_index_column_must_be_first() {
        let layout = FixedWidthLayout::new([("Code", 4), ("Index", 3)]).unwrap();
        assert!(layout.clone().with_index_column("Index").is_err());
        assert!(layout.with_index_column("Missing").is_err());
    }

    #[test]
    fn test_layout_from_json_is_validated() {
        let json = r#"{"columns":[{"name":"Id","width":4},{"name":"Code","width":7}],"index_column":"Id"}"#;
        let layout: FixedWidthLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.total_width(), 11);
        assert_eq!(layout.index_column(), Some("Id"));

        let bad = r#"{"columns":[{"name":"Id","width":0}]}"#;
        assert!(serde_json::from_str::<FixedWidthLayout>(bad).is_err());
    }
}
