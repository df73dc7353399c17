//! Shared models: cell values, coordinates, styles, policies and errors.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{
    N_PRICE_MULTIPLE, N_PRICE_SUFFIX, N_SIZE_MAX, N_SIZE_MIN, N_SIZE_STEP,
    N_SPECIAL_PRICE_MIN, N_SPECIAL_PRICE_MULTIPLE, N_SPECIAL_PRICE_SUFFIX,
};
use crate::util::derive_column_letters;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Named bundle of formatting attributes applied atomically to a cell range.
///
/// Every property is optional so that applying a format onto a cell only
/// replaces the properties it sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<Cow<'static, str>>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment (`left`, `center`, `right`, ...).
    pub align: Option<Cow<'static, str>>,
}

impl SpecCellFormat {
    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
        }
    }
}

/// Normalized cell value written into the sheet model.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Return the text payload, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(val) => Some(val),
            _ => None,
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellCoordinates

/// Zero-based cell coordinate (row, column), displayed in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecCellCoord {
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub col: u16,
}

impl SpecCellCoord {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for SpecCellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", derive_column_letters(self.col), self.row + 1)
    }
}

/// Inclusive rectangular cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecCellRange {
    /// Top-left cell.
    pub first: SpecCellCoord,
    /// Bottom-right cell.
    pub last: SpecCellCoord,
}

impl SpecCellRange {
    /// Build a range from two corners in any order.
    pub fn new(a: SpecCellCoord, b: SpecCellCoord) -> Self {
        Self {
            first: SpecCellCoord::new(a.row.min(b.row), a.col.min(b.col)),
            last: SpecCellCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Whether two ranges share at least one cell.
    pub fn overlaps(&self, other: &SpecCellRange) -> bool {
        self.first.row <= other.last.row
            && other.first.row <= self.last.row
            && self.first.col <= other.last.col
            && other.first.col <= self.last.col
    }

    /// Iterate all cells row-major.
    pub fn cells(&self) -> impl Iterator<Item = SpecCellCoord> + '_ {
        (self.first.row..=self.last.row).flat_map(move |row| {
            (self.first.col..=self.last.col).map(move |col| SpecCellCoord::new(row, col))
        })
    }
}

impl fmt::Display for SpecCellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DocumentProperties

/// Workbook document metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecDocumentProperties {
    pub title: String,
    pub subject: String,
    pub description: String,
    pub keywords: String,
    pub category: String,
}

impl SpecDocumentProperties {
    /// Use the same text for every property.
    pub fn uniform(text: &str) -> Self {
        Self {
            title: text.to_string(),
            subject: text.to_string(),
            description: text.to_string(),
            keywords: text.to_string(),
            category: text.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PricingPolicies

/// Arithmetic of the discounted ("special") listing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecSpecialPricePolicy {
    /// Factor applied to the parsed source price.
    pub multiple: f64,
    /// Fraction added after flooring.
    pub suffix: f64,
    /// Substituted when the scaled price is not positive.
    pub min_price: f64,
}

impl Default for SpecSpecialPricePolicy {
    fn default() -> Self {
        Self {
            multiple: N_SPECIAL_PRICE_MULTIPLE,
            suffix: N_SPECIAL_PRICE_SUFFIX,
            min_price: N_SPECIAL_PRICE_MIN,
        }
    }
}

/// Arithmetic of the regular listing price, derived from the special price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecPricePolicy {
    /// Factor applied to the special price.
    pub multiple: f64,
    /// Fraction added after flooring.
    pub suffix: f64,
}

impl Default for SpecPricePolicy {
    fn default() -> Self {
        Self {
            multiple: N_PRICE_MULTIPLE,
            suffix: N_PRICE_SUFFIX,
        }
    }
}

/// Inclusive ring size run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecSizeRun {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SpecSizeRun {
    fn default() -> Self {
        Self {
            min: N_SIZE_MIN,
            max: N_SIZE_MAX,
            step: N_SIZE_STEP,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Hard failures of loading a record or exporting a workbook.
///
/// Missing or unparsable per-product data is never an error.
#[derive(Debug, Error)]
pub enum ProductXlsxError {
    /// A CSV row did not yield a key/value pair.
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord {
        /// One-based source line.
        line: u64,
        /// Parser diagnostic.
        message: String,
    },
    /// The record source could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The workbook could not be written to its destination.
    #[error("Failed to write workbook {}: {message}", .path.display())]
    ExportIo {
        /// Destination path.
        path: PathBuf,
        /// Underlying writer error text.
        message: String,
    },
    /// A template reference could not be parsed.
    #[error("Invalid template layout: {0}")]
    InvalidLayout(String),
    /// Sheet title violates Excel naming rules.
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),
}

pub type Result<T> = std::result::Result<T, ProductXlsxError>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
