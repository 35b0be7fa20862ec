//! Material property values.
//!
//! A [`PropertyValue`] is a sum type over the storage shapes in
//! [`ValueShape`]. Arrays keep every cell as its canonical string form so
//! that what is written is exactly what is read back.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::property::ValueShape;

/// Errors raised when addressing array cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cell ({row}, {column}) is out of bounds")]
    OutOfBounds { row: usize, column: usize },

    #[error("depth {0} is out of bounds")]
    DepthOutOfBounds(usize),
}

/// Canonical textual rendering of a cell or scalar value.
///
/// Types with a unit-aware form (such as [`Quantity`]) render that form;
/// plain strings render verbatim.
pub trait CanonicalText {
    fn canonical_text(&self) -> String;
}

impl CanonicalText for str {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl CanonicalText for String {
    fn canonical_text(&self) -> String {
        self.clone()
    }
}

impl CanonicalText for f64 {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl CanonicalText for i64 {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl CanonicalText for bool {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl<T: CanonicalText + ?Sized> CanonicalText for &T {
    fn canonical_text(&self) -> String {
        (**self).canonical_text()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quantity
// ─────────────────────────────────────────────────────────────────────────────

/// A magnitude with an optional unit, e.g. `7.85 g/cm^3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Parse `"<number> [unit]"`. Returns `None` when the magnitude is not a number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (number, unit) = text
            .split_once(char::is_whitespace)
            .map_or((text, ""), |(n, u)| (n, u.trim()));
        let value = number.parse::<f64>().ok()?;
        Some(Self::new(value, unit))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

impl CanonicalText for Quantity {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 2D arrays
// ─────────────────────────────────────────────────────────────────────────────

/// Rows × columns of canonical strings.
///
/// The column count is fixed up front; rows are sized from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArray2D")]
pub struct Array2D {
    columns: usize,
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct RawArray2D {
    columns: usize,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawArray2D> for Array2D {
    type Error = ArrayError;

    fn try_from(raw: RawArray2D) -> Result<Self, Self::Error> {
        let array = Self {
            columns: raw.columns,
            rows: raw.rows,
        };
        array.validate()?;
        Ok(array)
    }
}

/// Every row must be exactly `columns` wide.
fn check_rows(rows: &[Vec<String>], columns: usize) -> Result<(), ArrayError> {
    match rows.iter().position(|r| r.len() != columns) {
        Some(row) => Err(ArrayError::ColumnMismatch {
            row,
            expected: columns,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}

impl Array2D {
    pub const fn with_columns(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Resize to `rows` rows, new cells empty.
    pub fn set_rows(&mut self, rows: usize) {
        let columns = self.columns;
        self.rows.resize_with(rows, || vec![String::new(); columns]);
    }

    pub fn push_row<T: CanonicalText>(&mut self, cells: &[T]) -> Result<(), ArrayError> {
        if cells.len() != self.columns {
            return Err(ArrayError::ColumnMismatch {
                row: self.rows.len(),
                expected: self.columns,
                actual: cells.len(),
            });
        }
        self.rows
            .push(cells.iter().map(CanonicalText::canonical_text).collect());
        Ok(())
    }

    pub fn set_value(
        &mut self,
        row: usize,
        column: usize,
        value: impl CanonicalText,
    ) -> Result<(), ArrayError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(ArrayError::OutOfBounds { row, column })?;
        *cell = value.canonical_text();
        Ok(())
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Check that every row has the declared column count.
    pub fn validate(&self) -> Result<(), ArrayError> {
        check_rows(&self.rows, self.columns)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 3D arrays
// ─────────────────────────────────────────────────────────────────────────────

/// One depth slice of an [`Array3D`]: a label plus its own rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSlice {
    pub depth_value: String,
    pub rows: Vec<Vec<String>>,
}

/// Depth slices sharing a column count. Row counts may differ per slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArray3D")]
pub struct Array3D {
    columns: usize,
    slices: Vec<DepthSlice>,
}

#[derive(Deserialize)]
struct RawArray3D {
    columns: usize,
    #[serde(default)]
    slices: Vec<DepthSlice>,
}

impl TryFrom<RawArray3D> for Array3D {
    type Error = ArrayError;

    fn try_from(raw: RawArray3D) -> Result<Self, Self::Error> {
        let array = Self {
            columns: raw.columns,
            slices: raw.slices,
        };
        array.validate()?;
        Ok(array)
    }
}

impl Array3D {
    pub const fn with_columns(columns: usize) -> Self {
        Self {
            columns,
            slices: Vec::new(),
        }
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub fn depth(&self) -> usize {
        self.slices.len()
    }

    pub fn slices(&self) -> &[DepthSlice] {
        &self.slices
    }

    /// Largest row count across all slices.
    pub fn max_rows(&self) -> usize {
        self.slices.iter().map(|s| s.rows.len()).max().unwrap_or(0)
    }

    /// Append an empty slice labelled `depth_value`; returns its index.
    pub fn push_slice(&mut self, depth_value: impl CanonicalText) -> usize {
        self.slices.push(DepthSlice {
            depth_value: depth_value.canonical_text(),
            rows: Vec::new(),
        });
        self.slices.len() - 1
    }

    /// Resize to `depth` slices, new slices unlabelled and empty.
    pub fn set_depth(&mut self, depth: usize) {
        self.slices.resize_with(depth, DepthSlice::default);
    }

    pub fn set_depth_value(
        &mut self,
        depth: usize,
        value: impl CanonicalText,
    ) -> Result<(), ArrayError> {
        let slice = self
            .slices
            .get_mut(depth)
            .ok_or(ArrayError::DepthOutOfBounds(depth))?;
        slice.depth_value = value.canonical_text();
        Ok(())
    }

    pub fn depth_value(&self, depth: usize) -> Option<&str> {
        self.slices.get(depth).map(|s| s.depth_value.as_str())
    }

    /// Resize slice `depth` to `rows` rows, new cells empty.
    pub fn set_rows(&mut self, depth: usize, rows: usize) -> Result<(), ArrayError> {
        let columns = self.columns;
        let slice = self
            .slices
            .get_mut(depth)
            .ok_or(ArrayError::DepthOutOfBounds(depth))?;
        slice
            .rows
            .resize_with(rows, || vec![String::new(); columns]);
        Ok(())
    }

    pub fn row_count(&self, depth: usize) -> Option<usize> {
        self.slices.get(depth).map(|s| s.rows.len())
    }

    pub fn push_row<T: CanonicalText>(
        &mut self,
        depth: usize,
        cells: &[T],
    ) -> Result<(), ArrayError> {
        let columns = self.columns;
        let slice = self
            .slices
            .get_mut(depth)
            .ok_or(ArrayError::DepthOutOfBounds(depth))?;
        if cells.len() != columns {
            return Err(ArrayError::ColumnMismatch {
                row: slice.rows.len(),
                expected: columns,
                actual: cells.len(),
            });
        }
        slice
            .rows
            .push(cells.iter().map(CanonicalText::canonical_text).collect());
        Ok(())
    }

    pub fn set_value(
        &mut self,
        depth: usize,
        row: usize,
        column: usize,
        value: impl CanonicalText,
    ) -> Result<(), ArrayError> {
        let slice = self
            .slices
            .get_mut(depth)
            .ok_or(ArrayError::DepthOutOfBounds(depth))?;
        let cell = slice
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(ArrayError::OutOfBounds { row, column })?;
        *cell = value.canonical_text();
        Ok(())
    }

    pub fn value(&self, depth: usize, row: usize, column: usize) -> Option<&str> {
        self.slices
            .get(depth)?
            .rows
            .get(row)?
            .get(column)
            .map(String::as_str)
    }

    /// Check that every row of every slice has the declared column count.
    pub fn validate(&self) -> Result<(), ArrayError> {
        self.slices
            .iter()
            .try_for_each(|slice| check_rows(&slice.rows, self.columns))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PropertyValue
// ─────────────────────────────────────────────────────────────────────────────

/// A material's concrete data for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Scalar(String),
    LongText(String),
    List(Vec<String>),
    LongList(Vec<String>),
    #[serde(rename = "array2d")]
    Array2D(Array2D),
    #[serde(rename = "array3d")]
    Array3D(Array3D),
}

impl PropertyValue {
    pub fn scalar(value: impl CanonicalText) -> Self {
        Self::Scalar(value.canonical_text())
    }

    pub const fn shape(&self) -> ValueShape {
        match self {
            Self::Scalar(_) => ValueShape::Scalar,
            Self::LongText(_) => ValueShape::LongText,
            Self::List(_) => ValueShape::List,
            Self::LongList(_) => ValueShape::LongList,
            Self::Array2D(_) => ValueShape::Array2D,
            Self::Array3D(_) => ValueShape::Array3D,
        }
    }

    /// True when there is nothing to persist.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) | Self::LongText(s) => s.is_empty(),
            Self::List(items) | Self::LongList(items) => items.is_empty(),
            Self::Array2D(a) => a.row_count() == 0,
            Self::Array3D(a) => a.depth() == 0,
        }
    }

    /// Arrays must be rectangular per row; other shapes always pass.
    pub fn validate(&self) -> Result<(), ArrayError> {
        match self {
            Self::Array2D(a) => a.validate(),
            Self::Array3D(a) => a.validate(),
            _ => Ok(()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) | Self::LongText(s) => Some(s),
            _ => None,
        }
    }
}
