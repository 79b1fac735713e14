use std::fmt::Display;

use itertools::Itertools;
use nalgebra_sparse::CsrMatrix;
use ndarray::{
    Array2,
    Axis,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::CountType;
use crate::error::{
    ConversionError,
    Result,
};

/// Semantic role of a count matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixRole {
    /// Methylated read counts.
    M,
    /// Total read coverage.
    Cov,
}

impl MatrixRole {
    /// Tag used when rewriting placeholder column names.
    pub const fn tag(&self) -> &'static str {
        match self {
            MatrixRole::M => "M",
            MatrixRole::Cov => "Cov",
        }
    }
}

impl Display for MatrixRole {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Backing storage of a [`CountMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub enum CountStorage {
    Dense(Array2<CountType>),
    /// Zeros are implicit.
    Sparse(CsrMatrix<CountType>),
}

impl CountStorage {
    pub fn nrows(&self) -> usize {
        match self {
            CountStorage::Dense(data) => data.nrows(),
            CountStorage::Sparse(data) => data.nrows(),
        }
    }

    pub fn ncols(&self) -> usize {
        match self {
            CountStorage::Dense(data) => data.ncols(),
            CountStorage::Sparse(data) => data.ncols(),
        }
    }
}

/// A `positions x samples` matrix of integer read counts with row and
/// column labels.
///
/// Single-sample data is an `n x 1` matrix; there is no vector form.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMatrix {
    role:      MatrixRole,
    storage:   CountStorage,
    row_names: Option<Vec<String>>,
    col_names: Vec<String>,
}

impl CountMatrix {
    /// Creates a matrix from its storage. `col_names` must have one entry per
    /// column.
    pub fn try_new(
        role: MatrixRole,
        storage: CountStorage,
        col_names: Vec<String>,
    ) -> Result<Self> {
        if col_names.len() != storage.ncols() {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("{} column names", role),
                expected: storage.ncols(),
                actual:   col_names.len(),
            });
        }
        Ok(Self {
            role,
            storage,
            row_names: None,
            col_names,
        })
    }

    pub fn role(&self) -> MatrixRole {
        self.role
    }

    pub fn storage(&self) -> &CountStorage {
        &self.storage
    }

    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }

    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }

    pub fn nrows(&self) -> usize {
        self.storage.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.storage.ncols()
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.storage, CountStorage::Sparse(_))
    }

    /// Number of explicitly stored entries. Equals `nrows * ncols` for dense
    /// storage.
    pub fn nnz(&self) -> usize {
        match &self.storage {
            CountStorage::Dense(data) => data.len(),
            CountStorage::Sparse(data) => data.nnz(),
        }
    }

    /// Returns the value at `(row, col)`, or `None` when out of bounds.
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> Option<CountType> {
        match &self.storage {
            CountStorage::Dense(data) => data.get((row, col)).copied(),
            CountStorage::Sparse(data) => {
                data.get_entry(row, col).map(|entry| entry.into_value())
            },
        }
    }

    /// Iterates over `(row, col, value)` of every non-zero cell, row by row.
    pub fn nonzero_iter(
        &self,
    ) -> Box<dyn Iterator<Item = (usize, usize, CountType)> + '_> {
        match &self.storage {
            CountStorage::Dense(data) => {
                Box::new(
                    data.indexed_iter()
                        .filter(|(_, value)| **value != 0)
                        .map(|((row, col), value)| (row, col, *value)),
                )
            },
            CountStorage::Sparse(data) => {
                Box::new(
                    data.triplet_iter()
                        .filter(|(_, _, value)| **value != 0)
                        .map(|(row, col, value)| (row, col, *value)),
                )
            },
        }
    }

    /// Checks that no cell exceeds the same cell of `upper`, e.g. that
    /// methylated counts never exceed coverage.
    ///
    /// Both matrices must have the same shape.
    pub fn check_bounded_by(
        &self,
        upper: &CountMatrix,
    ) -> Result<()> {
        if self.nrows() != upper.nrows() || self.ncols() != upper.ncols() {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("{} cells bounded by {}", self.role, upper.role),
                expected: upper.nrows() * upper.ncols(),
                actual:   self.nrows() * self.ncols(),
            });
        }
        for (row, col, value) in self.nonzero_iter() {
            let bound = upper.get(row, col).unwrap_or(0);
            if value > bound {
                return Err(ConversionError::InvalidMeasurement {
                    row,
                    col,
                    reason: format!(
                        "{} count {} exceeds {} {}",
                        self.role, value, upper.role, bound
                    ),
                });
            }
        }
        Ok(())
    }

    /// Per-row totals across all samples.
    pub fn row_sums(&self) -> Vec<u64> {
        match &self.storage {
            CountStorage::Dense(data) => {
                data.axis_iter(Axis(0))
                    .map(|row| row.iter().map(|v| *v as u64).sum())
                    .collect()
            },
            CountStorage::Sparse(data) => {
                data.row_iter()
                    .map(|row| row.values().iter().map(|v| *v as u64).sum())
                    .collect()
            },
        }
    }

    /// Materializes the matrix as a dense array.
    pub fn to_dense(&self) -> Array2<CountType> {
        match &self.storage {
            CountStorage::Dense(data) => data.clone(),
            CountStorage::Sparse(data) => {
                let mut out = Array2::zeros((data.nrows(), data.ncols()));
                for (row, col, value) in data.triplet_iter() {
                    out[(row, col)] = *value;
                }
                out
            },
        }
    }

    /// Keeps the rows whose `keep` flag is set, preserving order and row
    /// labels.
    pub fn filter_rows(
        &self,
        keep: &[bool],
    ) -> Result<Self> {
        if keep.len() != self.nrows() {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("{} row mask", self.role),
                expected: self.nrows(),
                actual:   keep.len(),
            });
        }
        let kept = keep
            .iter()
            .positions(|flag| *flag)
            .collect_vec();

        let storage = match &self.storage {
            CountStorage::Dense(data) => {
                CountStorage::Dense(data.select(Axis(0), &kept))
            },
            CountStorage::Sparse(data) => {
                let mut offsets = Vec::with_capacity(kept.len() + 1);
                let mut indices = Vec::new();
                let mut values = Vec::new();
                offsets.push(0);
                for row in kept.iter().map(|i| data.row(*i)) {
                    indices.extend_from_slice(row.col_indices());
                    values.extend_from_slice(row.values());
                    offsets.push(indices.len());
                }
                CountStorage::Sparse(CsrMatrix::try_from_csr_data(
                    kept.len(),
                    data.ncols(),
                    offsets,
                    indices,
                    values,
                )?)
            },
        };
        let row_names = self
            .row_names
            .as_ref()
            .map(|names| kept.iter().map(|i| names[*i].clone()).collect());

        Ok(Self {
            role: self.role,
            storage,
            row_names,
            col_names: self.col_names.clone(),
        })
    }

    /// Replaces row labels. Requires one label per row.
    pub fn with_row_names(
        mut self,
        names: Vec<String>,
    ) -> Result<Self> {
        if names.len() != self.nrows() {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("{} row names", self.role),
                expected: self.nrows(),
                actual:   names.len(),
            });
        }
        self.row_names = Some(names);
        Ok(self)
    }

    /// Replaces column labels. Requires one label per column.
    pub fn with_col_names(
        mut self,
        names: Vec<String>,
    ) -> Result<Self> {
        if names.len() != self.ncols() {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("{} column names", self.role),
                expected: self.ncols(),
                actual:   names.len(),
            });
        }
        self.col_names = names;
        Ok(self)
    }
}
