//! Reconstruction of methylated-count and coverage matrices from beta values
//! and coverage.
//!
//! The methylated count of a cell is `round(beta * coverage)`, rounding half
//! to even. Missing cells (null or NaN in the source) are resolved by a
//! [`MissingValueFixer`] under the configured [`FillPolicy`]; both policies
//! give identical values and differ only in storage.

use itertools::Itertools;
use log::{
    debug,
    warn,
};
use nalgebra_sparse::{
    CooMatrix,
    CsrMatrix,
};
use ndarray::{
    Array2,
    Zip,
};
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::matrix::{
    CountMatrix,
    CountStorage,
    MatrixRole,
};
use crate::data_structs::typedef::CountType;
use crate::error::{
    ConversionError,
    Result,
};
use crate::io::table::TableBackend;

/// A `rows x samples` matrix of values before missing-value resolution.
pub type RawMatrix = Array2<Option<f64>>;

/// How missing cells are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Every cell is stored; missing cells hold the fill value.
    #[default]
    #[serde(rename = "dense")]
    DenseZeroFill,
    /// Compressed sparse rows; zeros, including filled missing cells, are
    /// implicit.
    #[serde(rename = "sparse")]
    SparseZeroFill,
}

impl FillPolicy {
    pub fn is_sparse(&self) -> bool {
        matches!(self, FillPolicy::SparseZeroFill)
    }
}

/// Replaces missing cells and converts the result into count storage.
///
/// Implementations must return storage of the same shape as `raw` with no
/// unresolved cell; a cell that cannot be turned into a count is reported
/// as [`ConversionError::MissingValueResolution`].
pub trait MissingValueFixer {
    fn fix(
        &self,
        raw: &RawMatrix,
        fill_value: CountType,
        policy: FillPolicy,
    ) -> Result<CountStorage>;
}

/// Fills missing cells with the fill value. Present values must already be
/// non-negative integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroFill;

impl ZeroFill {
    fn resolve(
        value: Option<f64>,
        fill_value: CountType,
        row: usize,
        col: usize,
    ) -> Result<CountType> {
        match value {
            None => Ok(fill_value),
            Some(v)
                if v.is_finite()
                    && v >= 0.0
                    && v.fract() == 0.0
                    && v <= CountType::MAX as f64 =>
            {
                Ok(v as CountType)
            },
            Some(_) => Err(ConversionError::MissingValueResolution { row, col }),
        }
    }
}

impl MissingValueFixer for ZeroFill {
    fn fix(
        &self,
        raw: &RawMatrix,
        fill_value: CountType,
        policy: FillPolicy,
    ) -> Result<CountStorage> {
        match policy {
            FillPolicy::DenseZeroFill => {
                let values = raw
                    .indexed_iter()
                    .map(|((row, col), value)| {
                        Self::resolve(*value, fill_value, row, col)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CountStorage::Dense(Array2::from_shape_vec(
                    raw.raw_dim(),
                    values,
                )?))
            },
            FillPolicy::SparseZeroFill => {
                let mut coo = CooMatrix::new(raw.nrows(), raw.ncols());
                for ((row, col), value) in raw.indexed_iter() {
                    let count = Self::resolve(*value, fill_value, row, col)?;
                    if count != 0 {
                        coo.push(row, col, count);
                    }
                }
                Ok(CountStorage::Sparse(CsrMatrix::from(&coo)))
            },
        }
    }
}

/// Builds the `M` and `Cov` matrices from beta-value and coverage columns.
pub struct MatrixReconstructor {
    policy: FillPolicy,
    fixer:  Box<dyn MissingValueFixer>,
}

impl MatrixReconstructor {
    /// Reconstructor with the [`ZeroFill`] fixer.
    pub fn new(policy: FillPolicy) -> Self {
        Self {
            policy,
            fixer: Box::new(ZeroFill),
        }
    }

    pub fn with_fixer(
        mut self,
        fixer: Box<dyn MissingValueFixer>,
    ) -> Self {
        self.fixer = fixer;
        self
    }

    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// Returns `(M, Cov)`, both `n_rows x beta_cols.len()`, with columns named
    /// after the source columns.
    pub fn reconstruct(
        &self,
        table: &dyn TableBackend,
        beta_cols: &[String],
        cov_cols: &[String],
        n_rows: usize,
    ) -> Result<(CountMatrix, CountMatrix)> {
        if beta_cols.len() != cov_cols.len() {
            return Err(ConversionError::DimensionMismatch {
                beta:     beta_cols.len(),
                coverage: cov_cols.len(),
            });
        }

        let beta = frame_to_raw(&table.slice_columns(beta_cols)?, n_rows)?;
        let coverage = frame_to_raw(&table.slice_columns(cov_cols)?, n_rows)?;
        validate_beta(&beta)?;
        validate_coverage(&coverage)?;
        let empty = empty_columns(&coverage, cov_cols);
        if !empty.is_empty() {
            warn!("No coverage data for columns: {}", empty.join(", "));
        }

        let methylated = methylated_counts(&beta, &coverage);
        debug!(
            "Resolving missing values ({} of {} M cells, {} of {} Cov cells)",
            count_missing(&methylated),
            methylated.len(),
            count_missing(&coverage),
            coverage.len()
        );

        let m = self.fix_checked(&methylated)?;
        let cov = self.fix_checked(&coverage)?;

        let m = CountMatrix::try_new(MatrixRole::M, m, beta_cols.to_vec())?;
        let cov = CountMatrix::try_new(MatrixRole::Cov, cov, cov_cols.to_vec())?;
        m.check_bounded_by(&cov)?;
        Ok((m, cov))
    }

    fn fix_checked(
        &self,
        raw: &RawMatrix,
    ) -> Result<CountStorage> {
        let storage = self.fixer.fix(raw, 0, self.policy)?;
        if storage.nrows() != raw.nrows() {
            return Err(ConversionError::ShapeMismatch {
                what:     "fixed matrix rows".to_string(),
                expected: raw.nrows(),
                actual:   storage.nrows(),
            });
        }
        if storage.ncols() != raw.ncols() {
            return Err(ConversionError::ShapeMismatch {
                what:     "fixed matrix columns".to_string(),
                expected: raw.ncols(),
                actual:   storage.ncols(),
            });
        }
        Ok(storage)
    }
}

/// Collects the columns of `frame` into a `n_rows x width` matrix. Nulls and
/// NaN become `None`.
pub fn frame_to_raw(
    frame: &DataFrame,
    n_rows: usize,
) -> Result<RawMatrix> {
    let mut raw = Array2::from_elem((n_rows, frame.width()), None);
    for (col, column) in frame.get_columns().iter().enumerate() {
        if column.len() != n_rows {
            return Err(ConversionError::ShapeMismatch {
                what:     format!("column '{}' length", column.name()),
                expected: n_rows,
                actual:   column.len(),
            });
        }
        let values = column
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        for (row, value) in values.f64()?.into_iter().enumerate() {
            raw[(row, col)] = value.filter(|v| !v.is_nan());
        }
    }
    Ok(raw)
}

fn validate_beta(beta: &RawMatrix) -> Result<()> {
    match beta
        .indexed_iter()
        .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
    {
        Some(((row, col), _)) => {
            Err(ConversionError::InvalidMeasurement {
                row,
                col,
                reason: "beta value is not finite".to_string(),
            })
        },
        None => Ok(()),
    }
}

fn validate_coverage(coverage: &RawMatrix) -> Result<()> {
    for ((row, col), value) in coverage.indexed_iter() {
        if let Some(v) = value {
            if !v.is_finite()
                || *v < 0.0
                || v.fract() != 0.0
                || *v > CountType::MAX as f64
            {
                return Err(ConversionError::InvalidMeasurement {
                    row,
                    col,
                    reason: format!(
                        "coverage {} is not a count in [0, {}]",
                        v,
                        CountType::MAX
                    ),
                });
            }
        }
    }
    Ok(())
}

/// `round(beta * coverage)` per cell, missing where either input is missing.
///
/// Results are clamped to `[0, coverage]`; beta values outside `[0, 1]` are
/// the only way to leave that range.
pub fn methylated_counts(
    beta: &RawMatrix,
    coverage: &RawMatrix,
) -> RawMatrix {
    let mut n_clamped = 0usize;
    let mut out = Array2::from_elem(beta.raw_dim(), None);
    Zip::from(&mut out)
        .and(beta)
        .and(coverage)
        .for_each(|out, beta, coverage| {
            if let (Some(beta), Some(coverage)) = (beta, coverage) {
                let count = (beta * coverage).round_ties_even();
                let clamped = count.clamp(0.0, *coverage);
                if clamped != count {
                    n_clamped += 1;
                }
                *out = Some(clamped);
            }
        });
    if n_clamped > 0 {
        warn!(
            "{} methylated counts fell outside [0, coverage] and were clamped",
            n_clamped
        );
    }
    out
}

fn count_missing(raw: &RawMatrix) -> usize {
    raw.iter().filter(|v| v.is_none()).count()
}

/// Sample columns whose every value is missing.
pub fn empty_columns(
    raw: &RawMatrix,
    names: &[String],
) -> Vec<String> {
    raw.columns()
        .into_iter()
        .zip(names.iter())
        .filter(|(column, _)| column.iter().all(Option::is_none))
        .map(|(_, name)| name.clone())
        .collect_vec()
}
