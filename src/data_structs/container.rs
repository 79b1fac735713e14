use itertools::Itertools;
use log::debug;
use ndarray::{
    Array2,
    Axis,
};
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::coords::GenomicPosition;
use crate::data_structs::matrix::CountMatrix;
use crate::data_structs::metadata::SampleMetadata;
use crate::data_structs::typedef::DensityType;
use crate::error::{
    ConversionError,
    Result,
};

/// Position columns of [`MethylationContainer::to_dataframe`].
pub const CHR_COL: &str = "chr";
pub const POS_COL: &str = "pos";

/// Which per-sample values [`MethylationContainer::to_dataframe`] exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixKind {
    M,
    Cov,
    /// `M / Cov`, null where coverage is zero.
    Beta,
}

/// Coordinate-indexed methylated-count and coverage matrices with their
/// sample metadata.
///
/// Invariants: `rows(M) == rows(Cov) == positions.len()`,
/// `cols(M) == cols(Cov) == metadata.len()` and `M <= Cov` cell-wise.
#[derive(Debug, Clone)]
pub struct MethylationContainer {
    positions: Vec<GenomicPosition>,
    m:         CountMatrix,
    cov:       CountMatrix,
    metadata:  SampleMetadata,
}

impl MethylationContainer {
    /// Binds positions, matrices and metadata after checking their shapes
    /// and that no methylated count exceeds its coverage.
    ///
    /// With `drop_zero_coverage`, rows whose coverage sums to zero across
    /// all samples are removed from the positions and both matrices.
    pub fn try_new(
        positions: Vec<GenomicPosition>,
        m: CountMatrix,
        cov: CountMatrix,
        metadata: SampleMetadata,
        drop_zero_coverage: bool,
    ) -> Result<Self> {
        for (what, actual) in [("M rows", m.nrows()), ("Cov rows", cov.nrows())] {
            if actual != positions.len() {
                return Err(ConversionError::ShapeMismatch {
                    what: what.to_string(),
                    expected: positions.len(),
                    actual,
                });
            }
        }
        if cov.ncols() != m.ncols() {
            return Err(ConversionError::ShapeMismatch {
                what:     "Cov columns".to_string(),
                expected: m.ncols(),
                actual:   cov.ncols(),
            });
        }
        if metadata.len() != m.ncols() {
            return Err(ConversionError::SampleCountMismatch {
                metadata: metadata.len(),
                columns:  m.ncols(),
            });
        }
        m.check_bounded_by(&cov)?;

        let out = Self {
            positions,
            m,
            cov,
            metadata,
        };
        if drop_zero_coverage {
            out.drop_zero_coverage()
        }
        else {
            Ok(out)
        }
    }

    fn drop_zero_coverage(self) -> Result<Self> {
        let keep = self
            .cov
            .row_sums()
            .into_iter()
            .map(|total| total > 0)
            .collect_vec();
        let n_dropped = keep.iter().filter(|flag| !**flag).count();
        if n_dropped == 0 {
            return Ok(self);
        }
        debug!(
            "Dropping {} of {} positions with zero total coverage",
            n_dropped,
            keep.len()
        );

        let positions = self
            .positions
            .into_iter()
            .zip(keep.iter())
            .filter_map(|(pos, flag)| flag.then_some(pos))
            .collect_vec();
        Ok(Self {
            positions,
            m: self.m.filter_rows(&keep)?,
            cov: self.cov.filter_rows(&keep)?,
            metadata: self.metadata,
        })
    }

    pub fn positions(&self) -> &[GenomicPosition] {
        &self.positions
    }

    /// Methylated read counts.
    pub fn m(&self) -> &CountMatrix {
        &self.m
    }

    /// Total coverage.
    pub fn cov(&self) -> &CountMatrix {
        &self.cov
    }

    pub fn metadata(&self) -> &SampleMetadata {
        &self.metadata
    }

    pub fn n_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn n_samples(&self) -> usize {
        self.metadata.len()
    }

    pub fn sample_names(&self) -> &[String] {
        self.metadata.sample_names()
    }

    /// Methylation level `M / Cov` per cell; `None` where coverage is zero.
    pub fn beta_matrix(&self) -> Array2<Option<DensityType>> {
        let m = self.m.to_dense();
        let cov = self.cov.to_dense();
        let mut out = Array2::from_elem(cov.raw_dim(), None);
        ndarray::Zip::from(&mut out)
            .and(&m)
            .and(&cov)
            .for_each(|out, m, cov| {
                if *cov > 0 {
                    *out = Some(*m as DensityType / *cov as DensityType)
                }
            });
        out
    }

    /// Renames samples consistently in the metadata and both matrices.
    pub fn with_sample_names(
        self,
        names: Vec<String>,
    ) -> Result<Self> {
        let metadata = self.metadata.with_sample_names(names.clone())?;
        Ok(Self {
            positions: self.positions,
            m: self.m.with_col_names(names.clone())?,
            cov: self.cov.with_col_names(names)?,
            metadata,
        })
    }

    /// Wide table with `chr` and `pos` columns followed by one column per
    /// sample holding the requested values.
    pub fn to_dataframe(
        &self,
        kind: MatrixKind,
    ) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.n_samples() + 2);
        columns.push(Column::new(
            CHR_COL.into(),
            self.positions
                .iter()
                .map(|p| p.seqname().to_string())
                .collect_vec(),
        ));
        columns.push(Column::new(
            POS_COL.into(),
            self.positions.iter().map(|p| p.position()).collect_vec(),
        ));

        match kind {
            MatrixKind::M | MatrixKind::Cov => {
                let dense = if kind == MatrixKind::M {
                    self.m.to_dense()
                }
                else {
                    self.cov.to_dense()
                };
                for (name, values) in self
                    .sample_names()
                    .iter()
                    .zip(dense.axis_iter(Axis(1)))
                {
                    columns
                        .push(Column::new(name.as_str().into(), values.to_vec()));
                }
            },
            MatrixKind::Beta => {
                let beta = self.beta_matrix();
                for (name, values) in self
                    .sample_names()
                    .iter()
                    .zip(beta.axis_iter(Axis(1)))
                {
                    columns
                        .push(Column::new(name.as_str().into(), values.to_vec()));
                }
            },
        }
        DataFrame::new(columns)
    }
}
