//! The table-to-matrices transformation.
//!
//! Data flows strictly forward:
//!
//! 1. [`coords`]: one width-1 [`GenomicPosition`] per input row.
//! 2. [`reconstruct`]: `M = round(beta * coverage)` and `Cov`, with missing
//!    cells resolved by the configured fill policy.
//! 3. [`labels`]: position row labels and placeholder-free column labels.
//! 4. [`assemble`]: sample-named columns, zero-coverage rows removed,
//!    optional sample-name simplification.
//!
//! The whole table is materialized and processed in a single synchronous
//! call. Callers must not pass tables larger than available memory.
//!
//! [`GenomicPosition`]: crate::data_structs::coords::GenomicPosition

pub mod assemble;
pub mod coords;
pub mod labels;
pub mod reconstruct;

use log::{
    debug,
    info,
};
use polars::prelude::DataFrame;

pub use self::assemble::{
    Assembler,
    CommonSuffixSimplifier,
    SampleNameSimplifier,
};
pub use self::reconstruct::{
    FillPolicy,
    MatrixReconstructor,
    MissingValueFixer,
    ZeroFill,
};
use crate::data_structs::container::MethylationContainer;
use crate::error::Result;
use crate::io::params::ConversionParams;
use crate::io::table::TableBackend;

/// Runs the full conversion for one set of parameters.
pub struct MatrixConverter {
    params:        ConversionParams,
    reconstructor: MatrixReconstructor,
    assembler:     Assembler,
}

impl MatrixConverter {
    pub fn new(params: ConversionParams) -> Self {
        let reconstructor = MatrixReconstructor::new(*params.fill_policy());
        Self {
            params,
            reconstructor,
            assembler: Assembler::default(),
        }
    }

    /// Replaces the [`ZeroFill`] missing-value fixer.
    pub fn with_fixer(
        mut self,
        fixer: Box<dyn MissingValueFixer>,
    ) -> Self {
        self.reconstructor = self.reconstructor.with_fixer(fixer);
        self
    }

    /// Replaces the [`CommonSuffixSimplifier`].
    pub fn with_simplifier(
        mut self,
        simplifier: Box<dyn SampleNameSimplifier>,
    ) -> Self {
        self.assembler = self.assembler.with_simplifier(simplifier);
        self
    }

    pub fn params(&self) -> &ConversionParams {
        &self.params
    }

    /// Wraps `table` in the backend named by the parameters and converts it.
    pub fn convert(
        &self,
        table: DataFrame,
    ) -> Result<MethylationContainer> {
        let backend = self.params.backend().wrap(table);
        self.convert_backend(backend.as_ref())
    }

    /// Converts a table already wrapped in a backend.
    pub fn convert_backend(
        &self,
        table: &dyn TableBackend,
    ) -> Result<MethylationContainer> {
        let params = &self.params;
        info!(
            "Converting table with {} samples ({} backend, {:?})",
            params.metadata().len(),
            table.kind(),
            self.reconstructor.policy()
        );

        let positions = coords::build_positions(table)?;
        let n_rows = positions.len();
        let (m, cov) = self.reconstructor.reconstruct(
            table,
            params.beta_cols(),
            params.cov_cols(),
            n_rows,
        )?;
        debug!("Reconstructed {}x{} matrices", m.nrows(), m.ncols());

        let m = labels::normalize_labels(m, &positions)?;
        let cov = labels::normalize_labels(cov, &positions)?;

        let container = self.assembler.assemble(
            positions,
            m,
            cov,
            params.metadata().clone(),
            *params.simplify_names(),
        )?;
        info!(
            "Retained {} of {} positions",
            container.n_positions(),
            n_rows
        );
        Ok(container)
    }
}

/// Converts `table` with the default fixer and simplifier.
pub fn convert(
    table: DataFrame,
    params: &ConversionParams,
) -> Result<MethylationContainer> {
    MatrixConverter::new(params.clone()).convert(table)
}
