//! # bsxmatrix
//!
//! `bsxmatrix` turns a flat table of per-position, per-sample methylation
//! calls into a coordinate-indexed pair of matrices for downstream
//! statistics: methylated read counts (`M`) and total coverage (`Cov`).
//!
//! The input table holds a `chr`/`start`/`end` coordinate triple followed by
//! one beta-value/coverage column pair per sample. The conversion
//!
//! * collapses each row's interval to its terminal base,
//! * reconstructs `M = round(beta * coverage)` and `Cov`, filling missing
//!   cells with zero in dense or sparse storage,
//! * labels rows by position and columns by sample name,
//! * drops positions with no coverage in any sample.
//!
//! ## Structure
//!
//! * [`data_structs`]: coordinates ([`GenomicPosition`], [`Contig`]),
//!   [`SampleMetadata`], [`CountMatrix`] and the resulting
//!   [`MethylationContainer`].
//! * [`io`]: the [`TableBackend`]s a table is read through and the
//!   [`ConversionParams`] describing its layout.
//! * [`convert`]: the conversion stages and the [`MatrixConverter`] that
//!   chains them.
//! * [`error`]: the [`ConversionError`] taxonomy.
//!
//! ## Usage
//!
//! ```no_run
//! use bsxmatrix::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = df!(
//!         "chr" => ["chr1", "chr1"],
//!         "start" => [100i64, 200],
//!         "end" => [101i64, 201],
//!         "s1_beta" => [Some(0.5f64), None],
//!         "s1_cov" => [10i64, 5],
//!     )?;
//!     let params = ConversionParams::from_sample_names(&["s1"])?
//!         .with_fill_policy(FillPolicy::SparseZeroFill);
//!
//!     let container = bsxmatrix::convert::convert(table, &params)?;
//!     println!(
//!         "{} positions x {} samples",
//!         container.n_positions(),
//!         container.n_samples()
//!     );
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod data_structs;
pub mod error;
pub mod exports;
pub mod io;
pub mod prelude;
pub mod utils;

pub use crate::convert::{
    FillPolicy,
    MatrixConverter,
};
pub use crate::data_structs::{
    Contig,
    CountMatrix,
    GenomicPosition,
    MethylationContainer,
    SampleMetadata,
};
pub use crate::error::ConversionError;
pub use crate::io::{
    ConversionParams,
    TableBackend,
};
