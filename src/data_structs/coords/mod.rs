//! Genomic coordinate types.
//!
//! - [`Contig`]: a raw `(seqname, start, end)` interval read from an input
//!   table row.
//! - [`GenomicPosition`]: the width-1 position a row is collapsed to, used as
//!   the row label of every matrix.

mod contig;
mod gpos;

pub use contig::Contig;
pub use gpos::GenomicPosition;

#[cfg(test)]
mod tests;
