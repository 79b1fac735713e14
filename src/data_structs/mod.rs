//! Core data types: coordinates, sample metadata, count matrices and the
//! container that binds them.

pub mod container;
pub mod coords;
pub mod matrix;
pub mod metadata;
pub mod typedef;

pub use container::{
    MatrixKind,
    MethylationContainer,
};
pub use coords::{
    Contig,
    GenomicPosition,
};
pub use matrix::{
    CountMatrix,
    CountStorage,
    MatrixRole,
};
pub use metadata::SampleMetadata;
