pub use polars::df;
pub use polars::prelude::{
    DataFrame,
    IntoLazy,
    LazyFrame,
};

pub use crate::convert::{
    convert,
    Assembler,
    CommonSuffixSimplifier,
    FillPolicy,
    MatrixConverter,
    MatrixReconstructor,
    MissingValueFixer,
    SampleNameSimplifier,
    ZeroFill,
};
pub use crate::data_structs::typedef::*;
pub use crate::data_structs::{
    Contig,
    CountMatrix,
    CountStorage,
    GenomicPosition,
    MatrixKind,
    MatrixRole,
    MethylationContainer,
    SampleMetadata,
};
pub use crate::error::{
    ConversionError,
};
pub use crate::io::{
    BackendKind,
    ConversionParams,
    EagerTable,
    LazyTable,
    TableBackend,
};
