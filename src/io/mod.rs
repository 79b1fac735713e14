//! Input side of the conversion: the table backends the raw data is read
//! through and the parameters that describe its layout.

pub mod params;
pub mod table;

pub use params::ConversionParams;
pub use table::{
    BackendKind,
    EagerTable,
    LazyTable,
    TableBackend,
};
