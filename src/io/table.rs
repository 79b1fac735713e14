use std::fmt::Display;
use std::str::FromStr;

use anyhow::anyhow;
use itertools::Itertools;
use log::debug;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

/// Column names of the coordinate triple every input table starts with.
pub const CHR_COL: &str = "chr";
pub const START_COL: &str = "start";
pub const END_COL: &str = "end";

pub const fn coordinate_cols() -> [&'static str; 3] {
    [CHR_COL, START_COL, END_COL]
}

/// Supported table representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Materialized [`DataFrame`]; columns are selected eagerly.
    #[default]
    Eager,
    /// [`LazyFrame`]; only the projected columns are collected.
    Lazy,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eager" => Ok(BackendKind::Eager),
            "lazy" => Ok(BackendKind::Lazy),
            other => Err(anyhow!("Unknown table backend '{}'", other)),
        }
    }
}

impl Display for BackendKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            BackendKind::Eager => write!(f, "eager"),
            BackendKind::Lazy => write!(f, "lazy"),
        }
    }
}

impl BackendKind {
    /// Wraps a materialized table in the backend this tag names.
    pub fn wrap(
        self,
        data: DataFrame,
    ) -> Box<dyn TableBackend> {
        match self {
            BackendKind::Eager => Box::new(EagerTable::new(data)),
            BackendKind::Lazy => Box::new(LazyTable::new(data.lazy())),
        }
    }
}

/// Read access to an input table by column name.
///
/// Implementations differ only in how the columns are sliced out; the
/// returned frame always holds exactly the requested columns, in the
/// requested order.
pub trait TableBackend {
    fn kind(&self) -> BackendKind;

    fn slice_columns(
        &self,
        names: &[String],
    ) -> PolarsResult<DataFrame>;
}

pub struct EagerTable {
    data: DataFrame,
}

impl EagerTable {
    pub fn new(data: DataFrame) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }
}

impl TableBackend for EagerTable {
    fn kind(&self) -> BackendKind {
        BackendKind::Eager
    }

    fn slice_columns(
        &self,
        names: &[String],
    ) -> PolarsResult<DataFrame> {
        self.data.select(names.iter().map(String::as_str))
    }
}

pub struct LazyTable {
    data: LazyFrame,
}

impl LazyTable {
    pub fn new(data: LazyFrame) -> Self {
        Self { data }
    }
}

impl TableBackend for LazyTable {
    fn kind(&self) -> BackendKind {
        BackendKind::Lazy
    }

    fn slice_columns(
        &self,
        names: &[String],
    ) -> PolarsResult<DataFrame> {
        debug!("Collecting {} projected columns", names.len());
        self.data
            .clone()
            .select(names.iter().map(|name| col(name.as_str())).collect_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use polars::df;
    use rstest::rstest;

    use super::*;

    fn table() -> DataFrame {
        df!(
            CHR_COL => ["chr1", "chr1"],
            START_COL => [100i64, 200],
            END_COL => [101i64, 201],
            "a_beta" => [0.5f64, 1.0],
            "a_cov" => [10i64, 4],
        )
        .unwrap()
    }

    #[rstest]
    #[case(BackendKind::Eager)]
    #[case(BackendKind::Lazy)]
    fn test_slice_columns_keeps_requested_order(#[case] kind: BackendKind) {
        let backend = kind.wrap(table());
        assert_eq!(backend.kind(), kind);
        let sliced = backend
            .slice_columns(&["a_cov".to_string(), "a_beta".to_string()])
            .unwrap();
        assert_eq!(sliced.get_column_names_str(), vec!["a_cov", "a_beta"]);
        assert_eq!(sliced.height(), 2);
    }

    #[rstest]
    #[case(BackendKind::Eager)]
    #[case(BackendKind::Lazy)]
    fn test_slice_missing_column_fails(#[case] kind: BackendKind) {
        let backend = kind.wrap(table());
        assert!(backend.slice_columns(&["b_beta".to_string()]).is_err());
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("LAZY".parse::<BackendKind>().unwrap(), BackendKind::Lazy);
        assert_eq!("eager".parse::<BackendKind>().unwrap(), BackendKind::Eager);
        assert!("arrow".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Lazy.to_string(), "lazy");
    }
}
