use std::io::Read;

use itertools::Itertools;
use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use crate::convert::reconstruct::FillPolicy;
use crate::data_structs::metadata::SampleMetadata;
use crate::error::Result;
use crate::io::table::BackendKind;
use crate::{
    getter_fn,
    with_field_fn,
};

/// Suffix of beta-value columns in the conventional table layout.
pub const BETA_SUFFIX: &str = "_beta";
/// Suffix of coverage columns in the conventional table layout.
pub const COV_SUFFIX: &str = "_cov";

/// Describes how to read an input table: which columns hold beta values and
/// coverage, which backend holds the table, how missing values are filled,
/// and which samples the column pairs belong to.
///
/// Can be loaded from JSON:
///
/// ```json
/// {
///   "beta_cols": ["s1_beta", "s2_beta"],
///   "cov_cols": ["s1_cov", "s2_cov"],
///   "backend": "lazy",
///   "fill_policy": "sparse",
///   "metadata": { "sample_names": ["s1", "s2"] },
///   "simplify_names": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionParams {
    beta_cols:      Vec<String>,
    cov_cols:       Vec<String>,
    #[serde(default)]
    backend:        BackendKind,
    #[serde(default)]
    fill_policy:    FillPolicy,
    metadata:       SampleMetadata,
    #[serde(default)]
    simplify_names: bool,
}

impl ConversionParams {
    getter_fn!(beta_cols, Vec<String>);

    getter_fn!(cov_cols, Vec<String>);

    getter_fn!(backend, BackendKind);

    getter_fn!(fill_policy, FillPolicy);

    getter_fn!(metadata, SampleMetadata);

    getter_fn!(simplify_names, bool);

    with_field_fn!(backend, BackendKind);

    with_field_fn!(fill_policy, FillPolicy);

    with_field_fn!(simplify_names, bool);

    pub fn new(
        beta_cols: Vec<String>,
        cov_cols: Vec<String>,
        metadata: SampleMetadata,
    ) -> Self {
        Self {
            beta_cols,
            cov_cols,
            backend: BackendKind::default(),
            fill_policy: FillPolicy::default(),
            metadata,
            simplify_names: false,
        }
    }

    /// Parameters for the conventional layout where sample `s` has columns
    /// `s_beta` and `s_cov`.
    pub fn from_sample_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let metadata = SampleMetadata::try_new(names.iter().map(|s| s.as_ref()))?;
        let beta_cols = names
            .iter()
            .map(|s| format!("{}{}", s.as_ref(), BETA_SUFFIX))
            .collect_vec();
        let cov_cols = names
            .iter()
            .map(|s| format!("{}{}", s.as_ref(), COV_SUFFIX))
            .collect_vec();
        Ok(Self::new(beta_cols, cov_cols, metadata))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.metadata.validate()?;
        debug!(
            "Loaded parameters for {} samples ({} backend)",
            params.metadata.len(),
            params.backend
        );
        Ok(params)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let params: Self = serde_json::from_reader(reader)?;
        params.metadata.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    #[test]
    fn test_from_sample_names() {
        let params = ConversionParams::from_sample_names(&["a", "b"]).unwrap();
        assert_eq!(params.beta_cols(), &vec!["a_beta", "b_beta"]);
        assert_eq!(params.cov_cols(), &vec!["a_cov", "b_cov"]);
        assert_eq!(params.metadata().sample_names(), &vec!["a", "b"]);
        assert_eq!(params.backend(), &BackendKind::Eager);
        assert_eq!(params.fill_policy(), &FillPolicy::DenseZeroFill);
        assert!(!params.simplify_names());
    }

    #[test]
    fn test_json_round_trip() {
        let params = ConversionParams::from_sample_names(&["a"])
            .unwrap()
            .with_backend(BackendKind::Lazy)
            .with_fill_policy(FillPolicy::SparseZeroFill)
            .with_simplify_names(true);
        let json = params.to_json().unwrap();
        assert!(json.contains("\"lazy\""));
        assert!(json.contains("\"sparse\""));
        assert_eq!(ConversionParams::from_json_str(&json).unwrap(), params);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "beta_cols": ["x_beta"],
            "cov_cols": ["x_cov"],
            "metadata": { "sample_names": ["x"] }
        }"#;
        let params = ConversionParams::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(params.backend(), &BackendKind::Eager);
        assert_eq!(params.fill_policy(), &FillPolicy::DenseZeroFill);
        assert!(params.metadata().attributes().is_empty());
    }

    #[test]
    fn test_json_invalid_metadata() {
        let json = r#"{
            "beta_cols": ["x_beta", "y_beta"],
            "cov_cols": ["x_cov", "y_cov"],
            "metadata": { "sample_names": ["x", "x"] }
        }"#;
        assert!(matches!(
            ConversionParams::from_json_str(json),
            Err(ConversionError::InvalidMetadata(_))
        ));
        assert!(matches!(
            ConversionParams::from_json_str("{"),
            Err(ConversionError::Config(_))
        ));
    }
}
