use hashbrown::HashSet;
use indexmap::IndexMap;
use itertools::Itertools;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    ConversionError,
    Result,
};
use crate::getter_fn;

/// Name of the sample-name column in [`SampleMetadata::to_dataframe`].
pub const SAMPLE_NAME_COL: &str = "sample_name";

/// Ordered sample names plus per-sample phenotype attributes.
///
/// The order of `sample_names` is the column order of every matrix built
/// from this metadata. Each attribute holds exactly one value per sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMetadata {
    sample_names: Vec<String>,
    #[serde(default)]
    attributes:   IndexMap<String, Vec<String>>,
}

impl SampleMetadata {
    getter_fn!(sample_names, Vec<String>);

    getter_fn!(attributes, IndexMap<String, Vec<String>>);

    /// Creates metadata for the given samples, without attributes.
    pub fn try_new<S: Into<String>>(
        sample_names: impl IntoIterator<Item = S>
    ) -> Result<Self> {
        let out = Self {
            sample_names: sample_names.into_iter().map_into().collect(),
            attributes:   IndexMap::new(),
        };
        out.validate()?;
        Ok(out)
    }

    /// Adds a phenotype attribute with one value per sample.
    pub fn with_attribute<S: Into<String>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let values: Vec<String> = values.into_iter().map_into().collect();
        if values.len() != self.sample_names.len() {
            return Err(ConversionError::InvalidMetadata(format!(
                "attribute '{}' has {} values for {} samples",
                name,
                values.len(),
                self.sample_names.len()
            )));
        }
        if name == SAMPLE_NAME_COL {
            return Err(ConversionError::InvalidMetadata(format!(
                "'{}' is reserved for sample names",
                SAMPLE_NAME_COL
            )));
        }
        self.attributes.insert(name.to_string(), values);
        Ok(self)
    }

    /// Checks that sample names are unique and non-empty and that every
    /// attribute has one value per sample.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.sample_names.len());
        for name in self.sample_names.iter() {
            if name.is_empty() {
                return Err(ConversionError::InvalidMetadata(
                    "empty sample name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConversionError::InvalidMetadata(format!(
                    "duplicated sample name '{}'",
                    name
                )));
            }
        }
        if let Some((name, values)) = self
            .attributes
            .iter()
            .find(|(_, values)| values.len() != self.sample_names.len())
        {
            return Err(ConversionError::InvalidMetadata(format!(
                "attribute '{}' has {} values for {} samples",
                name,
                values.len(),
                self.sample_names.len()
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sample_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_names.is_empty()
    }

    /// Returns the values of a phenotype attribute, in sample order.
    pub fn attribute(
        &self,
        name: &str,
    ) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Returns a copy with samples renamed, keeping order and attributes.
    pub fn with_sample_names(
        &self,
        names: Vec<String>,
    ) -> Result<Self> {
        if names.len() != self.sample_names.len() {
            return Err(ConversionError::SampleCountMismatch {
                metadata: self.sample_names.len(),
                columns:  names.len(),
            });
        }
        let out = Self {
            sample_names: names,
            attributes:   self.attributes.clone(),
        };
        out.validate()?;
        Ok(out)
    }

    /// Phenotype table with a `sample_name` column followed by one string
    /// column per attribute.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![Column::new(
            SAMPLE_NAME_COL.into(),
            self.sample_names.as_slice(),
        )];
        for (name, values) in self.attributes.iter() {
            columns.push(Column::new(name.as_str().into(), values.as_slice()));
        }
        DataFrame::new(columns)
    }
}
