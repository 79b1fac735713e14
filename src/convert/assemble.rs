use itertools::Itertools;
use log::{
    debug,
    warn,
};

use crate::data_structs::container::MethylationContainer;
use crate::data_structs::coords::GenomicPosition;
use crate::data_structs::matrix::CountMatrix;
use crate::data_structs::metadata::SampleMetadata;
use crate::error::{
    ConversionError,
    Result,
};

/// Collapses verbose per-sample name suffixes of a finished container.
pub trait SampleNameSimplifier {
    fn simplify(
        &self,
        container: MethylationContainer,
    ) -> anyhow::Result<MethylationContainer>;
}

/// Removes the longest suffix shared by every sample name, cut at a
/// separator character, e.g. `s1_CpG_report`/`s2_CpG_report` become
/// `s1`/`s2`.
///
/// Names are left as they are when there is a single sample, when no shared
/// suffix starts at a separator, or when stripping would leave an empty or
/// duplicated name.
#[derive(Debug, Clone)]
pub struct CommonSuffixSimplifier {
    separators: Vec<char>,
}

impl Default for CommonSuffixSimplifier {
    fn default() -> Self {
        Self {
            separators: vec!['_', '.', '-'],
        }
    }
}

impl CommonSuffixSimplifier {
    pub fn new(separators: Vec<char>) -> Self {
        Self { separators }
    }

    /// Returns the simplified names, or `None` if they should stay as is.
    pub fn simplified_names(
        &self,
        names: &[String],
    ) -> Option<Vec<String>> {
        if names.len() < 2 {
            return None;
        }
        let shared = names
            .iter()
            .skip(1)
            .map(|name| common_suffix_len(&names[0], name))
            .min()
            .unwrap_or(0);
        let suffix = &names[0][names[0].len() - shared..];
        let cut = suffix.find(|c| self.separators.contains(&c))?;
        let suffix = &suffix[cut..];

        let stripped = names
            .iter()
            .map(|name| name[..name.len() - suffix.len()].to_string())
            .collect_vec();
        if stripped.iter().any(String::is_empty) || !stripped.iter().all_unique() {
            warn!(
                "Stripping suffix '{}' would leave empty or duplicated sample \
                 names; keeping original names",
                suffix
            );
            return None;
        }
        Some(stripped)
    }
}

/// Byte length of the longest common suffix, on char boundaries.
fn common_suffix_len(
    a: &str,
    b: &str,
) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

impl SampleNameSimplifier for CommonSuffixSimplifier {
    fn simplify(
        &self,
        container: MethylationContainer,
    ) -> anyhow::Result<MethylationContainer> {
        match self.simplified_names(container.sample_names()) {
            Some(names) => {
                debug!("Simplified sample names: {}", names.join(", "));
                Ok(container.with_sample_names(names)?)
            },
            None => Ok(container),
        }
    }
}

/// Binds positions, matrices and metadata into the final container.
pub struct Assembler {
    simplifier: Box<dyn SampleNameSimplifier>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            simplifier: Box::new(CommonSuffixSimplifier::default()),
        }
    }
}

impl Assembler {
    pub fn with_simplifier(
        mut self,
        simplifier: Box<dyn SampleNameSimplifier>,
    ) -> Self {
        self.simplifier = simplifier;
        self
    }

    /// Names both matrices' columns after the metadata samples, builds the
    /// container with zero-coverage rows removed, and optionally simplifies
    /// the sample names.
    pub fn assemble(
        &self,
        positions: Vec<GenomicPosition>,
        m: CountMatrix,
        cov: CountMatrix,
        metadata: SampleMetadata,
        simplify_names: bool,
    ) -> Result<MethylationContainer> {
        for matrix in [&m, &cov] {
            if metadata.len() != matrix.ncols() {
                return Err(ConversionError::SampleCountMismatch {
                    metadata: metadata.len(),
                    columns:  matrix.ncols(),
                });
            }
        }
        let names = metadata.sample_names().clone();
        let m = m.with_col_names(names.clone())?;
        let cov = cov.with_col_names(names)?;

        let container =
            MethylationContainer::try_new(positions, m, cov, metadata, true)?;
        if simplify_names {
            // Typed errors raised inside a simplifier come back unchanged.
            self.simplifier.simplify(container).map_err(|err| {
                err.downcast::<ConversionError>()
                    .unwrap_or_else(ConversionError::External)
            })
        }
        else {
            Ok(container)
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use ndarray::array;
    use rstest::rstest;

    use super::*;
    use crate::data_structs::matrix::{
        CountStorage,
        MatrixRole,
    };

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn inputs() -> (Vec<GenomicPosition>, CountMatrix, CountMatrix) {
        let positions = vec![
            GenomicPosition::new("chr1".into(), 101),
            GenomicPosition::new("chr1".into(), 201),
        ];
        let m = CountMatrix::try_new(
            MatrixRole::M,
            CountStorage::Dense(array![[1, 0], [0, 0]]),
            strings(&["a_M", "b_M"]),
        )
        .unwrap();
        let cov = CountMatrix::try_new(
            MatrixRole::Cov,
            CountStorage::Dense(array![[2, 0], [0, 0]]),
            strings(&["a_cov", "b_cov"]),
        )
        .unwrap();
        (positions, m, cov)
    }

    #[rstest]
    #[case(&["s1_CpG_report", "s2_CpG_report"], Some(&["s1", "s2"][..]))]
    #[case(&["a.bed", "b.bed"], Some(&["a", "b"][..]))]
    #[case(&["ab_rep", "cb_rep"], Some(&["ab", "cb"][..]))]
    #[case(&["x_1", "x_2"], None)]
    #[case(&["_s", "_s"], None)]
    #[case(&["only_report"], None)]
    #[case(&["a", "a_b"], None)]
    fn test_simplified_names(
        #[case] names: &[&str],
        #[case] expected: Option<&[&str]>,
    ) {
        let simplified =
            CommonSuffixSimplifier::default().simplified_names(&strings(names));
        assert_eq!(simplified, expected.map(strings));
    }

    #[test]
    fn test_columns_follow_metadata() {
        let (positions, m, cov) = inputs();
        let container = Assembler::default()
            .assemble(
                positions,
                m,
                cov,
                SampleMetadata::try_new(["a", "b"]).unwrap(),
                false,
            )
            .unwrap();
        assert_eq!(container.m().col_names(), &strings(&["a", "b"])[..]);
        assert_eq!(container.cov().col_names(), &strings(&["a", "b"])[..]);
        assert_eq!(container.n_positions(), 1);
    }

    #[test]
    fn test_sample_count_mismatch() {
        let (positions, m, cov) = inputs();
        let err = Assembler::default()
            .assemble(
                positions,
                m,
                cov,
                SampleMetadata::try_new(["a", "b", "c"]).unwrap(),
                false,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::SampleCountMismatch {
                metadata: 3,
                columns:  2,
            }
        ));
    }

    #[test]
    fn test_simplify_names() {
        let (positions, m, cov) = inputs();
        let container = Assembler::default()
            .assemble(
                positions,
                m,
                cov,
                SampleMetadata::try_new(["a_report", "b_report"]).unwrap(),
                true,
            )
            .unwrap();
        assert_eq!(container.sample_names(), &strings(&["a", "b"])[..]);
        assert_eq!(container.m().col_names(), container.sample_names());
    }

    struct FailingSimplifier;

    impl SampleNameSimplifier for FailingSimplifier {
        fn simplify(
            &self,
            _container: MethylationContainer,
        ) -> anyhow::Result<MethylationContainer> {
            Err(anyhow!("name service unavailable"))
        }
    }

    /// Renames to a fixed list, whatever the sample count.
    struct FixedNames(Vec<String>);

    impl SampleNameSimplifier for FixedNames {
        fn simplify(
            &self,
            container: MethylationContainer,
        ) -> anyhow::Result<MethylationContainer> {
            Ok(container.with_sample_names(self.0.clone())?)
        }
    }

    #[test]
    fn test_simplifier_keeps_typed_errors() {
        let (positions, m, cov) = inputs();
        let err = Assembler::default()
            .with_simplifier(Box::new(FixedNames(strings(&["only"]))))
            .assemble(
                positions,
                m,
                cov,
                SampleMetadata::try_new(["a", "b"]).unwrap(),
                true,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::SampleCountMismatch {
                metadata: 2,
                columns:  1,
            }
        ));
    }

    #[test]
    fn test_simplifier_error_propagates() {
        let (positions, m, cov) = inputs();
        let assembler =
            Assembler::default().with_simplifier(Box::new(FailingSimplifier));
        let err = assembler
            .assemble(
                positions.clone(),
                m.clone(),
                cov.clone(),
                SampleMetadata::try_new(["a", "b"]).unwrap(),
                true,
            )
            .unwrap_err();
        assert!(matches!(err, ConversionError::External(_)));

        // Not invoked when simplification is off.
        assert!(assembler
            .assemble(
                positions,
                m,
                cov,
                SampleMetadata::try_new(["a", "b"]).unwrap(),
                false,
            )
            .is_ok());
    }
}
