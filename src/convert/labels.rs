use std::borrow::Cow;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::data_structs::coords::GenomicPosition;
use crate::data_structs::matrix::{
    CountMatrix,
    MatrixRole,
};
use crate::error::Result;

/// Placeholder token marking a beta-value column name.
static BETA_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)beta").expect("valid placeholder pattern"));

/// Replaces every beta placeholder token in `name` with the role tag.
pub fn rewrite_placeholder(
    name: &str,
    role: MatrixRole,
) -> Cow<'_, str> {
    BETA_PLACEHOLDER.replace_all(name, role.tag())
}

/// Gives `matrix` row labels from `positions` when it has none, and
/// rewrites placeholder tokens in its column labels.
///
/// Running this on an already normalized matrix returns it unchanged.
pub fn normalize_labels(
    matrix: CountMatrix,
    positions: &[GenomicPosition],
) -> Result<CountMatrix> {
    let matrix = if matrix.row_names().is_some() {
        matrix
    }
    else {
        let names = positions.iter().map(|p| p.to_string()).collect_vec();
        matrix.with_row_names(names)?
    };

    let role = matrix.role();
    let col_names = matrix
        .col_names()
        .iter()
        .map(|name| rewrite_placeholder(name, role).into_owned())
        .collect_vec();
    matrix.with_col_names(col_names)
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::rstest;

    use super::*;
    use crate::data_structs::matrix::CountStorage;
    use crate::error::ConversionError;

    fn positions() -> Vec<GenomicPosition> {
        vec![
            GenomicPosition::new("chr1".into(), 101),
            GenomicPosition::new("chr1".into(), 201),
        ]
    }

    fn matrix(
        role: MatrixRole,
        names: [&str; 2],
    ) -> CountMatrix {
        CountMatrix::try_new(
            role,
            CountStorage::Dense(array![[1, 2], [3, 4]]),
            names.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[rstest]
    #[case("s1_beta", MatrixRole::M, "s1_M")]
    #[case("Beta.s1", MatrixRole::Cov, "Cov.s1")]
    #[case("s1_cov", MatrixRole::Cov, "s1_cov")]
    #[case("s1_M", MatrixRole::M, "s1_M")]
    fn test_rewrite_placeholder(
        #[case] name: &str,
        #[case] role: MatrixRole,
        #[case] expected: &str,
    ) {
        assert_eq!(rewrite_placeholder(name, role), expected);
    }

    #[test]
    fn test_assigns_row_names() {
        let input = matrix(MatrixRole::M, ["a_beta", "b_beta"]);
        let normalized = normalize_labels(input, &positions()).unwrap();
        assert_eq!(
            normalized.row_names().unwrap(),
            &["chr1:101-101".to_string(), "chr1:201-201".to_string()]
        );
        assert_eq!(normalized.col_names(), &["a_M".to_string(), "b_M".to_string()]);
    }

    #[test]
    fn test_keeps_existing_row_names() {
        let labeled = matrix(MatrixRole::Cov, ["a", "b"])
            .with_row_names(vec!["x".into(), "y".into()])
            .unwrap();
        let normalized = normalize_labels(labeled, &positions()).unwrap();
        assert_eq!(
            normalized.row_names().unwrap(),
            &["x".to_string(), "y".to_string()]
        );
    }

    #[rstest]
    #[case(MatrixRole::M)]
    #[case(MatrixRole::Cov)]
    fn test_normalize_is_idempotent(#[case] role: MatrixRole) {
        let once = normalize_labels(matrix(role, ["a_beta", "b_cov"]), &positions())
            .unwrap();
        let twice = normalize_labels(once.clone(), &positions()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_position_count_mismatch() {
        let err = normalize_labels(
            matrix(MatrixRole::M, ["a", "b"]),
            &positions()[..1],
        )
        .unwrap_err();
        assert!(matches!(err, ConversionError::ShapeMismatch { .. }));
    }
}
