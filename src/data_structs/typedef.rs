//! Scalar types shared by coordinates and matrices.

use std::hash::Hash;

use num::{
    PrimInt,
    Unsigned,
};
use smallstr::SmallString;

/// Inline capacity of sequence names; `chr1`..`chrUn_KI270742v1` fit.
pub const SMALLSTR_SIZE: usize = 20;
pub type BsxSmallStr = SmallString<[u8; SMALLSTR_SIZE]>;
pub type PosType = u32;
/// Methylated and total read counts.
pub type CountType = u32;
/// Beta values (methylated / total).
pub type DensityType = f64;

/// Anything usable as a sequence name.
pub trait SeqNameStr:
    for<'a> From<&'a str> + AsRef<str> + Clone + Eq + Hash {
}

impl<T> SeqNameStr for T where
    T: for<'a> From<&'a str> + AsRef<str> + Clone + Eq + Hash
{
}

/// Anything usable as a 1-based base position.
pub trait SeqPosNum: Unsigned + PrimInt {}

impl<T: Unsigned + PrimInt> SeqPosNum for T {}
