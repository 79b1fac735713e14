use std::fmt::Display;
use std::hash::{
    Hash,
    Hasher,
};
use std::str::FromStr;

use anyhow::{
    anyhow,
    Context,
};
use bio_types::annot::loc::Loc;
use bio_types::annot::pos::SeqPosUnstranded;
use bio_types::strand::NoStrand;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    BsxSmallStr,
    PosType,
    SeqNameStr,
    SeqPosNum,
};

/// A single-base genomic coordinate: sequence name and 1-based offset.
///
/// Positions are strand-agnostic. The canonical text form is
/// `seqname:position-position` (a width-1 range), which [`FromStr`] parses
/// back; the short `seqname:position` form is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomicPosition<R = BsxSmallStr, P = PosType>
where
    R: SeqNameStr,
    P: SeqPosNum, {
    seqname:  R,
    position: P,
}

impl<R, P> GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    /// Creates a new `GenomicPosition`.
    pub fn new(
        seqname: R,
        position: P,
    ) -> Self {
        Self { seqname, position }
    }

    /// Returns the sequence name.
    pub fn seqname(&self) -> R {
        self.seqname.clone()
    }

    /// Returns the position.
    pub fn position(&self) -> P {
        self.position
    }
}

impl<R, P> TryFrom<SeqPosUnstranded> for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    type Error = anyhow::Error;

    fn try_from(value: SeqPosUnstranded) -> Result<Self, Self::Error> {
        let position = P::from(value.pos()).ok_or_else(|| {
            anyhow!("Position {} does not fit the position type", value.pos())
        })?;
        Ok(Self::new(R::from(value.refid()), position))
    }
}

impl<R, P> From<GenomicPosition<R, P>> for SeqPosUnstranded
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    fn from(value: GenomicPosition<R, P>) -> Self {
        SeqPosUnstranded::new(
            value.seqname.as_ref().to_string(),
            value.position.to_isize().unwrap_or(isize::MAX),
            NoStrand::Unknown,
        )
    }
}

impl<R, P> Eq for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
}

impl<R, P> PartialEq for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname.as_ref() == other.seqname.as_ref()
            && self.position == other.position
    }
}

impl<R, P> Hash for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum + Hash,
{
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.seqname.as_ref().hash(state);
        self.position.hash(state);
    }
}

impl<R, P> Display for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum + Display,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}",
            self.seqname.as_ref(),
            self.position,
            self.position
        )
    }
}

impl<R, P> FromStr for GenomicPosition<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum + FromStr,
    <P as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (seqname, range) = s
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Missing ':' separator in '{}'", s))?;
        if seqname.is_empty() {
            return Err(anyhow!("Empty sequence name in '{}'", s));
        }
        let position = match range.split_once('-') {
            Some((start, end)) => {
                let start: P = start
                    .parse()
                    .with_context(|| format!("Invalid start in '{}'", s))?;
                let end: P = end
                    .parse()
                    .with_context(|| format!("Invalid end in '{}'", s))?;
                if start != end {
                    return Err(anyhow!(
                        "'{}' is not a single-base position",
                        s
                    ));
                }
                end
            },
            None => {
                range
                    .parse()
                    .with_context(|| format!("Invalid position in '{}'", s))?
            },
        };
        Ok(Self::new(R::from(seqname), position))
    }
}
