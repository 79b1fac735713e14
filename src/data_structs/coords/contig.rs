use anyhow::bail;
use serde::{
    Deserialize,
    Serialize,
};

use super::GenomicPosition;
use crate::data_structs::typedef::{
    BsxSmallStr,
    PosType,
    SeqNameStr,
    SeqPosNum,
};

/// A raw interval as it appears in an input table row: sequence name, start
/// and end.
///
/// Whether the interval is `(start, end]` or `[start, end)` is an upstream
/// convention; either way the base it describes is anchored at `end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contig<R = BsxSmallStr, P = PosType>
where
    R: SeqNameStr,
    P: SeqPosNum, {
    seqname: R,
    start:   P,
    end:     P,
}

impl<R, P> Contig<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    /// Creates a new `Contig`, rejecting intervals with `end < start`.
    pub fn try_new(
        seqname: R,
        start: P,
        end: P,
    ) -> anyhow::Result<Self> {
        if end < start {
            bail!(
                "End position must be greater than or equal to start position"
            )
        }
        Ok(Self {
            seqname,
            start,
            end,
        })
    }

    /// Returns the start position.
    pub fn start(&self) -> P {
        self.start
    }

    /// Returns the end position.
    pub fn end(&self) -> P {
        self.end
    }

    /// Returns the sequence name of the contig.
    pub fn seqname(&self) -> &R {
        &self.seqname
    }

    /// Resizes the interval to width 1 anchored at its fixed end.
    pub fn terminal_base(&self) -> GenomicPosition<R, P> {
        GenomicPosition::new(self.seqname.clone(), self.end)
    }
}

impl<R, P> Eq for Contig<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
}

impl<R, P> PartialEq for Contig<R, P>
where
    R: SeqNameStr,
    P: SeqPosNum,
{
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname.as_ref() == other.seqname.as_ref()
            && self.start == other.start
            && self.end == other.end
    }
}
