use bio_types::annot::loc::Loc;
use bio_types::annot::pos::SeqPosUnstranded;
use bio_types::strand::NoStrand;
use rstest::rstest;

use super::*;

// --- GenomicPosition Tests ---

#[test]
fn test_genomic_position_display() {
    let gp: GenomicPosition = GenomicPosition::new("chr1".into(), 12345u32);
    assert_eq!(gp.to_string(), "chr1:12345-12345");
}

#[rstest]
#[case("chr1:12345-12345", "chr1", 12345)]
#[case("chrX:7", "chrX", 7)]
#[case("HLA-A*01:01:100-100", "HLA-A*01:01", 100)]
fn test_genomic_position_from_str(
    #[case] text: &str,
    #[case] seqname: &str,
    #[case] position: u32,
) {
    let gp: GenomicPosition = text.parse().unwrap();
    assert_eq!(gp.seqname().as_str(), seqname);
    assert_eq!(gp.position(), position);
}

#[rstest]
#[case("chr1")]
#[case(":100-100")]
#[case("chr1:100-200")]
#[case("chr1:abc")]
fn test_genomic_position_from_str_rejects(#[case] text: &str) {
    assert!(text.parse::<GenomicPosition>().is_err());
}

#[test]
fn test_genomic_position_display_round_trip() {
    let gp: GenomicPosition = GenomicPosition::new("chr2".into(), 301u32);
    let parsed: GenomicPosition = gp.to_string().parse().unwrap();
    assert_eq!(gp, parsed);
}

#[test]
fn test_genomic_position_eq_and_ne() {
    let gp1a: GenomicPosition = GenomicPosition::new("chr1".into(), 100u32);
    let gp1b: GenomicPosition = GenomicPosition::new("chr1".into(), 100u32);
    let gp2: GenomicPosition = GenomicPosition::new("chr1".into(), 200u32);
    let gp3: GenomicPosition = GenomicPosition::new("chr2".into(), 100u32);

    assert_eq!(gp1a, gp1b);
    assert_ne!(gp1a, gp2);
    assert_ne!(gp1a, gp3);
}

#[test]
fn test_genomic_position_into_seq_pos_unstranded() {
    let gp: GenomicPosition = GenomicPosition::new("chr1".into(), 100u32);
    let bio_pos: SeqPosUnstranded = gp.into();
    assert_eq!(bio_pos.refid(), "chr1");
    assert_eq!(bio_pos.pos(), 100);
}

#[test]
fn test_genomic_position_try_from_seq_pos_unstranded() {
    let bio_pos =
        SeqPosUnstranded::new("chrX".to_string(), 1_000_000, NoStrand::Unknown);
    let gp: GenomicPosition = bio_pos.try_into().unwrap();
    assert_eq!(gp.seqname().as_str(), "chrX");
    assert_eq!(gp.position(), 1_000_000);

    let negative = SeqPosUnstranded::new("chrX".to_string(), -5, NoStrand::Unknown);
    let converted: anyhow::Result<GenomicPosition> = negative.try_into();
    assert!(converted.is_err());
}

// --- Contig Tests ---

#[test]
fn test_contig_terminal_base() {
    let contig: Contig = Contig::try_new("chr1".into(), 100u32, 101u32).unwrap();
    let gp = contig.terminal_base();
    assert_eq!(gp.seqname().as_str(), "chr1");
    assert_eq!(gp.position(), 101);
    assert_eq!((contig.start(), contig.end()), (100, 101));
}

#[test]
fn test_contig_zero_width_is_valid() {
    let contig: Contig = Contig::try_new("chr1".into(), 55u32, 55u32).unwrap();
    assert_eq!(contig.terminal_base().position(), 55);
}

#[test]
fn test_contig_rejects_reversed_interval() {
    assert!(Contig::<crate::data_structs::typedef::BsxSmallStr, u32>::try_new(
        "chr1".into(),
        200,
        100
    )
    .is_err());
}
