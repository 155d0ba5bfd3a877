//! End-to-end annotation through the `Annotator` facade.

mod common;

use std::io::Write;

use common::{init_tracing, lof_genome, small_genome, MRNA};
use ferro_effect::config::{EffectConfig, SpliceConfig};
use ferro_effect::model::{ChromosomeSpec, GeneSpec, Genome, GenomeBuilder, Strand, TranscriptSpec, Variant};
use ferro_effect::{Annotator, EffectType, ErrorWarning, Impact};
use rstest::rstest;

fn annotator() -> Annotator {
    init_tracing();
    Annotator::new(small_genome(), EffectConfig::default()).unwrap()
}

#[rstest]
#[case::plus_missense("1", 8, "G", "T", EffectType::NonSynonymousCoding, "NM_PLUS.1:c.4G>T", Some("NM_PLUS.1:p.Asp2Tyr"))]
#[case::minus_missense("2", 19, "C", "A", EffectType::NonSynonymousCoding, "NM_MINUS.1:c.4G>T", Some("NM_MINUS.1:p.Asp2Tyr"))]
#[case::plus_stop_gained("1", 12, "G", "A", EffectType::StopGained, "NM_PLUS.1:c.8G>A", Some("NM_PLUS.1:p.Trp3*"))]
#[case::minus_stop_gained("2", 15, "C", "T", EffectType::StopGained, "NM_MINUS.1:c.8G>A", Some("NM_MINUS.1:p.Trp3*"))]
#[case::start_lost("1", 6, "T", "C", EffectType::StartLost, "NM_PLUS.1:c.2T>C", Some("NM_PLUS.1:p.Met1?"))]
#[case::stop_lost("1", 20, "T", "C", EffectType::StopLost, "NM_PLUS.1:c.16T>C", Some("NM_PLUS.1:p.*6Glnext*?"))]
#[case::synonymous("1", 16, "T", "C", EffectType::SynonymousCoding, "NM_PLUS.1:c.12T>C", None)]
#[case::utr5("1", 3, "C", "G", EffectType::Utr5Prime, "NM_PLUS.1:c.-2C>G", None)]
#[case::minus_upstream("2", 30, "A", "G", EffectType::Upstream, "NM_MINUS.1:c.-8T>C", None)]
fn test_annotate(
    #[case] chrom: &str,
    #[case] pos: i64,
    #[case] r: &str,
    #[case] a: &str,
    #[case] expected: EffectType,
    #[case] dna: &str,
    #[case] protein: Option<&str>,
) {
    let annotator = annotator();
    let effects = annotator.annotate(&Variant::new(chrom, pos, r, a).unwrap());
    let top = &effects[0];
    assert_eq!(top.effect.effect_type, expected, "{:?}", effects);
    assert_eq!(top.effect.impact, expected.impact());
    assert_eq!(top.hgvs.dna.as_deref(), Some(dna));
    assert_eq!(top.hgvs.protein.as_deref(), protein);
    assert!(top.effect.warnings.is_empty());
}

#[test]
fn test_gene_and_transcript_ids() {
    let effects = annotator().annotate(&Variant::new("2", 19, "C", "A").unwrap());
    let e = &effects[0].effect;
    assert_eq!(e.gene_name.as_deref(), Some("MINUS"));
    assert_eq!(e.gene_id.as_deref(), Some("ENSG_MINUS"));
    assert_eq!(e.transcript_id.as_deref(), Some("NM_MINUS.1"));
    assert_eq!(e.rank, 1);
    assert_eq!(e.protein_length, Some(6));
    let codon = e.codon.as_ref().unwrap();
    assert_eq!(codon.codons_ref, "Gat");
    assert_eq!(codon.codons_alt, "Tat");
}

#[test]
fn test_effects_sorted_by_impact() {
    // Deleting two bases of Trp3 is a frameshift on top of the exon change
    let effects = annotator().classify(&Variant::new("1", 12, "GG", "").unwrap());
    assert_eq!(effects[0].effect_type, EffectType::FrameShift);
    assert_eq!(effects[0].impact, Impact::High);
    for pair in effects.windows(2) {
        assert!(pair[0].impact >= pair[1].impact);
    }
}

#[test]
fn test_unknown_chromosome() {
    let effects = annotator().annotate(&Variant::new("chrUn", 5, "A", "G").unwrap());
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].effect.effect_type, EffectType::None);
    assert!(effects[0].effect.has_warning(ErrorWarning::ChromosomeNotFound));
    assert!(effects[0].hgvs.is_empty());
}

#[test]
fn test_reference_mismatch_is_flagged() {
    assert_eq!(&MRNA[8..9], "G");
    let effects = annotator().classify(&Variant::new("1", 8, "A", "T").unwrap());
    assert!(effects
        .iter()
        .all(|e| e.has_warning(ErrorWarning::RefDoesNotMatchGenome)));
}

#[test]
fn test_config_file_controls_flank() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[flank]\nup-down-length = 2").unwrap();
    let config = EffectConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.flank.up_down_length, 2);

    let v = Variant::new("1", 30, "A", "G").unwrap();
    let near = annotator().classify(&v);
    assert_eq!(near[0].effect_type, EffectType::Downstream);
    let far = Annotator::new(small_genome(), config).unwrap().classify(&v);
    assert_eq!(far[0].effect_type, EffectType::Intergenic);
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lof]\nnmd-distance = -1").unwrap();
    assert!(EffectConfig::load_from_path(file.path()).is_err());
}

#[test]
fn test_genome_from_json_file() {
    let json = format!(
        r#"{{
            "name": "json",
            "chromosomes": [{{"name": "1", "length": 28, "sequence": "{}"}}],
            "genes": [{{
                "id": "G", "name": "GENE", "chromosome": "1", "strand": "+",
                "transcripts": [{{
                    "id": "T1", "coding_start": 5, "coding_end": 22,
                    "exons": [{{"start": 0, "end": 27}}]
                }}]
            }}]
        }}"#,
        MRNA
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genome.json");
    std::fs::write(&path, json).unwrap();

    let genome = Genome::from_json_file(&path, &SpliceConfig::default()).unwrap();
    assert_eq!(genome.transcript_count(), 1);
    let annotator = Annotator::new(genome, EffectConfig::default()).unwrap();
    let effects = annotator.annotate(&Variant::new("1", 8, "G", "T").unwrap());
    assert_eq!(effects[0].hgvs.protein.as_deref(), Some("T1:p.Asp2Tyr"));
}

#[test]
fn test_vcf_style_input() {
    // VCF 1-based POS 8 with padding base: TG -> T deletes the G at 0-based 8
    let v = Variant::from_vcf("1", 8, "TG", "T").unwrap();
    assert_eq!((v.start, v.end), (8, 8));
    let effects = annotator().annotate(&v);
    assert_eq!(effects[0].effect.effect_type, EffectType::FrameShift);
    assert_eq!(effects[0].hgvs.dna.as_deref(), Some("NM_PLUS.1:c.4del"));
}

#[rstest]
// The intron is a poly-T run, so both deletions shift to its 3' end
#[case::donor(250, EffectType::SpliceSiteDonor, "NM_LOF.1:c.140-1del")]
#[case::acceptor(399, EffectType::SpliceSiteAcceptor, "NM_LOF.1:c.140-1del")]
fn test_intronic_deletion_at_splice_site(#[case] pos: i64, #[case] expected: EffectType, #[case] dna: &str) {
    let annotator = Annotator::new(lof_genome(), EffectConfig::default()).unwrap();
    let effects = annotator.annotate(&Variant::new("1", pos, "T", "").unwrap());
    assert_eq!(effects[0].effect.effect_type, expected);
    assert_eq!(effects[0].effect.impact, Impact::High);
    assert_eq!(effects[0].effect.transcript_id.as_deref(), Some("NM_LOF.1"));
    assert_eq!(effects[0].hgvs.dna.as_deref(), Some(dna));
}

/// ATG TGG AAA TAA on chromosome `chrom`, which picks the codon table.
fn codon_table_genome(chrom: &str) -> Genome {
    GenomeBuilder::new("tables")
        .chromosome(ChromosomeSpec::with_sequence(chrom, "CCCCCATGTGGAAATAACCCCC"))
        .gene(GeneSpec::new("G", "GENE", chrom, Strand::Plus).with_transcript(
            TranscriptSpec::coding("T", 5, 16, &[(0, 21)]),
        ))
        .build()
        .unwrap()
}

#[rstest]
// TGG -> TGA: Trp in vertebrate mitochondria, stop in the standard code
#[case::mito_tga("MT", 10, "G", "A", EffectType::SynonymousCoding, None)]
#[case::standard_tga("1", 10, "G", "A", EffectType::StopGained, Some("T:p.Trp2*"))]
// AAA -> AGA: stop in vertebrate mitochondria, Arg in the standard code
#[case::mito_aga("MT", 12, "A", "G", EffectType::StopGained, Some("T:p.Lys3*"))]
#[case::standard_aga("1", 12, "A", "G", EffectType::NonSynonymousCoding, Some("T:p.Lys3Arg"))]
fn test_chromosome_codon_table(
    #[case] chrom: &str,
    #[case] pos: i64,
    #[case] reference: &str,
    #[case] alt: &str,
    #[case] expected: EffectType,
    #[case] protein: Option<&str>,
) {
    let annotator = Annotator::new(codon_table_genome(chrom), EffectConfig::default()).unwrap();
    let effects = annotator.annotate(&Variant::new(chrom, pos, reference, alt).unwrap());
    assert_eq!(effects[0].effect.effect_type, expected);
    assert_eq!(effects[0].hgvs.protein.as_deref(), protein);
    assert!(effects[0].effect.warnings.is_empty());
}
