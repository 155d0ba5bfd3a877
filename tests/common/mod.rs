//! Shared genome fixtures for integration tests.
#![allow(dead_code)]

use ferro_effect::model::{ChromosomeSpec, GeneSpec, Genome, GenomeBuilder, Strand, TranscriptSpec};

/// ATG GAT TGG TTT CAG TAA with five bases of UTR on each side.
pub const MRNA: &str = "CCCCCATGGATTGGTTTCAGTAACCCCC";

/// Reverse complement of [`MRNA`].
pub const MRNA_RC: &str = "GGGGGTTACTGAAACCAATCCATGGGGG";

/// Route `tracing` output through the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Length of the circular chromosome.
pub const CIRCULAR_LENGTH: i64 = 94797;

/// Two single-exon transcripts reading the same mRNA: `NM_PLUS.1` on
/// chromosome "1" and `NM_MINUS.1` on chromosome "2". Both have CDS [5, 22].
pub fn small_genome() -> Genome {
    GenomeBuilder::new("small")
        .chromosome(ChromosomeSpec::with_sequence("1", &format!("{}{}", MRNA, "A".repeat(20))))
        .chromosome(ChromosomeSpec::with_sequence("2", &format!("{}{}", MRNA_RC, "A".repeat(20))))
        .gene(GeneSpec::new("ENSG_PLUS", "PLUS", "1", Strand::Plus).with_transcript(
            TranscriptSpec::coding("NM_PLUS.1", 5, 22, &[(0, 27)]),
        ))
        .gene(GeneSpec::new("ENSG_MINUS", "MINUS", "2", Strand::Minus).with_transcript(
            TranscriptSpec::coding("NM_MINUS.1", 5, 22, &[(0, 27)]),
        ))
        .build()
        .expect("small genome")
}

/// Genomic position of CDS index `i` of `NM_LOF.1`.
pub fn lof_cds_position(i: i64) -> i64 {
    if i < 139 {
        111 + i
    } else {
        400 + i - 139
    }
}

/// Plus-strand gene `LOFG` on chromosome "1" (length 1000).
///
/// `NM_LOF.1` has exons [100, 249] and [400, 549] with CDS [111, 539]:
/// `ATG (CAG)x91 TAA`, 93 codons. The last exon junction sits at CDS index
/// 139. `NR_LOF.1` is a non-coding second transcript of the same gene.
pub fn lof_genome() -> Genome {
    let cds = format!("ATG{}TAA", "CAG".repeat(91));
    let mut seq = vec![b'T'; 1000];
    for (i, b) in cds.bytes().enumerate() {
        seq[lof_cds_position(i as i64) as usize] = b;
    }
    let seq = String::from_utf8(seq).expect("ascii");
    GenomeBuilder::new("lof")
        .chromosome(ChromosomeSpec::with_sequence("1", &seq))
        .gene(
            GeneSpec::new("ENSG_LOF", "LOFG", "1", Strand::Plus)
                .with_transcript(TranscriptSpec::coding("NM_LOF.1", 111, 539, &[(100, 249), (400, 549)]))
                .with_transcript(TranscriptSpec::non_coding("NR_LOF.1", &[(100, 249)])),
        )
        .build()
        .expect("lof genome")
}

/// Circular chromosome "circ" with one plus-strand gene crossing the origin.
///
/// `NM_CIRC.1` is a single exon [-888, 911] that is entirely coding: 600
/// codons `ATG GAT (GCT)x293 TGG TTT (GCT)x302 TAA`. Genomic position 0 is
/// c.889, the first base of codon 297 (TTT).
pub fn circular_genome() -> Genome {
    let cds = format!("ATGGAT{}TGGTTT{}TAA", "GCT".repeat(293), "GCT".repeat(302));
    let mut seq = vec![b'C'; CIRCULAR_LENGTH as usize];
    for (i, b) in cds.bytes().enumerate() {
        let pos = (-888 + i as i64).rem_euclid(CIRCULAR_LENGTH);
        seq[pos as usize] = b;
    }
    let seq = String::from_utf8(seq).expect("ascii");
    GenomeBuilder::new("circular")
        .chromosome(ChromosomeSpec::with_sequence("circ", &seq).circular())
        .gene(GeneSpec::new("ENSG_CIRC", "CIRC", "circ", Strand::Plus).with_transcript(
            TranscriptSpec::coding("NM_CIRC.1", -888, 911, &[(-888, 911)]),
        ))
        .build()
        .expect("circular genome")
}
