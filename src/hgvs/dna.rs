//! c. and n. notation.
//!
//! Positions are rendered relative to the transcript: exonic bases count
//! from c.1 (the A of the start codon) or n.1, 5'UTR bases count back as
//! `-N`, 3'UTR bases count on from the stop codon as `*N`, and intronic
//! bases are offsets from the nearest exon boundary (`N+k` / `N-k`).

use std::fmt;

use crate::model::{Genome, Transcript, Variant, VariantType};
use crate::sequence::reverse_complement;

use super::shift::{shift_variant, Direction};

/// A nucleotide edit with rendered positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnaChange {
    /// `76A>T`
    Substitution {
        pos: String,
        ref_base: String,
        alt_base: String,
    },
    /// `76_78del`
    Deletion { range: String },
    /// `76_77insG`
    Insertion { range: String, inserted: String },
    /// `76_78dup`
    Duplication { range: String },
    /// `76_77delinsTT`
    Delins { range: String, inserted: String },
    /// `76_80inv`
    Inversion { range: String },
}

impl fmt::Display for DnaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnaChange::Substitution {
                pos,
                ref_base,
                alt_base,
            } => write!(f, "{}{}>{}", pos, ref_base, alt_base),
            DnaChange::Deletion { range } => write!(f, "{}del", range),
            DnaChange::Insertion { range, inserted } => write!(f, "{}ins{}", range, inserted),
            DnaChange::Duplication { range } => write!(f, "{}dup", range),
            DnaChange::Delins { range, inserted } => write!(f, "{}delins{}", range, inserted),
            DnaChange::Inversion { range } => write!(f, "{}inv", range),
        }
    }
}

/// Transcript position of an mRNA index.
fn mrna_position(tr: &Transcript<'_>, idx: i64) -> String {
    if !tr.is_protein_coding() {
        return (idx + 1).to_string();
    }
    let utr5 = tr.utr5_len();
    let cds = tr.cds_len();
    if idx < utr5 {
        format!("-{}", utr5 - idx)
    } else if idx < utr5 + cds {
        (idx - utr5 + 1).to_string()
    } else {
        format!("*{}", idx - utr5 - cds + 1)
    }
}

/// HGVS position of the genomic base `pos` on `tr`.
pub fn position(tr: &Transcript<'_>, pos: i64) -> Option<String> {
    if tr.exon_at(pos).is_some() {
        return Some(mrna_position(tr, tr.mrna_base_number(pos)?));
    }

    let plus = tr.strand().is_plus();
    if pos < tr.start() || pos > tr.end() {
        let distance = if pos < tr.start() {
            tr.start() - pos
        } else {
            pos - tr.end()
        };
        let upstream = (pos < tr.start()) == plus;
        return Some(if upstream {
            format!("-{}", tr.utr5_len() + distance)
        } else {
            format!("*{}", tr.utr3_len() + distance)
        });
    }

    let intron = tr.intron_at(pos)?;
    // Flanking exonic bases, 5' side first
    let (five, three) = if plus {
        (intron.start - 1, intron.end + 1)
    } else {
        (intron.end + 1, intron.start - 1)
    };
    let from_five = (pos - five).abs();
    let from_three = (three - pos).abs();
    if from_five <= from_three {
        Some(format!("{}+{}", position(tr, five)?, from_five))
    } else {
        Some(format!("{}-{}", position(tr, three)?, from_three))
    }
}

/// Range `[start, end]` in transcript order.
fn range(tr: &Transcript<'_>, start: i64, end: i64) -> Option<String> {
    let (first, last) = if tr.strand().is_plus() {
        (start, end)
    } else {
        (end, start)
    };
    if first == last {
        position(tr, first)
    } else {
        Some(format!("{}_{}", position(tr, first)?, position(tr, last)?))
    }
}

/// Move an indel to its 3'-most position within the exon or intron that
/// holds it. Without genomic sequence the variant is returned unchanged.
pub fn normalize(genome: &Genome, tr: &Transcript<'_>, variant: &Variant) -> Variant {
    if !matches!(variant.variant_type, VariantType::Ins | VariantType::Del) || variant.is_structural() {
        return variant.clone();
    }
    let Some(feature) = tr.exon_at(variant.start).or_else(|| tr.intron_at(variant.start)) else {
        return variant.clone();
    };
    let Some(seq) = genome.genomic_sequence(&variant.chromosome, feature.start, feature.end) else {
        return variant.clone();
    };
    let direction = if tr.strand().is_plus() {
        Direction::Right
    } else {
        Direction::Left
    };
    let shifted = shift_variant(variant, &seq, feature.start, direction);
    if shifted.start != variant.start {
        tracing::debug!("Shifted {} to {}:{}", variant, shifted.chromosome, shifted.start);
    }
    shifted
}

/// The nucleotide edit of `variant` on `tr`, or `None` for breakends.
pub fn change(genome: &Genome, tr: &Transcript<'_>, variant: &Variant) -> Option<DnaChange> {
    let plus = tr.strand().is_plus();
    let orient = |s: &str| {
        if plus {
            s.to_string()
        } else {
            reverse_complement(s)
        }
    };
    let (start, end) = (variant.start, variant.end);

    let edit = match variant.variant_type {
        VariantType::Snp => DnaChange::Substitution {
            pos: position(tr, start)?,
            ref_base: orient(&variant.ref_allele),
            alt_base: orient(&variant.alt_allele),
        },
        VariantType::Mnp | VariantType::Mixed => DnaChange::Delins {
            range: range(tr, start, end)?,
            inserted: orient(&variant.alt_allele),
        },
        VariantType::Del => DnaChange::Deletion {
            range: range(tr, start, end)?,
        },
        VariantType::Ins => {
            let len = variant.alt_allele.len() as i64;
            // Reference bases 5' of the insertion point in transcript order
            let (a, b) = if plus {
                (start - len, start - 1)
            } else {
                (start, start + len - 1)
            };
            let repeats = genome
                .genomic_sequence(&variant.chromosome, a, b)
                .is_some_and(|s| s.eq_ignore_ascii_case(&variant.alt_allele));
            if repeats {
                DnaChange::Duplication {
                    range: range(tr, a, b)?,
                }
            } else {
                let (five, three) = if plus {
                    (start - 1, start)
                } else {
                    (start, start - 1)
                };
                DnaChange::Insertion {
                    range: format!("{}_{}", position(tr, five)?, position(tr, three)?),
                    inserted: orient(&variant.alt_allele),
                }
            }
        }
        VariantType::Dup => DnaChange::Duplication {
            range: range(tr, start, end)?,
        },
        VariantType::Inv => DnaChange::Inversion {
            range: range(tr, start, end)?,
        },
        VariantType::Bnd => return None,
    };
    Some(edit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChromosomeSpec, GeneSpec, GenomeBuilder, Strand, TranscriptSpec};
    use rstest::rstest;

    // Exons [100, 199] and [300, 399], CDS [150, 349]: utr5 = 50, cds = 100
    fn genome(strand: Strand) -> Genome {
        GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::new("1", 1000))
            .gene(GeneSpec::new("G", "G", "1", strand).with_transcript(
                TranscriptSpec::coding("T", 150, 349, &[(100, 199), (300, 399)]),
            ))
            .gene(GeneSpec::new("N", "N", "1", Strand::Plus).with_transcript(
                TranscriptSpec::non_coding("NC", &[(600, 649), (700, 749)]),
            ))
            .build()
            .unwrap()
    }

    #[rstest]
    #[case(150, "1")]
    #[case(199, "50")]
    #[case(300, "51")]
    #[case(349, "100")]
    #[case(149, "-1")]
    #[case(100, "-50")]
    #[case(350, "*1")]
    #[case(399, "*50")]
    #[case(200, "50+1")]
    #[case(249, "50+50")]
    #[case(250, "51-50")]
    #[case(299, "51-1")]
    #[case(90, "-60")]
    #[case(409, "*60")]
    fn test_plus_positions(#[case] pos: i64, #[case] expected: &str) {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("T").unwrap();
        assert_eq!(position(&t, pos).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(349, "1")]
    #[case(300, "50")]
    #[case(199, "51")]
    #[case(150, "100")]
    #[case(350, "-1")]
    #[case(149, "*1")]
    #[case(299, "50+1")]
    #[case(200, "51-1")]
    #[case(409, "-60")]
    #[case(90, "*60")]
    fn test_minus_positions(#[case] pos: i64, #[case] expected: &str) {
        let g = genome(Strand::Minus);
        let t = g.transcript_by_name("T").unwrap();
        assert_eq!(position(&t, pos).as_deref(), Some(expected));
    }

    #[test]
    fn test_non_coding_positions() {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("NC").unwrap();
        assert_eq!(position(&t, 600).as_deref(), Some("1"));
        assert_eq!(position(&t, 700).as_deref(), Some("51"));
        assert_eq!(position(&t, 651).as_deref(), Some("50+2"));
        assert_eq!(position(&t, 590).as_deref(), Some("-10"));
    }

    #[test]
    fn test_change_rendering() {
        let g = genome(Strand::Minus);
        let t = g.transcript_by_name("T").unwrap();
        let snp = change(&g, &t, &Variant::new("1", 349, "T", "C").unwrap()).unwrap();
        assert_eq!(snp.to_string(), "1A>G");
        let del = change(&g, &t, &Variant::new("1", 340, "AC", "").unwrap()).unwrap();
        assert_eq!(del.to_string(), "9_10del");
        let ins = change(&g, &t, &Variant::new("1", 340, "", "AAC").unwrap()).unwrap();
        assert_eq!(ins.to_string(), "10_11insGTT");
        let inv = change(&g, &t, &Variant::structural("1", 320, 330, VariantType::Inv).unwrap()).unwrap();
        assert_eq!(inv.to_string(), "20_30inv");
    }
}
