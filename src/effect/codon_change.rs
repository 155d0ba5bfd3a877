//! Codon-level consequences of a variant inside a coding sequence.

use crate::apply::splice;
use crate::codon::CodonTable;
use crate::model::{Transcript, TranscriptSequences, Variant, VariantType};
use crate::sequence::{highlight, reverse_complement};

use super::{CodonChange, EffectType};

/// A variant expressed as an edit of the CDS (transcript orientation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsEdit {
    /// CDS index of the first replaced base; for insertions the index the
    /// new bases are inserted before
    pub start: i64,
    /// Number of reference CDS bases replaced
    pub removed: i64,
    /// Replacement bases in transcript orientation
    pub inserted: String,
}

impl CdsEdit {
    /// Change in CDS length.
    pub fn net(&self) -> i64 {
        self.inserted.len() as i64 - self.removed
    }

    /// Last replaced CDS index (equal to `start - 1` for pure insertions).
    pub fn end(&self) -> i64 {
        self.start + self.removed - 1
    }

    pub fn is_insertion(&self) -> bool {
        self.removed == 0
    }

    /// Apply the edit to `cds`; `None` when the edit does not fit.
    pub fn apply(&self, cds: &str) -> Option<String> {
        let from = usize::try_from(self.start).ok()?;
        let to = from + usize::try_from(self.removed).ok()?;
        if to > cds.len() {
            return None;
        }
        Some(splice(cds, from, to, &self.inserted))
    }
}

/// Locate the coding part of `variant` on `tr`.
///
/// Only sequence coordinates are needed, so this also works for genomes
/// without sequence. Returns `None` when no coding base is touched.
pub(crate) fn cds_edit(tr: &Transcript<'_>, variant: &Variant) -> Option<CdsEdit> {
    let plus = tr.strand().is_plus();
    let cds_len = tr.cds_len();
    match variant.variant_type {
        VariantType::Ins => {
            // Inserted bases go before `start` in genomic orientation, which
            // is after it on the minus strand
            let base = tr.cds_base_number(variant.start)?;
            let idx = if plus { base } else { base + 1 };
            if idx <= 0 || idx >= cds_len {
                return None;
            }
            let inserted = if plus {
                variant.alt_allele.clone()
            } else {
                reverse_complement(&variant.alt_allele)
            };
            Some(CdsEdit {
                start: idx,
                removed: 0,
                inserted,
            })
        }
        VariantType::Snp | VariantType::Mnp | VariantType::Del | VariantType::Mixed => {
            let (lo, hi) = tr.coding_range()?;
            let mut span: Option<(i64, i64)> = None;
            let mut covered = 0;
            for e in tr.exons() {
                let s = variant.start.max(e.start).max(lo);
                let t = variant.end.min(e.end).min(hi);
                if s > t {
                    continue;
                }
                covered += t - s + 1;
                for idx in [tr.cds_base_number(s), tr.cds_base_number(t)].into_iter().flatten() {
                    span = Some(match span {
                        Some((a, b)) => (a.min(idx), b.max(idx)),
                        None => (idx, idx),
                    });
                }
            }
            let (min, max) = span?;
            let all_coding = covered == variant.len();

            let inserted = match variant.variant_type {
                VariantType::Snp | VariantType::Mnp => {
                    let alt = variant.alt_allele.as_bytes();
                    let mut bases: Vec<u8> = (variant.start..=variant.end)
                        .filter(|pos| tr.cds_base_number(*pos).is_some())
                        .filter_map(|pos| alt.get((pos - variant.start) as usize).copied())
                        .collect();
                    if !plus {
                        bases.reverse();
                        bases = bases.into_iter().map(crate::sequence::complement).collect();
                    }
                    String::from_utf8_lossy(&bases).into_owned()
                }
                VariantType::Mixed if all_coding => {
                    if plus {
                        variant.alt_allele.clone()
                    } else {
                        reverse_complement(&variant.alt_allele)
                    }
                }
                _ => String::new(),
            };
            Some(CdsEdit {
                start: min,
                removed: max - min + 1,
                inserted,
            })
        }
        VariantType::Dup | VariantType::Inv | VariantType::Bnd => None,
    }
}

/// Apply `variant` to the CDS `cds` of `tr`.
///
/// Returns the edit and the mutated CDS.
pub fn mutate_cds(tr: &Transcript<'_>, cds: &str, variant: &Variant) -> Option<(CdsEdit, String)> {
    let edit = cds_edit(tr, variant)?;
    let new_cds = edit.apply(cds)?;
    Some((edit, new_cds))
}

/// One coding consequence computed for a transcript.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CodingOutcome {
    pub effect_type: EffectType,
    pub codon: Option<CodonChange>,
    pub cds_index: i64,
    pub ptc_cds_index: Option<i64>,
}

impl CodingOutcome {
    fn new(effect_type: EffectType, codon: Option<CodonChange>, cds_index: i64) -> Self {
        Self {
            effect_type,
            codon,
            cds_index,
            ptc_cds_index: None,
        }
    }
}

fn codon_slice(seq: &str, from: i64, len: i64) -> &str {
    let from = (from.max(0) as usize).min(seq.len());
    let to = (from + len.max(0) as usize).min(seq.len());
    &seq[from..to]
}

/// First stop codon of `new_cds` at or after codon `from_codon`, as a CDS
/// index in reference coordinates.
fn premature_stop(new_cds: &str, from_codon: i64, net: i64, table: &CodonTable) -> Option<i64> {
    new_cds
        .as_bytes()
        .chunks(3)
        .enumerate()
        .skip(from_codon.max(0) as usize)
        .filter(|(_, c)| c.len() == 3)
        .find(|(_, c)| table.aa(c) == '*')
        .map(|(k, _)| k as i64 * 3 - net)
}

/// Classify the coding consequences of `variant` on `tr`.
///
/// With sequences available the reference and mutated codons are compared;
/// without them only the length change is used.
pub(super) fn coding_effects(
    tr: &Transcript<'_>,
    seqs: Option<&TranscriptSequences>,
    table: &CodonTable,
    variant: &Variant,
) -> Vec<CodingOutcome> {
    let Some(edit) = cds_edit(tr, variant) else {
        return Vec::new();
    };
    let seqs = seqs.filter(|s| !s.cds.is_empty());
    match seqs.and_then(|s| edit.apply(&s.cds).map(|new| (s, new))) {
        Some((s, new_cds)) => with_sequence(tr, &s.cds, &new_cds, &edit, table, variant),
        None => without_sequence(&edit, variant),
    }
}

fn without_sequence(edit: &CdsEdit, variant: &Variant) -> Vec<CodingOutcome> {
    let net = edit.net();
    let aligned = edit.start % 3 == 0;
    let effect_type = match variant.variant_type {
        VariantType::Snp | VariantType::Mnp => EffectType::CodonChange,
        _ if net % 3 != 0 => EffectType::FrameShift,
        VariantType::Ins if aligned => EffectType::CodonInsertion,
        VariantType::Ins => EffectType::CodonChangePlusCodonInsertion,
        VariantType::Del if aligned => EffectType::CodonDeletion,
        VariantType::Del => EffectType::CodonChangePlusCodonDeletion,
        _ if net > 0 => EffectType::CodonChangePlusCodonInsertion,
        _ if net < 0 => EffectType::CodonChangePlusCodonDeletion,
        _ => EffectType::CodonChange,
    };
    vec![CodingOutcome::new(effect_type, None, edit.start)]
}

fn with_sequence(
    tr: &Transcript<'_>,
    cds: &str,
    new_cds: &str,
    edit: &CdsEdit,
    table: &CodonTable,
    variant: &Variant,
) -> Vec<CodingOutcome> {
    let net = edit.net();
    let c0 = edit.start / 3;
    let c1 = if edit.is_insertion() { c0 } else { edit.end() / 3 };
    let codon_index = edit.start % 3;
    let ref_len = (c1 - c0 + 1) * 3;
    let ref_codons = codon_slice(cds, c0 * 3, ref_len);
    let alt_len = if net % 3 == 0 || !edit.is_insertion() {
        ref_codons.len() as i64 + net
    } else {
        ref_codons.len() as i64 + net - net.rem_euclid(3) + 3
    };
    let alt_codons = codon_slice(new_cds, c0 * 3, alt_len.max(0));

    let from = codon_index as usize;
    let codons_ref = highlight(ref_codons, from, from + edit.removed as usize);
    let codons_alt = highlight(alt_codons, from, from + edit.inserted.len());
    let aa_ref = table.translate(ref_codons);
    let aa_alt = table.translate(alt_codons);
    let codon = CodonChange {
        codon_num: c0,
        codon_index,
        codons_ref,
        codons_alt,
        aa_ref: aa_ref.clone(),
        aa_alt: aa_alt.clone(),
    };

    let starts_protein = c0 == 0 && table.is_start(ref_codons);
    let start_lost = starts_protein && !table.is_start(alt_codons);
    let ref_stop = table.is_stop(ref_codons);
    let alt_stop = table.is_stop(alt_codons);

    let mut out = Vec::new();
    let mut push = |effect_type: EffectType| {
        out.push(CodingOutcome::new(effect_type, Some(codon.clone()), edit.start));
    };

    match variant.variant_type {
        VariantType::Snp | VariantType::Mnp => {
            if aa_ref == aa_alt {
                if starts_protein {
                    push(if start_lost {
                        EffectType::StartLost
                    } else {
                        EffectType::SynonymousStart
                    });
                } else if ref_stop {
                    push(EffectType::SynonymousStop);
                } else {
                    push(EffectType::SynonymousCoding);
                }
            } else if starts_protein {
                push(if start_lost {
                    EffectType::StartLost
                } else {
                    EffectType::NonSynonymousStart
                });
            } else if ref_stop && !alt_stop {
                push(EffectType::StopLost);
            } else if alt_stop && !ref_stop {
                push(EffectType::StopGained);
            } else if ref_stop {
                push(EffectType::NonSynonymousStop);
            } else {
                push(EffectType::NonSynonymousCoding);
            }
        }
        _ => {
            let main = if net % 3 != 0 {
                EffectType::FrameShift
            } else if edit.is_insertion() {
                if codon_index == 0 || alt_codons.starts_with(ref_codons) {
                    EffectType::CodonInsertion
                } else {
                    EffectType::CodonChangePlusCodonInsertion
                }
            } else if net < 0 && edit.inserted.is_empty() {
                if codon_index == 0 || alt_codons.is_empty() || ref_codons.starts_with(alt_codons) {
                    EffectType::CodonDeletion
                } else {
                    EffectType::CodonChangePlusCodonDeletion
                }
            } else if net > 0 {
                EffectType::CodonChangePlusCodonInsertion
            } else if net < 0 {
                EffectType::CodonChangePlusCodonDeletion
            } else if aa_ref == aa_alt {
                EffectType::SynonymousCoding
            } else {
                EffectType::NonSynonymousCoding
            };
            push(main);
            if start_lost || (starts_protein && edit.start < 3 && edit.removed > 0) {
                push(EffectType::StartLost);
            }
            if ref_stop && !alt_stop {
                push(EffectType::StopLost);
            } else if main != EffectType::FrameShift && alt_stop && !ref_stop {
                push(EffectType::StopGained);
            }
        }
    }

    let rare = tr.rare_amino_acid_codons();
    if (c0..=c1).any(|c| rare.contains(&(c as usize))) {
        push(EffectType::RareAminoAcid);
    }

    if net % 3 != 0 {
        let ptc = premature_stop(new_cds, c0, net, table);
        for o in out.iter_mut().filter(|o| o.effect_type == EffectType::FrameShift) {
            o.ptc_cds_index = ptc;
        }
    }
    // Start-lost duplicates can arise from the in-frame branch
    let mut seen = Vec::new();
    out.retain(|o| {
        if seen.contains(&o.effect_type) {
            false
        } else {
            seen.push(o.effect_type);
            true
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::CodonTable;
    use crate::model::{ChromosomeSpec, GeneSpec, Genome, GenomeBuilder, Strand, TranscriptSpec};

    // 5 bases of UTR, then ATG GAT TGG TTT CAG TAA, then 5 bases of UTR
    const SEQ: &str = "CCCCCATGGATTGGTTTCAGTAACCCCC";

    fn genome(strand: Strand) -> Genome {
        let seq = if strand.is_plus() {
            SEQ.to_string()
        } else {
            reverse_complement(SEQ)
        };
        GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::with_sequence("1", &seq))
            .gene(GeneSpec::new("G", "G", "1", strand).with_transcript(
                TranscriptSpec::coding("T", 5, 22, &[(0, 27)]).with_rare_amino_acid_codon(3),
            ))
            .build()
            .unwrap()
    }

    fn effects(strand: Strand, v: &Variant) -> Vec<CodingOutcome> {
        let g = genome(strand);
        let t = g.transcript_by_name("T").unwrap();
        let table = CodonTable::standard();
        let seqs = t.compute_sequences(&table).unwrap();
        coding_effects(&t, Some(&seqs), &table, v)
    }

    fn types(out: &[CodingOutcome]) -> Vec<EffectType> {
        out.iter().map(|o| o.effect_type).collect()
    }

    /// Position on the minus-strand genome of plus-layout index `i`.
    fn mirror(i: i64) -> i64 {
        SEQ.len() as i64 - 1 - i
    }

    #[test]
    fn test_cds_edit_snp_strands() {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("T").unwrap();
        let e = cds_edit(&t, &Variant::new("1", 9, "A", "C").unwrap()).unwrap();
        assert_eq!((e.start, e.removed, e.inserted.as_str()), (4, 1, "C"));

        let g = genome(Strand::Minus);
        let t = g.transcript_by_name("T").unwrap();
        // Plus-layout base 9 is an A; on the minus genome it reads T
        let e = cds_edit(&t, &Variant::new("1", mirror(9), "T", "G").unwrap()).unwrap();
        assert_eq!((e.start, e.removed, e.inserted.as_str()), (4, 1, "C"));
    }

    #[test]
    fn test_cds_edit_insertion_edges() {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("T").unwrap();
        // Before the start codon: not coding
        assert!(cds_edit(&t, &Variant::new("1", 5, "", "A").unwrap()).is_none());
        let e = cds_edit(&t, &Variant::new("1", 8, "", "AAA").unwrap()).unwrap();
        assert_eq!((e.start, e.removed), (3, 0));
    }

    #[test]
    fn test_missense_and_codons() {
        // GAT (D) -> TAT (Y)
        let out = effects(Strand::Plus, &Variant::new("1", 8, "G", "T").unwrap());
        assert_eq!(types(&out), vec![EffectType::NonSynonymousCoding]);
        let codon = out[0].codon.as_ref().unwrap();
        assert_eq!(codon.codons_ref, "Gat");
        assert_eq!(codon.codons_alt, "Tat");
        assert_eq!((codon.aa_ref.as_str(), codon.aa_alt.as_str()), ("D", "Y"));
        assert_eq!((codon.codon_num, codon.codon_index), (1, 0));
    }

    #[test]
    fn test_minus_strand_matches_plus() {
        let plus = effects(Strand::Plus, &Variant::new("1", 8, "G", "T").unwrap());
        let minus = effects(Strand::Minus, &Variant::new("1", mirror(8), "C", "A").unwrap());
        assert_eq!(plus, minus);
    }

    #[rstest::rstest]
    #[case(6, "T", "C", EffectType::StartLost)]
    #[case(10, "T", "C", EffectType::SynonymousCoding)]
    #[case(13, "G", "A", EffectType::StopGained)]
    #[case(20, "T", "C", EffectType::StopLost)]
    #[case(21, "A", "G", EffectType::SynonymousStop)]
    fn test_snp_classes(#[case] pos: i64, #[case] r: &str, #[case] a: &str, #[case] expected: EffectType) {
        let out = effects(Strand::Plus, &Variant::new("1", pos, r, a).unwrap());
        assert_eq!(out[0].effect_type, expected);
    }

    #[test]
    fn test_rare_amino_acid() {
        // Codon 3 is TTT
        let out = effects(Strand::Plus, &Variant::new("1", 14, "T", "C").unwrap());
        assert_eq!(
            types(&out),
            vec![EffectType::NonSynonymousCoding, EffectType::RareAminoAcid]
        );
    }

    #[test]
    fn test_insertions() {
        let fs = effects(Strand::Plus, &Variant::new("1", 9, "", "A").unwrap());
        assert_eq!(fs[0].effect_type, EffectType::FrameShift);

        let aligned = effects(Strand::Plus, &Variant::new("1", 11, "", "CCC").unwrap());
        assert_eq!(types(&aligned), vec![EffectType::CodonInsertion]);

        let disruptive = effects(Strand::Plus, &Variant::new("1", 9, "", "CCC").unwrap());
        assert_eq!(types(&disruptive), vec![EffectType::CodonChangePlusCodonInsertion]);

        let stop = effects(Strand::Plus, &Variant::new("1", 11, "", "TAA").unwrap());
        assert_eq!(
            types(&stop),
            vec![EffectType::CodonInsertion, EffectType::StopGained]
        );
    }

    #[test]
    fn test_deletions() {
        let aligned = effects(Strand::Plus, &Variant::new("1", 11, "TGG", "").unwrap());
        assert_eq!(types(&aligned), vec![EffectType::CodonDeletion]);

        // GAT TGG -> G(ATT)GG = GGG: not a prefix of the reference codons
        let disruptive = effects(Strand::Plus, &Variant::new("1", 9, "ATT", "").unwrap());
        assert_eq!(types(&disruptive), vec![EffectType::CodonChangePlusCodonDeletion]);

        let fs = effects(Strand::Plus, &Variant::new("1", 9, "A", "").unwrap());
        assert_eq!(fs[0].effect_type, EffectType::FrameShift);
        assert_eq!(fs[0].codon.as_ref().map(|c| c.codon_num), Some(1));
    }

    #[test]
    fn test_frameshift_premature_stop() {
        // ATG GAT TGG TTT CAG TAA with the first T of TGG deleted:
        // ATG GAT GGT TTC AGT AA -> no stop in frame
        let none = effects(Strand::Plus, &Variant::new("1", 11, "T", "").unwrap());
        assert_eq!(none[0].ptc_cds_index, None);

        // ATG GAT TGG TTT TAC AGT AA: no stop after the shift
        let ins = effects(Strand::Plus, &Variant::new("1", 17, "", "TA").unwrap());
        assert_eq!(ins[0].effect_type, EffectType::FrameShift);
        assert_eq!(ins[0].ptc_cds_index, None);

        // ATG GAT TGG TAG TTC AGT AA: stop at new codon 3
        let stop = effects(Strand::Plus, &Variant::new("1", 15, "", "AG").unwrap());
        assert_eq!(stop[0].effect_type, EffectType::FrameShift);
        // New CDS index 9 less the two inserted bases
        assert_eq!(stop[0].ptc_cds_index, Some(7));
    }

    #[test]
    fn test_length_only_without_sequence() {
        let g = GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::new("1", 100))
            .gene(GeneSpec::new("G", "G", "1", Strand::Plus).with_transcript(
                TranscriptSpec::coding("T", 10, 39, &[(0, 49)]),
            ))
            .build()
            .unwrap();
        let t = g.transcript_by_name("T").unwrap();
        let table = CodonTable::standard();
        let snp = coding_effects(&t, None, &table, &Variant::new("1", 20, "A", "C").unwrap());
        assert_eq!(types(&snp), vec![EffectType::CodonChange]);
        let del = coding_effects(&t, None, &table, &Variant::new("1", 13, "AAA", "").unwrap());
        assert_eq!(types(&del), vec![EffectType::CodonDeletion]);
        let fs = coding_effects(&t, None, &table, &Variant::new("1", 13, "AA", "").unwrap());
        assert_eq!(types(&fs), vec![EffectType::FrameShift]);
    }
}
