//! Structural variant consequences: whole-feature events and gene fusions.

use crate::interval::IntervalForest;
use crate::model::{Chromosome, Genome, MarkerId, MarkerKind, Variant, VariantType};

use super::EffectType;

/// A fusion between two genes, or half of one when only one breakpoint
/// lands in a gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Fusion {
    pub effect_type: EffectType,
    pub left: MarkerId,
    pub right: Option<MarkerId>,
    pub offset: i64,
}

/// Effect of a DEL/DUP/INV covering the whole chromosome.
pub(super) fn chromosome_large(variant: &Variant, chrom: &Chromosome) -> Option<EffectType> {
    if !variant.includes(0, chrom.length - 1) {
        return None;
    }
    match variant.variant_type {
        VariantType::Del => Some(EffectType::ChromosomeLargeDeletion),
        VariantType::Dup => Some(EffectType::ChromosomeLargeDuplication),
        VariantType::Inv => Some(EffectType::ChromosomeLargeInversion),
        _ => None,
    }
}

/// Effect of a variant that includes the whole feature.
pub(super) fn whole_feature(variant_type: VariantType, kind: MarkerKind) -> Option<EffectType> {
    use EffectType as E;
    let effect = match (variant_type, kind) {
        (VariantType::Del, MarkerKind::Gene) => E::GeneDeleted,
        (VariantType::Del, MarkerKind::Transcript) => E::TranscriptDeleted,
        (VariantType::Del, MarkerKind::Exon) => E::ExonDeleted,
        (VariantType::Dup, MarkerKind::Gene) => E::GeneDuplication,
        (VariantType::Dup, MarkerKind::Transcript) => E::TranscriptDuplication,
        (VariantType::Dup, MarkerKind::Exon) => E::ExonDuplication,
        (VariantType::Inv, MarkerKind::Gene) => E::GeneInversion,
        (VariantType::Inv, MarkerKind::Transcript) => E::TranscriptInversion,
        (VariantType::Inv, MarkerKind::Exon) => E::ExonInversion,
        _ => return None,
    };
    Some(effect)
}

/// Effect of a symbolic structural variant that covers part of an exon.
pub(super) fn partial_exon(variant_type: VariantType) -> Option<EffectType> {
    match variant_type {
        VariantType::Del => Some(EffectType::ExonDeletedPartial),
        VariantType::Dup => Some(EffectType::ExonDuplicationPartial),
        VariantType::Inv => Some(EffectType::ExonInversionPartial),
        _ => None,
    }
}

fn genes_at(genome: &Genome, forest: &IntervalForest, chromosome: &str, pos: i64) -> Vec<(MarkerId, i64)> {
    forest
        .query_overlap(chromosome, pos, pos)
        .into_iter()
        .filter(|h| genome.marker(h.marker).kind == MarkerKind::Gene)
        .map(|h| (h.marker, h.offset))
        .collect()
}

/// Fusions created by a DEL, DUP or INV whose two breakpoints fall in
/// different genes.
///
/// Genes are joined head to tail when they read in the same direction; an
/// inversion flips the right-hand gene.
pub(super) fn interval_fusions(genome: &Genome, forest: &IntervalForest, variant: &Variant) -> Vec<Fusion> {
    if !matches!(
        variant.variant_type,
        VariantType::Del | VariantType::Dup | VariantType::Inv
    ) {
        return Vec::new();
    }
    let left: Vec<_> = genes_at(genome, forest, &variant.chromosome, variant.start)
        .into_iter()
        .filter(|(g, off)| !genome.marker(*g).contains(variant.end + off))
        .collect();
    let right: Vec<_> = genes_at(genome, forest, &variant.chromosome, variant.end)
        .into_iter()
        .filter(|(g, off)| !genome.marker(*g).contains(variant.start + off))
        .collect();

    let mut out = Vec::new();
    for &(gl, offset) in &left {
        for &(gr, _) in &right {
            if gl == gr {
                continue;
            }
            let same_strand = genome.marker(gl).strand == genome.marker(gr).strand;
            let forward = if variant.variant_type == VariantType::Inv {
                !same_strand
            } else {
                same_strand
            };
            out.push(Fusion {
                effect_type: if forward {
                    EffectType::GeneFusion
                } else {
                    EffectType::GeneFusionReverse
                },
                left: gl,
                right: Some(gr),
                offset,
            });
        }
    }
    out
}

/// Fusions created by a translocation breakend.
///
/// An empty result means neither side lands in a gene.
pub(super) fn breakend_fusions(genome: &Genome, forest: &IntervalForest, variant: &Variant) -> Vec<Fusion> {
    let Some(mate) = &variant.mate else {
        return Vec::new();
    };
    let left = genes_at(genome, forest, &variant.chromosome, variant.start);
    let right = genes_at(genome, forest, &mate.chromosome, mate.position);

    let mut out = Vec::new();
    match (left.is_empty(), right.is_empty()) {
        (true, true) => {}
        (false, true) | (true, false) => {
            for &(gene, offset) in left.iter().chain(right.iter()) {
                out.push(Fusion {
                    effect_type: EffectType::GeneFusionHalf,
                    left: gene,
                    right: None,
                    offset,
                });
            }
        }
        (false, false) => {
            for &(gl, offset) in &left {
                for &(gr, _) in &right {
                    let effect_type = if gl == gr {
                        EffectType::GeneRearrangement
                    } else {
                        let same_strand = genome.marker(gl).strand == genome.marker(gr).strand;
                        if same_strand != mate.reverse {
                            EffectType::GeneFusion
                        } else {
                            EffectType::GeneFusionReverse
                        }
                    };
                    out.push(Fusion {
                        effect_type,
                        left: gl,
                        right: (gl != gr).then_some(gr),
                        offset,
                    });
                }
            }
        }
    }
    out
}
