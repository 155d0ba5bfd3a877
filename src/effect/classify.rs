//! The variant effect classifier.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::apply::{apply, splice};
use crate::cache::SequenceCache;
use crate::codon::{CodonTable, CodonTables};
use crate::config::EffectConfig;
use crate::error::{ErrorWarning, FerroError};
use crate::interval::IntervalForest;
use crate::model::{Genome, Marker, MarkerId, MarkerKind, Transcript, TranscriptSequences, Variant, VariantType};
use crate::sequence::reverse_complement;

use super::codon_change::coding_effects;
use super::structural::{
    breakend_fusions, chromosome_large, interval_fusions, partial_exon, whole_feature, Fusion,
};
use super::{EffectType, VariantEffect};

/// Classifies variants against a genome.
///
/// Holds only shared references plus the codon table registry, so one
/// classifier can serve many threads.
pub struct Classifier<'a> {
    genome: &'a Genome,
    forest: &'a IntervalForest,
    config: &'a EffectConfig,
    tables: Cow<'a, CodonTables>,
    cache: Option<&'a SequenceCache>,
}

impl<'a> Classifier<'a> {
    /// Create a classifier. Fails when the configuration names an unknown
    /// codon table.
    pub fn new(genome: &'a Genome, forest: &'a IntervalForest, config: &'a EffectConfig) -> Result<Self, FerroError> {
        Ok(Self {
            genome,
            forest,
            config,
            tables: Cow::Owned(CodonTables::with_overrides(&config.codon_tables)?),
            cache: None,
        })
    }

    /// Create a classifier over an already resolved codon table registry.
    pub fn with_tables(
        genome: &'a Genome,
        forest: &'a IntervalForest,
        config: &'a EffectConfig,
        tables: &'a CodonTables,
    ) -> Self {
        Self {
            genome,
            forest,
            config,
            tables: Cow::Borrowed(tables),
            cache: None,
        }
    }

    /// Use `cache` for transcript sequences.
    pub fn with_cache(mut self, cache: &'a SequenceCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn genome(&self) -> &'a Genome {
        self.genome
    }

    pub fn codon_tables(&self) -> &CodonTables {
        &self.tables
    }

    fn table_for(&self, tr: &Transcript<'_>) -> &CodonTable {
        self.tables.for_transcript(tr.chromosome(), tr.codon_table_name())
    }

    fn sequences(&self, tr: &Transcript<'_>) -> Option<Arc<TranscriptSequences>> {
        let table = self.table_for(tr);
        match self.cache {
            Some(cache) => cache.get_or_compute(tr, table),
            None => tr.compute_sequences(table).map(Arc::new),
        }
    }

    /// All effects of `variant`, most severe first.
    ///
    /// An unknown chromosome yields a single [`EffectType::None`] effect
    /// tagged [`ErrorWarning::ChromosomeNotFound`].
    pub fn classify(&self, variant: &Variant) -> Vec<VariantEffect> {
        let Some(chrom) = self.genome.chromosome(&variant.chromosome) else {
            tracing::warn!("Chromosome {} not found", variant.chromosome);
            let mut sentinel = VariantEffect::new(variant, EffectType::None);
            sentinel.add_warning(ErrorWarning::ChromosomeNotFound);
            return vec![sentinel];
        };

        let mut out = Vec::new();
        if let Some(effect_type) = chromosome_large(variant, chrom) {
            out.push(VariantEffect::new(variant, effect_type));
            return finish(out);
        }
        if variant.variant_type == VariantType::Bnd {
            self.breakend(variant, &mut out);
            return self.finish_with_checks(variant, out);
        }

        let hits = self
            .forest
            .query_deep(self.genome, &variant.chromosome, variant.start, variant.end);
        tracing::debug!("{}: {} overlapping markers", variant, hits.len());

        // Group by gene and transcript, remembering the frame offset
        let mut genes: BTreeMap<MarkerId, i64> = BTreeMap::new();
        let mut transcripts: BTreeMap<MarkerId, (i64, Vec<MarkerId>)> = BTreeMap::new();
        for hit in &hits {
            let m = self.genome.marker(hit.marker);
            match m.kind {
                MarkerKind::Custom => {
                    let mut e = self.effect(variant, EffectType::Custom, hit.offset);
                    e.marker = Some(m.id);
                    e.feature_id = Some(m.name.clone());
                    out.push(e);
                }
                MarkerKind::Gene => {
                    genes.insert(m.id, hit.offset);
                }
                _ => {
                    if let Some(tr) = self.genome.ancestor(m.id, MarkerKind::Transcript) {
                        transcripts.entry(tr).or_insert((hit.offset, Vec::new())).1.push(m.id);
                    }
                }
            }
        }

        for (&gene, &offset) in &genes {
            let local = variant.shifted(offset);
            let m = self.genome.marker(gene);
            if local.includes(m.start, m.end) {
                if let Some(t) = whole_feature(variant.variant_type, MarkerKind::Gene) {
                    let mut e = self.effect(variant, t, offset);
                    self.fill_gene(&mut e, m);
                    out.push(e);
                }
            }
        }

        for fusion in interval_fusions(self.genome, self.forest, variant) {
            out.push(self.fusion_effect(variant, &fusion));
        }
        if variant.variant_type == VariantType::Inv && out.iter().any(|e| e.effect_type.is_fusion()) {
            return self.finish_with_checks(variant, out);
        }

        for (&tr_id, (offset, markers)) in &transcripts {
            let Some(tr) = self.genome.transcript(tr_id) else {
                continue;
            };
            let local = variant.shifted(*offset);
            let mut effects = Vec::new();
            self.transcript_effects(variant, &local, *offset, &tr, markers, &mut effects);
            if !effects.is_empty() && tr.is_protein_coding() {
                if let Some(seqs) = self.sequences(&tr) {
                    for e in &mut effects {
                        for w in &seqs.warnings {
                            e.add_warning(*w);
                        }
                    }
                }
            }
            out.extend(effects);
        }

        // Genes hit without any of their transcripts being hit
        for (&gene, &offset) in &genes {
            let any_transcript = self
                .genome
                .gene_info(gene)
                .is_some_and(|info| info.transcripts.iter().any(|t| transcripts.contains_key(t)));
            if !any_transcript {
                let mut e = self.effect(variant, EffectType::Intragenic, offset);
                self.fill_gene(&mut e, self.genome.marker(gene));
                out.push(e);
            }
        }

        self.flanking(variant, &transcripts, &mut out);

        if out.iter().all(|e| e.effect_type == EffectType::Custom) {
            out.push(VariantEffect::new(variant, EffectType::Intergenic));
        }
        self.finish_with_checks(variant, out)
    }

    fn finish_with_checks(&self, variant: &Variant, mut out: Vec<VariantEffect>) -> Vec<VariantEffect> {
        if self.ref_mismatch(variant) {
            for e in &mut out {
                e.add_warning(ErrorWarning::RefDoesNotMatchGenome);
            }
        }
        finish(out)
    }

    fn ref_mismatch(&self, variant: &Variant) -> bool {
        if variant.ref_allele.is_empty() {
            return false;
        }
        match self
            .genome
            .genomic_sequence(&variant.chromosome, variant.start, variant.end)
        {
            Some(seq) => !seq.eq_ignore_ascii_case(&variant.ref_allele),
            None => false,
        }
    }

    fn effect(&self, variant: &Variant, effect_type: EffectType, offset: i64) -> VariantEffect {
        let mut e = VariantEffect::new(variant, effect_type);
        e.coordinate_offset = offset;
        if offset != 0 {
            e.add_warning(ErrorWarning::ChromosomeCircularWrap);
        }
        e
    }

    fn fill_gene(&self, e: &mut VariantEffect, gene: &Marker) {
        if e.marker.is_none() {
            e.marker = Some(gene.id);
        }
        e.gene_name = Some(gene.name.clone());
        e.gene_id = self.genome.gene_info(gene.id).map(|i| i.gene_id.clone());
    }

    fn fill_transcript(&self, e: &mut VariantEffect, tr: &Transcript<'_>) {
        e.marker = Some(tr.id());
        if let Some(gene) = tr.gene() {
            self.fill_gene(e, gene);
        }
        e.transcript_id = Some(tr.name().to_string());
        if tr.is_protein_coding() {
            e.protein_length = Some(tr.cds_len() / 3);
        }
    }

    fn fusion_effect(&self, variant: &Variant, fusion: &Fusion) -> VariantEffect {
        let left = self.genome.marker(fusion.left);
        let mut e = self.effect(variant, fusion.effect_type, fusion.offset);
        self.fill_gene(&mut e, left);
        if let Some(right) = fusion.right.map(|r| self.genome.marker(r)) {
            let right_id = self
                .genome
                .gene_info(right.id)
                .map(|i| i.gene_id.as_str())
                .unwrap_or(right.name.as_str());
            e.gene_name = Some(format!("{}&{}", left.name, right.name));
            e.gene_id = e.gene_id.take().map(|id| format!("{}&{}", id, right_id));
        }
        e
    }

    fn breakend(&self, variant: &Variant, out: &mut Vec<VariantEffect>) {
        let fusions = breakend_fusions(self.genome, self.forest, variant);
        if fusions.is_empty() {
            out.push(VariantEffect::new(variant, EffectType::Intergenic));
        }
        for fusion in &fusions {
            out.push(self.fusion_effect(variant, fusion));
        }
    }

    /// Effects on one transcript. `local` is `variant` in the transcript's
    /// coordinate frame.
    fn transcript_effects(
        &self,
        variant: &Variant,
        local: &Variant,
        offset: i64,
        tr: &Transcript<'_>,
        markers: &[MarkerId],
        out: &mut Vec<VariantEffect>,
    ) {
        let new = |effect_type: EffectType| {
            let mut e = self.effect(variant, effect_type, offset);
            self.fill_transcript(&mut e, tr);
            e
        };

        if local.includes(tr.start(), tr.end()) {
            if let Some(t) = whole_feature(local.variant_type, MarkerKind::Transcript) {
                out.push(new(t));
                return;
            }
        }

        let splice: Vec<&Marker> = markers
            .iter()
            .map(|id| self.genome.marker(*id))
            .filter(|m| m.kind.is_splice())
            .collect();
        let exons: Vec<&Marker> = tr
            .exons()
            .filter(|e| local.intersects(e.start, e.end))
            .collect();

        if !exons.is_empty() {
            self.exonic(local, tr, &exons, &new, out);
            for m in &splice {
                out.push(self.splice_effect(tr, m, &new));
            }
            return;
        }

        let core: Vec<&&Marker> = splice
            .iter()
            .filter(|m| m.kind != MarkerKind::SpliceRegion)
            .collect();
        if !core.is_empty() {
            for m in &splice {
                out.push(self.splice_effect(tr, m, &new));
            }
            return;
        }
        if let Some(region) = splice.first() {
            out.push(self.splice_effect(tr, region, &new));
            return;
        }
        if let Some(intron) = tr.introns().find(|i| local.intersects(i.start, i.end)) {
            let mut e = new(EffectType::Intron);
            e.feature_id = Some(intron.name.clone());
            e.rank = intron.rank;
            e.rank_max = tr.intron_count() as u32;
            out.push(e);
        }
    }

    fn splice_effect(&self, tr: &Transcript<'_>, m: &Marker, new: &dyn Fn(EffectType) -> VariantEffect) -> VariantEffect {
        let effect_type = match m.kind {
            MarkerKind::SpliceSiteDonor => EffectType::SpliceSiteDonor,
            MarkerKind::SpliceSiteAcceptor => EffectType::SpliceSiteAcceptor,
            _ => EffectType::SpliceSiteRegion,
        };
        let mut e = new(effect_type);
        e.feature_id = Some(m.name.clone());
        e.rank = m.rank;
        e.rank_max = tr.intron_count() as u32;
        e
    }

    fn exonic(
        &self,
        local: &Variant,
        tr: &Transcript<'_>,
        exons: &[&Marker],
        new: &dyn Fn(EffectType) -> VariantEffect,
        out: &mut Vec<VariantEffect>,
    ) {
        let first = exons[0];
        let rank_max = tr.exon_count() as u32;
        let with_exon = |effect_type: EffectType, exon: &Marker| {
            let mut e = new(effect_type);
            e.feature_id = Some(exon.name.clone());
            e.rank = exon.rank;
            e.rank_max = rank_max;
            e
        };

        match local.variant_type {
            VariantType::Dup | VariantType::Inv => {
                for &exon in exons {
                    let t = if local.includes(exon.start, exon.end) {
                        whole_feature(local.variant_type, MarkerKind::Exon)
                    } else {
                        partial_exon(local.variant_type)
                    };
                    if let Some(t) = t {
                        out.push(with_exon(t, exon));
                    }
                }
                return;
            }
            VariantType::Del => {
                for &exon in exons {
                    if apply(exon, local).is_none() {
                        out.push(with_exon(EffectType::ExonDeleted, exon));
                    } else if local.is_structural() {
                        if let Some(t) = partial_exon(VariantType::Del) {
                            out.push(with_exon(t, exon));
                        }
                    }
                }
                for utr in tr.utrs().filter(|u| local.includes(u.start, u.end)) {
                    let t = if utr.kind == MarkerKind::Utr5 {
                        EffectType::Utr5Deleted
                    } else {
                        EffectType::Utr3Deleted
                    };
                    let mut e = new(t);
                    e.rank = utr.rank;
                    e.rank_max = rank_max;
                    out.push(e);
                }
            }
            _ => {}
        }

        let deleted = out.iter().any(|e| e.effect_type == EffectType::ExonDeleted);
        if !tr.is_protein_coding() {
            if !deleted {
                out.push(with_exon(EffectType::Exon, first));
            }
            return;
        }

        let seqs = self.sequences(tr);
        let table = self.table_for(tr);
        let coding = coding_effects(tr, seqs.as_deref(), table, local);
        if !coding.is_empty() {
            let exon = tr
                .exon_at(local.start)
                .or_else(|| tr.exon_at(local.end))
                .unwrap_or(first);
            for c in coding {
                let mut e = with_exon(c.effect_type, exon);
                e.codon = c.codon;
                e.cds_index = Some(c.cds_index);
                e.ptc_cds_index = c.ptc_cds_index;
                out.push(e);
            }
            return;
        }

        if deleted {
            return;
        }
        if let Some(t) = self.utr_side(local, tr) {
            out.push(with_exon(t, first));
            let gained = self.start_gained(local, tr, seqs.as_deref()).unwrap_or(false);
            if t == EffectType::Utr5Prime && gained {
                out.push(with_exon(EffectType::StartGained, first));
            }
        }
    }

    /// UTR side of a variant lying outside the coding bases.
    fn utr_side(&self, v: &Variant, tr: &Transcript<'_>) -> Option<EffectType> {
        let (lo, hi) = tr.coding_range()?;
        // An insertion at the lowest coding base lands just outside the CDS
        let before_lo = v.end < lo || (v.is_ins() && v.start == lo);
        let after_hi = v.start > hi;
        let (five, three) = if tr.strand().is_plus() {
            (before_lo, after_hi)
        } else {
            (after_hi, before_lo)
        };
        if five {
            Some(EffectType::Utr5Prime)
        } else if three {
            Some(EffectType::Utr3Prime)
        } else {
            None
        }
    }

    /// Whether a 5'UTR substitution creates a new ATG.
    fn start_gained(&self, v: &Variant, tr: &Transcript<'_>, seqs: Option<&TranscriptSequences>) -> Option<bool> {
        if !matches!(v.variant_type, VariantType::Snp | VariantType::Mnp) {
            return Some(false);
        }
        let utr5 = tr.utr5_len();
        let utr = seqs?.mrna.get(..utr5 as usize)?;
        let idx: Vec<i64> = (v.start..=v.end)
            .filter_map(|p| tr.mrna_base_number(p))
            .filter(|i| *i < utr5)
            .collect();
        let lo = *idx.iter().min()? as usize;
        let hi = *idx.iter().max()? as usize;
        let alt = if tr.strand().is_plus() {
            v.alt_allele.clone()
        } else {
            reverse_complement(&v.alt_allele)
        };
        if hi - lo + 1 != alt.len() {
            return Some(false);
        }
        let mutated = splice(utr, lo, hi + 1, &alt);
        let has_atg = |s: &str| (lo.saturating_sub(2)..=hi).any(|i| s.get(i..i + 3) == Some("ATG"));
        Some(!has_atg(utr) && has_atg(&mutated))
    }

    /// Upstream and downstream effects for transcripts near the variant.
    fn flanking(
        &self,
        variant: &Variant,
        hit_transcripts: &BTreeMap<MarkerId, (i64, Vec<MarkerId>)>,
        out: &mut Vec<VariantEffect>,
    ) {
        let flank = self.config.flank.up_down_length;
        if flank <= 0 {
            return;
        }
        let near = self.forest.query_overlap(
            &variant.chromosome,
            variant.start - flank,
            variant.end + flank,
        );
        for hit in near {
            let Some(info) = self.genome.gene_info(hit.marker) else {
                continue;
            };
            let local = variant.shifted(hit.offset);
            for &tr_id in &info.transcripts {
                if hit_transcripts.contains_key(&tr_id) {
                    continue;
                }
                let Some(tr) = self.genome.transcript(tr_id) else {
                    continue;
                };
                if local.intersects(tr.start(), tr.end()) {
                    continue;
                }
                let before = local.end < tr.start();
                let distance = if before {
                    tr.start() - local.end
                } else {
                    local.start - tr.end()
                };
                if distance > flank {
                    continue;
                }
                let upstream = before == tr.strand().is_plus();
                let t = if upstream {
                    EffectType::Upstream
                } else {
                    EffectType::Downstream
                };
                let mut e = self.effect(variant, t, hit.offset);
                self.fill_transcript(&mut e, &tr);
                e.distance = Some(distance);
                out.push(e);
            }
        }
    }
}

/// Remove duplicate effects and order by impact, most severe first.
fn finish(mut out: Vec<VariantEffect>) -> Vec<VariantEffect> {
    let mut seen = HashSet::new();
    out.retain(|e| {
        let feature = if e.transcript_id.is_none() {
            e.feature_id.clone()
        } else {
            None
        };
        seen.insert((
            e.transcript_id.clone(),
            e.gene_id.clone(),
            e.effect_type,
            feature,
        ))
    });
    out.sort_by_key(|e| (Reverse(e.impact), e.effect_type));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChromosomeSpec, CustomSpec, GeneSpec, GenomeBuilder, Strand, TranscriptSpec};

    const PATTERN: &[u8] = b"ACGTTGCA";

    // Exon 1 [10, 29], intron [30, 69], exon 2 [70, 99]; CDS [15, 89]
    fn genome() -> Genome {
        let seq: String = (0..200).map(|i| PATTERN[i % 8] as char).collect();
        GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::with_sequence("1", &seq))
            .chromosome(ChromosomeSpec::new("2", 100_000))
            .gene(GeneSpec::new("G1", "GENE1", "1", Strand::Plus).with_transcript(
                TranscriptSpec::coding("TR1", 15, 89, &[(10, 29), (70, 99)]),
            ))
            .gene(GeneSpec::new("G2", "GENE2", "2", Strand::Minus).with_transcript(
                TranscriptSpec::non_coding("TR2", &[(50_000, 50_100)]),
            ))
            .custom(CustomSpec {
                chromosome: "2".to_string(),
                start: 10,
                end: 20,
                name: "peak".to_string(),
            })
            .build()
            .unwrap()
    }

    /// A substitution on chromosome 1 with the correct reference base.
    fn snp(pos: i64) -> Variant {
        let base = PATTERN[pos as usize % 8];
        let alt = match base {
            b'A' => "G",
            b'C' => "T",
            b'G' => "A",
            _ => "C",
        };
        Variant::new("1", pos, &(base as char).to_string(), alt).unwrap()
    }

    fn classify(v: &Variant) -> Vec<VariantEffect> {
        let g = genome();
        let forest = IntervalForest::build(&g);
        let config = EffectConfig::default().with_up_down_length(1000);
        let classifier = Classifier::new(&g, &forest, &config).unwrap();
        classifier.classify(v)
    }

    fn types(effects: &[VariantEffect]) -> Vec<EffectType> {
        effects.iter().map(|e| e.effect_type).collect()
    }

    #[test]
    fn test_unknown_chromosome_sentinel() {
        let out = classify(&Variant::new("chrZ", 5, "A", "G").unwrap());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].effect_type, EffectType::None);
        assert!(out[0].has_warning(ErrorWarning::ChromosomeNotFound));
    }

    #[test]
    fn test_intron_and_splice_windows() {
        let donor = classify(&Variant::new("1", 30, "", "A").unwrap());
        assert_eq!(types(&donor), vec![EffectType::SpliceSiteDonor]);

        let acceptor = classify(&snp(68));
        assert_eq!(types(&acceptor), vec![EffectType::SpliceSiteAcceptor]);
        assert_eq!((acceptor[0].rank, acceptor[0].rank_max), (1, 1));

        let region = classify(&snp(34));
        assert_eq!(types(&region), vec![EffectType::SpliceSiteRegion]);

        let intron = classify(&snp(50));
        assert_eq!(types(&intron), vec![EffectType::Intron]);
        assert_eq!(intron[0].feature_id.as_deref(), Some("TR1.intron1"));
    }

    #[test]
    fn test_utr_effects() {
        let utr5 = classify(&snp(12));
        assert_eq!(types(&utr5), vec![EffectType::Utr5Prime]);
        assert_eq!(utr5[0].rank, 1);
        let utr3 = classify(&snp(95));
        assert_eq!(types(&utr3), vec![EffectType::Utr3Prime]);
        assert_eq!(utr3[0].rank, 2);
        assert_eq!(utr3[0].feature_id.as_deref(), Some("TR1.exon2"));
    }

    #[test]
    fn test_coding_snp_carries_codon() {
        let out = classify(&snp(20));
        let coding = out.iter().find(|e| e.codon.is_some()).unwrap();
        assert_eq!(coding.cds_index, Some(5));
        assert_eq!(coding.transcript_id.as_deref(), Some("TR1"));
        assert_eq!(coding.gene_name.as_deref(), Some("GENE1"));
    }

    #[test]
    fn test_transcript_and_gene_deleted() {
        let out = classify(&Variant::structural("1", 5, 120, VariantType::Del).unwrap());
        assert_eq!(
            types(&out),
            vec![EffectType::GeneDeleted, EffectType::TranscriptDeleted]
        );
        assert_eq!(out[1].transcript_id.as_deref(), Some("TR1"));
        assert_eq!(out[0].gene_name.as_deref(), Some("GENE1"));
    }

    #[test]
    fn test_whole_chromosome() {
        let out = classify(&Variant::structural("1", 0, 199, VariantType::Inv).unwrap());
        assert_eq!(types(&out), vec![EffectType::ChromosomeLargeInversion]);
    }

    #[test]
    fn test_upstream_downstream_minus_strand() {
        let up = classify(&Variant::new("2", 50_300, "A", "G").unwrap());
        assert_eq!(types(&up), vec![EffectType::Upstream]);
        assert_eq!(up[0].distance, Some(200));
        let down = classify(&Variant::new("2", 49_900, "A", "G").unwrap());
        assert_eq!(types(&down), vec![EffectType::Downstream]);
        let far = classify(&Variant::new("2", 60_000, "A", "G").unwrap());
        assert_eq!(types(&far), vec![EffectType::Intergenic]);
    }

    #[test]
    fn test_non_coding_exon_and_custom() {
        let exon = classify(&Variant::new("2", 50_050, "A", "G").unwrap());
        assert_eq!(types(&exon), vec![EffectType::Exon]);
        let custom = classify(&Variant::new("2", 15, "A", "G").unwrap());
        assert_eq!(types(&custom), vec![EffectType::Intergenic, EffectType::Custom]);
        assert_eq!(custom[1].feature_id.as_deref(), Some("peak"));
    }

    #[test]
    fn test_ref_mismatch_warning() {
        // Position 40 holds an A
        let out = classify(&Variant::new("1", 40, "C", "G").unwrap());
        assert!(!out.is_empty());
        assert!(out.iter().all(|e| e.has_warning(ErrorWarning::RefDoesNotMatchGenome)));
        let ok = classify(&snp(40));
        assert!(ok.iter().all(|e| !e.has_warning(ErrorWarning::RefDoesNotMatchGenome)));
    }

    #[test]
    fn test_sorted_by_impact() {
        let out = classify(&Variant::structural("1", 25, 35, VariantType::Del).unwrap());
        assert!(out.windows(2).all(|w| w[0].impact >= w[1].impact));
        assert!(types(&out).contains(&EffectType::SpliceSiteDonor));
        assert!(types(&out).contains(&EffectType::ExonDeletedPartial));
        assert!(types(&out).contains(&EffectType::FrameShift));
    }

    #[test]
    fn test_exon_deleted() {
        let out = classify(&Variant::structural("1", 5, 40, VariantType::Del).unwrap());
        let deleted: Vec<_> = out
            .iter()
            .filter(|e| e.effect_type == EffectType::ExonDeleted)
            .collect();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].rank, 1);
    }
}
