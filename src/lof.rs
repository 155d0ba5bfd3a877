//! Loss of function and nonsense-mediated decay
//!
//! [`LofEvaluator`] decides whether the effects of a variant knock out a
//! transcript (LOF) and whether a premature stop codon is expected to send
//! the mRNA to nonsense-mediated decay (NMD).
//!
//! NMD is triggered when a premature termination codon (PTC) lies more than
//! `nmd_distance` bases (default 50) upstream of the last exon-exon
//! junction. Stops in the last coding exon, or close to its junction,
//! escape decay.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::LofConfig;
use crate::effect::{EffectType, VariantEffect};
use crate::model::{Genome, Marker, MarkerKind, Transcript, VariantType};

/// NMD prediction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmdPrediction {
    /// NMD is predicted to be triggered.
    Triggered {
        /// Distance from the PTC to the last exon-exon junction, in bases
        distance_to_junction: i64,
    },
    /// NMD is not predicted to be triggered.
    NotTriggered { reason: NmdNotTriggeredReason },
}

impl NmdPrediction {
    pub fn is_triggered(&self) -> bool {
        matches!(self, NmdPrediction::Triggered { .. })
    }
}

/// Reason why NMD is not triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmdNotTriggeredReason {
    /// Fewer than two coding exons, so there is no downstream junction.
    SingleCodingExon,
    /// PTC is in the last coding exon.
    PtcInLastExon,
    /// PTC is within the threshold of the last exon-exon junction.
    PtcNearLastJunction { distance: i64 },
    /// No premature termination codon could be located.
    NoPtc,
}

/// Predicts NMD from a PTC position in CDS coordinates.
#[derive(Debug, Clone)]
pub struct NmdPredictor {
    /// PTCs more than this many bases upstream of the last junction
    /// trigger NMD.
    pub threshold: i64,
}

impl NmdPredictor {
    pub fn new() -> Self {
        Self { threshold: 50 }
    }

    pub fn with_threshold(threshold: i64) -> Self {
        Self { threshold }
    }

    /// Predict whether a PTC at 0-based CDS index `ptc` triggers NMD on `tr`.
    pub fn predict(&self, ptc: Option<i64>, tr: &Transcript<'_>) -> NmdPrediction {
        if tr.coding_exons().count() < 2 {
            return NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::SingleCodingExon,
            };
        }
        let (Some(ptc), Some(junction)) = (ptc, tr.last_junction_cds_index()) else {
            return NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::NoPtc,
            };
        };
        if ptc >= junction {
            return NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::PtcInLastExon,
            };
        }

        let distance = junction - ptc;
        if distance > self.threshold {
            NmdPrediction::Triggered {
                distance_to_junction: distance,
            }
        } else {
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::PtcNearLastJunction { distance },
            }
        }
    }
}

impl Default for NmdPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// LOF and NMD status of one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLof {
    pub gene_name: Option<String>,
    pub gene_id: Option<String>,
    pub transcript_id: String,
    pub lof: bool,
    pub nmd: bool,
}

/// Gene-level summary in the style of the VCF `LOF` / `NMD` tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LofRecord {
    pub gene_name: String,
    pub gene_id: String,
    /// Number of transcripts of the gene
    pub transcript_count: usize,
    /// Fraction of those transcripts affected
    pub fraction: f64,
}

impl LofRecord {
    /// `(GENE|ID|2|0.50)`
    pub fn to_vcf(&self) -> String {
        format!(
            "({}|{}|{}|{:.2})",
            self.gene_name, self.gene_id, self.transcript_count, self.fraction
        )
    }
}

/// LOF/NMD verdicts for one variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LofReport {
    /// One entry per transcript that had effects, in first-seen order
    pub transcripts: Vec<TranscriptLof>,
    pub lof: Vec<LofRecord>,
    pub nmd: Vec<LofRecord>,
}

impl LofReport {
    pub fn is_lof(&self) -> bool {
        !self.lof.is_empty()
    }

    pub fn is_nmd(&self) -> bool {
        !self.nmd.is_empty()
    }
}

/// Evaluates effects for loss of function and NMD.
pub struct LofEvaluator<'a> {
    genome: &'a Genome,
    config: &'a LofConfig,
    nmd: NmdPredictor,
}

impl<'a> LofEvaluator<'a> {
    pub fn new(genome: &'a Genome, config: &'a LofConfig) -> Self {
        Self {
            genome,
            config,
            nmd: NmdPredictor::with_threshold(config.nmd_distance),
        }
    }

    /// Whether any of `effects` is a loss of function.
    pub fn is_lof(&self, effects: &[VariantEffect]) -> bool {
        effects.iter().any(|e| self.effect_is_lof(e))
    }

    /// Whether any of `effects` is predicted to trigger NMD.
    pub fn is_nmd(&self, effects: &[VariantEffect]) -> bool {
        effects.iter().any(|e| self.effect_is_nmd(e))
    }

    fn transcript(&self, effect: &VariantEffect) -> Option<Transcript<'a>> {
        self.genome.transcript_by_name(effect.transcript_id.as_deref()?)
    }

    fn gene_of(&self, effect: &VariantEffect) -> Option<&'a Marker> {
        match self.transcript(effect) {
            Some(tr) => tr.gene(),
            None => {
                let id = self.genome.ancestor(effect.marker?, MarkerKind::Gene)?;
                self.genome.get(id)
            }
        }
    }

    /// Whether a single effect knocks out its transcript.
    pub fn effect_is_lof(&self, effect: &VariantEffect) -> bool {
        if effect.variant.ref_allele == effect.variant.alt_allele && !effect.variant.is_structural() {
            return false;
        }
        // Fusion effects may come without a transcript
        if matches!(
            effect.effect_type,
            EffectType::GeneFusion | EffectType::GeneFusionReverse | EffectType::GeneFusionHalf
        ) {
            return self.gene_of(effect).is_some();
        }
        let Some(tr) = self.transcript(effect) else {
            return false;
        };
        if !tr.is_protein_coding() {
            return false;
        }

        let lof = match effect.effect_type {
            EffectType::TranscriptDeleted
            | EffectType::StartLost
            | EffectType::RareAminoAcid
            | EffectType::SpliceSiteDonor
            | EffectType::SpliceSiteAcceptor => true,
            EffectType::FrameShift => self
                .protein_fraction(effect)
                .is_some_and(|f| self.config.ignore_protein_before <= f && f <= self.config.ignore_protein_after),
            EffectType::StopGained => self.effect_is_nmd(effect),
            EffectType::ExonDeleted => {
                let variant = effect.local_variant();
                tr.first_coding_exon()
                    .is_some_and(|exon| variant.includes(exon.start, exon.end))
            }
            _ => false,
        };
        lof || self.is_lof_deletion(effect, &tr)
    }

    /// Position of the affected codon as a fraction of the protein length.
    fn protein_fraction(&self, effect: &VariantEffect) -> Option<f64> {
        let length = effect.protein_length.filter(|l| *l > 0)?;
        let codon = match &effect.codon {
            Some(c) => c.codon_num,
            None => effect.cds_index? / 3,
        };
        Some(codon as f64 / length as f64)
    }

    /// Deletions removing more than `delete_fraction` of the coding bases.
    fn is_lof_deletion(&self, effect: &VariantEffect, tr: &Transcript<'_>) -> bool {
        let variant = effect.local_variant();
        if variant.variant_type != VariantType::Del {
            return false;
        }
        let Some((cs, ce)) = tr.coding_range() else {
            return false;
        };
        let lo = cs.max(variant.start);
        let hi = ce.min(variant.end);
        if lo > hi {
            return false;
        }
        let deleted: i64 = tr.exons().map(|e| e.intersect_size(lo, hi)).sum();
        let coding = tr.cds_len();
        coding > 0 && deleted as f64 / coding as f64 > self.config.delete_fraction
    }

    /// CDS index of the premature stop an effect introduces, if any.
    fn ptc(&self, effect: &VariantEffect, tr: &Transcript<'_>) -> Option<i64> {
        match effect.effect_type {
            EffectType::StopGained => match &effect.codon {
                Some(c) => {
                    let i = c.aa_alt.find('*').unwrap_or(0) as i64;
                    Some((c.codon_num + i) * 3)
                }
                None => effect.cds_index,
            },
            EffectType::FrameShift => effect.ptc_cds_index,
            EffectType::ExonDeleted => {
                let rank = effect.rank.checked_sub(1)? as usize;
                let exon = tr.exons().nth(rank)?;
                let (lo, hi) = tr.coding_range()?;
                let first = if tr.strand().is_plus() {
                    exon.start.max(lo)
                } else {
                    exon.end.min(hi)
                };
                tr.cds_base_number(first)
            }
            _ => None,
        }
    }

    /// NMD prediction for one effect; `None` for effects that cannot
    /// introduce a premature stop.
    pub fn predict_nmd(&self, effect: &VariantEffect) -> Option<NmdPrediction> {
        if !matches!(
            effect.effect_type,
            EffectType::StopGained | EffectType::FrameShift | EffectType::ExonDeleted
        ) {
            return None;
        }
        let tr = self.transcript(effect).filter(|t| t.is_protein_coding())?;
        Some(self.nmd.predict(self.ptc(effect, &tr), &tr))
    }

    /// Whether a single effect is predicted to trigger NMD.
    pub fn effect_is_nmd(&self, effect: &VariantEffect) -> bool {
        self.predict_nmd(effect).is_some_and(|p| p.is_triggered())
    }

    /// Per-transcript verdicts and gene-level summaries for the effects of
    /// one variant.
    pub fn evaluate(&self, effects: &[VariantEffect]) -> LofReport {
        let mut report = LofReport::default();
        let mut by_transcript: HashMap<&str, usize> = HashMap::new();
        // Gene marker -> (transcripts with LOF, transcripts with NMD, whole gene hit)
        let mut genes: Vec<(&'a Marker, Vec<String>, Vec<String>, bool)> = Vec::new();

        for effect in effects {
            let lof = self.effect_is_lof(effect);
            let nmd = self.effect_is_nmd(effect);

            if let Some(id) = effect.transcript_id.as_deref() {
                let idx = *by_transcript.entry(id).or_insert_with(|| {
                    report.transcripts.push(TranscriptLof {
                        gene_name: effect.gene_name.clone(),
                        gene_id: effect.gene_id.clone(),
                        transcript_id: id.to_string(),
                        lof: false,
                        nmd: false,
                    });
                    report.transcripts.len() - 1
                });
                report.transcripts[idx].lof |= lof;
                report.transcripts[idx].nmd |= nmd;
            }

            if !lof && !nmd {
                continue;
            }
            let Some(gene) = self.gene_of(effect) else {
                continue;
            };
            let slot = match genes.iter().position(|(g, ..)| g.id == gene.id) {
                Some(i) => i,
                None => {
                    genes.push((gene, Vec::new(), Vec::new(), false));
                    genes.len() - 1
                }
            };
            let entry = &mut genes[slot];
            match effect.transcript_id.as_ref() {
                Some(id) => {
                    if lof && !entry.1.contains(id) {
                        entry.1.push(id.clone());
                    }
                    if nmd && !entry.2.contains(id) {
                        entry.2.push(id.clone());
                    }
                }
                // A fusion without a transcript breaks every transcript
                None => entry.3 = true,
            }
        }

        for (gene, lof_ids, nmd_ids, whole) in genes {
            let info = self.genome.gene_info(gene.id);
            let gene_id = info.map(|i| i.gene_id.clone()).unwrap_or_else(|| gene.name.clone());
            let count = info.map(|i| i.transcripts.len()).unwrap_or(0);
            let fraction = |n: usize| {
                if count == 0 {
                    0.0
                } else {
                    n.min(count) as f64 / count as f64
                }
            };
            if whole || !lof_ids.is_empty() {
                let affected = if whole { count } else { lof_ids.len() };
                report.lof.push(LofRecord {
                    gene_name: gene.name.clone(),
                    gene_id: gene_id.clone(),
                    transcript_count: count,
                    fraction: fraction(affected),
                });
            }
            if !nmd_ids.is_empty() {
                report.nmd.push(LofRecord {
                    gene_name: gene.name.clone(),
                    gene_id,
                    transcript_count: count,
                    fraction: fraction(nmd_ids.len()),
                });
            }
        }

        if report.is_lof() {
            tracing::debug!("LOF in {} gene(s)", report.lof.len());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::CodonChange;
    use crate::model::{ChromosomeSpec, GeneSpec, GenomeBuilder, Strand, TranscriptSpec, Variant};

    // TR1: exons [0, 99] and [200, 299], CDS [10, 289]: 180 coding bases,
    // 60 codons, last junction at CDS index 90.
    // TR2: single exon [500, 799], CDS [510, 789].
    fn genome() -> Genome {
        GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::new("1", 2000))
            .gene(
                GeneSpec::new("G1", "GENE1", "1", Strand::Plus)
                    .with_transcript(TranscriptSpec::coding("TR1", 10, 289, &[(0, 99), (200, 299)]))
                    .with_transcript(TranscriptSpec::coding("TR1b", 10, 99, &[(0, 99)])),
            )
            .gene(
                GeneSpec::new("G2", "GENE2", "1", Strand::Plus)
                    .with_transcript(TranscriptSpec::coding("TR2", 510, 789, &[(500, 799)])),
            )
            .gene(
                GeneSpec::new("G3", "NCGENE", "1", Strand::Plus)
                    .with_transcript(TranscriptSpec::non_coding("NC", &[(1000, 1099), (1200, 1299)])),
            )
            .build()
            .unwrap()
    }

    fn effect(g: &Genome, tr: &str, pos: i64, t: EffectType) -> VariantEffect {
        let v = Variant::new("1", pos, "A", "T").unwrap();
        let mut e = VariantEffect::new(&v, t);
        let transcript = g.transcript_by_name(tr).unwrap();
        e.transcript_id = Some(tr.to_string());
        e.marker = Some(transcript.id());
        if let Some(gene) = transcript.gene() {
            e.gene_name = Some(gene.name.clone());
            e.gene_id = g.gene_info(gene.id).map(|i| i.gene_id.clone());
        }
        if transcript.is_protein_coding() {
            e.protein_length = Some(transcript.cds_len() / 3);
        }
        e
    }

    fn stop_gained(g: &Genome, tr: &str, codon_num: i64) -> VariantEffect {
        let mut e = effect(g, tr, 0, EffectType::StopGained);
        e.codon = Some(CodonChange {
            codon_num,
            codon_index: 0,
            codons_ref: "Cag".into(),
            codons_alt: "Tag".into(),
            aa_ref: "Q".into(),
            aa_alt: "*".into(),
        });
        e
    }

    #[test]
    fn test_nmd_predictor() {
        let g = genome();
        let tr = g.transcript_by_name("TR1").unwrap();
        let p = NmdPredictor::new();
        assert_eq!(
            p.predict(Some(80), &tr),
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::PtcNearLastJunction { distance: 10 }
            }
        );
        assert_eq!(p.predict(Some(30), &tr), NmdPrediction::Triggered { distance_to_junction: 60 });
        assert_eq!(
            p.predict(Some(40), &tr),
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::PtcNearLastJunction { distance: 50 }
            }
        );
        assert_eq!(
            p.predict(Some(120), &tr),
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::PtcInLastExon
            }
        );
        assert_eq!(
            p.predict(None, &tr),
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::NoPtc
            }
        );
    }

    #[test]
    fn test_single_exon_never_nmd() {
        let g = genome();
        let tr = g.transcript_by_name("TR2").unwrap();
        assert_eq!(
            NmdPredictor::new().predict(Some(3), &tr),
            NmdPrediction::NotTriggered {
                reason: NmdNotTriggeredReason::SingleCodingExon
            }
        );
    }

    #[test]
    fn test_stop_near_last_junction_escapes_nmd() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        // Codon 26 starts at CDS index 78, 12 bases before the junction
        let near = [stop_gained(&g, "TR1", 26)];
        assert!(!lof.is_nmd(&near));
        assert!(!lof.is_lof(&near));
        let far = [stop_gained(&g, "TR1", 5)];
        assert!(lof.is_nmd(&far));
        assert!(lof.is_lof(&far));
    }

    #[test]
    fn test_nmd_distance_is_configurable() {
        let g = genome();
        let config = LofConfig {
            nmd_distance: 5,
            ..LofConfig::default()
        };
        let lof = LofEvaluator::new(&g, &config);
        assert!(lof.is_nmd(&[stop_gained(&g, "TR1", 26)]));
    }

    #[test]
    fn test_frameshift_bounds() {
        let g = genome();
        let mut fs = effect(&g, "TR1", 100, EffectType::FrameShift);
        fs.cds_index = Some(90);
        let config = LofConfig::default();
        assert!(LofEvaluator::new(&g, &config).is_lof(std::slice::from_ref(&fs)));

        let narrow = LofConfig {
            ignore_protein_before: 0.05,
            ignore_protein_after: 0.4,
            ..LofConfig::default()
        };
        assert!(!LofEvaluator::new(&g, &narrow).is_lof(std::slice::from_ref(&fs)));
    }

    #[test]
    fn test_unconditional_lof() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        for t in [
            EffectType::StartLost,
            EffectType::SpliceSiteDonor,
            EffectType::SpliceSiteAcceptor,
            EffectType::TranscriptDeleted,
            EffectType::RareAminoAcid,
        ] {
            assert!(lof.effect_is_lof(&effect(&g, "TR1", 10, t)), "{:?}", t);
        }
        assert!(!lof.effect_is_lof(&effect(&g, "TR1", 10, EffectType::NonSynonymousCoding)));
        assert!(!lof.effect_is_lof(&effect(&g, "TR1", 10, EffectType::SpliceSiteRegion)));
        // Non-coding transcripts are never LOF
        assert!(!lof.effect_is_lof(&effect(&g, "NC", 1010, EffectType::SpliceSiteDonor)));
    }

    #[test]
    fn test_deletion_fraction() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        let big = Variant::structural("1", 20, 250, VariantType::Del).unwrap();
        let mut e = VariantEffect::new(&big, EffectType::ExonDeletedPartial);
        e.transcript_id = Some("TR1".into());
        // 80 + 51 = 131 of 180 coding bases
        assert!(lof.effect_is_lof(&e));

        let small = Variant::structural("1", 20, 50, VariantType::Del).unwrap();
        let mut e = VariantEffect::new(&small, EffectType::ExonDeletedPartial);
        e.transcript_id = Some("TR1".into());
        assert!(!lof.effect_is_lof(&e));
    }

    #[test]
    fn test_first_coding_exon_deleted() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        let v = Variant::structural("1", 0, 120, VariantType::Del).unwrap();
        let mut e = VariantEffect::new(&v, EffectType::ExonDeleted);
        e.transcript_id = Some("TR1".into());
        e.rank = 1;
        assert!(lof.effect_is_lof(&e));
        // The deleted exon starts at CDS index 0, far from the junction
        assert!(lof.effect_is_nmd(&e));
    }

    #[test]
    fn test_fusion_without_transcript() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        let gene = g.genes().find(|m| m.name == "GENE1").unwrap();
        let v = Variant::structural("1", 50, 600, VariantType::Inv).unwrap();
        let mut e = VariantEffect::new(&v, EffectType::GeneFusionReverse);
        e.marker = Some(gene.id);
        assert!(lof.effect_is_lof(&e));

        let report = lof.evaluate(&[e]);
        assert!(report.transcripts.is_empty());
        assert_eq!(report.lof.len(), 1);
        assert_eq!(report.lof[0].fraction, 1.0);
    }

    #[test]
    fn test_evaluate_report() {
        let g = genome();
        let config = LofConfig::default();
        let lof = LofEvaluator::new(&g, &config);
        let effects = vec![
            stop_gained(&g, "TR1", 5),
            effect(&g, "TR1b", 20, EffectType::NonSynonymousCoding),
            effect(&g, "TR1", 20, EffectType::Exon),
        ];
        let report = lof.evaluate(&effects);
        assert_eq!(report.transcripts.len(), 2);
        assert!(report.transcripts[0].lof && report.transcripts[0].nmd);
        assert!(!report.transcripts[1].lof && !report.transcripts[1].nmd);

        assert_eq!(report.lof.len(), 1);
        assert_eq!(report.lof[0].gene_name, "GENE1");
        assert_eq!(report.lof[0].gene_id, "G1");
        assert_eq!(report.lof[0].transcript_count, 2);
        assert_eq!(report.lof[0].to_vcf(), "(GENE1|G1|2|0.50)");
        assert_eq!(report.nmd.len(), 1);
        assert!(report.is_nmd());
    }

    #[test]
    fn test_evaluate_nothing() {
        let g = genome();
        let config = LofConfig::default();
        let report = LofEvaluator::new(&g, &config).evaluate(&[]);
        assert_eq!(report, LofReport::default());
        assert!(!report.is_lof());
    }
}
