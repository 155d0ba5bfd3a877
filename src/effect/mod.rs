//! Functional effect classification.
//!
//! This module holds the closed set of effect types with their fixed impact
//! and Sequence Ontology terms, the [`VariantEffect`] record, and the
//! [`Classifier`] that produces effects for a variant.
//!
//! # Example
//!
//! ```
//! use ferro_effect::effect::{EffectType, Impact};
//!
//! assert_eq!(EffectType::NonSynonymousCoding.impact(), Impact::Moderate);
//! assert_eq!(EffectType::NonSynonymousCoding.so_term(), "missense_variant");
//! assert_eq!(EffectType::NonSynonymousCoding.name(), "NON_SYNONYMOUS_CODING");
//! ```

mod classify;
mod codon_change;
mod structural;

pub use classify::Classifier;
pub use codon_change::{mutate_cds, CdsEdit};

use serde::{Deserialize, Serialize};

use crate::error::ErrorWarning;
use crate::model::{MarkerId, Variant};

/// Effect type.
///
/// Declaration order follows putative impact, most severe first; sorting
/// effects of equal impact uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectType {
    // High
    ChromosomeLargeDeletion,
    ChromosomeLargeInversion,
    ChromosomeLargeDuplication,
    GeneRearrangement,
    GeneDeleted,
    TranscriptDeleted,
    ExonDeleted,
    ExonDeletedPartial,
    GeneFusion,
    GeneFusionReverse,
    GeneFusionHalf,
    FrameShift,
    StopGained,
    StopLost,
    StartLost,
    SpliceSiteAcceptor,
    SpliceSiteDonor,
    RareAminoAcid,
    ExonDuplication,
    ExonDuplicationPartial,
    ExonInversion,
    ExonInversionPartial,
    ProteinProteinInteractionLocus,
    ProteinStructuralInteractionLocus,
    // Moderate
    NonSynonymousCoding,
    NonSynonymousStop,
    NonSynonymousStart,
    GeneDuplication,
    TranscriptDuplication,
    Utr5Deleted,
    Utr3Deleted,
    SpliceSiteBranchU12,
    SpliceSiteRegion,
    SpliceSiteBranch,
    SynonymousCoding,
    SynonymousStart,
    SynonymousStop,
    GeneInversion,
    TranscriptInversion,
    CodonChange,
    CodonInsertion,
    CodonChangePlusCodonInsertion,
    CodonDeletion,
    CodonChangePlusCodonDeletion,
    // Low
    Utr5Prime,
    Utr3Prime,
    StartGained,
    Motif,
    MotifDeleted,
    Regulation,
    MicroRna,
    FeatureFusion,
    Upstream,
    Downstream,
    // Modifier
    NextProt,
    IntronConserved,
    Intron,
    Intragenic,
    IntergenicConserved,
    Intergenic,
    Cds,
    Exon,
    Transcript,
    Gene,
    Sequence,
    ChromosomeElongation,
    Custom,
    Chromosome,
    Genome,
    None,
}

impl EffectType {
    /// Every effect type, in declaration order.
    pub const ALL: [EffectType; 70] = [
        EffectType::ChromosomeLargeDeletion,
        EffectType::ChromosomeLargeInversion,
        EffectType::ChromosomeLargeDuplication,
        EffectType::GeneRearrangement,
        EffectType::GeneDeleted,
        EffectType::TranscriptDeleted,
        EffectType::ExonDeleted,
        EffectType::ExonDeletedPartial,
        EffectType::GeneFusion,
        EffectType::GeneFusionReverse,
        EffectType::GeneFusionHalf,
        EffectType::FrameShift,
        EffectType::StopGained,
        EffectType::StopLost,
        EffectType::StartLost,
        EffectType::SpliceSiteAcceptor,
        EffectType::SpliceSiteDonor,
        EffectType::RareAminoAcid,
        EffectType::ExonDuplication,
        EffectType::ExonDuplicationPartial,
        EffectType::ExonInversion,
        EffectType::ExonInversionPartial,
        EffectType::ProteinProteinInteractionLocus,
        EffectType::ProteinStructuralInteractionLocus,
        EffectType::NonSynonymousCoding,
        EffectType::NonSynonymousStop,
        EffectType::NonSynonymousStart,
        EffectType::GeneDuplication,
        EffectType::TranscriptDuplication,
        EffectType::Utr5Deleted,
        EffectType::Utr3Deleted,
        EffectType::SpliceSiteBranchU12,
        EffectType::SpliceSiteRegion,
        EffectType::SpliceSiteBranch,
        EffectType::SynonymousCoding,
        EffectType::SynonymousStart,
        EffectType::SynonymousStop,
        EffectType::GeneInversion,
        EffectType::TranscriptInversion,
        EffectType::CodonChange,
        EffectType::CodonInsertion,
        EffectType::CodonChangePlusCodonInsertion,
        EffectType::CodonDeletion,
        EffectType::CodonChangePlusCodonDeletion,
        EffectType::Utr5Prime,
        EffectType::Utr3Prime,
        EffectType::StartGained,
        EffectType::Motif,
        EffectType::MotifDeleted,
        EffectType::Regulation,
        EffectType::MicroRna,
        EffectType::FeatureFusion,
        EffectType::Upstream,
        EffectType::Downstream,
        EffectType::NextProt,
        EffectType::IntronConserved,
        EffectType::Intron,
        EffectType::Intragenic,
        EffectType::IntergenicConserved,
        EffectType::Intergenic,
        EffectType::Cds,
        EffectType::Exon,
        EffectType::Transcript,
        EffectType::Gene,
        EffectType::Sequence,
        EffectType::ChromosomeElongation,
        EffectType::Custom,
        EffectType::Chromosome,
        EffectType::Genome,
        EffectType::None,
    ];

    /// Fixed impact of this effect type.
    pub fn impact(&self) -> Impact {
        use EffectType::*;
        match self {
            ChromosomeLargeDeletion | ExonDeleted | ExonDeletedPartial | ExonDuplication
            | ExonDuplicationPartial | ExonInversion | ExonInversionPartial | FrameShift
            | GeneDeleted | GeneFusion | GeneFusionReverse | GeneFusionHalf | GeneRearrangement
            | ProteinProteinInteractionLocus | ProteinStructuralInteractionLocus | RareAminoAcid
            | SpliceSiteAcceptor | SpliceSiteDonor | StartLost | StopGained | StopLost
            | TranscriptDeleted => Impact::High,

            ChromosomeLargeInversion | CodonChangePlusCodonDeletion | CodonChangePlusCodonInsertion
            | CodonDeletion | CodonInsertion | GeneDuplication | GeneInversion | NonSynonymousCoding
            | SpliceSiteBranchU12 | TranscriptDuplication | TranscriptInversion | Utr3Deleted
            | Utr5Deleted => Impact::Moderate,

            ChromosomeLargeDuplication | CodonChange | FeatureFusion | NonSynonymousStart
            | NonSynonymousStop | SpliceSiteRegion | SpliceSiteBranch | StartGained
            | SynonymousCoding | SynonymousStart | SynonymousStop | Motif | MotifDeleted => Impact::Low,

            Cds | Chromosome | ChromosomeElongation | Custom | Downstream | Exon | Gene | Genome
            | Intragenic | Intergenic | IntergenicConserved | Intron | IntronConserved | MicroRna
            | None | Regulation | Sequence | Transcript | Upstream | Utr3Prime | Utr5Prime
            | NextProt => Impact::Modifier,
        }
    }

    /// Sequence Ontology term.
    pub fn so_term(&self) -> &'static str {
        use EffectType::*;
        match self {
            Cds | CodonChange => "coding_sequence_variant",
            ChromosomeLargeDeletion => "chromosome_number_variation",
            ChromosomeLargeDuplication | ExonDuplication | ExonDuplicationPartial
            | GeneDuplication | TranscriptDuplication => "duplication",
            ChromosomeLargeInversion | ExonInversion | ExonInversionPartial | GeneInversion
            | TranscriptInversion => "inversion",
            Chromosome => "chromosome",
            ChromosomeElongation => "feature_elongation",
            CodonChangePlusCodonInsertion => "disruptive_inframe_insertion",
            CodonChangePlusCodonDeletion => "disruptive_inframe_deletion",
            CodonDeletion => "conservative_inframe_deletion",
            CodonInsertion => "conservative_inframe_insertion",
            Downstream => "downstream_gene_variant",
            Exon => "non_coding_transcript_exon_variant",
            ExonDeleted | ExonDeletedPartial => "exon_loss_variant",
            FeatureFusion => "feature_fusion",
            FrameShift => "frameshift_variant",
            Gene => "gene_variant",
            GeneDeleted => "feature_ablation",
            GeneFusion | GeneFusionHalf => "gene_fusion",
            GeneFusionReverse => "bidirectional_gene_fusion",
            GeneRearrangement => "rearranged_at_DNA_level",
            Intergenic => "intergenic_region",
            IntergenicConserved => "conserved_intergenic_variant",
            Intron => "intron_variant",
            IntronConserved => "conserved_intron_variant",
            Intragenic => "intragenic_variant",
            MicroRna => "miRNA",
            Motif => "TF_binding_site_variant",
            MotifDeleted => "TFBS_ablation",
            NextProt => "sequence_feature",
            NonSynonymousCoding => "missense_variant",
            NonSynonymousStart => "initiator_codon_variant",
            NonSynonymousStop | SynonymousStop => "stop_retained_variant",
            ProteinProteinInteractionLocus => "protein_protein_contact",
            ProteinStructuralInteractionLocus => "structural_interaction_variant",
            RareAminoAcid => "rare_amino_acid_variant",
            Regulation => "regulatory_region_variant",
            SpliceSiteAcceptor => "splice_acceptor_variant",
            SpliceSiteDonor => "splice_donor_variant",
            SpliceSiteRegion => "splice_region_variant",
            SpliceSiteBranch | SpliceSiteBranchU12 => "splice_branch_variant",
            StartLost => "start_lost",
            StartGained => "5_prime_UTR_premature_start_codon_gain_variant",
            StopGained => "stop_gained",
            StopLost => "stop_lost",
            SynonymousCoding => "synonymous_variant",
            SynonymousStart => "initiator_codon_variant&non_canonical_start_codon",
            Transcript => "non_coding_transcript_variant",
            TranscriptDeleted => "transcript_ablation",
            Upstream => "upstream_gene_variant",
            Utr3Prime => "3_prime_UTR_variant",
            Utr3Deleted => "3_prime_UTR_truncation&exon_loss_variant",
            Utr5Prime => "5_prime_UTR_variant",
            Utr5Deleted => "5_prime_UTR_truncation&exon_loss_variant",
            Custom => "custom",
            None | Genome | Sequence => "",
        }
    }

    /// Classic upper-case effect name (`NON_SYNONYMOUS_CODING`).
    pub fn name(&self) -> &'static str {
        use EffectType::*;
        match self {
            ChromosomeLargeDeletion => "CHROMOSOME_LARGE_DELETION",
            ChromosomeLargeInversion => "CHROMOSOME_LARGE_INVERSION",
            ChromosomeLargeDuplication => "CHROMOSOME_LARGE_DUPLICATION",
            GeneRearrangement => "GENE_REARRANGEMENT",
            GeneDeleted => "GENE_DELETED",
            TranscriptDeleted => "TRANSCRIPT_DELETED",
            ExonDeleted => "EXON_DELETED",
            ExonDeletedPartial => "EXON_DELETED_PARTIAL",
            GeneFusion => "GENE_FUSION",
            GeneFusionReverse => "GENE_FUSION_REVERESE",
            GeneFusionHalf => "GENE_FUSION_HALF",
            FrameShift => "FRAME_SHIFT",
            StopGained => "STOP_GAINED",
            StopLost => "STOP_LOST",
            StartLost => "START_LOST",
            SpliceSiteAcceptor => "SPLICE_SITE_ACCEPTOR",
            SpliceSiteDonor => "SPLICE_SITE_DONOR",
            RareAminoAcid => "RARE_AMINO_ACID",
            ExonDuplication => "EXON_DUPLICATION",
            ExonDuplicationPartial => "EXON_DUPLICATION_PARTIAL",
            ExonInversion => "EXON_INVERSION",
            ExonInversionPartial => "EXON_INVERSION_PARTIAL",
            ProteinProteinInteractionLocus => "PROTEIN_PROTEIN_INTERACTION_LOCUS",
            ProteinStructuralInteractionLocus => "PROTEIN_STRUCTURAL_INTERACTION_LOCUS",
            NonSynonymousCoding => "NON_SYNONYMOUS_CODING",
            NonSynonymousStop => "NON_SYNONYMOUS_STOP",
            NonSynonymousStart => "NON_SYNONYMOUS_START",
            GeneDuplication => "GENE_DUPLICATION",
            TranscriptDuplication => "TRANSCRIPT_DUPLICATION",
            Utr5Deleted => "UTR_5_DELETED",
            Utr3Deleted => "UTR_3_DELETED",
            SpliceSiteBranchU12 => "SPLICE_SITE_BRANCH_U12",
            SpliceSiteRegion => "SPLICE_SITE_REGION",
            SpliceSiteBranch => "SPLICE_SITE_BRANCH",
            SynonymousCoding => "SYNONYMOUS_CODING",
            SynonymousStart => "SYNONYMOUS_START",
            SynonymousStop => "SYNONYMOUS_STOP",
            GeneInversion => "GENE_INVERSION",
            TranscriptInversion => "TRANSCRIPT_INVERSION",
            CodonChange => "CODON_CHANGE",
            CodonInsertion => "CODON_INSERTION",
            CodonChangePlusCodonInsertion => "CODON_CHANGE_PLUS_CODON_INSERTION",
            CodonDeletion => "CODON_DELETION",
            CodonChangePlusCodonDeletion => "CODON_CHANGE_PLUS_CODON_DELETION",
            Utr5Prime => "UTR_5_PRIME",
            Utr3Prime => "UTR_3_PRIME",
            StartGained => "START_GAINED",
            Motif => "MOTIF",
            MotifDeleted => "MOTIF_DELETED",
            Regulation => "REGULATION",
            MicroRna => "MICRO_RNA",
            FeatureFusion => "FEATURE_FUSION",
            Upstream => "UPSTREAM",
            Downstream => "DOWNSTREAM",
            NextProt => "NEXT_PROT",
            IntronConserved => "INTRON_CONSERVED",
            Intron => "INTRON",
            Intragenic => "INTRAGENIC",
            IntergenicConserved => "INTERGENIC_CONSERVED",
            Intergenic => "INTERGENIC",
            Cds => "CDS",
            Exon => "EXON",
            Transcript => "TRANSCRIPT",
            Gene => "GENE",
            Sequence => "SEQUENCE",
            ChromosomeElongation => "CHROMOSOME_ELONGATION",
            Custom => "CUSTOM",
            Chromosome => "CHROMOSOME",
            Genome => "GENOME",
            None => "NONE",
        }
    }

    pub fn is_fusion(&self) -> bool {
        matches!(
            self,
            EffectType::GeneFusion
                | EffectType::GeneFusionReverse
                | EffectType::GeneFusionHalf
                | EffectType::FeatureFusion
        )
    }

    /// Effects that change the protein sequence through the coding bases.
    pub fn is_coding_change(&self) -> bool {
        use EffectType::*;
        matches!(
            self,
            FrameShift
                | StopGained
                | StopLost
                | StartLost
                | RareAminoAcid
                | NonSynonymousCoding
                | NonSynonymousStart
                | NonSynonymousStop
                | SynonymousCoding
                | SynonymousStart
                | SynonymousStop
                | CodonChange
                | CodonInsertion
                | CodonChangePlusCodonInsertion
                | CodonDeletion
                | CodonChangePlusCodonDeletion
        )
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.so_term())
    }
}

/// Putative impact tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Modifier - usually non-coding, hard to predict.
    Modifier,
    /// Low impact, mostly harmless.
    Low,
    /// Moderate impact, might change protein effectiveness.
    Moderate,
    /// High impact, likely disruptive.
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Codon and amino acid change of a coding effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodonChange {
    /// 0-based number of the first affected codon
    pub codon_num: i64,
    /// 0-based position of the first changed base within that codon
    pub codon_index: i64,
    /// Reference codons, changed bases upper case (`tGt`)
    pub codons_ref: String,
    /// Alternative codons, changed bases upper case (`tAt`)
    pub codons_alt: String,
    /// One-letter reference amino acids
    pub aa_ref: String,
    /// One-letter alternative amino acids
    pub aa_alt: String,
}

/// One classified consequence of a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantEffect {
    /// The variant as given by the caller
    pub variant: Variant,
    pub effect_type: EffectType,
    pub impact: Impact,
    /// Marker the effect was derived from
    pub marker: Option<MarkerId>,
    pub gene_name: Option<String>,
    pub gene_id: Option<String>,
    pub transcript_id: Option<String>,
    /// Exon id, intron id or custom interval name
    pub feature_id: Option<String>,
    pub rank: u32,
    pub rank_max: u32,
    pub codon: Option<CodonChange>,
    /// 0-based CDS index of the first affected coding base
    pub cds_index: Option<i64>,
    /// 0-based CDS index (reference coordinates) of the premature stop
    /// created by a frameshift
    pub ptc_cds_index: Option<i64>,
    /// Reference protein length in codons
    pub protein_length: Option<i64>,
    /// Distance to the transcript for upstream/downstream effects
    pub distance: Option<i64>,
    /// Offset applied to the variant to reach the marker's frame on a
    /// circular chromosome
    pub coordinate_offset: i64,
    pub warnings: Vec<ErrorWarning>,
}

impl VariantEffect {
    /// New effect; the impact comes from the fixed effect table.
    pub fn new(variant: &Variant, effect_type: EffectType) -> Self {
        Self {
            variant: variant.clone(),
            effect_type,
            impact: effect_type.impact(),
            marker: None,
            gene_name: None,
            gene_id: None,
            transcript_id: None,
            feature_id: None,
            rank: 0,
            rank_max: 0,
            codon: None,
            cds_index: None,
            ptc_cds_index: None,
            protein_length: None,
            distance: None,
            coordinate_offset: 0,
            warnings: Vec::new(),
        }
    }

    /// The variant in the coordinate frame of the annotated marker.
    pub fn local_variant(&self) -> Variant {
        if self.coordinate_offset == 0 {
            self.variant.clone()
        } else {
            self.variant.shifted(self.coordinate_offset)
        }
    }

    pub fn add_warning(&mut self, warning: ErrorWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn has_warning(&self, warning: ErrorWarning) -> bool {
        self.warnings.contains(&warning)
    }
}

impl std::fmt::Display for VariantEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.effect_type, self.impact)?;
        if let Some(gene) = &self.gene_name {
            write!(f, "\t{}", gene)?;
        }
        if let Some(tr) = &self.transcript_id {
            write!(f, "\t{}", tr)?;
        }
        if let Some(codon) = &self.codon {
            write!(f, "\t{}/{}", codon.codons_ref, codon.codons_alt)?;
        }
        Ok(())
    }
}
