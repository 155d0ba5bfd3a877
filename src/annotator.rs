//! One-stop annotation: classification, HGVS and LOF over an owned genome.
//!
//! # Example
//!
//! ```
//! use ferro_effect::{Annotator, EffectConfig, EffectType};
//! use ferro_effect::model::{ChromosomeSpec, GeneSpec, GenomeBuilder, Strand, TranscriptSpec, Variant};
//!
//! let genome = GenomeBuilder::new("demo")
//!     .chromosome(ChromosomeSpec::with_sequence("1", "CCCCCATGGATTGGTTTCAGTAACCCCC"))
//!     .gene(GeneSpec::new("G1", "GENE1", "1", Strand::Plus)
//!         .with_transcript(TranscriptSpec::coding("TR1", 5, 22, &[(0, 27)])))
//!     .build()
//!     .unwrap();
//! let annotator = Annotator::new(genome, EffectConfig::default()).unwrap();
//!
//! let variant = Variant::new("1", 8, "G", "T").unwrap();
//! let effects = annotator.annotate(&variant);
//! assert_eq!(effects[0].effect.effect_type, EffectType::NonSynonymousCoding);
//! assert_eq!(effects[0].hgvs.protein.as_deref(), Some("TR1:p.Asp2Tyr"));
//! ```

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, SequenceCache};
use crate::codon::CodonTables;
use crate::config::EffectConfig;
use crate::effect::{Classifier, VariantEffect};
use crate::error::FerroError;
use crate::hgvs::{HgvsGenerator, HgvsNotation};
use crate::interval::IntervalForest;
use crate::lof::{LofEvaluator, LofReport};
use crate::model::{Genome, Variant};

/// An effect together with its HGVS notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedEffect {
    #[serde(flatten)]
    pub effect: VariantEffect,
    pub hgvs: HgvsNotation,
}

/// Owns a genome and everything needed to annotate variants against it.
///
/// `Annotator` is `Send + Sync`; share it behind an `Arc` to annotate from
/// several threads.
pub struct Annotator {
    genome: Genome,
    forest: IntervalForest,
    config: EffectConfig,
    tables: CodonTables,
    cache: SequenceCache,
}

impl Annotator {
    /// Index `genome` and resolve the codon tables of `config`.
    pub fn new(genome: Genome, config: EffectConfig) -> Result<Self, FerroError> {
        config.validate().map_err(|e| FerroError::Config { msg: e.to_string() })?;
        let tables = CodonTables::with_overrides(&config.codon_tables)?;
        if genome.splice_config() != &config.splice {
            tracing::warn!(
                "Genome {} was built with different splice windows than configured",
                genome.name()
            );
        }
        let forest = IntervalForest::build(&genome);
        let cache = SequenceCache::new(config.cache.capacity);
        tracing::info!(
            "Indexed genome {} ({} transcripts)",
            genome.name(),
            genome.transcript_count()
        );
        Ok(Self {
            genome,
            forest,
            config,
            tables,
            cache,
        })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn forest(&self) -> &IntervalForest {
        &self.forest
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// A classifier borrowing this annotator's state.
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::with_tables(&self.genome, &self.forest, &self.config, &self.tables).with_cache(&self.cache)
    }

    fn generator(&self) -> HgvsGenerator<'_> {
        HgvsGenerator::with_tables(&self.genome, &self.config, &self.tables).with_cache(&self.cache)
    }

    /// Effects of `variant`, most severe first, without notation.
    pub fn classify(&self, variant: &Variant) -> Vec<VariantEffect> {
        self.classifier().classify(variant)
    }

    /// Effects of `variant` with their HGVS notation.
    pub fn annotate(&self, variant: &Variant) -> Vec<AnnotatedEffect> {
        let generator = self.generator();
        self.classify(variant)
            .into_iter()
            .map(|effect| {
                let hgvs = generator.hgvs(&effect);
                AnnotatedEffect { effect, hgvs }
            })
            .collect()
    }

    /// Annotate many variants; parallel when the `parallel` feature is on.
    pub fn annotate_all(&self, variants: &[Variant]) -> Vec<Vec<AnnotatedEffect>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            variants.par_iter().map(|v| self.annotate(v)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            variants.iter().map(|v| self.annotate(v)).collect()
        }
    }

    /// HGVS notation of one effect.
    pub fn hgvs(&self, effect: &VariantEffect) -> HgvsNotation {
        self.generator().hgvs(effect)
    }

    /// LOF/NMD verdicts for the effects of one variant.
    pub fn lof(&self, effects: &[VariantEffect]) -> LofReport {
        LofEvaluator::new(&self.genome, &self.config.lof).evaluate(effects)
    }
}
