//! HGVS notation for classified effects
//!
//! [`HgvsGenerator`] renders the transcript-level (`c.`/`n.`) and protein
//! level (`p.`) description of a [`VariantEffect`]. Both strings carry the
//! transcript id as their reference sequence (`TR1:c.76A>T`).
//!
//! # Example
//!
//! ```
//! use ferro_effect::hgvs::HgvsNotation;
//!
//! assert_eq!(HgvsNotation::transcript_id_of("NM_000088.3:c.589G>T"), Some("NM_000088.3"));
//! ```

pub mod dna;
pub mod protein;
pub mod shift;

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::SequenceCache;
use crate::codon::CodonTables;
use crate::config::EffectConfig;
use crate::effect::{EffectType, VariantEffect};
use crate::model::{Genome, Transcript};

pub use dna::DnaChange;
pub use protein::{AaStyle, ProteinChange};

/// DNA and protein notation of one effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgvsNotation {
    pub dna: Option<String>,
    pub protein: Option<String>,
}

impl HgvsNotation {
    /// Reference sequence id of a notation (`"NM_1:c.5del"` gives `"NM_1"`).
    pub fn transcript_id_of(notation: &str) -> Option<&str> {
        let (id, edit) = notation.split_once(':')?;
        (!id.is_empty() && !edit.is_empty()).then_some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.dna.is_none() && self.protein.is_none()
    }
}

/// Generates HGVS notation for effects on one genome.
pub struct HgvsGenerator<'a> {
    genome: &'a Genome,
    config: &'a EffectConfig,
    tables: Cow<'a, CodonTables>,
    cache: Option<&'a SequenceCache>,
}

impl<'a> HgvsGenerator<'a> {
    /// Create a generator. Unknown codon table overrides fall back to the
    /// built-in assignments.
    pub fn new(genome: &'a Genome, config: &'a EffectConfig) -> Self {
        let tables = CodonTables::with_overrides(&config.codon_tables).unwrap_or_else(|e| {
            tracing::warn!("Ignoring codon table overrides: {}", e);
            CodonTables::new()
        });
        Self {
            genome,
            config,
            tables: Cow::Owned(tables),
            cache: None,
        }
    }

    /// Create a generator over an already resolved codon table registry.
    pub fn with_tables(genome: &'a Genome, config: &'a EffectConfig, tables: &'a CodonTables) -> Self {
        Self {
            genome,
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

    fn transcript(&self, effect: &VariantEffect) -> Option<Transcript<'a>> {
        self.genome.transcript_by_name(effect.transcript_id.as_deref()?)
    }

    /// Both notations for `effect`.
    pub fn hgvs(&self, effect: &VariantEffect) -> HgvsNotation {
        HgvsNotation {
            dna: self.dna(effect),
            protein: self.protein(effect),
        }
    }

    /// `c.` notation on coding transcripts, `n.` on non-coding ones.
    ///
    /// `None` for effects without a transcript and for whole-transcript
    /// deletions.
    pub fn dna(&self, effect: &VariantEffect) -> Option<String> {
        if effect.effect_type == EffectType::TranscriptDeleted {
            return None;
        }
        let tr = self.transcript(effect)?;
        let local = effect.local_variant();
        let variant = if self.config.hgvs.shift {
            dna::normalize(self.genome, &tr, &local)
        } else {
            local
        };
        let change = dna::change(self.genome, &tr, &variant)?;
        let kind = if tr.is_protein_coding() { 'c' } else { 'n' };
        Some(format!("{}:{}.{}", tr.name(), kind, change))
    }

    /// `p.` notation; `None` for synonymous and non-coding changes.
    pub fn protein(&self, effect: &VariantEffect) -> Option<String> {
        let tr = self.transcript(effect)?;
        if !tr.is_protein_coding() {
            return None;
        }
        let table = self.tables.for_transcript(tr.chromosome(), tr.codon_table_name());
        let sequences = || match self.cache {
            Some(cache) => cache.get_or_compute(&tr, table),
            None => tr.compute_sequences(table).map(Arc::new),
        };
        let change = protein::change(effect, &tr, sequences, table)?;
        let style = if self.config.hgvs.one_letter_aa {
            AaStyle::OneLetter
        } else {
            AaStyle::ThreeLetter
        };
        Some(format!("{}:{}", tr.name(), change.render(style)))
    }
}
