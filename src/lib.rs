// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-effect: variant effect annotation
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Classifies genomic variants against a model of genes, transcripts and
//! exons, ranks the consequences by impact, and renders HGVS notation and
//! loss-of-function verdicts for them.
//!
//! # Example
//!
//! ```
//! use ferro_effect::{Annotator, EffectConfig, EffectType, Impact};
//! use ferro_effect::model::{ChromosomeSpec, GeneSpec, GenomeBuilder, Strand, TranscriptSpec, Variant};
//!
//! // ATG GAT TGG TTT CAG TAA inside a single exon
//! let genome = GenomeBuilder::new("demo")
//!     .chromosome(ChromosomeSpec::with_sequence("1", "CCCCCATGGATTGGTTTCAGTAACCCCC"))
//!     .gene(GeneSpec::new("G1", "GENE1", "1", Strand::Plus)
//!         .with_transcript(TranscriptSpec::coding("TR1", 5, 22, &[(0, 27)])))
//!     .build()
//!     .unwrap();
//! let annotator = Annotator::new(genome, EffectConfig::default()).unwrap();
//!
//! let effects = annotator.annotate(&Variant::new("1", 12, "G", "A").unwrap());
//! assert_eq!(effects[0].effect.effect_type, EffectType::StopGained);
//! assert_eq!(effects[0].effect.impact, Impact::High);
//! assert_eq!(effects[0].hgvs.dna.as_deref(), Some("TR1:c.8G>A"));
//! ```

pub mod annotator;
pub mod apply;
pub mod cache;
pub mod codon;
pub mod config;
pub mod effect;
pub mod error;
pub mod hgvs;
pub mod interval;
pub mod lof;
pub mod model;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequence;

// Re-export commonly used types
pub use annotator::{AnnotatedEffect, Annotator};
pub use config::EffectConfig;
pub use effect::{Classifier, EffectType, Impact, VariantEffect};
pub use error::{ErrorWarning, FerroError};
pub use hgvs::{HgvsGenerator, HgvsNotation};
pub use interval::IntervalForest;
pub use lof::{LofEvaluator, LofReport};
pub use model::{Genome, GenomeBuilder, Variant};

/// Result type alias for ferro-effect operations
pub type Result<T> = std::result::Result<T, FerroError>;
