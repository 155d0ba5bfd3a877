//! Parallel classification with rayon. Enable with the `parallel` feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_effect::config::EffectConfig;
//! use ferro_effect::effect::Classifier;
//! use ferro_effect::interval::IntervalForest;
//! use ferro_effect::model::{Genome, Variant};
//! use ferro_effect::parallel::classify_parallel;
//!
//! let genome = Genome::from_json(r#"{"name": "empty", "chromosomes": []}"#).unwrap();
//! let forest = IntervalForest::build(&genome);
//! let config = EffectConfig::default();
//! let classifier = Classifier::new(&genome, &forest, &config).unwrap();
//!
//! let variants = vec![Variant::new("1", 100, "A", "G").unwrap()];
//! let effects = classify_parallel(&classifier, &variants);
//! assert_eq!(effects.len(), 1);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::effect::{Classifier, VariantEffect};
use crate::error::FerroError;
use crate::model::Variant;

/// Classify many variants in parallel.
///
/// Returns one effect list per input variant. Order is preserved.
pub fn classify_parallel(classifier: &Classifier<'_>, variants: &[Variant]) -> Vec<Vec<VariantEffect>> {
    variants.par_iter().map(|v| classifier.classify(v)).collect()
}

/// Classify in chunks of `config.chunk_size` on a dedicated pool of
/// `config.num_threads` threads (0 uses the global rayon pool).
pub fn classify_parallel_with(
    classifier: &Classifier<'_>,
    variants: &[Variant],
    config: &ParallelConfig,
) -> Result<Vec<Vec<VariantEffect>>, FerroError> {
    let chunk_size = config.chunk_size.max(1);
    let run = || {
        variants
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| chunk.iter().map(|v| classifier.classify(v)))
            .collect::<Vec<_>>()
    };
    if config.num_threads == 0 {
        return Ok(run());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| FerroError::Config {
            msg: format!("Cannot build thread pool: {}", e),
        })?;
    tracing::debug!(
        "Classifying {} variants on {} threads",
        variants.len(),
        config.num_threads
    );
    Ok(pool.install(run))
}

/// Configuration for parallel batch processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Variants handed to a worker at a time
    pub chunk_size: usize,
    /// Number of threads (0 = use rayon default)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}
