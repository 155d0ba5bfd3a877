//! Spatial lookup of markers.
//!
//! [`IntervalForest`] keeps one `bio` array-backed interval tree per
//! chromosome and handles coordinate wraparound on circular chromosomes.

mod forest;

pub use forest::{ForestHit, IntervalForest};
