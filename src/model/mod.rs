//! Genome model: an arena of markers.
//!
//! # Coordinate System
//!
//! All coordinates in this module are **0-based closed intervals**:
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `Marker.start`, `Marker.end` | 0-based | Both ends inclusive, `start <= end` |
//! | `Variant.start`, `Variant.end` | 0-based | Inclusive; an insertion has `start == end` |
//! | `TranscriptSpec.coding_start/end` | 0-based | Lowest/highest coding base, inclusive |
//!
//! Coordinates are signed so that genes on circular chromosomes may extend
//! to the left of the origin.
//!
//! Markers never point at each other directly. Each [`Marker`] stores its
//! parent and children as [`MarkerId`]s into the owning [`Genome`], and
//! "enclosing transcript of this exon" is a walk up the parent chain.

mod builder;
mod genome;
mod transcript;
mod variant;

pub use builder::{ChromosomeSpec, CustomSpec, ExonSpec, GeneSpec, GenomeBuilder, GenomeSpec, TranscriptSpec};
pub use genome::{Chromosome, GeneInfo, Genome, TranscriptInfo};
pub use transcript::{Transcript, TranscriptSequences};
pub use variant::{Breakend, Variant, VariantType};

use serde::{Deserialize, Serialize};

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn is_plus(self) -> bool {
        self == Strand::Plus
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// Stable index of a marker inside its [`Genome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u32);

impl MarkerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of genomic feature a marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Chromosome,
    Gene,
    Transcript,
    Exon,
    Intron,
    Utr5,
    Utr3,
    Cds,
    SpliceSiteDonor,
    SpliceSiteAcceptor,
    SpliceRegion,
    Custom,
}

impl MarkerKind {
    /// Rank used to break ties between overlapping markers: higher wins.
    ///
    /// Exon beats intron, splice sites beat the intron that holds them and
    /// CDS beats UTR.
    pub fn specificity(self) -> u8 {
        match self {
            MarkerKind::Chromosome => 0,
            MarkerKind::Custom => 1,
            MarkerKind::Gene => 2,
            MarkerKind::Transcript => 3,
            MarkerKind::Intron => 4,
            MarkerKind::SpliceRegion => 5,
            MarkerKind::SpliceSiteDonor | MarkerKind::SpliceSiteAcceptor => 6,
            MarkerKind::Exon => 7,
            MarkerKind::Utr5 | MarkerKind::Utr3 => 8,
            MarkerKind::Cds => 9,
        }
    }

    pub fn is_splice(self) -> bool {
        matches!(
            self,
            MarkerKind::SpliceSiteDonor | MarkerKind::SpliceSiteAcceptor | MarkerKind::SpliceRegion
        )
    }
}

/// A genomic interval with a kind tag and parent/child relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub kind: MarkerKind,
    pub chromosome: String,
    /// First base (0-based, inclusive)
    pub start: i64,
    /// Last base (0-based, inclusive)
    pub end: i64,
    pub strand: Strand,
    /// Gene name, transcript id, exon id or custom label
    pub name: String,
    pub parent: Option<MarkerId>,
    pub children: Vec<MarkerId>,
    /// 1-based ordinal in transcription order (exons, introns and their
    /// splice sites); 0 when not applicable
    pub rank: u32,
    /// Exon sequence in transcript orientation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

impl Marker {
    /// Number of bases covered.
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `pos` lies inside the marker.
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether the closed range `[start, end]` touches the marker.
    pub fn intersects(&self, start: i64, end: i64) -> bool {
        self.start <= end && start <= self.end
    }

    /// Whether the closed range `[start, end]` covers the whole marker.
    pub fn included_in(&self, start: i64, end: i64) -> bool {
        start <= self.start && self.end <= end
    }

    /// Number of bases shared with `[start, end]`.
    pub fn intersect_size(&self, start: i64, end: i64) -> i64 {
        (self.end.min(end) - self.start.max(start) + 1).max(0)
    }
}
