use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::transcript::Transcript;
use super::{Marker, MarkerId, MarkerKind};
use crate::config::SpliceConfig;
use crate::error::FerroError;
use crate::sequence::reverse_complement;

/// A chromosome and its sequence, if loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub name: String,
    /// Number of bases
    pub length: i64,
    pub circular: bool,
    /// Plus-strand sequence
    pub sequence: Option<String>,
    pub marker: MarkerId,
}

impl Chromosome {
    /// Wrap a coordinate into `[0, length)`.
    pub fn normalize(&self, pos: i64) -> i64 {
        pos.rem_euclid(self.length)
    }

    /// Plus-strand bases `[start, end]`. Circular chromosomes wrap around
    /// the origin; linear ones return `None` outside `[0, length)`.
    pub fn slice(&self, start: i64, end: i64) -> Option<String> {
        let seq = self.sequence.as_ref()?.as_bytes();
        if end < start {
            return Some(String::new());
        }
        if self.circular {
            if end - start + 1 > self.length {
                return None;
            }
            Some(
                (start..=end)
                    .map(|p| seq[self.normalize(p) as usize] as char)
                    .collect(),
            )
        } else {
            if start < 0 || end >= self.length {
                return None;
            }
            Some(String::from_utf8_lossy(&seq[start as usize..=end as usize]).into_owned())
        }
    }
}

/// Gene attributes not carried by the marker itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneInfo {
    pub gene_id: String,
    pub biotype: Option<String>,
    pub transcripts: Vec<MarkerId>,
}

/// Transcript attributes and child lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptInfo {
    /// Lowest and highest coding base, when the transcript is coding
    pub coding: Option<(i64, i64)>,
    pub codon_table: Option<String>,
    /// 0-based codon numbers translated as rare amino acids
    pub rare_amino_acid_codons: Vec<usize>,
    /// Exons in rank order
    pub exons: Vec<MarkerId>,
    /// Introns in rank order
    pub introns: Vec<MarkerId>,
    pub utrs: Vec<MarkerId>,
    pub cds: Vec<MarkerId>,
    /// Per-exon frames as supplied, in rank order
    pub frames: Vec<Option<u8>>,
}

/// Exons carrying their own sequence on one chromosome, sorted by start.
#[derive(Debug, Clone, Default)]
pub(super) struct SequencedExons {
    pub(super) ids: Vec<MarkerId>,
    /// Length of the longest exon; bounds the backwards scan of a lookup
    pub(super) max_len: i64,
}

impl SequencedExons {
    pub(super) fn build(markers: &[Marker]) -> HashMap<String, SequencedExons> {
        let mut out: HashMap<String, SequencedExons> = HashMap::new();
        for m in markers.iter().filter(|m| m.kind == MarkerKind::Exon && m.sequence.is_some()) {
            let entry = out.entry(m.chromosome.clone()).or_default();
            entry.ids.push(m.id);
            entry.max_len = entry.max_len.max(m.end - m.start + 1);
        }
        for exons in out.values_mut() {
            exons.ids.sort_by_key(|id| markers[id.index()].start);
        }
        out
    }
}

/// Immutable genome model built by [`GenomeBuilder`](super::GenomeBuilder).
#[derive(Debug, Clone)]
pub struct Genome {
    pub(super) name: String,
    pub(super) markers: Vec<Marker>,
    pub(super) chromosomes: HashMap<String, Chromosome>,
    pub(super) chromosome_order: Vec<String>,
    pub(super) genes: HashMap<MarkerId, GeneInfo>,
    pub(super) transcripts: HashMap<MarkerId, TranscriptInfo>,
    pub(super) transcript_names: HashMap<String, MarkerId>,
    pub(super) sequenced_exons: HashMap<String, SequencedExons>,
    pub(super) splice: SpliceConfig,
}

impl Genome {
    /// Load a genome from its JSON description with default splice windows.
    pub fn from_json(json: &str) -> Result<Self, FerroError> {
        Self::from_json_with(json, &SpliceConfig::default())
    }

    /// Load a genome from its JSON description.
    pub fn from_json_with(json: &str, splice: &SpliceConfig) -> Result<Self, FerroError> {
        let spec = serde_json::from_str(json)?;
        super::GenomeBuilder::from_spec(spec)
            .with_splice_config(splice.clone())
            .build()
    }

    /// Load a genome from a JSON file.
    pub fn from_json_file(path: &std::path::Path, splice: &SpliceConfig) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_with(&content, splice)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Splice windows the splice markers were built with.
    pub fn splice_config(&self) -> &SpliceConfig {
        &self.splice
    }

    /// Marker by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this genome.
    pub fn marker(&self, id: MarkerId) -> &Marker {
        &self.markers[id.index()]
    }

    /// Marker by id, or `None` for foreign ids.
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.index())
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn chromosome(&self, name: &str) -> Option<&Chromosome> {
        self.chromosomes.get(name)
    }

    /// Chromosomes in insertion order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &Chromosome> {
        self.chromosome_order
            .iter()
            .filter_map(|name| self.chromosomes.get(name))
    }

    /// Walk up the parent chain to the nearest marker of `kind`.
    ///
    /// Returns `id` itself when it already has the requested kind.
    pub fn ancestor(&self, id: MarkerId, kind: MarkerKind) -> Option<MarkerId> {
        let mut current = Some(id);
        // The hierarchy is at most chromosome > gene > transcript > intron > site
        for _ in 0..8 {
            let m = self.get(current?)?;
            if m.kind == kind {
                return Some(m.id);
            }
            current = m.parent;
        }
        None
    }

    pub fn gene_info(&self, gene: MarkerId) -> Option<&GeneInfo> {
        self.genes.get(&gene)
    }

    /// Gene markers, in build order.
    pub fn genes(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.kind == MarkerKind::Gene)
    }

    /// Transcript view for a transcript marker.
    pub fn transcript(&self, id: MarkerId) -> Option<Transcript<'_>> {
        let info = self.transcripts.get(&id)?;
        Some(Transcript::new(self, self.marker(id), info))
    }

    /// Transcript view by transcript id (e.g. `NM_000088.3`).
    pub fn transcript_by_name(&self, name: &str) -> Option<Transcript<'_>> {
        self.transcript(*self.transcript_names.get(name)?)
    }

    /// All transcripts, in build order.
    pub fn transcripts(&self) -> impl Iterator<Item = Transcript<'_>> {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::Transcript)
            .filter_map(|m| self.transcript(m.id))
    }

    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }

    /// Plus-strand genomic sequence `[start, end]` on `chromosome`.
    ///
    /// Falls back to exon sequences when no chromosome sequence was loaded
    /// and a single exon covers the range.
    pub fn genomic_sequence(&self, chromosome: &str, start: i64, end: i64) -> Option<String> {
        let chrom = self.chromosome(chromosome)?;
        if chrom.sequence.is_some() {
            return chrom.slice(start, end);
        }
        let exons = self.sequenced_exons.get(chromosome)?;
        // Only exons starting in [end - max_len + 1, start] can cover the range
        let upto = exons.ids.partition_point(|id| self.marker(*id).start <= start);
        exons.ids[..upto]
            .iter()
            .rev()
            .map(|id| self.marker(*id))
            .take_while(|m| m.start > end - exons.max_len)
            .filter(|m| end <= m.end)
            .find_map(|m| {
                let seq = m.sequence.as_ref()?;
                let plus = if m.strand.is_plus() {
                    seq.clone()
                } else {
                    reverse_complement(seq)
                };
                let from = (start - m.start) as usize;
                let to = (end - m.start) as usize;
                plus.get(from..=to).map(str::to_string)
            })
    }
}
