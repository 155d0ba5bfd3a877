//! Read-only view of a transcript and its coordinate mappings.

use std::fmt;

use super::genome::{Genome, TranscriptInfo};
use super::{Marker, MarkerId, Strand};
use crate::codon::CodonTable;
use crate::error::ErrorWarning;

/// Derived sequences of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSequences {
    /// Concatenated exon sequences in transcript orientation
    pub mrna: String,
    /// Coding part of `mrna`; empty for non-coding transcripts
    pub cds: String,
    /// One-letter translation of `cds`
    pub protein: String,
    /// Sanity-check findings, attached to every effect on the transcript
    pub warnings: Vec<ErrorWarning>,
}

/// A transcript marker together with its exon/intron/CDS structure.
///
/// Positions passed to the mapping functions are genomic (0-based) and
/// results are 0-based indices along the mRNA or CDS in transcription order.
#[derive(Clone, Copy)]
pub struct Transcript<'g> {
    genome: &'g Genome,
    marker: &'g Marker,
    info: &'g TranscriptInfo,
}

impl fmt::Debug for Transcript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("id", &self.marker.name)
            .field("start", &self.marker.start)
            .field("end", &self.marker.end)
            .field("strand", &self.marker.strand)
            .field("coding", &self.info.coding)
            .finish()
    }
}

impl<'g> Transcript<'g> {
    pub(super) fn new(genome: &'g Genome, marker: &'g Marker, info: &'g TranscriptInfo) -> Self {
        Self { genome, marker, info }
    }

    pub fn id(&self) -> MarkerId {
        self.marker.id
    }

    /// Transcript identifier, e.g. `NM_000088.3`.
    pub fn name(&self) -> &'g str {
        &self.marker.name
    }

    pub fn marker(&self) -> &'g Marker {
        self.marker
    }

    pub fn info(&self) -> &'g TranscriptInfo {
        self.info
    }

    pub fn strand(&self) -> Strand {
        self.marker.strand
    }

    pub fn chromosome(&self) -> &'g str {
        &self.marker.chromosome
    }

    pub fn start(&self) -> i64 {
        self.marker.start
    }

    pub fn end(&self) -> i64 {
        self.marker.end
    }

    /// The gene marker owning this transcript.
    pub fn gene(&self) -> Option<&'g Marker> {
        self.genome.get(self.marker.parent?)
    }

    pub fn is_protein_coding(&self) -> bool {
        self.info.coding.is_some()
    }

    /// Lowest and highest coding base.
    pub fn coding_range(&self) -> Option<(i64, i64)> {
        self.info.coding
    }

    /// Genomic position of c.1 (the first base of the start codon).
    pub fn cds_start(&self) -> Option<i64> {
        let (lo, hi) = self.info.coding?;
        Some(if self.strand().is_plus() { lo } else { hi })
    }

    /// Genomic position of the last CDS base.
    pub fn cds_end(&self) -> Option<i64> {
        let (lo, hi) = self.info.coding?;
        Some(if self.strand().is_plus() { hi } else { lo })
    }

    pub fn codon_table_name(&self) -> Option<&'g str> {
        self.info.codon_table.as_deref()
    }

    pub fn rare_amino_acid_codons(&self) -> &'g [usize] {
        &self.info.rare_amino_acid_codons
    }

    /// Exons in rank order.
    pub fn exons(&self) -> impl Iterator<Item = &'g Marker> + 'g {
        let genome = self.genome;
        self.info.exons.iter().map(move |id| genome.marker(*id))
    }

    pub fn exon_count(&self) -> usize {
        self.info.exons.len()
    }

    /// Introns in rank order.
    pub fn introns(&self) -> impl Iterator<Item = &'g Marker> + 'g {
        let genome = self.genome;
        self.info.introns.iter().map(move |id| genome.marker(*id))
    }

    pub fn intron_count(&self) -> usize {
        self.info.introns.len()
    }

    /// UTR pieces (5' and 3') in genomic order.
    pub fn utrs(&self) -> impl Iterator<Item = &'g Marker> + 'g {
        let genome = self.genome;
        self.info.utrs.iter().map(move |id| genome.marker(*id))
    }

    /// CDS pieces in genomic order.
    pub fn cds_pieces(&self) -> impl Iterator<Item = &'g Marker> + 'g {
        let genome = self.genome;
        self.info.cds.iter().map(move |id| genome.marker(*id))
    }

    pub fn exon_at(&self, pos: i64) -> Option<&'g Marker> {
        self.exons().find(|e| e.contains(pos))
    }

    pub fn intron_at(&self, pos: i64) -> Option<&'g Marker> {
        self.introns().find(|i| i.contains(pos))
    }

    /// Exons holding at least one coding base, in rank order.
    pub fn coding_exons(&self) -> impl Iterator<Item = &'g Marker> + 'g {
        let coding = self.info.coding;
        self.exons()
            .filter(move |e| coding.is_some_and(|(lo, hi)| e.intersects(lo, hi)))
    }

    pub fn first_coding_exon(&self) -> Option<&'g Marker> {
        self.coding_exons().next()
    }

    pub fn last_coding_exon(&self) -> Option<&'g Marker> {
        self.coding_exons().last()
    }

    /// Number of mRNA bases.
    pub fn mrna_len(&self) -> i64 {
        self.exons().map(|e| e.len()).sum()
    }

    /// Number of coding bases.
    pub fn cds_len(&self) -> i64 {
        match self.info.coding {
            Some((lo, hi)) => self.exons().map(|e| e.intersect_size(lo, hi)).sum(),
            None => 0,
        }
    }

    /// Number of mRNA bases before c.1.
    pub fn utr5_len(&self) -> i64 {
        self.cds_start()
            .and_then(|p| self.mrna_base_number(p))
            .unwrap_or(0)
    }

    /// Number of mRNA bases after the last CDS base.
    pub fn utr3_len(&self) -> i64 {
        if self.is_protein_coding() {
            self.mrna_len() - self.utr5_len() - self.cds_len()
        } else {
            0
        }
    }

    /// 0-based mRNA index of an exonic genomic position.
    pub fn mrna_base_number(&self, pos: i64) -> Option<i64> {
        let plus = self.strand().is_plus();
        let mut before = 0;
        for e in self.exons() {
            if e.contains(pos) {
                let offset = if plus { pos - e.start } else { e.end - pos };
                return Some(before + offset);
            }
            before += e.len();
        }
        None
    }

    /// Genomic position of an mRNA index.
    pub fn mrna_to_genomic(&self, idx: i64) -> Option<i64> {
        if idx < 0 {
            return None;
        }
        let plus = self.strand().is_plus();
        let mut remaining = idx;
        for e in self.exons() {
            if remaining < e.len() {
                return Some(if plus { e.start + remaining } else { e.end - remaining });
            }
            remaining -= e.len();
        }
        None
    }

    /// 0-based CDS index of a coding genomic position.
    pub fn cds_base_number(&self, pos: i64) -> Option<i64> {
        let (lo, hi) = self.info.coding?;
        if pos < lo || pos > hi {
            return None;
        }
        Some(self.mrna_base_number(pos)? - self.utr5_len())
    }

    /// Genomic position of a CDS index.
    pub fn cds_to_genomic(&self, idx: i64) -> Option<i64> {
        if !self.is_protein_coding() || idx < 0 || idx >= self.cds_len() {
            return None;
        }
        self.mrna_to_genomic(self.utr5_len() + idx)
    }

    /// CDS index of the first coding base of the last coding exon, i.e. the
    /// position of the last exon-exon junction in CDS coordinates.
    pub fn last_junction_cds_index(&self) -> Option<i64> {
        let (lo, hi) = self.info.coding?;
        let exon = self.last_coding_exon()?;
        let first = if self.strand().is_plus() {
            exon.start.max(lo)
        } else {
            exon.end.min(hi)
        };
        self.cds_base_number(first)
    }

    /// Assemble mRNA, CDS and protein from exon sequences.
    ///
    /// Returns `None` when any exon lacks a sequence.
    pub fn compute_sequences(&self, table: &CodonTable) -> Option<TranscriptSequences> {
        let mut mrna = String::with_capacity(self.mrna_len().max(0) as usize);
        for e in self.exons() {
            mrna.push_str(e.sequence.as_deref()?);
        }

        let mut warnings = Vec::new();
        let (cds, protein) = if self.is_protein_coding() {
            let from = self.utr5_len() as usize;
            let to = from + self.cds_len() as usize;
            let cds = mrna.get(from..to)?.to_string();
            let protein = table.translate(&cds);

            let last_codon_is_stop = cds.len() >= 3 && table.is_stop(&cds[cds.len() - 3..]);
            if cds.len() % 3 != 0 || !last_codon_is_stop {
                warnings.push(ErrorWarning::TranscriptIncomplete);
            }
            if !table.is_start(&cds) {
                warnings.push(ErrorWarning::TranscriptNoStartCodon);
            }
            let internal = protein.strip_suffix('*').unwrap_or(&protein);
            if internal.contains('*') {
                warnings.push(ErrorWarning::TranscriptMultipleStopCodons);
            }
            (cds, protein)
        } else {
            (String::new(), String::new())
        };

        if self.info.frames.len() > 1 && self.info.frames.iter().all(|f| *f == Some(0)) {
            warnings.push(ErrorWarning::FramesZero);
        }

        Some(TranscriptSequences {
            mrna,
            cds,
            protein,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChromosomeSpec, ExonSpec, GeneSpec, GenomeBuilder, TranscriptSpec};

    //                 0         1         2         3
    //                 0123456789012345678901234567890123456789
    const SEQ: &str = "GGATGAAACCCGTAAGTTTTTTTTAGGGTTTTAAGGGGGG";

    fn genome(strand: Strand) -> Genome {
        // Exons [2, 13] and [24, 35]; CDS [2, 33] on plus
        GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::with_sequence("1", SEQ))
            .gene(GeneSpec::new("G", "G", "1", strand).with_transcript(
                TranscriptSpec::coding("T", 2, 33, &[(2, 13), (24, 35)]),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_plus_mappings() {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("T").unwrap();
        assert_eq!(t.mrna_len(), 24);
        assert_eq!(t.cds_len(), 22);
        assert_eq!(t.utr5_len(), 0);
        assert_eq!(t.utr3_len(), 2);
        assert_eq!(t.cds_base_number(2), Some(0));
        assert_eq!(t.cds_base_number(13), Some(11));
        assert_eq!(t.cds_base_number(24), Some(12));
        assert_eq!(t.cds_base_number(18), None);
        assert_eq!(t.cds_to_genomic(12), Some(24));
        assert_eq!(t.cds_to_genomic(22), None);
        assert_eq!(t.last_junction_cds_index(), Some(12));
    }

    #[test]
    fn test_minus_mappings() {
        let g = genome(Strand::Minus);
        let t = g.transcript_by_name("T").unwrap();
        assert_eq!(t.cds_start(), Some(33));
        assert_eq!(t.utr5_len(), 2);
        assert_eq!(t.cds_base_number(33), Some(0));
        assert_eq!(t.cds_base_number(24), Some(9));
        assert_eq!(t.cds_base_number(13), Some(10));
        assert_eq!(t.mrna_base_number(35), Some(0));
        assert_eq!(t.cds_to_genomic(10), Some(13));
        assert_eq!(t.exons().next().map(|e| e.rank), Some(1));
        assert_eq!(t.exons().next().map(|e| e.start), Some(24));
    }

    #[test]
    fn test_mapping_round_trip() {
        for strand in [Strand::Plus, Strand::Minus] {
            let g = genome(strand);
            let t = g.transcript_by_name("T").unwrap();
            for idx in 0..t.cds_len() {
                let pos = t.cds_to_genomic(idx).unwrap();
                assert_eq!(t.cds_base_number(pos), Some(idx));
            }
        }
    }

    #[test]
    fn test_compute_sequences() {
        let g = genome(Strand::Plus);
        let t = g.transcript_by_name("T").unwrap();
        let seqs = t.compute_sequences(&CodonTable::standard()).unwrap();
        assert_eq!(seqs.mrna, "ATGAAACCCGTAAGGGTTTTAAGG");
        assert_eq!(seqs.cds, "ATGAAACCCGTAAGGGTTTTAA");
        // 22 bases is not a whole number of codons
        assert!(seqs.warnings.contains(&ErrorWarning::TranscriptIncomplete));
        assert!(!seqs.warnings.contains(&ErrorWarning::TranscriptNoStartCodon));
        assert_eq!(seqs.protein, "MKPVRVLX");
        assert!(!seqs.warnings.contains(&ErrorWarning::TranscriptMultipleStopCodons));
    }

    #[test]
    fn test_frames_zero_warning() {
        let mut tr = TranscriptSpec::non_coding("T", &[(0, 4), (10, 14)]);
        tr.exons = vec![
            ExonSpec { frame: Some(0), ..ExonSpec::new(0, 4) },
            ExonSpec { frame: Some(0), ..ExonSpec::new(10, 14) },
        ];
        let g = GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::with_sequence("1", SEQ))
            .gene(GeneSpec::new("G", "G", "1", Strand::Plus).with_transcript(tr))
            .build()
            .unwrap();
        let t = g.transcript_by_name("T").unwrap();
        let seqs = t.compute_sequences(&CodonTable::standard()).unwrap();
        assert_eq!(seqs.warnings, vec![ErrorWarning::FramesZero]);
        assert!(seqs.cds.is_empty());
    }

    #[test]
    fn test_no_sequence() {
        let g = GenomeBuilder::new("t")
            .chromosome(ChromosomeSpec::new("1", 100))
            .gene(GeneSpec::new("G", "G", "1", Strand::Plus).with_transcript(
                TranscriptSpec::coding("T", 10, 20, &[(10, 20)]),
            ))
            .build()
            .unwrap();
        let t = g.transcript_by_name("T").unwrap();
        assert!(t.compute_sequences(&CodonTable::standard()).is_none());
    }
}
