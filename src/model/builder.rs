//! Construction of a [`Genome`] from a prepared gene model.
//!
//! Parsers for GTF/GFF3/GenBank live outside this crate; they hand over a
//! [`GenomeSpec`] (directly or as JSON) and the builder derives everything
//! else: exon and intron ranks, UTR and CDS pieces, and splice site markers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::genome::{Chromosome, GeneInfo, Genome, SequencedExons, TranscriptInfo};
use super::{Marker, MarkerId, MarkerKind, Strand};
use crate::config::SpliceConfig;
use crate::error::FerroError;
use crate::sequence::{reverse_complement, validate_allele};

/// Complete description of a genome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeSpec {
    #[serde(default)]
    pub name: String,
    pub chromosomes: Vec<ChromosomeSpec>,
    #[serde(default)]
    pub genes: Vec<GeneSpec>,
    #[serde(default)]
    pub custom: Vec<CustomSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeSpec {
    pub name: String,
    pub length: i64,
    #[serde(default)]
    pub circular: bool,
    #[serde(default)]
    pub sequence: Option<String>,
}

impl ChromosomeSpec {
    pub fn new(name: &str, length: i64) -> Self {
        Self {
            name: name.to_string(),
            length,
            circular: false,
            sequence: None,
        }
    }

    /// Chromosome whose length is taken from its sequence.
    pub fn with_sequence(name: &str, sequence: &str) -> Self {
        Self {
            name: name.to_string(),
            length: sequence.len() as i64,
            circular: false,
            sequence: Some(sequence.to_string()),
        }
    }

    pub fn circular(mut self) -> Self {
        self.circular = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneSpec {
    pub id: String,
    pub name: String,
    pub chromosome: String,
    #[serde(default)]
    pub strand: Strand,
    #[serde(default)]
    pub biotype: Option<String>,
    pub transcripts: Vec<TranscriptSpec>,
}

impl GeneSpec {
    pub fn new(id: &str, name: &str, chromosome: &str, strand: Strand) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chromosome: chromosome.to_string(),
            strand,
            biotype: None,
            transcripts: Vec::new(),
        }
    }

    pub fn with_transcript(mut self, transcript: TranscriptSpec) -> Self {
        self.transcripts.push(transcript);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSpec {
    pub id: String,
    /// Lowest genomic coordinate of the CDS (inclusive)
    #[serde(default)]
    pub coding_start: Option<i64>,
    /// Highest genomic coordinate of the CDS (inclusive)
    #[serde(default)]
    pub coding_end: Option<i64>,
    pub exons: Vec<ExonSpec>,
    #[serde(default)]
    pub codon_table: Option<String>,
    #[serde(default)]
    pub rare_amino_acid_codons: Vec<usize>,
}

impl TranscriptSpec {
    /// Protein-coding transcript with CDS `[coding_start, coding_end]`.
    pub fn coding(id: &str, coding_start: i64, coding_end: i64, exons: &[(i64, i64)]) -> Self {
        Self {
            id: id.to_string(),
            coding_start: Some(coding_start),
            coding_end: Some(coding_end),
            exons: exons.iter().map(|&(s, e)| ExonSpec::new(s, e)).collect(),
            codon_table: None,
            rare_amino_acid_codons: Vec::new(),
        }
    }

    pub fn non_coding(id: &str, exons: &[(i64, i64)]) -> Self {
        Self {
            id: id.to_string(),
            coding_start: None,
            coding_end: None,
            exons: exons.iter().map(|&(s, e)| ExonSpec::new(s, e)).collect(),
            codon_table: None,
            rare_amino_acid_codons: Vec::new(),
        }
    }

    pub fn with_codon_table(mut self, table: &str) -> Self {
        self.codon_table = Some(table.to_string());
        self
    }

    pub fn with_rare_amino_acid_codon(mut self, codon: usize) -> Self {
        self.rare_amino_acid_codons.push(codon);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExonSpec {
    pub start: i64,
    pub end: i64,
    /// Sequence in transcript orientation; sliced from the chromosome when absent
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub frame: Option<u8>,
}

impl ExonSpec {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            sequence: None,
            frame: None,
        }
    }
}

/// A user-defined interval reported as a `CUSTOM` effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSpec {
    pub chromosome: String,
    pub start: i64,
    pub end: i64,
    pub name: String,
}

/// Builds an immutable [`Genome`].
#[derive(Debug, Clone, Default)]
pub struct GenomeBuilder {
    spec: GenomeSpec,
    splice: SpliceConfig,
}

impl GenomeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            spec: GenomeSpec {
                name: name.to_string(),
                ..Default::default()
            },
            splice: SpliceConfig::default(),
        }
    }

    pub fn from_spec(spec: GenomeSpec) -> Self {
        Self {
            spec,
            splice: SpliceConfig::default(),
        }
    }

    /// Splice windows used to materialize splice site markers.
    pub fn with_splice_config(mut self, splice: SpliceConfig) -> Self {
        self.splice = splice;
        self
    }

    pub fn chromosome(mut self, chromosome: ChromosomeSpec) -> Self {
        self.spec.chromosomes.push(chromosome);
        self
    }

    pub fn gene(mut self, gene: GeneSpec) -> Self {
        self.spec.genes.push(gene);
        self
    }

    pub fn custom(mut self, custom: CustomSpec) -> Self {
        self.spec.custom.push(custom);
        self
    }

    /// Validate the model and derive all child markers.
    pub fn build(self) -> Result<Genome, FerroError> {
        let GenomeBuilder { spec, splice } = self;
        let mut arena = Arena::default();
        let mut chromosomes: HashMap<String, Chromosome> = HashMap::new();
        let mut chromosome_order = Vec::new();

        for c in spec.chromosomes {
            if c.length <= 0 {
                return Err(FerroError::model(format!(
                    "chromosome '{}' has length {}",
                    c.name, c.length
                )));
            }
            if chromosomes.contains_key(&c.name) {
                return Err(FerroError::model(format!(
                    "duplicate chromosome '{}'",
                    c.name
                )));
            }
            let sequence = match c.sequence {
                Some(seq) => {
                    if seq.len() as i64 != c.length {
                        return Err(FerroError::model(format!(
                            "chromosome '{}' sequence has {} bases, expected {}",
                            c.name,
                            seq.len(),
                            c.length
                        )));
                    }
                    validate_allele(&seq)?;
                    Some(seq.to_ascii_uppercase())
                }
                None => None,
            };
            let marker = arena.push(
                MarkerKind::Chromosome,
                &c.name,
                (0, c.length - 1),
                Strand::Plus,
                &c.name,
                None,
                0,
            );
            chromosome_order.push(c.name.clone());
            chromosomes.insert(
                c.name.clone(),
                Chromosome {
                    name: c.name,
                    length: c.length,
                    circular: c.circular,
                    sequence,
                    marker,
                },
            );
        }

        let mut genes = HashMap::new();
        let mut transcripts = HashMap::new();
        let mut transcript_names = HashMap::new();

        for g in spec.genes {
            let chrom = chromosomes.get(&g.chromosome).ok_or_else(|| FerroError::ChromosomeNotFound {
                chromosome: g.chromosome.clone(),
            })?;
            if g.transcripts.is_empty() {
                return Err(FerroError::model(format!("gene '{}' has no transcripts", g.id)));
            }
            let prepared = g
                .transcripts
                .iter()
                .map(|t| prepare_transcript(t, chrom))
                .collect::<Result<Vec<_>, _>>()?;
            let start = prepared.iter().map(|t| t.exons[0].start).min().unwrap_or(0);
            let end = prepared
                .iter()
                .filter_map(|t| t.exons.last().map(|e| e.end))
                .max()
                .unwrap_or(start);
            let gene = arena.push(
                MarkerKind::Gene,
                &chrom.name,
                (start, end),
                g.strand,
                &g.name,
                Some(chrom.marker),
                0,
            );

            let mut gene_transcripts = Vec::with_capacity(prepared.len());
            for t in prepared {
                if transcript_names.contains_key(&t.id) {
                    return Err(FerroError::model(format!("duplicate transcript '{}'", t.id)));
                }
                let (id, info) = add_transcript(&mut arena, &splice, chrom, gene, g.strand, t.clone())?;
                transcript_names.insert(t.id, id);
                transcripts.insert(id, info);
                gene_transcripts.push(id);
            }
            genes.insert(
                gene,
                GeneInfo {
                    gene_id: g.id,
                    biotype: g.biotype,
                    transcripts: gene_transcripts,
                },
            );
        }

        for c in spec.custom {
            let chrom = chromosomes.get(&c.chromosome).ok_or_else(|| FerroError::ChromosomeNotFound {
                chromosome: c.chromosome.clone(),
            })?;
            if c.start > c.end {
                return Err(FerroError::InvalidCoordinates {
                    msg: format!("custom interval '{}' ends before it starts", c.name),
                });
            }
            arena.push(
                MarkerKind::Custom,
                &chrom.name,
                (c.start, c.end),
                Strand::Plus,
                &c.name,
                Some(chrom.marker),
                0,
            );
        }

        tracing::info!(
            "Built genome '{}': {} chromosomes, {} genes, {} transcripts, {} markers",
            spec.name,
            chromosomes.len(),
            genes.len(),
            transcripts.len(),
            arena.markers.len()
        );

        let sequenced_exons = SequencedExons::build(&arena.markers);
        Ok(Genome {
            name: spec.name,
            markers: arena.markers,
            chromosomes,
            chromosome_order,
            genes,
            transcripts,
            transcript_names,
            sequenced_exons,
            splice,
        })
    }
}

#[derive(Default)]
struct Arena {
    markers: Vec<Marker>,
}

impl Arena {
    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind: MarkerKind,
        chromosome: &str,
        (start, end): (i64, i64),
        strand: Strand,
        name: &str,
        parent: Option<MarkerId>,
        rank: u32,
    ) -> MarkerId {
        let id = MarkerId(self.markers.len() as u32);
        self.markers.push(Marker {
            id,
            kind,
            chromosome: chromosome.to_string(),
            start,
            end,
            strand,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            rank,
            sequence: None,
        });
        if let Some(p) = parent {
            self.markers[p.index()].children.push(id);
        }
        id
    }
}

/// Transcript with sorted, validated and circular-corrected exons.
#[derive(Debug, Clone)]
struct PreparedTranscript {
    id: String,
    exons: Vec<ExonSpec>,
    coding: Option<(i64, i64)>,
    codon_table: Option<String>,
    rare_amino_acid_codons: Vec<usize>,
}

fn prepare_transcript(t: &TranscriptSpec, chrom: &Chromosome) -> Result<PreparedTranscript, FerroError> {
    if t.exons.is_empty() {
        return Err(FerroError::model(format!("transcript '{}' has no exons", t.id)));
    }
    let mut exons = t.exons.clone();
    exons.sort_by_key(|e| e.start);
    for e in &exons {
        if e.start > e.end {
            return Err(FerroError::InvalidCoordinates {
                msg: format!("exon {}-{} of '{}' ends before it starts", e.start, e.end, t.id),
            });
        }
    }
    for w in exons.windows(2) {
        if w[1].start <= w[0].end {
            return Err(FerroError::model(format!(
                "overlapping exons in transcript '{}' at {}",
                t.id, w[1].start
            )));
        }
    }

    let first = exons[0].start;
    let last = exons[exons.len() - 1].end;
    let mut shift = 0;
    if chrom.circular {
        // Features annotated past the end of a circular chromosome are moved
        // to negative coordinates so they read continuously across the origin.
        if last >= chrom.length {
            shift = -chrom.length;
        }
        if first + shift < -chrom.length || last + shift >= chrom.length {
            return Err(FerroError::model(format!(
                "transcript '{}' does not fit on circular chromosome '{}'",
                t.id, chrom.name
            )));
        }
        if shift != 0 {
            tracing::debug!("Shifted circular transcript '{}' by {}", t.id, shift);
        }
    } else if first < 0 || last >= chrom.length {
        return Err(FerroError::model(format!(
            "transcript '{}' ({}-{}) lies outside chromosome '{}' (length {})",
            t.id, first, last, chrom.name, chrom.length
        )));
    }
    for e in exons.iter_mut() {
        e.start += shift;
        e.end += shift;
    }

    let coding = match (t.coding_start, t.coding_end) {
        (Some(a), Some(b)) => {
            let (a, b) = (a + shift, b + shift);
            if a > b {
                return Err(FerroError::InvalidCoordinates {
                    msg: format!("CDS of '{}' ends before it starts", t.id),
                });
            }
            let in_exon = |p: i64| exons.iter().any(|e| e.start <= p && p <= e.end);
            if !in_exon(a) || !in_exon(b) {
                return Err(FerroError::model(format!(
                    "CDS bounds of '{}' are not exonic",
                    t.id
                )));
            }
            Some((a, b))
        }
        (None, None) => None,
        _ => {
            return Err(FerroError::model(format!(
                "transcript '{}' needs both coding_start and coding_end",
                t.id
            )))
        }
    };

    Ok(PreparedTranscript {
        id: t.id.clone(),
        exons,
        coding,
        codon_table: t.codon_table.clone(),
        rare_amino_acid_codons: t.rare_amino_acid_codons.clone(),
    })
}

fn add_transcript(
    arena: &mut Arena,
    splice: &SpliceConfig,
    chrom: &Chromosome,
    gene: MarkerId,
    strand: Strand,
    t: PreparedTranscript,
) -> Result<(MarkerId, TranscriptInfo), FerroError> {
    let n = t.exons.len();
    let plus = strand.is_plus();
    let span = (t.exons[0].start, t.exons[n - 1].end);
    let tid = arena.push(MarkerKind::Transcript, &chrom.name, span, strand, &t.id, Some(gene), 0);

    let mut exon_ids = Vec::with_capacity(n);
    for (i, e) in t.exons.iter().enumerate() {
        let rank = (if plus { i + 1 } else { n - i }) as u32;
        let id = arena.push(
            MarkerKind::Exon,
            &chrom.name,
            (e.start, e.end),
            strand,
            &format!("{}.exon{}", t.id, rank),
            Some(tid),
            rank,
        );
        let sequence = match &e.sequence {
            Some(seq) => {
                if seq.len() as i64 != e.end - e.start + 1 {
                    return Err(FerroError::model(format!(
                        "exon {} of '{}' has {} bases of sequence for {} positions",
                        rank,
                        t.id,
                        seq.len(),
                        e.end - e.start + 1
                    )));
                }
                validate_allele(seq)?;
                Some(seq.to_ascii_uppercase())
            }
            None => chrom.slice(e.start, e.end).map(|s| {
                if plus {
                    s
                } else {
                    reverse_complement(&s)
                }
            }),
        };
        arena.markers[id.index()].sequence = sequence;
        exon_ids.push(id);
    }

    let mut intron_ids = Vec::new();
    for i in 0..n.saturating_sub(1) {
        let (left, right) = (&t.exons[i], &t.exons[i + 1]);
        if right.start - left.end <= 1 {
            continue;
        }
        let rank = (if plus { i + 1 } else { n - 1 - i }) as u32;
        let (is, ie) = (left.end + 1, right.start - 1);
        let intron = arena.push(
            MarkerKind::Intron,
            &chrom.name,
            (is, ie),
            strand,
            &format!("{}.intron{}", t.id, rank),
            Some(tid),
            rank,
        );
        add_splice_sites(arena, splice, intron, (left.start, left.end), (right.start, right.end));
        intron_ids.push(intron);
    }

    let mut utrs = Vec::new();
    let mut cds = Vec::new();
    if let Some((cs, ce)) = t.coding {
        for (i, e) in t.exons.iter().enumerate() {
            let rank = arena.markers[exon_ids[i].index()].rank;
            let (lo, hi) = (e.start.max(cs), e.end.min(ce));
            if lo <= hi {
                cds.push(arena.push(MarkerKind::Cds, &chrom.name, (lo, hi), strand, &t.id, Some(tid), rank));
            }
            let (left_kind, right_kind) = if plus {
                (MarkerKind::Utr5, MarkerKind::Utr3)
            } else {
                (MarkerKind::Utr3, MarkerKind::Utr5)
            };
            let left_end = e.end.min(cs - 1);
            if e.start <= left_end {
                utrs.push(arena.push(left_kind, &chrom.name, (e.start, left_end), strand, &t.id, Some(tid), rank));
            }
            let right_start = e.start.max(ce + 1);
            if right_start <= e.end {
                utrs.push(arena.push(right_kind, &chrom.name, (right_start, e.end), strand, &t.id, Some(tid), rank));
            }
        }
    }

    let mut frames: Vec<Option<u8>> = t.exons.iter().map(|e| e.frame).collect();
    if !plus {
        exon_ids.reverse();
        intron_ids.reverse();
        frames.reverse();
    }

    Ok((
        tid,
        TranscriptInfo {
            coding: t.coding,
            codon_table: t.codon_table,
            rare_amino_acid_codons: t.rare_amino_acid_codons,
            exons: exon_ids,
            introns: intron_ids,
            utrs,
            cds,
            frames,
        },
    ))
}

/// Donor/acceptor core sites and splice regions for one intron.
fn add_splice_sites(
    arena: &mut Arena,
    splice: &SpliceConfig,
    intron: MarkerId,
    left_exon: (i64, i64),
    right_exon: (i64, i64),
) {
    let m = arena.markers[intron.index()].clone();
    let (is, ie, rank, strand) = (m.start, m.end, m.rank, m.strand);
    let len = ie - is + 1;

    let size = splice.site_size.min(len);
    if size > 0 {
        let low = (is, is + size - 1);
        let high = (ie - size + 1, ie);
        let (donor, acceptor) = if strand.is_plus() { (low, high) } else { (high, low) };
        arena.push(MarkerKind::SpliceSiteDonor, &m.chromosome, donor, strand, &m.name, Some(intron), rank);
        arena.push(MarkerKind::SpliceSiteAcceptor, &m.chromosome, acceptor, strand, &m.name, Some(intron), rank);
    }

    let (rmin, rmax) = (splice.region_intron_min, splice.region_intron_max);
    let intronic = [
        (is + rmin - 1, (is + rmax - 1).min(ie)),
        ((ie - rmax + 1).max(is), ie - rmin + 1),
    ];
    for (lo, hi) in intronic {
        if lo <= hi && lo >= is && hi <= ie {
            arena.push(MarkerKind::SpliceRegion, &m.chromosome, (lo, hi), strand, &m.name, Some(intron), rank);
        }
    }

    let e = splice.region_exon_size;
    if e > 0 {
        let exonic = [
            ((left_exon.1 - e + 1).max(left_exon.0), left_exon.1),
            (right_exon.0, (right_exon.0 + e - 1).min(right_exon.1)),
        ];
        for (lo, hi) in exonic {
            arena.push(MarkerKind::SpliceRegion, &m.chromosome, (lo, hi), strand, &m.name, Some(intron), rank);
        }
    }
}
