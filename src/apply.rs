//! Applying a variant to a marker.
//!
//! [`apply`] never mutates its inputs: it returns a new [`MutatedMarker`]
//! with updated coordinates and, when the marker carries a sequence, the
//! mutated sequence in the marker's own orientation.

use crate::model::{Marker, MarkerId, Strand, Variant, VariantType};
use crate::sequence::reverse_complement;

/// A marker after a variant has been applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutatedMarker {
    pub id: MarkerId,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    /// Sequence in the marker's orientation; `None` if the marker had none
    pub sequence: Option<String>,
}

impl MutatedMarker {
    fn from_marker(marker: &Marker) -> Self {
        Self {
            id: marker.id,
            start: marker.start,
            end: marker.end,
            strand: marker.strand,
            sequence: marker.sequence.clone(),
        }
    }

    fn shifted(mut self, by: i64) -> Self {
        self.start += by;
        self.end += by;
        self
    }
}

/// Replace the bytes `[from, to)` of `seq` with `insert`.
pub fn splice(seq: &str, from: usize, to: usize, insert: &str) -> String {
    let mut out = String::with_capacity(seq.len() + insert.len());
    out.push_str(&seq[..from]);
    out.push_str(insert);
    out.push_str(&seq[to..]);
    out
}

/// Apply `variant` to `marker`.
///
/// * A variant after the marker leaves it unchanged.
/// * A variant before the marker shifts its coordinates by the variant's
///   length change; the sequence is untouched.
/// * An overlapping variant edits the sequence. Returns `None` when a
///   deletion removes every base of the marker.
pub fn apply(marker: &Marker, variant: &Variant) -> Option<MutatedMarker> {
    let unchanged = MutatedMarker::from_marker(marker);
    if variant.chromosome != marker.chromosome || variant.variant_type == VariantType::Bnd {
        return Some(unchanged);
    }
    if variant.start > marker.end {
        return Some(unchanged);
    }
    if variant.end < marker.start {
        return Some(unchanged.shifted(variant.net_change()));
    }

    // Overlapping portion of the reference span
    let a = variant.start.max(marker.start);
    let b = variant.end.min(marker.end);
    let removes_all = matches!(variant.variant_type, VariantType::Del | VariantType::Mixed)
        && variant.alt_allele.is_empty();
    if removes_all && variant.includes(marker.start, marker.end) {
        return None;
    }

    let plus_seq = marker.sequence.as_ref().map(|s| {
        if marker.strand.is_plus() {
            s.clone()
        } else {
            reverse_complement(s)
        }
    });
    let from = (a - marker.start) as usize;
    let to = (b - marker.start + 1) as usize;

    let (edited, growth) = match variant.variant_type {
        VariantType::Snp | VariantType::Mnp => {
            let alt = &variant.alt_allele[(a - variant.start) as usize..=(b - variant.start) as usize];
            (plus_seq.map(|s| splice(&s, from, to, alt)), 0)
        }
        VariantType::Ins => {
            let len = variant.alt_allele.len() as i64;
            (plus_seq.map(|s| splice(&s, from, from, &variant.alt_allele)), len)
        }
        VariantType::Del => (plus_seq.map(|s| splice(&s, from, to, "")), -(b - a + 1)),
        VariantType::Mixed => {
            // The alternative replaces the overlap when the variant starts inside
            let alt = if variant.start >= marker.start {
                variant.alt_allele.as_str()
            } else {
                ""
            };
            let growth = alt.len() as i64 - (b - a + 1);
            (plus_seq.map(|s| splice(&s, from, to, alt)), growth)
        }
        VariantType::Dup => {
            let edited = plus_seq.map(|s| {
                let copy = s[from..to].to_string();
                splice(&s, to, to, &copy)
            });
            (edited, b - a + 1)
        }
        VariantType::Inv => {
            let edited = plus_seq.map(|s| {
                let inverted = reverse_complement(&s[from..to]);
                splice(&s, from, to, &inverted)
            });
            (edited, 0)
        }
        VariantType::Bnd => (plus_seq, 0),
    };

    // Bases removed in front of the marker move it left; a MIXED
    // replacement starting there leaves its alternative in front of it
    let shift = match variant.variant_type {
        VariantType::Del if variant.start < marker.start => variant.start - marker.start,
        VariantType::Mixed if variant.start < marker.start => {
            variant.start - marker.start + variant.alt_allele.len() as i64
        }
        _ => 0,
    };
    let mut out = unchanged.shifted(shift);
    out.end += growth;
    out.sequence = edited.map(|s| {
        if marker.strand.is_plus() {
            s
        } else {
            reverse_complement(&s)
        }
    });
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkerKind;

    fn exon(strand: Strand, seq: &str) -> Marker {
        Marker {
            id: MarkerId(7),
            kind: MarkerKind::Exon,
            chromosome: "1".to_string(),
            start: 100,
            end: 100 + seq.len() as i64 - 1,
            strand,
            name: "e".to_string(),
            parent: None,
            children: Vec::new(),
            rank: 1,
            sequence: Some(seq.to_string()),
        }
    }

    #[test]
    fn test_splice_helper() {
        assert_eq!(splice("ACGT", 1, 3, "TT"), "ATTT");
        assert_eq!(splice("ACGT", 2, 2, "NN"), "ACNNGT");
        assert_eq!(splice("ACGT", 0, 4, ""), "");
    }

    #[test]
    fn test_snp_plus_and_minus() {
        let v = Variant::new("1", 101, "C", "T").unwrap();
        let m = apply(&exon(Strand::Plus, "ACGTACGT"), &v).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("ATGTACGT"));
        assert_eq!((m.start, m.end), (100, 107));

        // Minus-strand exon stores the reverse complement of ACGTACGT
        let m = apply(&exon(Strand::Minus, "ACGTACGT"), &v).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("ACGTACAT"));
    }

    #[test]
    fn test_insertion_and_deletion() {
        let ins = Variant::new("1", 102, "", "GGG").unwrap();
        let m = apply(&exon(Strand::Plus, "ACGTACGT"), &ins).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("ACGGGGTACGT"));
        assert_eq!(m.end, 110);

        let del = Variant::new("1", 102, "GT", "").unwrap();
        let m = apply(&exon(Strand::Plus, "ACGTACGT"), &del).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("ACACGT"));
        assert_eq!(m.end, 105);
    }

    #[test]
    fn test_partial_overlap_deletion() {
        // Deletes 98..101, of which 100..101 are exonic
        let del = Variant::new("1", 98, "AAAC", "").unwrap();
        let m = apply(&exon(Strand::Plus, "ACGTACGT"), &del).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("GTACGT"));
        assert_eq!((m.start, m.end), (98, 103));
    }

    #[test]
    fn test_full_deletion_removes_marker() {
        let del = Variant::new("1", 99, "AACGTACGTA", "").unwrap();
        assert!(apply(&exon(Strand::Plus, "ACGTACGT"), &del).is_none());
        let sv = Variant::structural("1", 50, 500, VariantType::Del).unwrap();
        assert!(apply(&exon(Strand::Plus, "ACGTACGT"), &sv).is_none());
    }

    #[test]
    fn test_variant_before_marker_shifts() {
        let ins = Variant::new("1", 10, "", "AA").unwrap();
        let m = apply(&exon(Strand::Plus, "ACGT"), &ins).unwrap();
        assert_eq!((m.start, m.end), (102, 105));
        assert_eq!(m.sequence.as_deref(), Some("ACGT"));
    }

    #[test]
    fn test_variant_after_marker_is_identity() {
        let e = exon(Strand::Minus, "ACGT");
        let v = Variant::new("1", 500, "A", "").unwrap();
        let m = apply(&e, &v).unwrap();
        assert_eq!(m.sequence, e.sequence);
        assert_eq!((m.start, m.end), (e.start, e.end));
    }

    #[test]
    fn test_inversion_and_duplication() {
        let inv = Variant::structural("1", 100, 101, VariantType::Inv).unwrap();
        let m = apply(&exon(Strand::Plus, "ACGT"), &inv).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("GTGT"));

        let dup = Variant::structural("1", 100, 101, VariantType::Dup).unwrap();
        let m = apply(&exon(Strand::Plus, "ACGT"), &dup).unwrap();
        assert_eq!(m.sequence.as_deref(), Some("ACACGT"));
        assert_eq!(m.end, 105);
    }
}
