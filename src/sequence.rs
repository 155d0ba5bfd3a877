//! Nucleotide sequence helpers.

use crate::error::FerroError;

/// Complement of a single base, preserving case. Unknown symbols map to `N`.
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'a' => b't',
        b't' => b'a',
        b'g' => b'c',
        b'c' => b'g',
        b'U' => b'A',
        b'u' => b'a',
        b'N' | b'n' => base,
        _ => b'N',
    }
}

/// Reverse complement of a DNA sequence.
pub fn reverse_complement(seq: &str) -> String {
    seq.bytes().rev().map(|b| complement(b) as char).collect()
}

/// Check that an allele only contains IUPAC nucleotide symbols.
pub fn validate_allele(allele: &str) -> Result<(), FerroError> {
    let ok = allele.bytes().all(|b| {
        matches!(
            b.to_ascii_uppercase(),
            b'A' | b'C' | b'G' | b'T' | b'N' | b'U' | b'R' | b'Y' | b'S' | b'W' | b'K' | b'M'
                | b'B' | b'D' | b'H' | b'V'
        )
    });
    if ok {
        Ok(())
    } else {
        Err(FerroError::InvalidAllele {
            allele: allele.to_string(),
        })
    }
}

/// Upper-case the positions `[from, to)` of `seq` and lower-case the rest.
///
/// Used to render codons as `tGt` with the changed bases highlighted.
pub fn highlight(seq: &str, from: usize, to: usize) -> String {
    seq.char_indices()
        .map(|(i, c)| {
            if i >= from && i < to {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Length of the common prefix of two byte strings.
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix of two byte strings, not overlapping `skip`
/// bases already claimed as prefix.
pub fn common_suffix(a: &[u8], b: &[u8], skip: usize) -> usize {
    let max = a.len().min(b.len()).saturating_sub(skip);
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}
