//! 3'/5' shifting of indels
//!
//! Insertions and deletions inside a repeat have many equivalent
//! placements. HGVS reports the one closest to the 3' end of the
//! transcript, which is rightwards on the plus strand and leftwards on the
//! minus strand.
//!
//! # Coordinate System
//!
//! This module uses **0-based half-open intervals** relative to the slice
//! of reference passed in:
//!
//! | Parameter | Basis | Notes |
//! |-----------|-------|-------|
//! | `start` | 0-based | Inclusive start position |
//! | `end` | 0-based | Exclusive end position (`start == end` for insertions) |
//!
//! The whole `reference` slice is the shifting boundary; callers pass the
//! exon or intron that contains the variant.

use crate::model::{Variant, VariantType};

/// Genomic direction of a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher coordinates
    Right,
    /// Towards lower coordinates
    Left,
}

/// Result of a shift operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftResult {
    /// New start position (0-based, inclusive)
    pub start: usize,
    /// New end position (0-based, exclusive)
    pub end: usize,
    /// Whether the variant was moved
    pub shifted: bool,
}

/// Shift an indel as far as possible in `direction`.
///
/// For a deletion `alt` is empty and `[start, end)` is the deleted span.
/// For an insertion `start == end` is the insertion point and `alt` the
/// inserted bases.
pub fn shift(reference: &[u8], alt: &[u8], start: usize, end: usize, direction: Direction) -> ShiftResult {
    let mut new_start = start;
    let mut new_end = end;

    match direction {
        Direction::Right => {
            while new_end < reference.len() {
                let next = reference[new_end];
                let movable = if alt.is_empty() {
                    // The first deleted base reappears right after the deletion
                    new_start < new_end && reference[new_start] == next
                } else {
                    alt[(new_end - start) % alt.len()] == next
                };
                if !movable {
                    break;
                }
                new_start += 1;
                new_end += 1;
            }
        }
        Direction::Left => {
            while new_start > 0 {
                let prev = reference[new_start - 1];
                let movable = if alt.is_empty() {
                    new_start < new_end && reference[new_end - 1] == prev
                } else {
                    alt[alt.len() - 1 - (start - new_start) % alt.len()] == prev
                };
                if !movable {
                    break;
                }
                new_start -= 1;
                new_end -= 1;
            }
        }
    }

    ShiftResult {
        start: new_start,
        end: new_end,
        shifted: new_start != start,
    }
}

/// Rotate `alt` to match an insertion moved `by` bases in `direction`.
fn rotate(alt: &str, by: usize, direction: Direction) -> String {
    if alt.is_empty() {
        return String::new();
    }
    let k = by % alt.len();
    let k = match direction {
        Direction::Right => k,
        Direction::Left => (alt.len() - k) % alt.len(),
    };
    format!("{}{}", &alt[k..], &alt[..k])
}

/// Shift an insertion or deletion within `[bound_start, bound_end]`, whose
/// plus-strand bases are `reference`.
///
/// Returns the variant unchanged when it is not a sequence-resolved indel
/// or does not lie inside the bounds.
pub fn shift_variant(
    variant: &Variant,
    reference: &str,
    bound_start: i64,
    direction: Direction,
) -> Variant {
    let bound_end = bound_start + reference.len() as i64 - 1;
    let (start, end) = match variant.variant_type {
        VariantType::Ins if !variant.alt_allele.is_empty() => {
            if variant.start < bound_start || variant.start > bound_end + 1 {
                return variant.clone();
            }
            let idx = (variant.start - bound_start) as usize;
            (idx, idx)
        }
        VariantType::Del if !variant.ref_allele.is_empty() => {
            if variant.start < bound_start || variant.end > bound_end {
                return variant.clone();
            }
            (
                (variant.start - bound_start) as usize,
                (variant.end - bound_start + 1) as usize,
            )
        }
        _ => return variant.clone(),
    };

    let bytes = reference.as_bytes();
    let result = shift(bytes, variant.alt_allele.as_bytes(), start, end, direction);
    if !result.shifted {
        return variant.clone();
    }

    let mut out = variant.clone();
    out.start = bound_start + result.start as i64;
    if variant.variant_type == VariantType::Ins {
        out.end = out.start;
        out.alt_allele = rotate(&variant.alt_allele, result.start.abs_diff(start), direction);
    } else {
        out.end = bound_start + result.end as i64 - 1;
        out.ref_allele = reference[result.start..result.end].to_string();
    }
    out
}
