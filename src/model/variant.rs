//! Variants to be annotated.

use serde::{Deserialize, Serialize};

use crate::error::FerroError;
use crate::sequence::{common_prefix, common_suffix, validate_allele};

/// Structural class of a variant, derived from its alleles or given
/// explicitly for symbolic structural variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    Snp,
    Mnp,
    Ins,
    Del,
    Mixed,
    Inv,
    Dup,
    Bnd,
}

impl VariantType {
    /// Infer the type from already trimmed alleles.
    pub fn from_alleles(ref_allele: &str, alt_allele: &str) -> Option<Self> {
        match (ref_allele.len(), alt_allele.len()) {
            (0, 0) => None,
            (0, _) => Some(VariantType::Ins),
            (_, 0) => Some(VariantType::Del),
            (1, 1) => Some(VariantType::Snp),
            (r, a) if r == a => Some(VariantType::Mnp),
            _ => Some(VariantType::Mixed),
        }
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VariantType::Snp => "SNP",
            VariantType::Mnp => "MNP",
            VariantType::Ins => "INS",
            VariantType::Del => "DEL",
            VariantType::Mixed => "MIXED",
            VariantType::Inv => "INV",
            VariantType::Dup => "DUP",
            VariantType::Bnd => "BND",
        };
        write!(f, "{}", s)
    }
}

/// The other side of a translocation breakend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakend {
    pub chromosome: String,
    /// 0-based position of the mate breakend
    pub position: i64,
    /// Mate sequence is joined reverse-complemented (`t]p]` or `[p[t`)
    pub reverse: bool,
}

/// A single alternative allele at a genomic location.
///
/// Insertions have an empty `ref_allele` and `start == end` at the base
/// *before which* the alternative is inserted. Deletions carry the deleted
/// bases as `ref_allele` and an empty `alt_allele`. Symbolic structural
/// variants (`DEL`, `DUP`, `INV`) may have both alleles empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub chromosome: String,
    pub start: i64,
    pub end: i64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub variant_type: VariantType,
    #[serde(default)]
    pub genotype: Option<String>,
    #[serde(default)]
    pub mate: Option<Breakend>,
}

impl Variant {
    /// Build a variant from 0-based coordinates and trimmed alleles.
    pub fn new(chromosome: &str, start: i64, ref_allele: &str, alt_allele: &str) -> Result<Self, FerroError> {
        validate_allele(ref_allele)?;
        validate_allele(alt_allele)?;
        let ref_allele = ref_allele.to_ascii_uppercase();
        let alt_allele = alt_allele.to_ascii_uppercase();
        if ref_allele == alt_allele {
            return Err(FerroError::InvalidVariant {
                msg: format!(
                    "reference equals alternative at {}:{}",
                    chromosome, start
                ),
            });
        }
        let variant_type = VariantType::from_alleles(&ref_allele, &alt_allele).ok_or_else(|| {
            FerroError::InvalidVariant {
                msg: "both alleles are empty".to_string(),
            }
        })?;
        let end = match variant_type {
            VariantType::Ins => start,
            _ => start + ref_allele.len() as i64 - 1,
        };
        Ok(Self {
            chromosome: chromosome.to_string(),
            start,
            end,
            ref_allele,
            alt_allele,
            variant_type,
            genotype: None,
            mate: None,
        })
    }

    /// Build a variant from a 1-based VCF-style record.
    ///
    /// Shared leading bases (the VCF padding base) and then shared trailing
    /// bases are removed before the type is inferred.
    pub fn from_vcf(chromosome: &str, pos: i64, ref_allele: &str, alt_allele: &str) -> Result<Self, FerroError> {
        if pos < 1 {
            return Err(FerroError::InvalidCoordinates {
                msg: format!("VCF position must be 1-based, got {}", pos),
            });
        }
        let r = ref_allele.to_ascii_uppercase();
        let a = alt_allele.to_ascii_uppercase();
        let prefix = common_prefix(r.as_bytes(), a.as_bytes());
        let suffix = common_suffix(r.as_bytes(), a.as_bytes(), prefix);
        let r_trim = &r[prefix..r.len() - suffix];
        let a_trim = &a[prefix..a.len() - suffix];
        Self::new(chromosome, pos - 1 + prefix as i64, r_trim, a_trim)
    }

    /// Symbolic deletion, duplication or inversion of `[start, end]`.
    pub fn structural(chromosome: &str, start: i64, end: i64, variant_type: VariantType) -> Result<Self, FerroError> {
        if !matches!(
            variant_type,
            VariantType::Del | VariantType::Dup | VariantType::Inv
        ) {
            return Err(FerroError::InvalidVariant {
                msg: format!("{} is not a structural variant type", variant_type),
            });
        }
        if end < start {
            return Err(FerroError::InvalidCoordinates {
                msg: format!("end {} before start {}", end, start),
            });
        }
        Ok(Self {
            chromosome: chromosome.to_string(),
            start,
            end,
            ref_allele: String::new(),
            alt_allele: String::new(),
            variant_type,
            genotype: None,
            mate: None,
        })
    }

    /// Translocation breakend joining `position` to `mate`.
    pub fn breakend(chromosome: &str, position: i64, mate: Breakend) -> Self {
        Self {
            chromosome: chromosome.to_string(),
            start: position,
            end: position,
            ref_allele: String::new(),
            alt_allele: String::new(),
            variant_type: VariantType::Bnd,
            genotype: None,
            mate: Some(mate),
        }
    }

    pub fn with_genotype(mut self, genotype: &str) -> Self {
        self.genotype = Some(genotype.to_string());
        self
    }

    /// Copy of this variant moved by `offset` bases.
    pub fn shifted(&self, offset: i64) -> Self {
        let mut v = self.clone();
        v.start += offset;
        v.end += offset;
        v
    }

    /// Number of reference bases spanned (1 for insertions).
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_ins(&self) -> bool {
        self.variant_type == VariantType::Ins
    }

    pub fn is_del(&self) -> bool {
        self.variant_type == VariantType::Del
    }

    /// Symbolic structural variant without explicit alleles.
    pub fn is_structural(&self) -> bool {
        match self.variant_type {
            VariantType::Inv | VariantType::Dup | VariantType::Bnd => true,
            VariantType::Del => self.ref_allele.is_empty(),
            _ => false,
        }
    }

    /// Change in sequence length caused by the variant.
    pub fn net_change(&self) -> i64 {
        match self.variant_type {
            VariantType::Dup => self.len(),
            VariantType::Inv | VariantType::Bnd => 0,
            VariantType::Del if self.ref_allele.is_empty() => -self.len(),
            _ => self.alt_allele.len() as i64 - self.ref_allele.len() as i64,
        }
    }

    /// Whether the variant's reference span touches `[start, end]`.
    ///
    /// An insertion touches the marker that holds the base it precedes.
    pub fn intersects(&self, start: i64, end: i64) -> bool {
        self.start <= end && start <= self.end
    }

    /// Whether the variant covers all of `[start, end]`.
    pub fn includes(&self, start: i64, end: i64) -> bool {
        !self.is_ins() && self.start <= start && end <= self.end
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = if self.ref_allele.is_empty() { "-" } else { &self.ref_allele };
        let a = if self.alt_allele.is_empty() { "-" } else { &self.alt_allele };
        write!(
            f,
            "{}:{}-{} {}/{} ({})",
            self.chromosome, self.start, self.end, r, a, self.variant_type
        )
    }
}
