//! Genetic codes and amino acids.
//!
//! Tables are built from the NCBI translation table strings (base order
//! `TCAG`), so alternative codes such as the vertebrate mitochondrial table
//! differ from the standard code only in their two 64-character strings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FerroError;

/// Amino acid enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Pyl, // O (pyrrolysine)
    Sec, // U (selenocysteine)
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Ter, // * (stop codon)
    Xaa, // X (unknown)
}

impl AminoAcid {
    /// Get 3-letter code
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Pyl => "Pyl",
            Self::Sec => "Sec",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Ter => "Ter",
            Self::Xaa => "Xaa",
        }
    }

    /// Get 1-letter code
    pub fn to_one_letter(&self) -> char {
        match self {
            Self::Ala => 'A',
            Self::Arg => 'R',
            Self::Asn => 'N',
            Self::Asp => 'D',
            Self::Cys => 'C',
            Self::Gln => 'Q',
            Self::Glu => 'E',
            Self::Gly => 'G',
            Self::His => 'H',
            Self::Ile => 'I',
            Self::Leu => 'L',
            Self::Lys => 'K',
            Self::Met => 'M',
            Self::Phe => 'F',
            Self::Pro => 'P',
            Self::Pyl => 'O',
            Self::Sec => 'U',
            Self::Ser => 'S',
            Self::Thr => 'T',
            Self::Trp => 'W',
            Self::Tyr => 'Y',
            Self::Val => 'V',
            Self::Ter => '*',
            Self::Xaa => 'X',
        }
    }

    /// Parse from 1-letter code (uppercase only)
    pub fn from_one_letter(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Ala),
            'R' => Some(Self::Arg),
            'N' => Some(Self::Asn),
            'D' => Some(Self::Asp),
            'C' => Some(Self::Cys),
            'Q' => Some(Self::Gln),
            'E' => Some(Self::Glu),
            'G' => Some(Self::Gly),
            'H' => Some(Self::His),
            'I' => Some(Self::Ile),
            'L' => Some(Self::Leu),
            'K' => Some(Self::Lys),
            'M' => Some(Self::Met),
            'F' => Some(Self::Phe),
            'O' => Some(Self::Pyl),
            'P' => Some(Self::Pro),
            'U' => Some(Self::Sec),
            'S' => Some(Self::Ser),
            'T' => Some(Self::Thr),
            'W' => Some(Self::Trp),
            'Y' => Some(Self::Tyr),
            'V' => Some(Self::Val),
            '*' => Some(Self::Ter),
            'X' => Some(Self::Xaa),
            _ => None,
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

/// Index of a base in NCBI `TCAG` order.
fn base_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    if codon.len() != 3 {
        return None;
    }
    Some(base_index(codon[0])? * 16 + base_index(codon[1])? * 4 + base_index(codon[2])?)
}

/// A genetic code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonTable {
    name: &'static str,
    amino_acids: [u8; 64],
    starts: [bool; 64],
}

impl CodonTable {
    fn from_ncbi(name: &'static str, aas: &str, starts: &str) -> Self {
        let mut amino_acids = [b'X'; 64];
        let mut start_flags = [false; 64];
        for (i, (aa, st)) in aas.bytes().zip(starts.bytes()).enumerate().take(64) {
            amino_acids[i] = aa;
            start_flags[i] = st == b'M';
        }
        Self {
            name,
            amino_acids,
            starts: start_flags,
        }
    }

    /// NCBI table 1.
    pub fn standard() -> Self {
        Self::from_ncbi(
            "standard",
            "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
            "---M------**--*----M---------------M----------------------------",
        )
    }

    /// NCBI table 2.
    pub fn vertebrate_mitochondrial() -> Self {
        Self::from_ncbi(
            "vertebrate_mitochondrial",
            "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
            "----------**--------------------MMMM----------**---M------------",
        )
    }

    /// NCBI table 3.
    pub fn yeast_mitochondrial() -> Self {
        Self::from_ncbi(
            "yeast_mitochondrial",
            "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
            "----------**----------------------MM---------------M------------",
        )
    }

    /// NCBI table 5.
    pub fn invertebrate_mitochondrial() -> Self {
        Self::from_ncbi(
            "invertebrate_mitochondrial",
            "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
            "---M------**--------------------MMMM---------------M------------",
        )
    }

    /// NCBI table 11.
    pub fn bacterial_plastid() -> Self {
        Self::from_ncbi(
            "bacterial_plastid",
            "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
            "---M------**--*----M------------MMMM---------------M------------",
        )
    }

    /// Table name as used in configuration files.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One-letter amino acid for a codon; `X` when the codon is incomplete
    /// or contains ambiguous bases.
    pub fn aa(&self, codon: &[u8]) -> char {
        codon_index(codon)
            .map(|i| self.amino_acids[i] as char)
            .unwrap_or('X')
    }

    /// Translate a sequence codon by codon. A trailing partial codon is
    /// translated as `X`.
    pub fn translate(&self, seq: &str) -> String {
        seq.as_bytes().chunks(3).map(|c| self.aa(c)).collect()
    }

    /// Whether any complete codon in `codons` is a stop codon.
    pub fn is_stop(&self, codons: &str) -> bool {
        codons
            .as_bytes()
            .chunks(3)
            .filter(|c| c.len() == 3)
            .any(|c| self.aa(c) == '*')
    }

    /// Whether the first codon of `codons` is a start codon.
    pub fn is_start(&self, codons: &str) -> bool {
        codons
            .as_bytes()
            .get(0..3)
            .and_then(codon_index)
            .map(|i| self.starts[i])
            .unwrap_or(false)
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Registry of codon tables with per-chromosome overrides.
#[derive(Debug, Clone)]
pub struct CodonTables {
    standard: CodonTable,
    tables: HashMap<&'static str, CodonTable>,
    by_chromosome: HashMap<String, &'static str>,
}

impl CodonTables {
    /// Registry with the built-in tables and no overrides.
    pub fn new() -> Self {
        let tables = [
            CodonTable::standard(),
            CodonTable::vertebrate_mitochondrial(),
            CodonTable::yeast_mitochondrial(),
            CodonTable::invertebrate_mitochondrial(),
            CodonTable::bacterial_plastid(),
        ]
        .into_iter()
        .map(|t| (t.name(), t))
        .collect();
        Self {
            standard: CodonTable::standard(),
            tables,
            by_chromosome: HashMap::new(),
        }
    }

    /// Registry with chromosome overrides (`chromosome -> table name`).
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, FerroError> {
        let mut registry = Self::new();
        for (chrom, name) in overrides {
            let table = registry.get(name)?.name();
            registry.by_chromosome.insert(chrom.clone(), table);
        }
        Ok(registry)
    }

    /// Look a table up by name or NCBI number.
    pub fn get(&self, name: &str) -> Result<&CodonTable, FerroError> {
        let key = match name {
            "1" | "Standard" => "standard",
            "2" | "Vertebrate_Mitochondrial" => "vertebrate_mitochondrial",
            "3" | "Yeast_Mitochondrial" => "yeast_mitochondrial",
            "5" | "Invertebrate_Mitochondrial" => "invertebrate_mitochondrial",
            "11" | "Bacterial_and_Plant_Plastid" => "bacterial_plastid",
            other => other,
        };
        self.tables
            .get(key)
            .ok_or_else(|| FerroError::UnknownCodonTable {
                name: name.to_string(),
            })
    }

    /// Table for a chromosome, falling back to the standard code.
    pub fn for_chromosome(&self, chromosome: &str) -> &CodonTable {
        self.by_chromosome
            .get(chromosome)
            .and_then(|name| self.tables.get(name))
            .unwrap_or(&self.standard)
    }

    /// Table for a transcript: an explicit transcript table wins over the
    /// chromosome override.
    pub fn for_transcript(&self, chromosome: &str, transcript_table: Option<&str>) -> &CodonTable {
        transcript_table
            .and_then(|name| self.get(name).ok())
            .unwrap_or_else(|| self.for_chromosome(chromosome))
    }
}

impl Default for CodonTables {
    fn default() -> Self {
        Self::new()
    }
}
