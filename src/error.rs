//! Error types for ferro-effect
//!
//! Two kinds of failure are distinguished:
//! - [`FerroError`]: hard errors returned as `Err` (malformed genome model,
//!   invalid variant alleles, I/O and parse failures)
//! - [`ErrorWarning`]: recoverable annotation anomalies that ride along with a
//!   best-effort [`VariantEffect`](crate::effect::VariantEffect)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Allele contains characters other than nucleotides
    InvalidAllele = 1001,
    /// Coordinates are negative, reversed or otherwise unusable
    InvalidCoordinates = 1002,
    /// Variant could not be built from the supplied record
    InvalidVariant = 1003,

    // Model errors (E2xxx)
    /// Chromosome/contig not found
    ChromosomeNotFound = 2001,
    /// Genome model is inconsistent
    InvalidModel = 2003,
    /// Unknown codon table name
    UnknownCodonTable = 2004,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidAllele => "invalid allele",
            ErrorCode::InvalidCoordinates => "invalid coordinates",
            ErrorCode::InvalidVariant => "invalid variant",
            ErrorCode::ChromosomeNotFound => "chromosome not found",
            ErrorCode::InvalidModel => "inconsistent genome model",
            ErrorCode::UnknownCodonTable => "unknown codon table",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-effect operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Allele string is not a nucleotide sequence
    #[error("Invalid allele: '{allele}'")]
    InvalidAllele { allele: String },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// Variant could not be constructed
    #[error("Invalid variant: {msg}")]
    InvalidVariant { msg: String },

    /// Chromosome is not part of the genome
    #[error("Chromosome not found: {chromosome}")]
    ChromosomeNotFound { chromosome: String },

    /// Genome model failed validation while building
    #[error("Invalid genome model: {msg}")]
    InvalidModel { msg: String },

    /// Codon table name is not registered
    #[error("Unknown codon table: {name}")]
    UnknownCodonTable { name: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl FerroError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidAllele { .. } => ErrorCode::InvalidAllele,
            FerroError::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            FerroError::InvalidVariant { .. } => ErrorCode::InvalidVariant,
            FerroError::ChromosomeNotFound { .. } => ErrorCode::ChromosomeNotFound,
            FerroError::InvalidModel { .. } => ErrorCode::InvalidModel,
            FerroError::UnknownCodonTable { .. } => ErrorCode::UnknownCodonTable,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
            FerroError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Shorthand for a model validation failure
    pub fn model(msg: impl Into<String>) -> Self {
        FerroError::InvalidModel { msg: msg.into() }
    }

    /// Get a formatted error prefixed with its code
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for FerroError {
    fn from(e: std::io::Error) -> Self {
        FerroError::Io { msg: e.to_string() }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(e: serde_json::Error) -> Self {
        FerroError::Json { msg: e.to_string() }
    }
}

/// Recoverable anomaly attached to an emitted effect.
///
/// Only [`ErrorWarning::ChromosomeNotFound`] prevents classification; it is
/// reported on a single sentinel effect. All other tags accompany a fully
/// populated effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorWarning {
    /// The variant's chromosome is not part of the genome
    ChromosomeNotFound,
    /// The reference allele differs from the genome sequence
    RefDoesNotMatchGenome,
    /// CDS length is not a multiple of three, or the stop codon is missing
    TranscriptIncomplete,
    /// The first codon is not a start codon of the transcript's table
    TranscriptNoStartCodon,
    /// The CDS contains stop codons before its last codon
    TranscriptMultipleStopCodons,
    /// Every exon of a multi-exon transcript reports frame zero
    FramesZero,
    /// Coordinates were wrapped around the origin of a circular chromosome
    ChromosomeCircularWrap,
}

impl ErrorWarning {
    /// Stable code for this warning (e.g. "W2001")
    pub fn code(&self) -> &'static str {
        match self {
            ErrorWarning::ChromosomeNotFound => "W1001",
            ErrorWarning::RefDoesNotMatchGenome => "W1002",
            ErrorWarning::TranscriptIncomplete => "W2001",
            ErrorWarning::TranscriptNoStartCodon => "W2002",
            ErrorWarning::TranscriptMultipleStopCodons => "W2003",
            ErrorWarning::FramesZero => "W2004",
            ErrorWarning::ChromosomeCircularWrap => "W3001",
        }
    }

    /// Label used in ANN/EFF style outputs
    pub fn label(&self) -> &'static str {
        match self {
            ErrorWarning::ChromosomeNotFound => "ERROR_CHROMOSOME_NOT_FOUND",
            ErrorWarning::RefDoesNotMatchGenome => "WARNING_REF_DOES_NOT_MATCH_GENOME",
            ErrorWarning::TranscriptIncomplete => "WARNING_TRANSCRIPT_INCOMPLETE",
            ErrorWarning::TranscriptNoStartCodon => "WARNING_TRANSCRIPT_NO_START_CODON",
            ErrorWarning::TranscriptMultipleStopCodons => {
                "WARNING_TRANSCRIPT_MULTIPLE_STOP_CODONS"
            }
            ErrorWarning::FramesZero => "WARNING_FRAMES_ZERO",
            ErrorWarning::ChromosomeCircularWrap => "INFO_CHROMOSOME_CIRCULAR_WRAP",
        }
    }

    /// Whether this tag means no effect could be computed
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorWarning::ChromosomeNotFound)
    }
}

impl fmt::Display for ErrorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidAllele.as_str(), "E1001");
        assert_eq!(ErrorCode::ChromosomeNotFound.as_str(), "E2001");
        assert_eq!(ErrorCode::JsonError.to_string(), "E9002");
    }

    #[test]
    fn test_error_codes_map() {
        let err = FerroError::ChromosomeNotFound {
            chromosome: "chrZ".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::ChromosomeNotFound);
        assert_eq!(err.to_string(), "Chromosome not found: chrZ");
        assert!(err.detailed_message().starts_with("[E2001]"));
    }

    #[test]
    fn test_model_shorthand() {
        let err = FerroError::model("exon outside chromosome");
        assert_eq!(err.code(), ErrorCode::InvalidModel);
        assert!(err.to_string().contains("exon outside chromosome"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FerroError = io.into();
        assert_eq!(err.code(), ErrorCode::IoError);
    }

    #[test]
    fn test_warning_labels() {
        assert!(ErrorWarning::ChromosomeNotFound.is_fatal());
        assert!(!ErrorWarning::TranscriptIncomplete.is_fatal());
        assert_eq!(
            ErrorWarning::RefDoesNotMatchGenome.to_string(),
            "WARNING_REF_DOES_NOT_MATCH_GENOME"
        );
        assert_eq!(ErrorWarning::ChromosomeCircularWrap.code(), "W3001");
    }
}
