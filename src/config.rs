//! Configuration file support for ferro-effect.
//!
//! All tunables of the annotation engine live in one [`EffectConfig`] value
//! that is passed explicitly to the classifier, the HGVS generator and the
//! LOF evaluator. Nothing is read from process-wide state.
//!
//! # Example Configuration
//!
//! ```toml
//! [splice]
//! site-size = 2
//! region-exon-size = 3
//! region-intron-min = 3
//! region-intron-max = 8
//!
//! [flank]
//! up-down-length = 5000
//!
//! [lof]
//! delete-fraction = 0.5
//! nmd-distance = 50
//!
//! [hgvs]
//! shift = true
//!
//! [codon-tables]
//! MT = "vertebrate_mitochondrial"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro.toml` in current directory
//! 2. `~/.config/ferro/config.toml`

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EffectConfig {
    /// Splice site and splice region windows.
    pub splice: SpliceConfig,
    /// Upstream/downstream flank.
    pub flank: FlankConfig,
    /// Loss-of-function and NMD thresholds.
    pub lof: LofConfig,
    /// HGVS formatting options.
    pub hgvs: HgvsConfig,
    /// Codon table override per chromosome name.
    pub codon_tables: HashMap<String, String>,
    /// Sequence cache sizing.
    pub cache: CacheConfig,
}

/// Splice windows, in bases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SpliceConfig {
    /// Core donor/acceptor site size at each intron end.
    pub site_size: i64,
    /// Exonic bases next to an intron that count as splice region.
    pub region_exon_size: i64,
    /// First intronic base (1-based distance from the exon) of the region.
    pub region_intron_min: i64,
    /// Last intronic base (1-based distance from the exon) of the region.
    pub region_intron_max: i64,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            site_size: 2,
            region_exon_size: 3,
            region_intron_min: 3,
            region_intron_max: 8,
        }
    }
}

/// Upstream/downstream flank settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FlankConfig {
    /// Flank length in bases; 0 disables upstream/downstream effects.
    pub up_down_length: i64,
}

impl Default for FlankConfig {
    fn default() -> Self {
        Self {
            up_down_length: 5000,
        }
    }
}

/// Loss-of-function thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LofConfig {
    /// A deletion removing more than this fraction of coding bases is LOF.
    pub delete_fraction: f64,
    /// Frameshifts before this fraction of the protein are not LOF.
    pub ignore_protein_before: f64,
    /// Frameshifts after this fraction of the protein are not LOF.
    pub ignore_protein_after: f64,
    /// Premature stops closer than this to the last exon junction escape NMD.
    pub nmd_distance: i64,
}

impl Default for LofConfig {
    fn default() -> Self {
        Self {
            delete_fraction: 0.5,
            ignore_protein_before: 0.0,
            ignore_protein_after: 1.0,
            nmd_distance: 50,
        }
    }
}

/// HGVS output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HgvsConfig {
    /// Shift indels to their 3'-most position before formatting.
    pub shift: bool,
    /// Use one-letter amino acid codes in p. notation.
    pub one_letter_aa: bool,
}

impl Default for HgvsConfig {
    fn default() -> Self {
        Self {
            shift: true,
            one_letter_aa: false,
        }
    }
}

/// Sequence cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Maximum number of cached transcripts; 0 disables caching.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl EffectConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro.toml` in current directory
    /// 2. `~/.config/ferro/config.toml`
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro.toml");
        if cwd_config.exists() {
            match Self::load_from_path(&cwd_config) {
                Ok(config) => return Some(config),
                Err(e) => tracing::warn!("Ignoring {}: {}", cwd_config.display(), e),
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("config.toml");
            if home_config.exists() {
                match Self::load_from_path(&home_config) {
                    Ok(config) => return Some(config),
                    Err(e) => tracing::warn!("Ignoring {}: {}", home_config.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content and validate it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EffectConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.splice;
        if s.site_size < 0 || s.region_exon_size < 0 || s.region_intron_min < 1 {
            return Err(ConfigError::Invalid(
                "splice window sizes must be positive".to_string(),
            ));
        }
        if s.region_intron_min > s.region_intron_max {
            return Err(ConfigError::Invalid(format!(
                "splice region-intron-min ({}) exceeds region-intron-max ({})",
                s.region_intron_min, s.region_intron_max
            )));
        }
        if self.flank.up_down_length < 0 {
            return Err(ConfigError::Invalid(
                "up-down-length must not be negative".to_string(),
            ));
        }
        let l = &self.lof;
        for (name, v) in [
            ("delete-fraction", l.delete_fraction),
            ("ignore-protein-before", l.ignore_protein_before),
            ("ignore-protein-after", l.ignore_protein_after),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, v
                )));
            }
        }
        if l.ignore_protein_before > l.ignore_protein_after {
            return Err(ConfigError::Invalid(
                "ignore-protein-before exceeds ignore-protein-after".to_string(),
            ));
        }
        if l.nmd_distance < 0 {
            return Err(ConfigError::Invalid(
                "nmd-distance must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the core splice site size.
    pub fn with_splice_site_size(mut self, size: i64) -> Self {
        self.splice.site_size = size;
        self
    }

    /// Set the upstream/downstream flank length.
    pub fn with_up_down_length(mut self, length: i64) -> Self {
        self.flank.up_down_length = length;
        self
    }

    /// Enable or disable HGVS 3' shifting.
    pub fn with_hgvs_shift(mut self, shift: bool) -> Self {
        self.hgvs.shift = shift;
        self
    }

    /// Set the NMD distance to the last exon junction.
    pub fn with_nmd_distance(mut self, distance: i64) -> Self {
        self.lof.nmd_distance = distance;
        self
    }

    /// Override the codon table used for one chromosome.
    pub fn with_codon_table(mut self, chromosome: &str, table: &str) -> Self {
        self.codon_tables
            .insert(chromosome.to_string(), table.to_string());
        self
    }

    /// Set the sequence cache capacity (0 disables it).
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.capacity = capacity;
        self
    }
}

/// Configuration loading error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Config IO error: {0}")]
    Io(String),
    /// Parse error in config file.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// Value out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for crate::FerroError {
    fn from(e: ConfigError) -> Self {
        crate::FerroError::Config { msg: e.to_string() }
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
