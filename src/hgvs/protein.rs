//! p. notation.

use std::sync::Arc;

use crate::codon::{AminoAcid, CodonTable};
use crate::effect::{mutate_cds, EffectType, VariantEffect};
use crate::model::{Transcript, TranscriptSequences, VariantType};
use crate::sequence::{common_prefix, common_suffix};

/// Amino acid code style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AaStyle {
    #[default]
    ThreeLetter,
    OneLetter,
}

impl AaStyle {
    /// Render one residue; stops are always `*`.
    pub fn residue(self, aa: char) -> String {
        if aa == '*' {
            return "*".to_string();
        }
        let aa = AminoAcid::from_one_letter(aa).unwrap_or(AminoAcid::Xaa);
        match self {
            AaStyle::ThreeLetter => aa.to_three_letter().to_string(),
            AaStyle::OneLetter => aa.to_one_letter().to_string(),
        }
    }

    fn residues(self, aas: &str) -> String {
        aas.chars().map(|c| self.residue(c)).collect()
    }
}

/// A protein-level consequence, positions 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProteinChange {
    /// `p.0?`: no protein is made
    NoProtein,
    /// `p.Met1?`
    StartLost,
    /// `p.Phe297Ile`
    Substitution { aa_ref: char, pos: usize, aa_alt: char },
    /// `p.Gln10*`
    Nonsense { aa_ref: char, pos: usize },
    /// `p.Lys5del` / `p.Lys5_Gly7del`
    Deletion { deleted: String, pos: usize },
    /// `p.Lys5dup` / `p.Lys5_Gly7dup`
    Duplication { duplicated: String, pos: usize },
    /// `p.Lys5_Gly6insArg`; `pos` is the residue before the insertion
    Insertion {
        before: char,
        after: char,
        pos: usize,
        inserted: String,
    },
    /// `p.Lys5_Gly6delinsTrp`
    Delins {
        deleted: String,
        pos: usize,
        inserted: String,
    },
    /// `p.Arg97fs` / `p.Arg97fs*23`
    Frameshift {
        aa_ref: char,
        pos: usize,
        new_stop: Option<usize>,
    },
    /// `p.*110Glnext*?`
    Extension { pos: usize, aa_alt: char },
}

impl ProteinChange {
    fn span(style: AaStyle, residues: &str, pos: usize) -> String {
        let mut chars = residues.chars();
        let first = chars.next().unwrap_or('X');
        match chars.last() {
            None => format!("{}{}", style.residue(first), pos),
            Some(last) => format!(
                "{}{}_{}{}",
                style.residue(first),
                pos,
                style.residue(last),
                pos + residues.chars().count() - 1
            ),
        }
    }

    /// Render with the `p.` prefix.
    pub fn render(&self, style: AaStyle) -> String {
        let body = match self {
            ProteinChange::NoProtein => "0?".to_string(),
            ProteinChange::StartLost => format!("{}1?", style.residue('M')),
            ProteinChange::Substitution { aa_ref, pos, aa_alt } => {
                format!("{}{}{}", style.residue(*aa_ref), pos, style.residue(*aa_alt))
            }
            ProteinChange::Nonsense { aa_ref, pos } => format!("{}{}*", style.residue(*aa_ref), pos),
            ProteinChange::Deletion { deleted, pos } => format!("{}del", Self::span(style, deleted, *pos)),
            ProteinChange::Duplication { duplicated, pos } => {
                format!("{}dup", Self::span(style, duplicated, *pos))
            }
            ProteinChange::Insertion {
                before,
                after,
                pos,
                inserted,
            } => format!(
                "{}{}_{}{}ins{}",
                style.residue(*before),
                pos,
                style.residue(*after),
                pos + 1,
                style.residues(inserted)
            ),
            ProteinChange::Delins { deleted, pos, inserted } => format!(
                "{}delins{}",
                Self::span(style, deleted, *pos),
                style.residues(inserted)
            ),
            // A shift whose first new residue is a stop reads as a nonsense change
            ProteinChange::Frameshift {
                aa_ref,
                pos,
                new_stop: Some(1),
            } => format!("{}{}*", style.residue(*aa_ref), pos),
            ProteinChange::Frameshift { aa_ref, pos, new_stop } => match new_stop {
                Some(k) => format!("{}{}fs*{}", style.residue(*aa_ref), pos, k),
                None => format!("{}{}fs", style.residue(*aa_ref), pos),
            },
            ProteinChange::Extension { pos, aa_alt } => format!("*{}{}ext*?", pos, style.residue(*aa_alt)),
        };
        format!("p.{}", body)
    }
}

impl std::fmt::Display for ProteinChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(AaStyle::ThreeLetter))
    }
}

/// Residues up to and including the first stop.
fn until_stop(protein: &str) -> &str {
    match protein.find('*') {
        Some(i) => &protein[..=i],
        None => protein,
    }
}

/// Describe the difference between `reference` and `alt`, whose first
/// residues sit at 0-based protein index `offset`.
///
/// Returns `None` when the two are identical.
pub fn describe(reference: &str, alt: &str, offset: usize) -> Option<ProteinChange> {
    let r = reference.as_bytes();
    let a = alt.as_bytes();
    let prefix = common_prefix(r, a);
    let pos = offset + prefix + 1;

    if a.get(prefix) == Some(&b'*') {
        let aa_ref = *r.get(prefix)? as char;
        return (aa_ref != '*').then_some(ProteinChange::Nonsense { aa_ref, pos });
    }

    let suffix = common_suffix(r, a, prefix);
    let deleted = &reference[prefix..reference.len() - suffix];
    let inserted = &alt[prefix..alt.len() - suffix];

    match (deleted.len(), inserted.len()) {
        (0, 0) => None,
        (1, 1) => Some(ProteinChange::Substitution {
            aa_ref: r[prefix] as char,
            pos,
            aa_alt: a[prefix] as char,
        }),
        (_, 0) => Some(ProteinChange::Deletion {
            deleted: deleted.to_string(),
            pos,
        }),
        (0, len) => {
            if prefix == 0 {
                return None;
            }
            if prefix >= len && &reference[prefix - len..prefix] == inserted {
                return Some(ProteinChange::Duplication {
                    duplicated: inserted.to_string(),
                    pos: pos - len,
                });
            }
            Some(ProteinChange::Insertion {
                before: r[prefix - 1] as char,
                after: *r.get(prefix)? as char,
                pos: pos - 1,
                inserted: inserted.to_string(),
            })
        }
        _ => Some(ProteinChange::Delins {
            deleted: deleted.to_string(),
            pos,
            inserted: inserted.to_string(),
        }),
    }
}

/// Protein consequence of `effect` on the coding transcript `tr`.
///
/// `sequences` is only consulted for indels and frameshifts, whose
/// consequence depends on the residues after the edit.
pub fn change<F>(
    effect: &VariantEffect,
    tr: &Transcript<'_>,
    sequences: F,
    table: &CodonTable,
) -> Option<ProteinChange>
where
    F: FnOnce() -> Option<Arc<TranscriptSequences>>,
{
    use EffectType as E;
    match effect.effect_type {
        E::TranscriptDeleted => return Some(ProteinChange::NoProtein),
        E::StartLost | E::NonSynonymousStart => return Some(ProteinChange::StartLost),
        E::StopLost => {
            let codon = effect.codon.as_ref()?;
            let i = codon.aa_ref.find('*')?;
            return Some(ProteinChange::Extension {
                pos: codon.codon_num as usize + i + 1,
                aa_alt: codon.aa_alt.chars().nth(i).unwrap_or('X'),
            });
        }
        E::FrameShift
        | E::NonSynonymousCoding
        | E::NonSynonymousStop
        | E::StopGained
        | E::CodonChange
        | E::CodonInsertion
        | E::CodonDeletion
        | E::CodonChangePlusCodonInsertion
        | E::CodonChangePlusCodonDeletion => {}
        _ => return None,
    }

    let variant = effect.local_variant();
    let substitution = matches!(variant.variant_type, VariantType::Snp | VariantType::Mnp);
    if substitution && effect.effect_type != E::FrameShift {
        let codon = effect.codon.as_ref()?;
        return describe(&codon.aa_ref, &codon.aa_alt, codon.codon_num.max(0) as usize);
    }

    let seqs = sequences()?;
    let (_, new_cds) = mutate_cds(tr, &seqs.cds, &variant)?;
    let alt = table.translate(&new_cds);

    if effect.effect_type == E::FrameShift {
        let r = seqs.protein.as_bytes();
        let i = common_prefix(r, alt.as_bytes());
        let aa_ref = *r.get(i)? as char;
        let new_stop = alt[i..].find('*').map(|k| k + 1);
        return Some(ProteinChange::Frameshift {
            aa_ref,
            pos: i + 1,
            new_stop,
        });
    }
    describe(until_stop(&seqs.protein), until_stop(&alt), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("F", "I", 296, "p.Phe297Ile")]
    #[case("Q", "*", 9, "p.Gln10*")]
    #[case("MDWFQ*", "MDWQ*", 0, "p.Phe4del")]
    #[case("MDWFQ*", "MQ*", 0, "p.Asp2_Phe4del")]
    #[case("MDWFQ*", "MDWFFQ*", 0, "p.Phe4dup")]
    #[case("MDWFQ*", "MDWKFQ*", 0, "p.Trp3_Phe4insLys")]
    #[case("MDWFQ*", "MDKKQ*", 0, "p.Trp3_Phe4delinsLysLys")]
    #[case("MDWFQ*", "MDW*", 0, "p.Phe4*")]
    fn test_describe(#[case] r: &str, #[case] a: &str, #[case] offset: usize, #[case] expected: &str) {
        let change = describe(r, a, offset).unwrap();
        assert_eq!(change.to_string(), expected);
    }

    #[test]
    fn test_describe_identical_is_none() {
        assert_eq!(describe("MDW*", "MDW*", 0), None);
        assert_eq!(describe("L", "L", 4), None);
    }

    #[test]
    fn test_one_letter_rendering() {
        let change = ProteinChange::Substitution {
            aa_ref: 'F',
            pos: 297,
            aa_alt: 'I',
        };
        assert_eq!(change.render(AaStyle::OneLetter), "p.F297I");
        let fs = ProteinChange::Frameshift {
            aa_ref: 'R',
            pos: 97,
            new_stop: Some(23),
        };
        assert_eq!(fs.render(AaStyle::OneLetter), "p.R97fs*23");
        assert_eq!(fs.to_string(), "p.Arg97fs*23");
        let open = ProteinChange::Frameshift {
            aa_ref: 'R',
            pos: 97,
            new_stop: None,
        };
        assert_eq!(open.to_string(), "p.Arg97fs");
    }

    #[test]
    fn test_frameshift_to_immediate_stop_is_nonsense() {
        let fs = ProteinChange::Frameshift {
            aa_ref: 'F',
            pos: 4,
            new_stop: Some(1),
        };
        assert_eq!(fs.to_string(), "p.Phe4*");
        assert_eq!(fs.render(AaStyle::OneLetter), "p.F4*");
    }

    #[test]
    fn test_special_forms() {
        assert_eq!(ProteinChange::NoProtein.to_string(), "p.0?");
        assert_eq!(ProteinChange::StartLost.to_string(), "p.Met1?");
        let ext = ProteinChange::Extension { pos: 110, aa_alt: 'Q' };
        assert_eq!(ext.to_string(), "p.*110Glnext*?");
    }
}
