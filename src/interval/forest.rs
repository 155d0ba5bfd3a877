use std::collections::HashMap;
use std::fmt;

use bio::data_structures::interval_tree::ArrayBackedIntervalTree;

use crate::model::{Genome, MarkerId, MarkerKind};

/// A marker found by a forest query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForestHit {
    pub marker: MarkerId,
    /// Amount to add to the query coordinates to express them in the
    /// marker's frame. Non-zero only after wrapping around the origin of a
    /// circular chromosome.
    pub offset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    marker: MarkerId,
    /// Marker coordinate = stored coordinate + delta
    delta: i64,
}

/// Half-open `[start, end + 1)` intervals over closed marker coordinates.
type SlotTree = ArrayBackedIntervalTree<i64, Slot>;

struct ChromosomeTree {
    length: i64,
    circular: bool,
    tree: SlotTree,
    len: usize,
}

/// Split `[start, end]` into pieces lying inside `[0, length)`.
///
/// Each piece is returned with the delta that maps it back to the input
/// coordinates. A range at least as long as the chromosome covers it fully.
fn wrap(start: i64, end: i64, length: i64) -> Vec<(i64, i64, i64)> {
    if end - start + 1 >= length {
        return vec![(0, length - 1, 0)];
    }
    let s = start.rem_euclid(length);
    let delta = start - s;
    let e = s + (end - start);
    if e < length {
        vec![(s, e, delta)]
    } else {
        vec![(s, length - 1, delta), (0, e - length, delta + length)]
    }
}

/// One interval index per chromosome over the top-level markers (genes and
/// custom intervals). Children are reached through the marker tree.
///
/// Built once; queries take `&self` and are safe to share across threads.
#[derive(Default)]
pub struct IntervalForest {
    trees: HashMap<String, ChromosomeTree>,
}

impl fmt::Debug for IntervalForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, t) in &self.trees {
            map.entry(name, &t.len);
        }
        map.finish()
    }
}

impl IntervalForest {
    pub fn build(genome: &Genome) -> Self {
        let mut trees = HashMap::new();
        let mut total = 0;
        for chrom in genome.chromosomes() {
            let mut tree = SlotTree::new();
            let mut len = 0;
            for &child in &genome.marker(chrom.marker).children {
                let m = genome.marker(child);
                let pieces = if chrom.circular {
                    wrap(m.start, m.end, chrom.length)
                } else {
                    vec![(m.start, m.end, 0)]
                };
                for (start, end, delta) in pieces {
                    tree.insert(start..end + 1, Slot { marker: child, delta });
                    len += 1;
                }
            }
            tree.index();
            total += len;
            trees.insert(
                chrom.name.clone(),
                ChromosomeTree {
                    length: chrom.length,
                    circular: chrom.circular,
                    tree,
                    len,
                },
            );
        }
        tracing::info!(
            "Built interval forest: {} chromosomes, {} intervals",
            trees.len(),
            total
        );
        Self { trees }
    }

    pub fn chromosome_count(&self) -> usize {
        self.trees.len()
    }

    pub fn has_chromosome(&self, chromosome: &str) -> bool {
        self.trees.contains_key(chromosome)
    }

    /// Top-level markers intersecting `[start, end]`, ordered by marker id.
    ///
    /// On circular chromosomes the query is normalized into `[0, length)`
    /// first and split when it crosses the origin. A marker reachable through
    /// more than one frame is reported once, preferring the unshifted frame.
    pub fn query_overlap(&self, chromosome: &str, start: i64, end: i64) -> Vec<ForestHit> {
        let Some(tree) = self.trees.get(chromosome) else {
            return Vec::new();
        };
        let pieces = if tree.circular {
            wrap(start, end, tree.length)
        } else {
            vec![(start, end, 0)]
        };

        let mut best: HashMap<MarkerId, i64> = HashMap::new();
        for (qs, qe, qdelta) in pieces {
            if qe < qs {
                continue;
            }
            for entry in tree.tree.find(qs..qe + 1) {
                let slot = entry.data();
                let offset = slot.delta - qdelta;
                best.entry(slot.marker)
                    .and_modify(|o| {
                        if offset == 0 {
                            *o = 0;
                        }
                    })
                    .or_insert(offset);
            }
        }
        let mut hits: Vec<ForestHit> = best
            .into_iter()
            .map(|(marker, offset)| ForestHit { marker, offset })
            .collect();
        hits.sort_by_key(|h| h.marker);
        hits
    }

    /// Like [`query_overlap`](Self::query_overlap) but also returns every
    /// descendant marker (transcripts, exons, introns, splice sites, ...)
    /// intersecting the query.
    pub fn query_deep(&self, genome: &Genome, chromosome: &str, start: i64, end: i64) -> Vec<ForestHit> {
        let mut out = Vec::new();
        for hit in self.query_overlap(chromosome, start, end) {
            let (s, e) = (start + hit.offset, end + hit.offset);
            let mut stack = vec![hit.marker];
            while let Some(id) = stack.pop() {
                let m = genome.marker(id);
                if m.intersects(s, e) {
                    out.push(ForestHit {
                        marker: id,
                        offset: hit.offset,
                    });
                } else if m.kind != MarkerKind::Intron {
                    continue;
                }
                // Exon-side splice regions hang off the intron but lie outside it
                stack.extend(m.children.iter().copied());
            }
        }
        out.sort_by_key(|h| h.marker);
        out
    }
}
