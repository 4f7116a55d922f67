//! Word-level alignment between a reference phrase and a spoken transcript.
//!
//! Finds the maximal matching contiguous blocks shared by the two token
//! sequences and classifies every reference token as matched or missed.
//! Spoken words with no reference counterpart are kept separately as
//! insertions; they never count toward reference coverage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use parrot_text::TokenSequence;

/// One per-word verdict.
///
/// `Match` and `Miss` are tagged to a reference token index; `Extra` marks a
/// spoken insertion and is tagged to a spoken token index only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AlignmentOp {
    Match {
        reference_index: usize,
        spoken_index: usize,
        text: String,
    },
    Miss {
        reference_index: usize,
        text: String,
    },
    Extra {
        spoken_index: usize,
        text: String,
    },
}

impl AlignmentOp {
    pub fn is_match(&self) -> bool {
        matches!(self, AlignmentOp::Match { .. })
    }
}

/// The outcome of aligning one spoken transcript against one reference
/// phrase. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    ops: Vec<AlignmentOp>,
    extras: Vec<AlignmentOp>,
    total_reference_tokens: usize,
}

impl AlignmentResult {
    /// One op per reference token, in ascending reference index order.
    pub fn ops(&self) -> &[AlignmentOp] {
        &self.ops
    }

    /// Spoken insertions, in ascending spoken index order. Diagnostic only.
    pub fn extras(&self) -> &[AlignmentOp] {
        &self.extras
    }

    /// Length of the reference sequence this alignment was produced from.
    pub fn total_reference_tokens(&self) -> usize {
        self.total_reference_tokens
    }

    pub fn matched_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_match()).count()
    }
}

/// A contiguous run of equal tokens shared by both sequences.
#[derive(Debug, Clone, Copy)]
struct MatchBlock {
    ref_start: usize,
    spoken_start: usize,
    len: usize,
}

/// Align `spoken` against `reference`, producing one `Match`/`Miss` op per
/// reference token plus the list of spoken insertions.
///
/// Infallible for any input, including empty sequences: an empty reference
/// yields an empty op list, an empty transcript yields all misses.
pub fn align(reference: &TokenSequence, spoken: &TokenSequence) -> AlignmentResult {
    let ref_keys: Vec<&str> = reference.iter().map(|t| t.key.as_str()).collect();
    let spoken_keys: Vec<&str> = spoken.iter().map(|t| t.key.as_str()).collect();

    let mut key_positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, key) in spoken_keys.iter().enumerate() {
        key_positions.entry(*key).or_default().push(j);
    }

    let mut blocks = Vec::new();
    collect_blocks(
        &key_positions,
        &ref_keys,
        0,
        ref_keys.len(),
        0,
        spoken_keys.len(),
        &mut blocks,
    );
    // The block search does not visit reference ranges left-to-right, so the
    // op list is rebuilt in original reference order.
    blocks.sort_by_key(|b| b.ref_start);

    let mut spoken_for_ref: Vec<Option<usize>> = vec![None; ref_keys.len()];
    let mut spoken_covered = vec![false; spoken_keys.len()];
    for block in &blocks {
        for offset in 0..block.len {
            spoken_for_ref[block.ref_start + offset] = Some(block.spoken_start + offset);
            spoken_covered[block.spoken_start + offset] = true;
        }
    }

    let ops: Vec<AlignmentOp> = reference
        .iter()
        .map(|token| match spoken_for_ref[token.index] {
            Some(spoken_index) => AlignmentOp::Match {
                reference_index: token.index,
                spoken_index,
                text: token.text.clone(),
            },
            None => AlignmentOp::Miss {
                reference_index: token.index,
                text: token.text.clone(),
            },
        })
        .collect();

    let extras: Vec<AlignmentOp> = spoken
        .iter()
        .filter(|token| !spoken_covered[token.index])
        .map(|token| AlignmentOp::Extra {
            spoken_index: token.index,
            text: token.text.clone(),
        })
        .collect();

    tracing::debug!(
        reference_tokens = ref_keys.len(),
        spoken_tokens = spoken_keys.len(),
        matched = ops.iter().filter(|op| op.is_match()).count(),
        extras = extras.len(),
        "alignment_complete"
    );

    AlignmentResult {
        ops,
        extras,
        total_reference_tokens: reference.len(),
    }
}

/// Recursive longest-common-block search: emit the longest shared run, then
/// recurse on the sub-ranges strictly before and strictly after it.
fn collect_blocks(
    key_positions: &HashMap<&str, Vec<usize>>,
    ref_keys: &[&str],
    ref_lo: usize,
    ref_hi: usize,
    spoken_lo: usize,
    spoken_hi: usize,
    out: &mut Vec<MatchBlock>,
) {
    if ref_lo >= ref_hi || spoken_lo >= spoken_hi {
        return;
    }
    let block = longest_block(key_positions, ref_keys, ref_lo, ref_hi, spoken_lo, spoken_hi);
    if block.len == 0 {
        return;
    }
    collect_blocks(
        key_positions,
        ref_keys,
        ref_lo,
        block.ref_start,
        spoken_lo,
        block.spoken_start,
        out,
    );
    out.push(block);
    collect_blocks(
        key_positions,
        ref_keys,
        block.ref_start + block.len,
        ref_hi,
        block.spoken_start + block.len,
        spoken_hi,
        out,
    );
}

/// Longest contiguous run of equal tokens within the given sub-ranges.
///
/// Ties between equal-length runs are broken toward the smallest reference
/// start index, then the smallest spoken start index: the scan visits
/// reference indices and spoken occurrence positions in ascending order and
/// only a strictly longer run displaces the current best.
fn longest_block(
    key_positions: &HashMap<&str, Vec<usize>>,
    ref_keys: &[&str],
    ref_lo: usize,
    ref_hi: usize,
    spoken_lo: usize,
    spoken_hi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        ref_start: ref_lo,
        spoken_start: spoken_lo,
        len: 0,
    };
    // Run length ending at each spoken index for the previous reference row.
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in ref_lo..ref_hi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = key_positions.get(ref_keys[i]) {
            for &j in positions {
                if j < spoken_lo {
                    continue;
                }
                if j >= spoken_hi {
                    break;
                }
                let len = match j.checked_sub(1) {
                    Some(prev) => run_lengths.get(&prev).copied().unwrap_or(0) + 1,
                    None => 1,
                };
                next_runs.insert(j, len);
                if len > best.len {
                    best = MatchBlock {
                        ref_start: i + 1 - len,
                        spoken_start: j + 1 - len,
                        len,
                    };
                }
            }
        }
        run_lengths = next_runs;
    }

    best
}
