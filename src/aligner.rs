use log::debug;

use crate::subtitle_model::{AlignedPair, Track};

// @module: Bilingual alignment by temporal overlap

/// Alignment tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct AlignConfig {
    /// Minimum overlap as a fraction of the shorter cue's duration for two
    /// cues to pair. 0.0 means any non-zero overlap pairs.
    pub min_overlap_ratio: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        AlignConfig {
            min_overlap_ratio: 0.0,
        }
    }
}

/// Merge two normalized tracks into an ordered sequence of aligned pairs.
///
/// A single forward sweep over both tracks (already sorted by start time):
/// each primary cue is compared against every secondary cue that opens
/// before it closes, and a secondary cue is only retired once it ends at or
/// before the current primary's start. A cue spanning a boundary therefore
/// still pairs with the next counterpart, even when two cues end at the
/// same millisecond. One cue pairing with several counterparts produces one
/// `AlignedPair` per counterpart; the greatest-overlap one carries
/// `best_match`. Cues that never matched anything are emitted as one-sided
/// pairs. Runs in time linear in the combined pair count.
pub fn align(primary: &Track, secondary: &Track, config: &AlignConfig) -> Vec<AlignedPair> {
    let mut pairs = Vec::new();
    let mut secondary_matched = vec![false; secondary.cues.len()];
    let mut j = 0;

    for a in &primary.cues {
        // Retire secondary cues that closed before this one opens
        while j < secondary.cues.len() && secondary.cues[j].range.end_ms <= a.range.start_ms {
            if !secondary_matched[j] {
                pairs.push(AlignedPair::secondary_only(secondary.cues[j].clone()));
            }
            j += 1;
        }

        let mut matched = false;
        let mut k = j;
        while k < secondary.cues.len() && secondary.cues[k].range.start_ms < a.range.end_ms {
            let b = &secondary.cues[k];
            if let Some(overlap) = a.range.overlap(&b.range) {
                if qualifies(overlap.duration_ms(), a.range.duration_ms(), b.range.duration_ms(), config) {
                    matched = true;
                    secondary_matched[k] = true;
                    pairs.push(AlignedPair::matched(a.clone(), b.clone(), overlap, false));
                }
            }
            k += 1;
        }

        if !matched {
            pairs.push(AlignedPair::primary_only(a.clone()));
        }
    }

    // Whatever remains on the secondary side closed without a counterpart
    while j < secondary.cues.len() {
        if !secondary_matched[j] {
            pairs.push(AlignedPair::secondary_only(secondary.cues[j].clone()));
        }
        j += 1;
    }

    mark_best_matches(&mut pairs);

    let matched = pairs.iter().filter(|p| p.is_matched()).count();
    debug!(
        "Aligned {} + {} cues into {} pair(s), {} matched",
        primary.cues.len(),
        secondary.cues.len(),
        pairs.len(),
        matched
    );

    pairs
}

fn qualifies(overlap_ms: u64, a_duration_ms: u64, b_duration_ms: u64, config: &AlignConfig) -> bool {
    if overlap_ms == 0 {
        return false;
    }
    let shorter = a_duration_ms.min(b_duration_ms);
    (overlap_ms as f64) >= config.min_overlap_ratio * (shorter as f64)
}

/// Flag, for each primary cue matched more than once, the pair with the
/// greatest overlap duration
fn mark_best_matches(pairs: &mut [AlignedPair]) {
    use std::collections::HashMap;

    // primary cue index -> (position of best pair, best overlap duration)
    let mut best_for_cue: HashMap<usize, (usize, u64)> = HashMap::new();

    for (pos, pair) in pairs.iter().enumerate() {
        if !pair.is_matched() {
            continue;
        }
        let cue_index = pair.primary.as_ref().map(|c| c.index).unwrap_or(0);
        let duration = pair.overlap.duration_ms();

        let entry = best_for_cue.entry(cue_index).or_insert((pos, duration));
        if duration > entry.1 {
            *entry = (pos, duration);
        }
    }

    for (pos, _) in best_for_cue.into_values() {
        pairs[pos].best_match = true;
    }
}
