//! Maximally-distinct color palette generation.
//!
//! Channel values come from a binary-subdivision sequence of [0, 255];
//! colors are emitted by walking the red, green, and blue channels through
//! that sequence round-robin, one channel per color.

use std::collections::VecDeque;

use crate::{Result, Rgb, VoronoiError};

/// Number of values in the subdivision sequence.
const SEQUENCE_LEN: usize = 255;

/// Channel values ordered by how early they maximize separation from the
/// values already emitted: `0, 255, 127, 63, 191, 31, 95, 159, 223, ...`.
///
/// Built by breadth-first subdivision: starting from the interval
/// `(0, 255)`, each interval emits its integer midpoint before either half
/// is split further. Intervals are disjoint, so every emitted value is new.
pub fn diversity_sequence() -> Vec<u8> {
    let mut seq = vec![0u8, 255];
    let mut intervals: VecDeque<(u16, u16)> = VecDeque::from([(0, 255)]);

    while let Some((lo, hi)) = intervals.pop_front() {
        if seq.len() == SEQUENCE_LEN {
            break;
        }
        if hi - lo < 2 {
            continue;
        }
        let mid = (lo + hi) / 2;
        seq.push(mid as u8);
        intervals.push_back((lo, mid));
        intervals.push_back((mid, hi));
    }

    seq
}

/// Generate `count` colors, pairwise as distinct as the channel space
/// allows and reproducibly ordered.
///
/// The first color is always black. Each subsequent color advances exactly
/// one channel to the next value of the subdivision sequence, rotating
/// red, green, blue. A channel wraps to the head of the sequence once it
/// runs off the end, so black is not reserved: `(0, 0, 0)` can reappear
/// for very large counts, and consumers must not treat it as a sentinel.
pub fn build_palette(count: usize) -> Result<Vec<Rgb>> {
    if count == 0 {
        return Err(VoronoiError::EmptyPalette);
    }

    let seq = diversity_sequence();
    let mut colors = Vec::with_capacity(count);
    // Per-channel cursor into `seq`; all start at its head (value 0)
    let mut cursors = [0usize; 3];
    let mut channel = 0;

    for _ in 0..count {
        colors.push([seq[cursors[0]], seq[cursors[1]], seq[cursors[2]]]);
        cursors[channel] = (cursors[channel] + 1) % seq.len();
        channel = (channel + 1) % 3;
    }

    Ok(colors)
}
