//! Claim and win eligibility for a single player against a single revealed tile.
//!
//! [`evaluate`] is pure; the orchestrator applies the resulting
//! [`StatusDelta`] to the candidate. Resolving competing claims between
//! players is not done here.

use crate::player::{Player, PlayerId};
use crate::{Hand, Tile};

/// Flags a reveal grants to one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusDelta {
    pub chow: bool,
    pub pung: bool,
    pub kong: bool,
    pub hu: bool,
}

/// How the reference tile was revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// The candidate just drew the tile; it is already in their hand
    SelfDraw,
    /// Another player discarded the tile. `successor` sits right after the discarder.
    Discard { successor: PlayerId },
}

/// Work out what `candidate` may do with `tile`
pub fn evaluate(candidate: &Player, tile: Tile, reveal: Reveal) -> StatusDelta {
    let hand = &candidate.hand;
    match reveal {
        Reveal::SelfDraw => StatusDelta {
            hu: is_winning_hand(hand, None),
            ..StatusDelta::default()
        },
        Reveal::Discard { successor } => {
            let matching = hand.count(&tile);
            StatusDelta {
                chow: candidate.id() == successor && !hand.chow_options(tile).is_empty(),
                pung: matching >= 2,
                kong: matching >= 3,
                hu: is_winning_hand(hand, Some(tile)),
            }
        }
    }
}

/// Evaluate and record the result on the candidate's status
pub fn check(candidate: &mut Player, tile: Tile, reveal: Reveal) -> StatusDelta {
    let delta = evaluate(candidate, tile, reveal);
    candidate.status.apply(delta);
    delta
}

/// Whether the concealed tiles (plus `extra`) form a complete hand:
/// sets and exactly one pair, or seven pairs when nothing is exposed.
pub fn is_winning_hand(hand: &Hand, extra: Option<Tile>) -> bool {
    let mut counts = [0u8; Tile::KINDS];
    for (tile, &count) in hand.counts() {
        counts[tile.index()] += count;
    }
    if let Some(tile) = extra {
        counts[tile.index()] += 1;
    }

    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if total % 3 != 2 {
        return false;
    }

    if hand.melds().is_empty() && total == 14 && counts.iter().all(|&c| c % 2 == 0) {
        return true;
    }

    for i in 0..Tile::KINDS {
        if counts[i] >= 2 {
            counts[i] -= 2;
            let found = decompose_sets(&mut counts);
            counts[i] += 2;
            if found {
                return true;
            }
        }
    }
    false
}

/// Split every remaining tile into triplets or runs, lowest tile first
fn decompose_sets(counts: &mut [u8; Tile::KINDS]) -> bool {
    let i = match counts.iter().position(|&c| c > 0) {
        Some(i) => i,
        None => return true,
    };

    if counts[i] >= 3 {
        counts[i] -= 3;
        let found = decompose_sets(counts);
        counts[i] += 3;
        if found {
            return true;
        }
    }

    // Runs stay inside one suit
    let rank_offset = i % Tile::MAX_RANK as usize;
    if rank_offset + 2 < Tile::MAX_RANK as usize && counts[i + 1] > 0 && counts[i + 2] > 0 {
        counts[i] -= 1;
        counts[i + 1] -= 1;
        counts[i + 2] -= 1;
        let found = decompose_sets(counts);
        counts[i] += 1;
        counts[i + 1] += 1;
        counts[i + 2] += 1;
        if found {
            return true;
        }
    }

    false
}
