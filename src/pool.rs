use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Suit, Tile};

/// Copies of each tile value in the deck
pub const COPIES: usize = 4;
/// 3 suits x 9 ranks x 4 copies
pub const DECK_SIZE: usize = Tile::KINDS * COPIES;

/// Every tile of a standard deck, in suit/rank order
pub fn standard_deck() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in 1..=Tile::MAX_RANK {
            for _ in 0..COPIES {
                tiles.push(Tile::new(suit, rank));
            }
        }
    }
    tiles
}

/// The draw pile. Tiles leave from the front and never come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePool {
    tiles: VecDeque<Tile>,
}

impl TilePool {
    /// A full deck, uniformly shuffled with `rng`
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tiles = standard_deck();
        tiles.shuffle(rng);
        TilePool {
            tiles: tiles.into(),
        }
    }

    /// A pool drawing exactly `tiles`, front first
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        TilePool {
            tiles: tiles.into(),
        }
    }

    /// Remove and return the front tile, or `None` once the pool is exhausted
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}
