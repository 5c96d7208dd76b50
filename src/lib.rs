use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod agent;
pub mod config;
pub mod error;
pub mod event_log;
pub mod game;
pub mod player;
pub mod pool;
pub mod state;
pub mod status;
pub mod turn;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use agent::{Agent, AgentKind, ClaimOffer, DrawnTileAgent, RandomAgent};
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use event_log::EventLog;
pub use game::{ClaimKind, Game, PendingClaim, Phase};
pub use player::{Player, PlayerId, Status};
pub use pool::TilePool;
pub use state::{ClaimPrompt, GameState, PlayerSummary};
pub use turn::TurnManager;

/// The three tile categories of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// `B` tiles
    Bamboo,
    /// `C` tiles
    Character,
    /// `D` tiles
    Dot,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Bamboo, Suit::Character, Suit::Dot];

    fn bits(self) -> u8 {
        match self {
            Suit::Bamboo => 0,
            Suit::Character => 1,
            Suit::Dot => 2,
        }
    }

    /// Letter used in tile notation ("b5", "c1", "d9")
    pub fn letter(self) -> char {
        match self {
            Suit::Bamboo => 'b',
            Suit::Character => 'c',
            Suit::Dot => 'd',
        }
    }

    /// Parse a suit letter, case-insensitive
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'b' => Some(Suit::Bamboo),
            'c' => Some(Suit::Character),
            'd' => Some(Suit::Dot),
            _ => None,
        }
    }
}

/// A tile represented as a u8.
/// - Bits 0-1: Suit (00 = Bamboo, 01 = Character, 10 = Dot)
/// - Bits 2-5: Rank (1-9)
///
/// Tiles compare by value: the four physical copies of a tile are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(u8);

impl Tile {
    const SUIT_MASK: u8 = 0b0000_0011;
    const RANK_MASK: u8 = 0b0011_1100;
    const RANK_SHIFT: u8 = 2;

    /// Highest rank in a suit
    pub const MAX_RANK: u8 = 9;
    /// Number of distinct tile values (3 suits x 9 ranks)
    pub const KINDS: usize = 27;

    /// Create a new tile from a suit and a rank (1-9)
    pub fn new(suit: Suit, rank: u8) -> Self {
        assert!((1..=Self::MAX_RANK).contains(&rank), "Rank must be 1-9");
        Tile((rank << Self::RANK_SHIFT) | suit.bits())
    }

    pub fn suit(&self) -> Suit {
        match self.0 & Self::SUIT_MASK {
            0 => Suit::Bamboo,
            1 => Suit::Character,
            _ => Suit::Dot,
        }
    }

    pub fn rank(&self) -> u8 {
        (self.0 & Self::RANK_MASK) >> Self::RANK_SHIFT
    }

    /// Dense index in 0..27, suit-major
    pub fn index(&self) -> usize {
        (self.suit().bits() as usize) * Self::MAX_RANK as usize + (self.rank() as usize - 1)
    }

    /// Inverse of [`Tile::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::KINDS {
            return None;
        }
        let suit = Suit::ALL[index / Self::MAX_RANK as usize];
        let rank = (index % Self::MAX_RANK as usize) as u8 + 1;
        Some(Tile::new(suit, rank))
    }

    /// The tile `delta` ranks away in the same suit, if it exists
    pub fn offset(&self, delta: i8) -> Option<Tile> {
        let rank = self.rank() as i8 + delta;
        if (1..=Self::MAX_RANK as i8).contains(&rank) {
            Some(Tile::new(self.suit(), rank as u8))
        } else {
            None
        }
    }

    /// Parse a tile from a string representation
    /// Format: "b5" (bamboo 5), "c1" (character 1), "d9" (dot 9)
    pub fn from_string(s: &str) -> GameResult<Self> {
        let mut chars = s.chars();
        let suit = match chars.next().and_then(Suit::from_letter) {
            Some(suit) => suit,
            None => return Err(GameError::parse(s, "expected suit letter b, c or d")),
        };

        let rank: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| GameError::parse(s, "invalid rank"))?;

        if !(1..=Self::MAX_RANK).contains(&rank) {
            return Err(GameError::parse(s, format!("rank must be 1-9, got {}", rank)));
        }

        Ok(Tile::new(suit, rank))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit().letter(), self.rank())
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Tile::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Type of an exposed meld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeldType {
    /// Three consecutive ranks in one suit
    Chow,
    /// Three identical tiles
    Pung,
    /// Four identical tiles
    Kong,
}

/// An exposed meld. Once exposed it is never taken back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,
}

impl Meld {
    pub fn new(meld_type: MeldType, tiles: Vec<Tile>) -> Self {
        Meld { meld_type, tiles }
    }

    /// How many hand slots the meld occupies
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// A player's hand: concealed tiles, the most recently drawn tile and the exposed melds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hand {
    concealed: BTreeMap<Tile, u8>,
    new_tile: Option<Tile>,
    melds: Vec<Meld>,
}

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand::default()
    }

    /// Build a concealed hand from dealt tiles. No tile is marked as new.
    pub fn from_tiles<I: IntoIterator<Item = Tile>>(tiles: I) -> Self {
        let mut hand = Hand::new();
        for tile in tiles {
            hand.insert(tile);
        }
        hand
    }

    fn insert(&mut self, tile: Tile) {
        *self.concealed.entry(tile).or_insert(0) += 1;
    }

    /// Remove `n` concealed copies of `tile`. Callers check the count first.
    fn take(&mut self, tile: Tile, n: u8) {
        if let Some(count) = self.concealed.get_mut(&tile) {
            *count -= n;
            if *count == 0 {
                self.concealed.remove(&tile);
            }
        }
    }

    /// Add a drawn tile to the concealed set and remember it as the new tile
    pub fn add_tile(&mut self, tile: Tile) {
        self.insert(tile);
        self.new_tile = Some(tile);
    }

    /// Remove one concealed copy of `tile` for discarding
    pub fn discard(&mut self, tile: Tile) -> GameResult<()> {
        if self.count(&tile) == 0 {
            return Err(GameError::illegal(format!("{} is not in the hand", tile)));
        }
        self.take(tile, 1);
        self.new_tile = None;
        Ok(())
    }

    /// Get the count of a specific concealed tile
    pub fn count(&self, tile: &Tile) -> u8 {
        self.concealed.get(tile).copied().unwrap_or(0)
    }

    /// Concealed tile counts, ordered by tile
    pub fn counts(&self) -> &BTreeMap<Tile, u8> {
        &self.concealed
    }

    /// Number of concealed tiles
    pub fn concealed_len(&self) -> usize {
        self.concealed.values().map(|&c| c as usize).sum()
    }

    /// Concealed tiles, flattened and sorted
    pub fn concealed_tiles(&self) -> Vec<Tile> {
        self.concealed
            .iter()
            .flat_map(|(&tile, &count)| std::iter::repeat(tile).take(count as usize))
            .collect()
    }

    pub fn new_tile(&self) -> Option<Tile> {
        self.new_tile
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn pungs(&self) -> impl Iterator<Item = &Meld> {
        self.melds_of(MeldType::Pung)
    }

    pub fn kongs(&self) -> impl Iterator<Item = &Meld> {
        self.melds_of(MeldType::Kong)
    }

    pub fn chows(&self) -> impl Iterator<Item = &Meld> {
        self.melds_of(MeldType::Chow)
    }

    fn melds_of(&self, meld_type: MeldType) -> impl Iterator<Item = &Meld> {
        self.melds.iter().filter(move |m| m.meld_type == meld_type)
    }

    /// Full flattened view for display: concealed tiles followed by every exposed meld
    pub fn to_list(&self) -> Vec<Tile> {
        let mut tiles = self.concealed_tiles();
        for meld in &self.melds {
            tiles.extend(meld.tiles.iter().copied());
        }
        tiles
    }

    /// Hand size as counted by the deal rules: concealed tiles plus three per meld.
    /// A Kong's fourth tile is covered by its replacement draw.
    pub fn size(&self) -> usize {
        self.concealed_len() + 3 * self.melds.len()
    }

    /// Every physical tile held, concealed or exposed
    pub fn tile_count(&self) -> usize {
        self.concealed_len() + self.melds.iter().map(Meld::size).sum::<usize>()
    }

    /// Expose a Pung from two concealed copies of `tile` plus `tile` itself
    pub fn add_pung(&mut self, tile: Tile) -> GameResult<()> {
        self.expose_set(tile, MeldType::Pung, 2)
    }

    /// Expose a Kong from three concealed copies of `tile` plus `tile` itself
    pub fn add_kong(&mut self, tile: Tile) -> GameResult<()> {
        self.expose_set(tile, MeldType::Kong, 3)
    }

    fn expose_set(&mut self, tile: Tile, meld_type: MeldType, from_hand: u8) -> GameResult<()> {
        if self.count(&tile) < from_hand {
            return Err(GameError::illegal(format!(
                "{:?} on {} needs {} matching tiles in hand",
                meld_type, tile, from_hand
            )));
        }
        self.take(tile, from_hand);
        self.melds
            .push(Meld::new(meld_type, vec![tile; from_hand as usize + 1]));
        self.new_tile = None;
        Ok(())
    }

    /// Every run of three the concealed tiles can complete with `tile`,
    /// lowest starting rank first
    pub fn chow_options(&self, tile: Tile) -> Vec<[Tile; 3]> {
        [(-2, -1), (-1, 1), (1, 2)]
            .iter()
            .filter_map(|&(a, b)| {
                let first = tile.offset(a)?;
                let second = tile.offset(b)?;
                if self.count(&first) == 0 || self.count(&second) == 0 {
                    return None;
                }
                let mut run = [first, second, tile];
                run.sort();
                Some(run)
            })
            .collect()
    }

    /// Expose the lowest run `tile` completes with two concealed tiles
    pub fn add_chow(&mut self, tile: Tile) -> GameResult<()> {
        let run = match self.chow_options(tile).into_iter().next() {
            Some(run) => run,
            None => {
                return Err(GameError::illegal(format!(
                    "no run in hand can take {}",
                    tile
                )));
            }
        };
        for &t in run.iter().filter(|&&t| t != tile) {
            self.take(t, 1);
        }
        self.melds.push(Meld::new(MeldType::Chow, run.to_vec()));
        self.new_tile = None;
        Ok(())
    }
}

/// A player's discard pile. Append-only apart from a claimed last tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table(Vec<Tile>);

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Table(Vec::new())
    }

    pub fn push(&mut self, tile: Tile) {
        self.0.push(tile);
    }

    /// The most recent discard
    pub fn last(&self) -> Option<Tile> {
        self.0.last().copied()
    }

    /// Take back the most recent discard once another player claims it
    pub fn remove_last(&mut self) -> Option<Tile> {
        self.0.pop()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
