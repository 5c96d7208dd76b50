//! Computer-controlled seats.
//!
//! An agent only decides; the engine performs the action and has already
//! established that the offered claim is legal.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::ClaimKind;
use crate::player::{Player, PlayerId};
use crate::Tile;

/// A claim the engine puts to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimOffer {
    pub kind: ClaimKind,
    pub tile: Tile,
    pub from: PlayerId,
}

pub trait Agent {
    /// Pick a concealed tile to discard. `None` only for an empty hand.
    fn choose_discard(&mut self, me: &Player) -> Option<Tile>;

    /// Accept (`true`) or pass on a claim
    fn choose_claim(&mut self, me: &Player, offer: &ClaimOffer) -> bool;
}

/// Built-in policies, selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    #[default]
    Random,
    DrawnTile,
}

impl AgentKind {
    pub fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::DrawnTile => Box::new(DrawnTileAgent),
        }
    }
}

/// Discards uniformly at random and takes claims on a coin flip
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn choose_discard(&mut self, me: &Player) -> Option<Tile> {
        me.hand.concealed_tiles().into_iter().choose(&mut self.rng)
    }

    fn choose_claim(&mut self, _me: &Player, _offer: &ClaimOffer) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Throws away whatever it just drew (or its highest tile) and claims everything
pub struct DrawnTileAgent;

impl Agent for DrawnTileAgent {
    fn choose_discard(&mut self, me: &Player) -> Option<Tile> {
        me.hand
            .new_tile()
            .or_else(|| me.hand.counts().keys().next_back().copied())
    }

    fn choose_claim(&mut self, _me: &Player, _offer: &ClaimOffer) -> bool {
        true
    }
}
