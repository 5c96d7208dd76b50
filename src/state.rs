use serde::Serialize;

use crate::game::{Game, Phase};
use crate::player::{PlayerId, Status};
use crate::{Meld, MeldType, Tile};

/// What the human is being asked to claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimPrompt {
    pub tile: Tile,
    pub from: PlayerId,
    pub chow: bool,
    pub pung: bool,
    pub kong: bool,
}

/// Public view of one seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub status: Status,
    pub concealed: usize,
    pub melds: Vec<Meld>,
}

/// Detached copy of everything the presentation layer shows.
///
/// Built fresh on every call; nothing in it points back into the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub turn_player: PlayerId,
    pub players: Vec<PlayerSummary>,
    pub round: u32,
    /// The human's concealed tiles, sorted
    pub hand: Vec<Tile>,
    pub kong: Vec<Tile>,
    pub pung: Vec<Tile>,
    pub chow: Vec<Tile>,
    pub new_tile: Option<Tile>,
    /// Discards per seat
    pub tables: Vec<Vec<Tile>>,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<ClaimPrompt>,
    pub winner: Option<PlayerId>,
    pub ended: bool,
    pub tiles_left: usize,
}

impl GameState {
    pub fn capture(game: &Game) -> Self {
        let human = &game.players()[game.human()];
        let flatten = |meld_type: MeldType| -> Vec<Tile> {
            human
                .hand
                .melds()
                .iter()
                .filter(|m| m.meld_type == meld_type)
                .flat_map(|m| m.tiles.iter().copied())
                .collect()
        };

        GameState {
            turn_player: game.turn_player(),
            players: game
                .players()
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id(),
                    name: p.name().to_string(),
                    status: p.status,
                    concealed: p.hand.concealed_len(),
                    melds: p.hand.melds().to_vec(),
                })
                .collect(),
            round: game.round(),
            hand: human.hand.concealed_tiles(),
            kong: flatten(MeldType::Kong),
            pung: flatten(MeldType::Pung),
            chow: flatten(MeldType::Chow),
            new_tile: human.hand.new_tile(),
            tables: game
                .players()
                .iter()
                .map(|p| p.table.tiles().to_vec())
                .collect(),
            phase: game.phase(),
            prompt: game.claim_prompt(),
            winner: game.winner(),
            ended: game.is_over(),
            tiles_left: game.tiles_left(),
        }
    }
}
