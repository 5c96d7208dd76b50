use serde::Deserialize;

use crate::agent::AgentKind;
use crate::error::{GameError, GameResult};
use crate::player::PlayerId;

/// Seats at the table
pub const SEATS: usize = 4;

/// Settings for a new game.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for shuffling, the starting seat and the AI seats.
    /// `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Names in seating order. Must be four distinct, non-empty names.
    pub player_names: Vec<String>,

    /// Seat driven by external commands
    pub human_seat: PlayerId,

    /// Policy for every other seat
    pub agent: AgentKind,

    /// Seat that receives the 14th tile and opens the game. `None` picks one at random.
    pub starting_seat: Option<PlayerId>,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::parse(json, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.player_names.len() != SEATS {
            return Err(GameError::config(format!(
                "expected {} player names, got {}",
                SEATS,
                self.player_names.len()
            )));
        }
        if self.player_names.iter().any(|n| n.trim().is_empty()) {
            return Err(GameError::config("player names must not be empty"));
        }
        for (i, name) in self.player_names.iter().enumerate() {
            if self.player_names[..i].contains(name) {
                return Err(GameError::config(format!("duplicate player name {}", name)));
            }
        }
        if self.human_seat >= SEATS {
            return Err(GameError::config(format!(
                "human seat must be below {}, got {}",
                SEATS, self.human_seat
            )));
        }
        if let Some(seat) = self.starting_seat {
            if seat >= SEATS {
                return Err(GameError::config(format!(
                    "starting seat must be below {}, got {}",
                    SEATS, seat
                )));
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: None,
            player_names: ["Player", "AI1", "AI2", "AI3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            human_seat: 0,
            agent: AgentKind::Random,
            starting_seat: None,
        }
    }
}
