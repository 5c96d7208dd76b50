//! The game orchestrator.
//!
//! A [`Game`] runs until the human seat has to decide something, then
//! returns a [`GameState`]. The caller answers with exactly one of
//! [`Game::play_tile`], [`Game::claim_pung`] (or the chow/kong variants) or
//! [`Game::skip`], each of which runs the engine to its next pause.
//!
//! Flow of one discard:
//! 1. The three players after the discarder are checked against the tile, in seating order
//! 2. A winning player takes the tile and the game ends
//! 3. Otherwise claimants are queued in that same order and offered the tile one at a time
//! 4. A claim moves the turn to the claimant, who discards next
//! 5. With no claim taken the seat after the discarder plays on

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::agent::{Agent, ClaimOffer};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::event_log::EventLog;
use crate::player::{Player, PlayerId, Status};
use crate::pool::TilePool;
use crate::state::{ClaimPrompt, GameState};
use crate::status::{self, Reveal};
use crate::turn::TurnManager;
use crate::{Hand, Tile};

/// Tiles dealt to every seat before the starter draws
pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    Chow,
    Pung,
    Kong,
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimKind::Chow => "chow",
            ClaimKind::Pung => "pung",
            ClaimKind::Kong => "kong",
        };
        f.write_str(name)
    }
}

/// The claim currently on offer, with the player it is offered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingClaim {
    #[default]
    None,
    Chow(PlayerId),
    Pung(PlayerId),
    Kong(PlayerId),
}

impl PendingClaim {
    /// Strongest claim `status` allows: Kong, then Pung, then Chow
    pub fn for_status(player: PlayerId, status: &Status) -> Self {
        if status.can_kong() {
            PendingClaim::Kong(player)
        } else if status.can_pung() {
            PendingClaim::Pung(player)
        } else if status.can_chow() {
            PendingClaim::Chow(player)
        } else {
            PendingClaim::None
        }
    }

    pub fn claimant(&self) -> Option<PlayerId> {
        match *self {
            PendingClaim::None => None,
            PendingClaim::Chow(p) | PendingClaim::Pung(p) | PendingClaim::Kong(p) => Some(p),
        }
    }

    pub fn kind(&self) -> Option<ClaimKind> {
        match self {
            PendingClaim::None => None,
            PendingClaim::Chow(_) => Some(ClaimKind::Chow),
            PendingClaim::Pung(_) => Some(ClaimKind::Pung),
            PendingClaim::Kong(_) => Some(ClaimKind::Kong),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The engine is between pauses; never visible from outside a step
    Running,
    /// The human must play a tile
    AwaitingDiscard,
    /// The human may claim the last discard or skip
    AwaitingClaim,
    Ended,
}

/// The last discard while claims on it are being settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenDiscard {
    tile: Tile,
    discarder: PlayerId,
}

pub struct Game {
    pool: TilePool,
    players: Vec<Player>,
    human: PlayerId,
    agents: Vec<Option<Box<dyn Agent>>>,
    turns: TurnManager,
    left_over_rounds: usize,
    ended: bool,
    dealt: bool,
    winner: Option<PlayerId>,
    phase: Phase,
    pending: PendingClaim,
    claim_queue: VecDeque<PlayerId>,
    open_discard: Option<OpenDiscard>,
    log: EventLog,
}

impl Game {
    /// Start a game with a fresh shuffle. Uses `config.seed` when set.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Start a game drawing all randomness from `rng`
    pub fn with_rng<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> GameResult<Self> {
        let pool = TilePool::shuffled(rng);
        let mut log = EventLog::new();
        log.add_message("Tiles created and shuffled");
        Self::start(config, pool, rng, log)
    }

    /// Start a game on a prepared pool, drawn front to back without shuffling
    pub fn with_pool<R: Rng + ?Sized>(
        config: GameConfig,
        pool: TilePool,
        rng: &mut R,
    ) -> GameResult<Self> {
        let mut log = EventLog::new();
        log.add_message(format!("Pool loaded with {} tiles", pool.len()));
        Self::start(config, pool, rng, log)
    }

    fn start<R: Rng + ?Sized>(
        config: GameConfig,
        pool: TilePool,
        rng: &mut R,
        log: EventLog,
    ) -> GameResult<Self> {
        config.validate()?;

        let players: Vec<Player> = config
            .player_names
            .iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name.as_str()))
            .collect();
        let agents = (0..players.len())
            .map(|seat| {
                if seat == config.human_seat {
                    None
                } else {
                    Some(config.agent.build(rng.r#gen()))
                }
            })
            .collect();
        let order: Vec<PlayerId> = players.iter().map(Player::id).collect();
        let starter = config
            .starting_seat
            .unwrap_or_else(|| rng.gen_range(0..players.len()));

        let mut game = Game {
            pool,
            players,
            human: config.human_seat,
            agents,
            turns: TurnManager::new(order, starter),
            left_over_rounds: 0,
            ended: false,
            dealt: false,
            winner: None,
            phase: Phase::Running,
            pending: PendingClaim::None,
            claim_queue: VecDeque::new(),
            open_discard: None,
            log,
        };

        game.deal(starter);
        if !game.ended {
            game.left_over_rounds = game.turns.turns_until(game.human);
            game.run_claim_window()?;
        }
        Ok(game)
    }

    // ========================================================================
    // Turn loop
    // ========================================================================

    fn deal(&mut self, starter: PlayerId) {
        for seat in 0..self.players.len() {
            let mut dealt = Vec::with_capacity(HAND_SIZE);
            for _ in 0..HAND_SIZE {
                match self.draw_tile() {
                    Some(tile) => dealt.push(tile),
                    None => break,
                }
            }
            self.players[seat].hand = Hand::from_tiles(dealt);
            if self.ended {
                return;
            }
        }

        let tile = match self.draw_tile() {
            Some(tile) => tile,
            None => return,
        };
        let player = &mut self.players[starter];
        player.hand.add_tile(tile);
        player.status.set_playing();
        let name = player.name().to_string();
        self.dealt = true;

        self.log.add_message("Tiles dealt");
        self.log.add_message(format!("{} starts the game", name));
    }

    /// Front tile of the pool. An empty pool ends the game.
    fn draw_tile(&mut self) -> Option<Tile> {
        let tile = self.pool.draw();
        if tile.is_none() {
            self.log.add_message("No more tiles");
            self.end(None);
        }
        tile
    }

    fn end(&mut self, winner: Option<PlayerId>) {
        self.ended = true;
        self.winner = winner;
        self.phase = Phase::Ended;
        self.pending = PendingClaim::None;
        self.claim_queue.clear();
        self.open_discard = None;
        match winner {
            Some(p) => self
                .log
                .add_message(format!("Game over, {} wins", self.players[p].name())),
            None => self.log.add_message("Game over, no winner"),
        }
    }

    /// Hand the turn to the next seat. The starter's opening turn draws nothing.
    fn advance_turn(&mut self) -> GameResult<()> {
        let p = self.turns.next();
        self.log
            .add_message(format!("{}'s turn", self.players[p].name()));
        if self.players[p].status.is_hu() {
            self.end(Some(p));
            return Ok(());
        }

        if self.turns.round() != 1 && !self.draw_for_turn(p) {
            return Ok(());
        }

        self.players[p].status.set_playing();
        if p == self.human {
            self.phase = Phase::AwaitingDiscard;
            self.log
                .add_message(format!("directing to {} for action", self.players[p].name()));
            Ok(())
        } else {
            self.ai_discard(p)
        }
    }

    /// Draw a tile for `p` and check it for a self-drawn win.
    /// Returns false when the draw ended the game.
    fn draw_for_turn(&mut self, p: PlayerId) -> bool {
        let tile = match self.draw_tile() {
            Some(tile) => tile,
            None => return false,
        };
        let player = &mut self.players[p];
        player.hand.add_tile(tile);
        if status::check(player, tile, Reveal::SelfDraw).hu {
            let message = format!("{} draws {} and completes the hand", player.name(), tile);
            self.log.add_message(message);
            self.end(Some(p));
            return false;
        }
        true
    }

    /// Let the agent at `seat` pick a discard and broadcast it
    fn ai_discard(&mut self, seat: PlayerId) -> GameResult<()> {
        let choice = match self.agents[seat].as_mut() {
            Some(agent) => agent.choose_discard(&self.players[seat]),
            None => None,
        };
        let tile = match choice.filter(|t| self.players[seat].hand.count(t) > 0) {
            Some(tile) => tile,
            None => {
                let fallback = self.players[seat]
                    .hand
                    .counts()
                    .keys()
                    .next()
                    .copied()
                    .unwrap_or_else(|| panic!("{} has no tile to discard", self.players[seat].name()));
                log::warn!(
                    "{} chose {:?}, which it does not hold; discarding {} instead",
                    self.players[seat].name(),
                    choice.map(|t| t.to_string()),
                    fallback
                );
                fallback
            }
        };
        self.discard(seat, tile)?;
        self.process_played(seat, tile)
    }

    fn discard(&mut self, seat: PlayerId, tile: Tile) -> GameResult<()> {
        let player = &mut self.players[seat];
        player.hand.discard(tile)?;
        player.table.push(tile);
        player.status.clear_claims();
        Ok(())
    }

    /// Check the three following seats against the discard and settle claims
    fn process_played(&mut self, discarder: PlayerId, tile: Tile) -> GameResult<()> {
        self.log
            .add_message(format!("{} played {}", self.players[discarder].name(), tile));

        let successor = self.turns.player_after(discarder);
        let candidates = self.turns.peek_next3();
        for &c in &candidates {
            status::check(&mut self.players[c], tile, Reveal::Discard { successor });
        }
        self.players[discarder].status.set_waiting();

        if let Some(&winner) = candidates.iter().find(|&&c| self.players[c].status.is_hu()) {
            self.players[discarder].table.remove_last();
            self.players[winner].hand.add_tile(tile);
            let message = format!(
                "{} wins on {}'s {}",
                self.players[winner].name(),
                self.players[discarder].name(),
                tile
            );
            self.log.add_message(message);
            self.end(Some(winner));
            return Ok(());
        }

        self.open_discard = Some(OpenDiscard { tile, discarder });
        self.claim_queue = candidates
            .into_iter()
            .filter(|&c| self.players[c].status.has_claim())
            .collect();
        self.resolve_claims()
    }

    /// Offer the open discard to queued claimants, nearest seat first.
    /// Pauses when the human is the one being offered.
    fn resolve_claims(&mut self) -> GameResult<()> {
        let open = match self.open_discard {
            Some(open) => open,
            None => return Ok(()),
        };

        while let Some(&claimant) = self.claim_queue.front() {
            let pending = PendingClaim::for_status(claimant, &self.players[claimant].status);
            let kind = match pending.kind() {
                Some(kind) => kind,
                None => {
                    self.claim_queue.pop_front();
                    continue;
                }
            };
            self.pending = pending;

            if claimant == self.human {
                self.phase = Phase::AwaitingClaim;
                let message = format!(
                    "{} can claim {}: press c to chow, p to pung, k to kong, or s to skip",
                    self.players[claimant].name(),
                    open.tile
                );
                self.log.add_message(message);
                return Ok(());
            }

            let offer = ClaimOffer {
                kind,
                tile: open.tile,
                from: open.discarder,
            };
            let accepted = match self.agents[claimant].as_mut() {
                Some(agent) => agent.choose_claim(&self.players[claimant], &offer),
                None => false,
            };
            if accepted {
                self.take_claim(claimant, kind)?;
                if self.ended {
                    return Ok(());
                }
                self.left_over_rounds = self.turns.turns_until(self.human);
                return self.ai_discard(claimant);
            }

            self.log.add_message(format!(
                "{} passes on {}",
                self.players[claimant].name(),
                open.tile
            ));
            self.players[claimant].status.clear_claims();
            self.claim_queue.pop_front();
        }

        self.pending = PendingClaim::None;
        self.open_discard = None;
        let successor = self.turns.player_after(open.discarder);
        self.players[successor].status.set_playing();
        Ok(())
    }

    /// Move the open discard into `claimant`'s meld and give them the turn.
    /// A Kong also takes a replacement tile from the pool.
    fn take_claim(&mut self, claimant: PlayerId, kind: ClaimKind) -> GameResult<()> {
        let open = self
            .open_discard
            .ok_or_else(|| GameError::illegal("there is no discard to claim"))?;

        let hand = &mut self.players[claimant].hand;
        match kind {
            ClaimKind::Chow => hand.add_chow(open.tile)?,
            ClaimKind::Pung => hand.add_pung(open.tile)?,
            ClaimKind::Kong => hand.add_kong(open.tile)?,
        }
        self.players[open.discarder].table.remove_last();

        for player in &mut self.players {
            player.status.clear_claims();
        }
        self.turns.reset_to(claimant);
        self.players[claimant].status.set_playing();
        self.pending = PendingClaim::None;
        self.claim_queue.clear();
        self.open_discard = None;

        let name = self.players[claimant].name();
        let message = format!("{} {}, now {} will play 1 tile", name, kind, name);
        self.log.add_message(message);

        if kind == ClaimKind::Kong {
            self.draw_for_turn(claimant);
        }
        Ok(())
    }

    /// Advance turns until the human must act, the budget runs out or the game ends
    fn run_claim_window(&mut self) -> GameResult<GameState> {
        while self.phase == Phase::Running && self.left_over_rounds > 0 {
            self.left_over_rounds -= 1;
            self.advance_turn()?;
        }
        self.check_invariants();
        Ok(self.state())
    }

    /// Hand sizes must stay at 13 or 14 once dealing is done
    fn check_invariants(&self) {
        if !self.dealt {
            return;
        }
        for player in &self.players {
            let size = player.hand.size();
            assert!(
                size == HAND_SIZE || size == HAND_SIZE + 1,
                "{} holds {} tiles",
                player.name(),
                size
            );
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// The human discards `tile`. Other seats then get their chance to claim it.
    pub fn play_tile(&mut self, tile: Tile) -> GameResult<GameState> {
        if self.phase != Phase::AwaitingDiscard {
            return Err(GameError::illegal(format!(
                "cannot play a tile while {:?}",
                self.phase
            )));
        }
        self.discard(self.human, tile)?;
        self.phase = Phase::Running;
        self.left_over_rounds = self.players.len();
        self.process_played(self.human, tile)?;
        self.run_claim_window()
    }

    pub fn claim_pung(&mut self, player: PlayerId) -> GameResult<GameState> {
        self.claim(player, ClaimKind::Pung)
    }

    pub fn claim_kong(&mut self, player: PlayerId) -> GameResult<GameState> {
        self.claim(player, ClaimKind::Kong)
    }

    pub fn claim_chow(&mut self, player: PlayerId) -> GameResult<GameState> {
        self.claim(player, ClaimKind::Chow)
    }

    fn claim(&mut self, player: PlayerId, kind: ClaimKind) -> GameResult<GameState> {
        if self.phase != Phase::AwaitingClaim {
            return Err(GameError::illegal(format!("no claim is open while {:?}", self.phase)));
        }
        if self.pending.claimant() != Some(player) {
            return Err(GameError::illegal(format!(
                "player {} has no claim on the last discard",
                player
            )));
        }
        let status = self.players[player].status;
        let eligible = match kind {
            ClaimKind::Chow => status.can_chow(),
            ClaimKind::Pung => status.can_pung(),
            ClaimKind::Kong => status.can_kong(),
        };
        if !eligible {
            return Err(GameError::illegal(format!(
                "{} cannot {} the last discard",
                self.players[player].name(),
                kind
            )));
        }

        self.take_claim(player, kind)?;
        if !self.ended {
            self.phase = Phase::AwaitingDiscard;
        }
        self.check_invariants();
        Ok(self.state())
    }

    /// The human passes on the open claim
    pub fn skip(&mut self) -> GameResult<GameState> {
        if self.phase != Phase::AwaitingClaim {
            return Err(GameError::illegal("there is no claim to skip"));
        }
        let human = self.human;
        self.log
            .add_message(format!("{} skips", self.players[human].name()));
        self.players[human].status.clear_claims();
        self.claim_queue.pop_front();
        self.phase = Phase::Running;
        self.resolve_claims()?;
        self.run_claim_window()
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn state(&self) -> GameState {
        GameState::capture(self)
    }

    /// The claim the human is being asked about, if any
    pub fn claim_prompt(&self) -> Option<ClaimPrompt> {
        if self.phase != Phase::AwaitingClaim {
            return None;
        }
        let open = self.open_discard?;
        let status = self.players[self.human].status;
        Some(ClaimPrompt {
            tile: open.tile,
            from: open.discarder,
            chow: status.can_chow(),
            pung: status.can_pung(),
            kong: status.can_kong(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn human(&self) -> PlayerId {
        self.human
    }

    pub fn turn_player(&self) -> PlayerId {
        self.turns.peek()
    }

    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> PendingClaim {
        self.pending
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn tiles_left(&self) -> usize {
        self.pool.len()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn is_over(&self) -> bool {
        self.ended
    }

    /// Every tile the game accounts for: pool, hands, melds and tables
    pub fn tile_total(&self) -> usize {
        self.pool.len() + self.players.iter().map(Player::tile_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentKind;
    use crate::pool::{DECK_SIZE, standard_deck};

    fn t(s: &str) -> Tile {
        Tile::from_string(s).unwrap()
    }

    fn tiles(s: &str) -> Vec<Tile> {
        s.split_whitespace().map(t).collect()
    }

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            agent: AgentKind::DrawnTile,
            starting_seat: Some(0),
            ..GameConfig::default()
        }
    }

    /// A seeded game where the human opens, so nothing has happened after the deal
    fn human_opens(seed: u64) -> Game {
        Game::new(config(seed)).unwrap()
    }

    #[test]
    fn test_deal_invariant() {
        let game = human_opens(1);
        let sizes: Vec<usize> = game.players.iter().map(|p| p.hand.concealed_len()).collect();
        assert_eq!(sizes, vec![14, 13, 13, 13]);
        assert_eq!(game.tiles_left(), DECK_SIZE - 53);
        assert!(game.players[0].status.is_playing());
        assert!(game.players[0].hand.new_tile().is_some());
    }

    #[test]
    fn test_human_opening_turn_waits_for_discard() {
        let game = human_opens(2);
        assert_eq!(game.phase(), Phase::AwaitingDiscard);
        assert_eq!(game.turn_player(), 0);
        assert_eq!(game.round(), 1);
        assert!(!game.is_over());
    }

    #[test]
    fn test_ai_starter_plays_until_human() {
        let game = Game::new(GameConfig {
            starting_seat: Some(2),
            ..config(3)
        })
        .unwrap();

        if !game.is_over() && game.phase() == Phase::AwaitingDiscard {
            assert_eq!(game.turn_player(), 0);
            // The human drew on reaching their turn
            assert_eq!(game.players[0].hand.size(), 14);
        }
        assert!(game.log().messages().iter().any(|m| m == "AI2 starts the game"));
        assert_eq!(game.tile_total(), DECK_SIZE);
    }

    #[test]
    fn test_play_tile_rotates_back_to_human() {
        let mut game = human_opens(4);
        let tile = game.players[0].hand.new_tile().unwrap();
        let state = game.play_tile(tile).unwrap();

        assert_eq!(game.tile_total(), DECK_SIZE);
        match state.phase {
            Phase::AwaitingDiscard => {
                assert_eq!(state.turn_player, 0);
                assert!(state.new_tile.is_some());
            }
            Phase::AwaitingClaim => assert!(state.prompt.is_some()),
            Phase::Ended => assert!(state.ended),
            Phase::Running => panic!("engine paused mid-step"),
        }
    }

    #[test]
    fn test_play_tile_not_in_hand_is_rejected() {
        let mut game = human_opens(5);
        let missing = standard_deck()
            .into_iter()
            .find(|tile| game.players[0].hand.count(tile) == 0)
            .unwrap();
        let before = game.state();

        assert!(matches!(
            game.play_tile(missing),
            Err(GameError::IllegalAction { .. })
        ));
        assert_eq!(game.state(), before);
    }

    #[test]
    fn test_skip_without_claim_is_rejected() {
        let mut game = human_opens(6);
        let before = game.state();
        assert!(game.skip().is_err());
        assert_eq!(game.state(), before);
    }

    #[test]
    fn test_claim_without_eligibility_is_rejected() {
        let mut game = human_opens(7);
        let before = game.state();
        assert!(game.claim_pung(0).is_err());
        assert!(game.claim_pung(2).is_err());
        assert_eq!(game.state(), before);
    }

    #[test]
    fn test_ai_pung_side_effects() {
        let mut game = human_opens(8);
        game.players[0].hand = Hand::from_tiles(tiles(
            "b1 b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d9",
        ));
        game.players[1].hand = Hand::from_tiles(tiles("b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 d5"));
        game.players[2].hand = Hand::from_tiles(tiles("d9 d9 b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6"));

        game.play_tile(t("d9")).unwrap();

        let ai2 = &game.players[2];
        assert!(ai2.hand.pungs().any(|m| m.tiles == vec![t("d9"); 3]));
        // Two d9 went into the meld and AI2 then discarded one more tile
        assert_eq!(ai2.hand.count(&t("d9")), 0);
        assert!(!game.players[0].table.tiles().contains(&t("d9")));
        assert!(game.log().messages().iter().any(|m| m == "AI2 pung, now AI2 will play 1 tile"));
        // AI1 was skipped by the claim
        let ai1_turn = game.log().messages().iter().position(|m| m == "AI1's turn");
        let pung = game
            .log()
            .messages()
            .iter()
            .position(|m| m.starts_with("AI2 pung"))
            .unwrap();
        assert!(ai1_turn.map_or(true, |i| i > pung));
    }

    #[test]
    fn test_nearest_claimant_is_offered_first() {
        let mut game = human_opens(9);
        game.players[0].hand = Hand::from_tiles(tiles(
            "c9 b1 b3 b5 b7 b9 c1 c3 c5 c7 d1 d3 d7 d9",
        ));
        game.players[1].hand = Hand::from_tiles(tiles("b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 d5"));
        // Both AI2 and AI3 hold a pair of c9; AI2 sits nearer to the discarder
        game.players[2].hand = Hand::from_tiles(tiles("c9 c9 b2 b4 b6 b8 c2 c4 c6 d2 d4 d6 d8"));
        game.players[3].hand = Hand::from_tiles(tiles("c9 c9 b2 b4 b6 b8 c2 c4 c6 d2 d4 d6 d8"));

        game.play_tile(t("c9")).unwrap();

        assert!(game.players[2].hand.pungs().any(|m| m.tiles[0] == t("c9")));
        assert!(!game.players[3].hand.pungs().any(|m| m.tiles[0] == t("c9")));
    }

    #[test]
    fn test_chow_never_offered_to_non_adjacent_seat() {
        let mut game = human_opens(10);
        game.players[0].hand = Hand::from_tiles(tiles(
            "c5 b1 b3 b5 b7 b9 c1 c9 d1 d3 d5 d7 d9 d9",
        ));
        // AI1 cannot use c5; AI2 could complete c4 c5 c6 but is not next in line
        game.players[1].hand = Hand::from_tiles(tiles("b2 b4 b6 b8 c1 c8 c2 d2 d4 d6 d8 b1 b9"));
        game.players[2].hand = Hand::from_tiles(tiles("c4 c6 b2 b4 b6 b8 c8 d2 d4 d6 d8 b3 b7"));
        game.players[3].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c7 c9 d1 d3 d7 d9"));

        game.discard(0, t("c5")).unwrap();
        game.phase = Phase::Running;
        game.process_played(0, t("c5")).unwrap();

        assert!(!game.players[2].status.can_chow());
        assert_eq!(game.players[2].hand.chows().count(), 0);
        assert_eq!(game.pending(), PendingClaim::None);
        assert!(game.players[1].status.is_playing());
        assert!(game.players[0].status.is_waiting());
        assert_eq!(game.players[0].table.tiles(), &[t("c5")]);
    }

    #[test]
    fn test_successor_can_chow() {
        let mut game = human_opens(16);
        game.players[0].hand = Hand::from_tiles(tiles(
            "c5 b1 b3 b5 b7 b9 c1 c9 d1 d3 d5 d7 d9 d9",
        ));
        game.players[1].hand = Hand::from_tiles(tiles("c4 c6 b2 b4 b6 b8 c8 d2 d4 d6 d8 b3 b7"));
        game.players[2].hand = Hand::from_tiles(tiles("b2 b4 b6 b8 c1 c8 c2 d2 d4 d6 d8 b1 b9"));
        game.players[3].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c7 c9 d1 d3 d7 d9"));

        game.play_tile(t("c5")).unwrap();

        let chow: Vec<&crate::Meld> = game.players[1].hand.chows().collect();
        assert_eq!(chow[0].tiles, vec![t("c4"), t("c5"), t("c6")]);
        assert!(game.log().messages().iter().any(|m| m == "AI1 chow, now AI1 will play 1 tile"));
    }

    #[test]
    fn test_human_claims_pung() {
        let mut game = human_opens(11);
        // Make AI3 discard into the human's pair: only the human can react
        game.players[0].hand = Hand::from_tiles(tiles(
            "d5 d5 b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d9",
        ));
        game.phase = Phase::Running;
        game.players[0].status.set_waiting();
        game.players[0].hand.discard(t("d9")).unwrap();
        game.players[0].table.push(t("d9"));
        game.turns.reset_to(3);
        game.players[3].hand = Hand::from_tiles(tiles("d5 b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 b2"));
        game.players[1].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));
        game.players[2].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));

        game.discard(3, t("d5")).unwrap();
        game.process_played(3, t("d5")).unwrap();

        assert_eq!(game.phase(), Phase::AwaitingClaim);
        assert_eq!(game.pending(), PendingClaim::Pung(0));
        let prompt = game.claim_prompt().unwrap();
        assert_eq!(prompt.tile, t("d5"));
        assert_eq!(prompt.from, 3);
        assert!(prompt.pung);

        let concealed_before = game.players[0].hand.concealed_len();
        let table_before = game.players[3].table.len();
        let state = game.claim_pung(0).unwrap();

        assert_eq!(game.players[0].hand.concealed_len(), concealed_before - 2);
        assert_eq!(game.players[0].hand.pungs().count(), 1);
        assert_eq!(game.players[3].table.len(), table_before - 1);
        assert!(game.players[0].status.is_playing());
        assert!(!game.players[0].status.can_pung());
        assert_eq!(game.turn_player(), 0);
        assert_eq!(state.phase, Phase::AwaitingDiscard);
        assert_eq!(state.pung, vec![t("d5"); 3]);
    }

    #[test]
    fn test_human_claims_kong_and_draws_replacement() {
        let mut game = human_opens(17);
        game.players[0].hand = Hand::from_tiles(tiles(
            "d5 d5 d5 b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d9",
        ));
        game.phase = Phase::Running;
        game.players[0].status.set_waiting();
        game.players[0].hand.discard(t("d9")).unwrap();
        game.players[0].table.push(t("d9"));
        game.turns.reset_to(3);
        game.players[3].hand = Hand::from_tiles(tiles("d5 b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 b2"));
        game.players[1].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));
        game.players[2].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));

        game.discard(3, t("d5")).unwrap();
        game.process_played(3, t("d5")).unwrap();

        assert_eq!(game.pending(), PendingClaim::Kong(0));
        let prompt = game.claim_prompt().unwrap();
        assert!(prompt.kong);
        assert!(prompt.pung);

        let concealed_before = game.players[0].hand.concealed_len();
        let table_before = game.players[3].table.len();
        let pool_before = game.tiles_left();
        let state = game.claim_kong(0).unwrap();

        let kongs: Vec<&crate::Meld> = game.players[0].hand.kongs().collect();
        assert_eq!(kongs.len(), 1);
        assert_eq!(kongs[0].tiles, vec![t("d5"); 4]);
        // Three tiles left for the meld, one came back as the replacement
        assert_eq!(game.players[0].hand.concealed_len(), concealed_before - 3 + 1);
        assert_eq!(game.players[0].hand.size(), 14);
        assert_eq!(game.tiles_left(), pool_before - 1);
        assert_eq!(game.players[3].table.len(), table_before - 1);
        assert_eq!(state.phase, Phase::AwaitingDiscard);
        assert_eq!(state.kong, vec![t("d5"); 4]);
        assert!(state.new_tile.is_some());
        assert_eq!(game.turn_player(), 0);
    }

    #[test]
    fn test_human_claims_chow_as_successor() {
        let mut game = human_opens(18);
        game.players[0].hand = Hand::from_tiles(tiles(
            "c4 c6 b1 b3 b5 b7 b9 c1 c9 d1 d3 d7 d9 d8",
        ));
        game.phase = Phase::Running;
        game.players[0].status.set_waiting();
        game.players[0].hand.discard(t("d8")).unwrap();
        game.players[0].table.push(t("d8"));
        game.turns.reset_to(3);
        game.players[3].hand = Hand::from_tiles(tiles("c5 b2 b4 b6 b8 c2 c8 d2 d4 d6 d8 b2 b4 b6"));
        game.players[1].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c7 c9 d1 d3 d7 d9"));
        game.players[2].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c7 c9 d1 d3 d7 d9"));

        game.discard(3, t("c5")).unwrap();
        game.process_played(3, t("c5")).unwrap();

        assert_eq!(game.pending(), PendingClaim::Chow(0));
        let prompt = game.claim_prompt().unwrap();
        assert!(prompt.chow);
        assert!(!prompt.pung);
        assert!(game.claim_pung(0).is_err());
        assert_eq!(game.phase(), Phase::AwaitingClaim);

        let table_before = game.players[3].table.len();
        let state = game.claim_chow(0).unwrap();

        let chows: Vec<&crate::Meld> = game.players[0].hand.chows().collect();
        assert_eq!(chows.len(), 1);
        assert_eq!(chows[0].tiles, vec![t("c4"), t("c5"), t("c6")]);
        assert_eq!(game.players[0].hand.concealed_len(), 11);
        assert_eq!(game.players[0].hand.size(), 14);
        assert_eq!(game.players[3].table.len(), table_before - 1);
        assert_eq!(state.phase, Phase::AwaitingDiscard);
        assert_eq!(state.chow, vec![t("c4"), t("c5"), t("c6")]);
        assert_eq!(game.turn_player(), 0);
    }

    #[test]
    fn test_ai_wins_on_self_draw() {
        let mut deck = Vec::new();
        // Dealt in seat order, then the human's 14th tile, then AI1's draw
        deck.extend(tiles("b1 b1 b1 b1 b2 b2 b2 b2 b3 b3 b3 b3 b9"));
        deck.extend(tiles("c1 c2 c3 c4 c5 c6 c7 c8 c9 d1 d1 d1 d9"));
        deck.extend(tiles("b5 b5 b5 b6 b6 b6 b7 b7 b7 d7 d8 c1 c9"));
        deck.extend(tiles("d2 d2 d2 d3 d3 d3 d4 d4 d4 d5 d5 d5 d6"));
        deck.extend(tiles("b9 d9"));
        let pool = TilePool::from_tiles(deck);
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = Game::with_pool(config(0), pool, &mut rng).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingDiscard);

        let state = game.play_tile(t("b9")).unwrap();

        assert!(state.ended);
        assert_eq!(state.winner, Some(1));
        assert_eq!(state.phase, Phase::Ended);
        assert_eq!(state.tiles_left, 0);
        assert!(game.players[1].status.is_hu());
        assert_eq!(game.tile_total(), 54);
        assert!(game
            .log()
            .messages()
            .iter()
            .any(|m| m == "AI1 draws d9 and completes the hand"));
    }

    #[test]
    fn test_human_skip_passes_turn_on() {
        let mut game = human_opens(12);
        game.players[0].hand = Hand::from_tiles(tiles(
            "d5 d5 b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1",
        ));
        game.phase = Phase::Running;
        game.players[0].status.set_waiting();
        game.turns.reset_to(3);
        game.players[3].hand = Hand::from_tiles(tiles("d5 b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 b2"));
        game.players[1].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));
        game.players[2].hand = Hand::from_tiles(tiles("b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d7"));
        game.discard(3, t("d5")).unwrap();
        game.process_played(3, t("d5")).unwrap();
        game.left_over_rounds = 1;
        assert_eq!(game.phase(), Phase::AwaitingClaim);

        let state = game.skip().unwrap();

        assert_eq!(game.players[0].hand.pungs().count(), 0);
        assert!(game.players[3].table.tiles().contains(&t("d5")));
        if !state.ended {
            assert_eq!(state.phase, Phase::AwaitingDiscard);
            assert_eq!(state.turn_player, 0);
            assert_eq!(game.players[0].hand.size(), 14);
        }
    }

    #[test]
    fn test_win_on_discard_ends_game() {
        let mut game = human_opens(13);
        game.players[0].hand = Hand::from_tiles(tiles(
            "d6 b1 b3 b5 b7 b9 c1 c3 c5 c7 c9 d1 d3 d9",
        ));
        // 123b 456b 789c 111d + d5 waits on d5
        game.players[2].hand = Hand::from_tiles(tiles("b1 b2 b3 b4 b5 b6 c7 c8 c9 d1 d1 d1 d5"));
        game.players[1].hand = Hand::from_tiles(tiles("b2 b4 b6 b8 c2 c4 c6 c8 d2 d4 d6 d8 d7"));
        game.players[0].hand.add_tile(t("d5"));
        game.players[0].hand.discard(t("d9")).unwrap();

        let state = game.play_tile(t("d5")).unwrap();

        assert!(state.ended);
        assert_eq!(state.winner, Some(2));
        assert_eq!(state.phase, Phase::Ended);
        assert_eq!(game.players[2].hand.count(&t("d5")), 2);
        assert!(game.players[0].table.is_empty());
        // No commands after the end
        assert!(game.play_tile(t("b1")).is_err());
    }

    #[test]
    fn test_short_pool_ends_during_deal() {
        let pool = TilePool::from_tiles(standard_deck().into_iter().take(40).collect());
        let mut rng = StdRng::seed_from_u64(0);
        let game = Game::with_pool(config(0), pool, &mut rng).unwrap();

        assert!(game.is_over());
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.winner(), None);
        assert_eq!(game.tile_total(), 40);
        assert_eq!(game.log().last(), Some("Game over, no winner"));
    }

    #[test]
    fn test_pool_runs_out_on_first_draw() {
        let pool = TilePool::from_tiles(standard_deck().into_iter().take(53).collect());
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = Game::with_pool(config(0), pool, &mut rng).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingDiscard);

        let tile = game.players[0].hand.concealed_tiles()[0];
        let state = game.play_tile(tile).unwrap();

        assert!(state.ended);
        assert_eq!(state.tiles_left, 0);
        // The failed draw left AI1's hand alone
        assert_eq!(game.players[1].hand.size(), 13);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let game = human_opens(14);
        assert_eq!(game.state(), game.state());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut game = human_opens(15);
        let state = game.state();
        let tile = state.hand[0];
        game.play_tile(tile).unwrap();
        assert_eq!(state.tables[0], Vec::<Tile>::new());
        assert_eq!(state.hand.len(), 14);
    }

    #[test]
    fn test_pending_claim_priority() {
        let mut status = Status::new();
        assert_eq!(PendingClaim::for_status(1, &status), PendingClaim::None);
        status.apply(crate::status::StatusDelta {
            chow: true,
            pung: true,
            kong: true,
            hu: false,
        });
        assert_eq!(PendingClaim::for_status(1, &status), PendingClaim::Kong(1));
        status.clear_claims();
        assert_eq!(PendingClaim::for_status(1, &status), PendingClaim::None);
        assert_eq!(PendingClaim::Chow(3).claimant(), Some(3));
        assert_eq!(PendingClaim::Pung(2).kind(), Some(ClaimKind::Pung));
        assert_eq!(PendingClaim::None.claimant(), None);
    }
}
