use crate::player::PlayerId;

/// Circular turn order over a fixed seating.
///
/// The seating never changes after construction. Claims move the current-turn
/// pointer with [`TurnManager::reset_to`] but leave the rotation itself alone.
///
/// `round` counts turns: every [`TurnManager::next`] and every reset adds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnManager {
    order: Vec<PlayerId>,
    current: usize,
    round: u32,
}

impl TurnManager {
    /// Seat the players in `order` so that the first `next()` hands the turn to `starter`.
    ///
    /// Panics if `order` is empty or does not contain `starter`.
    pub fn new(order: Vec<PlayerId>, starter: PlayerId) -> Self {
        assert!(!order.is_empty(), "turn order needs at least one seat");
        let mut turns = TurnManager {
            order,
            current: 0,
            round: 0,
        };
        let start = turns.position(starter);
        turns.current = (start + turns.order.len() - 1) % turns.order.len();
        turns
    }

    fn position(&self, player: PlayerId) -> usize {
        self.order
            .iter()
            .position(|&p| p == player)
            .unwrap_or_else(|| panic!("player {} is not seated in the turn order", player))
    }

    fn seat_at(&self, offset: usize) -> PlayerId {
        self.order[(self.current + offset) % self.order.len()]
    }

    /// Advance to the next seat and return whose turn it now is
    pub fn next(&mut self) -> PlayerId {
        self.current = (self.current + 1) % self.order.len();
        self.round += 1;
        self.order[self.current]
    }

    /// The player at the current-turn pointer
    pub fn peek(&self) -> PlayerId {
        self.order[self.current]
    }

    /// The `count` players seated after the current one, in seating order
    pub fn peek_next(&self, count: usize) -> Vec<PlayerId> {
        (1..=count).map(|offset| self.seat_at(offset)).collect()
    }

    /// The three players who may react to a tile the current player reveals
    pub fn peek_next3(&self) -> Vec<PlayerId> {
        self.peek_next(3)
    }

    /// The seat immediately after `player`
    pub fn player_after(&self, player: PlayerId) -> PlayerId {
        let pos = self.position(player);
        self.order[(pos + 1) % self.order.len()]
    }

    /// Move the turn to `player` out of sequence, e.g. after a claim
    pub fn reset_to(&mut self, player: PlayerId) {
        self.current = self.position(player);
        self.round += 1;
    }

    /// How many `next()` calls bring the turn to `player` (1 to seat count)
    pub fn turns_until(&self, player: PlayerId) -> usize {
        let n = self.order.len();
        (self.position(player) + n - self.current - 1) % n + 1
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }
}
