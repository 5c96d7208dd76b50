use serde::{Serialize, Serializer};

use crate::status::StatusDelta;
use crate::{Hand, Table};

/// Seat index in the fixed seating order
pub type PlayerId = usize;

/// A player's current role and eligibilities as a bit-set.
/// - Bits 0-1: activity (Playing or Waiting, never both)
/// - Bits 2-4: claim eligibility on the last revealed tile (Chow, Pung, Kong)
/// - Bit 5: Hu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Status(u8);

impl Status {
    pub const PLAYING: u8 = 0b0000_0001;
    pub const WAITING: u8 = 0b0000_0010;
    pub const CHOW: u8 = 0b0000_0100;
    pub const PUNG: u8 = 0b0000_1000;
    pub const KONG: u8 = 0b0001_0000;
    pub const HU: u8 = 0b0010_0000;

    const ACTIVITY: u8 = Self::PLAYING | Self::WAITING;
    const CLAIMS: u8 = Self::CHOW | Self::PUNG | Self::KONG;

    const NAMES: [(u8, &'static str); 6] = [
        (Self::PLAYING, "playing"),
        (Self::WAITING, "waiting"),
        (Self::CHOW, "chow"),
        (Self::PUNG, "pung"),
        (Self::KONG, "kong"),
        (Self::HU, "hu"),
    ];

    pub fn new() -> Self {
        Status(0)
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set_playing(&mut self) {
        self.0 = (self.0 & !Self::ACTIVITY) | Self::PLAYING;
    }

    pub fn set_waiting(&mut self) {
        self.0 = (self.0 & !Self::ACTIVITY) | Self::WAITING;
    }

    pub fn is_playing(&self) -> bool {
        self.contains(Self::PLAYING)
    }

    pub fn is_waiting(&self) -> bool {
        self.contains(Self::WAITING)
    }

    pub fn can_chow(&self) -> bool {
        self.contains(Self::CHOW)
    }

    pub fn can_pung(&self) -> bool {
        self.contains(Self::PUNG)
    }

    pub fn can_kong(&self) -> bool {
        self.contains(Self::KONG)
    }

    pub fn is_hu(&self) -> bool {
        self.contains(Self::HU)
    }

    /// Any of Chow, Pung or Kong
    pub fn has_claim(&self) -> bool {
        self.0 & Self::CLAIMS != 0
    }

    pub fn clear_claims(&mut self) {
        self.0 &= !Self::CLAIMS;
    }

    /// Set every flag the delta grants. Flags are only ever added here.
    pub fn apply(&mut self, delta: StatusDelta) {
        if delta.chow {
            self.0 |= Self::CHOW;
        }
        if delta.pung {
            self.0 |= Self::PUNG;
        }
        if delta.kong {
            self.0 |= Self::KONG;
        }
        if delta.hu {
            self.0 |= Self::HU;
        }
    }

    /// Names of the set flags, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
            .collect()
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// A seat at the table. Created once when the game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    pub hand: Hand,
    pub table: Table,
    pub status: Status,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            hand: Hand::new(),
            table: Table::new(),
            status: Status::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tiles this player accounts for: hand, exposed melds and discards
    pub fn tile_count(&self) -> usize {
        self.hand.tile_count() + self.table.len()
    }
}
