use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, PieceKind};

/// Number of upcoming pieces kept ahead of the active one.
pub const QUEUE_LEN: usize = 3;

/// Upcoming-piece queue and hold slot.
///
/// Every refill draws one kind uniformly at random, so there is no bag and
/// repeats are allowed. The queue always holds exactly [`QUEUE_LEN`] kinds;
/// popping the front appends a fresh draw to the tail.
///
/// # Hold
///
/// - The first hold stores the current kind and takes the next one from the
///   queue
/// - Later holds swap the current kind with the held one
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBuffer, PieceSeed, QUEUE_LEN};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut buffer = PieceBuffer::with_seed(seed);
///
/// let upcoming: Vec<_> = buffer.next_pieces().collect();
/// assert_eq!(upcoming.len(), QUEUE_LEN);
/// assert_eq!(buffer.pop_next(), upcoming[0]);
/// assert_eq!(buffer.next_pieces().count(), QUEUE_LEN);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
    held: Option<PieceKind>,
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the queue's random generator. Equal seeds give equal
/// piece sequences, which makes sessions reproducible for tests and for the
/// headless simulator.
///
/// The text form is 32 hex digits, most significant byte first. It is used
/// both by [`FromStr`]/[`fmt::Display`] and by serde.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameSession, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let a = GameSession::with_seed(GameConfig::default(), seed);
/// let b = GameSession::with_seed(GameConfig::default(), seed);
/// assert_eq!(a.snapshot().queue, b.snapshot().queue);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `from_str_radix` accepts a leading sign, which is not a hex digit.
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::new(s));
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::new(s))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBuffer {
    /// Creates a buffer with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(QUEUE_LEN + 1),
            held: None,
        };
        this.fill_queue();
        this
    }

    fn fill_queue(&mut self) {
        while self.queue.len() < QUEUE_LEN {
            let kind = self.rng.random();
            self.queue.push_back(kind);
        }
    }

    /// Takes the front of the queue and appends a fresh random kind.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty, which the refill rule never allows.
    pub fn pop_next(&mut self) -> PieceKind {
        let next = self
            .queue
            .pop_front()
            .expect("piece queue should never be empty");
        self.fill_queue();
        next
    }

    /// Upcoming kinds in draw order, front first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// Returns what piece would be received if hold is used now.
    ///
    /// - If a piece is held: returns the held piece
    /// - If no piece is held: returns the front of the queue
    #[must_use]
    pub fn peek_hold_result(&self) -> PieceKind {
        self.held.unwrap_or_else(|| self.queue[0])
    }

    /// Stores `current` in the hold slot and returns the piece to play next.
    ///
    /// The returned kind is always the one [`Self::peek_hold_result`]
    /// reported just before the call.
    pub fn hold(&mut self, current: PieceKind) -> PieceKind {
        self.held
            .replace(current)
            .unwrap_or_else(|| self.pop_next())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    /// Empties the hold slot and redraws the whole queue.
    ///
    /// The generator keeps running, so a restarted game continues the seeded
    /// sequence instead of replaying it.
    pub fn reset(&mut self) {
        self.held = None;
        self.queue.clear();
        self.fill_queue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> PieceSeed {
        PieceSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ])
    }

    #[test]
    fn test_queue_stays_three_long() {
        let mut buffer = PieceBuffer::with_seed(seed());
        for _ in 0..50 {
            assert_eq!(buffer.next_pieces().count(), QUEUE_LEN);
            let expected_tail: Vec<_> = buffer.next_pieces().skip(1).collect();
            buffer.pop_next();
            let now: Vec<_> = buffer.next_pieces().take(QUEUE_LEN - 1).collect();
            assert_eq!(now, expected_tail);
        }
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut buffer1 = PieceBuffer::with_seed(seed());
        let mut buffer2 = PieceBuffer::with_seed(seed());
        for _ in 0..20 {
            assert_eq!(buffer1.pop_next(), buffer2.pop_next());
        }
    }

    #[test]
    fn test_draws_are_not_bagged() {
        // A 7-bag never deals the same kind three times in a row.
        let mut buffer = PieceBuffer::with_seed(seed());
        let draws: Vec<_> = (0..2000).map(|_| buffer.pop_next()).collect();
        assert!(draws.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]));
        for kind in PieceKind::ALL {
            assert!(draws.contains(&kind));
        }
    }

    #[test]
    fn test_first_hold_takes_from_queue() {
        let mut buffer = PieceBuffer::with_seed(seed());
        let front = buffer.next_pieces().next().unwrap();
        assert_eq!(buffer.peek_hold_result(), front);
        assert_eq!(buffer.hold(PieceKind::T), front);
        assert_eq!(buffer.held_piece(), Some(PieceKind::T));
        assert_eq!(buffer.next_pieces().count(), QUEUE_LEN);
    }

    #[test]
    fn test_second_hold_swaps() {
        let mut buffer = PieceBuffer::with_seed(seed());
        buffer.hold(PieceKind::T);
        let queue: Vec<_> = buffer.next_pieces().collect();
        assert_eq!(buffer.peek_hold_result(), PieceKind::T);
        assert_eq!(buffer.hold(PieceKind::O), PieceKind::T);
        assert_eq!(buffer.held_piece(), Some(PieceKind::O));
        assert_eq!(buffer.next_pieces().collect::<Vec<_>>(), queue);
    }

    #[test]
    fn test_reset_clears_hold() {
        let mut buffer = PieceBuffer::with_seed(seed());
        buffer.hold(PieceKind::I);
        buffer.reset();
        assert_eq!(buffer.held_piece(), None);
        assert_eq!(buffer.next_pieces().count(), QUEUE_LEN);
    }

    mod piece_seed {
        use super::*;

        #[test]
        fn test_display_is_32_hex_digits() {
            let seed: PieceSeed = rand::rng().random();
            let text = seed.to_string();
            assert_eq!(text.len(), 32);
            assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(text.parse::<PieceSeed>().unwrap(), seed);
        }

        #[test]
        fn test_known_value_big_endian() {
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_parse_uppercase() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_parse_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+123456789abcdef0123456789abcdef",
            ] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert!(err.to_string().contains("expected 32 hex digits"), "{input}");
            }
        }

        #[test]
        fn test_deserialize_error() {
            let result: Result<PieceSeed, _> = serde_json::from_str("\"zz\"");
            assert!(result.is_err());
        }
    }
}
